#![forbid(unsafe_code)]

//! Render kernel: cells, styles, buffers, frames, and the presenter.

pub mod buffer;
pub mod cell;
pub mod frame;
pub mod presenter;
pub mod style;
