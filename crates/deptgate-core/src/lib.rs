#![forbid(unsafe_code)]

//! Core: terminal lifecycle, input events, geometry, and logging setup.

pub mod event;
pub mod geometry;
pub mod logging;
pub mod terminal_session;
