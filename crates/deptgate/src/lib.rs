#![forbid(unsafe_code)]

//! DeptGate: an identity-gated terminal client.
//!
//! The identity screen stores name, phone number, and email; the detail
//! screen refuses to open without them and otherwise shows a paged table of
//! remote items next to a department selector.

pub mod app;
pub mod cli;
pub mod domain;
pub mod gate;
pub mod hierarchy;
pub mod identity_store;
pub mod item_source;
pub mod navigation;
pub mod remote_table;
pub mod screens;
pub mod theme;
