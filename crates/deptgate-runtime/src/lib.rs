#![forbid(unsafe_code)]

//! Runtime: the `Model`/`Cmd` contract, the terminal event loop, and a
//! deterministic simulator for tests.

pub mod program;
pub mod simulator;

pub use program::{Cmd, Model, Program, ProgramConfig, TaskSpec};
pub use simulator::{CmdRecord, ProgramSimulator};
