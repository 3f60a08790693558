//! Command line interface module
//!
//! Argument parsing and the runner that maps each subcommand onto one
//! catalog or registry operation.

pub mod args;
pub mod runner;

pub use args::{Args, Command, PageArgs};
pub use runner::Runner;
