//! CLI module graph.
//!
//! Each subcommand lives in its own module with an `execute` entry point.

pub mod check;
pub mod command;
pub mod optimize;
pub mod output;
pub mod process;
pub mod quote;
pub mod run;
