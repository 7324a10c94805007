//! Graph full-text CLI library exports.
//!
//! # Modules
//!
//! - `cli`: Command-line argument parsing with clap
//! - `commands`: Command implementations printing JSON lines

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands, KindArg};
pub use commands::{execute, init_logging, load_settings, run};
