//! Pawtrail CLI library.
//!
//! This library provides the core functionality for the `pawtrail` command-line
//! interface: configuration management, logging setup, command execution,
//! the interactive chat REPL and output formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod repl;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
