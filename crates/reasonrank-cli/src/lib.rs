//! ReasonRank CLI library.
//!
//! Loads claim, argument and evidence records from JSON, scores them with
//! the ReasonRank engine and renders the results as tables, JSON or bare
//! scores.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod records;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
pub use records::RecordSet;
