//! Command-line interface for tuneforge.
//!
//! Provides commands for reformatting interaction logs and inspecting the
//! resulting corpora.

mod commands;

pub use commands::{parse_cli, run_with_cli, Cli, Commands, FormatArgs, InspectArgs};
