//! tuneforge: fine-tuning data preparation for agent interaction logs.
//!
//! This library reformats the line-delimited interaction log written by the
//! agent CLI into training corpora, either as flat instruction triples or as
//! chat message lists, and reads those corpora back for inspection.

pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod interaction;

// Re-export commonly used types
pub use config::ReformatConfig;
pub use error::{ConfigError, DatasetError, ReformatError};
pub use export::{reformat, OutputSchema, ReformatReport};
pub use interaction::{InteractionRecord, ToolExecution};
