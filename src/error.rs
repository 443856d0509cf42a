//! Error types for tuneforge operations.
//!
//! Defines error types for each subsystem:
//! - Reformatting interaction logs into training files
//! - Reading formatted datasets back
//! - Loading reformat configuration

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reformatting an interaction log.
#[derive(Debug, Error)]
pub enum ReformatError {
    #[error("Failed to open input log '{}': {source}", .path.display())]
    OpenInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create output file '{}': {source}", .path.display())]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed interaction record on line {line}: {source}")]
    MalformedRecord {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while reading a formatted dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to open dataset '{}': {source}", .path.display())]
    OpenDataset {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid dataset entry on line {line}: {source}")]
    InvalidLine {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while loading reformat configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown output schema '{0}': must be 'flat' or 'conversation'")]
    UnknownSchema(String),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
