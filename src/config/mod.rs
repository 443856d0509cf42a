//! Configuration for reformat runs.
//!
//! A run is fully described by an input log, an output file, and the target
//! schema. Values come from [`ReformatConfig::default`], optionally a YAML
//! file, and finally CLI flags.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::export::OutputSchema;

/// Default interaction log written by the agent CLI.
pub const DEFAULT_INPUT_PATH: &str = "agent_interactions.jsonl";

/// Default formatted corpus read by the fine-tuning driver.
pub const DEFAULT_OUTPUT_PATH: &str = "formatted_data.jsonl";

/// Configuration for a single reformat run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReformatConfig {
    /// Line-delimited JSON interaction log to read.
    pub input_path: PathBuf,
    /// File to write; truncated at the start of every run.
    pub output_path: PathBuf,
    /// Output schema to produce.
    pub schema: OutputSchema,
}

impl Default for ReformatConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            schema: OutputSchema::default(),
        }
    }
}

impl ReformatConfig {
    /// Creates a configuration with explicit paths and schema.
    pub fn new(
        input_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
        schema: OutputSchema,
    ) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            schema,
        }
    }

    /// Loads a configuration from a YAML file. Keys left out keep their
    /// default values.
    ///
    /// ```yaml
    /// input_path: logs/agent_interactions.jsonl
    /// output_path: data/train.jsonl
    /// schema: flat
    /// ```
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }

    /// Parses a configuration from YAML text.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Sets the input log path.
    pub fn with_input(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_path = path.into();
        self
    }

    /// Sets the output file path.
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Sets the output schema.
    pub fn with_schema(mut self, schema: OutputSchema) -> Self {
        self.schema = schema;
        self
    }
}
