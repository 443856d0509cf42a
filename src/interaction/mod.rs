//! Agent interaction logs.
//!
//! The agent CLI appends one [`InteractionRecord`] per user turn to a
//! line-delimited JSON log. Each record holds the prompt, the assistant's
//! replies, and the tool executions that happened in between.

pub mod types;

pub use types::{InteractionRecord, ToolExecution, TOOL_CALL_CLOSE, TOOL_CALL_OPEN};
