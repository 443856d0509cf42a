//! Interaction log data types.
//!
//! This module defines the record format the agent CLI appends to
//! `agent_interactions.jsonl`: one user prompt, the assistant replies it
//! produced, and the tools it ran along the way.

use serde::{Deserialize, Deserializer, Serialize};

/// Opening marker wrapped around a tool call in assistant turns.
pub const TOOL_CALL_OPEN: &str = "<tool_code>";

/// Closing marker wrapped around a tool call in assistant turns.
pub const TOOL_CALL_CLOSE: &str = "</tool_code>";

/// A single logged exchange between a user, the assistant, and its tools.
///
/// Every field is optional on the wire. Missing or `null` fields decode to
/// their empty value, and unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawInteractionRecord")]
pub struct InteractionRecord {
    /// The prompt typed by the user. The agent CLI logs this as
    /// `user_message`; `user_prompt` wins when both are present.
    pub user_prompt: String,

    /// Assistant replies for this interaction, oldest first.
    pub ai_responses: Vec<String>,

    /// Tools invoked during this interaction, in execution order.
    pub tool_executions: Vec<ToolExecution>,
}

/// Wire shape of a log line, before the prompt keys are merged.
#[derive(Deserialize)]
struct RawInteractionRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    user_prompt: String,
    #[serde(default, deserialize_with = "null_as_default")]
    user_message: String,
    #[serde(default, deserialize_with = "null_as_default")]
    ai_responses: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    tool_executions: Vec<ToolExecution>,
}

impl From<RawInteractionRecord> for InteractionRecord {
    fn from(raw: RawInteractionRecord) -> Self {
        let user_prompt = if raw.user_prompt.is_empty() {
            raw.user_message
        } else {
            raw.user_prompt
        };
        Self {
            user_prompt,
            ai_responses: raw.ai_responses,
            tool_executions: raw.tool_executions,
        }
    }
}

impl InteractionRecord {
    /// Creates a record holding only a user prompt.
    pub fn new(user_prompt: impl Into<String>) -> Self {
        Self {
            user_prompt: user_prompt.into(),
            ..Self::default()
        }
    }

    /// Appends an assistant reply.
    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.ai_responses.push(response.into());
        self
    }

    /// Appends a tool execution.
    pub fn with_tool(mut self, call: impl Into<String>, output: impl Into<String>) -> Self {
        self.tool_executions.push(ToolExecution::new(call, output));
        self
    }

    /// Decodes a record from one line of the interaction log.
    pub fn from_json_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }

    /// The final assistant reply, if the assistant said anything.
    pub fn last_response(&self) -> Option<&str> {
        self.ai_responses.last().map(String::as_str)
    }
}

/// One tool invocation and the output it produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolExecution {
    /// The invocation text, e.g. `read_file("src/main.rs")`.
    pub tool_call: String,

    /// The captured result text.
    pub tool_output: String,
}

impl ToolExecution {
    /// Creates a tool execution from its call text and captured output.
    pub fn new(call: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            tool_call: call.into(),
            tool_output: output.into(),
        }
    }

    /// Renders the call followed by its output on the next line.
    pub fn render_plain(&self) -> String {
        format!("{}\n{}", self.tool_call, self.tool_output)
    }

    /// Renders the call wrapped in tool-call markers.
    pub fn tagged_call(&self) -> String {
        format!("{}{}{}", TOOL_CALL_OPEN, self.tool_call, TOOL_CALL_CLOSE)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
