//! Output schemas for fine-tuning corpora.
//!
//! An [`InteractionRecord`] can be rendered either as a flat
//! instruction/input/output triple or as a chat-style message list. The two
//! schemas are alternatives; a run picks exactly one.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::interaction::InteractionRecord;

/// Target schema for a reformat run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputSchema {
    /// Instruction-tuning triples (`instruction`, `input`, `output`).
    Flat,
    /// Chat-turn lists (`messages`). This is what the fine-tuning driver reads.
    #[default]
    Conversation,
}

impl OutputSchema {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputSchema::Flat => "flat",
            OutputSchema::Conversation => "conversation",
        }
    }

    /// Renders a record as one JSON line in this schema.
    ///
    /// Returns `Ok(None)` when the record produces nothing to write, which
    /// only happens for conversations without any turns.
    pub fn render(&self, record: &InteractionRecord) -> Result<Option<String>, serde_json::Error> {
        match self {
            OutputSchema::Flat => {
                serde_json::to_string(&FlatRecord::from_interaction(record)).map(Some)
            }
            OutputSchema::Conversation => {
                let conversation = ConversationRecord::from_interaction(record);
                if conversation.is_empty() {
                    return Ok(None);
                }
                serde_json::to_string(&conversation).map(Some)
            }
        }
    }
}

impl fmt::Display for OutputSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputSchema {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flat" | "instruction" => Ok(OutputSchema::Flat),
            "conversation" | "chat" | "messages" => Ok(OutputSchema::Conversation),
            other => Err(ConfigError::UnknownSchema(other.to_string())),
        }
    }
}

/// Instruction-tuning triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatRecord {
    pub instruction: String,
    pub input: String,
    pub output: String,
}

impl FlatRecord {
    /// Builds the triple: the prompt becomes the instruction, the tool
    /// transcript the input, and the final reply the output.
    pub fn from_interaction(record: &InteractionRecord) -> Self {
        let input = record
            .tool_executions
            .iter()
            .map(|te| te.render_plain())
            .collect::<Vec<_>>()
            .join("\n");

        Self {
            instruction: record.user_prompt.clone(),
            input,
            output: record.last_response().unwrap_or_default().to_string(),
        }
    }
}

/// Speaker of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single chat turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Chat-style training example.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub messages: Vec<ChatMessage>,
}

impl ConversationRecord {
    /// Builds at most one user turn and at most one assistant turn.
    ///
    /// The assistant turn holds the final reply followed by every tool call
    /// (wrapped in `<tool_code>` markers) and its output, newline-joined and
    /// trimmed at the end. Empty turns are left out.
    pub fn from_interaction(record: &InteractionRecord) -> Self {
        let mut messages = Vec::with_capacity(2);

        if !record.user_prompt.is_empty() {
            messages.push(ChatMessage::user(record.user_prompt.clone()));
        }

        let mut parts: Vec<String> = Vec::with_capacity(1 + record.tool_executions.len() * 2);
        if let Some(reply) = record.last_response() {
            parts.push(reply.to_string());
        }
        for te in &record.tool_executions {
            parts.push(te.tagged_call());
            parts.push(te.tool_output.clone());
        }

        let content = parts.join("\n").trim_end().to_string();
        if !content.is_empty() {
            messages.push(ChatMessage::assistant(content));
        }

        Self { messages }
    }

    /// Returns true if the conversation has no turns.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Builds the prompt string the fine-tuning driver trains on: each
    /// message as `"{role}: {content}\n"`, in order.
    pub fn training_prompt(&self) -> String {
        self.messages
            .iter()
            .map(|m| format!("{}: {}\n", m.role, m.content))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_files_record() -> InteractionRecord {
        InteractionRecord::new("list files")
            .with_response("done")
            .with_tool("ls", "a.txt b.txt")
    }

    #[test]
    fn test_flat_example_scenario() {
        let line = OutputSchema::Flat
            .render(&list_files_record())
            .expect("should serialize")
            .expect("flat always renders");
        assert_eq!(
            line,
            r#"{"instruction":"list files","input":"ls\na.txt b.txt","output":"done"}"#
        );
    }

    #[test]
    fn test_flat_output_is_last_response() {
        let record = InteractionRecord::new("q")
            .with_response("draft")
            .with_response("revised")
            .with_response("final");
        let flat = FlatRecord::from_interaction(&record);
        assert_eq!(flat.output, "final");
    }

    #[test]
    fn test_flat_input_joins_tools_in_order() {
        let record = InteractionRecord::new("q")
            .with_tool("first()", "1")
            .with_tool("second()", "2");
        let flat = FlatRecord::from_interaction(&record);
        assert_eq!(flat.input, "first()\n1\nsecond()\n2");
    }

    #[test]
    fn test_flat_without_tools_or_replies() {
        let flat = FlatRecord::from_interaction(&InteractionRecord::new("q"));
        assert_eq!(flat.input, "");
        assert_eq!(flat.output, "");
    }

    #[test]
    fn test_flat_renders_empty_record() {
        let line = OutputSchema::Flat
            .render(&InteractionRecord::default())
            .expect("should serialize");
        assert_eq!(
            line.as_deref(),
            Some(r#"{"instruction":"","input":"","output":""}"#)
        );
    }

    #[test]
    fn test_conversation_empty_record_dropped() {
        let line = OutputSchema::Conversation
            .render(&InteractionRecord::default())
            .expect("should serialize");
        assert!(line.is_none());
    }

    #[test]
    fn test_conversation_prompt_only() {
        let conversation = ConversationRecord::from_interaction(&InteractionRecord::new("hello"));
        assert_eq!(conversation.messages, vec![ChatMessage::user("hello")]);
    }

    #[test]
    fn test_conversation_assistant_content() {
        let conversation = ConversationRecord::from_interaction(&list_files_record());
        assert_eq!(conversation.messages.len(), 2);
        assert_eq!(conversation.messages[1].role, Role::Assistant);
        assert_eq!(
            conversation.messages[1].content,
            "done\n<tool_code>ls</tool_code>\na.txt b.txt"
        );
    }

    #[test]
    fn test_conversation_trims_trailing_whitespace() {
        let record = InteractionRecord::new("")
            .with_response("ok")
            .with_tool("pwd", "/tmp\n\n");
        let conversation = ConversationRecord::from_interaction(&record);
        assert_eq!(
            conversation.messages,
            vec![ChatMessage::assistant("ok\n<tool_code>pwd</tool_code>\n/tmp")]
        );
    }

    #[test]
    fn test_conversation_whitespace_reply_dropped() {
        let record = InteractionRecord::new("").with_response("  \n");
        assert!(ConversationRecord::from_interaction(&record).is_empty());
    }

    #[test]
    fn test_conversation_tools_without_reply() {
        let record = InteractionRecord::new("run it").with_tool("make()", "built");
        let conversation = ConversationRecord::from_interaction(&record);
        assert_eq!(
            conversation.messages[1].content,
            "<tool_code>make()</tool_code>\nbuilt"
        );
    }

    #[test]
    fn test_conversation_serialization_shape() {
        let line = OutputSchema::Conversation
            .render(&InteractionRecord::new("hi").with_response("hello"))
            .expect("should serialize")
            .expect("should render");
        assert_eq!(
            line,
            r#"{"messages":[{"role":"user","content":"hi"},{"role":"assistant","content":"hello"}]}"#
        );
    }

    #[test]
    fn test_training_prompt() {
        let conversation = ConversationRecord {
            messages: vec![ChatMessage::user("hi"), ChatMessage::assistant("hello")],
        };
        assert_eq!(conversation.training_prompt(), "user: hi\nassistant: hello\n");
    }

    #[test]
    fn test_schema_from_str() {
        assert_eq!("flat".parse::<OutputSchema>().ok(), Some(OutputSchema::Flat));
        assert_eq!(
            "Conversation".parse::<OutputSchema>().ok(),
            Some(OutputSchema::Conversation)
        );
        assert!("alpaca".parse::<OutputSchema>().is_err());
    }

    #[test]
    fn test_schema_default_is_conversation() {
        assert_eq!(OutputSchema::default(), OutputSchema::Conversation);
        assert_eq!(OutputSchema::Flat.to_string(), "flat");
    }
}
