//! Reading formatted corpora back for inspection.
//!
//! The fine-tuning driver loads the conversation file strictly: every line
//! must decode, and each conversation is flattened into a prompt of
//! `role: content` lines. This module does the same so a corpus can be
//! checked before it is handed off.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::error::DatasetError;
use crate::export::{ConversationRecord, FlatRecord, Role};
use crate::interaction::TOOL_CALL_OPEN;

/// Loads a conversation-schema file.
pub async fn load_conversations(
    path: impl AsRef<Path>,
) -> Result<Vec<ConversationRecord>, DatasetError> {
    load_jsonl(path.as_ref()).await
}

/// Loads a flat-schema file.
pub async fn load_flat(path: impl AsRef<Path>) -> Result<Vec<FlatRecord>, DatasetError> {
    load_jsonl(path.as_ref()).await
}

async fn load_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, DatasetError> {
    let file = File::open(path)
        .await
        .map_err(|source| DatasetError::OpenDataset {
            path: path.to_path_buf(),
            source,
        })?;

    let mut lines = BufReader::new(file).lines();
    let mut records = Vec::new();
    let mut line_number = 0;

    while let Some(line) = lines.next_line().await? {
        line_number += 1;
        let record = serde_json::from_str(&line).map_err(|source| DatasetError::InvalidLine {
            line: line_number,
            source,
        })?;
        records.push(record);
    }

    tracing::debug!(path = %path.display(), records = records.len(), "Loaded dataset");
    Ok(records)
}

/// Aggregate statistics over a conversation corpus.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub records: usize,
    pub messages: usize,
    pub user_turns: usize,
    pub assistant_turns: usize,
    /// Tool calls embedded in assistant turns.
    pub tool_calls: usize,
    /// Longest training prompt, in characters.
    pub max_prompt_chars: usize,
    /// Mean training prompt length, in characters.
    pub mean_prompt_chars: f64,
}

/// Summarizes a conversation corpus.
pub fn summarize_conversations(records: &[ConversationRecord]) -> DatasetSummary {
    let mut summary = DatasetSummary {
        records: records.len(),
        ..DatasetSummary::default()
    };
    let mut total_chars = 0usize;

    for record in records {
        summary.messages += record.messages.len();
        for message in &record.messages {
            match message.role {
                Role::User => summary.user_turns += 1,
                Role::Assistant => {
                    summary.assistant_turns += 1;
                    summary.tool_calls += message.content.matches(TOOL_CALL_OPEN).count();
                }
            }
        }

        let prompt_chars = record.training_prompt().chars().count();
        summary.max_prompt_chars = summary.max_prompt_chars.max(prompt_chars);
        total_chars += prompt_chars;
    }

    if !records.is_empty() {
        summary.mean_prompt_chars = total_chars as f64 / records.len() as f64;
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::ChatMessage;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_conversations() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("formatted_data.jsonl");
        tokio::fs::write(
            &path,
            "{\"messages\":[{\"role\":\"user\",\"content\":\"hi\"}]}\n\
             {\"messages\":[{\"role\":\"user\",\"content\":\"q\"},{\"role\":\"assistant\",\"content\":\"a\"}]}\n",
        )
        .await
        .expect("Failed to write dataset");

        let records = load_conversations(&path).await.expect("should load");
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].messages[1], ChatMessage::assistant("a"));
    }

    #[tokio::test]
    async fn test_load_reports_bad_line() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("formatted_data.jsonl");
        tokio::fs::write(
            &path,
            "{\"messages\":[]}\n{\"messages\":[{\"role\":\"system\",\"content\":\"x\"}]}\n",
        )
        .await
        .expect("Failed to write dataset");

        let err = load_conversations(&path).await.expect_err("should fail");
        assert!(matches!(err, DatasetError::InvalidLine { line: 2, .. }));
    }

    #[tokio::test]
    async fn test_load_flat() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("flat.jsonl");
        tokio::fs::write(&path, "{\"instruction\":\"i\",\"input\":\"\",\"output\":\"o\"}\n")
            .await
            .expect("Failed to write dataset");

        let records = load_flat(&path).await.expect("should load");
        assert_eq!(records[0].instruction, "i");
        assert_eq!(records[0].output, "o");
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = load_conversations("/nonexistent/formatted_data.jsonl")
            .await
            .expect_err("should fail");
        assert!(matches!(err, DatasetError::OpenDataset { .. }));
    }

    #[test]
    fn test_summarize_conversations() {
        let records = vec![
            ConversationRecord {
                messages: vec![ChatMessage::user("hi")],
            },
            ConversationRecord {
                messages: vec![
                    ChatMessage::user("list"),
                    ChatMessage::assistant(
                        "done\n<tool_code>ls</tool_code>\na\n<tool_code>pwd</tool_code>\n/",
                    ),
                ],
            },
        ];

        let summary = summarize_conversations(&records);
        assert_eq!(summary.records, 2);
        assert_eq!(summary.messages, 3);
        assert_eq!(summary.user_turns, 2);
        assert_eq!(summary.assistant_turns, 1);
        assert_eq!(summary.tool_calls, 2);
        assert_eq!(summary.max_prompt_chars, records[1].training_prompt().len());
    }

    #[test]
    fn test_summarize_empty() {
        let summary = summarize_conversations(&[]);
        assert_eq!(summary, DatasetSummary::default());
    }
}
