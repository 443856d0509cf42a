//! Export module for fine-tuning corpora.
//!
//! Turns agent interaction logs into line-delimited JSON training files in
//! one of two schemas: flat instruction triples or chat message lists.

pub mod reformatter;
pub mod schema;

pub use reformatter::{reformat, ReformatReport, SkippedLine};
pub use schema::{ChatMessage, ConversationRecord, FlatRecord, OutputSchema, Role};
