//! Streaming reformatter from interaction logs to training corpora.
//!
//! Reads the input log one line at a time, renders each record in the
//! configured [`OutputSchema`], and writes one JSON object per line. The
//! output file is truncated first, so reruns over the same log produce the
//! same bytes.
//!
//! Malformed lines are handled per schema:
//! - `Flat`: logged with the trimmed line text and skipped.
//! - `Conversation`: the run fails with [`ReformatError::MalformedRecord`].

use std::path::PathBuf;

use serde::Serialize;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter, Lines};
use tracing::{debug, info, warn};

use crate::config::ReformatConfig;
use crate::error::ReformatError;
use crate::interaction::InteractionRecord;

use super::schema::OutputSchema;

/// An input line that was skipped because it did not decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedLine {
    /// 1-based line number in the input log.
    pub line_number: usize,
    /// The raw line, whitespace-trimmed.
    pub content: String,
}

/// Outcome of a completed reformat run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReformatReport {
    pub schema: OutputSchema,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    /// Lines read from the input log.
    pub lines_read: usize,
    /// Records written to the output file.
    pub records_written: usize,
    /// Malformed lines skipped (flat schema only).
    pub skipped: Vec<SkippedLine>,
    /// Valid records that produced no turns (conversation schema only).
    pub dropped_empty: usize,
}

impl ReformatReport {
    fn new(config: &ReformatConfig) -> Self {
        Self {
            schema: config.schema,
            input_path: config.input_path.clone(),
            output_path: config.output_path.clone(),
            lines_read: 0,
            records_written: 0,
            skipped: Vec::new(),
            dropped_empty: 0,
        }
    }
}

/// Reformats the configured interaction log into the configured schema.
///
/// The input and output files are held open for the duration of the call.
/// On a fatal error the lines rendered so far are flushed before the error
/// is returned, leaving a partial output file.
pub async fn reformat(config: &ReformatConfig) -> Result<ReformatReport, ReformatError> {
    let input = File::open(&config.input_path)
        .await
        .map_err(|source| ReformatError::OpenInput {
            path: config.input_path.clone(),
            source,
        })?;
    let output = File::create(&config.output_path)
        .await
        .map_err(|source| ReformatError::CreateOutput {
            path: config.output_path.clone(),
            source,
        })?;

    info!(
        input = %config.input_path.display(),
        output = %config.output_path.display(),
        schema = %config.schema,
        "Reformatting interaction log"
    );

    let mut lines = BufReader::new(input).lines();
    let mut writer = BufWriter::new(output);
    let mut report = ReformatReport::new(config);

    let result = transform_lines(&mut lines, &mut writer, config.schema, &mut report).await;
    let flushed = writer.flush().await;
    result?;
    flushed?;

    info!(
        lines = report.lines_read,
        written = report.records_written,
        skipped = report.skipped.len(),
        dropped = report.dropped_empty,
        "Reformat complete"
    );

    Ok(report)
}

async fn transform_lines<W>(
    lines: &mut Lines<BufReader<File>>,
    writer: &mut W,
    schema: OutputSchema,
    report: &mut ReformatReport,
) -> Result<(), ReformatError>
where
    W: AsyncWrite + Unpin,
{
    while let Some(line) = lines.next_line().await? {
        report.lines_read += 1;
        let line_number = report.lines_read;

        let record = match InteractionRecord::from_json_line(&line) {
            Ok(record) => record,
            Err(source) => match schema {
                OutputSchema::Flat => {
                    let content = line.trim().to_string();
                    warn!(line = line_number, content = %content, "Skipping invalid JSON line");
                    report.skipped.push(SkippedLine {
                        line_number,
                        content,
                    });
                    continue;
                }
                OutputSchema::Conversation => {
                    return Err(ReformatError::MalformedRecord {
                        line: line_number,
                        source,
                    });
                }
            },
        };

        match schema.render(&record)? {
            Some(rendered) => {
                writer.write_all(rendered.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                report.records_written += 1;
            }
            None => {
                debug!(line = line_number, "Dropping interaction with no turns");
                report.dropped_empty += 1;
            }
        }
    }

    Ok(())
}
