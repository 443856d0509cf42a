//! CLI command definitions for tuneforge.
//!
//! `format` turns an agent interaction log into a fine-tuning corpus and
//! `inspect` summarizes a corpus before it is handed to the trainer.

use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::{ReformatConfig, DEFAULT_OUTPUT_PATH};
use crate::dataset::{load_conversations, summarize_conversations};
use crate::export::{reformat, OutputSchema};

/// Fine-tuning data forge for agent interaction logs.
#[derive(Parser)]
#[command(name = "tuneforge")]
#[command(about = "Reformat agent interaction logs into fine-tuning corpora")]
#[command(version)]
#[command(
    long_about = "tuneforge reads the line-delimited interaction log written by the agent CLI and \
rewrites it as instruction triples (flat) or chat message lists (conversation).\n\nExample usage:\n  \
tuneforge format --input agent_interactions.jsonl --output formatted_data.jsonl --schema conversation"
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,
}

/// Available CLI subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Reformat an interaction log into a training corpus.
    #[command(alias = "fmt")]
    Format(FormatArgs),

    /// Summarize a conversation-schema corpus.
    Inspect(InspectArgs),
}

/// Arguments for `tuneforge format`.
#[derive(Parser, Debug)]
pub struct FormatArgs {
    /// Interaction log to read (default: agent_interactions.jsonl).
    #[arg(short = 'i', long)]
    pub input: Option<String>,

    /// Output file, overwritten on every run (default: formatted_data.jsonl).
    #[arg(short = 'o', long)]
    pub output: Option<String>,

    /// Output schema: "flat" or "conversation" (default: conversation).
    #[arg(short = 's', long)]
    pub schema: Option<String>,

    /// YAML file with input_path, output_path, and schema.
    /// Flags given on the command line override its values.
    #[arg(short = 'c', long)]
    pub config: Option<String>,

    /// Output JSON summary.
    #[arg(short = 'j', long)]
    pub json: bool,
}

impl FormatArgs {
    /// Resolves the run configuration: defaults, then the config file, then flags.
    pub fn to_config(&self) -> anyhow::Result<ReformatConfig> {
        let mut config = match &self.config {
            Some(path) => ReformatConfig::from_yaml_file(path)
                .map_err(|e| anyhow::anyhow!("Failed to load config '{}': {}", path, e))?,
            None => ReformatConfig::default(),
        };

        if let Some(input) = &self.input {
            config = config.with_input(input);
        }
        if let Some(output) = &self.output {
            config = config.with_output(output);
        }
        if let Some(schema) = &self.schema {
            config = config.with_schema(schema.parse::<OutputSchema>()?);
        }

        Ok(config)
    }
}

/// Arguments for `tuneforge inspect`.
#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// Conversation-schema corpus to summarize.
    #[arg(short = 'i', long, default_value = DEFAULT_OUTPUT_PATH)]
    pub input: String,

    /// Output JSON summary.
    #[arg(short = 'j', long)]
    pub json: bool,
}

/// Parse CLI arguments and return the Cli struct.
///
/// This allows main.rs to access CLI arguments (like log_level) before running commands.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Run the CLI with the parsed arguments.
pub async fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Format(args) => {
            run_format_command(args).await?;
        }
        Commands::Inspect(args) => {
            run_inspect_command(args).await?;
        }
    }
    Ok(())
}

// ============================================================================
// Format Command Implementation
// ============================================================================

async fn run_format_command(args: FormatArgs) -> anyhow::Result<()> {
    let config = args.to_config()?;
    let report = reformat(&config).await?;

    if args.json {
        let json_output = serde_json::to_string_pretty(&report)
            .map_err(|e| anyhow::anyhow!("Failed to serialize JSON output: {}", e))?;
        println!("{}", json_output);
        return Ok(());
    }

    if report.records_written == 0 {
        warn!(
            input = %report.input_path.display(),
            "No records were written"
        );
    }

    println!("✓ Reformat completed ({})", report.schema);
    println!("  Input:   {}", report.input_path.display());
    println!("  Output:  {}", report.output_path.display());
    println!("  Lines read:      {}", report.lines_read);
    println!("  Records written: {}", report.records_written);
    match report.schema {
        OutputSchema::Flat => {
            println!("  Skipped invalid: {}", report.skipped.len());
        }
        OutputSchema::Conversation => {
            println!("  Dropped empty:   {}", report.dropped_empty);
        }
    }

    Ok(())
}

// ============================================================================
// Inspect Command Implementation
// ============================================================================

#[derive(Debug, Serialize)]
struct InspectOutput {
    path: String,
    #[serde(flatten)]
    summary: crate::dataset::DatasetSummary,
}

async fn run_inspect_command(args: InspectArgs) -> anyhow::Result<()> {
    let records = load_conversations(&args.input).await?;
    info!(path = %args.input, count = records.len(), "Loaded corpus for inspection");

    let output = InspectOutput {
        path: args.input,
        summary: summarize_conversations(&records),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let summary = &output.summary;
    println!("Corpus: {}", output.path);
    println!("  Records:         {}", summary.records);
    println!("  Messages:        {}", summary.messages);
    println!("  User turns:      {}", summary.user_turns);
    println!("  Assistant turns: {}", summary.assistant_turns);
    println!("  Tool calls:      {}", summary.tool_calls);
    println!("  Max prompt:      {} chars", summary.max_prompt_chars);
    println!("  Mean prompt:     {:.1} chars", summary.mean_prompt_chars);

    Ok(())
}
