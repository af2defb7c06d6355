pub mod history;
pub mod run;
pub mod schema;
pub mod share;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "parthought")]
#[command(
    author,
    version,
    about = "Five expert perspectives and a weighted synthesis for any decision"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose/debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a problem and synthesize a recommendation
    Run(RunArgs),

    /// Browse previously completed scenarios
    History(HistoryArgs),

    /// Build or read share links
    Share(ShareArgs),

    /// Print JSON Schema for the config or a model output
    Schema(SchemaArgs),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser, Clone)]
pub struct RunArgs {
    /// Path to config file
    #[arg(short, long, default_value = "parthought.yaml")]
    pub config: PathBuf,

    /// Problem statement
    #[arg(short, long, conflicts_with = "problem_file")]
    pub problem: Option<String>,

    /// Read the problem statement from a file
    #[arg(long)]
    pub problem_file: Option<PathBuf>,

    /// Additional context
    #[arg(long, conflicts_with = "context_file")]
    pub context: Option<String>,

    /// Read the context from a file
    #[arg(long)]
    pub context_file: Option<PathBuf>,

    /// Weight overrides, e.g. security=90,cost=40
    #[arg(short, long)]
    pub weights: Option<String>,

    /// Seed problem, context and weights from a share link
    #[arg(long)]
    pub share: Option<String>,

    /// Retry retryable failures using the config's retry policy
    #[arg(long)]
    pub retry: bool,

    /// Retry retryable failures up to N times (implies --retry)
    #[arg(long, value_name = "N")]
    pub retries: Option<u32>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Also write the markdown report (and a .json copy) to this path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Clone)]
pub struct HistoryArgs {
    /// Path to config file
    #[arg(short, long, default_value = "parthought.yaml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: HistoryCommand,
}

#[derive(Subcommand, Clone)]
pub enum HistoryCommand {
    /// List saved scenarios, most recent first
    List {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Load a saved scenario and print it
    Show {
        id: Uuid,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Parser, Clone)]
pub struct ShareArgs {
    #[command(subcommand)]
    pub command: ShareCommand,
}

#[derive(Subcommand, Clone)]
pub enum ShareCommand {
    /// Encode a scenario as a share link
    Encode {
        /// Problem statement
        #[arg(short, long)]
        problem: String,

        /// Additional context
        #[arg(long, default_value = "")]
        context: String,

        /// Weight overrides on top of the configured defaults
        #[arg(short, long)]
        weights: Option<String>,

        /// Base URL to attach the query to; prints a bare query if omitted
        #[arg(long)]
        base: Option<String>,

        /// Path to config file
        #[arg(short, long, default_value = "parthought.yaml")]
        config: PathBuf,
    },

    /// Decode a share link (full URL or bare query) and print its fields as JSON
    Decode { link: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SchemaTarget {
    Config,
    Perspectives,
    Synthesis,
}

#[derive(Parser, Clone)]
pub struct SchemaArgs {
    /// Which schema to print
    #[arg(value_enum, default_value_t = SchemaTarget::Config)]
    pub target: SchemaTarget,
}
