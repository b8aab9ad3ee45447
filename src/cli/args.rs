//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};

use crate::cli::commands::{
    bom::BomArgs, completions::CompletionsArgs, decode::DecodeArgs, encode::EncodeArgs,
    legend::LegendArgs,
};

#[derive(Parser)]
#[command(name = "inwall")]
#[command(author, version, about = "In-wall junction box device codes and parts lists")]
#[command(long_about = "Turns junction box markups into compact device codes, short legend aliases, and a merged bill of materials.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the device code and shorthand alias for every box in a CSV
    Encode(EncodeArgs),

    /// Break device codes into their segments
    Decode(DecodeArgs),

    /// Expand boxes into a merged parts list
    Bom(BomArgs),

    /// List shorthand aliases for the device codes in a CSV
    Legend(LegendArgs),

    /// Print the expected CSV header row
    Template,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Use the configured default (markdown tables if unset)
    #[default]
    Auto,
    /// Markdown tables
    Md,
    /// Tab-separated values (for piping)
    Tsv,
    /// CSV format (for spreadsheets)
    Csv,
    /// JSON format (for programming)
    Json,
    /// YAML format
    Yaml,
}

impl OutputFormat {
    /// Resolve `Auto` against a configured default name
    pub fn resolve(self, configured: Option<&str>) -> OutputFormat {
        if self != OutputFormat::Auto {
            return self;
        }
        configured
            .and_then(|name| OutputFormat::from_str(name.trim(), true).ok())
            .filter(|f| *f != OutputFormat::Auto)
            .unwrap_or(OutputFormat::Md)
    }
}
