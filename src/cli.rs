mod format;

use clap::{ArgAction, Parser, Subcommand};
pub use format::{ColorMode, OutputFormat};
use std::path::PathBuf;

/// Encode and decode the bookmarkable filter strings of benchmark result tables
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file with the domain tables (TOML, JSON or JSON5)
    #[arg(short, long, global = true, env = "TABLE_FILTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short = 'F', long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Also write the result to this file
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// When to use colors
    #[arg(long, global = true, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Encode a JSON list of filter descriptors into a filter string
    Encode {
        /// Descriptor file (JSON or JSON5); stdin when omitted
        input: Option<PathBuf>,

        /// Store the filter in this page URL and print the new URL
        #[arg(long)]
        url: Option<String>,
    },
    /// Decode a filter string into filter descriptors
    Decode {
        /// The filter string
        #[arg(required_unless_present = "url")]
        filter: Option<String>,

        /// Read the filter from this page URL instead
        #[arg(long, conflicts_with = "filter")]
        url: Option<String>,
    },
    /// Encode, decode and verify that the effective filter is unchanged
    Check {
        /// Descriptor file (JSON or JSON5); stdin when omitted
        input: Option<PathBuf>,
    },
}

pub fn cli_parse() -> Cli {
    Cli::parse()
}
