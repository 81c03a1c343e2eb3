//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use storelens::OutputFormat;

/// Storelens: e-commerce data cleaning and analytics
#[derive(Parser)]
#[command(name = "storelens")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Options shared by every stage.
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// JSON configuration file (paths and output format)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Clean a raw workbook and write the cleaned sheets
    Clean {
        #[command(flatten)]
        config: ConfigArgs,

        /// Raw workbook (xlsx/ods) or directory of CSV/TSV sheets
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Directory for the cleaned workbook
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compute the metrics from a cleaned workbook
    Analyze {
        #[command(flatten)]
        config: ConfigArgs,

        /// Directory holding the cleaned workbook
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Directory for the result tables
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (csv, tsv, json)
        #[arg(short, long)]
        format: Option<OutputFormat>,
    },
}
