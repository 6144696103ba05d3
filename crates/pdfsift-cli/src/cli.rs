use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use pdfsift::Rectangle;

/// Classify PDF pages against region templates and extract fields to CSV.
#[derive(Debug, Parser)]
#[command(name = "pdfsift", about, version)]
pub struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Less log output (-q warn, -qq error)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub quiet: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Classify every PDF in a directory and write matched fields to CSV
    Run {
        /// Template library (JSON)
        #[arg(long, value_name = "FILE")]
        templates: PathBuf,

        /// Directory of PDF files (not searched recursively)
        #[arg(long, value_name = "DIR")]
        input: PathBuf,

        /// Output CSV path
        #[arg(long, value_name = "FILE")]
        output: PathBuf,

        /// Worker threads. Default: available parallelism
        #[arg(long)]
        workers: Option<usize>,

        /// Add a Criteria_Met column after the fixed columns
        #[arg(long)]
        criteria_column: bool,

        /// Also write logs (without colors) to this file
        #[arg(long, value_name = "PATH")]
        log_file: Option<PathBuf>,
    },

    /// Classify a single PDF and print one line per matched page
    Classify {
        /// Template library (JSON)
        #[arg(long, value_name = "FILE")]
        templates: PathBuf,

        /// Path to the PDF file
        #[arg(value_name = "PDF")]
        file: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Print the text inside one region of one page
    Preview(PreviewArgs),
}

#[derive(Debug, Args)]
#[command(group(
    ArgGroup::new("region")
        .required(true)
        .args(["rect", "entity"]),
))]
pub struct PreviewArgs {
    /// Path to the PDF file
    #[arg(value_name = "PDF")]
    pub file: PathBuf,

    /// 1-based page number
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Region as x,y,width,height in top-left page coordinates
    #[arg(long, value_name = "X,Y,W,H", allow_hyphen_values = true)]
    pub rect: Option<Rectangle>,

    /// Template library holding the entity to preview
    #[arg(long, value_name = "FILE", requires = "entity")]
    pub templates: Option<PathBuf>,

    /// Template (document) name
    #[arg(long, value_name = "NAME", requires = "entity")]
    pub document: Option<String>,

    /// Entity name within the template
    #[arg(long, value_name = "NAME", requires_all = ["templates", "document"])]
    pub entity: Option<String>,

    /// Print the region text without collapsing whitespace
    #[arg(long)]
    pub raw: bool,
}

/// Output format for the classify subcommand.
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// One tab-separated line per record
    Text,
    /// One JSON object per line
    Json,
}
