use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "layermap")]
#[command(about = "Architecture layer composition analyzer", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a graph export and group its packages by layer
    Analyze {
        /// Graph export (JSON) to analyze
        graph: PathBuf,

        /// Configuration file (defaults to the nearest .layermap.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format (defaults to [output] default_format, then terminal)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Explicit layer order, top to bottom
        #[arg(long, value_delimiter = ',')]
        layers: Option<Vec<String>>,

        /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
        /// -v: Show progress
        /// -vv: Show per-package details
        /// -vvv: Show all trace information
        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,
    },

    /// Initialize configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum OutputFormat {
    Json,
    Terminal,
}

impl From<OutputFormat> for crate::io::output::OutputFormat {
    fn from(f: OutputFormat) -> Self {
        match f {
            OutputFormat::Json => crate::io::output::OutputFormat::Json,
            OutputFormat::Terminal => crate::io::output::OutputFormat::Terminal,
        }
    }
}
