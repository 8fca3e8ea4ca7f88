use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "eve-sde-to-docs")]
#[command(version, about = "Convert an EVE Online SDE database to a JSON document store")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert the SDE database into a document store directory
    Convert {
        /// Input SDE SQLite database path
        input_db: PathBuf,

        /// Output document store directory
        output_dir: PathBuf,

        /// Only run these converters (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        include: Option<Vec<String>>,

        /// Skip these converters (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        exclude: Option<Vec<String>>,

        /// Log every row as it is parsed
        #[arg(short, long)]
        verbose: bool,
    },

    /// List all converters and their destination collections
    ListConverters,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
