// Command-line interface

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "recipe-recall")]
#[command(about = "Recipe Recall - parse recipe markdown and recall dishes by ingredient", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the API server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long, env = "HOST")]
        host: Option<String>,
    },

    /// Parse a single recipe file and print it as JSON
    Parse {
        /// Markdown file to parse
        file: PathBuf,
    },

    /// Show document length distribution of the corpus
    Stats {
        /// Bucket width in characters
        #[arg(long, default_value_t = 100)]
        step: usize,
    },

    /// Recall recipes for a query against the local corpus
    Recall {
        /// Tags separated by `,`, `，` or `|`
        query: String,

        /// Match tokens against the whole markdown instead of materials
        #[arg(long)]
        fulltext: bool,

        /// Maximum number of results to print
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
}
