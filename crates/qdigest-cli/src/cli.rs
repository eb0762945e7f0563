use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "qdigest")]
#[command(about = "Audit profiled database commands with their data values masked", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Log level: error, warn, info, debug, trace (default from config: warn)
    #[arg(short = 'l', long, global = true)]
    pub log_level: Option<String>,

    /// Config file (default: platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print every profiled command verbatim and redacted
    Digest {
        /// Profile dump: path, file:path, or - for stdin
        #[arg(default_value = "-")]
        source: String,

        /// Only process namespaces of this database
        #[arg(short, long)]
        database: Option<String>,

        /// Comma separated namespace suffixes to skip (default from config: system.profile)
        #[arg(short, long, value_delimiter = ',')]
        skip_collections: Option<Vec<String>>,

        /// Replace values with their type instead of ***
        #[arg(short, long)]
        typeinfo: bool,

        /// Pretty-print documents
        #[arg(long)]
        pretty: bool,
    },

    /// Redact a single command document
    Redact {
        /// JSON document, or - to read it from stdin
        document: String,

        /// Replace values with their type instead of ***
        #[arg(short, long)]
        typeinfo: bool,

        /// Pretty-print the result
        #[arg(long)]
        pretty: bool,
    },

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Print the config file location
    Path,
}
