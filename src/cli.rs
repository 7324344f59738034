use clap::{Parser, Subcommand};
use lognote::color::Color;
use lognote::sorter::SortKey;
use lognote::version::long_version;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, long_version = long_version())]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Write the application log here instead of the cache directory
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open log files into a group and list the resulting parts
    Open {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Group name (defaults to the first file's name)
        #[arg(short, long)]
        group: Option<String>,

        /// Group color: a name, #rrggbb or "auto"
        #[arg(long)]
        color: Option<String>,

        /// Print groups as JSON
        #[arg(long)]
        json: bool,
    },

    /// Inspect or extract ZIP archives
    Zip {
        #[command(subcommand)]
        command: ZipCommand,
    },

    /// List every line of a file containing a query
    Find {
        file: PathBuf,
        query: String,

        #[arg(short = 's', long)]
        case_sensitive: bool,

        /// Print matches as JSON
        #[arg(long)]
        json: bool,
    },

    /// Copy lines of a log into a curated HTML log
    Curate {
        file: PathBuf,

        /// 1-based line numbers, comma separated
        #[arg(short, long, value_delimiter = ',', required = true)]
        lines: Vec<usize>,

        #[arg(short, long)]
        output: PathBuf,

        /// Highlight every occurrence of this text
        #[arg(long)]
        highlight: Option<String>,

        /// Highlight background color
        #[arg(long, default_value = "yellow")]
        color: Color,

        /// Append to an existing curated log instead of starting over
        #[arg(long)]
        append: bool,
    },

    /// Sort the lines of a curated HTML log
    Sort {
        html: PathBuf,

        #[arg(short, long)]
        descending: bool,

        /// Sort by "text" or "timestamp" (defaults to the configured key)
        #[arg(short, long)]
        key: Option<SortKey>,

        /// Output file (defaults to overwriting the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ZipCommand {
    /// Show the directory tree of an archive
    List { archive: PathBuf },

    /// Extract entries and open them like regular files
    Extract {
        archive: PathBuf,

        #[arg(required = true)]
        entries: Vec<String>,

        #[arg(short, long)]
        group: Option<String>,

        #[arg(long)]
        json: bool,
    },
}
