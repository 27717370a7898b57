//! Command-line interface for zipdoc

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use zipdoc_core::{Direction, TranscodeMode};

#[derive(Parser)]
#[command(name = "zipdoc")]
#[command(about = "zipdoc - store zipped documents uncompressed under version control", long_about = None)]
pub struct Cli {
    /// Print debug messages for every file that is encoded or decoded
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(flatten)]
    pub transcode: TranscodeArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Encode filter: read an archive on stdin, write the stored form to stdout
    Encode {
        /// File name reported in log messages
        #[arg(long, default_value = "<stdin>")]
        name: String,

        /// JSON configuration whose `options` apply to this filter
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Decode filter: read an archive on stdin, write the deflated form to stdout
    Decode {
        /// File name reported in log messages
        #[arg(long, default_value = "<stdin>")]
        name: String,

        /// JSON configuration whose `options` apply to this filter
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Rewrite archives in place
    Convert {
        /// Target form
        #[arg(short, long, value_enum)]
        mode: ModeArg,

        /// Files to rewrite (non-ZIP files are left alone)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Route files through the configured filters and rewrite them in place
    Apply {
        /// Which rule list to use
        #[arg(short, long, value_enum)]
        direction: DirectionArg,

        /// JSON filter configuration (defaults to the built-in document patterns)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Files or directories (directories are walked recursively)
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// List archive contents
    List {
        /// Archive file
        archive: PathBuf,
    },

    /// Print the default filter configuration as JSON
    Config,
}

/// Overrides for the configured transcode options.
#[derive(Args, Debug, Clone, Default)]
pub struct TranscodeArgs {
    /// Deflate level for the compressed form (0-9)
    #[arg(long, global = true, value_parser = clap::value_parser!(u32).range(0..=9))]
    pub level: Option<u32>,

    /// Put XML tags on separate lines in the stored form
    #[arg(long, global = true)]
    pub xml_line_breaks: bool,
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum ModeArg {
    /// Every entry uncompressed
    Stored,
    /// Every entry deflated
    Compressed,
}

impl From<ModeArg> for TranscodeMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Stored => TranscodeMode::ToStored,
            ModeArg::Compressed => TranscodeMode::ToCompressed,
        }
    }
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum DirectionArg {
    /// Working copy to repository
    Encode,
    /// Repository to working copy
    Decode,
}

impl From<DirectionArg> for Direction {
    fn from(direction: DirectionArg) -> Self {
        match direction {
            DirectionArg::Encode => Direction::Encode,
            DirectionArg::Decode => Direction::Decode,
        }
    }
}
