//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

const OPTIONS_HELP: &str = "Loader options as key=value pairs separated by commas \
[keys: name, prefix, dir, os, arch, tmpdir, fallback]";

#[derive(Parser)]
#[command(name = "d2xx")]
#[command(author, version, about = "FTDI D2XX native library loader", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Loader options, e.g. dir=./resources,os=Linux,arch=x86_64
    #[arg(short = 'O', long, global = true, help = OPTIONS_HELP)]
    pub options: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the detected platform and the resolved library paths
    Platform,

    /// List supported platforms
    ListPlatforms,

    /// Extract the bundled library for this platform to a file
    Extract {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Load the library into this process
    Load {
        /// Check that these symbols are exported
        #[arg(short, long)]
        symbol: Vec<String>,
    },

    /// List FT4222H system clock rates
    ClockRates,
}
