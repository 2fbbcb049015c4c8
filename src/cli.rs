use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Find the one code a form accepts, with bounded concurrency
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbose output (debug-level logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search the code space against a configured form target
    ///
    /// Example: codeprobe run --config target.json --concurrency 50
    Run(RunArgs),

    /// Write a default JSON config to edit
    ///
    /// Example: codeprobe template --output target.json
    Template {
        /// Where to write the template
        #[arg(short, long, default_value = "codeprobe.json")]
        output: PathBuf,
    },
}

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// JSON config file (see `codeprobe template`)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Form endpoint URL, overrides the config file
    #[arg(short, long)]
    pub url: Option<String>,

    /// Maximum number of probes in flight
    #[arg(short = 'j', long)]
    pub concurrency: Option<usize>,

    /// Number of digits in each code
    #[arg(short, long)]
    pub digits: Option<u32>,

    /// Read candidates from a file instead of the numeric code space
    #[arg(short, long)]
    pub wordlist: Option<PathBuf>,

    /// Raw Cookie header, e.g. "PHPSESSID=abc123"
    #[arg(long)]
    pub cookie: Option<String>,

    /// Extra form field sent with every probe, as NAME=VALUE (repeatable)
    #[arg(short = 'f', long = "field", value_name = "NAME=VALUE")]
    pub fields: Vec<String>,

    /// Per-probe timeout in seconds
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Append the accepted code to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
