use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Validate and query utility-class generator configuration"
)]
pub struct Cli {
    /// Configuration document (defaults to the nearest stylekit.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Log resolution and scanning steps
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load the document, resolve its plugins and expand its content globs
    Check,

    /// List the files selected by `content`
    Content,

    /// List resolved plugins and the classes they contribute
    Plugins,

    /// Report whether each class is retained by the safelist
    Safelist {
        #[arg(required = true, num_args = 1..)]
        classes: Vec<String>,
    },

    /// Print the normalized document
    Print,
}
