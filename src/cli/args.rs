//! Defines the command-line arguments and subcommands for the specsuite CLI.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "specsuite",
    version,
    about = "Compile declarative test-suite specs into framework registration code."
)]
pub struct SpecsuiteArgs {
    /// Compile options document (YAML or JSON).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Write partitions and fragments to stderr while compiling.
    #[arg(long, global = true)]
    pub debug: bool,

    /// Raise log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the generated program for a spec document.
    Emit {
        /// The spec document to compile.
        #[arg(required = true)]
        file: PathBuf,
    },
    /// Print the compiled blocks of a spec document as JSON.
    Blocks {
        /// The spec document to compile.
        #[arg(required = true)]
        file: PathBuf,
    },
    /// Compile every spec document below a directory and report failures.
    Check {
        /// The directory to search for spec documents.
        #[arg(default_value = "specs")]
        path: PathBuf,
    },
}
