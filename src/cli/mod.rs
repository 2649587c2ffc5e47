//! CLI command definitions for dotcfg
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

pub mod dump;
pub mod query;

use clap::{Parser, Subcommand};
use dump::{DumpArgs, SubArgs};
use query::{GetArgs, ListArgs};

/// Inspect layered configuration through dotted keys
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration source: file://PATH, env://PREFIX or a bare path.
    ///
    /// May be repeated; earlier sources override later ones. Sources go
    /// before the subcommand.
    #[arg(short, long = "source", value_name = "SOURCE", required = true)]
    pub sources: Vec<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the value stored under a key
    Get(GetArgs),

    /// List the immediate children of a key prefix
    List(ListArgs),

    /// Print the entries under a key prefix, re-rooted at its last segment
    Sub(SubArgs),

    /// Print every loaded entry
    Dump(DumpArgs),
}
