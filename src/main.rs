//! dotcfg command-line tool
//!
//! Loads layered configuration sources and queries them by dotted key.

use anyhow::Result;
use clap::Parser;
use dotcfg::cli::dump::{DumpArgs, SubArgs, write_store};
use dotcfg::cli::query::{GetArgs, ListArgs, get_value, list_children};
use dotcfg::cli::{Cli, Command};
use dotcfg::config::ConfigStore;
use dotcfg::logging::{self, LogTarget};
use std::io::Write;
use tracing::debug;

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&LogTarget::parse(&cli.log), cli.verbose)?;

    let mut store = ConfigStore::new();
    store.load_sources(&cli.sources)?;
    debug!(sources = ?cli.sources, keys = store.len(), "Configuration loaded");

    match cli.command {
        Command::Get(args) => run_get(&store, args)?,
        Command::List(args) => run_list(&store, args)?,
        Command::Sub(args) => run_sub(&store, args)?,
        Command::Dump(args) => run_dump(&store, args)?,
    }

    Ok(())
}

fn run_get(store: &ConfigStore, args: GetArgs) -> Result<()> {
    let value = get_value(store, &args)?;
    println!("{}", value);
    Ok(())
}

fn run_list(store: &ConfigStore, args: ListArgs) -> Result<()> {
    let mut out = std::io::stdout().lock();
    for child in list_children(store, &args) {
        writeln!(out, "{}", child)?;
    }
    Ok(())
}

fn run_sub(store: &ConfigStore, args: SubArgs) -> Result<()> {
    let sub = store.sub(&args.dir);
    write_store(&sub, args.format, std::io::stdout().lock())
}

fn run_dump(store: &ConfigStore, args: DumpArgs) -> Result<()> {
    write_store(store, args.format, std::io::stdout().lock())
}
