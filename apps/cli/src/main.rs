//! lattice CLI: blog feed → interactive knowledge graph.
//!
//! Reads an RSS or Atom feed, groups posts by the domain named in their
//! titles, and writes a single HTML page with a force-directed graph.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
