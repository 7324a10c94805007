//! Graph full-text indexing CLI
//!
//! Builds per-label full-text indexes over a property graph and queries them.
//!
//! # Usage
//!
//! ```bash
//! fulltext import graph.json
//! fulltext index-all
//! fulltext query-value '"New York"' --limit 10
//! fulltext query-property City york --fields name,motto
//! fulltext remove-all
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/graph-fulltext/config.toml)
//! 3. Environment variables (FULLTEXT_*)
//! 4. CLI flags

use anyhow::Result;
use clap::Parser;

use fulltext_cli::{run, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}
