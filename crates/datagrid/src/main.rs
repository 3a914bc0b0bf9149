#![forbid(unsafe_code)]

//! # Datagrid CLI
//!
//! Renders a JSON dataset as a paginated HTML table.
//!
//! ## Usage
//!
//! ```bash
//! datagrid render --data users.json             # Inferred columns, page 1
//! datagrid render -d users.json -c table.json   # With a table config
//! datagrid check -c table.json                  # Validate a config
//! ```

mod cli;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    cli::run(cli)
}
