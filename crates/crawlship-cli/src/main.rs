//! # crawlship — crawler image checker
//!
//! Tests locally built crawler images against the crawl platform's
//! entry point contract before they are pushed and deployed.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

mod commands;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::commands::Cli;

/// Log directives applied by `--debug`.
const DEBUG_DIRECTIVES: &str =
    "warn,crawlship_cli=debug,crawlship_common=debug,crawlship_runtime=debug,crawlship_contract=debug";

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug());
    commands::execute(cli)
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new(DEBUG_DIRECTIVES)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
