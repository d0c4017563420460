//! Command-line interface for the `xsearch` search-expression tool.

mod cli;

use std::{io, process::ExitCode};

use tracing_subscriber::EnvFilter;

use crate::cli::{
    args::{Commands, parse_cli},
    commands,
    context::CommandContext,
};

/// Environment variable holding the log filter, e.g. `XSEARCH_LOG=debug`.
const LOG_ENV: &str = "XSEARCH_LOG";

fn main() -> ExitCode {
    init_logging();

    let cli = parse_cli();
    let loaded = if matches!(cli.command, Commands::Init(_)) {
        CommandContext::load_cwd_only(cli.random_ids)
    } else {
        CommandContext::load(cli.random_ids)
    };
    let ctx = match loaded {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    commands::run(cli.command, &ctx)
}

/// Sends log output to stderr, filtered by `XSEARCH_LOG` (warnings only by default).
fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
