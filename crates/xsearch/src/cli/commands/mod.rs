//! Command implementations and dispatch.

pub mod config;
pub mod edit;
pub mod fields;
pub mod format;
pub mod init;
pub mod parse;
pub mod preview;
pub mod resolve;
pub mod url;

use std::process::ExitCode;

use super::{args::Commands, context::CommandContext};

/// Dispatches to the selected subcommand.
pub fn run(command: Commands, ctx: &CommandContext) -> ExitCode {
    match command {
        Commands::Parse(cmd) => parse::run(ctx, &cmd),
        Commands::Format(cmd) => format::run(ctx, &cmd),
        Commands::Preview { rsql } => preview::run(ctx, &rsql),
        Commands::Edit(cmd) => edit::run(ctx, &cmd),
        Commands::Url(cmd) => url::run(ctx, &cmd),
        Commands::Resolve(cmd) => resolve::run(ctx, &cmd),
        Commands::Fields(cmd) => fields::run(ctx, &cmd),
        Commands::Init(cmd) => init::run(ctx, &cmd),
        Commands::Config => config::run(ctx),
    }
}
