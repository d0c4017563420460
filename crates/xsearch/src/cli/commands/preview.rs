//! Implementation of `xsearch preview`.

use std::process::ExitCode;

use xsearch_query::to_readable;

use crate::cli::context::CommandContext;

/// Prints the readable preview, with labels and values from the configuration.
pub fn run(ctx: &CommandContext, rsql: &str) -> ExitCode {
    let factory = ctx.term_factory();
    let list = match ctx.parse_or_failure(rsql, factory.ids()) {
        Ok(list) => list,
        Err(code) => return code,
    };

    println!("{}", to_readable(&list.into_root(), &ctx.config));
    ExitCode::SUCCESS
}
