//! Implementation of `xsearch format`.

use std::process::ExitCode;

use xsearch_highlight::rsql;
use xsearch_query::to_rsql;

use crate::cli::{args::FormatCommand, context::CommandContext};

/// Prints the canonical RSQL form of an expression.
pub fn run(ctx: &CommandContext, cmd: &FormatCommand) -> ExitCode {
    let factory = ctx.term_factory();
    let list = match ctx.parse_or_failure(&cmd.rsql, factory.ids()) {
        Ok(list) => list,
        Err(code) => return code,
    };

    let formatted = to_rsql(&list);
    if cmd.color {
        println!("{}", rsql(&formatted));
    } else {
        println!("{formatted}");
    }
    ExitCode::SUCCESS
}
