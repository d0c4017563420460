//! Implementation of `xsearch parse`.

use std::{
    io::{self, IsTerminal},
    process::ExitCode,
};

use xsearch_highlight::dim;
use xsearch_query::parse_expr;

use crate::cli::{
    args::ParseCommand,
    context::CommandContext,
    output::{print_json, report_query_error},
};

/// Parses an expression and prints its group tree, JSON form or expression tree.
pub fn run(ctx: &CommandContext, cmd: &ParseCommand) -> ExitCode {
    if cmd.ast {
        return match parse_expr(&cmd.rsql) {
            Ok(Some(expr)) => {
                println!("{expr}");
                ExitCode::SUCCESS
            }
            Ok(None) => {
                println!("{}", dim("(empty expression)"));
                ExitCode::SUCCESS
            }
            Err(e) => report_query_error(&e),
        };
    }

    let factory = ctx.term_factory();
    let list = match ctx.parse_or_failure(&cmd.rsql, factory.ids()) {
        Ok(list) => list,
        Err(code) => return code,
    };

    if cmd.json {
        return print_json(&list, io::stdout().is_terminal());
    }
    for group in &list.search_list {
        print!("{group}");
    }
    ExitCode::SUCCESS
}
