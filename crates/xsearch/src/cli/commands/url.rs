//! Implementation of `xsearch url`.

use std::process::ExitCode;

use url::Url;
use xsearch_query::link::search_url;

use crate::cli::{args::UrlCommand, context::CommandContext};

/// Prints the search link carrying an expression.
pub fn run(ctx: &CommandContext, cmd: &UrlCommand) -> ExitCode {
    let Some(base) = cmd
        .base
        .as_deref()
        .or(ctx.config.settings.base_url.as_deref())
    else {
        eprintln!("error: no base URL given");
        eprintln!("Pass --base or set base_url under [settings] in .xsearch.toml.");
        return ExitCode::FAILURE;
    };
    let base = match Url::parse(base) {
        Ok(url) => url,
        Err(e) => {
            eprintln!("error: invalid base URL '{base}': {e}");
            return ExitCode::FAILURE;
        }
    };

    let factory = ctx.term_factory();
    let list = match ctx.parse_or_failure(&cmd.rsql, factory.ids()) {
        Ok(list) => list,
        Err(code) => return code,
    };

    println!("{}", search_url(&base, &list));
    ExitCode::SUCCESS
}
