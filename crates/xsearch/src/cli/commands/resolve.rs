//! Implementation of `xsearch resolve`.

use std::{
    io::{self, IsTerminal},
    process::ExitCode,
};

use serde::Serialize;
use url::Url;
use xsearch_highlight::dim;
use xsearch_query::{
    SearchList,
    link::{EXTENDED_PARAM, extended_query, tree_from_url},
    to_rsql,
};

use crate::cli::{args::ResolveCommand, context::CommandContext, output::print_json};

/// JSON output for a decoded link.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResolvedLink<'a> {
    /// The raw `q` parameter.
    query: Option<&'a str>,
    /// Whether the link asks for the extended search form.
    is_extended: bool,
    /// The decoded tree.
    #[serde(flatten)]
    list: &'a SearchList,
}

/// Decodes the tree carried by a search link.
///
/// A link whose `q` does not parse resolves to an empty tree, as the search form would show it.
pub fn run(ctx: &CommandContext, cmd: &ResolveCommand) -> ExitCode {
    let url = match Url::parse(&cmd.url) {
        Ok(url) => url,
        Err(e) => {
            eprintln!("error: invalid URL '{}': {e}", cmd.url);
            return ExitCode::FAILURE;
        }
    };

    let query = extended_query(&url);
    let is_extended = url
        .query_pairs()
        .any(|(key, value)| key == EXTENDED_PARAM && value == "true");
    let factory = ctx.term_factory();
    let list = tree_from_url(&url, factory.ids());

    if cmd.json {
        let resolved = ResolvedLink {
            query: query.as_deref(),
            is_extended,
            list: &list,
        };
        return print_json(&resolved, io::stdout().is_terminal());
    }

    match &query {
        Some(query) => println!("{} {query}", dim("q:")),
        None => eprintln!("warning: link has no 'q' parameter"),
    }
    println!("{} {}", dim("rsql:"), to_rsql(&list));
    for group in &list.search_list {
        print!("{group}");
    }
    ExitCode::SUCCESS
}
