//! Rendering and JSON serialization for CLI output.

use std::process::ExitCode;

use serde::Serialize;
use xsearch_config::ConfigWarning;
use xsearch_highlight::{Highlighter, warning};
use xsearch_query::QueryError;

/// Prints a value as pretty JSON, highlighted when `color` is set.
pub fn print_json<T: Serialize + ?Sized>(value: &T, color: bool) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) if color => {
            println!("{}", Highlighter::new().highlight_json(&json));
            ExitCode::SUCCESS
        }
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize JSON: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Prints a query syntax error with its caret line and hint.
pub fn report_query_error(err: &QueryError) -> ExitCode {
    eprintln!("error: {}", err.to_string().trim_end());
    ExitCode::FAILURE
}

/// Prints configuration warnings to stderr.
pub fn print_warnings(warnings: &[ConfigWarning]) {
    for w in warnings {
        eprintln!("{}", warning(&format!("warning: {w}")));
    }
}
