//! Implementation of `xsearch config`.

use std::process::ExitCode;

use xsearch_highlight::{Highlighter, dim};

use crate::cli::{context::CommandContext, output::print_warnings};

/// Shows the effective configuration, followed by any validation warnings.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let config = &ctx.config;
    let toml = match config.settings_to_toml() {
        Ok(toml) => toml,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match &config.config_root {
        Some(root) => println!("{}", dim(&format!("# resolved from {}", root.display()))),
        None => println!("{}", dim("# no .xsearch.toml found, using defaults")),
    }
    print!("{}", Highlighter::new().highlight_toml(&toml));
    print_warnings(&config.validate());
    ExitCode::SUCCESS
}
