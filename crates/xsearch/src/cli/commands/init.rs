//! Implementation of `xsearch init`.

use std::{fs, process::ExitCode};

use xsearch_config::{CONFIG_FILENAME, global_config_path, global_template, local_template};
use xsearch_highlight::{Highlighter, subheader, success};

use crate::cli::{args::InitCommand, context::CommandContext};

/// Initializes a `.xsearch.toml` configuration file.
///
/// Run from the home directory, this writes the global file even without `--global`.
pub fn run(ctx: &CommandContext, cmd: &InitCommand) -> ExitCode {
    let cwd = &ctx.cwd;

    let is_home_dir = global_config_path()
        .and_then(|p| p.parent().map(|h| h == cwd))
        .unwrap_or(false);

    let use_global = cmd.global || is_home_dir;

    let config_path = if use_global {
        match global_config_path() {
            Some(path) => path,
            None => {
                eprintln!("error: could not determine home directory");
                return ExitCode::FAILURE;
            }
        }
    } else {
        cwd.join(CONFIG_FILENAME)
    };

    if config_path.exists() && !cmd.force {
        eprintln!(
            "error: configuration file already exists: {}",
            config_path.display()
        );
        eprintln!("use --force to overwrite");
        return ExitCode::FAILURE;
    }

    let template = if use_global {
        global_template()
    } else {
        local_template()
    };

    if let Err(e) = fs::write(&config_path, &template) {
        eprintln!("error: failed to write {}: {e}", config_path.display());
        return ExitCode::FAILURE;
    }

    println!("{}", success(&format!("Created {}", config_path.display())));
    println!();
    println!("{}", subheader("Configuration written:"));
    print!("{}", Highlighter::new().highlight_toml(&template));
    println!();
    println!("Uncomment the fields you need, then run 'xsearch fields' to check them.");

    ExitCode::SUCCESS
}
