//! Clap argument definitions for the `xsearch` CLI.

use std::{env, process::exit};

use clap::{ArgGroup, Args, CommandFactory, Parser, Subcommand, error::ErrorKind};

use crate::cli::commands::edit::EditOp;

/// Parse an edit operation such as `add:base:0:and`.
fn parse_edit_op(s: &str) -> Result<EditOp, String> {
    s.parse()
}

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "xsearch")]
#[command(about = "Build, inspect and edit grouped RSQL search expressions")]
pub struct Cli {
    /// Use random UUIDs for term and group ids instead of t1, g1, ...
    #[arg(long, global = true)]
    pub random_ids: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments for `xsearch parse`.
#[derive(Args, Debug, Clone)]
pub struct ParseCommand {
    /// RSQL expression
    pub rsql: String,

    /// Output the search list as JSON
    #[arg(long, conflicts_with = "ast")]
    pub json: bool,

    /// Show the parsed expression tree before grouping
    #[arg(long)]
    pub ast: bool,
}

/// Arguments for `xsearch format`.
#[derive(Args, Debug, Clone)]
pub struct FormatCommand {
    /// RSQL expression
    pub rsql: String,

    /// Colour the output by token
    #[arg(long)]
    pub color: bool,
}

/// Arguments for `xsearch edit`.
#[derive(Args, Debug, Clone)]
#[command(group(ArgGroup::new("format").args(["tree", "json", "preview"])))]
pub struct EditCommand {
    /// Starting RSQL expression ("" starts from a single empty term)
    pub rsql: String,

    /// Edits applied in order: add:GROUP:INDEX:and|or, remove:GROUP:INDEX,
    /// set:GROUP:INDEX:field=NAME|op=OP|value=TEXT
    #[arg(required = true, value_parser = parse_edit_op)]
    pub ops: Vec<EditOp>,

    /// Print the resulting tree with ids
    #[arg(long)]
    pub tree: bool,

    /// Print the resulting search list as JSON
    #[arg(long)]
    pub json: bool,

    /// Print the readable preview
    #[arg(long)]
    pub preview: bool,
}

/// Arguments for `xsearch url`.
#[derive(Args, Debug, Clone)]
pub struct UrlCommand {
    /// RSQL expression
    pub rsql: String,

    /// Search page to link to [default: settings.base_url]
    #[arg(long)]
    pub base: Option<String>,
}

/// Arguments for `xsearch resolve`.
#[derive(Args, Debug, Clone)]
pub struct ResolveCommand {
    /// Search link carrying a `q` parameter
    pub url: String,

    /// Output the decoded search list as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `xsearch fields`.
#[derive(Args, Debug, Clone)]
pub struct FieldsCommand {
    /// Output the field registry as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `xsearch init`.
#[derive(Args, Debug, Clone)]
pub struct InitCommand {
    /// Create global ~/.xsearch.toml instead
    #[arg(long)]
    pub global: bool,

    /// Overwrite existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Supported `xsearch` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Parse an expression and show its group tree
    Parse(ParseCommand),

    /// Rewrite an expression in canonical form
    Format(FormatCommand),

    /// Show an expression the way the search form displays it
    Preview {
        /// RSQL expression
        rsql: String,
    },

    /// Apply add, remove and set operations to an expression
    Edit(EditCommand),

    /// Build the search link for an expression
    Url(UrlCommand),

    /// Decode the expression carried by a search link
    Resolve(ResolveCommand),

    /// List the configured search fields
    Fields(FieldsCommand),

    /// Initialize xsearch configuration in current directory
    Init(InitCommand),

    /// Show effective configuration
    Config,
}

/// Parses CLI arguments, printing the short command overview for top-level `--help`.
pub fn parse_cli() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            if e.kind() == ErrorKind::DisplayHelp && env::args().len() <= 2 {
                print_overview_help();
                exit(0);
            }
            e.exit();
        }
    }
}

/// Prints the command list with one line per subcommand.
fn print_overview_help() {
    let cmd = Cli::command();
    let about = cmd.get_about().map(|s| s.to_string()).unwrap_or_default();

    println!("{about}");
    println!();
    println!("Usage: xsearch [--random-ids] <COMMAND>");
    println!();
    println!("Commands:");
    for sub in cmd.get_subcommands() {
        let name = sub.get_name();
        if name == "help" {
            continue;
        }
        let about = sub.get_about().map(|s| s.to_string()).unwrap_or_default();
        println!("  {name:10} {about}");
    }
    println!();
    println!("Options:");
    println!("      --random-ids  Use random UUIDs for term and group ids");
    println!("  -h, --help        Print help");
    println!();
    println!("Set XSEARCH_LOG=debug to trace parsing and edits on stderr.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn edit_ops_parse_in_order() {
        let cli = Cli::try_parse_from([
            "xsearch",
            "edit",
            "a=='1'",
            "add:base:0:or",
            "set:base:1:value=x",
            "--tree",
        ])
        .unwrap();
        let Commands::Edit(cmd) = cli.command else {
            panic!("expected edit");
        };
        assert_eq!(cmd.ops.len(), 2);
        assert!(cmd.tree);
    }

    #[test]
    fn edit_output_flags_conflict() {
        let result = Cli::try_parse_from([
            "xsearch",
            "edit",
            "",
            "remove:base:0",
            "--json",
            "--preview",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn bad_edit_op_is_rejected() {
        let result = Cli::try_parse_from(["xsearch", "edit", "", "drop:base:0"]);
        assert!(result.is_err());
    }

    #[test]
    fn random_ids_is_global() {
        let cli = Cli::try_parse_from(["xsearch", "parse", "a=='1'", "--random-ids"]).unwrap();
        assert!(cli.random_ids);
    }
}
