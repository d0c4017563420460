//! Implementation of `xsearch fields`.

use std::{
    io::{self, IsTerminal},
    process::ExitCode,
};

use xsearch_config::Field;
use xsearch_highlight::{dim, header, subheader};

use crate::cli::{
    args::FieldsCommand,
    context::CommandContext,
    output::{print_json, print_warnings},
};

/// Lists the field registry.
pub fn run(ctx: &CommandContext, cmd: &FieldsCommand) -> ExitCode {
    let config = &ctx.config;
    if cmd.json {
        return print_json(&config.fields, io::stdout().is_terminal());
    }

    if config.fields.is_empty() {
        println!("{}", dim("No fields defined."));
        println!("Run 'xsearch init' to create a configuration file, then add [[field]] entries.");
        print_warnings(&config.validate());
        return ExitCode::SUCCESS;
    }

    println!("{}", header("Fields"));
    let default_field = config.default_field();
    for field in &config.fields {
        print_field(field, field.name == default_field);
    }
    print_warnings(&config.validate());
    ExitCode::SUCCESS
}

/// Prints one field with its label, type, comparators and values.
fn print_field(field: &Field, is_default: bool) {
    let marker = if is_default { " (default)" } else { "" };
    println!();
    println!("  {}{}", subheader(&field.name), dim(marker));
    println!("    {} {}", dim("label:"), field.label);
    println!("    {} {}", dim("type:"), field.kind.as_str());
    let operators: Vec<&str> = field.operators.iter().map(|op| op.as_rsql()).collect();
    println!("    {} {}", dim("operators:"), operators.join(" "));
    if !field.values.is_empty() {
        let values: Vec<String> = field
            .values
            .iter()
            .map(|(value, label)| format!("{value} = {label}"))
            .collect();
        println!("    {} {}", dim("values:"), values.join(", "));
    }
}
