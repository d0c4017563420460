//! Implementation of `xsearch edit`.

use std::{
    io::{self, IsTerminal},
    process::ExitCode,
    str::FromStr,
};

use xsearch_query::{
    Action, ComparisonOperator, Location, LogicOperator, SearchElement, SearchState, TermUpdate,
    is_selector,
};

use crate::cli::{
    args::EditCommand,
    context::CommandContext,
    output::print_json,
};

/// One edit given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOp {
    /// `add:GROUP:INDEX:and|or`
    Add {
        /// Element the new term follows.
        location: Location,
        /// Operator joining the new term.
        operator: LogicOperator,
    },
    /// `remove:GROUP:INDEX`
    Remove {
        /// Element to remove.
        location: Location,
    },
    /// `set:GROUP:INDEX:field=NAME`, `op=OP` or `value=TEXT`
    Set {
        /// Term to change.
        location: Location,
        /// The change.
        update: TermUpdate,
    },
}

impl EditOp {
    /// The state action performing this edit.
    fn into_action(self) -> Action {
        match self {
            Self::Add { location, operator } => Action::AddElement { location, operator },
            Self::Remove { location } => Action::RemoveElement { location },
            Self::Set { location, update } => Action::UpdateElement { location, update },
        }
    }
}

impl FromStr for EditOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(4, ':');
        let kind = parts.next().unwrap_or_default();
        let (Some(group), Some(index)) = (parts.next(), parts.next()) else {
            return Err(format!("expected KIND:GROUP:INDEX, got '{s}'"));
        };
        if group.is_empty() {
            return Err(format!("missing group id in '{s}'"));
        }
        let index = index
            .parse::<usize>()
            .map_err(|_| format!("invalid index '{index}' in '{s}'"))?;
        let location = Location::new(group, index);

        match (kind, parts.next()) {
            ("add", Some(operator)) => Ok(Self::Add {
                location,
                operator: operator.parse()?,
            }),
            ("add", None) => Err("add needs an operator: add:GROUP:INDEX:and|or".to_string()),
            ("remove", None) => Ok(Self::Remove { location }),
            ("remove", Some(_)) => Err("remove takes no argument: remove:GROUP:INDEX".to_string()),
            ("set", Some(assignment)) => Ok(Self::Set {
                location,
                update: parse_update(assignment)?,
            }),
            ("set", None) => {
                Err("set needs an assignment: set:GROUP:INDEX:field=|op=|value=".to_string())
            }
            _ => Err(format!("unknown edit '{kind}' (expected add, remove or set)")),
        }
    }
}

/// Parses `field=NAME`, `op=OP` or `value=TEXT`.
fn parse_update(assignment: &str) -> Result<TermUpdate, String> {
    let Some((key, value)) = assignment.split_once('=') else {
        return Err(format!("expected KEY=VALUE, got '{assignment}'"));
    };
    match key {
        "field" if value.is_empty() => Err("field name cannot be empty".to_string()),
        "field" if !is_selector(value) => Err(format!(
            "field name '{value}' must be one word without quotes, parentheses, ';', ',' or comparison characters"
        )),
        "field" => Ok(TermUpdate::Field(value.to_string())),
        "op" | "operator" => Ok(TermUpdate::Operator(ComparisonOperator::from_str(value)?)),
        "value" => Ok(TermUpdate::Value(value.into())),
        _ => Err(format!("unknown property '{key}' (expected field, op or value)")),
    }
}

/// Applies the edits in order and prints the resulting expression.
pub fn run(ctx: &CommandContext, cmd: &EditCommand) -> ExitCode {
    let factory = ctx.term_factory();
    let mut state = if cmd.rsql.trim().is_empty() {
        SearchState::new(factory)
    } else {
        let list = match ctx.parse_or_failure(&cmd.rsql, factory.ids()) {
            Ok(list) => list,
            Err(code) => return code,
        };
        let mut state = SearchState::empty(factory);
        state.dispatch(Action::SetExtSearchList(list));
        state
    };

    for op in &cmd.ops {
        check_against_registry(ctx, &state, op);
        state.dispatch(op.clone().into_action());
    }

    if cmd.json {
        return print_json(state.list(), io::stdout().is_terminal());
    }
    if cmd.tree {
        print!("{}", state.tree());
    } else if cmd.preview {
        println!("{}", state.preview(&ctx.config));
    } else {
        println!("{}", state.rsql());
    }
    ExitCode::SUCCESS
}

/// Warns about `set` edits naming unknown fields or comparators the field does not allow.
fn check_against_registry(ctx: &CommandContext, state: &SearchState, op: &EditOp) {
    let EditOp::Set { location, update } = op else {
        return;
    };
    if ctx.config.fields.is_empty() {
        return;
    }
    match update {
        TermUpdate::Field(name) if ctx.config.find_field(name).is_none() => {
            eprintln!("warning: field '{name}' is not in the field registry");
        }
        TermUpdate::Operator(operator) => {
            let term = state
                .tree()
                .find_group(&location.group_id)
                .and_then(|group| group.elements.get(location.index))
                .and_then(SearchElement::as_term);
            if let Some(term) = term
                && let Some(field) = ctx.config.find_field(&term.search_field)
                && !field.allows(*operator)
            {
                eprintln!(
                    "warning: '{operator}' is not allowed for field '{}'",
                    field.name
                );
            }
        }
        _ => {}
    }
}
