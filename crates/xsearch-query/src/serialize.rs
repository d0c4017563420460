//! RSQL and preview rendering.
//!
//! Both renderers walk the flattened group. The RSQL form always single-quotes non-empty
//! values and writes empty values as `""`; logic operators are written without whitespace.

use crate::{
    flatten::{FlatToken, flatten},
    labels::Labels,
    model::{SearchGroup, SearchList, SearchTerm},
};

/// Serializes the root of a search list to RSQL.
///
/// Returns the empty string for an empty list or an empty root.
pub fn to_rsql(list: &SearchList) -> String {
    list.root().map(group_to_rsql).unwrap_or_default()
}

/// Serializes a group to RSQL.
pub fn group_to_rsql(group: &SearchGroup) -> String {
    let mut out = String::new();
    write_rsql(&flatten(group), &mut out);
    out
}

/// Appends the RSQL form of a flattened sequence.
fn write_rsql(tokens: &[FlatToken<'_>], out: &mut String) {
    for token in tokens {
        match token {
            FlatToken::Term(term) => write_term(term, out),
            FlatToken::Nested(inner) => {
                out.push('(');
                write_rsql(inner, out);
                out.push(')');
            }
            FlatToken::Logic(op) => out.push_str(op.as_rsql()),
        }
    }
}

/// Appends `field` `op` `value`.
fn write_term(term: &SearchTerm, out: &mut String) {
    out.push_str(&term.search_field);
    out.push_str(term.comparison_operator.as_rsql());
    write_value(&term.search_term.joined(), out);
}

/// Appends a quoted value, escaping quotes and backslashes.
fn write_value(value: &str, out: &mut String) {
    if value.is_empty() {
        out.push_str("\"\"");
        return;
    }
    out.push('\'');
    for ch in value.chars() {
        if ch == '\'' || ch == '\\' {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('\'');
}

/// Renders a group for on-screen display.
///
/// Terms appear as `"field" comparator "value"`, logic operators as ` AND ` / ` OR ` (or their
/// translations), subgroups in parentheses.
pub fn to_readable(group: &SearchGroup, labels: &impl Labels) -> String {
    let mut out = String::new();
    write_readable(&flatten(group), labels, &mut out);
    out
}

/// Appends the readable form of a flattened sequence.
fn write_readable(tokens: &[FlatToken<'_>], labels: &impl Labels, out: &mut String) {
    for token in tokens {
        match token {
            FlatToken::Term(term) => {
                let field = &term.search_field;
                let value = if labels.is_text_field(field) {
                    term.search_term.joined().into_owned()
                } else {
                    term.search_term
                        .parts()
                        .into_iter()
                        .map(|part| labels.value(field, part))
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                out.push_str(&format!(
                    "\"{}\" {} \"{}\"",
                    labels.field(field),
                    labels.comparator(term.comparison_operator),
                    value
                ));
            }
            FlatToken::Nested(inner) => {
                out.push('(');
                write_readable(inner, labels, out);
                out.push(')');
            }
            FlatToken::Logic(op) => {
                out.push(' ');
                out.push_str(&labels.logic(*op));
                out.push(' ');
            }
        }
    }
}
