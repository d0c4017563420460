//! Group flattening.
//!
//! Turns a group into the interleaved sequence `[e0, op0, e1, op1, …, en]` that the
//! serializers walk left to right. Subgroups become nested sequences.

use crate::model::{LogicOperator, SearchElement, SearchGroup, SearchTerm};

/// One entry of a flattened group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlatToken<'a> {
    /// A term, borrowed from the tree.
    Term(&'a SearchTerm),
    /// A flattened subgroup.
    Nested(Vec<FlatToken<'a>>),
    /// The operator between the previous and next entries.
    Logic(LogicOperator),
}

/// Flattens a group into alternating elements and operators.
pub fn flatten(group: &SearchGroup) -> Vec<FlatToken<'_>> {
    let mut tokens = Vec::with_capacity(group.elements.len() * 2);
    for (index, element) in group.elements.iter().enumerate() {
        if index > 0
            && let Some(op) = group.group_logic_operators.get(index - 1)
        {
            tokens.push(FlatToken::Logic(*op));
        }
        tokens.push(match element {
            SearchElement::Term(term) => FlatToken::Term(term),
            SearchElement::Group(inner) => FlatToken::Nested(flatten(inner)),
        });
    }
    tokens
}
