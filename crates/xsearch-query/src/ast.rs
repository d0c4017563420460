//! RSQL abstract syntax tree.
//!
//! The parser produces a binary tree: comparisons at the leaves, logic operators at the inner
//! nodes, and explicit parentheses kept as `Group` nodes so the assembler can tell written
//! grouping from precedence.

use std::fmt;

use crate::model::{ComparisonOperator, LogicOperator};

/// A parsed RSQL expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RsqlExpr {
    /// `selector operator value`.
    Comparison {
        /// Field name.
        selector: String,
        /// Comparison operator.
        operator: ComparisonOperator,
        /// Value with quotes stripped.
        value: String,
    },

    /// Two expressions joined by AND or OR.
    Logic {
        /// The joining operator.
        operator: LogicOperator,
        /// Left operand.
        left: Box<Self>,
        /// Right operand.
        right: Box<Self>,
    },

    /// A parenthesized expression.
    Group(Box<Self>),
}

impl RsqlExpr {
    /// Creates a comparison leaf.
    pub fn comparison(
        selector: impl Into<String>,
        operator: ComparisonOperator,
        value: impl Into<String>,
    ) -> Self {
        Self::Comparison {
            selector: selector.into(),
            operator,
            value: value.into(),
        }
    }

    /// Creates a logic node.
    pub fn logic(operator: LogicOperator, left: Self, right: Self) -> Self {
        Self::Logic {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Wraps an expression in parentheses.
    pub fn group(inner: Self) -> Self {
        Self::Group(Box::new(inner))
    }

    /// Returns the expression with any enclosing parentheses removed.
    pub fn unparenthesized(&self) -> &Self {
        match self {
            Self::Group(inner) => inner.unparenthesized(),
            other => other,
        }
    }

    /// Formats the expression as a tree structure with the given indentation level.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let prefix = "  ".repeat(indent);
        match self {
            Self::Comparison {
                selector,
                operator,
                value,
            } => writeln!(f, "{prefix}Comparison({selector} {operator} {value:?})"),
            Self::Logic {
                operator,
                left,
                right,
            } => {
                writeln!(f, "{prefix}{}", operator.keyword())?;
                left.fmt_tree(f, indent + 1)?;
                right.fmt_tree(f, indent + 1)
            }
            Self::Group(inner) => {
                writeln!(f, "{prefix}Group")?;
                inner.fmt_tree(f, indent + 1)
            }
        }
    }
}

impl fmt::Display for RsqlExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0)
    }
}
