//! Search tree assembly from a parsed expression.
//!
//! The parser's binary tree encodes precedence implicitly: in `a,b;c` the AND node sits below
//! the OR node. The search tree needs it explicitly. Runs of the same logic operator are
//! collected into one group; a child rooted at the other operator, or written in parentheses,
//! becomes its own subgroup with a fresh id. Every group therefore joins its elements with a
//! single operator.

use crate::{
    ast::RsqlExpr,
    ids::IdGenerator,
    model::{LogicOperator, SearchElement, SearchGroup, SearchTerm, SearchValue},
};

/// Builds the root group for an expression (`None` gives an empty root).
pub fn assemble(expr: Option<&RsqlExpr>, ids: &dyn IdGenerator) -> SearchGroup {
    let mut root = SearchGroup::base();
    if let Some(expr) = expr {
        fill(&mut root, expr, ids);
    }
    root
}

/// Adds `expr` to `group`, flattening a top-level logic run into the group itself.
fn fill(group: &mut SearchGroup, expr: &RsqlExpr, ids: &dyn IdGenerator) {
    match expr {
        RsqlExpr::Logic { operator, .. } => collect_run(group, expr, *operator, ids),
        _ => group.elements.push(element(expr, ids)),
    }
}

/// Appends the operands of a run of `run_op` nodes, in order, with `run_op` between them.
///
/// The parser builds runs left-associatively, so the left spine is walked in a loop.
fn collect_run(
    group: &mut SearchGroup,
    expr: &RsqlExpr,
    run_op: LogicOperator,
    ids: &dyn IdGenerator,
) {
    let mut rights = Vec::new();
    let mut node = expr;
    while let RsqlExpr::Logic {
        operator,
        left,
        right,
    } = node
        && *operator == run_op
    {
        rights.push(&**right);
        node = &**left;
    }

    group.elements.push(element(node, ids));
    for right in rights.into_iter().rev() {
        group.group_logic_operators.push(run_op);
        collect_run(group, right, run_op, ids);
    }
}

/// Converts an operand into a group element.
fn element(expr: &RsqlExpr, ids: &dyn IdGenerator) -> SearchElement {
    match expr.unparenthesized() {
        RsqlExpr::Comparison {
            selector,
            operator,
            value,
        } => SearchTerm::new(
            ids.term_id(),
            selector.clone(),
            *operator,
            SearchValue::One(value.clone()),
        )
        .into(),
        inner => {
            let mut group = SearchGroup::new(ids.group_id());
            fill(&mut group, inner, ids);
            group.into()
        }
    }
}
