//! Property tests for the search tree edits.
//!
//! Random edit scripts are replayed against a fresh state; after every step the tree must stay
//! well formed, survive an RSQL round trip and be a fixed point of the empty-group cleanup.
//!
//! Run with: `cargo test -p xsearch-query --test properties`

#![allow(clippy::tests_outside_test_module)]

use proptest::prelude::*;

use xsearch_query::{
    Action, ComparisonOperator, Location, LogicOperator, SearchElement, SearchGroup,
    SearchState, SearchValue, SequentialIds, TermFactory, TermUpdate, group_to_rsql, parse_rsql,
    parse_rsql_with, remove_empty_elements,
};

// =============================================================================
// Strategies
// =============================================================================

/// One abstract edit; `pick` selects the addressed element among those present.
#[derive(Debug, Clone)]
enum Edit {
    /// Add after the picked element.
    Add { pick: usize, operator: LogicOperator },
    /// Remove the picked element.
    Remove { pick: usize },
    /// Update the picked term.
    Update { pick: usize, update: TermUpdate },
}

fn logic_strategy() -> impl Strategy<Value = LogicOperator> {
    prop_oneof![Just(LogicOperator::And), Just(LogicOperator::Or)]
}

fn update_strategy() -> impl Strategy<Value = TermUpdate> {
    prop_oneof![
        prop::sample::select(vec!["settlement-search", "binding-search", "year", "a_b.c"])
            .prop_map(|field| TermUpdate::Field(field.to_string())),
        prop::sample::select(ComparisonOperator::ALL.to_vec()).prop_map(TermUpdate::Operator),
        // values with quotes, backslashes and RSQL delimiters
        "[a-zA-Z0-9 äöü',;()=\\\\\"]{0,10}".prop_map(|value| TermUpdate::Value(value.into())),
        // list values from multi-select fields
        prop::collection::vec("[a-z',]{0,5}", 0..4)
            .prop_map(|values| TermUpdate::Value(SearchValue::Many(values))),
    ]
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    prop_oneof![
        3 => (any::<usize>(), logic_strategy())
            .prop_map(|(pick, operator)| Edit::Add { pick, operator }),
        2 => any::<usize>().prop_map(|pick| Edit::Remove { pick }),
        3 => (any::<usize>(), update_strategy())
            .prop_map(|(pick, update)| Edit::Update { pick, update }),
    ]
}

// =============================================================================
// Helpers
// =============================================================================

/// Every element location in the tree, with whether it holds a term.
fn locations(group: &SearchGroup, out: &mut Vec<(Location, bool)>) {
    for (index, element) in group.elements.iter().enumerate() {
        let is_term = matches!(element, SearchElement::Term(_));
        out.push((Location::new(group.group_id.clone(), index), is_term));
        if let SearchElement::Group(child) = element {
            locations(child, out);
        }
    }
}

/// Turns an abstract edit into an action on the current tree, if it addresses anything.
fn to_action(tree: &SearchGroup, edit: Edit) -> Option<Action> {
    let mut all = Vec::new();
    locations(tree, &mut all);

    match edit {
        Edit::Add { pick, operator } => {
            let location = if all.is_empty() {
                Location::new(tree.group_id.clone(), 0)
            } else {
                all[pick % all.len()].0.clone()
            };
            Some(Action::AddElement { location, operator })
        }
        Edit::Remove { pick } => {
            let (location, _) = all.get(pick % all.len().max(1))?.clone();
            Some(Action::RemoveElement { location })
        }
        Edit::Update { pick, update } => {
            let terms: Vec<_> = all.into_iter().filter(|(_, is_term)| *is_term).collect();
            let (location, _) = terms.get(pick % terms.len().max(1))?.clone();
            Some(Action::UpdateElement { location, update })
        }
    }
}

/// Checks that no non-root group holds fewer than two elements or mixes operators.
fn groups_are_compact(group: &SearchGroup, is_root: bool) -> bool {
    (is_root || group.elements.len() >= 2)
        && group.is_homogeneous()
        && group
            .elements
            .iter()
            .filter_map(SearchElement::as_group)
            .all(|child| groups_are_compact(child, false))
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    /// Trees built by edits reparse to the same shape and stay compact.
    #[test]
    fn edited_trees_round_trip(edits in prop::collection::vec(edit_strategy(), 0..40)) {
        let mut state = SearchState::new(TermFactory::with_ids("all", SequentialIds::new()));

        for edit in edits {
            if let Some(action) = to_action(state.tree(), edit) {
                state.dispatch(action);
            }

            let tree = state.tree();
            prop_assert!(tree.is_well_formed());
            prop_assert!(tree.is_root());
            prop_assert!(groups_are_compact(tree, true), "{tree}");

            let rsql = state.rsql();
            let reparsed = parse_rsql_with(&rsql, &SequentialIds::new())
                .map_err(|err| TestCaseError::fail(format!("{rsql}: {err}")))?
                .into_root();
            prop_assert!(reparsed.same_shape(tree), "{rsql}\n{tree}\n{reparsed}");
            prop_assert_eq!(group_to_rsql(&reparsed), rsql);
        }
    }

    /// Cleanup is a fixed point on edited trees.
    #[test]
    fn cleanup_is_idempotent(edits in prop::collection::vec(edit_strategy(), 0..40)) {
        let mut state = SearchState::new(TermFactory::with_ids("all", SequentialIds::new()));
        for edit in edits {
            if let Some(action) = to_action(state.tree(), edit) {
                state.dispatch(action);
            }
        }

        let once = remove_empty_elements(state.tree());
        let twice = remove_empty_elements(&once);
        prop_assert_eq!(&once, state.tree());
        prop_assert_eq!(once, twice);
    }

    /// The parser never panics on arbitrary input.
    #[test]
    fn parser_never_panics(input in "[a-z=!<>;,()'\" \\\\~]{0,40}") {
        let _result = parse_rsql(&input);
    }

    /// Whatever parses, serializes to something that parses to the same shape.
    #[test]
    fn parsed_input_reserializes(input in "[a-c]{1,2}(==|!=|<|>=)'[a-z;,]{0,3}'([;,][a-c](==|<=)[a-z0-9]{1,3}){0,6}") {
        let first = parse_rsql_with(&input, &SequentialIds::new())
            .map_err(|err| TestCaseError::fail(format!("{input}: {err}")))?
            .into_root();
        let rsql = group_to_rsql(&first);
        let second = parse_rsql_with(&rsql, &SequentialIds::new())
            .map_err(|err| TestCaseError::fail(format!("{rsql}: {err}")))?
            .into_root();
        prop_assert!(second.same_shape(&first), "{input} -> {rsql}");
    }
}
