//! Structural edits of the search tree.
//!
//! Every edit is addressed by a [`Location`] (group id + element index), takes the current tree
//! by reference and returns the edited copy. A location that no longer exists is not an error:
//! the tree comes back unchanged, since a stale UI event is harmless.
//!
//! Edits keep two invariants:
//! - a group never mixes AND with OR: [`add_element`] spins off a subgroup instead;
//! - a non-root group never holds fewer than two elements: [`delete_element`] and
//!   [`remove_empty_elements`] collapse or drop such groups.

use std::fmt;

use tracing::debug;

use crate::{
    ids::{IdGenerator, UuidIds},
    lexer::is_selector,
    model::{ComparisonOperator, LogicOperator, SearchElement, SearchGroup, SearchTerm, SearchValue},
};

/// Address of one element: the group holding it and its index there.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    /// Id of the group holding the element.
    pub group_id: String,
    /// Index into the group's elements.
    pub index: usize,
}

impl Location {
    /// Creates a location.
    pub fn new(group_id: impl Into<String>, index: usize) -> Self {
        Self {
            group_id: group_id.into(),
            index,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.index)
    }
}

/// A change to one property of a term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermUpdate {
    /// Replace `searchField`.
    Field(String),
    /// Replace `comparisonOperator`.
    Operator(ComparisonOperator),
    /// Replace `searchTerm`.
    Value(SearchValue),
}

impl TermUpdate {
    /// Applies the change to a term.
    fn apply(&self, term: &mut SearchTerm) {
        match self {
            Self::Field(field) => term.search_field.clone_from(field),
            Self::Operator(op) => term.comparison_operator = *op,
            Self::Value(value) => term.search_term.clone_from(value),
        }
    }
}

/// Creates the default terms and fresh group ids used by edits.
pub struct TermFactory {
    /// Field of newly created terms (the first configured field).
    default_field: String,
    /// Id source.
    ids: Box<dyn IdGenerator + Send + Sync>,
}

impl TermFactory {
    /// Creates a factory with random ids.
    pub fn new(default_field: impl Into<String>) -> Self {
        Self::with_ids(default_field, UuidIds)
    }

    /// Creates a factory with the given id source.
    pub fn with_ids(
        default_field: impl Into<String>,
        ids: impl IdGenerator + Send + Sync + 'static,
    ) -> Self {
        Self {
            default_field: default_field.into(),
            ids: Box::new(ids),
        }
    }

    /// Field of newly created terms.
    pub fn default_field(&self) -> &str {
        &self.default_field
    }

    /// The id source, for parsing with the same ids the edits use.
    pub fn ids(&self) -> &dyn IdGenerator {
        self.ids.as_ref()
    }

    /// A new term: default field, `==`, empty value.
    pub fn new_term(&self) -> SearchTerm {
        SearchTerm::new(
            self.ids.term_id(),
            self.default_field.clone(),
            ComparisonOperator::Equal,
            SearchValue::default(),
        )
    }

    /// A fresh group id.
    pub fn new_group_id(&self) -> String {
        self.ids.group_id()
    }
}

impl fmt::Debug for TermFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TermFactory")
            .field("default_field", &self.default_field)
            .finish_non_exhaustive()
    }
}

/// Changes one property of the term at `location`.
///
/// Unknown groups, out-of-range indices and locations holding a group leave the tree unchanged.
/// So does a field name that is not a single bare word (see [`is_selector`]), since the
/// serialized expression could not be read back.
pub fn update_element(tree: &SearchGroup, location: &Location, update: &TermUpdate) -> SearchGroup {
    let mut next = tree.clone();
    if let TermUpdate::Field(field) = update
        && !is_selector(field)
    {
        debug!(%location, field = %field, "rejecting field name that is not a bare word");
        return next;
    }
    let target = next
        .find_group_mut(&location.group_id)
        .and_then(|group| group.elements.get_mut(location.index));

    match target {
        Some(SearchElement::Term(term)) => update.apply(term),
        Some(SearchElement::Group(_)) => {
            debug!(%location, "update addressed a group, ignoring");
        }
        None => debug!(%location, "update location not found"),
    }

    next
}

/// Adds a default term after the element at `location`, joined by `operator`.
///
/// When the group already joins its elements with `operator` (or has no operators yet) the term
/// is inserted in place. Otherwise the addressed element is replaced by a new two-element
/// subgroup holding it and the new term, so the parent keeps its single operator.
///
/// Adding to an empty group inserts the term as its only element.
pub fn add_element(
    tree: &SearchGroup,
    location: &Location,
    operator: LogicOperator,
    factory: &TermFactory,
) -> SearchGroup {
    let mut next = tree.clone();
    let Some(group) = next.find_group_mut(&location.group_id) else {
        debug!(%location, "add location not found");
        return next;
    };

    if group.elements.is_empty() {
        group.elements.push(factory.new_term().into());
        return next;
    }

    let index = location.index;
    if index >= group.elements.len() {
        debug!(%location, "add index out of range");
        return next;
    }

    let new_term = SearchElement::from(factory.new_term());
    if group.group_logic_operators.iter().all(|op| *op == operator) {
        group.elements.insert(index + 1, new_term);
        group.group_logic_operators.insert(index, operator);
    } else {
        let existing = group.elements.remove(index);
        let subgroup =
            SearchGroup::joined(factory.new_group_id(), operator, vec![existing, new_term]);
        debug!(%location, group_id = %subgroup.group_id, "split into new subgroup");
        group.elements.insert(index, subgroup.into());
    }

    debug_assert!(next.is_well_formed());
    next
}

/// Removes the element at `location` together with the operator joining it to a neighbour.
///
/// A non-root group left with a single element is replaced in its parent by that element. A
/// non-root group left empty stays in place for [`remove_empty_elements`].
pub fn delete_element(tree: &SearchGroup, location: &Location) -> SearchGroup {
    let mut next = tree.clone();

    let removed = if next.group_id == location.group_id {
        remove_at(&mut next, location.index)
    } else {
        delete_in_children(&mut next, location)
    };
    if !removed {
        debug!(%location, "delete location not found");
    }

    debug_assert!(next.is_well_formed());
    next
}

/// Deletes the element at `location` and then drops any group left empty.
pub fn remove_element(tree: &SearchGroup, location: &Location) -> SearchGroup {
    remove_empty_elements(&delete_element(tree, location))
}

/// Drops every empty non-root group, at any depth, bottom-up.
///
/// The parent loses the operator that joined the dropped group, and a non-root group left with
/// one element collapses into it. Applying this twice gives the same tree as applying it once.
pub fn remove_empty_elements(tree: &SearchGroup) -> SearchGroup {
    let mut next = tree.clone();
    prune(&mut next);
    debug_assert!(next.is_well_formed());
    next
}

/// Searches the subgroups of `parent` for the addressed group and deletes from it.
///
/// Returns whether an element was removed.
fn delete_in_children(parent: &mut SearchGroup, location: &Location) -> bool {
    for slot in 0..parent.elements.len() {
        let sole_survivor = match &mut parent.elements[slot] {
            SearchElement::Group(child) if child.group_id == location.group_id => {
                if !remove_at(child, location.index) {
                    return false;
                }
                take_sole_element(child)
            }
            SearchElement::Group(child) => {
                if delete_in_children(child, location) {
                    return true;
                }
                continue;
            }
            SearchElement::Term(_) => continue,
        };

        if let Some(element) = sole_survivor {
            parent.elements[slot] = element;
        }
        return true;
    }
    false
}

/// Removes `elements[index]` and the operator joining it to its remaining neighbour.
///
/// The first element is joined to the rest by `ops[0]`; any other element by `ops[index - 1]`.
fn remove_at(group: &mut SearchGroup, index: usize) -> bool {
    if index >= group.elements.len() {
        return false;
    }
    group.elements.remove(index);

    let ops = &mut group.group_logic_operators;
    if !ops.is_empty() {
        let op_index = index.saturating_sub(1).min(ops.len() - 1);
        ops.remove(op_index);
    }
    true
}

/// Takes the element out of a group that holds exactly one.
fn take_sole_element(group: &mut SearchGroup) -> Option<SearchElement> {
    if group.elements.len() != 1 {
        return None;
    }
    group.group_logic_operators.clear();
    group.elements.pop()
}

/// What to do with a child group after pruning it.
enum Pruned {
    /// Leave it in place.
    Keep,
    /// Drop it with its joining operator.
    Drop,
    /// Replace it with its only element.
    Collapse(SearchElement),
}

/// Prunes the subgroups of `group`, bottom-up.
fn prune(group: &mut SearchGroup) {
    let mut index = 0;
    while index < group.elements.len() {
        let outcome = match &mut group.elements[index] {
            SearchElement::Group(child) => {
                prune(child);
                if child.elements.is_empty() {
                    Pruned::Drop
                } else {
                    take_sole_element(child).map_or(Pruned::Keep, Pruned::Collapse)
                }
            }
            SearchElement::Term(_) => Pruned::Keep,
        };

        match outcome {
            Pruned::Keep => index += 1,
            Pruned::Drop => {
                remove_at(group, index);
            }
            Pruned::Collapse(element) => {
                group.elements[index] = element;
                index += 1;
            }
        }
    }
}
