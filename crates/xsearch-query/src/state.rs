//! The search state container.
//!
//! [`SearchState`] owns the current tree and replaces it on every dispatched [`Action`]. The
//! mutators themselves are pure; this is the single writer.

use std::sync::LazyLock;

use tracing::debug;
use url::Url;

use crate::{
    labels::Labels,
    link,
    model::{LogicOperator, SearchElement, SearchGroup, SearchList},
    mutate::{
        Location, TermFactory, TermUpdate, add_element, remove_element, update_element,
    },
    serialize::{to_readable, to_rsql},
};

/// An edit request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Add a default term after the addressed element.
    AddElement {
        /// Element to add after.
        location: Location,
        /// Operator joining the new term.
        operator: LogicOperator,
    },
    /// Remove the addressed element, then drop any group left empty.
    RemoveElement {
        /// Element to remove.
        location: Location,
    },
    /// Change one property of the addressed term.
    UpdateElement {
        /// Term to change.
        location: Location,
        /// The change.
        update: TermUpdate,
    },
    /// Replace the whole tree, e.g. with one decoded from a deep link.
    SetExtSearchList(SearchList),
}

/// Holds the current search tree.
#[derive(Debug)]
pub struct SearchState {
    /// The current tree.
    list: SearchList,
    /// Source of new terms and group ids.
    factory: TermFactory,
    /// Whether the tree came from, or has been edited in, the extended search.
    is_extended: bool,
}

impl SearchState {
    /// Creates the starting state: a root holding one default term.
    pub fn new(factory: TermFactory) -> Self {
        let mut root = SearchGroup::base();
        root.elements.push(SearchElement::from(factory.new_term()));
        Self {
            list: SearchList::new(root),
            factory,
            is_extended: false,
        }
    }

    /// Creates a state with an empty root.
    pub fn empty(factory: TermFactory) -> Self {
        Self {
            list: SearchList::default(),
            factory,
            is_extended: false,
        }
    }

    /// Applies an action, replacing the current tree.
    pub fn dispatch(&mut self, action: Action) {
        debug!(?action, "dispatch");
        let root = self.tree();
        let next = match action {
            Action::AddElement { location, operator } => {
                add_element(root, &location, operator, &self.factory)
            }
            Action::RemoveElement { location } => remove_element(root, &location),
            Action::UpdateElement { location, update } => {
                update_element(root, &location, &update)
            }
            Action::SetExtSearchList(list) => {
                self.list = if list.search_list.is_empty() {
                    SearchList::default()
                } else {
                    list
                };
                self.is_extended = true;
                return;
            }
        };
        self.list = SearchList::new(next);
        self.is_extended = true;
    }

    /// The current root group.
    pub fn tree(&self) -> &SearchGroup {
        self.list.root().unwrap_or(&*EMPTY_ROOT)
    }

    /// The current tree in its container shape.
    pub fn list(&self) -> &SearchList {
        &self.list
    }

    /// The term factory used for edits.
    pub fn factory(&self) -> &TermFactory {
        &self.factory
    }

    /// Whether any action has been applied.
    pub fn is_extended(&self) -> bool {
        self.is_extended
    }

    /// The RSQL form of the current tree.
    pub fn rsql(&self) -> String {
        to_rsql(&self.list)
    }

    /// The human-readable form of the current tree.
    pub fn preview(&self, labels: &impl Labels) -> String {
        to_readable(self.tree(), labels)
    }

    /// The search URL for the current tree.
    pub fn search_url(&self, base: &Url) -> Url {
        link::search_url(base, &self.list)
    }
}

/// Root returned by [`SearchState::tree`] when the list holds no group.
static EMPTY_ROOT: LazyLock<SearchGroup> = LazyLock::new(SearchGroup::base);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ids::SequentialIds,
        labels::RawLabels,
        model::{BASE_GROUP_ID, ComparisonOperator},
        parser::parse_rsql_with,
    };

    fn state() -> SearchState {
        SearchState::new(TermFactory::with_ids("settlement-search", SequentialIds::new()))
    }

    fn at(group_id: &str, index: usize) -> Location {
        Location::new(group_id, index)
    }

    #[test]
    fn starts_with_one_default_term() {
        let state = state();
        assert_eq!(state.tree().elements.len(), 1);
        assert_eq!(state.rsql(), "settlement-search==\"\"");
        assert!(!state.is_extended());
    }

    #[test]
    fn empty_state_serializes_to_nothing() {
        let state = SearchState::empty(TermFactory::new("all"));
        assert!(state.tree().is_empty());
        assert_eq!(state.rsql(), "");
        assert_eq!(state.preview(&RawLabels), "");
    }

    #[test]
    fn dispatch_sequence() {
        let mut state = state();
        state.dispatch(Action::UpdateElement {
            location: at(BASE_GROUP_ID, 0),
            update: TermUpdate::Value("Leipzig".into()),
        });
        state.dispatch(Action::AddElement {
            location: at(BASE_GROUP_ID, 0),
            operator: LogicOperator::And,
        });
        state.dispatch(Action::UpdateElement {
            location: at(BASE_GROUP_ID, 1),
            update: TermUpdate::Operator(ComparisonOperator::NotEqual),
        });
        state.dispatch(Action::UpdateElement {
            location: at(BASE_GROUP_ID, 1),
            update: TermUpdate::Value("Muc".into()),
        });

        assert!(state.is_extended());
        assert_eq!(
            state.rsql(),
            "settlement-search=='Leipzig';settlement-search!='Muc'"
        );
        assert_eq!(
            state.preview(&RawLabels),
            "\"settlement-search\" == \"Leipzig\" AND \"settlement-search\" != \"Muc\""
        );

        state.dispatch(Action::RemoveElement {
            location: at(BASE_GROUP_ID, 0),
        });
        assert_eq!(state.rsql(), "settlement-search!='Muc'");
    }

    #[test]
    fn set_ext_search_list_replaces_tree() {
        let mut state = state();
        let list = parse_rsql_with("a=='1',b=='2'", state.factory().ids()).unwrap();
        state.dispatch(Action::SetExtSearchList(list.clone()));
        assert_eq!(state.list(), &list);

        state.dispatch(Action::SetExtSearchList(SearchList {
            search_list: Vec::new(),
        }));
        assert!(state.tree().is_root());
        assert!(state.tree().is_empty());
    }

    #[test]
    fn list_without_groups_still_has_an_editable_base_root() {
        let mut state = SearchState {
            list: SearchList {
                search_list: Vec::new(),
            },
            factory: TermFactory::with_ids("settlement-search", SequentialIds::new()),
            is_extended: false,
        };
        assert!(state.tree().is_root());
        assert_eq!(state.tree().group_id, BASE_GROUP_ID);

        state.dispatch(Action::AddElement {
            location: at(BASE_GROUP_ID, 0),
            operator: LogicOperator::And,
        });
        assert_eq!(state.tree().group_id, BASE_GROUP_ID);
        assert_eq!(state.tree().elements.len(), 1);
    }

    #[test]
    fn stale_location_keeps_tree() {
        let mut state = state();
        let before = state.tree().clone();
        state.dispatch(Action::RemoveElement {
            location: at("gone", 0),
        });
        assert_eq!(state.tree(), &before);
    }

    #[test]
    fn search_url_carries_rsql() {
        let state = state();
        let base = Url::parse("https://example.org/search").unwrap();
        let url = state.search_url(&base);
        assert_eq!(
            link::extended_query(&url).as_deref(),
            Some("settlement-search==\"\"")
        );
    }
}
