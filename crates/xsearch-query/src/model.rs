//! Search expression tree.
//!
//! A search is a tree of groups. Each group holds an ordered list of elements (terms or nested
//! groups) and the logic operators that sit between adjacent elements, so a group with `n`
//! elements carries `n - 1` operators. The tree is addressed by group id, never by pointer.

use std::{borrow::Cow, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Reserved id of the root group.
pub const BASE_GROUP_ID: &str = "base";

/// Logic operator joining two adjacent elements of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicOperator {
    /// Conjunction, written `;`.
    #[serde(rename = ";")]
    And,
    /// Disjunction, written `,`.
    #[serde(rename = ",")]
    Or,
}

impl LogicOperator {
    /// The RSQL token for this operator.
    pub fn as_rsql(self) -> &'static str {
        match self {
            Self::And => ";",
            Self::Or => ",",
        }
    }

    /// The English keyword for this operator (`AND` / `OR`).
    pub fn keyword(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

impl fmt::Display for LogicOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_rsql())
    }
}

impl FromStr for LogicOperator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ";" => Ok(Self::And),
            "," => Ok(Self::Or),
            _ if s.eq_ignore_ascii_case("and") => Ok(Self::And),
            _ if s.eq_ignore_ascii_case("or") => Ok(Self::Or),
            _ => Err(format!("unknown logic operator '{s}' (expected and, or, ';' or ',')")),
        }
    }
}

/// Comparison between a field and a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOperator {
    /// `==`
    #[serde(rename = "==")]
    Equal,
    /// `!=`
    #[serde(rename = "!=")]
    NotEqual,
    /// `<=`
    #[serde(rename = "<=")]
    LessOrEqual,
    /// `<`
    #[serde(rename = "<")]
    Less,
    /// `>=`
    #[serde(rename = ">=")]
    GreaterOrEqual,
    /// `>`
    #[serde(rename = ">")]
    Greater,
}

impl ComparisonOperator {
    /// Every comparison operator, in display order.
    pub const ALL: [Self; 6] = [
        Self::Equal,
        Self::NotEqual,
        Self::LessOrEqual,
        Self::Less,
        Self::GreaterOrEqual,
        Self::Greater,
    ];

    /// The RSQL token for this operator.
    pub fn as_rsql(self) -> &'static str {
        match self {
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::LessOrEqual => "<=",
            Self::Less => "<",
            Self::GreaterOrEqual => ">=",
            Self::Greater => ">",
        }
    }

    /// Looks up a FIQL-style alias such as `=lt=` (the name between the `=` signs).
    pub fn from_alias(name: &str) -> Option<Self> {
        match name {
            "lt" => Some(Self::Less),
            "le" => Some(Self::LessOrEqual),
            "gt" => Some(Self::Greater),
            "ge" => Some(Self::GreaterOrEqual),
            _ => None,
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_rsql())
    }
}

impl FromStr for ComparisonOperator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(op) = Self::ALL.into_iter().find(|op| op.as_rsql() == s) {
            return Ok(op);
        }
        s.strip_prefix('=')
            .and_then(|rest| rest.strip_suffix('='))
            .and_then(Self::from_alias)
            .ok_or_else(|| format!("unknown comparison operator '{s}'"))
    }
}

/// The value side of a term: a single string or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SearchValue {
    /// A single value.
    One(String),
    /// Several values (serialized joined by `,`, and read back as one joined value).
    Many(Vec<String>),
}

impl SearchValue {
    /// Returns true when the value renders as the empty string.
    pub fn is_empty(&self) -> bool {
        self.joined().is_empty()
    }

    /// The individual parts of the value.
    pub fn parts(&self) -> Vec<&str> {
        match self {
            Self::One(value) => vec![value.as_str()],
            Self::Many(values) => values.iter().map(String::as_str).collect(),
        }
    }

    /// The value as one string, list parts joined by `,`.
    pub fn joined(&self) -> Cow<'_, str> {
        match self {
            Self::One(value) => Cow::Borrowed(value),
            Self::Many(values) => Cow::Owned(values.join(",")),
        }
    }
}

impl Default for SearchValue {
    fn default() -> Self {
        Self::One(String::new())
    }
}

impl From<&str> for SearchValue {
    fn from(value: &str) -> Self {
        Self::One(value.to_string())
    }
}

impl From<String> for SearchValue {
    fn from(value: String) -> Self {
        Self::One(value)
    }
}

impl From<Vec<String>> for SearchValue {
    fn from(values: Vec<String>) -> Self {
        Self::Many(values)
    }
}

/// A leaf comparison: `searchField comparisonOperator searchTerm`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchTerm {
    /// Unique id, assigned at creation and never reused.
    pub id: String,
    /// Field name, resolved against the external field registry.
    pub search_field: String,
    /// How the field is compared to the value.
    pub comparison_operator: ComparisonOperator,
    /// The value compared against.
    pub search_term: SearchValue,
}

impl SearchTerm {
    /// Creates a term.
    pub fn new(
        id: impl Into<String>,
        search_field: impl Into<String>,
        comparison_operator: ComparisonOperator,
        search_term: impl Into<SearchValue>,
    ) -> Self {
        Self {
            id: id.into(),
            search_field: search_field.into(),
            comparison_operator,
            search_term: search_term.into(),
        }
    }

    /// Compares field, operator and value, ignoring the id.
    ///
    /// Values compare by their joined text: a list value serializes as one quoted string and
    /// parses back as [`SearchValue::One`].
    pub fn same_shape(&self, other: &Self) -> bool {
        self.search_field == other.search_field
            && self.comparison_operator == other.comparison_operator
            && self.search_term.joined() == other.search_term.joined()
    }
}

/// One element of a group: a term or a nested group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SearchElement {
    /// A leaf comparison.
    Term(SearchTerm),
    /// A nested group.
    Group(SearchGroup),
}

impl SearchElement {
    /// Returns the term, if this element is one.
    pub fn as_term(&self) -> Option<&SearchTerm> {
        match self {
            Self::Term(term) => Some(term),
            Self::Group(_) => None,
        }
    }

    /// Returns the group, if this element is one.
    pub fn as_group(&self) -> Option<&SearchGroup> {
        match self {
            Self::Group(group) => Some(group),
            Self::Term(_) => None,
        }
    }

    /// Structural equality ignoring term and group ids.
    pub fn same_shape(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Term(a), Self::Term(b)) => a.same_shape(b),
            (Self::Group(a), Self::Group(b)) => a.same_shape(b),
            _ => false,
        }
    }
}

impl From<SearchTerm> for SearchElement {
    fn from(term: SearchTerm) -> Self {
        Self::Term(term)
    }
}

impl From<SearchGroup> for SearchElement {
    fn from(group: SearchGroup) -> Self {
        Self::Group(group)
    }
}

/// A group of elements joined by logic operators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchGroup {
    /// Unique id, or [`BASE_GROUP_ID`] for the root.
    pub group_id: String,
    /// Operators between adjacent elements; entry `i` joins `elements[i]` and `elements[i + 1]`.
    pub group_logic_operators: Vec<LogicOperator>,
    /// The group's terms and subgroups.
    pub elements: Vec<SearchElement>,
}

impl SearchGroup {
    /// Creates an empty group with the given id.
    pub fn new(group_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            group_logic_operators: Vec::new(),
            elements: Vec::new(),
        }
    }

    /// Creates an empty root group.
    pub fn base() -> Self {
        Self::new(BASE_GROUP_ID)
    }

    /// Creates a group whose elements are all joined by `operator`.
    pub fn joined(
        group_id: impl Into<String>,
        operator: LogicOperator,
        elements: Vec<SearchElement>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            group_logic_operators: vec![operator; elements.len().saturating_sub(1)],
            elements,
        }
    }

    /// Returns true for the root group.
    pub fn is_root(&self) -> bool {
        self.group_id == BASE_GROUP_ID
    }

    /// Returns true when the group has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// The operator shared by every join in this group.
    ///
    /// Returns `None` when the group has no operators or mixes AND with OR.
    pub fn operator(&self) -> Option<LogicOperator> {
        let first = *self.group_logic_operators.first()?;
        self.group_logic_operators
            .iter()
            .all(|op| *op == first)
            .then_some(first)
    }

    /// Returns true when the group does not mix AND with OR.
    pub fn is_homogeneous(&self) -> bool {
        self.group_logic_operators.is_empty() || self.operator().is_some()
    }

    /// Finds a group by id, depth-first, including this group itself.
    pub fn find_group(&self, group_id: &str) -> Option<&Self> {
        if self.group_id == group_id {
            return Some(self);
        }
        self.elements
            .iter()
            .filter_map(SearchElement::as_group)
            .find_map(|child| child.find_group(group_id))
    }

    /// Mutable variant of [`find_group`](Self::find_group).
    pub fn find_group_mut(&mut self, group_id: &str) -> Option<&mut Self> {
        if self.group_id == group_id {
            return Some(self);
        }
        self.elements.iter_mut().find_map(|element| match element {
            SearchElement::Group(child) => child.find_group_mut(group_id),
            SearchElement::Term(_) => None,
        })
    }

    /// Checks the operator count invariant at every level of the tree.
    pub fn is_well_formed(&self) -> bool {
        let expected = self.elements.len().saturating_sub(1);
        self.group_logic_operators.len() == expected
            && self
                .elements
                .iter()
                .filter_map(SearchElement::as_group)
                .all(Self::is_well_formed)
    }

    /// Structural equality ignoring term and group ids.
    pub fn same_shape(&self, other: &Self) -> bool {
        self.group_logic_operators == other.group_logic_operators
            && self.elements.len() == other.elements.len()
            && self
                .elements
                .iter()
                .zip(&other.elements)
                .all(|(a, b)| a.same_shape(b))
    }

    /// Counts the terms in the tree.
    pub fn term_count(&self) -> usize {
        self.elements
            .iter()
            .map(|element| match element {
                SearchElement::Term(_) => 1,
                SearchElement::Group(group) => group.term_count(),
            })
            .sum()
    }

    /// Formats the group as an indented tree.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let prefix = "  ".repeat(indent);
        let joins = match self.operator() {
            Some(op) => op.keyword(),
            None if self.group_logic_operators.is_empty() => "-",
            None => "MIXED",
        };
        writeln!(f, "{prefix}Group {} [{joins}]", self.group_id)?;
        for element in &self.elements {
            match element {
                SearchElement::Term(term) => writeln!(
                    f,
                    "{prefix}  Term {}: {} {} {:?}",
                    term.id,
                    term.search_field,
                    term.comparison_operator,
                    term.search_term.joined()
                )?,
                SearchElement::Group(group) => group.fmt_tree(f, indent + 1)?,
            }
        }
        Ok(())
    }
}

impl Default for SearchGroup {
    fn default() -> Self {
        Self::base()
    }
}

impl fmt::Display for SearchGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0)
    }
}

/// The state-container shape: `{ searchList: [root] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchList {
    /// The top-level groups; a valid list holds exactly one root.
    pub search_list: Vec<SearchGroup>,
}

impl SearchList {
    /// Wraps a root group.
    pub fn new(root: SearchGroup) -> Self {
        Self {
            search_list: vec![root],
        }
    }

    /// The root group, if present.
    pub fn root(&self) -> Option<&SearchGroup> {
        self.search_list.first()
    }

    /// Consumes the list and returns its root, or an empty root if the list is empty.
    pub fn into_root(self) -> SearchGroup {
        self.search_list.into_iter().next().unwrap_or_default()
    }
}

impl Default for SearchList {
    fn default() -> Self {
        Self::new(SearchGroup::base())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(id: &str, field: &str, value: &str) -> SearchElement {
        SearchTerm::new(id, field, ComparisonOperator::Equal, value).into()
    }

    #[test]
    fn joined_sets_one_operator_per_gap() {
        let group = SearchGroup::joined(
            "g1",
            LogicOperator::Or,
            vec![term("t1", "a", "1"), term("t2", "b", "2"), term("t3", "c", "3")],
        );
        assert_eq!(group.group_logic_operators, vec![LogicOperator::Or; 2]);
        assert!(group.is_well_formed());
        assert_eq!(group.operator(), Some(LogicOperator::Or));
    }

    #[test]
    fn mixed_group_has_no_single_operator() {
        let mut group = SearchGroup::joined(
            BASE_GROUP_ID,
            LogicOperator::And,
            vec![term("t1", "a", "1"), term("t2", "b", "2"), term("t3", "c", "3")],
        );
        group.group_logic_operators[1] = LogicOperator::Or;
        assert_eq!(group.operator(), None);
        assert!(!group.is_homogeneous());
        assert!(group.is_well_formed());
    }

    #[test]
    fn empty_root_is_well_formed() {
        let root = SearchGroup::base();
        assert!(root.is_root());
        assert!(root.is_well_formed());
        assert!(root.is_homogeneous());
    }

    #[test]
    fn detects_operator_count_mismatch_in_subgroup() {
        let mut inner = SearchGroup::joined(
            "g1",
            LogicOperator::Or,
            vec![term("t2", "b", "2"), term("t3", "c", "3")],
        );
        inner.group_logic_operators.push(LogicOperator::Or);
        let root = SearchGroup::joined(
            BASE_GROUP_ID,
            LogicOperator::And,
            vec![term("t1", "a", "1"), inner.into()],
        );
        assert!(!root.is_well_formed());
    }

    #[test]
    fn find_group_searches_depth_first() {
        let deep = SearchGroup::joined(
            "deep",
            LogicOperator::And,
            vec![term("t3", "c", "3"), term("t4", "d", "4")],
        );
        let mid = SearchGroup::joined(
            "mid",
            LogicOperator::Or,
            vec![term("t2", "b", "2"), deep.into()],
        );
        let mut root = SearchGroup::joined(
            BASE_GROUP_ID,
            LogicOperator::And,
            vec![term("t1", "a", "1"), mid.into()],
        );

        assert_eq!(root.find_group("deep").map(|g| g.elements.len()), Some(2));
        assert!(root.find_group("missing").is_none());
        assert!(root.find_group_mut("mid").is_some());
        assert_eq!(root.term_count(), 4);
    }

    #[test]
    fn list_value_has_the_shape_of_its_joined_text() {
        let list = SearchTerm::new(
            "t1",
            "material",
            ComparisonOperator::Equal,
            vec!["paper".to_string(), "parchment".to_string()],
        );
        let joined = SearchTerm::new("t2", "material", ComparisonOperator::Equal, "paper,parchment");
        let other = SearchTerm::new("t3", "material", ComparisonOperator::Equal, "paper");
        assert!(list.same_shape(&joined));
        assert!(!list.same_shape(&other));

        assert!(SearchValue::Many(Vec::new()).is_empty());
        assert!(!SearchValue::Many(vec![String::new(), String::new()]).is_empty());
    }

    #[test]
    fn same_shape_ignores_ids() {
        let a = SearchGroup::joined(
            "g1",
            LogicOperator::And,
            vec![term("t1", "a", "1"), term("t2", "b", "2")],
        );
        let b = SearchGroup::joined(
            "other",
            LogicOperator::And,
            vec![term("x", "a", "1"), term("y", "b", "2")],
        );
        assert!(a.same_shape(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn operators_parse_from_keywords_and_tokens() {
        assert_eq!("and".parse::<LogicOperator>(), Ok(LogicOperator::And));
        assert_eq!(",".parse::<LogicOperator>(), Ok(LogicOperator::Or));
        assert!("xor".parse::<LogicOperator>().is_err());
        assert_eq!(
            "=ge=".parse::<ComparisonOperator>(),
            Ok(ComparisonOperator::GreaterOrEqual)
        );
        assert_eq!("!=".parse::<ComparisonOperator>(), Ok(ComparisonOperator::NotEqual));
        assert!("=in=".parse::<ComparisonOperator>().is_err());
    }

    #[test]
    fn serde_uses_widget_field_names() {
        let root = SearchGroup::joined(
            BASE_GROUP_ID,
            LogicOperator::And,
            vec![term("t1", "settlement-search", "Leipzig"), term("t2", "binding-search", "")],
        );
        let json = serde_json::to_value(SearchList::new(root.clone())).unwrap();

        assert_eq!(json["searchList"][0]["groupId"], "base");
        assert_eq!(json["searchList"][0]["groupLogicOperators"][0], ";");
        assert_eq!(json["searchList"][0]["elements"][0]["kind"], "term");
        assert_eq!(
            json["searchList"][0]["elements"][0]["searchField"],
            "settlement-search"
        );
        assert_eq!(json["searchList"][0]["elements"][0]["comparisonOperator"], "==");

        let back: SearchList = serde_json::from_value(json).unwrap();
        assert_eq!(back.root(), Some(&root));
    }

    #[test]
    fn multi_value_terms_deserialize_from_arrays() {
        let json = r#"{"kind":"term","id":"t1","searchField":"material",
            "comparisonOperator":"==","searchTerm":["paper","parchment"]}"#;
        let element: SearchElement = serde_json::from_str(json).unwrap();
        let term = element.as_term().unwrap();
        assert_eq!(term.search_term.parts(), vec!["paper", "parchment"]);
        assert_eq!(term.search_term.joined(), "paper,parchment");
    }

    #[test]
    fn display_renders_indented_tree() {
        let inner = SearchGroup::joined(
            "g1",
            LogicOperator::Or,
            vec![term("t2", "b", "2"), term("t3", "c", "3")],
        );
        let root = SearchGroup::joined(
            BASE_GROUP_ID,
            LogicOperator::And,
            vec![term("t1", "a", "1"), inner.into()],
        );
        let rendered = root.to_string();
        assert!(rendered.starts_with("Group base [AND]\n"));
        assert!(rendered.contains("  Group g1 [OR]\n"));
        assert!(rendered.contains("    Term t3: c == \"3\"\n"));
    }
}
