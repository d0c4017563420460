//! Grouped boolean search expressions and their RSQL form.
//!
//! A search is a tree of groups. Each group holds terms (`field operator value`) and nested
//! groups, joined by a single logic operator:
//!
//! - **RSQL**: `settlement-search=='Leipzig';year>='1450'` - the wire form, `;` is AND and `,`
//!   is OR, AND binds tighter
//! - **Preview**: `"Place" equals "Leipzig" AND "Year" >= "1450"` - the on-screen form
//! - **Edits**: add, delete and update addressed by group id and index, each returning a new
//!   tree
//!
//! # Example
//!
//! ```
//! use xsearch_query::{LogicOperator, parse_rsql, to_rsql};
//!
//! let list = parse_rsql("a=='1',b=='2';c=='3'").unwrap();
//! let root = list.root().unwrap();
//! assert_eq!(root.operator(), Some(LogicOperator::Or));
//! assert_eq!(to_rsql(&list), "a=='1',(b=='2';c=='3')");
//! ```

#![warn(missing_docs)]

mod assemble;
mod ast;
mod error;
mod flatten;
mod ids;
mod labels;
mod lexer;
pub mod link;
mod model;
mod mutate;
mod parser;
mod serialize;
mod state;

pub use assemble::assemble;
pub use ast::RsqlExpr;
pub use error::{LexError, ParseError, QueryError, QueryErrorKind};
pub use flatten::{FlatToken, flatten};
pub use ids::{IdGenerator, SequentialIds, UuidIds};
pub use labels::{Labels, RawLabels};
pub use lexer::{SpannedToken, Token, is_selector, tokenize, tokenize_spanned};
pub use model::{
    BASE_GROUP_ID, ComparisonOperator, LogicOperator, SearchElement, SearchGroup, SearchList,
    SearchTerm, SearchValue,
};
pub use mutate::{
    Location, TermFactory, TermUpdate, add_element, delete_element, remove_element,
    remove_empty_elements, update_element,
};
pub use parser::{MAX_DEPTH, parse_expr, parse_rsql, parse_rsql_with};
pub use serialize::{group_to_rsql, to_readable, to_rsql};
pub use state::{Action, SearchState};
