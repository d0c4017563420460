//! Deep links: the RSQL expression travels in the `q` query parameter.

use tracing::warn;
use url::Url;

use crate::{
    ids::IdGenerator,
    model::SearchList,
    parser::parse_rsql_with,
    serialize::to_rsql,
};

/// Query parameter holding the RSQL expression.
pub const QUERY_PARAM: &str = "q";

/// Query parameter flagging an extended search.
pub const EXTENDED_PARAM: &str = "isExtended";

/// Builds `base?q=<rsql>&isExtended=true`, replacing any existing `q` and `isExtended`.
///
/// Other query parameters of `base` are kept in order.
pub fn search_url(base: &Url, list: &SearchList) -> Url {
    let kept: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| key != QUERY_PARAM && key != EXTENDED_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut url = base.clone();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair(QUERY_PARAM, &to_rsql(list))
        .append_pair(EXTENDED_PARAM, "true");
    url
}

/// The decoded `q` parameter of a URL, if present.
pub fn extended_query(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == QUERY_PARAM)
        .map(|(_, value)| value.into_owned())
}

/// Decodes the tree carried by a deep link.
///
/// A missing `q` or an expression that does not parse gives an empty tree.
pub fn tree_from_url(url: &Url, ids: &dyn IdGenerator) -> SearchList {
    let Some(query) = extended_query(url) else {
        return SearchList::default();
    };
    match parse_rsql_with(&query, ids) {
        Ok(list) => list,
        Err(err) => {
            warn!(%url, error = %err.message(), "could not parse search link, starting empty");
            SearchList::default()
        }
    }
}
