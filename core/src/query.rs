//! Query items and their encoding onto a URL.
//!
//! # Design
//! Items are appended with `application/x-www-form-urlencoded` serialization
//! after whatever query the URL already has. Nothing is reordered,
//! deduplicated or removed: some servers care about parameter order, and
//! repeated keys are legal.

use url::Url;

use crate::error::MalformedLocatorError;

/// Anything that can supply an ordered list of query items.
///
/// Implemented for slices, arrays and vectors of string pairs, for
/// `Option<Q>` (no items when `None`) and for `()` (no items).
pub trait Query {
    fn query_items(&self) -> Vec<(String, String)>;
}

impl Query for () {
    fn query_items(&self) -> Vec<(String, String)> {
        Vec::new()
    }
}

impl<K: AsRef<str>, V: AsRef<str>> Query for [(K, V)] {
    fn query_items(&self) -> Vec<(String, String)> {
        self.iter()
            .map(|(k, v)| (k.as_ref().to_string(), v.as_ref().to_string()))
            .collect()
    }
}

impl<K: AsRef<str>, V: AsRef<str>, const N: usize> Query for [(K, V); N] {
    fn query_items(&self) -> Vec<(String, String)> {
        self.as_slice().query_items()
    }
}

impl<K: AsRef<str>, V: AsRef<str>> Query for Vec<(K, V)> {
    fn query_items(&self) -> Vec<(String, String)> {
        self.as_slice().query_items()
    }
}

impl<Q: Query> Query for Option<Q> {
    fn query_items(&self) -> Vec<(String, String)> {
        self.as_ref().map(Q::query_items).unwrap_or_default()
    }
}

impl<Q: Query + ?Sized> Query for &Q {
    fn query_items(&self) -> Vec<(String, String)> {
        (**self).query_items()
    }
}

/// Parse `locator` and append `query` to it.
pub fn append<Q: Query + ?Sized>(locator: &str, query: &Q) -> Result<Url, MalformedLocatorError> {
    let url = Url::parse(locator).map_err(|err| MalformedLocatorError::parse(locator, err))?;
    extend(url, query)
}

/// Append `query` after the existing query of `url`.
///
/// Fails for non-hierarchical URLs (`mailto:`, `data:` and the like), which
/// have no query component to extend.
pub fn extend<Q: Query + ?Sized>(mut url: Url, query: &Q) -> Result<Url, MalformedLocatorError> {
    if url.cannot_be_a_base() {
        return Err(MalformedLocatorError::not_hierarchical(url.as_str()));
    }
    let items = query.query_items();
    if !items.is_empty() {
        url.query_pairs_mut().extend_pairs(items.iter());
    }
    Ok(url)
}
