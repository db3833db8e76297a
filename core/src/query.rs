//! Query-string assembly for filtering and pagination options.

use std::collections::BTreeMap;

use url::form_urlencoded;

/// Ordered set of query parameters.
///
/// Keys are emitted in sorted order so the same options always produce the
/// same URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: BTreeMap<&'static str, String>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &'static str, value: impl ToString) -> &mut Self {
        self.pairs.insert(key, value.to_string());
        self
    }

    /// Sets `key` only when `value` is present.
    pub fn set_opt<V: ToString>(&mut self, key: &'static str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.set(key, value);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Form-urlencoded representation without the leading `?`.
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.pairs {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }

    /// Returns `path` with the encoded parameters appended, or `path`
    /// unchanged when there are none.
    pub fn append_to(&self, path: &str) -> String {
        if self.is_empty() {
            path.to_string()
        } else {
            format!("{path}?{}", self.encode())
        }
    }
}
