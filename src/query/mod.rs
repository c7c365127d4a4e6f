//! Query-string multi-map
//!
//! `QueryState` is the ordered key → value multi-map backing one query
//! string. It mirrors the standard `URLSearchParams` surface: insertion
//! order is preserved, repeated keys are kept, `get` returns the first
//! value, `set` overwrites in place, and `delete` removes every occurrence.
//!
//! Parsing percent-decodes keys and values (with `+` read as a space);
//! serialization percent-encodes them, so a comma inside a value round-trips
//! as `%2C`. Byte sequences that fail to decode are kept verbatim rather
//! than rejected, so a hand-edited URL never breaks a read.

use std::borrow::Cow;

/// Ordered multi-map of query-string keys to values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryState {
    pairs: Vec<(String, String)>,
}

impl QueryState {
    /// Create an empty query state
    #[must_use]
    pub const fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Parse a raw query string into an ordered multi-map
    ///
    /// A leading `?` is accepted and ignored. Segments without `=` become
    /// flag keys with an empty value; empty segments (from `&&` or a
    /// trailing `&`) are skipped.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        let pairs = raw
            .split('&')
            .filter(|segment| !segment.is_empty())
            .map(|segment| {
                let mut parts = segment.splitn(2, '=');
                let key = decode_component(parts.next().unwrap_or(""));
                let value = decode_component(parts.next().unwrap_or(""));
                (key, value)
            })
            .collect();
        Self { pairs }
    }

    /// Serialize back into a query string (no leading `?`)
    ///
    /// Keys and values are percent-encoded. An empty state serializes to an
    /// empty string.
    #[must_use]
    pub fn serialize(&self) -> String {
        self.pairs
            .iter()
            .map(|(key, value)| {
                format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// The first value for `key`, if present
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// All values for `key`, in order
    #[must_use]
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Whether `key` is present at least once
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// Set `key` to a single value
    ///
    /// Overwrites the first occurrence in place (keeping its position) and
    /// drops later duplicates; appends when the key is absent.
    pub fn set(&mut self, key: &str, value: &str) {
        if let Some(first) = self.pairs.iter().position(|(k, _)| k == key) {
            self.pairs[first].1 = value.to_string();
            let mut index = first + 1;
            while index < self.pairs.len() {
                if self.pairs[index].0 == key {
                    self.pairs.remove(index);
                } else {
                    index += 1;
                }
            }
        } else {
            self.pairs.push((key.to_string(), value.to_string()));
        }
    }

    /// Append a value for `key`, keeping existing occurrences
    pub fn append(&mut self, key: &str, value: &str) {
        self.pairs.push((key.to_string(), value.to_string()));
    }

    /// Remove every occurrence of `key`
    pub fn delete(&mut self, key: &str) {
        self.pairs.retain(|(k, _)| k != key);
    }

    /// Number of key/value pairs (duplicates counted)
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether the state holds no pairs
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterate over key/value pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Percent-decode one key or value; `+` reads as a space
///
/// Undecodable sequences pass through verbatim.
fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    let decoded = urlencoding::decode(&spaced).map(Cow::into_owned);
    decoded.unwrap_or(spaced)
}
