//! Filter value codec
//!
//! This module defines the closed set of value shapes a filter field can take
//! and the codec between those values and their query-string form:
//! - `FilterKind`: the tag enumerating the five supported shapes
//! - `FilterValue`: a tagged value of one of those shapes
//!
//! Decoding is driven entirely by a `FilterKind`, never by inspecting the raw
//! string, so it is a total function: malformed numeric input decodes to a
//! `NaN` sentinel instead of failing the read. Callers that surface numbers
//! should treat `NaN` as "invalid, fall back at display time".
//!
//! Percent-encoding is not handled here; `encode` produces the plain value
//! text and the query layer escapes it on serialization. A committed list
//! value therefore appears in the URL with `%2C` separators.

use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The kind of a filter value
///
/// Attached to every template field, this tag decides how a raw query-string
/// value is coerced back into a typed value. List kinds carry their element
/// kind explicitly, so an empty default list is never ambiguous.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FilterKind {
    /// Free text (search terms, sort keys)
    Str,
    /// Floating-point number (page numbers, limits, price bounds)
    Number,
    /// Boolean flag, encoded as literal `true` / `false`
    Boolean,
    /// Comma-joined list of strings
    StrList,
    /// Comma-joined list of numbers
    NumberList,
}

/// A typed filter value
///
/// One value of the five supported shapes. Serializes untagged, so a
/// persisted filter snapshot reads as plain JSON scalars and arrays. Two
/// consequences, both handled at the field layer:
/// - a bare empty array deserializes as a `StrList` (string is the default
///   element kind); `TemplateField` and `EffectiveField` persist the
///   declared `FilterKind` next to the value and restore it on read
/// - a non-finite number (the `NaN` decode sentinel) has no untagged
///   serialized form and is rejected at serialize time; clear or overwrite
///   the field before persisting a snapshot
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// A string value
    Str(String),
    /// A numeric value; may be `NaN` after decoding malformed input
    Number(f64),
    /// A boolean value
    Boolean(bool),
    /// A list of strings
    StrList(Vec<String>),
    /// A list of numbers
    NumberList(Vec<f64>),
}

impl FilterValue {
    /// The kind tag of this value
    #[must_use]
    pub const fn kind(&self) -> FilterKind {
        match self {
            Self::Str(_) => FilterKind::Str,
            Self::Number(_) => FilterKind::Number,
            Self::Boolean(_) => FilterKind::Boolean,
            Self::StrList(_) => FilterKind::StrList,
            Self::NumberList(_) => FilterKind::NumberList,
        }
    }

    /// Whether this value counts as empty for deletion purposes
    ///
    /// An empty string or an empty list is "no value": writing it through a
    /// controller removes the key from the URL instead of storing it.
    /// Numbers and booleans are never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Str(s) => s.is_empty(),
            Self::StrList(items) => items.is_empty(),
            Self::NumberList(items) => items.is_empty(),
            Self::Number(_) | Self::Boolean(_) => false,
        }
    }

    /// Decode a raw query-string value into a typed value of the given kind
    ///
    /// Total over the kind set: string input passes through, booleans compare
    /// against the literal `true`, numbers parse as `f64` with malformed
    /// input yielding `NaN`, and list kinds split on `,` before applying the
    /// element rule to each piece. Numeric parsing is strict, not a lenient
    /// prefix parse: `"2abc"` decodes to `NaN` here, where `parseFloat`-style
    /// coercion elsewhere would read it as `2`.
    #[must_use]
    pub fn decode(raw: &str, kind: FilterKind) -> Self {
        match kind {
            FilterKind::Str => Self::Str(raw.to_string()),
            FilterKind::Number => Self::Number(parse_number(raw)),
            FilterKind::Boolean => Self::Boolean(raw == "true"),
            FilterKind::StrList => {
                Self::StrList(raw.split(',').map(str::to_string).collect())
            }
            FilterKind::NumberList => {
                Self::NumberList(raw.split(',').map(parse_number).collect())
            }
        }
    }

    /// Encode this value into its plain query-string text
    ///
    /// Strings pass through, numbers use the default `f64` display (integral
    /// values print without a fractional part), booleans print as `true` /
    /// `false`, and lists join their encoded elements with `,`.
    #[must_use]
    pub fn encode(&self) -> String {
        match self {
            Self::Str(s) => s.clone(),
            Self::Number(n) => n.to_string(),
            Self::Boolean(b) => b.to_string(),
            Self::StrList(items) => items.join(","),
            Self::NumberList(items) => items
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    /// Borrow the string value, if this is a `Str`
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The numeric value, if this is a `Number`
    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The boolean value, if this is a `Boolean`
    #[must_use]
    pub const fn as_boolean(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Borrow the string list, if this is a `StrList`
    #[must_use]
    pub fn as_str_list(&self) -> Option<&[String]> {
        match self {
            Self::StrList(items) => Some(items),
            _ => None,
        }
    }

    /// Borrow the number list, if this is a `NumberList`
    #[must_use]
    pub fn as_number_list(&self) -> Option<&[f64]> {
        match self {
            Self::NumberList(items) => Some(items),
            _ => None,
        }
    }
}

/// Parse one numeric piece; malformed input yields the `NaN` sentinel
fn parse_number(raw: &str) -> f64 {
    raw.trim().parse().unwrap_or(f64::NAN)
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(items: Vec<String>) -> Self {
        Self::StrList(items)
    }
}

impl From<Vec<&str>> for FilterValue {
    fn from(items: Vec<&str>) -> Self {
        Self::StrList(items.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<f64>> for FilterValue {
    fn from(items: Vec<f64>) -> Self {
        Self::NumberList(items)
    }
}

impl Serialize for FilterValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Str(s) => serializer.serialize_str(s),
            Self::Number(n) => serialize_finite(*n, serializer),
            Self::Boolean(b) => serializer.serialize_bool(*b),
            Self::StrList(items) => items.serialize(serializer),
            Self::NumberList(items) => {
                if let Some(bad) = items.iter().find(|n| !n.is_finite()) {
                    return Err(S::Error::custom(format!(
                        "non-finite number {bad} has no serialized form"
                    )));
                }
                items.serialize(serializer)
            }
        }
    }
}

fn serialize_finite<S>(n: f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if n.is_finite() {
        serializer.serialize_f64(n)
    } else {
        Err(S::Error::custom(format!(
            "non-finite number {n} has no serialized form"
        )))
    }
}

/// Untagged wire shape for deserialization
///
/// An empty array lands in `StrList` (string is the default element kind);
/// the field-level representations in `filters::types` carry the declared
/// `FilterKind` and restore it after this step.
#[derive(Deserialize)]
#[serde(untagged)]
enum ValueRepr {
    Str(String),
    Number(f64),
    Boolean(bool),
    StrList(Vec<String>),
    NumberList(Vec<f64>),
}

impl<'de> Deserialize<'de> for FilterValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match ValueRepr::deserialize(deserializer)? {
            ValueRepr::Str(s) => Self::Str(s),
            ValueRepr::Number(n) => Self::Number(n),
            ValueRepr::Boolean(b) => Self::Boolean(b),
            ValueRepr::StrList(items) => Self::StrList(items),
            ValueRepr::NumberList(items) => Self::NumberList(items),
        })
    }
}

impl std::fmt::Display for FilterValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.encode())
    }
}
