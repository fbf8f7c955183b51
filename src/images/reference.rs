//! Image references as produced by asset bundlers.
//!
//! Bundlers hand an imported image to UI code as a bare URL string, as an
//! object with a `src` field, or as a module object with a `default` field.
//! [`ImageRef`] captures those shapes once, at the boundary, so that
//! [`ImageRef::normalize`] is a plain exhaustive match.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An imported image asset in one of the known bundler output shapes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub enum ImageRef {
    /// The import is already a URL string.
    PlainUrl(String),
    /// An object exposing the URL as `src`.
    SrcWrapper(String),
    /// A module object exposing the URL as `default`.
    DefaultWrapper(String),
    /// Any other shape, kept verbatim.
    Unknown(Value),
}

/// Result of [`ImageRef::normalize`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Resolved<'a> {
    /// A URL extracted from a known shape.
    Url(&'a str),
    /// An unrecognized value, passed through unchanged.
    Passthrough(&'a Value),
}

impl<'a> Resolved<'a> {
    /// The URL, if one was found.
    pub fn as_url(self) -> Option<&'a str> {
        match self {
            Resolved::Url(url) => Some(url),
            Resolved::Passthrough(_) => None,
        }
    }
}

impl ImageRef {
    /// Resolve the reference to a single URL, or hand back the unknown value.
    pub fn normalize(&self) -> Resolved<'_> {
        match self {
            ImageRef::PlainUrl(url) | ImageRef::SrcWrapper(url) | ImageRef::DefaultWrapper(url) => {
                Resolved::Url(url)
            }
            ImageRef::Unknown(value) => Resolved::Passthrough(value),
        }
    }
}

impl From<Value> for ImageRef {
    fn from(value: Value) -> Self {
        if let Value::String(url) = value {
            return ImageRef::PlainUrl(url);
        }
        if let Some(src) = non_empty_str(&value, "src") {
            return ImageRef::SrcWrapper(src);
        }
        if let Some(default) = non_empty_str(&value, "default") {
            return ImageRef::DefaultWrapper(default);
        }
        ImageRef::Unknown(value)
    }
}

impl From<String> for ImageRef {
    fn from(url: String) -> Self {
        ImageRef::PlainUrl(url)
    }
}

impl From<&str> for ImageRef {
    fn from(url: &str) -> Self {
        ImageRef::PlainUrl(url.to_string())
    }
}

// Empty strings are skipped, so `{ "src": "", "default": "a.png" }` resolves
// through `default`.
fn non_empty_str(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
