//! Value types flowing between pipeline stages.
//!
//! - [`Token`] is a normalized word, compared by value.
//! - [`Pair`] is one `(token, 1)` occurrence record emitted by the mapper.
//! - [`Group`] holds every occurrence value of one key, before reduction.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// An immutable, normalized unit of text (lower-cased, punctuation-stripped).
///
/// Cloning is cheap; the string is shared.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(Arc<str>);

impl Token {
    /// Wrap an already-normalized string.
    ///
    /// No normalization is applied here; use a
    /// [`Tokenizer`](crate::tokenizer::Tokenizer) to normalize raw words.
    pub fn new(s: impl Into<Arc<str>>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for Token {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Token {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Token {
    fn from(s: &str) -> Self {
        Self(Arc::from(s))
    }
}

impl From<String> for Token {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

/// A single `(key, value)` occurrence record.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Pair {
    pub key: Token,
    pub value: u64,
}

impl Pair {
    pub fn new(key: Token, value: u64) -> Self {
        Self { key, value }
    }
}

/// All occurrence values for one key.
///
/// `values.len()` equals the number of pairs seen for `key`. Value order follows
/// arrival order at the shuffler and is not meaningful.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    pub key: Token,
    pub values: Vec<u64>,
}

impl Group {
    pub fn new(key: Token) -> Self {
        Self {
            key,
            values: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
