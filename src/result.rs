//! The final token → total mapping returned by a pipeline run.

use crate::token::Token;
use crate::topn::top_n;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::hash_map;

/// Token → total occurrences. Keys are unique.
///
/// A `CountResult` is only ever handed out complete: every key seen by the
/// shuffler is present exactly once.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountResult {
    counts: HashMap<Token, u64>,
}

impl CountResult {
    /// Count for `token`, if it occurred.
    #[must_use]
    pub fn get(&self, token: &str) -> Option<u64> {
        self.counts.get(token).copied()
    }

    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.counts.contains_key(token)
    }

    /// Number of distinct tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts, i.e. the number of tokens that reached the map stage.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, Token, u64> {
        self.counts.iter()
    }

    pub fn keys(&self) -> hash_map::Keys<'_, Token, u64> {
        self.counts.keys()
    }

    /// Entries ordered by token, for stable output.
    #[must_use]
    pub fn to_sorted_vec(&self) -> Vec<(Token, u64)> {
        let mut v: Vec<(Token, u64)> = self.counts.iter().map(|(k, v)| (k.clone(), *v)).collect();
        v.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        v
    }

    /// The `n` most frequent tokens; see [`top_n`].
    #[must_use]
    pub fn top_n(&self, n: usize) -> Vec<(Token, u64)> {
        top_n(self, n)
    }

    #[must_use]
    pub fn into_inner(self) -> HashMap<Token, u64> {
        self.counts
    }
}

impl From<HashMap<Token, u64>> for CountResult {
    fn from(counts: HashMap<Token, u64>) -> Self {
        Self { counts }
    }
}

impl FromIterator<(Token, u64)> for CountResult {
    fn from_iter<I: IntoIterator<Item = (Token, u64)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for CountResult {
    type Item = (Token, u64);
    type IntoIter = hash_map::IntoIter<Token, u64>;
    fn into_iter(self) -> Self::IntoIter {
        self.counts.into_iter()
    }
}

impl<'a> IntoIterator for &'a CountResult {
    type Item = (&'a Token, &'a u64);
    type IntoIter = hash_map::Iter<'a, Token, u64>;
    fn into_iter(self) -> Self::IntoIter {
        self.counts.iter()
    }
}
