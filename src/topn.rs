//! Top-N selection over a [`CountResult`].
//!
//! Ranking is by count descending. Equal counts are ordered by token ascending
//! (lexicographic by Unicode scalar value), so the output is reproducible across
//! runs regardless of hash-map iteration order.
//!
//! The selector keeps a **min-heap** of size ≤ `n`, so memory is bounded by `n`
//! rather than by the number of distinct tokens.
//!
//! ```
//! use wordfreq::{count_words, top_n};
//!
//! let counts = count_words("b a c b a b", None).unwrap();
//! let top = top_n(&counts, 2);
//! assert_eq!(top[0].0.as_str(), "b");
//! assert_eq!(top[1].0.as_str(), "a");
//! ```

use crate::result::CountResult;
use crate::token::Token;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// Heap entry; "greater" means ranked earlier.
#[derive(PartialEq, Eq)]
struct Ranked {
    count: u64,
    token: Token,
}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.count
            .cmp(&other.count)
            .then_with(|| other.token.cmp(&self.token))
    }
}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The `n` highest-count entries of `result`, best first.
///
/// Returns `min(n, result.len())` entries; `n == 0` yields an empty vector.
#[must_use]
pub fn top_n(result: &CountResult, n: usize) -> Vec<(Token, u64)> {
    if n == 0 {
        return Vec::new();
    }
    let mut heap: BinaryHeap<Reverse<Ranked>> = BinaryHeap::with_capacity(n + 1);
    for (token, &count) in result {
        heap.push(Reverse(Ranked {
            count,
            token: token.clone(),
        }));
        if heap.len() > n {
            heap.pop(); // drop the lowest-ranked
        }
    }
    // Ascending order of Reverse<_> is descending rank.
    heap.into_sorted_vec()
        .into_iter()
        .map(|Reverse(r)| (r.token, r.count))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(entries: &[(&str, u64)]) -> CountResult {
        entries.iter().map(|(k, v)| (Token::from(*k), *v)).collect()
    }

    fn words(top: &[(Token, u64)]) -> Vec<(&str, u64)> {
        top.iter().map(|(t, c)| (t.as_str(), *c)).collect()
    }

    #[test]
    fn ranks_by_count_then_token() {
        let r = result(&[("pear", 2), ("apple", 2), ("fig", 5), ("kiwi", 1), ("date", 2)]);
        assert_eq!(
            words(&top_n(&r, 4)),
            [("fig", 5), ("apple", 2), ("date", 2), ("pear", 2)]
        );
    }

    #[test]
    fn n_larger_than_result() {
        let r = result(&[("a", 1), ("b", 3)]);
        assert_eq!(words(&top_n(&r, 10)), [("b", 3), ("a", 1)]);
    }

    #[test]
    fn zero_and_empty() {
        assert!(top_n(&result(&[("a", 1)]), 0).is_empty());
        assert!(top_n(&CountResult::default(), 3).is_empty());
    }
}
