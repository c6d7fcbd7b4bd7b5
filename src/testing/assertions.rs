//! Assertion functions for pipeline outputs.

use crate::result::CountResult;
use crate::token::Token;
use std::collections::HashSet;
use std::fmt::Debug;

/// Assert that `actual` holds exactly the `expected` token counts.
///
/// # Panics
///
/// Panics listing missing, extra, and differing keys.
///
/// # Example
///
/// ```
/// use wordfreq::count_words;
/// use wordfreq::testing::assert_counts_equal;
///
/// let counts = count_words("a b a", None).unwrap();
/// assert_counts_equal(&counts, &[("a", 2), ("b", 1)]);
/// ```
pub fn assert_counts_equal(actual: &CountResult, expected: &[(&str, u64)]) {
    let mut missing = Vec::new();
    let mut wrong = Vec::new();
    for (k, v) in expected {
        match actual.get(k) {
            None => missing.push(*k),
            Some(got) if got != *v => wrong.push((*k, *v, got)),
            Some(_) => {}
        }
    }
    let expected_keys: HashSet<&str> = expected.iter().map(|(k, _)| *k).collect();
    let mut extra: Vec<&str> = actual
        .keys()
        .map(Token::as_str)
        .filter(|k| !expected_keys.contains(k))
        .collect();
    extra.sort_unstable();

    assert!(
        missing.is_empty() && wrong.is_empty() && extra.is_empty(),
        "Count mismatch:\n  Missing keys: {missing:?}\n  Extra keys: {extra:?}\n  Wrong counts (key, expected, actual): {wrong:?}\n  Actual: {:?}",
        actual.to_sorted_vec()
    );
}

/// Assert that a ranking is non-increasing by count and, within equal counts,
/// ordered by token ascending.
///
/// # Panics
///
/// Panics at the first pair of adjacent entries out of order.
pub fn assert_ranked_descending(ranked: &[(Token, u64)]) {
    for (i, w) in ranked.windows(2).enumerate() {
        let (a, b) = (&w[0], &w[1]);
        let ok = a.1 > b.1 || (a.1 == b.1 && a.0 < b.0);
        assert!(
            ok,
            "Ranking out of order at index {i}:\n  {a:?} before {b:?}\n  Full ranking: {ranked:?}"
        );
    }
}

/// Assert that every ranked entry appears in `result` with the same count.
///
/// # Panics
///
/// Panics on the first entry that is absent or differs.
pub fn assert_subset_of(ranked: &[(Token, u64)], result: &CountResult) {
    for (token, count) in ranked {
        assert_eq!(
            result.get(token),
            Some(*count),
            "Ranked entry {token:?} = {count} not found in result"
        );
    }
}

/// Assert that two collections of key-value pairs are equal after sorting by key.
///
/// # Panics
///
/// Panics if the collections differ after sorting by key.
pub fn assert_kv_collections_equal<K, V>(mut actual: Vec<(K, V)>, mut expected: Vec<(K, V)>)
where
    K: Debug + Ord,
    V: Debug + PartialEq,
{
    actual.sort_by(|a, b| a.0.cmp(&b.0));
    expected.sort_by(|a, b| a.0.cmp(&b.0));
    assert_eq!(
        actual.len(),
        expected.len(),
        "Collection length mismatch:\n  Expected: {expected:?}\n  Actual: {actual:?}"
    );
    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        assert!(
            a.0 == e.0 && a.1 == e.1,
            "Mismatch at sorted index {i}:\n  Expected: {e:?}\n  Actual: {a:?}"
        );
    }
}
