//! Reduce stage: one group → one total.
//!
//! Reduction is associative and commutative, so groups are reduced independently
//! on the worker pool. Each worker fills a local map; locals are merged at the
//! barrier and checked for duplicate keys.

use crate::cancel::CancelToken;
use crate::error::{Error, Result, Stage};
use crate::result::CountResult;
use crate::runner::run_unit;
use crate::shuffle::Groups;
use crate::token::{Group, Token};
use std::collections::HashMap;

/// Aggregates one group into a single count.
pub trait ReduceFn: Send + Sync {
    fn reduce(&self, group: &Group) -> u64;
}

/// Sum of the group's values.
#[derive(Clone, Copy, Debug, Default)]
pub struct SumReducer;

impl ReduceFn for SumReducer {
    fn reduce(&self, group: &Group) -> u64 {
        group.values.iter().sum()
    }
}

impl<F> ReduceFn for F
where
    F: Fn(&Group) -> u64 + Send + Sync,
{
    fn reduce(&self, group: &Group) -> u64 {
        self(group)
    }
}

/// Reduce a single group with [`SumReducer`].
pub fn reduce(group: &Group) -> (Token, u64) {
    (group.key.clone(), SumReducer.reduce(group))
}

/// Reduce every group sequentially with [`SumReducer`].
pub fn reduce_all(groups: Groups) -> CountResult {
    groups.values().map(reduce).collect()
}

/// Reduce one partition of groups into a worker-local map.
pub(crate) fn reduce_partition(
    groups: &[Group],
    reducer: &dyn ReduceFn,
    cancel: &CancelToken,
) -> Result<HashMap<Token, u64>> {
    let mut local = HashMap::with_capacity(groups.len());
    for group in groups {
        cancel.check(Stage::Reduce)?;
        let total = run_unit(Stage::Reduce, &group.key, || reducer.reduce(group))?;
        local.insert(group.key.clone(), total);
    }
    Ok(local)
}

/// Merge worker-local maps. Keys are disjoint by construction; a repeat is a bug
/// in the partitioning and fails the run instead of double counting.
pub(crate) fn merge_counts<I>(locals: I) -> Result<CountResult>
where
    I: IntoIterator<Item = HashMap<Token, u64>>,
{
    let mut merged: HashMap<Token, u64> = HashMap::new();
    for local in locals {
        for (k, v) in local {
            if merged.insert(k.clone(), v).is_some() {
                return Err(Error::Pipeline {
                    stage: Stage::Reduce,
                    key: k.to_string(),
                    message: "key reduced by more than one worker".into(),
                });
            }
        }
    }
    Ok(CountResult::from(merged))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shuffle::shuffle;
    use crate::token::Pair;

    #[test]
    fn sums_group_values() {
        let mut g = Group::new(Token::from("a"));
        g.values = vec![1, 1, 3];
        assert_eq!(reduce(&g), (Token::from("a"), 5));
    }

    #[test]
    fn reduce_all_one_entry_per_key() {
        let pairs = ["x", "y", "x"]
            .iter()
            .map(|w| Pair::new(Token::from(*w), 1))
            .collect();
        let r = reduce_all(shuffle(pairs));
        assert_eq!(r.len(), 2);
        assert_eq!(r.get("x"), Some(2));
        assert_eq!(r.get("y"), Some(1));
    }

    #[test]
    fn duplicate_keys_across_workers_fail() {
        let a: HashMap<Token, u64> = [(Token::from("k"), 1)].into_iter().collect();
        let b = a.clone();
        let err = merge_counts([a, b]).unwrap_err();
        assert_eq!(err.failed_key(), Some("k"));
    }

    #[test]
    fn closures_are_reducers() {
        let max = |g: &Group| g.values.iter().copied().max().unwrap_or(0);
        let mut g = Group::new(Token::from("m"));
        g.values = vec![2, 9, 4];
        let local = reduce_partition(&[g], &max, &CancelToken::new()).unwrap();
        assert_eq!(local[&Token::from("m")], 9);
    }
}
