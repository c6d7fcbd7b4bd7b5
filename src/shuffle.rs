//! Shuffle stage: the synchronization point between map and reduce.
//!
//! Grouping is two-phase. Every mapped partition is grouped into its own local
//! map ([`group_local`]), and the locals are merged once all of them exist
//! ([`merge_groups`]). The result depends only on the multiset of pairs, never on
//! their arrival order.

use crate::token::{Group, Pair, Token};
use std::collections::HashMap;

/// Key → group mapping produced by the shuffler.
pub type Groups = HashMap<Token, Group>;

/// Group the pairs of a single partition.
pub fn group_local<I>(pairs: I) -> Groups
where
    I: IntoIterator<Item = Pair>,
{
    let mut m: Groups = HashMap::new();
    for Pair { key, value } in pairs {
        m.entry(key.clone())
            .or_insert_with(|| Group::new(key))
            .values
            .push(value);
    }
    m
}

/// Merge per-partition groupings into one mapping.
pub fn merge_groups<I>(maps: I) -> Groups
where
    I: IntoIterator<Item = Groups>,
{
    let mut merged: Groups = HashMap::new();
    for m in maps {
        for (k, g) in m {
            match merged.get_mut(&k) {
                Some(existing) => existing.values.extend(g.values),
                None => {
                    merged.insert(k, g);
                }
            }
        }
    }
    merged
}

/// Group a complete pair sequence by key.
pub fn shuffle(pairs: Vec<Pair>) -> Groups {
    group_local(pairs)
}

/// Total number of values across all groups.
pub(crate) fn value_count(groups: &Groups) -> usize {
    groups.values().map(Group::len).sum()
}
