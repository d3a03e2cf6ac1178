//! Aggregation query facade.
//!
//! The one primitive all three metric modules share: group a finite record
//! collection by a key and sum (or collect) per group. Pure and deterministic
//! for a fixed input; freshness is the caller's responsibility — re-query the
//! log before aggregating.

use std::collections::HashMap;
use std::hash::Hash;

/// Group records by `key` and sum `value` per group.
///
/// Groups with no matching records are simply absent from the map; callers
/// must treat absence as zero. Values are expected to be non-negative by
/// business rule (callers validate at record acceptance, not here).
pub fn sum_by<R, K>(
    records: &[R],
    key: impl Fn(&R) -> K,
    value: impl Fn(&R) -> u64,
) -> HashMap<K, u64>
where
    K: Eq + Hash,
{
    let mut sums: HashMap<K, u64> = HashMap::new();
    for record in records {
        *sums.entry(key(record)).or_insert(0) += value(record);
    }
    sums
}

/// Group records by `key`, collecting references per group.
pub fn group_by<'a, R, K>(
    records: &'a [R],
    key: impl Fn(&'a R) -> K,
) -> HashMap<K, Vec<&'a R>>
where
    K: Eq + Hash,
{
    let mut groups: HashMap<K, Vec<&'a R>> = HashMap::new();
    for record in records {
        groups.entry(key(record)).or_default().push(record);
    }
    groups
}
