use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Most frequent value, or `None` for empty input.
///
/// Ties resolve to the smallest value, so the result does not depend on input order.
pub fn mode<T: Ord>(values: impl IntoIterator<Item = T>) -> Option<T> {
    let mut counts: BTreeMap<T, usize> = BTreeMap::new();
    for v in values {
        *counts.entry(v).or_default() += 1;
    }

    let mut best: Option<(T, usize)> = None;
    for (value, count) in counts {
        // strictly greater keeps the smallest key on ties
        if best.as_ref().map_or(true, |(_, c)| count > *c) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}

/// Occurrences per distinct value, highest count first.
///
/// Values with equal counts keep the order in which they were first seen.
pub fn count_by<T: Eq + Hash + Clone>(values: impl IntoIterator<Item = T>) -> Vec<(T, usize)> {
    let mut index: HashMap<T, usize> = HashMap::new();
    let mut counts: Vec<(T, usize)> = Vec::new();

    for v in values {
        match index.get(&v) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(v.clone(), counts.len());
                counts.push((v, 1));
            }
        }
    }

    // stable sort
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Buckets items by key. Groups iterate in ascending key order.
pub fn group_by<'a, T, K, F>(items: impl IntoIterator<Item = &'a T>, key: F) -> BTreeMap<K, Vec<&'a T>>
where
    T: 'a,
    K: Ord,
    F: Fn(&'a T) -> K,
{
    let mut groups: BTreeMap<K, Vec<&'a T>> = BTreeMap::new();
    for item in items {
        groups.entry(key(item)).or_default().push(item);
    }
    groups
}
