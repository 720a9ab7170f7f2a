use std::hash::Hash;

use indexmap::IndexMap;

use crate::stats::types::Popular;

/// Counts each distinct value, ordered by descending count.
///
/// Values with equal counts keep the order in which they were first seen.
pub fn value_counts<T, I>(values: I) -> Vec<(T, usize)>
where
    T: Eq + Hash,
    I: IntoIterator<Item = T>,
{
    let mut counts: IndexMap<T, usize> = IndexMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }

    let mut counts: Vec<_> = counts.into_iter().collect();
    // stable: ties stay in first-occurrence order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Most frequent value; the earliest-seen value wins a tie. `None` for no input.
pub fn mode<T, I>(values: I) -> Option<Popular<T>>
where
    T: Eq + Hash,
    I: IntoIterator<Item = T>,
{
    value_counts(values)
        .into_iter()
        .next()
        .map(|(value, count)| Popular { value, count })
}

/// Arithmetic mean of whole-second durations. `None` for no input.
pub fn mean(values: &[u64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let total: u128 = values.iter().map(|v| u128::from(*v)).sum();
    Some(total as f64 / values.len() as f64)
}
