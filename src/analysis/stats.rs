//! Descriptive statistics over optional numeric columns.
//!
//! Missing values are skipped, matching how the aggregations treat empty
//! cells. Statistics of an empty selection are `None`.

use std::collections::BTreeMap;

/// Group name for rows whose grouping column is empty.
pub const MISSING_GROUP: &str = "Unknown";

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round an optional statistic to two decimal places.
pub fn round2_opt(value: Option<f64>) -> Option<f64> {
    value.map(round2)
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

pub fn median(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n == 0 {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    Some(if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    })
}

pub fn sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

/// Present values of `column` at the given row indices.
pub fn select(column: &[Option<f64>], rows: &[usize]) -> Vec<f64> {
    rows.iter().filter_map(|&i| column.get(i).copied().flatten()).collect()
}

/// Row indices grouped by key. Rows with a missing key go to
/// [`MISSING_GROUP`], so every row lands in exactly one group.
pub fn group_rows(keys: &[Option<String>]) -> BTreeMap<String, Vec<usize>> {
    let mut grouped: BTreeMap<String, Vec<usize>> = BTreeMap::new();

    for (row, key) in keys.iter().enumerate() {
        let key = key.as_deref().unwrap_or(MISSING_GROUP);
        grouped.entry(key.to_string()).or_default().push(row);
    }

    grouped
}

/// `numerator / denominator * 100`, or `None` when the denominator is zero.
pub fn percentage(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        None
    } else {
        Some(numerator / denominator * 100.0)
    }
}
