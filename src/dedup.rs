use crate::kpoint::{compare_columns, Column, KPoint};

/// Removes duplicate rows from a k-point table.
///
/// Rows are sorted lexicographically over `match_columns`, optionally after
/// rounding each matched column to `decimals` decimal places, and adjacent
/// rows with equal keys are collapsed keeping the first in sorted order. The
/// rounding buckets near-identical points only; the surviving rows keep their
/// original unrounded values. If `sort_by` is given the output is re-sorted
/// by those columns, independently of the deduplication key.
///
/// Deduplicating already-unique data is a no-op, so the operation is
/// idempotent.
pub fn remove_duplicates(
    rows: &[KPoint],
    match_columns: &[Column],
    decimals: Option<i32>,
    sort_by: Option<&[Column]>,
) -> Vec<KPoint> {
    if rows.len() < 2 {
        return rows.to_vec();
    }
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| compare_columns(a, b, match_columns, decimals));
    let mut unique: Vec<KPoint> = Vec::with_capacity(sorted.len());
    for row in sorted {
        match unique.last() {
            Some(last)
                if compare_columns(last, &row, match_columns, decimals)
                    == std::cmp::Ordering::Equal => {}
            _ => unique.push(row),
        }
    }
    if let Some(columns) = sort_by {
        unique.sort_by(|a, b| compare_columns(a, b, columns, None));
    }
    unique
}
