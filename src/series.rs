use crate::utils::round_to;

/// Decimal places used to kill floating noise when looking for the smallest
/// gap in a sampled series. Gaps below this resolution are treated as the
/// same grid position.
const NOISE_DECIMALS: i32 = 9;

/// Infers the parameters of the arithmetic progression `x_n = offset +
/// spacing * n` that best explains an unordered, possibly incomplete multiset
/// of sampled coordinate values.
///
/// The offset is the minimum value. The spacing is the smallest positive gap
/// between consecutive distinct values after sorting, so missing intermediate
/// sample points cannot shrink it and duplicate values cannot zero it. A
/// series with a single distinct value has spacing 0, the degenerate-axis
/// sentinel. Returns None only for an empty slice.
pub fn arithmetic_series(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let mut sorted: Vec<f64> = values.iter().map(|v| round_to(*v, NOISE_DECIMALS)).collect();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted.dedup();
    let offset = sorted[0];
    let mut spacing = 0f64;
    for window in sorted.windows(2) {
        let gap = window[1] - window[0];
        if gap > 0f64 && (spacing == 0f64 || gap < spacing) {
            spacing = gap;
        }
    }
    Some((offset, spacing))
}

/// The number of grid points spanning `[min, max]` at the given spacing.
/// Sampled data may not include every grid position, so the count comes from
/// the numeric span rather than from the number of samples present.
pub fn series_len(min: f64, max: f64, spacing: f64) -> usize {
    if spacing == 0f64 {
        1
    } else {
        ((max - min) / spacing).round() as usize + 1
    }
}
