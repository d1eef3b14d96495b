//! Robust reduction of repeated measurements.

/// Median of the present values, or `None` if there are none.
///
/// Missing entries are discarded before sorting. An odd count yields the
/// middle element, an even count the mean of the two middle elements.
pub fn median<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let mut sorted: Vec<f64> = values.into_iter().flatten().collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}
