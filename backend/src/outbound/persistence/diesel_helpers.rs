//! Conversions between pagination values and SQL integers.

use pagination::Window;

/// Offset and limit for a pagination window as SQL `BIGINT`s.
pub(crate) fn window_bounds(window: Window) -> (i64, i64) {
    let offset = i64::try_from(window.offset()).unwrap_or(i64::MAX);
    let limit = i64::try_from(window.limit()).unwrap_or(i64::MAX);
    (offset, limit)
}

/// Convert a `COUNT(*)` result into a row count.
pub(crate) fn count_to_usize(count: i64) -> usize {
    usize::try_from(count).unwrap_or_default()
}
