//! Formatting helpers for command output.
//!
//! - [`format_count`] - Format counts with K/M/G suffix (1.5K, 2.3M)
//! - [`format_reduction`] - Describe how much a list shrank

/// Format a count with K/M/G suffix for compact display.
///
/// # Examples
/// ```
/// use rangehammer::utils::format_count;
/// assert_eq!(format_count(500), "500");
/// assert_eq!(format_count(1500), "1.5K");
/// assert_eq!(format_count(1_500_000), "1.5M");
/// assert_eq!(format_count(1u64 << 32), "4.3G");
/// ```
pub fn format_count(count: u64) -> String {
    if count >= 1_000_000_000 {
        format!("{:.1}G", count as f64 / 1_000_000_000.0)
    } else if count >= 1_000_000 {
        format!("{:.1}M", count as f64 / 1_000_000.0)
    } else if count >= 1_000 {
        format!("{:.1}K", count as f64 / 1_000.0)
    } else {
        count.to_string()
    }
}

/// Describe the shrink from `before` to `after` entries.
///
/// # Examples
/// ```
/// use rangehammer::utils::format_reduction;
/// assert_eq!(format_reduction(200, 50), "200 -> 50 (-75.0%)");
/// assert_eq!(format_reduction(0, 0), "0 -> 0");
/// ```
pub fn format_reduction(before: usize, after: usize) -> String {
    if before == 0 {
        return format!("{} -> {}", before, after);
    }
    let change = (after as f64 - before as f64) / before as f64 * 100.0;
    format!("{} -> {} ({:+.1}%)", before, after, change)
}
