//! Utility functions for formatting, parsing and naming.
//!
//! This module provides general-purpose helpers used throughout the
//! rcbench-core library: clock-time parsing, numeric rounding and cell
//! formatting for the CSV stores, filename-safe variant names and timestamps.

/// Formats seconds as HH:MM:SS (e.g., 3725.0 -> "01:02:05"). Returns "??:??:??" for invalid inputs.
#[must_use]
pub fn format_duration(seconds: f64) -> String {
    if seconds < 0.0 || !seconds.is_finite() {
        return "??:??:??".to_string();
    }

    let total_seconds = seconds as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// Parses `H:MM:SS`, `M:SS` or bare seconds into seconds. Returns None if invalid.
///
/// Fields are interpreted positionally from the right, so `1:02.5` is one
/// minute and 2.5 seconds.
#[must_use]
pub fn parse_clock_time(time: &str) -> Option<f64> {
    let parts: Vec<&str> = time.trim().split(':').collect();
    match parts.as_slice() {
        [h, m, s] => {
            let hours = h.parse::<u64>().ok()? as f64;
            let minutes = m.parse::<u64>().ok()? as f64;
            let seconds = s.parse::<f64>().ok()?;
            Some(hours * 3600.0 + minutes * 60.0 + seconds)
        }
        [m, s] => {
            let minutes = m.parse::<u64>().ok()? as f64;
            let seconds = s.parse::<f64>().ok()?;
            Some(minutes * 60.0 + seconds)
        }
        [s] => s.parse::<f64>().ok(),
        _ => None,
    }
}

/// Rounds to `decimals` places.
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Renders an optional value as a CSV cell: empty when missing.
#[must_use]
pub fn format_cell(value: Option<f64>, decimals: i32) -> String {
    value.map(|v| round_to(v, decimals).to_string()).unwrap_or_default()
}

/// Makes a variant display name safe for use in a filename.
#[must_use]
pub fn sanitize_name(name: &str) -> String {
    name.replace([' ', '/'], "_")
}

/// Current local time as ISO-8601 with microseconds, used for row timestamps.
pub fn iso_timestamp() -> String {
    chrono::Local::now()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS".
pub fn file_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.0), "00:00:00");
        assert_eq!(format_duration(59.9), "00:00:59");
        assert_eq!(format_duration(3661.0), "01:01:01");
        assert_eq!(format_duration(-1.0), "??:??:??");
        assert_eq!(format_duration(f64::NAN), "??:??:??");
    }

    #[test]
    fn test_parse_clock_time() {
        assert_eq!(parse_clock_time("1:02:03"), Some(3723.0));
        assert_eq!(parse_clock_time("0:02.56"), Some(2.56));
        assert_eq!(parse_clock_time("12:30"), Some(750.0));
        assert_eq!(parse_clock_time("42.5"), Some(42.5));
        assert_eq!(parse_clock_time("0:00:30.00"), Some(30.0));

        assert_eq!(parse_clock_time(""), None);
        assert_eq!(parse_clock_time("1:2:3:4"), None);
        assert_eq!(parse_clock_time("a:30"), None);
        assert_eq!(parse_clock_time("1.5:30"), None);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(108.50694444444, 6), 108.506944);
        assert_eq!(round_to(29.97002997, 3), 29.97);
        assert_eq!(round_to(2.0, 6), 2.0);
    }

    #[test]
    fn test_format_cell() {
        assert_eq!(format_cell(None, 6), "");
        assert_eq!(format_cell(Some(100.0), 6), "100");
        assert_eq!(format_cell(Some(162.760416666), 6), "162.760417");
        assert_eq!(format_cell(Some(0.0), 6), "0");
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("CABAC + dia + p16x16"), "CABAC_+_dia_+_p16x16");
        assert_eq!(sanitize_name("a/b c"), "a_b_c");
    }

    #[test]
    fn test_timestamps_have_expected_shape() {
        assert_eq!(file_timestamp().len(), "20240601_123045".len());
        assert!(iso_timestamp().contains('T'));
    }
}
