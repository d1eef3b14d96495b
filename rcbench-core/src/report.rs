//! Resource-usage report parsing.
//!
//! A measured run is wrapped in `time -v`, which appends a block of
//! `Label: value` lines to the run's output. Four of those lines are
//! extracted here, each by its own search, so a truncated or garbled report
//! still yields whatever fields survived.

use regex::Regex;
use std::sync::LazyLock;

use crate::utils::parse_clock_time;

static ELAPSED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Elapsed \(wall clock\) time \(h:mm:ss or m:ss\):\s*([0-9:.]+)")
        .expect("invalid ELAPSED_RE pattern")
});
static USER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"User time \(seconds\):\s*([0-9.]+)").expect("invalid USER_RE pattern")
});
static SYSTEM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"System time \(seconds\):\s*([0-9.]+)").expect("invalid SYSTEM_RE pattern")
});
static MAXRSS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Maximum resident set size \(kbytes\):\s*([0-9]+)")
        .expect("invalid MAXRSS_RE pattern")
});

/// Figures extracted from one report. Absent fields were not found or did
/// not parse.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResourceUsage {
    /// Wall-clock time in seconds
    pub elapsed_s: Option<f64>,
    /// User CPU time in seconds
    pub user_s: Option<f64>,
    /// System CPU time in seconds
    pub sys_s: Option<f64>,
    /// Peak resident set size in kilobytes
    pub maxrss_kb: Option<u64>,
}

impl ResourceUsage {
    /// Parses a `time -v` report. Never fails; missing fields stay `None`.
    pub fn parse(text: &str) -> Self {
        let usage = Self {
            elapsed_s: capture(&ELAPSED_RE, text).and_then(parse_clock_time),
            user_s: capture(&USER_RE, text).and_then(|v| v.parse().ok()),
            sys_s: capture(&SYSTEM_RE, text).and_then(|v| v.parse().ok()),
            maxrss_kb: capture(&MAXRSS_RE, text).and_then(|v| v.parse().ok()),
        };
        if usage.is_empty() {
            log::debug!("No resource figures found in report ({} bytes)", text.len());
        }
        usage
    }

    /// True when no field could be extracted.
    pub fn is_empty(&self) -> bool {
        self.elapsed_s.is_none()
            && self.user_s.is_none()
            && self.sys_s.is_none()
            && self.maxrss_kb.is_none()
    }
}

fn capture<'t>(re: &Regex, text: &'t str) -> Option<&'t str> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_REPORT: &str = "\
frame=  300 fps=118 q=-1.0 Lsize=     712kB time=00:00:09.96 bitrate= 585.6kbits/s speed=3.93x
\tCommand being timed: \"ffmpeg -y -i traffic_720p30.mp4 -c:v libx264 -qp 30\"
\tUser time (seconds): 9.87
\tSystem time (seconds): 0.41
\tPercent of CPU this job got: 401%
\tElapsed (wall clock) time (h:mm:ss or m:ss): 0:02.56
\tAverage shared text size (kbytes): 0
\tMaximum resident set size (kbytes): 183424
\tExit status: 0
";

    #[test]
    fn test_parse_full_report() {
        let usage = ResourceUsage::parse(FULL_REPORT);
        assert_eq!(usage.elapsed_s, Some(2.56));
        assert_eq!(usage.user_s, Some(9.87));
        assert_eq!(usage.sys_s, Some(0.41));
        assert_eq!(usage.maxrss_kb, Some(183424));
        assert!(!usage.is_empty());
    }

    #[test]
    fn test_parse_elapsed_hours() {
        let usage =
            ResourceUsage::parse("Elapsed (wall clock) time (h:mm:ss or m:ss): 1:02:03.5\n");
        assert_eq!(usage.elapsed_s, Some(3723.5));
    }

    #[test]
    fn test_parse_truncated_report_keeps_found_fields() {
        let usage = ResourceUsage::parse("\tUser time (seconds): 3.00\n\tSystem time (sec");
        assert_eq!(usage.user_s, Some(3.0));
        assert_eq!(usage.sys_s, None);
        assert_eq!(usage.elapsed_s, None);
        assert_eq!(usage.maxrss_kb, None);
    }

    #[test]
    fn test_parse_garbage_is_empty() {
        let usage = ResourceUsage::parse("ffmpeg: command not found\n");
        assert!(usage.is_empty());
    }

    #[test]
    fn test_unparsable_elapsed_is_missing() {
        let usage =
            ResourceUsage::parse("Elapsed (wall clock) time (h:mm:ss or m:ss): 1:2:3:4\n");
        assert_eq!(usage.elapsed_s, None);
    }
}
