use chrono::TimeDelta;

/// Format a job duration as `MM:SS`.
///
/// Minutes are zero-padded to two digits but not capped, so a job that ran
/// for two hours renders as `"120:00"`. Negative durations are clamped to
/// zero.
///
/// # Examples
///
/// ```
/// use chrono::TimeDelta;
/// use monitor_core::formatting::format_duration;
///
/// assert_eq!(format_duration(TimeDelta::seconds(33)), "00:33");
/// assert_eq!(format_duration(TimeDelta::seconds(743)), "12:23");
/// assert_eq!(format_duration(TimeDelta::hours(2)), "120:00");
/// ```
pub fn format_duration(duration: TimeDelta) -> String {
    let total_secs = duration.num_seconds().max(0);
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

/// Format a threshold as a whole number of minutes, e.g. `"5 min"`.
///
/// # Examples
///
/// ```
/// use chrono::TimeDelta;
/// use monitor_core::formatting::format_minutes;
///
/// assert_eq!(format_minutes(TimeDelta::minutes(10)), "10 min");
/// ```
pub fn format_minutes(duration: TimeDelta) -> String {
    format!("{} min", duration.num_minutes())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration_zero() {
        assert_eq!(format_duration(TimeDelta::zero()), "00:00");
    }

    #[test]
    fn test_format_duration_under_a_minute() {
        assert_eq!(format_duration(TimeDelta::seconds(7)), "00:07");
    }

    #[test]
    fn test_format_duration_minutes_and_seconds() {
        assert_eq!(format_duration(TimeDelta::seconds(14 * 60 + 46)), "14:46");
    }

    #[test]
    fn test_format_duration_exceeds_hour() {
        assert_eq!(format_duration(TimeDelta::seconds(100 * 60 + 5)), "100:05");
    }

    #[test]
    fn test_format_duration_negative_clamped() {
        assert_eq!(format_duration(TimeDelta::seconds(-30)), "00:00");
    }

    #[test]
    fn test_format_minutes_truncates_seconds() {
        assert_eq!(format_minutes(TimeDelta::seconds(5 * 60 + 59)), "5 min");
    }
}
