//! Plain-text summary report.

use monitor_core::models::{AnalysisState, JobAnalysis, JobExecution};
use monitor_data::analysis::AnalysisSummary;
use unicode_width::UnicodeWidthStr;

/// Width of the `=` banners and `-` section rules.
const RULE_WIDTH: usize = 128;

/// Render analyses as the human-readable report.
///
/// Layout: banner, per-state counts of completed jobs in OK, WARNING,
/// FAULTY order, the total completed count, the reasons of dangling
/// entries (when any), then one section per non-empty state listing its
/// jobs.
pub fn render_text(analyses: &[JobAnalysis]) -> String {
    let summary = AnalysisSummary::from_analyses(analyses);
    let banner = "=".repeat(RULE_WIDTH);
    let rule = "-".repeat(RULE_WIDTH);

    let mut out = String::new();
    out.push_str(&format!("\n{banner}\nLOG MONITORING REPORT\n{banner}\n\n"));

    // ── Summary ───────────────────────────────────────────────────────────────
    out.push_str("Jobs summary\n");
    for state in AnalysisState::ALL {
        out.push_str(&format!("   + {} {}\n", summary.count(state), state));
    }
    out.push_str(&format!(
        "A total of {} jobs completed\n\n",
        summary.completed
    ));

    // ── Dangling entries ──────────────────────────────────────────────────────
    let dangling: Vec<&str> = analyses
        .iter()
        .filter(|a| a.has_dangling_entry())
        .filter_map(|a| a.reason())
        .collect();
    if !dangling.is_empty() {
        out.push_str("Dangling entries:\n");
        for reason in dangling {
            out.push_str(&format!(" - {reason}\n"));
        }
        out.push('\n');
    }

    // ── Per-state job listings ────────────────────────────────────────────────
    let description_width = analyses
        .iter()
        .filter_map(JobAnalysis::execution)
        .map(|e| e.description().width())
        .max()
        .unwrap_or(0);

    for state in AnalysisState::ALL {
        let jobs: Vec<&JobAnalysis> = analyses
            .iter()
            .filter(|a| a.has_execution() && a.state() == state)
            .collect();
        if jobs.is_empty() {
            continue;
        }

        out.push_str(&format!("{rule}\n{state} jobs:\n{rule}\n"));
        for analysis in jobs {
            if let Some(execution) = analysis.execution() {
                out.push_str(&job_row(execution, analysis.reason(), description_width));
                out.push('\n');
            }
        }
        out.push('\n');
    }

    out.push_str(&banner);
    out.push('\n');
    out
}

/// One aligned line describing a completed job.
fn job_row(execution: &JobExecution, reason: Option<&str>, description_width: usize) -> String {
    let mut row = format!(
        "PID {:>7}  {}  {} -> {}  {}",
        execution.pid(),
        pad_to_width(execution.description(), description_width),
        execution.start_time().format("%H:%M:%S"),
        execution.end_time().format("%H:%M:%S"),
        execution.formatted_duration()
    );
    if let Some(reason) = reason {
        row.push_str("  ");
        row.push_str(reason);
    }
    row
}

/// Right-pad `s` with spaces to `width` terminal columns.
fn pad_to_width(s: &str, width: usize) -> String {
    let padding = width.saturating_sub(s.width());
    format!("{s}{}", " ".repeat(padding))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use monitor_core::models::{EntryStatus, LogEntry};

    fn at(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    fn execution(desc: &str, pid: u32, from: NaiveTime, to: NaiveTime) -> JobExecution {
        JobExecution::new(
            LogEntry::new(from, desc, EntryStatus::Start, pid),
            LogEntry::new(to, desc, EntryStatus::End, pid),
        )
        .unwrap()
    }

    #[test]
    fn test_render_empty_report() {
        let report = render_text(&[]);
        assert!(report.contains("LOG MONITORING REPORT"));
        assert!(report.contains("   + 0 OK\n   + 0 WARNING\n   + 0 FAULTY\n"));
        assert!(report.contains("A total of 0 jobs completed"));
        assert!(!report.contains("Dangling entries:"));
        assert!(!report.contains("jobs:\n"));
    }

    #[test]
    fn test_render_groups_by_state_in_fixed_order() {
        let analyses = vec![
            JobAnalysis::faulty(
                execution("slow job", 3, at(11, 0, 0), at(11, 15, 0)),
                "Exceeded fault threshold (10 min) with duration 15:00",
            ),
            JobAnalysis::completed(execution("quick job", 1, at(11, 0, 0), at(11, 0, 33))),
        ];

        let report = render_text(&analyses);
        let ok_at = report.find("OK jobs:").unwrap();
        let faulty_at = report.find("FAULTY jobs:").unwrap();
        assert!(ok_at < faulty_at);
        assert!(!report.contains("WARNING jobs:"));
        assert!(report.contains("   + 1 OK\n   + 0 WARNING\n   + 1 FAULTY\n"));
        assert!(report.contains("A total of 2 jobs completed"));
        assert!(report.contains("Exceeded fault threshold (10 min) with duration 15:00"));
    }

    #[test]
    fn test_render_lists_dangling_reasons_separately() {
        let entry = LogEntry::new(at(11, 0, 0), "orphan", EntryStatus::Start, 9);
        let analyses = vec![
            JobAnalysis::completed(execution("job", 1, at(10, 0, 0), at(10, 1, 0))),
            JobAnalysis::dangling(entry, "START event without matching END for PID 9"),
        ];

        let report = render_text(&analyses);
        assert!(report.contains("Dangling entries:\n - START event without matching END for PID 9\n"));
        assert!(report.contains("A total of 1 jobs completed"));
        assert!(report.contains("   + 0 FAULTY\n"));
    }

    #[test]
    fn test_render_banners_are_full_width() {
        let report = render_text(&[]);
        assert!(report.starts_with(&format!("\n{}\n", "=".repeat(RULE_WIDTH))));
        assert!(report.ends_with(&format!("{}\n", "=".repeat(RULE_WIDTH))));
    }

    #[test]
    fn test_job_row_aligns_descriptions() {
        let short = job_row(&execution("ab", 1, at(1, 0, 0), at(1, 0, 5)), None, 6);
        let long = job_row(&execution("abcdef", 2, at(1, 0, 0), at(1, 0, 5)), None, 6);
        assert_eq!(short.find("01:00:00"), long.find("01:00:00"));
        assert_eq!(short, "PID       1  ab      01:00:00 -> 01:00:05  00:05");
    }

    #[test]
    fn test_job_row_appends_reason() {
        let row = job_row(
            &execution("ab", 1, at(1, 0, 0), at(1, 6, 0)),
            Some("Exceeded warning threshold (5 min) with duration 06:00"),
            2,
        );
        assert_eq!(
            row,
            "PID       1  ab  01:00:00 -> 01:06:00  06:00  Exceeded warning threshold (5 min) with duration 06:00"
        );
    }

    #[test]
    fn test_pad_to_width_uses_display_width() {
        // Each CJK character occupies two columns.
        assert_eq!(pad_to_width("日本", 6), "日本  ");
        assert_eq!(pad_to_width("toolong", 3), "toolong");
    }
}
