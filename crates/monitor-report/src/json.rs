//! JSON report for machine consumption.

use monitor_core::error::Result;
use monitor_core::models::JobAnalysis;
use monitor_data::analysis::{AnalysisMetadata, AnalysisSummary};
use serde::Serialize;

#[derive(Serialize)]
struct JsonReport<'a> {
    summary: AnalysisSummary,
    jobs: Vec<&'a JobAnalysis>,
    dangling: Vec<&'a JobAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<&'a AnalysisMetadata>,
}

/// Render analyses as a pretty-printed JSON document with `summary`, `jobs`
/// (completed executions) and `dangling` sections.
pub fn render_json(
    analyses: &[JobAnalysis],
    metadata: Option<&AnalysisMetadata>,
) -> Result<String> {
    let (jobs, dangling): (Vec<&JobAnalysis>, Vec<&JobAnalysis>) =
        analyses.iter().partition(|a| a.has_execution());

    let report = JsonReport {
        summary: AnalysisSummary::from_analyses(analyses),
        jobs,
        dangling,
        metadata,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use monitor_core::models::{EntryStatus, JobExecution, LogEntry};

    fn at(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn test_render_json_sections() {
        let execution = JobExecution::new(
            LogEntry::new(at(11, 0, 0), "job", EntryStatus::Start, 1),
            LogEntry::new(at(11, 6, 0), "job", EntryStatus::End, 1),
        )
        .unwrap();
        let analyses = vec![
            JobAnalysis::warning(execution, "slow"),
            JobAnalysis::dangling(
                LogEntry::new(at(12, 0, 0), "lost", EntryStatus::End, 2),
                "END event without matching START",
            ),
        ];

        let json = render_json(&analyses, None).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["summary"]["warning"], 1);
        assert_eq!(value["summary"]["completed"], 1);
        assert_eq!(value["summary"]["dangling"], 1);
        assert_eq!(value["jobs"][0]["kind"], "warning");
        assert_eq!(value["jobs"][0]["execution"]["duration_seconds"], 360);
        assert_eq!(value["jobs"][0]["reason"], "slow");
        assert_eq!(value["dangling"][0]["entry"]["pid"], 2);
        assert!(value.get("metadata").is_none());
    }

    #[test]
    fn test_render_json_empty() {
        let json = render_json(&[], None).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["jobs"].as_array().unwrap().len(), 0);
        assert_eq!(value["dangling"].as_array().unwrap().len(), 0);
    }
}
