//! Report rendering for the job monitor.
//!
//! Turns the analyses produced by the correlation engine into either the
//! plain-text summary report or a JSON document. Rendering is purely
//! presentational.

pub mod json;
pub mod text;

use std::fmt;
use std::str::FromStr;

use monitor_core::error::{MonitorError, Result};
use monitor_data::analysis::AnalysisResult;

/// Output format of the rendered report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for ReportFormat {
    type Err = MonitorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            other => Err(MonitorError::Config(format!(
                "unknown report format: {other}"
            ))),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Text => f.write_str("text"),
            ReportFormat::Json => f.write_str("json"),
        }
    }
}

/// Render `result` in the requested format.
pub fn render(format: ReportFormat, result: &AnalysisResult) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(text::render_text(&result.analyses)),
        ReportFormat::Json => json::render_json(&result.analyses, Some(&result.metadata)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_format_parse() {
        assert_eq!("text".parse::<ReportFormat>().unwrap(), ReportFormat::Text);
        assert_eq!("JSON".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert!("xml".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn test_report_format_display_round_trips() {
        for format in [ReportFormat::Text, ReportFormat::Json] {
            assert_eq!(format.to_string().parse::<ReportFormat>().unwrap(), format);
        }
    }
}
