mod bootstrap;

use std::process::ExitCode;

use anyhow::{Context, Result};
use monitor_core::error::MonitorError;
use monitor_core::settings::Settings;
use monitor_data::analysis::analyze_files;
use monitor_data::reader::{resolve_log_paths, CsvLogParser};
use monitor_report::{render, ReportFormat};

fn main() -> ExitCode {
    // Exits with a usage error when no input path is given.
    let settings = Settings::load();

    if let Err(e) = bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref()) {
        eprintln!("{e:#}");
        return ExitCode::FAILURE;
    }

    tracing::info!("Job Monitor v{} starting", env!("CARGO_PKG_VERSION"));

    match run(&settings) {
        Ok(report) => {
            print!("{report}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            match e.downcast_ref::<MonitorError>() {
                Some(MonitorError::FilesNotFound(_)) => tracing::error!("Aborting, {e}"),
                _ => tracing::error!("Unexpected error occurred: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

/// Validate inputs, analyse every log file and render the report.
fn run(settings: &Settings) -> Result<String> {
    let config = settings.monitor_config()?;
    let format: ReportFormat = settings.format.parse()?;
    tracing::info!(
        "Thresholds: warning {} min, fault {} min",
        config.warning_threshold().num_minutes(),
        config.fault_threshold().num_minutes()
    );

    let files = resolve_log_paths(&settings.paths)?;
    let parser = CsvLogParser::new(settings.delimiter, settings.time_format.clone());
    let result = analyze_files(&files, &parser, config)?;

    render(format, &result).context("Failed to render report")
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn settings_for(args: &[&str]) -> Settings {
        let mut full = vec!["job-monitor"];
        full.extend_from_slice(args);
        Settings::load_from(full).expect("valid arguments")
    }

    #[test]
    fn test_run_renders_text_report() {
        let tmp = TempDir::new().expect("tempdir");
        let log = tmp.path().join("jobs.log");
        std::fs::write(
            &log,
            "11:35:23,scheduled task 032, START,37980\n\
             11:35:56,scheduled task 032, END,37980\n\
             11:36:58,background job wmy, START,81258\n\
             11:51:44,background job wmy, END,81258\n",
        )
        .expect("write log");

        let report = run(&settings_for(&[log.to_str().unwrap()])).expect("run");

        assert!(report.contains("   + 1 OK\n   + 0 WARNING\n   + 1 FAULTY\n"));
        assert!(report.contains("A total of 2 jobs completed"));
        assert!(report.contains("Exceeded fault threshold (10 min) with duration 14:46"));
    }

    #[test]
    fn test_run_renders_json_report() {
        let tmp = TempDir::new().expect("tempdir");
        let log = tmp.path().join("jobs.log");
        std::fs::write(&log, "11:00:00,job, START,1\n").expect("write log");

        let report =
            run(&settings_for(&["--format", "json", log.to_str().unwrap()])).expect("run");

        assert!(report.contains("\"dangling\""));
        assert!(report.contains("START event without matching END"));
    }

    #[test]
    fn test_run_fails_on_missing_file() {
        let tmp = TempDir::new().expect("tempdir");
        let missing = tmp.path().join("missing.log");

        let err = run(&settings_for(&[missing.to_str().unwrap()])).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<MonitorError>(),
            Some(MonitorError::FilesNotFound(_))
        ));
    }

    #[test]
    fn test_run_fails_on_inverted_thresholds() {
        let tmp = TempDir::new().expect("tempdir");
        let log = tmp.path().join("jobs.log");
        std::fs::write(&log, "").expect("write log");

        let err = run(&settings_for(&[
            "--warning-threshold-minutes",
            "20",
            log.to_str().unwrap(),
        ]))
        .unwrap_err();

        assert!(err.to_string().contains("Configuration error"));
    }
}
