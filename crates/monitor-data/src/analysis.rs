//! Main analysis pipeline for the job monitor.
//!
//! Reads every input file, concatenates their entries, runs a single
//! correlation pass and returns an [`AnalysisResult`] ready for rendering.

use std::path::PathBuf;

use chrono::Utc;
use monitor_core::error::Result;
use monitor_core::models::{AnalysisState, JobAnalysis, LogEntry};
use monitor_core::settings::MonitorConfig;
use serde::Serialize;
use tracing::info;

use crate::analyzer::JobMonitor;
use crate::reader::CsvLogParser;

// ── Public types ──────────────────────────────────────────────────────────────

/// Counts of analysed jobs.
///
/// The per-state counts cover completed executions only; dangling entries
/// are counted separately even though their state is FAULTY.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisSummary {
    pub ok: usize,
    pub warning: usize,
    pub faulty: usize,
    /// Executions that were paired successfully, regardless of state.
    pub completed: usize,
    pub dangling: usize,
}

impl AnalysisSummary {
    pub fn from_analyses(analyses: &[JobAnalysis]) -> Self {
        let mut summary = Self::default();
        for analysis in analyses {
            if analysis.has_dangling_entry() {
                summary.dangling += 1;
                continue;
            }
            summary.completed += 1;
            match analysis.state() {
                AnalysisState::Ok => summary.ok += 1,
                AnalysisState::Warning => summary.warning += 1,
                AnalysisState::Faulty => summary.faulty += 1,
            }
        }
        summary
    }

    /// Number of completed executions in `state`.
    pub fn count(&self, state: AnalysisState) -> usize {
        match state {
            AnalysisState::Ok => self.ok,
            AnalysisState::Warning => self.warning,
            AnalysisState::Faulty => self.faulty,
        }
    }
}

/// Metadata produced alongside the analysis result.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisMetadata {
    /// ISO-8601 timestamp when this result was generated.
    pub generated_at: String,
    /// Files read, in the order their entries were concatenated.
    pub files: Vec<PathBuf>,
    /// Total number of [`LogEntry`] records parsed.
    pub entries_parsed: usize,
    /// Malformed lines skipped across all files.
    pub lines_skipped: usize,
    /// Wall-clock seconds spent reading and parsing the files.
    pub load_time_seconds: f64,
}

/// The complete output of [`analyze_files`].
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub analyses: Vec<JobAnalysis>,
    pub summary: AnalysisSummary,
    pub metadata: AnalysisMetadata,
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Run the monitor over already parsed entries.
pub fn analyze_entries(entries: &[LogEntry], config: MonitorConfig) -> Vec<JobAnalysis> {
    JobMonitor::new(config).process(entries)
}

/// Run the full analysis pipeline.
///
/// 1. Read and parse every file in order; a read failure aborts the run.
/// 2. Concatenate all entries so PIDs are correlated across files.
/// 3. Correlate and classify with a [`JobMonitor`].
/// 4. Summarise.
pub fn analyze_files(
    files: &[PathBuf],
    parser: &CsvLogParser,
    config: MonitorConfig,
) -> Result<AnalysisResult> {
    // ── Step 1: Load entries ──────────────────────────────────────────────────
    let load_start = std::time::Instant::now();
    let mut entries: Vec<LogEntry> = Vec::new();
    let mut lines_skipped = 0usize;
    for file in files {
        let parsed = parser.read_file(file)?;
        entries.extend(parsed.entries);
        lines_skipped += parsed.skipped_lines;
    }
    let load_time_seconds = load_start.elapsed().as_secs_f64();

    info!("Parsed {} log entries", entries.len());

    // ── Step 2: Correlate ─────────────────────────────────────────────────────
    let analyses = analyze_entries(&entries, config);
    let summary = AnalysisSummary::from_analyses(&analyses);

    info!(
        "Analysed {} jobs ({} dangling entries)",
        summary.completed, summary.dangling
    );

    Ok(AnalysisResult {
        analyses,
        summary,
        metadata: AnalysisMetadata {
            generated_at: Utc::now().to_rfc3339(),
            files: files.to_vec(),
            entries_parsed: entries.len(),
            lines_skipped,
            load_time_seconds,
        },
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
