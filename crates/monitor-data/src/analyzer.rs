//! START/END correlation engine.
//!
//! Pairs log entries by PID into [`JobExecution`]s, classifies each one
//! against the configured duration thresholds and reports every entry that
//! could not be paired as a dangling [`JobAnalysis`].

use std::collections::HashMap;

use monitor_core::formatting::format_minutes;
use monitor_core::models::{JobAnalysis, JobExecution, LogEntry};
use monitor_core::settings::MonitorConfig;
use tracing::{debug, warn};

/// A START waiting for its END, tagged with its position among the STARTs.
struct PendingStart<'a> {
    order: usize,
    entry: &'a LogEntry,
}

// ── JobMonitor ────────────────────────────────────────────────────────────────

/// Correlates job lifecycle events and classifies completed jobs.
#[derive(Debug, Clone, Default)]
pub struct JobMonitor {
    config: MonitorConfig,
}

impl JobMonitor {
    pub fn new(config: MonitorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Analyse a chronologically ordered sequence of log entries.
    ///
    /// The algorithm:
    /// 1. STARTs are registered per PID in input order. A START for a PID
    ///    that already has a pending START is reported as dangling and then
    ///    replaces the pending one, so a later END pairs with the newer START.
    /// 2. ENDs are matched in input order. An END without a pending START, or
    ///    whose description differs from the pending START, is dangling.
    ///    A match yields a classified execution and clears the PID.
    /// 3. STARTs still pending afterwards are dangling, reported in input
    ///    order.
    ///
    /// Never fails: every anomaly becomes a dangling analysis.
    pub fn process(&self, entries: &[LogEntry]) -> Vec<JobAnalysis> {
        if entries.is_empty() {
            return Vec::new();
        }

        let (starts, ends): (Vec<&LogEntry>, Vec<&LogEntry>) =
            entries.iter().partition(|entry| entry.is_start());

        let mut analyses: Vec<JobAnalysis> = Vec::with_capacity(ends.len());
        let mut pending: HashMap<u32, PendingStart<'_>> = HashMap::new();

        // ── Step 1: register STARTs ───────────────────────────────────────────
        for (order, entry) in starts.into_iter().enumerate() {
            if let Some(previous) = pending.get(&entry.pid) {
                let reason = format!(
                    "Duplicate START event for PID {} ({}) at {}. Previous START was at {}.",
                    entry.pid,
                    entry.description,
                    entry.timestamp,
                    previous.entry.timestamp
                );
                warn!("{reason}");
                analyses.push(JobAnalysis::dangling(entry.clone(), reason));
            }
            pending.insert(entry.pid, PendingStart { order, entry });
        }

        // ── Step 2: match ENDs ────────────────────────────────────────────────
        for entry in ends {
            let Some(start) = pending.get(&entry.pid) else {
                let reason = format!(
                    "END event without matching START for PID {} ({}) at {}",
                    entry.pid, entry.description, entry.timestamp
                );
                warn!("{reason}");
                analyses.push(JobAnalysis::dangling(entry.clone(), reason));
                continue;
            };

            match JobExecution::new(start.entry.clone(), entry.clone()) {
                Ok(execution) => {
                    debug!("Matched {execution}");
                    pending.remove(&entry.pid);
                    analyses.push(self.classify(execution));
                }
                Err(e) => {
                    let reason = format!(
                        "END event for PID {} ({}) at {} does not match pending START: {}",
                        entry.pid, entry.description, entry.timestamp, e
                    );
                    warn!("{reason}");
                    analyses.push(JobAnalysis::dangling(entry.clone(), reason));
                }
            }
        }

        // ── Step 3: unmatched STARTs ──────────────────────────────────────────
        let mut unmatched: Vec<PendingStart<'_>> = pending.into_values().collect();
        unmatched.sort_by_key(|start| start.order);
        for PendingStart { entry, .. } in unmatched {
            let reason = format!(
                "START event without matching END for PID {} ({}) at {}",
                entry.pid, entry.description, entry.timestamp
            );
            warn!("{reason}");
            analyses.push(JobAnalysis::dangling(entry.clone(), reason));
        }

        debug!(
            "JobMonitor: produced {} analyses from {} entries",
            analyses.len(),
            entries.len()
        );
        analyses
    }

    /// Classify a completed execution by its duration.
    ///
    /// Thresholds are exclusive: a duration equal to a threshold does not
    /// exceed it.
    pub fn classify(&self, execution: JobExecution) -> JobAnalysis {
        let duration = execution.duration();

        if duration > self.config.fault_threshold() {
            let reason = format!(
                "Exceeded fault threshold ({}) with duration {}",
                format_minutes(self.config.fault_threshold()),
                execution.formatted_duration()
            );
            return JobAnalysis::faulty(execution, reason);
        }

        if duration > self.config.warning_threshold() {
            let reason = format!(
                "Exceeded warning threshold ({}) with duration {}",
                format_minutes(self.config.warning_threshold()),
                execution.formatted_duration()
            );
            return JobAnalysis::warning(execution, reason);
        }

        JobAnalysis::completed(execution)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
