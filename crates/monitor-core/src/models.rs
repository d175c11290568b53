use chrono::{NaiveTime, TimeDelta};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{MonitorError, ParseError, Result};
use crate::formatting::format_duration;

// ── EntryStatus ───────────────────────────────────────────────────────────────

/// Lifecycle event recorded by a single log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntryStatus {
    /// The job identified by the PID started.
    Start,
    /// The job identified by the PID finished.
    End,
}

impl FromStr for EntryStatus {
    type Err = ParseError;

    /// Case-insensitive, surrounding whitespace is ignored.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        match upper.as_str() {
            "START" => Ok(EntryStatus::Start),
            "END" => Ok(EntryStatus::End),
            _ => Err(ParseError::InvalidStatus(upper)),
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryStatus::Start => f.write_str("START"),
            EntryStatus::End => f.write_str("END"),
        }
    }
}

// ── LogEntry ──────────────────────────────────────────────────────────────────

/// A single parsed event from a job log file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    /// Wall-clock time of day the event was written; logs carry no date.
    pub timestamp: NaiveTime,
    /// Free-text job description.
    pub description: String,
    /// Whether the job started or ended.
    pub status: EntryStatus,
    /// Process identifier used to correlate START and END events.
    pub pid: u32,
}

impl LogEntry {
    pub fn new(
        timestamp: NaiveTime,
        description: impl Into<String>,
        status: EntryStatus,
        pid: u32,
    ) -> Self {
        Self {
            timestamp,
            description: description.into(),
            status,
            pid,
        }
    }

    pub fn is_start(&self) -> bool {
        self.status == EntryStatus::Start
    }

    pub fn is_end(&self) -> bool {
        self.status == EntryStatus::End
    }
}

impl fmt::Display for LogEntry {
    /// Renders the entry back in its on-disk CSV shape.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.timestamp.format("%H:%M:%S"),
            self.description,
            self.status,
            self.pid
        )
    }
}

// ── JobExecution ──────────────────────────────────────────────────────────────

/// A completed job: a START entry paired with the matching END entry.
///
/// Fields are private so the pairing invariants checked in
/// [`JobExecution::new`] hold for every value in circulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobExecution {
    start: LogEntry,
    end: LogEntry,
    #[serde(rename = "duration_seconds", serialize_with = "serialize_seconds")]
    duration: TimeDelta,
}

impl JobExecution {
    /// Pair `start` and `end` into an execution and compute its duration.
    ///
    /// Fails with [`MonitorError::InvalidExecution`] unless `start` is a START
    /// entry, `end` is an END entry, and both share the same PID and job
    /// description.
    ///
    /// When the end time of day is earlier than the start time the job is
    /// assumed to have crossed midnight and 24 hours are added.
    pub fn new(start: LogEntry, end: LogEntry) -> Result<Self> {
        if !start.is_start() {
            return Err(MonitorError::InvalidExecution(format!(
                "start entry must have START status, but has {}",
                start.status
            )));
        }
        if !end.is_end() {
            return Err(MonitorError::InvalidExecution(format!(
                "end entry must have END status, but has {}",
                end.status
            )));
        }
        if start.pid != end.pid {
            return Err(MonitorError::InvalidExecution(format!(
                "PID mismatch: start entry has PID {}, end entry has PID {}",
                start.pid, end.pid
            )));
        }
        if start.description != end.description {
            return Err(MonitorError::InvalidExecution(format!(
                "job description mismatch: start entry has '{}', end entry has '{}'",
                start.description, end.description
            )));
        }

        let duration = wall_clock_duration(start.timestamp, end.timestamp);
        Ok(Self {
            start,
            end,
            duration,
        })
    }

    pub fn pid(&self) -> u32 {
        self.start.pid
    }

    pub fn description(&self) -> &str {
        &self.start.description
    }

    pub fn start_time(&self) -> NaiveTime {
        self.start.timestamp
    }

    pub fn end_time(&self) -> NaiveTime {
        self.end.timestamp
    }

    /// Elapsed wall-clock time, never negative.
    pub fn duration(&self) -> TimeDelta {
        self.duration
    }

    /// Duration rendered as `MM:SS`.
    pub fn formatted_duration(&self) -> String {
        format_duration(self.duration)
    }
}

impl fmt::Display for JobExecution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PID {} ({}) {} -> {}, duration {}",
            self.pid(),
            self.description(),
            self.start_time().format("%H:%M:%S"),
            self.end_time().format("%H:%M:%S"),
            self.formatted_duration()
        )
    }
}

/// `end - start`, corrected by one day when the interval crosses midnight.
fn wall_clock_duration(start: NaiveTime, end: NaiveTime) -> TimeDelta {
    let delta = end.signed_duration_since(start);
    if delta < TimeDelta::zero() {
        delta + TimeDelta::days(1)
    } else {
        delta
    }
}

fn serialize_seconds<S: Serializer>(
    duration: &TimeDelta,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_i64(duration.num_seconds())
}

// ── AnalysisState ─────────────────────────────────────────────────────────────

/// Classification of an analysed job, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AnalysisState {
    Ok,
    Warning,
    Faulty,
}

impl AnalysisState {
    /// Every state, in reporting order.
    pub const ALL: [AnalysisState; 3] = [
        AnalysisState::Ok,
        AnalysisState::Warning,
        AnalysisState::Faulty,
    ];
}

impl fmt::Display for AnalysisState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisState::Ok => f.write_str("OK"),
            AnalysisState::Warning => f.write_str("WARNING"),
            AnalysisState::Faulty => f.write_str("FAULTY"),
        }
    }
}

// ── JobAnalysis ───────────────────────────────────────────────────────────────

/// Outcome of correlating log entries: either a classified execution or a
/// log entry that could not be paired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum JobAnalysis {
    /// Finished within the warning threshold.
    Completed { execution: JobExecution },
    /// Exceeded the warning threshold but not the fault threshold.
    Warning {
        execution: JobExecution,
        reason: String,
    },
    /// Exceeded the fault threshold.
    Faulty {
        execution: JobExecution,
        reason: String,
    },
    /// A START or END entry without a valid counterpart.
    Dangling { entry: LogEntry, reason: String },
}

impl JobAnalysis {
    pub fn completed(execution: JobExecution) -> Self {
        JobAnalysis::Completed { execution }
    }

    pub fn warning(execution: JobExecution, reason: impl Into<String>) -> Self {
        JobAnalysis::Warning {
            execution,
            reason: reason.into(),
        }
    }

    pub fn faulty(execution: JobExecution, reason: impl Into<String>) -> Self {
        JobAnalysis::Faulty {
            execution,
            reason: reason.into(),
        }
    }

    pub fn dangling(entry: LogEntry, reason: impl Into<String>) -> Self {
        JobAnalysis::Dangling {
            entry,
            reason: reason.into(),
        }
    }

    /// Classification state; dangling entries count as [`AnalysisState::Faulty`].
    pub fn state(&self) -> AnalysisState {
        match self {
            JobAnalysis::Completed { .. } => AnalysisState::Ok,
            JobAnalysis::Warning { .. } => AnalysisState::Warning,
            JobAnalysis::Faulty { .. } | JobAnalysis::Dangling { .. } => AnalysisState::Faulty,
        }
    }

    pub fn execution(&self) -> Option<&JobExecution> {
        match self {
            JobAnalysis::Completed { execution }
            | JobAnalysis::Warning { execution, .. }
            | JobAnalysis::Faulty { execution, .. } => Some(execution),
            JobAnalysis::Dangling { .. } => None,
        }
    }

    pub fn dangling_entry(&self) -> Option<&LogEntry> {
        match self {
            JobAnalysis::Dangling { entry, .. } => Some(entry),
            _ => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            JobAnalysis::Completed { .. } => None,
            JobAnalysis::Warning { reason, .. }
            | JobAnalysis::Faulty { reason, .. }
            | JobAnalysis::Dangling { reason, .. } => Some(reason),
        }
    }

    pub fn has_execution(&self) -> bool {
        self.execution().is_some()
    }

    pub fn has_dangling_entry(&self) -> bool {
        self.dangling_entry().is_some()
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
