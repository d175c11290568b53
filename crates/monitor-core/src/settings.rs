use chrono::TimeDelta;
use clap::Parser;
use std::path::PathBuf;

use crate::error::{MonitorError, Result};

/// Default duration after which a job is reported as WARNING.
pub const DEFAULT_WARNING_THRESHOLD_MINUTES: u64 = 5;
/// Default duration after which a job is reported as FAULTY.
pub const DEFAULT_FAULT_THRESHOLD_MINUTES: u64 = 10;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Analyse job START/END logs and report slow, failed and dangling jobs
#[derive(Parser, Debug, Clone)]
#[command(
    name = "job-monitor",
    about = "Analyse job START/END logs and report slow, failed and dangling jobs",
    version
)]
pub struct Settings {
    /// Log files (or directories of .log/.csv files) to analyse
    #[arg(required = true, value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Minutes after which a job is reported as WARNING
    #[arg(
        long,
        env = "JOB_MONITOR_WARNING_THRESHOLD_MINUTES",
        default_value_t = DEFAULT_WARNING_THRESHOLD_MINUTES
    )]
    pub warning_threshold_minutes: u64,

    /// Minutes after which a job is reported as FAULTY
    #[arg(
        long,
        env = "JOB_MONITOR_FAULT_THRESHOLD_MINUTES",
        default_value_t = DEFAULT_FAULT_THRESHOLD_MINUTES
    )]
    pub fault_threshold_minutes: u64,

    /// Field delimiter used in the log files
    #[arg(long, default_value_t = ',')]
    pub delimiter: char,

    /// chrono format string of the timestamp field
    #[arg(long, default_value = "%H:%M:%S")]
    pub time_format: String,

    /// Report output format
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Logging level
    #[arg(
        long,
        env = "JOB_MONITOR_LOG_LEVEL",
        default_value = "INFO",
        value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"]
    )]
    pub log_level: String,

    /// Log file path (logs go to stderr when absent)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse the process arguments and apply the `--debug` override.
    pub fn load() -> Self {
        Self::resolve(Settings::parse())
    }

    /// Same as [`Settings::load`] but from an explicit argument list.
    pub fn load_from<I, T>(args: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Settings::try_parse_from(args).map(Self::resolve)
    }

    fn resolve(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// Build the threshold configuration handed to the monitor.
    pub fn monitor_config(&self) -> Result<MonitorConfig> {
        MonitorConfig::from_minutes(self.warning_threshold_minutes, self.fault_threshold_minutes)
    }
}

// ── MonitorConfig ──────────────────────────────────────────────────────────────

/// Duration thresholds used to classify completed jobs.
///
/// A job is WARNING when its duration is strictly greater than `warning`,
/// and FAULTY when strictly greater than `fault`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorConfig {
    warning_threshold: TimeDelta,
    fault_threshold: TimeDelta,
}

impl MonitorConfig {
    /// Validate and build a configuration; `warning` must be below `fault`
    /// and neither may be negative.
    pub fn new(warning_threshold: TimeDelta, fault_threshold: TimeDelta) -> Result<Self> {
        if warning_threshold < TimeDelta::zero() || fault_threshold < TimeDelta::zero() {
            return Err(MonitorError::Config(
                "thresholds must not be negative".to_string(),
            ));
        }
        if warning_threshold >= fault_threshold {
            return Err(MonitorError::Config(format!(
                "warning threshold ({} min) must be lower than fault threshold ({} min)",
                warning_threshold.num_minutes(),
                fault_threshold.num_minutes()
            )));
        }
        Ok(Self {
            warning_threshold,
            fault_threshold,
        })
    }

    pub fn from_minutes(warning_minutes: u64, fault_minutes: u64) -> Result<Self> {
        Self::new(minutes(warning_minutes)?, minutes(fault_minutes)?)
    }

    pub fn warning_threshold(&self) -> TimeDelta {
        self.warning_threshold
    }

    pub fn fault_threshold(&self) -> TimeDelta {
        self.fault_threshold
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            warning_threshold: TimeDelta::minutes(DEFAULT_WARNING_THRESHOLD_MINUTES as i64),
            fault_threshold: TimeDelta::minutes(DEFAULT_FAULT_THRESHOLD_MINUTES as i64),
        }
    }
}

fn minutes(value: u64) -> Result<TimeDelta> {
    i64::try_from(value)
        .ok()
        .and_then(TimeDelta::try_minutes)
        .ok_or_else(|| MonitorError::Config(format!("threshold of {value} minutes is out of range")))
}

// ── Tests ──────────────────────────────────────────────────────────────────────
