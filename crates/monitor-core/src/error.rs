use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the job monitor.
#[derive(Error, Debug)]
pub enum MonitorError {
    /// A log file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// One or more input paths given on the command line do not exist.
    #[error("Log file(s) not found: {}", join_paths(.0))]
    FilesNotFound(Vec<PathBuf>),

    /// A START/END pair violated the job execution invariants.
    #[error("Invalid job execution: {0}")]
    InvalidExecution(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A JSON report could not be serialised.
    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the monitor crates.
pub type Result<T> = std::result::Result<T, MonitorError>;

/// Reasons a single log line is rejected by the CSV parser.
///
/// These are always recovered from: the offending line is skipped and the
/// rest of the file is still read.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Line is empty")]
    EmptyLine,

    #[error("Expected {expected} fields but found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("Invalid timestamp format: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid status '{0}'. Expected START or END")]
    InvalidStatus(String),

    #[error("Invalid PID format: {0}")]
    InvalidPid(String),
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = MonitorError::FileRead {
            path: PathBuf::from("/var/log/jobs.log"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/var/log/jobs.log"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_error_display_files_not_found_lists_every_path() {
        let err = MonitorError::FilesNotFound(vec![
            PathBuf::from("a.log"),
            PathBuf::from("missing/b.log"),
        ]);
        assert_eq!(err.to_string(), "Log file(s) not found: a.log, missing/b.log");
    }

    #[test]
    fn test_error_display_invalid_execution() {
        let err = MonitorError::InvalidExecution("PID mismatch".to_string());
        assert_eq!(err.to_string(), "Invalid job execution: PID mismatch");
    }

    #[test]
    fn test_error_display_config() {
        let err = MonitorError::Config("bad threshold".to_string());
        assert_eq!(err.to_string(), "Configuration error: bad threshold");
    }

    #[test]
    fn test_parse_error_display() {
        assert_eq!(
            ParseError::FieldCount {
                expected: 4,
                found: 3
            }
            .to_string(),
            "Expected 4 fields but found 3"
        );
        assert_eq!(
            ParseError::InvalidStatus("RUNNING".to_string()).to_string(),
            "Invalid status 'RUNNING'. Expected START or END"
        );
        assert_eq!(
            ParseError::InvalidPid("abc".to_string()).to_string(),
            "Invalid PID format: abc"
        );
    }
}
