//! CSV job log discovery and parsing.
//!
//! Each line records one lifecycle event in the form
//! `HH:MM:SS,<description>,<START|END>,<pid>` and is converted into a
//! [`LogEntry`] for the correlation engine.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::{NaiveTime, Timelike};
use monitor_core::error::{MonitorError, ParseError, Result};
use monitor_core::models::{EntryStatus, LogEntry};
use tracing::{debug, info, warn};

/// Number of fields every log line must contain.
const FIELD_COUNT: usize = 4;

/// File extensions picked up when a directory is given as input.
const LOG_EXTENSIONS: &[&str] = &["log", "csv"];

// ── ParsedLog ─────────────────────────────────────────────────────────────────

/// Entries parsed from one log source, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedLog {
    pub entries: Vec<LogEntry>,
    /// Non-blank lines that were rejected and skipped.
    pub skipped_lines: usize,
}

// ── CsvLogParser ──────────────────────────────────────────────────────────────

/// Line parser for delimited job logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvLogParser {
    delimiter: char,
    time_format: String,
}

impl Default for CsvLogParser {
    fn default() -> Self {
        Self::new(',', "%H:%M:%S")
    }
}

impl CsvLogParser {
    /// Create a parser with a custom field delimiter and a chrono time format.
    pub fn new(delimiter: char, time_format: impl Into<String>) -> Self {
        Self {
            delimiter,
            time_format: time_format.into(),
        }
    }

    /// Parse a single line into a [`LogEntry`].
    ///
    /// Every field is trimmed. The time must be a real wall-clock time written
    /// exactly as the configured format renders it, so leap seconds and
    /// unpadded fields are rejected. The status is matched case-insensitively
    /// and the PID must be a non-negative integer.
    pub fn parse_line(&self, line: &str) -> std::result::Result<LogEntry, ParseError> {
        if line.trim().is_empty() {
            return Err(ParseError::EmptyLine);
        }

        let parts: Vec<&str> = line.split(self.delimiter).collect();
        if parts.len() != FIELD_COUNT {
            return Err(ParseError::FieldCount {
                expected: FIELD_COUNT,
                found: parts.len(),
            });
        }

        let raw_time = parts[0].trim();
        let timestamp = NaiveTime::parse_from_str(raw_time, &self.time_format)
            .map_err(|_| ParseError::InvalidTimestamp(raw_time.to_string()))?;
        // chrono represents `:60` as a nanosecond overflow
        if timestamp.nanosecond() >= 1_000_000_000
            || timestamp.format(&self.time_format).to_string() != raw_time
        {
            return Err(ParseError::InvalidTimestamp(raw_time.to_string()));
        }

        let status: EntryStatus = parts[2].parse()?;

        let raw_pid = parts[3].trim();
        let pid: u32 = raw_pid
            .parse()
            .map_err(|_| ParseError::InvalidPid(raw_pid.to_string()))?;

        Ok(LogEntry::new(timestamp, parts[1].trim(), status, pid))
    }

    /// Parse a whole log document.
    ///
    /// Blank lines are skipped silently; malformed lines are logged with
    /// their 1-based line number and skipped. `source` only labels the logs.
    pub fn parse_str(&self, content: &str, source: &str) -> ParsedLog {
        let mut parsed = ParsedLog::default();

        for (index, line) in content.lines().enumerate() {
            let line_number = index + 1;
            if line.trim().is_empty() {
                debug!("{source}: skipping empty line {line_number}");
                continue;
            }

            match self.parse_line(line) {
                Ok(entry) => {
                    debug!("{source}: parsed line {line_number}: {entry}");
                    parsed.entries.push(entry);
                }
                Err(e) => {
                    warn!("{source}: failed to parse line {line_number}: {line} - {e}");
                    parsed.skipped_lines += 1;
                }
            }
        }

        parsed
    }

    /// Read and parse one log file.
    ///
    /// Invalid UTF-8 is replaced rather than rejected so that a single bad
    /// byte only affects its own line. Any I/O failure is fatal.
    pub fn read_file(&self, path: &Path) -> Result<ParsedLog> {
        info!("Reading log file: {}", path.display());

        let bytes = std::fs::read(path).map_err(|source| MonitorError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let content = String::from_utf8_lossy(&bytes);
        let parsed = self.parse_str(&content, &path.display().to_string());

        info!(
            "Parsed {} entries from {} ({} lines skipped)",
            parsed.entries.len(),
            path.display(),
            parsed.skipped_lines
        );
        Ok(parsed)
    }
}

// ── Path resolution ───────────────────────────────────────────────────────────

/// Find all `.log` / `.csv` files recursively under `dir`, sorted by path.
pub fn find_log_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| LOG_EXTENSIONS.contains(&ext))
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Turn the user-supplied input paths into the ordered list of files to read.
///
/// Repeated arguments are dropped (first occurrence wins). If any argument
/// does not exist the whole call fails with [`MonitorError::FilesNotFound`]
/// naming every missing path. Directories are expanded with
/// [`find_log_files`].
pub fn resolve_log_paths(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut seen: HashSet<&Path> = HashSet::new();
    let unique: Vec<&Path> = paths
        .iter()
        .map(PathBuf::as_path)
        .filter(|p| seen.insert(*p))
        .collect();

    let missing: Vec<PathBuf> = unique
        .iter()
        .filter(|p| !p.exists())
        .map(|p| p.to_path_buf())
        .collect();
    if !missing.is_empty() {
        return Err(MonitorError::FilesNotFound(missing));
    }

    let mut files: Vec<PathBuf> = Vec::new();
    let mut seen_files: HashSet<PathBuf> = HashSet::new();
    for path in unique {
        let expanded = if path.is_dir() {
            let found = find_log_files(path);
            if found.is_empty() {
                warn!("No log files found in {}", path.display());
            }
            found
        } else {
            vec![path.to_path_buf()]
        };
        for file in expanded {
            if seen_files.insert(file.clone()) {
                files.push(file);
            }
        }
    }

    Ok(files)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
