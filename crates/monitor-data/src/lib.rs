//! Data ingestion and correlation layer for the job monitor.
//!
//! Responsible for discovering and parsing CSV job logs, pairing START and
//! END events into executions, classifying them against the configured
//! thresholds and running the top-level analysis pipeline.

pub mod analysis;
pub mod analyzer;
pub mod reader;
