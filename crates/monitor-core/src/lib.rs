//! Core types for the job log monitor.
//!
//! Holds the event and analysis data model, the error taxonomy, threshold
//! configuration and the duration formatting helpers shared by the parser,
//! the correlation engine and the report renderers.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;

pub use error::{MonitorError, ParseError, Result};
