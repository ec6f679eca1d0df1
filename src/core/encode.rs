//! Field encoders and their defaults
//!
//! Encoders are swappable closures mapping record fields to display
//! strings. Sinks resolve any encoder left unset in their options to the
//! defaults here, once, at construction time.

use super::timestamp::TimestampFormat;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::backtrace::BacktraceStatus;
use std::sync::Arc;

pub const DEFAULT_MESSAGE_KEY: &str = "msg";
pub const DEFAULT_NAME_KEY: &str = "name";
pub const DEFAULT_TIMESTAMP_KEY: &str = "ts";
pub const DEFAULT_SEVERITY_KEY: &str = "severity";
pub const DEFAULT_ERROR_KEY: &str = "error";
pub const DEFAULT_STACK_TRACE_KEY: &str = "stacktrace";
pub const DEFAULT_NAME_SEPARATOR: &str = ".";
pub const DEFAULT_SEVERITY: &str = "INFO";
pub const DEFAULT_ERROR_SEVERITY: &str = "ERROR";
pub const DEFAULT_ENTRY_SUFFIX: &str = "\n";
pub const DEFAULT_FIELD_SEPARATOR: &str = " ";
pub const DEFAULT_TRACE_VERBOSITY: u64 = 2;
pub const DEFAULT_DEBUG_VERBOSITY: u64 = 1;

/// Maps a record's verbosity level and optional error to a severity name.
pub type SeverityEncoder = Arc<dyn Fn(u64, Option<&anyhow::Error>) -> String + Send + Sync>;

/// Collapses accumulated logger name segments into one display string.
pub type NameEncoder = Arc<dyn Fn(&[String]) -> String + Send + Sync>;

/// Formats a record's capture time into a display string.
pub type TimestampEncoder = Arc<dyn Fn(&DateTime<Utc>) -> String + Send + Sync>;

/// Extracts loggable information from an error.
pub type ErrorEncoder = Arc<dyn Fn(&anyhow::Error) -> EncodedError + Send + Sync>;

/// A verbosity level at or above which records are labelled with the given
/// severity name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityThreshold {
    /// Minimum verbosity level at which this threshold applies
    pub level: u64,
    /// The severity name to use
    pub severity: String,
}

impl SeverityThreshold {
    pub fn new(level: u64, severity: impl Into<String>) -> Self {
        Self {
            level,
            severity: severity.into(),
        }
    }
}

/// The default thresholds: TRACE at verbosity 2 and above, DEBUG at 1.
pub fn default_severity_thresholds() -> Vec<SeverityThreshold> {
    vec![
        SeverityThreshold::new(DEFAULT_TRACE_VERBOSITY, "TRACE"),
        SeverityThreshold::new(DEFAULT_DEBUG_VERBOSITY, "DEBUG"),
    ]
}

/// Information extracted from an error to facilitate logging
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedError {
    /// The primary message contained in the error, including the messages
    /// of any wrapped causes
    pub message: String,
    /// Stack trace text, empty when the error never captured one
    pub stack_trace: String,
}

/// Build a severity encoder from the given defaults and thresholds.
///
/// - An attached error takes precedence, producing `error_severity`.
/// - Otherwise the thresholds are scanned in list order and the first one
///   whose level is satisfied wins. Thresholds are not sorted on the
///   caller's behalf; an unsorted list gets first-match semantics.
/// - With no match, `default_severity` is used.
pub fn severity_encoder(
    default_severity: impl Into<String>,
    error_severity: impl Into<String>,
    thresholds: Vec<SeverityThreshold>,
) -> SeverityEncoder {
    let default_severity = default_severity.into();
    let error_severity = error_severity.into();
    Arc::new(move |level, error| {
        if error.is_some() {
            return error_severity.clone();
        }

        for threshold in &thresholds {
            if level >= threshold.level {
                return threshold.severity.clone();
            }
        }

        default_severity.clone()
    })
}

/// Build a name encoder joining segments with the given separator.
pub fn name_encoder(separator: impl Into<String>) -> NameEncoder {
    let separator = separator.into();
    Arc::new(move |names| names.join(&separator))
}

/// Build a timestamp encoder using the given format.
pub fn timestamp_encoder(format: TimestampFormat) -> TimestampEncoder {
    Arc::new(move |timestamp| format.format(timestamp))
}

/// The default error encoder.
///
/// The message is the error's display output including its chain of wrapped
/// causes. When the error captured a backtrace (anyhow records one at the
/// innermost construction site when `RUST_BACKTRACE` is set), the rendered
/// trace is attached; plain errors leave it empty.
pub fn default_error_encoder() -> ErrorEncoder {
    Arc::new(|error| {
        let mut encoded = EncodedError {
            message: format!("{error:#}"),
            stack_trace: String::new(),
        };

        let backtrace = error.backtrace();
        if backtrace.status() == BacktraceStatus::Captured {
            encoded.stack_trace = backtrace.to_string();
        }

        encoded
    })
}
