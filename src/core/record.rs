//! The normalized log record handed to sinks

use chrono::{DateTime, Utc};
use serde_json::Value;

/// A single log event prepared by [`Logger`](super::Logger), ready for a
/// [`Sink`](super::Sink) to encode and emit.
///
/// Records are built fresh per logging call and never mutated afterwards.
#[derive(Debug)]
pub struct Record {
    /// Verbosity level of this event, 0 being "least verbose", larger
    /// numbers being more verbose. Always 0 for error records.
    pub level: u64,
    /// Name segments accumulated by chained `with_name` calls, outer first.
    pub names: Vec<String>,
    /// The time the event was captured, in UTC.
    pub timestamp: DateTime<Utc>,
    /// Short description of what occurred. May be empty.
    pub message: String,
    /// Alternating key/value sequence, `[key1, value1, key2, value2, ...]`,
    /// populated by `with_values` and the call-site arguments. Even length
    /// by construction; keys must be JSON strings at encode time.
    pub kvs: Vec<Value>,
    /// The error passed to `Logger::error`, if any.
    pub error: Option<anyhow::Error>,
}
