//! # Linelog
//!
//! A pluggable structured-logging front end: leveled log events with
//! attached key-value pairs and optional errors, rendered through
//! interchangeable sinks.
//!
//! ## Features
//!
//! - **Two Sinks**: Colourized text for development, JSON lines for
//!   production
//! - **Swappable Encoders**: Severity, name, timestamp, and error encoding
//!   are independently replaceable
//! - **Thread Safe**: Loggers derived from a shared sink write whole lines
//!   through one mutex-guarded writer
//! - **Never Fails the Caller**: Sink errors go to a configurable handler;
//!   malformed input degrades to a diagnostic record
//!
//! ## Example
//!
//! ```
//! use linelog::prelude::*;
//! use serde_json::json;
//!
//! let logger = Logger::builder()
//!     .verbosity(1)
//!     .build()
//!     .with_name("server")
//!     .with_values(&[json!("port"), json!(8080)]);
//!
//! logger.info(0, "listening", &[]);
//! logger.error(anyhow::anyhow!("bind failed"), "retrying", &[]);
//! ```

pub mod core;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        EncodedError, ErrorHandler, Logger, LoggerBuilder, LoggerError, Record, Result,
        SeverityThreshold, Sink, SyncWriter, TimestampFormat,
    };
    pub use crate::sinks::{ColourMode, JsonSink, JsonSinkOptions, TextSink, TextSinkOptions};
}

pub use crate::core::{
    default_error_encoder, default_error_handler, default_severity_thresholds, name_encoder,
    severity_encoder, timestamp_encoder, EncodedError, ErrorEncoder, ErrorHandler, Logger,
    LoggerBuilder, LoggerError, NameEncoder, Record, Result, SeverityEncoder, SeverityThreshold,
    Sink, SyncWriter, TimestampEncoder, TimestampFormat,
};
pub use crate::sinks::{
    default_primary_colour, default_secondary_colour, default_severity_colours, ColourMode,
    JsonSink, JsonSinkOptions, TextSink, TextSinkOptions,
};
