//! Core record, logger, encoder, and writer types

pub mod encode;
pub mod error;
pub mod logger;
pub mod record;
pub mod sink;
pub mod timestamp;
pub mod writer;

pub use encode::{
    default_error_encoder, default_severity_thresholds, name_encoder, severity_encoder,
    timestamp_encoder, EncodedError, ErrorEncoder, NameEncoder, SeverityEncoder,
    SeverityThreshold, TimestampEncoder, DEFAULT_DEBUG_VERBOSITY, DEFAULT_ENTRY_SUFFIX,
    DEFAULT_ERROR_KEY, DEFAULT_ERROR_SEVERITY, DEFAULT_FIELD_SEPARATOR, DEFAULT_MESSAGE_KEY,
    DEFAULT_NAME_KEY, DEFAULT_NAME_SEPARATOR, DEFAULT_SEVERITY, DEFAULT_SEVERITY_KEY,
    DEFAULT_STACK_TRACE_KEY, DEFAULT_TIMESTAMP_KEY, DEFAULT_TRACE_VERBOSITY,
};
pub use error::{LoggerError, Result};
pub use logger::{default_error_handler, ErrorHandler, Logger, LoggerBuilder};
pub use record::Record;
pub use sink::Sink;
pub use timestamp::TimestampFormat;
pub use writer::SyncWriter;
