//! Logger: context accrual, record construction, and dispatch

use super::error::LoggerError;
use super::record::Record;
use super::sink::Sink;
use crate::sinks::{JsonSink, JsonSinkOptions};
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;

/// Invoked with any error returned by the sink during dispatch.
pub type ErrorHandler = Arc<dyn Fn(&LoggerError) + Send + Sync>;

/// The default error handler, writing a description to stderr.
pub fn default_error_handler(error: &LoggerError) {
    eprintln!("logging error: {error}");
}

/// Builds one [`Record`] per logging call and hands it to the configured
/// [`Sink`].
///
/// Loggers accumulate name segments and key-value context through
/// [`with_name`](Logger::with_name) and [`with_values`](Logger::with_values).
/// Each derivation copies the accrued state into a new independent `Logger`
/// sharing the same sink; the original is unaffected, and derived loggers
/// never alias each other's state.
///
/// Logging calls never return errors and never panic: sink failures are
/// routed to the configured error handler, and malformed key-value input
/// degrades to a best-effort diagnostic record.
#[derive(Clone)]
pub struct Logger {
    sink: Arc<dyn Sink>,
    verbosity: u64,
    error_handler: ErrorHandler,
    names: Vec<String>,
    values: Vec<Value>,
}

impl Logger {
    /// Create a logger with the default configuration: a [`JsonSink`]
    /// writing to stderr, verbosity 0.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::default()
    }

    /// Whether this logger would emit info records at the given verbosity
    /// level. Error records are always emitted.
    pub fn enabled(&self, level: u64) -> bool {
        self.verbosity >= level
    }

    /// Emit an info record at the given verbosity level.
    ///
    /// `kvs` is a flat alternating key/value sequence, e.g.
    /// `&[json!("user"), json!(42)]`.
    pub fn info(&self, level: u64, message: &str, kvs: &[Value]) {
        self.log(level, None, message, kvs);
    }

    /// Emit a record associated with an error, at verbosity level 0.
    pub fn error(&self, error: impl Into<anyhow::Error>, message: &str, kvs: &[Value]) {
        self.log(0, Some(error.into()), message, kvs);
    }

    /// Produce a new logger carrying additional key-value context.
    #[must_use]
    pub fn with_values(&self, kvs: &[Value]) -> Logger {
        let mut derived = self.clone();
        derived.values.extend_from_slice(kvs);
        derived
    }

    /// Produce a new logger with an additional name segment.
    #[must_use]
    pub fn with_name(&self, name: impl Into<String>) -> Logger {
        let mut derived = self.clone();
        derived.names.push(name.into());
        derived
    }

    fn log(&self, level: u64, error: Option<anyhow::Error>, message: &str, kvs: &[Value]) {
        let now = Utc::now();

        // The caller's message and kvs are dropped rather than guessing
        // which element is the stray one.
        if (self.values.len() + kvs.len()) % 2 != 0 {
            self.dispatch(Record {
                level: 0,
                names: self.names.clone(),
                timestamp: now,
                message: String::new(),
                kvs: Vec::new(),
                error: Some(LoggerError::OddKeyValues.into()),
            });
            return;
        }

        let mut merged = Vec::with_capacity(self.values.len() + kvs.len());
        merged.extend_from_slice(&self.values);
        merged.extend_from_slice(kvs);

        self.dispatch(Record {
            level,
            names: self.names.clone(),
            timestamp: now,
            message: message.to_string(),
            kvs: merged,
            error,
        });
    }

    fn dispatch(&self, record: Record) {
        if let Err(error) = self.sink.log(&record) {
            (self.error_handler)(&error);
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`Logger`], applying defaults for anything left unset.
#[derive(Default)]
pub struct LoggerBuilder {
    sink: Option<Arc<dyn Sink>>,
    verbosity: u64,
    error_handler: Option<ErrorHandler>,
}

impl LoggerBuilder {
    /// Set the sink records are dispatched to.
    #[must_use]
    pub fn sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Set the verbosity ceiling reported by [`Logger::enabled`].
    #[must_use]
    pub fn verbosity(mut self, verbosity: u64) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set the handler invoked when the sink reports a failure.
    #[must_use]
    pub fn error_handler(
        mut self,
        handler: impl Fn(&LoggerError) + Send + Sync + 'static,
    ) -> Self {
        self.error_handler = Some(Arc::new(handler));
        self
    }

    #[must_use]
    pub fn build(self) -> Logger {
        Logger {
            sink: self
                .sink
                .unwrap_or_else(|| Arc::new(JsonSink::new(JsonSinkOptions::default()))),
            verbosity: self.verbosity,
            error_handler: self
                .error_handler
                .unwrap_or_else(|| Arc::new(default_error_handler)),
            names: Vec::new(),
            values: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Result;
    use parking_lot::Mutex;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Captures the loggable parts of each dispatched record.
    #[derive(Default)]
    struct CaptureSink {
        records: Mutex<Vec<Captured>>,
    }

    struct Captured {
        level: u64,
        names: Vec<String>,
        message: String,
        kvs: Vec<Value>,
        error: Option<String>,
    }

    impl Sink for CaptureSink {
        fn log(&self, record: &Record) -> Result<()> {
            self.records.lock().push(Captured {
                level: record.level,
                names: record.names.clone(),
                message: record.message.clone(),
                kvs: record.kvs.clone(),
                error: record.error.as_ref().map(|e| e.to_string()),
            });
            Ok(())
        }
    }

    struct FailingSink;

    impl Sink for FailingSink {
        fn log(&self, _record: &Record) -> Result<()> {
            Err(LoggerError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "gone",
            )))
        }
    }

    fn capture_logger() -> (Logger, Arc<CaptureSink>) {
        let sink = Arc::new(CaptureSink::default());
        let logger = Logger::builder()
            .sink(sink.clone() as Arc<dyn Sink>)
            .verbosity(1)
            .build();
        (logger, sink)
    }

    #[test]
    fn test_enabled_follows_verbosity() {
        let (logger, _) = capture_logger();
        assert!(logger.enabled(0));
        assert!(logger.enabled(1));
        assert!(!logger.enabled(2));
    }

    #[test]
    fn test_info_builds_record() {
        let (logger, sink) = capture_logger();
        logger.info(1, "hello", &[json!("k"), json!(7)]);

        let records = sink.records.lock();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].level, 1);
        assert_eq!(records[0].message, "hello");
        assert_eq!(records[0].kvs, vec![json!("k"), json!(7)]);
        assert!(records[0].error.is_none());
    }

    #[test]
    fn test_error_is_level_zero_with_error() {
        let (logger, sink) = capture_logger();
        logger.error(anyhow::anyhow!("boom"), "oops", &[]);

        let records = sink.records.lock();
        assert_eq!(records[0].level, 0);
        assert_eq!(records[0].message, "oops");
        assert_eq!(records[0].error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_accrued_values_precede_call_site_values() {
        let (logger, sink) = capture_logger();
        let derived = logger.with_values(&[json!("a"), json!(1)]);
        derived.info(0, "m", &[json!("b"), json!(2)]);

        let records = sink.records.lock();
        assert_eq!(
            records[0].kvs,
            vec![json!("a"), json!(1), json!("b"), json!(2)]
        );
    }

    #[test]
    fn test_derivation_leaves_parent_untouched() {
        let (logger, sink) = capture_logger();
        let child = logger.with_name("child").with_values(&[json!("x"), json!(1)]);
        let sibling = logger.with_name("sibling");

        logger.info(0, "parent", &[]);
        child.info(0, "child", &[]);
        sibling.info(0, "sibling", &[]);

        let records = sink.records.lock();
        assert!(records[0].names.is_empty());
        assert!(records[0].kvs.is_empty());
        assert_eq!(records[1].names, vec!["child"]);
        assert_eq!(records[1].kvs, vec![json!("x"), json!(1)]);
        assert_eq!(records[2].names, vec!["sibling"]);
        assert!(records[2].kvs.is_empty());
    }

    #[test]
    fn test_odd_kvs_degrades_to_usage_error() {
        let (logger, sink) = capture_logger();
        logger
            .with_name("app")
            .info(3, "dropped", &[json!("lonely key")]);

        let records = sink.records.lock();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].level, 0);
        assert_eq!(records[0].names, vec!["app"]);
        assert!(records[0].message.is_empty());
        assert!(records[0].kvs.is_empty());
        let error = records[0].error.as_deref().expect("usage error attached");
        assert!(error.contains("odd number of arguments"));
    }

    #[test]
    fn test_odd_parity_across_accrual_depth() {
        let (logger, sink) = capture_logger();
        // One accrued element plus one call-site element is even again.
        let derived = logger.with_values(&[json!("accrued key")]);
        derived.info(0, "m", &[json!("value for it")]);

        let records = sink.records.lock();
        assert!(records[0].error.is_none());
        assert_eq!(records[0].kvs.len(), 2);
    }

    #[test]
    fn test_sink_failure_routed_to_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let logger = Logger::builder()
            .sink(Arc::new(FailingSink))
            .error_handler(move |error| {
                assert!(matches!(error, LoggerError::Io(_)));
                seen.fetch_add(1, Ordering::SeqCst);
            })
            .build();

        logger.info(0, "does not propagate", &[]);
        logger.error(anyhow::anyhow!("boom"), "still fine", &[]);

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
