//! Machine-oriented JSON lines sink

use crate::core::{
    default_error_encoder, default_severity_thresholds, name_encoder, severity_encoder,
    timestamp_encoder, EncodedError, ErrorEncoder, LoggerError, NameEncoder, Record, Result,
    SeverityEncoder, Sink, SyncWriter, TimestampEncoder, TimestampFormat, DEFAULT_ERROR_KEY,
    DEFAULT_ERROR_SEVERITY, DEFAULT_MESSAGE_KEY, DEFAULT_NAME_KEY, DEFAULT_NAME_SEPARATOR,
    DEFAULT_SEVERITY, DEFAULT_SEVERITY_KEY, DEFAULT_STACK_TRACE_KEY, DEFAULT_TIMESTAMP_KEY,
};
use serde_json::{Map, Value};

/// Configures a [`JsonSink`].
///
/// Key-name fields default to the conventional names; setting one to the
/// empty string omits that field from the output entirely. Encoders left
/// unset resolve to the defaults at construction time.
pub struct JsonSinkOptions {
    /// Where to write encoded objects. Defaults to stderr.
    pub output: Option<SyncWriter>,
    /// Top-level key for the severity name. Empty omits it.
    pub severity_key: String,
    /// Top-level key for the joined logger names. Empty omits it.
    pub name_key: String,
    /// Top-level key for the message. Empty omits it.
    pub message_key: String,
    /// Top-level key for the timestamp. Empty omits it.
    pub timestamp_key: String,
    /// Top-level key for the error message. Empty omits it.
    pub error_key: String,
    /// Top-level key for stack trace text. Empty omits it.
    pub stack_trace_key: String,
    pub severity_encoder: Option<SeverityEncoder>,
    pub name_encoder: Option<NameEncoder>,
    pub timestamp_encoder: Option<TimestampEncoder>,
    pub error_encoder: Option<ErrorEncoder>,
}

impl Default for JsonSinkOptions {
    fn default() -> Self {
        Self {
            output: None,
            severity_key: DEFAULT_SEVERITY_KEY.to_string(),
            name_key: DEFAULT_NAME_KEY.to_string(),
            message_key: DEFAULT_MESSAGE_KEY.to_string(),
            timestamp_key: DEFAULT_TIMESTAMP_KEY.to_string(),
            error_key: DEFAULT_ERROR_KEY.to_string(),
            stack_trace_key: DEFAULT_STACK_TRACE_KEY.to_string(),
            severity_encoder: None,
            name_encoder: None,
            timestamp_encoder: None,
            error_encoder: None,
        }
    }
}

/// Emits one self-contained JSON object per record, newline-delimited,
/// suitable for log aggregation tools.
///
/// Key-value pairs from the record are merged into the same top-level
/// namespace as the fixed fields; a caller key that collides with a fixed
/// field's key overwrites it, last write wins. Each encoded object is
/// written through the shared writer in a single call.
pub struct JsonSink {
    writer: SyncWriter,
    severity_key: Option<String>,
    name_key: Option<String>,
    message_key: Option<String>,
    timestamp_key: Option<String>,
    error_key: Option<String>,
    stack_trace_key: Option<String>,
    severity_encoder: SeverityEncoder,
    name_encoder: NameEncoder,
    timestamp_encoder: TimestampEncoder,
    error_encoder: ErrorEncoder,
}

fn key(name: String) -> Option<String> {
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

impl JsonSink {
    pub fn new(options: JsonSinkOptions) -> Self {
        Self {
            writer: options.output.unwrap_or_else(SyncWriter::stderr),
            severity_key: key(options.severity_key),
            name_key: key(options.name_key),
            message_key: key(options.message_key),
            timestamp_key: key(options.timestamp_key),
            error_key: key(options.error_key),
            stack_trace_key: key(options.stack_trace_key),
            severity_encoder: options.severity_encoder.unwrap_or_else(|| {
                severity_encoder(
                    DEFAULT_SEVERITY,
                    DEFAULT_ERROR_SEVERITY,
                    default_severity_thresholds(),
                )
            }),
            name_encoder: options
                .name_encoder
                .unwrap_or_else(|| name_encoder(DEFAULT_NAME_SEPARATOR)),
            timestamp_encoder: options
                .timestamp_encoder
                .unwrap_or_else(|| timestamp_encoder(TimestampFormat::default())),
            error_encoder: options.error_encoder.unwrap_or_else(default_error_encoder),
        }
    }
}

impl Default for JsonSink {
    fn default() -> Self {
        Self::new(JsonSinkOptions::default())
    }
}

impl Sink for JsonSink {
    fn log(&self, record: &Record) -> Result<()> {
        let mut object = Map::new();

        if let Some(timestamp_key) = &self.timestamp_key {
            object.insert(
                timestamp_key.clone(),
                Value::String((self.timestamp_encoder)(&record.timestamp)),
            );
        }

        if let Some(severity_key) = &self.severity_key {
            object.insert(
                severity_key.clone(),
                Value::String((self.severity_encoder)(
                    record.level,
                    record.error.as_ref(),
                )),
            );
        }

        if let Some(name_key) = &self.name_key {
            if !record.names.is_empty() {
                object.insert(
                    name_key.clone(),
                    Value::String((self.name_encoder)(&record.names)),
                );
            }
        }

        if let Some(message_key) = &self.message_key {
            if !record.message.is_empty() {
                object.insert(message_key.clone(), Value::String(record.message.clone()));
            }
        }

        if let Some(error) = &record.error {
            let EncodedError {
                message,
                stack_trace,
            } = (self.error_encoder)(error);

            if let Some(error_key) = &self.error_key {
                if !message.is_empty() {
                    object.insert(error_key.clone(), Value::String(message));
                }
            }
            if let Some(stack_trace_key) = &self.stack_trace_key {
                if !stack_trace.is_empty() {
                    object.insert(stack_trace_key.clone(), Value::String(stack_trace));
                }
            }
        }

        for pair in record.kvs.chunks_exact(2) {
            let key = pair[0]
                .as_str()
                .ok_or_else(|| LoggerError::non_string_key(&pair[0]))?;
            object.insert(key.to_string(), pair[1].clone());
        }

        let mut encoded = serde_json::to_vec(&object)?;
        encoded.push(b'\n');

        self.writer.write_all(&encoded)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use parking_lot::Mutex;
    use serde_json::json;
    use std::io::Write;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        fn string(&self) -> String {
            String::from_utf8(self.0.lock().clone()).expect("utf8 output")
        }

        fn parsed(&self) -> Value {
            serde_json::from_str(self.string().trim_end()).expect("valid JSON line")
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn record(level: u64, message: &str, kvs: Vec<Value>) -> Record {
        Record {
            level,
            names: Vec::new(),
            timestamp: Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).single().unwrap(),
            message: message.to_string(),
            kvs,
            error: None,
        }
    }

    fn sink_with(buf: &SharedBuf, options: JsonSinkOptions) -> JsonSink {
        JsonSink::new(JsonSinkOptions {
            output: Some(SyncWriter::new(buf.clone())),
            ..options
        })
    }

    #[test]
    fn test_plain_info_object() {
        let buf = SharedBuf::default();
        let sink = sink_with(&buf, JsonSinkOptions::default());

        sink.log(&record(0, "start", Vec::new())).expect("log");

        assert_eq!(
            buf.string(),
            "{\"ts\":\"2025-01-08T10:30:45.000000000Z\",\"severity\":\"INFO\",\"msg\":\"start\"}\n"
        );
    }

    #[test]
    fn test_names_joined_and_kvs_merged() {
        let buf = SharedBuf::default();
        let sink = sink_with(&buf, JsonSinkOptions::default());

        let mut rec = record(1, "ready", vec![json!("port"), json!(8080)]);
        rec.names = vec!["a".to_string(), "b".to_string()];
        sink.log(&rec).expect("log");

        let object = buf.parsed();
        assert_eq!(object["severity"], "DEBUG");
        assert_eq!(object["name"], "a.b");
        assert_eq!(object["port"], 8080);
    }

    #[test]
    fn test_error_record_fields() {
        let buf = SharedBuf::default();
        let sink = sink_with(&buf, JsonSinkOptions::default());

        let mut rec = record(0, "oops", vec![json!("foo"), json!("flange")]);
        rec.error = Some(anyhow::anyhow!("boom"));
        sink.log(&rec).expect("log");

        let object = buf.parsed();
        assert_eq!(object["severity"], "ERROR");
        assert_eq!(object["error"], "boom");
        assert_eq!(object["foo"], "flange");
    }

    #[test]
    fn test_empty_key_omits_field() {
        let buf = SharedBuf::default();
        let sink = sink_with(
            &buf,
            JsonSinkOptions {
                timestamp_key: String::new(),
                severity_key: String::new(),
                ..Default::default()
            },
        );

        sink.log(&record(0, "bare", Vec::new())).expect("log");

        assert_eq!(buf.string(), "{\"msg\":\"bare\"}\n");
    }

    #[test]
    fn test_name_omitted_when_no_names_accrued() {
        let buf = SharedBuf::default();
        let sink = sink_with(&buf, JsonSinkOptions::default());

        sink.log(&record(0, "m", Vec::new())).expect("log");

        let object = buf.parsed();
        assert!(object.get("name").is_none());
    }

    #[test]
    fn test_message_omitted_when_empty() {
        let buf = SharedBuf::default();
        let sink = sink_with(&buf, JsonSinkOptions::default());

        sink.log(&record(0, "", Vec::new())).expect("log");

        let object = buf.parsed();
        assert!(object.get("msg").is_none());
    }

    #[test]
    fn test_caller_kv_overrides_fixed_field() {
        let buf = SharedBuf::default();
        let sink = sink_with(&buf, JsonSinkOptions::default());

        sink.log(&record(
            0,
            "original",
            vec![json!("msg"), json!("overridden")],
        ))
        .expect("log");

        let object = buf.parsed();
        assert_eq!(object["msg"], "overridden");
    }

    #[test]
    fn test_non_string_key_encodes_nothing() {
        let buf = SharedBuf::default();
        let sink = sink_with(&buf, JsonSinkOptions::default());

        let result = sink.log(&record(0, "m", vec![json!({"not": "a key"}), json!(1)]));

        assert!(matches!(result, Err(LoggerError::NonStringKey { .. })));
        assert!(buf.string().is_empty());
    }

    #[test]
    fn test_structured_values_survive_encoding() {
        let buf = SharedBuf::default();
        let sink = sink_with(&buf, JsonSinkOptions::default());

        sink.log(&record(
            0,
            "m",
            vec![json!("peer"), json!({"host": "a", "port": 1})],
        ))
        .expect("log");

        let object = buf.parsed();
        assert_eq!(object["peer"]["host"], "a");
        assert_eq!(object["peer"]["port"], 1);
    }
}
