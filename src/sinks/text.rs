//! Human-oriented colourized text sink

use crate::core::{
    default_error_encoder, default_severity_thresholds, name_encoder, severity_encoder,
    timestamp_encoder, EncodedError, ErrorEncoder, LoggerError, NameEncoder, Record, Result,
    SeverityEncoder, Sink, SyncWriter, TimestampEncoder, TimestampFormat, DEFAULT_ENTRY_SUFFIX,
    DEFAULT_ERROR_KEY, DEFAULT_ERROR_SEVERITY, DEFAULT_FIELD_SEPARATOR, DEFAULT_NAME_SEPARATOR,
    DEFAULT_SEVERITY,
};
use std::collections::HashMap;
use std::io::{IsTerminal, Write};
use termcolor::{Buffer, Color, ColorSpec, WriteColor};

/// Controls whether the text sink emits colour escape sequences.
///
/// Resolved once at sink construction; a force mode overrides detection for
/// every colour in use, including severity-specific ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColourMode {
    /// Colour when writing to the default stdout destination and stdout is
    /// a terminal (and `NO_COLOR` is unset). Custom destinations stay plain.
    #[default]
    Auto,
    /// Always emit escape sequences. Useful for IDE-integrated terminals
    /// that auto-detection mistakes for pipes.
    ForceOn,
    /// Never emit escape sequences. Useful if output shows garbled escape
    /// characters.
    ForceOff,
}

/// The colour of log messages, logger names, values, and stack traces.
pub fn default_primary_colour() -> ColorSpec {
    let mut spec = ColorSpec::new();
    spec.set_fg(Some(Color::White)).set_intense(true);
    spec
}

/// The colour of timestamps and the keys of key-value pairs.
pub fn default_secondary_colour() -> ColorSpec {
    let mut spec = ColorSpec::new();
    spec.set_fg(Some(Color::White));
    spec
}

/// The default palette keyed by severity name.
///
/// Returns a fresh copy per call; sinks own their palette outright, so
/// mutating one sink's colours never affects another.
pub fn default_severity_colours() -> HashMap<String, ColorSpec> {
    let mut colours = HashMap::new();

    let mut error = ColorSpec::new();
    error.set_fg(Some(Color::Red)).set_intense(true);
    colours.insert("ERROR".to_string(), error);

    let mut info = ColorSpec::new();
    info.set_fg(Some(Color::White)).set_intense(true);
    colours.insert("INFO".to_string(), info);

    let mut debug = ColorSpec::new();
    debug.set_fg(Some(Color::Blue)).set_intense(true);
    colours.insert("DEBUG".to_string(), debug);

    let mut trace = ColorSpec::new();
    trace.set_fg(Some(Color::Magenta));
    colours.insert("TRACE".to_string(), trace);

    colours
}

/// Configures a [`TextSink`]; any field left unset resolves to its default
/// at construction time.
#[derive(Default)]
pub struct TextSinkOptions {
    /// Where to write encoded lines. Defaults to stdout.
    pub output: Option<SyncWriter>,
    /// Colour switch, see [`ColourMode`].
    pub colour_mode: ColourMode,
    /// Colours keyed by severity name, used for the severity token and any
    /// error field. Unknown severities fall back to the primary colour.
    pub severity_colours: Option<HashMap<String, ColorSpec>>,
    pub primary_colour: Option<ColorSpec>,
    pub secondary_colour: Option<ColorSpec>,
    pub severity_encoder: Option<SeverityEncoder>,
    pub name_encoder: Option<NameEncoder>,
    pub timestamp_encoder: Option<TimestampEncoder>,
    pub error_encoder: Option<ErrorEncoder>,
    /// Key prefix for the error message, displayed like another key-value
    /// pair but painted in the severity colour.
    pub error_key: Option<String>,
    /// Appended after every entry. Defaults to a newline.
    pub entry_suffix: Option<String>,
    /// Placed between all fields. Defaults to a single space.
    pub field_separator: Option<String>,
}

/// Emits unstructured, optionally coloured text renditions of records, one
/// line per record, intended for terminals during local development.
///
/// Layout:
/// `ts SEVERITY [names] message [error="..."] [key=value]... [stacktrace]`
///
/// The full line is assembled in memory and written through the shared
/// writer in a single call, so concurrent sinks over one destination never
/// produce torn lines. Any marshalling or write failure aborts the call
/// with no partial output reported as success.
pub struct TextSink {
    writer: SyncWriter,
    colours_enabled: bool,
    severity_colours: HashMap<String, ColorSpec>,
    primary_colour: ColorSpec,
    secondary_colour: ColorSpec,
    severity_encoder: SeverityEncoder,
    name_encoder: NameEncoder,
    timestamp_encoder: TimestampEncoder,
    error_encoder: ErrorEncoder,
    error_key: String,
    entry_suffix: String,
    field_separator: String,
}

impl TextSink {
    pub fn new(options: TextSinkOptions) -> Self {
        let default_destination = options.output.is_none();
        let writer = options.output.unwrap_or_else(SyncWriter::stdout);

        let colours_enabled = match options.colour_mode {
            ColourMode::Auto => {
                default_destination
                    && std::env::var_os("NO_COLOR").is_none()
                    && std::io::stdout().is_terminal()
            }
            ColourMode::ForceOn => true,
            ColourMode::ForceOff => false,
        };

        Self {
            writer,
            colours_enabled,
            severity_colours: options
                .severity_colours
                .unwrap_or_else(default_severity_colours),
            primary_colour: options.primary_colour.unwrap_or_else(default_primary_colour),
            secondary_colour: options
                .secondary_colour
                .unwrap_or_else(default_secondary_colour),
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
            error_key: options
                .error_key
                .unwrap_or_else(|| DEFAULT_ERROR_KEY.to_string()),
            entry_suffix: options
                .entry_suffix
                .unwrap_or_else(|| DEFAULT_ENTRY_SUFFIX.to_string()),
            field_separator: options
                .field_separator
                .unwrap_or_else(|| DEFAULT_FIELD_SEPARATOR.to_string()),
        }
    }

    fn paint(&self, buffer: &mut Buffer, colour: &ColorSpec, text: &str) -> Result<()> {
        buffer.set_color(colour)?;
        buffer.write_all(text.as_bytes())?;
        buffer.reset()?;
        Ok(())
    }
}

impl Default for TextSink {
    fn default() -> Self {
        Self::new(TextSinkOptions::default())
    }
}

impl Sink for TextSink {
    fn log(&self, record: &Record) -> Result<()> {
        let mut buffer = if self.colours_enabled {
            Buffer::ansi()
        } else {
            Buffer::no_color()
        };

        let severity = (self.severity_encoder)(record.level, record.error.as_ref());
        let severity_colour = self
            .severity_colours
            .get(&severity)
            .unwrap_or(&self.primary_colour);

        self.paint(
            &mut buffer,
            &self.secondary_colour,
            &(self.timestamp_encoder)(&record.timestamp),
        )?;

        self.paint(
            &mut buffer,
            severity_colour,
            &format!("{}{}", self.field_separator, severity),
        )?;

        if !record.names.is_empty() {
            self.paint(
                &mut buffer,
                &self.primary_colour,
                &format!(
                    "{}{}",
                    self.field_separator,
                    (self.name_encoder)(&record.names)
                ),
            )?;
        }

        self.paint(
            &mut buffer,
            &self.primary_colour,
            &format!("{}{}", self.field_separator, record.message),
        )?;

        let mut encoded_error = EncodedError::default();
        if let Some(error) = &record.error {
            encoded_error = (self.error_encoder)(error);
            self.paint(
                &mut buffer,
                severity_colour,
                &format!(
                    "{}{}={}",
                    self.field_separator,
                    self.error_key,
                    serde_json::to_string(&encoded_error.message)?
                ),
            )?;
        }

        for pair in record.kvs.chunks_exact(2) {
            let key = pair[0]
                .as_str()
                .ok_or_else(|| LoggerError::non_string_key(&pair[0]))?;

            self.paint(
                &mut buffer,
                &self.secondary_colour,
                &format!("{}{}=", self.field_separator, key),
            )?;
            self.paint(
                &mut buffer,
                &self.primary_colour,
                &serde_json::to_string(&pair[1])?,
            )?;
        }

        if !encoded_error.stack_trace.is_empty() {
            self.paint(
                &mut buffer,
                &self.primary_colour,
                &format!("{}{}", self.field_separator, encoded_error.stack_trace),
            )?;
        }

        buffer.write_all(self.entry_suffix.as_bytes())?;

        self.writer.write_all(buffer.as_slice())?;
        Ok(())
    }
}
