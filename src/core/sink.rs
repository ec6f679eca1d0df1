//! Sink trait for encoded record destinations

use super::{error::Result, record::Record};

/// A system that accepts [`Record`]s and handles them, typically by encoding
/// them and emitting them to some destination, e.g. as JSON lines on stderr.
///
/// Sinks process each record synchronously and independently; there is no
/// buffering or batching across calls. A sink's `log` method is not itself
/// a synchronization point — sinks writing to a shared destination go
/// through a [`SyncWriter`](super::SyncWriter).
pub trait Sink: Send + Sync {
    fn log(&self, record: &Record) -> Result<()>;
}
