//! Mutex-wrapped writer for shared destinations

use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;

/// Wraps an arbitrary byte sink with a mutex so that loggers on multiple
/// threads writing to one destination cannot interleave bytes, e.g. when
/// sharing a file handle.
///
/// The lock is held for exactly one write call. Both provided sinks buffer
/// a complete line before handing it here, so every log entry reaches the
/// destination as a single uninterrupted byte sequence.
///
/// Cloning produces another handle to the same underlying writer.
#[derive(Clone)]
pub struct SyncWriter {
    inner: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl SyncWriter {
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }

    /// Write one complete encoded entry under the lock.
    pub fn write_all(&self, bytes: &[u8]) -> io::Result<()> {
        let mut writer = self.inner.lock();
        writer.write_all(bytes)
    }

    pub fn flush(&self) -> io::Result<()> {
        self.inner.lock().flush()
    }
}

impl std::fmt::Debug for SyncWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncWriter").finish_non_exhaustive()
    }
}
