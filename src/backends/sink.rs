//! Shared output handles for the reference backends

use crate::core::{LoggerError, Result};
use parking_lot::Mutex;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

/// Mutex-guarded destination for formatted lines.
///
/// Clones share the same destination; each line is written and flushed under the lock
/// so concurrent writers never interleave within a line.
#[derive(Clone)]
pub struct Sink {
    name: String,
    out: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl Sink {
    pub fn stdout() -> Self {
        Self::from_writer("stdout", io::stdout())
    }

    pub fn stderr() -> Self {
        Self::from_writer("stderr", io::stderr())
    }

    /// Append to the file at `path`, creating it if needed
    pub fn file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                LoggerError::io_operation(
                    "opening log sink",
                    format!("cannot open '{}'", path.display()),
                    e,
                )
            })?;
        Ok(Self::from_writer(path.display().to_string(), file))
    }

    /// Lines go to an in-memory buffer, mostly for tests
    pub fn buffer(buffer: &SharedBuffer) -> Self {
        Self::from_writer("buffer", buffer.clone())
    }

    pub fn from_writer<W>(name: impl Into<String>, writer: W) -> Self
    where
        W: Write + Send + 'static,
    {
        Self {
            name: name.into(),
            out: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Write one line; failures are reported on stderr and otherwise ignored
    pub fn write_line(&self, line: &str) {
        if let Err(e) = self.try_write_line(line) {
            eprintln!("[LOGGER ERROR] Sink '{}' write failed: {}", self.name, e);
        }
    }

    pub fn try_write_line(&self, line: &str) -> Result<()> {
        let mut out = self.out.lock();
        writeln!(out, "{}", line)?;
        out.flush()?;
        Ok(())
    }
}

impl std::fmt::Debug for Sink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sink").field("name", &self.name).finish()
    }
}

/// Clonable in-memory byte buffer implementing `Write`
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(String::from).collect()
    }

    pub fn clear(&self) {
        self.bytes.lock().clear();
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
