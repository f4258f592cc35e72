//! Human-readable trace sinks.
//!
//! The robot writes one line per action plus board snapshots to an optional
//! sink. Sinks never feed back into decisions; a failing sink only logs.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Receives trace lines.
pub trait TraceSink {
    fn record(&mut self, line: &str);
}

/// Drops every line.
#[derive(Debug, Default, Clone, Copy)]
pub struct Discard;

impl TraceSink for Discard {
    fn record(&mut self, _line: &str) {}
}

impl TraceSink for Vec<String> {
    fn record(&mut self, line: &str) {
        self.push(line.to_string());
    }
}

/// Appends trace lines to a text file.
pub struct FileTrace {
    writer: BufWriter<File>,
}

impl FileTrace {
    /// Open `path` for appending, creating it if needed.
    pub fn append(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl TraceSink for FileTrace {
    fn record(&mut self, line: &str) {
        if let Err(e) = writeln!(self.writer, "{}", line) {
            log::warn!("trace write failed: {}", e);
        }
    }
}

impl Drop for FileTrace {
    fn drop(&mut self) {
        if let Err(e) = self.writer.flush() {
            log::warn!("trace flush failed: {}", e);
        }
    }
}
