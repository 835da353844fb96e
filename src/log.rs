//! Leveled logging with an injected writer.
//!
//! Every component takes a `&Logger` instead of writing to a process-wide
//! sink, so tests can capture output in memory and the binary can keep
//! stdout reserved for the selection result.

use clap::ValueEnum;
use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

pub struct Logger {
    level: LogLevel,
    sink: RefCell<Box<dyn Write>>,
}

impl Logger {
    pub fn new(level: LogLevel, sink: Box<dyn Write>) -> Self {
        Self {
            level,
            sink: RefCell::new(sink),
        }
    }

    pub fn stderr(level: LogLevel) -> Self {
        Self::new(level, Box::new(std::io::stderr()))
    }

    /// Returns a logger writing to a shared in-memory buffer, plus the
    /// buffer itself for later inspection.
    pub fn in_memory(level: LogLevel) -> (Self, LogBuffer) {
        let buffer = LogBuffer::default();
        let logger = Self::new(level, Box::new(buffer.clone()));
        (logger, buffer)
    }

    pub fn debug(&self, message: impl AsRef<str>) {
        if self.level >= LogLevel::Debug {
            self.write("[DEBUG]", message.as_ref());
        }
    }

    pub fn info(&self, message: impl AsRef<str>) {
        if self.level >= LogLevel::Info {
            self.write("[INFO]", message.as_ref());
        }
    }

    pub fn warn(&self, message: impl AsRef<str>) {
        if self.level >= LogLevel::Warn {
            self.write("[WARNING]", message.as_ref());
        }
    }

    pub fn error(&self, message: impl AsRef<str>) {
        self.write("[ERROR]", message.as_ref());
    }

    fn write(&self, prefix: &str, message: &str) {
        let mut sink = self.sink.borrow_mut();
        let _ = writeln!(sink, "{prefix} {message}");
    }
}

/// Shared growable buffer usable as a logger sink.
#[derive(Debug, Clone, Default)]
pub struct LogBuffer(Rc<RefCell<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
