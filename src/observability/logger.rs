//! Structured JSON run log
//!
//! - Structured logs (JSON lines)
//! - Deterministic key ordering
//! - Explicit severity levels
//! - One log line = one event
//! - One sink per run, shared by every partition job

use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{SecondsFormat, Utc};
use uuid::Uuid;

use super::events::Event;

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Debug-level detail
    Trace = 0,
    /// Normal operations
    Info = 1,
    /// Recoverable issues
    Warn = 2,
    /// Operation failures
    Error = 3,
    /// Unrecoverable, run aborts
    Fatal = 4,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Append-only log sink for one run.
///
/// Writes from concurrent jobs are serialized through a mutex; each event
/// is emitted with a single `write_all`, so lines never interleave.
pub struct RunLog {
    run_id: String,
    sink: Mutex<Box<dyn Write + Send>>,
}

impl RunLog {
    /// Create (or truncate) a log file.
    pub fn create(path: &Path) -> io::Result<Self> {
        Ok(Self::from_writer(File::create(path)?))
    }

    /// Log into an arbitrary writer.
    pub fn from_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            sink: Mutex::new(Box::new(writer)),
        }
    }

    /// A log that drops everything
    pub fn discard() -> Self {
        Self::from_writer(io::sink())
    }

    /// Unique identifier stamped on every line of this run
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Log an event with the given severity and fields
    ///
    /// Fields are output in deterministic order (alphabetical by key).
    /// Write failures are ignored; logging never fails the run.
    pub fn log(&self, severity: Severity, event: &str, fields: &[(&str, &str)]) {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let line = format_line(severity, event, &timestamp, &self.run_id, fields);

        let mut sink = self.lock_sink();
        let _ = sink.write_all(line.as_bytes());
        let _ = sink.flush();
    }

    /// Log a typed event; fatal events are logged at FATAL
    pub fn event(&self, event: Event, fields: &[(&str, &str)]) {
        let severity = if event.is_fatal() {
            Severity::Fatal
        } else {
            Severity::Info
        };
        self.log(severity, event.as_str(), fields);
    }

    /// Log at INFO level
    pub fn info(&self, event: &str, fields: &[(&str, &str)]) {
        self.log(Severity::Info, event, fields);
    }

    /// Log at WARN level
    pub fn warn(&self, event: &str, fields: &[(&str, &str)]) {
        self.log(Severity::Warn, event, fields);
    }

    fn lock_sink(&self) -> MutexGuard<'_, Box<dyn Write + Send>> {
        // A panic mid-write leaves the sink usable
        match self.sink.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl fmt::Debug for RunLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunLog").field("run_id", &self.run_id).finish()
    }
}

/// Render one JSON line: event, severity, ts, run, then sorted fields.
fn format_line(
    severity: Severity,
    event: &str,
    timestamp: &str,
    run_id: &str,
    fields: &[(&str, &str)],
) -> String {
    let mut output = String::with_capacity(256);

    output.push_str("{\"event\":\"");
    escape_json_string(&mut output, event);
    output.push_str("\",\"severity\":\"");
    output.push_str(severity.as_str());
    output.push_str("\",\"ts\":\"");
    escape_json_string(&mut output, timestamp);
    output.push_str("\",\"run\":\"");
    escape_json_string(&mut output, run_id);
    output.push('"');

    let mut sorted_fields: Vec<_> = fields.iter().collect();
    sorted_fields.sort_by_key(|(k, _)| *k);

    for (key, value) in sorted_fields {
        output.push_str(",\"");
        escape_json_string(&mut output, key);
        output.push_str("\":\"");
        escape_json_string(&mut output, value);
        output.push('"');
    }

    output.push_str("}\n");
    output
}

/// Escape special characters for JSON strings
fn escape_json_string(output: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '"' => output.push_str("\\\""),
            '\\' => output.push_str("\\\\"),
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            '\t' => output.push_str("\\t"),
            c if c.is_control() => {
                output.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => output.push(c),
        }
    }
}
