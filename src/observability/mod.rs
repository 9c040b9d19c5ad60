//! Observability for selection runs
//!
//! - Structured JSON-lines run log, safe to share across partition jobs
//! - Typed lifecycle events
//! - Atomic run counters
//!
//! # Usage
//!
//! ```ignore
//! use colselect::observability::{Event, RunLog, SelectMetrics};
//!
//! let log = RunLog::create(Path::new("select.log"))?;
//! log.event(Event::MaskBuilt, &[("bucket", "3"), ("selected", "12")]);
//!
//! let metrics = SelectMetrics::new();
//! metrics.add_rows(100, 12);
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{RunLog, Severity};
pub use metrics::{MetricsSnapshot, SelectMetrics};
