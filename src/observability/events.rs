//! Observable events of a selection run
//!
//! Events are explicit and typed.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Run lifecycle
    /// Preconditions verified, run begins
    RunStart,
    /// Every partition finished
    RunComplete,
    /// A fatal error stopped the run (FATAL)
    RunAborted,

    // Setup
    /// Source configuration loaded
    ConfigLoaded,
    /// Identifier set loaded
    IdsLoaded,
    /// Label directory copied into the target
    CodesCopied,
    /// Target bucket tree created
    TargetPrepared,

    // Partition work
    /// Partition job acquired a slot
    PartitionStart,
    /// Selection mask computed
    MaskBuilt,
    /// One column transcoded
    ColumnWritten,
    /// Partition job finished
    PartitionComplete,
    /// Partition job failed (FATAL)
    PartitionFailed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::RunStart => "RUN_START",
            Event::RunComplete => "RUN_COMPLETE",
            Event::RunAborted => "RUN_ABORTED",

            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::IdsLoaded => "IDS_LOADED",
            Event::CodesCopied => "CODES_COPIED",
            Event::TargetPrepared => "TARGET_PREPARED",

            Event::PartitionStart => "PARTITION_START",
            Event::MaskBuilt => "MASK_BUILT",
            Event::ColumnWritten => "COLUMN_WRITTEN",
            Event::PartitionComplete => "PARTITION_COMPLETE",
            Event::PartitionFailed => "PARTITION_FAILED",
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::RunAborted | Event::PartitionFailed)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
