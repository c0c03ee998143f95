//! Structured combat log entries.
//!
//! Every resolved action reports exactly one entry through the injected
//! callback. The engine never formats for display; the consumer owns
//! presentation.

use serde::{Deserialize, Serialize};

use crate::core::PlayerId;

/// One structured combat-log record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub player: PlayerId,
    pub action_type: String,
    pub source: String,
    pub target: String,
    pub outcome: String,
    /// Optional tag identifying the code path that produced the entry.
    pub debug_source: Option<String>,
}

impl LogEntry {
    /// Create an entry with no debug tag.
    #[must_use]
    pub fn new(
        player: PlayerId,
        action_type: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        outcome: impl Into<String>,
    ) -> Self {
        Self {
            player,
            action_type: action_type.into(),
            source: source.into(),
            target: target.into(),
            outcome: outcome.into(),
            debug_source: None,
        }
    }

    /// Attach a debug-source tag (builder pattern).
    #[must_use]
    pub fn with_debug_source(mut self, tag: impl Into<String>) -> Self {
        self.debug_source = Some(tag.into());
        self
    }
}

/// Callback the resolvers report entries through.
pub type LogSink<'a> = dyn FnMut(LogEntry) + 'a;
