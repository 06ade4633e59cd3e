//! Active-path change history.
//!
//! Provides an immutable record of a machine's path changes over time. The
//! history is a value: recording returns a new history, so snapshots handed
//! out by the facade are never mutated behind a caller's back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single active-path change.
///
/// `from` and `to` are dotted active paths as reported by
/// [`Machine::current_state`](crate::Machine::current_state); `from` is empty
/// for the first activation.
///
/// # Example
///
/// ```rust
/// use statecraft::core::TransitionRecord;
/// use chrono::Utc;
///
/// let record = TransitionRecord {
///     from: String::new(),
///     to: "idle".to_string(),
///     at: Utc::now(),
/// };
/// assert!(record.from.is_empty());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// The active path before the change (empty before the first activation).
    pub from: String,
    /// The active path after the change.
    pub to: String,
    /// When the change was observed.
    pub at: DateTime<Utc>,
}

/// Ordered history of active-path changes.
///
/// History is immutable: [`record`](StateHistory::record) returns a new
/// history with the change appended.
///
/// # Example
///
/// ```rust
/// use statecraft::core::{StateHistory, TransitionRecord};
/// use chrono::Utc;
///
/// let history = StateHistory::new();
/// let history = history.record(TransitionRecord {
///     from: String::new(),
///     to: "idle".to_string(),
///     at: Utc::now(),
/// });
/// let history = history.record(TransitionRecord {
///     from: "idle".to_string(),
///     to: "running".to_string(),
///     at: Utc::now(),
/// });
///
/// assert_eq!(history.path_sequence(), vec!["", "idle", "running"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateHistory {
    records: Vec<TransitionRecord>,
}

impl StateHistory {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Record a path change, returning a new history.
    ///
    /// The existing history is left untouched.
    pub fn record(&self, record: TransitionRecord) -> Self {
        let mut records = self.records.clone();
        records.push(record);
        Self { records }
    }

    /// All recorded changes, in order.
    pub fn records(&self) -> &[TransitionRecord] {
        &self.records
    }

    /// The most recent change, if any.
    pub fn last(&self) -> Option<&TransitionRecord> {
        self.records.last()
    }

    /// The sequence of paths traversed: the first record's `from`, then the
    /// `to` of every record. Empty when nothing was recorded.
    pub fn path_sequence(&self) -> Vec<&str> {
        let mut path = Vec::new();
        if let Some(first) = self.records.first() {
            path.push(first.from.as_str());
        }
        for record in &self.records {
            path.push(record.to.as_str());
        }
        path
    }

    /// Duration between the first and last recorded change; `None` when the
    /// history is empty.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.records.first(), self.records.last()) {
            last.at.signed_duration_since(first.at).to_std().ok()
        } else {
            None
        }
    }

    /// Number of recorded changes.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing was recorded yet.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
