//! Completed-session hand-off boundary.
//!
//! The engine calls [`SessionRecorder::record`] exactly once per naturally
//! completed run and ignores the outcome: the signature is infallible, so
//! implementations log persistence failures instead of returning them, and a
//! failed record never alters the completed run.

use serde::{Deserialize, Serialize};

use crate::storage::Database;

/// Summary emitted when a run completes naturally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub pattern_id: Option<String>,
    /// Snapshot of the pattern's display name; survives pattern deletion.
    pub pattern_name: String,
    /// Actual elapsed wall-clock duration, rounded to whole seconds.
    pub duration_seconds: u32,
    pub cycles_completed: u32,
}

/// Sink for completed-session summaries.
pub trait SessionRecorder {
    fn record(&mut self, summary: &SessionSummary);
}

/// Recorder that persists summaries to the history store.
pub struct DatabaseRecorder {
    db: Database,
    user_id: String,
}

impl DatabaseRecorder {
    pub fn new(db: Database, user_id: impl Into<String>) -> Self {
        Self {
            db,
            user_id: user_id.into(),
        }
    }
}

impl SessionRecorder for DatabaseRecorder {
    fn record(&mut self, summary: &SessionSummary) {
        if let Err(e) = self.db.record_session(&self.user_id, summary) {
            log::warn!("failed to record completed session: {e}");
        }
    }
}

/// Recorder that drops summaries.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRecorder;

impl SessionRecorder for NullRecorder {
    fn record(&mut self, _summary: &SessionSummary) {}
}
