use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::audio::CueSpec;
use crate::pattern::Phase;
use crate::session::{SessionStatus, SessionSummary};

/// Every state change in the engine produces an Event.
///
/// Hosts render events as they arrive; cue payloads carry the audio to
/// synthesize for the transition that produced the event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        pattern_id: String,
        pattern_name: String,
        cycle: u32,
        phase: Phase,
        phase_secs: f64,
        total_secs: f64,
        cue: Option<CueSpec>,
        at: DateTime<Utc>,
    },
    /// A phase was entered mid-run (every entry after the first inhale).
    PhaseStarted {
        cycle: u32,
        phase: Phase,
        phase_secs: f64,
        cue: Option<CueSpec>,
        at: DateTime<Utc>,
    },
    SessionPaused {
        phase_remaining_secs: f64,
        total_remaining_secs: f64,
        at: DateTime<Utc>,
    },
    SessionResumed {
        phase_remaining_secs: f64,
        total_remaining_secs: f64,
        at: DateTime<Utc>,
    },
    /// The run was discarded; no record is produced.
    SessionStopped {
        at: DateTime<Utc>,
    },
    /// Natural completion; the summary has already been handed to the
    /// session recorder when this event is observed.
    SessionCompleted {
        summary: SessionSummary,
        cue: Option<CueSpec>,
        at: DateTime<Utc>,
    },
    SessionReset {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        status: SessionStatus,
        phase: Phase,
        cycle: u32,
        phase_remaining_secs: f64,
        total_remaining_secs: f64,
        amplitude: f64,
        at: DateTime<Utc>,
    },
}
