//! # Respira Core Library
//!
//! Core business logic for Respira, a guided-breathing trainer. All
//! operations are available through the standalone CLI binary; the library
//! itself is host-agnostic.
//!
//! ## Architecture
//!
//! - **Session Engine**: a cooperatively driven state machine -- the host
//!   calls `tick(delta_seconds)` at its own cadence and renders the events
//!   the engine returns
//! - **Cue Dispatcher**: pure descriptions of the synthesized audio cues
//!   marking phase transitions
//! - **Streak Analyzer**: pure habit statistics over completed-session
//!   history
//! - **Storage**: SQLite-based session history and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`SessionEngine`]: phase state machine for one breathing run
//! - [`CueDispatcher`]: audio cue dispatch with a per-instance mute flag
//! - [`StreakStatistics`]: streaks, totals and trailing-window aggregates
//! - [`Database`]: session and pattern persistence

pub mod audio;
pub mod error;
pub mod events;
pub mod pattern;
pub mod session;
pub mod stats;
pub mod storage;

pub use audio::{CueDispatcher, CueSpec, PhaseCategory, Waveform};
pub use error::{ConfigError, CoreError, HistoryError, PatternError, SessionError};
pub use events::Event;
pub use pattern::{PatternDefinition, Phase, SoundProfile};
pub use session::{
    DatabaseRecorder, NullRecorder, SessionEngine, SessionRecorder, SessionRunState,
    SessionStatus, SessionSummary,
};
pub use stats::{DailyActivity, StreakStatistics};
pub use storage::{Config, Database, SessionRecord};
