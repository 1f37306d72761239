//! Session engine implementation.
//!
//! The engine is a cooperatively driven state machine: it owns no clock and
//! no thread. The host calls `tick(delta_seconds)` at whatever cadence it
//! likes, and the engine stays correct for any positive delta, including
//! large catch-up values after a suspension. Pausing simply stops the host
//! from ticking, so no time advances while paused.
//!
//! ## State transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!           |  \
//!           |   -> Idle (stop, run discarded)
//!           v
//!        Completed -> Idle (reset)
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::audio::CueDispatcher;
use crate::error::SessionError;
use crate::events::Event;
use crate::pattern::{PatternDefinition, Phase};
use crate::session::amplitude;
use crate::session::recorder::{SessionRecorder, SessionSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Idle,
    Running,
    Paused,
    Completed,
}

/// Run-time state of one session.
///
/// Created by `start()`, mutated only by the engine that owns it, and reset
/// to the idle configuration by `stop()` or `reset()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRunState {
    pub status: SessionStatus,
    pub current_phase: Phase,
    /// 1-based, in `[1, pattern.cycles]`.
    pub current_cycle: u32,
    /// Seconds left in the current phase.
    pub phase_remaining_secs: f64,
    /// Seconds left across the whole run (nominal countdown).
    pub total_remaining_secs: f64,
    /// Wall-clock start of the run. The recorded duration derives from this,
    /// not from the nominal countdown; the two diverge when the host clock
    /// throttles ticks.
    pub started_at: Option<DateTime<Utc>>,
}

impl SessionRunState {
    fn idle(pattern: &PatternDefinition) -> Self {
        Self {
            status: SessionStatus::Idle,
            current_phase: Phase::Inhale,
            current_cycle: 1,
            phase_remaining_secs: pattern.phase_secs(Phase::Inhale),
            total_remaining_secs: pattern.nominal_total_secs(),
            started_at: None,
        }
    }
}

enum Advance {
    Phase(Event),
    Completed(Event),
}

/// Phase state machine for one breathing run.
///
/// Single writer: one engine instance drives one run at a time, and callers
/// serialize access. The cue dispatcher and session recorder are owned by
/// the engine and invoked synchronously from its transitions.
pub struct SessionEngine {
    pattern: PatternDefinition,
    state: SessionRunState,
    dispatcher: CueDispatcher,
    recorder: Box<dyn SessionRecorder>,
}

impl SessionEngine {
    pub fn new(
        pattern: PatternDefinition,
        dispatcher: CueDispatcher,
        recorder: Box<dyn SessionRecorder>,
    ) -> Self {
        let state = SessionRunState::idle(&pattern);
        Self {
            pattern,
            state,
            dispatcher,
            recorder,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn status(&self) -> SessionStatus {
        self.state.status
    }

    pub fn state(&self) -> &SessionRunState {
        &self.state
    }

    pub fn pattern(&self) -> &PatternDefinition {
        &self.pattern
    }

    pub fn dispatcher_mut(&mut self) -> &mut CueDispatcher {
        &mut self.dispatcher
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn phase_progress(&self) -> f64 {
        let total = self.pattern.phase_secs(self.state.current_phase);
        if total <= 0.0 {
            return 0.0;
        }
        (1.0 - self.state.phase_remaining_secs / total).clamp(0.0, 1.0)
    }

    /// Guide amplitude for the current state; baseline whenever the run is
    /// not in progress.
    pub fn amplitude(&self) -> f64 {
        if self.state.status != SessionStatus::Running {
            return amplitude::BASELINE;
        }
        amplitude::amplitude(self.state.current_phase, self.phase_progress())
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            status: self.state.status,
            phase: self.state.current_phase,
            cycle: self.state.current_cycle,
            phase_remaining_secs: self.state.phase_remaining_secs,
            total_remaining_secs: self.state.total_remaining_secs,
            amplitude: self.amplitude(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a run. Valid only from `Idle`; validates the pattern first and
    /// stays `Idle` when it is rejected.
    pub fn start(&mut self) -> Result<Event, SessionError> {
        if self.state.status != SessionStatus::Idle {
            return Err(SessionError::InvalidTransition {
                from: self.state.status,
                action: "start",
            });
        }
        self.pattern.validate()?;

        self.state = SessionRunState::idle(&self.pattern);
        self.state.status = SessionStatus::Running;
        self.state.started_at = Some(Utc::now());
        let cue = self
            .dispatcher
            .dispatch(self.pattern.sound_profile, Phase::Inhale.into());
        Ok(Event::SessionStarted {
            pattern_id: self.pattern.id.clone(),
            pattern_name: self.pattern.name.clone(),
            cycle: self.state.current_cycle,
            phase: self.state.current_phase,
            phase_secs: self.pattern.phase_secs(Phase::Inhale),
            total_secs: self.pattern.nominal_total_secs(),
            cue,
            at: Utc::now(),
        })
    }

    /// Suspend the run. The countdown fields are left untouched, so a
    /// pause/resume pair loses no time.
    pub fn pause(&mut self) -> Result<Event, SessionError> {
        if self.state.status != SessionStatus::Running {
            return Err(SessionError::InvalidTransition {
                from: self.state.status,
                action: "pause",
            });
        }
        self.state.status = SessionStatus::Paused;
        Ok(Event::SessionPaused {
            phase_remaining_secs: self.state.phase_remaining_secs,
            total_remaining_secs: self.state.total_remaining_secs,
            at: Utc::now(),
        })
    }

    pub fn resume(&mut self) -> Result<Event, SessionError> {
        if self.state.status != SessionStatus::Paused {
            return Err(SessionError::InvalidTransition {
                from: self.state.status,
                action: "resume",
            });
        }
        self.state.status = SessionStatus::Running;
        Ok(Event::SessionResumed {
            phase_remaining_secs: self.state.phase_remaining_secs,
            total_remaining_secs: self.state.total_remaining_secs,
            at: Utc::now(),
        })
    }

    /// Discard the run without producing a record.
    pub fn stop(&mut self) -> Result<Event, SessionError> {
        match self.state.status {
            SessionStatus::Running | SessionStatus::Paused => {
                self.state = SessionRunState::idle(&self.pattern);
                Ok(Event::SessionStopped { at: Utc::now() })
            }
            from => Err(SessionError::InvalidTransition {
                from,
                action: "stop",
            }),
        }
    }

    /// Return to the pre-run configuration after a completed run, emitting
    /// nothing else.
    pub fn reset(&mut self) -> Result<Event, SessionError> {
        if self.state.status != SessionStatus::Completed {
            return Err(SessionError::InvalidTransition {
                from: self.state.status,
                action: "reset",
            });
        }
        self.state = SessionRunState::idle(&self.pattern);
        Ok(Event::SessionReset { at: Utc::now() })
    }

    /// Advance the run by `delta_seconds`.
    ///
    /// A delta larger than the remaining time of the current phase advances
    /// through as many phases as it covers in this one call; the overshoot
    /// is consumed against each next phase's duration rather than dropped,
    /// and `phase_remaining_secs` never goes negative. Outside `Running`
    /// this is a no-op.
    pub fn tick(&mut self, delta_seconds: f64) -> Vec<Event> {
        if self.state.status != SessionStatus::Running || delta_seconds <= 0.0 {
            return Vec::new();
        }

        self.state.total_remaining_secs =
            (self.state.total_remaining_secs - delta_seconds).max(0.0);

        let mut events = Vec::new();
        let mut carry = delta_seconds;
        loop {
            if carry < self.state.phase_remaining_secs {
                self.state.phase_remaining_secs -= carry;
                break;
            }
            carry -= self.state.phase_remaining_secs;
            self.state.phase_remaining_secs = 0.0;
            match self.advance() {
                Advance::Phase(event) => events.push(event),
                Advance::Completed(event) => {
                    events.push(event);
                    break;
                }
            }
        }
        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Next phase within the current cycle, or `None` at end-of-cycle.
    /// Zero-duration holds are skipped.
    fn next_phase(&self) -> Option<Phase> {
        match self.state.current_phase {
            Phase::Inhale if self.pattern.inhale_hold_ds > 0 => Some(Phase::InhaleHold),
            Phase::Inhale | Phase::InhaleHold => Some(Phase::Exhale),
            Phase::Exhale if self.pattern.exhale_hold_ds > 0 => Some(Phase::ExhaleHold),
            Phase::Exhale | Phase::ExhaleHold => None,
        }
    }

    fn advance(&mut self) -> Advance {
        if let Some(next) = self.next_phase() {
            return self.enter_phase(next);
        }
        if self.state.current_cycle < self.pattern.cycles {
            self.state.current_cycle += 1;
            return self.enter_phase(Phase::Inhale);
        }
        self.complete()
    }

    fn enter_phase(&mut self, phase: Phase) -> Advance {
        self.state.current_phase = phase;
        self.state.phase_remaining_secs = self.pattern.phase_secs(phase);
        let cue = self
            .dispatcher
            .dispatch(self.pattern.sound_profile, phase.into());
        Advance::Phase(Event::PhaseStarted {
            cycle: self.state.current_cycle,
            phase,
            phase_secs: self.pattern.phase_secs(phase),
            cue,
            at: Utc::now(),
        })
    }

    /// Natural completion: reachable only from `Running`, so the summary is
    /// emitted exactly once per run and can never race a `stop()`.
    fn complete(&mut self) -> Advance {
        self.state.status = SessionStatus::Completed;
        self.state.phase_remaining_secs = 0.0;
        self.state.total_remaining_secs = 0.0;

        let elapsed_secs = self
            .state
            .started_at
            .map_or(0.0, |t| (Utc::now() - t).num_milliseconds() as f64 / 1000.0);
        let summary = SessionSummary {
            pattern_id: Some(self.pattern.id.clone()),
            pattern_name: self.pattern.name.clone(),
            duration_seconds: elapsed_secs.max(0.0).round() as u32,
            cycles_completed: self.pattern.cycles,
        };
        self.recorder.record(&summary);

        let cue = self.dispatcher.dispatch_completion();
        Advance::Completed(Event::SessionCompleted {
            summary,
            cue,
            at: Utc::now(),
        })
    }
}
