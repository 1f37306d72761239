//! Synthesized audio cue descriptions.
//!
//! The mapping from (sound profile, phase category) to a cue is pure data:
//! the library describes the waveform, frequencies and envelope of a short
//! synthesized event, and the host decides how to render it. The only
//! mutable state is the per-dispatcher mute flag, owned by one
//! [`CueDispatcher`] instance and passed by reference -- never ambient.

use serde::{Deserialize, Serialize};

use crate::pattern::{Phase, SoundProfile};

/// Audible category of a phase. Both hold phases share one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseCategory {
    Inhale,
    Exhale,
    Hold,
}

impl From<Phase> for PhaseCategory {
    fn from(phase: Phase) -> Self {
        match phase {
            Phase::Inhale => PhaseCategory::Inhale,
            Phase::Exhale => PhaseCategory::Exhale,
            Phase::InhaleHold | Phase::ExhaleHold => PhaseCategory::Hold,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Sine,
    Triangle,
    Square,
}

/// A short synthesized audio event: one or more oscillator notes sharing a
/// waveform and a linear-attack/exponential-release gain envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CueSpec {
    pub waveform: Waveform,
    /// Oscillator frequencies; chords and arpeggios list every note.
    pub frequencies_hz: Vec<f32>,
    /// Delay between successive note starts, in seconds.
    pub note_offset_secs: f32,
    pub attack_secs: f32,
    pub release_secs: f32,
    pub peak_gain: f32,
    /// Low-pass filter cutoff, where the profile uses one.
    pub lowpass_hz: Option<f32>,
}

/// Pure mapping from profile and phase category to a cue description.
///
/// The `none` profile yields no cue.
pub fn phase_cue(profile: SoundProfile, category: PhaseCategory) -> Option<CueSpec> {
    match profile {
        SoundProfile::SoftBell => Some(soft_bell(category)),
        SoundProfile::Chime => Some(chime(category)),
        SoundProfile::Nature => Some(nature(category)),
        SoundProfile::Bright => Some(bright(category)),
        SoundProfile::None => None,
    }
}

fn soft_bell(category: PhaseCategory) -> CueSpec {
    // A4 / E4 / G4
    let freq = match category {
        PhaseCategory::Inhale => 440.0,
        PhaseCategory::Exhale => 330.0,
        PhaseCategory::Hold => 392.0,
    };
    CueSpec {
        waveform: Waveform::Sine,
        frequencies_hz: vec![freq],
        note_offset_secs: 0.0,
        attack_secs: 0.05,
        release_secs: 0.8,
        peak_gain: 0.3,
        lowpass_hz: None,
    }
}

fn chime(category: PhaseCategory) -> CueSpec {
    let frequencies_hz = match category {
        PhaseCategory::Inhale => vec![523.0, 659.0, 784.0], // C5 E5 G5
        PhaseCategory::Exhale => vec![392.0, 494.0, 587.0], // G4 B4 D5
        PhaseCategory::Hold => vec![440.0, 554.0, 659.0],   // A4 C#5 E5
    };
    CueSpec {
        waveform: Waveform::Sine,
        frequencies_hz,
        note_offset_secs: 0.05,
        attack_secs: 0.03,
        release_secs: 0.6,
        peak_gain: 0.15,
        lowpass_hz: None,
    }
}

fn nature(category: PhaseCategory) -> CueSpec {
    let (freq, cutoff) = match category {
        PhaseCategory::Inhale => (220.0, 800.0),
        PhaseCategory::Exhale => (165.0, 600.0),
        PhaseCategory::Hold => (196.0, 700.0),
    };
    CueSpec {
        waveform: Waveform::Triangle,
        frequencies_hz: vec![freq],
        note_offset_secs: 0.0,
        attack_secs: 0.1,
        release_secs: 0.5,
        peak_gain: 0.2,
        lowpass_hz: Some(cutoff),
    }
}

fn bright(category: PhaseCategory) -> CueSpec {
    // A5 / E5 / G5
    let freq = match category {
        PhaseCategory::Inhale => 880.0,
        PhaseCategory::Exhale => 659.0,
        PhaseCategory::Hold => 784.0,
    };
    CueSpec {
        waveform: Waveform::Square,
        frequencies_hz: vec![freq],
        note_offset_secs: 0.0,
        attack_secs: 0.02,
        release_secs: 0.3,
        peak_gain: 0.1,
        lowpass_hz: None,
    }
}

/// Ascending arpeggio played once on natural completion, independent of the
/// pattern's sound profile.
pub fn completion_cue() -> CueSpec {
    CueSpec {
        waveform: Waveform::Sine,
        frequencies_hz: vec![523.0, 659.0, 784.0, 1047.0], // C5 E5 G5 C6
        note_offset_secs: 0.15,
        attack_secs: 0.05,
        release_secs: 0.8,
        peak_gain: 0.2,
        lowpass_hz: None,
    }
}

/// Dispatches cues for one session.
///
/// When muted, every dispatch is a no-op regardless of profile.
#[derive(Debug, Clone, Default)]
pub struct CueDispatcher {
    muted: bool,
}

impl CueDispatcher {
    pub fn new(muted: bool) -> Self {
        Self { muted }
    }

    pub fn muted(&self) -> bool {
        self.muted
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn toggle_muted(&mut self) {
        self.muted = !self.muted;
    }

    /// Cue for a phase entry, or `None` when muted or the profile is silent.
    pub fn dispatch(&self, profile: SoundProfile, category: PhaseCategory) -> Option<CueSpec> {
        if self.muted {
            return None;
        }
        phase_cue(profile, category)
    }

    /// Completion cue, or `None` when muted.
    pub fn dispatch_completion(&self) -> Option<CueSpec> {
        if self.muted {
            return None;
        }
        Some(completion_cue())
    }
}
