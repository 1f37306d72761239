//! Breathing pattern definitions.
//!
//! A pattern stores its four phase durations in deciseconds (tenths of a
//! second) and is converted to seconds only where a value is used as a time
//! quantity. Hold durations of zero mean the phase is skipped entirely.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PatternError;

/// One of the four timed segments of a breathing cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Inhale,
    InhaleHold,
    Exhale,
    ExhaleHold,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Phase::Inhale => "inhale",
            Phase::InhaleHold => "inhale-hold",
            Phase::Exhale => "exhale",
            Phase::ExhaleHold => "exhale-hold",
        };
        f.write_str(s)
    }
}

/// Synthesized-cue profile assigned to a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SoundProfile {
    SoftBell,
    Chime,
    Nature,
    Bright,
    None,
}

impl SoundProfile {
    pub fn as_str(self) -> &'static str {
        match self {
            SoundProfile::SoftBell => "soft-bell",
            SoundProfile::Chime => "chime",
            SoundProfile::Nature => "nature",
            SoundProfile::Bright => "bright",
            SoundProfile::None => "none",
        }
    }
}

impl std::str::FromStr for SoundProfile {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "soft-bell" => Ok(SoundProfile::SoftBell),
            "chime" => Ok(SoundProfile::Chime),
            "nature" => Ok(SoundProfile::Nature),
            "bright" => Ok(SoundProfile::Bright),
            "none" => Ok(SoundProfile::None),
            other => Err(PatternError::UnknownSoundProfile(other.to_string())),
        }
    }
}

/// An immutable breathing pattern.
///
/// Invariants (checked by [`validate`](Self::validate)): inhale and exhale
/// durations are positive, the cycle count is positive. Hold durations may
/// be zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternDefinition {
    pub id: String,
    pub name: String,
    /// Inhale duration in deciseconds.
    pub inhale_ds: u32,
    /// Inhale-hold duration in deciseconds; zero skips the phase.
    pub inhale_hold_ds: u32,
    /// Exhale duration in deciseconds.
    pub exhale_ds: u32,
    /// Exhale-hold duration in deciseconds; zero skips the phase.
    pub exhale_hold_ds: u32,
    /// Cycles per session.
    pub cycles: u32,
    pub sound_profile: SoundProfile,
    /// Opaque display tag; the engine never interprets it.
    pub theme: String,
}

impl PatternDefinition {
    /// Build a custom pattern with a fresh id.
    #[allow(clippy::too_many_arguments)]
    pub fn custom(
        name: impl Into<String>,
        inhale_ds: u32,
        inhale_hold_ds: u32,
        exhale_ds: u32,
        exhale_hold_ds: u32,
        cycles: u32,
        sound_profile: SoundProfile,
        theme: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            inhale_ds,
            inhale_hold_ds,
            exhale_ds,
            exhale_hold_ds,
            cycles,
            sound_profile,
            theme: theme.into(),
        }
    }

    /// Check the phase-duration invariants.
    pub fn validate(&self) -> Result<(), PatternError> {
        if self.inhale_ds == 0 {
            return Err(PatternError::ZeroPhaseDuration { field: "inhale_ds" });
        }
        if self.exhale_ds == 0 {
            return Err(PatternError::ZeroPhaseDuration { field: "exhale_ds" });
        }
        if self.cycles == 0 {
            return Err(PatternError::ZeroCycles);
        }
        Ok(())
    }

    /// Duration of one phase in deciseconds.
    pub fn phase_ds(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Inhale => self.inhale_ds,
            Phase::InhaleHold => self.inhale_hold_ds,
            Phase::Exhale => self.exhale_ds,
            Phase::ExhaleHold => self.exhale_hold_ds,
        }
    }

    /// Duration of one phase in seconds.
    pub fn phase_secs(&self, phase: Phase) -> f64 {
        f64::from(self.phase_ds(phase)) / 10.0
    }

    /// Nominal length of a full run in seconds, as opposed to the actual
    /// elapsed wall-clock time of a real run.
    pub fn nominal_total_secs(&self) -> f64 {
        let cycle_ds = u64::from(self.inhale_ds)
            + u64::from(self.inhale_hold_ds)
            + u64::from(self.exhale_ds)
            + u64::from(self.exhale_hold_ds);
        (cycle_ds * u64::from(self.cycles)) as f64 / 10.0
    }
}

/// The built-in presets seeded into the product.
pub fn presets() -> Vec<PatternDefinition> {
    vec![
        PatternDefinition {
            id: "coherence-5-5".into(),
            name: "Coherence 5-5".into(),
            inhale_ds: 50,
            inhale_hold_ds: 0,
            exhale_ds: 50,
            exhale_hold_ds: 0,
            cycles: 6,
            sound_profile: SoundProfile::SoftBell,
            theme: "ocean".into(),
        },
        PatternDefinition {
            id: "relax-4-7-8".into(),
            name: "Relaxation 4-7-8".into(),
            inhale_ds: 40,
            inhale_hold_ds: 70,
            exhale_ds: 80,
            exhale_hold_ds: 0,
            cycles: 4,
            sound_profile: SoundProfile::Chime,
            theme: "sunset".into(),
        },
        PatternDefinition {
            id: "box-4x4".into(),
            name: "Box 4x4".into(),
            inhale_ds: 40,
            inhale_hold_ds: 40,
            exhale_ds: 40,
            exhale_hold_ds: 40,
            cycles: 6,
            sound_profile: SoundProfile::Nature,
            theme: "forest".into(),
        },
        PatternDefinition {
            id: "calm-4-6".into(),
            name: "Calming 4-6".into(),
            inhale_ds: 40,
            inhale_hold_ds: 0,
            exhale_ds: 60,
            exhale_hold_ds: 0,
            cycles: 8,
            sound_profile: SoundProfile::SoftBell,
            theme: "night".into(),
        },
        PatternDefinition {
            id: "energize-3-3".into(),
            name: "Energizing 3-3".into(),
            inhale_ds: 30,
            inhale_hold_ds: 0,
            exhale_ds: 30,
            exhale_hold_ds: 0,
            cycles: 10,
            sound_profile: SoundProfile::Bright,
            theme: "dawn".into(),
        },
    ]
}

/// Look up a preset by id or (case-insensitive) name.
pub fn find_preset(selector: &str) -> Option<PatternDefinition> {
    presets()
        .into_iter()
        .find(|p| p.id == selector || p.name.eq_ignore_ascii_case(selector))
}
