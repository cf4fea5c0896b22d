use serde::{Deserialize, Serialize};

/// Coarse pen speed classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WritingSpeed {
    Slow,
    #[default]
    Medium,
    Fast,
}

/// Range and spread of pen pressure across all samples
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PressureDynamics {
    pub min: f32,
    pub max: f32,
    pub avg: f32,
    /// `max - min`
    pub variation: f32,
}

impl Default for PressureDynamics {
    fn default() -> Self {
        Self {
            min: 0.5,
            max: 0.5,
            avg: 0.5,
            variation: 0.0,
        }
    }
}

/// Statistical summary of a writer's handwriting
///
/// Produced once per training session and persisted by the caller. Any
/// field the samples carry no evidence for keeps its default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleProfile {
    /// Mean stroke slant in degrees
    pub slant: f32,
    /// Letter/word spacing multiplier
    pub spacing: f32,
    /// 0.0 (tidy) to 1.0 (messy)
    pub messiness: f32,
    /// Standard deviation of stroke centers (px)
    pub baseline_variation: f32,
    pub pressure_dynamics: PressureDynamics,
    /// Whether the writer joins letters within words
    pub connect_letters: bool,
    pub speed: WritingSpeed,
}

impl Default for StyleProfile {
    fn default() -> Self {
        Self {
            slant: 0.0,
            spacing: 1.0,
            messiness: 0.0,
            baseline_variation: 0.0,
            pressure_dynamics: PressureDynamics::default(),
            connect_letters: false,
            speed: WritingSpeed::Medium,
        }
    }
}
