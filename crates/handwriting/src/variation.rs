//! Transient style variation
//!
//! A [`StyleVariation`] nudges a learned [`StyleProfile`] for a single
//! synthesis call, either with a named [`Mood`] preset, explicit overrides,
//! or both. Variations usually arrive from AI-generated text, so anything
//! coming off the wire is validated field by field before use.

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use scribe_ipc::{StyleDirective, StyledResponse};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::constants::{MAX_VARIATION_SLANT, MAX_VARIATION_SPACING, MIN_VARIATION_SPACING};
use crate::profile::StyleProfile;
use crate::validation::clamp_unit;

/// Named expressive presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Excited,
    Calm,
    Formal,
    Casual,
    Urgent,
    Thoughtful,
    Confident,
    Uncertain,
}

/// Concrete slant/spacing/messiness triple for a mood
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoodPreset {
    pub slant: f32,
    pub spacing: f32,
    pub messiness: f32,
}

impl Mood {
    pub const ALL: [Mood; 8] = [
        Mood::Excited,
        Mood::Calm,
        Mood::Formal,
        Mood::Casual,
        Mood::Urgent,
        Mood::Thoughtful,
        Mood::Confident,
        Mood::Uncertain,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Mood::Excited => "excited",
            Mood::Calm => "calm",
            Mood::Formal => "formal",
            Mood::Casual => "casual",
            Mood::Urgent => "urgent",
            Mood::Thoughtful => "thoughtful",
            Mood::Confident => "confident",
            Mood::Uncertain => "uncertain",
        }
    }

    pub fn preset(self) -> MoodPreset {
        let (slant, spacing, messiness) = match self {
            Mood::Excited => (8.0, 1.3, 0.6),
            Mood::Calm => (2.0, 1.1, 0.2),
            Mood::Formal => (0.0, 1.0, 0.1),
            Mood::Casual => (4.0, 1.2, 0.4),
            Mood::Urgent => (10.0, 0.8, 0.7),
            Mood::Thoughtful => (-2.0, 1.4, 0.3),
            Mood::Confident => (5.0, 1.0, 0.2),
            Mood::Uncertain => (-4.0, 1.2, 0.5),
        };
        MoodPreset {
            slant,
            spacing,
            messiness,
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown mood: {0}")]
pub struct UnknownMood(pub String);

impl FromStr for Mood {
    type Err = UnknownMood;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Mood::ALL
            .into_iter()
            .find(|mood| mood.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownMood(s.to_string()))
    }
}

/// Partial, transient override of a style profile
///
/// - `slant` is added to the current slant (degrees)
/// - `spacing` multiplies the current spacing
/// - `messiness` replaces the current messiness
/// - `mood` swaps in a preset before the explicit fields apply
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleVariation {
    pub slant: Option<f32>,
    pub spacing: Option<f32>,
    pub messiness: Option<f32>,
    pub mood: Option<Mood>,
}

impl StyleVariation {
    pub fn is_empty(&self) -> bool {
        self.slant.is_none() && self.spacing.is_none() && self.messiness.is_none() && self.mood.is_none()
    }

    /// Drop non-finite fields and clamp the rest to their accepted ranges
    pub fn sanitized(self) -> Self {
        Self {
            slant: self
                .slant
                .filter(|v| v.is_finite())
                .map(|v| v.clamp(-MAX_VARIATION_SLANT, MAX_VARIATION_SLANT)),
            spacing: self
                .spacing
                .filter(|v| v.is_finite())
                .map(|v| v.clamp(MIN_VARIATION_SPACING, MAX_VARIATION_SPACING)),
            messiness: self.messiness.filter(|v| v.is_finite()).map(|v| v.clamp(0.0, 1.0)),
            mood: self.mood,
        }
    }

    /// Build a variation from an untrusted wire directive
    ///
    /// Unknown moods are dropped; every numeric field is sanitized on its own.
    pub fn from_directive(directive: &StyleDirective) -> Self {
        let mood = directive.mood.as_deref().and_then(|name| match name.parse::<Mood>() {
            Ok(mood) => Some(mood),
            Err(err) => {
                debug!("StyleVariation::from_directive: {}", err);
                None
            }
        });

        Self {
            slant: directive.slant,
            spacing: directive.spacing,
            messiness: directive.messiness,
            mood,
        }
        .sanitized()
    }
}

/// A style profile with a variation applied, valid for one synthesis call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveProfile {
    profile: StyleProfile,
    mood: Option<Mood>,
}

impl EffectiveProfile {
    pub fn profile(&self) -> &StyleProfile {
        &self.profile
    }

    /// Mood preset that was applied, if any
    pub fn mood(&self) -> Option<Mood> {
        self.mood
    }
}

impl Deref for EffectiveProfile {
    type Target = StyleProfile;

    fn deref(&self) -> &StyleProfile {
        &self.profile
    }
}

/// Merge a variation into a base profile
///
/// An empty variation returns the base unchanged (apart from clamping a
/// base that was already out of range).
pub fn apply_style_variation(base: &StyleProfile, variation: &StyleVariation) -> EffectiveProfile {
    let mut profile = *base;

    if let Some(mood) = variation.mood {
        let preset = mood.preset();
        profile.slant = preset.slant;
        profile.spacing = preset.spacing;
        profile.messiness = preset.messiness;
    }

    if let Some(slant) = variation.slant {
        profile.slant += slant;
    }
    if let Some(spacing) = variation.spacing {
        profile.spacing *= spacing;
    }
    if let Some(messiness) = variation.messiness {
        profile.messiness = messiness;
    }

    if !profile.slant.is_finite() {
        profile.slant = base.slant.is_finite().then_some(base.slant).unwrap_or(0.0);
    }
    profile.spacing = if profile.spacing.is_finite() { profile.spacing.max(0.0) } else { 1.0 };
    profile.messiness = clamp_unit(profile.messiness, 0.0);
    profile.baseline_variation = if profile.baseline_variation.is_finite() {
        profile.baseline_variation.max(0.0)
    } else {
        0.0
    };

    EffectiveProfile {
        profile,
        mood: variation.mood,
    }
}

/// Text ready for synthesis, with its validated variation
#[derive(Debug, Clone, PartialEq)]
pub struct StyledText {
    pub text: String,
    pub variation: StyleVariation,
}

/// Parse an AI response in the styled-response wire format
///
/// Never fails: anything that is not a styled document is rendered as
/// literal text with no variation.
pub fn parse_styled_response(raw: &str) -> StyledText {
    let response = StyledResponse::parse(raw);
    let variation = StyleVariation::from_directive(&response.style);
    if !response.style.is_empty() && variation.is_empty() {
        debug!("parse_styled_response: style directive had no usable fields");
    }
    StyledText {
        text: response.text,
        variation,
    }
}
