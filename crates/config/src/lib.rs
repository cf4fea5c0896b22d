//! Shared configuration for Scribe
//!
//! This crate is the single source of truth for the empirically chosen
//! numbers the handwriting engine runs on: normalization targets, the
//! thresholds used to derive a style profile, layout spacing and playback
//! pacing. Every value is a named default that callers may override, either
//! field by field, from a JSON document, or from the environment.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Baseline Y every normalized sample is moved onto
pub const DEFAULT_TARGET_BASELINE: f32 = 300.0;

/// X-height every normalized sample is scaled to
pub const DEFAULT_TARGET_X_HEIGHT: f32 = 50.0;

/// Strokes need more than five points before a slant regression is trusted.
pub const DEFAULT_MIN_SLANT_POINTS: usize = 6;

/// Baseline standard deviation (px) that maps to messiness 1.0
pub const DEFAULT_MESSINESS_FULL_SCALE_PX: f32 = 20.0;

/// Gap (px) under which two adjacent strokes of a word count as joined
pub const DEFAULT_CONNECTED_GAP_PX: f32 = 3.0;

/// Fraction of word samples that must be joined before cursive is assumed
pub const DEFAULT_CURSIVE_MAJORITY: f32 = 0.5;

/// Average inter-stroke gap (px) is divided by this to get the spacing multiplier
pub const DEFAULT_SPACING_GAP_DIVISOR: f32 = 10.0;

/// Lower clamp for the derived spacing multiplier
pub const DEFAULT_SPACING_MIN: f32 = 0.5;

/// Upper clamp for the derived spacing multiplier
pub const DEFAULT_SPACING_MAX: f32 = 2.0;

/// Pen speed (px/ms) above which a writer is classed as fast
pub const DEFAULT_FAST_SPEED: f32 = 0.5;

/// Pen speed (px/ms) below which a writer is classed as slow
pub const DEFAULT_SLOW_SPEED: f32 = 0.2;

/// Default wrap width for batch synthesis
pub const DEFAULT_MAX_WIDTH: f32 = 600.0;

/// Default distance between consecutive lines
pub const DEFAULT_LINE_HEIGHT: f32 = 80.0;

/// Letter advance added after each glyph, multiplied by the profile spacing
pub const DEFAULT_LETTER_SPACING_FACTOR: f32 = 5.0;

/// Word advance added after each word, multiplied by the profile spacing
pub const DEFAULT_WORD_SPACING_FACTOR: f32 = 10.0;

/// Advance for a space during streaming playback, multiplied by the profile spacing
pub const DEFAULT_STREAM_SPACE_FACTOR: f32 = 12.0;

/// How far the midpoint of a cursive connector is lifted above its chord
pub const DEFAULT_CONNECTOR_LIFT: f32 = 5.0;

/// Pen pressure used for synthetic connector strokes
pub const DEFAULT_CONNECTOR_PRESSURE: f32 = 0.3;

/// Advance used for a character that has no trained samples
pub const DEFAULT_MISSING_GLYPH_WIDTH: f32 = 10.0;

/// Delay before each stroke is released during streaming playback
pub const DEFAULT_STROKE_DELAY_MS: u64 = 50;

/// Target typographic frame for sample normalization
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizationConfig {
    pub target_baseline: f32,
    pub target_x_height: f32,
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            target_baseline: DEFAULT_TARGET_BASELINE,
            target_x_height: DEFAULT_TARGET_X_HEIGHT,
        }
    }
}

/// Thresholds used when deriving a style profile from samples
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisThresholds {
    pub min_slant_points: usize,
    pub messiness_full_scale_px: f32,
    pub connected_gap_px: f32,
    pub cursive_majority: f32,
    pub spacing_gap_divisor: f32,
    pub spacing_min: f32,
    pub spacing_max: f32,
    pub fast_speed: f32,
    pub slow_speed: f32,
}

impl Default for AnalysisThresholds {
    fn default() -> Self {
        Self {
            min_slant_points: DEFAULT_MIN_SLANT_POINTS,
            messiness_full_scale_px: DEFAULT_MESSINESS_FULL_SCALE_PX,
            connected_gap_px: DEFAULT_CONNECTED_GAP_PX,
            cursive_majority: DEFAULT_CURSIVE_MAJORITY,
            spacing_gap_divisor: DEFAULT_SPACING_GAP_DIVISOR,
            spacing_min: DEFAULT_SPACING_MIN,
            spacing_max: DEFAULT_SPACING_MAX,
            fast_speed: DEFAULT_FAST_SPEED,
            slow_speed: DEFAULT_SLOW_SPEED,
        }
    }
}

/// Layout settings for word and line placement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Wrap width measured from the start X of a synthesis call
    pub max_width: f32,
    pub line_height: f32,
    pub letter_spacing_factor: f32,
    pub word_spacing_factor: f32,
    pub stream_space_factor: f32,
    pub connector_lift: f32,
    pub connector_pressure: f32,
    pub missing_glyph_width: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_WIDTH,
            line_height: DEFAULT_LINE_HEIGHT,
            letter_spacing_factor: DEFAULT_LETTER_SPACING_FACTOR,
            word_spacing_factor: DEFAULT_WORD_SPACING_FACTOR,
            stream_space_factor: DEFAULT_STREAM_SPACE_FACTOR,
            connector_lift: DEFAULT_CONNECTOR_LIFT,
            connector_pressure: DEFAULT_CONNECTOR_PRESSURE,
            missing_glyph_width: DEFAULT_MISSING_GLYPH_WIDTH,
        }
    }
}

/// Pacing for incremental playback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub stroke_delay_ms: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            stroke_delay_ms: DEFAULT_STROKE_DELAY_MS,
        }
    }
}

impl PlaybackConfig {
    /// Get the per-stroke delay as a Duration
    pub fn stroke_delay(&self) -> Duration {
        Duration::from_millis(self.stroke_delay_ms)
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub normalization: NormalizationConfig,
    pub analysis: AnalysisThresholds,
    pub layout: LayoutConfig,
    pub playback: PlaybackConfig,
}

impl EngineConfig {
    /// Defaults with overrides from SCRIBE_MAX_WIDTH, SCRIBE_LINE_HEIGHT and
    /// SCRIBE_STROKE_DELAY_MS
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    ///
    /// Values that fail to parse are ignored and the previous value is kept.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(width) = parse_override::<f32>(&lookup, "SCRIBE_MAX_WIDTH") {
            if width.is_finite() && width > 0.0 {
                self.layout.max_width = width;
            }
        }
        if let Some(height) = parse_override::<f32>(&lookup, "SCRIBE_LINE_HEIGHT") {
            if height.is_finite() && height > 0.0 {
                self.layout.line_height = height;
            }
        }
        if let Some(delay) = parse_override::<u64>(&lookup, "SCRIBE_STROKE_DELAY_MS") {
            self.playback.stroke_delay_ms = delay;
        }
        self
    }
}

fn parse_override<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("EngineConfig: ignoring unparsable {}={:?}", key, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.normalization.target_baseline, DEFAULT_TARGET_BASELINE);
        assert_eq!(config.normalization.target_x_height, DEFAULT_TARGET_X_HEIGHT);
        assert_eq!(config.analysis.connected_gap_px, 3.0);
        assert_eq!(config.layout.max_width, 600.0);
        assert_eq!(config.playback.stroke_delay(), Duration::from_millis(50));
    }

    #[test]
    fn test_overrides() {
        let config = EngineConfig::default().with_overrides(|key| match key {
            "SCRIBE_MAX_WIDTH" => Some("420".to_string()),
            "SCRIBE_STROKE_DELAY_MS" => Some(" 5 ".to_string()),
            _ => None,
        });
        assert_eq!(config.layout.max_width, 420.0);
        assert_eq!(config.layout.line_height, DEFAULT_LINE_HEIGHT);
        assert_eq!(config.playback.stroke_delay_ms, 5);
    }

    #[test]
    fn test_bad_overrides_are_ignored() {
        let config = EngineConfig::default().with_overrides(|key| match key {
            "SCRIBE_MAX_WIDTH" => Some("-3".to_string()),
            "SCRIBE_LINE_HEIGHT" => Some("tall".to_string()),
            _ => None,
        });
        assert_eq!(config.layout.max_width, DEFAULT_MAX_WIDTH);
        assert_eq!(config.layout.line_height, DEFAULT_LINE_HEIGHT);
    }

    #[test]
    fn test_partial_json() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"analysis": {"connected_gap_px": 4.5}}"#).unwrap();
        assert_eq!(config.analysis.connected_gap_px, 4.5);
        assert_eq!(config.analysis.slow_speed, DEFAULT_SLOW_SPEED);
        assert_eq!(config.layout, LayoutConfig::default());
    }
}
