//! Handwriting synthesis from learned samples.
//!
//! This module provides:
//! - [`transform_stroke`] - Place one learned stroke with profile-driven variation
//! - [`synthesize_character`] / [`synthesize_word`] - Glyphs and cursive joins
//! - [`text_to_strokes`] - Whole-text layout with greedy word wrapping
//!
//! ## Layout
//!
//! Text is split into lines on `'\n'` and into words on spaces. Words are
//! never split: a word that would overflow `max_width` moves to the next line
//! and is synthesized again there. The first word of a line is always placed,
//! even when it alone is wider than `max_width`.
//!
//! All randomness (sample choice and jitter) is drawn from the caller's
//! [`fastrand::Rng`], so a seeded generator reproduces the same output.

mod glyph;
mod transform;

pub use glyph::{layout_word, strokes_width, synthesize_character, synthesize_word, WordLayout};
pub use transform::transform_stroke;

use fastrand::Rng;
use scribe_config::{EngineConfig, LayoutConfig};
use scribe_ipc::{RendererMessage, WirePoint, WireStrokeRole};
use thiserror::Error;
use tracing::debug;

use crate::model::HandwritingModel;
use crate::types::Stroke;
use crate::variation::{apply_style_variation, StyleVariation};

/// What a synthesized stroke draws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeRole {
    /// Part of the given character
    Glyph(char),
    /// Cursive join between two characters
    Connector,
}

/// A stroke produced by synthesis, ready for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedStroke {
    pub stroke: Stroke,
    pub role: StrokeRole,
}

impl SynthesizedStroke {
    pub fn is_connector(&self) -> bool {
        self.role == StrokeRole::Connector
    }

    /// Wire message for an external renderer
    pub fn to_message(&self, index: usize) -> RendererMessage {
        let (role, glyph) = match self.role {
            StrokeRole::Glyph(ch) => (WireStrokeRole::Glyph, Some(ch)),
            StrokeRole::Connector => (WireStrokeRole::Connector, None),
        };
        RendererMessage::StrokeReady {
            index,
            role,
            glyph,
            points: self
                .stroke
                .points()
                .iter()
                .map(|p| WirePoint {
                    x: p.x,
                    y: p.y,
                    pressure: p.pressure,
                    t: p.timestamp,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SynthesisError {
    #[error("Invalid max width: {0} (expected a finite value > 0)")]
    InvalidMaxWidth(f32),
    #[error("Invalid line height: {0} (expected a finite value > 0)")]
    InvalidLineHeight(f32),
}

/// Layout and style settings for one synthesis call
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SynthesisOptions {
    pub layout: LayoutConfig,
    pub variation: StyleVariation,
}

impl SynthesisOptions {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            layout: config.layout,
            variation: StyleVariation::default(),
        }
    }

    pub fn with_variation(mut self, variation: StyleVariation) -> Self {
        self.variation = variation;
        self
    }

    pub fn validate(&self) -> Result<(), SynthesisError> {
        validate_layout(&self.layout)
    }
}

pub(crate) fn validate_layout(layout: &LayoutConfig) -> Result<(), SynthesisError> {
    if !layout.max_width.is_finite() || layout.max_width <= 0.0 {
        return Err(SynthesisError::InvalidMaxWidth(layout.max_width));
    }
    if !layout.line_height.is_finite() || layout.line_height <= 0.0 {
        return Err(SynthesisError::InvalidLineHeight(layout.line_height));
    }
    Ok(())
}

/// Synthesize a whole text block starting at `(x, y)`
///
/// Returns an empty list when the model is untrained. Errors only on invalid
/// options; missing glyphs and odd text never fail.
pub fn text_to_strokes(
    model: &HandwritingModel,
    text: &str,
    x: f32,
    y: f32,
    options: &SynthesisOptions,
    rng: &mut Rng,
) -> Result<Vec<SynthesizedStroke>, SynthesisError> {
    options.validate()?;

    let Some(base) = model.profile().filter(|_| model.is_trained()) else {
        debug!("text_to_strokes: model is not trained, nothing to synthesize");
        return Ok(Vec::new());
    };

    let profile = apply_style_variation(base, &options.variation);
    let layout = &options.layout;
    let store = model.samples();

    let mut out = Vec::new();
    let mut cursor_y = y;

    for (line_index, line) in text.split('\n').enumerate() {
        if line_index > 0 {
            cursor_y += layout.line_height;
        }
        let mut cursor_x = x;
        let mut first_on_line = true;

        for word in line.trim_end_matches('\r').split(' ').filter(|w| !w.is_empty()) {
            let mut placed = layout_word(word, cursor_x, cursor_y, store, &profile, layout, rng);

            if !first_on_line && cursor_x + placed.width > x + layout.max_width {
                cursor_x = x;
                cursor_y += layout.line_height;
                placed = layout_word(word, cursor_x, cursor_y, store, &profile, layout, rng);
            }

            out.extend(placed.strokes);
            cursor_x += placed.width + profile.spacing * layout.word_spacing_factor;
            first_on_line = false;
        }
    }

    debug!(
        "text_to_strokes: {} strokes ({} connectors) for {} chars",
        out.len(),
        out.iter().filter(|s| s.is_connector()).count(),
        text.chars().count()
    );
    Ok(out)
}
