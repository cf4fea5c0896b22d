//! Messages handed to an external stroke renderer.

use serde::{Deserialize, Serialize};

use crate::IpcError;

/// A single pen sample on the wire
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WirePoint {
    pub x: f32,
    pub y: f32,
    pub pressure: f32,
    /// Capture timestamp in milliseconds
    pub t: f64,
}

impl WirePoint {
    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.pressure.is_finite() && self.t.is_finite()
    }
}

/// What a stroke represents in the rendered text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WireStrokeRole {
    /// Part of a glyph
    Glyph,
    /// Synthetic cursive join between two glyphs
    Connector,
}

/// Messages from the engine to a renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum RendererMessage {
    /// A stroke is ready to be appended and drawn
    StrokeReady {
        /// Emission order within the playback, starting at 0
        index: usize,
        role: WireStrokeRole,
        /// Character the stroke belongs to (None for connectors)
        glyph: Option<char>,
        points: Vec<WirePoint>,
    },

    /// Playback emitted every stroke it had
    PlaybackFinished { stroke_count: usize },

    /// Playback was cancelled before completion
    PlaybackCancelled { stroke_count: usize },
}

impl RendererMessage {
    /// Encode as a single JSON line
    ///
    /// Non-finite coordinates are rejected rather than silently written as
    /// `null`.
    pub fn to_json(&self) -> Result<String, IpcError> {
        if let RendererMessage::StrokeReady { index, points, .. } = self {
            if let Some(bad) = points.iter().position(|p| !p.is_finite()) {
                return Err(IpcError::NonFinitePoint {
                    stroke: *index,
                    index: bad,
                });
            }
        }
        serde_json::to_string(self).map_err(IpcError::Encode)
    }

    /// Decode a message produced by [`RendererMessage::to_json`]
    pub fn from_json(json: &str) -> Result<Self, IpcError> {
        serde_json::from_str(json).map_err(IpcError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(x: f32, y: f32) -> WirePoint {
        WirePoint {
            x,
            y,
            pressure: 0.5,
            t: 0.0,
        }
    }

    #[test]
    fn test_tagged_encoding() {
        let message = RendererMessage::StrokeReady {
            index: 3,
            role: WireStrokeRole::Connector,
            glyph: None,
            points: vec![point(1.0, 2.0)],
        };
        let json = message.to_json().unwrap();
        assert!(json.starts_with(r#"{"type":"StrokeReady","data":{"index":3"#));

        let decoded = RendererMessage::from_json(&json).unwrap();
        assert_eq!(decoded, message);
    }

    #[test]
    fn test_non_finite_point_rejected() {
        let message = RendererMessage::StrokeReady {
            index: 7,
            role: WireStrokeRole::Glyph,
            glyph: Some('a'),
            points: vec![point(1.0, 2.0), point(f32::NAN, 2.0)],
        };
        match message.to_json() {
            Err(IpcError::NonFinitePoint { stroke, index }) => {
                assert_eq!(stroke, 7);
                assert_eq!(index, 1);
            }
            other => panic!("Expected NonFinitePoint, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_garbage() {
        assert!(matches!(
            RendererMessage::from_json("{\"type\":\"Nope\"}"),
            Err(IpcError::Decode(_))
        ));
    }
}
