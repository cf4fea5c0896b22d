//! Pen-delta sequences for sequence-model training tooling.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{Sample, SampleStore};

/// One step of pen movement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PenDelta {
    pub dx: f32,
    pub dy: f32,
    pub pressure: f32,
    /// True for the marker closing a stroke
    pub pen_up: bool,
}

impl PenDelta {
    const PEN_UP: PenDelta = PenDelta {
        dx: 0.0,
        dy: 0.0,
        pressure: 0.0,
        pen_up: true,
    };

    /// `[dx, dy, pressure, pen_up]` as consumed by tensor tooling
    pub fn to_array(self) -> [f32; 4] {
        [self.dx, self.dy, self.pressure, if self.pen_up { 1.0 } else { 0.0 }]
    }
}

/// Encode a sample as movements from the previous point
///
/// The first point is relative to the origin. Movement continues across
/// strokes, and a pen-up marker follows every non-empty stroke.
pub fn pen_sequence(sample: &Sample) -> Vec<PenDelta> {
    let mut out = Vec::new();
    let (mut prev_x, mut prev_y) = (0.0f32, 0.0f32);

    for stroke in sample.strokes.iter().filter(|s| !s.is_empty()) {
        for p in stroke.points() {
            out.push(PenDelta {
                dx: p.x - prev_x,
                dy: p.y - prev_y,
                pressure: p.pressure,
                pen_up: false,
            });
            prev_x = p.x;
            prev_y = p.y;
        }
        out.push(PenDelta::PEN_UP);
    }
    out
}

/// Stable label to index mapping (labels in sorted order)
///
/// Serialized as the plain label list; the reverse index is rebuilt on load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct CharacterVocabulary {
    labels: Vec<String>,
    index: BTreeMap<String, usize>,
}

impl From<Vec<String>> for CharacterVocabulary {
    fn from(labels: Vec<String>) -> Self {
        Self::from_labels(labels)
    }
}

impl From<CharacterVocabulary> for Vec<String> {
    fn from(vocab: CharacterVocabulary) -> Self {
        vocab.labels
    }
}

impl CharacterVocabulary {
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        labels.sort();
        labels.dedup();
        let index = labels.iter().enumerate().map(|(i, l)| (l.clone(), i)).collect();
        Self { labels, index }
    }

    /// Labels of the store that have at least one non-empty sample
    pub fn from_store(store: &SampleStore) -> Self {
        Self::from_labels(
            store
                .iter()
                .filter(|(_, samples)| samples.iter().any(|s| s.strokes.iter().any(|st| !st.is_empty())))
                .map(|(label, _)| label),
        )
    }

    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Point, SampleKind, Stroke};

    #[test]
    fn test_pen_sequence_deltas() {
        let sample = Sample::new(
            "i",
            SampleKind::Letter,
            vec![
                Stroke::new(vec![Point::new(10.0, 20.0, 0.5, 0.0), Point::new(10.0, 40.0, 0.7, 5.0)]),
                Stroke::new(vec![]),
                Stroke::new(vec![Point::new(10.0, 10.0, 0.4, 9.0)]),
            ],
        );

        let seq = pen_sequence(&sample);
        let arrays: Vec<[f32; 4]> = seq.iter().map(|d| d.to_array()).collect();
        assert_eq!(
            arrays,
            vec![
                [10.0, 20.0, 0.5, 0.0],
                [0.0, 20.0, 0.7, 0.0],
                [0.0, 0.0, 0.0, 1.0],
                [0.0, -30.0, 0.4, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ]
        );
    }

    #[test]
    fn test_vocabulary_sorted_and_reversible() {
        let vocab = CharacterVocabulary::from_labels(["c", "a", "b", "a"]);
        assert_eq!(vocab.len(), 3);
        assert_eq!(vocab.index_of("a"), Some(0));
        assert_eq!(vocab.index_of("c"), Some(2));
        assert_eq!(vocab.index_of("z"), None);
        for i in 0..vocab.len() {
            let label = vocab.label(i).unwrap();
            assert_eq!(vocab.index_of(label), Some(i));
        }

        let json = serde_json::to_string(&vocab).unwrap();
        assert_eq!(json, r#"["a","b","c"]"#);
        let restored: CharacterVocabulary = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.index_of("b"), Some(1));
    }
}
