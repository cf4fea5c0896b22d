use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_PRESSURE;

/// A single captured pen sample
///
/// Laid out for zero-copy handoff to a renderer with bytemuck. Field order
/// keeps the struct free of implicit padding (f64 first, then four f32).
#[derive(
    Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, bytemuck::Pod, bytemuck::Zeroable,
)]
#[repr(C)]
pub struct Point {
    /// Capture time in milliseconds
    #[serde(alias = "t")]
    pub timestamp: f64,
    pub x: f32,
    pub y: f32,
    /// Pen pressure 0.0-1.0
    #[serde(default = "default_pressure")]
    pub pressure: f32,
    /// Pen tilt in degrees (0 when the device does not report it)
    #[serde(default)]
    pub tilt: f32,
}

fn default_pressure() -> f32 {
    DEFAULT_PRESSURE
}

impl Point {
    pub fn new(x: f32, y: f32, pressure: f32, timestamp: f64) -> Self {
        Self {
            timestamp,
            x,
            y,
            pressure,
            tilt: 0.0,
        }
    }

    /// Position as a vector
    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Euclidean distance to another point
    #[inline]
    pub fn distance(&self, other: &Point) -> f32 {
        self.position().distance(other.position())
    }
}

/// Axis-aligned bounding box of a set of points
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
    pub width: f32,
    pub height: f32,
    pub center_x: f32,
    pub center_y: f32,
}

impl Bounds {
    /// Build bounds from extents
    pub fn from_extents(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
            width: max_x - min_x,
            height: max_y - min_y,
            center_x: (min_x + max_x) / 2.0,
            center_y: (min_y + max_y) / 2.0,
        }
    }

    /// Compute bounds over points, None for an empty slice
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self::from_extents(min_x, min_y, max_x, max_y))
    }

    /// Smallest bounds containing both
    pub fn union(&self, other: &Bounds) -> Bounds {
        Self::from_extents(
            self.min_x.min(other.min_x),
            self.min_y.min(other.min_y),
            self.max_x.max(other.max_x),
            self.max_y.max(other.max_y),
        )
    }
}

/// One continuous pen-down to pen-up sequence
///
/// Points are private so the cached bounds can never go stale. Engine
/// operations always build new strokes; captured strokes are never edited
/// in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StrokeData")]
pub struct Stroke {
    points: Vec<Point>,
    bounds: Bounds,
    /// Milliseconds from pen-down to pen-up
    duration: f64,
    label: Option<String>,
    normalized: bool,
}

/// Deserialization shape for [`Stroke`] (bounds are always recomputed)
#[derive(Deserialize)]
struct StrokeData {
    points: Vec<Point>,
    #[serde(default)]
    duration: Option<f64>,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    normalized: bool,
}

impl From<StrokeData> for Stroke {
    fn from(data: StrokeData) -> Self {
        let mut stroke = Stroke::new(data.points);
        if let Some(duration) = data.duration {
            stroke = stroke.with_duration(duration);
        }
        stroke.label = data.label;
        stroke.normalized = data.normalized;
        stroke
    }
}

impl Stroke {
    /// Create a stroke, deriving duration from the point timestamps
    pub fn new(points: Vec<Point>) -> Self {
        let bounds = Bounds::from_points(&points).unwrap_or_default();
        let duration = match (points.first(), points.last()) {
            (Some(first), Some(last)) => (last.timestamp - first.timestamp).max(0.0),
            _ => 0.0,
        };
        Self {
            points,
            bounds,
            duration,
            label: None,
            normalized: false,
        }
    }

    /// Override the derived duration (negative or non-finite values become 0)
    pub fn with_duration(mut self, duration_ms: f64) -> Self {
        self.duration = if duration_ms.is_finite() { duration_ms.max(0.0) } else { 0.0 };
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub(crate) fn with_normalized(mut self, normalized: bool) -> Self {
        self.normalized = normalized;
        self
    }

    /// Build a new stroke by mapping every point, keeping duration and label
    pub fn map_points<F>(&self, mut f: F) -> Stroke
    where
        F: FnMut(&Point) -> Point,
    {
        let points = self.points.iter().map(|p| f(p)).collect();
        let mut stroke = Stroke::new(points).with_duration(self.duration);
        stroke.label = self.label.clone();
        stroke.normalized = self.normalized;
        stroke
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Whether the stroke was moved into the normalized typographic frame
    pub fn is_normalized(&self) -> bool {
        self.normalized
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Strokes with fewer than two points carry no usable geometry
    pub fn has_geometry(&self) -> bool {
        self.points.len() >= 2
    }

    pub fn last_point(&self) -> Option<&Point> {
        self.points.last()
    }

    /// Sum of distances between consecutive points
    pub fn path_length(&self) -> f32 {
        self.points.windows(2).map(|w| w[0].distance(&w[1])).sum()
    }

    /// Raw point data for GPU upload
    pub fn point_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.points)
    }
}

/// Granularity of a training sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleKind {
    Letter,
    Word,
    Sentence,
}

impl SampleKind {
    /// Guess the kind from a label: one character is a letter, anything
    /// containing whitespace is a sentence, everything else a word.
    pub fn infer(label: &str) -> Self {
        let mut chars = label.chars();
        match (chars.next(), chars.next()) {
            (Some(_), None) => SampleKind::Letter,
            _ if label.trim().contains(char::is_whitespace) => SampleKind::Sentence,
            _ => SampleKind::Word,
        }
    }
}

/// One labeled training instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub label: String,
    pub kind: SampleKind,
    pub strokes: Vec<Stroke>,
    /// Capture time in milliseconds
    #[serde(default)]
    pub timestamp: f64,
}

impl Sample {
    pub fn new(label: impl Into<String>, kind: SampleKind, strokes: Vec<Stroke>) -> Self {
        Self {
            label: label.into(),
            kind,
            strokes,
            timestamp: 0.0,
        }
    }

    pub fn with_timestamp(mut self, timestamp_ms: f64) -> Self {
        self.timestamp = timestamp_ms;
        self
    }

    /// Bounds over every non-empty stroke
    pub fn bounds(&self) -> Option<Bounds> {
        self.strokes
            .iter()
            .filter(|s| !s.is_empty())
            .map(Stroke::bounds)
            .reduce(|a, b| a.union(&b))
    }

    /// Word and sentence samples span several characters
    pub fn is_multi_character(&self) -> bool {
        matches!(self.kind, SampleKind::Word | SampleKind::Sentence)
    }

    /// Every point of every stroke, in capture order
    pub fn points(&self) -> impl Iterator<Item = &Point> {
        self.strokes.iter().flat_map(|s| s.points().iter())
    }
}

/// Training samples indexed by label
///
/// Grows while training and is read-only during synthesis. Labels are kept
/// ordered so iteration and export are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SampleStore {
    samples: BTreeMap<String, Vec<Sample>>,
}

impl SampleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sample under its label
    pub fn insert(&mut self, sample: Sample) {
        self.samples.entry(sample.label.clone()).or_default().push(sample);
    }

    /// Samples for a label (empty if none)
    pub fn get(&self, label: &str) -> &[Sample] {
        self.samples.get(label).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Samples for a single character (empty if none)
    pub fn glyph(&self, ch: char) -> &[Sample] {
        let mut buf = [0u8; 4];
        self.get(ch.encode_utf8(&mut buf))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.samples.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Sample])> {
        self.samples.iter().map(|(label, samples)| (label.as_str(), samples.as_slice()))
    }

    /// Every sample across all labels
    pub fn samples(&self) -> impl Iterator<Item = &Sample> {
        self.samples.values().flatten()
    }

    /// Every stroke across all samples
    pub fn strokes(&self) -> impl Iterator<Item = &Stroke> {
        self.samples().flat_map(|s| s.strokes.iter())
    }

    pub fn label_count(&self) -> usize {
        self.samples.len()
    }

    pub fn sample_count(&self) -> usize {
        self.samples.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sample_count() == 0
    }

    /// Whether there is anything to synthesize from
    pub fn has_handwriting_samples(&self) -> bool {
        self.samples().any(|s| s.strokes.iter().any(|stroke| !stroke.is_empty()))
    }
}

impl FromIterator<Sample> for SampleStore {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        let mut store = SampleStore::new();
        for sample in iter {
            store.insert(sample);
        }
        store
    }
}
