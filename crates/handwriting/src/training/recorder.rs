//! Sample recorder for capturing pen input into labeled samples.

use crate::types::{Point, Sample, SampleKind, Stroke};
use crate::validation::{validate_point, ValidationError};

use super::events::TrainingEvent;

/// Error type for sample capture operations.
#[derive(Debug, thiserror::Error)]
pub enum RecorderError {
    #[error("Sample not started - call start() first")]
    NotStarted,
    #[error("Sample already started - call finish() or abort() first")]
    AlreadyStarted,
    #[error("No open stroke - call begin_stroke() first")]
    NoOpenStroke,
    #[error("Stroke already open - call end_stroke() first")]
    StrokeAlreadyOpen,
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("No strokes recorded")]
    NoStrokes,
    #[error("Sample label is empty")]
    EmptyLabel,
}

/// Configuration for starting a new sample.
#[derive(Debug, Clone, Default)]
pub struct SampleConfig {
    /// Character, word or sentence being written
    pub label: String,
    /// Inferred from the label when None
    pub kind: Option<SampleKind>,
    pub timestamp_ms: f64,
}

impl SampleConfig {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }
}

/// Helper for building a sample from pen-down/pen-up input.
///
/// Strokes are opened with [`begin_stroke`](Self::begin_stroke), fed points,
/// and closed with [`end_stroke`](Self::end_stroke). Every point is validated
/// before it is accepted. Strokes closed without any points are dropped.
///
/// # Example
///
/// ```ignore
/// let mut recorder = SampleRecorder::new();
/// recorder.start(SampleConfig::new("a"))?;
/// recorder.begin_stroke()?;
/// recorder.add_point(Point::new(10.0, 10.0, 0.5, 0.0))?;
/// recorder.add_point(Point::new(12.0, 14.0, 0.6, 8.0))?;
/// recorder.end_stroke()?;
/// library.add_sample(recorder.finish()?);
/// ```
#[derive(Debug, Default)]
pub struct SampleRecorder {
    /// Current sample configuration (None if not recording)
    config: Option<SampleConfig>,
    /// Points of the stroke under the pen (None between strokes)
    open_stroke: Option<Vec<Point>>,
    strokes: Vec<Stroke>,
}

impl SampleRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_recording(&self) -> bool {
        self.config.is_some()
    }

    /// Start recording a new sample.
    ///
    /// Returns a `SampleStarted` event that should be emitted to listeners.
    pub fn start(&mut self, config: SampleConfig) -> Result<TrainingEvent, RecorderError> {
        if self.config.is_some() {
            return Err(RecorderError::AlreadyStarted);
        }
        if config.label.trim().is_empty() {
            return Err(RecorderError::EmptyLabel);
        }

        self.open_stroke = None;
        self.strokes.clear();

        let event = TrainingEvent::SampleStarted {
            label: config.label.clone(),
            timestamp_ms: config.timestamp_ms,
        };
        self.config = Some(config);

        Ok(event)
    }

    /// Pen down
    pub fn begin_stroke(&mut self) -> Result<(), RecorderError> {
        if self.config.is_none() {
            return Err(RecorderError::NotStarted);
        }
        if self.open_stroke.is_some() {
            return Err(RecorderError::StrokeAlreadyOpen);
        }
        self.open_stroke = Some(Vec::new());
        Ok(())
    }

    pub fn add_point(&mut self, point: Point) -> Result<(), RecorderError> {
        if self.config.is_none() {
            return Err(RecorderError::NotStarted);
        }
        let points = self.open_stroke.as_mut().ok_or(RecorderError::NoOpenStroke)?;
        validate_point(&point)?;
        points.push(point);
        Ok(())
    }

    /// Pen up
    pub fn end_stroke(&mut self) -> Result<(), RecorderError> {
        if self.config.is_none() {
            return Err(RecorderError::NotStarted);
        }
        let points = self.open_stroke.take().ok_or(RecorderError::NoOpenStroke)?;
        if !points.is_empty() {
            self.strokes.push(Stroke::new(points));
        }
        Ok(())
    }

    /// Finish recording and return the sample.
    ///
    /// A stroke still open is closed first. Returns an error if no strokes
    /// were recorded; the recorder is reset either way.
    pub fn finish(&mut self) -> Result<Sample, RecorderError> {
        let config = self.config.take().ok_or(RecorderError::NotStarted)?;

        if let Some(points) = self.open_stroke.take() {
            if !points.is_empty() {
                self.strokes.push(Stroke::new(points));
            }
        }

        if self.strokes.is_empty() {
            return Err(RecorderError::NoStrokes);
        }

        let kind = config.kind.unwrap_or_else(|| SampleKind::infer(&config.label));
        let strokes = std::mem::take(&mut self.strokes)
            .into_iter()
            .map(|stroke| stroke.with_label(config.label.clone()))
            .collect();

        Ok(Sample::new(config.label, kind, strokes).with_timestamp(config.timestamp_ms))
    }

    /// Abort the current sample without completing it.
    ///
    /// Returns a `SampleAborted` event that should be emitted to listeners.
    pub fn abort(&mut self, reason: impl Into<String>) -> Result<TrainingEvent, RecorderError> {
        let config = self.config.take().ok_or(RecorderError::NotStarted)?;

        self.open_stroke = None;
        self.strokes.clear();

        Ok(TrainingEvent::SampleAborted {
            label: config.label,
            reason: reason.into(),
        })
    }

    pub fn label(&self) -> Option<&str> {
        self.config.as_ref().map(|c| c.label.as_str())
    }

    /// Number of closed strokes in the current sample.
    pub fn stroke_count(&self) -> usize {
        self.strokes.len()
    }

    /// Number of points in the open stroke.
    pub fn current_point_count(&self) -> usize {
        self.open_stroke.as_ref().map_or(0, Vec::len)
    }
}
