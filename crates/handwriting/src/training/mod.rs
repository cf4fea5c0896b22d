//! Training sample capture, storage and exchange.
//!
//! This module provides:
//! - [`SampleRecorder`] - Builds labeled samples from pen-down/pen-up input
//! - [`SampleLibrary`] - Thread-safe growing sample store with listener hooks
//! - [`TrainingEvent`] - Events for persistence or UI observers
//! - [`TrainingExport`] - JSON backup/restore of raw and normalized samples
//! - [`pen_sequence`] / [`CharacterVocabulary`] - Inputs for sequence-model tooling
//!
//! ## Capture flow
//!
//! ```text
//! recorder.start(config) -> begin_stroke -> add_point* -> end_stroke -> ... -> finish
//!                                                                               |
//!                                       library.add_sample(sample) <------------+
//!                                       library.retrain(thresholds) -> StyleProfile
//!                                       library.model(thresholds)   -> HandwritingModel
//! ```
//!
//! A model taken from the library is a detached snapshot; samples added
//! later only show up in the next snapshot.

mod events;
mod export;
mod library;
mod recorder;
mod sequence;

pub use events::TrainingEvent;
pub use export::{ExportError, ExportMetadata, LabelEntry, TrainingExport};
pub use library::SampleLibrary;
pub use recorder::{RecorderError, SampleConfig, SampleRecorder};
pub use sequence::{pen_sequence, CharacterVocabulary, PenDelta};
