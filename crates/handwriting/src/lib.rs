//! Scribe handwriting engine - learn a writer's style and write text with it
//!
//! This crate provides:
//! - [`types`] - Points, strokes, labeled samples and the sample store
//! - [`normalize`] - Baseline/x-height detection and normalization
//! - [`analysis`] - Style profile derivation from stored samples
//! - [`variation`] - Moods and per-call style overrides
//! - [`synth`] - Character, word and text synthesis
//! - [`playback`] - Paced incremental playback as an async stream
//! - [`training`] - Sample capture, the sample library and training export
//!
//! Every synthesis entry point takes a [`HandwritingModel`] snapshot and a
//! caller-owned [`fastrand::Rng`]; there is no global state.

pub mod analysis;
pub mod constants;
pub mod model;
pub mod normalize;
pub mod playback;
pub mod profile;
pub mod synth;
pub mod training;
pub mod types;
pub mod validation;
pub mod variation;

pub use analysis::analyze;
pub use constants::*;
pub use model::HandwritingModel;
pub use normalize::*;
pub use playback::*;
pub use profile::*;
pub use synth::*;
pub use training::*;
pub use types::*;
pub use validation::*;
pub use variation::*;
