//! Events emitted while collecting training samples.

use crate::profile::StyleProfile;

/// Training lifecycle events for observers such as a persistence layer.
///
/// Listeners get notified without the library knowing who stores what.
#[derive(Debug, Clone, PartialEq)]
pub enum TrainingEvent {
    /// Capture of a new sample has started.
    SampleStarted { label: String, timestamp_ms: f64 },
    /// A finished sample was added to the library.
    SampleAdded {
        label: String,
        stroke_count: usize,
        /// Samples now stored under the label
        label_total: usize,
    },
    /// Capture was abandoned before completion.
    SampleAborted { label: String, reason: String },
    /// A style profile was derived from the library.
    ProfileTrained {
        profile: StyleProfile,
        sample_count: usize,
    },
}
