//! Thread-safe growing store of training samples.

use std::sync::{Arc, RwLock};

use scribe_config::AnalysisThresholds;
use tracing::info;

use crate::analysis::analyze;
use crate::model::HandwritingModel;
use crate::profile::StyleProfile;
use crate::types::{Sample, SampleStore};

use super::events::TrainingEvent;

/// Thread-safe store of training samples and the profile derived from them.
///
/// Uses interior mutability via RwLock so a capture UI can add samples while
/// playback readers take snapshots. Snapshots are detached copies: samples
/// added or profiles retrained afterwards are never visible through them.
pub struct SampleLibrary {
    samples: RwLock<SampleStore>,
    profile: RwLock<Option<StyleProfile>>,
    #[allow(clippy::type_complexity)]
    event_listeners: RwLock<Vec<Box<dyn Fn(TrainingEvent) + Send + Sync>>>,
}

impl std::fmt::Debug for SampleLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sample_count = self.samples.read().map(|s| s.sample_count()).unwrap_or(0);
        let trained = self.profile.read().map(|p| p.is_some()).unwrap_or(false);
        let listener_count = self.event_listeners.read().map(|l| l.len()).unwrap_or(0);
        f.debug_struct("SampleLibrary")
            .field("sample_count", &sample_count)
            .field("trained", &trained)
            .field("listener_count", &listener_count)
            .finish()
    }
}

impl Default for SampleLibrary {
    fn default() -> Self {
        Self::from_store(SampleStore::new(), None)
    }
}

impl SampleLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the library, e.g. from an imported training export
    pub fn from_store(samples: SampleStore, profile: Option<StyleProfile>) -> Self {
        Self {
            samples: RwLock::new(samples),
            profile: RwLock::new(profile),
            event_listeners: RwLock::new(Vec::new()),
        }
    }

    /// Store a finished sample under its label.
    ///
    /// Emits a `SampleAdded` event to all registered listeners.
    pub fn add_sample(&self, sample: Sample) {
        let label = sample.label.clone();
        let stroke_count = sample.strokes.len();

        let label_total = {
            let mut samples = self.samples.write().expect("SampleLibrary lock poisoned");
            samples.insert(sample);
            samples.get(&label).len()
        };

        self.emit_event(TrainingEvent::SampleAdded {
            label,
            stroke_count,
            label_total,
        });
    }

    pub fn has_handwriting_samples(&self) -> bool {
        let samples = self.samples.read().expect("SampleLibrary lock poisoned");
        samples.has_handwriting_samples()
    }

    pub fn sample_count(&self) -> usize {
        let samples = self.samples.read().expect("SampleLibrary lock poisoned");
        samples.sample_count()
    }

    pub fn labels(&self) -> Vec<String> {
        let samples = self.samples.read().expect("SampleLibrary lock poisoned");
        samples.labels().map(str::to_string).collect()
    }

    /// Detached copy of the current samples
    pub fn snapshot(&self) -> Arc<SampleStore> {
        let samples = self.samples.read().expect("SampleLibrary lock poisoned");
        Arc::new(samples.clone())
    }

    /// Last trained profile, if any
    pub fn profile(&self) -> Option<StyleProfile> {
        *self.profile.read().expect("SampleLibrary lock poisoned")
    }

    /// Derive a fresh profile from every stored sample.
    ///
    /// Emits a `ProfileTrained` event to all registered listeners.
    pub fn retrain(&self, thresholds: &AnalysisThresholds) -> StyleProfile {
        let snapshot = self.snapshot();
        let profile = analyze(&snapshot, thresholds);

        *self.profile.write().expect("SampleLibrary lock poisoned") = Some(profile);
        info!("SampleLibrary: retrained on {} samples", snapshot.sample_count());

        self.emit_event(TrainingEvent::ProfileTrained {
            profile,
            sample_count: snapshot.sample_count(),
        });
        profile
    }

    /// Immutable model snapshot for synthesis.
    ///
    /// Uses the last trained profile, training one first if there is none
    /// yet and samples are available.
    pub fn model(&self, thresholds: &AnalysisThresholds) -> HandwritingModel {
        let profile = match self.profile() {
            Some(profile) => Some(profile),
            None if self.has_handwriting_samples() => Some(self.retrain(thresholds)),
            None => None,
        };
        HandwritingModel::new(self.snapshot(), profile)
    }

    /// Register an event listener.
    ///
    /// The listener receives cloned events for:
    /// - `SampleAdded` - when a sample is stored
    /// - `ProfileTrained` - when a profile is derived
    pub fn add_event_listener<F>(&self, listener: F)
    where
        F: Fn(TrainingEvent) + Send + Sync + 'static,
    {
        let mut listeners = self.event_listeners.write().expect("SampleLibrary lock poisoned");
        listeners.push(Box::new(listener));
    }

    fn emit_event(&self, event: TrainingEvent) {
        let listeners = self.event_listeners.read().expect("SampleLibrary lock poisoned");
        for listener in listeners.iter() {
            listener(event.clone());
        }
    }
}
