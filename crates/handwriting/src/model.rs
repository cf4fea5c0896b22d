use std::sync::Arc;

use scribe_config::AnalysisThresholds;

use crate::analysis::analyze;
use crate::profile::StyleProfile;
use crate::types::SampleStore;

/// Learned samples plus the style profile derived from them
///
/// The sample store is shared behind an `Arc` so synthesis calls and
/// playback streams can hold the model without copying every stroke.
/// A model with no profile or no samples is untrained; synthesis on it
/// yields nothing.
#[derive(Debug, Clone, Default)]
pub struct HandwritingModel {
    samples: Arc<SampleStore>,
    profile: Option<StyleProfile>,
}

impl HandwritingModel {
    pub fn new(samples: impl Into<Arc<SampleStore>>, profile: Option<StyleProfile>) -> Self {
        Self {
            samples: samples.into(),
            profile,
        }
    }

    /// Analyze the store and build a trained model from it
    pub fn trained(samples: impl Into<Arc<SampleStore>>, thresholds: &AnalysisThresholds) -> Self {
        let samples = samples.into();
        let profile = analyze(&samples, thresholds);
        Self {
            samples,
            profile: Some(profile),
        }
    }

    pub fn samples(&self) -> &SampleStore {
        &self.samples
    }

    pub fn shared_samples(&self) -> Arc<SampleStore> {
        Arc::clone(&self.samples)
    }

    pub fn profile(&self) -> Option<&StyleProfile> {
        self.profile.as_ref()
    }

    pub fn has_handwriting_samples(&self) -> bool {
        self.samples.has_handwriting_samples()
    }

    /// Samples present and a profile derived from them
    pub fn is_trained(&self) -> bool {
        self.profile.is_some() && self.has_handwriting_samples()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Point, Sample, SampleKind, Stroke};

    #[test]
    fn test_default_is_untrained() {
        let model = HandwritingModel::default();
        assert!(!model.is_trained());
        assert!(!model.has_handwriting_samples());
        assert!(model.profile().is_none());
    }

    #[test]
    fn test_trained_model_shares_samples() {
        let stroke = Stroke::new(vec![
            Point::new(0.0, 0.0, 0.4, 0.0),
            Point::new(3.0, 9.0, 0.8, 10.0),
        ]);
        let store: SampleStore = [Sample::new("a", SampleKind::Letter, vec![stroke])]
            .into_iter()
            .collect();

        let model = HandwritingModel::trained(store, &AnalysisThresholds::default());
        assert!(model.is_trained());
        assert!(model.has_handwriting_samples());

        let clone = model.clone();
        assert!(Arc::ptr_eq(&model.shared_samples(), &clone.shared_samples()));
        assert_eq!(model.profile().map(|p| p.pressure_dynamics.max), Some(0.8));
    }
}
