//! Training data export and import.
//!
//! The export is a single JSON document holding, per label, the raw samples
//! as captured and their normalized form, plus summary metadata:
//!
//! ```text
//! {
//!   "version": 1,
//!   "profile": { ... },
//!   "metadata": {"label_count": 2, "sample_count": 5, "stroke_count": 9,
//!                "average_x_height": 41.5, "average_pressure": 0.52},
//!   "labels": {"a": {"raw": [...], "normalized": [...]}, ...}
//! }
//! ```
//!
//! Only the raw samples are read back on import; the normalized copies exist
//! for external training tooling.

use std::collections::BTreeMap;

use scribe_config::NormalizationConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::pressure_dynamics;
use crate::constants::TRAINING_EXPORT_VERSION;
use crate::model::HandwritingModel;
use crate::normalize::{measure_sample, normalize_sample};
use crate::profile::StyleProfile;
use crate::types::{Sample, SampleKind, SampleStore};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Malformed training export: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unsupported training export version: {0}")]
    UnsupportedVersion(u32),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub label_count: usize,
    pub sample_count: usize,
    pub stroke_count: usize,
    /// Mean x-height of raw letter samples (0 when none could be measured)
    pub average_x_height: f32,
    pub average_pressure: f32,
}

/// Raw and normalized samples for one label
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelEntry {
    pub raw: Vec<Sample>,
    #[serde(default)]
    pub normalized: Vec<Sample>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingExport {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<StyleProfile>,
    #[serde(default)]
    pub metadata: ExportMetadata,
    pub labels: BTreeMap<String, LabelEntry>,
}

impl TrainingExport {
    pub fn build(
        store: &SampleStore,
        profile: Option<&StyleProfile>,
        normalization: &NormalizationConfig,
    ) -> Self {
        let labels: BTreeMap<String, LabelEntry> = store
            .iter()
            .map(|(label, samples)| {
                let entry = LabelEntry {
                    raw: samples.to_vec(),
                    normalized: samples.iter().map(|s| normalize_sample(s, normalization)).collect(),
                };
                (label.to_string(), entry)
            })
            .collect();

        let x_heights: Vec<f32> = store
            .samples()
            .filter(|s| s.kind == SampleKind::Letter)
            .filter_map(measure_sample)
            .map(|m| m.x_height)
            .filter(|h| h.is_finite() && *h > 0.0)
            .collect();
        let average_x_height = if x_heights.is_empty() {
            0.0
        } else {
            x_heights.iter().sum::<f32>() / x_heights.len() as f32
        };

        let metadata = ExportMetadata {
            label_count: store.label_count(),
            sample_count: store.sample_count(),
            stroke_count: store.strokes().count(),
            average_x_height,
            average_pressure: pressure_dynamics(store).map_or(0.0, |d| d.avg),
        };

        Self {
            version: TRAINING_EXPORT_VERSION,
            profile: profile.copied(),
            metadata,
            labels,
        }
    }

    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ExportError> {
        let export: TrainingExport = serde_json::from_str(json)?;
        if export.version != TRAINING_EXPORT_VERSION {
            return Err(ExportError::UnsupportedVersion(export.version));
        }
        debug!(
            "TrainingExport::from_json: {} labels, {} samples",
            export.labels.len(),
            export.metadata.sample_count
        );
        Ok(export)
    }

    /// Raw samples as a store
    pub fn samples(&self) -> SampleStore {
        self.labels.values().flat_map(|entry| entry.raw.iter().cloned()).collect()
    }

    /// Model from the raw samples and the stored profile (untrained if the
    /// export carries none)
    pub fn into_model(self) -> HandwritingModel {
        let samples = self.samples();
        HandwritingModel::new(samples, self.profile)
    }
}
