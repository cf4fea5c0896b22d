//! Style profile analysis
//!
//! Aggregates every sample in a [`SampleStore`] into a [`StyleProfile`]:
//! - slant from a least-squares line fit per stroke
//! - pressure range and average over all points
//! - baseline wobble (messiness) from the spread of stroke centers
//! - spacing from gaps between strokes of word and sentence samples
//! - cursive detection from near-touching strokes in word samples
//! - speed class from path length over stroke duration
//!
//! Strokes with fewer than two points are ignored everywhere. The numeric
//! cut-offs come from [`AnalysisThresholds`].

use scribe_config::AnalysisThresholds;
use tracing::{debug, info};

use crate::profile::{PressureDynamics, StyleProfile, WritingSpeed};
use crate::types::{Sample, SampleKind, SampleStore, Stroke};

fn geometry_strokes(store: &SampleStore) -> impl Iterator<Item = &Stroke> {
    store.strokes().filter(|s| s.has_geometry())
}

/// Slant of a single stroke in degrees, from a least-squares fit of
/// `y = slope * x + intercept`
///
/// Returns None when the stroke has fewer than `min_points` points or the fit
/// is non-finite (a perfectly vertical stroke).
pub fn calculate_slant(stroke: &Stroke, min_points: usize) -> Option<f32> {
    if stroke.len() < min_points.max(2) {
        return None;
    }

    let n = stroke.len() as f64;
    let (mut sum_x, mut sum_y, mut sum_xx, mut sum_xy) = (0.0f64, 0.0f64, 0.0f64, 0.0f64);
    for p in stroke.points() {
        let (x, y) = (p.x as f64, p.y as f64);
        sum_x += x;
        sum_y += y;
        sum_xx += x * x;
        sum_xy += x * y;
    }

    let slope = (n * sum_xy - sum_x * sum_y) / (n * sum_xx - sum_x * sum_x);
    if !slope.is_finite() {
        return None;
    }

    let degrees = slope.atan().to_degrees() as f32;
    degrees.is_finite().then_some(degrees)
}

/// Mean of the per-stroke slants (each stroke weighted equally)
pub fn average_slant(store: &SampleStore, thresholds: &AnalysisThresholds) -> Option<f32> {
    mean(geometry_strokes(store).filter_map(|s| calculate_slant(s, thresholds.min_slant_points)))
}

/// Pressure range over every point of every stroke
pub fn pressure_dynamics(store: &SampleStore) -> Option<PressureDynamics> {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    let mut sum = 0.0f64;
    let mut count = 0usize;

    for p in geometry_strokes(store).flat_map(|s| s.points()) {
        if !p.pressure.is_finite() {
            continue;
        }
        min = min.min(p.pressure);
        max = max.max(p.pressure);
        sum += p.pressure as f64;
        count += 1;
    }

    if count == 0 {
        return None;
    }

    Some(PressureDynamics {
        min,
        max,
        avg: (sum / count as f64) as f32,
        variation: max - min,
    })
}

/// Population standard deviation of stroke center Y values
pub fn baseline_variation(store: &SampleStore) -> Option<f32> {
    let centers: Vec<f64> = geometry_strokes(store)
        .map(|s| s.bounds().center_y as f64)
        .collect();
    if centers.is_empty() {
        return None;
    }

    let n = centers.len() as f64;
    let mean = centers.iter().sum::<f64>() / n;
    let variance = centers.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / n;
    Some(variance.sqrt() as f32)
}

/// Messiness score for a baseline standard deviation
pub fn messiness_from_variation(std_dev: f32, thresholds: &AnalysisThresholds) -> f32 {
    if thresholds.messiness_full_scale_px <= 0.0 {
        return 0.0;
    }
    (std_dev / thresholds.messiness_full_scale_px).clamp(0.0, 1.0)
}

/// Horizontal gaps between consecutive strokes of a sample
///
/// Negative values mean the strokes overlap.
pub fn stroke_gaps(sample: &Sample) -> Vec<f32> {
    let strokes: Vec<&Stroke> = sample.strokes.iter().filter(|s| s.has_geometry()).collect();
    strokes
        .windows(2)
        .map(|pair| pair[1].bounds().min_x - pair[0].bounds().max_x)
        .collect()
}

/// Spacing multiplier from the average gap in word and sentence samples
pub fn spacing_multiplier(store: &SampleStore, thresholds: &AnalysisThresholds) -> Option<f32> {
    let gaps = store
        .samples()
        .filter(|s| s.is_multi_character())
        .flat_map(stroke_gaps);
    let average_gap = mean(gaps)?;

    if thresholds.spacing_gap_divisor <= 0.0 {
        return None;
    }
    Some((average_gap / thresholds.spacing_gap_divisor).clamp(thresholds.spacing_min, thresholds.spacing_max))
}

/// Whether more than the configured share of word samples have joined letters
///
/// A word counts as joined when any two adjacent strokes are closer than
/// `connected_gap_px`.
pub fn detect_cursive(store: &SampleStore, thresholds: &AnalysisThresholds) -> bool {
    let mut words = 0usize;
    let mut connected = 0usize;

    for sample in store.samples().filter(|s| s.kind == SampleKind::Word) {
        words += 1;
        if stroke_gaps(sample).iter().any(|&gap| gap < thresholds.connected_gap_px) {
            connected += 1;
        }
    }

    debug!("detect_cursive: {}/{} word samples connected", connected, words);
    connected as f32 > words as f32 * thresholds.cursive_majority
}

/// Average pen speed in px/ms over strokes with a known duration
pub fn average_speed(store: &SampleStore) -> Option<f32> {
    mean(
        geometry_strokes(store)
            .filter(|s| s.duration() > 0.0)
            .map(|s| (s.path_length() as f64 / s.duration()) as f32),
    )
}

/// Classify an average speed
pub fn classify_speed(speed: f32, thresholds: &AnalysisThresholds) -> WritingSpeed {
    if speed > thresholds.fast_speed {
        WritingSpeed::Fast
    } else if speed < thresholds.slow_speed {
        WritingSpeed::Slow
    } else {
        WritingSpeed::Medium
    }
}

/// Derive a complete style profile from a sample store
pub fn analyze(store: &SampleStore, thresholds: &AnalysisThresholds) -> StyleProfile {
    let defaults = StyleProfile::default();

    let baseline_std = baseline_variation(store);
    let profile = StyleProfile {
        slant: average_slant(store, thresholds).unwrap_or(defaults.slant),
        spacing: spacing_multiplier(store, thresholds).unwrap_or(defaults.spacing),
        messiness: baseline_std
            .map(|std_dev| messiness_from_variation(std_dev, thresholds))
            .unwrap_or(defaults.messiness),
        baseline_variation: baseline_std.unwrap_or(defaults.baseline_variation),
        pressure_dynamics: pressure_dynamics(store).unwrap_or(defaults.pressure_dynamics),
        connect_letters: detect_cursive(store, thresholds),
        speed: average_speed(store)
            .map(|speed| classify_speed(speed, thresholds))
            .unwrap_or(defaults.speed),
    };

    info!(
        "analyze: {} samples -> slant={:.1} spacing={:.2} messiness={:.2} cursive={} speed={:?}",
        store.sample_count(),
        profile.slant,
        profile.spacing,
        profile.messiness,
        profile.connect_letters,
        profile.speed
    );

    profile
}

fn mean(values: impl Iterator<Item = f32>) -> Option<f32> {
    let (sum, count) = values.fold((0.0f64, 0usize), |(sum, count), v| (sum + v as f64, count + 1));
    (count > 0).then(|| (sum / count as f64) as f32)
}
