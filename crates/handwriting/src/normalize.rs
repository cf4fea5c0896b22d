//! Sample normalization into a common typographic frame
//!
//! Captured samples arrive at whatever size and height the writer happened
//! to use. Normalization moves each one onto a fixed baseline and scales it
//! to a fixed x-height so samples from different sessions are comparable.

use std::collections::BTreeMap;

use scribe_config::NormalizationConfig;
use tracing::debug;

use crate::types::{Point, Sample, Stroke};

/// Baseline and x-height measured on a sample or stroke
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypographicMetrics {
    pub baseline: f32,
    pub x_height: f32,
}

/// Most frequent rounded Y value among the points
///
/// Ties go to the smaller Y. Returns None for an empty slice.
pub fn detect_baseline_points(points: &[Point]) -> Option<f32> {
    let mut histogram: BTreeMap<i64, usize> = BTreeMap::new();
    for p in points.iter().filter(|p| p.y.is_finite()) {
        *histogram.entry(p.y.round() as i64).or_default() += 1;
    }

    let mut best: Option<(i64, usize)> = None;
    for (&y, &count) in &histogram {
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((y, count));
        }
    }
    best.map(|(y, _)| y as f32)
}

/// The Y the pen rests on most often within a stroke
pub fn detect_baseline(stroke: &Stroke) -> Option<f32> {
    detect_baseline_points(stroke.points())
}

/// Height of the stroke body above the baseline (`baseline - minY`)
///
/// Only meaningful for lowercase letters without ascenders or descenders;
/// choosing such strokes is left to the caller.
pub fn calculate_x_height(stroke: &Stroke, baseline: f32) -> f32 {
    if stroke.is_empty() {
        return 0.0;
    }
    baseline - stroke.bounds().min_y
}

/// Move a stroke onto the target baseline and scale it to the target x-height
///
/// Degenerate input (fewer than two points, non-positive or non-finite
/// x-height, non-finite baseline) is returned unchanged with the
/// normalized flag cleared.
pub fn normalize_stroke(
    stroke: &Stroke,
    detected_baseline: f32,
    detected_x_height: f32,
    target: &NormalizationConfig,
) -> Stroke {
    let degenerate = !stroke.has_geometry()
        || !detected_baseline.is_finite()
        || !detected_x_height.is_finite()
        || detected_x_height <= 0.0;

    if degenerate {
        debug!(
            "normalize_stroke: skipping degenerate stroke ({} points, x_height={})",
            stroke.len(),
            detected_x_height
        );
        return stroke.clone().with_normalized(false);
    }

    let scale = target.target_x_height / detected_x_height;
    stroke
        .map_points(|p| Point {
            x: p.x * scale,
            y: target.target_baseline + (p.y - detected_baseline) * scale,
            ..*p
        })
        .with_normalized(true)
}

/// Measure baseline and x-height over every point of a sample
pub fn measure_sample(sample: &Sample) -> Option<TypographicMetrics> {
    let points: Vec<Point> = sample.points().copied().collect();
    let baseline = detect_baseline_points(&points)?;
    let min_y = points.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
    Some(TypographicMetrics {
        baseline,
        x_height: baseline - min_y,
    })
}

/// Normalize every stroke of a sample with metrics measured once on the
/// whole sample, so multi-stroke glyphs keep their internal layout
pub fn normalize_sample(sample: &Sample, target: &NormalizationConfig) -> Sample {
    let metrics = measure_sample(sample);
    let strokes = sample
        .strokes
        .iter()
        .map(|stroke| match metrics {
            Some(m) => normalize_stroke(stroke, m.baseline, m.x_height, target),
            None => stroke.clone().with_normalized(false),
        })
        .collect();

    Sample {
        label: sample.label.clone(),
        kind: sample.kind,
        strokes,
        timestamp: sample.timestamp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SampleKind;

    const EPS: f32 = 1e-3;

    fn stroke(points: &[(f32, f32)]) -> Stroke {
        Stroke::new(
            points
                .iter()
                .enumerate()
                .map(|(i, &(x, y))| Point::new(x, y, 0.6, i as f64))
                .collect(),
        )
    }

    /// A lowercase-like body: resting on y=100, rising to y=60
    fn body() -> Stroke {
        stroke(&[
            (10.0, 100.0),
            (14.0, 100.2),
            (18.0, 99.8),
            (22.0, 100.0),
            (20.0, 80.0),
            (16.0, 60.0),
            (12.0, 80.0),
        ])
    }

    #[test]
    fn test_detect_baseline_mode() {
        assert_eq!(detect_baseline(&body()), Some(100.0));
    }

    #[test]
    fn test_detect_baseline_tie_prefers_smaller_y() {
        let s = stroke(&[(0.0, 50.0), (1.0, 20.0), (2.0, 50.0), (3.0, 20.0)]);
        assert_eq!(detect_baseline(&s), Some(20.0));
        assert_eq!(detect_baseline(&Stroke::new(vec![])), None);
    }

    #[test]
    fn test_x_height() {
        let s = body();
        assert!((calculate_x_height(&s, 100.0) - 40.0).abs() < EPS);
    }

    #[test]
    fn test_normalize_hits_targets() {
        let s = body();
        let target = NormalizationConfig::default();
        let baseline = detect_baseline(&s).unwrap();
        let x_height = calculate_x_height(&s, baseline);

        let normalized = normalize_stroke(&s, baseline, x_height, &target);
        assert!(normalized.is_normalized());

        let new_baseline = detect_baseline(&normalized).unwrap();
        let new_x_height = calculate_x_height(&normalized, new_baseline);
        assert!((new_baseline - target.target_baseline).abs() < 1.0);
        assert!((new_x_height - target.target_x_height).abs() < 1.0);

        // Pressure is untouched
        for (a, b) in s.points().iter().zip(normalized.points()) {
            assert_eq!(a.pressure, b.pressure);
        }
        // Source untouched
        assert!(!s.is_normalized());
        assert_eq!(s.bounds().min_y, 60.0);
    }

    #[test]
    fn test_renormalize_is_noop() {
        let target = NormalizationConfig::default();
        let s = body();
        let once = normalize_stroke(&s, 100.0, 40.0, &target);

        let baseline = detect_baseline(&once).unwrap();
        let x_height = calculate_x_height(&once, baseline);
        let twice = normalize_stroke(&once, baseline, x_height, &target);

        for (a, b) in once.points().iter().zip(twice.points()) {
            assert!((a.x - b.x).abs() < 0.05, "{} vs {}", a.x, b.x);
            assert!((a.y - b.y).abs() < 0.05, "{} vs {}", a.y, b.y);
        }
    }

    #[test]
    fn test_degenerate_input_unchanged() {
        let target = NormalizationConfig::default();
        let s = body();

        let zero = normalize_stroke(&s, 100.0, 0.0, &target);
        assert!(!zero.is_normalized());
        assert_eq!(zero.points(), s.points());

        let nan = normalize_stroke(&s, 100.0, f32::NAN, &target);
        assert!(!nan.is_normalized());

        let dot = stroke(&[(5.0, 5.0)]);
        let dot_out = normalize_stroke(&dot, 5.0, 10.0, &target);
        assert!(!dot_out.is_normalized());
        assert_eq!(dot_out.points(), dot.points());
    }

    #[test]
    fn test_normalize_sample_keeps_layout() {
        let target = NormalizationConfig::default();
        // A "t": stem resting on 100, crossbar at 80
        let sample = Sample::new(
            "t",
            SampleKind::Letter,
            vec![
                stroke(&[(10.0, 60.0), (10.0, 100.0), (10.0, 100.0), (10.0, 100.0)]),
                stroke(&[(4.0, 80.0), (16.0, 80.0)]),
            ],
        );

        let normalized = normalize_sample(&sample, &target);
        assert_eq!(normalized.strokes.len(), 2);
        assert!(normalized.strokes.iter().all(Stroke::is_normalized));

        // x-height 40 -> 50, so scale 1.25; crossbar sits halfway up
        let bar_y = normalized.strokes[1].points()[0].y;
        assert!((bar_y - 275.0).abs() < EPS);
        let stem_bottom = normalized.strokes[0].bounds().max_y;
        assert!((stem_bottom - 300.0).abs() < EPS);
    }
}
