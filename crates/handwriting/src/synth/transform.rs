//! Placement and per-instance variation of a learned stroke.

use fastrand::Rng;

use crate::constants::{MAX_SYNTH_PRESSURE, MIN_SYNTH_PRESSURE};
use crate::profile::StyleProfile;
use crate::types::{Point, Stroke};

/// Uniform draw in `[-1, 1)`
fn signed_unit(rng: &mut Rng) -> f32 {
    (rng.f32() - 0.5) * 2.0
}

/// Place a stroke with its bounding-box origin at `(target_x, target_y)` and
/// apply the profile's variation to it
///
/// - one baseline jitter of up to `baseline_variation` shared by all points
/// - shear `x += (y - target_y) * tan(slant)`
/// - independent jitter of up to `messiness * 0.5` on x and y per point
/// - pressure scaled by `1 + (r - 0.5) * variation`, clamped to `[0.1, 1.0]`
///
/// The source stroke is not modified.
pub fn transform_stroke(
    stroke: &Stroke,
    target_x: f32,
    target_y: f32,
    profile: &StyleProfile,
    rng: &mut Rng,
) -> Stroke {
    if stroke.is_empty() {
        return stroke.clone();
    }

    let bounds = stroke.bounds();
    let baseline_jitter = signed_unit(rng) * profile.baseline_variation;
    let dx = target_x - bounds.min_x;
    let dy = target_y - bounds.min_y + baseline_jitter;

    let shear = profile.slant.to_radians().tan();
    let jitter = profile.messiness * 0.5;
    let pressure_variation = profile.pressure_dynamics.variation;

    stroke.map_points(|p| {
        let y = p.y + dy;
        let x = p.x + dx + (y - target_y) * shear;

        let jitter_x = signed_unit(rng) * jitter;
        let jitter_y = signed_unit(rng) * jitter;

        let pressure = p.pressure * (1.0 + (rng.f32() - 0.5) * pressure_variation);
        let pressure = if pressure.is_finite() {
            pressure.clamp(MIN_SYNTH_PRESSURE, MAX_SYNTH_PRESSURE)
        } else {
            MIN_SYNTH_PRESSURE
        };

        Point {
            x: x + jitter_x,
            y: y + jitter_y,
            pressure,
            ..*p
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::PressureDynamics;

    const EPS: f32 = 1e-4;

    fn stroke() -> Stroke {
        Stroke::new(vec![
            Point::new(100.0, 200.0, 0.05, 0.0),
            Point::new(110.0, 220.0, 0.5, 8.0),
            Point::new(120.0, 240.0, 1.0, 16.0),
        ])
        .with_label("l")
    }

    fn still_profile() -> StyleProfile {
        StyleProfile::default()
    }

    #[test]
    fn test_translates_to_target() {
        let mut rng = Rng::with_seed(7);
        let out = transform_stroke(&stroke(), 10.0, 20.0, &still_profile(), &mut rng);
        let b = out.bounds();
        assert!((b.min_x - 10.0).abs() < EPS);
        assert!((b.min_y - 20.0).abs() < EPS);
        assert!((b.width - 20.0).abs() < EPS);
        assert!((b.height - 40.0).abs() < EPS);
        assert_eq!(out.label(), Some("l"));
        assert_eq!(out.duration(), 16.0);
    }

    #[test]
    fn test_zero_variation_only_clamps_pressure() {
        let mut rng = Rng::with_seed(42);
        let mut profile = still_profile();
        profile.pressure_dynamics = PressureDynamics {
            min: 0.05,
            max: 1.0,
            avg: 0.5,
            variation: 0.0,
        };
        profile.messiness = 0.8;
        profile.baseline_variation = 3.0;

        for _ in 0..20 {
            let out = transform_stroke(&stroke(), 0.0, 0.0, &profile, &mut rng);
            let pressures: Vec<f32> = out.points().iter().map(|p| p.pressure).collect();
            assert_eq!(pressures, vec![0.1, 0.5, 1.0]);
        }
    }

    #[test]
    fn test_pressure_always_clamped() {
        let mut rng = Rng::with_seed(3);
        let mut profile = still_profile();
        profile.pressure_dynamics.variation = 4.0;
        for _ in 0..50 {
            let out = transform_stroke(&stroke(), 0.0, 0.0, &profile, &mut rng);
            assert!(out
                .points()
                .iter()
                .all(|p| (MIN_SYNTH_PRESSURE..=MAX_SYNTH_PRESSURE).contains(&p.pressure)));
        }
    }

    #[test]
    fn test_shear_follows_slant() {
        let mut rng = Rng::with_seed(1);
        let mut profile = still_profile();
        profile.slant = 45.0;
        let out = transform_stroke(&stroke(), 0.0, 0.0, &profile, &mut rng);

        // y offsets from the target are 0, 20, 40; tan(45) = 1
        let xs: Vec<f32> = out.points().iter().map(|p| p.x).collect();
        assert!((xs[0] - 0.0).abs() < EPS);
        assert!((xs[1] - 30.0).abs() < 1e-3);
        assert!((xs[2] - 60.0).abs() < 1e-3);
    }

    #[test]
    fn test_jitter_bounded() {
        let mut rng = Rng::with_seed(99);
        let mut profile = still_profile();
        profile.messiness = 1.0;
        profile.baseline_variation = 2.0;

        for _ in 0..50 {
            let out = transform_stroke(&stroke(), 0.0, 0.0, &profile, &mut rng);
            for (src, dst) in stroke().points().iter().zip(out.points()) {
                let expected_x = src.x - 100.0;
                let expected_y = src.y - 200.0;
                assert!((dst.x - expected_x).abs() <= 0.5 + EPS);
                assert!((dst.y - expected_y).abs() <= 2.5 + EPS);
            }
        }
    }

    #[test]
    fn test_seeded_is_deterministic() {
        let mut profile = still_profile();
        profile.messiness = 0.7;
        profile.pressure_dynamics.variation = 0.5;

        let a = transform_stroke(&stroke(), 5.0, 5.0, &profile, &mut Rng::with_seed(11));
        let b = transform_stroke(&stroke(), 5.0, 5.0, &profile, &mut Rng::with_seed(11));
        assert_eq!(a.points(), b.points());
    }

    #[test]
    fn test_empty_stroke() {
        let mut rng = Rng::with_seed(0);
        let out = transform_stroke(&Stroke::new(vec![]), 1.0, 1.0, &still_profile(), &mut rng);
        assert!(out.is_empty());
    }
}
