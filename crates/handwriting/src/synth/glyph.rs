//! Character and word synthesis.

use fastrand::Rng;
use scribe_config::LayoutConfig;
use tracing::debug;

use super::transform::transform_stroke;
use super::{StrokeRole, SynthesizedStroke};
use crate::profile::StyleProfile;
use crate::types::{Point, SampleStore, Stroke};

/// Horizontal extent (`max_x - min_x`) over every point of the strokes
///
/// Zero when there are no points.
pub fn strokes_width<'a>(strokes: impl IntoIterator<Item = &'a Stroke>) -> f32 {
    let mut min_x = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    for p in strokes.into_iter().flat_map(|s| s.points()) {
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
    }
    if min_x.is_finite() && max_x.is_finite() {
        max_x - min_x
    } else {
        0.0
    }
}

/// Strokes for one character with its top-left at `(x, y)`
///
/// One stored sample is picked uniformly at random per call, so repeated
/// characters vary naturally. Each stroke keeps its offset from the sample's
/// bounding box. An uncovered character yields an empty list; the caller
/// decides how much space to leave.
pub fn synthesize_character(
    ch: char,
    x: f32,
    y: f32,
    store: &SampleStore,
    profile: &StyleProfile,
    rng: &mut Rng,
) -> Vec<Stroke> {
    let samples = store.glyph(ch);
    if samples.is_empty() {
        debug!("synthesize_character: no samples for {:?}", ch);
        return Vec::new();
    }

    let sample = &samples[rng.usize(..samples.len())];
    let Some(origin) = sample.bounds() else {
        debug!("synthesize_character: sample for {:?} has no points", ch);
        return Vec::new();
    };

    sample
        .strokes
        .iter()
        .filter(|stroke| !stroke.is_empty())
        .map(|stroke| {
            let b = stroke.bounds();
            let target_x = x + (b.min_x - origin.min_x);
            let target_y = y + (b.min_y - origin.min_y);
            transform_stroke(stroke, target_x, target_y, profile, rng)
        })
        .collect()
}

/// Three-point cursive join from the end of one glyph to the next cursor
fn connector(from: Point, to_x: f32, to_y: f32, layout: &LayoutConfig) -> Stroke {
    let pressure = layout.connector_pressure;
    let mid = Point::new(
        (from.x + to_x) / 2.0,
        (from.y + to_y) / 2.0 - layout.connector_lift,
        pressure,
        from.timestamp,
    );
    Stroke::new(vec![
        Point::new(from.x, from.y, pressure, from.timestamp),
        mid,
        Point::new(to_x, to_y, pressure, from.timestamp),
    ])
}

/// Strokes for one word plus its horizontal extent
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WordLayout {
    pub strokes: Vec<SynthesizedStroke>,
    /// Width covered by drawn points and missing-glyph placeholders
    pub width: f32,
}

/// Strokes for one word starting at `(x, y)`
///
/// The cursor advances by each glyph's width plus
/// `spacing * letter_spacing_factor`; an uncovered character advances it by
/// `missing_glyph_width`. When the profile connects letters, a connector is
/// emitted between consecutive glyphs that both have samples.
pub fn synthesize_word(
    word: &str,
    x: f32,
    y: f32,
    store: &SampleStore,
    profile: &StyleProfile,
    layout: &LayoutConfig,
    rng: &mut Rng,
) -> Vec<SynthesizedStroke> {
    layout_word(word, x, y, store, profile, layout, rng).strokes
}

/// [`synthesize_word`] with the word's extent
///
/// Placeholder gaps left by uncovered characters count towards the width, so
/// a leading or trailing missing glyph still takes up space in the line.
pub fn layout_word(
    word: &str,
    x: f32,
    y: f32,
    store: &SampleStore,
    profile: &StyleProfile,
    layout: &LayoutConfig,
    rng: &mut Rng,
) -> WordLayout {
    let mut out = Vec::new();
    let mut cursor_x = x;
    let mut min_x = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut chars = word.chars().peekable();

    while let Some(ch) = chars.next() {
        let strokes = synthesize_character(ch, cursor_x, y, store, profile, rng);
        let last_point = strokes.last().and_then(|s| s.last_point()).copied();

        if strokes.is_empty() {
            min_x = min_x.min(cursor_x);
            cursor_x += layout.missing_glyph_width;
            max_x = max_x.max(cursor_x);
        } else {
            for p in strokes.iter().flat_map(|s| s.points()) {
                min_x = min_x.min(p.x);
                max_x = max_x.max(p.x);
            }
            cursor_x += strokes_width(&strokes) + profile.spacing * layout.letter_spacing_factor;
        }

        out.extend(strokes.into_iter().map(|stroke| SynthesizedStroke {
            stroke,
            role: StrokeRole::Glyph(ch),
        }));

        let next_covered = chars.peek().is_some_and(|&next| !store.glyph(next).is_empty());
        if profile.connect_letters && next_covered {
            if let Some(from) = last_point {
                out.push(SynthesizedStroke {
                    stroke: connector(from, cursor_x, y, layout),
                    role: StrokeRole::Connector,
                });
            }
        }
    }

    let width = if min_x.is_finite() && max_x.is_finite() {
        max_x - min_x
    } else {
        0.0
    };
    WordLayout { strokes: out, width }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Sample, SampleKind};

    const EPS: f32 = 1e-4;

    fn glyph_sample(label: &str, width: f32) -> Sample {
        Sample::new(
            label,
            SampleKind::Letter,
            vec![Stroke::new(vec![
                Point::new(0.0, 0.0, 0.5, 0.0),
                Point::new(width, 30.0, 0.5, 10.0),
            ])],
        )
    }

    fn store() -> SampleStore {
        [glyph_sample("a", 20.0), glyph_sample("b", 30.0)].into_iter().collect()
    }

    #[test]
    fn test_missing_character_is_empty() {
        let mut rng = Rng::with_seed(1);
        let out = synthesize_character('z', 0.0, 0.0, &store(), &StyleProfile::default(), &mut rng);
        assert!(out.is_empty());
    }

    #[test]
    fn test_multi_stroke_glyph_keeps_layout() {
        let sample = Sample::new(
            "t",
            SampleKind::Letter,
            vec![
                Stroke::new(vec![Point::new(50.0, 100.0, 0.5, 0.0), Point::new(50.0, 140.0, 0.5, 5.0)]),
                Stroke::new(vec![Point::new(44.0, 110.0, 0.5, 9.0), Point::new(56.0, 110.0, 0.5, 12.0)]),
            ],
        );
        let store: SampleStore = [sample].into_iter().collect();
        let mut rng = Rng::with_seed(5);
        let out = synthesize_character('t', 0.0, 0.0, &store, &StyleProfile::default(), &mut rng);

        assert_eq!(out.len(), 2);
        // Stem is 6px right of the crossbar's left edge
        assert!((out[0].bounds().min_x - 6.0).abs() < EPS);
        assert!((out[0].bounds().min_y - 0.0).abs() < EPS);
        assert!((out[1].bounds().min_x - 0.0).abs() < EPS);
        assert!((out[1].bounds().min_y - 10.0).abs() < EPS);
    }

    #[test]
    fn test_connected_word_order() {
        let mut rng = Rng::with_seed(2);
        let profile = StyleProfile {
            connect_letters: true,
            ..Default::default()
        };
        let layout = LayoutConfig::default();
        let out = synthesize_word("ab", 0.0, 0.0, &store(), &profile, &layout, &mut rng);

        let roles: Vec<StrokeRole> = out.iter().map(|s| s.role).collect();
        assert_eq!(
            roles,
            vec![StrokeRole::Glyph('a'), StrokeRole::Connector, StrokeRole::Glyph('b')]
        );

        let connector = &out[1].stroke;
        assert_eq!(connector.len(), 3);
        assert!(connector.points().iter().all(|p| (p.pressure - 0.3).abs() < EPS));

        // From the end of 'a' to the next cursor at 20 + 1.0 * 5
        let first = connector.points()[0];
        let mid = connector.points()[1];
        let last = connector.points()[2];
        assert!((first.x - 20.0).abs() < EPS && (first.y - 30.0).abs() < EPS);
        assert!((last.x - 25.0).abs() < EPS && last.y.abs() < EPS);
        assert!((mid.y - (15.0 - 5.0)).abs() < EPS);

        // 'b' starts at the cursor
        assert!((out[2].stroke.bounds().min_x - 25.0).abs() < EPS);
    }

    #[test]
    fn test_unconnected_word_has_no_connectors() {
        let mut rng = Rng::with_seed(2);
        let layout = LayoutConfig::default();
        let out = synthesize_word("abab", 0.0, 0.0, &store(), &StyleProfile::default(), &layout, &mut rng);
        assert_eq!(out.len(), 4);
        assert!(!out.iter().any(SynthesizedStroke::is_connector));
    }

    #[test]
    fn test_no_connector_into_missing_glyph() {
        let mut rng = Rng::with_seed(6);
        let profile = StyleProfile {
            connect_letters: true,
            ..Default::default()
        };
        let layout = LayoutConfig::default();
        let out = synthesize_word("a?b", 0.0, 0.0, &store(), &profile, &layout, &mut rng);

        let roles: Vec<StrokeRole> = out.iter().map(|s| s.role).collect();
        assert_eq!(roles, vec![StrokeRole::Glyph('a'), StrokeRole::Glyph('b')]);

        let joined = synthesize_word("ab?", 0.0, 0.0, &store(), &profile, &layout, &mut rng);
        assert_eq!(joined.iter().filter(|s| s.is_connector()).count(), 1);
        assert!(!joined.last().is_some_and(SynthesizedStroke::is_connector));
    }

    #[test]
    fn test_placeholder_counts_towards_width() {
        let mut rng = Rng::with_seed(4);
        let profile = StyleProfile::default();
        let layout = LayoutConfig::default();

        let plain = layout_word("a", 0.0, 0.0, &store(), &profile, &layout, &mut rng);
        assert!((plain.width - 20.0).abs() < EPS);

        // a spans 0..20, cursor 25, two placeholders to 45
        let trailing = layout_word("a??", 0.0, 0.0, &store(), &profile, &layout, &mut rng);
        assert!((trailing.width - 45.0).abs() < EPS);

        // placeholder 0..10, then a spans 10..30
        let leading = layout_word("?a", 0.0, 0.0, &store(), &profile, &layout, &mut rng);
        assert!((leading.width - 30.0).abs() < EPS);
        assert!((leading.strokes[0].stroke.bounds().min_x - 10.0).abs() < EPS);

        let missing = layout_word("??", 0.0, 0.0, &store(), &profile, &layout, &mut rng);
        assert!(missing.strokes.is_empty());
        assert!((missing.width - 20.0).abs() < EPS);
    }

    #[test]
    fn test_missing_glyph_advances_cursor() {
        let mut rng = Rng::with_seed(4);
        let layout = LayoutConfig::default();
        let out = synthesize_word("a?b", 0.0, 0.0, &store(), &StyleProfile::default(), &layout, &mut rng);
        assert_eq!(out.len(), 2);
        // a: 20 + 5, then the gap of 10
        assert!((out[1].stroke.bounds().min_x - 35.0).abs() < EPS);
    }

    #[test]
    fn test_strokes_width() {
        let s = store();
        let strokes: Vec<&Stroke> = s.strokes().collect();
        assert!((strokes_width(strokes) - 30.0).abs() < EPS);
        assert_eq!(strokes_width(&Vec::<Stroke>::new()), 0.0);
    }
}
