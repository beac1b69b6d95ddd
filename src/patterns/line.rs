use crate::config::PatternConfig;
use crate::ir::{Observation, PatternKind, Size};

use super::Candidate;

/// Reclassifies detected rectangles by aspect ratio and relative height. A rectangle may
/// produce more than one candidate.
pub(super) fn detect_line_patterns(
    observations: &[Observation],
    canvas: Size,
    config: &PatternConfig,
) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    if canvas.height <= 0.0 {
        return candidates;
    }

    for obs in observations {
        let aspect = obs.rect.aspect_ratio();
        let height = obs.rect.height / canvas.height;

        if aspect > config.hamburger_min_aspect && height < config.hamburger_max_height {
            candidates.push(Candidate::new(
                PatternKind::HamburgerMenu,
                obs.rect,
                obs.confidence * config.hamburger_discount,
            ));
        }

        let (min_aspect, max_aspect) = config.form_field_aspect;
        let (min_height, max_height) = config.form_field_height;
        if aspect > min_aspect && aspect < max_aspect && height > min_height && height < max_height
        {
            candidates.push(Candidate::new(
                PatternKind::FormField,
                obs.rect,
                obs.confidence * config.form_field_discount,
            ));
        }

        if aspect > config.text_line_min_aspect && height < config.text_line_max_height {
            candidates.push(Candidate::new(
                PatternKind::TextLines,
                obs.rect,
                obs.confidence * config.text_line_discount,
            ));
        }
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Rect;

    fn obs(w: f32, h: f32) -> Observation {
        Observation {
            rect: Rect::new(0.0, 0.0, w, h),
            confidence: 1.0,
        }
    }

    fn kinds(candidates: &[Candidate]) -> Vec<PatternKind> {
        candidates.iter().map(|c| c.kind).collect()
    }

    #[test]
    fn thin_wide_bar_matches_every_line_pattern() {
        // aspect 4.5, height 4% of 1000
        let found = detect_line_patterns(
            &[obs(180.0, 40.0)],
            Size::new(1000.0, 1000.0),
            &PatternConfig::default(),
        );
        assert_eq!(
            kinds(&found),
            vec![
                PatternKind::HamburgerMenu,
                PatternKind::FormField,
                PatternKind::TextLines
            ]
        );
        assert!((found[0].confidence - 0.8).abs() < 1e-6);
        assert!((found[1].confidence - 0.7).abs() < 1e-6);
        assert!((found[2].confidence - 0.6).abs() < 1e-6);
    }

    #[test]
    fn form_field_band() {
        // aspect 3, height 10%
        let found = detect_line_patterns(
            &[obs(300.0, 100.0)],
            Size::new(1000.0, 1000.0),
            &PatternConfig::default(),
        );
        assert_eq!(kinds(&found), vec![PatternKind::FormField]);
    }

    #[test]
    fn square_shapes_are_ignored() {
        let found = detect_line_patterns(
            &[obs(100.0, 100.0)],
            Size::new(1000.0, 1000.0),
            &PatternConfig::default(),
        );
        assert!(found.is_empty());
    }

    #[test]
    fn discount_follows_source_confidence() {
        let mut source = obs(180.0, 40.0);
        source.confidence = 0.5;
        let found =
            detect_line_patterns(&[source], Size::new(1000.0, 1000.0), &PatternConfig::default());
        assert!((found[0].confidence - 0.4).abs() < 1e-6);
    }
}
