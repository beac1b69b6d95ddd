use crate::config::{DedupConfig, PatternConfig};
use crate::detect::Sketch;
use crate::ir::{Observation, PatternKind, Rect, SketchedPattern};

mod geometric;
mod line;
mod textual;

pub use geometric::{count_ink_blobs, ink_density};

/// A pattern hit before ids are assigned.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Candidate {
    pub kind: PatternKind,
    pub rect: Rect,
    pub confidence: f32,
}

impl Candidate {
    fn new(kind: PatternKind, rect: Rect, confidence: f32) -> Self {
        Self {
            kind,
            rect,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}

/// Runs the line, geometric and textual analyses concurrently over the same observations and
/// merges their signals. Several signals may refer to the same rectangle.
pub fn recognize_patterns(
    sketch: &Sketch,
    observations: &[Observation],
    config: &PatternConfig,
    dedup: &DedupConfig,
) -> Vec<SketchedPattern> {
    if !sketch.is_usable() || observations.is_empty() {
        return Vec::new();
    }
    let ((lines, shapes), texts) = rayon::join(
        || {
            rayon::join(
                || line::detect_line_patterns(observations, sketch.canvas, config),
                || geometric::detect_geometric_patterns(sketch, observations, config, dedup),
            )
        },
        || textual::detect_textual_patterns(sketch, observations),
    );

    let patterns: Vec<SketchedPattern> = lines
        .into_iter()
        .chain(shapes)
        .chain(texts)
        .enumerate()
        .map(|(idx, candidate)| SketchedPattern {
            id: format!("pattern-{}", idx + 1),
            kind: candidate.kind,
            bounding_box: candidate.rect,
            confidence: candidate.confidence,
            associated_rect: Some(candidate.rect),
        })
        .collect();
    tracing::debug!(count = patterns.len(), "recognized sketch patterns");
    patterns
}

/// Highest-confidence pattern whose associated rectangle matches `rect` within `tolerance`.
/// Ties keep the earliest signal.
pub fn best_pattern_for<'a>(
    rect: &Rect,
    patterns: &'a [SketchedPattern],
    tolerance: f32,
) -> Option<&'a SketchedPattern> {
    patterns
        .iter()
        .filter(|pattern| {
            pattern
                .associated_rect
                .is_some_and(|assoc| assoc.matches_within(rect, tolerance))
        })
        .fold(None, |best: Option<&SketchedPattern>, pattern| match best {
            Some(current) if current.confidence >= pattern.confidence => Some(current),
            _ => Some(pattern),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Size;

    fn pattern(kind: PatternKind, rect: Rect, confidence: f32) -> SketchedPattern {
        SketchedPattern {
            id: String::new(),
            kind,
            bounding_box: rect,
            confidence,
            associated_rect: Some(rect),
        }
    }

    #[test]
    fn best_pattern_prefers_confidence() {
        let rect = Rect::new(10.0, 10.0, 100.0, 20.0);
        let patterns = vec![
            pattern(PatternKind::TextLines, rect, 0.5),
            pattern(PatternKind::HamburgerMenu, rect, 0.7),
            pattern(PatternKind::FormField, Rect::new(200.0, 10.0, 100.0, 20.0), 0.95),
        ];
        let best = best_pattern_for(&Rect::new(12.0, 11.0, 100.0, 20.0), &patterns, 5.0).unwrap();
        assert_eq!(best.kind, PatternKind::HamburgerMenu);
    }

    #[test]
    fn best_pattern_tie_keeps_first() {
        let rect = Rect::new(0.0, 0.0, 50.0, 10.0);
        let patterns = vec![
            pattern(PatternKind::FormField, rect, 0.6),
            pattern(PatternKind::TextLines, rect, 0.6),
        ];
        let best = best_pattern_for(&rect, &patterns, 1.0).unwrap();
        assert_eq!(best.kind, PatternKind::FormField);
    }

    #[test]
    fn no_match_outside_tolerance() {
        let patterns = vec![pattern(PatternKind::Checkbox, Rect::new(0.0, 0.0, 10.0, 10.0), 0.9)];
        assert!(best_pattern_for(&Rect::new(30.0, 0.0, 10.0, 10.0), &patterns, 5.0).is_none());
    }

    #[test]
    fn merged_ids_are_unique() {
        let sketch = Sketch::blank(Size::new(400.0, 800.0));
        let observations = vec![
            Observation {
                rect: Rect::new(10.0, 10.0, 120.0, 30.0),
                confidence: 1.0,
            },
            Observation {
                rect: Rect::new(10.0, 100.0, 300.0, 30.0),
                confidence: 0.5,
            },
        ];
        let patterns = recognize_patterns(
            &sketch,
            &observations,
            &PatternConfig::default(),
            &DedupConfig::default(),
        );
        assert!(!patterns.is_empty());
        let mut ids: Vec<&str> = patterns.iter().map(|p| p.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), patterns.len());
    }

    #[test]
    fn unusable_sketch_yields_nothing() {
        let sketch = Sketch::blank(Size::new(0.0, 0.0));
        let observations = vec![Observation {
            rect: Rect::new(10.0, 10.0, 120.0, 30.0),
            confidence: 1.0,
        }];
        let patterns = recognize_patterns(
            &sketch,
            &observations,
            &PatternConfig::default(),
            &DedupConfig::default(),
        );
        assert!(patterns.is_empty());
    }
}
