use crate::config::DedupConfig;
use crate::ir::{Observation, Rect, Size};

/// Collapses observations that describe the same drawn shape. Larger shapes are processed
/// first and win; the result is ordered largest-accepted-first, not spatially.
pub fn deduplicate(
    observations: &[Observation],
    canvas: Size,
    config: &DedupConfig,
) -> Vec<Observation> {
    let mut ordered: Vec<Observation> = observations.to_vec();
    ordered.sort_by(|a, b| b.rect.area().total_cmp(&a.rect.area()));

    let mut accepted: Vec<Observation> = Vec::with_capacity(ordered.len());
    for candidate in ordered {
        let duplicate = accepted
            .iter()
            .any(|kept| is_duplicate(&candidate.rect, &kept.rect, canvas, config));
        if !duplicate {
            accepted.push(candidate);
        }
    }

    tracing::debug!(
        input = observations.len(),
        kept = accepted.len(),
        "deduplicated rectangles"
    );
    accepted
}

pub fn deduplicate_rects(rects: &[Rect], canvas: Size, config: &DedupConfig) -> Vec<Rect> {
    let observations: Vec<Observation> = rects
        .iter()
        .map(|rect| Observation {
            rect: *rect,
            confidence: 1.0,
        })
        .collect();
    deduplicate(&observations, canvas, config)
        .into_iter()
        .map(|obs| obs.rect)
        .collect()
}

pub fn is_duplicate(candidate: &Rect, kept: &Rect, canvas: Size, config: &DedupConfig) -> bool {
    overlaps_heavily(candidate, kept, config.overlap_ratio)
        || is_near_identical(candidate, kept, canvas, config)
}

fn overlaps_heavily(candidate: &Rect, kept: &Rect, ratio: f32) -> bool {
    let intersection = candidate.intersection_area(kept);
    if intersection <= 0.0 {
        return false;
    }
    let candidate_area = candidate.area();
    let kept_area = kept.area();
    (candidate_area > 0.0 && intersection / candidate_area > ratio)
        || (kept_area > 0.0 && intersection / kept_area > ratio)
}

/// Same centre and size within the configured tolerances.
pub fn is_near_identical(a: &Rect, b: &Rect, canvas: Size, config: &DedupConfig) -> bool {
    let center_tolerance = canvas.width * config.center_tolerance;
    let size_tolerance = canvas.shorter_side() * config.size_tolerance;
    (a.center_x() - b.center_x()).abs() < center_tolerance
        && (a.center_y() - b.center_y()).abs() < center_tolerance
        && (a.width - b.width).abs() < size_tolerance
        && (a.height - b.height).abs() < size_tolerance
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Size {
        Size::new(400.0, 400.0)
    }

    #[test]
    fn keeps_the_larger_of_two_near_duplicates() {
        let rects = [
            Rect::new(12.0, 11.0, 98.0, 39.0),
            Rect::new(10.0, 10.0, 100.0, 40.0),
        ];
        let kept = deduplicate_rects(&rects, canvas(), &DedupConfig::default());
        assert_eq!(kept, vec![Rect::new(10.0, 10.0, 100.0, 40.0)]);
    }

    #[test]
    fn nested_small_shape_is_absorbed() {
        let rects = [
            Rect::new(0.0, 0.0, 200.0, 200.0),
            Rect::new(10.0, 10.0, 30.0, 30.0),
        ];
        // the small one is fully inside the large one
        let kept = deduplicate_rects(&rects, canvas(), &DedupConfig::default());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].width, 200.0);
    }

    #[test]
    fn disjoint_shapes_survive_in_area_order() {
        let rects = [
            Rect::new(0.0, 0.0, 20.0, 20.0),
            Rect::new(100.0, 100.0, 80.0, 40.0),
            Rect::new(300.0, 10.0, 50.0, 50.0),
        ];
        let kept = deduplicate_rects(&rects, canvas(), &DedupConfig::default());
        let areas: Vec<f32> = kept.iter().map(|r| r.area()).collect();
        assert_eq!(areas, vec![3200.0, 2500.0, 400.0]);
    }

    #[test]
    fn near_identical_without_overlap_threshold() {
        // offset enough that overlap is under 0.8 of either, but centres and sizes match
        let config = DedupConfig {
            overlap_ratio: 0.99,
            ..DedupConfig::default()
        };
        let rects = [Rect::new(10.0, 10.0, 40.0, 40.0), Rect::new(15.0, 15.0, 38.0, 38.0)];
        let kept = deduplicate_rects(&rects, canvas(), &config);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn deduplication_is_idempotent() {
        let rects = [
            Rect::new(10.0, 10.0, 100.0, 40.0),
            Rect::new(12.0, 11.0, 98.0, 39.0),
            Rect::new(150.0, 10.0, 60.0, 60.0),
            Rect::new(150.0, 10.0, 60.0, 60.0),
            Rect::new(40.0, 200.0, 300.0, 120.0),
            Rect::new(60.0, 220.0, 40.0, 40.0),
            Rect::new(200.0, 20.0, 100.0, 30.0),
        ];
        let config = DedupConfig::default();
        let once = deduplicate_rects(&rects, canvas(), &config);
        let twice = deduplicate_rects(&once, canvas(), &config);
        assert_eq!(once, twice);
    }

    #[test]
    fn survivors_obey_the_overlap_law() {
        let rects = [
            Rect::new(0.0, 0.0, 100.0, 100.0),
            Rect::new(50.0, 50.0, 100.0, 100.0),
            Rect::new(90.0, 0.0, 100.0, 60.0),
            Rect::new(5.0, 5.0, 90.0, 92.0),
            Rect::new(300.0, 300.0, 20.0, 20.0),
        ];
        let config = DedupConfig::default();
        let kept = deduplicate_rects(&rects, canvas(), &config);
        for (i, a) in kept.iter().enumerate() {
            for b in kept.iter().skip(i + 1) {
                let ratio = a.intersection_area(b) / a.area().min(b.area());
                assert!(ratio <= 0.8, "{a:?} and {b:?} overlap by {ratio}");
                assert!(!is_duplicate(a, b, canvas(), &config));
            }
        }
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert!(deduplicate(&[], canvas(), &DedupConfig::default()).is_empty());
    }
}
