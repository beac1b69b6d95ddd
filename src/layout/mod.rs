mod grouping;
mod rules;
pub(crate) mod types;
pub use grouping::group_spatially;
pub use rules::{apply_layout_rules, classify_group, infer_alignment, infer_direction, infer_spacing};
pub use types::*;

use crate::config::{LayoutConfig, RuleConfig};
use crate::ir::{DetectedComponent, Size};

pub fn compute_layout(
    components: &[DetectedComponent],
    canvas: Size,
    layout: &LayoutConfig,
    rules: &RuleConfig,
) -> Vec<LayoutGroup> {
    if !layout.enabled {
        return standalone_groups(components);
    }
    let rows = group_spatially(components, layout.alignment_tolerance);
    tracing::debug!(rows = rows.len(), "grouped components into rows");
    apply_layout_rules(rows, canvas, layout, rules)
}

// One group per component, in input order, with no inferred structure.
fn standalone_groups(components: &[DetectedComponent]) -> Vec<LayoutGroup> {
    components
        .iter()
        .enumerate()
        .map(|(idx, component)| LayoutGroup {
            id: format!("group-{}", idx + 1),
            kind: GroupKind::Standalone,
            components: vec![component.clone()],
            direction: FlexDirection::Column,
            alignment: Alignment::Start,
            spacing: 0.0,
            bounding_rect: component.rect,
        })
        .collect()
}
