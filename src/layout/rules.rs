use crate::config::{LayoutConfig, RuleConfig};
use crate::ir::{DetectedComponent, Rect, Size};

use super::types::{Alignment, FlexDirection, GroupKind, LayoutGroup, bounding_rect};

/// Turns spatial rows into typed layout groups with direction, alignment and spacing.
pub fn apply_layout_rules(
    rows: Vec<Vec<DetectedComponent>>,
    canvas: Size,
    layout: &LayoutConfig,
    rules: &RuleConfig,
) -> Vec<LayoutGroup> {
    let mut groups = Vec::with_capacity(rows.len());
    for (index, mut members) in rows.into_iter().enumerate() {
        if members.is_empty() {
            continue;
        }
        let bounds = bounding_rect(&members);
        let kind = classify_group(&members, &bounds, index, canvas, rules);
        let (direction, alignment, spacing) = match kind {
            GroupKind::Header | GroupKind::Navigation => {
                (FlexDirection::Row, Alignment::SpaceBetween, layout.component_gap)
            }
            GroupKind::ButtonGroup => (
                FlexDirection::Row,
                Alignment::Center,
                bounded(layout.component_gap / 2.0, rules),
            ),
            GroupKind::FormSection => (
                FlexDirection::Column,
                Alignment::Start,
                bounded(layout.component_gap, rules),
            ),
            GroupKind::CardGrid => (
                FlexDirection::Grid,
                Alignment::Start,
                bounded(layout.component_gap * 1.5, rules),
            ),
            _ => {
                let direction = infer_direction(&members, rules);
                (
                    direction,
                    infer_alignment(&members, direction, rules),
                    infer_spacing(&members, direction, rules),
                )
            }
        };

        if direction == FlexDirection::Column {
            members.sort_by(|a, b| a.rect.center_y().total_cmp(&b.rect.center_y()));
        }

        groups.push(LayoutGroup {
            id: format!("group-{}", groups.len() + 1),
            kind,
            components: members,
            direction,
            alignment,
            spacing,
            bounding_rect: bounds,
        });
    }
    tracing::debug!(count = groups.len(), "applied layout rules");
    groups
}

// Gap-derived overrides obey the same [min, max] bound as inferred spacing; header and
// navigation skip this and keep the configured gap.
fn bounded(spacing: f32, rules: &RuleConfig) -> f32 {
    spacing.max(rules.min_spacing).min(rules.max_spacing)
}

/// Ordered rule list; the first rule that matches decides the group type.
pub fn classify_group(
    members: &[DetectedComponent],
    bounds: &Rect,
    index: usize,
    canvas: Size,
    rules: &RuleConfig,
) -> GroupKind {
    let position = if canvas.height > 0.0 {
        bounds.min_y() / canvas.height
    } else {
        0.0
    };
    let width = if canvas.width > 0.0 {
        bounds.width / canvas.width
    } else {
        0.0
    };
    let has_navigation = members.iter().any(|c| c.kind.is_navigation());

    if position < rules.header_band && (has_navigation || index == 0) {
        return GroupKind::Header;
    }
    if has_navigation {
        return GroupKind::Navigation;
    }
    if members.iter().any(|c| c.kind.is_form_control()) {
        return GroupKind::FormSection;
    }
    if members.len() > 1
        && members[0].kind.is_button()
        && members.iter().all(|c| c.kind == members[0].kind)
    {
        return GroupKind::ButtonGroup;
    }
    if members.iter().any(|c| c.kind.is_image()) && members.iter().any(|c| c.kind.is_label()) {
        return GroupKind::CardGrid;
    }
    if position > rules.footer_band {
        return GroupKind::Footer;
    }
    let (hero_top, hero_bottom) = rules.hero_band;
    if position > hero_top && position < hero_bottom && width > rules.hero_min_width {
        return GroupKind::HeroSection;
    }
    GroupKind::Standalone
}

fn spread(values: impl Iterator<Item = f32>) -> f32 {
    let (min, max) = values.fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if max >= min { max - min } else { 0.0 }
}

pub fn infer_direction(members: &[DetectedComponent], rules: &RuleConfig) -> FlexDirection {
    let spread_x = spread(members.iter().map(|c| c.rect.center_x()));
    let spread_y = spread(members.iter().map(|c| c.rect.center_y()));
    if spread_x > rules.row_spread_ratio * spread_y {
        return FlexDirection::Row;
    }
    if members.len() > rules.grid_min_members
        && (spread_x - spread_y).abs() < rules.grid_balance * spread_x.min(spread_y)
    {
        return FlexDirection::Grid;
    }
    FlexDirection::Column
}

fn variance(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().sum::<f32>() / values.len() as f32;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / values.len() as f32
}

/// Rows check how well vertical centres line up, columns the horizontal ones.
pub fn infer_alignment(
    members: &[DetectedComponent],
    direction: FlexDirection,
    rules: &RuleConfig,
) -> Alignment {
    let centers: Vec<f32> = match direction {
        FlexDirection::Row => members.iter().map(|c| c.rect.center_y()).collect(),
        FlexDirection::Column => members.iter().map(|c| c.rect.center_x()).collect(),
        FlexDirection::Grid => return Alignment::Start,
    };
    if variance(&centers) < rules.center_variance {
        Alignment::Center
    } else {
        Alignment::Start
    }
}

/// Median positive gap along the primary axis, clamped; the default when no gap is positive.
pub fn infer_spacing(
    members: &[DetectedComponent],
    direction: FlexDirection,
    rules: &RuleConfig,
) -> f32 {
    let mut spans: Vec<(f32, f32)> = members
        .iter()
        .map(|c| match direction {
            FlexDirection::Column => (c.rect.min_y(), c.rect.max_y()),
            FlexDirection::Row | FlexDirection::Grid => (c.rect.min_x(), c.rect.max_x()),
        })
        .collect();
    spans.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut gaps: Vec<f32> = spans
        .windows(2)
        .map(|pair| pair[1].0 - pair[0].1)
        .filter(|gap| *gap > 0.0)
        .collect();
    if gaps.is_empty() {
        return rules.default_spacing;
    }
    gaps.sort_by(|a, b| a.total_cmp(b));
    bounded(gaps[gaps.len() / 2], rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{ComponentType, PatternKind, UiKind};

    fn canvas() -> Size {
        Size::new(400.0, 800.0)
    }

    fn component(kind: ComponentType, x: f32, y: f32, w: f32, h: f32) -> DetectedComponent {
        DetectedComponent {
            id: format!("component-{x}-{y}"),
            rect: Rect::new(x, y, w, h),
            kind,
            label: kind.display_name().to_string(),
        }
    }

    fn button(x: f32, y: f32) -> DetectedComponent {
        component(ComponentType::Ui(UiKind::Button), x, y, 80.0, 40.0)
    }

    fn rules(rows: Vec<Vec<DetectedComponent>>) -> Vec<LayoutGroup> {
        apply_layout_rules(rows, canvas(), &LayoutConfig::default(), &RuleConfig::default())
    }

    #[test]
    fn three_buttons_form_a_button_group() {
        let groups = rules(vec![
            vec![component(ComponentType::Ui(UiKind::Heading), 20.0, 20.0, 200.0, 40.0)],
            vec![button(20.0, 400.0), button(140.0, 400.0), button(260.0, 400.0)],
        ]);
        let group = &groups[1];
        assert_eq!(group.kind, GroupKind::ButtonGroup);
        assert_eq!(group.direction, FlexDirection::Row);
        assert_eq!(group.alignment, Alignment::Center);
        // half of the 12px gap, raised to the 8px floor
        assert_eq!(group.spacing, 8.0);
    }

    #[test]
    fn first_group_near_top_is_header() {
        let groups = rules(vec![vec![
            component(ComponentType::Ui(UiKind::Heading), 20.0, 20.0, 200.0, 40.0),
            component(ComponentType::Ui(UiKind::Icon), 340.0, 25.0, 30.0, 30.0),
        ]]);
        assert_eq!(groups[0].kind, GroupKind::Header);
        assert_eq!(groups[0].direction, FlexDirection::Row);
        assert_eq!(groups[0].alignment, Alignment::SpaceBetween);
        assert_eq!(groups[0].spacing, LayoutConfig::default().component_gap);
    }

    #[test]
    fn navigation_below_header_band() {
        let groups = rules(vec![
            vec![component(ComponentType::Ui(UiKind::Heading), 20.0, 20.0, 200.0, 40.0)],
            vec![component(
                ComponentType::Pattern(PatternKind::HamburgerMenu),
                20.0,
                300.0,
                60.0,
                15.0,
            )],
        ]);
        assert_eq!(groups[1].kind, GroupKind::Navigation);
    }

    #[test]
    fn form_controls_make_a_column_form() {
        let groups = rules(vec![
            vec![component(ComponentType::Ui(UiKind::Heading), 20.0, 20.0, 200.0, 40.0)],
            vec![
                component(ComponentType::Ui(UiKind::Label), 20.0, 300.0, 60.0, 20.0),
                component(ComponentType::Ui(UiKind::TextField), 100.0, 290.0, 260.0, 30.0),
            ],
        ]);
        let form = &groups[1];
        assert_eq!(form.kind, GroupKind::FormSection);
        assert_eq!(form.direction, FlexDirection::Column);
        assert_eq!(form.alignment, Alignment::Start);
        // column order follows vertical centre, the field sits 5px higher
        assert_eq!(form.components[0].kind, ComponentType::Ui(UiKind::TextField));
    }

    #[test]
    fn image_with_label_is_card_grid() {
        let groups = rules(vec![
            vec![component(ComponentType::Ui(UiKind::Heading), 20.0, 20.0, 200.0, 40.0)],
            vec![
                component(ComponentType::Ui(UiKind::Image), 20.0, 300.0, 100.0, 100.0),
                component(ComponentType::Ui(UiKind::Label), 140.0, 330.0, 100.0, 20.0),
            ],
        ]);
        assert_eq!(groups[1].kind, GroupKind::CardGrid);
        assert_eq!(groups[1].direction, FlexDirection::Grid);
        assert_eq!(groups[1].spacing, LayoutConfig::default().component_gap * 1.5);
    }

    #[test]
    fn bottom_band_is_footer_and_wide_middle_is_hero() {
        let groups = rules(vec![
            vec![component(ComponentType::Ui(UiKind::Heading), 20.0, 20.0, 200.0, 40.0)],
            vec![component(ComponentType::Ui(UiKind::Card), 20.0, 250.0, 360.0, 200.0)],
            vec![component(ComponentType::Ui(UiKind::Container), 20.0, 700.0, 360.0, 60.0)],
        ]);
        assert_eq!(groups[1].kind, GroupKind::HeroSection);
        assert_eq!(groups[2].kind, GroupKind::Footer);
    }

    #[test]
    fn lone_component_defaults() {
        let groups = rules(vec![
            vec![component(ComponentType::Ui(UiKind::Heading), 20.0, 20.0, 200.0, 40.0)],
            vec![component(ComponentType::Ui(UiKind::Container), 20.0, 400.0, 100.0, 60.0)],
        ]);
        let lone = &groups[1];
        assert_eq!(lone.kind, GroupKind::Standalone);
        assert_eq!(lone.direction, FlexDirection::Column);
        assert_eq!(lone.spacing, 16.0);
    }

    #[test]
    fn heuristic_row_spacing_is_median_gap_clamped() {
        let rules = RuleConfig::default();
        let members = vec![
            component(ComponentType::Ui(UiKind::Container), 0.0, 400.0, 50.0, 50.0),
            component(ComponentType::Ui(UiKind::Container), 60.0, 400.0, 50.0, 50.0),
            component(ComponentType::Ui(UiKind::Container), 140.0, 400.0, 50.0, 50.0),
            component(ComponentType::Ui(UiKind::Container), 290.0, 400.0, 50.0, 50.0),
        ];
        assert_eq!(infer_direction(&members, &rules), FlexDirection::Row);
        // gaps 10, 30, 100 -> median 30
        assert_eq!(infer_spacing(&members, FlexDirection::Row, &rules), 30.0);
        let tight = vec![members[0].clone(), members[1].clone()];
        // single gap of 10 stays; a 2px gap would clamp to 8
        assert_eq!(infer_spacing(&tight, FlexDirection::Row, &rules), 10.0);
        let touching = vec![
            component(ComponentType::Ui(UiKind::Container), 0.0, 400.0, 50.0, 50.0),
            component(ComponentType::Ui(UiKind::Container), 52.0, 400.0, 50.0, 50.0),
        ];
        assert_eq!(infer_spacing(&touching, FlexDirection::Row, &rules), 8.0);
    }

    #[test]
    fn balanced_spread_with_many_members_is_grid() {
        let rules = RuleConfig::default();
        let corners = [
            (0.0, 0.0),
            (100.0, 0.0),
            (0.0, 100.0),
            (100.0, 100.0),
            (50.0, 50.0),
        ];
        let members: Vec<DetectedComponent> = corners
            .iter()
            .map(|(x, y)| component(ComponentType::Ui(UiKind::Container), *x, *y, 40.0, 40.0))
            .collect();
        assert_eq!(infer_direction(&members, &rules), FlexDirection::Grid);
        assert_eq!(infer_alignment(&members, FlexDirection::Grid, &rules), Alignment::Start);
    }

    #[test]
    fn ragged_row_aligns_to_start() {
        let rules = RuleConfig::default();
        let members = vec![
            component(ComponentType::Ui(UiKind::Container), 0.0, 400.0, 50.0, 20.0),
            component(ComponentType::Ui(UiKind::Container), 100.0, 380.0, 50.0, 80.0),
        ];
        // centres 410 and 420: variance 25
        assert_eq!(infer_alignment(&members, FlexDirection::Row, &rules), Alignment::Center);
        let ragged = vec![
            component(ComponentType::Ui(UiKind::Container), 0.0, 400.0, 50.0, 20.0),
            component(ComponentType::Ui(UiKind::Container), 100.0, 420.0, 50.0, 40.0),
        ];
        // centres 410 and 440: variance 225
        assert_eq!(infer_alignment(&ragged, FlexDirection::Row, &rules), Alignment::Start);
    }

    #[test]
    fn spacing_stays_in_bounds_outside_overrides() {
        let layout = LayoutConfig {
            component_gap: 100.0,
            ..LayoutConfig::default()
        };
        let rows = vec![
            vec![component(ComponentType::Ui(UiKind::Heading), 20.0, 20.0, 200.0, 40.0)],
            vec![
                component(ComponentType::Ui(UiKind::Container), 0.0, 300.0, 20.0, 50.0),
                component(ComponentType::Ui(UiKind::Container), 200.0, 300.0, 20.0, 50.0),
            ],
            vec![
                component(ComponentType::Ui(UiKind::Container), 0.0, 500.0, 20.0, 50.0),
                component(ComponentType::Ui(UiKind::Container), 21.0, 500.0, 20.0, 50.0),
            ],
        ];
        let groups = apply_layout_rules(rows, canvas(), &layout, &RuleConfig::default());
        for group in &groups[1..] {
            assert!(group.spacing >= 8.0 && group.spacing <= 48.0, "{}", group.spacing);
        }
    }
}
