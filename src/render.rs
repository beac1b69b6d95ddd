use crate::config::{LayoutConfig, RenderConfig};
use crate::ir::Size;
use crate::layout::{GroupKind, LayoutGroup};
use std::collections::BTreeSet;
use std::fmt::Write as _;

/// Stylesheet fragment for the grouped layout. Class names are fixed per group type and
/// direction; each group also gets an id rule carrying its alignment and gap.
pub fn render_stylesheet(
    groups: &[LayoutGroup],
    layout: &LayoutConfig,
    render: &RenderConfig,
) -> String {
    let mut css = String::new();

    css.push_str(".sketch-container {\n");
    css.push_str("  display: flex;\n  flex-direction: column;\n");
    let _ = writeln!(css, "  gap: {}px;", layout.section_gap);
    let _ = writeln!(css, "  max-width: {}px;", layout.max_content_width);
    css.push_str("  margin: 0 auto;\n");
    let _ = writeln!(css, "  padding: {}px;", layout.container_padding);
    css.push_str("  box-sizing: border-box;\n}\n");

    css.push_str(".layout-row {\n  display: flex;\n  flex-direction: row;\n}\n");
    css.push_str(".layout-column {\n  display: flex;\n  flex-direction: column;\n}\n");
    let _ = writeln!(
        css,
        ".layout-grid {{\n  display: grid;\n  grid-template-columns: repeat(auto-fill, minmax({}px, 1fr));\n}}",
        render.grid_min_column
    );

    let present: BTreeSet<GroupKind> = groups.iter().map(|group| group.kind).collect();
    for kind in GroupKind::ALL.iter().filter(|kind| present.contains(kind)) {
        let _ = writeln!(
            css,
            ".{} {{\n{}}}",
            kind.class_name(),
            type_declarations(*kind, layout)
        );
    }

    for group in groups {
        let _ = writeln!(
            css,
            "#{} {{\n  justify-content: {};\n  align-items: {};\n  gap: {}px;\n}}",
            group.id,
            group.alignment.justify_content(),
            group.alignment.align_items(),
            group.spacing
        );
    }

    if layout.responsive_grid {
        let _ = writeln!(css, "@media (max-width: {}px) {{", render.breakpoint);
        css.push_str("  .layout-row {\n    flex-direction: column;\n  }\n");
        css.push_str("  .layout-grid {\n    grid-template-columns: 1fr;\n  }\n");
        css.push_str("}\n");
    }

    css
}

fn type_declarations(kind: GroupKind, layout: &LayoutConfig) -> String {
    match kind {
        GroupKind::Header => "  width: 100%;\n  align-items: center;\n".to_string(),
        GroupKind::Navigation => "  width: 100%;\n  flex-wrap: nowrap;\n".to_string(),
        GroupKind::HeroSection => format!(
            "  width: 100%;\n  padding: {}px 0;\n  text-align: center;\n",
            layout.section_gap
        ),
        GroupKind::CardGrid => "  width: 100%;\n  align-content: start;\n".to_string(),
        GroupKind::FormSection => "  width: 100%;\n  max-width: 480px;\n".to_string(),
        GroupKind::ButtonGroup => "  flex-wrap: wrap;\n".to_string(),
        GroupKind::Footer => format!("  width: 100%;\n  margin-top: {}px;\n", layout.section_gap),
        GroupKind::Standalone => "  position: relative;\n".to_string(),
    }
}

/// Plain-text walk of the groups, top to bottom, for prompt construction.
pub fn render_description(groups: &[LayoutGroup], canvas: Size, layout: &LayoutConfig) -> String {
    let mut out = String::new();
    if groups.is_empty() {
        let _ = writeln!(
            out,
            "Layout: no sections detected on a {}x{} canvas",
            canvas.width, canvas.height
        );
        return out;
    }

    let _ = writeln!(
        out,
        "Layout: {} section{} on a {}x{} canvas",
        groups.len(),
        if groups.len() == 1 { "" } else { "s" },
        canvas.width,
        canvas.height
    );
    let _ = writeln!(
        out,
        "Container: max width {}px, padding {}px, section gap {}px",
        layout.max_content_width, layout.container_padding, layout.section_gap
    );

    for (idx, group) in groups.iter().enumerate() {
        out.push('\n');
        let _ = writeln!(
            out,
            "Section {} ({}): {}",
            idx + 1,
            group.id,
            group.kind.display_name()
        );
        let _ = writeln!(
            out,
            "  direction: {}, alignment: {}, spacing: {}px",
            group.direction.name(),
            group.alignment.name(),
            group.spacing
        );
        out.push_str("  components:\n");
        for component in &group.components {
            let _ = writeln!(
                out,
                "    - {} \"{}\"",
                component.kind.display_name(),
                component.label
            );
        }
    }
    out
}

/// Indented HTML skeleton using the stylesheet's class names.
pub fn render_outline(groups: &[LayoutGroup]) -> String {
    let mut html = String::from("<div class=\"sketch-container\">\n");
    for group in groups {
        let tag = group.kind.html_tag();
        let _ = writeln!(
            html,
            "  <{tag} id=\"{}\" class=\"{} {}\">",
            escape_xml(&group.id),
            group.kind.class_name(),
            group.direction.class_name()
        );
        for component in &group.components {
            let slug = component.kind.slug();
            let _ = writeln!(
                html,
                "    <div id=\"{}\" class=\"component component-{slug}\" data-kind=\"{slug}\">{}</div>",
                escape_xml(&component.id),
                escape_xml(&component.label)
            );
        }
        let _ = writeln!(html, "  </{tag}>");
    }
    html.push_str("</div>\n");
    html
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{ComponentType, DetectedComponent, Rect, UiKind};
    use crate::layout::{Alignment, FlexDirection, LayoutGroup};

    fn group(id: usize, kind: GroupKind, direction: FlexDirection, labels: &[&str]) -> LayoutGroup {
        let components: Vec<DetectedComponent> = labels
            .iter()
            .enumerate()
            .map(|(idx, label)| DetectedComponent {
                id: format!("component-{id}-{idx}"),
                rect: Rect::new(idx as f32 * 100.0, id as f32 * 100.0, 80.0, 40.0),
                kind: ComponentType::Ui(UiKind::Button),
                label: label.to_string(),
            })
            .collect();
        LayoutGroup {
            id: format!("group-{id}"),
            kind,
            bounding_rect: crate::layout::bounding_rect(&components),
            components,
            direction,
            alignment: Alignment::Center,
            spacing: 12.0,
        }
    }

    fn sample() -> Vec<LayoutGroup> {
        vec![
            group(1, GroupKind::Header, FlexDirection::Row, &["Menu"]),
            group(2, GroupKind::ButtonGroup, FlexDirection::Row, &["Save", "Cancel"]),
        ]
    }

    #[test]
    fn stylesheet_has_container_types_and_group_rules() {
        let css = render_stylesheet(&sample(), &LayoutConfig::default(), &RenderConfig::default());
        assert!(css.contains(".sketch-container {"));
        assert!(css.contains("max-width: 1200px;"));
        assert!(css.contains(".layout-row {"));
        assert!(css.contains(".layout-grid {"));
        assert!(css.contains(".layout-header {"));
        assert!(css.contains(".layout-button-group {"));
        assert!(!css.contains(".layout-footer {"));
        assert!(css.contains("#group-1 {"));
        assert!(css.contains("#group-2 {\n  justify-content: center;"));
        assert_eq!(css.matches("@media (max-width: 768px)").count(), 1);
    }

    #[test]
    fn stylesheet_skips_breakpoint_without_responsive_grid() {
        let layout = LayoutConfig {
            responsive_grid: false,
            ..LayoutConfig::default()
        };
        let css = render_stylesheet(&sample(), &layout, &RenderConfig::default());
        assert!(!css.contains("@media"));
    }

    #[test]
    fn description_lists_sections_in_order() {
        let text = render_description(
            &sample(),
            Size::new(400.0, 800.0),
            &LayoutConfig::default(),
        );
        assert!(text.starts_with("Layout: 2 sections on a 400x800 canvas\n"));
        let header = text.find("Section 1 (group-1): Header").unwrap();
        let buttons = text.find("Section 2 (group-2): Button Group").unwrap();
        assert!(header < buttons);
        assert!(text.contains("direction: row, alignment: center, spacing: 12px"));
        assert!(text.contains("    - Button \"Cancel\""));
    }

    #[test]
    fn description_of_nothing() {
        let text = render_description(&[], Size::new(320.0, 480.0), &LayoutConfig::default());
        assert_eq!(text, "Layout: no sections detected on a 320x480 canvas\n");
    }

    #[test]
    fn outputs_are_reproducible() {
        let groups = sample();
        let layout = LayoutConfig::default();
        let render = RenderConfig::default();
        assert_eq!(
            render_stylesheet(&groups, &layout, &render),
            render_stylesheet(&groups.clone(), &layout, &render)
        );
        assert_eq!(render_outline(&groups), render_outline(&groups.clone()));
    }

    #[test]
    fn outline_escapes_labels() {
        let groups = vec![group(1, GroupKind::FormSection, FlexDirection::Column, &["<b>&go"])];
        let html = render_outline(&groups);
        assert!(html.contains("<form id=\"group-1\" class=\"layout-form layout-column\">"));
        assert!(html.contains(">&lt;b&gt;&amp;go</div>"));
        assert!(html.contains("data-kind=\"button\""));
        assert!(html.ends_with("</div>\n"));
    }
}
