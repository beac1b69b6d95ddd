use crate::ir::Size;
use crate::layout::LayoutGroup;
use crate::pipeline::Interpretation;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub width: f32,
    pub height: f32,
    pub component_count: usize,
    pub pattern_count: usize,
    pub groups: Vec<GroupDump>,
    pub stylesheet: String,
    pub description: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupDump {
    pub id: String,
    pub kind: String,
    pub direction: String,
    pub alignment: String,
    pub spacing: f32,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub components: Vec<ComponentDump>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDump {
    pub id: String,
    pub kind: String,
    pub label: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl GroupDump {
    fn from_group(group: &LayoutGroup) -> Self {
        let components = group
            .components
            .iter()
            .map(|component| ComponentDump {
                id: component.id.clone(),
                kind: component.kind.slug().to_string(),
                label: component.label.clone(),
                x: component.rect.x,
                y: component.rect.y,
                width: component.rect.width,
                height: component.rect.height,
            })
            .collect();
        GroupDump {
            id: group.id.clone(),
            kind: group.kind.class_name().to_string(),
            direction: group.direction.name().to_string(),
            alignment: group.alignment.name().to_string(),
            spacing: group.spacing,
            x: group.bounding_rect.x,
            y: group.bounding_rect.y,
            width: group.bounding_rect.width,
            height: group.bounding_rect.height,
            components,
        }
    }
}

impl LayoutDump {
    pub fn from_interpretation(interpretation: &Interpretation, canvas: Size) -> Self {
        LayoutDump {
            width: canvas.width,
            height: canvas.height,
            component_count: interpretation.components.len(),
            pattern_count: interpretation.patterns.len(),
            groups: interpretation.groups.iter().map(GroupDump::from_group).collect(),
            stylesheet: interpretation.stylesheet.clone(),
            description: interpretation.description.clone(),
        }
    }
}

pub fn write_layout_dump(
    path: &Path,
    interpretation: &Interpretation,
    canvas: Size,
) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_interpretation(interpretation, canvas);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{ComponentType, DetectedComponent, Rect, UiKind};
    use crate::layout::{Alignment, FlexDirection, GroupKind};

    #[test]
    fn dump_flattens_groups() {
        let component = DetectedComponent {
            id: "component-1".to_string(),
            rect: Rect::new(10.0, 20.0, 80.0, 40.0),
            kind: ComponentType::Ui(UiKind::TextField),
            label: "Email".to_string(),
        };
        let interpretation = Interpretation {
            components: vec![component.clone()],
            groups: vec![LayoutGroup {
                id: "group-1".to_string(),
                kind: GroupKind::FormSection,
                components: vec![component],
                direction: FlexDirection::Column,
                alignment: Alignment::Start,
                spacing: 12.0,
                bounding_rect: Rect::new(10.0, 20.0, 80.0, 40.0),
            }],
            ..Interpretation::default()
        };
        let dump = LayoutDump::from_interpretation(&interpretation, Size::new(400.0, 800.0));
        let value = serde_json::to_value(&dump).unwrap();
        assert_eq!(value["componentCount"], 1);
        assert_eq!(value["groups"][0]["kind"], "layout-form");
        assert_eq!(value["groups"][0]["direction"], "column");
        assert_eq!(value["groups"][0]["components"][0]["kind"], "text-field");
        assert_eq!(value["groups"][0]["components"][0]["label"], "Email");
    }
}
