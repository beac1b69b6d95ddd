use serde::{Deserialize, Serialize};

use crate::ir::{DetectedComponent, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GroupKind {
    Header,
    Navigation,
    HeroSection,
    CardGrid,
    FormSection,
    ButtonGroup,
    Footer,
    Standalone,
}

impl GroupKind {
    pub const ALL: [GroupKind; 8] = [
        GroupKind::Header,
        GroupKind::Navigation,
        GroupKind::HeroSection,
        GroupKind::CardGrid,
        GroupKind::FormSection,
        GroupKind::ButtonGroup,
        GroupKind::Footer,
        GroupKind::Standalone,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Header => "Header",
            Self::Navigation => "Navigation",
            Self::HeroSection => "Hero Section",
            Self::CardGrid => "Card Grid",
            Self::FormSection => "Form Section",
            Self::ButtonGroup => "Button Group",
            Self::Footer => "Footer",
            Self::Standalone => "Standalone",
        }
    }

    pub fn class_name(self) -> &'static str {
        match self {
            Self::Header => "layout-header",
            Self::Navigation => "layout-navigation",
            Self::HeroSection => "layout-hero",
            Self::CardGrid => "layout-card-grid",
            Self::FormSection => "layout-form",
            Self::ButtonGroup => "layout-button-group",
            Self::Footer => "layout-footer",
            Self::Standalone => "layout-standalone",
        }
    }

    pub fn html_tag(self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Navigation => "nav",
            Self::FormSection => "form",
            Self::Footer => "footer",
            Self::HeroSection | Self::CardGrid => "section",
            Self::ButtonGroup | Self::Standalone => "div",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FlexDirection {
    Row,
    Column,
    Grid,
}

impl FlexDirection {
    pub fn name(self) -> &'static str {
        match self {
            Self::Row => "row",
            Self::Column => "column",
            Self::Grid => "grid",
        }
    }

    pub fn class_name(self) -> &'static str {
        match self {
            Self::Row => "layout-row",
            Self::Column => "layout-column",
            Self::Grid => "layout-grid",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Alignment {
    Start,
    Center,
    End,
    SpaceBetween,
    SpaceAround,
}

impl Alignment {
    pub fn name(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Center => "center",
            Self::End => "end",
            Self::SpaceBetween => "space-between",
            Self::SpaceAround => "space-around",
        }
    }

    pub fn justify_content(self) -> &'static str {
        match self {
            Self::Start => "flex-start",
            Self::Center => "center",
            Self::End => "flex-end",
            Self::SpaceBetween => "space-between",
            Self::SpaceAround => "space-around",
        }
    }

    pub fn align_items(self) -> &'static str {
        match self {
            Self::Start => "flex-start",
            Self::End => "flex-end",
            Self::Center | Self::SpaceBetween | Self::SpaceAround => "center",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutGroup {
    pub id: String,
    pub kind: GroupKind,
    pub components: Vec<DetectedComponent>,
    pub direction: FlexDirection,
    pub alignment: Alignment,
    pub spacing: f32,
    pub bounding_rect: Rect,
}

impl LayoutGroup {
    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

pub fn bounding_rect(components: &[DetectedComponent]) -> Rect {
    let mut iter = components.iter();
    let Some(first) = iter.next() else {
        return Rect::default();
    };
    iter.fold(first.rect, |acc, component| acc.union(&component.rect))
}
