use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    pub fn shorter_side(&self) -> f32 {
        self.width.min(self.height)
    }
}

/// Axis-aligned rectangle. Canvas-space rectangles use a top-left origin; detector-space
/// rectangles are normalized to [0, 1] with a bottom-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn min_x(&self) -> f32 {
        self.x
    }

    pub fn max_x(&self) -> f32 {
        self.x + self.width
    }

    pub fn min_y(&self) -> f32 {
        self.y
    }

    pub fn max_y(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    pub fn aspect_ratio(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            0.0
        }
    }

    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x1 = self.min_x().max(other.min_x());
        let y1 = self.min_y().max(other.min_y());
        let x2 = self.max_x().min(other.max_x());
        let y2 = self.max_y().min(other.max_y());
        if x2 <= x1 || y2 <= y1 {
            return None;
        }
        Some(Rect::new(x1, y1, x2 - x1, y2 - y1))
    }

    pub fn intersection_area(&self, other: &Rect) -> f32 {
        self.intersection(other).map(|r| r.area()).unwrap_or(0.0)
    }

    pub fn contains(&self, other: &Rect) -> bool {
        other.min_x() >= self.min_x()
            && other.max_x() <= self.max_x()
            && other.min_y() >= self.min_y()
            && other.max_y() <= self.max_y()
    }

    pub fn union(&self, other: &Rect) -> Rect {
        let x1 = self.min_x().min(other.min_x());
        let y1 = self.min_y().min(other.min_y());
        let x2 = self.max_x().max(other.max_x());
        let y2 = self.max_y().max(other.max_y());
        Rect::new(x1, y1, x2 - x1, y2 - y1)
    }

    /// Every edge of `other` lies within `tolerance` of the matching edge of `self`.
    pub fn matches_within(&self, other: &Rect, tolerance: f32) -> bool {
        (self.min_x() - other.min_x()).abs() <= tolerance
            && (self.min_y() - other.min_y()).abs() <= tolerance
            && (self.max_x() - other.max_x()).abs() <= tolerance
            && (self.max_y() - other.max_y()).abs() <= tolerance
    }

    pub fn inset(&self, fraction: f32) -> Rect {
        let dx = self.width * fraction;
        let dy = self.height * fraction;
        Rect::new(
            self.x + dx,
            self.y + dy,
            (self.width - dx * 2.0).max(0.0),
            (self.height - dy * 2.0).max(0.0),
        )
    }
}

/// Rectangle as reported by a shape detector, in normalized detector space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawObservation {
    pub rect: Rect,
    pub confidence: f32,
}

/// Rectangle after normalization into canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub rect: Rect,
    pub confidence: f32,
}

/// Text region as reported by a text detector, in normalized detector space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedText {
    pub text: String,
    pub rect: Rect,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub text: String,
    pub position: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PatternKind {
    HamburgerMenu,
    ImagePlaceholder,
    FormField,
    Checkbox,
    RadioButton,
    IconSymbol,
    CardWithElements,
    TextLines,
    DropdownArrow,
    ButtonIcon,
    ProgressBar,
    TabIndicator,
}

const PATTERN_NAMES: [(PatternKind, &str, &str); 12] = [
    (PatternKind::HamburgerMenu, "Menu Icon", "hamburger-menu"),
    (PatternKind::ImagePlaceholder, "Image Placeholder", "image-placeholder"),
    (PatternKind::FormField, "Form Field", "form-field"),
    (PatternKind::Checkbox, "Checkbox", "checkbox"),
    (PatternKind::RadioButton, "Radio Button", "radio-button"),
    (PatternKind::IconSymbol, "Icon", "icon-symbol"),
    (PatternKind::CardWithElements, "Card", "card-with-elements"),
    (PatternKind::TextLines, "Text Block", "text-lines"),
    (PatternKind::DropdownArrow, "Dropdown", "dropdown-arrow"),
    (PatternKind::ButtonIcon, "Icon Button", "button-icon"),
    (PatternKind::ProgressBar, "Progress Bar", "progress-bar"),
    (PatternKind::TabIndicator, "Tab Indicator", "tab-indicator"),
];

impl PatternKind {
    pub fn display_name(self) -> &'static str {
        lookup(&PATTERN_NAMES, self).0
    }

    pub fn slug(self) -> &'static str {
        lookup(&PATTERN_NAMES, self).1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UiKind {
    Button,
    TextField,
    TextArea,
    Label,
    Heading,
    Link,
    Image,
    Icon,
    Avatar,
    Checkbox,
    RadioButton,
    Toggle,
    Slider,
    Dropdown,
    SearchBar,
    SegmentedControl,
    NavigationBar,
    TabBar,
    Toolbar,
    Menu,
    Card,
    List,
    Table,
    ProgressBar,
    Divider,
    Container,
}

const UI_NAMES: [(UiKind, &str, &str); 26] = [
    (UiKind::Button, "Button", "button"),
    (UiKind::TextField, "Text Field", "text-field"),
    (UiKind::TextArea, "Text Area", "text-area"),
    (UiKind::Label, "Label", "label"),
    (UiKind::Heading, "Heading", "heading"),
    (UiKind::Link, "Link", "link"),
    (UiKind::Image, "Image", "image"),
    (UiKind::Icon, "Icon", "icon"),
    (UiKind::Avatar, "Avatar", "avatar"),
    (UiKind::Checkbox, "Checkbox", "checkbox"),
    (UiKind::RadioButton, "Radio Button", "radio-button"),
    (UiKind::Toggle, "Toggle", "toggle"),
    (UiKind::Slider, "Slider", "slider"),
    (UiKind::Dropdown, "Dropdown", "dropdown"),
    (UiKind::SearchBar, "Search Bar", "search-bar"),
    (UiKind::SegmentedControl, "Segmented Control", "segmented-control"),
    (UiKind::NavigationBar, "Navigation Bar", "navigation-bar"),
    (UiKind::TabBar, "Tab Bar", "tab-bar"),
    (UiKind::Toolbar, "Toolbar", "toolbar"),
    (UiKind::Menu, "Menu", "menu"),
    (UiKind::Card, "Card", "card"),
    (UiKind::List, "List", "list"),
    (UiKind::Table, "Table", "table"),
    (UiKind::ProgressBar, "Progress Bar", "progress-bar"),
    (UiKind::Divider, "Divider", "divider"),
    (UiKind::Container, "Container", "container"),
];

impl UiKind {
    pub fn display_name(self) -> &'static str {
        lookup(&UI_NAMES, self).0
    }

    pub fn slug(self) -> &'static str {
        lookup(&UI_NAMES, self).1
    }
}

fn lookup<K: Copy + PartialEq, const N: usize>(
    table: &[(K, &'static str, &'static str); N],
    key: K,
) -> (&'static str, &'static str) {
    table
        .iter()
        .find(|(k, _, _)| *k == key)
        .map(|(_, name, slug)| (*name, *slug))
        .unwrap_or(("Unknown", "unknown"))
}

/// Type of a detected component: either a member of the UI taxonomy or the raw sketch
/// pattern that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "source", content = "kind", rename_all = "camelCase")]
pub enum ComponentType {
    Ui(UiKind),
    Pattern(PatternKind),
}

impl ComponentType {
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Ui(kind) => kind.display_name(),
            Self::Pattern(kind) => kind.display_name(),
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Self::Ui(kind) => kind.slug(),
            Self::Pattern(kind) => kind.slug(),
        }
    }

    pub fn is_navigation(self) -> bool {
        matches!(
            self,
            Self::Ui(UiKind::NavigationBar | UiKind::TabBar | UiKind::Toolbar | UiKind::Menu)
                | Self::Pattern(PatternKind::HamburgerMenu | PatternKind::TabIndicator)
        )
    }

    pub fn is_form_control(self) -> bool {
        matches!(
            self,
            Self::Ui(
                UiKind::TextField
                    | UiKind::TextArea
                    | UiKind::Checkbox
                    | UiKind::RadioButton
                    | UiKind::Toggle
                    | UiKind::Slider
                    | UiKind::Dropdown
                    | UiKind::SearchBar
                    | UiKind::SegmentedControl
            ) | Self::Pattern(
                PatternKind::FormField
                    | PatternKind::Checkbox
                    | PatternKind::RadioButton
                    | PatternKind::DropdownArrow
            )
        )
    }

    pub fn is_image(self) -> bool {
        matches!(
            self,
            Self::Ui(UiKind::Image | UiKind::Icon | UiKind::Avatar)
                | Self::Pattern(PatternKind::ImagePlaceholder | PatternKind::IconSymbol)
        )
    }

    pub fn is_label(self) -> bool {
        matches!(
            self,
            Self::Ui(UiKind::Label | UiKind::Heading | UiKind::Link)
                | Self::Pattern(PatternKind::TextLines)
        )
    }

    pub fn is_button(self) -> bool {
        matches!(
            self,
            Self::Ui(UiKind::Button) | Self::Pattern(PatternKind::ButtonIcon)
        )
    }
}

impl std::fmt::Display for ComponentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SketchedPattern {
    pub id: String,
    pub kind: PatternKind,
    pub bounding_box: Rect,
    pub confidence: f32,
    pub associated_rect: Option<Rect>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedComponent {
    pub id: String,
    pub rect: Rect,
    pub kind: ComponentType,
    pub label: String,
}
