use serde::{Deserialize, Serialize};
use std::path::Path;

/// Layout options supplied once per interpretation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub enabled: bool,
    pub container_padding: f32,
    pub component_gap: f32,
    pub section_gap: f32,
    pub alignment_tolerance: f32,
    pub responsive_grid: bool,
    pub max_content_width: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            container_padding: 16.0,
            component_gap: 12.0,
            section_gap: 24.0,
            alignment_tolerance: 20.0,
            responsive_grid: true,
            max_content_width: 1200.0,
        }
    }
}

impl LayoutConfig {
    pub fn compact() -> Self {
        Self {
            container_padding: 8.0,
            component_gap: 8.0,
            section_gap: 16.0,
            alignment_tolerance: 15.0,
            max_content_width: 960.0,
            ..Self::default()
        }
    }

    pub fn spacious() -> Self {
        Self {
            container_padding: 32.0,
            component_gap: 20.0,
            section_gap: 40.0,
            alignment_tolerance: 25.0,
            max_content_width: 1440.0,
            ..Self::default()
        }
    }

    /// Grouping is skipped; every component becomes its own standalone group.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            container_padding: 0.0,
            component_gap: 0.0,
            section_gap: 0.0,
            alignment_tolerance: 0.0,
            responsive_grid: false,
            max_content_width: 0.0,
        }
    }

    pub fn from_preset(name: &str) -> Option<Self> {
        match name {
            "default" => Some(Self::default()),
            "compact" => Some(Self::compact()),
            "spacious" => Some(Self::spacious()),
            "disabled" | "none" => Some(Self::disabled()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DetectionConfig {
    /// Minimum clamped side, in pixels, for touch ("no pencil") input.
    pub high_precision_min_size: f32,
    /// Minimum clamped side, in pixels, for stylus input.
    pub lenient_min_size: f32,
    /// Per-task deadline for detector work. `None` waits for every task.
    pub task_timeout_ms: Option<u64>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            high_precision_min_size: 20.0,
            lenient_min_size: 10.0,
            task_timeout_ms: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DedupConfig {
    pub overlap_ratio: f32,
    /// Fraction of canvas width.
    pub center_tolerance: f32,
    /// Fraction of the shorter canvas side.
    pub size_tolerance: f32,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            overlap_ratio: 0.8,
            center_tolerance: 0.02,
            size_tolerance: 0.05,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PatternConfig {
    pub hamburger_min_aspect: f32,
    pub hamburger_max_height: f32,
    pub hamburger_discount: f32,
    pub form_field_aspect: (f32, f32),
    pub form_field_height: (f32, f32),
    pub form_field_discount: f32,
    pub text_line_min_aspect: f32,
    pub text_line_max_height: f32,
    pub text_line_discount: f32,
    /// Luma below this value counts as ink.
    pub ink_threshold: u8,
    pub placeholder_min_side: f32,
    /// Fraction trimmed from each side before sampling, so the outline is ignored.
    pub placeholder_inset: f32,
    /// Interiors denser than this are filled shapes, not crossed boxes.
    pub placeholder_max_fill: f32,
    pub diagonal_samples: usize,
    pub diagonal_coverage: f32,
    pub checkbox_aspect_tolerance: f32,
    pub checkbox_max_side: f32,
    pub checkbox_min_ink: f32,
    pub checkbox_max_ink: f32,
    pub checkbox_inset: f32,
    pub checkbox_discount: f32,
    pub card_min_width: f32,
    pub card_min_height: f32,
    pub card_inset: f32,
    pub card_min_elements: usize,
    pub card_max_confidence: f32,
    pub min_blob_pixels: usize,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            hamburger_min_aspect: 3.0,
            hamburger_max_height: 0.05,
            hamburger_discount: 0.8,
            form_field_aspect: (2.0, 6.0),
            form_field_height: (0.03, 0.15),
            form_field_discount: 0.7,
            text_line_min_aspect: 4.0,
            text_line_max_height: 0.08,
            text_line_discount: 0.6,
            ink_threshold: 128,
            placeholder_min_side: 0.08,
            placeholder_inset: 0.1,
            placeholder_max_fill: 0.5,
            diagonal_samples: 32,
            diagonal_coverage: 0.6,
            checkbox_aspect_tolerance: 0.3,
            checkbox_max_side: 0.1,
            checkbox_min_ink: 0.04,
            checkbox_max_ink: 0.6,
            checkbox_inset: 0.2,
            checkbox_discount: 0.9,
            card_min_width: 0.2,
            card_min_height: 0.15,
            card_inset: 0.08,
            card_min_elements: 2,
            card_max_confidence: 0.9,
            min_blob_pixels: 12,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClassifierConfig {
    /// Fraction of the annotation box that must fall inside the rectangle.
    pub annotation_overlap: f32,
    /// Height, in pixels, above which annotated boxes read as multi-line text.
    pub text_area_min_height: f32,
    pub bar_min_width: f32,
    pub bar_max_height: f32,
    pub top_band: f32,
    pub bottom_band: f32,
    pub divider_max_height: f32,
    pub icon_max_side: f32,
    pub image_max_side: f32,
    pub square_tolerance: f32,
    pub button_aspect: (f32, f32),
    pub control_height: (f32, f32),
    pub field_min_aspect: f32,
    pub progress_min_aspect: f32,
    pub progress_max_height: f32,
    pub card_min_width: f32,
    pub card_min_height: f32,
    pub list_max_aspect: f32,
    pub list_min_height: f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            annotation_overlap: 0.5,
            text_area_min_height: 60.0,
            bar_min_width: 0.8,
            bar_max_height: 0.12,
            top_band: 0.15,
            bottom_band: 0.85,
            divider_max_height: 0.015,
            icon_max_side: 0.08,
            image_max_side: 0.35,
            square_tolerance: 0.25,
            button_aspect: (1.5, 6.0),
            control_height: (0.03, 0.12),
            field_min_aspect: 6.0,
            progress_min_aspect: 8.0,
            progress_max_height: 0.03,
            card_min_width: 0.4,
            card_min_height: 0.25,
            list_max_aspect: 0.6,
            list_min_height: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RuleConfig {
    pub header_band: f32,
    pub footer_band: f32,
    pub hero_band: (f32, f32),
    pub hero_min_width: f32,
    pub row_spread_ratio: f32,
    pub grid_min_members: usize,
    pub grid_balance: f32,
    pub center_variance: f32,
    pub min_spacing: f32,
    pub max_spacing: f32,
    pub default_spacing: f32,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            header_band: 0.25,
            footer_band: 0.75,
            hero_band: (0.2, 0.7),
            hero_min_width: 0.6,
            row_spread_ratio: 1.5,
            grid_min_members: 4,
            grid_balance: 0.5,
            center_variance: 100.0,
            min_spacing: 8.0,
            max_spacing: 48.0,
            default_spacing: 16.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderConfig {
    pub breakpoint: f32,
    pub grid_min_column: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            breakpoint: 768.0,
            grid_min_column: 160.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub layout: LayoutConfig,
    pub detection: DetectionConfig,
    pub dedup: DedupConfig,
    pub patterns: PatternConfig,
    pub classifier: ClassifierConfig,
    pub rules: RuleConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    preset: Option<String>,
    layout: Option<LayoutConfigFile>,
    detection: Option<DetectionConfig>,
    dedup: Option<DedupConfig>,
    patterns: Option<PatternConfig>,
    classifier: Option<ClassifierConfig>,
    rules: Option<RuleConfig>,
    render: Option<RenderConfig>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    enabled: Option<bool>,
    container_padding: Option<f32>,
    component_gap: Option<f32>,
    section_gap: Option<f32>,
    alignment_tolerance: Option<f32>,
    responsive_grid: Option<bool>,
    max_content_width: Option<f32>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parses a config document. Strict JSON is tried first; hand-written files with comments or
/// trailing commas fall back to JSON5.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = match serde_json::from_str(contents) {
        Ok(parsed) => parsed,
        Err(json_err) => json5::from_str(contents)
            .map_err(|_| anyhow::anyhow!("invalid config: {json_err}"))?,
    };

    let mut config = Config::default();
    if let Some(name) = parsed.preset.as_deref() {
        config.layout = LayoutConfig::from_preset(name)
            .ok_or_else(|| anyhow::anyhow!("unknown layout preset '{name}'"))?;
    }

    if let Some(layout) = parsed.layout {
        if let Some(v) = layout.enabled {
            config.layout.enabled = v;
        }
        if let Some(v) = layout.container_padding {
            config.layout.container_padding = v;
        }
        if let Some(v) = layout.component_gap {
            config.layout.component_gap = v;
        }
        if let Some(v) = layout.section_gap {
            config.layout.section_gap = v;
        }
        if let Some(v) = layout.alignment_tolerance {
            config.layout.alignment_tolerance = v;
        }
        if let Some(v) = layout.responsive_grid {
            config.layout.responsive_grid = v;
        }
        if let Some(v) = layout.max_content_width {
            config.layout.max_content_width = v;
        }
    }

    if let Some(v) = parsed.detection {
        config.detection = v;
    }
    if let Some(v) = parsed.dedup {
        config.dedup = v;
    }
    if let Some(v) = parsed.patterns {
        config.patterns = v;
    }
    if let Some(v) = parsed.classifier {
        config.classifier = v;
    }
    if let Some(v) = parsed.rules {
        config.rules = v;
    }
    if let Some(v) = parsed.render {
        config.render = v;
    }

    let tolerance = config.layout.alignment_tolerance;
    if !tolerance.is_finite() || tolerance < 0.0 {
        anyhow::bail!("alignmentTolerance must be a finite, non-negative number, got {tolerance}");
    }
    Ok(config)
}
