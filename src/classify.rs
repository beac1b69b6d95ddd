use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::{ClassifierConfig, LayoutConfig};
use crate::ir::{
    Annotation, ComponentType, DetectedComponent, Observation, Rect, Size, SketchedPattern, UiKind,
};
use crate::patterns::best_pattern_for;

static KEYWORD_RULES: Lazy<Vec<(Regex, UiKind)>> = Lazy::new(|| {
    [
        (r"(?i)\b(search|find)\b", UiKind::SearchBar),
        (r"(?i)\b(remember me|i agree|accept|subscribe)\b", UiKind::Checkbox),
        (
            r"(?i)\b(submit|log ?in|sign ?in|sign ?up|register|save|cancel|ok|continue|next|back|buy|send|go|add|delete)\b",
            UiKind::Button,
        ),
        (
            r"(?i)\b(e-?mail|password|user ?name|name|phone|address|city|zip)\b",
            UiKind::TextField,
        ),
        (r"(?i)\b(message|comments?|description|notes?|bio|feedback)\b", UiKind::TextArea),
        (r"(?i)\b(select|choose|dropdown|pick)\b", UiKind::Dropdown),
        (r"(?i)\b(menu)\b", UiKind::Menu),
        (r"(?i)\b(home|nav|navigation)\b", UiKind::NavigationBar),
        (r"(?i)\b(photo|image|picture|logo|img)\b", UiKind::Image),
        (r"(?i)\b(avatar|profile pic)\b", UiKind::Avatar),
        (r"(?i)\b(learn more|forgot|read more|link)\b", UiKind::Link),
        (r"(?i)\b(title|heading|welcome)\b", UiKind::Heading),
    ]
    .into_iter()
    .map(|(pattern, kind)| (Regex::new(pattern).unwrap(), kind))
    .collect()
});

/// Decides one type and label per rectangle. Rectangles are numbered in reading order
/// (top edge, then left edge), so ids and default labels are stable for identical input.
pub fn classify_components(
    observations: &[Observation],
    annotations: &[Annotation],
    patterns: &[SketchedPattern],
    canvas: Size,
    config: &ClassifierConfig,
    layout: &LayoutConfig,
) -> Vec<DetectedComponent> {
    let mut ordered: Vec<Rect> = observations.iter().map(|obs| obs.rect).collect();
    ordered.sort_by(|a, b| {
        a.min_y()
            .total_cmp(&b.min_y())
            .then_with(|| a.min_x().total_cmp(&b.min_x()))
    });

    let owners = assign_annotations(&ordered, annotations, config.annotation_overlap);
    let mut counts: BTreeMap<ComponentType, usize> = BTreeMap::new();
    let mut components = Vec::with_capacity(ordered.len());

    for (idx, rect) in ordered.iter().enumerate() {
        let text = annotation_text(idx, annotations, &owners);
        let kind = if let Some(pattern) =
            best_pattern_for(rect, patterns, layout.alignment_tolerance)
        {
            ComponentType::Pattern(pattern.kind)
        } else if let Some(text) = text.as_deref() {
            ComponentType::Ui(classify_annotated(text, rect, canvas, config))
        } else {
            ComponentType::Ui(classify_geometry(rect, canvas, config))
        };

        let count = counts.entry(kind).or_insert(0);
        *count += 1;
        let label = text.unwrap_or_else(|| format!("{} {}", kind.display_name(), count));
        components.push(DetectedComponent {
            id: format!("component-{}", idx + 1),
            rect: *rect,
            kind,
            label,
        });
    }

    tracing::debug!(count = components.len(), "classified components");
    components
}

/// Maps each annotation to the smallest rectangle it substantially overlaps, so text inside
/// a button labels the button rather than the card around it.
fn assign_annotations(
    rects: &[Rect],
    annotations: &[Annotation],
    min_overlap: f32,
) -> Vec<Option<usize>> {
    annotations
        .iter()
        .map(|annotation| {
            let area = annotation.position.area();
            if area <= 0.0 {
                return None;
            }
            rects
                .iter()
                .enumerate()
                .filter(|(_, rect)| {
                    rect.intersection_area(&annotation.position) / area >= min_overlap
                })
                .fold(None, |best: Option<(usize, f32)>, (idx, rect)| match best {
                    Some((_, best_area)) if best_area <= rect.area() => best,
                    _ => Some((idx, rect.area())),
                })
                .map(|(idx, _)| idx)
        })
        .collect()
}

fn annotation_text(
    idx: usize,
    annotations: &[Annotation],
    owners: &[Option<usize>],
) -> Option<String> {
    let mut owned: Vec<&Annotation> = annotations
        .iter()
        .zip(owners)
        .filter(|(_, owner)| **owner == Some(idx))
        .map(|(annotation, _)| annotation)
        .collect();
    if owned.is_empty() {
        return None;
    }
    owned.sort_by(|a, b| {
        a.position
            .min_y()
            .total_cmp(&b.position.min_y())
            .then_with(|| a.position.min_x().total_cmp(&b.position.min_x()))
    });
    let text = owned
        .iter()
        .map(|annotation| annotation.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    Some(text)
}

/// Keyword rules first; otherwise geometry, leaning toward a text-bearing type when the shape
/// alone says nothing specific.
pub fn classify_annotated(
    text: &str,
    rect: &Rect,
    canvas: Size,
    config: &ClassifierConfig,
) -> UiKind {
    if let Some((_, kind)) = KEYWORD_RULES.iter().find(|(re, _)| re.is_match(text)) {
        return *kind;
    }
    match classify_geometry(rect, canvas, config) {
        UiKind::Container if rect.height >= config.text_area_min_height => UiKind::TextArea,
        UiKind::Container => UiKind::Label,
        kind => kind,
    }
}

pub fn classify_geometry(rect: &Rect, canvas: Size, config: &ClassifierConfig) -> UiKind {
    if canvas.is_empty() {
        return UiKind::Container;
    }
    let width = rect.width / canvas.width;
    let height = rect.height / canvas.height;
    let aspect = rect.aspect_ratio();

    if width >= config.bar_min_width && height <= config.bar_max_height {
        if rect.min_y() <= canvas.height * config.top_band {
            return UiKind::NavigationBar;
        }
        if rect.max_y() >= canvas.height * config.bottom_band {
            return UiKind::TabBar;
        }
    }
    if height <= config.divider_max_height && aspect >= 10.0 {
        return UiKind::Divider;
    }
    if aspect >= config.progress_min_aspect && height <= config.progress_max_height {
        return UiKind::ProgressBar;
    }

    let longest = rect.width.max(rect.height);
    if (aspect - 1.0).abs() <= config.square_tolerance {
        if longest <= canvas.shorter_side() * config.icon_max_side {
            return UiKind::Icon;
        }
        if longest <= canvas.shorter_side() * config.image_max_side {
            return UiKind::Image;
        }
    }

    let (min_control, max_control) = config.control_height;
    if height >= min_control && height <= max_control {
        if aspect >= config.field_min_aspect {
            return UiKind::TextField;
        }
        let (min_button, max_button) = config.button_aspect;
        if aspect >= min_button && aspect < max_button {
            return UiKind::Button;
        }
    }

    if width >= config.card_min_width && height >= config.card_min_height {
        return UiKind::Card;
    }
    if aspect <= config.list_max_aspect && height >= config.list_min_height {
        return UiKind::List;
    }
    UiKind::Container
}
