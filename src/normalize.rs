use crate::config::DetectionConfig;
use crate::detect::InputDevice;
use crate::ir::{Annotation, Observation, RawObservation, RecognizedText, Rect, Size};

/// Converts a normalized detector rectangle (bottom-left origin) into canvas pixels
/// (top-left origin), clamped to the canvas. Returns `None` when nothing remains.
pub fn normalize_rect(rect: &Rect, canvas: Size) -> Option<Rect> {
    if canvas.is_empty() {
        return None;
    }
    let x = rect.x * canvas.width;
    let y = (1.0 - rect.y - rect.height) * canvas.height;
    let pixel = Rect::new(x, y, rect.width * canvas.width, rect.height * canvas.height);
    if !(pixel.width > 0.0 && pixel.height > 0.0) {
        return None;
    }
    let bounds = Rect::new(0.0, 0.0, canvas.width, canvas.height);
    pixel.intersection(&bounds)
}

pub fn min_size_for(device: InputDevice, config: &DetectionConfig) -> f32 {
    match device {
        InputDevice::Touch => config.high_precision_min_size,
        InputDevice::Stylus => config.lenient_min_size,
    }
}

pub fn normalize_observations(
    raw: &[RawObservation],
    canvas: Size,
    min_size: f32,
) -> Vec<Observation> {
    let normalized: Vec<Observation> = raw
        .iter()
        .filter_map(|obs| {
            let rect = normalize_rect(&obs.rect, canvas)?;
            if rect.width < min_size || rect.height < min_size {
                return None;
            }
            Some(Observation {
                rect,
                confidence: obs.confidence,
            })
        })
        .collect();
    tracing::debug!(
        raw = raw.len(),
        kept = normalized.len(),
        min_size,
        "normalized observations"
    );
    normalized
}

pub fn normalize_text(recognized: &[RecognizedText], canvas: Size) -> Vec<Annotation> {
    recognized
        .iter()
        .filter_map(|item| {
            let text = item.text.trim();
            if text.is_empty() {
                return None;
            }
            let position = normalize_rect(&item.rect, canvas)?;
            Some(Annotation {
                text: text.to_string(),
                position,
            })
        })
        .collect()
}
