use std::collections::VecDeque;

use image::GrayImage;
use image::imageops::crop_imm;

use crate::config::{DedupConfig, PatternConfig};
use crate::dedup::{deduplicate_rects, is_near_identical};
use crate::detect::Sketch;
use crate::ir::{Observation, PatternKind, Rect, Size};

use super::Candidate;

pub(super) fn detect_geometric_patterns(
    sketch: &Sketch,
    observations: &[Observation],
    config: &PatternConfig,
    dedup: &DedupConfig,
) -> Vec<Candidate> {
    let canvas = sketch.canvas;
    let mut candidates = Vec::new();

    for (idx, obs) in observations.iter().enumerate() {
        let rect = obs.rect;

        if let Some(pixels) = sketch.pixels.as_ref() {
            if let Some(confidence) = placeholder_confidence(pixels, canvas, obs, config) {
                candidates.push(Candidate::new(PatternKind::ImagePlaceholder, rect, confidence));
            }
            if is_checkbox(pixels, canvas, &rect, config) {
                candidates.push(Candidate::new(
                    PatternKind::Checkbox,
                    rect,
                    obs.confidence * config.checkbox_discount,
                ));
            }
        }

        if rect.width > canvas.width * config.card_min_width
            && rect.height > canvas.height * config.card_min_height
        {
            // A second stroke of the card outline is not an element.
            let inner: Vec<Rect> = observations
                .iter()
                .enumerate()
                .filter(|(other, _)| *other != idx)
                .map(|(_, inner)| inner.rect)
                .filter(|inner| {
                    rect.contains(inner) && !is_near_identical(inner, &rect, canvas, dedup)
                })
                .collect();
            let contained = deduplicate_rects(&inner, canvas, dedup).len();
            let blobs = sketch
                .pixels
                .as_ref()
                .and_then(|pixels| crop_region(pixels, canvas, &rect.inset(config.card_inset)))
                .map(|region| count_ink_blobs(&region, config.ink_threshold, config.min_blob_pixels))
                .unwrap_or(0);
            let elements = contained.max(blobs);
            if elements >= config.card_min_elements {
                let confidence = (0.5 + 0.1 * elements as f32).min(config.card_max_confidence);
                candidates.push(Candidate::new(PatternKind::CardWithElements, rect, confidence));
            }
        }
    }
    candidates
}

/// Both diagonals of the rectangle carry ink: the usual "X in a box" image placeholder.
fn placeholder_confidence(
    pixels: &GrayImage,
    canvas: Size,
    obs: &Observation,
    config: &PatternConfig,
) -> Option<f32> {
    let min_side = canvas.shorter_side() * config.placeholder_min_side;
    if obs.rect.width < min_side || obs.rect.height < min_side {
        return None;
    }
    let region = crop_region(pixels, canvas, &obs.rect.inset(config.placeholder_inset))?;
    if ink_density(&region, config.ink_threshold) > config.placeholder_max_fill {
        return None;
    }
    let falling = diagonal_coverage(&region, false, config);
    let rising = diagonal_coverage(&region, true, config);
    if falling >= config.diagonal_coverage && rising >= config.diagonal_coverage {
        Some(obs.confidence * (falling + rising) / 2.0)
    } else {
        None
    }
}

fn diagonal_coverage(region: &GrayImage, rising: bool, config: &PatternConfig) -> f32 {
    let samples = config.diagonal_samples.max(1);
    let (w, h) = region.dimensions();
    let radius = (w.min(h) / 40).max(1) as i64;
    let mut hits = 0usize;
    for i in 0..samples {
        let t = (i as f32 + 0.5) / samples as f32;
        let x = (t * w as f32) as i64;
        let y = if rising {
            ((1.0 - t) * h as f32) as i64
        } else {
            (t * h as f32) as i64
        };
        if has_ink_near(region, x, y, radius, config.ink_threshold) {
            hits += 1;
        }
    }
    hits as f32 / samples as f32
}

fn has_ink_near(region: &GrayImage, x: i64, y: i64, radius: i64, threshold: u8) -> bool {
    let (w, h) = region.dimensions();
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let px = x + dx;
            let py = y + dy;
            if px < 0 || py < 0 || px >= w as i64 || py >= h as i64 {
                continue;
            }
            if region.get_pixel(px as u32, py as u32)[0] < threshold {
                return true;
            }
        }
    }
    false
}

/// A small near-square with a check or X drawn inside.
fn is_checkbox(pixels: &GrayImage, canvas: Size, rect: &Rect, config: &PatternConfig) -> bool {
    if (rect.aspect_ratio() - 1.0).abs() > config.checkbox_aspect_tolerance {
        return false;
    }
    if rect.width >= canvas.width * config.checkbox_max_side
        || rect.height >= canvas.height * config.checkbox_max_side
    {
        return false;
    }
    let Some(interior) = crop_region(pixels, canvas, &rect.inset(config.checkbox_inset)) else {
        return false;
    };
    let density = ink_density(&interior, config.ink_threshold);
    density >= config.checkbox_min_ink && density <= config.checkbox_max_ink
}

/// Crops the pixels under a canvas-space rectangle, scaling when the image resolution
/// differs from the canvas.
fn crop_region(pixels: &GrayImage, canvas: Size, rect: &Rect) -> Option<GrayImage> {
    if canvas.is_empty() {
        return None;
    }
    let (img_w, img_h) = pixels.dimensions();
    let sx = img_w as f32 / canvas.width;
    let sy = img_h as f32 / canvas.height;
    let x0 = (rect.min_x() * sx).floor().clamp(0.0, img_w as f32) as u32;
    let y0 = (rect.min_y() * sy).floor().clamp(0.0, img_h as f32) as u32;
    let x1 = (rect.max_x() * sx).ceil().clamp(0.0, img_w as f32) as u32;
    let y1 = (rect.max_y() * sy).ceil().clamp(0.0, img_h as f32) as u32;
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some(crop_imm(pixels, x0, y0, x1 - x0, y1 - y0).to_image())
}

/// Fraction of pixels darker than `threshold`.
pub fn ink_density(region: &GrayImage, threshold: u8) -> f32 {
    let total = region.width() as usize * region.height() as usize;
    if total == 0 {
        return 0.0;
    }
    let ink = region.pixels().filter(|p| p[0] < threshold).count();
    ink as f32 / total as f32
}

/// Counts 8-connected ink blobs of at least `min_pixels` pixels.
pub fn count_ink_blobs(region: &GrayImage, threshold: u8, min_pixels: usize) -> usize {
    let (w, h) = region.dimensions();
    let (w, h) = (w as usize, h as usize);
    let mut visited = vec![false; w * h];
    let mut queue = VecDeque::new();
    let mut blobs = 0;

    for start in 0..w * h {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        if region.get_pixel((start % w) as u32, (start / w) as u32)[0] >= threshold {
            continue;
        }
        let mut size = 0usize;
        queue.push_back(start);
        while let Some(idx) = queue.pop_front() {
            size += 1;
            let (x, y) = ((idx % w) as i64, (idx / w) as i64);
            for dy in -1..=1i64 {
                for dx in -1..=1i64 {
                    let (nx, ny) = (x + dx, y + dy);
                    if nx < 0 || ny < 0 || nx >= w as i64 || ny >= h as i64 {
                        continue;
                    }
                    let next = ny as usize * w + nx as usize;
                    if visited[next] {
                        continue;
                    }
                    visited[next] = true;
                    if region.get_pixel(nx as u32, ny as u32)[0] < threshold {
                        queue.push_back(next);
                    }
                }
            }
        }
        if size >= min_pixels {
            blobs += 1;
        }
    }
    blobs
}
