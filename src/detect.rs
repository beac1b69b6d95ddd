use crate::ir::{RawObservation, RecognizedText, Size};
use image::GrayImage;
use serde::{Deserialize, Serialize};

/// Immutable input shared by every detector task of one interpretation.
#[derive(Debug, Clone)]
pub struct Sketch {
    pub canvas: Size,
    pub pixels: Option<GrayImage>,
}

impl Sketch {
    /// A sketch with only a canvas size, for callers that supply recorded detections.
    pub fn blank(canvas: Size) -> Self {
        Self {
            canvas,
            pixels: None,
        }
    }

    pub fn from_pixels(pixels: GrayImage) -> Self {
        let canvas = Size::new(pixels.width() as f32, pixels.height() as f32);
        Self {
            canvas,
            pixels: Some(pixels),
        }
    }

    /// Decodes an encoded image. Undecodable or empty data yields `None`.
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        match image::load_from_memory(bytes) {
            Ok(img) => {
                let gray = img.to_luma8();
                if gray.width() == 0 || gray.height() == 0 {
                    tracing::warn!("sketch image has no pixels");
                    return None;
                }
                Some(Self::from_pixels(gray))
            }
            Err(err) => {
                tracing::warn!("failed to decode sketch image: {err}");
                None
            }
        }
    }

    /// Keeps the decoded pixels but reports detections against `canvas`.
    pub fn with_canvas(mut self, canvas: Size) -> Self {
        self.canvas = canvas;
        self
    }

    pub fn is_usable(&self) -> bool {
        !self.canvas.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InputDevice {
    /// Finger or mouse input. Strokes are coarse, so detection is strict.
    #[default]
    Touch,
    Stylus,
}

impl InputDevice {
    pub fn detector_mode(self) -> DetectorMode {
        match self {
            Self::Touch => DetectorMode::HighPrecision,
            Self::Stylus => DetectorMode::Lenient,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DetectorMode {
    HighPrecision,
    Lenient,
}

impl DetectorMode {
    pub fn params(self) -> DetectionParams {
        match self {
            Self::HighPrecision => DetectionParams {
                minimum_size: 0.05,
                minimum_aspect_ratio: 0.1,
                maximum_aspect_ratio: 1.0,
                minimum_confidence: 0.6,
                quadrature_tolerance: 15.0,
                maximum_observations: 20,
            },
            Self::Lenient => DetectionParams {
                minimum_size: 0.02,
                minimum_aspect_ratio: 0.02,
                maximum_aspect_ratio: 1.0,
                minimum_confidence: 0.3,
                quadrature_tolerance: 30.0,
                maximum_observations: 50,
            },
        }
    }
}

/// Parameters handed to a shape detector. Sizes are normalized; aspect ratios are
/// short side over long side, so they lie in (0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionParams {
    pub minimum_size: f32,
    pub minimum_aspect_ratio: f32,
    pub maximum_aspect_ratio: f32,
    pub minimum_confidence: f32,
    /// Allowed corner deviation from 90 degrees.
    pub quadrature_tolerance: f32,
    pub maximum_observations: usize,
}

impl DetectionParams {
    /// Filters already-detected observations the way a live detector would: confidence floor,
    /// size and aspect bounds, then the highest-confidence `maximum_observations`.
    pub fn admit(&self, observations: &[RawObservation]) -> Vec<RawObservation> {
        let mut admitted: Vec<RawObservation> = observations
            .iter()
            .filter(|obs| obs.confidence >= self.minimum_confidence)
            .filter(|obs| obs.rect.width.min(obs.rect.height) >= self.minimum_size)
            .filter(|obs| {
                let long = obs.rect.width.max(obs.rect.height);
                if long <= 0.0 {
                    return false;
                }
                let ratio = obs.rect.width.min(obs.rect.height) / long;
                ratio >= self.minimum_aspect_ratio && ratio <= self.maximum_aspect_ratio
            })
            .copied()
            .collect();
        admitted.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        admitted.truncate(self.maximum_observations);
        admitted
    }
}

pub trait ShapeDetector: Send + Sync {
    fn detect_rectangles(
        &self,
        sketch: &Sketch,
        params: &DetectionParams,
    ) -> anyhow::Result<Vec<RawObservation>>;
}

pub trait TextDetector: Send + Sync {
    fn recognize_text(&self, sketch: &Sketch) -> anyhow::Result<Vec<RecognizedText>>;
}

/// Replays observations captured from an earlier detector run.
#[derive(Debug, Clone, Default)]
pub struct RecordedDetector {
    pub observations: Vec<RawObservation>,
    pub texts: Vec<RecognizedText>,
}

impl RecordedDetector {
    pub fn new(observations: Vec<RawObservation>, texts: Vec<RecognizedText>) -> Self {
        Self {
            observations,
            texts,
        }
    }
}

impl ShapeDetector for RecordedDetector {
    fn detect_rectangles(
        &self,
        _sketch: &Sketch,
        params: &DetectionParams,
    ) -> anyhow::Result<Vec<RawObservation>> {
        Ok(params.admit(&self.observations))
    }
}

impl TextDetector for RecordedDetector {
    fn recognize_text(&self, _sketch: &Sketch) -> anyhow::Result<Vec<RecognizedText>> {
        Ok(self.texts.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Rect;

    fn raw(x: f32, y: f32, w: f32, h: f32, confidence: f32) -> RawObservation {
        RawObservation {
            rect: Rect::new(x, y, w, h),
            confidence,
        }
    }

    #[test]
    fn stylus_is_lenient() {
        assert_eq!(InputDevice::Stylus.detector_mode(), DetectorMode::Lenient);
        assert_eq!(InputDevice::Touch.detector_mode(), DetectorMode::HighPrecision);
    }

    #[test]
    fn admit_applies_floor_and_cap() {
        let params = DetectionParams {
            maximum_observations: 2,
            ..DetectorMode::Lenient.params()
        };
        let observations = vec![
            raw(0.1, 0.1, 0.2, 0.2, 0.9),
            raw(0.5, 0.5, 0.2, 0.2, 0.1),
            raw(0.3, 0.3, 0.2, 0.2, 0.5),
            raw(0.6, 0.1, 0.2, 0.2, 0.7),
        ];
        let admitted = params.admit(&observations);
        assert_eq!(admitted.len(), 2);
        assert_eq!(admitted[0].confidence, 0.9);
        assert_eq!(admitted[1].confidence, 0.7);
    }

    #[test]
    fn high_precision_drops_small_shapes() {
        let params = DetectorMode::HighPrecision.params();
        let admitted = params.admit(&[raw(0.1, 0.1, 0.03, 0.03, 0.9)]);
        assert!(admitted.is_empty());
        let lenient = DetectorMode::Lenient.params();
        assert_eq!(lenient.admit(&[raw(0.1, 0.1, 0.03, 0.03, 0.9)]).len(), 1);
    }

    #[test]
    fn undecodable_bytes_yield_none() {
        assert!(Sketch::decode(b"not an image").is_none());
        assert!(Sketch::decode(&[]).is_none());
    }

    #[test]
    fn decodes_png_into_grayscale() {
        let img = image::GrayImage::from_pixel(40, 30, image::Luma([255u8]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageLuma8(img)
            .write_to(
                &mut std::io::Cursor::new(&mut bytes),
                image::ImageFormat::Png,
            )
            .unwrap();
        let sketch = Sketch::decode(&bytes).unwrap();
        assert_eq!(sketch.canvas, Size::new(40.0, 30.0));
        assert!(sketch.pixels.is_some());
    }
}
