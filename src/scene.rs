use crate::detect::{InputDevice, RecordedDetector, Sketch};
use crate::ir::{RawObservation, RecognizedText, Rect, Size};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// A recorded detector run: the canvas, what the shape and text detectors reported, and the
/// device the sketch was drawn with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub canvas: Size,
    #[serde(default)]
    pub device: InputDevice,
    #[serde(default)]
    pub observations: Vec<RawObservation>,
    #[serde(default)]
    pub texts: Vec<RecognizedText>,
}

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("invalid scene document: {0}")]
    Syntax(String),

    #[error("canvas must have a positive size, got {width}x{height}")]
    InvalidCanvas { width: f32, height: f32 },

    #[error("observation {index}: confidence {value} is outside [0, 1]")]
    InvalidConfidence { index: usize, value: f32 },

    #[error("{what} {index}: rectangle {rect:?} is not a normalized rectangle")]
    InvalidRect {
        what: &'static str,
        index: usize,
        rect: Rect,
    },
}

impl Scene {
    pub fn sketch(&self) -> Sketch {
        Sketch::blank(self.canvas)
    }

    pub fn detector(&self) -> RecordedDetector {
        RecordedDetector::new(self.observations.clone(), self.texts.clone())
    }

    fn validate(&self) -> Result<(), SceneError> {
        let Size { width, height } = self.canvas;
        if self.canvas.is_empty() || !width.is_finite() || !height.is_finite() {
            return Err(SceneError::InvalidCanvas { width, height });
        }
        for (index, obs) in self.observations.iter().enumerate() {
            if !(0.0..=1.0).contains(&obs.confidence) {
                return Err(SceneError::InvalidConfidence {
                    index,
                    value: obs.confidence,
                });
            }
            check_normalized("observation", index, &obs.rect)?;
        }
        for (index, text) in self.texts.iter().enumerate() {
            check_normalized("text", index, &text.rect)?;
        }
        Ok(())
    }
}

// Origin inside the unit square and a non-negative extent. Overhang past 1.0 is clipped later.
fn check_normalized(what: &'static str, index: usize, rect: &Rect) -> Result<(), SceneError> {
    let origin_ok = (0.0..=1.0).contains(&rect.x) && (0.0..=1.0).contains(&rect.y);
    let extent_ok = rect.width >= 0.0 && rect.height >= 0.0;
    if origin_ok && extent_ok {
        Ok(())
    } else {
        Err(SceneError::InvalidRect {
            what,
            index,
            rect: *rect,
        })
    }
}

pub fn parse_scene(contents: &str) -> Result<Scene, SceneError> {
    let scene: Scene = match serde_json::from_str(contents) {
        Ok(scene) => scene,
        Err(json_err) => json5::from_str(contents)
            .map_err(|_| SceneError::Syntax(json_err.to_string()))?,
    };
    scene.validate()?;
    Ok(scene)
}

pub fn load_scene(path: &Path) -> anyhow::Result<Scene> {
    let contents = std::fs::read_to_string(path)?;
    let scene = parse_scene(&contents)
        .map_err(|err| anyhow::anyhow!("{}: {err}", path.display()))?;
    tracing::debug!(
        observations = scene.observations.len(),
        texts = scene.texts.len(),
        "loaded scene"
    );
    Ok(scene)
}
