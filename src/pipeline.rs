use crate::classify::classify_components;
use crate::config::Config;
use crate::dedup::deduplicate;
use crate::detect::{DetectorMode, InputDevice, ShapeDetector, Sketch, TextDetector};
use crate::ir::{Annotation, DetectedComponent, Observation, SketchedPattern};
use crate::layout::{LayoutGroup, compute_layout};
use crate::normalize::{min_size_for, normalize_observations, normalize_text};
use crate::patterns::recognize_patterns;
use crate::render::{render_description, render_stylesheet};
use crossbeam_channel::{Receiver, RecvTimeoutError, TryRecvError, unbounded};
use rayon::Yield;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Everything one run produces: the flat component list for overlays, the ordered groups,
/// the raw pattern signals and the two strings handed to prompt construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Interpretation {
    pub components: Vec<DetectedComponent>,
    pub groups: Vec<LayoutGroup>,
    pub patterns: Vec<SketchedPattern>,
    pub stylesheet: String,
    pub description: String,
}

impl Interpretation {
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

/// Result of one detector task, sent back over the join channel.
enum TaskOutput {
    Shapes(Vec<Observation>),
    Texts(Vec<Annotation>),
    Patterns(Vec<SketchedPattern>),
}

const TASK_COUNT: usize = 3;

pub struct Interpreter {
    shapes: Arc<dyn ShapeDetector>,
    texts: Arc<dyn TextDetector>,
    config: Config,
    device: InputDevice,
}

impl Interpreter {
    pub fn new(
        shapes: Arc<dyn ShapeDetector>,
        texts: Arc<dyn TextDetector>,
        config: Config,
    ) -> Self {
        Self {
            shapes,
            texts,
            config,
            device: InputDevice::default(),
        }
    }

    pub fn with_device(mut self, device: InputDevice) -> Self {
        self.device = device;
        self
    }

    /// Decodes `bytes` and interprets the result. Undecodable input gives an empty
    /// interpretation.
    pub fn interpret_encoded(&self, bytes: &[u8]) -> Interpretation {
        match Sketch::decode(bytes) {
            Some(sketch) => self.interpret(&sketch),
            None => {
                let blank = Sketch::blank(Default::default());
                self.finish(&blank, Vec::new(), Vec::new(), Vec::new())
            }
        }
    }

    pub fn interpret(&self, sketch: &Sketch) -> Interpretation {
        if !sketch.is_usable() {
            tracing::warn!("sketch has an empty canvas; nothing to interpret");
            return self.finish(sketch, Vec::new(), Vec::new(), Vec::new());
        }

        let rx = self.spawn_detectors(Arc::new(sketch.clone()));
        let deadline = self
            .config
            .detection
            .task_timeout_ms
            .map(|ms| Instant::now() + Duration::from_millis(ms));

        let mut observations = None;
        let mut annotations = None;
        let mut patterns = None;
        for _ in 0..TASK_COUNT {
            match next_output(&rx, deadline) {
                Ok(TaskOutput::Shapes(found)) => observations = Some(found),
                Ok(TaskOutput::Texts(found)) => annotations = Some(found),
                Ok(TaskOutput::Patterns(found)) => patterns = Some(found),
                Err(RecvTimeoutError::Timeout) => {
                    tracing::warn!("detector tasks missed their deadline");
                    break;
                }
                Err(RecvTimeoutError::Disconnected) => {
                    tracing::warn!("detector task ended without reporting");
                    break;
                }
            }
        }

        let observations = observations.unwrap_or_else(|| missing("shape detection"));
        let annotations = annotations.unwrap_or_else(|| missing("text detection"));
        let patterns = patterns.unwrap_or_else(|| missing("pattern recognition"));
        self.finish(sketch, observations, annotations, patterns)
    }

    fn spawn_detectors(&self, sketch: Arc<Sketch>) -> Receiver<TaskOutput> {
        let (tx, rx) = unbounded();

        {
            let tx = tx.clone();
            let sketch = Arc::clone(&sketch);
            let detector = Arc::clone(&self.shapes);
            let params = self.device.detector_mode().params();
            let min_size = min_size_for(self.device, &self.config.detection);
            rayon::spawn(move || {
                let raw = detector
                    .detect_rectangles(&sketch, &params)
                    .unwrap_or_else(|err| {
                        tracing::warn!("shape detection failed: {err:#}");
                        Vec::new()
                    });
                let observations = normalize_observations(&raw, sketch.canvas, min_size);
                let _ = tx.send(TaskOutput::Shapes(observations));
            });
        }

        {
            let tx = tx.clone();
            let sketch = Arc::clone(&sketch);
            let detector = Arc::clone(&self.texts);
            rayon::spawn(move || {
                let recognized = detector.recognize_text(&sketch).unwrap_or_else(|err| {
                    tracing::warn!("text detection failed: {err:#}");
                    Vec::new()
                });
                let _ = tx.send(TaskOutput::Texts(normalize_text(&recognized, sketch.canvas)));
            });
        }

        // Pattern analyses look at everything a lenient pass finds, independent of the
        // caller's input device.
        let detector = Arc::clone(&self.shapes);
        let params = DetectorMode::Lenient.params();
        let min_size = self.config.detection.lenient_min_size;
        let config = self.config.patterns.clone();
        let dedup = self.config.dedup.clone();
        rayon::spawn(move || {
            let raw = detector
                .detect_rectangles(&sketch, &params)
                .unwrap_or_else(|err| {
                    tracing::warn!("lenient shape detection failed: {err:#}");
                    Vec::new()
                });
            let observations = normalize_observations(&raw, sketch.canvas, min_size);
            let _ = tx.send(TaskOutput::Patterns(recognize_patterns(
                &sketch,
                &observations,
                &config,
                &dedup,
            )));
        });

        rx
    }

    fn finish(
        &self,
        sketch: &Sketch,
        observations: Vec<Observation>,
        annotations: Vec<Annotation>,
        patterns: Vec<SketchedPattern>,
    ) -> Interpretation {
        let canvas = sketch.canvas;
        let config = &self.config;
        let unique = deduplicate(&observations, canvas, &config.dedup);
        let components = classify_components(
            &unique,
            &annotations,
            &patterns,
            canvas,
            &config.classifier,
            &config.layout,
        );
        let groups = compute_layout(&components, canvas, &config.layout, &config.rules);
        let stylesheet = render_stylesheet(&groups, &config.layout, &config.render);
        let description = render_description(&groups, canvas, &config.layout);
        tracing::debug!(
            observations = observations.len(),
            unique = unique.len(),
            components = components.len(),
            groups = groups.len(),
            "interpreted sketch"
        );
        Interpretation {
            components,
            groups,
            patterns,
            stylesheet,
            description,
        }
    }
}

const WORKER_POLL: Duration = Duration::from_millis(1);

// A rayon worker blocked on the channel would starve the jobs queued behind it, so workers
// keep running pool jobs while they wait.
fn next_output(
    rx: &Receiver<TaskOutput>,
    deadline: Option<Instant>,
) -> Result<TaskOutput, RecvTimeoutError> {
    if rayon::current_thread_index().is_none() {
        return match deadline {
            Some(deadline) => rx.recv_deadline(deadline),
            None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };
    }
    loop {
        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(RecvTimeoutError::Timeout);
        }
        match rx.try_recv() {
            Ok(output) => return Ok(output),
            Err(TryRecvError::Disconnected) => return Err(RecvTimeoutError::Disconnected),
            Err(TryRecvError::Empty) => {}
        }
        if !matches!(rayon::yield_now(), Some(Yield::Executed)) {
            match rx.recv_timeout(WORKER_POLL) {
                Ok(output) => return Ok(output),
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(RecvTimeoutError::Disconnected);
                }
                Err(RecvTimeoutError::Timeout) => {}
            }
        }
    }
}

fn missing<T>(task: &str) -> Vec<T> {
    tracing::warn!("{task} produced no result; continuing without it");
    Vec::new()
}
