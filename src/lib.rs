pub mod classify;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod dedup;
pub mod detect;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod normalize;
pub mod patterns;
pub mod pipeline;
pub mod render;
pub mod scene;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, load_config};
pub use detect::{InputDevice, RecordedDetector, ShapeDetector, Sketch, TextDetector};
pub use pipeline::{Interpretation, Interpreter};
