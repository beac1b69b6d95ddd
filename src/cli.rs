use crate::config::load_config;
use crate::detect::{InputDevice, Sketch};
use crate::layout_dump::{LayoutDump, write_layout_dump};
use crate::pipeline::{Interpretation, Interpreter};
use crate::render::render_outline;
use crate::scene::{Scene, load_scene, parse_scene};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(
    name = "sklay",
    version,
    about = "Interpret recorded sketch detections into a UI layout description"
)]
pub struct Args {
    /// Scene file (.json/.json5) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Sketch image used for pixel-based pattern analysis
    #[arg(long = "image")]
    pub image: Option<PathBuf>,

    /// Output file. Defaults to stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "description")]
    pub output_format: OutputFormat,

    /// Config JSON/JSON5 file (layout preset, thresholds)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Input device; overrides the scene's own
    #[arg(short = 'd', long = "device", value_enum)]
    pub device: Option<DeviceArg>,

    /// Also write a JSON layout dump to this path
    #[arg(long = "dumpLayout")]
    pub dump_layout: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Description,
    Stylesheet,
    Outline,
    Json,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceArg {
    Touch,
    Stylus,
}

impl From<DeviceArg> for InputDevice {
    fn from(arg: DeviceArg) -> Self {
        match arg {
            DeviceArg::Touch => InputDevice::Touch,
            DeviceArg::Stylus => InputDevice::Stylus,
        }
    }
}

pub fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;
    let scene = read_scene(args.input.as_deref())?;
    let sketch = read_sketch(&scene, args.image.as_deref())?;
    let device = args.device.map(InputDevice::from).unwrap_or(scene.device);

    let detector = Arc::new(scene.detector());
    let interpreter = Interpreter::new(detector.clone(), detector, config).with_device(device);
    let interpretation = interpreter.interpret(&sketch);
    if interpretation.is_empty() {
        tracing::warn!("no components detected");
    }

    if let Some(path) = args.dump_layout.as_deref() {
        write_layout_dump(path, &interpretation, sketch.canvas)?;
    }

    let rendered = format_output(&interpretation, &sketch, args.output_format)?;
    write_output(&rendered, args.output.as_deref())
}

fn read_scene(path: Option<&Path>) -> Result<Scene> {
    match path {
        Some(path) if path != Path::new("-") => load_scene(path),
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(parse_scene(&buf)?)
        }
    }
}

// Pixels come from the image, detections keep the scene's coordinate space.
fn read_sketch(scene: &Scene, image: Option<&Path>) -> Result<Sketch> {
    let Some(path) = image else {
        return Ok(scene.sketch());
    };
    let bytes = std::fs::read(path)?;
    match Sketch::decode(&bytes) {
        Some(sketch) => Ok(sketch.with_canvas(scene.canvas)),
        None => Err(anyhow::anyhow!(
            "could not decode sketch image {}",
            path.display()
        )),
    }
}

fn format_output(
    interpretation: &Interpretation,
    sketch: &Sketch,
    format: OutputFormat,
) -> Result<String> {
    Ok(match format {
        OutputFormat::Description => interpretation.description.clone(),
        OutputFormat::Stylesheet => interpretation.stylesheet.clone(),
        OutputFormat::Outline => render_outline(&interpretation.groups),
        OutputFormat::Json => {
            let dump = LayoutDump::from_interpretation(interpretation, sketch.canvas);
            let mut json = serde_json::to_string_pretty(&dump)?;
            json.push('\n');
            json
        }
    })
}

fn write_output(contents: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, contents)?,
        None => io::stdout().write_all(contents.as_bytes())?,
    }
    Ok(())
}
