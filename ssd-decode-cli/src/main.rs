use clap::Parser;
use serde::{Deserialize, Serialize};
use ssd_decode::{BoxFormat, DecodeConfig, Decoder, Detection, FrameResult, TensorView};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "SSD output decoder (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum BoxFormatConfig {
    Centroids,
    Corners,
    #[serde(rename = "minmax")]
    MinMax,
}

impl From<BoxFormatConfig> for BoxFormat {
    fn from(value: BoxFormatConfig) -> Self {
        match value {
            BoxFormatConfig::Centroids => BoxFormat::Centroids,
            BoxFormatConfig::Corners => BoxFormat::Corners,
            BoxFormatConfig::MinMax => BoxFormat::MinMax,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct DecodeConfigJson {
    n_classes: usize,
    confidence_thresh: f32,
    iou_threshold: f32,
    top_k: usize,
    nms_max_output_size: usize,
    coords: BoxFormatConfig,
    normalize_coords: bool,
    img_height: Option<f32>,
    img_width: Option<f32>,
    parallel: bool,
}

impl Default for DecodeConfigJson {
    fn default() -> Self {
        let cfg = DecodeConfig::default();
        Self {
            n_classes: cfg.n_classes,
            confidence_thresh: cfg.confidence_thresh,
            iou_threshold: cfg.iou_threshold,
            top_k: cfg.top_k,
            nms_max_output_size: cfg.nms_max_output_size,
            coords: BoxFormatConfig::Centroids,
            normalize_coords: cfg.normalize_coords,
            img_height: cfg.img_height,
            img_width: cfg.img_width,
            parallel: cfg.parallel,
        }
    }
}

impl From<DecodeConfigJson> for DecodeConfig {
    fn from(value: DecodeConfigJson) -> Self {
        Self {
            n_classes: value.n_classes,
            confidence_thresh: value.confidence_thresh,
            iou_threshold: value.iou_threshold,
            top_k: value.top_k,
            nms_max_output_size: value.nms_max_output_size,
            coords: value.coords.into(),
            normalize_coords: value.normalize_coords,
            img_height: value.img_height,
            img_width: value.img_width,
            parallel: value.parallel,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    input_path: String,
    shape: Vec<usize>,
    output_path: Option<String>,
    include_padding: bool,
    decode: DecodeConfigJson,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: String::new(),
            shape: Vec::new(),
            output_path: None,
            include_padding: false,
            decode: DecodeConfigJson::default(),
        }
    }
}

#[derive(Debug, Serialize)]
struct DetectionRecord {
    class_id: usize,
    confidence: f32,
    xmin: f32,
    ymin: f32,
    xmax: f32,
    ymax: f32,
}

impl From<&Detection> for DetectionRecord {
    fn from(value: &Detection) -> Self {
        Self {
            class_id: value.class_id,
            confidence: value.confidence,
            xmin: value.bbox.xmin,
            ymin: value.bbox.ymin,
            xmax: value.bbox.xmax,
            ymax: value.bbox.ymax,
        }
    }
}

#[derive(Debug, Serialize)]
struct FrameRecord {
    valid: usize,
    detections: Vec<DetectionRecord>,
}

impl FrameRecord {
    fn new(frame: &FrameResult, include_padding: bool) -> Self {
        let rows = if include_padding {
            frame.detections()
        } else {
            frame.real()
        };
        Self {
            valid: frame.valid_len(),
            detections: rows.iter().map(DetectionRecord::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    shape: [usize; 3],
    frames: Vec<FrameRecord>,
}

/// Reads a raw little-endian `f32` tensor.
fn read_f32_le(path: &Path) -> Result<Vec<f32>, Box<dyn std::error::Error>> {
    let bytes = fs::read(path)?;
    if bytes.len() % 4 != 0 {
        return Err(format!(
            "{}: length {} is not a multiple of 4 bytes",
            path.display(),
            bytes.len()
        )
        .into());
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("ssd_decode=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.input_path.is_empty() {
        return Err("input_path must be set in the config".into());
    }

    let decoder = Decoder::new(config.decode.into())?;
    let data = read_f32_le(Path::new(&config.input_path))?;
    let input = TensorView::new(&data, &config.shape)?;
    tracing::info!(
        batch_size = input.batch_size(),
        n_boxes = input.n_boxes(),
        record_len = input.record_len(),
        "loaded raw tensor"
    );

    let result = decoder.decode(input)?;
    let output = Output {
        shape: result.shape(),
        frames: result
            .frames()
            .iter()
            .map(|frame| FrameRecord::new(frame, config.include_padding))
            .collect(),
    };
    let json = serde_json::to_string_pretty(&output)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
