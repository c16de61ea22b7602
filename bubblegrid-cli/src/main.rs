use bubblegrid::io::load_gray_image;
use bubblegrid::{
    score, AccuracyReport, BubbleDetector, BubbleMark, CircleConfig, DetectConfig,
    DetectionResult, FillConfig, GridConfig, GroundTruthEntry,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "Bubble grid detector (JSON config driven)")]
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
    /// Enable per-stage tracing output.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct CircleConfigJson {
    min_radius: u32,
    max_radius: u32,
    min_center_distance: f32,
    edge_threshold: f32,
    center_threshold: u32,
    accumulator_resolution: f32,
}

impl Default for CircleConfigJson {
    fn default() -> Self {
        let cfg = CircleConfig::default();
        Self {
            min_radius: cfg.min_radius,
            max_radius: cfg.max_radius,
            min_center_distance: cfg.min_center_distance,
            edge_threshold: cfg.edge_threshold,
            center_threshold: cfg.center_threshold,
            accumulator_resolution: cfg.accumulator_resolution,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct FillConfigJson {
    fill_threshold: f32,
    dark_threshold: u8,
    inner_radius_ratio: f32,
}

impl Default for FillConfigJson {
    fn default() -> Self {
        let cfg = FillConfig::default();
        Self {
            fill_threshold: cfg.fill_threshold,
            dark_threshold: cfg.dark_threshold,
            inner_radius_ratio: cfg.inner_radius_ratio,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct GridConfigJson {
    row_band_height: u32,
    row_break_threshold: u32,
}

impl Default for GridConfigJson {
    fn default() -> Self {
        let cfg = GridConfig::default();
        Self {
            row_band_height: cfg.row_band_height,
            row_break_threshold: cfg.row_break_threshold,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct DetectConfigJson {
    kernel_size: usize,
    sigma: f32,
    parallel: bool,
    circles: CircleConfigJson,
    fill: FillConfigJson,
    grid: GridConfigJson,
}

impl Default for DetectConfigJson {
    fn default() -> Self {
        let cfg = DetectConfig::default();
        Self {
            kernel_size: cfg.kernel_size,
            sigma: cfg.sigma,
            parallel: cfg.parallel,
            circles: CircleConfigJson::default(),
            fill: FillConfigJson::default(),
            grid: GridConfigJson::default(),
        }
    }
}

impl From<DetectConfigJson> for DetectConfig {
    fn from(value: DetectConfigJson) -> Self {
        Self {
            kernel_size: value.kernel_size,
            sigma: value.sigma,
            circles: CircleConfig {
                min_radius: value.circles.min_radius,
                max_radius: value.circles.max_radius,
                min_center_distance: value.circles.min_center_distance,
                edge_threshold: value.circles.edge_threshold,
                center_threshold: value.circles.center_threshold,
                accumulator_resolution: value.circles.accumulator_resolution,
                parallel: value.parallel,
            },
            fill: FillConfig {
                fill_threshold: value.fill.fill_threshold,
                dark_threshold: value.fill.dark_threshold,
                inner_radius_ratio: value.fill.inner_radius_ratio,
            },
            grid: GridConfig {
                row_band_height: value.grid.row_band_height,
                row_break_threshold: value.grid.row_break_threshold,
            },
            parallel: value.parallel,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    image_path: String,
    ground_truth_path: Option<String>,
    output_path: Option<String>,
    detect: DetectConfigJson,
}

#[derive(Debug, Deserialize)]
struct TruthRecord {
    row: i32,
    col: i32,
    is_filled: bool,
}

impl From<TruthRecord> for GroundTruthEntry {
    fn from(value: TruthRecord) -> Self {
        Self {
            row: value.row,
            col: value.col,
            is_filled: value.is_filled,
        }
    }
}

#[derive(Debug, Serialize)]
struct MarkRecord {
    row: i32,
    col: i32,
    x: i32,
    y: i32,
    radius: u32,
    is_filled: bool,
    fill_ratio: f32,
}

impl From<&BubbleMark> for MarkRecord {
    fn from(value: &BubbleMark) -> Self {
        Self {
            row: value.row,
            col: value.col,
            x: value.x,
            y: value.y,
            radius: value.radius,
            is_filled: value.is_filled,
            fill_ratio: value.fill_ratio,
        }
    }
}

#[derive(Debug, Serialize)]
struct AccuracyRecord {
    accuracy: f32,
    correct: usize,
    false_positives: usize,
    false_negatives: usize,
    total: usize,
    duplicate_cells: usize,
}

impl From<AccuracyReport> for AccuracyRecord {
    fn from(value: AccuracyReport) -> Self {
        Self {
            accuracy: value.accuracy,
            correct: value.correct,
            false_positives: value.false_positives,
            false_negatives: value.false_negatives,
            total: value.total,
            duplicate_cells: value.duplicate_cells,
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    width: usize,
    height: usize,
    total_bubbles: usize,
    filled_bubbles: usize,
    empty_bubbles: usize,
    processing_time_ms: f64,
    marks: Vec<MarkRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    accuracy: Option<AccuracyRecord>,
}

impl Output {
    fn new(result: &DetectionResult, accuracy: Option<AccuracyReport>) -> Self {
        Self {
            width: result.width(),
            height: result.height(),
            total_bubbles: result.total_bubbles(),
            filled_bubbles: result.filled_bubbles(),
            empty_bubbles: result.empty_bubbles(),
            processing_time_ms: result.processing_time().as_secs_f64() * 1000.0,
            marks: result.marks().iter().map(MarkRecord::from).collect(),
            accuracy: accuracy.map(AccuracyRecord::from),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("bubblegrid=info".parse()?))
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
    if config.image_path.is_empty() {
        return Err("image_path must be set in the config".into());
    }

    let detect_cfg = DetectConfig::from(config.detect);
    detect_cfg.validate()?;

    let image = load_gray_image(&config.image_path)?;
    let detector = BubbleDetector::new().with_config(detect_cfg);
    let result = detector.detect(image.view())?;

    let accuracy = match &config.ground_truth_path {
        Some(path) => {
            let truth_text = fs::read_to_string(path)?;
            let records: Vec<TruthRecord> = serde_json::from_str(&truth_text)?;
            let truth: Vec<GroundTruthEntry> =
                records.into_iter().map(GroundTruthEntry::from).collect();
            Some(score(result.marks(), &truth))
        }
        None => None,
    };

    let output = Output::new(&result, accuracy);
    let json = serde_json::to_string_pretty(&output)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
