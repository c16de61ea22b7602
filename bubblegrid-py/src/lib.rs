//! Python bindings for the bubblegrid answer-sheet detector.
//!
//! Images cross the boundary as 2D `uint8` numpy arrays (height x width).

use numpy::{PyReadonlyArray2, PyUntypedArrayMethods};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use bubblegrid::{
    AccuracyReport as RustAccuracyReport, BubbleDetector as RustDetector, BubbleGridError,
    BubbleMark as RustBubbleMark, CircleConfig, DetectConfig as RustDetectConfig,
    DetectionResult as RustDetectionResult, FillConfig, GridConfig, GroundTruthEntry,
    PixelBuffer,
};

fn to_py_err(err: BubbleGridError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn view_from_array<'a>(image: &'a PyReadonlyArray2<'_, u8>) -> PyResult<PixelBuffer<'a>> {
    let shape = image.shape();
    let height = shape[0];
    let width = shape[1];
    let data = image.as_slice()?;
    PixelBuffer::from_slice(data, width, height).map_err(to_py_err)
}

/// One detected bubble with its grid cell and fill state.
#[pyclass]
#[derive(Clone)]
pub struct BubbleMark {
    /// Grid row, -1 when unassigned.
    #[pyo3(get)]
    pub row: i32,
    /// Grid column, -1 when unassigned.
    #[pyo3(get)]
    pub col: i32,
    #[pyo3(get)]
    pub x: i32,
    #[pyo3(get)]
    pub y: i32,
    #[pyo3(get)]
    pub radius: u32,
    #[pyo3(get)]
    pub is_filled: bool,
    /// Dark-pixel fraction of the inner disk.
    #[pyo3(get)]
    pub fill_ratio: f32,
}

#[pymethods]
impl BubbleMark {
    fn __repr__(&self) -> String {
        format!(
            "BubbleMark(row={}, col={}, x={}, y={}, radius={}, is_filled={}, fill_ratio={:.3})",
            self.row,
            self.col,
            self.x,
            self.y,
            self.radius,
            if self.is_filled { "True" } else { "False" },
            self.fill_ratio
        )
    }
}

impl From<&RustBubbleMark> for BubbleMark {
    fn from(m: &RustBubbleMark) -> Self {
        Self {
            row: m.row,
            col: m.col,
            x: m.x,
            y: m.y,
            radius: m.radius,
            is_filled: m.is_filled,
            fill_ratio: m.fill_ratio,
        }
    }
}

impl From<&BubbleMark> for RustBubbleMark {
    fn from(m: &BubbleMark) -> Self {
        Self {
            row: m.row,
            col: m.col,
            x: m.x,
            y: m.y,
            radius: m.radius,
            is_filled: m.is_filled,
            fill_ratio: m.fill_ratio,
        }
    }
}

/// Configuration for the detection pipeline.
#[pyclass]
#[derive(Clone)]
pub struct DetectConfig {
    inner: RustDetectConfig,
}

#[pymethods]
impl DetectConfig {
    /// Create a new DetectConfig.
    ///
    /// Args:
    ///     kernel_size: Odd Gaussian kernel side (default: 5)
    ///     sigma: Gaussian sigma, <= 0 derives it from kernel_size (default: 0.0)
    ///     min_radius: Smallest bubble radius in pixels (default: 10)
    ///     max_radius: Largest bubble radius in pixels (default: 30)
    ///     min_center_distance: Minimum distance between centers (default: 20.0)
    ///     edge_threshold: Gradient magnitude for edge pixels (default: 50.0)
    ///     center_threshold: Minimum accumulator votes (default: 30)
    ///     accumulator_resolution: Image pixels per accumulator cell (default: 1.0)
    ///     fill_threshold: Dark fraction for a filled bubble (default: 0.4)
    ///     dark_threshold: Intensities below this are dark (default: 128)
    ///     inner_radius_ratio: Sampled disk as a fraction of the radius (default: 0.7)
    ///     row_band_height: Vertical bucket size for rows (default: 50)
    ///     row_break_threshold: Vertical gap that starts a new row (default: 30)
    ///     parallel: Enable parallel voting (default: False)
    #[new]
    #[pyo3(signature = (
        kernel_size = 5,
        sigma = 0.0,
        min_radius = 10,
        max_radius = 30,
        min_center_distance = 20.0,
        edge_threshold = 50.0,
        center_threshold = 30,
        accumulator_resolution = 1.0,
        fill_threshold = 0.4,
        dark_threshold = 128,
        inner_radius_ratio = 0.7,
        row_band_height = 50,
        row_break_threshold = 30,
        parallel = false
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        kernel_size: usize,
        sigma: f32,
        min_radius: u32,
        max_radius: u32,
        min_center_distance: f32,
        edge_threshold: f32,
        center_threshold: u32,
        accumulator_resolution: f32,
        fill_threshold: f32,
        dark_threshold: u8,
        inner_radius_ratio: f32,
        row_band_height: u32,
        row_break_threshold: u32,
        parallel: bool,
    ) -> PyResult<Self> {
        let inner = RustDetectConfig {
            kernel_size,
            sigma,
            circles: CircleConfig {
                min_radius,
                max_radius,
                min_center_distance,
                edge_threshold,
                center_threshold,
                accumulator_resolution,
                parallel,
            },
            fill: FillConfig {
                fill_threshold,
                dark_threshold,
                inner_radius_ratio,
            },
            grid: GridConfig {
                row_band_height,
                row_break_threshold,
            },
            parallel,
        };
        inner.validate().map_err(to_py_err)?;
        Ok(Self { inner })
    }

    /// Validate the configuration.
    fn validate(&self) -> PyResult<()> {
        self.inner.validate().map_err(to_py_err)
    }

    fn __repr__(&self) -> String {
        format!(
            "DetectConfig(radius={}..{}, fill_threshold={}, row_band_height={}, parallel={})",
            self.inner.circles.min_radius,
            self.inner.circles.max_radius,
            self.inner.fill.fill_threshold,
            self.inner.grid.row_band_height,
            if self.inner.parallel { "True" } else { "False" }
        )
    }
}

/// Immutable outcome of detecting one image.
#[pyclass]
pub struct DetectionResult {
    inner: RustDetectionResult,
}

#[pymethods]
impl DetectionResult {
    /// Marks in reading order.
    #[getter]
    fn marks(&self) -> Vec<BubbleMark> {
        self.inner.marks().iter().map(BubbleMark::from).collect()
    }

    #[getter]
    fn total_bubbles(&self) -> usize {
        self.inner.total_bubbles()
    }

    #[getter]
    fn filled_bubbles(&self) -> usize {
        self.inner.filled_bubbles()
    }

    #[getter]
    fn empty_bubbles(&self) -> usize {
        self.inner.empty_bubbles()
    }

    #[getter]
    fn width(&self) -> usize {
        self.inner.width()
    }

    #[getter]
    fn height(&self) -> usize {
        self.inner.height()
    }

    /// Wall-clock detection time in milliseconds.
    #[getter]
    fn processing_time_ms(&self) -> f64 {
        self.inner.processing_time().as_secs_f64() * 1000.0
    }

    /// Grid extent as (rows, cols).
    #[getter]
    fn grid_shape(&self) -> (usize, usize) {
        self.inner.grid_shape()
    }

    /// Return the mark assigned to (row, col), or None.
    fn mark_at(&self, row: i32, col: i32) -> Option<BubbleMark> {
        self.inner.mark_at(row, col).map(BubbleMark::from)
    }

    fn __len__(&self) -> usize {
        self.inner.total_bubbles()
    }

    fn __repr__(&self) -> String {
        format!(
            "DetectionResult({}x{}, total={}, filled={})",
            self.inner.width(),
            self.inner.height(),
            self.inner.total_bubbles(),
            self.inner.filled_bubbles()
        )
    }
}

/// Bubble grid detector.
#[pyclass]
pub struct Detector {
    inner: RustDetector,
}

#[pymethods]
impl Detector {
    /// Create a detector.
    ///
    /// Args:
    ///     config: DetectConfig (default: DetectConfig())
    #[new]
    #[pyo3(signature = (config = None))]
    fn new(config: Option<DetectConfig>) -> PyResult<Self> {
        let cfg = config.map(|c| c.inner).unwrap_or_default();
        cfg.validate().map_err(to_py_err)?;
        Ok(Self {
            inner: RustDetector::new().with_config(cfg),
        })
    }

    /// Detect bubbles in a 2D uint8 numpy array.
    fn detect(&self, image: PyReadonlyArray2<'_, u8>) -> PyResult<DetectionResult> {
        let view = view_from_array(&image)?;
        let inner = self.inner.detect(view).map_err(to_py_err)?;
        Ok(DetectionResult { inner })
    }

    /// Detect bubbles in an image file.
    fn detect_file(&self, path: &str) -> PyResult<DetectionResult> {
        let owned = bubblegrid::io::load_gray_image(path).map_err(to_py_err)?;
        let inner = self.inner.detect(owned.view()).map_err(to_py_err)?;
        Ok(DetectionResult { inner })
    }

    /// Detect bubbles in several images; results keep the input order.
    fn detect_batch(&self, images: Vec<PyReadonlyArray2<'_, u8>>) -> PyResult<Vec<DetectionResult>> {
        let views = images
            .iter()
            .map(view_from_array)
            .collect::<PyResult<Vec<_>>>()?;
        self.inner
            .detect_batch(&views)
            .into_iter()
            .map(|result| {
                result
                    .map(|inner| DetectionResult { inner })
                    .map_err(to_py_err)
            })
            .collect()
    }

    fn __repr__(&self) -> String {
        "Detector()".to_string()
    }
}

/// Scoring summary against ground truth.
#[pyclass]
#[derive(Clone)]
pub struct AccuracyReport {
    #[pyo3(get)]
    pub accuracy: f32,
    #[pyo3(get)]
    pub correct: usize,
    #[pyo3(get)]
    pub false_positives: usize,
    #[pyo3(get)]
    pub false_negatives: usize,
    #[pyo3(get)]
    pub total: usize,
    /// Detected marks shadowed by an earlier mark in the same cell.
    #[pyo3(get)]
    pub duplicate_cells: usize,
}

#[pymethods]
impl AccuracyReport {
    fn __repr__(&self) -> String {
        format!(
            "AccuracyReport(accuracy={:.4}, correct={}, false_positives={}, false_negatives={}, total={})",
            self.accuracy, self.correct, self.false_positives, self.false_negatives, self.total
        )
    }
}

impl From<RustAccuracyReport> for AccuracyReport {
    fn from(r: RustAccuracyReport) -> Self {
        Self {
            accuracy: r.accuracy,
            correct: r.correct,
            false_positives: r.false_positives,
            false_negatives: r.false_negatives,
            total: r.total,
            duplicate_cells: r.duplicate_cells,
        }
    }
}

/// Detect bubbles with default settings in a single call.
///
/// Args:
///     image: 2D uint8 numpy array (height x width)
///     parallel: Enable parallel voting (default: False)
///
/// Returns:
///     DetectionResult
#[pyfunction]
#[pyo3(signature = (image, parallel = false))]
fn detect_bubbles(image: PyReadonlyArray2<'_, u8>, parallel: bool) -> PyResult<DetectionResult> {
    let view = view_from_array(&image)?;
    let detector = RustDetector::new().with_config(RustDetectConfig {
        parallel,
        ..RustDetectConfig::default()
    });
    let inner = detector.detect(view).map_err(to_py_err)?;
    Ok(DetectionResult { inner })
}

/// Compare detected marks with ground truth.
///
/// Args:
///     detected: list of BubbleMark
///     truth: list of (row, col, is_filled) tuples
///
/// Returns:
///     AccuracyReport
#[pyfunction]
fn score(detected: Vec<BubbleMark>, truth: Vec<(i32, i32, bool)>) -> AccuracyReport {
    let marks: Vec<RustBubbleMark> = detected.iter().map(RustBubbleMark::from).collect();
    let truth: Vec<GroundTruthEntry> = truth
        .into_iter()
        .map(|(row, col, is_filled)| GroundTruthEntry {
            row,
            col,
            is_filled,
        })
        .collect();
    bubblegrid::score(&marks, &truth).into()
}

/// Python module for bubble grid detection.
#[pymodule]
fn _bubblegrid(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<BubbleMark>()?;
    m.add_class::<DetectConfig>()?;
    m.add_class::<DetectionResult>()?;
    m.add_class::<Detector>()?;
    m.add_class::<AccuracyReport>()?;
    m.add_function(wrap_pyfunction!(detect_bubbles, m)?)?;
    m.add_function(wrap_pyfunction!(score, m)?)?;

    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}
