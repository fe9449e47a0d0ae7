//! Python bindings for the ssd-decode detection output decoder.
//!
//! Exposes `DecodeConfig` and `Decoder` to Python via PyO3; tensors are
//! exchanged as `float32` numpy arrays.

use numpy::ndarray::Array3;
use numpy::{IntoPyArray, PyArray3, PyReadonlyArray3, PyUntypedArrayMethods};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use ssd_decode::{
    BoxFormat, DecodeConfig as RustDecodeConfig, DecodeError, Decoder as RustDecoder,
};

/// Convert a DecodeError to a Python exception.
fn to_py_err(err: DecodeError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn parse_coords(coords: &str) -> PyResult<BoxFormat> {
    match coords.to_lowercase().as_str() {
        "centroids" => Ok(BoxFormat::Centroids),
        "corners" => Ok(BoxFormat::Corners),
        "minmax" => Ok(BoxFormat::MinMax),
        _ => Err(PyValueError::new_err(
            "coords must be 'centroids', 'corners' or 'minmax'",
        )),
    }
}

/// Configuration for decoding raw SSD output.
#[pyclass]
#[derive(Clone)]
pub struct DecodeConfig {
    inner: RustDecodeConfig,
}

#[pymethods]
impl DecodeConfig {
    /// Create and validate a new DecodeConfig.
    ///
    /// Args:
    ///     n_classes: Number of classes including background (default: 21)
    ///     confidence_thresh: Minimum score to enter NMS, in [0, 1) (default: 0.01)
    ///     iou_threshold: Suppression IoU threshold, in [0, 1] (default: 0.45)
    ///     top_k: Detections returned per image (default: 200)
    ///     nms_max_output_size: Survivors per class before merging (default: 400)
    ///     coords: Input box format, only "centroids" is accepted (default: "centroids")
    ///     normalize_coords: Scale relative coordinates by image size (default: False)
    ///     img_height: Image height, required when normalizing
    ///     img_width: Image width, required when normalizing
    ///     parallel: Decode images and classes in parallel (default: False)
    #[new]
    #[pyo3(signature = (
        n_classes = 21,
        confidence_thresh = 0.01,
        iou_threshold = 0.45,
        top_k = 200,
        nms_max_output_size = 400,
        coords = "centroids",
        normalize_coords = false,
        img_height = None,
        img_width = None,
        parallel = false
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        n_classes: usize,
        confidence_thresh: f32,
        iou_threshold: f32,
        top_k: usize,
        nms_max_output_size: usize,
        coords: &str,
        normalize_coords: bool,
        img_height: Option<f32>,
        img_width: Option<f32>,
        parallel: bool,
    ) -> PyResult<Self> {
        let inner = RustDecodeConfig {
            n_classes,
            confidence_thresh,
            iou_threshold,
            top_k,
            nms_max_output_size,
            coords: parse_coords(coords)?,
            normalize_coords,
            img_height,
            img_width,
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
            "DecodeConfig(n_classes={}, confidence_thresh={}, iou_threshold={}, top_k={}, nms_max_output_size={}, coords='{}', normalize_coords={}, img_height={:?}, img_width={:?}, parallel={})",
            self.inner.n_classes,
            self.inner.confidence_thresh,
            self.inner.iou_threshold,
            self.inner.top_k,
            self.inner.nms_max_output_size,
            self.inner.coords.name(),
            self.inner.normalize_coords,
            self.inner.img_height,
            self.inner.img_width,
            self.inner.parallel
        )
    }
}

/// Decoder turning raw SSD output into padded per-image detections.
#[pyclass]
pub struct Decoder {
    inner: RustDecoder,
}

#[pymethods]
impl Decoder {
    /// Create a decoder.
    ///
    /// Args:
    ///     config: DecodeConfig (default: DecodeConfig())
    #[new]
    #[pyo3(signature = (config = None))]
    fn new(config: Option<DecodeConfig>) -> PyResult<Self> {
        let cfg = config.map(|c| c.inner).unwrap_or_default();
        let inner = RustDecoder::new(cfg).map_err(to_py_err)?;
        Ok(Self { inner })
    }

    /// Decode a raw prediction tensor.
    ///
    /// Args:
    ///     y_pred: C-contiguous float32 array (batch_size, n_boxes, n_classes + 12)
    ///
    /// Returns:
    ///     float32 array (batch_size, top_k, 6) with rows
    ///     [class_id, confidence, xmin, ymin, xmax, ymax]
    fn decode<'py>(
        &self,
        py: Python<'py>,
        y_pred: PyReadonlyArray3<'py, f32>,
    ) -> PyResult<Bound<'py, PyArray3<f32>>> {
        let shape = y_pred.shape().to_vec();
        let data = y_pred.as_slice()?;

        let result = self.inner.decode_slice(data, &shape).map_err(to_py_err)?;
        let [batch_size, top_k, row_len] = result.shape();
        let array = Array3::from_shape_vec((batch_size, top_k, row_len), result.to_vec())
            .map_err(|err| PyValueError::new_err(err.to_string()))?;
        Ok(array.into_pyarray(py))
    }

    /// Output shape for a batch of `batch_size` images.
    fn output_shape(&self, batch_size: usize) -> (usize, usize, usize) {
        let [b, k, r] = self.inner.output_shape(batch_size);
        (b, k, r)
    }

    /// Expected values per box record (n_classes + 12).
    #[getter]
    fn record_len(&self) -> usize {
        self.inner.record_len()
    }

    fn __repr__(&self) -> String {
        let cfg = self.inner.config();
        format!(
            "Decoder(n_classes={}, top_k={})",
            cfg.n_classes, cfg.top_k
        )
    }
}

/// Python module for SSD output decoding.
#[pymodule]
fn _ssd_decode(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<DecodeConfig>()?;
    m.add_class::<Decoder>()?;

    // Add version
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}
