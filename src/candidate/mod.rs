//! Candidate selection and pruning.
//!
//! Per-class confidence thresholding with greedy IoU suppression, and the
//! top-k merge across classes. Both stages produce fixed-length blocks:
//! `valid` real detections followed by zero sentinels.

pub(crate) mod nms;
pub(crate) mod topk;

use crate::decode::DecodedBox;

/// A scored box attached to one class.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Detection {
    /// Class index; `0` only for sentinels.
    pub class_id: usize,
    /// Class confidence score.
    pub confidence: f32,
    /// Corner-format box.
    pub bbox: DecodedBox,
}

impl Detection {
    /// Zero-padding row: class 0, confidence 0, empty box.
    pub const SENTINEL: Detection = Detection {
        class_id: 0,
        confidence: 0.0,
        bbox: DecodedBox {
            xmin: 0.0,
            ymin: 0.0,
            xmax: 0.0,
            ymax: 0.0,
        },
    };

    /// Returns the row as `[class_id, confidence, xmin, ymin, xmax, ymax]`.
    pub fn to_row(&self) -> [f32; 6] {
        [
            self.class_id as f32,
            self.confidence,
            self.bbox.xmin,
            self.bbox.ymin,
            self.bbox.xmax,
            self.bbox.ymax,
        ]
    }
}

/// Fixed-capacity list of detections: real rows first, then sentinels.
#[derive(Clone, Debug, PartialEq)]
pub struct PaddedDetections {
    rows: Vec<Detection>,
    valid: usize,
}

/// Output of the per-class filter, `nms_max_output_size` rows long.
pub type ClassBlock = PaddedDetections;

/// Final detections for one image, `top_k` rows long.
pub type FrameResult = PaddedDetections;

impl PaddedDetections {
    /// Pads `rows` with sentinels up to `capacity`, truncating any excess.
    pub fn from_valid(mut rows: Vec<Detection>, capacity: usize) -> Self {
        rows.truncate(capacity);
        let valid = rows.len();
        rows.resize(capacity, Detection::SENTINEL);
        Self { rows, valid }
    }

    /// Returns a block made only of sentinels.
    pub fn empty(capacity: usize) -> Self {
        Self::from_valid(Vec::new(), capacity)
    }

    /// Returns the fixed row count.
    pub fn capacity(&self) -> usize {
        self.rows.len()
    }

    /// Returns the number of real (non-sentinel) rows.
    pub fn valid_len(&self) -> usize {
        self.valid
    }

    /// Returns all rows, sentinels included.
    pub fn detections(&self) -> &[Detection] {
        &self.rows
    }

    /// Returns only the real rows.
    pub fn real(&self) -> &[Detection] {
        &self.rows[..self.valid]
    }
}
