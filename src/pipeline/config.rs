//! Decoder configuration and validation.

use crate::candidate::nms::FilterParams;
use crate::decode::ImageScale;
use crate::util::{DecodeError, DecodeResult};

/// Box encoding of the regression part of the raw tensor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BoxFormat {
    /// `(cx, cy, w, h)`.
    #[default]
    Centroids,
    /// `(xmin, ymin, xmax, ymax)`.
    Corners,
    /// `(xmin, xmax, ymin, ymax)`.
    MinMax,
}

impl BoxFormat {
    /// Returns the lowercase name used in configuration files.
    pub fn name(self) -> &'static str {
        match self {
            BoxFormat::Centroids => "centroids",
            BoxFormat::Corners => "corners",
            BoxFormat::MinMax => "minmax",
        }
    }
}

/// Configuration for decoding raw detector output.
///
/// Defaults for thresholds and output sizes follow the reference SSD
/// detection-output stage.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodeConfig {
    /// Number of classes including the background class at index 0.
    pub n_classes: usize,
    /// Minimum score (exclusive) for a box to enter suppression, in `[0, 1)`.
    pub confidence_thresh: f32,
    /// IoU above which a lower-scored box of the same class is dropped, in `[0, 1]`.
    pub iou_threshold: f32,
    /// Rows returned per image.
    pub top_k: usize,
    /// Maximum survivors per class before the cross-class merge.
    pub nms_max_output_size: usize,
    /// Input box format; only `Centroids` is accepted.
    pub coords: BoxFormat,
    /// Scale relative coordinates by the image size.
    pub normalize_coords: bool,
    /// Image height, required when `normalize_coords` is set.
    pub img_height: Option<f32>,
    /// Image width, required when `normalize_coords` is set.
    pub img_width: Option<f32>,
    /// Decode images and classes on the rayon pool (requires the `rayon` feature).
    pub parallel: bool,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            n_classes: 21,
            confidence_thresh: 0.01,
            iou_threshold: 0.45,
            top_k: 200,
            nms_max_output_size: 400,
            coords: BoxFormat::Centroids,
            normalize_coords: false,
            img_height: None,
            img_width: None,
            parallel: false,
        }
    }
}

impl DecodeConfig {
    /// Validates every option against its domain.
    pub fn validate(&self) -> DecodeResult<()> {
        if self.coords != BoxFormat::Centroids {
            return Err(DecodeError::UnsupportedFormat {
                format: self.coords.name(),
            });
        }
        if self.n_classes == 0 {
            return Err(DecodeError::OutOfRange {
                option: "n_classes",
                value: 0.0,
                expected: ">= 1",
            });
        }
        if !(self.confidence_thresh >= 0.0 && self.confidence_thresh < 1.0) {
            return Err(DecodeError::OutOfRange {
                option: "confidence_thresh",
                value: self.confidence_thresh as f64,
                expected: "[0, 1)",
            });
        }
        if !(self.iou_threshold >= 0.0 && self.iou_threshold <= 1.0) {
            return Err(DecodeError::OutOfRange {
                option: "iou_threshold",
                value: self.iou_threshold as f64,
                expected: "[0, 1]",
            });
        }
        if self.top_k == 0 {
            return Err(DecodeError::OutOfRange {
                option: "top_k",
                value: 0.0,
                expected: ">= 1",
            });
        }
        if self.nms_max_output_size == 0 {
            return Err(DecodeError::OutOfRange {
                option: "nms_max_output_size",
                value: 0.0,
                expected: ">= 1",
            });
        }
        if self.normalize_coords {
            let (Some(img_height), Some(img_width)) = (self.img_height, self.img_width) else {
                return Err(DecodeError::MissingImageSize {
                    img_height: self.img_height,
                    img_width: self.img_width,
                });
            };
            for (option, value) in [("img_height", img_height), ("img_width", img_width)] {
                if !(value.is_finite() && value > 0.0) {
                    return Err(DecodeError::OutOfRange {
                        option,
                        value: value as f64,
                        expected: "finite and > 0",
                    });
                }
            }
        }
        Ok(())
    }

    /// Returns the coordinate scale, if normalization is enabled.
    pub(crate) fn image_scale(&self) -> Option<ImageScale> {
        if !self.normalize_coords {
            return None;
        }
        Some(ImageScale {
            width: self.img_width?,
            height: self.img_height?,
        })
    }

    pub(crate) fn filter_params(&self) -> FilterParams {
        FilterParams {
            confidence_thresh: self.confidence_thresh,
            iou_threshold: self.iou_threshold,
            max_output: self.nms_max_output_size,
        }
    }
}
