//! Batch decoding of raw SSD output.
//!
//! [`Decoder`] validates its configuration once, then turns a
//! `(batch_size, n_boxes, n_classes + 12)` tensor into a
//! `(batch_size, top_k, 6)` result. Images are independent of each other.

mod config;
pub(crate) mod frame;

pub use config::{BoxFormat, DecodeConfig};

use crate::candidate::{Detection, FrameResult};
#[cfg(feature = "rayon")]
use crate::pipeline::frame::decode_frame_par;
use crate::pipeline::frame::{decode_frame_seq, FramePlan};
use crate::tensor::{FrameView, RecordLayout, TensorView};
use crate::trace::trace_span;
use crate::util::{DecodeError, DecodeResult};
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Values per output row: `[class_id, confidence, xmin, ymin, xmax, ymax]`.
pub const OUTPUT_ROW_LEN: usize = 6;

/// Decoded detections for a whole batch, one [`FrameResult`] per image.
#[derive(Clone, Debug, PartialEq)]
pub struct BatchResult {
    frames: Vec<FrameResult>,
    top_k: usize,
}

impl BatchResult {
    /// Returns the number of images.
    pub fn batch_size(&self) -> usize {
        self.frames.len()
    }

    /// Returns the number of rows per image.
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Returns the output shape `[batch_size, top_k, 6]`.
    pub fn shape(&self) -> [usize; 3] {
        [self.frames.len(), self.top_k, OUTPUT_ROW_LEN]
    }

    /// Returns the result for image `index`.
    pub fn frame(&self, index: usize) -> Option<&FrameResult> {
        self.frames.get(index)
    }

    /// Returns all per-image results in batch order.
    pub fn frames(&self) -> &[FrameResult] {
        &self.frames
    }

    /// Consumes the batch, returning the per-image results.
    pub fn into_frames(self) -> Vec<FrameResult> {
        self.frames
    }

    /// Flattens the batch into a row-major `(batch_size, top_k, 6)` buffer.
    pub fn to_vec(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.frames.len() * self.top_k * OUTPUT_ROW_LEN);
        for frame in &self.frames {
            for detection in frame.detections() {
                out.extend_from_slice(&detection.to_row());
            }
        }
        out
    }

    /// Iterates over the real detections of every image, tagged by image index.
    pub fn iter_real(&self) -> impl Iterator<Item = (usize, &Detection)> + '_ {
        self.frames
            .iter()
            .enumerate()
            .flat_map(|(index, frame)| frame.real().iter().map(move |d| (index, d)))
    }
}

/// Decoder for raw SSD prediction tensors.
#[derive(Clone, Debug)]
pub struct Decoder {
    cfg: DecodeConfig,
    plan: FramePlan,
}

impl Decoder {
    /// Validates `cfg` and builds a decoder.
    pub fn new(cfg: DecodeConfig) -> DecodeResult<Self> {
        cfg.validate()?;
        let plan = FramePlan {
            layout: RecordLayout::new(cfg.n_classes),
            scale: cfg.image_scale(),
            filter: cfg.filter_params(),
            top_k: cfg.top_k,
        };
        Ok(Self { cfg, plan })
    }

    /// Returns the validated configuration.
    pub fn config(&self) -> &DecodeConfig {
        &self.cfg
    }

    /// Returns the expected record length, `n_classes + 12`.
    pub fn record_len(&self) -> usize {
        self.plan.layout.record_len()
    }

    /// Returns the output shape for a batch of `batch_size` images.
    pub fn output_shape(&self, batch_size: usize) -> [usize; 3] {
        [batch_size, self.cfg.top_k, OUTPUT_ROW_LEN]
    }

    /// Decodes a raw tensor given as a flat buffer and a dynamic shape.
    pub fn decode_slice(&self, data: &[f32], shape: &[usize]) -> DecodeResult<BatchResult> {
        if shape.len() == 3 && shape[2] != self.record_len() {
            return Err(DecodeError::ShapeMismatch {
                expected: self.record_len(),
                got: shape[2],
            });
        }
        self.decode(TensorView::new(data, shape)?)
    }

    /// Decodes every image of `input`.
    ///
    /// Fails before producing any output if the record length does not match
    /// the configured class count.
    pub fn decode(&self, input: TensorView<'_>) -> DecodeResult<BatchResult> {
        self.check_record_len(input.record_len())?;

        let _span = trace_span!(
            "decode_batch",
            batch_size = input.batch_size(),
            n_boxes = input.n_boxes(),
            parallel = self.cfg.parallel
        )
        .entered();

        #[cfg(feature = "rayon")]
        if self.cfg.parallel {
            return Ok(self.decode_par(input));
        }

        let frames = input
            .frames()
            .map(|frame| decode_frame_seq(frame, &self.plan))
            .collect();
        Ok(BatchResult {
            frames,
            top_k: self.cfg.top_k,
        })
    }

    /// Decodes a single image.
    pub fn decode_frame(&self, frame: FrameView<'_>) -> DecodeResult<FrameResult> {
        self.check_record_len(frame.record_len())?;

        #[cfg(feature = "rayon")]
        if self.cfg.parallel {
            return Ok(decode_frame_par(frame, &self.plan));
        }

        Ok(decode_frame_seq(frame, &self.plan))
    }

    #[cfg(feature = "rayon")]
    fn decode_par(&self, input: TensorView<'_>) -> BatchResult {
        let views: Vec<FrameView<'_>> = input.frames().collect();
        let frames = views
            .into_par_iter()
            .map(|frame| decode_frame_par(frame, &self.plan))
            .collect();
        BatchResult {
            frames,
            top_k: self.cfg.top_k,
        }
    }

    fn check_record_len(&self, got: usize) -> DecodeResult<()> {
        let expected = self.record_len();
        if got != expected {
            return Err(DecodeError::ShapeMismatch { expected, got });
        }
        Ok(())
    }
}
