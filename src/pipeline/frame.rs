//! Per-image decode: boxes, per-class filtering, then the top-k merge.

use crate::candidate::nms::{filter_class, FilterParams};
use crate::candidate::topk::select_top_k;
use crate::candidate::{ClassBlock, FrameResult};
use crate::decode::{decode_frame, ImageScale};
use crate::tensor::{FrameView, RecordLayout};
use crate::trace::{trace_event, trace_span};
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Static inputs shared by every frame of a batch.
#[derive(Clone, Copy, Debug)]
pub(crate) struct FramePlan {
    pub(crate) layout: RecordLayout,
    pub(crate) scale: Option<ImageScale>,
    pub(crate) filter: FilterParams,
    pub(crate) top_k: usize,
}

pub(crate) fn decode_frame_seq(frame: FrameView<'_>, plan: &FramePlan) -> FrameResult {
    let _span = trace_span!("decode_frame", n_boxes = frame.n_boxes()).entered();

    let boxes = decode_frame(frame, plan.layout, plan.scale);
    let blocks: Vec<ClassBlock> = (1..plan.layout.n_classes())
        .map(|class_id| filter_class(frame, plan.layout, &boxes, class_id, plan.filter))
        .collect();
    let result = select_top_k(&blocks, plan.top_k);

    trace_event!("frame_detections", count = result.valid_len());
    result
}

/// Same as [`decode_frame_seq`], with classes filtered on the rayon pool.
///
/// Indexed collection keeps blocks in class order, so the merge sees the
/// same sequence as the sequential path.
#[cfg(feature = "rayon")]
pub(crate) fn decode_frame_par(frame: FrameView<'_>, plan: &FramePlan) -> FrameResult {
    let _span = trace_span!("decode_frame", n_boxes = frame.n_boxes(), parallel = true).entered();

    let boxes = decode_frame(frame, plan.layout, plan.scale);
    let blocks: Vec<ClassBlock> = (1..plan.layout.n_classes())
        .into_par_iter()
        .map(|class_id| filter_class(frame, plan.layout, &boxes, class_id, plan.filter))
        .collect();
    let result = select_top_k(&blocks, plan.top_k);

    trace_event!("frame_detections", count = result.valid_len());
    result
}
