//! Per-class confidence thresholding and greedy non-maximum suppression.

use crate::candidate::topk::sort_detections_desc;
use crate::candidate::{ClassBlock, Detection};
use crate::decode::DecodedBox;
use crate::tensor::{FrameView, RecordLayout};
use crate::util::math::iou;

/// Parameters shared by every per-class filter run.
#[derive(Clone, Copy, Debug)]
pub struct FilterParams {
    /// Scores must be strictly greater than this to be considered.
    pub confidence_thresh: f32,
    /// Boxes overlapping a kept box by more than this IoU are suppressed.
    pub iou_threshold: f32,
    /// Maximum number of detections kept per class.
    pub max_output: usize,
}

/// Applies greedy IoU suppression to candidates of a single class.
///
/// Candidates are stably sorted by descending confidence and kept if their
/// IoU with every previously kept box is at most `iou_threshold`. Stops after
/// `max_output` boxes are kept.
pub fn nms_greedy(
    candidates: &mut [Detection],
    iou_threshold: f32,
    max_output: usize,
) -> Vec<Detection> {
    sort_detections_desc(candidates);
    let mut kept: Vec<Detection> = Vec::with_capacity(max_output.min(candidates.len()));

    'outer: for candidate in candidates.iter().copied() {
        if kept.len() >= max_output {
            break;
        }
        for kept_det in kept.iter() {
            if iou(&kept_det.bbox, &candidate.bbox) > iou_threshold {
                continue 'outer;
            }
        }
        kept.push(candidate);
    }

    kept
}

/// Runs thresholding, suppression and padding for class `class_id`.
///
/// `boxes` holds the decoded box of every record in `frame`, in anchor order.
/// The result always has exactly `params.max_output` rows.
pub fn filter_class(
    frame: FrameView<'_>,
    layout: RecordLayout,
    boxes: &[DecodedBox],
    class_id: usize,
    params: FilterParams,
) -> ClassBlock {
    let mut candidates: Vec<Detection> = frame
        .records()
        .zip(boxes)
        .filter_map(|(record, bbox)| {
            let confidence = *layout.scores(record).get(class_id)?;
            (confidence > params.confidence_thresh).then_some(Detection {
                class_id,
                confidence,
                bbox: *bbox,
            })
        })
        .collect();

    if candidates.is_empty() {
        return ClassBlock::empty(params.max_output);
    }

    let kept = nms_greedy(&mut candidates, params.iou_threshold, params.max_output);
    ClassBlock::from_valid(kept, params.max_output)
}
