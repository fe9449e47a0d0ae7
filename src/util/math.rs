//! Geometric helpers for corner-format boxes.

use crate::decode::DecodedBox;

/// Returns the area of a corner box, or `None` when its width or height is
/// not strictly positive (NaN extents count as degenerate).
pub(crate) fn positive_area(b: &DecodedBox) -> Option<f32> {
    let width = b.xmax - b.xmin;
    let height = b.ymax - b.ymin;
    if width > 0.0 && height > 0.0 {
        Some(width * height)
    } else {
        None
    }
}

/// Intersection-over-union of two corner boxes.
///
/// Degenerate boxes (zero or negative width or height) have zero IoU with
/// every box, themselves included.
pub fn iou(a: &DecodedBox, b: &DecodedBox) -> f32 {
    let (Some(area_a), Some(area_b)) = (positive_area(a), positive_area(b)) else {
        return 0.0;
    };

    let inter_w = (a.xmax.min(b.xmax) - a.xmin.max(b.xmin)).max(0.0);
    let inter_h = (a.ymax.min(b.ymax) - a.ymin.max(b.ymin)).max(0.0);
    let intersection = inter_w * inter_h;
    let union = area_a + area_b - intersection;
    if union > 0.0 {
        intersection / union
    } else {
        0.0
    }
}
