//! Anchor-relative centroid offsets to absolute corner boxes.
//!
//! Every box goes through exactly the same arithmetic: no clamping to image
//! bounds and no repair of degenerate extents. Non-finite inputs propagate.

use crate::tensor::{FrameView, RecordLayout};

/// Predicted regression offsets `(dcx, dcy, dw, dh)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxOffsets {
    pub dcx: f32,
    pub dcy: f32,
    pub dw: f32,
    pub dh: f32,
}

/// Anchor box in centroid format.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnchorGeometry {
    pub cx: f32,
    pub cy: f32,
    pub w: f32,
    pub h: f32,
}

/// Per-coordinate variance factors applied to the raw offsets.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Variances {
    pub cx: f32,
    pub cy: f32,
    pub w: f32,
    pub h: f32,
}

/// Absolute box in corner format.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DecodedBox {
    pub xmin: f32,
    pub ymin: f32,
    pub xmax: f32,
    pub ymax: f32,
}

/// Image size used to scale relative coordinates back to pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImageScale {
    pub width: f32,
    pub height: f32,
}

impl From<[f32; 4]> for BoxOffsets {
    fn from([dcx, dcy, dw, dh]: [f32; 4]) -> Self {
        Self { dcx, dcy, dw, dh }
    }
}

impl From<[f32; 4]> for AnchorGeometry {
    fn from([cx, cy, w, h]: [f32; 4]) -> Self {
        Self { cx, cy, w, h }
    }
}

impl From<[f32; 4]> for Variances {
    fn from([cx, cy, w, h]: [f32; 4]) -> Self {
        Self { cx, cy, w, h }
    }
}

impl DecodedBox {
    /// Returns the corners as `[xmin, ymin, xmax, ymax]`.
    pub fn to_array(self) -> [f32; 4] {
        [self.xmin, self.ymin, self.xmax, self.ymax]
    }

    fn scaled(self, scale: ImageScale) -> Self {
        Self {
            xmin: self.xmin * scale.width,
            ymin: self.ymin * scale.height,
            xmax: self.xmax * scale.width,
            ymax: self.ymax * scale.height,
        }
    }
}

/// Decodes one box from its offsets, anchor and variances.
///
/// ```text
/// cx = dcx * vcx * w_a + cx_a        w = exp(dw * vw) * w_a
/// cy = dcy * vcy * h_a + cy_a        h = exp(dh * vh) * h_a
/// ```
///
/// The centroid box is then converted to corners and, when `scale` is set,
/// multiplied by the image width (x) and height (y).
pub fn decode_box(
    offsets: BoxOffsets,
    anchor: AnchorGeometry,
    variances: Variances,
    scale: Option<ImageScale>,
) -> DecodedBox {
    let cx = offsets.dcx * variances.cx * anchor.w + anchor.cx;
    let cy = offsets.dcy * variances.cy * anchor.h + anchor.cy;
    let w = (offsets.dw * variances.w).exp() * anchor.w;
    let h = (offsets.dh * variances.h).exp() * anchor.h;

    let corners = DecodedBox {
        xmin: cx - 0.5 * w,
        ymin: cy - 0.5 * h,
        xmax: cx + 0.5 * w,
        ymax: cy + 0.5 * h,
    };
    match scale {
        Some(scale) => corners.scaled(scale),
        None => corners,
    }
}

/// Decodes a raw record into its box and its non-background class scores.
///
/// The returned slice holds scores for classes `1..n_classes`, unmodified.
pub fn decode_record<'r>(
    record: &'r [f32],
    layout: RecordLayout,
    scale: Option<ImageScale>,
) -> (DecodedBox, &'r [f32]) {
    let decoded = decode_box(
        layout.offsets(record).into(),
        layout.anchor(record).into(),
        layout.variances(record).into(),
        scale,
    );
    let scores = layout.scores(record);
    (decoded, scores.get(1..).unwrap_or_default())
}

/// Decodes every record of a frame, in anchor order.
pub fn decode_frame(
    frame: FrameView<'_>,
    layout: RecordLayout,
    scale: Option<ImageScale>,
) -> Vec<DecodedBox> {
    frame
        .records()
        .map(|record| decode_record(record, layout, scale).0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARIANCES: Variances = Variances {
        cx: 0.1,
        cy: 0.1,
        w: 0.2,
        h: 0.2,
    };

    #[test]
    fn zero_offsets_reproduce_the_anchor() {
        let anchor = AnchorGeometry {
            cx: 10.0,
            cy: 10.0,
            w: 4.0,
            h: 4.0,
        };
        let offsets = BoxOffsets::from([0.0; 4]);
        let decoded = decode_box(offsets, anchor, VARIANCES, None);
        assert_eq!(decoded.to_array(), [8.0, 8.0, 12.0, 12.0]);
    }

    #[test]
    fn offsets_are_scaled_by_variance_and_anchor_size() {
        let anchor = AnchorGeometry::from([10.0, 20.0, 4.0, 8.0]);
        let offsets = BoxOffsets::from([1.0, -1.0, 0.0, 0.0]);
        let decoded = decode_box(offsets, anchor, VARIANCES, None);
        // cx = 1 * 0.1 * 4 + 10, cy = -1 * 0.1 * 8 + 20
        assert!((decoded.xmin - 8.4).abs() < 1e-5);
        assert!((decoded.xmax - 12.4).abs() < 1e-5);
        assert!((decoded.ymin - 15.2).abs() < 1e-5);
        assert!((decoded.ymax - 23.2).abs() < 1e-5);
    }

    #[test]
    fn size_offsets_are_exponential() {
        let anchor = AnchorGeometry::from([0.0, 0.0, 2.0, 2.0]);
        let offsets = BoxOffsets::from([0.0, 0.0, 5.0, -5.0]);
        let decoded = decode_box(offsets, anchor, VARIANCES, None);
        let w = decoded.xmax - decoded.xmin;
        let h = decoded.ymax - decoded.ymin;
        assert!((w - 2.0 * 1.0f32.exp()).abs() < 1e-5);
        assert!((h - 2.0 * (-1.0f32).exp()).abs() < 1e-5);
    }

    #[test]
    fn normalization_scales_x_by_width_and_y_by_height() {
        // Relative corners (0.2, 0.2, 0.3, 0.3).
        let anchor = AnchorGeometry::from([0.25, 0.25, 0.1, 0.1]);
        let offsets = BoxOffsets::from([0.0; 4]);
        let scale = ImageScale {
            width: 200.0,
            height: 100.0,
        };
        let relative = decode_box(offsets, anchor, VARIANCES, None);
        let absolute = decode_box(offsets, anchor, VARIANCES, Some(scale));
        assert_eq!(absolute.xmin, relative.xmin * 200.0);
        assert_eq!(absolute.ymin, relative.ymin * 100.0);
        assert_eq!(absolute.xmax, relative.xmax * 200.0);
        assert_eq!(absolute.ymax, relative.ymax * 100.0);
        assert!((absolute.xmin - 40.0).abs() < 1e-4);
        assert!((absolute.ymax - 30.0).abs() < 1e-4);
    }

    #[test]
    fn degenerate_anchors_pass_through_unclamped() {
        let anchor = AnchorGeometry::from([-5.0, 3.0, -2.0, 0.0]);
        let decoded = decode_box(BoxOffsets::from([0.0; 4]), anchor, VARIANCES, None);
        assert_eq!(decoded.to_array(), [-4.0, 3.0, -6.0, 3.0]);
    }

    #[test]
    fn record_decoding_drops_the_background_score() {
        let layout = RecordLayout::new(3);
        let record = [
            0.7, 0.2, 0.1, // scores
            0.0, 0.0, 0.0, 0.0, // offsets
            10.0, 10.0, 4.0, 4.0, // anchor
            0.1, 0.1, 0.2, 0.2, // variances
        ];
        let (decoded, scores) = decode_record(&record, layout, None);
        assert_eq!(scores, &[0.2, 0.1]);
        assert_eq!(decoded.to_array(), [8.0, 8.0, 12.0, 12.0]);
    }
}
