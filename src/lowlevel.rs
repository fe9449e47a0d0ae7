//! Low-level building blocks for custom decode pipelines.
//!
//! These expose the individual decode, suppression and merge stages for
//! callers that want to run them outside of [`crate::Decoder`]. Most users
//! should prefer the top-level `DecodeConfig` and `Decoder` types.

pub use crate::candidate::nms::{filter_class, nms_greedy, FilterParams};
pub use crate::candidate::topk::{select_top_k, TopK};
pub use crate::candidate::{ClassBlock, PaddedDetections};
pub use crate::decode::{
    decode_box, decode_frame, decode_record, AnchorGeometry, BoxOffsets, ImageScale, Variances,
};
pub use crate::tensor::{RecordLayout, RECORD_TAIL_LEN};
pub use crate::util::math::iou;
