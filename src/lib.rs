//! ssd-decode turns raw single-shot detector output into final detections.
//!
//! The input is a `(batch_size, n_boxes, n_classes + 12)` tensor of class
//! scores, regression offsets, anchor boxes and variances. Each image is
//! decoded to corner boxes, filtered per class by confidence and greedy
//! IoU suppression, and merged into exactly `top_k` rows sorted by
//! confidence. Parallel decoding is available via the `rayon` feature.

mod candidate;
pub mod decode;
pub mod lowlevel;
mod pipeline;
pub mod tensor;
mod trace;
pub mod util;

pub use candidate::{Detection, FrameResult};
pub use decode::DecodedBox;
pub use pipeline::{BatchResult, BoxFormat, DecodeConfig, Decoder, OUTPUT_ROW_LEN};
pub use tensor::{FrameView, TensorView};
pub use util::{DecodeError, DecodeResult};
