//! Borrowed views over the raw prediction tensor.
//!
//! `TensorView` is a rank-3 view `(batch_size, n_boxes, record_len)` into a
//! contiguous, row-major `f32` buffer. Each innermost row is one raw box
//! record; `RecordLayout` knows where scores, offsets, anchors and variances
//! live inside a record. Frame views are zero-copy slices of the same buffer.

use crate::util::{DecodeError, DecodeResult};

mod layout;

pub use layout::{RecordLayout, RECORD_TAIL_LEN};

/// Borrowed rank-3 view of a raw prediction tensor.
#[derive(Copy, Clone, Debug)]
pub struct TensorView<'a> {
    data: &'a [f32],
    batch_size: usize,
    n_boxes: usize,
    record_len: usize,
}

impl<'a> TensorView<'a> {
    /// Creates a view from a buffer and a dynamic shape.
    ///
    /// The shape must have rank 3 and its element count must equal
    /// `data.len()`.
    pub fn new(data: &'a [f32], shape: &[usize]) -> DecodeResult<Self> {
        let &[batch_size, n_boxes, record_len] = shape else {
            return Err(DecodeError::RankMismatch {
                expected: 3,
                got: shape.len(),
            });
        };
        Self::from_parts(data, batch_size, n_boxes, record_len)
    }

    /// Creates a view from explicit dimensions.
    pub fn from_parts(
        data: &'a [f32],
        batch_size: usize,
        n_boxes: usize,
        record_len: usize,
    ) -> DecodeResult<Self> {
        if record_len == 0 {
            return Err(DecodeError::InvalidInput("record length must be non-zero"));
        }
        let expected = batch_size
            .checked_mul(n_boxes)
            .and_then(|v| v.checked_mul(record_len))
            .ok_or(DecodeError::InvalidInput("tensor shape overflows usize"))?;
        if data.len() != expected {
            return Err(DecodeError::BufferLengthMismatch {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            batch_size,
            n_boxes,
            record_len,
        })
    }

    /// Returns the number of images in the batch.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Returns the number of anchor boxes per image.
    pub fn n_boxes(&self) -> usize {
        self.n_boxes
    }

    /// Returns the number of values per box record.
    pub fn record_len(&self) -> usize {
        self.record_len
    }

    /// Returns the shape as `[batch_size, n_boxes, record_len]`.
    pub fn shape(&self) -> [usize; 3] {
        [self.batch_size, self.n_boxes, self.record_len]
    }

    /// Returns the backing slice.
    pub fn as_slice(&self) -> &'a [f32] {
        self.data
    }

    /// Returns a view of the records belonging to image `index`.
    pub fn frame(&self, index: usize) -> Option<FrameView<'a>> {
        if index >= self.batch_size {
            return None;
        }
        let frame_len = self.n_boxes * self.record_len;
        let start = index * frame_len;
        let data = self.data.get(start..start + frame_len)?;
        Some(FrameView {
            data,
            record_len: self.record_len,
        })
    }

    /// Iterates over all frames in batch order.
    pub fn frames(&self) -> impl ExactSizeIterator<Item = FrameView<'a>> + 'a {
        let data = self.data;
        let record_len = self.record_len;
        let frame_len = self.n_boxes * self.record_len;
        (0..self.batch_size).map(move |index| FrameView {
            data: &data[index * frame_len..(index + 1) * frame_len],
            record_len,
        })
    }
}

/// Borrowed view of the box records of a single image.
#[derive(Copy, Clone, Debug)]
pub struct FrameView<'a> {
    data: &'a [f32],
    record_len: usize,
}

impl<'a> FrameView<'a> {
    /// Creates a frame view over `data.len() / record_len` records.
    pub fn from_slice(data: &'a [f32], record_len: usize) -> DecodeResult<Self> {
        if record_len == 0 {
            return Err(DecodeError::InvalidInput("record length must be non-zero"));
        }
        if data.len() % record_len != 0 {
            return Err(DecodeError::BufferLengthMismatch {
                expected: (data.len() / record_len + 1) * record_len,
                got: data.len(),
            });
        }
        Ok(Self { data, record_len })
    }

    /// Returns the number of box records in this frame.
    pub fn n_boxes(&self) -> usize {
        self.data.len() / self.record_len
    }

    /// Returns the number of values per record.
    pub fn record_len(&self) -> usize {
        self.record_len
    }

    /// Returns record `index`, if present.
    pub fn record(&self, index: usize) -> Option<&'a [f32]> {
        let start = index.checked_mul(self.record_len)?;
        let end = start.checked_add(self.record_len)?;
        self.data.get(start..end)
    }

    /// Iterates over the records in anchor order.
    pub fn records(&self) -> std::slice::ChunksExact<'a, f32> {
        self.data.chunks_exact(self.record_len)
    }
}
