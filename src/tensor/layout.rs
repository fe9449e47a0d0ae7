//! Field offsets inside a raw box record.

/// Number of values that follow the class scores in every record:
/// 4 offsets, 4 anchor values and 4 variances.
pub const RECORD_TAIL_LEN: usize = 12;

/// Layout of a raw box record with `n_classes` leading scores.
///
/// ```text
/// [score_0 .. score_{n-1} | dcx dcy dw dh | cx_a cy_a w_a h_a | vcx vcy vw vh]
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RecordLayout {
    n_classes: usize,
}

impl RecordLayout {
    /// Creates a layout for `n_classes` scores (background included).
    pub fn new(n_classes: usize) -> Self {
        Self { n_classes }
    }

    /// Returns the number of class scores per record.
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Returns the total record length, `n_classes + 12`.
    pub fn record_len(&self) -> usize {
        self.n_classes + RECORD_TAIL_LEN
    }

    /// Returns the class scores, background slot included.
    #[inline]
    pub fn scores<'r>(&self, record: &'r [f32]) -> &'r [f32] {
        &record[..self.n_classes]
    }

    /// Returns `(dcx, dcy, dw, dh)`.
    #[inline]
    pub fn offsets(&self, record: &[f32]) -> [f32; 4] {
        self.quad(record, 0)
    }

    /// Returns `(cx_a, cy_a, w_a, h_a)`.
    #[inline]
    pub fn anchor(&self, record: &[f32]) -> [f32; 4] {
        self.quad(record, 4)
    }

    /// Returns `(vcx, vcy, vw, vh)`.
    #[inline]
    pub fn variances(&self, record: &[f32]) -> [f32; 4] {
        self.quad(record, 8)
    }

    #[inline]
    fn quad(&self, record: &[f32], skip: usize) -> [f32; 4] {
        let base = self.n_classes + skip;
        [
            record[base],
            record[base + 1],
            record[base + 2],
            record[base + 3],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::RecordLayout;

    #[test]
    fn fields_are_read_in_fixed_order() {
        let layout = RecordLayout::new(3);
        let record: Vec<f32> = (0..15).map(|v| v as f32).collect();
        assert_eq!(layout.record_len(), 15);
        assert_eq!(layout.scores(&record), &[0.0, 1.0, 2.0]);
        assert_eq!(layout.offsets(&record), [3.0, 4.0, 5.0, 6.0]);
        assert_eq!(layout.anchor(&record), [7.0, 8.0, 9.0, 10.0]);
        assert_eq!(layout.variances(&record), [11.0, 12.0, 13.0, 14.0]);
    }
}
