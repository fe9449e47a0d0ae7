//! Span and event macros for the decode pipeline.
//!
//! `Decoder::decode` opens a `decode_batch` span and each image gets a
//! `decode_frame` span closed by a `frame_detections` event carrying the
//! number of real rows. With the `tracing` feature these map onto
//! `tracing::info_span!` and `tracing::info!`; otherwise spans become
//! `NoopSpan` and events only evaluate their fields.

/// Opens an info span for a batch or frame decode, e.g. `decode_frame`.
#[cfg(feature = "tracing")]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        tracing::info_span!($name $(, $($field)*)?)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        $crate::trace::NoopSpan
    };
}

/// Records a decode outcome such as the number of detections in a frame.
///
/// Field values are evaluated even when tracing is compiled out.
#[cfg(feature = "tracing")]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        tracing::info!(name: $name, $($key = $value),+)
    };
    ($name:expr) => {
        tracing::info!(name: $name)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        let _ = ($($value,)+);
    };
    ($name:expr) => {};
}

pub(crate) use trace_event;
pub(crate) use trace_span;

/// Guard returned by `trace_span!` when tracing is compiled out.
#[cfg(not(feature = "tracing"))]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    /// No-op counterpart of `Span::entered()`.
    #[inline]
    pub fn entered(self) -> Self {
        self
    }
}
