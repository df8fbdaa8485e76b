//! The single error type surfaced by the encode path.
//!
//! The decode path never errors: noisy audio, missing sync and partial
//! frames are absorbed silently and simply fail to yield a [`FrameBitsExt`]
//! (see [`crate::decode`]). `LtcError` only covers the encoder's argument
//! validation and buffer-sizing failures.
//!
//! [`FrameBitsExt`]: crate::decode::FrameBitsExt

/// Errors returned by the [`Encoder`](crate::encode::Encoder) API.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum LtcError {
    /// `encode_byte` was called with a byte index outside `0..=9`.
    #[error("byte index {0} out of range 0..=9")]
    InvalidByteIndex(u8),

    /// `encode_byte` was called with a playback speed of zero.
    #[error("encode speed must be nonzero")]
    ZeroSpeed,

    /// A frame rate was supplied that the encoder has no drop-frame/layout
    /// convention for.
    #[error("unsupported frame rate: {0}")]
    UnknownFps(f64),

    /// Rendering the requested symbol would overflow the output buffer.
    #[error("encoder output buffer overflow: {used}/{capacity}")]
    BufferOverflow { used: usize, capacity: usize },

    /// A buffer (re)allocation could not satisfy the request, e.g.
    /// `reinit`/`set_buffer_size` to a buffer smaller than one LTC frame.
    #[error("allocation failed")]
    AllocationFailure,
}

/// Convenience alias used throughout the encoder.
pub type Result<T> = core::result::Result<T, LtcError>;
