//! SSTV error types with granular categories.
//!
//! Configuration errors are the only errors the public API returns; see
//! module docs on [`crate::encoder`] and [`crate::decoder`] for why
//! `generate`/`feed` never surface an `Err` for anything other than
//! malformed construction parameters.

use thiserror::Error;

/// Top-level error type for all SSTV operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SstvError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("DSP error: {0}")]
    Dsp(#[from] DspError),
}

/// Errors raised at `create`/`set_image` time.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("unknown mode identifier: {0:?}")]
    UnknownMode(String),

    #[error("invalid sample rate: {rate} Hz (must be > 0)")]
    InvalidSampleRate { rate: f64 },

    #[error("image size mismatch: mode expects {expected_w}x{expected_h}, got {actual_w}x{actual_h}")]
    ImageSizeMismatch {
        expected_w: u32,
        expected_h: u32,
        actual_w: u32,
        actual_h: u32,
    },

    #[error("image row stride {stride} is too small for width {width} in format {format}")]
    ImageStrideTooSmall {
        stride: usize,
        width: u32,
        format: &'static str,
    },

    #[error("VIS tone mapping out of range: mark={mark_hz} Hz, space={space_hz} Hz")]
    InvalidVisTones { mark_hz: f64, space_hz: f64 },
}

/// Errors raised constructing DSP primitives (filter designers).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DspError {
    #[error("FIR tap count must be even and positive, got {0}")]
    InvalidTapCount(usize),

    #[error("filter design failed: {reason}")]
    FilterDesignFailed { reason: String },

    #[error("IIR filter order must be in 1..=16, got {0}")]
    InvalidFilterOrder(usize),
}

/// Result type alias for SSTV operations.
pub type Result<T> = std::result::Result<T, SstvError>;
