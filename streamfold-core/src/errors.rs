//! Error types for buffer construction and appends
//!
//! Errors are kept small and `Copy` — they are returned on the append hot
//! path and may be queued by callers. All data is inline: numeric payloads
//! and `&'static str` reasons only, no heap allocation.
//!
//! Every operation either fully succeeds (buffer invariants hold) or fully
//! fails (buffer unchanged); no variant here is ever paired with a partial
//! mutation. None are retried internally — re-delivering a segment later is
//! caller policy.

use thiserror_no_std::Error;

use crate::segment::ChannelId;
use crate::time::Timestamp;

/// Result type for buffer operations
pub type BufferResult<T> = Result<T, BufferError>;

/// Errors raised by buffer construction and appends
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum BufferError {
    /// Window span outside the accepted range at construction
    #[error("window span {span}s outside (0, 1200]")]
    InvalidSpan {
        /// The rejected span in seconds
        span: f64,
    },

    /// The configured window does not fit the compile-time capacity
    #[error("window needs {required} samples, capacity is {available}")]
    CapacityExceeded {
        /// Samples required by `span * sample_rate`
        required: usize,
        /// Compile-time capacity of the buffer
        available: usize,
    },

    /// Segment cannot be placed on any sample grid
    #[error("malformed segment: {reason}")]
    MalformedSegment {
        reason: &'static str,
    },

    /// Segment belongs to a different channel than the buffered data
    #[error("channel mismatch: buffer holds {expected}, segment is {got}")]
    ChannelMismatch {
        /// Identity captured at first append
        expected: ChannelId,
        /// Identity of the rejected segment
        got: ChannelId,
    },

    /// Segment is sampled at a different rate than the buffered data
    #[error("sample rate mismatch: buffer at {expected} Hz, segment at {got} Hz")]
    RateMismatch {
        /// Rate captured at first append
        expected: f64,
        /// Rate of the rejected segment
        got: f64,
    },

    /// Segment ends before the window that would result from accepting it
    #[error("stale segment predates window scope by {lag_us} us")]
    StaleSegment {
        /// How far the segment ends before the window start, microseconds
        lag_us: i64,
    },

    /// Attempt to move the window's trailing edge backwards
    #[error("cannot rewind window: end is {end_us} us, requested {requested_us} us")]
    ShiftRewind {
        /// Current trailing edge, microseconds
        end_us: Timestamp,
        /// Requested trailing edge, microseconds
        requested_us: Timestamp,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for BufferError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::InvalidSpan { span } =>
                defmt::write!(fmt, "span {}s outside (0, 1200]", span),
            Self::CapacityExceeded { required, available } =>
                defmt::write!(fmt, "window needs {} samples, capacity {}", required, available),
            Self::MalformedSegment { reason } =>
                defmt::write!(fmt, "malformed segment: {}", reason),
            Self::ChannelMismatch { expected, got } =>
                defmt::write!(fmt, "channel mismatch: {} vs {}", expected.as_str(), got.as_str()),
            Self::RateMismatch { expected, got } =>
                defmt::write!(fmt, "rate mismatch: {} Hz vs {} Hz", expected, got),
            Self::StaleSegment { lag_us } =>
                defmt::write!(fmt, "stale segment, predates window by {} us", lag_us),
            Self::ShiftRewind { end_us, requested_us } =>
                defmt::write!(fmt, "window rewind: end {} us, requested {} us", end_us, requested_us),
        }
    }
}
