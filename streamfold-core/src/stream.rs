//! Pull-based segment sources
//!
//! The buffer itself never decides when to ingest; a feed drives it. This
//! module defines that seam as a pull-based, non-blocking trait using the
//! `nb` crate — consumers control when to read, `nb::Error::WouldBlock`
//! signals "nothing yet", and no async runtime is required.
//!
//! A production feed (socket reader, ring-buffer tap, file replayer)
//! implements [`SegmentStream`] out of crate; the in-memory implementation
//! here exists for tests, examples, and replaying recorded data.

use core::fmt;

use crate::segment::Segment;

/// Errors that can occur while pulling segments from a source
#[derive(Debug, Clone, PartialEq)]
pub enum StreamError<E> {
    /// Transport-level error (e.g., I/O error)
    Transport(E),
    /// Data format error
    Format(&'static str),
    /// End of stream reached
    EndOfStream,
}

impl<E: fmt::Display> fmt::Display for StreamError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "Transport error: {}", e),
            Self::Format(msg) => write!(f, "Format error: {}", msg),
            Self::EndOfStream => write!(f, "End of stream"),
        }
    }
}

/// Pull-based source of data segments
///
/// ## Implementation Notes
///
/// - Implementations should be lazy and pull-based
/// - Use `nb::Error::WouldBlock` when no data is available yet
/// - Segments reference storage owned elsewhere for at least `'a`;
///   the buffer copies what it keeps, so handing the same backing
///   storage out repeatedly is fine
pub trait SegmentStream<'a> {
    /// Transport-level error type
    type Error;

    /// Pull the next segment
    fn poll_next(&mut self) -> nb::Result<Segment<'a>, StreamError<Self::Error>>;

    /// Bounds on the number of remaining segments, `(lower, upper)`
    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, None)
    }
}

/// Memory-based stream for testing and replay
///
/// ## Use Cases
///
/// 1. **Unit testing**: feed known segment sequences
/// 2. **Replay**: re-process recorded data
/// 3. **Simulation**: drive a buffer from synthetic feeds
#[cfg(feature = "stream-memory")]
pub struct MemoryStream<'a> {
    /// Slice of segments to stream
    segments: &'a [Segment<'a>],
    /// Current position
    position: usize,
}

#[cfg(feature = "stream-memory")]
impl<'a> MemoryStream<'a> {
    /// Create new memory stream from slice
    pub fn new(segments: &'a [Segment<'a>]) -> Self {
        Self {
            segments,
            position: 0,
        }
    }

    /// Reset to beginning
    pub fn reset(&mut self) {
        self.position = 0;
    }

    /// Get current position
    pub fn position(&self) -> usize {
        self.position
    }

    /// Check if stream is exhausted
    pub fn is_exhausted(&self) -> bool {
        self.position >= self.segments.len()
    }
}

#[cfg(feature = "stream-memory")]
impl<'a> SegmentStream<'a> for MemoryStream<'a> {
    type Error = ();

    fn poll_next(&mut self) -> nb::Result<Segment<'a>, StreamError<()>> {
        if self.position >= self.segments.len() {
            return Err(nb::Error::Other(StreamError::EndOfStream));
        }

        let segment = self.segments[self.position];
        self.position += 1;
        Ok(segment)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.segments.len() - self.position;
        (remaining, Some(remaining))
    }
}
