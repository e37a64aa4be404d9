//! Sliding fold-weighted window over one channel's data
//!
//! ## Overview
//!
//! [`SlidingBuffer`] maintains a fixed-duration window of the most recent
//! data on a single channel, reconciling segments that may arrive
//! overlapping, gapped, or out of order. The window is always anchored to
//! the latest end time seen; older content slides out the front and is
//! gone.
//!
//! ## Append classification
//!
//! Every append lands in exactly one of four cases:
//!
//! ```text
//!                      ┌── empty? ──────────────→ first append
//! append(segment) ─────┤
//!                      │   new_end   = max(segment end, window end)
//!                      │   new_start = new_end - max_span
//!                      │
//!                      ├── new_start > window end ──→ reset + first append
//!                      ├── new_start > segment end ─→ rejected as stale
//!                      └── otherwise ───────────────→ shift + combine
//! ```
//!
//! Because the window is re-anchored to the latest end time on every
//! accepted append, the two disjoint cases above are the only rejections
//! needed; near-past, near-future and fully-interior segments all take the
//! join path.
//!
//! Note the far-future comparison is against the *window's* end, not the
//! segment's own start: a short segment landing just past the window end
//! still forces a full reset when `max_span` is small. That favors recency
//! aggressively and is intended behavior.
//!
//! ## Concurrency
//!
//! One writer per channel instance. No internal locking, no I/O, no
//! blocking; every operation completes synchronously. Callers managing
//! multiple channels give each its own buffer.

use crate::errors::{BufferError, BufferResult};
use crate::segment::{ChannelId, Segment};
use crate::series::{FoldSeries, MergeMethod};
use crate::time::{secs_to_micros, sample_time, Timestamp};

// Macros for optional logging
#[cfg(feature = "log")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "log")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

/// Upper bound on the window span in seconds
pub const MAX_SPAN_SECS: f64 = 1200.0;

/// Default fill value for unobserved positions ("no fill" sentinel)
pub const DEFAULT_FILL: f32 = f32::NAN;

/// Sliding fold-weighted buffer for one channel
///
/// ## Type Parameter
///
/// - `N`: compile-time capacity in samples. Must cover
///   `round(max_span * sample_rate)` for the channel's rate, which is
///   checked at first append; pick the capacity for the fastest channel a
///   deployment buffers.
///
/// ## Lifecycle
///
/// Created empty; the first accepted segment establishes channel identity,
/// sample rate, window grid and length. From then on the buffer mutates in
/// place — it is never shrunk or destroyed mid-run, and identity and rate
/// are immutable until a far-future segment forces a full
/// re-initialization.
///
/// ## Example
///
/// ```rust
/// use streamfold_core::{ChannelId, MergeMethod, Segment, SlidingBuffer, DEFAULT_FILL};
///
/// let chan = ChannelId::new("NW.STA01..HHZ").unwrap();
/// let mut buffer: SlidingBuffer<64> =
///     SlidingBuffer::new(10.0, MergeMethod::AverageCombine, DEFAULT_FILL).unwrap();
///
/// let samples = [1.0, 2.0, 3.0, 4.0, 5.0];
/// buffer.append(&Segment::new(chan, 0, 1.0, &samples)).unwrap();
///
/// assert_eq!(buffer.len(), 10);          // round(10 s * 1 Hz)
/// assert_eq!(buffer.end_time(), 4_000_000);
/// ```
#[derive(Debug)]
pub struct SlidingBuffer<const N: usize> {
    /// Window storage and grid
    series: FoldSeries<N>,
    /// Identity captured at first append
    channel: Option<ChannelId>,
    /// Window capacity in seconds
    max_span: f64,
    /// Policy for genuinely overlapping positions
    method: MergeMethod,
    /// Value written at unobserved positions
    fill_value: f32,
    /// Lifecycle flag: no grid established yet
    empty: bool,
    /// Joins merged into the current lineage
    merged: u32,
}

impl<const N: usize> SlidingBuffer<N> {
    /// Create an empty buffer
    ///
    /// `max_span` is the window capacity in seconds and must lie in
    /// `(0, 1200]`; anything else is an [`BufferError::InvalidSpan`].
    pub fn new(max_span: f64, method: MergeMethod, fill_value: f32) -> BufferResult<Self> {
        if !max_span.is_finite() || max_span <= 0.0 || max_span > MAX_SPAN_SECS {
            return Err(BufferError::InvalidSpan { span: max_span });
        }
        Ok(Self {
            series: FoldSeries::empty(),
            channel: None,
            max_span,
            method,
            fill_value,
            empty: true,
            merged: 0,
        })
    }

    /// Create an empty buffer with average merging and NaN fill
    pub fn with_defaults(max_span: f64) -> BufferResult<Self> {
        Self::new(max_span, MergeMethod::default(), DEFAULT_FILL)
    }

    /// Add a segment of channel data, favoring the most recent data seen
    ///
    /// Classifies the segment as first append, far-future (window reset),
    /// far-past (rejected stale), or join (shift + in-place combine) — see
    /// the module docs. On any error the buffer is untouched.
    pub fn append(&mut self, segment: &Segment<'_>) -> BufferResult<()> {
        if let Err(reason) = segment.check() {
            return Err(BufferError::MalformedSegment { reason });
        }

        if let Some(expected) = self.channel {
            if expected != segment.channel {
                return Err(BufferError::ChannelMismatch {
                    expected,
                    got: segment.channel,
                });
            }
            let expected_rate = self.series.sample_rate();
            if expected_rate != segment.sample_rate {
                return Err(BufferError::RateMismatch {
                    expected: expected_rate,
                    got: segment.sample_rate,
                });
            }
        }

        if self.empty {
            return self.first_append(segment);
        }

        let window_end = self.series.end_time();
        let segment_end = segment.end_time();
        let new_end = segment_end.max(window_end);
        let new_start = new_end - secs_to_micros(self.max_span);

        // Far future: the merged window would start past everything we
        // hold, so nothing buffered is worth keeping.
        if new_start > window_end {
            log_warn!(
                "{}: segment ending {} us postdates window end {} us, resetting",
                segment.channel,
                segment_end,
                window_end
            );
            return self.first_append(segment);
        }

        // Far past: the segment ends before the merged window even begins.
        if new_start > segment_end {
            let lag_us = new_start - segment_end;
            log_warn!(
                "{}: rejected stale segment, predates window scope by {} us",
                segment.channel,
                lag_us
            );
            return Err(BufferError::StaleSegment { lag_us });
        }

        // Join: everything else lives within one window of new_end.
        self.shift(new_end)?;
        self.series.combine(segment, self.method, self.fill_value);
        self.merged = self.merged.saturating_add(1);
        log_debug!(
            "{}: joined {}-sample segment, window now ends {} us",
            segment.channel,
            segment.len(),
            self.series.end_time()
        );
        Ok(())
    }

    /// Establish (or re-establish) the window from a single segment
    ///
    /// The window ends at the segment's last sample and extends one span
    /// into the past; the segment is trimmed/padded to fit. Starts a fresh
    /// lineage: the join counter resets.
    fn first_append(&mut self, segment: &Segment<'_>) -> BufferResult<()> {
        let len = window_samples(self.max_span, segment.sample_rate);
        if len > N {
            return Err(BufferError::CapacityExceeded {
                required: len,
                available: N,
            });
        }

        let end = segment.end_time();
        let start = sample_time(end, -(len as i64 - 1), segment.sample_rate);
        self.series
            .rebuild(start, segment.sample_rate, len, segment, self.fill_value);
        self.channel = Some(segment.channel);
        self.merged = 0;
        self.empty = false;
        log_debug!(
            "{}: initialized {}-sample window ending {} us",
            segment.channel,
            len,
            end
        );
        Ok(())
    }

    /// Re-anchor the window's trailing edge, evicting the oldest content
    ///
    /// Only called from the join path, where `new_end` can never precede
    /// the current end; a rewind is a dispatch bug and fails loudly.
    fn shift(&mut self, new_end: Timestamp) -> BufferResult<()> {
        self.series.shift_to(new_end, self.fill_value)
    }

    /// Check whether any data has been accepted yet
    pub fn is_empty(&self) -> bool {
        self.empty
    }

    /// Window length in samples; 0 while empty
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Sample values of the active window (read-only snapshot)
    pub fn data(&self) -> &[f32] {
        self.series.data()
    }

    /// Fold weights of the active window (read-only snapshot)
    pub fn fold(&self) -> &[f32] {
        self.series.fold()
    }

    /// Time of the oldest sample; meaningless while empty
    pub fn start_time(&self) -> Timestamp {
        self.series.start_time()
    }

    /// Time of the newest sample; meaningless while empty
    pub fn end_time(&self) -> Timestamp {
        self.series.end_time()
    }

    /// Samples per second; meaningless while empty
    pub fn sample_rate(&self) -> f64 {
        self.series.sample_rate()
    }

    /// Identity captured at first append
    pub fn channel(&self) -> Option<ChannelId> {
        self.channel
    }

    /// Window capacity in seconds
    pub fn max_span(&self) -> f64 {
        self.max_span
    }

    /// Merge policy fixed at construction
    pub fn method(&self) -> MergeMethod {
        self.method
    }

    /// Value written at unobserved positions
    pub fn fill_value(&self) -> f32 {
        self.fill_value
    }

    /// Joins merged since the current lineage began
    pub fn merged(&self) -> u32 {
        self.merged
    }

    /// Fraction of window positions holding real data (nonzero fold)
    pub fn coverage(&self) -> f32 {
        let len = self.series.len();
        if len == 0 {
            return 0.0;
        }
        let observed = self.series.fold().iter().filter(|&&f| f > 0.0).count();
        observed as f32 / len as f32
    }
}

/// Window length in samples for a span/rate pair, never less than one
fn window_samples(span_secs: f64, sample_rate: f64) -> usize {
    let samples = libm::round(span_secs * sample_rate) as i64;
    samples.max(1) as usize
}
