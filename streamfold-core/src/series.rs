//! Aligned sample/fold storage and in-place merge primitives
//!
//! ## Overview
//!
//! [`FoldSeries`] is the storage half of the sliding buffer: two parallel
//! fixed-capacity arrays (sample values and fold weights) on a regular time
//! grid, plus the timing metadata that anchors them. The buffer owns one by
//! value and drives it through three primitives:
//!
//! - `rebuild` — trim/pad a segment into a fresh window (first append)
//! - `shift_to` — re-anchor the trailing edge, evicting the oldest samples
//! - `combine` — fold an overlapping segment into place
//!
//! Keeping these generic operations on the series and all policy (window
//! span, merge method choice, append classification) on the buffer keeps
//! this type reusable and keeps the buffer small.
//!
//! ## Fold semantics
//!
//! The fold array carries one weight per sample: 0 means the position holds
//! no data (only fill), 1 a single observation, >1 merged observations.
//! Every primitive here maintains the invariant that a position has fold 0
//! exactly when it was written with the fill value.
//!
//! ## Storage
//!
//! Storage is `heapless::Vec<f32, N>` with the capacity fixed at compile
//! time. The active length is decided once per (re)initialization from the
//! window span and sample rate, and both arrays always share it. All
//! operations are in-place; nothing here allocates.

use heapless::Vec;

use crate::errors::{BufferError, BufferResult};
use crate::segment::Segment;
use crate::time::{sample_offset, sample_time, Timestamp};

/// Policy for reconciling a sample position observed by both sides
///
/// Applied per position by [`FoldSeries::combine`] wherever the incoming
/// segment and the buffered window genuinely overlap (both folds nonzero).
/// One-sided positions never consult the method: the nonzero side wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MergeMethod {
    /// Conflicting data is discarded: the position becomes fill with fold 0
    MaskZero = 0,
    /// Keep the larger value; folds accumulate
    MaxCombine = 1,
    /// Fold-weighted average of both values; folds accumulate
    AverageCombine = 2,
}

impl MergeMethod {
    /// Get human-readable name
    pub const fn name(&self) -> &'static str {
        match self {
            MergeMethod::MaskZero => "mask_zero",
            MergeMethod::MaxCombine => "max_combine",
            MergeMethod::AverageCombine => "average_combine",
        }
    }
}

impl Default for MergeMethod {
    fn default() -> Self {
        MergeMethod::AverageCombine
    }
}

/// Fixed-capacity sample/fold arrays on a regular time grid
///
/// ## Type Parameter
///
/// - `N`: compile-time capacity in samples. The active length (set by the
///   owner at initialization) may be anything up to `N` and stays constant
///   afterwards.
///
/// ## Internal Invariants
///
/// - `data.len() == fold.len()` at all times
/// - sample `i` sits at `start_time + i / sample_rate`
/// - `fold[i] == 0` exactly where `data[i]` is fill, not real content
#[derive(Debug, Clone)]
pub struct FoldSeries<const N: usize> {
    /// Sample values, active prefix of the capacity
    data: Vec<f32, N>,
    /// Observation weights, always the same length as `data`
    fold: Vec<f32, N>,
    /// Time of sample 0, microseconds
    start_time: Timestamp,
    /// Samples per second
    sample_rate: f64,
}

impl<const N: usize> FoldSeries<N> {
    /// Create an empty series with no grid established yet
    pub const fn empty() -> Self {
        Self {
            data: Vec::new(),
            fold: Vec::new(),
            start_time: 0,
            sample_rate: 0.0,
        }
    }

    /// Sample values (active length only)
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Fold weights (active length only)
    pub fn fold(&self) -> &[f32] {
        &self.fold
    }

    /// Active length in samples
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check whether any grid has been established
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Compile-time capacity in samples
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Time of sample 0
    pub fn start_time(&self) -> Timestamp {
        self.start_time
    }

    /// Samples per second
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Time of the last sample; equals `start_time` while empty
    pub fn end_time(&self) -> Timestamp {
        if self.data.is_empty() {
            return self.start_time;
        }
        sample_time(self.start_time, self.data.len() as i64 - 1, self.sample_rate)
    }

    /// Time of sample `i`
    pub fn time_of(&self, i: usize) -> Timestamp {
        sample_time(self.start_time, i as i64, self.sample_rate)
    }

    /// Re-establish the grid and populate it from a segment
    ///
    /// Trim-and-pad in one pass: every position in the new window is
    /// written — from the segment where it has a sample with nonzero fold
    /// (nearest-sample mapping), fill/fold-0 everywhere else. The previous
    /// contents and grid are discarded wholesale.
    ///
    /// The caller has already checked `len <= N`.
    pub fn rebuild(
        &mut self,
        start_time: Timestamp,
        sample_rate: f64,
        len: usize,
        segment: &Segment<'_>,
        fill: f32,
    ) {
        debug_assert!(len <= N);
        self.start_time = start_time;
        self.sample_rate = sample_rate;
        self.data.clear();
        self.fold.clear();
        let _ = self.data.resize(len, fill);
        let _ = self.fold.resize(len, 0.0);

        for i in 0..len {
            let j = sample_offset(self.time_of(i), segment.start_time, sample_rate);
            if j < 0 || j as usize >= segment.len() {
                continue;
            }
            let f = segment.fold_at(j as usize);
            if f > 0.0 {
                self.data[i] = segment.data[j as usize];
                self.fold[i] = f;
            }
        }
    }

    /// Re-anchor the trailing edge to the grid point nearest `new_end`
    ///
    /// Content slides toward the front by the shift amount; positions
    /// exposed at the tail become fill/fold-0. Content pushed off the front
    /// is irrecoverably dropped. The active length never changes.
    ///
    /// Rewinding is a caller bug and fails loudly instead of clamping.
    pub fn shift_to(&mut self, new_end: Timestamp, fill: f32) -> BufferResult<()> {
        let end = self.end_time();
        if new_end < end {
            return Err(BufferError::ShiftRewind {
                end_us: end,
                requested_us: new_end,
            });
        }

        let shift = sample_offset(new_end, end, self.sample_rate);
        if shift == 0 {
            return Ok(());
        }

        let len = self.data.len();
        if (shift as usize) < len {
            let keep_from = shift as usize;
            self.data.copy_within(keep_from.., 0);
            self.fold.copy_within(keep_from.., 0);
            for i in len - keep_from..len {
                self.data[i] = fill;
                self.fold[i] = 0.0;
            }
        } else {
            // The whole window slid past its own contents
            for i in 0..len {
                self.data[i] = fill;
                self.fold[i] = 0.0;
            }
        }

        self.start_time = sample_time(self.start_time, shift, self.sample_rate);
        Ok(())
    }

    /// Fold an overlapping segment into place
    ///
    /// Segment samples are matched to grid positions by nearest-sample
    /// alignment; positions outside the shared time range are untouched,
    /// as are positions where the segment's own fold is 0. Where only one
    /// side has data the nonzero side is adopted; genuine overlaps are
    /// resolved per `method`.
    pub fn combine(&mut self, segment: &Segment<'_>, method: MergeMethod, fill: f32) {
        if self.data.is_empty() || segment.is_empty() {
            return;
        }

        let len = self.data.len();
        let lo = sample_offset(segment.start_time, self.start_time, self.sample_rate).max(0);
        let hi = sample_offset(segment.end_time(), self.start_time, self.sample_rate)
            .min(len as i64 - 1);

        let mut i = lo;
        while i <= hi {
            let pos = i as usize;
            i += 1;

            let j = sample_offset(self.time_of(pos), segment.start_time, segment.sample_rate);
            if j < 0 || j as usize >= segment.len() {
                continue;
            }
            let seg_fold = segment.fold_at(j as usize);
            if seg_fold <= 0.0 {
                continue;
            }
            let seg_value = segment.data[j as usize];
            let buf_fold = self.fold[pos];

            // One-sided position: adopt the segment outright
            if buf_fold <= 0.0 {
                self.data[pos] = seg_value;
                self.fold[pos] = seg_fold;
                continue;
            }

            match method {
                MergeMethod::MaskZero => {
                    self.data[pos] = fill;
                    self.fold[pos] = 0.0;
                }
                MergeMethod::MaxCombine => {
                    self.data[pos] = self.data[pos].max(seg_value);
                    self.fold[pos] = buf_fold + seg_fold;
                }
                MergeMethod::AverageCombine => {
                    self.data[pos] = (self.data[pos] * buf_fold + seg_value * seg_fold)
                        / (buf_fold + seg_fold);
                    self.fold[pos] = buf_fold + seg_fold;
                }
            }
        }
    }
}
