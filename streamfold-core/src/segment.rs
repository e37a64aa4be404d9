//! Channel identity and incoming data segments
//!
//! A [`Segment`] is the unit of new data a feed hands to the buffer: a
//! borrowed slice of samples on a regular grid, tagged with a channel
//! identity, a start time, and an optional fold array. Segments are only
//! borrowed for the duration of an append — the buffer copies what it
//! needs and never holds on to the slices.

use core::fmt;

use crate::time::{sample_time, Timestamp};

/// Maximum length for inline channel identifiers
///
/// Dotted network/station/location/channel codes fit comfortably.
pub const MAX_CHANNEL_ID: usize = 15;

/// Inline string for channel identifiers
///
/// Avoids heap allocation for common identifier lengths
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelId {
    len: u8,
    data: [u8; MAX_CHANNEL_ID],
}

impl ChannelId {
    /// Create from string slice
    ///
    /// Returns `None` if the identifier exceeds [`MAX_CHANNEL_ID`] bytes.
    pub fn new(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() > MAX_CHANNEL_ID {
            return None;
        }

        let mut data = [0u8; MAX_CHANNEL_ID];
        data[..bytes.len()].copy_from_slice(bytes);

        Some(Self {
            len: bytes.len() as u8,
            data,
        })
    }

    /// Get as string slice
    pub fn as_str(&self) -> &str {
        // We only store valid UTF-8 from new(), so this should never panic
        core::str::from_utf8(&self.data[..self.len as usize])
            .expect("ChannelId contains invalid UTF-8")
    }
}

impl fmt::Debug for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A caller-supplied chunk of new channel data
///
/// Samples sit on a regular grid: sample `i` is at
/// `start_time + i / sample_rate`. The optional fold array carries one
/// weight per sample; when absent every sample counts as a single
/// observation (fold 1).
#[derive(Clone, Copy, Debug)]
pub struct Segment<'a> {
    /// Channel this data belongs to
    pub channel: ChannelId,
    /// Time of the first sample, microseconds
    pub start_time: Timestamp,
    /// Samples per second
    pub sample_rate: f64,
    /// Sample values
    pub data: &'a [f32],
    /// Per-sample observation weights; `None` means fold 1 throughout
    pub fold: Option<&'a [f32]>,
}

impl<'a> Segment<'a> {
    /// Create a segment with implicit fold 1
    pub fn new(
        channel: ChannelId,
        start_time: Timestamp,
        sample_rate: f64,
        data: &'a [f32],
    ) -> Self {
        Self {
            channel,
            start_time,
            sample_rate,
            data,
            fold: None,
        }
    }

    /// Create a segment carrying an explicit fold array
    pub fn with_fold(
        channel: ChannelId,
        start_time: Timestamp,
        sample_rate: f64,
        data: &'a [f32],
        fold: &'a [f32],
    ) -> Self {
        Self {
            channel,
            start_time,
            sample_rate,
            data,
            fold: Some(fold),
        }
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the segment carries no samples
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Time of the last sample
    ///
    /// Equals `start_time` for a single-sample segment.
    pub fn end_time(&self) -> Timestamp {
        if self.data.is_empty() {
            return self.start_time;
        }
        sample_time(self.start_time, self.data.len() as i64 - 1, self.sample_rate)
    }

    /// Fold of sample `i`, treating an absent fold array as all ones
    pub fn fold_at(&self, i: usize) -> f32 {
        match self.fold {
            Some(fold) => fold[i],
            None => 1.0,
        }
    }

    /// Reject segments the buffer cannot meaningfully place
    pub(crate) fn check(&self) -> Result<(), &'static str> {
        if self.data.is_empty() {
            return Err("segment has no samples");
        }
        if let Some(fold) = self.fold {
            if fold.len() != self.data.len() {
                return Err("fold length does not match data length");
            }
        }
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err("sample rate must be positive and finite");
        }
        Ok(())
    }
}
