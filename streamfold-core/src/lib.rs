//! Sliding fold-weighted buffering for streamed time-series channels
//!
//! Maintains a fixed-duration window of the most recent data on a single
//! channel, reconciling segments that arrive overlapping, gapped, or out
//! of order. Every sample carries a fold weight counting the independent
//! observations behind it (0 = no data), and overlaps are resolved by a
//! configurable merge policy.
//!
//! Designed for long-running monitoring processes on anything from servers
//! to edge hardware: no_std capable, fixed-capacity storage, no
//! allocation on the append path.
//!
//! ```no_run
//! use streamfold_core::{ChannelId, Segment, SlidingBuffer};
//!
//! let chan = ChannelId::new("NW.STA01..HHZ").unwrap();
//! let mut buffer: SlidingBuffer<1024> = SlidingBuffer::with_defaults(10.0).unwrap();
//!
//! let samples = [0.1, 0.3, 0.2, 0.5];
//! buffer.append(&Segment::new(chan, 0, 1.0, &samples)).unwrap();
//!
//! // downstream consumers read snapshots, never mutate
//! let _window = buffer.data();
//! let _weights = buffer.fold();
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod buffer;
pub mod errors;
pub mod segment;
pub mod series;
pub mod stream;
pub mod time;

// Public API
pub use buffer::{SlidingBuffer, DEFAULT_FILL, MAX_SPAN_SECS};
pub use errors::{BufferError, BufferResult};
pub use segment::{ChannelId, Segment, MAX_CHANNEL_ID};
pub use series::{FoldSeries, MergeMethod};
pub use time::Timestamp;

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
