//! Time representation for buffered channel data
//!
//! Timestamps are signed microseconds since an arbitrary epoch. The buffer
//! only ever subtracts timestamps and converts between durations and sample
//! counts, so the epoch itself never matters — a feed may use Unix time,
//! GPS time, or seconds-since-boot as long as it is consistent per channel.
//!
//! Microsecond resolution gives sub-millisecond headroom for nearest-sample
//! alignment at any realistic sampling rate. Signed, because a window
//! anchored to its trailing edge can start before the epoch (a segment
//! ending 4 s after the epoch inside a 10 s window starts at -5 s).

/// Timestamp in microseconds since an arbitrary, per-channel epoch
pub type Timestamp = i64;

/// Microseconds per second
pub const MICROS_PER_SEC: i64 = 1_000_000;

/// Convert a duration in seconds to microseconds, rounding to nearest
pub fn secs_to_micros(secs: f64) -> i64 {
    libm::round(secs * MICROS_PER_SEC as f64) as i64
}

/// Convert a duration in microseconds to seconds
pub fn micros_to_secs(micros: i64) -> f64 {
    micros as f64 / MICROS_PER_SEC as f64
}

/// Nearest sample index of `t` on the grid anchored at `origin`
///
/// May be negative or past the end of any particular array; callers bound
/// the result themselves. Computed in f64 from the grid origin rather than
/// by repeated addition, so alignment does not drift over long windows.
pub fn sample_offset(t: Timestamp, origin: Timestamp, sample_rate: f64) -> i64 {
    let dt_secs = (t - origin) as f64 / MICROS_PER_SEC as f64;
    libm::round(dt_secs * sample_rate) as i64
}

/// Timestamp of sample `index` on the grid anchored at `origin`
pub fn sample_time(origin: Timestamp, index: i64, sample_rate: f64) -> Timestamp {
    origin + libm::round(index as f64 * MICROS_PER_SEC as f64 / sample_rate) as i64
}
