//! End-to-end append scenarios for the sliding buffer
//!
//! Each test drives the public API the way a feed would: construct,
//! append segments in various temporal orders, read back snapshots.

mod common;

use common::{assert_is_gap, chan, ramp, secs, NoiseGen};
use proptest::prelude::*;
use streamfold_core::{
    BufferError, ChannelId, MergeMethod, Segment, SlidingBuffer, DEFAULT_FILL,
};

/// Bit-exact snapshot of buffer content, for before/after comparisons
/// where NaN fill makes `==` useless
fn snapshot<const N: usize>(buffer: &SlidingBuffer<N>) -> (Vec<u32>, Vec<f32>, i64, bool) {
    (
        buffer.data().iter().map(|v| v.to_bits()).collect(),
        buffer.fold().to_vec(),
        buffer.start_time(),
        buffer.is_empty(),
    )
}

#[test]
fn first_append_pads_to_trailing_window() {
    // 10 s window at 1 Hz: 5 incoming samples land at the tail,
    // the padded head is fill with fold 0
    let mut buffer: SlidingBuffer<16> = SlidingBuffer::with_defaults(10.0).unwrap();
    let data = ramp(5, 10.0);
    buffer.append(&Segment::new(chan(), 0, 1.0, &data)).unwrap();

    assert_eq!(buffer.len(), 10);
    assert_eq!(buffer.start_time(), secs(-5));
    assert_eq!(buffer.end_time(), secs(4));
    assert_eq!(buffer.fold(), &[0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0]);
    for i in 0..5 {
        assert_is_gap(buffer.data(), buffer.fold(), i);
    }
    assert_eq!(&buffer.data()[5..], &[10.0, 11.0, 12.0, 13.0, 14.0]);
}

#[test]
fn overlapping_join_averages_overlap_and_adopts_fresh_tail() {
    let mut buffer: SlidingBuffer<16> =
        SlidingBuffer::new(10.0, MergeMethod::AverageCombine, DEFAULT_FILL).unwrap();

    buffer
        .append(&Segment::new(chan(), 0, 1.0, &ramp(5, 10.0)))
        .unwrap();
    // overlaps the buffered data at t=3..4, extends to t=9
    buffer
        .append(&Segment::new(chan(), secs(3), 1.0, &ramp(7, 23.0)))
        .unwrap();

    assert_eq!(buffer.start_time(), 0);
    assert_eq!(buffer.end_time(), secs(9));
    // t=0..2 untouched, t=3..4 fold-weighted averages, t=5..9 adopted
    assert_eq!(
        buffer.data(),
        &[10.0, 11.0, 12.0, 18.0, 19.0, 25.0, 26.0, 27.0, 28.0, 29.0]
    );
    assert_eq!(
        buffer.fold(),
        &[1.0, 1.0, 1.0, 2.0, 2.0, 1.0, 1.0, 1.0, 1.0, 1.0]
    );
    assert_eq!(buffer.merged(), 1);
}

#[test]
fn far_future_append_discards_everything() {
    let mut buffer: SlidingBuffer<16> = SlidingBuffer::with_defaults(10.0).unwrap();
    buffer
        .append(&Segment::new(chan(), 0, 1.0, &ramp(5, 10.0)))
        .unwrap();
    buffer
        .append(&Segment::new(chan(), secs(3), 1.0, &ramp(7, 23.0)))
        .unwrap();

    // ends 16 s past the window end: the merged window would start at
    // t=15, after everything buffered
    let late = ramp(5, 40.0);
    buffer
        .append(&Segment::new(chan(), secs(21), 1.0, &late))
        .unwrap();

    // post-state must equal a fresh first append of that segment alone
    let mut fresh: SlidingBuffer<16> = SlidingBuffer::with_defaults(10.0).unwrap();
    fresh
        .append(&Segment::new(chan(), secs(21), 1.0, &late))
        .unwrap();

    assert_eq!(snapshot(&buffer), snapshot(&fresh));
    assert_eq!(buffer.start_time(), secs(16));
    assert_eq!(buffer.end_time(), secs(25));
    assert_eq!(buffer.merged(), 0);
}

#[test]
fn stale_append_rejected_without_mutation() {
    let mut buffer: SlidingBuffer<16> = SlidingBuffer::with_defaults(10.0).unwrap();
    buffer
        .append(&Segment::new(chan(), 0, 1.0, &ramp(5, 10.0)))
        .unwrap();
    buffer
        .append(&Segment::new(chan(), secs(3), 1.0, &ramp(7, 23.0)))
        .unwrap();

    let before = snapshot(&buffer);
    let merged_before = buffer.merged();

    // ends 25 s before the window would begin
    let err = buffer
        .append(&Segment::new(chan(), secs(-30), 1.0, &ramp(5, 0.0)))
        .unwrap_err();

    assert_eq!(err, BufferError::StaleSegment { lag_us: secs(25) });
    assert_eq!(snapshot(&buffer), before);
    assert_eq!(buffer.merged(), merged_before);
}

#[test]
fn fold_accumulates_under_max_and_average() {
    // two single-sample segments, fold 1 each, values 3 and 7 at the
    // same instant
    for (method, want_value) in [
        (MergeMethod::MaxCombine, 7.0),
        (MergeMethod::AverageCombine, 5.0),
    ] {
        let mut buffer: SlidingBuffer<8> =
            SlidingBuffer::new(5.0, method, DEFAULT_FILL).unwrap();
        buffer
            .append(&Segment::new(chan(), secs(10), 1.0, &[3.0]))
            .unwrap();
        buffer
            .append(&Segment::new(chan(), secs(10), 1.0, &[7.0]))
            .unwrap();

        let last = buffer.len() - 1;
        assert_eq!(buffer.data()[last], want_value, "{}", method.name());
        assert_eq!(buffer.fold()[last], 2.0, "{}", method.name());
    }
}

#[test]
fn mask_zero_discards_conflicts_keeps_one_sided_data() {
    let mut buffer: SlidingBuffer<16> =
        SlidingBuffer::new(10.0, MergeMethod::MaskZero, DEFAULT_FILL).unwrap();

    buffer
        .append(&Segment::new(chan(), 0, 1.0, &ramp(5, 10.0)))
        .unwrap();
    // overlaps t=3..4, fresh at t=5..7
    buffer
        .append(&Segment::new(chan(), secs(3), 1.0, &ramp(5, 90.0)))
        .unwrap();

    // window is now [-2 .. 7]
    assert_eq!(buffer.start_time(), secs(-2));
    assert_eq!(
        buffer.fold(),
        &[0.0, 0.0, 1.0, 1.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0]
    );
    // the conflicting positions hold fill again
    assert_is_gap(buffer.data(), buffer.fold(), 5);
    assert_is_gap(buffer.data(), buffer.fold(), 6);
    // one-sided positions kept their single source
    assert_eq!(&buffer.data()[2..5], &[10.0, 11.0, 12.0]);
    assert_eq!(&buffer.data()[7..], &[92.0, 93.0, 94.0]);
}

#[test]
fn gapped_join_leaves_fill_holes() {
    let mut buffer: SlidingBuffer<16> = SlidingBuffer::with_defaults(10.0).unwrap();
    buffer
        .append(&Segment::new(chan(), 0, 1.0, &ramp(3, 10.0)))
        .unwrap();
    // 4-second hole between the buffered data and this segment
    buffer
        .append(&Segment::new(chan(), secs(7), 1.0, &ramp(3, 27.0)))
        .unwrap();

    assert_eq!(buffer.start_time(), 0);
    assert_eq!(buffer.end_time(), secs(9));
    for i in 3..7 {
        assert_is_gap(buffer.data(), buffer.fold(), i);
    }
    assert_eq!(&buffer.data()[..3], &[10.0, 11.0, 12.0]);
    assert_eq!(&buffer.data()[7..], &[27.0, 28.0, 29.0]);
    assert!((buffer.coverage() - 0.6).abs() < 1e-6);
}

/// The far-future check compares the merged window's start against the
/// *window's* end, not the segment's own start. With a small span, a short
/// segment starting just past the window end resets the whole buffer even
/// though the gap is tiny. Aggressive recency, by contract.
#[test]
fn short_gap_after_end_still_resets_when_span_is_small() {
    let mut buffer: SlidingBuffer<4> = SlidingBuffer::with_defaults(2.0).unwrap();
    buffer
        .append(&Segment::new(chan(), 0, 1.0, &[1.0, 2.0]))
        .unwrap();
    assert_eq!(buffer.end_time(), secs(1));

    // starts one sample past the window end, but spans to t=4:
    // merged window start (t=2) lies past the window end (t=1) -> reset
    buffer
        .append(&Segment::new(chan(), secs(2), 1.0, &[3.0, 4.0, 5.0]))
        .unwrap();

    assert_eq!(buffer.start_time(), secs(3));
    assert_eq!(buffer.data(), &[4.0, 5.0]);
    assert_eq!(buffer.merged(), 0);
}

#[test]
fn adjacent_single_sample_still_joins() {
    // companion boundary for the reset case above: a single sample right
    // after the window end keeps the join path
    let mut buffer: SlidingBuffer<4> = SlidingBuffer::with_defaults(2.0).unwrap();
    buffer
        .append(&Segment::new(chan(), 0, 1.0, &[1.0, 2.0]))
        .unwrap();

    buffer
        .append(&Segment::new(chan(), secs(2), 1.0, &[3.0]))
        .unwrap();

    assert_eq!(buffer.start_time(), secs(1));
    assert_eq!(buffer.data(), &[2.0, 3.0]);
    assert_eq!(buffer.merged(), 1);
}

#[test]
fn overlong_first_append_keeps_trailing_span() {
    let mut buffer: SlidingBuffer<8> = SlidingBuffer::with_defaults(5.0).unwrap();
    buffer
        .append(&Segment::new(chan(), 0, 1.0, &ramp(10, 0.0)))
        .unwrap();

    assert_eq!(buffer.len(), 5);
    assert_eq!(buffer.start_time(), secs(5));
    assert_eq!(buffer.data(), &[5.0, 6.0, 7.0, 8.0, 9.0]);
    assert_eq!(buffer.fold(), &[1.0, 1.0, 1.0, 1.0, 1.0]);
}

#[test]
fn eviction_is_permanent() {
    let mut buffer: SlidingBuffer<8> = SlidingBuffer::with_defaults(5.0).unwrap();
    buffer
        .append(&Segment::new(chan(), 0, 1.0, &ramp(5, 10.0)))
        .unwrap();
    buffer
        .append(&Segment::new(chan(), secs(5), 1.0, &ramp(3, 25.0)))
        .unwrap();

    // window slid to [3 .. 7]; t=0..2 is gone for good
    assert_eq!(buffer.start_time(), secs(3));
    assert_eq!(buffer.data(), &[13.0, 14.0, 25.0, 26.0, 27.0]);
    assert_eq!(buffer.coverage(), 1.0);
    for &v in buffer.data() {
        assert!(v >= 13.0);
    }
}

#[test]
fn long_run_sliding_coverage() {
    // 50 back-to-back 20-sample segments at 100 Hz through a 10 s window
    let mut buffer: SlidingBuffer<1024> = SlidingBuffer::with_defaults(10.0).unwrap();
    let mut noise = NoiseGen::new(7);

    for i in 0..50i64 {
        let data = noise.samples(20, 1.0);
        let seg = Segment::new(chan(), i * 200_000, 100.0, &data);
        buffer.append(&seg).unwrap();

        assert_eq!(buffer.len(), 1000);
        assert_eq!(buffer.fold().len(), 1000);
    }

    assert_eq!(buffer.end_time(), 9_990_000);
    assert_eq!(buffer.start_time(), 0);
    assert_eq!(buffer.coverage(), 1.0);
    assert_eq!(buffer.merged(), 49);
}

proptest! {
    /// Random append sequences never break the structural invariants and
    /// never mutate the buffer on a rejected append.
    #[test]
    fn append_sequences_preserve_invariants(
        segs in prop::collection::vec((-20i64..40i64, 1usize..8), 1..15)
    ) {
        let id = ChannelId::new("prop").unwrap();
        let mut buffer: SlidingBuffer<16> = SlidingBuffer::with_defaults(10.0).unwrap();

        for (start_s, n) in segs {
            let data: Vec<f32> = (0..n).map(|i| (start_s + i as i64) as f32).collect();
            let seg = Segment::new(id, start_s * 1_000_000, 1.0, &data);

            let before = snapshot(&buffer);
            let result = buffer.append(&seg);

            if result.is_err() {
                prop_assert_eq!(snapshot(&buffer), before);
            }
            if !buffer.is_empty() {
                prop_assert_eq!(buffer.len(), 10);
                prop_assert_eq!(buffer.fold().len(), buffer.len());
                for i in 0..buffer.len() {
                    let gap = buffer.fold()[i] == 0.0;
                    prop_assert_eq!(gap, buffer.data()[i].is_nan());
                }
            }
        }
    }
}
