//! Driving a buffer from a replayed segment stream

mod common;

use common::{chan, ramp, secs};
use streamfold_core::stream::{MemoryStream, SegmentStream, StreamError};
use streamfold_core::{Segment, SlidingBuffer};

/// Drain a stream into a buffer, counting accepted segments
fn drain<'a, S: SegmentStream<'a>>(
    stream: &mut S,
    buffer: &mut SlidingBuffer<16>,
) -> usize {
    let mut accepted = 0;
    loop {
        match stream.poll_next() {
            Ok(segment) => {
                if buffer.append(&segment).is_ok() {
                    accepted += 1;
                }
            }
            Err(nb::Error::Other(StreamError::EndOfStream)) => return accepted,
            Err(nb::Error::Other(_)) => panic!("unexpected stream error"),
            Err(nb::Error::WouldBlock) => continue,
        }
    }
}

#[test]
fn replayed_feed_fills_window_in_order() {
    let a = ramp(3, 10.0);
    let b = ramp(3, 13.0);
    let c = ramp(4, 16.0);
    let segments = [
        Segment::new(chan(), 0, 1.0, &a),
        Segment::new(chan(), secs(3), 1.0, &b),
        Segment::new(chan(), secs(6), 1.0, &c),
    ];

    let mut stream = MemoryStream::new(&segments);
    let mut buffer: SlidingBuffer<16> = SlidingBuffer::with_defaults(10.0).unwrap();

    let accepted = drain(&mut stream, &mut buffer);

    assert_eq!(accepted, 3);
    assert!(stream.is_exhausted());
    assert_eq!(buffer.start_time(), 0);
    assert_eq!(buffer.end_time(), secs(9));
    assert_eq!(
        buffer.data(),
        &[10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0, 17.0, 18.0, 19.0]
    );
    assert_eq!(buffer.coverage(), 1.0);
}

#[test]
fn replaying_the_same_feed_accumulates_fold() {
    let a = ramp(5, 10.0);
    let b = ramp(5, 15.0);
    let segments = [
        Segment::new(chan(), 0, 1.0, &a),
        Segment::new(chan(), secs(5), 1.0, &b),
    ];

    let mut stream = MemoryStream::new(&segments);
    let mut buffer: SlidingBuffer<16> = SlidingBuffer::with_defaults(10.0).unwrap();

    drain(&mut stream, &mut buffer);
    assert_eq!(buffer.fold(), &[1.0; 10]);

    // replay: averaging identical values leaves data unchanged,
    // but every position now counts two observations
    stream.reset();
    drain(&mut stream, &mut buffer);

    assert_eq!(
        buffer.data(),
        &[10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0, 17.0, 18.0, 19.0]
    );
    assert_eq!(buffer.fold(), &[2.0; 10]);
}
