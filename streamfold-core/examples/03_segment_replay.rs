//! Drive a buffer from a replayed in-memory segment stream

use streamfold_core::stream::{MemoryStream, SegmentStream, StreamError};
use streamfold_core::{ChannelId, Segment, SlidingBuffer};

fn main() {
    let chan = ChannelId::new("NW.STA01..HHZ").unwrap();

    let a = [0.1, 0.2, 0.3];
    let b = [0.4, 0.5, 0.6];
    let c = [0.7, 0.8, 0.9, 1.0];
    let recorded = [
        Segment::new(chan, 0, 1.0, &a),
        Segment::new(chan, 3_000_000, 1.0, &b),
        Segment::new(chan, 6_000_000, 1.0, &c),
    ];

    let mut stream = MemoryStream::new(&recorded);
    let mut buffer: SlidingBuffer<16> = SlidingBuffer::with_defaults(10.0).unwrap();

    loop {
        match stream.poll_next() {
            Ok(segment) => match buffer.append(&segment) {
                Ok(()) => println!(
                    "appended {} samples ending at {:.1} s",
                    segment.len(),
                    segment.end_time() as f64 / 1e6
                ),
                Err(e) => println!("dropped segment: {e}"),
            },
            Err(nb::Error::Other(StreamError::EndOfStream)) => break,
            Err(nb::Error::Other(e)) => {
                println!("stream failed: {e:?}");
                break;
            }
            Err(nb::Error::WouldBlock) => continue,
        }
    }

    println!(
        "window [{:.1} s .. {:.1} s], coverage {:.0}%",
        buffer.start_time() as f64 / 1e6,
        buffer.end_time() as f64 / 1e6,
        buffer.coverage() * 100.0
    );
}
