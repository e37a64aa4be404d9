//! Basic buffering: append overlapping segments, inspect the window

use streamfold_core::{ChannelId, Segment, SlidingBuffer};

fn main() {
    let chan = ChannelId::new("NW.STA01..HHZ").unwrap();

    // 10 second window, average merging, NaN fill
    let mut buffer: SlidingBuffer<64> = SlidingBuffer::with_defaults(10.0).unwrap();

    // First segment: 5 samples at 1 Hz starting at t=0
    let first = [0.2, 0.4, 0.1, 0.9, 0.3];
    buffer
        .append(&Segment::new(chan, 0, 1.0, &first))
        .unwrap();
    print_window("after first append", &buffer);

    // Second segment overlaps the tail and extends the window to t=9
    let second = [0.7, 0.5, 0.8, 0.2, 0.6, 0.1, 0.4];
    buffer
        .append(&Segment::new(chan, 3_000_000, 1.0, &second))
        .unwrap();
    print_window("after join", &buffer);
}

fn print_window<const N: usize>(label: &str, buffer: &SlidingBuffer<N>) {
    println!("{label}:");
    println!(
        "  window [{:.1} s .. {:.1} s], {} samples, coverage {:.0}%",
        buffer.start_time() as f64 / 1e6,
        buffer.end_time() as f64 / 1e6,
        buffer.len(),
        buffer.coverage() * 100.0
    );
    println!("  data: {:?}", buffer.data());
    println!("  fold: {:?}", buffer.fold());
}
