//! Compare the three merge methods on the same overlapping feed

use streamfold_core::{ChannelId, MergeMethod, Segment, SlidingBuffer, DEFAULT_FILL};

fn main() {
    let chan = ChannelId::new("NW.STA01..HHZ").unwrap();

    let first = [1.0, 2.0, 3.0, 4.0, 5.0];
    let second = [30.0, 40.0, 50.0, 60.0, 70.0];

    for method in [
        MergeMethod::MaskZero,
        MergeMethod::MaxCombine,
        MergeMethod::AverageCombine,
    ] {
        let mut buffer: SlidingBuffer<16> =
            SlidingBuffer::new(8.0, method, DEFAULT_FILL).unwrap();

        // second segment overlaps the first at t=2..4
        buffer
            .append(&Segment::new(chan, 0, 1.0, &first))
            .unwrap();
        buffer
            .append(&Segment::new(chan, 2_000_000, 1.0, &second))
            .unwrap();

        println!("{}:", method.name());
        println!("  data: {:?}", buffer.data());
        println!("  fold: {:?}", buffer.fold());
    }
}
