//! Circular recorder integration tests
//!
//! Uses integer staircases so every recorded sample identifies its own
//! logical write position.

use loopcheck::core::Arc;
use loopcheck::CircularSampleBuffer;
use rand::{Rng, SeedableRng};

mod helpers;
use helpers::*;

fn filled(capacity: usize, count: usize) -> CircularSampleBuffer {
    let buffer = CircularSampleBuffer::new(capacity);
    for sample in generate_integer_staircase(count) {
        buffer.write(sample);
    }
    buffer
}

#[test]
fn test_round_trip_below_capacity() {
    let buffer = filled(1024, 700);
    let mut dest = vec![0.0f32; 700];

    assert_eq!(buffer.read_from(0, &mut dest), 700);
    assert_eq!(dest, generate_integer_staircase(700));
    assert_eq!(buffer.total_written(), 700);
}

/// After overflow only the last `capacity` samples survive, and reading
/// from position 0 starts at the oldest retained one.
#[test]
fn test_overflow_keeps_latest_window() {
    let capacity = 256;
    let k = 100;
    let buffer = filled(capacity, capacity + k);
    let mut dest = vec![0.0f32; capacity];

    assert_eq!(buffer.read_from(0, &mut dest), capacity);
    let expected: Vec<f32> = (k..capacity + k).map(|i| i as f32).collect();
    assert_eq!(dest, expected);
}

/// Reads that straddle the end of the backing store come out in order.
#[test]
fn test_wraparound_read_is_contiguous() {
    let buffer = filled(64, 220);
    let mut dest = vec![0.0f32; 30];

    // Logical 180..210 runs from slot 52 past the end into slot 17
    assert_eq!(buffer.read_from(180, &mut dest), 30);
    let expected: Vec<f32> = (180..210).map(|i| i as f32).collect();
    assert_eq!(dest, expected);
}

/// Counts never exceed what was asked for, what was written, or capacity.
#[test]
fn test_read_counts_are_clamped() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(0x5eed);

    for _ in 0..200 {
        let capacity = rng.gen_range(1..512);
        let written = rng.gen_range(0..2048);
        let buffer = filled(capacity, written);

        let start = rng.gen_range(0..written + 64);
        let requested = rng.gen_range(0..1024);
        let mut dest = vec![f32::NAN; requested];
        let count = buffer.read_from(start, &mut dest);

        assert!(count <= requested);
        assert!(count <= written);
        assert!(count <= capacity);

        let oldest = written.saturating_sub(capacity);
        let first = start.clamp(oldest, written);
        for (i, &sample) in dest[..count].iter().enumerate() {
            assert_eq!(sample, (first + i) as f32);
        }
    }
}

#[test]
fn test_read_latest() {
    let buffer = filled(128, 1000);
    let mut dest = vec![0.0f32; 16];

    assert_eq!(buffer.read_latest(&mut dest), 16);
    assert_eq!(dest[0], 984.0);
    assert_eq!(dest[15], 999.0);
}

/// A reader racing the writer only ever sees written data, each sample at
/// its own position, even when the writer laps the copy.
#[test]
fn test_concurrent_reader_sees_consistent_data() {
    let capacity = 4096;
    let total = 200_000;
    let buffer = Arc::new(CircularSampleBuffer::new(capacity));

    std::thread::scope(|scope| {
        let writer = Arc::clone(&buffer);
        scope.spawn(move || {
            for i in 0..total {
                writer.write(i as f32);
            }
        });

        let mut dest = vec![0.0f32; 512];
        let mut last_total = 0;
        while last_total < total {
            let seen = buffer.total_written();
            assert!(seen >= last_total, "write count went backwards");
            last_total = seen;

            let start = seen.saturating_sub(dest.len());
            let (first, count) = buffer.read_window(start, &mut dest);
            assert!(count <= dest.len());
            assert!(first >= start, "window starts before the request");

            for (i, &sample) in dest[..count].iter().enumerate() {
                assert_eq!(sample as usize, first + i, "sample out of place");
            }
        }
    });

    assert_eq!(buffer.total_written(), total);
}

/// A ring far smaller than the read rate forces the writer to lap
/// in-flight copies; lapped samples are dropped, never misreported.
#[test]
fn test_small_ring_under_contention() {
    let capacity = 64;
    let total = 2_000_000;
    let buffer = Arc::new(CircularSampleBuffer::new(capacity));

    std::thread::scope(|scope| {
        let writer = Arc::clone(&buffer);
        scope.spawn(move || {
            for i in 0..total {
                writer.write(i as f32);
            }
        });

        let mut dest = vec![0.0f32; capacity];
        while buffer.total_written() < total {
            let count = buffer.read_latest(&mut dest);
            for pair in dest[..count].windows(2) {
                assert_eq!(pair[1] as usize, pair[0] as usize + 1, "sample out of place");
            }
        }
    });
}
