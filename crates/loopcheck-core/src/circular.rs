//! Fixed-capacity sample recorder for offline diagnostics.
//!
//! One real-time thread appends with [`CircularSampleBuffer::write`]; one
//! non-real-time thread may read history at the same time. Only the most
//! recent `capacity` samples are retrievable.
//!
//! The write position is a monotonic atomic counter published with
//! `Release` after the sample is stored. Readers `Acquire` it, so they never
//! see a slot the writer has not finished. Before overwriting a slot the
//! writer also bumps a claim counter behind a release fence; after copying,
//! readers check it and drop any leading samples the writer lapped
//! mid-copy. A reader may see a slightly stale upper bound but never a
//! sample from the wrong position. No lock is taken on either side.

use atomic_float::AtomicF32;
use core::sync::atomic::{fence, AtomicUsize, Ordering};

/// About 1.3 s at 48 kHz.
pub const DEFAULT_RECORDER_CAPACITY: usize = 64 * 1024;

pub struct CircularSampleBuffer {
    data: Box<[AtomicF32]>,
    write_position: AtomicUsize,
    // Position of the write in flight; runs at most one ahead of `write_position`
    claim_position: AtomicUsize,
}

impl CircularSampleBuffer {
    /// Allocate a recorder holding `capacity` samples (at least one).
    pub fn new(capacity: usize) -> Self {
        let data = (0..capacity.max(1))
            .map(|_| AtomicF32::new(0.0))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self {
            data,
            write_position: AtomicUsize::new(0),
            claim_position: AtomicUsize::new(0),
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Total number of samples ever written. Never decreases.
    #[inline]
    pub fn total_written(&self) -> usize {
        self.write_position.load(Ordering::Acquire)
    }

    /// Append one sample, overwriting the oldest once full.
    ///
    /// RT-safe. Must only be called from a single writer thread.
    #[inline]
    pub fn write(&self, sample: f32) {
        let position = self.write_position.load(Ordering::Relaxed);
        let next = position.wrapping_add(1);
        self.claim_position.store(next, Ordering::Relaxed);
        // Claim must be visible to any reader that sees the overwritten slot
        fence(Ordering::Release);
        self.data[position % self.data.len()].store(sample, Ordering::Relaxed);
        self.write_position.store(next, Ordering::Release);
    }

    /// Copy up to `dest.len()` samples starting at logical position `start`.
    ///
    /// `start` is clamped into the retained window
    /// `[total_written - capacity, total_written]`, so asking for data that has
    /// already been overwritten yields the oldest sample still held. Returns the
    /// number of samples copied; see [`read_window`](Self::read_window) for the
    /// logical position of the first one.
    pub fn read_from(&self, start: usize, dest: &mut [f32]) -> usize {
        self.read_window(start, dest).1
    }

    /// Like [`read_from`](Self::read_from), but also returns the logical
    /// position of `dest[0]`.
    ///
    /// `dest[i]` holds the sample written at position `first + i`. If the
    /// writer lapped part of the requested range during the copy, that part
    /// is dropped and `first` moves forward accordingly.
    pub fn read_window(&self, start: usize, dest: &mut [f32]) -> (usize, usize) {
        let total = self.total_written();
        let capacity = self.data.len();

        let oldest = total.saturating_sub(capacity);
        let start = start.clamp(oldest, total);
        let count = dest.len().min(total - start).min(capacity);
        if count == 0 {
            return (start, 0);
        }

        let offset = start % capacity;
        let first = count.min(capacity - offset);
        for (out, cell) in dest[..first].iter_mut().zip(&self.data[offset..offset + first]) {
            *out = cell.load(Ordering::Relaxed);
        }
        // Wrapped tail continues from the start of the backing store.
        let second = count - first;
        for (out, cell) in dest[first..count].iter_mut().zip(&self.data[..second]) {
            *out = cell.load(Ordering::Relaxed);
        }

        // Any slot overwritten during the copy is now below the claimed window.
        fence(Ordering::Acquire);
        let retained_from = self
            .claim_position
            .load(Ordering::Relaxed)
            .saturating_sub(capacity);
        let lapped = retained_from.saturating_sub(start).min(count);
        if lapped > 0 {
            dest.copy_within(lapped..count, 0);
        }

        (start + lapped, count - lapped)
    }

    /// Copy the most recent `dest.len()` samples (or fewer if not yet written).
    pub fn read_latest(&self, dest: &mut [f32]) -> usize {
        let total = self.total_written();
        let wanted = dest.len().min(self.data.len());
        self.read_window(total.saturating_sub(wanted), &mut dest[..wanted]).1
    }
}

impl Default for CircularSampleBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_RECORDER_CAPACITY)
    }
}

impl core::fmt::Debug for CircularSampleBuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CircularSampleBuffer")
            .field("capacity", &self.capacity())
            .field("total_written", &self.total_written())
            .finish()
    }
}
