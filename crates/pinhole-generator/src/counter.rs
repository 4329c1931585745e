use crate::{encode_counter, Generator};
use pinhole_core::ShortCode;
use std::sync::atomic::{AtomicU64, Ordering};

/// A short code generator backed by a monotonically increasing counter.
///
/// The counter is incremented before each code is produced, so a fresh
/// generator yields the code for `1` first. Uniqueness holds within a single
/// instance only: the counter lives in memory and starts over when the
/// process restarts, unless it is resumed with [`CounterGenerator::with_offset`].
#[derive(Debug, Default)]
pub struct CounterGenerator {
    counter: AtomicU64,
}

impl Clone for CounterGenerator {
    fn clone(&self) -> Self {
        Self::with_offset(self.current())
    }
}

impl CounterGenerator {
    /// Creates a generator seeded at 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a generator resuming after `offset`.
    ///
    /// Useful for continuing from a known state, e.g. the number of
    /// mappings already held by a durable store.
    pub fn with_offset(offset: u64) -> Self {
        Self {
            counter: AtomicU64::new(offset),
        }
    }

    /// Returns the last counter value handed out.
    pub fn current(&self) -> u64 {
        self.counter.load(Ordering::SeqCst)
    }
}

impl Generator for CounterGenerator {
    type Output = ShortCode;

    fn generate(&self) -> ShortCode {
        let value = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        encode_counter(value)
    }
}
