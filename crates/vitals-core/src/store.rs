//! Fixed-capacity, concurrency-safe sample store.
//!
//! The store is a circular buffer of the most recent [`Sample`]s, ordered by
//! arrival. One writer (the sampling loop) and any number of readers (query
//! handlers) synchronize through an internal reader/writer lock: `add` takes
//! the lock exclusively, all queries take it shared. Lock hold times are
//! bounded by O(size) copy work — no I/O ever happens under the lock.

use std::sync::RwLock;

use crate::sample::{Sample, now_unix_ms};

/// Thread-safe fixed-capacity circular buffer of metric samples.
///
/// Once full, each `add` overwrites exactly the oldest slot in place; the
/// store always holds the `min(capacity, total_inserted)` most recent
/// samples.
pub struct SampleStore {
    capacity: usize,
    inner: RwLock<Inner>,
}

struct Inner {
    /// `capacity` slots; `None` until first written.
    slots: Vec<Option<Sample>>,
    /// Next write position.
    head: usize,
    /// Current sample count, saturates at `capacity`.
    size: usize,
}

impl SampleStore {
    /// Create a store holding up to `capacity` samples.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero — a zero-capacity store is a
    /// configuration error and is rejected before any sampling starts.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "sample store capacity must be positive");
        Self {
            capacity,
            inner: RwLock::new(Inner {
                slots: (0..capacity).map(|_| None).collect(),
                head: 0,
                size: 0,
            }),
        }
    }

    /// Insert `sample` as the newest element, evicting the oldest when full.
    pub fn add(&self, sample: Sample) {
        let mut inner = self.inner.write().expect("sample store lock poisoned");
        let head = inner.head;
        inner.slots[head] = Some(sample);
        inner.head = (head + 1) % self.capacity;
        if inner.size < self.capacity {
            inner.size += 1;
        }
    }

    /// The most recently added sample, or `None` if the store is empty.
    pub fn latest(&self) -> Option<Sample> {
        let inner = self.inner.read().expect("sample store lock poisoned");
        if inner.size == 0 {
            return None;
        }
        let index = (inner.head + self.capacity - 1) % self.capacity;
        inner.slots[index].clone()
    }

    /// All stored samples whose timestamp is strictly after
    /// `now - window_secs`, oldest-first.
    ///
    /// `now` is evaluated once per call, so every sample in one result is
    /// filtered against the same cutoff. The window is not validated: zero
    /// or negative values put the cutoff at or after the current time and
    /// typically yield an empty result. Default handling for absent or
    /// malformed caller input belongs above this layer.
    pub fn history(&self, window_secs: i64) -> Vec<Sample> {
        let cutoff = (now_unix_ms() as i64).saturating_sub(window_secs.saturating_mul(1000));
        let inner = self.inner.read().expect("sample store lock poisoned");
        self.iter_chronological(&inner)
            .filter(|s| s.timestamp as i64 > cutoff)
            .cloned()
            .collect()
    }

    /// All stored samples, oldest-first, unfiltered.
    pub fn all(&self) -> Vec<Sample> {
        let inner = self.inner.read().expect("sample store lock poisoned");
        self.iter_chronological(&inner).cloned().collect()
    }

    /// Current number of stored samples (`0 ≤ len ≤ capacity`).
    pub fn len(&self) -> usize {
        self.inner.read().expect("sample store lock poisoned").size
    }

    /// Whether the store holds no samples yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of samples retained.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate `size` slots starting at the oldest element, which lives at
    /// `(head - size) mod capacity`.
    fn iter_chronological<'a>(&self, inner: &'a Inner) -> impl Iterator<Item = &'a Sample> {
        let start = (inner.head + self.capacity - inner.size) % self.capacity;
        let capacity = self.capacity;
        (0..inner.size).filter_map(move |i| inner.slots[(start + i) % capacity].as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::{CpuMetrics, RamMetrics};
    use std::sync::Arc;

    /// A sample whose CPU usage encodes a test-visible id and whose
    /// timestamp is `now + offset_ms`.
    fn sample_at(offset_ms: i64, id: f64) -> Sample {
        Sample {
            timestamp: (now_unix_ms() as i64 + offset_ms) as u64,
            cpu: CpuMetrics {
                model: String::new(),
                cores: 1,
                threads: 1,
                usage: id,
                load_avg: None,
                frequency_mhz: None,
            },
            ram: RamMetrics {
                total_mb: 1024,
                used_mb: 512,
                free_mb: 512,
                usage: 0.5,
            },
            gpu: None,
        }
    }

    fn ids(samples: &[Sample]) -> Vec<f64> {
        samples.iter().map(|s| s.cpu.usage).collect()
    }

    #[test]
    #[should_panic(expected = "capacity must be positive")]
    fn zero_capacity_is_rejected_at_construction() {
        let _ = SampleStore::new(0);
    }

    #[test]
    fn empty_store_has_no_data() {
        let store = SampleStore::new(4);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert!(store.latest().is_none());
        assert!(store.all().is_empty());
        assert!(store.history(300).is_empty());
    }

    #[test]
    fn latest_returns_most_recent_insert() {
        let store = SampleStore::new(4);
        store.add(sample_at(-3000, 1.0));
        store.add(sample_at(-2000, 2.0));
        store.add(sample_at(-1000, 3.0));
        assert_eq!(store.latest().unwrap().cpu.usage, 3.0);
    }

    #[test]
    fn size_saturates_at_capacity() {
        let store = SampleStore::new(3);
        for i in 0..10 {
            store.add(sample_at(-1000, i as f64));
            assert_eq!(store.len(), (i + 1).min(3));
        }
        assert_eq!(store.capacity(), 3);
    }

    #[test]
    fn full_store_keeps_last_capacity_inserts_in_order() {
        let store = SampleStore::new(3);
        for i in 1..=7 {
            store.add(sample_at(-1000, i as f64));
        }
        assert_eq!(ids(&store.all()), vec![5.0, 6.0, 7.0]);
    }

    #[test]
    fn overflow_evicts_exactly_the_oldest() {
        let store = SampleStore::new(3);
        for i in 1..=4 {
            store.add(sample_at(-1000, i as f64));
        }
        let all = store.all();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].cpu.usage, 2.0, "s1 evicted, s2 now oldest");
        assert!(all.iter().all(|s| s.cpu.usage != 1.0));
    }

    #[test]
    fn history_filters_against_one_cutoff() {
        let store = SampleStore::new(8);
        store.add(sample_at(-10_000, 1.0));
        store.add(sample_at(-5_000, 2.0));
        store.add(sample_at(-1_000, 3.0));

        assert_eq!(ids(&store.history(6)), vec![2.0, 3.0]);
        assert_eq!(ids(&store.history(300)), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn degenerate_windows_yield_empty_results() {
        let store = SampleStore::new(8);
        store.add(sample_at(-10_000, 1.0));
        store.add(sample_at(-1_000, 2.0));
        assert!(store.history(0).is_empty());
        assert!(store.history(-60).is_empty());
    }

    #[test]
    fn extreme_windows_saturate_instead_of_overflowing() {
        let store = SampleStore::new(8);
        store.add(sample_at(-1_000, 1.0));
        // Cutoffs far in the future must stay empty even when the
        // millisecond conversion saturates.
        assert!(store.history(-10_000_000_000_000_000).is_empty());
        assert!(store.history(i64::MIN).is_empty());
        // And a saturated look-back covers everything.
        assert_eq!(store.history(i64::MAX).len(), 1);
    }

    #[test]
    fn history_reads_are_idempotent() {
        let store = SampleStore::new(8);
        store.add(sample_at(-4_000, 1.0));
        store.add(sample_at(-2_000, 2.0));
        let first = ids(&store.history(60));
        let second = ids(&store.history(60));
        assert_eq!(first, second);
    }

    #[test]
    fn history_after_wraparound_stays_chronological() {
        let store = SampleStore::new(3);
        for i in 1..=5 {
            store.add(sample_at(-1000 * (6 - i), i as f64));
        }
        assert_eq!(ids(&store.history(3600)), vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn concurrent_adds_and_reads_stay_consistent() {
        let store = Arc::new(SampleStore::new(16));
        let writer = {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                for i in 0..2000 {
                    store.add(sample_at(-1000, i as f64));
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for _ in 0..500 {
                        let all = store.all();
                        assert!(all.len() <= store.capacity());
                        // Every observed state is a run of consecutive ids.
                        for pair in all.windows(2) {
                            assert_eq!(pair[1].cpu.usage - pair[0].cpu.usage, 1.0);
                        }
                        let _ = store.latest();
                        let _ = store.history(300);
                        let _ = store.len();
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for r in readers {
            r.join().unwrap();
        }

        assert_eq!(store.len(), 16);
        let all = store.all();
        assert_eq!(all.len(), 16);
        assert_eq!(all.last().unwrap().cpu.usage, 1999.0);
        assert_eq!(store.latest().unwrap().cpu.usage, 1999.0);
    }
}
