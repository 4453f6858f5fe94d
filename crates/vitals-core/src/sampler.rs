//! Periodic sampling loop.
//!
//! One dedicated thread drives `Collector::collect()` on a fixed period and
//! pushes successful samples into the store. The inter-tick wait doubles as
//! the cancellation point: `recv_timeout` on the stop channel either times
//! out (tick) or observes the stop signal (terminate), so there is no
//! missed-wakeup window between checking for cancellation and sleeping.

use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use crate::collector::Collector;
use crate::store::SampleStore;

/// Handle to a running sampling loop.
///
/// The loop starts with one immediate collection so a consumer querying
/// right after startup sees data without waiting a full period, then ticks
/// on a deadline-based schedule. It stops when [`Sampler::stop`] is called
/// or the handle is dropped; stopping is one-shot with no resume.
pub struct Sampler {
    stop_tx: mpsc::Sender<()>,
    handle: Option<thread::JoinHandle<()>>,
}

impl Sampler {
    /// Spawn the sampling thread.
    ///
    /// # Panics
    ///
    /// Panics if `period` is zero — a degenerate schedule is a
    /// configuration error and is rejected before the loop starts.
    pub fn spawn(
        collector: Box<dyn Collector>,
        store: Arc<SampleStore>,
        period: Duration,
    ) -> Self {
        assert!(!period.is_zero(), "sampling period must be positive");
        let (stop_tx, stop_rx) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("vitals-sampler".to_string())
            .spawn(move || run(collector.as_ref(), &store, period, &stop_rx))
            .expect("failed to spawn sampler thread");
        Self {
            stop_tx,
            handle: Some(handle),
        }
    }

    /// Signal cancellation and wait for the loop to exit.
    ///
    /// No further collector calls or store writes happen after this
    /// returns; a tick already in flight is allowed to complete first.
    pub fn stop(mut self) {
        let _ = self.stop_tx.send(());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Sampler {
    fn drop(&mut self) {
        // Dropping the sender alone also wakes the loop (Disconnected),
        // but send explicitly so an in-progress wait ends promptly.
        let _ = self.stop_tx.send(());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// The loop body: immediate first tick, then deadline-scheduled ticks until
/// the stop channel signals or disconnects.
fn run(
    collector: &dyn Collector,
    store: &SampleStore,
    period: Duration,
    stop_rx: &mpsc::Receiver<()>,
) {
    collect_once(collector, store);

    let mut next_tick = Instant::now() + period;
    loop {
        let wait = next_tick.saturating_duration_since(Instant::now());
        match stop_rx.recv_timeout(wait) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                log::info!("sampling loop stopped");
                return;
            }
            Err(RecvTimeoutError::Timeout) => {
                collect_once(collector, store);
                next_tick += period;
                // A collection that overran the period resynchronizes the
                // schedule instead of bursting missed ticks.
                let now = Instant::now();
                if next_tick < now {
                    next_tick = now + period;
                }
            }
        }
    }
}

/// One collect-and-store cycle. A failed collection is logged and skipped;
/// the store is only touched on success, and never while the collector runs.
fn collect_once(collector: &dyn Collector, store: &SampleStore) {
    match collector.collect() {
        Ok(sample) => {
            match &sample.gpu {
                Some(gpu) => log::debug!(
                    "sample: cpu={:.1}% ram={:.1}% gpu={:.1}%",
                    sample.cpu.usage * 100.0,
                    sample.ram.usage * 100.0,
                    gpu.util * 100.0
                ),
                None => log::debug!(
                    "sample: cpu={:.1}% ram={:.1}%",
                    sample.cpu.usage * 100.0,
                    sample.ram.usage * 100.0
                ),
            }
            store.add(sample);
        }
        Err(err) => log::warn!("metrics collection failed, tick skipped: {err}"),
    }
}
