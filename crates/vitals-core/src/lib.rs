//! # vitals-core
//!
//! Core library for the vitals host monitoring agent.
//!
//! A [`Sampler`] thread periodically asks a [`Collector`] for one immutable
//! [`Sample`] of host metrics (CPU, RAM, optionally GPU) and pushes it into a
//! fixed-capacity, concurrency-safe [`SampleStore`]. Readers query the store
//! for the latest sample or a sliding time window of history; once the store
//! is full, each new sample overwrites the oldest one in place.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use vitals_core::{Sampler, SampleStore, SystemCollector};
//!
//! let store = Arc::new(SampleStore::new(720));
//! let collector = SystemCollector::new();
//! let sampler = Sampler::spawn(Box::new(collector), Arc::clone(&store), Duration::from_secs(30));
//!
//! // ... serve queries against `store` ...
//! if let Some(sample) = store.latest() {
//!     println!("cpu {:.1}%", sample.cpu.usage * 100.0);
//! }
//!
//! sampler.stop();
//! ```
//!
//! ## Architecture
//!
//! Sampler (one writer thread) → Collector::collect() → Sample → SampleStore
//!
//! The store is the single shared mutable resource; a reader/writer lock
//! keeps the one writer exclusive while any number of query handlers read
//! concurrently. Failed collections are logged and skipped — the loop never
//! stops because a single tick failed.

pub mod collector;
pub mod collectors;
pub mod sample;
pub mod sampler;
pub mod store;

pub use collector::{CollectError, Collector, SystemCollector};
pub use collectors::{GpuProbe, detect_gpu};
pub use sample::{CpuMetrics, GpuMetrics, GpuVendor, RamMetrics, Sample, now_unix_ms};
pub use sampler::Sampler;
pub use store::SampleStore;

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
