//! Collector contract and the orchestrating system collector.
//!
//! A [`Collector`] is anything that can be asked, synchronously, to produce
//! exactly one [`Sample`] or fail. The sampling loop and the store have zero
//! knowledge of what backs a collector; this is the seam at which CPU, RAM,
//! and GPU-vendor-specific logic plugs in.

use std::sync::Mutex;

use sysinfo::System;
use thiserror::Error;

use crate::collectors::{self, GpuProbe};
use crate::sample::Sample;

/// Why a collection attempt failed.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("cpu metrics unavailable: {0}")]
    Cpu(String),

    #[error("memory metrics unavailable: {0}")]
    Ram(String),

    #[error("gpu query failed: {0}")]
    Gpu(String),

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

/// Produce one sample, or fail with an error.
///
/// Implementations may be slow (subprocess spawn); the sampling loop
/// tolerates that as part of one tick's duration and never runs concurrent
/// ticks.
pub trait Collector: Send + Sync {
    fn collect(&self) -> Result<Sample, CollectError>;
}

/// Collector that assembles a full [`Sample`] from CPU and RAM counters
/// plus an optional GPU backend selected once at construction.
///
/// The `sysinfo::System` is kept across calls because CPU usage is computed
/// as a delta since the previous refresh — exactly what a periodic sampling
/// loop wants.
pub struct SystemCollector {
    system: Mutex<System>,
    gpu: Option<Box<dyn GpuProbe>>,
}

impl SystemCollector {
    /// Probe the machine for a GPU backend and set up OS counters.
    pub fn new() -> Self {
        Self::with_gpu(collectors::detect_gpu())
    }

    /// Build with an explicit GPU backend (or none). The plain constructor
    /// probes via [`collectors::detect_gpu`].
    pub fn with_gpu(gpu: Option<Box<dyn GpuProbe>>) -> Self {
        let mut system = System::new();
        // Prime the CPU counters so the first real collection has a delta
        // to measure against.
        system.refresh_cpu_all();
        Self {
            system: Mutex::new(system),
            gpu,
        }
    }

    /// Vendor of the detected GPU backend, if any.
    pub fn gpu_vendor(&self) -> Option<crate::sample::GpuVendor> {
        self.gpu.as_deref().map(|g| g.vendor())
    }
}

impl Default for SystemCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl Collector for SystemCollector {
    fn collect(&self) -> Result<Sample, CollectError> {
        let (cpu, ram) = {
            let mut system = self.system.lock().expect("system counters lock poisoned");
            system.refresh_cpu_all();
            system.refresh_memory();
            (
                collectors::cpu::read(&system)?,
                collectors::ram::read(&system)?,
            )
        };

        // A GPU read failure degrades the sample, it never fails it.
        let gpu = match self.gpu.as_deref() {
            Some(probe) => match probe.read() {
                Ok(metrics) => Some(metrics),
                Err(err) => {
                    log::debug!("gpu read failed, sample continues without gpu: {err}");
                    None
                }
            },
            None => None,
        };

        Ok(Sample::new(cpu, ram, gpu))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::{GpuMetrics, GpuVendor};

    struct FailingProbe;

    impl GpuProbe for FailingProbe {
        fn vendor(&self) -> GpuVendor {
            GpuVendor::Amd
        }
        fn read(&self) -> Result<GpuMetrics, CollectError> {
            Err(CollectError::Gpu("tooling not present".to_string()))
        }
    }

    struct FixedProbe;

    impl GpuProbe for FixedProbe {
        fn vendor(&self) -> GpuVendor {
            GpuVendor::Nvidia
        }
        fn read(&self) -> Result<GpuMetrics, CollectError> {
            Ok(GpuMetrics {
                vendor: GpuVendor::Nvidia,
                model: "Mock GPU".to_string(),
                util: 0.5,
                temperature_c: Some(50.0),
                vram_total_mb: Some(4096),
                vram_used_mb: Some(1024),
            })
        }
    }

    #[test]
    fn collect_without_gpu_backend_yields_sane_sample() {
        let collector = SystemCollector::with_gpu(None);
        let sample = collector.collect().expect("host counters should read");

        assert!(sample.gpu.is_none());
        assert!(sample.cpu.threads >= 1);
        assert!(sample.cpu.cores >= 1);
        assert!((0.0..=1.0).contains(&sample.cpu.usage));
        assert!(sample.ram.total_mb > 0);
        assert!(sample.ram.used_mb <= sample.ram.total_mb);
        assert!((0.0..=1.0).contains(&sample.ram.usage));
        assert!(sample.timestamp > 0);
    }

    #[test]
    fn gpu_failure_degrades_sample_instead_of_failing_it() {
        let collector = SystemCollector::with_gpu(Some(Box::new(FailingProbe)));
        let sample = collector.collect().expect("cpu/ram still collected");
        assert!(sample.gpu.is_none());
    }

    #[test]
    fn gpu_success_is_attached_to_sample() {
        let collector = SystemCollector::with_gpu(Some(Box::new(FixedProbe)));
        assert_eq!(collector.gpu_vendor(), Some(GpuVendor::Nvidia));
        let sample = collector.collect().unwrap();
        let gpu = sample.gpu.expect("gpu reading should be attached");
        assert_eq!(gpu.model, "Mock GPU");
        assert_eq!(gpu.util, 0.5);
    }
}
