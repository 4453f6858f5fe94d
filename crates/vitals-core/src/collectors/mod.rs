//! Metric-family collectors and GPU backend probing.
//!
//! CPU and RAM read OS counters through `sysinfo`; GPU readings shell out to
//! vendor tooling. The GPU backend is selected once at startup by
//! [`detect_gpu`] — whichever vendor tool is found on `PATH` first wins, and
//! there is no re-selection at runtime.

pub mod amd;
pub mod cpu;
pub(crate) mod helpers;
pub mod nvidia;
pub mod ram;

use crate::collector::CollectError;
use crate::sample::{GpuMetrics, GpuVendor};

/// Capability for reading one GPU utilization snapshot from vendor tooling.
pub trait GpuProbe: Send + Sync {
    /// Vendor whose tooling backs this probe.
    fn vendor(&self) -> GpuVendor;

    /// Read one GPU metrics snapshot.
    fn read(&self) -> Result<GpuMetrics, CollectError>;
}

/// Discover a GPU backend on this machine.
///
/// Tries `nvidia-smi` first, then `rocm-smi`. Returns `None` when neither
/// tool is present — the agent then reports samples without a `gpu` field.
pub fn detect_gpu() -> Option<Box<dyn GpuProbe>> {
    if helpers::command_exists("nvidia-smi") {
        return Some(Box::new(nvidia::NvidiaSmi));
    }
    if helpers::command_exists("rocm-smi") {
        return Some(Box::new(amd::RocmSmi));
    }
    None
}
