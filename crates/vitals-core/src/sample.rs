//! Immutable metric sample types.
//!
//! A [`Sample`] is one point-in-time snapshot of host metrics. Samples are
//! never mutated after construction; the store only replaces whole buffer
//! slots. The `timestamp` field (unix epoch milliseconds) is the sole
//! ordering and windowing key.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// One immutable snapshot of host metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sample {
    /// Unix epoch milliseconds at which the sample was taken.
    pub timestamp: u64,
    pub cpu: CpuMetrics,
    pub ram: RamMetrics,
    /// Present only when a GPU backend was detected and its read succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpu: Option<GpuMetrics>,
}

impl Sample {
    /// Assemble a sample timestamped now.
    pub fn new(cpu: CpuMetrics, ram: RamMetrics, gpu: Option<GpuMetrics>) -> Self {
        Self {
            timestamp: now_unix_ms(),
            cpu,
            ram,
            gpu,
        }
    }
}

/// CPU usage and topology.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CpuMetrics {
    /// CPU brand/model string, empty if unknown.
    pub model: String,
    /// Physical core count.
    pub cores: usize,
    /// Logical CPU (thread) count.
    pub threads: usize,
    /// Overall usage ratio in `[0.0, 1.0]`.
    pub usage: f64,
    /// 1/5/15 minute load averages (unix only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_avg: Option<[f64; 3]>,
    /// Current frequency of the first CPU in MHz, when reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_mhz: Option<f64>,
}

/// Memory capacity and usage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RamMetrics {
    pub total_mb: u64,
    pub used_mb: u64,
    /// OS "available" memory (free + reclaimable buffers/cache), so that
    /// `total ≈ used + free`. Not the stricter "completely free" counter.
    pub free_mb: u64,
    /// Usage ratio in `[0.0, 1.0]`.
    pub usage: f64,
}

/// GPU utilization, read from vendor tooling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GpuMetrics {
    pub vendor: GpuVendor,
    pub model: String,
    /// Utilization ratio in `[0.0, 1.0]`.
    pub util: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_c: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vram_total_mb: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vram_used_mb: Option<u64>,
}

/// GPU vendor whose tooling backs the reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GpuVendor {
    Nvidia,
    Amd,
}

impl std::fmt::Display for GpuVendor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nvidia => write!(f, "nvidia"),
            Self::Amd => write!(f, "amd"),
        }
    }
}

/// Current unix epoch time in milliseconds.
pub fn now_unix_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
