//! RAM metrics from OS counters.

use sysinfo::System;

use crate::collector::CollectError;
use crate::sample::RamMetrics;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Read memory metrics from an already-refreshed [`System`].
///
/// `free_mb` is the OS "available" counter (free plus reclaimable
/// buffers/cache) rather than strictly free pages, so `total ≈ used + free`
/// holds on Linux.
pub fn read(system: &System) -> Result<RamMetrics, CollectError> {
    let total = system.total_memory();
    if total == 0 {
        return Err(CollectError::Ram("total memory reported as zero".to_string()));
    }
    let used = system.used_memory();
    let available = system.available_memory();

    Ok(RamMetrics {
        total_mb: total / BYTES_PER_MB,
        used_mb: used / BYTES_PER_MB,
        free_mb: available / BYTES_PER_MB,
        usage: (used as f64 / total as f64).clamp(0.0, 1.0),
    })
}
