//! CPU metrics from OS counters.

use sysinfo::System;

use crate::collector::CollectError;
use crate::sample::CpuMetrics;

/// Read CPU metrics from an already-refreshed [`System`].
///
/// Usage is the delta since the previous refresh, so the caller must keep
/// the `System` alive between samples. Load averages are reported on unix
/// only; other platforms leave them absent.
pub fn read(system: &System) -> Result<CpuMetrics, CollectError> {
    let cpus = system.cpus();
    if cpus.is_empty() {
        return Err(CollectError::Cpu("no cpus reported".to_string()));
    }

    let threads = cpus.len();
    let cores = System::physical_core_count().unwrap_or(threads);
    let model = cpus[0].brand().trim().to_string();
    let frequency = cpus[0].frequency();

    Ok(CpuMetrics {
        model,
        cores,
        threads,
        usage: (f64::from(system.global_cpu_usage()) / 100.0).clamp(0.0, 1.0),
        load_avg: load_avg(),
        frequency_mhz: (frequency > 0).then_some(frequency as f64),
    })
}

#[cfg(unix)]
fn load_avg() -> Option<[f64; 3]> {
    let avg = System::load_average();
    Some([avg.one, avg.five, avg.fifteen])
}

#[cfg(not(unix))]
fn load_avg() -> Option<[f64; 3]> {
    None
}
