//! AMD GPU metrics via `rocm-smi`.
//!
//! `rocm-smi` has no machine-readable single-shot query comparable to
//! `nvidia-smi --query-gpu`, so this probe scrapes its line-oriented output
//! for the first GPU's utilization, temperature, and VRAM counters.

use crate::collector::CollectError;
use crate::sample::{GpuMetrics, GpuVendor};

use super::GpuProbe;
use super::helpers::run_command;

/// GPU probe backed by `rocm-smi`.
pub struct RocmSmi;

const QUERY_ARGS: &[&str] = &["--showuse", "--showtemp", "--showmeminfo", "vram"];

const BYTES_PER_MB: f64 = (1024 * 1024) as f64;

impl GpuProbe for RocmSmi {
    fn vendor(&self) -> GpuVendor {
        GpuVendor::Amd
    }

    fn read(&self) -> Result<GpuMetrics, CollectError> {
        let output = run_command("rocm-smi", QUERY_ARGS)?;
        parse_output(&output)
    }
}

fn parse_output(output: &str) -> Result<GpuMetrics, CollectError> {
    let mut util: Option<f64> = None;
    let mut temperature: Option<f64> = None;
    let mut vram_total: Option<u64> = None;
    let mut vram_used: Option<u64> = None;

    for line in output.lines() {
        if line.contains("GPU use") {
            util = util.or_else(|| trailing_number(line));
        } else if line.contains("Temperature") {
            temperature = temperature.or_else(|| trailing_number(line));
        } else if line.contains("VRAM Total Used Memory") || line.contains("VRAM Used") {
            vram_used = vram_used.or_else(|| memory_mb(line));
        } else if line.contains("VRAM Total Memory") || line.contains("VRAM Total") {
            vram_total = vram_total.or_else(|| memory_mb(line));
        }
    }

    let util = util.ok_or_else(|| {
        CollectError::Gpu("rocm-smi output carried no GPU use line".to_string())
    })?;

    Ok(GpuMetrics {
        vendor: GpuVendor::Amd,
        // rocm-smi's default tables don't carry a marketing name.
        model: "AMD GPU".to_string(),
        util: (util / 100.0).clamp(0.0, 1.0),
        temperature_c: temperature,
        vram_total_mb: vram_total,
        vram_used_mb: vram_used,
    })
}

/// Last whitespace-separated numeric token on the line, stripped of `%`/`c`
/// suffixes rocm-smi sometimes attaches.
fn trailing_number(line: &str) -> Option<f64> {
    line.split_whitespace()
        .rev()
        .find_map(|tok| tok.trim_end_matches(['%', 'c', 'C']).parse::<f64>().ok())
}

/// Memory value in MB. Lines marked `(B)` report bytes and are converted.
fn memory_mb(line: &str) -> Option<u64> {
    let value = trailing_number(line)?;
    if line.contains("(B)") {
        Some((value / BYTES_PER_MB) as u64)
    } else {
        Some(value as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_OUTPUT: &str = "\
========================= ROCm System Management Interface =========================\n\
GPU[0]\t\t: Temperature (Sensor edge) (C): 41.0\n\
GPU[0]\t\t: GPU use (%): 27\n\
GPU[0]\t\t: VRAM Total Memory (B): 17163091968\n\
GPU[0]\t\t: VRAM Total Used Memory (B): 794869760\n\
=====================================================================================\n";

    #[test]
    fn parses_rocm_smi_tables() {
        let gpu = parse_output(SAMPLE_OUTPUT).unwrap();
        assert_eq!(gpu.vendor, GpuVendor::Amd);
        assert!((gpu.util - 0.27).abs() < 1e-9);
        assert_eq!(gpu.temperature_c, Some(41.0));
        assert_eq!(gpu.vram_total_mb, Some(16368));
        assert_eq!(gpu.vram_used_mb, Some(758));
    }

    #[test]
    fn first_gpu_wins_when_several_listed() {
        let out = "GPU[0]: GPU use (%): 10\nGPU[1]: GPU use (%): 90\n";
        let gpu = parse_output(out).unwrap();
        assert!((gpu.util - 0.10).abs() < 1e-9);
    }

    #[test]
    fn missing_utilization_is_an_error() {
        let out = "GPU[0]: Temperature (Sensor edge) (C): 41.0\n";
        assert!(parse_output(out).is_err());
    }

    #[test]
    fn utilization_alone_still_yields_metrics() {
        let gpu = parse_output("GPU[0]: GPU use (%): 55\n").unwrap();
        assert!((gpu.util - 0.55).abs() < 1e-9);
        assert_eq!(gpu.temperature_c, None);
        assert_eq!(gpu.vram_total_mb, None);
    }
}
