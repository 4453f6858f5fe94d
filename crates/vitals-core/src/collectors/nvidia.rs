//! NVIDIA GPU metrics via `nvidia-smi`.

use crate::collector::CollectError;
use crate::sample::{GpuMetrics, GpuVendor};

use super::GpuProbe;
use super::helpers::run_command;

/// GPU probe backed by the `nvidia-smi` query interface.
pub struct NvidiaSmi;

const QUERY_ARGS: &[&str] = &[
    "--query-gpu=name,utilization.gpu,temperature.gpu,memory.total,memory.used",
    "--format=csv,noheader,nounits",
];

impl GpuProbe for NvidiaSmi {
    fn vendor(&self) -> GpuVendor {
        GpuVendor::Nvidia
    }

    fn read(&self) -> Result<GpuMetrics, CollectError> {
        let output = run_command("nvidia-smi", QUERY_ARGS)?;
        parse_query_output(&output)
    }
}

/// Parse `nvidia-smi` CSV output; only the first GPU line is used.
fn parse_query_output(output: &str) -> Result<GpuMetrics, CollectError> {
    let line = output
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .ok_or_else(|| CollectError::Gpu("nvidia-smi returned no gpu lines".to_string()))?;

    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() < 5 {
        return Err(CollectError::Gpu(format!(
            "unexpected nvidia-smi output: {line:?}"
        )));
    }

    // Fields reported as "[N/A]" parse as None rather than failing the read.
    let util: f64 = fields[1].parse().unwrap_or(0.0);
    Ok(GpuMetrics {
        vendor: GpuVendor::Nvidia,
        model: fields[0].to_string(),
        util: (util / 100.0).clamp(0.0, 1.0),
        temperature_c: fields[2].parse().ok(),
        vram_total_mb: fields[3].parse().ok(),
        vram_used_mb: fields[4].parse().ok(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_gpu_line() {
        let out = "NVIDIA GeForce RTX 3080, 35, 62, 10240, 1024\n";
        let gpu = parse_query_output(out).unwrap();
        assert_eq!(gpu.model, "NVIDIA GeForce RTX 3080");
        assert!((gpu.util - 0.35).abs() < 1e-9);
        assert_eq!(gpu.temperature_c, Some(62.0));
        assert_eq!(gpu.vram_total_mb, Some(10240));
        assert_eq!(gpu.vram_used_mb, Some(1024));
    }

    #[test]
    fn uses_first_gpu_when_several_reported() {
        let out = "GPU A, 10, 40, 8192, 100\nGPU B, 90, 80, 8192, 8000\n";
        let gpu = parse_query_output(out).unwrap();
        assert_eq!(gpu.model, "GPU A");
        assert!((gpu.util - 0.10).abs() < 1e-9);
    }

    #[test]
    fn not_available_fields_become_absent() {
        let out = "Tesla K80, 12, [N/A], [N/A], [N/A]\n";
        let gpu = parse_query_output(out).unwrap();
        assert_eq!(gpu.temperature_c, None);
        assert_eq!(gpu.vram_total_mb, None);
    }

    #[test]
    fn empty_and_truncated_output_are_errors() {
        assert!(parse_query_output("").is_err());
        assert!(parse_query_output("\n\n").is_err());
        assert!(parse_query_output("just a name, 10\n").is_err());
    }
}
