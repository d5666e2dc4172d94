//! NVIDIA VRAM via `nvidia-smi`, shared by the Linux and Windows probes.

use crate::data::{GpuCandidate, MIB};
use crate::hints::VENDOR_NVIDIA;
use crate::utils::command::run_command;
use crate::utils::parsing::parse_u64;
use tracing::debug;

/// Largest `memory.total` (MiB) reported by `nvidia-smi`, in bytes.
pub fn parse_memory_total(output: &str) -> u64 {
    output
        .lines()
        .filter_map(|line| parse_u64(line.split(',').next().unwrap_or("")))
        .max()
        .unwrap_or(0)
        .saturating_mul(MIB)
}

/// Attach the driver-reported VRAM to every NVIDIA candidate.
///
/// Only runs `nvidia-smi` when an NVIDIA device was seen. The largest
/// device's VRAM is used for all of them.
pub fn attach_vram(gpus: &mut [GpuCandidate]) {
    if !gpus.iter().any(|g| g.vendor_id == Some(VENDOR_NVIDIA)) {
        return;
    }

    let vram = match run_command(
        "nvidia-smi",
        &["--query-gpu=memory.total", "--format=csv,noheader,nounits"],
    ) {
        Ok(output) => parse_memory_total(&output),
        Err(err) => {
            debug!(%err, "nvidia-smi unavailable, NVIDIA VRAM unknown");
            return;
        }
    };
    if vram == 0 {
        return;
    }

    for gpu in gpus.iter_mut().filter(|g| g.vendor_id == Some(VENDOR_NVIDIA)) {
        gpu.vram_bytes = gpu.vram_bytes.max(vram);
        gpu.is_discrete_hint = true;
    }
}
