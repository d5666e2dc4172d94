//! Host hardware collection (memory, CPU, GPU candidates)

use super::CpuCounts;
use crate::data::{GpuCandidate, HardwareFacts};
use crate::selector;
use tracing::debug;

#[cfg(target_os = "linux")]
use super::linux as platform;
#[cfg(target_os = "macos")]
use super::macos as platform;
#[cfg(any(
    target_os = "freebsd",
    target_os = "dragonfly",
    target_os = "netbsd",
    target_os = "openbsd"
))]
use super::bsd as platform;
#[cfg(windows)]
use super::windows as platform;

/// Raw result of one probe pass, before GPU selection.
#[derive(Debug, Clone, Default)]
pub struct HostProbe {
    pub ram_bytes: u64,
    pub cpu: CpuCounts,
    /// CPU and GPU share one memory pool
    pub unified_memory: bool,
    pub gpus: Vec<GpuCandidate>,
}

impl HostProbe {
    /// Index of the candidate the selector picks, if one is used at all.
    pub fn selected_gpu(&self) -> Option<usize> {
        if self.unified_memory {
            return None;
        }
        selector::best_index(&self.gpus)
    }

    /// Reduce the probe to the normalized facts record.
    pub fn facts(&self) -> HardwareFacts {
        let gpu = selector::select_gpu(&self.gpus);
        HardwareFacts::new(
            self.ram_bytes,
            self.cpu.physical_cores,
            self.cpu.logical_threads,
            gpu,
        )
        .with_unified_memory(self.unified_memory)
    }
}

/// Probe the current host (parallelized for speed)
pub fn probe_host() -> HostProbe {
    let ((ram_bytes, mut cpu), (unified_memory, gpus)) = rayon::join(
        || rayon::join(platform::read_total_ram, platform::read_cpu_counts),
        || rayon::join(platform::is_unified_memory, platform::enumerate_gpus),
    );

    if cpu.logical_threads == 0 {
        cpu.logical_threads = super::available_threads();
    }

    debug!(
        ram_bytes,
        physical_cores = cpu.physical_cores,
        logical_threads = cpu.logical_threads,
        unified_memory,
        gpu_count = gpus.len(),
        "host probe complete"
    );

    HostProbe {
        ram_bytes,
        cpu,
        unified_memory,
        gpus,
    }
}

#[cfg(not(any(
    target_os = "linux",
    target_os = "macos",
    target_os = "freebsd",
    target_os = "dragonfly",
    target_os = "netbsd",
    target_os = "openbsd",
    windows
)))]
mod platform {
    use super::{CpuCounts, GpuCandidate};

    pub fn read_total_ram() -> u64 {
        0
    }

    pub fn read_cpu_counts() -> CpuCounts {
        CpuCounts::default()
    }

    pub fn is_unified_memory() -> bool {
        false
    }

    pub fn enumerate_gpus() -> Vec<GpuCandidate> {
        Vec::new()
    }
}
