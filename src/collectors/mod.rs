//! Platform probes. Every probe is best-effort: failures are logged and
//! turned into "unknown" (0 / empty), never returned to the caller.

pub mod bsd;
pub mod hardware;
pub mod linux;
pub mod macos;
pub mod nvidia;
pub mod windows;

pub use hardware::{probe_host, HostProbe};

/// CPU core counts; 0 means unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuCounts {
    pub physical_cores: u32,
    pub logical_threads: u32,
}

/// Logical CPU count from the standard library, 0 if unavailable.
pub fn available_threads() -> u32 {
    std::thread::available_parallelism()
        .ok()
        .and_then(|n| u32::try_from(n.get()).ok())
        .unwrap_or(0)
}
