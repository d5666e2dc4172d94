//! Text output for the CLI. Everything returns a `String` so the binary
//! only decides what to print.

use crate::collectors::HostProbe;
use crate::data::{ClassificationResult, HardwareFacts};
use crate::selector::score;
use std::fmt::Write;

/// The tier word, optionally followed by `separator` and the reason trail.
pub fn render_tier(result: &ClassificationResult, with_reason: bool, separator: &str) -> String {
    if with_reason && !result.reason.is_empty() {
        format!("{}{}{}", result.tier, separator, result.reason)
    } else {
        result.tier.to_string()
    }
}

/// Facts as `key=value` lines.
pub fn render_hwfacts(hw: &HardwareFacts) -> String {
    let rows: [(&str, String); 8] = [
        ("ram_bytes", hw.ram_bytes.to_string()),
        ("physical_cores", hw.physical_cores.to_string()),
        ("logical_threads", hw.logical_threads.to_string()),
        ("gpu_kind", hw.gpu.kind.to_string()),
        ("vram_bytes", hw.gpu.vram_bytes.to_string()),
        ("has_discrete_gpu", hw.gpu.has_discrete.to_string()),
        ("unified_memory", hw.is_unified_memory_platform.to_string()),
        ("vendor_arc_hint", hw.gpu.has_vendor_arc_hint.to_string()),
    ];

    let mut out = String::new();
    for (key, value) in rows {
        let _ = writeln!(out, "{}={}", key, value);
    }
    out
}

/// One `key=value` line per probed GPU candidate, with its score.
pub fn render_gpus(probe: &HostProbe) -> String {
    let selected = probe.selected_gpu();
    let mut out = String::new();
    let _ = writeln!(out, "gpu_count={}", probe.gpus.len());

    for (idx, gpu) in probe.gpus.iter().enumerate() {
        let _ = writeln!(
            out,
            "gpu{} vendor={} name=\"{}\" vram_bytes={} discrete={} virtual={} arc={} score={} selected={}",
            idx,
            gpu.vendor().name(),
            gpu.label(),
            gpu.vram_bytes,
            gpu.is_discrete_hint,
            gpu.is_virtual_hint,
            gpu.is_vendor_arc_hint,
            score(gpu),
            selected == Some(idx),
        );
    }
    out
}
