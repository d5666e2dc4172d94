//! Caste classification: a total, deterministic function from
//! [`HardwareFacts`] to a [`Tier`] plus an audit trail.
//!
//! Rule order matters. The base tier comes from the memory architecture,
//! the caps can only demote it, and clearing the RAM floor always leaves
//! at least `User`.

use crate::data::{gib, ClassificationResult, GpuKind, HardwareFacts, Tier, GIB, MIB};
use tracing::debug;

/// 8 GiB minus room for firmware/OS-reserved memory.
pub const RAM_FLOOR: u64 = 8 * GIB - 512 * MIB;

/// RAM needed before a vendor-special iGPU earns the Developer floor.
pub const VENDOR_ARC_MIN_RAM: u64 = gib(16);

/// Appends rule outcomes in firing order.
#[derive(Debug, Default)]
struct Trail(Vec<&'static str>);

impl Trail {
    fn push(&mut self, entry: &'static str) {
        self.0.push(entry);
    }

    fn finish(self) -> String {
        self.0.join("; ")
    }
}

/// Base tier for a discrete GPU.
pub fn tier_from_vram(vram_bytes: u64) -> Tier {
    if vram_bytes >= gib(24) {
        Tier::Rig
    } else if vram_bytes >= gib(16) {
        Tier::Workstation
    } else if vram_bytes >= gib(6) {
        Tier::Developer
    } else if vram_bytes >= gib(2) {
        Tier::User
    } else {
        Tier::Mini
    }
}

/// Base tier for a unified-memory platform, where RAM is the GPU budget.
pub fn tier_from_unified_ram(ram_bytes: u64) -> Tier {
    if ram_bytes >= gib(64) {
        Tier::Rig
    } else if ram_bytes >= gib(32) {
        Tier::Workstation
    } else if ram_bytes >= gib(24) {
        Tier::Developer
    } else {
        Tier::User
    }
}

/// Highest tier the installed RAM can support.
pub fn ram_cap(ram_bytes: u64) -> Tier {
    if ram_bytes < RAM_FLOOR {
        Tier::Mini
    } else if ram_bytes < gib(24) {
        // 16-23 GiB is still User
        Tier::User
    } else if ram_bytes < gib(32) {
        Tier::Developer
    } else if ram_bytes < gib(64) {
        Tier::Workstation
    } else {
        Tier::Rig
    }
}

/// Gentle CPU cap. Physical cores are used when known, else logical
/// threads; with neither known there is no cap.
pub fn cpu_cap(physical_cores: u32, logical_threads: u32) -> Tier {
    if physical_cores > 0 {
        match physical_cores {
            0..=3 => Tier::Mini,
            4..=5 => Tier::User,
            _ => Tier::Rig,
        }
    } else if logical_threads > 0 {
        match logical_threads {
            0..=7 => Tier::Mini,
            8..=11 => Tier::User,
            _ => Tier::Rig,
        }
    } else {
        Tier::Rig
    }
}

/// Classify a hardware snapshot. Never fails.
pub fn classify(hw: &HardwareFacts) -> ClassificationResult {
    let mut trail = Trail::default();

    if hw.ram_bytes < RAM_FLOOR {
        trail.push("RAM below floor");
        return ClassificationResult {
            tier: Tier::Mini,
            reason: trail.finish(),
        };
    }

    let is_discrete = hw.gpu.kind == GpuKind::Discrete || hw.gpu.has_discrete;
    let mut tier = if is_discrete {
        trail.push("discrete GPU VRAM ladder");
        tier_from_vram(hw.gpu.vram_bytes)
    } else if hw.gpu.kind == GpuKind::Unified || hw.is_unified_memory_platform {
        trail.push("unified memory RAM ladder");
        tier_from_unified_ram(hw.ram_bytes)
    } else if hw.gpu.kind == GpuKind::Integrated {
        trail.push("integrated GPU baseline");
        Tier::User
    } else {
        trail.push("no GPU detected baseline");
        Tier::User
    };

    if !is_discrete && hw.gpu.has_vendor_arc_hint {
        if hw.ram_bytes >= VENDOR_ARC_MIN_RAM {
            tier = tier.max(Tier::Developer);
            trail.push("vendor-special iGPU with >=16 GiB RAM => Developer floor");
        } else {
            trail.push("vendor-special iGPU with <16 GiB RAM => no bump");
        }
    }

    let ram_limit = ram_cap(hw.ram_bytes);
    let cpu_limit = cpu_cap(hw.physical_cores, hw.logical_threads);
    tier = tier.min(ram_limit).min(cpu_limit);

    // Caps demote from a high base but never below the floor's baseline.
    tier = tier.max(Tier::User);

    if ram_limit != Tier::Rig {
        trail.push("RAM cap applied");
    }
    if cpu_limit != Tier::Rig {
        trail.push("CPU cap applied");
    }

    let reason = trail.finish();
    debug!(tier = %tier, %reason, "classified hardware");
    ClassificationResult { tier, reason }
}
