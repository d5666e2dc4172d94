//! GPU selection: score every candidate the probe found and reduce the
//! winner to a [`GpuSummary`].
//!
//! Score terms are weighted so that category always dominates magnitude:
//! virtual penalty > discrete bonus > VRAM (capped) > vendor preference >
//! vendor-special bonus.

use crate::data::{GpuCandidate, GpuKind, GpuSummary, GpuVendor};

pub const DISCRETE_BONUS: i64 = 1_000_000_000;
/// Raw byte count used as a tie-breaker, kept below the discrete bonus.
pub const VRAM_SCORE_CAP: u64 = 999_000_000;
pub const VENDOR_ARC_BONUS: i64 = 500;
pub const VIRTUAL_PENALTY: i64 = 2_000_000_000;

/// Tie-break bonus per vendor family.
pub fn vendor_preference(vendor: GpuVendor) -> i64 {
    match vendor {
        GpuVendor::Nvidia => 10_000,
        GpuVendor::Amd => 5_000,
        GpuVendor::Intel => 1_000,
        GpuVendor::Apple | GpuVendor::Other => 0,
    }
}

/// Relevance score of a single candidate; higher wins.
pub fn score(candidate: &GpuCandidate) -> i64 {
    let mut s = 0i64;
    if candidate.is_discrete_hint {
        s += DISCRETE_BONUS;
    }
    // VRAM_SCORE_CAP fits in i64
    s += candidate.vram_bytes.min(VRAM_SCORE_CAP) as i64;
    s += vendor_preference(candidate.vendor());
    if candidate.is_vendor_arc_hint {
        s += VENDOR_ARC_BONUS;
    }
    if candidate.is_virtual_hint {
        s -= VIRTUAL_PENALTY;
    }
    s
}

/// Index of the highest-scoring candidate; the first maximum wins ties.
pub fn best_index(candidates: &[GpuCandidate]) -> Option<usize> {
    let mut best: Option<(usize, i64)> = None;
    for (idx, candidate) in candidates.iter().enumerate() {
        let s = score(candidate);
        match best {
            Some((_, best_score)) if s <= best_score => {}
            _ => best = Some((idx, s)),
        }
    }
    best.map(|(idx, _)| idx)
}

/// Reduce a winning candidate to the canonical summary.
pub fn summarize(candidate: &GpuCandidate) -> GpuSummary {
    let summary = if candidate.is_virtual_hint {
        GpuSummary::none()
    } else if candidate.is_discrete_hint {
        GpuSummary::discrete(candidate.vram_bytes)
    } else {
        GpuSummary {
            kind: GpuKind::Integrated,
            ..GpuSummary::none()
        }
    };
    summary.with_vendor_arc_hint(candidate.is_vendor_arc_hint)
}

/// Pick the most relevant GPU. An empty slice yields `GpuKind::None`.
pub fn select_gpu(candidates: &[GpuCandidate]) -> GpuSummary {
    match best_index(candidates) {
        Some(idx) => summarize(&candidates[idx]),
        None => GpuSummary::none(),
    }
}
