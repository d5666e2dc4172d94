//! Hardware-facing structures: GPU candidates, the reduced GPU summary and
//! the normalized facts record that gets classified.

use crate::hints;
use serde::Deserialize;
use std::fmt;

pub const MIB: u64 = 1024 * 1024;
pub const GIB: u64 = 1024 * MIB;

/// `n` GiB in bytes, saturating at `u64::MAX`.
pub const fn gib(n: u64) -> u64 {
    n.saturating_mul(GIB)
}

/// Memory architecture of the selected GPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GpuKind {
    #[default]
    None,
    /// Shared system memory (Intel UHD/Iris, AMD APUs)
    Integrated,
    /// Shared but fast memory pool (SoC platforms)
    Unified,
    /// Dedicated VRAM
    Discrete,
}

impl GpuKind {
    pub fn name(self) -> &'static str {
        match self {
            GpuKind::None => "none",
            GpuKind::Integrated => "integrated",
            GpuKind::Unified => "unified",
            GpuKind::Discrete => "discrete",
        }
    }
}

impl fmt::Display for GpuKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Known GPU vendor families, in no particular order.
///
/// Preference between them is a scoring concern, see [`crate::selector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GpuVendor {
    Nvidia,
    Amd,
    Intel,
    Apple,
    Other,
}

impl GpuVendor {
    pub fn name(self) -> &'static str {
        match self {
            GpuVendor::Nvidia => "nvidia",
            GpuVendor::Amd => "amd",
            GpuVendor::Intel => "intel",
            GpuVendor::Apple => "apple",
            GpuVendor::Other => "other",
        }
    }
}

/// One display-class device seen by a platform probe.
///
/// Zero and `None` fields mean "unknown"; the selector tolerates all of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GpuCandidate {
    pub vendor_id: Option<u32>,
    pub vendor_name: Option<String>,
    pub device_id: Option<u32>,
    pub device_name: Option<String>,
    /// 0 = unknown / unreported
    pub vram_bytes: u64,
    pub is_discrete_hint: bool,
    /// Virtualization or remote-display adapter
    pub is_virtual_hint: bool,
    /// Vendor-specific "mid-tier raise" signal (Arc-class parts)
    pub is_vendor_arc_hint: bool,
}

impl GpuCandidate {
    /// Vendor family from the PCI id when present, else from the names.
    pub fn vendor(&self) -> GpuVendor {
        if let Some(vendor) = self.vendor_id.and_then(hints::vendor_from_id) {
            return vendor;
        }
        [self.vendor_name.as_deref(), self.device_name.as_deref()]
            .into_iter()
            .flatten()
            .find_map(hints::vendor_from_name)
            .unwrap_or(GpuVendor::Other)
    }

    pub fn with_vram(mut self, vram_bytes: u64) -> Self {
        self.vram_bytes = vram_bytes;
        self
    }

    /// Best human-readable label for diagnostics.
    pub fn label(&self) -> String {
        match (&self.vendor_name, &self.device_name) {
            (_, Some(device)) if !device.is_empty() => device.clone(),
            (Some(vendor), _) if !vendor.is_empty() => vendor.clone(),
            _ => format!(
                "{:04x}:{:04x}",
                self.vendor_id.unwrap_or(0),
                self.device_id.unwrap_or(0)
            ),
        }
    }
}

/// Canonical reduced GPU view fed to classification.
///
/// `vram_bytes` is only ever non-zero for [`GpuKind::Discrete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GpuSummary {
    pub kind: GpuKind,
    pub vram_bytes: u64,
    pub has_discrete: bool,
    pub has_vendor_arc_hint: bool,
}

impl GpuSummary {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn integrated() -> Self {
        Self {
            kind: GpuKind::Integrated,
            ..Self::default()
        }
    }

    pub fn unified() -> Self {
        Self {
            kind: GpuKind::Unified,
            ..Self::default()
        }
    }

    /// Discrete GPU; 0 VRAM means "discrete but unknown capacity".
    pub fn discrete(vram_bytes: u64) -> Self {
        Self {
            kind: GpuKind::Discrete,
            vram_bytes,
            has_discrete: true,
            has_vendor_arc_hint: false,
        }
    }

    pub fn with_vendor_arc_hint(mut self, hint: bool) -> Self {
        self.has_vendor_arc_hint = hint;
        self
    }

    /// Re-establish the VRAM invariant after fields were edited by hand.
    pub fn normalized(mut self) -> Self {
        if self.kind == GpuKind::Discrete {
            self.has_discrete = true;
        } else {
            self.vram_bytes = 0;
            self.has_discrete = false;
        }
        self
    }
}

/// Normalized hardware snapshot consumed by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HardwareFacts {
    pub ram_bytes: u64,
    /// 0 = unknown
    pub physical_cores: u32,
    /// 0 = unknown
    pub logical_threads: u32,
    pub gpu: GpuSummary,
    pub is_unified_memory_platform: bool,
}

impl HardwareFacts {
    pub fn new(ram_bytes: u64, physical_cores: u32, logical_threads: u32, gpu: GpuSummary) -> Self {
        Self {
            ram_bytes,
            physical_cores,
            logical_threads,
            gpu,
            is_unified_memory_platform: false,
        }
    }

    /// Facts for a platform where CPU and GPU share one memory pool.
    pub fn unified_memory(ram_bytes: u64, physical_cores: u32, logical_threads: u32) -> Self {
        Self::new(ram_bytes, physical_cores, logical_threads, GpuSummary::default())
            .with_unified_memory(true)
    }

    /// Set the unified-memory flag, forcing a `Unified` GPU when it is on.
    pub fn with_unified_memory(mut self, unified: bool) -> Self {
        self.is_unified_memory_platform = unified;
        if unified {
            self.gpu = GpuSummary::unified().with_vendor_arc_hint(self.gpu.has_vendor_arc_hint);
        }
        self
    }
}
