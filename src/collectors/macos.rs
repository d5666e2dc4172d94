//! macOS probe: `sysctlbyname` for memory and CPU, `system_profiler` for
//! GPUs on Intel Macs. Apple Silicon is a unified-memory platform and skips
//! GPU enumeration.
#![cfg_attr(not(target_os = "macos"), allow(dead_code))]

#[cfg(target_os = "macos")]
use super::CpuCounts;
use crate::data::GpuCandidate;
use crate::hints::{pci_id_for_vendor, vendor_from_name};
use crate::utils::parsing::{parse_hex_u32, parse_size_bytes, split_key_value};

#[cfg(target_os = "macos")]
mod sys {
    use crate::error::{CasteError, Result};
    use std::ffi::CString;

    /// Read a fixed-size sysctl value.
    pub fn sysctl_by_name<T: Copy + Default>(name: &str) -> Result<T> {
        let cname = CString::new(name).map_err(|_| CasteError::Parse(format!("bad sysctl name {}", name)))?;
        let mut value = T::default();
        let mut len = std::mem::size_of::<T>();
        // SAFETY: value and len describe a writable buffer of exactly size_of::<T>() bytes.
        let rc = unsafe {
            libc::sysctlbyname(
                cname.as_ptr(),
                &mut value as *mut T as *mut libc::c_void,
                &mut len,
                std::ptr::null_mut(),
                0,
            )
        };
        if rc != 0 {
            return Err(std::io::Error::last_os_error().into());
        }
        if len != std::mem::size_of::<T>() {
            return Err(CasteError::Detection(format!("sysctl {} returned {} bytes", name, len)));
        }
        Ok(value)
    }
}

#[cfg(target_os = "macos")]
pub fn read_total_ram() -> u64 {
    sys::sysctl_by_name::<u64>("hw.memsize").unwrap_or_else(|err| {
        tracing::debug!(%err, "hw.memsize unavailable");
        0
    })
}

#[cfg(target_os = "macos")]
pub fn read_cpu_counts() -> CpuCounts {
    let read = |primary: &str, fallback: &str| -> u32 {
        sys::sysctl_by_name::<i32>(primary)
            .or_else(|_| sys::sysctl_by_name::<i32>(fallback))
            .map(|n| n.max(0) as u32)
            .unwrap_or(0)
    };
    CpuCounts {
        physical_cores: read("hw.physicalcpu", "hw.physicalcpu_max"),
        logical_threads: read("hw.logicalcpu", "hw.logicalcpu_max"),
    }
}

/// Apple Silicon (`hw.optional.arm64`) shares one memory pool.
#[cfg(target_os = "macos")]
pub fn is_unified_memory() -> bool {
    matches!(sys::sysctl_by_name::<i32>("hw.optional.arm64"), Ok(1))
}

#[cfg(target_os = "macos")]
pub fn enumerate_gpus() -> Vec<GpuCandidate> {
    if is_unified_memory() {
        return Vec::new();
    }
    match crate::utils::command::run_command("system_profiler", &["SPDisplaysDataType"]) {
        Ok(output) => parse_system_profiler(&output),
        Err(err) => {
            tracing::debug!(%err, "system_profiler failed");
            Vec::new()
        }
    }
}

#[derive(Default)]
struct DisplayRecord {
    chipset: String,
    vendor: String,
    vendor_id: Option<u32>,
    device_id: Option<u32>,
    vram_total: u64,
    pcie: bool,
}

impl DisplayRecord {
    fn into_candidate(self) -> GpuCandidate {
        let vendor_id = self
            .vendor_id
            .or_else(|| vendor_from_name(&self.vendor).and_then(pci_id_for_vendor));
        let mut candidate = match vendor_id {
            Some(vendor) => GpuCandidate::from_pci_ids(vendor, self.device_id.unwrap_or(0)),
            None => GpuCandidate::default(),
        };
        candidate.apply_name_hints(&self.vendor, &self.chipset, false);
        candidate.vendor_name = (!self.vendor.is_empty()).then_some(self.vendor);
        candidate.device_name = Some(self.chipset);
        if self.pcie || self.vram_total > 0 {
            candidate.is_discrete_hint = true;
        }
        candidate.vram_bytes = self.vram_total;
        candidate
    }
}

/// Parse `system_profiler SPDisplaysDataType`. Each `Chipset Model` line
/// opens a new record. Only `VRAM (Total)` counts as dedicated memory;
/// `VRAM (Dynamic, Max)` is shared.
pub fn parse_system_profiler(output: &str) -> Vec<GpuCandidate> {
    let mut records: Vec<DisplayRecord> = Vec::new();

    for line in output.lines() {
        let Some((key, value)) = split_key_value(line, ':') else {
            continue;
        };
        if key == "Chipset Model" {
            records.push(DisplayRecord {
                chipset: value.to_string(),
                ..Default::default()
            });
            continue;
        }
        let Some(record) = records.last_mut() else {
            continue;
        };
        match key {
            "Vendor" => {
                // e.g. "AMD (0x1002)" or "Intel"
                let (name, id) = match value.split_once('(') {
                    Some((name, rest)) => (name.trim(), parse_hex_u32(rest.trim_end_matches(')'))),
                    None => (value, None),
                };
                record.vendor = name.to_string();
                record.vendor_id = id;
            }
            "Device ID" => record.device_id = parse_hex_u32(value),
            "VRAM (Total)" => record.vram_total = parse_size_bytes(value).unwrap_or(0),
            "Bus" => record.pcie = value.eq_ignore_ascii_case("PCIe"),
            _ => {}
        }
    }

    records.into_iter().map(DisplayRecord::into_candidate).collect()
}
