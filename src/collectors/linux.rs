//! Linux probe: `sysinfo(2)`, `/proc` and `/sys/class/drm`, with `lspci`
//! and `nvidia-smi` as best-effort helpers.
#![cfg_attr(not(target_os = "linux"), allow(dead_code))]

use super::{nvidia, CpuCounts};
use crate::data::GpuCandidate;
use crate::error::{CasteError, Result};
use crate::hints::VENDOR_AMD;
use crate::utils::{command::run_command, file::*, parsing::*};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, trace};

const DRM_ROOT: &str = "/sys/class/drm";

pub fn read_total_ram() -> u64 {
    sysinfo_total_ram()
        .or_else(|err| {
            debug!(%err, "sysinfo failed, falling back to /proc/meminfo");
            read_file_safe("/proc/meminfo").and_then(|text| {
                parse_meminfo_total(&text)
                    .ok_or_else(|| CasteError::Detection("MemTotal not found".to_string()))
            })
        })
        .unwrap_or_else(|err| {
            debug!(%err, "total RAM unknown");
            0
        })
}

#[cfg(target_os = "linux")]
fn sysinfo_total_ram() -> Result<u64> {
    // SAFETY: sysinfo only writes into the zeroed struct we hand it.
    unsafe {
        let mut info: libc::sysinfo = std::mem::zeroed();
        if libc::sysinfo(&mut info) != 0 {
            return Err(std::io::Error::last_os_error().into());
        }
        Ok((info.totalram as u64).saturating_mul(info.mem_unit as u64))
    }
}

#[cfg(not(target_os = "linux"))]
fn sysinfo_total_ram() -> Result<u64> {
    Err(CasteError::Detection("sysinfo is Linux-only".to_string()))
}

/// `MemTotal` from `/proc/meminfo`, in bytes. `None` when the value
/// does not fit.
pub fn parse_meminfo_total(text: &str) -> Option<u64> {
    text.lines()
        .find(|line| line.starts_with("MemTotal"))
        .and_then(extract_after_colon)
        .and_then(|value| parse_u64(value.trim_end_matches("kB")))
        .and_then(|kib| kib.checked_mul(1024))
}

pub fn read_cpu_counts() -> CpuCounts {
    match read_file_safe("/proc/cpuinfo") {
        Ok(text) => parse_cpuinfo(&text),
        Err(err) => {
            debug!(%err, "cannot read /proc/cpuinfo");
            CpuCounts::default()
        }
    }
}

/// Logical threads are the `processor` entries; physical cores are the
/// unique `(physical id, core id)` pairs, or 0 when the kernel omits them.
pub fn parse_cpuinfo(text: &str) -> CpuCounts {
    let mut processors = 0u32;
    let mut cores = HashSet::new();
    let mut physical_id: Option<u32> = None;
    let mut core_id: Option<u32> = None;

    let mut flush = |physical_id: &mut Option<u32>, core_id: &mut Option<u32>| {
        if let (Some(p), Some(c)) = (physical_id.take(), core_id.take()) {
            cores.insert((p, c));
        }
    };

    for line in text.lines() {
        if line.trim().is_empty() {
            flush(&mut physical_id, &mut core_id);
            continue;
        }
        let Some((key, value)) = split_key_value(line, ':') else {
            continue;
        };
        match key {
            "processor" => processors = processors.saturating_add(1),
            "physical id" => physical_id = value.parse().ok(),
            "core id" => core_id = value.parse().ok(),
            _ => {}
        }
    }
    flush(&mut physical_id, &mut core_id);

    CpuCounts {
        physical_cores: u32::try_from(cores.len()).unwrap_or(0),
        logical_threads: processors,
    }
}

pub fn is_unified_memory() -> bool {
    false
}

pub fn enumerate_gpus() -> Vec<GpuCandidate> {
    let mut gpus = enumerate_drm(Path::new(DRM_ROOT));

    // Fallback to lspci if sysfs has nothing
    if gpus.is_empty() {
        gpus = match run_command("lspci", &["-nn"]) {
            Ok(output) => parse_lspci(&output),
            Err(err) => {
                debug!(%err, "lspci unavailable");
                Vec::new()
            }
        };
    }

    nvidia::attach_vram(&mut gpus);
    gpus
}

/// Match `card0`, `card1`, ... but not connectors like `card0-DP-1`.
pub fn is_card_name(name: &str) -> bool {
    name.strip_prefix("card")
        .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
}

/// Walk a DRM class directory. Cards are visited in name order so the
/// selector sees a stable sequence.
pub fn enumerate_drm(root: &Path) -> Vec<GpuCandidate> {
    let mut cards: Vec<_> = match fs::read_dir(root) {
        Ok(entries) => entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(is_card_name)
            })
            .collect(),
        Err(err) => {
            debug!(%err, root = %root.display(), "no DRM class directory");
            return Vec::new();
        }
    };
    cards.sort();

    cards
        .iter()
        .filter_map(|card| read_drm_card(&card.join("device")))
        .collect()
}

fn read_drm_card(device: &Path) -> Option<GpuCandidate> {
    let vendor = match read_hex_u32(device.join("vendor")) {
        Ok(vendor) if vendor != 0 => vendor,
        Ok(_) => return None,
        Err(err) => {
            debug!(%err, device = %device.display(), "skipping card without vendor id");
            return None;
        }
    };
    let device_id = read_hex_u32(device.join("device")).unwrap_or(0);
    let mut candidate = GpuCandidate::from_pci_ids(vendor, device_id);

    // amdgpu exposes dedicated VRAM; APUs without it are integrated.
    if vendor == VENDOR_AMD {
        match read_dec_u64(device.join("mem_info_vram_total")) {
            Ok(vram) if vram > 0 => candidate.vram_bytes = vram,
            _ => candidate.is_discrete_hint = false,
        }
    }

    trace!(vendor, device_id, vram = candidate.vram_bytes, "drm card");
    Some(candidate)
}

const LSPCI_DISPLAY_CLASSES: &[&str] = &[
    "VGA compatible controller",
    "3D controller",
    "Display controller",
];

/// Parse `lspci -nn` output into display-class candidates.
pub fn parse_lspci(output: &str) -> Vec<GpuCandidate> {
    output.lines().filter_map(parse_lspci_line).collect()
}

fn parse_lspci_line(line: &str) -> Option<GpuCandidate> {
    let class = LSPCI_DISPLAY_CLASSES.iter().find(|class| line.contains(*class))?;
    let after_class = &line[line.find(*class)?..];
    let mut desc = &after_class[after_class.find(": ")? + 2..];
    if let Some(rev) = desc.find(" (rev ") {
        desc = &desc[..rev];
    }

    let (mut candidate, desc) = match pci_id_pair(desc) {
        Some((vendor, device, start)) => (GpuCandidate::from_pci_ids(vendor, device), desc[..start].trim()),
        None => (GpuCandidate::default(), desc.trim()),
    };
    candidate.device_name = Some(desc.to_string());
    candidate.apply_name_hints("", desc, false);
    Some(candidate)
}

/// Last `[vvvv:dddd]` bracket in a line, with its byte offset.
fn pci_id_pair(text: &str) -> Option<(u32, u32, usize)> {
    text.match_indices('[').rev().find_map(|(start, _)| {
        let end = text[start..].find(']')?;
        let (vendor, device) = text[start + 1..start + end].split_once(':')?;
        if vendor.len() != 4 || device.len() != 4 {
            return None;
        }
        Some((parse_hex_u32(vendor)?, parse_hex_u32(device)?, start))
    })
}
