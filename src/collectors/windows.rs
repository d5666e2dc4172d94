//! Windows probe via CIM queries through PowerShell. Each query prints
//! `key=value` lines so the parsing stays platform-independent.
#![cfg_attr(not(windows), allow(dead_code))]

use super::{nvidia, CpuCounts};
use crate::data::GpuCandidate;
use crate::utils::command::run_command;
use crate::utils::parsing::{parse_hex_u32, parse_u64, split_key_value};
use tracing::debug;

const MEMORY_QUERY: &str =
    "(Get-CimInstance Win32_ComputerSystem) | ForEach-Object { \"ram=$($_.TotalPhysicalMemory)\" }";

const CPU_QUERY: &str = "Get-CimInstance Win32_Processor | ForEach-Object { \
     \"cores=$($_.NumberOfCores)\"; \"threads=$($_.NumberOfLogicalProcessors)\" }";

const GPU_QUERY: &str = "Get-CimInstance Win32_VideoController | ForEach-Object { \
     \"gpu=$($_.Name)|$($_.AdapterRAM)|$($_.PNPDeviceID)\" }";

fn powershell(query: &str) -> Option<String> {
    run_command("powershell", &["-NoProfile", "-NonInteractive", "-Command", query])
        .map_err(|err| debug!(%err, "CIM query failed"))
        .ok()
}

pub fn read_total_ram() -> u64 {
    powershell(MEMORY_QUERY)
        .and_then(|out| {
            out.lines()
                .filter_map(|line| split_key_value(line, '='))
                .find(|(key, _)| *key == "ram")
                .and_then(|(_, value)| parse_u64(value))
        })
        .unwrap_or(0)
}

pub fn read_cpu_counts() -> CpuCounts {
    powershell(CPU_QUERY)
        .map(|out| parse_cpu_report(&out))
        .unwrap_or_default()
}

/// Sum `cores=` / `threads=` lines across processor sockets.
pub fn parse_cpu_report(output: &str) -> CpuCounts {
    let mut counts = CpuCounts::default();
    for (key, value) in output.lines().filter_map(|line| split_key_value(line, '=')) {
        let n = parse_u64(value)
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(0);
        match key {
            "cores" => counts.physical_cores = counts.physical_cores.saturating_add(n),
            "threads" => counts.logical_threads = counts.logical_threads.saturating_add(n),
            _ => {}
        }
    }
    counts
}

pub fn is_unified_memory() -> bool {
    false
}

pub fn enumerate_gpus() -> Vec<GpuCandidate> {
    let mut gpus = powershell(GPU_QUERY)
        .map(|out| parse_gpu_report(&out))
        .unwrap_or_default();
    // AdapterRAM is a 32-bit field; prefer the driver's number when there is one.
    nvidia::attach_vram(&mut gpus);
    gpus
}

/// Parse `gpu=Name|AdapterRAM|PNPDeviceID` lines.
pub fn parse_gpu_report(output: &str) -> Vec<GpuCandidate> {
    output
        .lines()
        .filter_map(|line| split_key_value(line, '='))
        .filter(|(key, _)| *key == "gpu")
        .map(|(_, value)| {
            let mut fields = value.split('|');
            let name = fields.next().unwrap_or("").trim();
            let adapter_ram = fields.next().and_then(parse_u64).unwrap_or(0);
            let pnp = fields.next().unwrap_or("");

            let mut candidate = match pnp_ids(pnp) {
                Some((vendor, device)) => GpuCandidate::from_pci_ids(vendor, device),
                None => GpuCandidate::default(),
            };
            candidate.apply_name_hints("", name, false);
            candidate.device_name = (!name.is_empty()).then(|| name.to_string());
            if candidate.is_discrete_hint {
                candidate.vram_bytes = adapter_ram;
            }
            candidate
        })
        .collect()
}

/// `PCI\VEN_10DE&DEV_2684&SUBSYS_...` → `(0x10de, 0x2684)`.
pub fn pnp_ids(pnp: &str) -> Option<(u32, u32)> {
    let upper = pnp.to_ascii_uppercase();
    let field = |tag: &str| -> Option<u32> {
        let start = upper.find(tag)? + tag.len();
        parse_hex_u32(upper.get(start..start + 4)?)
    };
    Some((field("VEN_")?, field("DEV_")?))
}
