//! BSD probes. Memory and CPU come from `sysctl -n`; GPUs from
//! `pciconf -lv` (FreeBSD, DragonFly), `pcictl pci0 list` (NetBSD) or the
//! boot messages (OpenBSD).
#![cfg_attr(
    not(any(
        target_os = "freebsd",
        target_os = "dragonfly",
        target_os = "netbsd",
        target_os = "openbsd"
    )),
    allow(dead_code)
)]

use super::CpuCounts;
use crate::data::GpuCandidate;
use crate::utils::command::{run_command, sysctl_u64};
use crate::utils::parsing::{parse_hex_u32, split_key_value};
use std::collections::HashSet;
use tracing::debug;

pub fn read_total_ram() -> u64 {
    // hw.physmem can be -1 on NetBSD; prefer the 64-bit node.
    sysctl_u64("hw.physmem64")
        .or_else(|_| sysctl_u64("hw.physmem"))
        .unwrap_or_else(|err| {
            debug!(%err, "physical memory unknown");
            0
        })
}

pub fn read_cpu_counts() -> CpuCounts {
    let logical = sysctl_u64("hw.ncpu").unwrap_or(0);
    let cores = sysctl_u64("kern.smp.cores").unwrap_or(0);
    let threads_per_core = sysctl_u64("kern.smp.threads_per_core").unwrap_or(0);

    cpu_counts(logical, cores, threads_per_core)
}

/// Combine the raw sysctl values; anything past `u32` counts as unknown.
fn cpu_counts(logical: u64, cores: u64, threads_per_core: u64) -> CpuCounts {
    let logical = logical.max(cores.saturating_mul(threads_per_core));
    CpuCounts {
        physical_cores: u32::try_from(cores).unwrap_or(0),
        logical_threads: u32::try_from(logical).unwrap_or(0),
    }
}

pub fn is_unified_memory() -> bool {
    false
}

pub fn enumerate_gpus() -> Vec<GpuCandidate> {
    let result = if cfg!(any(target_os = "freebsd", target_os = "dragonfly")) {
        run_command("pciconf", &["-lv"]).map(|out| parse_pciconf(&out))
    } else if cfg!(target_os = "netbsd") {
        run_command("pcictl", &["pci0", "list"]).map(|out| parse_pcictl(&out))
    } else {
        run_command("dmesg", &[]).map(|out| parse_dmesg(&out))
    };
    result.unwrap_or_else(|err| {
        debug!(%err, "GPU enumeration failed");
        Vec::new()
    })
}

#[derive(Default)]
struct PciRecord {
    class: u32,
    vendor_id: u32,
    device_id: u32,
    vendor: String,
    device: String,
}

impl PciRecord {
    fn is_display(&self) -> bool {
        self.class & 0xff_0000 == 0x03_0000
    }

    fn into_candidate(self) -> GpuCandidate {
        let mut candidate = if self.vendor_id != 0 {
            GpuCandidate::from_pci_ids(self.vendor_id, self.device_id)
        } else {
            GpuCandidate::default()
        };
        candidate.apply_name_hints(&self.vendor, &self.device, false);
        candidate.vendor_name = (!self.vendor.is_empty()).then_some(self.vendor);
        candidate.device_name = (!self.device.is_empty()).then_some(self.device);
        candidate
    }
}

/// Parse `pciconf -lv`. A record starts with an unindented selector line
/// carrying `class=`, `vendor=`/`device=` (or the older `chip=`) and is
/// followed by indented `key = 'value'` description lines.
pub fn parse_pciconf(output: &str) -> Vec<GpuCandidate> {
    let mut records: Vec<PciRecord> = Vec::new();

    for line in output.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if !line.starts_with(char::is_whitespace) {
            let mut record = PciRecord::default();
            for (key, value) in line.split_whitespace().filter_map(|tok| tok.split_once('=')) {
                let value = parse_hex_u32(value).unwrap_or(0);
                match key {
                    "class" => record.class = value,
                    "vendor" => record.vendor_id = value,
                    "device" => record.device_id = value,
                    "chip" => {
                        record.device_id = value >> 16;
                        record.vendor_id = value & 0xffff;
                    }
                    _ => {}
                }
            }
            records.push(record);
            continue;
        }

        let (Some(record), Some((key, value))) = (records.last_mut(), split_key_value(line, '=')) else {
            continue;
        };
        let value = value.trim_matches('\'').to_string();
        match key {
            "vendor" => record.vendor = value,
            "device" => record.device = value,
            _ => {}
        }
    }

    records
        .into_iter()
        .filter(PciRecord::is_display)
        .map(PciRecord::into_candidate)
        .collect()
}

/// Parse NetBSD `pcictl pci0 list`, e.g.
/// `000:02:0: Red Hat QXL Video (VGA display, revision 0x05)`.
pub fn parse_pcictl(output: &str) -> Vec<GpuCandidate> {
    output
        .lines()
        .filter_map(|line| {
            let (_, desc) = line.trim().split_once(": ")?;
            let lparen = desc.rfind('(')?;
            let rparen = desc.rfind(')')?;
            if lparen >= rparen {
                return None;
            }
            let class = desc[lparen + 1..rparen].to_lowercase();
            if !class.contains("display") {
                return None;
            }
            Some(GpuCandidate::from_names("", &desc[..lparen], false))
        })
        .collect()
}

/// Parse OpenBSD boot messages for `vgaN at ... "Name" rev 0xNN` lines.
/// Each attached device is reported once even if the buffer repeats it.
pub fn parse_dmesg(output: &str) -> Vec<GpuCandidate> {
    let mut seen = HashSet::new();
    let mut gpus = Vec::new();

    for line in output.lines() {
        let line = line.trim();
        let Some(device) = line.split_whitespace().next() else {
            continue;
        };
        if !device.starts_with("vga") || !seen.insert(device.to_string()) {
            continue;
        }
        let mut quoted = line.split('"');
        let Some(name) = quoted.nth(1).filter(|n| !n.is_empty()) else {
            continue;
        };
        let mut candidate = GpuCandidate::from_names("", name, false);
        // The quoted name leads with the vendor, so vendor keywords apply too.
        candidate.apply_name_hints(name, "", true);
        gpus.push(candidate);
    }
    gpus
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpu_counts_from_sysctl_values() {
        let counts = cpu_counts(16, 8, 2);
        assert_eq!(counts.physical_cores, 8);
        assert_eq!(counts.logical_threads, 16);

        // kern.smp.* missing (OpenBSD, NetBSD)
        let counts = cpu_counts(4, 0, 0);
        assert_eq!(counts.physical_cores, 0);
        assert_eq!(counts.logical_threads, 4);

        let counts = cpu_counts(0, u64::MAX, 2);
        assert_eq!(counts.physical_cores, 0);
        assert_eq!(counts.logical_threads, 0);
    }

    const PCICONF: &str = "\
hostb0@pci0:0:0:0:\tclass=0x060000 rev=0x08 hdr=0x00 vendor=0x8086 device=0x3e30 subvendor=0x1043 subdevice=0x8694
    vendor     = 'Intel Corporation'
    device     = '8th Gen Core 8-core Desktop Processor Host Bridge/DRAM Registers [Coffee Lake S]'
    class      = bridge
vgapci0@pci0:1:0:0:\tclass=0x030000 rev=0xa1 hdr=0x00 vendor=0x10de device=0x2684 subvendor=0x10de subdevice=0x167c
    vendor     = 'NVIDIA Corporation'
    device     = 'AD102 [GeForce RTX 4090]'
    class      = display
    subclass   = VGA
vgapci1@pci0:0:2:0:\tclass=0x030000 card=0x86941043 chip=0x3e928086 rev=0x02 hdr=0x00
    vendor     = 'Intel Corporation'
    device     = 'CoffeeLake-S GT2 [UHD Graphics 630]'
    class      = display
";

    #[test]
    fn pciconf_keeps_display_devices() {
        let gpus = parse_pciconf(PCICONF);
        assert_eq!(gpus.len(), 2);

        assert_eq!(gpus[0].vendor_id, Some(0x10de));
        assert_eq!(gpus[0].device_name.as_deref(), Some("AD102 [GeForce RTX 4090]"));
        assert!(gpus[0].is_discrete_hint);

        assert_eq!(gpus[1].vendor_id, Some(0x8086));
        assert_eq!(gpus[1].device_id, Some(0x3e92));
        assert!(!gpus[1].is_discrete_hint);
    }

    #[test]
    fn pcictl_display_lines() {
        let output = "\
000:00:0: Intel 82441FX (PMC) PCI and Memory Controller (host bridge, revision 0x02)
000:02:0: Red Hat QXL Video (VGA display, revision 0x05)
000:03:0: NVIDIA GeForce GTX 1080 (VGA display, revision 0xa1)
";
        let gpus = parse_pcictl(output);
        assert_eq!(gpus.len(), 2);
        assert!(gpus[0].is_virtual_hint);
        assert!(gpus[1].is_discrete_hint);
        assert_eq!(gpus[1].device_name.as_deref(), Some("NVIDIA GeForce GTX 1080"));
    }

    #[test]
    fn dmesg_vga_lines() {
        let output = "\
vga1 at pci0 dev 2 function 0 \"Red Hat QXL Video\" rev 0x05
wsdisplay0 at vga1 mux 1: console (80x25, vt100 emulation)
vga1 at pci0 dev 2 function 0 \"Red Hat QXL Video\" rev 0x05
vga2 at pci1 dev 0 function 0 \"Intel Arc A380\" rev 0x05
";
        let gpus = parse_dmesg(output);
        assert_eq!(gpus.len(), 2);
        assert!(gpus[0].is_virtual_hint);
        assert!(gpus[1].is_vendor_arc_hint);
        assert!(!gpus[1].is_virtual_hint);
    }
}
