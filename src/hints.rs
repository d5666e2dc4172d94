//! Keyword and id tables used by every platform probe to derive the three
//! candidate hints (discrete, virtual, vendor-special).
//!
//! Matching is case-insensitive substring matching, except for the
//! vendor-special keyword which must appear as a whole word.

use crate::data::{GpuCandidate, GpuVendor};

pub const VENDOR_NVIDIA: u32 = 0x10de;
pub const VENDOR_AMD: u32 = 0x1002;
pub const VENDOR_AMD_ALT: u32 = 0x1022;
pub const VENDOR_INTEL: u32 = 0x8086;
pub const VENDOR_APPLE: u32 = 0x106b;

/// PCI vendor id → vendor family.
pub const VENDOR_IDS: &[(u32, GpuVendor)] = &[
    (VENDOR_NVIDIA, GpuVendor::Nvidia),
    (VENDOR_AMD, GpuVendor::Amd),
    (VENDOR_AMD_ALT, GpuVendor::Amd),
    (VENDOR_INTEL, GpuVendor::Intel),
    (VENDOR_APPLE, GpuVendor::Apple),
];

/// Name keyword → vendor family. First match wins.
pub const VENDOR_KEYWORDS: &[(&str, GpuVendor)] = &[
    ("nvidia", GpuVendor::Nvidia),
    ("geforce", GpuVendor::Nvidia),
    ("quadro", GpuVendor::Nvidia),
    ("advanced micro devices", GpuVendor::Amd),
    ("radeon", GpuVendor::Amd),
    ("amd", GpuVendor::Amd),
    ("intel", GpuVendor::Intel),
    ("apple", GpuVendor::Apple),
];

/// Device-name keywords that suggest a discrete part.
pub const DISCRETE_KEYWORDS: &[&str] = &["nvidia", "amd", "radeon", "geforce", "quadro"];

/// Vendor-name keywords that suggest a discrete part.
pub const DISCRETE_VENDOR_KEYWORDS: &[&str] = &["nvidia", "advanced micro devices", "amd"];

/// Device-name keywords of virtualization / remote-display adapters.
pub const VIRTUAL_KEYWORDS: &[&str] = &[
    "qxl",
    "virtio",
    "vmware",
    "virtualbox",
    "bochs",
    "cirrus",
    "hyper-v",
    "basic display",
    "basic render",
    "remote display",
];

/// Vendor-name keywords of virtualization adapters. Only applied when the
/// probe opts in, since e.g. Red Hat also ships non-display devices.
pub const VIRTUAL_VENDOR_KEYWORDS: &[&str] = &["red hat", "vmware", "virtualbox", "bochs", "cirrus"];

/// PCI vendor ids of virtual display adapters (QXL, virtio, VMware,
/// VirtualBox, Bochs, Cirrus).
pub const VIRTUAL_VENDOR_IDS: &[u32] = &[0x1b36, 0x1af4, 0x15ad, 0x80ee, 0x1234, 0x1013];

/// Whole-word keyword for the enthusiast-tier integrated product line.
pub const VENDOR_ARC_KEYWORD: &str = "arc";

pub fn vendor_from_id(vendor_id: u32) -> Option<GpuVendor> {
    VENDOR_IDS
        .iter()
        .find(|(id, _)| *id == vendor_id)
        .map(|(_, vendor)| *vendor)
}

/// Canonical PCI vendor id of a family, for probes that only print names.
pub fn pci_id_for_vendor(vendor: GpuVendor) -> Option<u32> {
    VENDOR_IDS
        .iter()
        .find(|(_, family)| *family == vendor)
        .map(|(id, _)| *id)
}

pub fn vendor_from_name(name: &str) -> Option<GpuVendor> {
    let lower = name.to_lowercase();
    VENDOR_KEYWORDS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, vendor)| *vendor)
}

/// `haystack` must already be lowercase.
pub fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

/// `haystack` must already be lowercase.
pub fn contains_word(haystack: &str, word: &str) -> bool {
    haystack
        .split(|c: char| !c.is_ascii_alphanumeric())
        .any(|token| token == word)
}

/// Intel DG2/Alchemist parts sit in the 0x56xx and 0x57xx device-id ranges.
pub fn is_arc_device_id(device_id: u32) -> bool {
    matches!((device_id & 0xff00) >> 8, 0x56 | 0x57)
}

impl GpuCandidate {
    /// Candidate from numeric PCI ids, as reported by sysfs, IOKit or
    /// PnP device strings.
    pub fn from_pci_ids(vendor_id: u32, device_id: u32) -> Self {
        let mut candidate = GpuCandidate {
            vendor_id: Some(vendor_id),
            device_id: (device_id != 0).then_some(device_id),
            ..Default::default()
        };

        match vendor_from_id(vendor_id) {
            Some(GpuVendor::Nvidia) | Some(GpuVendor::Amd) => candidate.is_discrete_hint = true,
            Some(GpuVendor::Intel) => candidate.is_vendor_arc_hint = is_arc_device_id(device_id),
            _ => {}
        }
        candidate.is_virtual_hint = VIRTUAL_VENDOR_IDS.contains(&vendor_id);
        candidate
    }

    /// Candidate from free-text vendor / device names, as printed by
    /// `pciconf`, `dmesg` and friends.
    pub fn from_names(vendor: &str, device: &str, treat_virtual_vendor: bool) -> Self {
        let mut candidate = GpuCandidate {
            vendor_name: non_empty(vendor),
            device_name: non_empty(device),
            ..Default::default()
        };
        candidate.apply_name_hints(vendor, device, treat_virtual_vendor);
        candidate
    }

    /// OR the name-derived hints into this candidate. Never clears a hint.
    pub fn apply_name_hints(&mut self, vendor: &str, device: &str, treat_virtual_vendor: bool) {
        let vendor = vendor.to_lowercase();
        let device = device.to_lowercase();

        if contains_any(&vendor, DISCRETE_VENDOR_KEYWORDS) || contains_any(&device, DISCRETE_KEYWORDS) {
            self.is_discrete_hint = true;
        }
        if (treat_virtual_vendor && contains_any(&vendor, VIRTUAL_VENDOR_KEYWORDS))
            || contains_any(&device, VIRTUAL_KEYWORDS)
        {
            self.is_virtual_hint = true;
        }
        if contains_word(&device, VENDOR_ARC_KEYWORD) {
            self.is_vendor_arc_hint = true;
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vendor_ids_map_to_families() {
        assert_eq!(vendor_from_id(0x10de), Some(GpuVendor::Nvidia));
        assert_eq!(vendor_from_id(0x1002), Some(GpuVendor::Amd));
        assert_eq!(vendor_from_id(0x8086), Some(GpuVendor::Intel));
        assert_eq!(vendor_from_id(0x1af4), None);
        assert_eq!(pci_id_for_vendor(GpuVendor::Amd), Some(VENDOR_AMD));
        assert_eq!(pci_id_for_vendor(GpuVendor::Other), None);
    }

    #[test]
    fn vendor_names_are_case_insensitive() {
        assert_eq!(vendor_from_name("NVIDIA Corporation"), Some(GpuVendor::Nvidia));
        assert_eq!(vendor_from_name("Advanced Micro Devices, Inc. [AMD/ATI]"), Some(GpuVendor::Amd));
        assert_eq!(vendor_from_name("Intel Corporation"), Some(GpuVendor::Intel));
        assert_eq!(vendor_from_name("Matrox Electronics"), None);
    }

    #[test]
    fn arc_device_range() {
        assert!(is_arc_device_id(0x56a0));
        assert!(is_arc_device_id(0x5690));
        assert!(is_arc_device_id(0x57a1));
        assert!(!is_arc_device_id(0x9a49));
        assert!(!is_arc_device_id(0x0056));
    }

    #[test]
    fn pci_ids_derive_hints() {
        let nvidia = GpuCandidate::from_pci_ids(0x10de, 0x2684);
        assert!(nvidia.is_discrete_hint);
        assert!(!nvidia.is_virtual_hint);

        let arc = GpuCandidate::from_pci_ids(0x8086, 0x56a0);
        assert!(!arc.is_discrete_hint);
        assert!(arc.is_vendor_arc_hint);

        let iris = GpuCandidate::from_pci_ids(0x8086, 0x9a49);
        assert!(!iris.is_vendor_arc_hint);

        let qxl = GpuCandidate::from_pci_ids(0x1b36, 0x0100);
        assert!(qxl.is_virtual_hint);
        assert!(!qxl.is_discrete_hint);
    }

    #[test]
    fn device_names_derive_hints() {
        let geforce = GpuCandidate::from_names("", "GeForce RTX 4090", false);
        assert!(geforce.is_discrete_hint);
        assert_eq!(geforce.vendor_name, None);

        let virtio = GpuCandidate::from_names("Red Hat, Inc.", "Virtio GPU", false);
        assert!(virtio.is_virtual_hint);

        let arc = GpuCandidate::from_names("Intel Corporation", "Arc(TM) A770 Graphics", false);
        assert!(arc.is_vendor_arc_hint);
        assert!(!arc.is_discrete_hint);
    }

    #[test]
    fn virtual_vendor_names_need_opt_in() {
        let plain = GpuCandidate::from_names("Red Hat, Inc.", "QEMU display", false);
        assert!(!plain.is_virtual_hint);

        let opted = GpuCandidate::from_names("Red Hat, Inc.", "QEMU display", true);
        assert!(opted.is_virtual_hint);
    }

    #[test]
    fn remote_display_adapters_are_virtual() {
        let basic = GpuCandidate::from_names("", "Microsoft Basic Display Adapter", false);
        assert!(basic.is_virtual_hint);
        let rdp = GpuCandidate::from_names("", "Microsoft Remote Display Adapter", false);
        assert!(rdp.is_virtual_hint);
    }

    #[test]
    fn arc_keyword_is_a_whole_word() {
        assert!(contains_word("intel arc a380", "arc"));
        assert!(contains_word("arc(tm) a770", "arc"));
        assert!(!contains_word("search accelerator", "arc"));
        let candidate = GpuCandidate::from_names("", "Research Display Adapter", false);
        assert!(!candidate.is_vendor_arc_hint);
    }
}
