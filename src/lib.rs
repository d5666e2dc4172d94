//! caste library
//!
//! Maps a machine's RAM, CPU and GPU to one of five ordered capability
//! tiers (Mini, User, Developer, Workstation, Rig) to pick sensible local
//! workload sizes.
//!
//! The platform probe produces a [`HardwareFacts`] value; [`classify`] is a
//! pure function over it, so both halves can be used separately.

pub mod classifier;
pub mod collectors;
pub mod config;
pub mod data;
pub mod display;
pub mod error;
pub mod hints;
pub mod logging;
pub mod selector;
pub mod utils;

pub use classifier::classify;
pub use collectors::{probe_host, HostProbe};
pub use data::{
    gib, ClassificationResult, GpuCandidate, GpuKind, GpuSummary, GpuVendor, HardwareFacts, Tier,
};
pub use error::{CasteError, Result};
pub use selector::{score, select_gpu};

/// Probe this host and reduce it to normalized facts.
pub fn detect_hw_facts() -> HardwareFacts {
    probe_host().facts()
}

/// Probe and classify this host.
pub fn detect_caste() -> ClassificationResult {
    classify(&detect_hw_facts())
}

/// Probe and classify this host, returning only the tier name.
pub fn detect_caste_word() -> &'static str {
    detect_caste().tier.name()
}
