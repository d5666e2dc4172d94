//! Value types shared by the probe layer, the GPU selector and the classifier

pub mod caste;
pub mod hardware;

pub use caste::{ClassificationResult, Tier};
pub use hardware::{
    gib, GpuCandidate, GpuKind, GpuSummary, GpuVendor, HardwareFacts, GIB, MIB,
};
