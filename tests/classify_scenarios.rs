//! End-to-end classification scenarios and properties over the public API.

use caste::classifier::RAM_FLOOR;
use caste::{classify, gib, GpuSummary, HardwareFacts, Tier};
use proptest::prelude::*;

fn desktop(ram: u64, vram: u64) -> HardwareFacts {
    HardwareFacts::new(ram, 8, 16, GpuSummary::discrete(vram))
}

#[test]
fn discrete_vram_ladder_with_plenty_of_ram() {
    assert_eq!(classify(&desktop(gib(64), gib(2))).tier, Tier::User);
    assert_eq!(classify(&desktop(gib(64), gib(6))).tier, Tier::Developer);
    assert_eq!(classify(&desktop(gib(64), gib(16))).tier, Tier::Workstation);
    assert_eq!(classify(&desktop(gib(64), gib(24))).tier, Tier::Rig);
}

#[test]
fn ram_cap_binds_big_gpu() {
    let result = classify(&desktop(gib(16), gib(24)));
    assert_eq!(result.tier, Tier::User);
    assert!(result.reason.contains("RAM cap applied"));
}

#[test]
fn unified_memory_uses_ram_ladder() {
    let hw = HardwareFacts::unified_memory(gib(32), 8, 16);
    assert_eq!(classify(&hw).tier, Tier::Workstation);
}

#[test]
fn cpu_cap_binds_but_floor_keeps_user() {
    let hw = HardwareFacts::new(gib(64), 2, 4, GpuSummary::discrete(gib(24)));
    let result = classify(&hw);
    assert_eq!(result.tier, Tier::User);
    assert!(result.reason.contains("CPU cap applied"));
}

#[test]
fn detected_host_classifies() {
    // Whatever machine runs the tests, detection must yield a valid tier.
    let word = caste::detect_caste_word();
    let names = [Tier::Mini, Tier::User, Tier::Developer, Tier::Workstation, Tier::Rig]
        .map(Tier::name);
    assert!(names.contains(&word));
}

fn arb_gpu() -> impl Strategy<Value = GpuSummary> {
    prop_oneof![
        Just(GpuSummary::none()),
        any::<bool>().prop_map(|arc| GpuSummary::integrated().with_vendor_arc_hint(arc)),
        Just(GpuSummary::unified()),
        (0u64..gib(48)).prop_map(GpuSummary::discrete),
    ]
}

fn arb_facts() -> impl Strategy<Value = HardwareFacts> {
    (0u64..gib(256), 0u32..64, 0u32..128, arb_gpu()).prop_map(|(ram, cores, threads, gpu)| {
        let unified = gpu.kind == caste::GpuKind::Unified;
        HardwareFacts::new(ram, cores, threads, gpu).with_unified_memory(unified)
    })
}

proptest! {
    /// More RAM never lowers the tier.
    #[test]
    fn prop_monotone_in_ram(hw in arb_facts(), extra in 0u64..gib(128)) {
        let more = HardwareFacts { ram_bytes: hw.ram_bytes + extra, ..hw };
        prop_assert!(classify(&more).tier >= classify(&hw).tier);
    }

    /// Clearing the RAM floor always yields at least User.
    #[test]
    fn prop_floor_grants_user(hw in arb_facts()) {
        let hw = HardwareFacts { ram_bytes: hw.ram_bytes.max(RAM_FLOOR), ..hw };
        prop_assert!(classify(&hw).tier >= Tier::User);
    }

    /// Below the floor nothing else matters.
    #[test]
    fn prop_below_floor_is_mini(hw in arb_facts(), ram in 0u64..RAM_FLOOR) {
        let hw = HardwareFacts { ram_bytes: ram, ..hw };
        let result = classify(&hw);
        prop_assert_eq!(result.tier, Tier::Mini);
        prop_assert_eq!(result.reason, "RAM below floor");
    }

    /// Classification is deterministic.
    #[test]
    fn prop_deterministic(hw in arb_facts()) {
        prop_assert_eq!(classify(&hw), classify(&hw));
    }
}
