//! Tier ladder and classification output

use std::fmt;

/// Ordered capability bucket assigned to a machine.
///
/// Variants are declared low to high so the derived `Ord` is the tier order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    Mini,
    User,
    Developer,
    Workstation,
    Rig,
}

impl Tier {
    /// Stable single-word name printed by the CLI.
    pub fn name(self) -> &'static str {
        match self {
            Tier::Mini => "Mini",
            Tier::User => "User",
            Tier::Developer => "Developer",
            Tier::Workstation => "Workstation",
            Tier::Rig => "Rig",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tier plus the audit trail of rules that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationResult {
    pub tier: Tier,
    /// Semicolon-joined rule trail, for logs and UI only.
    pub reason: String,
}
