//! Command execution utilities

use crate::error::{CasteError, Result};
use std::process::Command;
use tracing::trace;

/// Execute a command and return stdout as String
pub fn run_command(program: &str, args: &[&str]) -> Result<String> {
    trace!(program, ?args, "running probe command");
    let output = Command::new(program).args(args).output()?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        Err(CasteError::Detection(format!(
            "Command '{}' failed with exit code: {:?}",
            program,
            output.status.code()
        )))
    }
}

/// Run `sysctl -n <name>` and parse the value as an unsigned integer.
pub fn sysctl_u64(name: &str) -> Result<u64> {
    let out = run_command("sysctl", &["-n", name])?;
    crate::utils::parsing::parse_u64(&out)
        .ok_or_else(|| CasteError::Parse(format!("sysctl {}: unexpected value {:?}", name, out)))
}
