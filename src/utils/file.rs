//! File reading utilities

use crate::error::{CasteError, Result};
use crate::utils::parsing::{parse_hex_u32, parse_u64};
use std::fs;
use std::path::Path;

/// Safely read a file to string with error handling
pub fn read_file_safe<P: AsRef<Path>>(path: P) -> Result<String> {
    fs::read_to_string(path).map_err(CasteError::from)
}

/// Read a sysfs-style hex attribute such as `0x10de`.
pub fn read_hex_u32<P: AsRef<Path>>(path: P) -> Result<u32> {
    let path = path.as_ref();
    let text = read_file_safe(path)?;
    parse_hex_u32(&text)
        .ok_or_else(|| CasteError::Parse(format!("{}: not a hex id", path.display())))
}

/// Read a decimal attribute such as `mem_info_vram_total`.
pub fn read_dec_u64<P: AsRef<Path>>(path: P) -> Result<u64> {
    let path = path.as_ref();
    let text = read_file_safe(path)?;
    parse_u64(&text).ok_or_else(|| CasteError::Parse(format!("{}: not a number", path.display())))
}
