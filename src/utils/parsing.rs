//! String parsing utilities

/// Extract value after a colon and space
pub fn extract_after_colon(line: &str) -> Option<String> {
    line.split_once(':')
        .map(|(_, value)| value.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Split `key<sep>value`, trimming both halves.
pub fn split_key_value(line: &str, sep: char) -> Option<(&str, &str)> {
    line.split_once(sep).map(|(k, v)| (k.trim(), v.trim()))
}

/// Parse a hex number with or without a `0x` prefix.
pub fn parse_hex_u32(s: &str) -> Option<u32> {
    let s = s.trim();
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u32::from_str_radix(digits, 16).ok()
}

/// Parse a decimal number, ignoring surrounding whitespace.
pub fn parse_u64(s: &str) -> Option<u64> {
    s.trim().parse().ok()
}

/// Parse sizes like `8 GB`, `1536 MB` or `4096 MiB` into bytes (binary units).
pub fn parse_size_bytes(s: &str) -> Option<u64> {
    let mut parts = s.split_whitespace();
    let value: f64 = parts.next()?.parse().ok()?;
    let unit = parts.next().unwrap_or("B").to_ascii_lowercase();
    let scale: u64 = match unit.as_str() {
        "b" => 1,
        "kb" | "kib" | "k" => 1 << 10,
        "mb" | "mib" | "m" => 1 << 20,
        "gb" | "gib" | "g" => 1 << 30,
        "tb" | "tib" | "t" => 1 << 40,
        _ => return None,
    };
    if value < 0.0 {
        return None;
    }
    Some((value * scale as f64) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colon_values() {
        assert_eq!(extract_after_colon("core id\t: 3"), Some("3".to_string()));
        assert_eq!(extract_after_colon("flags\t:"), None);
        assert_eq!(extract_after_colon("no separator"), None);
    }

    #[test]
    fn hex_ids() {
        assert_eq!(parse_hex_u32("0x10de\n"), Some(0x10de));
        assert_eq!(parse_hex_u32("8086"), Some(0x8086));
        assert_eq!(parse_hex_u32("zz"), None);
    }

    #[test]
    fn sizes() {
        assert_eq!(parse_size_bytes("8 GB"), Some(8 << 30));
        assert_eq!(parse_size_bytes("1536 MB"), Some(1536 << 20));
        assert_eq!(parse_size_bytes("1.5 GB"), Some(3 << 29));
        assert_eq!(parse_size_bytes("lots"), None);
        assert_eq!(parse_size_bytes("4 parsecs"), None);
    }
}
