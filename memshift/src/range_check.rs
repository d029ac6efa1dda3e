//! Hex address range check
//!
//! Scans a list of hex addresses (one per line, `0x` prefix optional) for
//! any value inside an inclusive `[lower, upper]` range. Used from scripts to
//! ask "does this dump still reference the old library range?".

use std::io::BufRead;

/// Parse a hex address with or without a `0x` prefix
#[must_use]
pub fn parse_hex_address(s: &str) -> Option<u64> {
    let s = s.trim();
    let digits = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u64::from_str_radix(digits, 16).ok()
}

/// True if any parsable line of `reader` lies within `[lower, upper]`
///
/// Unparsable lines are ignored. Stops at the first hit.
///
/// # Errors
/// Returns an error if reading from `reader` fails
pub fn any_in_range<R: BufRead>(reader: R, lower: u64, upper: u64) -> std::io::Result<bool> {
    for line in reader.lines() {
        if let Some(address) = parse_hex_address(&line?) {
            if (lower..=upper).contains(&address) {
                return Ok(true);
            }
        }
    }
    Ok(false)
}
