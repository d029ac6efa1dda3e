use anyhow::{Context, Result};
use std::io;

use memshift::range_check::any_in_range;

const EXIT_NO_MATCH: i32 = 0;
const EXIT_MATCH: i32 = 1;

/// Scan stdin; status 1 if an address lies in `[lower, upper]`
pub fn run(lower: u64, upper: u64) -> Result<i32> {
    let hit = any_in_range(io::stdin().lock(), lower, upper).context("Failed to read addresses from stdin")?;
    Ok(if hit { EXIT_MATCH } else { EXIT_NO_MATCH })
}
