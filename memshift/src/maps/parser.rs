//! Mapping listing parser
//!
//! Both formats are whitespace-separated with an optional trailing path that
//! may itself contain spaces (`/tmp/data (deleted)`), so fields are consumed
//! one at a time and whatever remains becomes the path.

use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs;
use std::path::Path;

use crate::domain::{MapsError, MapsFormat, Region};

/// Regions parsed from one listing, plus the lines that were skipped
#[derive(Debug, Default)]
pub struct ParsedMaps {
    pub regions: Vec<Region>,
    pub skipped: Vec<SkippedLine>,
}

/// A listing line that could not be parsed (1-based line number)
#[derive(Debug, Clone)]
pub struct SkippedLine {
    pub line_number: usize,
    pub error: MapsError,
}

/// Parse a single mapping line in the given format
///
/// # Errors
/// Returns [`MapsError`] if the line does not have the expected field shape
pub fn parse_line(line: &str, format: MapsFormat) -> Result<Region, MapsError> {
    match format {
        MapsFormat::Proc => parse_proc_line(line),
        MapsFormat::Gdb => parse_gdb_line(line),
    }
}

/// Parse a whole listing, skipping blank and malformed lines
pub fn parse_maps(text: &str, format: MapsFormat) -> ParsedMaps {
    let mut parsed = ParsedMaps::default();

    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(line, format) {
            Ok(region) => {
                debug!("line {}: {region}", idx + 1);
                parsed.regions.push(region);
            }
            Err(error) => {
                warn!("Skipping line {}: {error}", idx + 1);
                parsed.skipped.push(SkippedLine { line_number: idx + 1, error });
            }
        }
    }

    parsed
}

/// Read and parse a listing file
///
/// # Errors
/// Returns an error if the file cannot be read
pub fn parse_maps_file(path: impl AsRef<Path>, format: MapsFormat) -> Result<ParsedMaps> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read mappings file {}", path.display()))?;
    Ok(parse_maps(&text, format))
}

/// `start-end perms offset dev inode [path]`
fn parse_proc_line(line: &str) -> Result<Region, MapsError> {
    let malformed = |reason| MapsError::MalformedLine { line: line.trim().to_string(), reason };
    let mut rest = line.trim();

    let range = take_field(&mut rest).ok_or_else(|| malformed("missing address range"))?;
    let (start, end) = range.split_once('-').ok_or_else(|| malformed("range is not start-end"))?;
    let start = parse_hex(start).ok_or_else(|| malformed("invalid start address"))?;
    let end = parse_hex(end).ok_or_else(|| malformed("invalid end address"))?;

    let perms = take_field(&mut rest)
        .filter(|p| is_perms(p))
        .ok_or_else(|| malformed("invalid permissions"))?;

    let offset = take_field(&mut rest)
        .and_then(parse_hex)
        .ok_or_else(|| malformed("invalid file offset"))?;

    take_field(&mut rest)
        .filter(|dev| is_device(dev))
        .ok_or_else(|| malformed("invalid device id"))?;

    take_field(&mut rest)
        .filter(|inode| inode.bytes().all(|b| b.is_ascii_digit()))
        .ok_or_else(|| malformed("invalid inode"))?;

    Region::new(start, end, perms, offset, rest.trim())
}

/// `0xstart 0xend 0xsize 0xoffset perms [path]`
fn parse_gdb_line(line: &str) -> Result<Region, MapsError> {
    let malformed = |reason| MapsError::MalformedLine { line: line.trim().to_string(), reason };
    let mut rest = line.trim();

    let start = take_field(&mut rest)
        .and_then(parse_prefixed_hex)
        .ok_or_else(|| malformed("invalid start address"))?;
    let end = take_field(&mut rest)
        .and_then(parse_prefixed_hex)
        .ok_or_else(|| malformed("invalid end address"))?;

    // Size column is recomputed from start/end
    take_field(&mut rest)
        .and_then(parse_prefixed_hex)
        .ok_or_else(|| malformed("invalid size"))?;

    let offset = take_field(&mut rest)
        .and_then(parse_prefixed_hex)
        .ok_or_else(|| malformed("invalid file offset"))?;

    let perms = take_field(&mut rest)
        .filter(|p| is_perms(p))
        .ok_or_else(|| malformed("invalid permissions"))?;

    Region::new(start, end, perms, offset, rest.trim())
}

/// Pop the next whitespace-delimited field, leaving the remainder in `rest`
fn take_field<'a>(rest: &mut &'a str) -> Option<&'a str> {
    let trimmed = rest.trim_start();
    if trimmed.is_empty() {
        return None;
    }
    let end = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
    let (field, tail) = trimmed.split_at(end);
    *rest = tail;
    Some(field)
}

fn parse_hex(s: &str) -> Option<u64> {
    // from_str_radix alone would accept a leading '+'
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u64::from_str_radix(s, 16).ok()
}

fn parse_prefixed_hex(s: &str) -> Option<u64> {
    s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).and_then(parse_hex)
}

fn is_perms(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| matches!(b, b'r' | b'w' | b'x' | b'p' | b's' | b'-'))
}

fn is_device(s: &str) -> bool {
    s.split_once(':').is_some_and(|(major, minor)| parse_hex(major).is_some() && parse_hex(minor).is_some())
}
