//! Structured error types for memshift
//!
//! Using thiserror for automatic Display implementation and error chaining.

use super::types::Region;
use thiserror::Error;

/// A mapping line that could not be turned into a [`Region`].
///
/// Contained per line: the parser skips the line and keeps going.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MapsError {
    #[error("Invalid mapping line '{line}': {reason}")]
    MalformedLine { line: String, reason: &'static str },

    #[error("Empty or inverted address range {start:#x}-{end:#x}")]
    InvalidRange { start: u64, end: u64 },
}

/// One structural difference between the source and destination layouts.
///
/// On a bracket-delimited path these are warnings; otherwise they are fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    #[error("File in source but not in destination: {path}")]
    MissingInDestination { path: String },

    #[error("File in destination but not in source: {path}")]
    MissingInSource { path: String },

    #[error(
        "Number of mappings mismatch for {path}: source has {src_count} ({src_path}), \
         destination has {dst_count} ({dst_path})"
    )]
    CountMismatch {
        path: String,
        src_count: usize,
        src_path: String,
        dst_count: usize,
        dst_path: String,
    },

    #[error(
        "Size mismatch in {path} at mapping {index}: source {src} (size {:#x}), \
         destination {dst} (size {:#x})",
        .src.size(),
        .dst.size()
    )]
    SizeMismatch { path: String, index: usize, src: Region, dst: Region },
}

impl Mismatch {
    /// Normalized path the mismatch was found on
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::MissingInDestination { path }
            | Self::MissingInSource { path }
            | Self::CountMismatch { path, .. }
            | Self::SizeMismatch { path, .. } => path,
        }
    }
}

/// Source and destination layouts are not structurally compatible.
///
/// Carries every fatal mismatch found, plus the warnings collected on the way.
#[derive(Error, Debug, Clone)]
#[error("Memory layouts do not match ({} problem(s)):\n{}", .mismatches.len(), render(.mismatches))]
pub struct LayoutMismatch {
    pub mismatches: Vec<Mismatch>,
    pub warnings: Vec<Mismatch>,
}

fn render(mismatches: &[Mismatch]) -> String {
    mismatches.iter().map(|m| format!("  - {m}")).collect::<Vec<_>>().join("\n")
}

#[derive(Error, Debug)]
pub enum RelocateError {
    #[error("Unsupported address size: {0} bits (expected 32 or 64)")]
    UnsupportedWidth(u32),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
