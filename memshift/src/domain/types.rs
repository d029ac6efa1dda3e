//! Domain types providing compile-time safety and self-documentation

use std::fmt;

use super::errors::{MapsError, RelocateError};

/// One contiguous virtual-address interval of a process layout.
///
/// Built once per parsed mapping line and never mutated afterwards.
/// `start < end` holds for every value produced by [`Region::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub start: u64,
    pub end: u64,
    /// Permission flags as printed by the kernel or gdb (e.g. `r-xp`)
    pub perms: String,
    /// Offset into the backing file
    pub offset: u64,
    /// Backing file path; empty for anonymous mappings
    pub path: String,
}

impl Region {
    /// Create a region, rejecting empty or inverted ranges
    ///
    /// # Errors
    /// Returns [`MapsError::InvalidRange`] if `start >= end`
    pub fn new(
        start: u64,
        end: u64,
        perms: impl Into<String>,
        offset: u64,
        path: impl Into<String>,
    ) -> Result<Self, MapsError> {
        if start >= end {
            return Err(MapsError::InvalidRange { start, end });
        }
        Ok(Self { start, end, perms: perms.into(), offset, path: path.into() })
    }

    /// Size of the region in bytes (always positive)
    #[must_use]
    pub fn size(&self) -> u64 {
        self.end - self.start
    }

    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.path.is_empty()
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}-{:#x} {} {:#x} {}", self.start, self.end, self.perms, self.offset, self.path)
    }
}

/// Textual layout of a memory-mapping listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapsFormat {
    /// `/proc/<pid>/maps`: `start-end perms offset dev inode [path]`
    #[default]
    Proc,
    /// gdb `info proc mappings`: `0xstart 0xend 0xsize 0xoffset perms [path]`
    Gdb,
}

impl MapsFormat {
    /// Pick the format from a `--*-gdb` style flag
    #[must_use]
    pub fn from_gdb_flag(gdb: bool) -> Self {
        if gdb {
            Self::Gdb
        } else {
            Self::Proc
        }
    }
}

impl fmt::Display for MapsFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Proc => write!(f, "proc"),
            Self::Gdb => write!(f, "GDB"),
        }
    }
}

/// Signed distance between a destination region and its source region
///
/// Stored as the two's-complement reinterpretation of
/// `dst.start - src.start`, so every 64-bit delta is representable and
/// applying it is a wrapping add.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Shift(pub i64);

impl Shift {
    /// Shift that moves `src_start` onto `dst_start`
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn between(src_start: u64, dst_start: u64) -> Self {
        Self(dst_start.wrapping_sub(src_start) as i64)
    }

    /// Apply the shift modulo 2^64
    #[must_use]
    pub fn apply(self, value: u64) -> u64 {
        value.wrapping_add_signed(self.0)
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 0 {
            write!(f, "-{:#x}", self.0.unsigned_abs())
        } else {
            write!(f, "{:#x}", self.0)
        }
    }
}

/// Width of the pointer-sized words in a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WordWidth {
    Bits32,
    #[default]
    Bits64,
}

impl WordWidth {
    /// Parse an address size given in bits
    ///
    /// # Errors
    /// Returns [`RelocateError::UnsupportedWidth`] for anything but 32 or 64
    pub fn from_bits(bits: u32) -> Result<Self, RelocateError> {
        match bits {
            32 => Ok(Self::Bits32),
            64 => Ok(Self::Bits64),
            other => Err(RelocateError::UnsupportedWidth(other)),
        }
    }

    #[must_use]
    pub fn bits(self) -> u32 {
        match self {
            Self::Bits32 => 32,
            Self::Bits64 => 64,
        }
    }

    /// Word size in bytes
    #[must_use]
    pub fn bytes(self) -> usize {
        match self {
            Self::Bits32 => 4,
            Self::Bits64 => 8,
        }
    }

    /// Decode a little-endian word; `word` must be exactly [`Self::bytes`] long
    #[must_use]
    pub fn decode(self, word: &[u8]) -> u64 {
        match self {
            Self::Bits32 => {
                let mut raw = [0u8; 4];
                raw.copy_from_slice(word);
                u64::from(u32::from_le_bytes(raw))
            }
            Self::Bits64 => {
                let mut raw = [0u8; 8];
                raw.copy_from_slice(word);
                u64::from_le_bytes(raw)
            }
        }
    }

    /// Encode `value` truncated to this width into `word` (little-endian)
    #[allow(clippy::cast_possible_truncation)]
    pub fn encode(self, value: u64, word: &mut [u8]) {
        match self {
            Self::Bits32 => word.copy_from_slice(&(value as u32).to_le_bytes()),
            Self::Bits64 => word.copy_from_slice(&value.to_le_bytes()),
        }
    }
}

impl fmt::Display for WordWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-bit", self.bits())
    }
}
