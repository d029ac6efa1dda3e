//! `pagemap-*.img`: which virtual pages were dumped, and where they landed
//!
//! Page runs are stored back to back in the matching `pages-*.img`, so the
//! offset of a virtual address is the number of pages dumped before its run
//! plus its distance from the run start.

use serde::de::{self, Deserializer};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CriuError, Result};
use crate::image::CriuImage;

pub const PAGE_SIZE: u64 = 4096;

/// Decoded `pagemap` image
#[derive(Debug, Clone, Deserialize)]
pub struct PagemapImage {
    pub magic: String,
    pub entries: Vec<PagemapEntry>,
}

/// One pagemap record; the leading header record has neither field
#[derive(Debug, Clone, Deserialize)]
pub struct PagemapEntry {
    #[serde(default, deserialize_with = "hex_or_int")]
    pub vaddr: Option<u64>,
    #[serde(default, deserialize_with = "hex_or_int")]
    pub nr_pages: Option<u64>,
}

impl CriuImage for PagemapImage {
    const MAGIC: &'static str = "PAGEMAP";

    fn magic(&self) -> &str {
        &self.magic
    }
}

/// `crit` prints hex-tagged fields as numbers, or as `"0x..."` strings in pretty mode
fn hex_or_int<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<u64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(u64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Int(value)) => Ok(Some(value)),
        Some(Raw::Text(text)) => {
            let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
                Some(hex) => u64::from_str_radix(hex, 16),
                None => text.parse(),
            };
            parsed.map(Some).map_err(|_| de::Error::custom(format!("invalid address '{text}'")))
        }
    }
}

/// A run of consecutive dumped pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRun {
    /// Index of the run's first page within the pages image
    pub position: u64,
    pub vaddr: u64,
    pub nr_pages: u64,
}

impl PageRun {
    /// Exclusive end of the run's virtual range
    #[must_use]
    pub fn vaddr_end(&self) -> u64 {
        self.vaddr.saturating_add(self.nr_pages.saturating_mul(PAGE_SIZE))
    }

    /// Offset of the run's first byte within the pages image
    #[must_use]
    pub fn pages_offset(&self) -> u64 {
        self.position.saturating_mul(PAGE_SIZE)
    }

    #[must_use]
    pub fn contains(&self, vaddr: u64) -> bool {
        self.vaddr <= vaddr && vaddr < self.vaddr_end()
    }
}

/// Virtual address → pages-image offset lookup
#[derive(Debug, Clone, Default)]
pub struct PageIndex {
    runs: Vec<PageRun>,
}

impl PageIndex {
    /// Lay the image's runs out back to back
    ///
    /// # Errors
    /// Returns [`CriuError::PageRunOverflow`] if a run's virtual end or its
    /// end offset in the pages image does not fit in a `u64`
    pub fn from_image(image: &PagemapImage) -> Result<Self> {
        let mut position: u64 = 0;
        let mut runs = Vec::new();
        for entry in &image.entries {
            if let (Some(vaddr), Some(nr_pages)) = (entry.vaddr, entry.nr_pages) {
                let overflow = || CriuError::PageRunOverflow { vaddr, nr_pages };
                let span = nr_pages.checked_mul(PAGE_SIZE).ok_or_else(overflow)?;
                vaddr.checked_add(span).ok_or_else(overflow)?;
                let next = position.checked_add(nr_pages).ok_or_else(overflow)?;
                next.checked_mul(PAGE_SIZE).ok_or_else(overflow)?;

                runs.push(PageRun { position, vaddr, nr_pages });
                position = next;
            }
        }
        Ok(Self { runs })
    }

    #[must_use]
    pub fn runs(&self) -> &[PageRun] {
        &self.runs
    }

    /// Offset of `vaddr` inside the pages image, if it was dumped
    #[must_use]
    pub fn lookup(&self, vaddr: u64) -> Option<u64> {
        self.runs
            .iter()
            .find(|run| run.contains(vaddr))
            .map(|run| run.pages_offset().saturating_add(vaddr - run.vaddr))
    }
}

/// Locate the single `pagemap-*.img` of a checkpoint directory
///
/// # Errors
/// Returns an error if the directory cannot be read or does not hold exactly
/// one pagemap image
pub fn find_pagemap_image(dir: impl AsRef<Path>) -> Result<PathBuf> {
    let dir = dir.as_ref();
    let entries = fs::read_dir(dir).map_err(|source| CriuError::Read { path: dir.to_path_buf(), source })?;

    let mut found = Vec::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with("pagemap-") && name.ends_with(".img") {
            found.push(entry.path());
        }
    }

    match found.len() {
        0 => Err(CriuError::NoPagemap(dir.to_path_buf())),
        1 => Ok(found.remove(0)),
        count => Err(CriuError::AmbiguousPagemap { dir: dir.to_path_buf(), count }),
    }
}
