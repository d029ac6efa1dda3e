//! # Cross-Layout Matching
//!
//! Compares the grouped source and destination layouts and derives the
//! per-region shifts used to relocate a payload.
//!
//! ## Matching Rules
//!
//! ```text
//! source groups          destination groups
//! ─────────────          ──────────────────
//! /lib/libc.so  [r--p]   /lib/libc.so  [r--p]   pair #1 → shift = dst.start - src.start
//!               [r-xp]                 [r-xp]   pair #2
//!               [rw-p]                 [rw-p]   pair #3
//! [stack]       [rw-p]   (missing)              warning only, no entries
//! ```
//!
//! Regions of one path are paired by listing order, not by address: the
//! relative order of a library's segments is the only correspondence that
//! survives a change of load address.
//!
//! Every non-special problem is collected before failing, so one run
//! reports the full list. Problems on bracket-delimited paths (`[stack]`,
//! `[heap]`, `[anonymous]`, ...) are downgraded to warnings.
//!
//! ## Module Structure
//!
//! - **`validate`**: structural comparison of two [`RegionGroups`](crate::maps::RegionGroups)
//! - **`table`**: translation table built from a validated layout

pub mod table;
pub mod validate;

pub use table::{TranslationEntry, TranslationTable};
pub use validate::{validate, MatchedGroup, ValidatedLayout};
