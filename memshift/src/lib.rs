//! # memshift - Pointer Relocation Between Process Address Layouts
//!
//! memshift rewrites a raw memory image so that the pointers embedded in it,
//! valid under one process's virtual address layout, become valid under
//! another. The typical use is restoring a checkpointed process into an
//! address space where its shared libraries are loaded elsewhere (re-linked
//! binaries, a different loader, ASLR).
//!
//! ## Architecture Overview
//!
//! ```text
//!  source maps          destination maps
//!  (proc / gdb)          (proc / gdb)
//!       │                     │
//!       ▼                     ▼
//! ┌──────────────┐     ┌──────────────┐
//! │    Parser    │     │    Parser    │   maps::parser
//! └──────┬───────┘     └──────┬───────┘
//!        ▼                    ▼
//! ┌──────────────┐     ┌──────────────┐
//! │   Grouper    │     │   Grouper    │   maps::grouping (+ normalize)
//! └──────┬───────┘     └──────┬───────┘
//!        └─────────┬──────────┘
//!                  ▼
//!         ┌─────────────────┐
//!         │    Validator    │              layout::validate
//!         └────────┬────────┘
//!                  ▼
//!         ┌─────────────────┐
//!         │ Translation tbl │              layout::table
//!         └────────┬────────┘
//!                  ▼
//!  payload ──▶ ┌─────────────────┐ ──▶ relocated payload
//!              │ Stream relocator│          relocate
//!              └─────────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - [`maps`]: parse `/proc/<pid>/maps` and gdb `info proc mappings`
//!   listings, normalize library paths, group regions per library
//! - [`layout`]: validate two grouped layouts against each other and build
//!   the translation table
//! - [`relocate`]: stream a payload word by word through the table
//! - [`range_check`]: check a list of addresses against a range
//! - [`cli`]: command-line argument parsing
//! - [`domain`]: core types (`Region`, `Shift`, `WordWidth`) and errors
//!
//! Checkpoint metadata edits (files/core/pagemap images) live in the
//! `memshift-criu` crate.
//!
//! ## Typical Usage
//!
//! ```bash
//! # Relocate a dumped pages image from one layout to another
//! memshift translate pages-1.img pages-1.out.img \
//!     --src-maps old.maps --dst-maps new.maps
//!
//! # Destination layout captured with gdb's `info proc mappings`
//! memshift translate dump.bin dump.out --src-maps a.maps --dst-maps b.txt --dst-gdb --bits 32
//! ```

pub mod cli;
pub mod domain;
pub mod layout;
pub mod maps;
pub mod range_check;
pub mod relocate;

pub use relocate::{relocate, RelocationStats};
