//! # Checkpoint Metadata (CRIU images)
//!
//! Typed access to the JSON form of CRIU checkpoint images, as produced by
//! `crit decode`. Moving a checkpoint between two address layouts needs a
//! handful of metadata edits next to the memory relocation itself:
//!
//! - [`FilesImage`] (`files.json`, magic `FILES`): rename a mapped library,
//!   update its size or its GNU build id
//! - [`CoreImage`] (`core-*.json`, magic `CORE`): mark every task alive
//! - [`PagemapImage`] (`pagemap-*.img`, magic `PAGEMAP`): find where a
//!   virtual address lives inside the `pages-*.img` contents
//!
//! Every image validates its `magic` on load. Fields that are not edited are
//! carried through untouched, so a load/save cycle keeps the document intact.
//!
//! ## Key Types
//!
//! - [`CriuImage`] - load/validate/save shared by all image kinds
//! - [`PageIndex`] - virtual address → offset in the pages image
//! - [`read_build_id`] - GNU build id of an ELF object as CRIU stores it

pub mod build_id;
pub mod core_image;
pub mod crit;
pub mod error;
pub mod files;
pub mod image;
pub mod pagemap;

pub use build_id::{build_id_words, read_build_id, BUILD_ID_LEN};
pub use core_image::{CoreImage, TASK_ALIVE};
pub use error::{CriuError, Result};
pub use files::FilesImage;
pub use image::CriuImage;
pub use pagemap::{find_pagemap_image, PageIndex, PageRun, PagemapImage, PAGE_SIZE};
