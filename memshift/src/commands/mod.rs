//! Subcommand handlers

pub mod check_range;
pub mod meta;
pub mod page_offset;
pub mod translate;
