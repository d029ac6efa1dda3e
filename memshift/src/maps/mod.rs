//! # Memory Mapping Listings
//!
//! Turns textual memory-mapping listings into [`Region`](crate::domain::Region)
//! records and groups them by the library that backs them.
//!
//! ## Accepted Listings
//!
//! Two textual layouts are understood, selected per file:
//!
//! ```text
//! proc:  7ff7bcee7000-7ff7bcee8000 r--p 00000000 08:01 2753574  /usr/lib64/ld-linux-x86-64.so.2
//! gdb:   0x400000  0x401000  0x1000  0x0  r--p  /path/to/file
//! ```
//!
//! Lines that do not fit are skipped and reported, never fatal.
//!
//! ## Grouping Key
//!
//! The same library is often mapped under different file names in two
//! processes (`libfoo.so.1` vs `libfoo.so.2`). Paths are normalized by
//! stripping trailing version suffixes before grouping, so both land under
//! `libfoo.so`. Bracket-delimited pseudo paths (`[stack]`, `[heap]`,
//! `[vdso]`) are **special** and never normalized; anonymous mappings are
//! grouped under [`ANONYMOUS_KEY`].
//!
//! ## Module Structure
//!
//! - **`parser`**: line and file parsing for both listing formats
//! - **`normalize`**: version-suffix stripping and special-path detection
//! - **`grouping`**: order-preserving grouping by normalized path

pub mod grouping;
pub mod normalize;
pub mod parser;

pub use grouping::{group_by_path, RegionGroups};
pub use normalize::{is_special, normalize_library_path, ANONYMOUS_KEY};
pub use parser::{parse_line, parse_maps, parse_maps_file, ParsedMaps, SkippedLine};
