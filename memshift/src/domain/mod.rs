//! Domain model for memshift
//!
//! This module contains core domain types and errors that provide:
//! - Compile-time safety via newtype pattern (`Shift`, `WordWidth`)
//! - Self-documenting function signatures
//! - Structured error handling

pub mod errors;
pub mod types;

// Re-export common types for convenience
pub use types::{MapsFormat, Region, Shift, WordWidth};

pub use errors::{LayoutMismatch, MapsError, Mismatch, RelocateError};
