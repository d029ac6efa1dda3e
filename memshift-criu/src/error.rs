//! Error types for checkpoint image handling

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CriuError {
    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid magic value: expected '{expected}', got '{found}'")]
    WrongMagic { expected: &'static str, found: String },

    #[error("no REG entry found for '{0}'")]
    EntryNotFound(String),

    #[error("build ID not found in '{0}'")]
    BuildIdMissing(PathBuf),

    #[error("wrong build ID length: expected 20 bytes, got {0}")]
    BuildIdLength(usize),

    #[error("failed to parse object file: {0}")]
    Object(#[from] object::Error),

    #[error("no pagemap-*.img file in '{0}'")]
    NoPagemap(PathBuf),

    #[error("expected exactly one pagemap-*.img in '{dir}', found {count}")]
    AmbiguousPagemap { dir: PathBuf, count: usize },

    #[error("pagemap run at {vaddr:#x} with {nr_pages} pages does not fit in a 64-bit address space")]
    PageRunOverflow { vaddr: u64, nr_pages: u64 },

    #[error("crit decode failed for '{path}': {reason}")]
    DecodeFailed { path: PathBuf, reason: String },
}

pub type Result<T> = std::result::Result<T, CriuError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrong_magic_display() {
        let err = CriuError::WrongMagic { expected: "FILES", found: "CORE".to_string() };
        assert_eq!(err.to_string(), "invalid magic value: expected 'FILES', got 'CORE'");
    }

    #[test]
    fn test_path_errors_show_path() {
        let err = CriuError::AmbiguousPagemap { dir: PathBuf::from("/ckpt"), count: 2 };
        assert!(err.to_string().contains("/ckpt"));
        assert!(err.to_string().contains("found 2"));
    }
}
