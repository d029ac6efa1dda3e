//! GNU build id extraction
//!
//! CRIU records a mapped file's build id as five `u32` words, each read
//! little-endian from the 20-byte note.

use log::debug;
use object::Object;
use std::fs;
use std::path::Path;

use crate::error::{CriuError, Result};

/// Length of a SHA-1 GNU build id note
pub const BUILD_ID_LEN: usize = 20;

/// Read the build id of an ELF object in CRIU's word layout
///
/// # Errors
/// Returns an error if the file cannot be read or parsed, has no build id
/// note, or the note is not 20 bytes long
pub fn read_build_id(path: impl AsRef<Path>) -> Result<Vec<u32>> {
    let path = path.as_ref();
    let data = fs::read(path).map_err(|source| CriuError::Read { path: path.to_path_buf(), source })?;
    let obj = object::File::parse(&*data)?;
    let id = obj.build_id()?.ok_or_else(|| CriuError::BuildIdMissing(path.to_path_buf()))?;
    debug!("build id of {}: {}", path.display(), id.iter().map(|b| format!("{b:02x}")).collect::<String>());
    build_id_words(id)
}

/// Convert raw build id bytes into little-endian words
///
/// # Errors
/// Returns [`CriuError::BuildIdLength`] unless `id` is [`BUILD_ID_LEN`] bytes
pub fn build_id_words(id: &[u8]) -> Result<Vec<u32>> {
    if id.len() != BUILD_ID_LEN {
        return Err(CriuError::BuildIdLength(id.len()));
    }
    Ok(id.chunks_exact(4).map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]])).collect())
}
