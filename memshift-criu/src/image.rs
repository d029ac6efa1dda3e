//! Load, validate and save decoded image documents

use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::error::{CriuError, Result};

/// A decoded CRIU image with a `magic` tag
pub trait CriuImage: DeserializeOwned {
    /// Expected value of the top-level `magic` field
    const MAGIC: &'static str;

    fn magic(&self) -> &str;

    /// Parse a JSON document and check its magic
    ///
    /// # Errors
    /// Returns an error on invalid JSON or an unexpected magic value
    fn from_json(json: &str) -> Result<Self> {
        let image: Self = serde_json::from_str(json)?;
        if image.magic() != Self::MAGIC {
            return Err(CriuError::WrongMagic { expected: Self::MAGIC, found: image.magic().to_string() });
        }
        Ok(image)
    }

    /// Read and parse an image from a JSON file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not a valid image
    fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .map_err(|source| CriuError::Read { path: path.to_path_buf(), source })?;
        debug!("loaded {} ({} bytes)", path.display(), json.len());
        Self::from_json(&json)
    }

    /// Serialize with 4-space indentation, the layout `crit` tooling writes
    ///
    /// # Errors
    /// Returns an error if serialization fails
    fn to_json(&self) -> Result<String>
    where
        Self: Serialize,
    {
        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.serialize(&mut serializer)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    /// Overwrite `path` with the whole document
    ///
    /// # Errors
    /// Returns an error if serialization or writing fails
    fn save(&self, path: impl AsRef<Path>) -> Result<()>
    where
        Self: Serialize,
    {
        let path = path.as_ref();
        let json = self.to_json()?;
        fs::write(path, json).map_err(|source| CriuError::Write { path: path.to_path_buf(), source })
    }
}
