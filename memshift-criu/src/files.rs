//! `files.json`: open and mapped files of a checkpoint

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CriuError, Result};
use crate::image::CriuImage;

/// Decoded `files` image
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesImage {
    pub magic: String,
    pub entries: Vec<FileEntry>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEntry {
    /// Entry kind: `REG`, `PIPE`, `INETSK`, ...
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reg: Option<RegFile>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Regular file record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegFile {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_id: Option<Vec<u32>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CriuImage for FilesImage {
    const MAGIC: &'static str = "FILES";

    fn magic(&self) -> &str {
        &self.magic
    }
}

impl FilesImage {
    /// First `REG` entry whose name contains `library`
    ///
    /// # Errors
    /// Returns [`CriuError::EntryNotFound`] if no entry matches
    pub fn find_reg_mut(&mut self, library: &str) -> Result<&mut RegFile> {
        self.entries
            .iter_mut()
            .filter(|entry| entry.kind == "REG")
            .find_map(|entry| entry.reg.as_mut().filter(|reg| reg.name.contains(library)))
            .ok_or_else(|| CriuError::EntryNotFound(library.to_string()))
    }

    /// Rename the library's file entry
    ///
    /// # Errors
    /// Returns [`CriuError::EntryNotFound`] if no entry matches
    pub fn set_name(&mut self, library: &str, new_name: &str) -> Result<()> {
        self.find_reg_mut(library)?.name = new_name.to_string();
        Ok(())
    }

    /// # Errors
    /// Returns [`CriuError::EntryNotFound`] if no entry matches
    pub fn set_size(&mut self, library: &str, size: u64) -> Result<()> {
        self.find_reg_mut(library)?.size = Some(size);
        Ok(())
    }

    /// # Errors
    /// Returns [`CriuError::EntryNotFound`] if no entry matches
    pub fn set_build_id(&mut self, library: &str, build_id: Vec<u32>) -> Result<()> {
        self.find_reg_mut(library)?.build_id = Some(build_id);
        Ok(())
    }
}
