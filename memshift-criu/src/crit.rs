//! Bridge to the `crit` image tool

use log::info;
use std::path::Path;
use std::process::Command;

use crate::error::{CriuError, Result};

/// Decode a binary CRIU image to JSON with `crit decode -i <image>`
///
/// # Errors
/// Returns [`CriuError::DecodeFailed`] if `crit` cannot be started or exits
/// with a failure status
pub fn decode(image: impl AsRef<Path>) -> Result<String> {
    let image = image.as_ref();
    let failed = |reason: String| CriuError::DecodeFailed { path: image.to_path_buf(), reason };

    info!("Decoding {} with crit", image.display());
    let output = Command::new("crit")
        .arg("decode")
        .arg("-i")
        .arg(image)
        .output()
        .map_err(|e| failed(format!("cannot run crit: {e}")))?;

    if !output.status.success() {
        return Err(failed(String::from_utf8_lossy(&output.stderr).trim().to_string()));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
