//! Persistence of the generated llms.txt.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Write `content` to `path`, replacing any existing file and creating missing parent
/// directories. Returns the absolute path written.
pub fn write_output(path: &Path, content: &str) -> Result<PathBuf> {
    let output_path = std::path::absolute(path)
        .with_context(|| format!("Failed to resolve output path {}", path.display()))?;

    if let Some(parent) = output_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory {}", parent.display())
            })?;
            debug!(path = %parent.display(), "Created output directory");
        }
    }

    fs::write(&output_path, content)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;
    info!(path = %output_path.display(), bytes = content.len(), "Wrote output file");
    Ok(output_path)
}
