//! Upload validation and storage.
//!
//! Uploaded card scans pass an extension whitelist, get a sanitized
//! filename, and are persisted under the uploads directory keyed by a
//! content hash so re-uploads of the same scan overwrite rather than pile
//! up.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tracing::debug;

/// File extensions accepted for card scans.
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Returns true if the filename carries an accepted image extension.
pub fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(stem, ext)| {
            !stem.is_empty() && ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
        })
        .unwrap_or(false)
}

/// Reduce a client-supplied filename to a safe basename: path components
/// stripped, anything outside `[A-Za-z0-9._-]` replaced by `_`.
pub fn secure_filename(filename: &str) -> String {
    let basename = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);

    let cleaned: String = basename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = cleaned.trim_matches(['.', '_']).to_string();
    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed
    }
}

/// Persist an upload, returning the stored path.
///
/// Stored name is `<sha256 prefix>_<sanitized name>` inside `dir`, which is
/// created if missing.
pub fn store_upload(dir: &Path, filename: &str, data: &[u8]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create upload dir {:?}", dir))?;

    let digest = Sha256::digest(data);
    let prefix = format!("{:x}", digest);
    let stored = format!("{}_{}", &prefix[..16], secure_filename(filename));
    let path = dir.join(stored);

    std::fs::write(&path, data)
        .with_context(|| format!("Failed to write upload to {:?}", path))?;
    debug!("Stored upload {:?} ({} bytes)", path, data.len());

    Ok(path)
}
