//! Archive extraction

use std::fs::File;
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;

use crate::error::{ModelNetError, Result};

/// Extract an archive into `dest`, returning the number of entries
pub fn extract_archive(archive: &Path, dest: &Path) -> Result<usize> {
    let is_zip = archive
        .extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| e.eq_ignore_ascii_case("zip"));
    if !is_zip {
        return Err(ModelNetError::UnsupportedArchive {
            path: archive.to_path_buf(),
        });
    }

    let extract_err = |reason: String| ModelNetError::Extract {
        archive: archive.to_path_buf(),
        reason,
    };

    let mut zip = ZipArchive::new(File::open(archive)?).map_err(|e| extract_err(e.to_string()))?;
    let entries = zip.len();
    // Entry paths are sanitized by the zip crate; `..` components are rejected.
    zip.extract(dest).map_err(|e| extract_err(e.to_string()))?;

    debug!("Extracted {} entries from {} into {}", entries, archive.display(), dest.display());
    Ok(entries)
}
