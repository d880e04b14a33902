//! Dataset acquisition
//!
//! Fetches the dataset archive, extracts it under the root, and moves the
//! extracted directory to its canonical name. A no-op when the files on disk
//! already verify.

pub mod extract;
pub mod fetch;

pub use extract::extract_archive;
pub use fetch::{fetcher_for_url, Fetcher, HttpFetcher, HttpFetcherConfig, LocalFetcher};

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::catalog::DatasetDescriptor;
use crate::error::{ModelNetError, Result};
use crate::integrity::check_integrity;

/// What [`ensure_downloaded`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acquisition {
    /// All files already verified; nothing was touched
    AlreadyPresent,
    /// The archive was fetched and extracted into `dataset_dir`
    Downloaded { archive: PathBuf, dataset_dir: PathBuf },
}

/// Make sure the dataset is present under `root`, fetching it if needed
pub fn ensure_downloaded(
    root: &Path,
    descriptor: &DatasetDescriptor,
    fetcher: &dyn Fetcher,
) -> Result<Acquisition> {
    if check_integrity(root, &descriptor.name, &descriptor.all_entries()) {
        debug!("{} already present under {}", descriptor.name, root.display());
        return Ok(Acquisition::AlreadyPresent);
    }

    std::fs::create_dir_all(root)?;
    let archive = root.join(descriptor.archive_name()?);
    download_archive(fetcher, &descriptor.url, &archive)?;

    let entries = extract_archive(&archive, root)?;
    info!("Extracted {} entries from {}", entries, archive.display());

    let extracted = root.join(&descriptor.basedir);
    let dataset_dir = descriptor.dataset_dir(root);
    if extracted != dataset_dir {
        move_into_place(&extracted, &dataset_dir)?;
    }

    info!("{} ready at {}", descriptor.name, dataset_dir.display());
    Ok(Acquisition::Downloaded {
        archive,
        dataset_dir,
    })
}

/// Fetch into `<archive>.part`, renaming once complete
fn download_archive(fetcher: &dyn Fetcher, url: &str, archive: &Path) -> Result<()> {
    let mut partial = archive.as_os_str().to_owned();
    partial.push(".part");
    let partial = PathBuf::from(partial);

    let bytes = fetcher.fetch(url, &partial)?;
    std::fs::rename(&partial, archive)?;
    debug!("Fetched {} bytes into {}", bytes, archive.display());
    Ok(())
}

/// Rename the extracted directory; an existing empty target is replaced
fn move_into_place(extracted: &Path, target: &Path) -> Result<()> {
    if !extracted.is_dir() {
        return Err(ModelNetError::Extract {
            archive: extracted.to_path_buf(),
            reason: "archive did not contain the expected top-level directory".into(),
        });
    }
    if target.exists() {
        let is_empty_dir = target.is_dir() && std::fs::read_dir(target)?.next().is_none();
        if !is_empty_dir {
            return Err(ModelNetError::TargetExists {
                path: target.to_path_buf(),
            });
        }
        std::fs::remove_dir(target)?;
    }
    std::fs::rename(extracted, target)?;
    Ok(())
}
