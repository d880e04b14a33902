//! Integrity checking
//!
//! Confirms that every expected shard file exists and matches its checksum.
//! Pure verification; never mutates the filesystem.

pub mod checksum;

pub use checksum::{crc32c_file, md5_file, Checksum};

use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::catalog::ShardEntry;

/// Why a single entry failed verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityIssue {
    /// File is absent (or not a regular file)
    Missing { path: PathBuf },
    /// File content does not match the expected checksum
    Mismatch {
        path: PathBuf,
        expected: Checksum,
        actual: Checksum,
    },
    /// File exists but could not be read
    Unreadable { path: PathBuf, reason: String },
}

impl IntegrityIssue {
    pub fn path(&self) -> &Path {
        match self {
            IntegrityIssue::Missing { path }
            | IntegrityIssue::Mismatch { path, .. }
            | IntegrityIssue::Unreadable { path, .. } => path,
        }
    }
}

impl fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityIssue::Missing { path } => write!(f, "missing: {}", path.display()),
            IntegrityIssue::Mismatch {
                path,
                expected,
                actual,
            } => write!(
                f,
                "checksum mismatch: {} (expected {}, got {})",
                path.display(),
                expected,
                actual
            ),
            IntegrityIssue::Unreadable { path, reason } => {
                write!(f, "unreadable: {} ({})", path.display(), reason)
            }
        }
    }
}

/// Verify one file against an optional expected checksum
pub fn verify_file(path: &Path, expected: Option<&Checksum>) -> Option<IntegrityIssue> {
    if !path.is_file() {
        return Some(IntegrityIssue::Missing {
            path: path.to_path_buf(),
        });
    }
    let expected = expected?;
    match expected.compute_like(path) {
        Ok(actual) if actual == *expected => None,
        Ok(actual) => Some(IntegrityIssue::Mismatch {
            path: path.to_path_buf(),
            expected: expected.clone(),
            actual,
        }),
        Err(e) => Some(IntegrityIssue::Unreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }),
    }
}

/// Verify every entry under `<root>/<dataset_name>/`, collecting all failures
pub fn verify_entries(root: &Path, dataset_name: &str, entries: &[ShardEntry]) -> Vec<IntegrityIssue> {
    let dir = root.join(dataset_name);
    let issues: Vec<IntegrityIssue> = entries
        .iter()
        .filter_map(|entry| {
            let path = dir.join(&entry.filename);
            let issue = verify_file(&path, entry.checksum.as_ref());
            match &issue {
                Some(issue) => debug!("Integrity check failed: {}", issue),
                None => debug!("Verified {}", path.display()),
            }
            issue
        })
        .collect();

    if !issues.is_empty() {
        warn!(
            "{} of {} files under {} failed verification",
            issues.len(),
            entries.len(),
            dir.display()
        );
    }
    issues
}

/// True only if every listed file exists and matches its checksum
pub fn check_integrity(root: &Path, dataset_name: &str, entries: &[ShardEntry]) -> bool {
    verify_entries(root, dataset_name, entries).is_empty()
}
