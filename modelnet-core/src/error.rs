//! Error types for modelnet-core
//!
//! One taxonomy covering acquisition, integrity, shard format,
//! aggregation and index access errors.

use std::path::PathBuf;
use thiserror::Error;

/// Primary error type for all dataset operations
#[derive(Debug, Error)]
pub enum ModelNetError {
    // ========== Integrity Errors ==========

    /// Required shard files are missing or fail their checksum
    #[error("Dataset not found or corrupted under {}", root.display())]
    NotFoundOrCorrupted { root: PathBuf },

    /// Checksum string could not be parsed
    #[error("Invalid checksum: {value}")]
    InvalidChecksum { value: String },

    // ========== Acquisition Errors ==========

    /// Archive download failed
    #[error("Download of {url} failed: {reason}")]
    Download { url: String, reason: String },

    /// Archive could not be extracted
    #[error("Failed to extract {}: {reason}", archive.display())]
    Extract { archive: PathBuf, reason: String },

    /// Archive type is not supported
    #[error("Unsupported archive: {}", path.display())]
    UnsupportedArchive { path: PathBuf },

    /// Rename target is already occupied
    #[error("Target already exists: {}", path.display())]
    TargetExists { path: PathBuf },

    // ========== Shard Errors ==========

    /// Shard container lacks a required named array
    #[error("Shard {} has no array named '{name}'", path.display())]
    MissingArray { path: PathBuf, name: String },

    /// Shard container format is not supported
    #[error("Unsupported shard format {}: {reason}", path.display())]
    UnsupportedFormat { path: PathBuf, reason: String },

    /// Shard contents could not be decoded
    #[error("Invalid shard {}: {reason}", path.display())]
    InvalidShard { path: PathBuf, reason: String },

    // ========== Aggregation Errors ==========

    /// Point arrays disagree on shape
    #[error("Shape mismatch: {reason}")]
    ShapeMismatch { reason: String },

    /// Sample and label counts differ
    #[error("Length mismatch: {samples} samples vs {labels} labels")]
    LengthMismatch { samples: usize, labels: usize },

    /// Label outside the category range
    #[error("Label {label} at index {index} outside [0, {num_classes})")]
    LabelOutOfRange {
        index: usize,
        label: i64,
        num_classes: usize,
    },

    // ========== Access Errors ==========

    /// Index access out of range
    #[error("Index {index} out of bounds for dataset of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    // ========== Runtime Errors ==========

    /// Invalid descriptor or configuration
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HDF5 library error
    #[cfg(feature = "hdf5")]
    #[error("HDF5 error: {0}")]
    Hdf5(#[from] hdf5::Error),
}

impl ModelNetError {
    /// Returns true if this error indicates missing or corrupt data on disk
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            ModelNetError::NotFoundOrCorrupted { .. }
                | ModelNetError::MissingArray { .. }
                | ModelNetError::InvalidShard { .. }
                | ModelNetError::LabelOutOfRange { .. }
        )
    }
}

/// Result type alias for dataset operations
pub type Result<T> = std::result::Result<T, ModelNetError>;
