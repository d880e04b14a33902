//! Dataset descriptor and split registration
//!
//! Describes where a dataset is fetched from, how its archive is laid out,
//! and which shard files (with checksums) make up each split.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use super::categories::modelnet40_categories;
use crate::error::{ModelNetError, Result};
use crate::integrity::Checksum;

/// Named partition of the dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    /// Training split
    Train,
    /// Evaluation split
    Test,
}

impl Split {
    /// Map the conventional `train` flag to a split
    pub fn from_train_flag(train: bool) -> Self {
        if train {
            Split::Train
        } else {
            Split::Test
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Test => "test",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One shard file and its expected checksum
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardEntry {
    /// File name relative to the dataset directory
    pub filename: String,
    /// Expected checksum; `None` means presence is enough
    #[serde(default)]
    pub checksum: Option<Checksum>,
}

impl ShardEntry {
    /// Create an entry with an expected checksum
    pub fn new(filename: impl Into<String>, checksum: Checksum) -> Self {
        Self {
            filename: filename.into(),
            checksum: Some(checksum),
        }
    }

    /// Create an entry that only requires the file to exist
    pub fn unchecked(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            checksum: None,
        }
    }
}

/// Full description of a downloadable, sharded dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetDescriptor {
    /// Canonical directory name under the root (e.g. "modelnet40")
    pub name: String,
    /// Archive URL
    pub url: String,
    /// Top-level directory produced by extracting the archive
    pub basedir: String,
    /// Training split shards, in load order
    pub train: Vec<ShardEntry>,
    /// Evaluation split shards, in load order
    pub test: Vec<ShardEntry>,
    /// Class names; labels index into this list
    pub categories: Vec<String>,
}

impl DatasetDescriptor {
    /// The published ModelNet40 HDF5 release (2048 points per cloud)
    pub fn modelnet40() -> Self {
        let md5 = |hex: &str| Checksum::Md5(hex.to_string());
        Self {
            name: "modelnet40".into(),
            url: crate::MODELNET40_URL.into(),
            basedir: "modelnet40_ply_hdf5_2048".into(),
            train: vec![
                ShardEntry::new("ply_data_train0.h5", md5("3176385ffc31a7b6b5af22191fd920d1")),
                ShardEntry::new("ply_data_train1.h5", md5("e3f613fb500559403b34925112754dc4")),
                ShardEntry::new("ply_data_train2.h5", md5("0c56e233a090ff87c3049d4ce08e7d8b")),
                ShardEntry::new("ply_data_train3.h5", md5("9d2af465adfa33a3285c369f3ca66c45")),
                ShardEntry::new("ply_data_train4.h5", md5("dff38de489b2c41bfaeded86c2208984")),
            ],
            test: vec![
                ShardEntry::new("ply_data_test0.h5", md5("e9732e6d83b09e79e9a7617df058adee")),
                ShardEntry::new("ply_data_test1.h5", md5("aba4b12a67c34391cc3c015a6f08ed4b")),
            ],
            categories: modelnet40_categories(),
        }
    }

    /// Shard entries of one split
    pub fn split(&self, split: Split) -> &[ShardEntry] {
        match split {
            Split::Train => &self.train,
            Split::Test => &self.test,
        }
    }

    /// Entries of both splits; acquisition is complete only when all verify
    pub fn all_entries(&self) -> Vec<ShardEntry> {
        self.train.iter().chain(self.test.iter()).cloned().collect()
    }

    /// Canonical dataset directory under `root`
    pub fn dataset_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.name)
    }

    /// File name of the archive, taken from the last URL segment
    pub fn archive_name(&self) -> Result<String> {
        let trimmed = self.url.split(['?', '#']).next().unwrap_or_default();
        match trimmed.rsplit('/').next() {
            Some(name) if !name.is_empty() => Ok(name.to_string()),
            _ => Err(ModelNetError::Config {
                reason: format!("URL has no archive file name: {}", self.url),
            }),
        }
    }

    /// Check structural consistency
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() || self.basedir.is_empty() {
            return Err(ModelNetError::Config {
                reason: "descriptor name and basedir must be non-empty".into(),
            });
        }
        if self.categories.is_empty() {
            return Err(ModelNetError::Config {
                reason: format!("descriptor '{}' has no categories", self.name),
            });
        }
        for entry in self.train.iter().chain(self.test.iter()) {
            let path = Path::new(&entry.filename);
            if entry.filename.is_empty() || path.is_absolute() || path.components().count() != 1 {
                return Err(ModelNetError::Config {
                    reason: format!("shard file name must be a bare name: '{}'", entry.filename),
                });
            }
        }
        Ok(())
    }

    /// Deserialize and validate from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let descriptor: Self = serde_json::from_str(json).map_err(|e| ModelNetError::Config {
            reason: format!("descriptor deserialization failed: {}", e),
        })?;
        descriptor.validate()?;
        Ok(descriptor)
    }

    /// Load a descriptor from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&json)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| ModelNetError::Config {
            reason: format!("descriptor serialization failed: {}", e),
        })
    }
}

impl Default for DatasetDescriptor {
    fn default() -> Self {
        Self::modelnet40()
    }
}
