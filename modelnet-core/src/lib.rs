//! ModelNet40 Core - Point-cloud dataset acquisition and loading
//!
//! This crate provides:
//! - Archive download and extraction
//! - Shard integrity verification (MD5 / CRC32C)
//! - HDF5 and safetensors shard reading
//! - Split aggregation and indexed access with per-item transforms
//!
//! The published release ships HDF5 shards; enable the `hdf5` feature (or
//! `hdf5-static` without a system libhdf5) to load it. safetensors shards
//! work in every build.

pub mod acquire;
pub mod catalog;
pub mod config;
pub mod data;
pub mod error;
pub mod integrity;
pub mod shard;
#[cfg(feature = "python")]
pub mod python_api;

pub use catalog::{DatasetDescriptor, ShardEntry, Split, MODELNET40_CATEGORIES};
pub use config::LoaderConfig;
pub use data::{IndexedDataset, ModelNet40, ModelNet40Options};
pub use error::{ModelNetError, Result};
pub use integrity::{check_integrity, Checksum};

/// Published ModelNet40 HDF5 archive (2048 points per cloud)
pub const MODELNET40_URL: &str = "https://shapenet.cs.stanford.edu/media/modelnet40_ply_hdf5_2048.zip";

/// Number of ModelNet40 categories
pub const NUM_CATEGORIES: usize = 40;
