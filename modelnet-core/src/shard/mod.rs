//! Shard reading
//!
//! A shard is one container file holding two named arrays: `data` (point
//! clouds) and `label` (integer class indices). The container is opened,
//! both arrays are copied out, and the handle is released within a single
//! [`read_shard`] call.

#[cfg(feature = "hdf5")]
pub mod h5;
pub mod tensors;

use ndarray::ArrayD;
use std::path::Path;
use tracing::debug;

use crate::error::{ModelNetError, Result};

/// Name of the point array inside a shard
pub const DATA_ARRAY: &str = "data";
/// Name of the label array inside a shard
pub const LABEL_ARRAY: &str = "label";

/// Labels in the integer width they were stored with
#[derive(Debug, Clone, PartialEq)]
pub enum LabelArray {
    U8(ArrayD<u8>),
    I32(ArrayD<i32>),
    I64(ArrayD<i64>),
}

impl LabelArray {
    pub fn shape(&self) -> &[usize] {
        match self {
            LabelArray::U8(a) => a.shape(),
            LabelArray::I32(a) => a.shape(),
            LabelArray::I64(a) => a.shape(),
        }
    }

    /// Widen to `i64`
    pub fn to_i64(&self) -> ArrayD<i64> {
        match self {
            LabelArray::U8(a) => a.mapv(i64::from),
            LabelArray::I32(a) => a.mapv(i64::from),
            LabelArray::I64(a) => a.clone(),
        }
    }
}

/// Arrays copied out of one shard file
#[derive(Debug, Clone, PartialEq)]
pub struct ShardArrays {
    /// Point samples, conventionally `[samples, points, coords]`
    pub points: ArrayD<f32>,
    /// Class indices, conventionally `[samples]` or `[samples, 1]`
    pub labels: LabelArray,
}

impl ShardArrays {
    /// Number of samples along axis 0 of the point array
    pub fn num_samples(&self) -> usize {
        self.points.shape().first().copied().unwrap_or(0)
    }
}

/// Container formats a shard can be stored in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShardFormat {
    /// HDF5 (the published ModelNet40 release)
    Hdf5,
    /// safetensors named-tensor file
    SafeTensors,
}

impl ShardFormat {
    /// Detect the format from the file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("h5") | Some("hdf5") => Ok(ShardFormat::Hdf5),
            Some("safetensors") => Ok(ShardFormat::SafeTensors),
            _ => Err(ModelNetError::UnsupportedFormat {
                path: path.to_path_buf(),
                reason: "expected a .h5, .hdf5 or .safetensors extension".into(),
            }),
        }
    }
}

/// Read the `data` and `label` arrays from one shard file
pub fn read_shard(path: &Path) -> Result<ShardArrays> {
    let arrays = match ShardFormat::from_path(path)? {
        ShardFormat::SafeTensors => tensors::read(path)?,
        ShardFormat::Hdf5 => read_hdf5(path)?,
    };
    debug!(
        "Read shard {}: points {:?}, labels {:?}",
        path.display(),
        arrays.points.shape(),
        arrays.labels.shape()
    );
    Ok(arrays)
}

#[cfg(feature = "hdf5")]
fn read_hdf5(path: &Path) -> Result<ShardArrays> {
    h5::read(path)
}

#[cfg(not(feature = "hdf5"))]
fn read_hdf5(path: &Path) -> Result<ShardArrays> {
    Err(ModelNetError::UnsupportedFormat {
        path: path.to_path_buf(),
        reason: "HDF5 shards require the `hdf5` feature".into(),
    })
}
