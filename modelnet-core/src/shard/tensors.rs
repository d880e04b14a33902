//! safetensors shard container
//!
//! Pure-Rust named-tensor files, used for re-packed copies of the dataset.
//! Points are stored as F32 (F64 is accepted and narrowed), labels as U8,
//! I32 or I64. All values are little-endian.

use ndarray::{ArrayD, IxDyn};
use safetensors::tensor::{Dtype, SafeTensorError, SafeTensors, TensorView};
use std::path::Path;

use super::{LabelArray, ShardArrays, DATA_ARRAY, LABEL_ARRAY};
use crate::error::{ModelNetError, Result};

/// Read the `data` and `label` tensors from a safetensors file
pub fn read(path: &Path) -> Result<ShardArrays> {
    let bytes = std::fs::read(path)?;
    let tensors = SafeTensors::deserialize(&bytes).map_err(|e| invalid(path, e))?;

    let data = named(&tensors, path, DATA_ARRAY)?;
    let label = named(&tensors, path, LABEL_ARRAY)?;

    let points = match data.dtype() {
        Dtype::F32 => to_array(path, data.shape(), decode(data.data(), f32::from_le_bytes))?,
        Dtype::F64 => {
            let wide: Vec<f64> = decode(data.data(), f64::from_le_bytes);
            to_array(path, data.shape(), wide.into_iter().map(|v| v as f32).collect())?
        }
        other => {
            return Err(ModelNetError::InvalidShard {
                path: path.to_path_buf(),
                reason: format!("'{}' has dtype {:?}, expected F32 or F64", DATA_ARRAY, other),
            })
        }
    };

    let labels = match label.dtype() {
        Dtype::U8 => LabelArray::U8(to_array(path, label.shape(), label.data().to_vec())?),
        Dtype::I32 => LabelArray::I32(to_array(path, label.shape(), decode(label.data(), i32::from_le_bytes))?),
        Dtype::I64 => LabelArray::I64(to_array(path, label.shape(), decode(label.data(), i64::from_le_bytes))?),
        other => {
            return Err(ModelNetError::InvalidShard {
                path: path.to_path_buf(),
                reason: format!("'{}' has dtype {:?}, expected U8, I32 or I64", LABEL_ARRAY, other),
            })
        }
    };

    Ok(ShardArrays { points, labels })
}

/// Write a shard as a safetensors file
pub fn write_shard(path: &Path, shard: &ShardArrays) -> Result<()> {
    let point_bytes: Vec<u8> = shard.points.iter().flat_map(|v| v.to_le_bytes()).collect();
    let (label_dtype, label_bytes): (Dtype, Vec<u8>) = match &shard.labels {
        LabelArray::U8(a) => (Dtype::U8, a.iter().copied().collect()),
        LabelArray::I32(a) => (Dtype::I32, a.iter().flat_map(|v| v.to_le_bytes()).collect()),
        LabelArray::I64(a) => (Dtype::I64, a.iter().flat_map(|v| v.to_le_bytes()).collect()),
    };

    let data = TensorView::new(Dtype::F32, shard.points.shape().to_vec(), &point_bytes)
        .map_err(|e| invalid(path, e))?;
    let label = TensorView::new(label_dtype, shard.labels.shape().to_vec(), &label_bytes)
        .map_err(|e| invalid(path, e))?;

    safetensors::serialize_to_file([(DATA_ARRAY, data), (LABEL_ARRAY, label)], &None, path)
        .map_err(|e| invalid(path, e))
}

fn named<'a>(tensors: &'a SafeTensors<'a>, path: &Path, name: &str) -> Result<TensorView<'a>> {
    tensors.tensor(name).map_err(|e| match e {
        SafeTensorError::TensorNotFound(_) => ModelNetError::MissingArray {
            path: path.to_path_buf(),
            name: name.to_string(),
        },
        other => invalid(path, other),
    })
}

fn decode<T, const N: usize>(bytes: &[u8], from_le: fn([u8; N]) -> T) -> Vec<T> {
    bytes
        .chunks_exact(N)
        .map(|chunk| {
            let mut buf = [0u8; N];
            buf.copy_from_slice(chunk);
            from_le(buf)
        })
        .collect()
}

fn to_array<T>(path: &Path, shape: &[usize], values: Vec<T>) -> Result<ArrayD<T>> {
    ArrayD::from_shape_vec(IxDyn(shape), values).map_err(|e| ModelNetError::InvalidShard {
        path: path.to_path_buf(),
        reason: format!("shape {:?}: {}", shape, e),
    })
}

fn invalid(path: &Path, e: SafeTensorError) -> ModelNetError {
    ModelNetError::InvalidShard {
        path: path.to_path_buf(),
        reason: format!("{:?}", e),
    }
}
