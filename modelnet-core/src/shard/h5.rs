//! HDF5 shard container (the published ModelNet40 release)
//!
//! Each `ply_data_*.h5` file holds `data` as `[samples, 2048, 3]` f32 and
//! `label` as `[samples, 1]` u8.

use hdf5::types::{IntSize, TypeDescriptor};
use hdf5::File;
use std::path::Path;

use super::{LabelArray, ShardArrays, DATA_ARRAY, LABEL_ARRAY};
use crate::error::{ModelNetError, Result};

/// Read the `data` and `label` datasets; the file is closed on return
pub fn read(path: &Path) -> Result<ShardArrays> {
    let file = File::open(path)?;

    for name in [DATA_ARRAY, LABEL_ARRAY] {
        if !file.link_exists(name) {
            return Err(ModelNetError::MissingArray {
                path: path.to_path_buf(),
                name: name.to_string(),
            });
        }
    }

    let points = file.dataset(DATA_ARRAY)?.read_dyn::<f32>()?;

    let label = file.dataset(LABEL_ARRAY)?;
    let labels = match label.dtype()?.to_descriptor()? {
        TypeDescriptor::Unsigned(IntSize::U1) => LabelArray::U8(label.read_dyn::<u8>()?),
        TypeDescriptor::Integer(IntSize::U4) => LabelArray::I32(label.read_dyn::<i32>()?),
        TypeDescriptor::Integer(_) | TypeDescriptor::Unsigned(_) => {
            LabelArray::I64(label.read_dyn::<i64>()?)
        }
        other => {
            return Err(ModelNetError::InvalidShard {
                path: path.to_path_buf(),
                reason: format!("'{}' has non-integer type {:?}", LABEL_ARRAY, other),
            })
        }
    };

    Ok(ShardArrays { points, labels })
}

/// Write a shard as an HDF5 file with `data` and `label` datasets
pub fn write_shard(path: &Path, shard: &ShardArrays) -> Result<()> {
    let file = File::create(path)?;
    file.new_dataset_builder()
        .with_data(&shard.points)
        .create(DATA_ARRAY)?;
    let labels = file.new_dataset_builder();
    match &shard.labels {
        LabelArray::U8(a) => labels.with_data(a).create(LABEL_ARRAY)?,
        LabelArray::I32(a) => labels.with_data(a).create(LABEL_ARRAY)?,
        LabelArray::I64(a) => labels.with_data(a).create(LABEL_ARRAY)?,
    };
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{ArrayD, IxDyn};

    fn shard(labels: LabelArray) -> ShardArrays {
        let n = labels.shape()[0];
        let points = ArrayD::from_shape_fn(IxDyn(&[n, 4, 3]), |idx| (idx[0] * 100 + idx[1]) as f32);
        ShardArrays { points, labels }
    }

    #[test]
    fn test_write_then_read_release_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ply_data_train0.h5");
        let labels = ArrayD::from_shape_vec(IxDyn(&[3, 1]), vec![0u8, 8, 39]).unwrap();
        let original = shard(LabelArray::U8(labels));

        write_shard(&path, &original).unwrap();
        let read_back = read(&path).unwrap();

        assert_eq!(read_back, original);
        assert_eq!(read_back.num_samples(), 3);
        assert_eq!(read_back.points[[2, 3, 0]], 203.0);
    }

    #[test]
    fn test_wide_labels_keep_their_width() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.h5");
        let labels = ArrayD::from_shape_vec(IxDyn(&[2]), vec![5i64, 17]).unwrap();

        write_shard(&path, &shard(LabelArray::I64(labels.clone()))).unwrap();
        assert_eq!(read(&path).unwrap().labels, LabelArray::I64(labels));
    }

    #[test]
    fn test_missing_label_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no_label.h5");
        {
            let file = File::create(&path).unwrap();
            let points = ArrayD::<f32>::zeros(IxDyn(&[1, 4, 3]));
            file.new_dataset_builder()
                .with_data(&points)
                .create(DATA_ARRAY)
                .unwrap();
        }

        match read(&path).unwrap_err() {
            ModelNetError::MissingArray { name, .. } => assert_eq!(name, LABEL_ARRAY),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_not_an_hdf5_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.h5");
        std::fs::write(&path, b"definitely not hdf5").unwrap();
        assert!(matches!(read(&path), Err(ModelNetError::Hdf5(_))));
    }
}
