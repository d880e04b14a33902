//! Shared fixtures: small safetensors shards laid out like the real release

#![allow(dead_code)]

use modelnet_core::catalog::{modelnet40_categories, DatasetDescriptor, ShardEntry};
use modelnet_core::integrity::{crc32c_file, md5_file};
use modelnet_core::shard::tensors::write_shard;
use modelnet_core::shard::{LabelArray, ShardArrays};
use ndarray::{ArrayD, IxDyn};
use std::path::Path;

pub const NUM_POINTS: usize = 16;

/// Build a shard whose sample `i` has every coordinate equal to `base + i`
/// and label `labels[i]`, stored as a `[N, 1]` u8 column like the release.
pub fn make_shard(base: f32, labels: &[u8]) -> ShardArrays {
    let n = labels.len();
    let mut points = ArrayD::zeros(IxDyn(&[n, NUM_POINTS, 3]));
    for (i, mut sample) in points.outer_iter_mut().enumerate() {
        sample.fill(base + i as f32);
    }
    let labels = ArrayD::from_shape_vec(IxDyn(&[n, 1]), labels.to_vec()).unwrap();
    ShardArrays {
        points,
        labels: LabelArray::U8(labels),
    }
}

/// A descriptor for a tiny dataset named `tiny` with the given shard files.
pub fn descriptor(train: Vec<ShardEntry>, test: Vec<ShardEntry>) -> DatasetDescriptor {
    DatasetDescriptor {
        name: "tiny".into(),
        url: "file:///nonexistent/tiny_release.zip".into(),
        basedir: "tiny_release".into(),
        train,
        test,
        categories: modelnet40_categories(),
    }
}

/// Write shards into `dir` and return their checksummed entries.
pub fn write_shards(dir: &Path, shards: &[(&str, ShardArrays)], crc: bool) -> Vec<ShardEntry> {
    std::fs::create_dir_all(dir).unwrap();
    shards
        .iter()
        .map(|(name, shard)| {
            let path = dir.join(name);
            write_shard(&path, shard).unwrap();
            let checksum = if crc {
                crc32c_file(&path).unwrap()
            } else {
                md5_file(&path).unwrap()
            };
            ShardEntry::new(*name, checksum)
        })
        .collect()
}

/// The standard fixture: train = 5 + 3 samples, test = 2 + 2 samples.
///
/// Train labels are 0..5 then 10..13; test labels are 30, 31, 32, 33.
/// Train points start at 0.0 and 100.0; test points start at 1000.0 and 2000.0.
pub fn populate(root: &Path) -> DatasetDescriptor {
    let dir = root.join("tiny");
    let train = write_shards(
        &dir,
        &[
            ("train0.safetensors", make_shard(0.0, &[0, 1, 2, 3, 4])),
            ("train1.safetensors", make_shard(100.0, &[10, 11, 12])),
        ],
        false,
    );
    let test = write_shards(
        &dir,
        &[
            ("test0.safetensors", make_shard(1000.0, &[30, 31])),
            ("test1.safetensors", make_shard(2000.0, &[32, 33])),
        ],
        true,
    );
    descriptor(train, test)
}
