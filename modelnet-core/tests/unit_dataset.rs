//! Unit tests for dataset construction and indexed access
//!
//! Covers length, ordering, alignment, split isolation, transforms and
//! error paths against small safetensors fixtures.

mod common;

use modelnet_core::catalog::ShardEntry;
use modelnet_core::data::{NormalizeUnitSphere, PointTransform, TakePoints};
use modelnet_core::integrity::Checksum;
use modelnet_core::{IndexedDataset, ModelNet40, ModelNet40Options, ModelNetError};
use ndarray::Array2;

fn open(root: &std::path::Path, train: bool) -> ModelNet40 {
    let descriptor = common::populate(root);
    ModelNet40::new(ModelNet40Options::new(root).train(train).descriptor(descriptor)).unwrap()
}

#[test]
fn test_end_to_end_five_plus_three() {
    let root = tempfile::tempdir().unwrap();
    let ds = open(root.path(), true);

    assert_eq!(ds.len(), 8);
    assert!(!ds.is_empty());
    assert_eq!(ds.num_points(), common::NUM_POINTS);

    // index 5 is the first sample of the second shard
    let (points, label) = ds.get(5).unwrap();
    assert_eq!(label, 10);
    assert_eq!(points.shape(), &[common::NUM_POINTS, 3]);
    assert!(points.iter().all(|&v| v == 100.0));
}

#[test]
fn test_first_item_is_first_sample_of_first_shard() {
    let root = tempfile::tempdir().unwrap();
    let ds = open(root.path(), true);

    let (points, label) = ds.get(0).unwrap();
    assert_eq!(label, 0);
    assert!(points.iter().all(|&v| v == 0.0));
}

#[test]
fn test_labels_align_with_concatenated_order() {
    let root = tempfile::tempdir().unwrap();
    let ds = open(root.path(), true);

    let expected = [0i64, 1, 2, 3, 4, 10, 11, 12];
    let expected_base = [0.0f32, 1.0, 2.0, 3.0, 4.0, 100.0, 101.0, 102.0];
    for i in 0..ds.len() {
        let (points, label) = ds.get(i).unwrap();
        assert_eq!(label, expected[i], "label at {i}");
        assert_eq!(points[[0, 0]], expected_base[i], "points at {i}");
        assert_eq!(ds.labels()[i], expected[i]);
    }
}

#[test]
fn test_split_isolation() {
    let root = tempfile::tempdir().unwrap();
    let ds = open(root.path(), false);

    assert_eq!(ds.len(), 4);
    assert_eq!(ds.split().as_str(), "test");
    let labels: Vec<i64> = (0..ds.len()).map(|i| ds.get(i).unwrap().1).collect();
    assert_eq!(labels, vec![30, 31, 32, 33]);
    assert!(ds.points().iter().all(|&v| v >= 1000.0));
}

#[test]
fn test_out_of_bounds() {
    let root = tempfile::tempdir().unwrap();
    let ds = open(root.path(), true);

    match ds.get(ds.len()).unwrap_err() {
        ModelNetError::IndexOutOfBounds { index, len } => assert_eq!((index, len), (8, 8)),
        other => panic!("unexpected error {other:?}"),
    }
    assert!(ds.get(usize::MAX).is_err());
}

#[test]
fn test_missing_files_without_download() {
    let root = tempfile::tempdir().unwrap();
    let err = ModelNet40::open(root.path(), true).unwrap_err();
    assert!(matches!(err, ModelNetError::NotFoundOrCorrupted { .. }));
    assert!(err.to_string().starts_with("Dataset not found or corrupted"));
}

#[test]
fn test_corrupt_test_split_blocks_train_load() {
    let root = tempfile::tempdir().unwrap();
    let descriptor = common::populate(root.path());
    std::fs::write(root.path().join("tiny/test1.safetensors"), b"tampered").unwrap();

    let err = ModelNet40::new(ModelNet40Options::new(root.path()).descriptor(descriptor)).unwrap_err();
    assert!(matches!(err, ModelNetError::NotFoundOrCorrupted { .. }));
}

#[test]
fn test_transform_applied_on_every_get() {
    let root = tempfile::tempdir().unwrap();
    let descriptor = common::populate(root.path());
    let ds = ModelNet40::new(
        ModelNet40Options::new(root.path())
            .descriptor(descriptor)
            .transform(|p: Array2<f32>| p + 1.0)
            .target_transform(|l: i64| l * 2),
    )
    .unwrap();

    let first = ds.get(6).unwrap();
    let second = ds.get(6).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.1, 22);
    assert!(first.0.iter().all(|&v| v == 102.0));

    // stored data is untouched
    assert_eq!(ds.raw(6).unwrap().1, 11);
}

#[test]
fn test_joint_transform_wins() {
    let root = tempfile::tempdir().unwrap();
    let descriptor = common::populate(root.path());
    let ds = ModelNet40::new(
        ModelNet40Options::new(root.path())
            .descriptor(descriptor)
            .transform(|p: Array2<f32>| p * 0.0)
            .transforms(|p: Array2<f32>, l: i64| (TakePoints(2).apply(p), l + 100)),
    )
    .unwrap();

    let (points, label) = ds.get(1).unwrap();
    assert_eq!(label, 101);
    assert_eq!(points.shape(), &[2, 3]);
    assert!(points.iter().all(|&v| v == 1.0));
}

#[test]
fn test_builtin_point_transform() {
    let root = tempfile::tempdir().unwrap();
    let descriptor = common::populate(root.path());
    let ds = ModelNet40::new(
        ModelNet40Options::new(root.path())
            .descriptor(descriptor)
            .transform(NormalizeUnitSphere),
    )
    .unwrap();

    // every point of a fixture sample coincides, so it collapses to the origin
    let (points, _) = ds.get(3).unwrap();
    assert!(points.iter().all(|&v| v == 0.0));
}

#[test]
fn test_label_out_of_range() {
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join("tiny");
    let train = common::write_shards(
        &dir,
        &[("train0.safetensors", common::make_shard(0.0, &[1, 40]))],
        false,
    );
    let descriptor = common::descriptor(train, vec![]);

    match ModelNet40::new(ModelNet40Options::new(root.path()).descriptor(descriptor)).unwrap_err() {
        ModelNetError::LabelOutOfRange {
            index,
            label,
            num_classes,
        } => assert_eq!((index, label, num_classes), (1, 40, 40)),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_missing_named_array() {
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join("tiny");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("train0.safetensors");
    let bytes: Vec<u8> = [0.0f32; 3].iter().flat_map(|v| v.to_le_bytes()).collect();
    let view = safetensors::tensor::TensorView::new(safetensors::Dtype::F32, vec![1, 1, 3], &bytes).unwrap();
    safetensors::serialize_to_file([("points", view)], &None, &path).unwrap();

    let descriptor = common::descriptor(vec![ShardEntry::unchecked("train0.safetensors")], vec![]);
    let err = ModelNet40::new(ModelNet40Options::new(root.path()).descriptor(descriptor)).unwrap_err();
    match err {
        ModelNetError::MissingArray { name, .. } => assert_eq!(name, "data"),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_empty_split() {
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join("tiny");
    let train = common::write_shards(&dir, &[("a.safetensors", common::make_shard(0.0, &[5]))], true);
    let descriptor = common::descriptor(train, vec![]);

    let ds = ModelNet40::new(ModelNet40Options::new(root.path()).train(false).descriptor(descriptor)).unwrap();
    assert!(ds.is_empty());
    assert!(ds.get(0).is_err());
}

#[test]
fn test_class_counts_and_names() {
    let root = tempfile::tempdir().unwrap();
    let ds = open(root.path(), false);

    let counts = ds.class_counts();
    assert_eq!(counts.len(), 4);
    assert_eq!(counts[&30], 1);
    assert_eq!(ds.category_name(30), Some("sofa"));
    assert_eq!(ds.categories().len(), 40);
}

#[test]
fn test_checksum_mismatch_fails_construction() {
    let root = tempfile::tempdir().unwrap();
    let mut descriptor = common::populate(root.path());
    descriptor.test[0].checksum = Some(Checksum::Crc32c(0));

    let err = ModelNet40::new(ModelNet40Options::new(root.path()).descriptor(descriptor)).unwrap_err();
    assert!(err.is_corruption());
}

#[test]
fn test_map_to_custom_item() {
    let root = tempfile::tempdir().unwrap();
    let descriptor = common::populate(root.path());
    let categories = descriptor.categories.clone();
    let ds = ModelNet40::new(
        ModelNet40Options::new(root.path())
            .descriptor(descriptor)
            .target_transform(|l: i64| l + 1),
    )
    .unwrap();

    // transforms run first, then the mapping
    let named = ds.map(move |(points, label): (Array2<f32>, i64)| {
        (categories[label as usize].clone(), points.nrows())
    });
    assert_eq!(named.len(), 8);
    assert_eq!(named.get(0).unwrap(), ("bathtub".to_string(), common::NUM_POINTS));
    assert_eq!(named.get(5).unwrap().0, "curtain");
    assert!(named.get(8).is_err());
}

#[test]
fn test_repeated_construction_sees_same_data() {
    let root = tempfile::tempdir().unwrap();
    let descriptor = common::populate(root.path());

    let first = ModelNet40::new(ModelNet40Options::new(root.path()).descriptor(descriptor.clone())).unwrap();
    let second = ModelNet40::new(ModelNet40Options::new(root.path()).descriptor(descriptor)).unwrap();
    assert_eq!(first.labels(), second.labels());
    assert_eq!(first.points(), second.points());
}
