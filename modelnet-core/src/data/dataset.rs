//! Indexed point-cloud dataset
//!
//! [`ModelNet40`] verifies (and optionally acquires) the dataset at
//! construction, eagerly loads every shard of the chosen split, and serves
//! `(points, label)` pairs by index.

use ndarray::{Array2, ArrayView1, ArrayView3, Axis};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::aggregate::aggregate;
use super::transform::{LabelTransform, PairTransform, PointTransform, Transforms};
use crate::acquire::{ensure_downloaded, fetcher_for_url, Fetcher, HttpFetcherConfig};
use crate::catalog::{category_name, DatasetDescriptor, Split};
use crate::error::{ModelNetError, Result};
use crate::integrity::check_integrity;
use crate::shard::read_shard;

/// Length plus random access by index
pub trait IndexedDataset {
    type Item;

    /// Total number of samples
    fn len(&self) -> usize;

    /// Whether the dataset is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Retrieve the item at `index`; out-of-range access is an error
    fn get(&self, index: usize) -> Result<Self::Item>;

    /// Pass every retrieved item through `f`, which may change its type
    fn map<F, O>(self, f: F) -> Mapped<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Item) -> O,
    {
        Mapped { inner: self, f }
    }
}

/// Dataset whose items go through a function on every `get`.
///
/// Created by [`IndexedDataset::map`].
pub struct Mapped<D, F> {
    inner: D,
    f: F,
}

impl<D, F> Mapped<D, F> {
    pub fn inner(&self) -> &D {
        &self.inner
    }

    pub fn into_inner(self) -> D {
        self.inner
    }
}

impl<D, F, O> IndexedDataset for Mapped<D, F>
where
    D: IndexedDataset,
    F: Fn(D::Item) -> O,
{
    type Item = O;

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn get(&self, index: usize) -> Result<O> {
        self.inner.get(index).map(&self.f)
    }
}

/// Construction options for [`ModelNet40`]
pub struct ModelNet40Options {
    root: PathBuf,
    train: bool,
    download: bool,
    descriptor: DatasetDescriptor,
    fetcher: Option<Box<dyn Fetcher>>,
    http: HttpFetcherConfig,
    transform: Option<Box<dyn PointTransform>>,
    target_transform: Option<Box<dyn LabelTransform>>,
    transforms: Option<Box<dyn PairTransform>>,
}

impl ModelNet40Options {
    /// Training split, no download, no transforms, published descriptor
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            train: true,
            download: false,
            descriptor: DatasetDescriptor::modelnet40(),
            fetcher: None,
            http: HttpFetcherConfig::default(),
            transform: None,
            target_transform: None,
            transforms: None,
        }
    }

    /// Select the training split (`true`) or the evaluation split (`false`)
    pub fn train(mut self, train: bool) -> Self {
        self.train = train;
        self
    }

    /// Fetch the archive when the files on disk do not verify
    pub fn download(mut self, download: bool) -> Self {
        self.download = download;
        self
    }

    /// Use a different dataset layout
    pub fn descriptor(mut self, descriptor: DatasetDescriptor) -> Self {
        self.descriptor = descriptor;
        self
    }

    /// Override the archive fetcher chosen from the URL scheme
    pub fn fetcher(mut self, fetcher: impl Fetcher + 'static) -> Self {
        self.fetcher = Some(Box::new(fetcher));
        self
    }

    /// HTTP timeouts for the default fetcher
    pub fn http(mut self, http: HttpFetcherConfig) -> Self {
        self.http = http;
        self
    }

    pub fn transform(mut self, transform: impl PointTransform + 'static) -> Self {
        self.transform = Some(Box::new(transform));
        self
    }

    pub fn target_transform(mut self, target_transform: impl LabelTransform + 'static) -> Self {
        self.target_transform = Some(Box::new(target_transform));
        self
    }

    /// Joint transform; replaces `transform` and `target_transform`
    pub fn transforms(mut self, transforms: impl PairTransform + 'static) -> Self {
        self.transforms = Some(Box::new(transforms));
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn split(&self) -> Split {
        Split::from_train_flag(self.train)
    }
}

impl std::fmt::Debug for ModelNet40Options {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelNet40Options")
            .field("root", &self.root)
            .field("train", &self.train)
            .field("download", &self.download)
            .field("dataset", &self.descriptor.name)
            .finish_non_exhaustive()
    }
}

/// One split of ModelNet40 held in memory
pub struct ModelNet40 {
    root: PathBuf,
    split: Split,
    descriptor: DatasetDescriptor,
    samples: ndarray::Array3<f32>,
    labels: ndarray::Array1<i64>,
    transforms: Transforms,
}

impl ModelNet40 {
    /// Verify, optionally acquire, then load the selected split
    pub fn new(options: ModelNet40Options) -> Result<Self> {
        let ModelNet40Options {
            root,
            train,
            download,
            descriptor,
            fetcher,
            http,
            transform,
            target_transform,
            transforms,
        } = options;
        descriptor.validate()?;

        if transforms.is_some() && (transform.is_some() || target_transform.is_some()) {
            warn!("Joint transform supplied; ignoring transform and target_transform");
        }
        let transforms = Transforms::resolve(transform, target_transform, transforms);

        if download {
            let fetcher = match fetcher {
                Some(f) => f,
                None => fetcher_for_url(&descriptor.url, &http)?,
            };
            ensure_downloaded(&root, &descriptor, fetcher.as_ref())?;
        }

        if !check_integrity(&root, &descriptor.name, &descriptor.all_entries()) {
            return Err(ModelNetError::NotFoundOrCorrupted { root });
        }

        let split = Split::from_train_flag(train);
        let dir = descriptor.dataset_dir(&root);
        let shards = descriptor
            .split(split)
            .iter()
            .map(|entry| read_shard(&dir.join(&entry.filename)))
            .collect::<Result<Vec<_>>>()?;

        let (samples, labels) = aggregate(&shards)?;
        drop(shards);

        let num_classes = descriptor.categories.len();
        if let Some((index, &label)) = labels
            .iter()
            .enumerate()
            .find(|(_, l)| **l < 0 || **l as usize >= num_classes)
        {
            return Err(ModelNetError::LabelOutOfRange {
                index,
                label,
                num_classes,
            });
        }

        info!(
            "Loaded {} split of {}: {} samples from {} shards",
            split,
            descriptor.name,
            labels.len(),
            descriptor.split(split).len()
        );

        Ok(Self {
            root,
            split,
            descriptor,
            samples,
            labels,
            transforms,
        })
    }

    /// Load with default options
    pub fn open(root: impl Into<PathBuf>, train: bool) -> Result<Self> {
        Self::new(ModelNet40Options::new(root).train(train))
    }

    /// Raw pair at `index`, ignoring transforms
    pub fn raw(&self, index: usize) -> Result<(Array2<f32>, i64)> {
        let len = self.labels.len();
        if index >= len {
            return Err(ModelNetError::IndexOutOfBounds { index, len });
        }
        Ok((self.samples.index_axis(Axis(0), index).to_owned(), self.labels[index]))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn split(&self) -> Split {
        self.split
    }

    pub fn descriptor(&self) -> &DatasetDescriptor {
        &self.descriptor
    }

    pub fn categories(&self) -> &[String] {
        &self.descriptor.categories
    }

    /// Category name of a label
    pub fn category_name(&self, label: i64) -> Option<&str> {
        category_name(&self.descriptor.categories, label)
    }

    /// All samples `[N, points, coords]`
    pub fn points(&self) -> ArrayView3<'_, f32> {
        self.samples.view()
    }

    /// All labels `[N]`
    pub fn labels(&self) -> ArrayView1<'_, i64> {
        self.labels.view()
    }

    /// Points per cloud
    pub fn num_points(&self) -> usize {
        self.samples.len_of(Axis(1))
    }

    /// Sample count per label, in label order
    pub fn class_counts(&self) -> BTreeMap<usize, usize> {
        let mut counts = BTreeMap::new();
        for &label in self.labels.iter() {
            *counts.entry(label as usize).or_insert(0) += 1;
        }
        counts
    }
}

impl IndexedDataset for ModelNet40 {
    type Item = (Array2<f32>, i64);

    fn len(&self) -> usize {
        self.labels.len()
    }

    fn get(&self, index: usize) -> Result<Self::Item> {
        let (points, label) = self.raw(index)?;
        Ok(self.transforms.apply(points, label))
    }
}

impl std::fmt::Debug for ModelNet40 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelNet40")
            .field("root", &self.root)
            .field("split", &self.split)
            .field("samples", &self.samples.shape())
            .field("transforms", &self.transforms)
            .finish()
    }
}
