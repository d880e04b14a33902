//! Data loading pipeline
//!
//! Shard aggregation, per-item transforms and the indexed dataset view.

pub mod aggregate;
pub mod dataset;
pub mod transform;

pub use aggregate::aggregate;
pub use dataset::{IndexedDataset, Mapped, ModelNet40, ModelNet40Options};
pub use transform::{
    Compose, LabelTransform, NormalizeUnitSphere, PairTransform, PointTransform, TakePoints,
    Transforms,
};
