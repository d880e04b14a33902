//! Dataset catalog
//!
//! Split layout, shard checksums and category names.

pub mod categories;
pub mod descriptor;

pub use categories::{category_name, modelnet40_categories, MODELNET40_CATEGORIES};
pub use descriptor::{DatasetDescriptor, ShardEntry, Split};
