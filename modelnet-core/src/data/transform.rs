//! Transforms applied to each retrieved (points, label) pair

use ndarray::{s, Array2, Axis};

/// A transform over one point cloud `[points, coords]`
pub trait PointTransform: Send + Sync {
    fn apply(&self, points: Array2<f32>) -> Array2<f32>;
}

/// A transform over one class label
pub trait LabelTransform: Send + Sync {
    fn apply(&self, label: i64) -> i64;
}

/// A transform over the whole pair
pub trait PairTransform: Send + Sync {
    fn apply(&self, points: Array2<f32>, label: i64) -> (Array2<f32>, i64);
}

impl<F> PointTransform for F
where
    F: Fn(Array2<f32>) -> Array2<f32> + Send + Sync,
{
    fn apply(&self, points: Array2<f32>) -> Array2<f32> {
        self(points)
    }
}

impl<F> LabelTransform for F
where
    F: Fn(i64) -> i64 + Send + Sync,
{
    fn apply(&self, label: i64) -> i64 {
        self(label)
    }
}

impl<F> PairTransform for F
where
    F: Fn(Array2<f32>, i64) -> (Array2<f32>, i64) + Send + Sync,
{
    fn apply(&self, points: Array2<f32>, label: i64) -> (Array2<f32>, i64) {
        self(points, label)
    }
}

/// The transform configuration of a dataset.
///
/// A joint transform replaces the separate point/label transforms entirely.
#[derive(Default)]
pub enum Transforms {
    #[default]
    Identity,
    Separate {
        transform: Option<Box<dyn PointTransform>>,
        target_transform: Option<Box<dyn LabelTransform>>,
    },
    Joint(Box<dyn PairTransform>),
}

impl Transforms {
    /// Resolve the three optional inputs; `joint` wins when present
    pub fn resolve(
        transform: Option<Box<dyn PointTransform>>,
        target_transform: Option<Box<dyn LabelTransform>>,
        joint: Option<Box<dyn PairTransform>>,
    ) -> Self {
        match (joint, transform, target_transform) {
            (Some(joint), _, _) => Transforms::Joint(joint),
            (None, None, None) => Transforms::Identity,
            (None, transform, target_transform) => Transforms::Separate {
                transform,
                target_transform,
            },
        }
    }

    pub fn apply(&self, points: Array2<f32>, label: i64) -> (Array2<f32>, i64) {
        match self {
            Transforms::Identity => (points, label),
            Transforms::Separate {
                transform,
                target_transform,
            } => {
                let points = match transform {
                    Some(t) => t.apply(points),
                    None => points,
                };
                let label = match target_transform {
                    Some(t) => t.apply(label),
                    None => label,
                };
                (points, label)
            }
            Transforms::Joint(t) => t.apply(points, label),
        }
    }

    pub fn is_identity(&self) -> bool {
        matches!(self, Transforms::Identity)
    }
}

impl std::fmt::Debug for Transforms {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Transforms::Identity => f.write_str("Identity"),
            Transforms::Separate {
                transform,
                target_transform,
            } => f
                .debug_struct("Separate")
                .field("transform", &transform.is_some())
                .field("target_transform", &target_transform.is_some())
                .finish(),
            Transforms::Joint(_) => f.write_str("Joint"),
        }
    }
}

// Built-in point transforms

/// Center on the centroid and scale so the farthest point lies on the unit sphere.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizeUnitSphere;

impl PointTransform for NormalizeUnitSphere {
    fn apply(&self, mut points: Array2<f32>) -> Array2<f32> {
        let Some(centroid) = points.mean_axis(Axis(0)) else {
            return points;
        };
        points -= &centroid;
        let radius = points
            .rows()
            .into_iter()
            .map(|row| row.dot(&row).sqrt())
            .fold(0.0f32, f32::max);
        if radius > 0.0 {
            points /= radius;
        }
        points
    }
}

/// Keep the first `n` points of each cloud.
#[derive(Debug, Clone, Copy)]
pub struct TakePoints(pub usize);

impl PointTransform for TakePoints {
    fn apply(&self, points: Array2<f32>) -> Array2<f32> {
        let n = self.0.min(points.nrows());
        points.slice(s![..n, ..]).to_owned()
    }
}

/// Chain point transforms.
pub struct Compose {
    transforms: Vec<Box<dyn PointTransform>>,
}

impl Compose {
    pub fn new(transforms: Vec<Box<dyn PointTransform>>) -> Self {
        Self { transforms }
    }
}

impl PointTransform for Compose {
    fn apply(&self, mut points: Array2<f32>) -> Array2<f32> {
        for t in &self.transforms {
            points = t.apply(points);
        }
        points
    }
}
