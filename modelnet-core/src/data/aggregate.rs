//! Shard aggregation
//!
//! Concatenates per-shard arrays into one sample array and one label array.
//! Shard order, then intra-shard order, defines the global index.

use ndarray::{concatenate, Array1, Array3, ArrayD, ArrayView1, ArrayView3, Axis, Ix1, Ix3};

use crate::error::{ModelNetError, Result};
use crate::shard::ShardArrays;

/// Concatenate shards into `(samples [N, points, coords], labels [N])`
pub fn aggregate(shards: &[ShardArrays]) -> Result<(Array3<f32>, Array1<i64>)> {
    let mut point_views: Vec<ArrayView3<f32>> = Vec::with_capacity(shards.len());
    let mut labels: Vec<Array1<i64>> = Vec::with_capacity(shards.len());

    for (idx, shard) in shards.iter().enumerate() {
        let points = shard
            .points
            .view()
            .into_dimensionality::<Ix3>()
            .map_err(|_| ModelNetError::ShapeMismatch {
                reason: format!(
                    "shard {} points have shape {:?}, expected [samples, points, coords]",
                    idx,
                    shard.points.shape()
                ),
            })?;

        if let Some(first) = point_views.first() {
            if first.shape()[1..] != points.shape()[1..] {
                return Err(ModelNetError::ShapeMismatch {
                    reason: format!(
                        "shard {} samples are {:?}, shard 0 samples are {:?}",
                        idx,
                        &points.shape()[1..],
                        &first.shape()[1..]
                    ),
                });
            }
        }

        let shard_labels = squeeze_labels(shard.labels.to_i64(), idx)?;
        if shard_labels.len() != points.len_of(Axis(0)) {
            return Err(ModelNetError::LengthMismatch {
                samples: points.len_of(Axis(0)),
                labels: shard_labels.len(),
            });
        }

        point_views.push(points);
        labels.push(shard_labels);
    }

    if point_views.is_empty() {
        return Ok((Array3::zeros((0, 0, 0)), Array1::zeros(0)));
    }

    let samples = concatenate(Axis(0), &point_views).map_err(|e| ModelNetError::ShapeMismatch {
        reason: e.to_string(),
    })?;
    let label_views: Vec<ArrayView1<i64>> = labels.iter().map(|l| l.view()).collect();
    let labels = concatenate(Axis(0), &label_views).map_err(|e| ModelNetError::ShapeMismatch {
        reason: e.to_string(),
    })?;

    if samples.len_of(Axis(0)) != labels.len() {
        return Err(ModelNetError::LengthMismatch {
            samples: samples.len_of(Axis(0)),
            labels: labels.len(),
        });
    }

    Ok((samples, labels))
}

/// Collapse trailing singleton axes; axis 0 is always kept
fn squeeze_labels(mut labels: ArrayD<i64>, shard: usize) -> Result<Array1<i64>> {
    while labels.ndim() > 1 && labels.shape()[labels.ndim() - 1] == 1 {
        let last = Axis(labels.ndim() - 1);
        labels = labels.index_axis_move(last, 0);
    }
    let shape = labels.shape().to_vec();
    labels
        .into_dimensionality::<Ix1>()
        .map_err(|_| ModelNetError::ShapeMismatch {
            reason: format!("shard {} labels have shape {:?}, expected [samples] or [samples, 1]", shard, shape),
        })
}
