use ndarray::Zip;

use crate::error::ShapeError;
use crate::tensor::Tensor;

/// Group normalization's per-channel-group standardization step (no learned
/// affine; the loader wraps this with a [`super::affine::Bias`] /
/// [`super::affine::Mul`] pair when a residual block carries one).
///
/// Channels are split into `num_groups` contiguous runs of `depth /
/// num_groups` channels each; every group is standardized independently
/// using its own mean and variance taken over the whole spatial extent.
#[derive(Copy, Clone, Debug)]
pub struct GroupNorm {
    num_groups: usize,
}

impl GroupNorm {
    pub fn new(num_groups: usize) -> Self {
        GroupNorm { num_groups }
    }

    pub fn apply(&self, t: &Tensor) -> Result<Tensor, ShapeError> {
        let depth = t.depth();
        if depth % self.num_groups != 0 {
            return Err(ShapeError::GroupsDoNotDivideDepth {
                groups: self.num_groups,
                depth,
            });
        }
        let group_size = depth / self.num_groups;
        let mut sums = vec![0.0f64; self.num_groups];
        let mut sq_sums = vec![0.0f64; self.num_groups];
        for z in 0..depth {
            let group = z / group_size;
            for v in t.as_array().index_axis(ndarray::Axis(2), z).iter() {
                let v = *v as f64;
                sums[group] += v;
                sq_sums[group] += v * v;
            }
        }

        let normalize = 1.0 / (t.height() * t.width() * group_size) as f64;
        let mut biases = vec![0.0f64; self.num_groups];
        let mut scales = vec![0.0f64; self.num_groups];
        for g in 0..self.num_groups {
            let bias = -sums[g] * normalize;
            let variance = (sq_sums[g] * normalize - bias * bias).max(0.0);
            biases[g] = bias;
            scales[g] = 1.0 / (variance + 1e-5).sqrt();
        }

        let mut out = t.clone();
        Zip::indexed(out.as_array_mut()).for_each(|(_, _, z), v| {
            let group = z / group_size;
            *v = ((*v as f64 + biases[group]) * scales[group]) as f32;
        });
        Ok(out)
    }
}
