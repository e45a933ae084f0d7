use ndarray::parallel::prelude::*;
use ndarray::{s, Array2, Axis};

use crate::error::ShapeError;
use crate::layer::conv::conv_output_size;
use crate::tensor::Tensor;

/// A depthwise convolution: one `(kh, kw)` spatial filter per channel, with
/// no mixing across channels. Used as the first stage of the depthwise-
/// separable blocks in the `Deep`/`DeepAux` models.
#[derive(Clone, Debug)]
pub struct SpatialConv {
    depth: usize,
    kernel_size: usize,
    stride: usize,
    features: Vec<Array2<f32>>,
}

impl SpatialConv {
    pub fn new(depth: usize, kernel_size: usize, stride: usize, weights: &[f32]) -> Self {
        debug_assert_eq!(weights.len(), depth * kernel_size * kernel_size);
        let feature_stride = kernel_size * kernel_size;
        let mut features = Vec::with_capacity(depth);
        for d in 0..depth {
            let block = &weights[d * feature_stride..(d + 1) * feature_stride];
            let feature = Array2::from_shape_vec((kernel_size, kernel_size), block.to_vec()).unwrap();
            features.push(feature);
        }
        SpatialConv {
            depth,
            kernel_size,
            stride,
            features,
        }
    }

    pub fn apply(&self, t: &Tensor) -> Result<Tensor, ShapeError> {
        if t.depth() != self.depth {
            return Err(ShapeError::DepthMismatch {
                expected: self.depth,
                actual: t.depth(),
            });
        }
        let (out_h, out_w) = conv_output_size(t.height(), t.width(), self.kernel_size, self.stride);
        if out_h == 0 || out_w == 0 {
            return Ok(Tensor::new(out_h, out_w, self.depth));
        }
        let mut out = Tensor::new(out_h, out_w, self.depth);
        let input = t.as_array();
        let stride = self.stride;
        let kernel_size = self.kernel_size;
        let features = &self.features;

        out.as_array_mut()
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(|(oy, mut row)| {
                let y0 = oy * stride;
                for ox in 0..out_w {
                    let x0 = ox * stride;
                    let patch = input.slice(s![y0..y0 + kernel_size, x0..x0 + kernel_size, ..]);
                    for (z, feature) in features.iter().enumerate() {
                        let channel = patch.slice(s![.., .., z]);
                        row[[ox, z]] = (&channel * feature).sum();
                    }
                }
            });
        Ok(out)
    }
}
