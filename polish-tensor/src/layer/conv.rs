use ndarray::parallel::prelude::*;
use ndarray::{s, Array3, Axis};

use crate::error::ShapeError;
use crate::tensor::Tensor;

/// The output height/width of a convolution with no implicit padding.
pub fn conv_output_size(height: usize, width: usize, kernel_size: usize, stride: usize) -> (usize, usize) {
    let dim_out = |dim: usize| -> usize {
        if dim < kernel_size {
            0
        } else {
            (dim - kernel_size) / stride + 1
        }
    };
    (dim_out(height), dim_out(width))
}

/// A dense 2D convolution. Weights are stored `[out_depth][in_depth][kh][kw]`
/// on construction and re-laid-out once into `(kh, kw, in_depth)` feature
/// tensors so that applying the layer is a plain elementwise-product-and-sum
/// against each input patch, which shares the tensor's own `(y, x, z)`
/// layout.
#[derive(Clone, Debug)]
pub struct Conv {
    in_depth: usize,
    kernel_size: usize,
    stride: usize,
    features: Vec<Array3<f32>>,
}

impl Conv {
    pub fn new(out_depth: usize, in_depth: usize, kernel_size: usize, stride: usize, weights: &[f32]) -> Self {
        debug_assert_eq!(weights.len(), out_depth * in_depth * kernel_size * kernel_size);
        let feature_stride = kernel_size * kernel_size * in_depth;
        let mut features = Vec::with_capacity(out_depth);
        for out in 0..out_depth {
            let block = &weights[out * feature_stride..(out + 1) * feature_stride];
            let mut feature = Array3::zeros((kernel_size, kernel_size, in_depth));
            for y in 0..kernel_size {
                for x in 0..kernel_size {
                    for z in 0..in_depth {
                        feature[[y, x, z]] = block[(y + z * kernel_size) * kernel_size + x];
                    }
                }
            }
            features.push(feature);
        }
        Conv {
            in_depth,
            kernel_size,
            stride,
            features,
        }
    }

    pub fn apply(&self, t: &Tensor) -> Result<Tensor, ShapeError> {
        if t.depth() != self.in_depth {
            return Err(ShapeError::DepthMismatch {
                expected: self.in_depth,
                actual: t.depth(),
            });
        }
        let (out_h, out_w) = conv_output_size(t.height(), t.width(), self.kernel_size, self.stride);
        let out_depth = self.features.len();
        if out_h == 0 || out_w == 0 {
            return Ok(Tensor::new(out_h, out_w, out_depth));
        }
        let mut out = Tensor::new(out_h, out_w, out_depth);
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
                    for (oz, feature) in features.iter().enumerate() {
                        row[[ox, oz]] = (&patch * feature).sum();
                    }
                }
            });
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_size_matches_stride_arithmetic() {
        assert_eq!(conv_output_size(5, 5, 3, 1), (3, 3));
        assert_eq!(conv_output_size(5, 5, 3, 2), (2, 2));
        assert_eq!(conv_output_size(2, 2, 3, 1), (0, 0));
    }

    #[test]
    fn identity_kernel_preserves_input() {
        // A 1x1 conv with an identity weight matrix reproduces the input.
        let mut t = Tensor::new(2, 2, 2);
        *t.at_mut(0, 0, 0) = 1.0;
        *t.at_mut(0, 0, 1) = 2.0;
        *t.at_mut(1, 1, 0) = 3.0;
        *t.at_mut(1, 1, 1) = 4.0;
        // out_depth=2, in_depth=2, kernel=1: weights[out][in]
        let weights = vec![1.0, 0.0, 0.0, 1.0];
        let conv = Conv::new(2, 2, 1, 1, &weights);
        let out = conv.apply(&t).unwrap();
        assert_eq!(out.shape(), (2, 2, 2));
        assert_eq!(out.at(0, 0, 0), 1.0);
        assert_eq!(out.at(0, 0, 1), 2.0);
        assert_eq!(out.at(1, 1, 0), 3.0);
        assert_eq!(out.at(1, 1, 1), 4.0);
    }

    #[test]
    fn kernel_too_large_yields_a_zero_sized_tensor() {
        // Matches the Go original's ConvOutputSize/Apply, which never
        // panics on an oversized kernel and just produces a zero-area
        // output.
        let t = Tensor::new(2, 2, 1);
        let conv = Conv::new(1, 1, 3, 1, &vec![0.0; 9]);
        let out = conv.apply(&t).unwrap();
        assert_eq!(out.shape(), (0, 0, 1));
    }

    #[test]
    fn depth_mismatch_is_an_error() {
        let t = Tensor::new(3, 3, 1);
        let conv = Conv::new(1, 2, 1, 1, &vec![0.0; 2]);
        assert!(matches!(
            conv.apply(&t),
            Err(ShapeError::DepthMismatch { .. })
        ));
    }

    #[test]
    fn patch_sums_match_reference_vectors() {
        // Ported from the upstream Go project's nn/conv_test.go
        // TestPatches: sums of each extracted patch on a 4x3x2 tensor
        // filled with 1..24, for four (kernel, stride) combinations.
        let mut t = Tensor::new(4, 3, 2);
        let mut v = 1.0f32;
        for y in 0..4 {
            for x in 0..3 {
                for z in 0..2 {
                    *t.at_mut(y, x, z) = v;
                    v += 1.0;
                }
            }
        }
        let input = t.as_array();
        let cases: [(usize, usize, &[f32]); 4] = [
            (2, 1, &[44.0, 60.0, 92.0, 108.0, 140.0, 156.0]),
            (2, 2, &[44.0, 140.0]),
            (3, 1, &[171.0, 279.0]),
            (3, 2, &[171.0]),
        ];
        for (kernel, stride, expected) in cases {
            let (out_h, out_w) = conv_output_size(4, 3, kernel, stride);
            let mut actual = Vec::with_capacity(out_h * out_w);
            for oy in 0..out_h {
                let y0 = oy * stride;
                for ox in 0..out_w {
                    let x0 = ox * stride;
                    let patch = input.slice(s![y0..y0 + kernel, x0..x0 + kernel, ..]);
                    actual.push(patch.sum());
                }
            }
            assert_eq!(actual, expected);
        }
    }
}
