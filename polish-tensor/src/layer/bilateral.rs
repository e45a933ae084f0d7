use ndarray::s;

use crate::tensor::Tensor;

/// An edge-preserving blur: each output pixel is a weighted average of its
/// `kernel_size x kernel_size` neighborhood, where a neighbor's weight falls
/// off both with spatial distance (`sigma_blur`) and with how much its value
/// differs from the center pixel's (`sigma_diff`). Shape-preserving.
#[derive(Copy, Clone, Debug)]
pub struct Bilateral {
    kernel_size: usize,
    sigma_blur: f64,
    sigma_diff: f64,
}

impl Bilateral {
    pub fn new(kernel_size: usize, sigma_blur: f64, sigma_diff: f64) -> Self {
        Bilateral {
            kernel_size,
            sigma_blur,
            sigma_diff,
        }
    }

    pub fn apply(&self, t: &Tensor) -> Tensor {
        let center = self.kernel_size / 2;
        let mut distances = vec![0.0f64; self.kernel_size * self.kernel_size];
        for i in 0..self.kernel_size {
            for j in 0..self.kernel_size {
                let dy = i as isize - center as isize;
                let dx = j as isize - center as isize;
                distances[i * self.kernel_size + j] = (dy * dy + dx * dx) as f64;
            }
        }

        // Pad with a huge offset so that zero-padded border samples are far
        // enough from any real value that they carry negligible weight, then
        // undo the offset; this avoids a dedicated "ignore padding" branch.
        let padded = t.add_scalar(100.0).pad(center, center, center, center).add_scalar(-100.0);

        let (h, w, d) = t.shape();
        let mut out = Tensor::new(h, w, d);
        let blur_scale = self.sigma_blur * self.sigma_blur;
        let diff_scale = self.sigma_diff * self.sigma_diff;

        for y in 0..h {
            for x in 0..w {
                let patch = padded
                    .as_array()
                    .slice(s![y..y + self.kernel_size, x..x + self.kernel_size, ..]);
                for z in 0..d {
                    let center_val = patch[[center, center, z]] as f64;
                    let mut weighted_sum = 0.0f64;
                    let mut weight_sum = 0.0f64;
                    for i in 0..self.kernel_size {
                        for j in 0..self.kernel_size {
                            let val = patch[[i, j, z]] as f64;
                            let dist = distances[i * self.kernel_size + j];
                            let diff = val - center_val;
                            let weight = (-(dist / blur_scale + diff * diff / diff_scale)).exp();
                            weight_sum += weight;
                            weighted_sum += weight * val;
                        }
                    }
                    *out.at_mut(y, x, z) = (weighted_sum / weight_sum) as f32;
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_input_is_unchanged() {
        let mut t = Tensor::new(4, 4, 1);
        for v in t.as_array_mut().iter_mut() {
            *v = 0.5;
        }
        let out = Bilateral::new(3, 1.0, 1.0).apply(&t);
        for v in out.as_array().iter() {
            assert!((v - 0.5).abs() < 1e-4);
        }
    }

    #[test]
    fn preserves_shape() {
        let t = Tensor::new(5, 7, 2);
        let out = Bilateral::new(3, 2.0, 0.1).apply(&t);
        assert_eq!(out.shape(), (5, 7, 2));
    }

    #[test]
    fn sharp_edge_is_not_blurred_into_by_dissimilar_padding() {
        let mut t = Tensor::new(1, 1, 1);
        *t.at_mut(0, 0, 0) = 1.0;
        // With a tiny sigma_diff, the (zero-ish, far-valued) padding should
        // contribute almost nothing, leaving the single pixel close to 1.0.
        let out = Bilateral::new(3, 5.0, 0.01).apply(&t);
        assert!((out.at(0, 0, 0) - 1.0).abs() < 1e-2);
    }
}
