use ndarray::Axis;

use crate::error::ShapeError;
use crate::tensor::Tensor;

/// Adds a per-channel constant: `out[y,x,z] = in[y,x,z] + bias[z]`.
#[derive(Clone, Debug)]
pub struct Bias {
    data: Vec<f32>,
}

impl Bias {
    pub fn new(data: Vec<f32>) -> Self {
        Bias { data }
    }

    pub fn apply(&self, t: &Tensor) -> Result<Tensor, ShapeError> {
        if self.data.len() != t.depth() {
            return Err(ShapeError::DepthMismatch {
                expected: self.data.len(),
                actual: t.depth(),
            });
        }
        let mut out = t.clone();
        out.as_array_mut()
            .lanes_mut(Axis(2))
            .into_iter()
            .for_each(|mut lane| {
                for (z, v) in lane.iter_mut().enumerate() {
                    *v += self.data[z];
                }
            });
        Ok(out)
    }
}

/// Multiplies a per-channel mask: `out[y,x,z] = in[y,x,z] * mul[z]`.
#[derive(Clone, Debug)]
pub struct Mul {
    data: Vec<f32>,
}

impl Mul {
    pub fn new(data: Vec<f32>) -> Self {
        Mul { data }
    }

    pub fn apply(&self, t: &Tensor) -> Result<Tensor, ShapeError> {
        if self.data.len() != t.depth() {
            return Err(ShapeError::DepthMismatch {
                expected: self.data.len(),
                actual: t.depth(),
            });
        }
        let mut out = t.clone();
        out.as_array_mut()
            .lanes_mut(Axis(2))
            .into_iter()
            .for_each(|mut lane| {
                for (z, v) in lane.iter_mut().enumerate() {
                    *v *= self.data[z];
                }
            });
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bias_adds_per_channel() {
        let mut t = Tensor::new(1, 1, 2);
        *t.at_mut(0, 0, 0) = 1.0;
        *t.at_mut(0, 0, 1) = 2.0;
        let out = Bias::new(vec![10.0, -1.0]).apply(&t).unwrap();
        assert_eq!(out.at(0, 0, 0), 11.0);
        assert_eq!(out.at(0, 0, 1), 1.0);
    }

    #[test]
    fn mul_multiplies_per_channel() {
        let mut t = Tensor::new(1, 1, 2);
        *t.at_mut(0, 0, 0) = 3.0;
        *t.at_mut(0, 0, 1) = 4.0;
        let out = Mul::new(vec![2.0, 0.5]).apply(&t).unwrap();
        assert_eq!(out.at(0, 0, 0), 6.0);
        assert_eq!(out.at(0, 0, 1), 2.0);
    }

    #[test]
    fn depth_mismatch_is_a_shape_error() {
        let t = Tensor::new(1, 1, 3);
        assert!(matches!(
            Bias::new(vec![1.0, 2.0]).apply(&t),
            Err(ShapeError::DepthMismatch { .. })
        ));
    }
}
