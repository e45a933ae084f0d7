use ndarray::Zip;

use crate::tensor::Tensor;

/// Rectified linear unit: `out[i] = max(0, in[i])`. Shape preserved, and
/// this is the one layer kind that cannot fail.
#[derive(Copy, Clone, Debug, Default)]
pub struct ReLU;

impl ReLU {
    pub fn apply(&self, t: &Tensor) -> Tensor {
        let mut out = Tensor::new(t.height(), t.width(), t.depth());
        Zip::from(out.as_array_mut())
            .and(t.as_array())
            .for_each(|o, &i| *o = i.max(0.0));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_negatives_to_zero() {
        let mut t = Tensor::new(1, 2, 1);
        *t.at_mut(0, 0, 0) = -3.0;
        *t.at_mut(0, 1, 0) = 2.5;
        let out = ReLU.apply(&t);
        assert_eq!(out.at(0, 0, 0), 0.0);
        assert_eq!(out.at(0, 1, 0), 2.5);
    }
}
