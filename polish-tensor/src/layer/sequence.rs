use crate::error::ShapeError;
use crate::tensor::Tensor;

use super::Layer;

/// Applies a fixed list of layers in order, threading the output of each
/// into the next.
#[derive(Clone, Debug)]
pub struct Sequence {
    layers: Vec<Layer>,
}

impl Sequence {
    pub fn new(layers: Vec<Layer>) -> Self {
        Sequence { layers }
    }

    pub fn apply(&self, t: &Tensor) -> Result<Tensor, ShapeError> {
        let mut current = t.clone();
        for layer in &self.layers {
            current = layer.apply(&current)?;
        }
        Ok(current)
    }
}

/// Wraps a layer and adds its input back onto its output, failing if the
/// wrapped layer changed the tensor's shape.
#[derive(Clone, Debug)]
pub struct Residual {
    inner: Box<Layer>,
}

impl Residual {
    pub fn new(inner: Layer) -> Self {
        Residual {
            inner: Box::new(inner),
        }
    }

    pub fn apply(&self, t: &Tensor) -> Result<Tensor, ShapeError> {
        let branch = self.inner.apply(t)?;
        branch.add(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::relu::ReLU;

    #[test]
    fn sequence_chains_layers_in_order() {
        let mut t = Tensor::new(1, 1, 1);
        *t.at_mut(0, 0, 0) = -3.0;
        let seq = Sequence::new(vec![Layer::ReLU(ReLU)]);
        let out = seq.apply(&t).unwrap();
        assert_eq!(out.at(0, 0, 0), 0.0);
    }

    #[test]
    fn residual_adds_input_back_to_branch_output() {
        let mut t = Tensor::new(1, 1, 1);
        *t.at_mut(0, 0, 0) = 2.0;
        let residual = Residual::new(Layer::ReLU(ReLU));
        let out = residual.apply(&t).unwrap();
        assert_eq!(out.at(0, 0, 0), 4.0);
    }

    #[test]
    fn residual_on_negative_input_still_adds_branch() {
        let mut t = Tensor::new(1, 1, 1);
        *t.at_mut(0, 0, 0) = -2.0;
        let residual = Residual::new(Layer::ReLU(ReLU));
        let out = residual.apply(&t).unwrap();
        // ReLU(-2) = 0, plus the original -2.
        assert_eq!(out.at(0, 0, 0), -2.0);
    }
}
