use crate::error::ShapeError;
use crate::tensor::Tensor;

/// Zero-pads by a fixed `(top, right, bottom, left)` border. Infallible:
/// padding never shrinks an extent below zero.
#[derive(Copy, Clone, Debug, Default)]
pub struct Pad {
    pub top: usize,
    pub right: usize,
    pub bottom: usize,
    pub left: usize,
}

impl Pad {
    pub fn new(top: usize, right: usize, bottom: usize, left: usize) -> Self {
        Pad {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn uniform(border: usize) -> Self {
        Pad::new(border, border, border, border)
    }

    pub fn apply(&self, t: &Tensor) -> Tensor {
        t.pad(self.top, self.right, self.bottom, self.left)
    }
}

/// Crops by a fixed `(top, right, bottom, left)` border, the inverse of
/// [`Pad`] with matching arguments.
#[derive(Copy, Clone, Debug, Default)]
pub struct Unpad {
    pub top: usize,
    pub right: usize,
    pub bottom: usize,
    pub left: usize,
}

impl Unpad {
    pub fn new(top: usize, right: usize, bottom: usize, left: usize) -> Self {
        Unpad {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn apply(&self, t: &Tensor) -> Result<Tensor, ShapeError> {
        t.unpad(self.top, self.right, self.bottom, self.left)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pad_then_unpad_recovers_original() {
        let mut t = Tensor::new(2, 2, 1);
        *t.at_mut(0, 0, 0) = 1.0;
        *t.at_mut(1, 1, 0) = 2.0;
        let padded = Pad::uniform(3).apply(&t);
        assert_eq!(padded.shape(), (8, 8, 1));
        let back = Unpad::new(3, 3, 3, 3).apply(&padded).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn unpad_too_large_is_an_error() {
        let t = Tensor::new(2, 2, 1);
        assert!(matches!(
            Unpad::new(5, 0, 0, 0).apply(&t),
            Err(ShapeError::UnpadTooLarge { .. })
        ));
    }
}
