use ndarray::{s, Array3};

use crate::error::ShapeError;

/// A dense `(height, width, depth)` array of `f32` samples.
///
/// Backed by `ndarray::Array3` in standard (row-major, last-axis-fastest)
/// layout, which places element `(y, x, z)` at offset `z + depth*(x +
/// width*y)` — exactly the layout every layer in this crate assumes.
/// Every operation returns a freshly allocated `Tensor`; inputs are never
/// mutated in place.
#[derive(Clone, Debug, PartialEq)]
pub struct Tensor {
    data: Array3<f32>,
}

impl Tensor {
    /// A zero-filled tensor of the given extents.
    pub fn new(height: usize, width: usize, depth: usize) -> Self {
        Tensor {
            data: Array3::zeros((height, width, depth)),
        }
    }

    /// Wraps an existing array without copying. The array's shape becomes
    /// the tensor's `(height, width, depth)`.
    pub fn from_array(data: Array3<f32>) -> Self {
        Tensor { data }
    }

    pub fn height(&self) -> usize {
        self.data.shape()[0]
    }

    pub fn width(&self) -> usize {
        self.data.shape()[1]
    }

    pub fn depth(&self) -> usize {
        self.data.shape()[2]
    }

    pub fn shape(&self) -> (usize, usize, usize) {
        (self.height(), self.width(), self.depth())
    }

    pub fn as_array(&self) -> &Array3<f32> {
        &self.data
    }

    pub fn as_array_mut(&mut self) -> &mut Array3<f32> {
        &mut self.data
    }

    pub fn into_array(self) -> Array3<f32> {
        self.data
    }

    /// Reads the sample at `(y, x, z)`. Bounds are not checked in release
    /// builds; callers guarantee `y < height`, `x < width`, `z < depth`.
    #[inline]
    pub fn at(&self, y: usize, x: usize, z: usize) -> f32 {
        debug_assert!(y < self.height() && x < self.width() && z < self.depth());
        self.data[[y, x, z]]
    }

    #[inline]
    pub fn at_mut(&mut self, y: usize, x: usize, z: usize) -> &mut f32 {
        debug_assert!(y < self.height() && x < self.width() && z < self.depth());
        &mut self.data[[y, x, z]]
    }

    /// A contiguous view of the whole buffer in `(y, x, z)` order, when the
    /// backing array is in standard layout (always true for tensors
    /// produced by this crate).
    pub fn as_slice(&self) -> Option<&[f32]> {
        self.data.as_slice()
    }

    /// Zero-pads the tensor; depth is unchanged. Result shape is
    /// `(height+top+bottom, width+left+right, depth)`.
    pub fn pad(&self, top: usize, right: usize, bottom: usize, left: usize) -> Tensor {
        if top == 0 && right == 0 && bottom == 0 && left == 0 {
            return self.clone();
        }
        let (h, w, d) = self.shape();
        let mut out = Tensor::new(h + top + bottom, w + left + right, d);
        out.data
            .slice_mut(s![top..top + h, left..left + w, ..])
            .assign(&self.data);
        out
    }

    /// Crops the tensor, inverting `pad` with the same arguments.
    pub fn unpad(
        &self,
        top: usize,
        right: usize,
        bottom: usize,
        left: usize,
    ) -> Result<Tensor, ShapeError> {
        let (h, w, _d) = self.shape();
        if top + bottom > h || left + right > w {
            return Err(ShapeError::UnpadTooLarge {
                top,
                right,
                bottom,
                left,
                height: h,
                width: w,
            });
        }
        let new_h = h - top - bottom;
        let new_w = w - left - right;
        let cropped = self
            .data
            .slice(s![top..top + new_h, left..left + new_w, ..])
            .to_owned();
        Ok(Tensor::from_array(cropped))
    }

    /// `out[i] = in[i] + c`, used by the bilateral layer's padding trick.
    pub fn add_scalar(&self, c: f32) -> Tensor {
        Tensor::from_array(&self.data + c)
    }

    /// `out[i] = in[i] * c`.
    pub fn scale(&self, c: f32) -> Tensor {
        Tensor::from_array(&self.data * c)
    }

    /// Elementwise sum, failing if the shapes differ. Used by `Residual`.
    pub fn add(&self, other: &Tensor) -> Result<Tensor, ShapeError> {
        if self.shape() != other.shape() {
            let (ih, iw, id) = self.shape();
            let (oh, ow, od) = other.shape();
            return Err(ShapeError::ResidualShapeChanged {
                ih,
                iw,
                id,
                oh,
                ow,
                od,
            });
        }
        Ok(Tensor::from_array(&self.data + &other.data))
    }
}

#[cfg(test)]
mod tests;
