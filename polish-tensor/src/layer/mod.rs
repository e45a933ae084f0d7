//! The closed set of inference-time layer primitives a loaded model is built
//! from. Unlike the teacher's autograd node graph, which dispatches through
//! a trait object because new node kinds can be registered at runtime, this
//! set is fixed by the model formats in [`crate`]'s weight bundles, so
//! [`Layer`] is a plain tagged enum: no vtable, and `match`es over it are
//! exhaustive, so adding a new kind is a compile error everywhere it needs
//! handling instead of a silent no-op.

pub mod affine;
pub mod bilateral;
pub mod conv;
pub mod deconv;
pub mod group_norm;
pub mod pad;
pub mod relu;
pub mod sequence;
pub mod spatial_conv;

pub use affine::{Bias, Mul};
pub use bilateral::Bilateral;
pub use conv::Conv;
pub use deconv::Deconv;
pub use group_norm::GroupNorm;
pub use pad::{Pad, Unpad};
pub use relu::ReLU;
pub use sequence::{Residual, Sequence};
pub use spatial_conv::SpatialConv;

use crate::error::ShapeError;
use crate::tensor::Tensor;

/// One inference-time operation. Every variant's `apply` takes a borrowed
/// input and returns a freshly allocated output, so a [`Layer`] is stateless
/// once built and freely shareable across worker threads.
#[derive(Clone, Debug)]
pub enum Layer {
    ReLU(ReLU),
    Bias(Bias),
    Mul(Mul),
    Pad(Pad),
    Unpad(Unpad),
    Conv(Conv),
    SpatialConv(SpatialConv),
    Deconv(Deconv),
    GroupNorm(GroupNorm),
    Bilateral(Bilateral),
    Residual(Residual),
    Sequence(Sequence),
}

impl Layer {
    pub fn apply(&self, t: &Tensor) -> Result<Tensor, ShapeError> {
        match self {
            Layer::ReLU(l) => Ok(l.apply(t)),
            Layer::Bias(l) => l.apply(t),
            Layer::Mul(l) => l.apply(t),
            Layer::Pad(l) => Ok(l.apply(t)),
            Layer::Unpad(l) => l.apply(t),
            Layer::Conv(l) => l.apply(t),
            Layer::SpatialConv(l) => l.apply(t),
            Layer::Deconv(l) => l.apply(t),
            Layer::GroupNorm(l) => l.apply(t),
            Layer::Bilateral(l) => Ok(l.apply(t)),
            Layer::Residual(l) => l.apply(t),
            Layer::Sequence(l) => l.apply(t),
        }
    }
}
