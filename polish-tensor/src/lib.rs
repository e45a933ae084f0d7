//! Tensor representation, inference-time layer primitives, and the weight
//! bundle loader that [`polish-nn`](../polish_nn/index.html) assembles into
//! full denoiser models.

pub mod error;
pub mod image_bridge;
pub mod layer;
pub mod tensor;
pub mod weights;

pub use error::{ShapeError, WeightError};
pub use layer::Layer;
pub use tensor::Tensor;
pub use weights::WeightMap;
