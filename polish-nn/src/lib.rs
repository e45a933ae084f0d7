//! The model catalog, patched tiling driver, and feature builders that turn
//! [`polish-tensor`](../polish_tensor/index.html)'s primitives into the five
//! shipped denoiser models.

pub mod features;
pub mod model;
pub mod patch;

pub use model::ModelKind;
pub use patch::run_patched;
