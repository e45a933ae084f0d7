use std::path::PathBuf;

use thiserror::Error;

use polish_tensor::error::{ShapeError, WeightError};

/// Image codec failures at the CLI boundary (covers missing files too: the
/// `image` crate surfaces a nonexistent path as a decode-time `ImageError`).
#[derive(Debug, Error)]
pub enum IOError {
    #[error("could not decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("could not encode image {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Invalid CLI invocations: unknown model name, an aux model missing its
/// aux inputs, or a nonsensical patch border.
#[derive(Debug, Error)]
pub enum UsageError {
    #[error("unknown model {0:?}, expected one of bilateral, shallow, deep, shallow-aux, deep-aux")]
    UnknownModel(String),

    #[error("model {model} requires -albedo and -incidence")]
    MissingAuxInputs { model: String },

    #[error("-patch-border must be -1 (default) or a non-negative integer, got {0}")]
    InvalidPatchBorder(i64),
}

/// The union of every error this binary can produce, so `main` can
/// propagate with `?` and match once at the top for the process exit code.
#[derive(Debug, Error)]
pub enum PolishError {
    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error(transparent)]
    Weight(#[from] WeightError),

    #[error(transparent)]
    Io(#[from] IOError),

    #[error(transparent)]
    Usage(#[from] UsageError),
}
