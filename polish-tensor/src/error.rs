use thiserror::Error;

/// Errors raised when a tensor's shape does not satisfy a layer's static
/// contract: a mismatched channel count, a negative or over-large pad, a
/// group count that does not divide the depth, or a residual branch that
/// changed shape.
#[derive(Debug, Error)]
pub enum ShapeError {
    #[error("expected input depth {expected}, got {actual}")]
    DepthMismatch { expected: usize, actual: usize },

    #[error("unpad({top}, {right}, {bottom}, {left}) exceeds tensor extents ({height}, {width})")]
    UnpadTooLarge {
        top: usize,
        right: usize,
        bottom: usize,
        left: usize,
        height: usize,
        width: usize,
    },

    #[error("residual connection changed shape: input ({ih}, {iw}, {id}) vs output ({oh}, {ow}, {od})")]
    ResidualShapeChanged {
        ih: usize,
        iw: usize,
        id: usize,
        oh: usize,
        ow: usize,
        od: usize,
    },

    #[error("group count {groups} does not divide depth {depth}")]
    GroupsDoNotDivideDepth { groups: usize, depth: usize },
}

/// Errors raised while loading or assembling a pretrained model's weights:
/// a corrupt ZIP container, a truncated entry, or a parameter whose shape
/// does not match what the layer that consumes it declares.
#[derive(Debug, Error)]
pub enum WeightError {
    #[error("malformed weight bundle: {0}")]
    MalformedZip(#[from] zip::result::ZipError),

    #[error("weight entry {key:?} has length {len} bytes, not a multiple of 4")]
    TruncatedEntry { key: String, len: usize },

    #[error("missing required weight key {0:?}")]
    MissingKey(String),

    #[error("weight key {key:?} has {actual} values, expected {expected}")]
    WrongLength {
        key: String,
        expected: usize,
        actual: usize,
    },

    #[error("failed to read weight entry {key:?}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
}
