//! See [`AnchorError`].

use thiserror::Error;

/// Faults raised while configuring or generating an anchor grid.
///
/// Every variant aborts the whole invocation; no partial output is ever
/// handed back to the caller.
#[derive(Debug, Error)]
pub enum AnchorError {
    #[error("grid must have at least one cell, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },

    #[error("at least one anchor size is required")]
    EmptySizes,

    #[error("at least one anchor ratio is required")]
    EmptyRatios,

    #[error("anchor size at position {index} must be positive, got {value}")]
    NonPositiveSize { index: usize, value: f64 },

    #[error("anchor ratio at position {index} must be positive, got {value}")]
    NonPositiveRatio { index: usize, value: f64 },

    #[error("unable to parse `{input}` as a tuple of floats")]
    InvalidTuple {
        input: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    #[error(
        "a {width}x{height} grid with {sizes} sizes and {ratios} ratios has more elements than fit in memory"
    )]
    LayoutOverflow {
        width: usize,
        height: usize,
        sizes: usize,
        ratios: usize,
    },

    #[error("output buffer holds {actual} elements but the anchor layout needs {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("value {0} cannot be represented in the output element type")]
    Conversion(f64),

    #[error("failed to build the anchor thread pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Type alias for [`Result<T, AnchorError>`].
pub type Result<T> = std::result::Result<T, AnchorError>;
