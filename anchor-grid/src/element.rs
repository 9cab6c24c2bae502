use std::fmt::Debug;

use num::{Float, NumCast};

use crate::error::{AnchorError, Result};

/// Floating point element the anchor tensor can be written in.
pub trait AnchorFloat: Float + Send + Sync + Debug + 'static {
    /// Converts a grid index into the element type.
    fn from_index(index: usize) -> Result<Self> {
        <Self as NumCast>::from(index).ok_or(AnchorError::Conversion(index as f64))
    }

    /// Converts a configuration value into the element type.
    fn from_param(value: f32) -> Result<Self> {
        <Self as NumCast>::from(value).ok_or(AnchorError::Conversion(<f64 as From<f32>>::from(value)))
    }

    /// Lossy widening used for error reporting and logging.
    fn as_f64(self) -> f64 {
        self.to_f64().unwrap_or(f64::NAN)
    }
}

impl AnchorFloat for f32 {}
impl AnchorFloat for f64 {}
