//! Operator parameters: parsing, validation, shape inference and allocation.

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::element::AnchorFloat;
use crate::error::{AnchorError, Result};
use crate::generate::{generate_grid_anchors_with, GenerateOptions, DEFAULT_BATCH_WIDTH};
use crate::layout::{AnchorLayout, Grid};
use crate::map::AnchorMap;

/// An ordered list of floats.
///
/// Deserializes from either a list (`[0.5, 1.0]`) or a tuple string
/// (`"(0.5, 1.0)"`), the form used by operator parameter dictionaries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TupleRepr", into = "Vec<f32>")]
pub struct FloatTuple(Vec<f32>);

#[derive(Deserialize)]
#[serde(untagged)]
enum TupleRepr {
    List(Vec<f32>),
    Text(String),
}

impl TryFrom<TupleRepr> for FloatTuple {
    type Error = AnchorError;

    fn try_from(value: TupleRepr) -> Result<Self> {
        match value {
            TupleRepr::List(values) => Ok(Self(values)),
            TupleRepr::Text(text) => text.parse(),
        }
    }
}

impl From<FloatTuple> for Vec<f32> {
    fn from(value: FloatTuple) -> Self {
        value.0
    }
}

impl From<Vec<f32>> for FloatTuple {
    fn from(value: Vec<f32>) -> Self {
        Self(value)
    }
}

impl Deref for FloatTuple {
    type Target = [f32];

    fn deref(&self) -> &[f32] {
        &self.0
    }
}

impl FromStr for FloatTuple {
    type Err = AnchorError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let inner = trimmed
            .strip_prefix('(')
            .and_then(|t| t.strip_suffix(')'))
            .or_else(|| trimmed.strip_prefix('[').and_then(|t| t.strip_suffix(']')))
            .unwrap_or(trimmed);

        inner
            .split(',')
            .map(str::trim)
            // A trailing comma as in `(0.5,)` leaves an empty piece
            .filter(|piece| !piece.is_empty())
            .map(|piece| {
                piece.parse::<f32>().map_err(|source| AnchorError::InvalidTuple {
                    input: s.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()
            .map(Self)
    }
}

impl fmt::Display for FloatTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (index, value) in self.0.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{value}")?;
        }
        write!(f, ")")
    }
}

/// Parameters of one anchor generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorParams {
    /// Feature map width in cells.
    pub width: usize,
    /// Feature map height in cells.
    pub height: usize,
    /// Anchor sizes relative to the image, e.g. `(0.2, 0.4)`.
    pub sizes: FloatTuple,
    /// Anchor width to height ratios, e.g. `(1, 2, 0.5)`.
    pub ratios: FloatTuple,
    pub batch_width: usize,
    pub threads: Option<usize>,
}

impl Default for AnchorParams {
    fn default() -> Self {
        Self {
            width: 1,
            height: 1,
            sizes: vec![1.0].into(),
            ratios: vec![1.0].into(),
            batch_width: DEFAULT_BATCH_WIDTH,
            threads: None,
        }
    }
}

impl AnchorParams {
    pub fn grid(&self) -> Grid {
        Grid::new(self.width, self.height)
    }

    pub fn layout(&self) -> AnchorLayout {
        AnchorLayout::new(self.grid(), self.sizes.len(), self.ratios.len())
    }

    /// `[channels, height, width]` of the tensor these parameters produce.
    pub fn output_shape(&self) -> [usize; 3] {
        self.layout().shape()
    }

    pub fn options(&self) -> GenerateOptions {
        GenerateOptions {
            batch_width: self.batch_width,
            threads: self.threads,
        }
    }

    /// Rejects empty grids and empty or non-positive sizes and ratios.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(AnchorError::EmptyGrid {
                width: self.width,
                height: self.height,
            });
        }
        self.layout().try_len()?;
        if self.sizes.is_empty() {
            return Err(AnchorError::EmptySizes);
        }
        if self.ratios.is_empty() {
            return Err(AnchorError::EmptyRatios);
        }
        // `!(v > 0.)` also catches NaN
        if let Some((index, &value)) = self.sizes.iter().enumerate().find(|(_, &v)| !(v > 0.)) {
            return Err(AnchorError::NonPositiveSize {
                index,
                value: value.into(),
            });
        }
        if let Some((index, &value)) = self.ratios.iter().enumerate().find(|(_, &v)| !(v > 0.)) {
            return Err(AnchorError::NonPositiveRatio {
                index,
                value: value.into(),
            });
        }
        Ok(())
    }

    /// A zeroed buffer with exactly the element count of [`Self::layout`].
    pub fn allocate<F: AnchorFloat>(&self) -> Result<Vec<F>> {
        Ok(vec![F::zero(); self.layout().try_len()?])
    }

    /// Validates the parameters, allocates the output and fills it.
    #[tracing::instrument(
        name = "Generating grid anchors",
        skip(self),
        fields(width = self.width, height = self.height, sizes = %self.sizes, ratios = %self.ratios)
    )]
    pub fn generate<F: AnchorFloat>(&self) -> Result<AnchorMap<F>> {
        self.validate()?;
        let sizes = convert::<F>(&self.sizes)?;
        let ratios = convert::<F>(&self.ratios)?;
        let mut data = self.allocate::<F>()?;
        generate_grid_anchors_with(&mut data, self.grid(), &sizes, &ratios, &self.options())?;
        tracing::info!(shape = ?self.output_shape(), "generated anchors");
        AnchorMap::from_vec(self.layout(), data)
    }
}

fn convert<F: AnchorFloat>(values: &[f32]) -> Result<Vec<F>> {
    values.iter().map(|&value| F::from_param(value)).collect()
}
