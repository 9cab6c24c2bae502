//! Corner coordinates of the anchors around each cell center.

use crate::centers::CellCenters;
use crate::element::AnchorFloat;
use crate::layout::Corner;

/// Half extents of the anchor for one (size, ratio) pair.
///
/// The ratio is applied as `sqrt(ratio)` to the width and its reciprocal to the
/// height, so `width / height == ratio` while the area stays `size^2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorShape<F> {
    w_half: F,
    h_half: F,
}

impl<F: AnchorFloat> AnchorShape<F> {
    /// `sqrt_ratio` must already be the square root of the aspect ratio.
    pub fn new(size: F, sqrt_ratio: F) -> Self {
        let two = F::one() + F::one();
        Self {
            w_half: size * sqrt_ratio / two,
            h_half: size / sqrt_ratio / two,
        }
    }

    pub fn from_ratio(size: F, ratio: F) -> Self {
        Self::new(size, ratio.sqrt())
    }

    pub fn width(&self) -> F {
        self.w_half + self.w_half
    }

    pub fn height(&self) -> F {
        self.h_half + self.h_half
    }

    /// One coordinate of the anchor centered at `(cx, cy)`.
    #[inline]
    pub fn corner(&self, cx: F, cy: F, corner: Corner) -> F {
        match corner {
            Corner::XMin => cx - self.w_half,
            Corner::YMin => cy - self.h_half,
            Corner::XMax => cx + self.w_half,
            Corner::YMax => cy + self.h_half,
        }
    }

    /// `[xmin, ymin, xmax, ymax]` of the anchor centered at `(cx, cy)`.
    ///
    /// Coordinates are not clipped to the unit square.
    pub fn anchor(&self, cx: F, cy: F) -> [F; 4] {
        Corner::ALL.map(|corner| self.corner(cx, cy, corner))
    }

    /// The anchor of the cell at flat index `index`, `None` outside the grid.
    pub fn anchor_at(&self, centers: &CellCenters<F>, index: usize) -> Option<[F; 4]> {
        centers.at(index).map(|(cx, cy)| self.anchor(cx, cy))
    }
}
