//! Addressing scheme of the anchor tensor.
//
// The tensor is `[channels, H, W]`. The first two channels hold the cell
// centers, followed by one block of four corner channels per (size, ratio)
// pair, sizes outer and ratios inner. Every offset is computed from the
// channel index rather than accumulated, so any plane can be written
// independently of the others.

use serde::{Deserialize, Serialize};

use crate::error::{AnchorError, Result};

/// A `width x height` partition of the normalized unit square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Number of cells in the grid.
    pub fn cells(&self) -> usize {
        self.width * self.height
    }

    /// Number of cells, `None` when it overflows `usize`.
    pub fn checked_cells(&self) -> Option<usize> {
        self.width.checked_mul(self.height)
    }

    /// Flat index of the cell at `row`, `col`.
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    /// The `(row, col)` of a flat cell index, `None` when it lies outside the grid.
    pub fn cell(&self, index: usize) -> Option<(usize, usize)> {
        let inside = self.checked_cells().map_or(true, |cells| index < cells);
        (inside && self.width > 0).then(|| (index / self.width, index % self.width))
    }

    pub(crate) fn ensure_non_empty(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(AnchorError::EmptyGrid {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// One of the four coordinates stored for every anchor, in storage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    XMin,
    YMin,
    XMax,
    YMax,
}

impl Corner {
    pub const ALL: [Corner; 4] = [Corner::XMin, Corner::YMin, Corner::XMax, Corner::YMax];

    /// Position of this coordinate within its four channel block.
    pub fn offset(self) -> usize {
        match self {
            Corner::XMin => 0,
            Corner::YMin => 1,
            Corner::XMax => 2,
            Corner::YMax => 3,
        }
    }
}

/// What a channel of the anchor tensor holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    CenterX,
    CenterY,
    Anchor {
        size: usize,
        ratio: usize,
        corner: Corner,
    },
}

/// Shape and offsets of the anchor tensor for one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnchorLayout {
    grid: Grid,
    num_sizes: usize,
    num_ratios: usize,
}

impl AnchorLayout {
    pub const CENTER_CHANNELS: usize = 2;
    pub const BOX_CHANNELS: usize = 4;

    pub fn new(grid: Grid, num_sizes: usize, num_ratios: usize) -> Self {
        Self {
            grid,
            num_sizes,
            num_ratios,
        }
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn num_sizes(&self) -> usize {
        self.num_sizes
    }

    pub fn num_ratios(&self) -> usize {
        self.num_ratios
    }

    /// Number of (size, ratio) pairs, i.e. anchors per cell.
    pub fn num_pairs(&self) -> usize {
        self.num_sizes * self.num_ratios
    }

    /// `2 + 4 * sizes * ratios`
    pub fn channels(&self) -> usize {
        Self::CENTER_CHANNELS + Self::BOX_CHANNELS * self.num_pairs()
    }

    /// Elements in one channel plane.
    pub fn plane_len(&self) -> usize {
        self.grid.cells()
    }

    /// Total element count of the tensor.
    pub fn len(&self) -> usize {
        self.channels() * self.plane_len()
    }

    /// Total element count, `None` when it overflows `usize`.
    pub fn checked_len(&self) -> Option<usize> {
        let pairs = self.num_sizes.checked_mul(self.num_ratios)?;
        let channels = pairs
            .checked_mul(Self::BOX_CHANNELS)?
            .checked_add(Self::CENTER_CHANNELS)?;
        channels.checked_mul(self.grid.checked_cells()?)
    }

    /// [`Self::checked_len`], as a layout fault when it overflows.
    pub(crate) fn try_len(&self) -> Result<usize> {
        self.checked_len().ok_or(AnchorError::LayoutOverflow {
            width: self.grid.width,
            height: self.grid.height,
            sizes: self.num_sizes,
            ratios: self.num_ratios,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `[channels, height, width]`
    pub fn shape(&self) -> [usize; 3] {
        [self.channels(), self.grid.height, self.grid.width]
    }

    /// First channel of the block belonging to `sizes[size]`, `ratios[ratio]`.
    pub fn pair_channel(&self, size: usize, ratio: usize) -> usize {
        Self::CENTER_CHANNELS + Self::BOX_CHANNELS * (size * self.num_ratios + ratio)
    }

    /// Channel holding `corner` of the given pair.
    pub fn corner_channel(&self, size: usize, ratio: usize, corner: Corner) -> usize {
        self.pair_channel(size, ratio) + corner.offset()
    }

    /// Element offset of the start of `channel`.
    pub fn channel_offset(&self, channel: usize) -> usize {
        channel * self.plane_len()
    }

    /// Element offset of the first plane of the given pair.
    pub fn pair_offset(&self, size: usize, ratio: usize) -> usize {
        self.channel_offset(self.pair_channel(size, ratio))
    }

    /// Decodes a channel index, `None` past the last channel.
    pub fn channel(&self, channel: usize) -> Option<Channel> {
        match channel {
            0 => Some(Channel::CenterX),
            1 => Some(Channel::CenterY),
            c if c < self.channels() => {
                let block = c - Self::CENTER_CHANNELS;
                let pair = block / Self::BOX_CHANNELS;
                Some(Channel::Anchor {
                    size: pair / self.num_ratios,
                    ratio: pair % self.num_ratios,
                    corner: Corner::ALL[block % Self::BOX_CHANNELS],
                })
            }
            _ => None,
        }
    }
}
