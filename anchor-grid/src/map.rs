use serde::Serialize;

use crate::element::AnchorFloat;
use crate::error::{AnchorError, Result};
use crate::layout::{AnchorLayout, Corner};

/// One anchor read back from an [`AnchorMap`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnchorBox<F> {
    pub size: usize,
    pub ratio: usize,
    pub row: usize,
    pub col: usize,
    pub xmin: F,
    pub ymin: F,
    pub xmax: F,
    pub ymax: F,
}

/// A generated anchor tensor together with its layout.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorMap<F> {
    layout: AnchorLayout,
    data: Vec<F>,
}

impl<F: AnchorFloat> AnchorMap<F> {
    pub fn from_vec(layout: AnchorLayout, data: Vec<F>) -> Result<Self> {
        let expected = layout.try_len()?;
        if data.len() != expected {
            return Err(AnchorError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { layout, data })
    }

    pub fn layout(&self) -> &AnchorLayout {
        &self.layout
    }

    pub fn shape(&self) -> [usize; 3] {
        self.layout.shape()
    }

    pub fn as_slice(&self) -> &[F] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<F> {
        self.data
    }

    /// The plane of channel `channel`.
    pub fn channel(&self, channel: usize) -> Option<&[F]> {
        if channel >= self.layout.channels() {
            return None;
        }
        let start = self.layout.channel_offset(channel);
        self.data.get(start..start + self.layout.plane_len())
    }

    pub fn center(&self, row: usize, col: usize) -> Option<(F, F)> {
        let index = self.cell_index(row, col)?;
        let plane = self.layout.plane_len();
        Some((self.data[index], self.data[plane + index]))
    }

    /// `[xmin, ymin, xmax, ymax]` of the anchor for `sizes[size]`, `ratios[ratio]`
    /// at `row`, `col`.
    pub fn anchor(&self, size: usize, ratio: usize, row: usize, col: usize) -> Option<[F; 4]> {
        if size >= self.layout.num_sizes() || ratio >= self.layout.num_ratios() {
            return None;
        }
        let index = self.cell_index(row, col)?;
        Some(Corner::ALL.map(|corner| {
            let channel = self.layout.corner_channel(size, ratio, corner);
            self.data[self.layout.channel_offset(channel) + index]
        }))
    }

    /// Every anchor in storage order: sizes, then ratios, then rows and columns.
    pub fn anchors(&self) -> impl Iterator<Item = AnchorBox<F>> + '_ {
        let grid = self.layout.grid();
        let num_ratios = self.layout.num_ratios();
        (0..self.layout.num_pairs()).flat_map(move |pair| {
            let (size, ratio) = (pair / num_ratios, pair % num_ratios);
            (0..grid.height).flat_map(move |row| {
                (0..grid.width).filter_map(move |col| {
                    let [xmin, ymin, xmax, ymax] = self.anchor(size, ratio, row, col)?;
                    Some(AnchorBox {
                        size,
                        ratio,
                        row,
                        col,
                        xmin,
                        ymin,
                        xmax,
                        ymax,
                    })
                })
            })
        })
    }

    fn cell_index(&self, row: usize, col: usize) -> Option<usize> {
        let grid = self.layout.grid();
        (row < grid.height && col < grid.width).then(|| grid.index(row, col))
    }
}
