//! Normalized centers of the grid cells.

use crate::element::AnchorFloat;
use crate::error::Result;
use crate::layout::Grid;

/// Cell centers of a grid in normalized `[0, 1]` image coordinates.
///
/// The center of cell `(row, col)` is `((col + 0.5) * step_x, (row + 0.5) * step_y)`
/// with `step_x = 1 / width` and `step_y = 1 / height`. Since the x coordinate
/// only depends on the column and the y coordinate only on the row, the values
/// are kept per column and per row.
#[derive(Debug, Clone, PartialEq)]
pub struct CellCenters<F> {
    grid: Grid,
    xs: Vec<F>,
    ys: Vec<F>,
}

impl<F: AnchorFloat> CellCenters<F> {
    pub fn new(grid: Grid) -> Result<Self> {
        grid.ensure_non_empty()?;
        let step_x = F::from_index(grid.width)?.recip();
        let step_y = F::from_index(grid.height)?.recip();
        Ok(Self {
            grid,
            xs: axis_centers(grid.width, step_x)?,
            ys: axis_centers(grid.height, step_y)?,
        })
    }

    /// Center x of every cell in column `col`.
    ///
    /// Panics if `col` lies outside the grid.
    #[inline]
    pub fn x(&self, col: usize) -> F {
        self.xs[col]
    }

    /// Center y of every cell in row `row`.
    ///
    /// Panics if `row` lies outside the grid.
    #[inline]
    pub fn y(&self, row: usize) -> F {
        self.ys[row]
    }

    /// Center of the cell at flat index `index`, `None` outside the grid.
    pub fn at(&self, index: usize) -> Option<(F, F)> {
        self.grid
            .cell(index)
            .map(|(row, col)| (self.x(col), self.y(row)))
    }
}

fn axis_centers<F: AnchorFloat>(cells: usize, step: F) -> Result<Vec<F>> {
    let half = (F::one() + F::one()).recip();
    (0..cells)
        .map(|cell| Ok((F::from_index(cell)? + half) * step))
        .collect()
}

#[cfg(test)]
mod test {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::error::AnchorError;

    #[test]
    fn test_single_cell() {
        let centers = CellCenters::<f32>::new(Grid::new(1, 1)).unwrap();
        assert_eq!(centers.at(0), Some((0.5, 0.5)));
        assert_eq!(centers.at(1), None);
    }

    #[test]
    fn test_center_formula() {
        let grid = Grid::new(7, 5);
        let centers = CellCenters::<f64>::new(grid).unwrap();
        for row in 0..grid.height {
            for col in 0..grid.width {
                let (x, y) = centers.at(grid.index(row, col)).unwrap();
                assert_abs_diff_eq!(x, (col as f64 + 0.5) / 7., epsilon = 1e-12);
                assert_abs_diff_eq!(y, (row as f64 + 0.5) / 5., epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_out_of_range() {
        let grid = Grid::new(4, 3);
        let centers = CellCenters::<f32>::new(grid).unwrap();
        assert!(centers.at(grid.cells() - 1).is_some());
        assert!(centers.at(grid.cells()).is_none());
        assert!(centers.at(usize::MAX).is_none());
    }

    #[test]
    fn test_empty_grid() {
        let result = CellCenters::<f32>::new(Grid::new(0, 3));
        assert!(matches!(
            result,
            Err(AnchorError::EmptyGrid {
                width: 0,
                height: 3
            })
        ));
    }
}
