//! Writing the full anchor tensor.
//
// The output is split into its channel planes and every plane into batches of
// cells. Planes and batches are disjoint, so rayon can fill them in any order
// and the result never depends on the batch width or the number of threads.

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use crate::boxes::AnchorShape;
use crate::centers::CellCenters;
use crate::element::AnchorFloat;
use crate::error::{AnchorError, Result};
use crate::layout::{AnchorLayout, Channel, Grid};

pub const DEFAULT_BATCH_WIDTH: usize = 256;

/// Execution knobs. Neither field changes the generated values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Number of cells a single rayon task writes.
    pub batch_width: usize,
    /// Run inside a dedicated pool of this many threads instead of the global pool.
    pub threads: Option<usize>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            batch_width: DEFAULT_BATCH_WIDTH,
            threads: None,
        }
    }
}

/// Fills `output` with the anchor tensor of `grid` using the default options.
///
/// See [`generate_grid_anchors_with`].
pub fn generate_grid_anchors<F: AnchorFloat>(
    output: &mut [F],
    grid: Grid,
    sizes: &[F],
    ratios: &[F],
) -> Result<()> {
    generate_grid_anchors_with(output, grid, sizes, ratios, &GenerateOptions::default())
}

/// Fills `output` with the `[2 + 4 * sizes * ratios, height, width]` anchor tensor.
///
/// Channel 0 and 1 hold the cell centers, then every `(size, ratio)` pair gets
/// the four planes `xmin, ymin, xmax, ymax`, sizes outer and ratios inner.
/// `sizes` and `ratios` are expected to be positive; validating them is up to
/// the caller (see [`crate::params::AnchorParams::validate`]).
///
/// `output` must hold exactly the number of elements of the layout. Nothing is
/// written when an error is returned.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(
        width = grid.width,
        height = grid.height,
        sizes = sizes.len(),
        ratios = ratios.len()
    )
)]
pub fn generate_grid_anchors_with<F: AnchorFloat>(
    output: &mut [F],
    grid: Grid,
    sizes: &[F],
    ratios: &[F],
    options: &GenerateOptions,
) -> Result<()> {
    grid.ensure_non_empty()?;
    let layout = AnchorLayout::new(grid, sizes.len(), ratios.len());
    let expected = layout.try_len()?;
    if output.len() != expected {
        return Err(AnchorError::BufferSize {
            expected,
            actual: output.len(),
        });
    }

    let centers = CellCenters::new(grid)?;
    // Each square root is taken once and shared by every size.
    let sqrt_ratios: Vec<F> = ratios.iter().map(|ratio| ratio.sqrt()).collect();
    let shapes: Vec<AnchorShape<F>> = sizes
        .iter()
        .flat_map(|&size| {
            sqrt_ratios
                .iter()
                .map(move |&sqrt_ratio| AnchorShape::new(size, sqrt_ratio))
        })
        .collect();

    let batch_width = options.batch_width.max(1);
    tracing::debug!(
        channels = layout.channels(),
        plane = layout.plane_len(),
        batch_width,
        "writing anchor planes"
    );

    let mut run = || write_planes(output, &layout, &centers, &shapes, batch_width);
    match options.threads {
        Some(threads) => ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|index| format!("anchor-grid-{index}"))
            .build()?
            .install(run),
        None => run(),
    }
    Ok(())
}

fn write_planes<F: AnchorFloat>(
    output: &mut [F],
    layout: &AnchorLayout,
    centers: &CellCenters<F>,
    shapes: &[AnchorShape<F>],
    batch_width: usize,
) {
    let grid = layout.grid();
    output
        .par_chunks_mut(layout.plane_len())
        .enumerate()
        .for_each(|(channel, plane)| match layout.channel(channel) {
            Some(Channel::CenterX) => fill_plane(plane, grid, batch_width, |_, col| centers.x(col)),
            Some(Channel::CenterY) => fill_plane(plane, grid, batch_width, |row, _| centers.y(row)),
            Some(Channel::Anchor {
                size,
                ratio,
                corner,
            }) => {
                let shape = &shapes[size * layout.num_ratios() + ratio];
                fill_plane(plane, grid, batch_width, |row, col| {
                    shape.corner(centers.x(col), centers.y(row), corner)
                });
            }
            None => {}
        });
}

/// Writes `value(row, col)` into every cell of `plane`, `batch_width` cells per task.
fn fill_plane<F, V>(plane: &mut [F], grid: Grid, batch_width: usize, value: V)
where
    F: AnchorFloat,
    V: Fn(usize, usize) -> F + Sync,
{
    plane
        .par_chunks_mut(batch_width)
        .enumerate()
        .for_each(|(batch, cells)| {
            let start = batch * batch_width;
            for (offset, cell) in cells.iter_mut().enumerate() {
                if let Some((row, col)) = grid.cell(start + offset) {
                    *cell = value(row, col);
                }
            }
        });
}
