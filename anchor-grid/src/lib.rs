//! Dense anchor boxes for object-detection feature maps.
//!
//! For a `width x height` grid over the normalized unit square the anchor tensor
//! has the shape `[2 + 4 * sizes * ratios, height, width]`:
//!
//! - channel 0 and 1: the x and y center of every cell,
//! - then, for every size (outer) and ratio (inner), the four planes
//!   `xmin, ymin, xmax, ymax` of the anchor centered on each cell.
//!
//! [`generate_grid_anchors`] fills a caller allocated buffer.
//! [`AnchorParams`] takes care of validation and allocation and returns an
//! [`AnchorMap`], which can be handed to `burn` with [`anchor_tensor`].

pub mod boxes;
pub mod centers;
pub mod element;
pub mod error;
pub mod generate;
pub mod layout;
pub mod map;
pub mod params;
pub mod tensor;

pub use element::AnchorFloat;
pub use error::{AnchorError, Result};
pub use generate::{generate_grid_anchors, generate_grid_anchors_with, GenerateOptions};
pub use layout::{AnchorLayout, Channel, Corner, Grid};
pub use map::{AnchorBox, AnchorMap};
pub use params::{AnchorParams, FloatTuple};
pub use tensor::anchor_tensor;
