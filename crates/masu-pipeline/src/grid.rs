//! Tile grid planning: cover an image with overlapping fixed-size tiles.
//!
//! Along each axis, tile start positions advance by `stride = max_tile -
//! overlap` and are clamped so the final tile sits flush against the far
//! edge. Every pixel of the source ends up inside at least one tile, every
//! tile stays inside the image, and all tiles share the same extent. The
//! clamp means the last overlap can exceed the nominal one; it never falls
//! below it.
//!
//! An image no larger than one tile along an axis yields a single position
//! at `0` whose extent is the full axis length.

use crate::types::{Dimensions, TileRect, TilingConfig, TilingError};

/// Start positions along one axis.
///
/// Precondition (upheld by [`TilingConfig::validate`]): `max_extent > 0`
/// and `overlap < max_extent`.
fn axis_positions(length: u32, max_extent: u32, overlap: u32) -> Vec<u32> {
    debug_assert!(max_extent > 0 && overlap < max_extent);

    if length == 0 {
        return Vec::new();
    }
    if length <= max_extent {
        return vec![0];
    }

    let stride = max_extent - overlap;
    let count = (length - overlap).div_ceil(stride);
    let last_start = length - max_extent;
    (0..count).map(|i| (i * stride).min(last_start)).collect()
}

/// Plan the ordered tile grid covering an image of `dimensions`.
///
/// Tiles are produced row-major: all x-positions for the first row, then
/// the next row, and so on. A zero-area image yields an empty plan.
///
/// # Errors
///
/// Returns the configuration error from [`TilingConfig::validate`] without
/// planning anything.
pub fn plan(dimensions: Dimensions, config: &TilingConfig) -> Result<Vec<TileRect>, TilingError> {
    config.validate()?;

    if dimensions.width == 0 || dimensions.height == 0 {
        return Ok(Vec::new());
    }

    let xs = axis_positions(dimensions.width, config.max_tile_width, config.overlap_x);
    let ys = axis_positions(dimensions.height, config.max_tile_height, config.overlap_y);
    let tile_width = dimensions.width.min(config.max_tile_width);
    let tile_height = dimensions.height.min(config.max_tile_height);

    let mut tiles = Vec::with_capacity(xs.len() * ys.len());
    for &y in &ys {
        for &x in &xs {
            tiles.push(TileRect::new(x, y, tile_width, tile_height));
        }
    }
    Ok(tiles)
}
