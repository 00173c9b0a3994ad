//! Shared types for the masu tiling pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Re-export `DynamicImage` so downstream crates can pass decoded masks
/// and sources around without depending on `image` directly.
pub use image::DynamicImage;

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl From<&DynamicImage> for Dimensions {
    fn from(image: &DynamicImage) -> Self {
        use image::GenericImageView;

        let (width, height) = image.dimensions();
        Self { width, height }
    }
}

/// Image axis, used in configuration error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    /// Horizontal (width) axis.
    X,
    /// Vertical (height) axis.
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => f.write_str("x"),
            Self::Y => f.write_str("y"),
        }
    }
}

/// An axis-aligned rectangular sub-region of a source image.
///
/// Coordinates are integer pixels; `(x, y)` is the top-left corner and the
/// right/bottom edges are exclusive. The grid planner only ever produces
/// rectangles that lie fully inside the image they were planned for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRect {
    /// Left edge in pixels from the image's left border.
    pub x: u32,
    /// Top edge in pixels from the image's top border.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl TileRect {
    /// Create a new tile rectangle.
    #[must_use]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    #[must_use]
    pub const fn right(self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    #[must_use]
    pub const fn bottom(self) -> u32 {
        self.y + self.height
    }
}

impl fmt::Display for TileRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{}+{}+{}",
            self.width, self.height, self.x, self.y
        )
    }
}

/// Configuration for the tile grid planner.
///
/// The overlap along an axis must stay strictly below the max tile extent,
/// otherwise consecutive tile positions cannot advance. [`Self::validate`]
/// reports violations instead of correcting them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilingConfig {
    /// Upper bound on tile width in pixels.
    pub max_tile_width: u32,

    /// Upper bound on tile height in pixels.
    pub max_tile_height: u32,

    /// Minimum horizontal overlap between adjacent tiles in pixels.
    pub overlap_x: u32,

    /// Minimum vertical overlap between adjacent tiles in pixels.
    pub overlap_y: u32,
}

impl TilingConfig {
    /// Default upper bound on tile width in pixels.
    pub const DEFAULT_MAX_TILE_WIDTH: u32 = 1024;

    /// Default upper bound on tile height in pixels.
    pub const DEFAULT_MAX_TILE_HEIGHT: u32 = 1024;

    /// Default minimum horizontal overlap between adjacent tiles.
    pub const DEFAULT_OVERLAP_X: u32 = 257;

    /// Default minimum vertical overlap between adjacent tiles.
    pub const DEFAULT_OVERLAP_Y: u32 = 257;

    /// Check the planner's preconditions: positive tile extents and
    /// overlaps strictly smaller than the corresponding extent.
    ///
    /// # Errors
    ///
    /// Returns [`TilingError::ZeroTileExtent`] or
    /// [`TilingError::OverlapTooLarge`] naming the offending axis.
    pub const fn validate(&self) -> Result<(), TilingError> {
        if self.max_tile_width == 0 {
            return Err(TilingError::ZeroTileExtent { axis: Axis::X });
        }
        if self.max_tile_height == 0 {
            return Err(TilingError::ZeroTileExtent { axis: Axis::Y });
        }
        if self.overlap_x >= self.max_tile_width {
            return Err(TilingError::OverlapTooLarge {
                axis: Axis::X,
                overlap: self.overlap_x,
                max_tile: self.max_tile_width,
            });
        }
        if self.overlap_y >= self.max_tile_height {
            return Err(TilingError::OverlapTooLarge {
                axis: Axis::Y,
                overlap: self.overlap_y,
                max_tile: self.max_tile_height,
            });
        }
        Ok(())
    }
}

impl Default for TilingConfig {
    fn default() -> Self {
        Self {
            max_tile_width: Self::DEFAULT_MAX_TILE_WIDTH,
            max_tile_height: Self::DEFAULT_MAX_TILE_HEIGHT,
            overlap_x: Self::DEFAULT_OVERLAP_X,
            overlap_y: Self::DEFAULT_OVERLAP_Y,
        }
    }
}

/// One tile selected for emission.
///
/// `mask_rect` is present exactly when the source image has a paired mask;
/// it is always geometrically identical to `image_rect`, so cropping both
/// images with their respective rectangles yields corresponding pixels.
/// Indices are dense over emitted tiles: a tile rejected by the content
/// filter consumes no index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmissionRecord {
    /// Region to crop out of the source image.
    pub image_rect: TileRect,

    /// Region to crop out of the paired mask, when one exists.
    pub mask_rect: Option<TileRect>,

    /// Sequential emission index, shared by the image tile and its mask
    /// tile and used to name both output files.
    pub index: usize,
}

/// Errors from planning, pairing, or naming tiles.
#[derive(Debug, thiserror::Error)]
pub enum TilingError {
    /// A tile extent of zero can make no forward progress along its axis.
    #[error("max tile {axis}-extent must be positive")]
    ZeroTileExtent {
        /// Axis whose configured extent is zero.
        axis: Axis,
    },

    /// Overlap must stay strictly below the tile extent.
    #[error("{axis}-overlap {overlap} must be smaller than the max tile extent {max_tile}")]
    OverlapTooLarge {
        /// Axis whose overlap is too large.
        axis: Axis,
        /// Configured overlap in pixels.
        overlap: u32,
        /// Configured max tile extent in pixels.
        max_tile: u32,
    },

    /// Image and mask must agree pixel-for-pixel before tiles are paired.
    #[error("mask dimensions {mask} do not match image dimensions {image}")]
    DimensionMismatch {
        /// Dimensions of the source image.
        image: Dimensions,
        /// Dimensions of the paired mask.
        mask: Dimensions,
    },

    /// Output naming needs a `.` to split base name from extension.
    #[error("file name `{name}` contains no `.` separator")]
    MissingDotSeparator {
        /// The offending file name.
        name: String,
    },

    /// Paired image and mask files must share a base name.
    #[error("image base name `{image_base}` does not match mask base name `{mask_base}`")]
    BaseNameMismatch {
        /// Base derived from the image file name.
        image_base: String,
        /// Base derived from the mask file name.
        mask_base: String,
    },
}
