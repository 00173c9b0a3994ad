//! Output file naming for emitted tiles.
//!
//! A file name splits into base and extension at its **first** `.`, so
//! `a.b.png` yields base `a` and extension `.b.png`. Mask files are named
//! by appending the mask suffix to the complete image file name (the mask
//! of `photo.png` is `photo.png_mask.png`), and the first-dot split gives
//! both names the same base. Tile `i` of a file is then named
//! `{base}_{i}{extension}`, so the pair `photo_0.png` /
//! `photo_0.png_mask.png` stays associated.

use crate::types::TilingError;

/// Split `name` at its first `.` into `(base, extension)`.
///
/// The extension keeps the leading dot, so `base` + `extension`
/// reproduces `name` exactly.
///
/// # Errors
///
/// Returns [`TilingError::MissingDotSeparator`] when `name` has no `.`.
pub fn split_first_dot(name: &str) -> Result<(&str, &str), TilingError> {
    let dot = name
        .find('.')
        .ok_or_else(|| TilingError::MissingDotSeparator {
            name: name.to_owned(),
        })?;
    Ok((&name[..dot], &name[dot..]))
}

/// Compose the output name for emission index `index`.
#[must_use]
pub fn tile_name(base: &str, index: usize, extension: &str) -> String {
    format!("{base}_{index}{extension}")
}

/// Validated output naming for one annotated source and its mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairedNaming {
    base: String,
    extension: String,
    mask_extension: String,
}

impl PairedNaming {
    /// Derive the naming for a source/mask pair, enforcing that both
    /// names share a base.
    ///
    /// # Errors
    ///
    /// Returns [`TilingError::MissingDotSeparator`] when either name has
    /// no `.`, or [`TilingError::BaseNameMismatch`] when the first-dot
    /// bases differ.
    pub fn derive(image_name: &str, mask_name: &str) -> Result<Self, TilingError> {
        let (base, extension) = split_first_dot(image_name)?;
        let (mask_base, mask_extension) = split_first_dot(mask_name)?;
        if base != mask_base {
            return Err(TilingError::BaseNameMismatch {
                image_base: base.to_owned(),
                mask_base: mask_base.to_owned(),
            });
        }
        Ok(Self {
            base: base.to_owned(),
            extension: extension.to_owned(),
            mask_extension: mask_extension.to_owned(),
        })
    }

    /// Output name of the image tile at `index`.
    #[must_use]
    pub fn image_tile_name(&self, index: usize) -> String {
        tile_name(&self.base, index, &self.extension)
    }

    /// Output name of the mask tile at `index`.
    #[must_use]
    pub fn mask_tile_name(&self, index: usize) -> String {
        tile_name(&self.base, index, &self.mask_extension)
    }
}
