//! Native raster I/O: decode sources, resolve paired masks, write tiles.

use std::path::{Path, PathBuf};

use image::DynamicImage;
use masu_pipeline::TileRect;

/// Suffix appended to a source file's complete name to locate its paired
/// pixel-label mask: the mask of `photo.png` is `photo.png_mask.png`.
pub const MASK_SUFFIX: &str = "_mask.png";

/// Errors from decoding or persisting raster files.
#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    /// The file could not be opened or decoded.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// Path of the unreadable file.
        path: PathBuf,
        /// Underlying decode error.
        #[source]
        source: image::ImageError,
    },

    /// A cropped tile could not be encoded or persisted.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// Destination path of the failed write.
        path: PathBuf,
        /// Underlying encode/write error.
        #[source]
        source: image::ImageError,
    },
}

/// Decode the image at `path`.
///
/// # Errors
///
/// Returns [`RasterError::Read`] when the file is absent or does not
/// decode.
pub fn open_image(path: &Path) -> Result<DynamicImage, RasterError> {
    image::open(path).map_err(|source| RasterError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Path of the mask paired with `source` by the fixed naming convention:
/// the suffix is appended to the complete file name, dots included.
#[must_use]
pub fn mask_path(source: &Path, suffix: &str) -> PathBuf {
    let mut name = source.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// Attempt to load the mask paired with `source`.
///
/// `None` means there is no usable mask: the file is absent or does not
/// decode. Callers decide whether that skips the source (mask-required
/// runs) or selects mask-less processing.
#[must_use]
pub fn resolve_mask(source: &Path, suffix: &str) -> Option<DynamicImage> {
    image::open(mask_path(source, suffix)).ok()
}

/// Crop `rect` out of `image` and persist it at `dest`. The output
/// format follows `dest`'s extension.
///
/// # Errors
///
/// Returns [`RasterError::Write`] when encoding or writing fails.
pub fn write_tile(image: &DynamicImage, rect: TileRect, dest: &Path) -> Result<(), RasterError> {
    let tile = image.crop_imm(rect.x, rect.y, rect.width, rect.height);
    tile.save(dest).map_err(|source| RasterError::Write {
        path: dest.to_path_buf(),
        source,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    /// Gradient test image where every pixel value encodes its position.
    fn test_image(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
            Rgba([u8::try_from(x).unwrap(), u8::try_from(y).unwrap(), 0, 255])
        }))
    }

    #[test]
    fn mask_path_appends_suffix_to_full_name() {
        assert_eq!(
            mask_path(Path::new("/in/sub/photo.png"), MASK_SUFFIX),
            PathBuf::from("/in/sub/photo.png_mask.png"),
        );
    }

    #[test]
    fn open_image_missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = open_image(&dir.path().join("absent.png"));
        assert!(matches!(result, Err(RasterError::Read { .. })));
    }

    #[test]
    fn resolve_mask_absent_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("photo.png");
        test_image(4, 4).save(&source).unwrap();
        assert!(resolve_mask(&source, MASK_SUFFIX).is_none());
    }

    #[test]
    fn resolve_mask_loads_paired_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("photo.png");
        test_image(4, 4).save(&source).unwrap();
        test_image(4, 4)
            .save(mask_path(&source, MASK_SUFFIX))
            .unwrap();
        assert!(resolve_mask(&source, MASK_SUFFIX).is_some());
    }

    #[test]
    fn write_tile_persists_the_cropped_region() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("tile.png");
        let image = test_image(8, 8);

        write_tile(&image, TileRect::new(2, 3, 4, 5), &dest).unwrap();

        let tile = open_image(&dest).unwrap().to_rgba8();
        assert_eq!(tile.dimensions(), (4, 5));
        // Top-left of the tile is source pixel (2, 3).
        assert_eq!(tile.get_pixel(0, 0), &Rgba([2, 3, 0, 255]));
        assert_eq!(tile.get_pixel(3, 4), &Rgba([5, 7, 0, 255]));
    }

    #[test]
    fn write_tile_to_unwritable_path_is_a_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("no-such-dir").join("tile.png");
        let result = write_tile(&test_image(4, 4), TileRect::new(0, 0, 2, 2), &dest);
        assert!(matches!(result, Err(RasterError::Write { .. })));
    }
}
