//! masu-pipeline: pure tile planning and emission filtering (sans-IO).
//!
//! Splits a large raster image (optionally paired with a pixel-label
//! mask) into a grid of overlapping tiles:
//! grid planning -> content filtering -> dense emission indexing,
//! with output naming derived per source file.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! pixel buffers and returns structured data. All filesystem and codec
//! interaction lives in `masu-io`.

pub mod content;
pub mod grid;
pub mod naming;
pub mod types;

pub use types::{
    Axis, Dimensions, DynamicImage, EmissionRecord, TileRect, TilingConfig, TilingError,
};

/// Plan the tile emissions for one source image.
///
/// Plans the grid once and returns a lazy, single-pass sequence of
/// [`EmissionRecord`]s in row-major order. With a mask, tiles whose mask
/// region carries no annotation are dropped and consume no emission
/// index; without one, every planned tile is emitted. Indices are dense:
/// the records of one image are numbered `0..k` with no gaps.
///
/// # Errors
///
/// Returns [`TilingError::DimensionMismatch`] when the mask's dimensions
/// differ from `image`, or the configuration error from
/// [`TilingConfig::validate`].
pub fn plan_emissions<'a>(
    image: Dimensions,
    mask: Option<&'a DynamicImage>,
    config: &TilingConfig,
) -> Result<EmissionPlan<'a>, TilingError> {
    if let Some(mask) = mask {
        let mask_dims = Dimensions::from(mask);
        if mask_dims != image {
            return Err(TilingError::DimensionMismatch {
                image,
                mask: mask_dims,
            });
        }
    }

    let tiles = grid::plan(image, config)?;
    Ok(EmissionPlan {
        tiles: tiles.into_iter(),
        mask,
        next_index: 0,
    })
}

/// Lazy, single-pass sequence of [`EmissionRecord`]s for one image.
///
/// Created by [`plan_emissions`]. Recomputing a plan is cheap and pure;
/// the sequence itself is not restartable.
#[derive(Debug)]
pub struct EmissionPlan<'a> {
    tiles: std::vec::IntoIter<TileRect>,
    mask: Option<&'a DynamicImage>,
    next_index: usize,
}

impl EmissionPlan<'_> {
    /// Number of planned tiles not yet examined. Before iteration begins
    /// this is the full candidate count of the grid.
    #[must_use]
    pub fn planned_tile_count(&self) -> usize {
        self.tiles.len()
    }
}

impl Iterator for EmissionPlan<'_> {
    type Item = EmissionRecord;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let rect = self.tiles.next()?;
            if let Some(mask) = self.mask {
                if !content::is_emittable(mask, rect) {
                    continue;
                }
            }
            let index = self.next_index;
            self.next_index += 1;
            return Some(EmissionRecord {
                image_rect: rect,
                mask_rect: self.mask.map(|_| rect),
                index,
            });
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    /// 200x100 mask whose left half is background and right half is
    /// annotated.
    fn half_annotated_mask() -> DynamicImage {
        DynamicImage::ImageLuma8(GrayImage::from_fn(200, 100, |x, _| {
            Luma([if x < 100 { 0 } else { 255 }])
        }))
    }

    fn small_config() -> TilingConfig {
        TilingConfig {
            max_tile_width: 100,
            max_tile_height: 100,
            overlap_x: 0,
            overlap_y: 0,
        }
    }

    #[test]
    fn maskless_mode_emits_every_tile() {
        let dims = Dimensions {
            width: 200,
            height: 200,
        };
        let records: Vec<EmissionRecord> =
            plan_emissions(dims, None, &small_config()).unwrap().collect();
        assert_eq!(records.len(), 4);
        let indices: Vec<usize> = records.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        assert!(records.iter().all(|r| r.mask_rect.is_none()));
    }

    #[test]
    fn scenario_c_skipped_tile_frees_its_index() {
        // Two tiles planned; the all-zero left tile is dropped and the
        // right tile takes index 0.
        let mask = half_annotated_mask();
        let dims = Dimensions {
            width: 200,
            height: 100,
        };
        let records: Vec<EmissionRecord> = plan_emissions(dims, Some(&mask), &small_config())
            .unwrap()
            .collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].index, 0);
        assert_eq!(records[0].image_rect, TileRect::new(100, 0, 100, 100));
    }

    #[test]
    fn mask_rect_matches_image_rect_exactly() {
        let mask = half_annotated_mask();
        let dims = Dimensions {
            width: 200,
            height: 100,
        };
        for record in plan_emissions(dims, Some(&mask), &small_config()).unwrap() {
            assert_eq!(record.mask_rect, Some(record.image_rect));
        }
    }

    #[test]
    fn indices_stay_dense_with_interleaved_skips() {
        // Annotate columns so tiles alternate kept/dropped along each row.
        let mask = DynamicImage::ImageLuma8(GrayImage::from_fn(400, 100, |x, _| {
            Luma([u8::from((x / 100) % 2 == 0)])
        }));
        let dims = Dimensions {
            width: 400,
            height: 100,
        };
        let records: Vec<EmissionRecord> = plan_emissions(dims, Some(&mask), &small_config())
            .unwrap()
            .collect();
        assert_eq!(records.len(), 2);
        let indices: Vec<usize> = records.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![0, 1]);
        let xs: Vec<u32> = records.iter().map(|r| r.image_rect.x).collect();
        assert_eq!(xs, vec![0, 200]);
    }

    #[test]
    fn dimension_mismatch_is_rejected() {
        let mask = half_annotated_mask();
        let dims = Dimensions {
            width: 200,
            height: 101,
        };
        assert!(matches!(
            plan_emissions(dims, Some(&mask), &small_config()),
            Err(TilingError::DimensionMismatch { .. }),
        ));
    }

    #[test]
    fn invalid_config_is_rejected_before_planning() {
        let config = TilingConfig {
            overlap_x: 100,
            ..small_config()
        };
        let dims = Dimensions {
            width: 200,
            height: 100,
        };
        assert!(matches!(
            plan_emissions(dims, None, &config),
            Err(TilingError::OverlapTooLarge { axis: Axis::X, .. }),
        ));
    }

    #[test]
    fn planned_tile_count_reports_the_grid_size() {
        let dims = Dimensions {
            width: 200,
            height: 200,
        };
        let plan = plan_emissions(dims, None, &small_config()).unwrap();
        assert_eq!(plan.planned_tile_count(), 4);
    }

    #[test]
    fn all_background_mask_emits_nothing() {
        let mask = DynamicImage::ImageLuma8(GrayImage::new(200, 100));
        let dims = Dimensions {
            width: 200,
            height: 100,
        };
        let records: Vec<EmissionRecord> = plan_emissions(dims, Some(&mask), &small_config())
            .unwrap()
            .collect();
        assert!(records.is_empty());
    }
}
