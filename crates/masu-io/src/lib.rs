//! masu-io: filesystem collaborators for the masu tiling pipeline.
//!
//! Directory scanning, raster decode, paired-mask resolution, and cropped
//! tile writing. The planning core in `masu-pipeline` stays sans-IO; every
//! path and codec detail lives here.

pub mod raster;
pub mod scan;

pub use raster::{MASK_SUFFIX, RasterError, mask_path, open_image, resolve_mask, write_tile};
pub use scan::{PROCESSED_SUFFIX, ScanOptions, scan_sources};
