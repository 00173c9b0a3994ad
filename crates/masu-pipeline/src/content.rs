//! Content-aware emission filtering over mask regions.
//!
//! A tile is worth emitting when its mask region carries any annotation.
//! The test is the per-channel arithmetic mean over the tile's rectangle,
//! computed on the mask's native sample type (up to four channels): the
//! tile is kept when any channel mean is strictly positive. Purely
//! zero-valued (background) regions are dropped.

use image::{DynamicImage, ImageBuffer, Pixel};

use crate::types::TileRect;

/// Per-channel arithmetic means over one mask region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelMeans {
    means: [f64; 4],
    channels: usize,
}

impl ChannelMeans {
    /// Means for the channels actually present in the mask (1 to 4).
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.means[..self.channels]
    }

    /// `true` when any channel mean is strictly positive.
    #[must_use]
    pub fn any_positive(&self) -> bool {
        self.means[..self.channels].iter().any(|&mean| mean > 0.0)
    }
}

/// Compute per-channel means of `mask` inside `rect`.
///
/// Means are taken over the mask's native samples, so small nonzero labels
/// in 16-bit masks are not lost to quantization. Returns `None` for pixel
/// formats without a native accessor below. An empty rectangle yields
/// all-zero means.
///
/// `rect` must lie within the mask bounds; the emission pipeline only
/// passes rectangles planned for the mask's own dimensions.
#[must_use]
pub fn region_channel_means(mask: &DynamicImage, rect: TileRect) -> Option<ChannelMeans> {
    match mask {
        DynamicImage::ImageLuma8(buf) => Some(buffer_means(buf, rect)),
        DynamicImage::ImageLumaA8(buf) => Some(buffer_means(buf, rect)),
        DynamicImage::ImageRgb8(buf) => Some(buffer_means(buf, rect)),
        DynamicImage::ImageRgba8(buf) => Some(buffer_means(buf, rect)),
        DynamicImage::ImageLuma16(buf) => Some(buffer_means(buf, rect)),
        DynamicImage::ImageLumaA16(buf) => Some(buffer_means(buf, rect)),
        DynamicImage::ImageRgb16(buf) => Some(buffer_means(buf, rect)),
        DynamicImage::ImageRgba16(buf) => Some(buffer_means(buf, rect)),
        DynamicImage::ImageRgb32F(buf) => Some(buffer_means(buf, rect)),
        DynamicImage::ImageRgba32F(buf) => Some(buffer_means(buf, rect)),
        _ => None,
    }
}

/// Emission decision for one tile: keep it when the mask region has any
/// strictly positive channel mean. Pixel formats without per-channel
/// means keep the tile rather than dropping annotated data.
#[must_use]
pub fn is_emittable(mask: &DynamicImage, rect: TileRect) -> bool {
    region_channel_means(mask, rect).is_none_or(|means| means.any_positive())
}

fn buffer_means<P>(buf: &ImageBuffer<P, Vec<P::Subpixel>>, rect: TileRect) -> ChannelMeans
where
    P: Pixel,
    P::Subpixel: Into<f64>,
{
    let channels = usize::from(P::CHANNEL_COUNT).min(4);
    let mut sums = [0.0_f64; 4];
    for y in rect.y..rect.bottom() {
        for x in rect.x..rect.right() {
            let pixel = buf.get_pixel(x, y);
            for (sum, &sample) in sums.iter_mut().zip(pixel.channels()) {
                *sum += sample.into();
            }
        }
    }

    let area = f64::from(rect.width) * f64::from(rect.height);
    let mut means = [0.0_f64; 4];
    if area > 0.0 {
        for (mean, sum) in means.iter_mut().zip(sums) {
            *mean = sum / area;
        }
    }
    ChannelMeans { means, channels }
}
