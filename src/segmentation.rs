//! Placeholder segmentation overlay.
//!
//! Darkens the frame and paints a solid box over the middle of it where a
//! real mask of the endometrium would go.

use image::{Rgb, RgbImage};

use crate::config::OverlayConfig;

/// Pixel-space rectangle covered by the mask, half-open on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskRegion {
    pub x0: u32,
    pub x1: u32,
    pub y0: u32,
    pub y1: u32,
}

impl MaskRegion {
    /// Box centered on the frame spanning a third of its height and
    /// two fifths of its width.
    pub fn centered(width: u32, height: u32) -> Self {
        let (cx, cy) = (width / 2, height / 2);
        let half_w = width / 5;
        let half_h = height / 6;
        Self {
            x0: cx - half_w,
            x1: cx + half_w,
            y0: cy - half_h,
            y1: cy + half_h,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.x0 == self.x1 || self.y0 == self.y1
    }
}

/// Produces the overlay without modifying `image`.
pub fn render_overlay(image: &RgbImage, style: &OverlayConfig) -> RgbImage {
    let mut out = image.clone();

    // Truncating cast, matching an 8-bit multiply.
    for pixel in out.pixels_mut() {
        for c in pixel.0.iter_mut() {
            *c = (f64::from(*c) * style.darken) as u8;
        }
    }

    let region = MaskRegion::centered(out.width(), out.height());
    if region.is_empty() {
        return out;
    }

    let mask = Rgb(style.mask_color);
    for y in region.y0..region.y1 {
        for x in region.x0..region.x1 {
            out.put_pixel(x, y, mask);
        }
    }
    out
}
