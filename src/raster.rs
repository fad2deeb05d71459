//! Text rasterization into label-sized monochrome buffers.
//!
//! The printer head is binary, so anti-aliasing cannot survive to the
//! output: shaped coverage is cut at a fixed threshold and every pixel
//! resolves to ink or no-ink. The same text with the same shaper always
//! produces the same raster.

use log::debug;

use crate::{error::Error, label::LabelSpec};

/// Coverage above this fraction becomes ink.
const INK_THRESHOLD: f32 = 0.5;

/// Grayscale output of a font collaborator: per-pixel coverage in
/// `0.0..=1.0`, row-major, exactly the requested number of rows tall.
pub struct Coverage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<f32>,
}

/// Font collaborator seam.
///
/// The rasterizer only needs one thing from a font stack: a coverage
/// buffer for a string at a pixel height. [`FontSpec`](crate::FontSpec)
/// is the ab_glyph-backed implementation; tests substitute fixed-shape
/// fakes.
pub trait TextShaper {
    /// Shape `text` into a buffer exactly `height` rows tall, with the
    /// baseline placed by the implementation.
    fn shape(&self, text: &str, height: u32) -> Result<Coverage, Error>;
}

/// A rendered label as a monochrome pixel buffer.
///
/// Rows run top to bottom in physical print order, columns left to
/// right. The width is always a multiple of 8 so the packer never has
/// to split a byte across rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphRaster {
    width: u32,
    height: u32,
    pixels: Vec<bool>,
}

impl GlyphRaster {
    pub(crate) fn new(width: u32, height: u32, pixels: Vec<bool>) -> Self {
        debug_assert_eq!(pixels.len(), (width * height) as usize);
        GlyphRaster {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// True if the pixel at (`x`, `y`) is ink. `y` counts from the top row.
    pub fn get(&self, x: u32, y: u32) -> bool {
        self.pixels[(y * self.width + x) as usize]
    }
}

/// Render `text` into a raster sized for `label`.
///
/// The output is exactly `label.dots_per_row()` rows tall and as wide as
/// the smallest multiple of 8 that contains the inked glyph extent, with
/// no-ink padding columns on the right.
pub fn render(
    text: &str,
    shaper: &impl TextShaper,
    label: &LabelSpec,
) -> Result<GlyphRaster, Error> {
    if text.trim().is_empty() {
        return Err(Error::EmptyText);
    }

    let height = label.dots_per_row();
    let coverage = shaper.shape(text, height)?;
    debug_assert_eq!(coverage.height, height);

    // Rightmost inked column after thresholding; the raster hugs the ink
    // extent rather than the full advance width.
    let mut extent: u32 = 0;
    for y in 0..height {
        for x in 0..coverage.width {
            if coverage.data[(y * coverage.width + x) as usize] > INK_THRESHOLD {
                if x + 1 > extent {
                    extent = x + 1;
                }
            }
        }
    }

    let width = round_up_to_byte(extent.max(1));
    let mut pixels = vec![false; (width * height) as usize];
    for y in 0..height {
        for x in 0..extent.min(coverage.width) {
            if coverage.data[(y * coverage.width + x) as usize] > INK_THRESHOLD {
                pixels[(y * width + x) as usize] = true;
            }
        }
    }

    debug!(
        "rendered {:?} to {}x{} raster (ink extent {})",
        text, width, height, extent
    );

    Ok(GlyphRaster::new(width, height, pixels))
}

fn round_up_to_byte(n: u32) -> u32 {
    (n + 7) / 8 * 8
}

#[cfg(test)]
pub(crate) mod test_shapers {
    use super::*;

    /// Deterministic stand-in for a font: every non-space character is a
    /// solid 5-wide box spanning most of the buffer height, followed by
    /// one blank column; spaces advance without ink.
    pub struct BoxShaper;

    impl TextShaper for BoxShaper {
        fn shape(&self, text: &str, height: u32) -> Result<Coverage, Error> {
            let chars: Vec<char> = text.chars().collect();
            let width = (chars.len() as u32) * 6;
            let mut data = vec![0.0f32; (width * height) as usize];
            for (i, ch) in chars.iter().enumerate() {
                if ch.is_whitespace() {
                    continue;
                }
                let x0 = i as u32 * 6;
                for y in 1..height.saturating_sub(1) {
                    for x in x0..x0 + 5 {
                        data[(y * width + x) as usize] = 1.0;
                    }
                }
            }
            Ok(Coverage {
                width,
                height,
                data,
            })
        }
    }

    /// Shaper that always fails to resolve, as a missing font would.
    pub struct UnresolvableShaper;

    impl TextShaper for UnresolvableShaper {
        fn shape(&self, _text: &str, _height: u32) -> Result<Coverage, Error> {
            Err(Error::FontUnavailable)
        }
    }
}
