//! ab_glyph-backed font resolution and shaping.
//!
//! Loading font files from disk and picking a family belong to the
//! caller; this module only turns already-obtained font bytes into a
//! [`TextShaper`] the rasterizer can drive.

use ab_glyph::{point, Font, FontArc, ScaleFont};

use crate::{
    error::Error,
    raster::{Coverage, TextShaper},
};

/// A resolved font at a fixed pixel size.
#[derive(Clone)]
pub struct FontSpec {
    font: FontArc,
    size: f32,
}

impl FontSpec {
    /// Parse raw TTF/OTF bytes. `size` is the glyph height in pixels,
    /// independent of the label height the text is later shaped into.
    pub fn from_bytes(bytes: Vec<u8>, size: f32) -> Result<Self, Error> {
        let font = FontArc::try_from_vec(bytes).map_err(|_| Error::FontUnavailable)?;
        Ok(FontSpec { font, size })
    }

    pub fn size(&self) -> f32 {
        self.size
    }
}

impl TextShaper for FontSpec {
    fn shape(&self, text: &str, height: u32) -> Result<Coverage, Error> {
        let scaled = self.font.as_scaled(self.size);

        // Left-to-right layout: caret advance plus pair kerning.
        let mut glyphs = Vec::new();
        let mut caret = 0.0f32;
        let mut prev = None;
        for ch in text.chars() {
            let id = self.font.glyph_id(ch);
            if let Some(p) = prev {
                caret += scaled.kern(p, id);
            }
            glyphs.push((id, caret));
            caret += scaled.h_advance(id);
            prev = Some(id);
        }

        let width = (caret.ceil() as u32).max(1);

        // Center the font's line box vertically in the label; glyphs
        // taller than the label clip at the buffer edges.
        let line_height = scaled.ascent() - scaled.descent();
        let baseline = scaled.ascent() + (height as f32 - line_height) / 2.0;

        let mut data = vec![0.0f32; (width * height) as usize];
        for (id, glyph_x) in glyphs {
            let glyph = id.with_scale_and_position(self.size, point(glyph_x, baseline));
            if let Some(outlined) = self.font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                outlined.draw(|px, py, coverage| {
                    let x = px as i32 + bounds.min.x as i32;
                    let y = py as i32 + bounds.min.y as i32;
                    if x >= 0 && x < width as i32 && y >= 0 && y < height as i32 {
                        let idx = (y as u32 * width) as usize + x as usize;
                        data[idx] = (data[idx] + coverage).min(1.0);
                    }
                });
            }
        }

        Ok(Coverage {
            width,
            height,
            data,
        })
    }
}
