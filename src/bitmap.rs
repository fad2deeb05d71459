//! Raster to wire-format packing.
//!
//! This module is the bit-orientation contract with the device firmware
//! and the usual culprit when a label comes out garbled:
//!
//! - rows are emitted top row first, in physical print order,
//! - each row is packed left to right into consecutive bytes,
//! - 8 horizontal pixels per byte, most-significant bit = leftmost pixel,
//! - a set bit is ink.
//!
//! Any change here must be re-confirmed against the device.

use crate::{error::Error, raster::GlyphRaster};

/// A raster packed into the printer's transfer format.
///
/// Holds `width / 8` bytes per row, `height` rows, concatenated in row
/// order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedBitmap {
    bytes: Vec<u8>,
    width: u32,
    height: u32,
}

impl PackedBitmap {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Raster width in pixels (multiple of 8).
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Raster height in rows.
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Pack `raster` into the device bitmap format.
///
/// The raster width must already be byte-aligned; the rasterizer
/// guarantees that, so a misaligned raster here is a defect in the
/// caller, not a recoverable condition.
pub fn pack(raster: &GlyphRaster) -> Result<PackedBitmap, Error> {
    let width = raster.width();
    let height = raster.height();
    if width % 8 != 0 {
        return Err(Error::MisalignedRaster { width });
    }

    let mut bytes = Vec::with_capacity((width / 8 * height) as usize);
    for y in 0..height {
        for byte_x in 0..width / 8 {
            let mut packed: u8 = 0;
            for bit in 0..8 {
                if raster.get(byte_x * 8 + bit, y) {
                    packed |= 0x80 >> bit;
                }
            }
            bytes.push(packed);
        }
    }

    Ok(PackedBitmap {
        bytes,
        width,
        height,
    })
}

/// Inverse of [`pack`], used to verify the orientation contract round-trips.
#[cfg(test)]
pub(crate) fn unpack(bitmap: &PackedBitmap) -> GlyphRaster {
    let width = bitmap.width;
    let height = bitmap.height;
    let mut pixels = vec![false; (width * height) as usize];
    for y in 0..height {
        for x in 0..width {
            let byte = bitmap.bytes[(y * width / 8 + x / 8) as usize];
            pixels[(y * width + x) as usize] = byte & (0x80 >> (x % 8)) != 0;
        }
    }
    GlyphRaster::new(width, height, pixels)
}
