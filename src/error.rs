//! Error types for label printing operations.
//!
//! Pipeline failures (`Error`) are things the caller must fix or that
//! indicate a defect; device and transport outcomes of a well-formed
//! transmission attempt travel in [`SessionResult`](crate::SessionResult)
//! instead.

use std::io;
use thiserror::Error;

/// Failures raised before or while building a print payload.
///
/// These are never retried: input errors are caller-correctable and
/// `MisalignedRaster` is an internal invariant violation.
#[derive(Error, Debug)]
pub enum Error {
    /// The text to print is empty or whitespace-only.
    #[error("Nothing to print, text is empty")]
    EmptyText,

    /// The font bytes could not be parsed, or the font collaborator
    /// could not resolve the requested face.
    #[error("Font could not be resolved")]
    FontUnavailable,

    /// A raster reached the packer whose width is not a multiple of 8.
    ///
    /// The rasterizer pads every raster to byte alignment, so this is a
    /// programming error in the caller, not a runtime condition.
    #[error("Raster width {width} is not byte aligned")]
    MisalignedRaster { width: u32 },
}

/// Reject reasons reported by the printer in its status byte.
///
/// Code values are the device firmware's contract; unknown codes are
/// preserved verbatim so new firmware revisions stay diagnosable.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceFault {
    #[error("Printer is busy with another job")]
    Busy,

    #[error("Label jam")]
    LabelJam,

    /// The installed tape does not match the width class in the frame.
    #[error("Installed label width does not match the request")]
    WidthMismatch,

    #[error("Out of label media")]
    OutOfMedia,

    /// The payload exceeded the device's raster buffer.
    #[error("Device raster buffer overrun")]
    BufferOverrun,

    #[error("Unknown device status code {0:#04X}")]
    Unknown(u8),
}

impl DeviceFault {
    /// Decode a non-zero status byte into a reject reason.
    pub fn from_code(code: u8) -> Self {
        match code {
            0x01 => Self::Busy,
            0x02 => Self::LabelJam,
            0x03 => Self::WidthMismatch,
            0x04 => Self::OutOfMedia,
            0x05 => Self::BufferOverrun,
            _ => Self::Unknown(code),
        }
    }
}

/// Transport-level failures of a single transmission attempt.
#[derive(Error, Debug)]
pub enum TransportFault {
    /// The device did not produce a parseable response within the
    /// configured deadline.
    #[error("No response from printer within the deadline")]
    Timeout,

    #[error("I/O error talking to printer: {0}")]
    Io(#[from] io::Error),

    /// The response frame was shorter than the fixed response size.
    #[error("Short response from printer: {0} bytes")]
    ShortResponse(usize),

    /// The response did not start with the status frame marker.
    #[error("Unexpected response header byte {0:#04X}")]
    BadHeader(u8),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_status_codes_map_to_named_faults() {
        assert_eq!(DeviceFault::from_code(0x01), DeviceFault::Busy);
        assert_eq!(DeviceFault::from_code(0x02), DeviceFault::LabelJam);
        assert_eq!(DeviceFault::from_code(0x03), DeviceFault::WidthMismatch);
        assert_eq!(DeviceFault::from_code(0x04), DeviceFault::OutOfMedia);
        assert_eq!(DeviceFault::from_code(0x05), DeviceFault::BufferOverrun);
    }

    #[test]
    fn unknown_status_code_is_preserved() {
        assert_eq!(DeviceFault::from_code(0x7F), DeviceFault::Unknown(0x7F));
    }
}
