//! Network Label Printer Driver
//!
//! This crate renders text into a monochrome raster sized to a label
//! tape, packs the raster into the printer's 1-bit transfer format and
//! delivers it to the device over TCP, one label per call.
//!
//! # Example
//!
//! ```rust,no_run
//! use labelnet::{FontSpec, PrintJob, SessionResult, WidthClass};
//!
//! let bytes = std::fs::read("/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf").unwrap();
//! let font = FontSpec::from_bytes(bytes, 40.0).unwrap();
//!
//! let job = PrintJob::new("192.168.54.148:9100".parse().unwrap(), WidthClass::W12);
//! match job.print("HELLO", &font).unwrap() {
//!     SessionResult::Acknowledged => println!("label printed"),
//!     SessionResult::Rejected(fault) => println!("printer refused: {}", fault),
//!     SessionResult::TransportFailure(fault) => println!("no confirmation: {}", fault),
//! }
//! ```

mod bitmap;
mod error;
mod font;
mod job;
mod label;
mod printer;
mod raster;

pub use crate::{
    bitmap::{pack, PackedBitmap},
    error::{DeviceFault, Error, TransportFault},
    font::FontSpec,
    job::PrintJob,
    label::{LabelSpec, WidthClass, DOTS_12MM},
    printer::{PrinterEndpoint, PrinterSession, SessionResult},
    raster::{render, Coverage, GlyphRaster, TextShaper},
};
