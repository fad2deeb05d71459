/// Dots printed per raster row on 12mm tape (48 dots at 4 dots/mm).
pub const DOTS_12MM: u32 = 48;

/// Physical label tape width classes the device understands.
///
/// This is a closed set: the print head geometry of each class has to be
/// confirmed against the device before a variant can be added. 6mm and
/// 18mm tape are reserved for exactly that reason and have no variant yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidthClass {
    /// 12mm continuous tape.
    W12,
}

impl WidthClass {
    /// Printable dots across the tape for this width class.
    pub fn dots_per_row(self) -> u32 {
        match self {
            Self::W12 => DOTS_12MM,
        }
    }

    /// Width-class code byte carried in the print raster frame so the
    /// device can reject a request that does not match the installed tape.
    pub fn code(self) -> u8 {
        match self {
            Self::W12 => 0x0C, // tape width in mm
        }
    }
}

/// Geometry of the label a single job prints on.
///
/// Built once per job and immutable afterwards; the rasterizer sizes its
/// output from `dots_per_row` and the session stamps `width_class` into
/// the wire frame.
#[derive(Debug, Clone, Copy)]
pub struct LabelSpec {
    width_class: WidthClass,
    dots_per_row: u32,
}

impl LabelSpec {
    pub fn new(width_class: WidthClass) -> Self {
        LabelSpec {
            width_class,
            dots_per_row: width_class.dots_per_row(),
        }
    }

    pub fn width_class(&self) -> WidthClass {
        self.width_class
    }

    /// Height in pixels of every raster produced for this label.
    pub fn dots_per_row(&self) -> u32 {
        self.dots_per_row
    }
}
