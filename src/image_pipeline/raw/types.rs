//! Pixel layout descriptors for raw sensor data

use std::fmt;

/// Position of the red sample inside the 2x2 Bayer cell, named by the
/// first two samples of the first row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BayerPattern {
    Gr,
    Rg,
    Gb,
    Bg,
}

impl BayerPattern {
    /// Color index (0 = R, 1 = G, 2 = B) sampled at `(x, y)`.
    pub fn color_at(self, x: usize, y: usize) -> usize {
        let (row0, row1) = match self {
            BayerPattern::Gr => ([1, 0], [2, 1]),
            BayerPattern::Rg => ([0, 1], [1, 2]),
            BayerPattern::Gb => ([1, 2], [0, 1]),
            BayerPattern::Bg => ([2, 1], [1, 0]),
        };
        if y % 2 == 0 { row0[x % 2] } else { row1[x % 2] }
    }

    pub(crate) fn cfa(self) -> bayer::CFA {
        match self {
            BayerPattern::Gr => bayer::CFA::GRBG,
            BayerPattern::Rg => bayer::CFA::RGGB,
            BayerPattern::Gb => bayer::CFA::GBRG,
            BayerPattern::Bg => bayer::CFA::BGGR,
        }
    }
}

/// Color arrangement of a pixel format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorLayout {
    Mono,
    Bayer(BayerPattern),
    Rgb,
}

/// Sensor pixel formats, encoded with their GenICam PFNC codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum PixelFormat {
    Mono8 = 0x0108_0001,
    BayerGR8 = 0x0108_0008,
    BayerRG8 = 0x0108_0009,
    BayerGB8 = 0x0108_000A,
    BayerBG8 = 0x0108_000B,
    Mono12Packed = 0x010C_0047,
    BayerGR12Packed = 0x010C_0057,
    BayerBG12Packed = 0x010C_0053,
    BayerGB12Packed = 0x010C_002C,
    BayerRG12Packed = 0x010C_002B,
    Mono16 = 0x0110_0007,
    BayerGR16 = 0x0110_002E,
    BayerBG16 = 0x0110_0031,
    BayerRG16 = 0x0110_002F,
    BayerGB16 = 0x0110_0030,
    Rgb8 = 0x0218_0014,
    Rgb16 = 0x0230_0033,
    Invalid = 0,
}

impl PixelFormat {
    /// Maps a stored format code back to the enum. Unknown codes become
    /// `Invalid`.
    pub fn from_code(code: u32) -> Self {
        use PixelFormat::*;
        [
            Mono8,
            BayerGR8,
            BayerRG8,
            BayerGB8,
            BayerBG8,
            Mono12Packed,
            BayerGR12Packed,
            BayerBG12Packed,
            BayerGB12Packed,
            BayerRG12Packed,
            Mono16,
            BayerGR16,
            BayerBG16,
            BayerRG16,
            BayerGB16,
            Rgb8,
            Rgb16,
        ]
        .into_iter()
        .find(|f| f.code() == code)
        .unwrap_or(Invalid)
    }

    pub fn code(self) -> u32 {
        self as u32
    }

    pub fn layout(self) -> Option<ColorLayout> {
        use PixelFormat::*;
        let layout = match self {
            Mono8 | Mono12Packed | Mono16 => ColorLayout::Mono,
            BayerGR8 | BayerGR12Packed | BayerGR16 => ColorLayout::Bayer(BayerPattern::Gr),
            BayerRG8 | BayerRG12Packed | BayerRG16 => ColorLayout::Bayer(BayerPattern::Rg),
            BayerGB8 | BayerGB12Packed | BayerGB16 => ColorLayout::Bayer(BayerPattern::Gb),
            BayerBG8 | BayerBG12Packed | BayerBG16 => ColorLayout::Bayer(BayerPattern::Bg),
            Rgb8 | Rgb16 => ColorLayout::Rgb,
            Invalid => return None,
        };
        Some(layout)
    }

    /// Significant bits per sample; 0 for `Invalid`.
    pub fn bit_depth(self) -> u32 {
        use PixelFormat::*;
        match self {
            Mono8 | BayerGR8 | BayerRG8 | BayerGB8 | BayerBG8 | Rgb8 => 8,
            Mono12Packed | BayerGR12Packed | BayerBG12Packed | BayerGB12Packed
            | BayerRG12Packed => 12,
            Mono16 | BayerGR16 | BayerBG16 | BayerRG16 | BayerGB16 | Rgb16 => 16,
            Invalid => 0,
        }
    }

    pub fn is_packed(self) -> bool {
        self.bit_depth() == 12
    }

    pub fn channel_count(self) -> usize {
        match self.layout() {
            Some(ColorLayout::Rgb) => 3,
            Some(_) => 1,
            None => 0,
        }
    }

    /// Bits occupied by one pixel in the stored buffer.
    pub fn bits_per_pixel(self) -> usize {
        self.bit_depth() as usize * self.channel_count()
    }

    pub fn is_mono(self) -> bool {
        matches!(self.layout(), Some(ColorLayout::Mono))
    }

    pub fn is_color(self) -> bool {
        matches!(self.layout(), Some(ColorLayout::Bayer(_) | ColorLayout::Rgb))
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use PixelFormat::*;
        let name = match self {
            Mono8 => "Mono8",
            BayerGR8 => "BayerGR8",
            BayerRG8 => "BayerRG8",
            BayerGB8 => "BayerGB8",
            BayerBG8 => "BayerBG8",
            Mono12Packed => "Mono12Packed",
            BayerGR12Packed => "BayerGR12Packed",
            BayerBG12Packed => "BayerBG12Packed",
            BayerGB12Packed => "BayerGB12Packed",
            BayerRG12Packed => "BayerRG12Packed",
            Mono16 => "Mono16",
            BayerGR16 => "BayerGR16",
            BayerBG16 => "BayerBG16",
            BayerRG16 => "BayerRG16",
            BayerGB16 => "BayerGB16",
            Rgb8 => "RGB8",
            Rgb16 => "RGB16",
            Invalid => "INVALID",
        };
        f.write_str(name)
    }
}

/// Byte order of multi-byte samples in the stored buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum PixelEndianness {
    #[default]
    Undefined = 0,
    Big = 1,
    Little = 2,
}

impl PixelEndianness {
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(PixelEndianness::Undefined),
            1 => Some(PixelEndianness::Big),
            2 => Some(PixelEndianness::Little),
            _ => None,
        }
    }

    pub fn code(self) -> u32 {
        self as u32
    }

    pub fn native() -> Self {
        if cfg!(target_endian = "big") {
            PixelEndianness::Big
        } else {
            PixelEndianness::Little
        }
    }
}
