use bitfield_struct::bitfield;

/// Layout of the pixmap format register (`0x1c`).
#[bitfield(u8, order = Lsb)]
#[derive(PartialEq, Eq)]
pub struct PixmapFormat {
    /// Bits 0–2: Pixel depth code.
    #[bits(3)]
    pub depth: PixelDepth,

    /// Bit 3: Motorola (big-endian) byte order; clear for Intel order.
    pub big_endian: bool,

    #[bits(3, default = 0)]
    _reserved_4_6: u8,

    /// Bit 7: Pixmap lives in system memory rather than video memory.
    pub system_memory: bool,
}

impl PixmapFormat {
    /// Little-endian pixmap in video memory, the only kind the driver uses.
    #[must_use]
    pub const fn video_memory(depth: PixelDepth) -> Self {
        Self::new().with_depth(depth)
    }
}

/// Depth code of the pixmap format register.
///
/// There is no 24 bpp code; such pixmaps are programmed as [`PixelDepth::BPP8`]
/// three times as wide.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PixelDepth(u8);

impl PixelDepth {
    pub const BPP1: Self = Self(0x0);
    pub const BPP8: Self = Self(0x3);
    pub const BPP16: Self = Self(0x4);
    pub const BPP32: Self = Self(0x5);

    /// Depth code for a native pixel size, if the engine has one.
    #[must_use]
    pub const fn for_bits_per_pixel(bits_per_pixel: u8) -> Option<Self> {
        match bits_per_pixel {
            1 => Some(Self::BPP1),
            8 => Some(Self::BPP8),
            16 => Some(Self::BPP16),
            32 => Some(Self::BPP32),
            _ => None,
        }
    }

    #[must_use]
    pub const fn into_bits(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn from_bits(value: u8) -> Self {
        Self(value & 0b111)
    }
}
