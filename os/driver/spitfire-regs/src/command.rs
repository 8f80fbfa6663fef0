use bitfield_struct::bitfield;

/// Layout of the command register (`0x7c`).
///
/// Writing the assembled word to [`COMMAND`](crate::offsets::COMMAND) starts
/// the operation; every other register must already be programmed.
#[bitfield(u32, order = Lsb)]
#[derive(PartialEq, Eq)]
pub struct CommandWord {
    /// Bit 0: Y-major line drawing.
    pub y_major: bool,

    /// Bit 1: Walk memory bottom-up.
    ///
    /// The Y offsets programmed with the operation must then name the
    /// bottommost line rather than the topmost one.
    pub decrement_y: bool,

    /// Bit 2: Walk memory right-to-left.
    ///
    /// The X offsets programmed with the operation must then name the
    /// rightmost pixel rather than the leftmost one.
    pub decrement_x: bool,

    #[bits(default = false)]
    _reserved_3: bool,

    /// Bits 4–5: Line endpoint handling (all, omit first, omit last, boundary).
    #[bits(2)]
    pub draw_mode: u8,

    /// Bits 6–7: Masking (none, boundary, mask map).
    #[bits(2)]
    pub mask_mode: u8,

    #[bits(4, default = 0)]
    _reserved_8_11: u8,

    /// Bits 12–15: Where the pattern comes from.
    #[bits(4)]
    pub pattern: PatternSource,

    /// Bits 16–17: Destination pixmap.
    #[bits(2)]
    pub destination: PixmapIndex,

    #[bits(2, default = 0)]
    _reserved_18_19: u8,

    /// Bits 20–21: Source pixmap.
    #[bits(2)]
    pub source: PixmapIndex,

    #[bits(2, default = 0)]
    _reserved_22_23: u8,

    /// Bits 24–27: Operation.
    #[bits(4)]
    pub opcode: Opcode,

    #[bits(default = false)]
    _reserved_28: bool,

    /// Bit 29: Foreground comes from the source pixmap instead of the
    /// foreground colour register.
    pub foreground_from_pixmap: bool,

    #[bits(default = false)]
    _reserved_30: bool,

    /// Bit 31: Background comes from the source pixmap instead of the
    /// background colour register.
    pub background_from_pixmap: bool,
}

/// One of the four pixmap descriptors the engine can reference.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum PixmapIndex {
    /// The mask map.
    Mask = 0,
    A = 1,
    B = 2,
    C = 3,
}

impl PixmapIndex {
    #[must_use]
    pub const fn into_bits(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn from_bits(value: u8) -> Self {
        match value & 0b11 {
            0 => Self::Mask,
            1 => Self::A,
            2 => Self::B,
            _ => Self::C,
        }
    }
}

/// Pattern source field of the command word.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PatternSource(u8);

impl PatternSource {
    pub const PIXMAP_A: Self = Self(0x1);
    pub const PIXMAP_B: Self = Self(0x2);
    pub const PIXMAP_C: Self = Self(0x3);
    /// Pattern is all foreground.
    pub const FOREGROUND: Self = Self(0x8);
    pub const FROM_SOURCE: Self = Self(0x9);

    #[must_use]
    pub const fn into_bits(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn from_bits(value: u8) -> Self {
        Self(value & 0xF)
    }
}

/// Opcode field of the command word.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Opcode(u8);

impl Opcode {
    pub const SHORT_STROKE_READ: Self = Self(0x2);
    pub const LINE_DRAW_READ: Self = Self(0x3);
    pub const SHORT_STROKE_WRITE: Self = Self(0x4);
    pub const LINE_DRAW_WRITE: Self = Self(0x5);
    pub const BITBLT: Self = Self(0x8);
    pub const INV_BITBLT: Self = Self(0x9);
    pub const FILL: Self = Self(0xa);
    pub const TEXT_BITBLT: Self = Self(0xb);
    pub const PATTERN_COPY: Self = Self(0xc);

    #[must_use]
    pub const fn into_bits(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn from_bits(value: u8) -> Self {
        Self(value & 0xF)
    }
}
