//! Logical raster operations and their ternary ROP encodings.

use crate::error::InvalidRop;

/// The sixteen two-operand boolean functions, numbered like the X11 `GX*` codes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Rop {
    Clear = 0x0,
    And = 0x1,
    AndReverse = 0x2,
    Copy = 0x3,
    AndInverted = 0x4,
    Noop = 0x5,
    Xor = 0x6,
    Or = 0x7,
    Nor = 0x8,
    Equiv = 0x9,
    Invert = 0xa,
    OrReverse = 0xb,
    CopyInverted = 0xc,
    OrInverted = 0xd,
    Nand = 0xe,
    Set = 0xf,
}

impl Rop {
    pub const ALL: [Self; 16] = [
        Self::Clear,
        Self::And,
        Self::AndReverse,
        Self::Copy,
        Self::AndInverted,
        Self::Noop,
        Self::Xor,
        Self::Or,
        Self::Nor,
        Self::Equiv,
        Self::Invert,
        Self::OrReverse,
        Self::CopyInverted,
        Self::OrInverted,
        Self::Nand,
        Self::Set,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<i32> for Rop {
    type Error = InvalidRop;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        usize::try_from(value)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or(InvalidRop(value))
    }
}

/// Pattern operand against destination (`P`, `D`).
const SOLID_ROP: [u8; 16] = [
    0x00, // clear
    0xA0, // P and D
    0x50, // P and not D
    0xF0, // P
    0x0A, // not P and D
    0xAA, // D
    0x5A, // P xor D
    0xFA, // P or D
    0x05, // not P and not D
    0xA5, // not P xor D
    0x55, // not D
    0xF5, // P or not D
    0x0F, // not P
    0xAF, // not P or D
    0x5F, // not P or not D
    0xFF, // set
];

/// Source operand against destination (`S`, `D`).
const COPY_ROP: [u8; 16] = [
    0x00, // 0
    0x88, // DSa
    0x44, // SDna
    0xCC, // S
    0x22, // DSna
    0xAA, // D
    0x66, // DSx
    0xEE, // DSo
    0x11, // DSon
    0x99, // DSxn
    0x55, // Dn
    0xDD, // SDno
    0x33, // Sn
    0xBB, // DSno
    0x77, // DSan
    0xFF, // 1
];

/// Ternary ROP byte for a fill whose operand is the constant pattern.
#[must_use]
pub const fn solid_fill_rop(rop: Rop) -> u8 {
    SOLID_ROP[rop.index()]
}

/// Ternary ROP byte for an operation whose operand is the source pixmap.
#[must_use]
pub const fn copy_rop(rop: Rop) -> u8 {
    COPY_ROP[rop.index()]
}
