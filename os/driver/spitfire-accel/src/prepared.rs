//! Setup parameters and the prepared-operation tokens handed from setup to
//! execute.
//!
//! A token carries the command word cached by its setup call together with
//! whatever execute needs to reproduce the setup's view of the geometry. The
//! execute calls only accept a token of the matching kind, and a token whose
//! setup has since been overwritten by another one is refused.

use crate::rop::Rop;
use core::fmt;
use spitfire_regs::CommandWord;

/// Addressing direction along one axis.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    /// Increasing addresses, anchored at the top-left pixel.
    #[default]
    Forward,
    /// Decreasing addresses, anchored at the bottom-right pixel.
    Backward,
}

impl Direction {
    /// Negative signs walk backward, anything else forward.
    #[must_use]
    pub const fn from_sign(sign: i32) -> Self {
        if sign < 0 {
            Self::Backward
        } else {
            Self::Forward
        }
    }

    #[must_use]
    pub const fn is_backward(self) -> bool {
        matches!(self, Self::Backward)
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct CopyDirection {
    pub x: Direction,
    pub y: Direction,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    #[must_use]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Screen-to-screen copy parameters.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CopySetup {
    pub direction: CopyDirection,
    pub rop: Rop,
    /// Written to the plane mask register when present.
    pub plane_mask: Option<u32>,
    /// Source pixels of this colour leave the destination untouched.
    pub transparency: Option<u32>,
}

/// Solid rectangle fill parameters.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FillSetup {
    pub color: u32,
    pub rop: Rop,
    /// Written to the plane mask register when present.
    pub plane_mask: Option<u32>,
}

/// Mono 8×8 pattern fill parameters.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PatternSetup {
    /// Screen position of the 8×8 one-bit tile in video memory.
    pub origin: Point,
    pub foreground: u32,
    /// `None` leaves the destination untouched where the pattern is clear.
    pub background: Option<u32>,
    pub rop: Rop,
}

#[derive(Debug, PartialEq, Eq)]
pub struct PreparedCopy {
    pub(crate) command: CommandWord,
    pub(crate) aliased: bool,
    pub(crate) epoch: u32,
}

#[derive(Debug, PartialEq, Eq)]
pub struct PreparedSolidFill {
    pub(crate) command: CommandWord,
    pub(crate) aliased: bool,
    pub(crate) epoch: u32,
}

#[derive(Debug, PartialEq, Eq)]
pub struct PreparedPattern {
    pub(crate) command: CommandWord,
    pub(crate) epoch: u32,
}

macro_rules! command_accessor {
    ($($ty:ty),*) => {$(
        impl $ty {
            /// Command word that execute writes to the trigger register.
            #[must_use]
            pub const fn command(&self) -> CommandWord {
                self.command
            }
        }
    )*};
}

command_accessor!(PreparedCopy, PreparedSolidFill, PreparedPattern);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OpKind {
    Copy,
    SolidFill,
    PatternFill,
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Copy => "copy",
            Self::SolidFill => "solid fill",
            Self::PatternFill => "pattern fill",
        })
    }
}

/// Whichever operation is currently set up, held by a backend between its
/// setup and execute callbacks.
#[derive(Debug, PartialEq, Eq)]
pub enum PreparedOp {
    Copy(PreparedCopy),
    SolidFill(PreparedSolidFill),
    PatternFill(PreparedPattern),
}

impl PreparedOp {
    #[must_use]
    pub const fn kind(&self) -> OpKind {
        match self {
            Self::Copy(_) => OpKind::Copy,
            Self::SolidFill(_) => OpKind::SolidFill,
            Self::PatternFill(_) => OpKind::PatternFill,
        }
    }

    #[must_use]
    pub const fn command(&self) -> CommandWord {
        match self {
            Self::Copy(op) => op.command,
            Self::SolidFill(op) => op.command,
            Self::PatternFill(op) => op.command,
        }
    }

    #[must_use]
    pub const fn as_copy(&self) -> Option<&PreparedCopy> {
        match self {
            Self::Copy(op) => Some(op),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_solid_fill(&self) -> Option<&PreparedSolidFill> {
        match self {
            Self::SolidFill(op) => Some(op),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_pattern_fill(&self) -> Option<&PreparedPattern> {
        match self {
            Self::PatternFill(op) => Some(op),
            _ => None,
        }
    }
}

impl From<PreparedCopy> for PreparedOp {
    fn from(op: PreparedCopy) -> Self {
        Self::Copy(op)
    }
}

impl From<PreparedSolidFill> for PreparedOp {
    fn from(op: PreparedSolidFill) -> Self {
        Self::SolidFill(op)
    }
}

impl From<PreparedPattern> for PreparedOp {
    fn from(op: PreparedPattern) -> Self {
        Self::PatternFill(op)
    }
}
