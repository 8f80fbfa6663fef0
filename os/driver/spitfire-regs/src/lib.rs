//! # Typed Spitfire 64111 Drawing Engine Registers
//!
//! Register offsets, bit layouts and the bus abstraction used to program the
//! memory-mapped command processor of the Oak Spitfire 64111.
//!
//! ## Overview
//!
//! The drawing engine is driven entirely through a small bank of registers
//! at fixed byte offsets from the MMIO base. This crate keeps that contract in
//! one place:
//!
//! | Item | Purpose |
//! |------|---------|
//! | [`RegisterBus`] | Byte/halfword/word accessors at an offset from the MMIO base. |
//! | [`Mmio`] | Volatile implementation of [`RegisterBus`] over a mapped pointer. |
//! | [`offsets`] | The register map. |
//! | [`CommandWord`] | Layout of the command/trigger register (`0x7c`). |
//! | [`PixmapFormat`] | Layout of the pixmap format register (`0x1c`). |
//! | [`CompareCondition`] | Destination colour-compare condition codes (`0x4a`). |
//!
//! ## Usage
//!
//! ```rust
//! use spitfire_regs::{CommandWord, Opcode, PatternSource, PixmapIndex};
//!
//! let cmd = CommandWord::new()
//!     .with_opcode(Opcode::BITBLT)
//!     .with_source(PixmapIndex::A)
//!     .with_pattern(PatternSource::FOREGROUND)
//!     .with_destination(PixmapIndex::C)
//!     .with_decrement_x(true);
//! assert_eq!(cmd.into_bits(), 0x0813_8004);
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

mod bus;
mod command;
mod compare;
mod format;
#[cfg(feature = "mmio")]
mod mmio;
pub mod offsets;

pub use bus::RegisterBus;
pub use command::{CommandWord, Opcode, PatternSource, PixmapIndex};
pub use compare::CompareCondition;
pub use format::{PixelDepth, PixmapFormat};
#[cfg(feature = "mmio")]
pub use mmio::Mmio;

/// Busy flag in the status register ([`offsets::CP_STATUS`]).
pub const CP_BUSY: u8 = 0x80;
