//! # Spitfire 64111 2D Acceleration
//!
//! Turns solid fills, screen-to-screen copies and mono 8×8 pattern fills into
//! register programs for the Oak Spitfire 64111 drawing engine.
//!
//! ## Overview
//!
//! | Layer | Purpose |
//! |-------|---------|
//! | [`Engine`] | Setup/execute protocol against the one shared command processor. |
//! | [`XaaAccel`] | Legacy architecture: setup once, then "subsequent" rectangles on the screen. |
//! | [`ExaAccel`] | Modern architecture: prepare / execute / done on arbitrary pixmaps. |
//! | [`init_accel`] | Picks and builds an architecture from the driver options. |
//! | [`SharedEngine`] | Serializes whole setup/execute sequences between threads. |
//!
//! Every setup returns a prepared-operation token. Executes take that token,
//! so an execute without a setup does not compile, and a token whose setup
//! has since been overwritten is refused with [`AccelError::Superseded`].
//!
//! ## 24 bpp
//!
//! The engine has no 24 bpp pixel format. Such surfaces are programmed as
//! 8 bpp three times as wide, which only works for pitches below 4096 bytes,
//! for copies between two 24 bpp surfaces and for fills whose colour bytes
//! are all equal. Anything else is refused with
//! [`AccelError::NotAccelerated`] and has to be drawn in software.
//!
//! ## Usage
//!
//! ```rust
//! use spitfire_accel::{
//!     DisplayMode, Engine, EngineConfig, EngineContext, FillSetup, FramebufferLayout, Rect, Rop,
//! };
//! use spitfire_regs::{RegisterBus, offsets};
//!
//! /// Records the trigger register, reports the engine as idle.
//! #[derive(Default)]
//! struct Trigger(Vec<u32>);
//!
//! impl RegisterBus for Trigger {
//!     fn read8(&mut self, _: u16) -> u8 { 0 }
//!     fn read16(&mut self, _: u16) -> u16 { 0 }
//!     fn read32(&mut self, _: u16) -> u32 { 0 }
//!     fn write8(&mut self, _: u16, _: u8) {}
//!     fn write16(&mut self, _: u16, _: u16) {}
//!     fn write32(&mut self, offset: u16, value: u32) {
//!         if offset == offsets::COMMAND {
//!             self.0.push(value);
//!         }
//!     }
//! }
//!
//! let ctx = EngineContext::new(
//!     FramebufferLayout { base: 0xE000_0000, total_bytes: 4 << 20 },
//!     DisplayMode { bits_per_pixel: 16, virtual_width: 1024, virtual_height: 768 },
//! )?;
//! let mut engine = Engine::new(Trigger::default(), ctx, EngineConfig::default());
//!
//! let screen = engine.context().screen();
//! let fill = engine.prepare_solid_fill(
//!     &screen,
//!     &FillSetup { color: 0xF800, rop: Rop::Copy, plane_mask: None },
//! )?;
//! engine.solid_fill(&fill, Rect::new(10, 10, 100, 50))?;
//! engine.solid_fill(&fill, Rect::new(200, 10, 100, 50))?;
//!
//! assert_eq!(engine.bus().0, [0x0A03_8000; 2]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

mod backend;
mod config;
mod context;
mod engine;
mod error;
mod exa;
mod init;
pub mod pixmap;
mod prepared;
mod rop;
mod shared;
#[cfg(feature = "xaa")]
mod xaa;

pub use backend::{Accel, Accelerator};
pub use config::{
    AccelMethod, AccelOptions, DEFAULT_POLL_LIMIT, EngineConfig, FillRop, OptionError, Rotation,
    StallPolicy, name_eq,
};
pub use context::{ALIASED_PITCH_LIMIT, DisplayMode, EngineContext, FramebufferLayout, Surface};
pub use engine::{Engine, EngineStats, is_gray};
pub use error::{AccelError, EngineStalled, Fallback, InitError, InvalidRop};
pub use exa::{
    EXA_VERSION_MAJOR, EXA_VERSION_MINOR, ExaAccel, ExaDriverInfo, MAX_COORDINATE,
    PIXMAP_OFFSET_ALIGN, PIXMAP_PITCH_ALIGN,
};
pub use init::init_accel;
pub use prepared::{
    CopyDirection, CopySetup, Direction, FillSetup, OpKind, PatternSetup, Point, PreparedCopy,
    PreparedOp, PreparedPattern, PreparedSolidFill, Rect,
};
pub use rop::{Rop, copy_rop, solid_fill_rop};
pub use shared::{EngineGuard, SharedEngine};
#[cfg(feature = "xaa")]
pub use xaa::{FbArea, MAX_OFFSCREEN_EXTENT, OpFlags, XaaAccel, XaaFlags, XaaInfo};
