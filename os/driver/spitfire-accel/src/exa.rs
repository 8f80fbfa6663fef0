//! Modern acceleration architecture: prepare / execute / done on pixmaps.

use crate::backend::{Accel, checked_rop, hold};
use crate::config::AccelMethod;
use crate::context::Surface;
use crate::engine::Engine;
use crate::error::AccelError;
use crate::prepared::{
    CopyDirection, CopySetup, Direction, FillSetup, OpKind, Point, PreparedOp, Rect,
};
use log::{error, info};
use spitfire_regs::RegisterBus;

/// Major version of the driver interface implemented here.
pub const EXA_VERSION_MAJOR: u8 = 2;
pub const EXA_VERSION_MINOR: u8 = 0;

/// Pixmap pitches must be a multiple of this many bytes.
pub const PIXMAP_PITCH_ALIGN: u32 = 32;
/// Pixmap offsets must be a multiple of this many bytes.
pub const PIXMAP_OFFSET_ALIGN: u32 = 8;
/// Coordinates are 12 bits wide.
pub const MAX_COORDINATE: u32 = 4096;

/// Capability record handed to the server.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ExaDriverInfo {
    pub exa_major: u8,
    pub exa_minor: u8,
    /// Physical address of video memory.
    pub memory_base: u64,
    pub memory_size: u32,
    /// First byte below the visible screen.
    pub offscreen_base: u32,
    /// Whether the offscreen memory manager may place pixmaps.
    pub offscreen_pixmaps: bool,
    pub pixmap_pitch_align: u32,
    pub pixmap_offset_align: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl ExaDriverInfo {
    fn for_engine<B: RegisterBus>(engine: &Engine<B>) -> Self {
        let ctx = engine.context();
        let offscreen_base = ctx.virtual_height().saturating_mul(ctx.pitch_bytes());
        let offscreen_pixmaps = ctx.total_memory_bytes() > offscreen_base;
        if !offscreen_pixmaps {
            error!("Not enough video RAM for EXA offscreen memory manager.");
        }
        Self {
            exa_major: EXA_VERSION_MAJOR,
            exa_minor: EXA_VERSION_MINOR,
            memory_base: ctx.frame_buffer_base(),
            memory_size: ctx.total_memory_bytes(),
            offscreen_base,
            offscreen_pixmaps,
            pixmap_pitch_align: PIXMAP_PITCH_ALIGN,
            pixmap_offset_align: PIXMAP_OFFSET_ALIGN,
            max_x: MAX_COORDINATE,
            max_y: MAX_COORDINATE,
        }
    }
}

#[derive(Debug)]
pub struct ExaAccel<B> {
    engine: Engine<B>,
    pending: Option<PreparedOp>,
    driver: ExaDriverInfo,
}

impl<B: RegisterBus> ExaAccel<B> {
    #[must_use]
    pub fn new(engine: Engine<B>) -> Self {
        let driver = ExaDriverInfo::for_engine(&engine);
        info!("Spitfire EXA Acceleration enabled.");
        Self {
            engine,
            pending: None,
            driver,
        }
    }

    #[must_use]
    pub const fn driver(&self) -> &ExaDriverInfo {
        &self.driver
    }

    #[must_use]
    pub fn into_engine(self) -> Engine<B> {
        self.engine
    }

    /// Set up solid fills of `pixmap`; `false` asks the server to draw in
    /// software.
    pub fn prepare_solid(&mut self, pixmap: &Surface, alu: i32, planemask: u32, fg: u32) -> bool {
        let Some(rop) = checked_rop(&mut self.pending, alu) else {
            return false;
        };
        let setup = FillSetup {
            color: fg,
            rop,
            plane_mask: Some(planemask),
        };
        let prepared = self.engine.prepare_solid_fill(pixmap, &setup);
        hold(&mut self.pending, prepared)
    }

    /// Fill the box `[x1, x2) × [y1, y2)`. Empty boxes draw nothing.
    ///
    /// # Errors
    /// See [`Engine::solid_fill`]; [`AccelError::NotPrepared`] outside a
    /// prepared solid fill.
    pub fn solid(&mut self, x1: u32, y1: u32, x2: u32, y2: u32) -> Result<(), AccelError> {
        let op = self
            .pending
            .as_ref()
            .and_then(PreparedOp::as_solid_fill)
            .ok_or(AccelError::NotPrepared(OpKind::SolidFill))?;
        if x2 <= x1 || y2 <= y1 {
            return Ok(());
        }
        self.engine.solid_fill(op, Rect::new(x1, y1, x2 - x1, y2 - y1))
    }

    pub fn done_solid(&mut self) {
        self.pending = None;
    }

    /// Set up copies from `src` to `dst`; `false` asks the server to copy in
    /// software. Negative `xdir`/`ydir` walk right-to-left/bottom-up.
    pub fn prepare_copy(
        &mut self,
        src: &Surface,
        dst: &Surface,
        xdir: i32,
        ydir: i32,
        alu: i32,
        planemask: u32,
    ) -> bool {
        let Some(rop) = checked_rop(&mut self.pending, alu) else {
            return false;
        };
        let setup = CopySetup {
            direction: CopyDirection {
                x: Direction::from_sign(xdir),
                y: Direction::from_sign(ydir),
            },
            rop,
            plane_mask: Some(planemask),
            transparency: None,
        };
        let prepared = self.engine.prepare_copy(src, dst, &setup);
        hold(&mut self.pending, prepared)
    }

    /// Copy a `width` × `height` block. Empty blocks draw nothing.
    ///
    /// # Errors
    /// See [`Engine::copy`]; [`AccelError::NotPrepared`] outside a prepared
    /// copy.
    pub fn copy(
        &mut self,
        src_x: u32,
        src_y: u32,
        dst_x: u32,
        dst_y: u32,
        width: u32,
        height: u32,
    ) -> Result<(), AccelError> {
        let op = self
            .pending
            .as_ref()
            .and_then(PreparedOp::as_copy)
            .ok_or(AccelError::NotPrepared(OpKind::Copy))?;
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.engine.copy(
            op,
            Point::new(src_x, src_y),
            Rect::new(dst_x, dst_y, width, height),
        )
    }

    pub fn done_copy(&mut self) {
        self.pending = None;
    }

    /// Markers are not tracked; waits for the engine to go idle.
    pub fn wait_marker(&mut self, _marker: i32) {
        self.sync();
    }
}

impl<B: RegisterBus> Accel for ExaAccel<B> {
    type Bus = B;

    fn method(&self) -> AccelMethod {
        AccelMethod::Exa
    }

    fn engine(&self) -> &Engine<B> {
        &self.engine
    }

    fn engine_mut(&mut self) -> &mut Engine<B> {
        &mut self.engine
    }

    fn pending(&self) -> Option<OpKind> {
        self.pending.as_ref().map(PreparedOp::kind)
    }
}
