//! Legacy acceleration architecture: one setup call, then any number of
//! "subsequent" calls reusing it.
//!
//! The legacy architecture only ever draws into the screen pixmap, so every
//! operation addresses the whole of video memory as one surface.

use crate::backend::{Accel, checked_rop, hold};
use crate::config::AccelMethod;
use crate::engine::Engine;
use crate::error::AccelError;
use crate::prepared::{
    CopyDirection, CopySetup, Direction, FillSetup, OpKind, PatternSetup, Point, PreparedOp, Rect,
};
use bitfield_struct::bitfield;
use log::info;
use spitfire_regs::RegisterBus;

/// Largest offscreen pixmap the engine can address, in either direction.
pub const MAX_OFFSCREEN_EXTENT: u16 = 0xFFF;

/// Architecture-wide capabilities.
#[bitfield(u16, order = Lsb)]
#[derive(PartialEq, Eq)]
pub struct XaaFlags {
    pub pixmap_cache: bool,
    pub offscreen_pixmaps: bool,
    pub linear_framebuffer: bool,
    #[bits(13, default = 0)]
    _reserved: u16,
}

/// Restrictions of one accelerated operation.
#[bitfield(u16, order = Lsb)]
#[derive(PartialEq, Eq)]
pub struct OpFlags {
    /// Only full plane masks; the plane mask register is never written.
    pub no_planemask: bool,
    /// No colour-keyed copies.
    pub no_transparency: bool,
    /// Only colours with equal red, green and blue components.
    pub rgb_equal: bool,
    /// Pattern bits are consumed least significant first.
    pub bit_order_in_byte_lsbfirst: bool,
    /// The pattern origin is passed to the fill, not pre-rotated.
    pub hardware_pattern_programmed_origin: bool,
    #[bits(11, default = 0)]
    _reserved: u16,
}

/// Pixel rectangle `[x1, x2) × [y1, y2)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FbArea {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

/// Capability record handed to the server. An operation that is `None` is
/// never called.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct XaaInfo {
    pub flags: XaaFlags,
    pub screen_to_screen_copy: Option<OpFlags>,
    pub solid_fill: Option<OpFlags>,
    pub mono_8x8_pattern_fill: Option<OpFlags>,
    pub max_offscreen_width: u16,
    pub max_offscreen_height: u16,
    /// Area given to the framebuffer manager, onscreen and offscreen.
    pub framebuffer_area: FbArea,
}

impl XaaInfo {
    fn for_engine<B: RegisterBus>(engine: &Engine<B>) -> Self {
        let ctx = engine.context();
        let at_24bpp = ctx.bits_per_pixel() == 24;
        let pixmaps = ctx.pixmaps_supported();

        let restricted = OpFlags::new().with_no_planemask(true);
        Self {
            flags: XaaFlags::new()
                .with_pixmap_cache(true)
                .with_offscreen_pixmaps(true)
                .with_linear_framebuffer(true),
            screen_to_screen_copy: pixmaps.then_some(restricted.with_no_transparency(at_24bpp)),
            solid_fill: pixmaps.then_some(restricted.with_rgb_equal(at_24bpp)),
            mono_8x8_pattern_fill: (!at_24bpp).then_some(
                restricted
                    .with_bit_order_in_byte_lsbfirst(true)
                    .with_hardware_pattern_programmed_origin(true),
            ),
            max_offscreen_width: MAX_OFFSCREEN_EXTENT,
            max_offscreen_height: MAX_OFFSCREEN_EXTENT,
            framebuffer_area: FbArea {
                x1: 0,
                y1: 0,
                x2: ctx.usable_width(),
                y2: ctx.usable_height(),
            },
        }
    }
}

#[derive(Debug)]
pub struct XaaAccel<B> {
    engine: Engine<B>,
    pending: Option<PreparedOp>,
    info: XaaInfo,
}

impl<B: RegisterBus> XaaAccel<B> {
    #[must_use]
    pub fn new(engine: Engine<B>) -> Self {
        let info = XaaInfo::for_engine(&engine);
        let ctx = engine.context();
        info!(
            "Using {} lines for offscreen memory.",
            i64::from(ctx.usable_height()) - i64::from(ctx.virtual_height())
        );
        Self {
            engine,
            pending: None,
            info,
        }
    }

    #[must_use]
    pub const fn info(&self) -> &XaaInfo {
        &self.info
    }

    #[must_use]
    pub fn into_engine(self) -> Engine<B> {
        self.engine
    }

    /// `xdir`/`ydir` are `1` or `-1`; a `transparency_color` of `-1`
    /// disables colour keying. The plane mask is ignored.
    pub fn setup_for_screen_to_screen_copy(
        &mut self,
        xdir: i32,
        ydir: i32,
        rop: i32,
        _planemask: u32,
        transparency_color: i32,
    ) -> bool {
        let Some(rop) = checked_rop(&mut self.pending, rop) else {
            return false;
        };
        let setup = CopySetup {
            direction: CopyDirection {
                x: Direction::from_sign(xdir),
                y: Direction::from_sign(ydir),
            },
            rop,
            plane_mask: None,
            transparency: (transparency_color != -1).then_some(transparency_color.cast_unsigned()),
        };
        let screen = self.engine.context().screen();
        let prepared = self.engine.prepare_copy(&screen, &screen, &setup);
        hold(&mut self.pending, prepared)
    }

    /// Copy a `w` × `h` block from (`x1`, `y1`) to (`x2`, `y2`).
    ///
    /// # Errors
    /// See [`Engine::copy`]; [`AccelError::NotPrepared`] without a copy set up.
    pub fn subsequent_screen_to_screen_copy(
        &mut self,
        x1: u32,
        y1: u32,
        x2: u32,
        y2: u32,
        w: u32,
        h: u32,
    ) -> Result<(), AccelError> {
        let op = self
            .pending
            .as_ref()
            .and_then(PreparedOp::as_copy)
            .ok_or(AccelError::NotPrepared(OpKind::Copy))?;
        self.engine
            .copy(op, Point::new(x1, y1), Rect::new(x2, y2, w, h))
    }

    /// The plane mask is ignored.
    pub fn setup_for_solid_fill(&mut self, color: u32, rop: i32, _planemask: u32) -> bool {
        let Some(rop) = checked_rop(&mut self.pending, rop) else {
            return false;
        };
        let setup = FillSetup {
            color,
            rop,
            plane_mask: None,
        };
        let screen = self.engine.context().screen();
        let prepared = self.engine.prepare_solid_fill(&screen, &setup);
        hold(&mut self.pending, prepared)
    }

    /// # Errors
    /// See [`Engine::solid_fill`]; [`AccelError::NotPrepared`] without a fill
    /// set up.
    pub fn subsequent_solid_fill_rect(
        &mut self,
        x: u32,
        y: u32,
        w: u32,
        h: u32,
    ) -> Result<(), AccelError> {
        let op = self
            .pending
            .as_ref()
            .and_then(PreparedOp::as_solid_fill)
            .ok_or(AccelError::NotPrepared(OpKind::SolidFill))?;
        self.engine.solid_fill(op, Rect::new(x, y, w, h))
    }

    /// The pattern tile sits at (`patx`, `paty`) on the screen. A `bg` of
    /// `-1` leaves clear pattern bits transparent. The plane mask is ignored.
    pub fn setup_for_mono_8x8_pattern_fill(
        &mut self,
        patx: u32,
        paty: u32,
        fg: i32,
        bg: i32,
        rop: i32,
        _planemask: u32,
    ) -> bool {
        let Some(rop) = checked_rop(&mut self.pending, rop) else {
            return false;
        };
        let setup = PatternSetup {
            origin: Point::new(patx, paty),
            foreground: fg.cast_unsigned(),
            background: (bg != -1).then_some(bg.cast_unsigned()),
            rop,
        };
        let prepared = self.engine.prepare_mono_pattern(&setup);
        hold(&mut self.pending, prepared)
    }

    /// # Errors
    /// See [`Engine::mono_pattern_fill`]; [`AccelError::NotPrepared`] without
    /// a pattern fill set up.
    pub fn subsequent_mono_8x8_pattern_fill_rect(
        &mut self,
        patx: u32,
        paty: u32,
        x: u32,
        y: u32,
        w: u32,
        h: u32,
    ) -> Result<(), AccelError> {
        let op = self
            .pending
            .as_ref()
            .and_then(PreparedOp::as_pattern_fill)
            .ok_or(AccelError::NotPrepared(OpKind::PatternFill))?;
        self.engine
            .mono_pattern_fill(op, Point::new(patx, paty), Rect::new(x, y, w, h))
    }
}

impl<B: RegisterBus> Accel for XaaAccel<B> {
    type Bus = B;

    fn method(&self) -> AccelMethod {
        AccelMethod::Xaa
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
