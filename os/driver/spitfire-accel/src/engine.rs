//! The setup/execute protocol against the command processor.
//!
//! Every operation is split in two. A *prepare* call reprograms the global
//! engine state (pixmap descriptors, colours, compare, ROP) and returns a
//! token with the cached command word. An *execute* call supplies the
//! per-rectangle geometry and writes the command word, which starts the
//! engine. Both halves wait for the engine to go idle first: the registers
//! are shared with whatever operation is still running, and the two halves
//! may be separated by unrelated calls.

use crate::config::{EngineConfig, FillRop, StallPolicy};
use crate::context::{EngineContext, Surface};
use crate::error::{AccelError, EngineStalled, Fallback};
use crate::pixmap::{program_mono_tile, program_surface, register_value};
use crate::prepared::{
    CopySetup, FillSetup, PatternSetup, Point, PreparedCopy, PreparedPattern, PreparedSolidFill,
    Rect,
};
use crate::rop::{copy_rop, solid_fill_rop};
use log::{debug, trace, warn};
use spitfire_regs::{
    CP_BUSY, CommandWord, CompareCondition, Opcode, PatternSource, PixmapIndex, RegisterBus,
    offsets,
};

/// Background written for transparent pattern fills; the engine ignores it
/// because the background then comes from the source pixmap.
const TRANSPARENT_BACKGROUND: u32 = 0xFFFF_FFFF;

/// Counters kept across the life of the engine.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct EngineStats {
    /// Command words written to the trigger register.
    pub submitted: u64,
    /// Waits that ran out of polls.
    pub stalls: u32,
    /// Setups refused as not accelerable.
    pub fallbacks: u32,
}

#[derive(Debug)]
pub struct Engine<B> {
    bus: B,
    ctx: EngineContext,
    config: EngineConfig,
    /// Bumped whenever a setup starts reprogramming shared state.
    epoch: u32,
    stats: EngineStats,
}

impl<B: RegisterBus> Engine<B> {
    #[must_use]
    pub const fn new(bus: B, ctx: EngineContext, config: EngineConfig) -> Self {
        Self {
            bus,
            ctx,
            config,
            epoch: 0,
            stats: EngineStats {
                submitted: 0,
                stalls: 0,
                fallbacks: 0,
            },
        }
    }

    #[must_use]
    pub const fn context(&self) -> &EngineContext {
        &self.ctx
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub const fn stats(&self) -> EngineStats {
        self.stats
    }

    #[must_use]
    pub const fn bus(&self) -> &B {
        &self.bus
    }

    pub const fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    #[must_use]
    pub fn into_bus(self) -> B {
        self.bus
    }

    pub fn is_busy(&mut self) -> bool {
        self.bus.read8(offsets::CP_STATUS) & CP_BUSY != 0
    }

    /// Spin until the busy bit clears.
    ///
    /// Returns the number of polls that still saw the engine busy.
    ///
    /// # Errors
    /// [`EngineStalled`] once [`EngineConfig::poll_limit`] polls have all
    /// seen the engine busy.
    pub fn wait_idle(&mut self) -> Result<u32, EngineStalled> {
        let limit = self.config.poll_limit;
        let mut polls = 0;
        while self.is_busy() {
            if polls == limit {
                return Err(EngineStalled { polls });
            }
            polls += 1;
            core::hint::spin_loop();
        }
        Ok(polls)
    }

    /// [`wait_idle`](Self::wait_idle), counting stalls in the statistics.
    ///
    /// # Errors
    /// [`EngineStalled`] when the poll budget ran out.
    pub fn sync(&mut self) -> Result<u32, EngineStalled> {
        self.wait_idle()
            .inspect_err(|_| self.stats.stalls = self.stats.stalls.saturating_add(1))
    }

    /// Wait before touching shared registers, applying the stall policy.
    fn barrier(&mut self) -> Result<(), AccelError> {
        match self.sync() {
            Ok(_) => Ok(()),
            Err(stalled) => match self.config.stall_policy {
                StallPolicy::Ignore => {
                    warn!("{stalled}, programming anyway");
                    Ok(())
                }
                StallPolicy::Abort => {
                    warn!("{stalled}, giving up");
                    Err(stalled.into())
                }
            },
        }
    }

    fn refuse<T>(&mut self, reason: Fallback) -> Result<T, AccelError> {
        self.stats.fallbacks = self.stats.fallbacks.saturating_add(1);
        debug!("falling back to software: {reason}");
        Err(reason.into())
    }

    /// Start reprogramming shared state; tokens from earlier setups go stale.
    fn claim(&mut self) -> Result<u32, AccelError> {
        self.barrier()?;
        self.epoch = self.epoch.wrapping_add(1);
        Ok(self.epoch)
    }

    fn check(&self, epoch: u32) -> Result<(), AccelError> {
        if epoch == self.epoch {
            Ok(())
        } else {
            Err(AccelError::Superseded)
        }
    }

    fn submit(&mut self, command: CommandWord) {
        trace!("submit {:#010x}", command.into_bits());
        self.bus.write32(offsets::COMMAND, command.into_bits());
        self.stats.submitted = self.stats.submitted.saturating_add(1);
    }

    fn write_plane_mask(&mut self, plane_mask: Option<u32>) {
        if let Some(mask) = plane_mask {
            self.bus.write32(offsets::PIXEL_BITMASK, mask);
        }
    }

    fn write_compare(&mut self, color: u32, condition: CompareCondition) {
        self.bus.write32(offsets::DEST_CC_COLOR, color);
        self.bus.write32(offsets::DEST_CC_COND, condition.into_bits());
    }

    fn write_dimensions(&mut self, width: u32, height: u32) {
        debug_assert!(width > 0 && height > 0, "empty {width}x{height} operation");
        self.bus
            .write16(offsets::OP_DIM_1, register_value(width.wrapping_sub(1)));
        self.bus
            .write16(offsets::OP_DIM_2, register_value(height.wrapping_sub(1)));
    }

    /// Set up a bit-block transfer from `src` to `dst`.
    ///
    /// # Errors
    /// [`AccelError::NotAccelerated`] when the surfaces cannot be expressed
    /// (mixed 24 bpp depths, unsupported depths, 24 bpp pitch too wide), or
    /// [`AccelError::Stalled`] under [`StallPolicy::Abort`].
    pub fn prepare_copy(
        &mut self,
        src: &Surface,
        dst: &Surface,
        setup: &CopySetup,
    ) -> Result<PreparedCopy, AccelError> {
        if (src.is_24bpp() || dst.is_24bpp()) && src.bits_per_pixel != dst.bits_per_pixel {
            let other = if src.is_24bpp() {
                dst.bits_per_pixel
            } else {
                src.bits_per_pixel
            };
            return self.refuse(Fallback::CrossDepthCopy(other));
        }
        if let Err(reason) = src.engine_geometry().and(dst.engine_geometry()) {
            return self.refuse(reason);
        }

        let command = CommandWord::new()
            .with_opcode(Opcode::BITBLT)
            .with_source(PixmapIndex::A)
            .with_pattern(PatternSource::FOREGROUND)
            .with_destination(PixmapIndex::C)
            .with_foreground_from_pixmap(true)
            .with_background_from_pixmap(true)
            .with_decrement_x(setup.direction.x.is_backward())
            .with_decrement_y(setup.direction.y.is_backward());

        let epoch = self.claim()?;

        self.write_plane_mask(setup.plane_mask);
        match setup.transparency {
            Some(key) => self.write_compare(key, CompareCondition::UPDATE_IF_NOT_EQUAL),
            None => self.write_compare(0, CompareCondition::ALWAYS_UPDATE),
        }
        self.bus.write8(offsets::ROP_MIX, copy_rop(setup.rop));

        program_surface(&mut self.bus, PixmapIndex::A, src)?;
        program_surface(&mut self.bus, PixmapIndex::C, dst)?;

        Ok(PreparedCopy {
            command,
            aliased: dst.is_24bpp(),
            epoch,
        })
    }

    /// Copy the `dst.width` × `dst.height` block at `src` to `dst`.
    ///
    /// Coordinates are in destination pixels.
    ///
    /// # Errors
    /// [`AccelError::Superseded`] if another setup ran since `op` was
    /// prepared, or [`AccelError::Stalled`] under [`StallPolicy::Abort`].
    pub fn copy(&mut self, op: &PreparedCopy, src: Point, dst: Rect) -> Result<(), AccelError> {
        self.check(op.epoch)?;

        let (src_x, dst_x, width) = if op.aliased {
            (src.x * 3, dst.x * 3, dst.width * 3)
        } else {
            (src.x, dst.x, dst.width)
        };

        self.barrier()?;
        self.write_dimensions(width, dst.height);

        // Walking backward, the engine starts at the far edge of the block.
        let (src_x, dst_x) = if op.command.decrement_x() {
            (last(src_x, width), last(dst_x, width))
        } else {
            (src_x, dst_x)
        };
        self.bus.write16(offsets::OFFSET_X_SRC, register_value(src_x));
        self.bus.write16(offsets::OFFSET_X_DST, register_value(dst_x));

        let (src_y, dst_y) = if op.command.decrement_y() {
            (last(src.y, dst.height), last(dst.y, dst.height))
        } else {
            (src.y, dst.y)
        };
        self.bus.write16(offsets::OFFSET_Y_SRC, register_value(src_y));
        self.bus.write16(offsets::OFFSET_Y_DST, register_value(dst_y));

        self.submit(op.command);
        Ok(())
    }

    /// Set up solid rectangle fills on `dst`.
    ///
    /// # Errors
    /// [`AccelError::NotAccelerated`] for non-gray colours at 24 bpp and
    /// surfaces that cannot be expressed, or [`AccelError::Stalled`] under
    /// [`StallPolicy::Abort`].
    pub fn prepare_solid_fill(
        &mut self,
        dst: &Surface,
        setup: &FillSetup,
    ) -> Result<PreparedSolidFill, AccelError> {
        if dst.is_24bpp() && !is_gray(setup.color) {
            return self.refuse(Fallback::NonGrayFill(setup.color));
        }
        if let Err(reason) = dst.engine_geometry() {
            return self.refuse(reason);
        }

        let command = CommandWord::new()
            .with_opcode(Opcode::FILL)
            .with_pattern(PatternSource::FOREGROUND)
            .with_destination(PixmapIndex::C);

        let epoch = self.claim()?;

        self.bus.write32(offsets::FG_COLOR, setup.color);
        self.bus.write32(offsets::BG_COLOR, setup.color);
        self.write_plane_mask(setup.plane_mask);
        self.write_compare(0, CompareCondition::ALWAYS_UPDATE);
        let mix = match self.config.fill_rop {
            FillRop::Copy => copy_rop(setup.rop),
            FillRop::Solid => solid_fill_rop(setup.rop),
        };
        self.bus.write8(offsets::ROP_MIX, mix);

        program_surface(&mut self.bus, PixmapIndex::C, dst)?;

        Ok(PreparedSolidFill {
            command,
            aliased: dst.is_24bpp(),
            epoch,
        })
    }

    /// Fill `rect` with the prepared colour.
    ///
    /// # Errors
    /// [`AccelError::Superseded`] if another setup ran since `op` was
    /// prepared, or [`AccelError::Stalled`] under [`StallPolicy::Abort`].
    pub fn solid_fill(&mut self, op: &PreparedSolidFill, rect: Rect) -> Result<(), AccelError> {
        self.check(op.epoch)?;

        let (x, width) = if op.aliased {
            (rect.x * 3, rect.width * 3)
        } else {
            (rect.x, rect.width)
        };

        self.barrier()?;
        self.write_dimensions(width, rect.height);

        // No real source; point it at the destination.
        self.bus.write16(offsets::OFFSET_X_SRC, register_value(x));
        self.bus.write16(offsets::OFFSET_X_DST, register_value(x));
        self.bus.write16(offsets::OFFSET_Y_SRC, register_value(rect.y));
        self.bus.write16(offsets::OFFSET_Y_DST, register_value(rect.y));

        self.submit(op.command);
        Ok(())
    }

    /// Set up mono 8×8 pattern fills on the screen.
    ///
    /// # Errors
    /// [`AccelError::NotAccelerated`] at 24 bpp, or [`AccelError::Stalled`]
    /// under [`StallPolicy::Abort`].
    pub fn prepare_mono_pattern(
        &mut self,
        setup: &PatternSetup,
    ) -> Result<PreparedPattern, AccelError> {
        let screen = self.ctx.screen();
        if screen.is_24bpp() {
            return self.refuse(Fallback::PatternAt24Bpp);
        }

        let command = CommandWord::new()
            .with_opcode(Opcode::BITBLT)
            .with_source(PixmapIndex::A)
            .with_pattern(PatternSource::PIXMAP_B)
            .with_destination(PixmapIndex::C)
            .with_background_from_pixmap(setup.background.is_none());

        let epoch = self.claim()?;

        self.bus.write32(offsets::FG_COLOR, setup.foreground);
        self.bus
            .write32(offsets::BG_COLOR, setup.background.unwrap_or(TRANSPARENT_BACKGROUND));
        self.write_compare(0, CompareCondition::ALWAYS_UPDATE);
        self.bus.write8(offsets::ROP_MIX, copy_rop(setup.rop));

        program_surface(&mut self.bus, PixmapIndex::A, &screen)?;
        program_surface(&mut self.bus, PixmapIndex::C, &screen)?;

        let tile = (self.ctx.usable_width() * setup.origin.y + setup.origin.x)
            * u32::from(self.ctx.bytes_per_pixel());
        program_mono_tile(&mut self.bus, PixmapIndex::B, tile);

        Ok(PreparedPattern { command, epoch })
    }

    /// Fill `rect` with the prepared pattern, starting `pattern` pixels into
    /// the tile.
    ///
    /// # Errors
    /// [`AccelError::Superseded`] if another setup ran since `op` was
    /// prepared, or [`AccelError::Stalled`] under [`StallPolicy::Abort`].
    pub fn mono_pattern_fill(
        &mut self,
        op: &PreparedPattern,
        pattern: Point,
        rect: Rect,
    ) -> Result<(), AccelError> {
        self.check(op.epoch)?;
        self.barrier()?;
        self.write_dimensions(rect.width, rect.height);

        self.bus.write16(offsets::OFFSET_X_SRC, register_value(rect.x));
        self.bus.write16(offsets::OFFSET_Y_SRC, register_value(rect.y));
        self.bus.write16(offsets::OFFSET_X_PAT, register_value(pattern.x));
        self.bus.write16(offsets::OFFSET_Y_PAT, register_value(pattern.y));
        self.bus.write16(offsets::OFFSET_X_DST, register_value(rect.x));
        self.bus.write16(offsets::OFFSET_Y_DST, register_value(rect.y));

        self.submit(op.command);
        Ok(())
    }
}

/// Last pixel of a run of `extent` pixels starting at `start`.
#[inline]
const fn last(start: u32, extent: u32) -> u32 {
    start.wrapping_add(extent).wrapping_sub(1)
}

/// Whether all three colour bytes are equal, the only colours a 24 bpp fill
/// aliased as 8 bpp can reproduce.
#[must_use]
pub const fn is_gray(color: u32) -> bool {
    let b = color & 0xFF;
    b == (color >> 8) & 0xFF && b == (color >> 16) & 0xFF
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{DisplayMode, FramebufferLayout};
    use crate::rop::Rop;

    /// A bus whose engine never goes idle.
    struct Wedged;

    impl RegisterBus for Wedged {
        fn read8(&mut self, _offset: u16) -> u8 {
            CP_BUSY
        }

        fn read16(&mut self, _offset: u16) -> u16 {
            0
        }

        fn read32(&mut self, _offset: u16) -> u32 {
            0
        }

        fn write8(&mut self, _offset: u16, _value: u8) {}

        fn write16(&mut self, _offset: u16, _value: u16) {}

        fn write32(&mut self, _offset: u16, _value: u32) {}
    }

    fn wedged_24bpp() -> Engine<Wedged> {
        let layout = FramebufferLayout {
            base: 0xE000_0000,
            total_bytes: 4 * 1024 * 1024,
        };
        let mode = DisplayMode {
            bits_per_pixel: 24,
            virtual_width: 1024,
            virtual_height: 768,
        };
        let config = EngineConfig {
            poll_limit: 1,
            ..EngineConfig::default()
        };
        Engine::new(Wedged, EngineContext::new(layout, mode).unwrap(), config)
    }

    #[test]
    fn counters_saturate() {
        let mut engine = wedged_24bpp();
        engine.stats = EngineStats {
            submitted: u64::MAX,
            stalls: u32::MAX,
            fallbacks: u32::MAX,
        };
        let screen = engine.context().screen();

        let colorful = FillSetup {
            color: 0x0001_0203,
            rop: Rop::Copy,
            plane_mask: None,
        };
        assert!(engine.prepare_solid_fill(&screen, &colorful).is_err());
        assert!(engine.sync().is_err());

        let gray = FillSetup {
            color: 0x0005_0505,
            ..colorful
        };
        let op = engine.prepare_solid_fill(&screen, &gray).unwrap();
        engine.solid_fill(&op, Rect::new(0, 0, 1, 1)).unwrap();

        assert_eq!(
            engine.stats(),
            EngineStats {
                submitted: u64::MAX,
                stalls: u32::MAX,
                fallbacks: u32::MAX,
            }
        );
    }

    #[test]
    fn gray_colors() {
        assert!(is_gray(0x0005_0505));
        assert!(is_gray(0xFFFF_FFFF));
        assert!(is_gray(0));
        assert!(!is_gray(0x0001_0203));
        assert!(!is_gray(0x0005_0506));
    }

    #[test]
    fn last_pixel() {
        assert_eq!(last(10, 5), 14);
        assert_eq!(last(0, 1), 0);
    }
}
