//! Pixmap descriptor programming.

use crate::context::Surface;
use crate::error::Fallback;
use spitfire_regs::{PixelDepth, PixmapFormat, PixmapIndex, RegisterBus, offsets};

/// Define one of the four pixmap descriptors.
///
/// `base` must be dword aligned. `width_minus_1` and `height_minus_1` are
/// written as is. Pixmaps always live in video memory in Intel byte order,
/// so only the depth reaches the format register.
pub fn program_slot<B: RegisterBus>(
    bus: &mut B,
    slot: PixmapIndex,
    base: u32,
    width_minus_1: u16,
    height_minus_1: u16,
    depth: PixelDepth,
) {
    bus.write8(offsets::PIXMAP_SELECT, slot.into_bits());
    bus.write32(offsets::PIXMAP_BASE, base);
    bus.write16(offsets::PIXMAP_WIDTH, width_minus_1);
    bus.write16(offsets::PIXMAP_HEIGHT, height_minus_1);
    bus.write8(
        offsets::PIXMAP_FORMAT,
        PixmapFormat::video_memory(depth).into_bits(),
    );
}

/// Point a descriptor at a surface, aliasing 24 bpp as 8 bpp.
///
/// Nothing is written if the surface cannot be represented.
pub(crate) fn program_surface<B: RegisterBus>(
    bus: &mut B,
    slot: PixmapIndex,
    surface: &Surface,
) -> Result<(), Fallback> {
    let (depth, width, height) = surface.engine_geometry()?;
    program_slot(
        bus,
        slot,
        surface.offset,
        register_value(width.wrapping_sub(1)),
        register_value(height.wrapping_sub(1)),
        depth,
    );
    Ok(())
}

/// Descriptor of the 8×8 one-bit pattern tile at `offset`.
pub(crate) fn program_mono_tile<B: RegisterBus>(bus: &mut B, slot: PixmapIndex, offset: u32) {
    program_slot(bus, slot, offset, 8 - 1, 8 - 1, PixelDepth::BPP1);
}

/// Truncate to a 16-bit register; the engine only decodes 12 bits anyway.
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub(crate) const fn register_value(value: u32) -> u16 {
    value as u16
}
