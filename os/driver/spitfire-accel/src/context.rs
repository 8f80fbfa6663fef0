//! Video memory layout and the pixel geometry of the current mode.

use crate::error::{Fallback, InitError};
use spitfire_regs::PixelDepth;

/// Pitches at or above this many bytes cannot be addressed once a 24 bpp
/// surface is aliased as 8 bpp.
pub const ALIASED_PITCH_LIMIT: u32 = 4096;

/// Location and size of video memory.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FramebufferLayout {
    /// Physical address of the linear framebuffer.
    pub base: u64,
    pub total_bytes: u32,
}

/// Pixel geometry of the active display mode.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DisplayMode {
    pub bits_per_pixel: u8,
    /// Width of the virtual screen in pixels; determines the pitch.
    pub virtual_width: u32,
    /// Height of the virtual screen in lines; memory below it is offscreen.
    pub virtual_height: u32,
}

/// Per-adapter engine state derived once at initialization.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct EngineContext {
    frame_buffer_base: u64,
    total_memory_bytes: u32,
    bits_per_pixel: u8,
    bytes_per_pixel: u8,
    pitch_bytes: u32,
    virtual_height: u32,
    usable_width: u32,
    usable_height: u32,
}

impl EngineContext {
    /// Derive the context for a mode.
    ///
    /// # Errors
    /// Rejects depths the driver cannot display, zero-width modes and video
    /// memory that cannot hold a single scanline.
    pub fn new(layout: FramebufferLayout, mode: DisplayMode) -> Result<Self, InitError> {
        if !matches!(mode.bits_per_pixel, 8 | 16 | 24 | 32) {
            return Err(InitError::UnsupportedDepth(mode.bits_per_pixel));
        }

        let bytes_per_pixel = mode.bits_per_pixel >> 3;
        let pitch_bytes = mode.virtual_width * u32::from(bytes_per_pixel);
        if pitch_bytes == 0 {
            return Err(InitError::ZeroPitch);
        }

        let lines = layout.total_bytes / pitch_bytes;
        if lines == 0 {
            return Err(InitError::FramebufferTooSmall {
                total: layout.total_bytes,
                pitch: pitch_bytes,
            });
        }

        Ok(Self {
            frame_buffer_base: layout.base,
            total_memory_bytes: layout.total_bytes,
            bits_per_pixel: mode.bits_per_pixel,
            bytes_per_pixel,
            pitch_bytes,
            virtual_height: mode.virtual_height,
            usable_width: pitch_bytes / u32::from(bytes_per_pixel),
            usable_height: lines - 1,
        })
    }

    #[must_use]
    pub const fn frame_buffer_base(&self) -> u64 {
        self.frame_buffer_base
    }

    #[must_use]
    pub const fn total_memory_bytes(&self) -> u32 {
        self.total_memory_bytes
    }

    #[must_use]
    pub const fn bits_per_pixel(&self) -> u8 {
        self.bits_per_pixel
    }

    #[must_use]
    pub const fn bytes_per_pixel(&self) -> u8 {
        self.bytes_per_pixel
    }

    #[must_use]
    pub const fn pitch_bytes(&self) -> u32 {
        self.pitch_bytes
    }

    #[must_use]
    pub const fn virtual_height(&self) -> u32 {
        self.virtual_height
    }

    /// Pixels per scanline of addressable memory.
    #[must_use]
    pub const fn usable_width(&self) -> u32 {
        self.usable_width
    }

    /// Scanlines of addressable memory, onscreen and offscreen.
    #[must_use]
    pub const fn usable_height(&self) -> u32 {
        self.usable_height
    }

    /// Whether copies and fills can be accelerated in this mode at all.
    #[must_use]
    pub const fn pixmaps_supported(&self) -> bool {
        self.bits_per_pixel != 24 || self.pitch_bytes < ALIASED_PITCH_LIMIT
    }

    /// The whole of video memory as one surface, as the legacy backend
    /// addresses it.
    #[must_use]
    pub const fn screen(&self) -> Surface {
        Surface {
            offset: 0,
            pitch_bytes: self.pitch_bytes,
            height: self.usable_height,
            bits_per_pixel: self.bits_per_pixel,
        }
    }
}

/// A pixmap resident in video memory.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Surface {
    /// Byte offset from the start of video memory.
    pub offset: u32,
    pub pitch_bytes: u32,
    /// Height in lines.
    pub height: u32,
    pub bits_per_pixel: u8,
}

impl Surface {
    #[must_use]
    pub const fn is_24bpp(&self) -> bool {
        self.bits_per_pixel == 24
    }

    /// Depth code, row length in pixels and height as the engine sees the
    /// surface, with 24 bpp aliased to 8 bpp three times as wide.
    pub(crate) fn engine_geometry(&self) -> Result<(PixelDepth, u32, u32), Fallback> {
        if self.is_24bpp() {
            if self.pitch_bytes >= ALIASED_PITCH_LIMIT {
                return Err(Fallback::PitchTooWide(self.pitch_bytes));
            }
            let pixels = self.pitch_bytes / 3;
            return Ok((PixelDepth::BPP8, pixels * 3, self.height));
        }

        match PixelDepth::for_bits_per_pixel(self.bits_per_pixel) {
            Some(depth) if self.bits_per_pixel >= 8 => Ok((
                depth,
                self.pitch_bytes / u32::from(self.bits_per_pixel >> 3),
                self.height,
            )),
            _ => Err(Fallback::UnsupportedDepth(self.bits_per_pixel)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIB: u32 = 1024 * 1024;

    fn layout(total_bytes: u32) -> FramebufferLayout {
        FramebufferLayout {
            base: 0xE000_0000,
            total_bytes,
        }
    }

    #[test]
    fn usable_extents() {
        let ctx = EngineContext::new(
            layout(16 * MIB),
            DisplayMode {
                bits_per_pixel: 32,
                virtual_width: 512,
                virtual_height: 384,
            },
        )
        .unwrap();
        assert_eq!(ctx.pitch_bytes(), 2048);
        assert_eq!(ctx.bytes_per_pixel(), 4);
        assert_eq!(ctx.usable_width(), 512);
        assert_eq!(ctx.usable_height(), 8191);
    }

    #[test]
    fn rejects_bad_modes() {
        let mode = |bits_per_pixel, virtual_width| DisplayMode {
            bits_per_pixel,
            virtual_width,
            virtual_height: 480,
        };
        assert_eq!(
            EngineContext::new(layout(MIB), mode(15, 640)),
            Err(InitError::UnsupportedDepth(15))
        );
        assert_eq!(
            EngineContext::new(layout(MIB), mode(8, 0)),
            Err(InitError::ZeroPitch)
        );
        assert_eq!(
            EngineContext::new(layout(1000), mode(16, 640)),
            Err(InitError::FramebufferTooSmall {
                total: 1000,
                pitch: 1280
            })
        );
    }

    #[test]
    fn pixmap_support_at_24bpp_depends_on_pitch() {
        let at = |virtual_width| {
            EngineContext::new(
                layout(8 * MIB),
                DisplayMode {
                    bits_per_pixel: 24,
                    virtual_width,
                    virtual_height: 600,
                },
            )
            .unwrap()
        };
        assert!(at(1024).pixmaps_supported());
        assert!(!at(1366).pixmaps_supported());
    }

    #[test]
    fn aliased_geometry() {
        let s = Surface {
            offset: 0,
            pitch_bytes: 2400,
            height: 100,
            bits_per_pixel: 24,
        };
        assert_eq!(s.engine_geometry(), Ok((PixelDepth::BPP8, 2400, 100)));

        let wide = Surface {
            pitch_bytes: 4098,
            ..s
        };
        assert_eq!(wide.engine_geometry(), Err(Fallback::PitchTooWide(4098)));

        let mono = Surface {
            bits_per_pixel: 1,
            ..s
        };
        assert_eq!(mono.engine_geometry(), Err(Fallback::UnsupportedDepth(1)));
    }
}
