use crate::prepared::OpKind;

/// Failure of a setup or execute call.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccelError {
    /// The engine cannot perform the request; draw it in software instead.
    #[error("not accelerated: {0}")]
    NotAccelerated(#[from] Fallback),
    /// The busy bit did not clear within the poll limit.
    #[error(transparent)]
    Stalled(#[from] EngineStalled),
    /// Another setup reprogrammed the engine after this operation was prepared.
    #[error("prepared operation was superseded by a later setup")]
    Superseded,
    /// An execute callback arrived with no matching setup in place.
    #[error("no {0} operation is set up")]
    NotPrepared(OpKind),
}

/// Why a request has to fall back to software drawing.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Fallback {
    #[error("24 bpp fills need equal red, green and blue components (colour {0:#08x})")]
    NonGrayFill(u32),
    #[error("24 bpp aliasing needs a pitch below 4096 bytes (pitch {0})")]
    PitchTooWide(u32),
    #[error("copies between 24 bpp and {0} bpp pixmaps")]
    CrossDepthCopy(u8),
    #[error("1 bpp patterns cannot be combined with 24 bpp pixmaps")]
    PatternAt24Bpp,
    #[error("{0} bpp pixmaps are not supported by the engine")]
    UnsupportedDepth(u8),
}

/// The drawing engine stayed busy for the whole poll budget.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
#[error("drawing engine still busy after {polls} polls")]
pub struct EngineStalled {
    pub polls: u32,
}

/// Failure of the acceleration init entry point.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InitError {
    #[error("unsupported framebuffer depth: {0} bpp")]
    UnsupportedDepth(u8),
    #[error("display mode has a zero pitch")]
    ZeroPitch,
    #[error("{total} bytes of video memory cannot hold a {pitch} byte scanline")]
    FramebufferTooSmall { total: u32, pitch: u32 },
}

/// Logical raster operation outside `0..=15`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid raster operation {0}")]
pub struct InvalidRop(pub i32);
