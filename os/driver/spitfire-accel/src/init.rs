use crate::backend::Accelerator;
use crate::config::{AccelMethod, AccelOptions, EngineConfig};
use crate::context::{DisplayMode, EngineContext, FramebufferLayout};
use crate::engine::Engine;
use crate::error::InitError;
use crate::exa::ExaAccel;
#[cfg(feature = "xaa")]
use crate::xaa::XaaAccel;
use log::{debug, info};
use spitfire_log::PROBE_TARGET;
use spitfire_regs::RegisterBus;

/// Bring up acceleration for a screen.
///
/// Returns `Ok(None)` when the options turn acceleration off; the bus is then
/// dropped untouched.
///
/// # Errors
/// [`InitError`] when the mode cannot be accelerated at all.
pub fn init_accel<B: RegisterBus>(
    bus: B,
    layout: FramebufferLayout,
    mode: DisplayMode,
    options: AccelOptions,
    config: EngineConfig,
) -> Result<Option<Accelerator<B>>, InitError> {
    let ctx = EngineContext::new(layout, mode)?;
    info!(
        target: PROBE_TARGET,
        "videoram: {}k at {:#x}",
        ctx.total_memory_bytes() / 1024,
        ctx.frame_buffer_base()
    );
    debug!(
        "pitch {} bytes, {}x{} pixels of video memory",
        ctx.pitch_bytes(),
        ctx.usable_width(),
        ctx.usable_height()
    );

    if !options.accel_enabled() {
        return Ok(None);
    }

    let engine = Engine::new(bus, ctx, config);
    Ok(Some(match options.method() {
        #[cfg(feature = "xaa")]
        AccelMethod::Xaa => Accelerator::Xaa(XaaAccel::new(engine)),
        AccelMethod::Exa => Accelerator::Exa(ExaAccel::new(engine)),
    }))
}
