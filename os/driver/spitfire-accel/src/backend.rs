//! What both acceleration architectures have in common.

use crate::config::AccelMethod;
use crate::engine::Engine;
use crate::error::AccelError;
use crate::exa::ExaAccel;
use crate::prepared::{OpKind, PreparedOp};
use crate::rop::Rop;
#[cfg(feature = "xaa")]
use crate::xaa::XaaAccel;
use log::{error, warn};
use spitfire_regs::RegisterBus;

/// An acceleration architecture driving one [`Engine`].
pub trait Accel {
    type Bus: RegisterBus;

    fn method(&self) -> AccelMethod;

    fn engine(&self) -> &Engine<Self::Bus>;

    fn engine_mut(&mut self) -> &mut Engine<Self::Bus>;

    /// The operation set up by the last successful setup callback, if any.
    fn pending(&self) -> Option<OpKind>;

    /// Block until the engine has finished drawing.
    ///
    /// Called by the server before it touches video memory itself.
    fn sync(&mut self) {
        if let Err(stalled) = self.engine_mut().sync() {
            warn!("sync: {stalled}");
        }
    }
}

/// Remember the outcome of a setup callback; `true` if it was accelerated.
pub(crate) fn hold<T: Into<PreparedOp>>(
    pending: &mut Option<PreparedOp>,
    prepared: Result<T, AccelError>,
) -> bool {
    *pending = prepared.ok().map(Into::into);
    pending.is_some()
}

/// Translate a raster operation code from the server.
///
/// An out-of-range code is a server bug; it is logged and drops whatever was
/// set up.
pub(crate) fn checked_rop(pending: &mut Option<PreparedOp>, code: i32) -> Option<Rop> {
    match Rop::try_from(code) {
        Ok(rop) => Some(rop),
        Err(err) => {
            error!("{err}");
            *pending = None;
            None
        }
    }
}

/// The architecture picked at init time.
#[derive(Debug)]
pub enum Accelerator<B> {
    #[cfg(feature = "xaa")]
    Xaa(XaaAccel<B>),
    Exa(ExaAccel<B>),
}

macro_rules! dispatch {
    ($self:expr, $accel:ident => $body:expr) => {
        match $self {
            #[cfg(feature = "xaa")]
            Self::Xaa($accel) => $body,
            Self::Exa($accel) => $body,
        }
    };
}

impl<B: RegisterBus> Accel for Accelerator<B> {
    type Bus = B;

    fn method(&self) -> AccelMethod {
        dispatch!(self, accel => accel.method())
    }

    fn engine(&self) -> &Engine<B> {
        dispatch!(self, accel => accel.engine())
    }

    fn engine_mut(&mut self) -> &mut Engine<B> {
        dispatch!(self, accel => accel.engine_mut())
    }

    fn pending(&self) -> Option<OpKind> {
        dispatch!(self, accel => accel.pending())
    }
}

impl<B> Accelerator<B> {
    #[cfg(feature = "xaa")]
    #[must_use]
    pub const fn as_xaa(&mut self) -> Option<&mut XaaAccel<B>> {
        match self {
            Self::Xaa(accel) => Some(accel),
            Self::Exa(_) => None,
        }
    }

    #[must_use]
    pub const fn as_exa(&mut self) -> Option<&mut ExaAccel<B>> {
        match self {
            #[cfg(feature = "xaa")]
            Self::Xaa(_) => None,
            Self::Exa(accel) => Some(accel),
        }
    }
}
