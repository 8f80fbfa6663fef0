//! Driver options and engine tuning.

use log::{debug, info, warn};
use spitfire_log::{CONFIG_TARGET, DEFAULT_TARGET};

/// Polls of the busy bit before the engine is considered stalled.
pub const DEFAULT_POLL_LIMIT: u32 = 0x00FF_FFFF;

/// Which acceleration architecture the server drives the engine through.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AccelMethod {
    /// One-shot setup and subsequent callbacks.
    #[cfg(feature = "xaa")]
    Xaa,
    /// Prepare / execute / done lifecycle on pixmaps.
    Exa,
}

impl AccelMethod {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            #[cfg(feature = "xaa")]
            Self::Xaa => "XAA",
            Self::Exa => "EXA",
        }
    }
}

/// What setup and execute do when the busy bit never clears.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum StallPolicy {
    /// Log, count and carry on programming the engine.
    #[default]
    Ignore,
    /// Return [`AccelError::Stalled`](crate::AccelError::Stalled) without
    /// touching any register.
    Abort,
}

/// ROP table used for the mix byte of solid fills.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum FillRop {
    /// Treat the fill colour as the source operand ([`copy_rop`](crate::copy_rop)).
    #[default]
    Copy,
    /// Treat the fill colour as the pattern operand ([`solid_fill_rop`](crate::solid_fill_rop)).
    Solid,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub poll_limit: u32,
    pub stall_policy: StallPolicy,
    pub fill_rop: FillRop,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_limit: DEFAULT_POLL_LIMIT,
            stall_policy: StallPolicy::default(),
            fill_rop: FillRop::default(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptionError<'a> {
    #[error("unknown option \"{0}\"")]
    Unknown(&'a str),
    #[error("\"{value}\" is not a valid boolean for option \"{name}\"")]
    InvalidBool { name: &'a str, value: &'a str },
}

/// Screen rotation requested with the `Rotate` option.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Rotation {
    Clockwise,
    CounterClockwise,
}

/// Boolean driver options that only concern mode setting.
const MODE_SETTING_OPTIONS: [&str; 3] = ["UseBIOS", "InitBIOS", "IgnoreEDID"];

/// Driver options as given in the server configuration.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct AccelOptions {
    pub no_accel: bool,
    /// `None` selects the default architecture.
    pub accel_method: Option<AccelMethod>,
    /// Set by `ShadowFB`, and by any valid `Rotate`.
    pub shadow_fb: bool,
    pub rotate: Option<Rotation>,
}

impl AccelOptions {
    /// Parse `(name, value)` option pairs.
    ///
    /// Names compare like X server option names: case, spaces and
    /// underscores are ignored. The mode-setting options `UseBIOS`,
    /// `InitBIOS` and `IgnoreEDID` are checked and otherwise ignored. Bad
    /// `Rotate` and `AccelMethod` values are logged and leave the default in
    /// place.
    ///
    /// # Errors
    /// Unknown names and malformed booleans are reported with the offending
    /// text.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, OptionError<'a>>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut options = Self::default();
        for (name, value) in pairs {
            if name_eq(name, "NoAccel") {
                options.no_accel = parse_bool(name, value)?;
            } else if name_eq(name, "ShadowFB") {
                options.shadow_fb = parse_bool(name, value)?;
            } else if name_eq(name, "AccelMethod") {
                options.accel_method = parse_method(value);
            } else if name_eq(name, "Rotate") {
                options.rotate = parse_rotation(value).or(options.rotate);
            } else if MODE_SETTING_OPTIONS.iter().any(|known| name_eq(name, known)) {
                let enabled = parse_bool(name, value)?;
                debug!("option {name} ({enabled}) does not affect acceleration");
            } else {
                return Err(OptionError::Unknown(name));
            }
        }

        // Rotated output is drawn through the shadow framebuffer.
        if options.rotate.is_some() {
            options.shadow_fb = true;
        }
        Ok(options)
    }

    /// Acceleration is off when asked for, and whenever the shadow
    /// framebuffer is in use.
    #[must_use]
    pub fn accel_enabled(self) -> bool {
        if self.no_accel {
            info!(target: CONFIG_TARGET, "Option: NoAccel - Acceleration Disabled");
            return false;
        }
        if self.shadow_fb {
            if self.rotate.is_none() {
                info!(target: CONFIG_TARGET, "Option: shadow FB enabled");
            }
            warn!("HW acceleration not supported with \"shadowFB\".");
            return false;
        }
        true
    }

    /// The architecture to use, logging where the choice came from.
    #[must_use]
    pub fn method(self) -> AccelMethod {
        let (method, target) = match self.accel_method {
            Some(method) => (method, CONFIG_TARGET),
            None => (AccelMethod::Exa, DEFAULT_TARGET),
        };
        info!(target: target, "Using {} acceleration architecture", method.name());
        method
    }
}

fn parse_bool<'a>(name: &'a str, value: &'a str) -> Result<bool, OptionError<'a>> {
    const TRUE: [&str; 4] = ["1", "on", "true", "yes"];
    const FALSE: [&str; 4] = ["0", "off", "false", "no"];

    let trimmed = value.trim();
    if trimmed.is_empty() || TRUE.iter().any(|t| trimmed.eq_ignore_ascii_case(t)) {
        Ok(true)
    } else if FALSE.iter().any(|f| trimmed.eq_ignore_ascii_case(f)) {
        Ok(false)
    } else {
        Err(OptionError::InvalidBool { name, value })
    }
}

fn parse_method(value: &str) -> Option<AccelMethod> {
    if name_eq(value, "EXA") {
        return Some(AccelMethod::Exa);
    }
    if name_eq(value, "XAA") {
        #[cfg(feature = "xaa")]
        return Some(AccelMethod::Xaa);
        #[cfg(not(feature = "xaa"))]
        {
            warn!("XAA is not available, using EXA");
            return Some(AccelMethod::Exa);
        }
    }
    warn!("\"{value}\" is not a valid value for Option \"AccelMethod\"");
    None
}

fn parse_rotation(value: &str) -> Option<Rotation> {
    if name_eq(value, "CW") {
        info!(target: CONFIG_TARGET, "Rotating screen clockwise - acceleration disabled");
        Some(Rotation::Clockwise)
    } else if name_eq(value, "CCW") {
        info!(target: CONFIG_TARGET, "Rotating screen counter clockwise - acceleration disabled");
        Some(Rotation::CounterClockwise)
    } else {
        info!(target: CONFIG_TARGET, "\"{value}\" is not a valid value for Option \"Rotate\"");
        info!("Valid options are \"CW\" or \"CCW\"");
        None
    }
}

/// Compare option names ignoring ASCII case, spaces, tabs and underscores.
#[must_use]
pub fn name_eq(a: &str, b: &str) -> bool {
    let significant = |c: &u8| !matches!(c, b'_' | b' ' | b'\t');
    let mut lhs = a.bytes().filter(significant);
    let mut rhs = b.bytes().filter(significant);
    loop {
        match (lhs.next(), rhs.next()) {
            (None, None) => return true,
            (Some(l), Some(r)) if l.eq_ignore_ascii_case(&r) => {}
            _ => return false,
        }
    }
}
