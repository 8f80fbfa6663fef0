//! # Driver Log Sink
//!
//! A `log::Log` implementation that formats records the way X server video
//! drivers report messages:
//!
//! ```text
//! (II) spitfire(0): Using EXA acceleration architecture
//! (**) spitfire(0): Option: NoAccel - Acceleration Disabled
//! (WW) spitfire(0): HW acceleration not supported with "shadowFB".
//! ```
//!
//! The marker is derived from the record's level, or from its target for the
//! informational messages that say where a setting came from:
//!
//! | Marker | Record |
//! |--------|--------|
//! | `(EE)` | [`Level::Error`] |
//! | `(WW)` | [`Level::Warn`] |
//! | `(**)` | info with target [`CONFIG_TARGET`] |
//! | `(--)` | info with target [`PROBE_TARGET`] |
//! | `(==)` | info with target [`DEFAULT_TARGET`] |
//! | `(II)` | any other info |
//! | `(DB)` | [`Level::Debug`] and [`Level::Trace`] |
//!
//! Formatting goes straight into a caller supplied [`Sink`]; nothing is
//! allocated.
//!
//! ## Usage
//! ```rust,no_run
//! use core::fmt;
//! use log::{LevelFilter, info};
//! use spitfire_log::DrvLogger;
//!
//! fn to_stderr(args: fmt::Arguments<'_>) {
//!     eprint!("{args}");
//! }
//!
//! static LOGGER: DrvLogger = DrvLogger::new("spitfire", 0, LevelFilter::Info, to_stderr);
//!
//! LOGGER.init().expect("logger initialization");
//! info!("Spitfire EXA Acceleration enabled.");
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]

use core::fmt;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Target for messages reporting a value taken from the configuration.
pub const CONFIG_TARGET: &str = "spitfire::config";
/// Target for messages reporting a value probed from the hardware.
pub const PROBE_TARGET: &str = "spitfire::probe";
/// Target for messages reporting a built-in default.
pub const DEFAULT_TARGET: &str = "spitfire::default";

/// Receives one fully formatted line, including the trailing newline.
pub type Sink = fn(fmt::Arguments<'_>);

/// Origin and severity of a driver message.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MessageType {
    Error,
    Warning,
    Info,
    Config,
    Probed,
    Default,
    Debug,
}

impl MessageType {
    #[must_use]
    pub fn of(level: Level, target: &str) -> Self {
        match level {
            Level::Error => Self::Error,
            Level::Warn => Self::Warning,
            Level::Info => match target {
                CONFIG_TARGET => Self::Config,
                PROBE_TARGET => Self::Probed,
                DEFAULT_TARGET => Self::Default,
                _ => Self::Info,
            },
            Level::Debug | Level::Trace => Self::Debug,
        }
    }

    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Error => "(EE)",
            Self::Warning => "(WW)",
            Self::Info => "(II)",
            Self::Config => "(**)",
            Self::Probed => "(--)",
            Self::Default => "(==)",
            Self::Debug => "(DB)",
        }
    }
}

pub struct DrvLogger {
    driver: &'static str,
    screen: u8,
    max_level: LevelFilter,
    sink: Sink,
}

impl DrvLogger {
    #[must_use]
    pub const fn new(driver: &'static str, screen: u8, max_level: LevelFilter, sink: Sink) -> Self {
        Self {
            driver,
            screen,
            max_level,
            sink,
        }
    }

    /// Install as the global logger. Call once during driver setup.
    ///
    /// # Errors
    /// Fails if another logger has already been installed.
    pub fn init(&'static self) -> Result<(), SetLoggerError> {
        log::set_logger(self)?;
        log::set_max_level(self.max_level);
        Ok(())
    }
}

impl Log for DrvLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let kind = MessageType::of(record.level(), record.target());
        (self.sink)(format_args!(
            "{} {}({}): {}\n",
            kind.marker(),
            self.driver,
            self.screen,
            record.args()
        ));
    }

    fn flush(&self) {}
}
