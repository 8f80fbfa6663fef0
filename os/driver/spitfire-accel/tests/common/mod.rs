#![allow(dead_code, clippy::must_use_candidate, clippy::missing_panics_doc)]

use spitfire_accel::{DisplayMode, Engine, EngineConfig, EngineContext, FramebufferLayout};
use spitfire_regs::{CP_BUSY, RegisterBus, offsets};

pub const MIB: u32 = 1024 * 1024;
pub const FB_BASE: u64 = 0xE000_0000;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Access {
    Write8(u16, u8),
    Write16(u16, u16),
    Write32(u16, u32),
}

pub use Access::{Write8 as W8, Write16 as W16, Write32 as W32};

/// Register bus that records every write and scripts the busy bit.
#[derive(Debug, Default)]
pub struct RecordingBus {
    writes: Vec<Access>,
    /// Reads of the status register so far.
    pub status_reads: u32,
    /// Upcoming status reads that still report busy.
    busy_polls: u32,
    stuck: bool,
}

impl RecordingBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Busy for the next `polls` status reads, idle afterwards.
    pub fn busy_for(polls: u32) -> Self {
        Self {
            busy_polls: polls,
            ..Self::default()
        }
    }

    /// Busy forever.
    pub fn stuck() -> Self {
        Self {
            stuck: true,
            ..Self::default()
        }
    }

    pub fn set_stuck(&mut self, stuck: bool) {
        self.stuck = stuck;
    }

    pub fn writes(&self) -> &[Access] {
        &self.writes
    }

    /// The writes since the last call.
    pub fn take(&mut self) -> Vec<Access> {
        std::mem::take(&mut self.writes)
    }
}

impl RegisterBus for RecordingBus {
    fn read8(&mut self, offset: u16) -> u8 {
        if offset != offsets::CP_STATUS {
            return 0;
        }
        self.status_reads += 1;
        if self.stuck {
            CP_BUSY
        } else if self.busy_polls > 0 {
            self.busy_polls -= 1;
            CP_BUSY
        } else {
            0
        }
    }

    fn read16(&mut self, _offset: u16) -> u16 {
        0
    }

    fn read32(&mut self, _offset: u16) -> u32 {
        0
    }

    fn write8(&mut self, offset: u16, value: u8) {
        self.writes.push(W8(offset, value));
    }

    fn write16(&mut self, offset: u16, value: u16) {
        self.writes.push(W16(offset, value));
    }

    fn write32(&mut self, offset: u16, value: u32) {
        self.writes.push(W32(offset, value));
    }
}

pub fn context(
    bits_per_pixel: u8,
    virtual_width: u32,
    virtual_height: u32,
    total_bytes: u32,
) -> EngineContext {
    EngineContext::new(
        FramebufferLayout {
            base: FB_BASE,
            total_bytes,
        },
        DisplayMode {
            bits_per_pixel,
            virtual_width,
            virtual_height,
        },
    )
    .unwrap()
}

/// 1024×768 at 16 bpp in 4 MiB: pitch 2048, 1024 × 2047 pixels of memory.
pub fn engine_16bpp() -> Engine<RecordingBus> {
    Engine::new(
        RecordingBus::new(),
        context(16, 1024, 768, 4 * MIB),
        EngineConfig::default(),
    )
}

/// 1024×768 at 24 bpp in 4 MiB: pitch 3072, 1024 × 1364 pixels of memory.
pub fn engine_24bpp() -> Engine<RecordingBus> {
    Engine::new(
        RecordingBus::new(),
        context(24, 1024, 768, 4 * MIB),
        EngineConfig::default(),
    )
}

/// The five writes defining a pixmap slot.
pub fn slot(
    index: u8,
    base: u32,
    width_minus_1: u16,
    height_minus_1: u16,
    format: u8,
) -> [Access; 5] {
    [
        W8(offsets::PIXMAP_SELECT, index),
        W32(offsets::PIXMAP_BASE, base),
        W16(offsets::PIXMAP_WIDTH, width_minus_1),
        W16(offsets::PIXMAP_HEIGHT, height_minus_1),
        W8(offsets::PIXMAP_FORMAT, format),
    ]
}

pub const SLOT_A: u8 = 1;
pub const SLOT_B: u8 = 2;
pub const SLOT_C: u8 = 3;

pub const FORMAT_1BPP: u8 = 0;
pub const FORMAT_8BPP: u8 = 3;
pub const FORMAT_16BPP: u8 = 4;
pub const FORMAT_32BPP: u8 = 5;
