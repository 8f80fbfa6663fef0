//! Byte offsets of the drawing engine registers from the MMIO base.

/// Command processor status; bit 7 is [`CP_BUSY`](crate::CP_BUSY).
pub const CP_STATUS: u16 = 0x10;
/// Command processor control (interrupt pending, terminate, turbo).
pub const CP_CONTROL: u16 = 0x11;

/// Selects which of the four pixmap descriptors the next writes define.
pub const PIXMAP_SELECT: u16 = 0x12;
/// Pixmap base address; must be dword aligned.
pub const PIXMAP_BASE: u16 = 0x14;
/// Pixmap width minus one; must be dword aligned.
pub const PIXMAP_WIDTH: u16 = 0x18;
/// Pixmap height minus one.
pub const PIXMAP_HEIGHT: u16 = 0x1a;
/// Pixmap format, see [`PixmapFormat`](crate::PixmapFormat).
pub const PIXMAP_FORMAT: u16 = 0x1c;

pub const BRESENHAM_ERR: u16 = 0x20;
pub const BRESENHAM_K1: u16 = 0x24;
pub const BRESENHAM_K2: u16 = 0x28;
pub const SHORT_STROKE: u16 = 0x2c;

/// Ternary raster operation byte.
pub const ROP_MIX: u16 = 0x48;

/// Destination colour-compare condition, see [`CompareCondition`](crate::CompareCondition).
pub const DEST_CC_COND: u16 = 0x4a;
/// Destination colour-compare colour.
pub const DEST_CC_COLOR: u16 = 0x4c;
/// Plane mask.
pub const PIXEL_BITMASK: u16 = 0x50;
pub const FG_COLOR: u16 = 0x58;
pub const BG_COLOR: u16 = 0x5c;

/// Operation width minus one.
pub const OP_DIM_1: u16 = 0x60;
/// Operation height minus one.
pub const OP_DIM_2: u16 = 0x62;

pub const OFFSET_X_MAP: u16 = 0x6c;
pub const OFFSET_Y_MAP: u16 = 0x6e;
pub const OFFSET_X_SRC: u16 = 0x70;
pub const OFFSET_Y_SRC: u16 = 0x72;
pub const OFFSET_X_PAT: u16 = 0x74;
pub const OFFSET_Y_PAT: u16 = 0x76;
pub const OFFSET_X_DST: u16 = 0x78;
pub const OFFSET_Y_DST: u16 = 0x7a;

/// Command word; writing it starts the operation.
pub const COMMAND: u16 = 0x7c;
