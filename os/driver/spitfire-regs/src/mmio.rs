use crate::RegisterBus;
use core::ptr::NonNull;

/// Volatile register access through a mapped MMIO window.
pub struct Mmio {
    base: NonNull<u8>,
}

// Safety: the window is device memory, not tied to the creating thread; the
// constructor already rules out other aliases.
unsafe impl Send for Mmio {}

impl Mmio {
    /// Wrap the virtual address of the mapped register window.
    ///
    /// # Safety
    /// `base` must point to the mapped Spitfire register window (at least
    /// `0x80` bytes), stay mapped for the lifetime of the returned value, and
    /// must not be accessed through any other alias while it is in use.
    #[must_use]
    pub const unsafe fn new(base: NonNull<u8>) -> Self {
        Self { base }
    }

    #[inline]
    fn reg<T>(&self, offset: u16) -> *mut T {
        // SAFETY: the constructor guarantees the window covers every register offset.
        unsafe { self.base.as_ptr().add(usize::from(offset)).cast::<T>() }
    }
}

/// Registers that are not naturally aligned, such as the dword compare
/// condition at `0x4a`, are accessed as byte arrays of the same width.
impl RegisterBus for Mmio {
    #[inline]
    fn read8(&mut self, offset: u16) -> u8 {
        // SAFETY: `reg` points into the mapped window and `&mut self` is the only alias.
        unsafe { self.reg::<u8>(offset).read_volatile() }
    }

    #[inline]
    fn read16(&mut self, offset: u16) -> u16 {
        let reg = self.reg::<u16>(offset);
        // SAFETY: as for bytes; misaligned registers go through `[u8; N]`, which
        // has alignment 1.
        unsafe {
            if reg.is_aligned() {
                reg.read_volatile()
            } else {
                u16::from_ne_bytes(reg.cast::<[u8; 2]>().read_volatile())
            }
        }
    }

    #[inline]
    fn read32(&mut self, offset: u16) -> u32 {
        let reg = self.reg::<u32>(offset);
        // SAFETY: as for bytes; misaligned registers go through `[u8; N]`, which
        // has alignment 1.
        unsafe {
            if reg.is_aligned() {
                reg.read_volatile()
            } else {
                u32::from_ne_bytes(reg.cast::<[u8; 4]>().read_volatile())
            }
        }
    }

    #[inline]
    fn write8(&mut self, offset: u16, value: u8) {
        // SAFETY: `reg` points into the mapped window and `&mut self` is the only alias.
        unsafe { self.reg::<u8>(offset).write_volatile(value) }
    }

    #[inline]
    fn write16(&mut self, offset: u16, value: u16) {
        let reg = self.reg::<u16>(offset);
        // SAFETY: as for bytes; misaligned registers go through `[u8; N]`, which
        // has alignment 1.
        unsafe {
            if reg.is_aligned() {
                reg.write_volatile(value);
            } else {
                reg.cast::<[u8; 2]>().write_volatile(value.to_ne_bytes());
            }
        }
    }

    #[inline]
    fn write32(&mut self, offset: u16, value: u32) {
        let reg = self.reg::<u32>(offset);
        // SAFETY: as for bytes; misaligned registers go through `[u8; N]`, which
        // has alignment 1.
        unsafe {
            if reg.is_aligned() {
                reg.write_volatile(value);
            } else {
                reg.cast::<[u8; 4]>().write_volatile(value.to_ne_bytes());
            }
        }
    }
}
