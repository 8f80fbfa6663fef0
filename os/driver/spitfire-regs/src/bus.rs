/// Access to the drawing engine register bank.
///
/// Offsets are byte offsets from the MMIO base and are not validated; every
/// access goes straight to the device. The hardware state behind the bus is
/// singular, so implementations take `&mut self` and are not expected to be
/// shared without external locking.
pub trait RegisterBus {
    fn read8(&mut self, offset: u16) -> u8;
    fn read16(&mut self, offset: u16) -> u16;
    fn read32(&mut self, offset: u16) -> u32;

    fn write8(&mut self, offset: u16, value: u8);
    fn write16(&mut self, offset: u16, value: u16);
    fn write32(&mut self, offset: u16, value: u32);
}

impl<T> RegisterBus for &mut T
where
    T: RegisterBus + ?Sized,
{
    #[inline]
    fn read8(&mut self, offset: u16) -> u8 {
        (**self).read8(offset)
    }

    #[inline]
    fn read16(&mut self, offset: u16) -> u16 {
        (**self).read16(offset)
    }

    #[inline]
    fn read32(&mut self, offset: u16) -> u32 {
        (**self).read32(offset)
    }

    #[inline]
    fn write8(&mut self, offset: u16, value: u8) {
        (**self).write8(offset, value);
    }

    #[inline]
    fn write16(&mut self, offset: u16, value: u16) {
        (**self).write16(offset, value);
    }

    #[inline]
    fn write32(&mut self, offset: u16, value: u32) {
        (**self).write32(offset, value);
    }
}
