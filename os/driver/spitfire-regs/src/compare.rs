/// Destination colour-compare condition (`0x4a`).
///
/// Decides, per destination pixel, whether the result of the raster operation
/// is written back, based on a comparison against the compare colour.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CompareCondition(u32);

impl CompareCondition {
    /// Update only pixels that differ from the compare colour.
    pub const UPDATE_IF_NOT_EQUAL: Self = Self(2);
    /// Update every pixel.
    pub const ALWAYS_UPDATE: Self = Self(6);

    #[must_use]
    pub const fn into_bits(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn from_bits(value: u32) -> Self {
        Self(value)
    }
}
