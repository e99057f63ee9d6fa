//! Key identity decoded from a matrix scan.

use core::num::NonZeroU8;

use platform::config::MATRIX_LINES;

/// A single physical key, numbered 1..=8 by matrix line.
///
/// "No key" is represented as `Option::<KeyId>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct KeyId(NonZeroU8);

impl KeyId {
    /// Key `id`, if it names a matrix line.
    pub const fn new(id: u8) -> Option<Self> {
        if id == 0 || id > MATRIX_LINES {
            return None;
        }
        match NonZeroU8::new(id) {
            Some(n) => Some(Self(n)),
            None => None,
        }
    }

    /// Decode a scan bitmask.
    ///
    /// Only a one-hot mask names a key; an empty mask or a chord of two or
    /// more lines decodes to `None`.
    pub fn decode(mask: u8) -> Option<Self> {
        if !mask.is_power_of_two() {
            return None;
        }
        let line = u8::try_from(mask.trailing_zeros()).ok()?;
        Self::new(line.checked_add(1)?)
    }

    /// Numeric key id (1..=8).
    pub const fn get(self) -> u8 {
        self.0.get()
    }

    /// One-hot scan mask of this key.
    pub fn mask(self) -> u8 {
        1u8.wrapping_shl(u32::from(self.get().saturating_sub(1)))
    }
}

impl core::fmt::Display for KeyId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.get())
    }
}
