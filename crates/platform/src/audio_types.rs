//! Audio domain newtypes.

// ── Error type ───────────────────────────────────────────────────────────────

/// Error returned when a value is out of the valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutOfRangeError {
    /// The value that was out of range.
    pub value: u32,
    /// The inclusive minimum allowed value.
    pub min: u32,
    /// The inclusive maximum allowed value.
    pub max: u32,
}

impl core::fmt::Display for OutOfRangeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "value {} outside {}..={}",
            self.value, self.min, self.max
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for OutOfRangeError {}

// ── PlayerVolume ─────────────────────────────────────────────────────────────

/// Output volume of the WAV player, in the player's native steps (0–7).
///
/// Wraps a `u8` with the invariant `value <= 7`.
/// Construct with [`PlayerVolume::new`] (clamping) or
/// [`PlayerVolume::try_new`] (fallible, strict).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct PlayerVolume(u8);

impl PlayerVolume {
    /// Loudest step.
    pub const MAX: u8 = 7;

    /// Volume used when the board does not pick one.
    pub const DEFAULT: Self = Self(crate::config::DEFAULT_VOLUME);

    /// Create a `PlayerVolume`, clamping values above 7 to 7.
    #[must_use]
    pub fn new(value: u8) -> Self {
        Self(value.min(Self::MAX))
    }

    /// Create a `PlayerVolume`, returning an error if `value > 7`.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] if `value > 7`.
    pub fn try_new(value: u8) -> Result<Self, OutOfRangeError> {
        if value > Self::MAX {
            Err(OutOfRangeError {
                value: u32::from(value),
                min: 0,
                max: u32::from(Self::MAX),
            })
        } else {
            Ok(Self(value))
        }
    }

    /// Return the inner volume step (0–7).
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for PlayerVolume {
    fn default() -> Self {
        Self::DEFAULT
    }
}
