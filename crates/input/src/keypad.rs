//! Debounced keypad gesture detector.
//!
//! The detector samples the key matrix once per [`Keypad::tick`] and
//! classifies every physical press as exactly one gesture:
//!
//! ```text
//!            key edge (prev sample none)
//!   [Idle] ─────────────────────────────▶ [Pressing{key, since}]
//!     ▲                                        │
//!     │  released before threshold → Short(key)│
//!     └────────────────────────────────────────┤
//!     │  held ≥ threshold          → Long(key) │
//!     └────────────────────────────────────────┘
//! ```
//!
//! A long press fires while the key is still down and closes the press, so
//! no short press follows on release. A new press is only tracked after the
//! matrix has read "no key" at least once.
//!
//! If the scanned key changes mid-press without an intervening release, the
//! key captured at press start stays authoritative for that press.

use embassy_time::{Duration, Instant};
use platform::config::LONG_PRESS_MS;
use platform::{Clock, KeyMatrix};
use platform::{info, trace};

use crate::key::KeyId;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Keypad timing configuration.
///
/// ```
/// use input::KeypadConfig;
///
/// let config = KeypadConfig::new().long_press_ms(1500);
/// assert_eq!(config.long_press().as_millis(), 1500);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeypadConfig {
    long_press: Duration,
}

impl KeypadConfig {
    /// Default configuration: long press after 2000 ms.
    pub const fn new() -> Self {
        Self {
            long_press: Duration::from_millis(LONG_PRESS_MS),
        }
    }

    /// Set the hold time that turns a press into a long press.
    #[must_use]
    pub const fn long_press_ms(mut self, ms: u64) -> Self {
        self.long_press = Duration::from_millis(ms);
        self
    }

    /// Hold time that turns a press into a long press.
    pub const fn long_press(&self) -> Duration {
        self.long_press
    }
}

impl Default for KeypadConfig {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Gestures and handlers
// ---------------------------------------------------------------------------

/// A classified key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gesture {
    /// Key released before the long-press threshold.
    Short(KeyId),
    /// Key held for at least the long-press threshold.
    Long(KeyId),
}

impl Gesture {
    /// Key the gesture was made with.
    pub const fn key(self) -> KeyId {
        match self {
            Self::Short(key) | Self::Long(key) => key,
        }
    }
}

/// Receiver of keypad gestures.
///
/// Both methods default to doing nothing, so a handler only implements what
/// it cares about. `()` is the "no handler" handler.
pub trait GestureHandler {
    /// A key was pressed and released before the long-press threshold.
    fn on_short_press(&mut self, _key: KeyId) {}

    /// A key has been held for the long-press threshold.
    fn on_long_press(&mut self, _key: KeyId) {}
}

impl GestureHandler for () {}

impl<H: GestureHandler + ?Sized> GestureHandler for &mut H {
    fn on_short_press(&mut self, key: KeyId) {
        (**self).on_short_press(key);
    }

    fn on_long_press(&mut self, key: KeyId) {
        (**self).on_long_press(key);
    }
}

// ---------------------------------------------------------------------------
// Detector
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PressState {
    Idle,
    Pressing { key: KeyId, since: Instant },
}

/// Keypad gesture detector.
///
/// Owns its matrix scanner, clock and handler; all state lives here and is
/// only advanced by [`tick`](Self::tick).
pub struct Keypad<M, C, H = ()> {
    matrix: M,
    clock: C,
    handler: H,
    config: KeypadConfig,
    state: PressState,
    last_sample: Option<KeyId>,
}

impl<M: KeyMatrix, C: Clock> Keypad<M, C> {
    /// Create a detector with no handler attached.
    pub fn new(matrix: M, clock: C, config: KeypadConfig) -> Self {
        Self {
            matrix,
            clock,
            handler: (),
            config,
            state: PressState::Idle,
            last_sample: None,
        }
    }
}

impl<M, C, H> Keypad<M, C, H> {
    /// Attach a gesture handler, replacing the current one.
    pub fn with_handler<H2: GestureHandler>(self, handler: H2) -> Keypad<M, C, H2> {
        Keypad {
            matrix: self.matrix,
            clock: self.clock,
            handler,
            config: self.config,
            state: self.state,
            last_sample: self.last_sample,
        }
    }

    /// The attached handler.
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Mutable access to the attached handler.
    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// Active configuration.
    pub fn config(&self) -> KeypadConfig {
        self.config
    }

    /// Whether a press is being tracked and has not been classified yet.
    pub fn is_pressing(&self) -> bool {
        matches!(self.state, PressState::Pressing { .. })
    }

    /// Key of the press being tracked.
    pub fn pressed_key(&self) -> Option<KeyId> {
        match self.state {
            PressState::Pressing { key, .. } => Some(key),
            PressState::Idle => None,
        }
    }

    /// Key seen on the most recent scan.
    pub fn last_sample(&self) -> Option<KeyId> {
        self.last_sample
    }
}

impl<M: KeyMatrix, C: Clock, H: GestureHandler> Keypad<M, C, H> {
    /// Scan the matrix once and decode the result.
    pub fn sample(&mut self) -> Option<KeyId> {
        KeyId::decode(self.matrix.read_raw())
    }

    /// Advance the detector with one fresh scan.
    ///
    /// Returns the gesture emitted on this tick, after the handler has seen
    /// it.
    pub fn tick(&mut self) -> Option<Gesture> {
        let sample = self.sample();
        let now = self.clock.now();

        let gesture = match self.state {
            PressState::Pressing { key, since }
                if now.saturating_duration_since(since) >= self.config.long_press =>
            {
                self.state = PressState::Idle;
                Some(Gesture::Long(key))
            }
            PressState::Pressing { key, .. } if sample.is_none() => {
                self.state = PressState::Idle;
                Some(Gesture::Short(key))
            }
            PressState::Pressing { .. } => None,
            PressState::Idle => {
                if let (None, Some(key)) = (self.last_sample, sample) {
                    trace!("[KEY-DOWN]: {}", key);
                    self.state = PressState::Pressing { key, since: now };
                }
                None
            }
        };
        self.last_sample = sample;

        match gesture {
            Some(Gesture::Short(key)) => {
                info!("[KEY-SHORT]: {}", key);
                self.handler.on_short_press(key);
            }
            Some(Gesture::Long(key)) => {
                info!("[KEY-LONG]: {}", key);
                self.handler.on_long_press(key);
            }
            None => {}
        }
        gesture
    }
}
