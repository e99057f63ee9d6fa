//! Board configuration and constants
//!
//! Compile-time values shared across the workspace. Components take their
//! own config structs at construction; the defaults below seed them.

/// The application name
pub const APP_NAME: &str = "Music Black Box";

/// Application version (synchronized with Cargo.toml)
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Hold time after which a key press is classified as long.
pub const LONG_PRESS_MS: u64 = 2_000;

/// Window after a decoded IR frame during which further frames are discarded.
pub const IR_HOLDOFF_MS: u64 = 100;

/// Byte offset of the persisted album selection in non-volatile storage.
pub const ALBUM_SETTING_OFFSET: u32 = 0x00;

/// Number of physical lines scanned by the key matrix (4 columns x 2 rows).
pub const MATRIX_LINES: u8 = 8;

/// Number of LEDs behind the panel shift register.
pub const PANEL_LED_COUNT: u8 = 8;

/// Volume step applied at boot (0..=7).
pub const DEFAULT_VOLUME: u8 = 5;

/// Inactivity (15 min) after which playback is stopped. Zero disables it.
pub const IDLE_TIMEOUT_MS: u64 = 900_000;

/// NEC command codes of the remote's digit keys, indexed by digit.
///
/// Matches the common 21-key "car MP3" handset.
pub const REMOTE_DIGITS: [u16; 10] = [0x16, 0x0C, 0x18, 0x5E, 0x08, 0x1C, 0x5A, 0x42, 0x52, 0x4A];

/// Application title shown in the boot banner.
pub const fn app_title() -> &'static str {
    APP_NAME
}
