//! WAV file player abstraction
//!
//! The player engine (PCM decoding, timer-driven output) and the removable
//! medium it reads from live outside this workspace. The playback state
//! machine only needs the narrow contract below.

use crate::audio_types::PlayerVolume;

/// Removable-storage WAV player.
///
/// All calls are synchronous and return quickly.
pub trait AudioFilePlayer {
    /// Error type reported when the storage medium cannot be opened.
    type Error: core::fmt::Debug;

    /// Mount the storage medium the player reads from.
    fn mount(&mut self) -> Result<(), Self::Error>;

    /// Set output volume.
    fn set_volume(&mut self, volume: PlayerVolume);

    /// Start playing the file at `path`.
    ///
    /// A path that does not resolve to a playable file is not reported:
    /// [`is_active`](Self::is_active) simply never turns true.
    fn start(&mut self, path: &str);

    /// Halt playback.
    fn stop(&mut self);

    /// Whether the engine is currently producing audio.
    fn is_active(&self) -> bool;
}
