//! Playback state machine.
//!
//! `PlaybackEngine` tracks the album/track selection, persists the album
//! across power cycles, synthesises the file path of the selected track and
//! turns the underlying player's activity signal into play/stop events.
//!
//! The activity signal is sampled, never pushed: `is_playing()` reflects
//! the player as of the last [`tick`](PlaybackEngine::tick), `play()` or
//! `stop()` and may lag the hardware by one loop iteration.
//!
//! # Indeterminate start
//!
//! The player does not report a bad path. A `play()` of a track that is not
//! on the medium simply never turns the activity signal on, so no play event
//! ever fires. That outcome stays silent by default. Setting
//! [`PlayerConfig::start_timeout_ms`] opts into a definite failure signal:
//! [`PlaybackEvent::StartTimedOut`] once the timeout has passed without the
//! player becoming active.

use embassy_time::{Duration, Instant};
use platform::{AudioFilePlayer, ByteStorage, Clock, PlayerVolume};
use platform::{debug, error, info, warn};

use crate::path::{track_path, AlbumId, TrackId, TrackPath};
use crate::settings::AlbumSetting;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors returned by [`PlaybackEngine::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitError {
    /// The storage medium could not be mounted.
    StorageUnavailable,
    /// The persisted album byte could not be read.
    SettingsUnavailable,
}

impl core::fmt::Display for InitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::StorageUnavailable => write!(f, "storage medium unavailable"),
            Self::SettingsUnavailable => write!(f, "persisted settings unreadable"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InitError {}

/// Errors returned by `PlaybackEngine` operations after initialisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlaybackError {
    /// The album was selected but could not be persisted.
    SettingsWrite,
}

impl core::fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::SettingsWrite => write!(f, "album selection not persisted"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PlaybackError {}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlayerConfig {
    start_timeout: Option<Duration>,
}

impl PlayerConfig {
    /// Default configuration: no start timeout.
    pub const fn new() -> Self {
        Self {
            start_timeout: None,
        }
    }

    /// Report [`PlaybackEvent::StartTimedOut`] when the player has not become
    /// active `ms` milliseconds after `play()`.
    #[must_use]
    pub const fn start_timeout_ms(mut self, ms: u64) -> Self {
        self.start_timeout = Some(Duration::from_millis(ms));
        self
    }

    /// Configured start timeout.
    pub const fn start_timeout(&self) -> Option<Duration> {
        self.start_timeout
    }
}

// ---------------------------------------------------------------------------
// Events and handlers
// ---------------------------------------------------------------------------

/// A playback transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlaybackEvent {
    /// The player went from idle to active.
    Started {
        /// Selected album
        album: AlbumId,
        /// Selected track
        track: TrackId,
    },
    /// The player went from active to idle.
    Stopped {
        /// Selected album
        album: AlbumId,
        /// Selected track
        track: TrackId,
    },
    /// The player did not become active within the configured start timeout.
    StartTimedOut {
        /// Selected album
        album: AlbumId,
        /// Selected track
        track: TrackId,
    },
}

/// Receiver of playback transitions. Every method defaults to a no-op.
pub trait PlaybackHandler {
    /// Playback of `(album, track)` started.
    fn on_play(&mut self, _album: AlbumId, _track: TrackId) {}

    /// Playback of `(album, track)` stopped.
    fn on_stop(&mut self, _album: AlbumId, _track: TrackId) {}

    /// `(album, track)` did not start within the start timeout.
    fn on_start_timeout(&mut self, _album: AlbumId, _track: TrackId) {}
}

impl PlaybackHandler for () {}

impl<H: PlaybackHandler + ?Sized> PlaybackHandler for &mut H {
    fn on_play(&mut self, album: AlbumId, track: TrackId) {
        (**self).on_play(album, track);
    }

    fn on_stop(&mut self, album: AlbumId, track: TrackId) {
        (**self).on_stop(album, track);
    }

    fn on_start_timeout(&mut self, album: AlbumId, track: TrackId) {
        (**self).on_start_timeout(album, track);
    }
}

/// Read-only view of the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackSnapshot {
    /// Player activity as of the last sample
    pub is_playing: bool,
    /// Selected album
    pub album: AlbumId,
    /// Track of the last `play()`
    pub track: TrackId,
    /// Path synthesised by the last `play()`
    pub path: TrackPath,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// WAV playback state machine.
pub struct PlaybackEngine<P, S, C, H = ()> {
    player: P,
    setting: AlbumSetting<S>,
    clock: C,
    handler: H,
    config: PlayerConfig,
    album: AlbumId,
    track: TrackId,
    path: TrackPath,
    playing: bool,
    start_requested_at: Option<Instant>,
}

impl<P, S, C> PlaybackEngine<P, S, C>
where
    P: AudioFilePlayer,
    S: ByteStorage,
    C: Clock,
{
    /// Create an engine with no handler attached.
    ///
    /// Album and track read as 0 until [`begin`](Self::begin) loads the
    /// persisted album.
    pub fn new(player: P, store: S, clock: C, config: PlayerConfig) -> Self {
        Self {
            player,
            setting: AlbumSetting::new(store),
            clock,
            handler: (),
            config,
            album: 0,
            track: 0,
            path: TrackPath::new(),
            playing: false,
            start_requested_at: None,
        }
    }
}

impl<P, S, C, H> PlaybackEngine<P, S, C, H> {
    /// Attach a playback handler, replacing the current one.
    pub fn with_handler<H2: PlaybackHandler>(self, handler: H2) -> PlaybackEngine<P, S, C, H2> {
        PlaybackEngine {
            player: self.player,
            setting: self.setting,
            clock: self.clock,
            handler,
            config: self.config,
            album: self.album,
            track: self.track,
            path: self.path,
            playing: self.playing,
            start_requested_at: self.start_requested_at,
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

    /// Player activity as of the last sample.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Selected album.
    pub fn album(&self) -> AlbumId {
        self.album
    }

    /// Track of the last `play()`.
    pub fn track(&self) -> TrackId {
        self.track
    }

    /// Path synthesised by the last `play()` (empty before the first).
    pub fn path(&self) -> &str {
        self.path.as_str()
    }

    /// Whether a `play()` is still waiting for the player to become active.
    pub fn is_start_pending(&self) -> bool {
        self.start_requested_at.is_some()
    }

    /// Snapshot of the selection and activity.
    pub fn observe(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            is_playing: self.playing,
            album: self.album,
            track: self.track,
            path: self.path.clone(),
        }
    }
}

impl<P, S, C, H> PlaybackEngine<P, S, C, H>
where
    P: AudioFilePlayer,
    S: ByteStorage,
    C: Clock,
    H: PlaybackHandler,
{
    /// Mount the medium, load the persisted album and apply `volume`.
    ///
    /// # Errors
    ///
    /// - [`InitError::StorageUnavailable`] when the medium does not mount.
    /// - [`InitError::SettingsUnavailable`] when the album byte cannot be read.
    pub fn begin(&mut self, volume: PlayerVolume) -> Result<(), InitError> {
        if self.player.mount().is_err() {
            error!("[SD] mount failed");
            return Err(InitError::StorageUnavailable);
        }
        let album = match self.setting.load() {
            Ok(album) => album,
            Err(_) => {
                error!("[CFG-LOAD] read failed");
                return Err(InitError::SettingsUnavailable);
            }
        };
        info!("[CFG-LOAD]: {}", album);
        self.album = album;
        self.player.set_volume(volume);
        Ok(())
    }

    /// Select `album`, persisting it if it differs from the stored value.
    ///
    /// # Errors
    ///
    /// [`PlaybackError::SettingsWrite`] if persisting failed. The selection
    /// still changes in memory; the write is retried on the next call.
    pub fn set_album(&mut self, album: AlbumId) -> Result<(), PlaybackError> {
        self.album = album;
        match self.setting.store(album) {
            Ok(true) => {
                info!("[CFG-SAVE]: {}", album);
                Ok(())
            }
            Ok(false) => Ok(()),
            Err(_) => {
                warn!("[CFG-SAVE] write of {} failed", album);
                Err(PlaybackError::SettingsWrite)
            }
        }
    }

    /// Start `track` of the selected album, then sample the player once.
    ///
    /// Returns the event emitted by that sample, if the player reacted
    /// immediately.
    pub fn play(&mut self, track: TrackId) -> Option<PlaybackEvent> {
        self.track = track;
        self.path = track_path(self.album, track);
        debug!("[PLAY] request {}", self.path.as_str());
        self.player.start(self.path.as_str());
        self.start_requested_at = Some(self.clock.now());
        self.tick()
    }

    /// Halt the player, then sample it once.
    pub fn stop(&mut self) -> Option<PlaybackEvent> {
        self.player.stop();
        self.start_requested_at = None;
        self.tick()
    }

    /// Sample the player and emit at most one transition event.
    pub fn tick(&mut self) -> Option<PlaybackEvent> {
        let active = self.player.is_active();
        let (album, track) = (self.album, self.track);

        let event = match (self.playing, active) {
            (false, true) => {
                self.playing = true;
                Some(PlaybackEvent::Started { album, track })
            }
            (true, false) => {
                self.playing = false;
                Some(PlaybackEvent::Stopped { album, track })
            }
            _ => None,
        };

        if active {
            self.start_requested_at = None;
        }

        let event = event.or_else(|| self.check_start_timeout());

        match event {
            Some(PlaybackEvent::Started { album, track }) => {
                info!("[PLAY] album={} track={} wav={}", album, track, self.path.as_str());
                self.handler.on_play(album, track);
            }
            Some(PlaybackEvent::Stopped { album, track }) => {
                info!("[STOP] album={} track={} wav={}", album, track, self.path.as_str());
                self.handler.on_stop(album, track);
            }
            Some(PlaybackEvent::StartTimedOut { album, track }) => {
                warn!("[PLAY] no start: album={} track={} wav={}", album, track, self.path.as_str());
                self.handler.on_start_timeout(album, track);
            }
            None => {}
        }
        event
    }

    fn check_start_timeout(&mut self) -> Option<PlaybackEvent> {
        let timeout = self.config.start_timeout?;
        let requested_at = self.start_requested_at?;
        if self.clock.elapsed_since(requested_at) < timeout {
            return None;
        }
        self.start_requested_at = None;
        Some(PlaybackEvent::StartTimedOut {
            album: self.album,
            track: self.track,
        })
    }

    /// The persisted album cell.
    pub fn album_setting(&self) -> &AlbumSetting<S> {
        &self.setting
    }
}
