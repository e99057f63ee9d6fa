//! WAV playback state machine with a persisted album selection.
//!
//! - [`PlaybackEngine`] owns the album/track selection, asks the player to
//!   start `A<album>/T<track>.WAV` and reports play/stop transitions.
//! - [`AlbumSetting`] keeps the album byte in non-volatile storage and only
//!   writes it when it changes.
//! - [`track_path`] builds the file path for a selection.
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(clippy::unwrap_used)]
#![warn(missing_docs)]

pub mod engine;
pub mod path;
pub mod settings;

pub use engine::{
    InitError, PlaybackEngine, PlaybackError, PlaybackEvent, PlaybackHandler, PlaybackSnapshot,
    PlayerConfig,
};
pub use path::{track_path, AlbumId, TrackId, TrackPath, TRACK_PATH_CAPACITY};
pub use settings::AlbumSetting;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    /// Track path synthesis tests
    mod path_tests {
        use crate::path::track_path;

        #[test]
        fn test_path_has_no_zero_padding() {
            assert_eq!(track_path(2, 7).as_str(), "A2/T7.WAV");
        }

        #[test]
        fn test_path_for_zero_selection() {
            assert_eq!(track_path(0, 0).as_str(), "A0/T0.WAV");
        }

        #[test]
        fn test_longest_path_fits() {
            assert_eq!(track_path(255, 255).as_str(), "A255/T255.WAV");
        }
    }

    /// Persisted album byte tests
    mod settings_tests {
        use crate::settings::AlbumSetting;
        use platform::mocks::{MockEeprom, MockStorageError};

        #[test]
        fn test_load_reads_first_byte() {
            let eeprom = MockEeprom::<4>::with_contents([3, 0, 0, 0]);
            let mut setting = AlbumSetting::new(&eeprom);
            assert_eq!(setting.load(), Ok(3));
            assert_eq!(setting.cached(), Some(3));
        }

        #[test]
        fn test_store_same_value_skips_write() {
            let eeprom = MockEeprom::<4>::with_contents([3, 0, 0, 0]);
            let mut setting = AlbumSetting::new(&eeprom);
            setting.load().unwrap();
            assert_eq!(setting.store(3), Ok(false));
            assert_eq!(eeprom.writes(), 0);
        }

        #[test]
        fn test_store_new_value_writes_once() {
            let eeprom = MockEeprom::<4>::with_contents([3, 0, 0, 0]);
            let mut setting = AlbumSetting::new(&eeprom);
            setting.load().unwrap();
            assert_eq!(setting.store(4), Ok(true));
            assert_eq!(setting.store(4), Ok(false));
            assert_eq!(eeprom.writes(), 1);
            assert_eq!(eeprom.byte(0), Some(4));
        }

        #[test]
        fn test_failed_write_is_retried() {
            let eeprom = MockEeprom::<4>::with_contents([1, 0, 0, 0]);
            let mut setting = AlbumSetting::new(&eeprom);
            setting.load().unwrap();

            eeprom.fail_writes(true);
            assert_eq!(setting.store(2), Err(MockStorageError::WriteFailed));
            assert_eq!(setting.cached(), Some(1));

            eeprom.fail_writes(false);
            assert_eq!(setting.store(2), Ok(true));
            assert_eq!(eeprom.byte(0), Some(2));
        }

        #[test]
        fn test_custom_offset() {
            let eeprom = MockEeprom::<4>::with_contents([0, 0, 9, 0]);
            let mut setting = AlbumSetting::at_offset(&eeprom, 2);
            assert_eq!(setting.load(), Ok(9));
            setting.store(1).unwrap();
            assert_eq!(eeprom.byte(2), Some(1));
            assert_eq!(eeprom.byte(0), Some(0));
        }

        #[test]
        fn test_offset_past_device_end_errors() {
            let eeprom = MockEeprom::<4>::erased();
            let mut setting = AlbumSetting::at_offset(&eeprom, 4);
            assert_eq!(setting.load(), Err(MockStorageError::OutOfBounds));
        }
    }

    /// Playback state machine tests
    mod engine_tests {
        use crate::engine::{
            InitError, PlaybackEngine, PlaybackError, PlaybackEvent, PlaybackHandler,
            PlayerConfig,
        };
        use platform::mocks::{MockClock, MockEeprom, MockPlayer};
        use platform::PlayerVolume;

        #[derive(Default)]
        struct Recorder {
            played: Vec<(u8, u8)>,
            stopped: Vec<(u8, u8)>,
            timed_out: Vec<(u8, u8)>,
        }

        impl PlaybackHandler for Recorder {
            fn on_play(&mut self, album: u8, track: u8) {
                self.played.push((album, track));
            }

            fn on_stop(&mut self, album: u8, track: u8) {
                self.stopped.push((album, track));
            }

            fn on_start_timeout(&mut self, album: u8, track: u8) {
                self.timed_out.push((album, track));
            }
        }

        fn eeprom_with(album: u8) -> MockEeprom<8> {
            MockEeprom::with_contents([album, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF])
        }

        #[test]
        fn test_engine_starts_idle_with_zero_selection() {
            let (player, eeprom, clock) = (MockPlayer::new(), eeprom_with(4), MockClock::new());
            let engine = PlaybackEngine::new(&player, &eeprom, &clock, PlayerConfig::new());
            assert!(!engine.is_playing());
            assert_eq!(engine.album(), 0);
            assert_eq!(engine.track(), 0);
            assert_eq!(engine.path(), "");
        }

        #[test]
        fn test_begin_loads_album_and_applies_volume() {
            let (player, eeprom, clock) = (MockPlayer::new(), eeprom_with(4), MockClock::new());
            let mut engine = PlaybackEngine::new(&player, &eeprom, &clock, PlayerConfig::new());
            engine.begin(PlayerVolume::DEFAULT).unwrap();
            assert_eq!(engine.album(), 4);
            assert_eq!(player.volume(), Some(PlayerVolume::DEFAULT));
        }

        #[test]
        fn test_begin_without_card_is_storage_unavailable() {
            let (player, eeprom, clock) = (MockPlayer::without_card(), eeprom_with(4), MockClock::new());
            let mut engine = PlaybackEngine::new(&player, &eeprom, &clock, PlayerConfig::new());
            assert_eq!(
                engine.begin(PlayerVolume::DEFAULT),
                Err(InitError::StorageUnavailable)
            );
            assert_eq!(engine.album(), 0);
        }

        #[test]
        fn test_begin_with_unreadable_settings() {
            let (player, eeprom, clock) = (MockPlayer::new(), eeprom_with(4), MockClock::new());
            eeprom.fail_reads(true);
            let mut engine = PlaybackEngine::new(&player, &eeprom, &clock, PlayerConfig::new());
            assert_eq!(
                engine.begin(PlayerVolume::DEFAULT),
                Err(InitError::SettingsUnavailable)
            );
        }

        #[test]
        fn test_play_existing_track_emits_started() {
            let (player, eeprom, clock) = (MockPlayer::new(), eeprom_with(2), MockClock::new());
            player.add_track("A2/T7.WAV");
            let mut engine = PlaybackEngine::new(&player, &eeprom, &clock, PlayerConfig::new())
                .with_handler(Recorder::default());
            engine.begin(PlayerVolume::DEFAULT).unwrap();

            let event = engine.play(7);
            assert_eq!(event, Some(PlaybackEvent::Started { album: 2, track: 7 }));
            assert!(engine.is_playing());
            assert_eq!(engine.handler().played, vec![(2, 7)]);
            assert_eq!(player.started(), vec!["A2/T7.WAV".to_string()]);
        }

        #[test]
        fn test_track_end_emits_stopped_on_tick() {
            let (player, eeprom, clock) = (MockPlayer::new(), eeprom_with(1), MockClock::new());
            player.add_track("A1/T3.WAV");
            let mut engine = PlaybackEngine::new(&player, &eeprom, &clock, PlayerConfig::new())
                .with_handler(Recorder::default());
            engine.begin(PlayerVolume::DEFAULT).unwrap();
            engine.play(3);

            assert_eq!(engine.tick(), None);
            player.finish();
            assert_eq!(
                engine.tick(),
                Some(PlaybackEvent::Stopped { album: 1, track: 3 })
            );
            assert_eq!(engine.tick(), None);
            assert_eq!(engine.handler().stopped, vec![(1, 3)]);
        }

        #[test]
        fn test_stop_halts_player_and_emits_stopped() {
            let (player, eeprom, clock) = (MockPlayer::new(), eeprom_with(1), MockClock::new());
            player.add_track("A1/T1.WAV");
            let mut engine = PlaybackEngine::new(&player, &eeprom, &clock, PlayerConfig::new());
            engine.begin(PlayerVolume::DEFAULT).unwrap();
            engine.play(1);

            assert_eq!(
                engine.stop(),
                Some(PlaybackEvent::Stopped { album: 1, track: 1 })
            );
            assert_eq!(player.stops(), 1);
            assert!(!engine.is_playing());
        }

        #[test]
        fn test_stop_while_idle_emits_nothing() {
            let (player, eeprom, clock) = (MockPlayer::new(), eeprom_with(1), MockClock::new());
            let mut engine = PlaybackEngine::new(&player, &eeprom, &clock, PlayerConfig::new());
            engine.begin(PlayerVolume::DEFAULT).unwrap();
            assert_eq!(engine.stop(), None);
        }

        #[test]
        fn test_play_while_playing_emits_no_second_start() {
            let (player, eeprom, clock) = (MockPlayer::new(), eeprom_with(1), MockClock::new());
            player.add_track("A1/T1.WAV");
            player.add_track("A1/T2.WAV");
            let mut engine = PlaybackEngine::new(&player, &eeprom, &clock, PlayerConfig::new());
            engine.begin(PlayerVolume::DEFAULT).unwrap();

            assert!(engine.play(1).is_some());
            assert_eq!(engine.play(2), None);
            assert!(engine.is_playing());
            assert_eq!(engine.track(), 2);
        }

        #[test]
        fn test_set_album_persists_and_reports_failure() {
            let (player, eeprom, clock) = (MockPlayer::new(), eeprom_with(1), MockClock::new());
            let mut engine = PlaybackEngine::new(&player, &eeprom, &clock, PlayerConfig::new());
            engine.begin(PlayerVolume::DEFAULT).unwrap();

            eeprom.fail_writes(true);
            assert_eq!(engine.set_album(6), Err(PlaybackError::SettingsWrite));
            assert_eq!(engine.album(), 6);
            assert_eq!(eeprom.byte(0), Some(1));

            eeprom.fail_writes(false);
            assert_eq!(engine.set_album(6), Ok(()));
            assert_eq!(eeprom.byte(0), Some(6));
        }

        #[test]
        fn test_missing_track_is_silent_by_default() {
            let (player, eeprom, clock) = (MockPlayer::new(), eeprom_with(2), MockClock::new());
            let mut engine = PlaybackEngine::new(&player, &eeprom, &clock, PlayerConfig::new());
            engine.begin(PlayerVolume::DEFAULT).unwrap();

            assert_eq!(engine.play(9), None);
            clock.advance_ms(60_000);
            assert_eq!(engine.tick(), None);
            assert!(engine.is_start_pending());
        }

        #[test]
        fn test_start_timeout_fires_once() {
            let (player, eeprom, clock) = (MockPlayer::new(), eeprom_with(2), MockClock::new());
            let config = PlayerConfig::new().start_timeout_ms(500);
            let mut engine = PlaybackEngine::new(&player, &eeprom, &clock, config)
                .with_handler(Recorder::default());
            engine.begin(PlayerVolume::DEFAULT).unwrap();

            assert_eq!(engine.play(9), None);
            clock.advance_ms(499);
            assert_eq!(engine.tick(), None);
            clock.advance_ms(1);
            assert_eq!(
                engine.tick(),
                Some(PlaybackEvent::StartTimedOut { album: 2, track: 9 })
            );
            clock.advance_ms(1_000);
            assert_eq!(engine.tick(), None);
            assert_eq!(engine.handler().timed_out, vec![(2, 9)]);
            assert!(engine.handler().played.is_empty());
        }

        #[test]
        fn test_start_timeout_cleared_by_late_start() {
            let (player, eeprom, clock) = (MockPlayer::new(), eeprom_with(2), MockClock::new());
            let config = PlayerConfig::new().start_timeout_ms(500);
            let mut engine = PlaybackEngine::new(&player, &eeprom, &clock, config);
            engine.begin(PlayerVolume::DEFAULT).unwrap();

            engine.play(9);
            clock.advance_ms(100);
            player.set_active(true);
            assert_eq!(
                engine.tick(),
                Some(PlaybackEvent::Started { album: 2, track: 9 })
            );
            assert!(!engine.is_start_pending());
            clock.advance_ms(1_000);
            assert_eq!(engine.tick(), None);
        }

        #[test]
        fn test_observe_reports_selection() {
            let (player, eeprom, clock) = (MockPlayer::new(), eeprom_with(3), MockClock::new());
            player.add_track("A3/T4.WAV");
            let mut engine = PlaybackEngine::new(&player, &eeprom, &clock, PlayerConfig::new());
            engine.begin(PlayerVolume::DEFAULT).unwrap();
            engine.play(4);

            let snapshot = engine.observe();
            assert!(snapshot.is_playing);
            assert_eq!(snapshot.album, 3);
            assert_eq!(snapshot.track, 4);
            assert_eq!(snapshot.path.as_str(), "A3/T4.WAV");
        }
    }
}
