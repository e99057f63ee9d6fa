//! The music box: eight keys, eight tracks, one album at a time.
//!
//! | Input                 | Action                                      |
//! |-----------------------|---------------------------------------------|
//! | short press, key *n*  | play track *n*, or stop it if it is playing |
//! | long press, key *n*   | select album *n*, confirm with three beeps  |
//! | remote digit 1..9     | as a short press of key *n*                 |
//! | remote digit 0        | stop                                        |
//! | other remote key      | two long beeps                              |
//! | idle timeout          | stop                                        |
//!
//! The panel LED of the playing track is lit while it plays.

use platform::config::REMOTE_DIGITS;
use playback::{PlaybackEvent, TrackId};
use platform::debug;

use crate::buzzer::Cue;
use crate::control::{Application, Command, Commands, Event, Status};

/// Default appliance behaviour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MusicBox {
    remote_digits: [u16; 10],
}

impl MusicBox {
    /// Music box with the board's remote key codes.
    pub const fn new() -> Self {
        Self {
            remote_digits: REMOTE_DIGITS,
        }
    }

    /// Use a different remote handset; `digits[d]` is the code of digit `d`.
    #[must_use]
    pub const fn with_remote_digits(mut self, digits: [u16; 10]) -> Self {
        self.remote_digits = digits;
        self
    }

    fn digit(&self, command: u16) -> Option<u8> {
        let index = self.remote_digits.iter().position(|&code| code == command)?;
        u8::try_from(index).ok()
    }

    fn select_track(track: TrackId, status: Status, commands: &mut Commands) {
        if status.is_playing {
            commands.push(Command::Stop);
            if status.track == track {
                return;
            }
        }
        commands.push(Command::Play(track));
    }
}

impl Default for MusicBox {
    fn default() -> Self {
        Self::new()
    }
}

impl Application for MusicBox {
    fn handle(&mut self, event: Event, status: Status, commands: &mut Commands) {
        match event {
            Event::ShortPress(key) => Self::select_track(key.get(), status, commands),
            Event::LongPress(key) => {
                commands.push(Command::SetAlbum(key.get()));
                commands.push(Command::Beep(Cue::DataWritten));
            }
            Event::Remote(code) => match self.digit(code) {
                Some(0) => {
                    commands.push(Command::Stop);
                }
                Some(track) => {
                    commands.push(Command::Beep(Cue::Infrared));
                    Self::select_track(track, status, commands);
                }
                None => {
                    debug!("[IR] unmapped command {:#x}", code);
                    commands.push(Command::Beep(Cue::InvalidCommand));
                }
            },
            Event::Playback(PlaybackEvent::Started { track, .. }) => {
                commands.push(Command::Led { id: track, on: true });
                commands.push(Command::Activity);
            }
            Event::Playback(PlaybackEvent::Stopped { track, .. }) => {
                commands.push(Command::Led { id: track, on: false });
                commands.push(Command::Activity);
            }
            Event::Playback(PlaybackEvent::StartTimedOut { .. }) => {
                commands.push(Command::Beep(Cue::InvalidCommand));
            }
            Event::Idle => {
                if status.is_playing {
                    commands.push(Command::Stop);
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use input::KeyId;

    fn handle(event: Event, status: Status) -> Vec<Command> {
        let mut commands = Commands::new();
        MusicBox::new().handle(event, status, &mut commands);
        commands.into_iter().collect()
    }

    fn idle() -> Status {
        Status {
            is_playing: false,
            album: 1,
            track: 0,
        }
    }

    fn playing(track: u8) -> Status {
        Status {
            is_playing: true,
            album: 1,
            track,
        }
    }

    fn key(id: u8) -> KeyId {
        KeyId::new(id).unwrap()
    }

    #[test]
    fn test_short_press_plays_track() {
        assert_eq!(
            handle(Event::ShortPress(key(3)), idle()),
            vec![Command::Play(3)]
        );
    }

    #[test]
    fn test_short_press_of_playing_track_stops_it() {
        assert_eq!(
            handle(Event::ShortPress(key(3)), playing(3)),
            vec![Command::Stop]
        );
    }

    #[test]
    fn test_short_press_of_other_track_switches() {
        assert_eq!(
            handle(Event::ShortPress(key(4)), playing(3)),
            vec![Command::Stop, Command::Play(4)]
        );
    }

    #[test]
    fn test_long_press_selects_album() {
        assert_eq!(
            handle(Event::LongPress(key(5)), idle()),
            vec![Command::SetAlbum(5), Command::Beep(Cue::DataWritten)]
        );
    }

    #[test]
    fn test_remote_digit_acts_as_key() {
        assert_eq!(
            handle(Event::Remote(REMOTE_DIGITS[7]), idle()),
            vec![Command::Beep(Cue::Infrared), Command::Play(7)]
        );
        assert_eq!(handle(Event::Remote(REMOTE_DIGITS[0]), playing(2)), vec![Command::Stop]);
    }

    #[test]
    fn test_unknown_remote_code_is_rejected() {
        assert_eq!(
            handle(Event::Remote(0xBEEF), idle()),
            vec![Command::Beep(Cue::InvalidCommand)]
        );
    }

    #[test]
    fn test_custom_remote_digits() {
        let mut app = MusicBox::new().with_remote_digits([10, 11, 12, 13, 14, 15, 16, 17, 18, 19]);
        let mut commands = Commands::new();
        app.handle(Event::Remote(12), idle(), &mut commands);
        assert_eq!(commands.as_slice(), &[Command::Beep(Cue::Infrared), Command::Play(2)]);
    }

    #[test]
    fn test_playback_mirrors_onto_leds() {
        let started = Event::Playback(PlaybackEvent::Started { album: 1, track: 6 });
        let stopped = Event::Playback(PlaybackEvent::Stopped { album: 1, track: 6 });
        assert_eq!(
            handle(started, playing(6)),
            vec![Command::Led { id: 6, on: true }, Command::Activity]
        );
        assert_eq!(
            handle(stopped, idle()),
            vec![Command::Led { id: 6, on: false }, Command::Activity]
        );
    }

    #[test]
    fn test_start_timeout_rejects_track() {
        let timed_out = Event::Playback(PlaybackEvent::StartTimedOut { album: 1, track: 4 });
        assert_eq!(handle(timed_out, idle()), vec![Command::Beep(Cue::InvalidCommand)]);
    }

    #[test]
    fn test_idle_stops_only_when_playing() {
        assert_eq!(handle(Event::Idle, playing(1)), vec![Command::Stop]);
        assert!(handle(Event::Idle, idle()).is_empty());
    }
}
