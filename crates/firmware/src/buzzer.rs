//! Piezo buzzer driven as a non-blocking tone sequencer.
//!
//! A cue is one or more code bytes. Each byte describes up to four beeps:
//! bit `4 + i` of the high nibble enables slot `i`, and bit `i` of the low
//! nibble makes that beep long. Slots sound in order, each beep followed by
//! a fixed silence.
//!
//! ```text
//! 0x70 = 0111_0000  → short, short, short
//! 0x77 = 0111_0111  → long, long, long
//! 0x30 = 0011_0000  → short, short
//! ```
//!
//! [`Buzzer::tick`] advances the sequence against the clock; nothing here
//! sleeps.

use embassy_time::{Duration, Instant};
use embedded_hal::digital::OutputPin;
use heapless::Deque;
use platform::Clock;
use platform::{trace, warn};

/// Length of a long beep.
pub const LONG_TONE: Duration = Duration::from_millis(300);
/// Length of a short beep.
pub const SHORT_TONE: Duration = Duration::from_millis(100);
/// Silence after every beep.
pub const TONE_GAP: Duration = Duration::from_millis(50);
/// Code bytes that can wait behind the one sounding.
pub const QUEUE_DEPTH: usize = 8;

const SLOTS: u8 = 4;

/// Named signal patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Cue {
    /// Three short, three long, three short
    Sos,
    /// Two long beeps
    InvalidCommand,
    /// Four long beeps
    FatalError,
    /// One short beep
    SystemReady,
    /// Three short beeps
    DataWritten,
    /// Two short beeps
    Infrared,
}

impl Cue {
    /// Code bytes of this cue, in playing order.
    pub const fn codes(self) -> &'static [u8] {
        match self {
            Self::Sos => &[0x70, 0x77, 0x70],
            Self::InvalidCommand => &[0x33],
            Self::FatalError => &[0xFF],
            Self::SystemReady => &[0x10],
            Self::DataWritten => &[0x70],
            Self::Infrared => &[0x30],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Tone,
    Gap,
}

#[derive(Debug, Clone, Copy)]
struct Beeping {
    code: u8,
    slot: u8,
    phase: Phase,
    until: Instant,
}

fn next_slot(code: u8, from: u8) -> Option<u8> {
    (from..SLOTS).find(|&slot| code & 0x10u8.wrapping_shl(u32::from(slot)) != 0)
}

fn tone_length(code: u8, slot: u8) -> Duration {
    if code & 0x01u8.wrapping_shl(u32::from(slot)) != 0 {
        LONG_TONE
    } else {
        SHORT_TONE
    }
}

fn deadline(now: Instant, length: Duration) -> Instant {
    now.checked_add(length).unwrap_or(Instant::MAX)
}

/// Buzzer on a push-pull output pin.
pub struct Buzzer<PIN, C> {
    pin: PIN,
    clock: C,
    queue: Deque<u8, QUEUE_DEPTH>,
    current: Option<Beeping>,
}

impl<PIN: OutputPin, C: Clock> Buzzer<PIN, C> {
    /// Wrap the buzzer pin. The pin is not touched until the first beep.
    pub fn new(pin: PIN, clock: C) -> Self {
        Self {
            pin,
            clock,
            queue: Deque::new(),
            current: None,
        }
    }

    /// Queue a raw code byte. Returns `false` if the queue is full.
    pub fn encode(&mut self, code: u8) -> bool {
        if self.queue.push_back(code).is_err() {
            warn!("[BUZZER] queue full, dropping {:#x}", code);
            return false;
        }
        true
    }

    /// Queue every code of `cue`, or none of them if the queue lacks room.
    pub fn play(&mut self, cue: Cue) -> bool {
        let codes = cue.codes();
        if self.queue.capacity().saturating_sub(self.queue.len()) < codes.len() {
            warn!("[BUZZER] queue full, dropping {} codes", codes.len());
            return false;
        }
        codes.iter().all(|&code| self.encode(code))
    }

    /// Three short, three long, three short.
    pub fn sos(&mut self) -> bool {
        self.play(Cue::Sos)
    }

    /// Two long beeps.
    pub fn invalid_command(&mut self) -> bool {
        self.play(Cue::InvalidCommand)
    }

    /// Four long beeps.
    pub fn fatal_error(&mut self) -> bool {
        self.play(Cue::FatalError)
    }

    /// One short beep.
    pub fn system_ready(&mut self) -> bool {
        self.play(Cue::SystemReady)
    }

    /// Three short beeps.
    pub fn data_written(&mut self) -> bool {
        self.play(Cue::DataWritten)
    }

    /// Two short beeps.
    pub fn infrared(&mut self) -> bool {
        self.play(Cue::Infrared)
    }

    /// Whether a beep is sounding or queued.
    pub fn is_busy(&self) -> bool {
        self.current.is_some() || !self.queue.is_empty()
    }

    /// Drop everything queued and silence the pin.
    pub fn silence(&mut self) {
        self.queue.clear();
        if self.current.take().is_some() {
            self.drive(false);
        }
    }

    /// Advance the sequence. Call once per loop iteration.
    pub fn tick(&mut self) {
        let now = self.clock.now();
        // Each pass either returns or retires a code, so this ends.
        loop {
            match self.current {
                Some(Beeping { until, .. }) if now < until => return,
                Some(Beeping {
                    code,
                    slot,
                    phase: Phase::Tone,
                    ..
                }) => {
                    self.drive(false);
                    self.current = Some(Beeping {
                        code,
                        slot,
                        phase: Phase::Gap,
                        until: deadline(now, TONE_GAP),
                    });
                    return;
                }
                Some(Beeping {
                    code,
                    slot,
                    phase: Phase::Gap,
                    ..
                }) => {
                    if let Some(next) = next_slot(code, slot.saturating_add(1)) {
                        self.start_tone(code, next, now);
                        return;
                    }
                    self.current = None;
                }
                None => {
                    let Some(code) = self.queue.pop_front() else {
                        return;
                    };
                    trace!("[BUZZER] code {:#x}", code);
                    if let Some(slot) = next_slot(code, 0) {
                        self.start_tone(code, slot, now);
                        return;
                    }
                }
            }
        }
    }

    /// Release the pin.
    pub fn release(self) -> PIN {
        self.pin
    }

    fn start_tone(&mut self, code: u8, slot: u8, now: Instant) {
        self.drive(true);
        self.current = Some(Beeping {
            code,
            slot,
            phase: Phase::Tone,
            until: deadline(now, tone_length(code, slot)),
        });
    }

    fn drive(&mut self, on: bool) {
        let result = if on {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        if result.is_err() {
            warn!("[BUZZER] pin write failed");
        }
    }
}
