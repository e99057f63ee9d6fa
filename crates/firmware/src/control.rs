//! Cooperative control loop.
//!
//! The loop owns every peripheral adapter and polls them in a fixed order:
//!
//! ```text
//! keypad → IR receiver → player → idle monitor → buzzer
//! ```
//!
//! Whatever an adapter reports becomes an [`Event`]. The [`Application`]
//! decides what to do and answers with [`Command`]s, which the loop executes
//! before polling the next adapter. Commands that move the player can produce
//! follow-up events (a `Play` usually yields `Started` right away); those are
//! fed back to the application in the same pass.

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;
use heapless::{Deque, Vec};
use input::{Gesture, IrReceiver, KeyId, Keypad, KeypadConfig};
use platform::config::{app_title, APP_VERSION, IDLE_TIMEOUT_MS, IR_HOLDOFF_MS};
use platform::{AudioFilePlayer, ByteStorage, Clock, IrDecoder, KeyMatrix, PlayerVolume};
use playback::{AlbumId, InitError, PlaybackEngine, PlaybackEvent, PlayerConfig, TrackId};
use platform::{error, info, trace, warn};

use crate::buzzer::{Buzzer, Cue};
use crate::idle::IdleMonitor;
use crate::panel_leds::PanelLeds;

/// Commands one event may produce.
pub const COMMAND_CAPACITY: usize = 8;

/// Events handled per adapter report, follow-ups included.
const EVENT_BUDGET: usize = 8;

// ---------------------------------------------------------------------------
// Events, commands, application
// ---------------------------------------------------------------------------

/// Something the loop observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Key released before the long-press threshold
    ShortPress(KeyId),
    /// Key held for the long-press threshold
    LongPress(KeyId),
    /// Command code from the infrared remote
    Remote(u16),
    /// Player transition
    Playback(PlaybackEvent),
    /// No activity for the idle timeout
    Idle,
}

/// Something the application wants done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Play a track of the selected album
    Play(TrackId),
    /// Halt the player
    Stop,
    /// Select and persist an album
    SetAlbum(AlbumId),
    /// Switch a panel LED (1..=8)
    Led {
        /// LED number
        id: u8,
        /// Lit or dark
        on: bool,
    },
    /// Queue a buzzer cue
    Beep(Cue),
    /// Restart the idle window
    Activity,
}

/// Bounded list of commands returned by an [`Application`].
#[derive(Debug, Default)]
pub struct Commands(Vec<Command, COMMAND_CAPACITY>);

impl Commands {
    /// Empty list.
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Append `command`. Returns `false` (and drops it) when full.
    pub fn push(&mut self, command: Command) -> bool {
        if self.0.push(command).is_err() {
            warn!("[LOOP] command list full");
            return false;
        }
        true
    }

    /// Queued commands, in order.
    pub fn as_slice(&self) -> &[Command] {
        &self.0
    }

    /// Number of queued commands.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl IntoIterator for Commands {
    type Item = Command;
    type IntoIter = <Vec<Command, COMMAND_CAPACITY> as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Player state visible to the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status {
    /// Player activity as of the last sample
    pub is_playing: bool,
    /// Selected album
    pub album: AlbumId,
    /// Track of the last play request
    pub track: TrackId,
}

/// Appliance behaviour.
pub trait Application {
    /// React to `event`, pushing any commands into `commands`.
    fn handle(&mut self, event: Event, status: Status, commands: &mut Commands);
}

impl<A: Application + ?Sized> Application for &mut A {
    fn handle(&mut self, event: Event, status: Status, commands: &mut Commands) {
        (**self).handle(event, status, commands);
    }
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

/// Hardware handed to the loop.
pub struct Peripherals<M, D, P, S, SPI, PIN> {
    /// Keypad matrix scanner
    pub matrix: M,
    /// Infrared frame decoder
    pub ir: D,
    /// WAV player
    pub player: P,
    /// Settings storage
    pub store: S,
    /// Panel LED shift register
    pub leds: SPI,
    /// Buzzer output
    pub buzzer: PIN,
}

/// Loop configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopConfig {
    /// Keypad timing
    pub keypad: KeypadConfig,
    /// Player options
    pub player: PlayerConfig,
    /// Volume applied at `begin`
    pub volume: PlayerVolume,
    /// Idle timeout, zero to disable
    pub idle_timeout_ms: u64,
    /// IR hold-off after each decoded frame
    pub ir_holdoff_ms: u64,
}

impl LoopConfig {
    /// Board defaults.
    pub const fn new() -> Self {
        Self {
            keypad: KeypadConfig::new(),
            player: PlayerConfig::new(),
            volume: PlayerVolume::DEFAULT,
            idle_timeout_ms: IDLE_TIMEOUT_MS,
            ir_holdoff_ms: IR_HOLDOFF_MS,
        }
    }
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Loop
// ---------------------------------------------------------------------------

/// The appliance's main loop.
pub struct ControlLoop<M, D, P, S, SPI, PIN, C> {
    keypad: Keypad<M, C>,
    remote: IrReceiver<D, C>,
    player: PlaybackEngine<P, S, C>,
    idle: IdleMonitor<C>,
    buzzer: Buzzer<PIN, C>,
    leds: PanelLeds<SPI>,
    config: LoopConfig,
}

impl<M, D, P, S, SPI, PIN, C> ControlLoop<M, D, P, S, SPI, PIN, C>
where
    M: KeyMatrix,
    D: IrDecoder,
    P: AudioFilePlayer,
    S: ByteStorage,
    SPI: SpiDevice,
    PIN: OutputPin,
    C: Clock + Clone,
{
    /// Wire the adapters. Nothing touches hardware until [`begin`](Self::begin).
    pub fn new(peripherals: Peripherals<M, D, P, S, SPI, PIN>, clock: C, config: LoopConfig) -> Self {
        let Peripherals {
            matrix,
            ir,
            player,
            store,
            leds,
            buzzer,
        } = peripherals;
        Self {
            keypad: Keypad::new(matrix, clock.clone(), config.keypad),
            remote: IrReceiver::new(ir, clock.clone()).with_holdoff_ms(config.ir_holdoff_ms),
            player: PlaybackEngine::new(player, store, clock.clone(), config.player),
            idle: IdleMonitor::new(clock.clone()),
            buzzer: Buzzer::new(buzzer, clock),
            leds: PanelLeds::new(leds),
            config,
        }
    }

    /// Bring the board up: LEDs dark, idle monitor armed, medium mounted,
    /// album loaded.
    ///
    /// Beeps `system_ready` on success. On failure the buzzer signals the
    /// cause (`fatal_error` for the medium, `sos` for the settings) and the
    /// error is returned; the loop may still be ticked to sound it.
    pub fn begin(&mut self) -> Result<(), InitError> {
        info!("{} v{}", app_title(), APP_VERSION);
        if self.leds.begin().is_err() {
            warn!("[LED] init failed");
        }
        self.idle.begin(self.config.idle_timeout_ms);
        match self.player.begin(self.config.volume) {
            Ok(()) => {
                self.buzzer.system_ready();
                Ok(())
            }
            Err(err) => {
                error!("[INIT] {}", err);
                match err {
                    InitError::StorageUnavailable => self.buzzer.fatal_error(),
                    InitError::SettingsUnavailable => self.buzzer.sos(),
                };
                Err(err)
            }
        }
    }

    /// One loop iteration.
    pub fn tick<A: Application>(&mut self, app: &mut A) {
        if let Some(gesture) = self.keypad.tick() {
            self.idle.set_activity();
            let event = match gesture {
                Gesture::Short(key) => Event::ShortPress(key),
                Gesture::Long(key) => Event::LongPress(key),
            };
            self.dispatch(app, event);
        }

        if let Some(command) = self.remote.tick() {
            self.idle.set_activity();
            self.dispatch(app, Event::Remote(command));
        }

        if let Some(event) = self.player.tick() {
            self.dispatch(app, Event::Playback(event));
        }

        if self.idle.tick() {
            self.dispatch(app, Event::Idle);
        }

        self.buzzer.tick();
    }

    /// Player state as the application sees it.
    pub fn status(&self) -> Status {
        Status {
            is_playing: self.player.is_playing(),
            album: self.player.album(),
            track: self.player.track(),
        }
    }

    /// The playback engine.
    pub fn player(&self) -> &PlaybackEngine<P, S, C> {
        &self.player
    }

    /// The panel LEDs.
    pub fn leds(&self) -> &PanelLeds<SPI> {
        &self.leds
    }

    /// The buzzer.
    pub fn buzzer(&self) -> &Buzzer<PIN, C> {
        &self.buzzer
    }

    /// The keypad.
    pub fn keypad(&self) -> &Keypad<M, C> {
        &self.keypad
    }

    fn dispatch<A: Application>(&mut self, app: &mut A, event: Event) {
        let mut pending: Deque<Event, EVENT_BUDGET> = Deque::new();
        let mut budget = EVENT_BUDGET;
        let mut next = Some(event);

        while let Some(event) = next {
            let Some(left) = budget.checked_sub(1) else {
                warn!("[LOOP] event budget exhausted");
                return;
            };
            budget = left;

            trace!("[LOOP] {:?}", event);
            let mut commands = Commands::new();
            app.handle(event, self.status(), &mut commands);
            for command in commands {
                if let Some(follow_up) = self.execute(command) {
                    if pending.push_back(follow_up).is_err() {
                        warn!("[LOOP] dropping follow-up event");
                    }
                }
            }
            next = pending.pop_front();
        }
    }

    fn execute(&mut self, command: Command) -> Option<Event> {
        match command {
            Command::Play(track) => self.player.play(track).map(Event::Playback),
            Command::Stop => self.player.stop().map(Event::Playback),
            Command::SetAlbum(album) => {
                if let Err(err) = self.player.set_album(album) {
                    warn!("[CFG-SAVE] {}", err);
                }
                None
            }
            Command::Led { id, on } => {
                if self.leds.set_led(id, on).is_err() {
                    warn!("[LED] update failed");
                }
                None
            }
            Command::Beep(cue) => {
                self.buzzer.play(cue);
                None
            }
            Command::Activity => {
                self.idle.set_activity();
                None
            }
        }
    }
}
