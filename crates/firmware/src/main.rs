//! Music Black Box - desktop simulator
//!
//! Runs the control loop and the music box against mock peripherals, driven
//! by a short script of key presses and remote frames. LEDs and buzzer are
//! rendered to the log.
//!
//! ```bash
//! RUST_LOG=debug cargo run -p firmware --features emulator
//! ```

use core::convert::Infallible;

use embassy_time::{Duration, Instant};
use embedded_hal::digital::{ErrorType as PinErrorType, OutputPin};
use embedded_hal::spi::{ErrorType as SpiErrorType, Operation, SpiDevice};
use firmware::{ControlLoop, LoopConfig, MusicBox, Peripherals};
use platform::config::{PANEL_LED_COUNT, REMOTE_DIGITS};
use platform::mocks::{MockEeprom, MockIrDecoder, MockMatrix, MockPlayer};
use platform::SystemClock;
use tracing_subscriber::EnvFilter;

const TICK: Duration = Duration::from_millis(10);

/// Panel shift register rendered as a row of lamps.
struct ConsoleLeds;

impl SpiErrorType for ConsoleLeds {
    type Error = Infallible;
}

impl SpiDevice for ConsoleLeds {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Infallible> {
        for op in operations.iter() {
            if let Operation::Write(bytes) = op {
                if let Some(&pattern) = bytes.last() {
                    let lamps: String = (0..PANEL_LED_COUNT)
                        .map(|n| if pattern & 1u8.wrapping_shl(u32::from(n)) != 0 { '*' } else { '.' })
                        .collect();
                    tracing::info!("[LED] {lamps}");
                }
            }
        }
        Ok(())
    }
}

/// Buzzer pin rendered as log lines.
struct ConsoleBuzzer {
    on_since: Option<Instant>,
}

impl PinErrorType for ConsoleBuzzer {
    type Error = Infallible;
}

impl OutputPin for ConsoleBuzzer {
    fn set_low(&mut self) -> Result<(), Infallible> {
        if let Some(since) = self.on_since.take() {
            let length = Instant::now().saturating_duration_since(since);
            tracing::debug!("[BUZZER] beep {} ms", length.as_millis());
        }
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.on_since = Some(Instant::now());
        Ok(())
    }
}

enum Step {
    Wait(u64),
    Press { key: u8, hold_ms: u64 },
    Remote(u16),
    TrackEnds,
}

const SCRIPT: &[Step] = &[
    Step::Wait(500),
    Step::Press { key: 3, hold_ms: 150 },
    Step::Wait(1_000),
    Step::Press { key: 2, hold_ms: 2_200 },
    Step::Wait(800),
    Step::Press { key: 1, hold_ms: 150 },
    Step::Wait(500),
    Step::Remote(REMOTE_DIGITS[4]),
    Step::Wait(500),
    Step::TrackEnds,
    Step::Wait(300),
    Step::Remote(0x45),
    Step::Wait(1_000),
    Step::Press { key: 5, hold_ms: 150 },
    Step::Wait(3_500),
];

type SimLoop<'a> = ControlLoop<
    &'a MockMatrix,
    &'a MockIrDecoder,
    &'a MockPlayer,
    &'a MockEeprom<64>,
    ConsoleLeds,
    ConsoleBuzzer,
    SystemClock,
>;

async fn run_for(control: &mut SimLoop<'_>, app: &mut MusicBox, ms: u64) {
    let until = Instant::now()
        .checked_add(Duration::from_millis(ms))
        .unwrap_or(Instant::MAX);
    while Instant::now() < until {
        control.tick(app);
        tokio::time::sleep(core::time::Duration::from_millis(TICK.as_millis())).await;
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let matrix = MockMatrix::new();
    let ir = MockIrDecoder::new();
    let player = MockPlayer::new();
    for album in 1..=3 {
        for track in 1..=8 {
            player.add_track(&format!("A{album}/T{track}.WAV"));
        }
    }
    let eeprom = MockEeprom::<64>::with_contents([1; 64]);

    let peripherals = Peripherals {
        matrix: &matrix,
        ir: &ir,
        player: &player,
        store: &eeprom,
        leds: ConsoleLeds,
        buzzer: ConsoleBuzzer { on_since: None },
    };
    let config = LoopConfig {
        idle_timeout_ms: 3_000,
        ..LoopConfig::new()
    };
    let mut control = ControlLoop::new(peripherals, SystemClock, config);
    let mut app = MusicBox::new();

    if let Err(err) = control.begin() {
        tracing::error!("boot failed: {err}");
        run_for(&mut control, &mut app, 2_000).await;
        return;
    }

    for step in SCRIPT {
        match *step {
            Step::Wait(ms) => run_for(&mut control, &mut app, ms).await,
            Step::Press { key, hold_ms } => {
                tracing::debug!("[SIM] press key {key} for {hold_ms} ms");
                matrix.press(key);
                run_for(&mut control, &mut app, hold_ms).await;
                matrix.release();
            }
            Step::Remote(code) => {
                tracing::debug!("[SIM] remote {code:#x}");
                ir.push_nec(code);
            }
            Step::TrackEnds => {
                tracing::debug!("[SIM] track ends");
                player.finish();
            }
        }
    }

    let status = control.status();
    tracing::info!(
        album = status.album,
        playing = status.is_playing,
        writes = eeprom.writes(),
        "simulation finished"
    );
}
