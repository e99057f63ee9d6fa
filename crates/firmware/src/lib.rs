//! Music Black Box firmware
//!
//! Glue between the front panel and the player: a cooperative control loop
//! polling the keypad, the infrared remote, the WAV player, the idle monitor
//! and the buzzer, with the appliance behaviour supplied as an
//! [`Application`].
//!
//! # Architecture
//!
//! ```text
//! Application (app::MusicBox)
//!         ↓ commands      ↑ events
//! Control loop (control)
//!         ↓
//! Feature crates (input, playback) + indicators (panel_leds, buzzer, idle)
//!         ↓
//! Platform HAL (platform, embedded-hal)
//! ```
//!
//! # Features
//!
//! - `emulator` - Desktop simulator binary (tokio, tracing)
//! - `defmt` - Log through defmt on hardware
//! - `tracing` - Log through tracing on the host
//! - `std` - Enable standard library (for emulator and testing)

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
// Logging discipline
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![warn(clippy::dbg_macro)] // dbg! should not be left in committed code
// Intentional allows for this codebase:
#![allow(clippy::module_name_repetitions)] // common in Rust crates; not a real issue
#![allow(clippy::missing_errors_doc)] // most errors are self-explanatory
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::similar_names)]

pub mod app;
pub mod buzzer;
pub mod control;
pub mod idle;
pub mod panel_leds;

pub use app::MusicBox;
pub use buzzer::{Buzzer, Cue};
pub use control::{
    Application, Command, Commands, ControlLoop, Event, LoopConfig, Peripherals, Status,
};
pub use idle::{IdleHandler, IdleMonitor};
pub use panel_leds::PanelLeds;
