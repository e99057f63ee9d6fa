//! Hardware Abstraction Layer (HAL) for the Music Black Box appliance
//!
//! This crate provides the narrow contracts through which the control core
//! talks to hardware, enabling development and testing without a board.
//!
//! # Architecture Layers
//!
//! ```text
//! Control loop (firmware crate)
//!         ↓
//! Feature Layers (input, playback)
//!         ↓
//! Platform HAL (this crate - trait abstractions)
//!         ↓
//! Hardware Layer (HAL drivers, WAV engine, IR decoder)
//! ```
//!
//! # Contracts
//!
//! - [`KeyMatrix`] - Multiplexed keypad scan
//! - [`IrDecoder`] - Infrared remote frames
//! - [`AudioFilePlayer`] - WAV playback from removable storage
//! - [`ByteStorage`] - Non-volatile settings bytes (`embedded-storage`)
//! - [`Clock`] - Monotonic time (`embassy-time`)
//!
//! Indicator outputs (shift registers, buzzer) use the `embedded-hal` 1.0
//! traits directly.
//!
//! # Features
//!
//! - `std`: Enable standard library support and the [`mocks`] module
//! - `defmt`: Enable defmt logging derives

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![allow(clippy::doc_markdown)]
#![allow(clippy::must_use_candidate)] // hardware accessors; callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod audio;
pub mod audio_types;
pub mod clock;
pub mod config;
pub mod input;

mod fmt;

#[cfg(any(test, feature = "std"))]
pub mod mocks;

// Re-export main contracts
pub use audio::AudioFilePlayer;
pub use audio_types::{OutOfRangeError, PlayerVolume};
pub use clock::{Clock, SystemClock};
pub use input::{IrDecoder, IrFrame, IrProtocol, KeyMatrix};

// Persisted settings go through the embedded-storage byte contract.
pub use embedded_storage::{ReadStorage, Storage as ByteStorage};

// Time types used across the workspace.
pub use embassy_time::{Duration, Instant};
