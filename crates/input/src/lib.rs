//! Front-panel input: debounced keypad gestures and the infrared remote.
//!
//! - [`Keypad`] turns repeated key-matrix scans into short/long press
//!   gestures.
//! - [`ShiftRegisterMatrix`] is the board's [`platform::KeyMatrix`]: four
//!   columns strobed through a shift register, two return lines.
//! - [`IrReceiver`] filters and rate-limits decoded remote frames.
//!
//! Every component is polled: call `tick()` once per control-loop
//! iteration. Nothing here blocks or allocates.
#![cfg_attr(not(test), no_std)]
#![deny(clippy::unwrap_used)]
#![warn(missing_docs)]

pub mod key;
pub mod keypad;
pub mod matrix;
pub mod remote;

pub use key::KeyId;
pub use keypad::{Gesture, GestureHandler, Keypad, KeypadConfig};
pub use matrix::ShiftRegisterMatrix;
pub use remote::{IrReceiver, RemoteHandler};
