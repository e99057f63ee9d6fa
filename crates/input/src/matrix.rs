//! Shift-register strobed key matrix.
//!
//! # Wiring
//!
//! | Signal        | Connection                                   |
//! |---------------|----------------------------------------------|
//! | Column 0–3    | 74HC595 outputs Q0–Q3 (active low)           |
//! | Latch         | SPI chip select of the `SpiDevice`           |
//! | Row 0 (`D0`)  | Return line for keys 1–4 (active low)        |
//! | Row 1 (`D1`)  | Return line for keys 5–8 (active low)        |
//!
//! One scan strobes each column low in turn and samples both return lines.
//! A key on column *n* sets bit *n* (row 0) or bit *n + 4* (row 1).

use embedded_hal::digital::InputPin;
use embedded_hal::spi::SpiDevice;
use platform::KeyMatrix;
use platform::warn;

/// Number of strobed columns.
pub const COLUMNS: u8 = 4;

/// Four-column, two-row key matrix behind a shift register.
pub struct ShiftRegisterMatrix<SPI, R0, R1> {
    columns: SPI,
    row0: R0,
    row1: R1,
}

impl<SPI, R0, R1> ShiftRegisterMatrix<SPI, R0, R1>
where
    SPI: SpiDevice,
    R0: InputPin,
    R1: InputPin,
{
    /// Build the scanner from the column shift register and the two return
    /// lines (already configured as inputs with pull-ups).
    pub fn new(columns: SPI, row0: R0, row1: R1) -> Self {
        Self {
            columns,
            row0,
            row1,
        }
    }

    /// Give the bus and pins back.
    pub fn release(self) -> (SPI, R0, R1) {
        (self.columns, self.row0, self.row1)
    }
}

fn line_asserted<P: InputPin>(pin: &mut P) -> bool {
    // Active low; a read error counts as not asserted.
    pin.is_low().unwrap_or(false)
}

impl<SPI, R0, R1> KeyMatrix for ShiftRegisterMatrix<SPI, R0, R1>
where
    SPI: SpiDevice,
    R0: InputPin,
    R1: InputPin,
{
    fn read_raw(&mut self) -> u8 {
        let mut state = 0u8;
        for column in 0..COLUMNS {
            let select = 1u8.wrapping_shl(u32::from(column));
            if self.columns.write(&[!select]).is_err() {
                warn!("[KEYPAD] column {} strobe failed", column);
                continue;
            }
            if line_asserted(&mut self.row0) {
                state |= select;
            }
            if line_asserted(&mut self.row1) {
                state |= select.wrapping_shl(u32::from(COLUMNS));
            }
        }
        state
    }
}
