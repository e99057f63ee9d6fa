//! Front-panel LEDs behind a 74HC595 shift register.
//!
//! One byte per update, clocked out MSB first over SPI with the latch on the
//! chip-select line. Bit `n - 1` drives LED `n`.

use embedded_hal::spi::SpiDevice;
use platform::config::PANEL_LED_COUNT;
use platform::debug;

/// Eight indicator LEDs on a latched shift register.
pub struct PanelLeds<SPI> {
    spi: SPI,
    state: u8,
}

impl<SPI: SpiDevice> PanelLeds<SPI> {
    /// Wrap the shift register's SPI device. Nothing is written until
    /// [`begin`](Self::begin).
    pub fn new(spi: SPI) -> Self {
        Self { spi, state: 0 }
    }

    /// Switch every LED off.
    pub fn begin(&mut self) -> Result<(), SPI::Error> {
        self.set_data(0x00)
    }

    /// Latch `mask` onto the LEDs.
    ///
    /// The cached state follows `mask` even if the transfer fails, so the
    /// next update carries the intended pattern.
    pub fn set_data(&mut self, mask: u8) -> Result<(), SPI::Error> {
        self.state = mask;
        self.spi.write(&[mask])
    }

    /// Switch LED `id` (1..=8) on or off. Other ids are ignored.
    pub fn set_led(&mut self, id: u8, on: bool) -> Result<(), SPI::Error> {
        if id == 0 || id > PANEL_LED_COUNT {
            debug!("[LED] ignoring id {}", id);
            return Ok(());
        }
        let bit = 1u8.wrapping_shl(u32::from(id.saturating_sub(1)));
        let mask = if on { self.state | bit } else { self.state & !bit };
        self.set_data(mask)
    }

    /// Last pattern written (or attempted).
    pub fn state(&self) -> u8 {
        self.state
    }

    /// Release the SPI device.
    pub fn release(self) -> SPI {
        self.spi
    }
}
