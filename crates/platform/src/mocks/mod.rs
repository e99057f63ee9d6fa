//! Mock implementations for testing
//!
//! Every mock uses interior mutability and implements its contract for a
//! shared reference, so a test can hand `&mock` to a component and keep
//! driving or inspecting the same mock afterwards.

use core::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::string::String;
use std::vec::Vec;

use crate::*;

/// Manually stepped monotonic clock.
pub struct MockClock {
    now: Cell<Instant>,
}

impl MockClock {
    /// Create a clock reading zero.
    pub fn new() -> Self {
        Self {
            now: Cell::new(Instant::from_millis(0)),
        }
    }

    /// Move time forward by `ms` milliseconds.
    pub fn advance_ms(&self, ms: u64) {
        let next = self.now.get().as_millis().saturating_add(ms);
        self.now.set(Instant::from_millis(next));
    }

    /// Jump to an absolute timestamp.
    pub fn set_ms(&self, ms: u64) {
        self.now.set(Instant::from_millis(ms));
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// Key matrix whose asserted lines are set by the test.
pub struct MockMatrix {
    mask: Cell<u8>,
    scans: Cell<usize>,
}

impl MockMatrix {
    /// Create a matrix with no line asserted.
    pub fn new() -> Self {
        Self {
            mask: Cell::new(0),
            scans: Cell::new(0),
        }
    }

    /// Assert exactly the lines in `mask`.
    pub fn set(&self, mask: u8) {
        self.mask.set(mask);
    }

    /// Hold down key `id` (1-based line number).
    pub fn press(&self, id: u8) {
        self.mask.set(1u8.wrapping_shl(u32::from(id.saturating_sub(1))));
    }

    /// Release every key.
    pub fn release(&self) {
        self.mask.set(0);
    }

    /// Number of scans performed so far.
    pub fn scans(&self) -> usize {
        self.scans.get()
    }
}

impl Default for MockMatrix {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyMatrix for &MockMatrix {
    fn read_raw(&mut self) -> u8 {
        self.scans.set(self.scans.get().saturating_add(1));
        self.mask.get()
    }
}

/// Error reported by [`MockPlayer::mount`] when the card is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoCard;

/// WAV player that "plays" any path registered in its library.
pub struct MockPlayer {
    card_present: Cell<bool>,
    active: Cell<bool>,
    volume: Cell<Option<PlayerVolume>>,
    library: RefCell<Vec<String>>,
    started: RefCell<Vec<String>>,
    stops: Cell<usize>,
}

impl MockPlayer {
    /// Create a player with a mountable, empty card.
    pub fn new() -> Self {
        Self {
            card_present: Cell::new(true),
            active: Cell::new(false),
            volume: Cell::new(None),
            library: RefCell::new(Vec::new()),
            started: RefCell::new(Vec::new()),
            stops: Cell::new(0),
        }
    }

    /// Create a player whose card cannot be mounted.
    pub fn without_card() -> Self {
        let player = Self::new();
        player.card_present.set(false);
        player
    }

    /// Put a playable file on the card.
    pub fn add_track(&self, path: &str) {
        self.library.borrow_mut().push(String::from(path));
    }

    /// Simulate the current file reaching its end.
    pub fn finish(&self) {
        self.active.set(false);
    }

    /// Force the activity signal.
    pub fn set_active(&self, active: bool) {
        self.active.set(active);
    }

    /// Paths passed to `start`, oldest first.
    pub fn started(&self) -> Vec<String> {
        self.started.borrow().clone()
    }

    /// Number of `stop` calls.
    pub fn stops(&self) -> usize {
        self.stops.get()
    }

    /// Last volume applied.
    pub fn volume(&self) -> Option<PlayerVolume> {
        self.volume.get()
    }
}

impl Default for MockPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioFilePlayer for &MockPlayer {
    type Error = NoCard;

    fn mount(&mut self) -> Result<(), Self::Error> {
        if self.card_present.get() {
            Ok(())
        } else {
            Err(NoCard)
        }
    }

    fn set_volume(&mut self, volume: PlayerVolume) {
        self.volume.set(Some(volume));
    }

    fn start(&mut self, path: &str) {
        self.started.borrow_mut().push(String::from(path));
        let playable = self.library.borrow().iter().any(|p| p == path);
        self.active.set(playable);
    }

    fn stop(&mut self) {
        self.stops.set(self.stops.get().saturating_add(1));
        self.active.set(false);
    }

    fn is_active(&self) -> bool {
        self.active.get()
    }
}

/// Failure injected into [`MockEeprom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockStorageError {
    /// Access outside the device
    OutOfBounds,
    /// Injected read failure
    ReadFailed,
    /// Injected write failure
    WriteFailed,
}

/// Byte-addressable EEPROM that counts writes.
pub struct MockEeprom<const N: usize> {
    cells: RefCell<[u8; N]>,
    writes: Cell<usize>,
    fail_reads: Cell<bool>,
    fail_writes: Cell<bool>,
}

impl<const N: usize> MockEeprom<N> {
    /// Create an erased device (every byte 0xFF).
    pub fn erased() -> Self {
        Self::with_contents([0xFF; N])
    }

    /// Create a device with the given contents.
    pub fn with_contents(cells: [u8; N]) -> Self {
        Self {
            cells: RefCell::new(cells),
            writes: Cell::new(0),
            fail_reads: Cell::new(false),
            fail_writes: Cell::new(false),
        }
    }

    /// Byte currently stored at `offset`.
    pub fn byte(&self, offset: usize) -> Option<u8> {
        self.cells.borrow().get(offset).copied()
    }

    /// Number of successful write operations.
    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    /// Make every subsequent read fail (or succeed again).
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.set(fail);
    }

    /// Make every subsequent write fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }
}

impl<const N: usize> ReadStorage for &MockEeprom<N> {
    type Error = MockStorageError;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        if self.fail_reads.get() {
            return Err(MockStorageError::ReadFailed);
        }
        let start = usize::try_from(offset).map_err(|_| MockStorageError::OutOfBounds)?;
        let end = start
            .checked_add(bytes.len())
            .ok_or(MockStorageError::OutOfBounds)?;
        let cells = self.cells.borrow();
        let src = cells.get(start..end).ok_or(MockStorageError::OutOfBounds)?;
        bytes.copy_from_slice(src);
        Ok(())
    }

    fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> ByteStorage for &MockEeprom<N> {
    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        if self.fail_writes.get() {
            return Err(MockStorageError::WriteFailed);
        }
        let start = usize::try_from(offset).map_err(|_| MockStorageError::OutOfBounds)?;
        let end = start
            .checked_add(bytes.len())
            .ok_or(MockStorageError::OutOfBounds)?;
        let mut cells = self.cells.borrow_mut();
        let dst = cells
            .get_mut(start..end)
            .ok_or(MockStorageError::OutOfBounds)?;
        dst.copy_from_slice(bytes);
        self.writes.set(self.writes.get().saturating_add(1));
        Ok(())
    }
}

/// IR decoder fed with frames by the test.
pub struct MockIrDecoder {
    frames: RefCell<VecDeque<IrFrame>>,
}

impl MockIrDecoder {
    /// Create a decoder with nothing pending.
    pub fn new() -> Self {
        Self {
            frames: RefCell::new(VecDeque::new()),
        }
    }

    /// Queue a frame for the next `poll`.
    pub fn push(&self, frame: IrFrame) {
        self.frames.borrow_mut().push_back(frame);
    }

    /// Queue an NEC frame carrying `command`.
    pub fn push_nec(&self, command: u16) {
        self.push(IrFrame {
            protocol: IrProtocol::Nec,
            address: 0x00,
            command,
            raw: u32::from(command),
        });
    }

    /// Frames not yet polled.
    pub fn pending(&self) -> usize {
        self.frames.borrow().len()
    }
}

impl Default for MockIrDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl IrDecoder for &MockIrDecoder {
    fn poll(&mut self) -> Option<IrFrame> {
        self.frames.borrow_mut().pop_front()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_clock_advances() {
        let clock = MockClock::new();
        clock.advance_ms(250);
        assert_eq!(clock.now().as_millis(), 250);
        assert_eq!(clock.elapsed_since(Instant::from_millis(100)).as_millis(), 150);
    }

    #[test]
    fn test_clock_elapsed_saturates() {
        let clock = MockClock::new();
        assert_eq!(clock.elapsed_since(Instant::from_millis(500)).as_millis(), 0);
    }

    #[test]
    fn test_mock_matrix_press_sets_one_hot() {
        let matrix = MockMatrix::new();
        matrix.press(3);
        assert_eq!((&matrix).read_raw(), 0b0000_0100);
        matrix.release();
        assert_eq!((&matrix).read_raw(), 0);
        assert_eq!(matrix.scans(), 2);
    }

    #[test]
    fn test_mock_player_only_plays_known_paths() {
        let player = MockPlayer::new();
        player.add_track("A1/T1.WAV");
        let mut handle = &player;
        handle.start("A1/T2.WAV");
        assert!(!handle.is_active());
        handle.start("A1/T1.WAV");
        assert!(handle.is_active());
        handle.stop();
        assert!(!handle.is_active());
        assert_eq!(player.stops(), 1);
    }

    #[test]
    fn test_mock_eeprom_counts_writes() {
        let eeprom = MockEeprom::<4>::erased();
        let mut handle = &eeprom;
        handle.write(0, &[7]).unwrap();
        let mut buf = [0u8; 1];
        handle.read(0, &mut buf).unwrap();
        assert_eq!(buf, [7]);
        assert_eq!(eeprom.writes(), 1);
        assert_eq!(handle.write(4, &[1]), Err(MockStorageError::OutOfBounds));
    }
}
