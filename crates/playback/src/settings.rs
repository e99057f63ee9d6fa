//! Persisted album selection.
//!
//! One byte at [`ALBUM_SETTING_OFFSET`] holds the album id. No version, no
//! checksum. Writes only happen when the value differs from the one last
//! known to be on the device, which keeps EEPROM wear down to one write per
//! actual change.

use platform::config::ALBUM_SETTING_OFFSET;
use platform::{ByteStorage, ReadStorage};

use crate::path::AlbumId;

/// Write-if-changed cell for the album byte.
pub struct AlbumSetting<S> {
    store: S,
    offset: u32,
    stored: Option<AlbumId>,
}

impl<S: ByteStorage> AlbumSetting<S> {
    /// Use the board's album offset.
    pub fn new(store: S) -> Self {
        Self::at_offset(store, ALBUM_SETTING_OFFSET)
    }

    /// Use a custom byte offset.
    pub fn at_offset(store: S, offset: u32) -> Self {
        Self {
            store,
            offset,
            stored: None,
        }
    }

    /// Read the album byte from the device.
    pub fn load(&mut self) -> Result<AlbumId, S::Error> {
        let mut buf = [0u8; 1];
        self.store.read(self.offset, &mut buf)?;
        let [album] = buf;
        self.stored = Some(album);
        Ok(album)
    }

    /// Persist `album` unless the device already holds it.
    ///
    /// Returns whether a write happened. A failed write leaves the cached
    /// value untouched so the next call retries.
    pub fn store(&mut self, album: AlbumId) -> Result<bool, S::Error> {
        if self.stored == Some(album) {
            return Ok(false);
        }
        self.store.write(self.offset, &[album])?;
        self.stored = Some(album);
        Ok(true)
    }

    /// Value last read from or written to the device.
    pub fn cached(&self) -> Option<AlbumId> {
        self.stored
    }

    /// The underlying byte store.
    pub fn storage(&self) -> &S {
        &self.store
    }
}
