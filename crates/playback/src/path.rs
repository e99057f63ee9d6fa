//! Track file naming on the storage medium.
//!
//! Albums are directories `A<n>`, tracks are files `T<n>.WAV` inside them,
//! with decimal numbers and no zero padding: album 2, track 7 is
//! `A2/T7.WAV`.

use core::fmt::Write as _;

/// Album number (0–255).
pub type AlbumId = u8;

/// Track number within an album (0–255).
pub type TrackId = u8;

/// Bytes reserved for a track path. The longest path, `A255/T255.WAV`, is 13.
pub const TRACK_PATH_CAPACITY: usize = 16;

/// Bounded path of a track file.
pub type TrackPath = heapless::String<TRACK_PATH_CAPACITY>;

/// Path of `track` in `album`.
pub fn track_path(album: AlbumId, track: TrackId) -> TrackPath {
    let mut path = TrackPath::new();
    // Cannot overflow: at most 13 of 16 bytes.
    let _ = write!(path, "A{album}/T{track}.WAV");
    path
}
