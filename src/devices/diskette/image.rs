//! DOS 3.3 disk image (.dsk): 35 tracks of 16 sectors, each 256 bytes.
//! Track 0 is the outermost location.
//!
//! Ported from `retro/emu/device/diskette/image.go`.

use super::encoder::Encoder;
use super::reader::TrackReader;

pub const TRACKS: usize = 35;
pub const SECTORS_PER_TRACK: usize = 16;
pub const SECTOR_SIZE: usize = 256;

const HALF_TRACKS: usize = TRACKS * 2;

struct Track {
    sectors: [[u8; SECTOR_SIZE]; SECTORS_PER_TRACK],
    track: u8,
}

/// A loaded floppy image plus its precomputed per-half-track nibble streams.
///
/// Only even half-tracks hold real sector data; odd half-tracks are encoded
/// from all-zero sectors, giving the head something to read while seeking
/// between tracks without ever exposing unencoded bytes.
pub struct Image {
    readers: Vec<TrackReader>,
    half_track: usize,
}

impl Image {
    /// Loads a `.dsk` image (sequential, non-interleaved sector order) and
    /// GCR-encodes every half-track up front.
    pub fn load(data: &[u8]) -> Result<Self, String> {
        let encoder = Encoder::new();
        let mut tracks: Vec<Track> = Vec::with_capacity(TRACKS);

        for t in 0..TRACKS {
            let mut sectors = [[0u8; SECTOR_SIZE]; SECTORS_PER_TRACK];
            for (s, sector) in sectors.iter_mut().enumerate() {
                let offset = (t * SECTORS_PER_TRACK + s) * SECTOR_SIZE;
                if offset >= data.len() {
                    break;
                }
                let end = (offset + SECTOR_SIZE).min(data.len());
                sector[..end - offset].copy_from_slice(&data[offset..end]);
            }
            tracks.push(Track {
                sectors,
                track: t as u8,
            });
        }

        let empty_sectors = [[0u8; SECTOR_SIZE]; SECTORS_PER_TRACK];
        let mut readers = Vec::with_capacity(HALF_TRACKS);
        for t in 0..HALF_TRACKS {
            let buf = if t & 0x01 == 0 {
                let track = &tracks[t >> 1];
                encoder.encode(track.track, &track.sectors)
            } else {
                encoder.encode((0xFF - t) as u8, &empty_sectors)
            };
            readers.push(TrackReader::new(buf));
        }

        Ok(Self {
            readers,
            half_track: 0,
        })
    }

    pub fn half_track_in(&mut self) {
        self.half_track += 1;
        if self.half_track >= HALF_TRACKS {
            self.half_track = HALF_TRACKS - 1;
        }
    }

    pub fn half_track_out(&mut self) {
        self.half_track = self.half_track.saturating_sub(1);
    }

    pub fn track_reader(&mut self) -> &mut TrackReader {
        &mut self.readers[self.half_track]
    }
}
