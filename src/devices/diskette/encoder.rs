//! 6-and-2 GCR track encoder: translates a sequentially stored track (16 ×
//! 256-byte sectors) into the self-synchronising nibble stream the Disk II
//! ROM driver expects.
//!
//! Ported from `retro/emu/device/diskette/encode.go`. The 6-and-2 bit-pack
//! is borrowed from the same source the Go code credits:
//! <https://github.com/TomHarte/dsk2woz> (MIT License).

const ADDR_PROLOGUE: [u8; 3] = [0xD5, 0xAA, 0x96];
const ADDR_EPILOGUE: [u8; 3] = [0xDE, 0xAA, 0xEB];
const DATA_PROLOGUE: [u8; 3] = [0xD5, 0xAA, 0xAD];
const DATA_EPILOGUE: [u8; 3] = [0xDE, 0xAA, 0xEB];

const VOLUME: u8 = 0xFE;

#[rustfmt::skip]
const SIX_AND_TWO: [u8; 64] = [
    0x96, 0x97, 0x9A, 0x9B, 0x9D, 0x9E, 0x9F, 0xA6,
    0xA7, 0xAB, 0xAC, 0xAD, 0xAE, 0xAF, 0xB2, 0xB3,
    0xB4, 0xB5, 0xB6, 0xB7, 0xB9, 0xBA, 0xBB, 0xBC,
    0xBD, 0xBE, 0xBF, 0xCB, 0xCD, 0xCE, 0xCF, 0xD3,
    0xD6, 0xD7, 0xD9, 0xDA, 0xDB, 0xDC, 0xDD, 0xDE,
    0xDF, 0xE5, 0xE6, 0xE7, 0xE9, 0xEA, 0xEB, 0xEC,
    0xED, 0xEE, 0xEF, 0xF2, 0xF3, 0xF4, 0xF5, 0xF6,
    0xF7, 0xF9, 0xFA, 0xFB, 0xFC, 0xFD, 0xFE, 0xFF,
];

const BIT_REVERSE_2: [u8; 4] = [0, 2, 1, 3];

/// Track/sector encoder. Stateless; reusable across tracks.
#[derive(Default)]
pub struct Encoder;

impl Encoder {
    pub fn new() -> Self {
        Self
    }

    /// Encodes a track (physical sectors in storage order) into its GCR
    /// nibble stream, writing sectors out in the standard 6-and-2 logical
    /// interleave: physical sector `n` is placed at logical position
    /// `(n*7) % 15` for `n < 15`, and at `15` for `n == 15`.
    pub fn encode(&self, track_number: u8, sectors: &[[u8; 256]; 16]) -> Vec<u8> {
        let mut out = Vec::new();

        for num in 0..16u8 {
            let sec = if num == 15 { 15 } else { (num * 7) % 15 };

            out.extend_from_slice(&ADDR_PROLOGUE);
            out.extend_from_slice(&four_and_four(VOLUME));
            out.extend_from_slice(&four_and_four(track_number));
            out.extend_from_slice(&four_and_four(num));
            out.extend_from_slice(&four_and_four(VOLUME ^ track_number ^ num));
            out.extend_from_slice(&ADDR_EPILOGUE);

            out.extend_from_slice(&DATA_PROLOGUE);
            out.extend_from_slice(&six_and_two(&sectors[sec as usize]));
            out.extend_from_slice(&DATA_EPILOGUE);
        }
        out
    }
}

fn four_and_four(b: u8) -> [u8; 2] {
    [(b >> 1) | 0xAA, b | 0xAA]
}

/// Encodes a 256-byte sector payload into 343 GCR bytes (342 data nibbles
/// plus one checksum nibble).
fn six_and_two(sector: &[u8; 256]) -> [u8; 0x157] {
    let mut buf = [0u8; 0x157];

    for i in 0..0x54 {
        buf[i] = BIT_REVERSE_2[(sector[i] & 0x03) as usize]
            | BIT_REVERSE_2[(sector[i + 0x56] & 0x03) as usize] << 2
            | BIT_REVERSE_2[(sector[i + 0xAC] & 0x03) as usize] << 4;
    }
    buf[0x54] =
        BIT_REVERSE_2[(sector[0x54] & 0x03) as usize] | BIT_REVERSE_2[(sector[0xAA] & 0x03) as usize] << 2;
    buf[0x55] =
        BIT_REVERSE_2[(sector[0x55] & 0x03) as usize] | BIT_REVERSE_2[(sector[0xAB] & 0x03) as usize] << 2;

    for i in 0..0x100 {
        buf[i + 0x56] = sector[i] >> 2;
    }

    // Running XOR checksum, applied last-to-first.
    buf[0x156] = buf[0x155];
    let mut pos = 0x156;
    while pos > 1 {
        pos -= 1;
        buf[pos] ^= buf[pos - 1];
    }

    for b in buf.iter_mut() {
        *b = SIX_AND_TWO[*b as usize];
    }
    buf
}
