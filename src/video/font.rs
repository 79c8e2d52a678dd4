//! Character glyph table: 256 entries of an 8x8 RGBA bitmap, used by the
//! text renderer.
//!
//! Ported from `retro/emu/device/render/font.go`. The original decodes a
//! PNG character sprite sheet; sprite decoding is out of scope here, so
//! `Font::from_bitmap` instead expands a raw 1-bit-per-pixel character ROM
//! image (256 glyphs x 8 rows x 8 bits), the same representation real
//! Apple II character ROM dumps ship in.

/// One glyph: an 8x8 grid of RGBA pixels, row-major.
pub type Glyph = [u8; 8 * 8 * 4];

pub struct Font {
    glyphs: Vec<Glyph>,
}

impl Font {
    /// Builds a `Font` directly from pre-rendered RGBA glyphs (one per byte
    /// value, in order).
    pub fn from_glyphs(glyphs: Vec<Glyph>) -> Result<Self, String> {
        if glyphs.len() != 256 {
            return Err(format!("font needs 256 glyphs, got {}", glyphs.len()));
        }
        Ok(Self { glyphs })
    }

    /// Builds a `Font` from a raw 1-bit-per-pixel character ROM image: 256
    /// glyphs, 8 bytes each, most-significant bit is the leftmost pixel. A
    /// set bit is painted `color`; a clear bit is opaque black.
    pub fn from_bitmap(bitmap: &[u8], color: [u8; 4]) -> Result<Self, String> {
        if bitmap.len() != 256 * 8 {
            return Err(format!(
                "character ROM image must be {} bytes, got {}",
                256 * 8,
                bitmap.len()
            ));
        }

        let mut glyphs = Vec::with_capacity(256);
        for ch in 0..256 {
            let mut glyph = [0u8; 8 * 8 * 4];
            for row in 0..8 {
                let bits = bitmap[ch * 8 + row];
                for col in 0..8 {
                    let set = bits & (0x80 >> col) != 0;
                    let px = if set { color } else { [0x00, 0x00, 0x00, 0xFF] };
                    let o = (row * 8 + col) * 4;
                    glyph[o..o + 4].copy_from_slice(&px);
                }
            }
            glyphs.push(glyph);
        }
        Ok(Self { glyphs })
    }

    pub fn glyph(&self, b: u8) -> &Glyph {
        &self.glyphs[b as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_glyphs_rejects_wrong_size() {
        assert!(Font::from_glyphs(vec![[0u8; 256]; 10]).is_err());
    }

    #[test]
    fn from_bitmap_rejects_wrong_size() {
        assert!(Font::from_bitmap(&[0u8; 10], [0xFF, 0xFF, 0xFF, 0xFF]).is_err());
    }

    #[test]
    fn from_bitmap_colors_set_bits() {
        let mut bitmap = vec![0u8; 256 * 8];
        bitmap[0] = 0x80; // char 0, row 0, leftmost pixel set
        let font = Font::from_bitmap(&bitmap, [0x11, 0x22, 0x33, 0xFF]).unwrap();
        let g = font.glyph(0);
        assert_eq!(&g[0..4], &[0x11, 0x22, 0x33, 0xFF]);
        assert_eq!(&g[4..8], &[0x00, 0x00, 0x00, 0xFF]);
    }
}
