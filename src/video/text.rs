//! 40x24 text-mode renderer.
//!
//! Ported from `retro/emu/device/render/text.go`.

use crate::memory::RawMemory;

use super::font::Font;
use super::{HEIGHT, WIDTH};

const PAGE_LEN: usize = 0x400;

pub struct Text {
    mem: RawMemory,
    page1: u16,
    page2: u16,
    temp: [u8; PAGE_LEN],
    font: Font,
}

impl Text {
    pub fn new(mem: RawMemory, page1: u16, page2: u16, font: Font) -> Self {
        Self {
            mem,
            page1,
            page2,
            temp: [0u8; PAGE_LEN],
            font,
        }
    }

    fn snapshot(&mut self, page: u8) {
        let base = if page & 0x01 == 0 { self.page1 } else { self.page2 };
        for (i, slot) in self.temp.iter_mut().enumerate() {
            *slot = self.mem.read_addr(base.wrapping_add(i as u16));
        }
    }

    /// Renders all 24 rows.
    pub fn render(&mut self, page: u8, canvas: &mut [u8], flash: bool) {
        self.snapshot(page);
        for row in 0..24 {
            self.render_row(row, canvas, flash);
        }
    }

    /// Renders only the bottom four rows, for MIXED-mode overlay.
    pub fn mixed(&mut self, page: u8, canvas: &mut [u8], flash: bool) {
        self.snapshot(page);
        for row in 20..24 {
            self.render_row(row, canvas, flash);
        }
    }

    fn render_row(&self, row: usize, canvas: &mut [u8], flash: bool) {
        let mut x = 0usize;
        let y = row * (WIDTH << 5);
        let p = (row >> 3) * 0x28 + (row & 0x07) * 0x80;

        for i in 0..0x28 {
            let mut b = self.temp[p + i];
            if flash && b & 0x40 != 0 {
                b |= 0x80;
            }
            let g = self.font.glyph(b);

            let mut o = 0usize;
            for h in 0..8 {
                let src = &g[h * 32..h * 32 + 28];
                canvas[y + x + o..y + x + o + 28].copy_from_slice(src);
                o += WIDTH << 2;
            }
            x += 7 << 2;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Vec<u8> {
        vec![0u8; WIDTH * HEIGHT * 4]
    }

    fn font() -> Font {
        let mut bitmap = vec![0u8; 256 * 8];
        // Character 'A' (0x41): a recognisable top row so rendering is
        // observable.
        bitmap[0x41 * 8] = 0xFF;
        Font::from_bitmap(&bitmap, [0xFF, 0xFF, 0xFF, 0xFF]).unwrap()
    }

    #[test]
    fn render_writes_into_first_row_for_row_zero() {
        let mem = RawMemory::new();
        mem.write_addr(0x0400, 0x41);
        let mut text = Text::new(mem, 0x0400, 0x0800, font());
        let mut c = canvas();
        text.render(0, &mut c, false);
        // Top-left pixel of cell 0 should be painted white (bit set).
        assert_eq!(&c[0..4], &[0xFF, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn flash_sets_high_bit_for_flashing_characters() {
        let mem = RawMemory::new();
        // 0x41 with bit 6 set (0x40) marks a flashing char in this scheme.
        mem.write_addr(0x0400, 0x41 | 0x40);
        let mut text = Text::new(mem, 0x0400, 0x0800, font());
        let mut c = canvas();
        text.render(0, &mut c, true);
        // glyph(0x41|0xC0) = glyph(0xC1), distinct from glyph(0x41); just
        // assert no panic and canvas got written (non-default content
        // depends on font, so only check the write occurred).
        assert_ne!(c, canvas());
    }

    #[test]
    fn mixed_only_touches_bottom_four_rows() {
        let mem = RawMemory::new();
        mem.write_addr(0x0400, 0x41);
        let mut text = Text::new(mem, 0x0400, 0x0800, font());
        let mut c = canvas();
        text.mixed(0, &mut c, false);
        // Row 0 area should remain untouched.
        assert_eq!(&c[0..4], &[0, 0, 0, 0]);
    }
}
