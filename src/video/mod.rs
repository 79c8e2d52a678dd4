//! Video output driver: soft-switch mode tracking and per-mode rendering
//! into a 280x192 RGBA framebuffer.
//!
//! Ported from `retro/emu/device/render/driver.go`.

mod font;
mod hires;
mod lores;
pub mod palette;
mod text;

pub use font::{Font, Glyph};
pub use hires::HiRes;
pub use lores::LoRes;
pub use text::Text;

use crate::memory::Device;

pub const WIDTH: usize = 280;
pub const HEIGHT: usize = 192;

const SWITCH_TEXT: u8 = 0x01;
const SWITCH_MIXED: u8 = 0x02;
const SWITCH_PAGE2: u8 = 0x04;
const SWITCH_HIRES: u8 = 0x08;

/// Soft-switch-driven output driver. Owns the canvas and dispatches to the
/// Text/LoRes/HiRes renderers according to the current mode bits.
pub struct VideoDriver {
    text: Text,
    lores: LoRes,
    hires: HiRes,
    canvas: Vec<u8>,
    mode: u8,
}

impl VideoDriver {
    pub fn new(text: Text, lores: LoRes, hires: HiRes) -> Self {
        let mut driver = Self {
            text,
            lores,
            hires,
            canvas: vec![0u8; WIDTH * HEIGHT * 4],
            mode: SWITCH_TEXT,
        };
        driver.reset();
        driver
    }

    fn set_mode(&mut self, lo: u8) -> bool {
        match lo & 0x07 {
            0x00 => self.mode &= !SWITCH_TEXT,
            0x01 => self.mode |= SWITCH_TEXT,
            // TEXT mode makes MIXED/HIRES don't-cares on real hardware; the
            // switches are still recorded unconditionally here, matching
            // the reference driver's active (non-commented-out) behaviour.
            0x02 => self.mode &= !SWITCH_MIXED,
            0x03 => self.mode |= SWITCH_MIXED,
            0x04 => self.mode &= !SWITCH_PAGE2,
            0x05 => self.mode |= SWITCH_PAGE2,
            0x06 => self.mode &= !SWITCH_HIRES,
            0x07 => self.mode |= SWITCH_HIRES,
            _ => return false,
        }
        true
    }

    /// Renders the current mode into the internal canvas and returns it.
    pub fn render(&mut self, flash: bool) -> &[u8] {
        let page = (self.mode >> 2) & 0x01;

        if self.mode & SWITCH_TEXT != 0 {
            self.text.render(page, &mut self.canvas, flash);
            return &self.canvas;
        }

        if self.mode & SWITCH_HIRES != 0 {
            self.hires.render(page, &mut self.canvas);
        } else {
            self.lores.render(page, &mut self.canvas);
        }

        if self.mode & SWITCH_MIXED != 0 {
            self.text.mixed(page, &mut self.canvas, flash);
        }

        &self.canvas
    }
}

impl Device for VideoDriver {
    fn try_read(&mut self, lo: u8, hi: u8) -> Option<u8> {
        if hi != 0xC0 || lo < 0x50 || lo > 0x57 {
            return None;
        }
        if self.set_mode(lo) {
            Some(0)
        } else {
            None
        }
    }

    fn try_write(&mut self, lo: u8, hi: u8, _value: u8) -> bool {
        if hi != 0xC0 || lo < 0x50 || lo > 0x57 {
            return false;
        }
        self.set_mode(lo)
    }

    fn reset(&mut self) {
        self.mode = SWITCH_TEXT;
    }

    fn slot_assigned(&mut self, _slot: u8) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::RawMemory;

    fn driver() -> VideoDriver {
        let mem = RawMemory::new();
        let mut bitmap = vec![0u8; 256 * 8];
        bitmap[0] = 0xFF;
        let font = Font::from_bitmap(&bitmap, [0xFF, 0xFF, 0xFF, 0xFF]).unwrap();
        let text = Text::new(mem.clone(), 0x0400, 0x0800, font);
        let lores = LoRes::new(mem.clone(), 0x0400, 0x0800, &palette::LORES);
        let hires = HiRes::new(mem, 0x2000, 0x4000, &palette::HIRES);
        VideoDriver::new(text, lores, hires)
    }

    #[test]
    fn resets_to_text_mode() {
        let mut d = driver();
        d.try_write(0x06, 0xC0, 0); // HIRES off (no-op, already off)
        d.reset();
        assert_eq!(d.mode, SWITCH_TEXT);
    }

    #[test]
    fn outside_switch_range_is_unclaimed() {
        let mut d = driver();
        assert_eq!(d.try_read(0x60, 0xC0), None);
        assert!(!d.try_write(0x49, 0xC0, 0));
    }

    #[test]
    fn enabling_hires_clears_text_bit_path() {
        let mut d = driver();
        d.try_write(0x00, 0xC0, 0); // TEXT off
        d.try_write(0x07, 0xC0, 0); // HIRES on
        assert_eq!(d.mode & SWITCH_TEXT, 0);
        assert_ne!(d.mode & SWITCH_HIRES, 0);
    }

    #[test]
    fn render_in_text_mode_returns_canvas_of_expected_size() {
        let mut d = driver();
        let frame = d.render(false);
        assert_eq!(frame.len(), WIDTH * HEIGHT * 4);
    }
}
