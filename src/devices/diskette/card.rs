//! Apple Disk II Interface Card: two drives, the I/O soft-switch dispatch
//! table, and the card-ROM ($Cn00-$CnFF) passthrough.
//!
//! Ported from `retro/emu/device/diskette/card.go`.

use crate::memory::Device;

use super::drive::Drive;

/// Disk II boot ROM disables the stepper-settle wait loop at this offset so
/// the emulated drive can seek instantly; the stock ROM spins here waiting
/// for the physical head to settle, which the emulation has no reason to
/// model.
const WAIT_PATCH_OFFSET: usize = 0x4C;

pub struct DisketteCard {
    rom: Vec<u8>,
    drive1: Drive,
    drive2: Drive,
    selected: u8,
    slot: u8,
}

impl DisketteCard {
    pub fn new(rom: &[u8]) -> Self {
        let mut patched = rom.to_vec();
        if patched.len() > WAIT_PATCH_OFFSET + 2 {
            patched[WAIT_PATCH_OFFSET] = 0xA9; // LDA #
            patched[WAIT_PATCH_OFFSET + 1] = 0x00;
            patched[WAIT_PATCH_OFFSET + 2] = 0xEA; // NOP
        }

        let mut card = Self {
            rom: patched,
            drive1: Drive::new(),
            drive2: Drive::new(),
            selected: 0,
            slot: 0,
        };
        card.reset();
        card
    }

    pub fn drive(&mut self, num: u8) -> &mut Drive {
        if num & 0x01 == 0 {
            &mut self.drive1
        } else {
            &mut self.drive2
        }
    }

    fn hot(&mut self) -> &mut Drive {
        if self.selected == 0 {
            &mut self.drive1
        } else {
            &mut self.drive2
        }
    }

    /// Dispatches one of the sixteen `0xC080|(slot<<4) + n` switches.
    /// Mirrors the ordering of the Disk II soft-switch table: phase
    /// on/off pairs, motor on/off, drive select, then the Q6/Q7 shift and
    /// read/write mode switches (the latter three are unimplemented reads
    /// for write-protected, read-only emulation).
    fn dispatch(&mut self, n: u8) -> u8 {
        match n {
            0x00 => {
                self.hot().phase(0, false);
                0
            }
            0x01 => {
                self.hot().phase(0, true);
                0
            }
            0x02 => {
                self.hot().phase(1, false);
                0
            }
            0x03 => {
                self.hot().phase(1, true);
                0
            }
            0x04 => {
                self.hot().phase(2, false);
                0
            }
            0x05 => {
                self.hot().phase(2, true);
                0
            }
            0x06 => {
                self.hot().phase(3, false);
                0
            }
            0x07 => {
                self.hot().phase(3, true);
                0
            }
            0x08 => {
                self.hot().motor(false);
                0
            }
            0x09 => {
                self.hot().motor(true);
                0
            }
            0x0A => {
                self.selected = 0;
                0
            }
            0x0B => {
                self.selected = 1;
                0
            }
            0x0C => self.hot().track_reader().read(),
            0x0D | 0x0E | 0x0F => 0,
            _ => unreachable!(),
        }
    }
}

impl Device for DisketteCard {
    fn try_read(&mut self, lo: u8, hi: u8) -> Option<u8> {
        if self.slot == 0 || self.slot > 7 {
            return None;
        }
        if hi == 0xC0 | self.slot {
            return Some(self.rom[lo as usize]);
        }
        if hi == 0xC0 && lo >= 0x80 | (self.slot << 4) && lo <= 0x8F | (self.slot << 4) {
            return Some(self.dispatch(lo & 0x0F));
        }
        None
    }

    fn try_write(&mut self, lo: u8, hi: u8, _value: u8) -> bool {
        if self.slot == 0 || self.slot > 7 {
            return false;
        }
        if hi == 0xC0 | self.slot {
            return true;
        }
        if hi == 0xC0 && lo >= 0x80 | (self.slot << 4) && lo <= 0x8F | (self.slot << 4) {
            self.dispatch(lo & 0x0F);
            return true;
        }
        false
    }

    fn reset(&mut self) {
        self.drive1.motor(false);
        self.drive2.motor(false);
    }

    fn slot_assigned(&mut self, slot: u8) {
        self.slot = slot & 0x07;
    }
}
