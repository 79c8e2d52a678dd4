//! Keyboard translation: windowing-layer key codes to Apple II character
//! codes, and the reverse mapping used for pasted ASCII text.
//!
//! Ported from `retro/emu/input/keymap.go`. The embedder's key codes are
//! expected to follow the same numbering the original maps from (GLFW-style
//! codes); `space`, `,-./0-9A-Z` and a handful of punctuation/control keys.

use super::{KeyAction, KeyInput};

/// `[unshifted, shifted, ctrl, ctrl+shift, paste-ascii, paste-ascii-shifted]`
type KeyCode = [u8; 6];

/// `KeyMap` is stateless; translation is a pure lookup.
#[derive(Default)]
pub struct KeyMap;

impl KeyMap {
    pub fn new() -> Self {
        Self
    }

    /// Translates a keyboard stroke into the Apple II character the ROM
    /// keyboard soft switch should see. Returns `0x00` for unmapped keys or
    /// non-press/repeat actions.
    pub fn from_input(&self, e: KeyInput) -> u8 {
        if !matches!(e.action, KeyAction::Press | KeyAction::Repeat) {
            return 0x00;
        }
        match code_for(e.key) {
            Some(code) => code[(e.modifiers & 0x03) as usize],
            None => 0x00,
        }
    }

    /// Translates a pasted ASCII byte back into the `KeyInput` that would
    /// have produced it, for clipboard-paste emulation.
    pub fn from_ascii(&self, b: u8) -> KeyInput {
        for &(key, code) in BOTCHED.iter() {
            if code[4] != 0x00 && b == code[4] {
                return KeyInput::new(key, KeyAction::Press, 0);
            }
            if code[5] != 0x00 && b == code[5] {
                return KeyInput::new(key, KeyAction::Press, 1);
            }
        }
        KeyInput::new(0, KeyAction::Release, 0)
    }
}

fn code_for(key: i32) -> Option<&'static KeyCode> {
    BOTCHED.iter().find(|(k, _)| *k == key).map(|(_, c)| c)
}

#[rustfmt::skip]
const BOTCHED: &[(i32, KeyCode)] = &[
    //        KEY   SHIFT CTRL  BOTH     Paste: ASCII SHIFT
    (0x0020, [0xA0, 0xA0, 0xA0, 0xA0,     0x20, 0x20]), // space

    (0x002C, [0xAC, 0xBB, 0xAC, 0xBB,     0x2C, 0x3B]), // , ;
    (0x002D, [0x00, 0xBF, 0x00, 0xBF,     0x00, 0x3F]), //   ?
    (0x002E, [0xAE, 0xBA, 0xAE, 0xBA,     0x2E, 0x3A]), // . :
    (0x002F, [0xAD, 0x00, 0xAD, 0x00,     0x2D, 0x00]), //   -

    (0x0030, [0xB0, 0xBD, 0xB0, 0xBD,     0x30, 0x3D]), // 0 =
    (0x0031, [0xB1, 0xA1, 0xB1, 0xA1,     0x31, 0x21]), // 1 !
    (0x0032, [0xB2, 0xA2, 0xB2, 0xA2,     0x32, 0x22]), // 2 "
    (0x0033, [0xB3, 0xA3, 0xB3, 0xA3,     0x33, 0x23]), // 3 #
    (0x0034, [0xB4, 0xA4, 0xB4, 0xA4,     0x34, 0x24]), // 4 $
    (0x0035, [0xB5, 0xA5, 0xB5, 0xA5,     0x35, 0x25]), // 5 %
    (0x0036, [0xB6, 0xA6, 0xB6, 0xA6,     0x36, 0x26]), // 6 &
    (0x0037, [0xB7, 0xAF, 0xB7, 0xAF,     0x37, 0x2F]), // 7 /
    (0x0038, [0xB8, 0xA8, 0xB8, 0xA8,     0x38, 0x28]), // 8 (
    (0x0039, [0xB9, 0xA9, 0xB9, 0xA9,     0x39, 0x29]), // 9 )

    (0x0041, [0xC1, 0xC1, 0x81, 0x81,     0x41, 0x41]), //  A
    (0x0042, [0xC2, 0xC2, 0x82, 0x82,     0x42, 0x42]), //  B
    (0x0043, [0xC3, 0xC3, 0x83, 0x83,     0x43, 0x43]), //  C
    (0x0044, [0xC4, 0xC4, 0x84, 0x84,     0x44, 0x44]), //  D
    (0x0045, [0xC5, 0xC5, 0x85, 0x85,     0x45, 0x45]), //  E
    (0x0046, [0xC6, 0xC6, 0x86, 0x86,     0x46, 0x46]), //  F
    (0x0047, [0xC7, 0xC7, 0x87, 0x87,     0x47, 0x47]), //  G
    (0x0048, [0xC8, 0xC8, 0x88, 0x88,     0x48, 0x48]), //  H
    (0x0049, [0xC9, 0xC9, 0x89, 0x89,     0x49, 0x49]), //  I
    (0x004A, [0xCA, 0xCA, 0x8A, 0x8A,     0x4A, 0x4A]), //  J
    (0x004B, [0xCB, 0xCB, 0x8B, 0x8B,     0x4B, 0x4B]), //  K
    (0x004C, [0xCC, 0xCC, 0x8C, 0x8C,     0x4C, 0x4C]), //  L
    (0x004D, [0xCD, 0xDD, 0x8D, 0x9D,     0x4D, 0x5D]), // M ]
    (0x004E, [0xCE, 0xDE, 0x8E, 0x9E,     0x4E, 0x5E]), // N ^
    (0x004F, [0xCF, 0xCF, 0x8F, 0x8F,     0x4F, 0x4F]), //  O
    (0x0050, [0xD0, 0xC0, 0x90, 0x80,     0x50, 0x40]), // P @
    (0x0051, [0xD1, 0xD1, 0x91, 0x91,     0x51, 0x51]), //  Q
    (0x0052, [0xD2, 0xD2, 0x92, 0x00,     0x52, 0x52]), //  R
    (0x0053, [0xD3, 0xD3, 0x93, 0x93,     0x53, 0x53]), //  S
    (0x0054, [0xD4, 0xD4, 0x94, 0x94,     0x54, 0x54]), //  T
    (0x0055, [0xD5, 0xD5, 0x95, 0x95,     0x55, 0x55]), //  U
    (0x0056, [0xD6, 0xD6, 0x00, 0x96,     0x56, 0x56]), //  V
    (0x0057, [0xD7, 0xD7, 0x97, 0x97,     0x57, 0x57]), //  W
    (0x0058, [0xD8, 0xD8, 0x98, 0x98,     0x58, 0x58]), //  X
    (0x0059, [0xDA, 0xDA, 0x9A, 0x9A,     0x5A, 0x5A]), //  Y
    (0x005A, [0xD9, 0xD9, 0x99, 0x99,     0x59, 0x59]), //  Z

    (0x005C, [0xA3, 0xA7, 0xA3, 0xA7,     0x23, 0x27]), // # '
    (0x005D, [0xAB, 0xAA, 0xAB, 0xAA,     0x2B, 0x2A]), // + *
    (0x00A1, [0xBC, 0xBE, 0xBC, 0xBE,     0x3C, 0x3E]), // < >
    (0x0100, [0x9B, 0x9B, 0x9B, 0x9B,     0x00, 0x00]), // Esc
    (0x0101, [0x8D, 0x8D, 0x8D, 0x8D,     0x0A, 0x0A]), // Ret
    (0x0103, [0x88, 0x88, 0x88, 0x88,     0x00, 0x00]), // BS
    (0x0106, [0x95, 0x95, 0x95, 0x95,     0x00, 0x00]), // ->
    (0x0107, [0x88, 0x88, 0x88, 0x88,     0x00, 0x00]), // <-
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_unshifted_letter() {
        let map = KeyMap::new();
        let e = KeyInput::new(0x0041, KeyAction::Press, 0);
        assert_eq!(map.from_input(e), 0xC1);
    }

    #[test]
    fn translates_shifted_digit_to_symbol() {
        let map = KeyMap::new();
        let e = KeyInput::new(0x0031, KeyAction::Press, 1);
        assert_eq!(map.from_input(e), 0xA1); // '1' shifted -> '!'
    }

    #[test]
    fn ctrl_v_has_no_ctrl_shift_mapping() {
        let map = KeyMap::new();
        let e = KeyInput::new(0x0056, KeyAction::Press, 0x02);
        assert_eq!(map.from_input(e), 0x00);
    }

    #[test]
    fn release_action_never_translates() {
        let map = KeyMap::new();
        let e = KeyInput::new(0x0041, KeyAction::Release, 0);
        assert_eq!(map.from_input(e), 0x00);
    }

    #[test]
    fn unmapped_key_translates_to_zero() {
        let map = KeyMap::new();
        let e = KeyInput::new(0x9999, KeyAction::Press, 0);
        assert_eq!(map.from_input(e), 0x00);
    }

    #[test]
    fn from_ascii_round_trips_unshifted_letter() {
        let map = KeyMap::new();
        let e = map.from_ascii(0x41);
        assert_eq!(e.key, 0x0041);
        assert_eq!(e.modifiers, 0);
    }

    #[test]
    fn from_ascii_round_trips_shifted_symbol() {
        let map = KeyMap::new();
        let e = map.from_ascii(0x21); // '!'
        assert_eq!(e.key, 0x0031);
        assert_eq!(e.modifiers, 1);
    }
}
