//! Keyboard/mouse input value types, translated into Apple II character
//! codes by [`keymap`].
//!
//! Ported from `retro/emu/input`.

pub mod keymap;

pub use keymap::KeyMap;

/// Key action: matches the conventional press/release/repeat trio used by
/// most windowing toolkits' key-event callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Release,
    Press,
    Repeat,
}

/// A single real or simulated keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: i32,
    pub action: KeyAction,
    pub modifiers: u8,
}

impl KeyInput {
    pub fn new(key: i32, action: KeyAction, modifiers: u8) -> Self {
        Self { key, action, modifiers }
    }

    /// CTRL-SHIFT-R: reset combo recognised by embedders.
    pub fn is_ctrl_shift_r(&self) -> bool {
        self.key == 0x52
            && matches!(self.action, KeyAction::Press | KeyAction::Repeat)
            && self.modifiers == 0x03
    }

    /// CTRL-V: paste combo recognised by embedders.
    pub fn is_ctrl_v(&self) -> bool {
        self.key == 0x56
            && matches!(self.action, KeyAction::Press | KeyAction::Repeat)
            && self.modifiers == 0x02
    }
}

/// A mouse button event; button index is clamped to `[0, 2]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseButton {
    button: u8,
    action: KeyAction,
    modifiers: u8,
}

impl MouseButton {
    pub fn new(button: i32, action: KeyAction, modifiers: u8) -> Self {
        let button = if !(0..=2).contains(&button) { 0 } else { button as u8 };
        Self { button, action, modifiers }
    }

    pub fn button(&self) -> u8 {
        self.button
    }

    pub fn is_button0(&self) -> bool {
        self.button() == 0
    }

    pub fn is_pressed(&self) -> bool {
        matches!(self.action, KeyAction::Press)
    }
}

/// A cursor position event, in window-space floating-point coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorPos {
    x: f64,
    y: f64,
}

impl CursorPos {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }
}

/// The three input event kinds an embedder's windowing layer may produce.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Key(KeyInput),
    Mouse(MouseButton),
    Cursor(CursorPos),
}
