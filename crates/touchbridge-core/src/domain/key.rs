//! Key codes, meta state, and key events.
//!
//! Key codes use the device's native numbering (the values a `KEYCODE`
//! command carries on the wire).  Only the codes the server itself needs to
//! name are given constants; any other `i32` is passed through unchanged.

use std::fmt;

/// A device key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyCode(pub i32);

impl KeyCode {
    pub const DIGIT_0: KeyCode = KeyCode(7);
    pub const STAR: KeyCode = KeyCode(17);
    pub const POUND: KeyCode = KeyCode(18);
    pub const POWER: KeyCode = KeyCode(26);
    pub const A: KeyCode = KeyCode(29);
    pub const COMMA: KeyCode = KeyCode(55);
    pub const PERIOD: KeyCode = KeyCode(56);
    pub const ALT_LEFT: KeyCode = KeyCode(57);
    pub const SHIFT_LEFT: KeyCode = KeyCode(59);
    pub const TAB: KeyCode = KeyCode(61);
    pub const SPACE: KeyCode = KeyCode(62);
    pub const ENTER: KeyCode = KeyCode(66);
    pub const DEL: KeyCode = KeyCode(67);
    pub const GRAVE: KeyCode = KeyCode(68);
    pub const MINUS: KeyCode = KeyCode(69);
    pub const EQUALS: KeyCode = KeyCode(70);
    pub const LEFT_BRACKET: KeyCode = KeyCode(71);
    pub const RIGHT_BRACKET: KeyCode = KeyCode(72);
    pub const BACKSLASH: KeyCode = KeyCode(73);
    pub const SEMICOLON: KeyCode = KeyCode(74);
    pub const APOSTROPHE: KeyCode = KeyCode(75);
    pub const SLASH: KeyCode = KeyCode(76);
    pub const AT: KeyCode = KeyCode(77);
    pub const PLUS: KeyCode = KeyCode(81);
    pub const MENU: KeyCode = KeyCode(82);

    /// The key code of digit `n` (0–9) on the top row.
    pub fn digit(n: u8) -> Option<KeyCode> {
        (n <= 9).then(|| KeyCode(Self::DIGIT_0.0 + i32::from(n)))
    }

    /// The key code of an ASCII letter, ignoring case.
    pub fn letter(c: char) -> Option<KeyCode> {
        c.is_ascii_alphabetic()
            .then(|| KeyCode(Self::A.0 + (c.to_ascii_lowercase() as i32 - 'a' as i32)))
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Key transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    Down,
    Up,
}

/// Modifier state attached to a key event, as a bit set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MetaState(pub u32);

impl MetaState {
    pub const NONE: MetaState = MetaState(0);
    pub const SHIFT_ON: u32 = 0x01;
    pub const ALT_ON: u32 = 0x02;
    pub const ALT_LEFT_ON: u32 = 0x10;
    pub const SHIFT_LEFT_ON: u32 = 0x40;

    /// Meta state while the left Shift key is held.
    pub const fn shift() -> Self {
        MetaState(Self::SHIFT_ON | Self::SHIFT_LEFT_ON)
    }

    /// Meta state while the left Alt key is held.
    pub const fn alt() -> Self {
        MetaState(Self::ALT_ON | Self::ALT_LEFT_ON)
    }

    /// Returns `true` if either Shift flag is set.
    pub fn has_shift(&self) -> bool {
        self.0 & (Self::SHIFT_ON | Self::SHIFT_LEFT_ON) != 0
    }

    /// Returns `true` if either Alt flag is set.
    pub fn has_alt(&self) -> bool {
        self.0 & (Self::ALT_ON | Self::ALT_LEFT_ON) != 0
    }

    /// Returns `true` if no modifier is set.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// One synthetic key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub action: KeyAction,
    pub code: KeyCode,
    pub meta_state: MetaState,
    pub repeat: u32,
}

impl KeyEvent {
    /// A key-down event without modifiers.
    pub fn down(code: KeyCode) -> Self {
        Self::new(KeyAction::Down, code, MetaState::NONE)
    }

    /// A key-up event without modifiers.
    pub fn up(code: KeyCode) -> Self {
        Self::new(KeyAction::Up, code, MetaState::NONE)
    }

    /// A non-repeating key event.
    pub fn new(action: KeyAction, code: KeyCode, meta_state: MetaState) -> Self {
        Self { action, code, meta_state, repeat: 0 }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
