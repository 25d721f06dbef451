//! Reference character map of a virtual (software) keyboard.
//!
//! Backends that cannot ask the device which key presses produce a character
//! can use [`VirtualKeyboard`] instead.  It models a US layout plus the dead
//! keys used for combining accents:
//!
//! | Accent      | Keystroke |
//! |-------------|-----------|
//! | grave       | Alt + `   |
//! | acute       | Alt + E   |
//! | circumflex  | Alt + I   |
//! | tilde       | Alt + N   |
//! | diaeresis   | Alt + U   |
//!
//! A modified keystroke is expanded into four events: modifier down, key
//! down, key up, modifier up.

use crate::domain::key::{KeyAction, KeyCode, KeyEvent, MetaState};
use crate::keymap::composition::{ACUTE, CIRCUMFLEX, GRAVE, TILDE, UMLAUT};

/// One key press with the modifiers it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyStroke {
    pub code: KeyCode,
    pub meta: MetaState,
}

impl KeyStroke {
    const fn plain(code: KeyCode) -> Self {
        Self { code, meta: MetaState::NONE }
    }

    const fn shifted(code: KeyCode) -> Self {
        Self { code, meta: MetaState::shift() }
    }

    const fn alt(code: KeyCode) -> Self {
        Self { code, meta: MetaState::alt() }
    }

    /// Appends the events typing this stroke to `events`.
    fn push_events(&self, events: &mut Vec<KeyEvent>) {
        let modifier = if self.meta.has_shift() {
            Some(KeyCode::SHIFT_LEFT)
        } else if self.meta.has_alt() {
            Some(KeyCode::ALT_LEFT)
        } else {
            None
        };

        if let Some(modifier) = modifier {
            events.push(KeyEvent::new(KeyAction::Down, modifier, self.meta));
        }
        events.push(KeyEvent::new(KeyAction::Down, self.code, self.meta));
        events.push(KeyEvent::new(KeyAction::Up, self.code, self.meta));
        if let Some(modifier) = modifier {
            events.push(KeyEvent::new(KeyAction::Up, modifier, MetaState::NONE));
        }
    }
}

/// Character resolver for a US virtual keyboard with dead-key accents.
#[derive(Debug, Clone, Copy, Default)]
pub struct VirtualKeyboard;

impl VirtualKeyboard {
    /// Creates the resolver.
    pub fn new() -> Self {
        Self
    }

    /// Returns the keystroke typing `c`, or `None` if the layout has no key for it.
    pub fn stroke_for(&self, c: char) -> Option<KeyStroke> {
        if c.is_ascii_lowercase() {
            return KeyCode::letter(c).map(KeyStroke::plain);
        }
        if c.is_ascii_uppercase() {
            return KeyCode::letter(c).map(KeyStroke::shifted);
        }
        if let Some(digit) = c.to_digit(10) {
            return KeyCode::digit(digit as u8).map(KeyStroke::plain);
        }

        let shifted_digit = |n: u8| KeyCode::digit(n).map(KeyStroke::shifted);
        let stroke = match c {
            ' ' => KeyStroke::plain(KeyCode::SPACE),
            '\n' => KeyStroke::plain(KeyCode::ENTER),
            '\t' => KeyStroke::plain(KeyCode::TAB),
            '`' => KeyStroke::plain(KeyCode::GRAVE),
            '~' => KeyStroke::shifted(KeyCode::GRAVE),
            '-' => KeyStroke::plain(KeyCode::MINUS),
            '_' => KeyStroke::shifted(KeyCode::MINUS),
            '=' => KeyStroke::plain(KeyCode::EQUALS),
            '+' => KeyStroke::plain(KeyCode::PLUS),
            '[' => KeyStroke::plain(KeyCode::LEFT_BRACKET),
            '{' => KeyStroke::shifted(KeyCode::LEFT_BRACKET),
            ']' => KeyStroke::plain(KeyCode::RIGHT_BRACKET),
            '}' => KeyStroke::shifted(KeyCode::RIGHT_BRACKET),
            '\\' => KeyStroke::plain(KeyCode::BACKSLASH),
            '|' => KeyStroke::shifted(KeyCode::BACKSLASH),
            ';' => KeyStroke::plain(KeyCode::SEMICOLON),
            ':' => KeyStroke::shifted(KeyCode::SEMICOLON),
            '\'' => KeyStroke::plain(KeyCode::APOSTROPHE),
            '"' => KeyStroke::shifted(KeyCode::APOSTROPHE),
            ',' => KeyStroke::plain(KeyCode::COMMA),
            '<' => KeyStroke::shifted(KeyCode::COMMA),
            '.' => KeyStroke::plain(KeyCode::PERIOD),
            '>' => KeyStroke::shifted(KeyCode::PERIOD),
            '/' => KeyStroke::plain(KeyCode::SLASH),
            '?' => KeyStroke::shifted(KeyCode::SLASH),
            '@' => KeyStroke::plain(KeyCode::AT),
            '*' => KeyStroke::plain(KeyCode::STAR),
            '#' => KeyStroke::plain(KeyCode::POUND),
            '!' => return shifted_digit(1),
            '$' => return shifted_digit(4),
            '%' => return shifted_digit(5),
            '^' => return shifted_digit(6),
            '&' => return shifted_digit(7),
            '(' => return shifted_digit(9),
            ')' => return shifted_digit(0),
            GRAVE => KeyStroke::alt(KeyCode::GRAVE),
            ACUTE => return KeyCode::letter('e').map(KeyStroke::alt),
            CIRCUMFLEX => return KeyCode::letter('i').map(KeyStroke::alt),
            TILDE => return KeyCode::letter('n').map(KeyStroke::alt),
            UMLAUT => return KeyCode::letter('u').map(KeyStroke::alt),
            _ => return None,
        };
        Some(stroke)
    }

    /// Returns the key events typing `chars` in order, or `None` if any
    /// character has no key.
    pub fn events_for(&self, chars: &[char]) -> Option<Vec<KeyEvent>> {
        let mut events = Vec::with_capacity(chars.len() * 4);
        for &c in chars {
            self.stroke_for(c)?.push_events(&mut events);
        }
        Some(events)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
