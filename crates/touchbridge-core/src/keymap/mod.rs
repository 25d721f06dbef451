//! Character to key-event translation tables used by text injection.
//!
//! Typing a character means finding the key presses that produce it.  Plain
//! ASCII maps to one key (possibly with Shift).  Accented characters such as
//! `é` usually have no key of their own, so they are first decomposed into a
//! combining accent (typed as a dead key) followed by the base letter.

pub mod composition;
pub mod virtual_keyboard;

pub use composition::decompose;
pub use virtual_keyboard::VirtualKeyboard;
