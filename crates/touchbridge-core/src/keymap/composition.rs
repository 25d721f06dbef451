//! Decomposition of precomposed accented characters.
//!
//! Virtual keyboards can rarely type `é` directly, but they can type a dead
//! acute accent followed by `e`.  [`decompose`] maps each supported
//! precomposed character to that two-keystroke sequence: the combining accent
//! first (typed as a dead key), then the base character.
//!
//! The table covers the five dead keys a virtual keyboard offers: grave,
//! acute, circumflex, tilde, and diaeresis.

/// Combining grave accent (U+0300).
pub const GRAVE: char = '\u{0300}';
/// Combining acute accent (U+0301).
pub const ACUTE: char = '\u{0301}';
/// Combining circumflex accent (U+0302).
pub const CIRCUMFLEX: char = '\u{0302}';
/// Combining tilde (U+0303).
pub const TILDE: char = '\u{0303}';
/// Combining diaeresis (U+0308).
pub const UMLAUT: char = '\u{0308}';

/// `(precomposed, accent, base)`, sorted by `precomposed` for binary search.
static COMPOSITIONS: &[(char, char, char)] = &[
    // Latin-1 Supplement
    ('\u{00C0}', GRAVE, 'A'),
    ('\u{00C1}', ACUTE, 'A'),
    ('\u{00C2}', CIRCUMFLEX, 'A'),
    ('\u{00C3}', TILDE, 'A'),
    ('\u{00C4}', UMLAUT, 'A'),
    ('\u{00C8}', GRAVE, 'E'),
    ('\u{00C9}', ACUTE, 'E'),
    ('\u{00CA}', CIRCUMFLEX, 'E'),
    ('\u{00CB}', UMLAUT, 'E'),
    ('\u{00CC}', GRAVE, 'I'),
    ('\u{00CD}', ACUTE, 'I'),
    ('\u{00CE}', CIRCUMFLEX, 'I'),
    ('\u{00CF}', UMLAUT, 'I'),
    ('\u{00D1}', TILDE, 'N'),
    ('\u{00D2}', GRAVE, 'O'),
    ('\u{00D3}', ACUTE, 'O'),
    ('\u{00D4}', CIRCUMFLEX, 'O'),
    ('\u{00D5}', TILDE, 'O'),
    ('\u{00D6}', UMLAUT, 'O'),
    ('\u{00D9}', GRAVE, 'U'),
    ('\u{00DA}', ACUTE, 'U'),
    ('\u{00DB}', CIRCUMFLEX, 'U'),
    ('\u{00DC}', UMLAUT, 'U'),
    ('\u{00DD}', ACUTE, 'Y'),
    ('\u{00E0}', GRAVE, 'a'),
    ('\u{00E1}', ACUTE, 'a'),
    ('\u{00E2}', CIRCUMFLEX, 'a'),
    ('\u{00E3}', TILDE, 'a'),
    ('\u{00E4}', UMLAUT, 'a'),
    ('\u{00E8}', GRAVE, 'e'),
    ('\u{00E9}', ACUTE, 'e'),
    ('\u{00EA}', CIRCUMFLEX, 'e'),
    ('\u{00EB}', UMLAUT, 'e'),
    ('\u{00EC}', GRAVE, 'i'),
    ('\u{00ED}', ACUTE, 'i'),
    ('\u{00EE}', CIRCUMFLEX, 'i'),
    ('\u{00EF}', UMLAUT, 'i'),
    ('\u{00F1}', TILDE, 'n'),
    ('\u{00F2}', GRAVE, 'o'),
    ('\u{00F3}', ACUTE, 'o'),
    ('\u{00F4}', CIRCUMFLEX, 'o'),
    ('\u{00F5}', TILDE, 'o'),
    ('\u{00F6}', UMLAUT, 'o'),
    ('\u{00F9}', GRAVE, 'u'),
    ('\u{00FA}', ACUTE, 'u'),
    ('\u{00FB}', CIRCUMFLEX, 'u'),
    ('\u{00FC}', UMLAUT, 'u'),
    ('\u{00FD}', ACUTE, 'y'),
    ('\u{00FF}', UMLAUT, 'y'),
    // Latin Extended-A
    ('\u{0106}', ACUTE, 'C'),
    ('\u{0107}', ACUTE, 'c'),
    ('\u{0108}', CIRCUMFLEX, 'C'),
    ('\u{0109}', CIRCUMFLEX, 'c'),
    ('\u{011C}', CIRCUMFLEX, 'G'),
    ('\u{011D}', CIRCUMFLEX, 'g'),
    ('\u{0124}', CIRCUMFLEX, 'H'),
    ('\u{0125}', CIRCUMFLEX, 'h'),
    ('\u{0128}', TILDE, 'I'),
    ('\u{0129}', TILDE, 'i'),
    ('\u{0134}', CIRCUMFLEX, 'J'),
    ('\u{0135}', CIRCUMFLEX, 'j'),
    ('\u{0139}', ACUTE, 'L'),
    ('\u{013A}', ACUTE, 'l'),
    ('\u{0143}', ACUTE, 'N'),
    ('\u{0144}', ACUTE, 'n'),
    ('\u{0154}', ACUTE, 'R'),
    ('\u{0155}', ACUTE, 'r'),
    ('\u{015A}', ACUTE, 'S'),
    ('\u{015B}', ACUTE, 's'),
    ('\u{015C}', CIRCUMFLEX, 'S'),
    ('\u{015D}', CIRCUMFLEX, 's'),
    ('\u{0168}', TILDE, 'U'),
    ('\u{0169}', TILDE, 'u'),
    ('\u{0174}', CIRCUMFLEX, 'W'),
    ('\u{0175}', CIRCUMFLEX, 'w'),
    ('\u{0176}', CIRCUMFLEX, 'Y'),
    ('\u{0177}', CIRCUMFLEX, 'y'),
    ('\u{0178}', UMLAUT, 'Y'),
    ('\u{0179}', ACUTE, 'Z'),
    ('\u{017A}', ACUTE, 'z'),
    // Latin Extended-B
    ('\u{01F4}', ACUTE, 'G'),
    ('\u{01F5}', ACUTE, 'g'),
    ('\u{01F8}', GRAVE, 'N'),
    ('\u{01F9}', GRAVE, 'n'),
    // Latin Extended Additional
    ('\u{1E26}', UMLAUT, 'H'),
    ('\u{1E27}', UMLAUT, 'h'),
    ('\u{1E3E}', ACUTE, 'M'),
    ('\u{1E3F}', ACUTE, 'm'),
    ('\u{1E54}', ACUTE, 'P'),
    ('\u{1E55}', ACUTE, 'p'),
    ('\u{1E7C}', TILDE, 'V'),
    ('\u{1E7D}', TILDE, 'v'),
    ('\u{1E80}', GRAVE, 'W'),
    ('\u{1E81}', GRAVE, 'w'),
    ('\u{1E82}', ACUTE, 'W'),
    ('\u{1E83}', ACUTE, 'w'),
    ('\u{1E84}', UMLAUT, 'W'),
    ('\u{1E85}', UMLAUT, 'w'),
    ('\u{1E8C}', UMLAUT, 'X'),
    ('\u{1E8D}', UMLAUT, 'x'),
    ('\u{1E90}', CIRCUMFLEX, 'Z'),
    ('\u{1E91}', CIRCUMFLEX, 'z'),
    ('\u{1E97}', UMLAUT, 't'),
    ('\u{1EBC}', TILDE, 'E'),
    ('\u{1EBD}', TILDE, 'e'),
    ('\u{1EF2}', GRAVE, 'Y'),
    ('\u{1EF3}', GRAVE, 'y'),
    ('\u{1EF8}', TILDE, 'Y'),
    ('\u{1EF9}', TILDE, 'y'),
];

/// Returns the `[accent, base]` keystroke sequence for a precomposed
/// character, or `None` if `c` should be typed as-is.
///
/// # Examples
///
/// ```rust
/// use touchbridge_core::keymap::composition::{decompose, ACUTE};
///
/// assert_eq!(decompose('é'), Some([ACUTE, 'e']));
/// assert_eq!(decompose('e'), None);
/// ```
pub fn decompose(c: char) -> Option<[char; 2]> {
    COMPOSITIONS
        .binary_search_by_key(&c, |&(precomposed, _, _)| precomposed)
        .ok()
        .map(|index| {
            let (_, accent, base) = COMPOSITIONS[index];
            [accent, base]
        })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_strictly_sorted() {
        // binary_search requires sorted, duplicate-free keys
        assert!(COMPOSITIONS.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_every_entry_uses_a_known_accent() {
        for &(_, accent, base) in COMPOSITIONS {
            assert!([GRAVE, ACUTE, CIRCUMFLEX, TILDE, UMLAUT].contains(&accent));
            assert!(base.is_ascii_alphabetic());
        }
    }

    #[test]
    fn test_decompose_common_accents() {
        assert_eq!(decompose('à'), Some([GRAVE, 'a']));
        assert_eq!(decompose('É'), Some([ACUTE, 'E']));
        assert_eq!(decompose('ô'), Some([CIRCUMFLEX, 'o']));
        assert_eq!(decompose('ñ'), Some([TILDE, 'n']));
        assert_eq!(decompose('ü'), Some([UMLAUT, 'u']));
        assert_eq!(decompose('ŷ'), Some([CIRCUMFLEX, 'y']));
    }

    #[test]
    fn test_decompose_plain_characters_is_none() {
        assert_eq!(decompose('a'), None);
        assert_eq!(decompose(' '), None);
        assert_eq!(decompose('ß'), None);
        assert_eq!(decompose('中'), None);
    }

    #[test]
    fn test_decomposition_is_the_canonical_pair_in_keystroke_order() {
        // Unicode writes base then mark; keystrokes go mark (dead key) then base.
        let [accent, base] = decompose('\u{00E9}').unwrap();
        assert_eq!(format!("{base}{accent}"), "e\u{0301}");
    }
}
