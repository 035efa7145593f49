//! Character classes used by the scanner.
//!
//! The language accepts full-width forms of ASCII punctuation, digits and
//! letters (U+FF01..U+FF5E) anywhere it accepts the half-width character.

const FULL_WIDTH_FIRST: u32 = 0xFF01;
const FULL_WIDTH_LAST: u32 = 0xFF5E;
const FULL_WIDTH_OFFSET: u32 = 0xFEE0;

/// Maps a full-width form to its half-width equivalent.
pub fn half_width(c: char) -> char {
    let n = c as u32;
    if (FULL_WIDTH_FIRST..=FULL_WIDTH_LAST).contains(&n) {
        std::char::from_u32(n - FULL_WIDTH_OFFSET).unwrap_or(c)
    } else if c == '\u{3000}' {
        ' '
    } else {
        c
    }
}

pub fn is_whitespace(c: char) -> bool {
    match c {
        ' ' | '\t' | '\u{A0}' | '\u{3000}' => true,
        '\u{1680}' | '\u{180E}' | '\u{2000}'..='\u{200B}' | '\u{202F}' | '\u{205F}' => true,
        _ => false,
    }
}

pub fn is_line_terminator(c: char) -> bool {
    matches!(c, '\r' | '\n' | '\u{2028}' | '\u{2029}')
}

/// Characters that end the stream wherever they appear.
pub fn is_end_of_file(c: char) -> bool {
    matches!(c, '\0' | '\u{1A}')
}

pub fn is_digit(c: char) -> bool {
    half_width(c).is_ascii_digit()
}

pub fn is_hex_digit(c: char) -> bool {
    half_width(c).is_ascii_hexdigit()
}

pub fn is_octal_digit(c: char) -> bool {
    matches!(half_width(c), '0'..='7')
}

pub fn is_underscore(c: char) -> bool {
    c == '_' || is_connector_punctuation(c)
}

fn is_connector_punctuation(c: char) -> bool {
    matches!(
        c,
        '\u{203F}' | '\u{2040}' | '\u{2054}' | '\u{FE33}' | '\u{FE34}' | '\u{FE4D}'..='\u{FE4F}'
            | '\u{FF3F}'
    )
}

fn is_combining_mark(c: char) -> bool {
    matches!(
        c,
        '\u{0300}'..='\u{036F}'
            | '\u{0483}'..='\u{0489}'
            | '\u{0591}'..='\u{05BD}'
            | '\u{0610}'..='\u{061A}'
            | '\u{064B}'..='\u{065F}'
            | '\u{0900}'..='\u{0903}'
            | '\u{093A}'..='\u{094F}'
            | '\u{1AB0}'..='\u{1AFF}'
            | '\u{1DC0}'..='\u{1DFF}'
            | '\u{200C}'..='\u{200D}'
            | '\u{20D0}'..='\u{20FF}'
            | '\u{302A}'..='\u{302F}'
            | '\u{3099}'..='\u{309A}'
            | '\u{FE20}'..='\u{FE2F}'
    )
}

pub fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || is_underscore(c)
}

pub fn is_identifier_part(c: char) -> bool {
    c.is_alphanumeric() || is_underscore(c) || is_combining_mark(c)
}

pub fn is_double_quote(c: char) -> bool {
    matches!(c, '"' | '\u{201C}' | '\u{201D}' | '\u{FF02}')
}

pub fn is_single_quote(c: char) -> bool {
    matches!(c, '\'' | '\u{2018}' | '\u{2019}' | '\u{FF07}')
}

pub fn is_left_bracket(c: char) -> bool {
    matches!(c, '[' | '\u{FF3B}')
}

pub fn is_right_bracket(c: char) -> bool {
    matches!(c, ']' | '\u{FF3D}')
}

pub fn is_pound(c: char) -> bool {
    matches!(c, '#' | '\u{FF03}')
}

pub fn is_ampersand(c: char) -> bool {
    matches!(c, '&' | '\u{FF06}')
}

pub fn is_period(c: char) -> bool {
    matches!(c, '.' | '\u{FF0E}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_width() {
        assert_eq!(half_width('\u{FF11}'), '1');
        assert_eq!(half_width('\u{FF0B}'), '+');
        assert_eq!(half_width('\u{FF21}'), 'A');
        assert_eq!(half_width('x'), 'x');
        assert_eq!(half_width('\u{3000}'), ' ');
    }

    #[test]
    fn test_classes() {
        assert!(is_identifier_start('é'));
        assert!(is_identifier_part('\u{0301}'));
        assert!(!is_identifier_start('\u{0301}'));
        assert!(is_underscore('\u{FF3F}'));
        assert!(is_double_quote('\u{201C}'));
        assert!(is_digit('\u{FF19}'));
        assert!(!is_octal_digit('8'));
        assert!(is_whitespace('\t'));
        assert!(is_line_terminator('\u{2028}'));
    }
}
