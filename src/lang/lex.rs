use super::chars::{self, half_width};
use super::token::*;
use super::{Dialect, ErrorCode, LanguageVersion, Location, Span};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::rc::Rc;
use std::sync::atomic::{AtomicU32, Ordering};

/// Scans `source` to the end and returns every token, end of stream included.
pub fn lex(source: &str, version: LanguageVersion) -> Vec<Token> {
    let mut scanner = Scanner::new(source, Dialect::new(version), DEFAULT_TAB_WIDTH);
    loop {
        if scanner.read().is(TokenType::EndOfStream) {
            break;
        }
    }
    scanner.tokens
}

pub const DEFAULT_TAB_WIDTH: usize = 4;

static NEXT_SCANNER_ID: AtomicU32 = AtomicU32::new(1);

/// Lazily scanned, append-only token buffer.
///
/// A token is scanned once and kept for the life of the scanner, so the
/// parser may rewind to anything it has already seen. Positions in the
/// buffer are the handles: `seek` is an index assignment.
pub struct Scanner {
    id: u32,
    source: Vec<char>,
    index: usize,
    line: usize,
    column: usize,
    tab_width: usize,
    dialect: Dialect,
    tokens: Vec<Token>,
    cursor: usize,
    locks: Vec<usize>,
    finished: bool,
}

impl Scanner {
    pub fn new(source: &str, dialect: Dialect, tab_width: usize) -> Scanner {
        Scanner {
            id: NEXT_SCANNER_ID.fetch_add(1, Ordering::Relaxed),
            source: source.chars().collect(),
            index: 0,
            line: 1,
            column: 1,
            tab_width: tab_width.max(1),
            dialect,
            tokens: vec![],
            cursor: 0,
            locks: vec![],
            finished: false,
        }
    }

    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Token at the cursor. Idempotent.
    pub fn peek(&mut self) -> &Token {
        self.fill(self.cursor);
        &self.tokens[self.cursor]
    }

    /// Token `n` places past the cursor, without moving.
    pub fn peek_ahead(&mut self, n: usize) -> &Token {
        self.fill(self.cursor + n);
        let position = (self.cursor + n).min(self.tokens.len() - 1);
        &self.tokens[position]
    }

    /// Token at the cursor; the cursor advances unless it sits on the end
    /// of stream.
    pub fn read(&mut self) -> Token {
        self.fill(self.cursor);
        let token = self.tokens[self.cursor].clone();
        if !token.is(TokenType::EndOfStream) {
            self.cursor += 1;
        }
        token
    }

    /// Moves the cursor to a token previously returned by this scanner.
    ///
    /// # Panics
    ///
    /// Panics if the token was not produced by this scanner.
    pub fn seek(&mut self, token: &Token) {
        match self.tokens.get(token.position) {
            Some(t) if token.scanner == self.id && t.span == token.span => {
                self.cursor = token.position;
            }
            _ => panic!(
                "seek to a token not produced by this scanner at {}",
                token.span
            ),
        }
    }

    /// Token `n` places behind the cursor, optionally moving the cursor
    /// back to it.
    ///
    /// # Panics
    ///
    /// Panics if fewer than `n` tokens have been read.
    pub fn previous(&mut self, n: usize, reposition: bool) -> &Token {
        assert!(n <= self.cursor, "previous({}) before start of stream", n);
        self.fill(self.cursor - n);
        let position = (self.cursor - n).min(self.tokens.len() - 1);
        if reposition {
            self.cursor = position;
        }
        &self.tokens[position]
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Saves the cursor so that lookahead can run and be undone.
    pub fn lock(&mut self) {
        self.locks.push(self.cursor);
    }

    /// Restores the cursor saved by the matching `lock`.
    pub fn unlock(&mut self) {
        match self.locks.pop() {
            Some(cursor) => self.cursor = cursor,
            None => panic!("unlock without lock"),
        }
    }

    pub fn is_locked(&self) -> bool {
        !self.locks.is_empty()
    }

    /// Tokens scanned so far.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    fn fill(&mut self, position: usize) {
        while self.tokens.len() <= position && !self.finished {
            let mut token = self.scan();
            token.position = self.tokens.len();
            token.scanner = self.id;
            if token.is(TokenType::EndOfStream) {
                self.finished = true;
            }
            self.tokens.push(token);
        }
    }

    fn location(&self) -> Location {
        Location::new(self.index, self.line, self.column)
    }

    fn span_from(&self, start: Location) -> Span {
        Span::new(start, self.location())
    }

    fn peek_char(&self) -> Option<char> {
        self.source.get(self.index).copied()
    }

    fn peek_char_at(&self, n: usize) -> Option<char> {
        self.source.get(self.index + n).copied()
    }

    fn next_char(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.index += 1;
        if c == '\t' {
            self.column = ((self.column - 1) / self.tab_width + 1) * self.tab_width + 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn at_end(&self) -> bool {
        match self.peek_char() {
            None => true,
            Some(c) => chars::is_end_of_file(c),
        }
    }

    fn at_line_end(&self) -> bool {
        self.at_end() || self.peek_char().map_or(false, chars::is_line_terminator)
    }

    /// Consumes one line terminator, CRLF counting as one.
    fn eat_line_terminator(&mut self) {
        if let Some(c) = self.next_char() {
            if c == '\r' && self.peek_char() == Some('\n') {
                self.index += 1;
            }
        }
        self.line += 1;
        self.column = 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            if !chars::is_whitespace(c) {
                break;
            }
            self.next_char();
        }
    }

    fn token(&self, kind: TokenKind, start: Location) -> Token {
        Token::new(kind, self.span_from(start))
    }

    fn error(&self, code: ErrorCode, start: Location) -> Token {
        self.token(TokenKind::Error(code), start)
    }

    fn scan(&mut self) -> Token {
        loop {
            self.skip_whitespace();
            let start = self.location();
            let c = match self.peek_char() {
                Some(c) if !chars::is_end_of_file(c) => c,
                _ => return self.token(TokenKind::EndOfStream, start),
            };
            if chars::is_line_terminator(c) {
                self.eat_line_terminator();
                return self.token(TokenKind::LineTerminator, start);
            }
            if chars::is_underscore(c) && self.is_line_continuation() {
                self.next_char();
                self.skip_whitespace();
                if !self.at_end() {
                    self.eat_line_terminator();
                }
                continue;
            }
            if chars::is_single_quote(c) {
                self.next_char();
                return self.scan_comment(start, false);
            }
            if chars::is_left_bracket(c) {
                return self.scan_escaped_identifier(start);
            }
            if chars::is_identifier_start(c) {
                return self.scan_identifier(start);
            }
            if chars::is_double_quote(c) {
                return self.scan_string(start);
            }
            if chars::is_pound(c) {
                if let Some(token) = self.scan_date(start) {
                    return token;
                }
                self.next_char();
                return self.token(TokenKind::Punctuator(TokenType::Pound), start);
            }
            if chars::is_digit(c)
                || (chars::is_period(c) && self.peek_char_at(1).map_or(false, chars::is_digit))
            {
                return self.scan_number(start);
            }
            if chars::is_ampersand(c) {
                if let Some(base) = self.peek_char_at(1).map(|c| half_width(c).to_ascii_uppercase()) {
                    if base == 'H' || base == 'O' {
                        return self.scan_based_number(start, base);
                    }
                }
            }
            return self.scan_punctuator(start);
        }
    }

    /// An underscore not followed by identifier characters, with nothing
    /// but whitespace before the end of the line.
    fn is_line_continuation(&self) -> bool {
        if self.peek_char_at(1).map_or(false, chars::is_identifier_part) {
            return false;
        }
        let mut n = 1;
        while let Some(c) = self.peek_char_at(n) {
            if chars::is_whitespace(c) {
                n += 1;
                continue;
            }
            return chars::is_line_terminator(c) || chars::is_end_of_file(c);
        }
        true
    }

    fn scan_comment(&mut self, start: Location, is_rem: bool) -> Token {
        let mut text = String::new();
        loop {
            while !self.at_line_end() {
                if let Some(c) = self.next_char() {
                    text.push(c);
                }
            }
            let continues = self.dialect.comment_continuation
                && text.trim_end().ends_with('_')
                && !self.at_end();
            if !continues {
                break;
            }
            self.eat_line_terminator();
            text.push('\n');
        }
        self.token(
            TokenKind::Comment {
                text: Rc::from(text),
                is_rem,
            },
            start,
        )
    }

    fn scan_identifier(&mut self, start: Location) -> Token {
        let mut text = String::new();
        while let Some(c) = self.peek_char() {
            if !chars::is_identifier_part(c) {
                break;
            }
            text.push(c);
            self.next_char();
        }
        if text.chars().all(chars::is_underscore) && text.chars().count() == 1 {
            return self.error(ErrorCode::InvalidIdentifier, start);
        }
        let type_character = self.scan_identifier_type_character();
        let mut keyword_type = None;
        let mut unreserved = None;
        if type_character.is_none() {
            if let Some(k) = keyword(&text) {
                if self.dialect.reserves(k.versions) {
                    if k.token_type == TokenType::Rem {
                        return self.scan_comment(start, true);
                    }
                    if k.reserved {
                        keyword_type = Some(k.token_type);
                    } else {
                        unreserved = Some(k.token_type);
                    }
                }
            }
        }
        let ident = Identifier {
            text: Rc::from(text),
            keyword: keyword_type,
            unreserved,
            escaped: false,
            type_character,
            adjacent: self.next_is_adjacent(),
        };
        self.token(TokenKind::Identifier(ident), start)
    }

    fn scan_escaped_identifier(&mut self, start: Location) -> Token {
        self.next_char();
        let mut text = String::new();
        if self.peek_char().map_or(false, chars::is_identifier_start) {
            while let Some(c) = self.peek_char() {
                if !chars::is_identifier_part(c) {
                    break;
                }
                text.push(c);
                self.next_char();
            }
        }
        if text.is_empty() || !self.peek_char().map_or(false, chars::is_right_bracket) {
            while !self.at_line_end() {
                if let Some(c) = self.next_char() {
                    if chars::is_right_bracket(c) {
                        break;
                    }
                }
            }
            return self.error(ErrorCode::InvalidEscapedIdentifier, start);
        }
        self.next_char();
        let type_character = self.scan_identifier_type_character();
        let ident = Identifier {
            text: Rc::from(text),
            keyword: None,
            unreserved: None,
            escaped: true,
            type_character,
            adjacent: self.next_is_adjacent(),
        };
        self.token(TokenKind::Identifier(ident), start)
    }

    fn scan_identifier_type_character(&mut self) -> Option<TypeCharacter> {
        let c = self.peek_char()?;
        let tc = TypeCharacter::from_symbol(c)?;
        if matches!(
            tc,
            TypeCharacter::SingleSymbol | TypeCharacter::LongSymbol | TypeCharacter::DoubleSymbol
        ) {
            // `a!b` is dictionary access, `a&b` concatenation.
            if let Some(next) = self.peek_char_at(1) {
                if chars::is_identifier_start(next) || chars::is_left_bracket(next) {
                    return None;
                }
            }
        }
        self.next_char();
        Some(tc)
    }

    fn next_is_adjacent(&self) -> bool {
        match self.peek_char() {
            None => false,
            Some(c) => {
                !chars::is_whitespace(c)
                    && !chars::is_line_terminator(c)
                    && !chars::is_end_of_file(c)
            }
        }
    }

    fn scan_string(&mut self, start: Location) -> Token {
        self.next_char();
        let mut text = String::new();
        loop {
            match self.peek_char() {
                Some(c) if chars::is_double_quote(c) => {
                    self.next_char();
                    if self.peek_char().map_or(false, chars::is_double_quote) {
                        self.next_char();
                        text.push('"');
                        continue;
                    }
                    break;
                }
                Some(c) if !chars::is_line_terminator(c) && !chars::is_end_of_file(c) => {
                    text.push(c);
                    self.next_char();
                }
                _ => return self.error(ErrorCode::InvalidStringLiteral, start),
            }
        }
        if self.dialect.char_literals {
            if let Some(c) = self.peek_char() {
                if half_width(c).to_ascii_uppercase() == 'C'
                    && !self.peek_char_at(1).map_or(false, chars::is_identifier_part)
                {
                    self.next_char();
                    let mut chars = text.chars();
                    return match (chars.next(), chars.next()) {
                        (Some(c), None) => self.token(TokenKind::CharacterLiteral(c), start),
                        _ => self.error(ErrorCode::InvalidCharacterLiteral, start),
                    };
                }
            }
        }
        self.token(TokenKind::StringLiteral(Rc::from(text)), start)
    }

    /// Scans `#...#`. Returns `None`, consuming nothing, when the text
    /// after the `#` cannot start a date.
    fn scan_date(&mut self, start: Location) -> Option<Token> {
        let mut n = 1;
        while self.peek_char_at(n).map_or(false, chars::is_whitespace) {
            n += 1;
        }
        if !self.peek_char_at(n).map_or(false, chars::is_digit) {
            return None;
        }
        self.next_char();
        let mut body = String::new();
        let mut closed = false;
        while !self.at_line_end() {
            if let Some(c) = self.next_char() {
                if chars::is_pound(c) {
                    closed = true;
                    break;
                }
                body.push(half_width(c));
            }
        }
        if !closed {
            return Some(self.error(ErrorCode::InvalidDateLiteral, start));
        }
        Some(match parse_date(&body) {
            Some(date) => self.token(TokenKind::DateLiteral(date), start),
            None => self.error(ErrorCode::InvalidDateLiteral, start),
        })
    }

    fn scan_digits(&mut self, accept: fn(char) -> bool) -> String {
        let mut digits = String::new();
        while let Some(c) = self.peek_char() {
            if !accept(c) {
                break;
            }
            digits.push(half_width(c));
            self.next_char();
        }
        digits
    }

    fn scan_number(&mut self, start: Location) -> Token {
        let whole = self.scan_digits(chars::is_digit);
        let mut fraction = String::new();
        let mut exponent = String::new();
        let mut is_float = false;
        if self.peek_char().map_or(false, chars::is_period)
            && self.peek_char_at(1).map_or(false, chars::is_digit)
        {
            self.next_char();
            fraction = self.scan_digits(chars::is_digit);
            is_float = true;
        }
        if let Some(c) = self.peek_char() {
            if half_width(c).to_ascii_uppercase() == 'E' {
                let mut n = 1;
                let sign = self.peek_char_at(1).map(half_width);
                if sign == Some('+') || sign == Some('-') {
                    n = 2;
                }
                if self.peek_char_at(n).map_or(false, chars::is_digit) {
                    self.next_char();
                    if n == 2 {
                        if let Some(s) = self.next_char() {
                            exponent.push(half_width(s));
                        }
                    }
                    exponent.push_str(&self.scan_digits(chars::is_digit));
                    is_float = true;
                }
            }
        }
        let type_character = self.scan_literal_type_character();
        let kind = self.number_kind(&whole, &fraction, &exponent, is_float, type_character);
        self.token(kind, start)
    }

    fn scan_based_number(&mut self, start: Location, base: char) -> Token {
        self.next_char();
        self.next_char();
        let (digits, radix, base) = if base == 'H' {
            (self.scan_digits(chars::is_hex_digit), 16, IntegerBase::Hexadecimal)
        } else {
            (self.scan_digits(chars::is_octal_digit), 8, IntegerBase::Octal)
        };
        let type_character = self.scan_literal_type_character();
        if digits.is_empty() {
            return self.error(ErrorCode::InvalidIntegerLiteral, start);
        }
        let bits = match u64::from_str_radix(&digits, radix) {
            Ok(bits) => bits,
            Err(_) => return self.error(ErrorCode::InvalidIntegerLiteral, start),
        };
        let kind = self.based_kind(bits, base, type_character);
        self.token(kind, start)
    }

    fn scan_literal_type_character(&mut self) -> Option<TypeCharacter> {
        let c = self.peek_char()?;
        if let Some(tc) = TypeCharacter::from_symbol(c) {
            if tc == TypeCharacter::StringSymbol {
                return None;
            }
            // `1&H10` is never written; `1 &` followed by an identifier is.
            if tc == TypeCharacter::LongSymbol
                && self.peek_char_at(1).map_or(false, chars::is_identifier_start)
            {
                return None;
            }
            self.next_char();
            return Some(tc);
        }
        if !self.dialect.type_character_letters {
            return None;
        }
        let first = half_width(c).to_ascii_uppercase();
        let second = self.peek_char_at(1).map(|c| half_width(c).to_ascii_uppercase());
        let (tc, len) = match (first, second) {
            ('U', Some('S')) if self.dialect.unsigned_types => (TypeCharacter::UnsignedShortChar, 2),
            ('U', Some('I')) if self.dialect.unsigned_types => {
                (TypeCharacter::UnsignedIntegerChar, 2)
            }
            ('U', Some('L')) if self.dialect.unsigned_types => (TypeCharacter::UnsignedLongChar, 2),
            ('S', _) => (TypeCharacter::ShortChar, 1),
            ('I', _) => (TypeCharacter::IntegerChar, 1),
            ('L', _) => (TypeCharacter::LongChar, 1),
            ('F', _) => (TypeCharacter::SingleChar, 1),
            ('R', _) => (TypeCharacter::DoubleChar, 1),
            ('D', _) => (TypeCharacter::DecimalChar, 1),
            _ => return None,
        };
        if self.peek_char_at(len).map_or(false, chars::is_identifier_part) {
            return None;
        }
        for _ in 0..len {
            self.next_char();
        }
        Some(tc)
    }

    fn integer_bits(&self) -> u32 {
        if self.dialect.vb6 {
            16
        } else {
            32
        }
    }

    fn long_bits(&self) -> u32 {
        if self.dialect.vb6 {
            32
        } else {
            64
        }
    }

    fn number_kind(
        &self,
        whole: &str,
        fraction: &str,
        exponent: &str,
        is_float: bool,
        type_character: Option<TypeCharacter>,
    ) -> TokenKind {
        use TypeCharacter::*;
        let exp: i32 = if exponent.is_empty() {
            0
        } else {
            match exponent.parse() {
                Ok(e) => e,
                Err(_) => return TokenKind::Error(ErrorCode::InvalidFloatingPointLiteral),
            }
        };
        let float_text = || {
            let mut s = String::from(if whole.is_empty() { "0" } else { whole });
            if !fraction.is_empty() {
                s.push('.');
                s.push_str(fraction);
            }
            if !exponent.is_empty() {
                s.push('e');
                s.push_str(exponent);
            }
            s
        };
        match type_character {
            Some(DecimalSymbol) | Some(DecimalChar) => {
                match DecimalValue::parse(whole, fraction, exp) {
                    Some(value) => TokenKind::DecimalLiteral(DecimalLiteral {
                        value,
                        type_character,
                    }),
                    None => TokenKind::Error(ErrorCode::InvalidDecimalLiteral),
                }
            }
            Some(SingleSymbol) | Some(SingleChar) => match float_text().parse::<f64>() {
                Ok(v) if v.abs() <= f32::MAX as f64 => {
                    TokenKind::FloatingPointLiteral(FloatingPointLiteral {
                        value: v as f32 as f64,
                        type_character,
                    })
                }
                _ => TokenKind::Error(ErrorCode::InvalidFloatingPointLiteral),
            },
            Some(DoubleSymbol) | Some(DoubleChar) => self.double(&float_text(), type_character),
            None if is_float => self.double(&float_text(), None),
            Some(_) if is_float => TokenKind::Error(ErrorCode::InvalidTypeCharacter),
            _ => {
                let value = match whole.parse::<u64>() {
                    Ok(v) => v,
                    Err(_) if type_character.is_none() && self.dialect.vb6 => {
                        return self.double(&float_text(), None);
                    }
                    Err(_) => return TokenKind::Error(ErrorCode::InvalidIntegerLiteral),
                };
                self.decimal_integer_kind(value, type_character, &float_text)
            }
        }
    }

    fn double(&self, text: &str, type_character: Option<TypeCharacter>) -> TokenKind {
        match text.parse::<f64>() {
            Ok(value) if value.is_finite() => TokenKind::FloatingPointLiteral(FloatingPointLiteral {
                value,
                type_character,
            }),
            _ => TokenKind::Error(ErrorCode::InvalidFloatingPointLiteral),
        }
    }

    fn decimal_integer_kind(
        &self,
        value: u64,
        type_character: Option<TypeCharacter>,
        float_text: &dyn Fn() -> String,
    ) -> TokenKind {
        use TypeCharacter::*;
        let fits_signed = |bits: u32| value <= (i64::MAX as u64) >> (64 - bits);
        let signed = |ok: bool| {
            if ok {
                TokenKind::IntegerLiteral(IntegerLiteral {
                    value: value as i64,
                    base: IntegerBase::Decimal,
                    type_character,
                })
            } else {
                TokenKind::Error(ErrorCode::InvalidIntegerLiteral)
            }
        };
        let unsigned = |max: u64| {
            if value <= max {
                TokenKind::UnsignedIntegerLiteral(UnsignedIntegerLiteral {
                    value,
                    base: IntegerBase::Decimal,
                    type_character,
                })
            } else {
                TokenKind::Error(ErrorCode::InvalidIntegerLiteral)
            }
        };
        match type_character {
            Some(ShortChar) => signed(fits_signed(16)),
            Some(IntegerSymbol) | Some(IntegerChar) => signed(fits_signed(self.integer_bits())),
            Some(LongSymbol) | Some(LongChar) => signed(fits_signed(self.long_bits())),
            Some(UnsignedShortChar) => unsigned(u16::MAX as u64),
            Some(UnsignedIntegerChar) => unsigned(u32::MAX as u64),
            Some(UnsignedLongChar) => unsigned(u64::MAX),
            _ => {
                if fits_signed(self.long_bits()) {
                    signed(true)
                } else if self.dialect.vb6 {
                    self.double(&float_text(), None)
                } else {
                    signed(false)
                }
            }
        }
    }

    /// Hex and octal literals reinterpret their bits in the target width.
    fn based_kind(
        &self,
        bits: u64,
        base: IntegerBase,
        type_character: Option<TypeCharacter>,
    ) -> TokenKind {
        use TypeCharacter::*;
        let wrap = |width: u32| -> Option<i64> {
            if width < 64 && bits >> width != 0 {
                return None;
            }
            let shift = 64 - width;
            Some(((bits << shift) as i64) >> shift)
        };
        let fits = |width: u32| width == 64 || bits >> width == 0;
        let signed = |value: Option<i64>| match value {
            Some(value) => TokenKind::IntegerLiteral(IntegerLiteral {
                value,
                base,
                type_character,
            }),
            None => TokenKind::Error(ErrorCode::InvalidIntegerLiteral),
        };
        let unsigned = |width: u32| {
            if fits(width) {
                TokenKind::UnsignedIntegerLiteral(UnsignedIntegerLiteral {
                    value: bits,
                    base,
                    type_character,
                })
            } else {
                TokenKind::Error(ErrorCode::InvalidIntegerLiteral)
            }
        };
        match type_character {
            Some(ShortChar) => signed(wrap(16)),
            Some(IntegerSymbol) | Some(IntegerChar) => signed(wrap(self.integer_bits())),
            Some(LongSymbol) | Some(LongChar) => signed(wrap(self.long_bits())),
            Some(UnsignedShortChar) => unsigned(16),
            Some(UnsignedIntegerChar) => unsigned(32),
            Some(UnsignedLongChar) => unsigned(64),
            Some(_) => TokenKind::Error(ErrorCode::InvalidTypeCharacter),
            None => {
                if fits(self.integer_bits()) {
                    signed(wrap(self.integer_bits()))
                } else {
                    signed(wrap(self.long_bits()))
                }
            }
        }
    }

    fn scan_punctuator(&mut self, start: Location) -> Token {
        let c = self.next_char().map(half_width).unwrap_or('\0');
        let next = self.peek_char().map(half_width);
        let compound = self.dialect.compound_assignment;
        let take = |this: &mut Scanner, t: TokenType| {
            this.next_char();
            t
        };
        use TokenType::*;
        let token_type = match c {
            '(' => LeftParenthesis,
            ')' => RightParenthesis,
            '{' => LeftCurlyBrace,
            '}' => RightCurlyBrace,
            ',' => Comma,
            '.' => Period,
            '!' => Exclamation,
            '=' => Equals,
            ':' => {
                if next == Some('=') {
                    take(self, ColonEquals)
                } else {
                    return self.token(TokenKind::Colon, start);
                }
            }
            '&' | '*' | '+' | '-' | '/' | '\\' | '^' if compound && next == Some('=') => {
                let t = match c {
                    '&' => AmpersandEquals,
                    '*' => StarEquals,
                    '+' => PlusEquals,
                    '-' => MinusEquals,
                    '/' => ForwardSlashEquals,
                    '\\' => BackwardSlashEquals,
                    _ => CaretEquals,
                };
                take(self, t)
            }
            '&' => Ampersand,
            '*' => Star,
            '+' => Plus,
            '-' => Minus,
            '/' => ForwardSlash,
            '\\' => BackwardSlash,
            '^' => Caret,
            '<' => match next {
                Some('=') => take(self, LessThanEquals),
                Some('>') => take(self, NotEquals),
                Some('<') if compound => {
                    self.next_char();
                    if self.peek_char().map(half_width) == Some('=') {
                        take(self, LessThanLessThanEquals)
                    } else {
                        LessThanLessThan
                    }
                }
                _ => LessThan,
            },
            '>' => match next {
                Some('=') => take(self, GreaterThanEquals),
                Some('>') if compound => {
                    self.next_char();
                    if self.peek_char().map(half_width) == Some('=') {
                        take(self, GreaterThanGreaterThanEquals)
                    } else {
                        GreaterThanGreaterThan
                    }
                }
                _ => GreaterThan,
            },
            _ => return self.error(ErrorCode::InvalidCharacter, start),
        };
        self.token(TokenKind::Punctuator(token_type), start)
    }
}

/// Parses the body of a date literal: `[M/D/Y] [H[:M[:S]] [AM|PM]]`.
fn parse_date(body: &str) -> Option<NaiveDateTime> {
    let mut cursor = DateCursor {
        chars: body.chars().collect(),
        index: 0,
    };
    cursor.skip_spaces();
    let mut date = None;
    let mut time = None;
    let first = cursor.number(4)?;
    match cursor.peek() {
        Some(sep) if sep == '/' || sep == '-' => {
            cursor.index += 1;
            let day = cursor.number(2)?;
            if cursor.peek() != Some(sep) {
                return None;
            }
            cursor.index += 1;
            let year = cursor.number(4)?;
            if year == 0 {
                return None;
            }
            date = Some(NaiveDate::from_ymd_opt(year as i32, first, day)?);
            cursor.skip_spaces();
            if cursor.peek().map_or(false, |c| c.is_ascii_digit()) {
                let hour = cursor.number(2)?;
                time = Some(cursor.time(hour)?);
            }
        }
        _ => time = Some(cursor.time(first)?),
    }
    cursor.skip_spaces();
    if cursor.peek().is_some() {
        return None;
    }
    let date = date.unwrap_or_else(|| NaiveDate::from_ymd_opt(1, 1, 1).unwrap_or_default());
    let time = time.unwrap_or_else(|| NaiveTime::from_hms_opt(0, 0, 0).unwrap_or_default());
    Some(NaiveDateTime::new(date, time))
}

struct DateCursor {
    chars: Vec<char>,
    index: usize,
}

impl DateCursor {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.index).copied()
    }

    fn skip_spaces(&mut self) {
        while self.peek().map_or(false, chars::is_whitespace) {
            self.index += 1;
        }
    }

    fn number(&mut self, max_digits: usize) -> Option<u32> {
        let begin = self.index;
        while self.peek().map_or(false, |c| c.is_ascii_digit()) {
            self.index += 1;
        }
        let len = self.index - begin;
        if len == 0 || len > max_digits {
            return None;
        }
        self.chars[begin..self.index]
            .iter()
            .collect::<String>()
            .parse()
            .ok()
    }

    /// Rest of a time after its hour.
    fn time(&mut self, hour: u32) -> Option<NaiveTime> {
        let mut minute = 0;
        let mut second = 0;
        let mut has_colon = false;
        if self.peek() == Some(':') {
            self.index += 1;
            minute = self.number(2)?;
            has_colon = true;
            if self.peek() == Some(':') {
                self.index += 1;
                second = self.number(2)?;
            }
        }
        self.skip_spaces();
        let meridiem = match (self.peek(), self.chars.get(self.index + 1).copied()) {
            (Some(a), Some(m)) if m.to_ascii_uppercase() == 'M' => match a.to_ascii_uppercase() {
                'A' => Some(false),
                'P' => Some(true),
                _ => None,
            },
            (Some(a), _) if a.to_ascii_uppercase() == 'A' || a.to_ascii_uppercase() == 'P' => {
                Some(a.to_ascii_uppercase() == 'P')
            }
            _ => None,
        };
        let hour = match meridiem {
            Some(pm) => {
                self.index += 1;
                if self.peek().map_or(false, |c| c.to_ascii_uppercase() == 'M') {
                    self.index += 1;
                }
                if hour == 0 || hour > 12 {
                    return None;
                }
                (hour % 12) + if pm { 12 } else { 0 }
            }
            None => {
                if !has_colon {
                    return None;
                }
                hour
            }
        };
        if hour > 23 || minute > 59 || second > 59 {
            return None;
        }
        NaiveTime::from_hms_opt(hour, minute, second)
    }
}
