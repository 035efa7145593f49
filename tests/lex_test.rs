use vbfront::lang::token::*;
use vbfront::lang::{lex, Dialect, ErrorCode, LanguageVersion, Scanner, DEFAULT_TAB_WIDTH};

const VB6: LanguageVersion = LanguageVersion::VB6;
const VB71: LanguageVersion = LanguageVersion::VB71;
const VB80: LanguageVersion = LanguageVersion::VB80;

fn types(s: &str, version: LanguageVersion) -> Vec<TokenType> {
    lex(s, version).iter().map(|t| t.token_type()).collect()
}

fn first(s: &str, version: LanguageVersion) -> TokenKind {
    lex(s, version).remove(0).kind
}

#[test]
fn test_keywords_ignore_case() {
    use TokenType::*;
    assert_eq!(types("dim DIM Dim", VB80), vec![Dim, Dim, Dim, EndOfStream]);
    assert_eq!(types("Remark", VB80), vec![Identifier, EndOfStream]);
}

#[test]
fn test_keywords_by_dialect() {
    use TokenType::*;
    assert_eq!(types("Continue", VB80), vec![Continue, EndOfStream]);
    assert_eq!(types("Continue", VB71), vec![Identifier, EndOfStream]);
    assert_eq!(types("Type", VB6), vec![Type, EndOfStream]);
    assert_eq!(types("Type", VB80), vec![Identifier, EndOfStream]);
    assert_eq!(types("Short", VB6), vec![Identifier, EndOfStream]);
    assert_eq!(types("Short", VB71), vec![Short, EndOfStream]);
    assert_eq!(types("Wend", VB80), vec![Wend, EndOfStream]);
}

#[test]
fn test_unreserved_keywords() {
    let tokens = lex("Explicit Region", VB80);
    assert!(tokens[0].is_identifier());
    assert!(tokens[0].is_unreserved(TokenType::Explicit));
    assert!(tokens[1].is_unreserved(TokenType::Region));
    let tokens = lex("Region", VB6);
    assert_eq!(tokens[0].unreserved(), None);
}

#[test]
fn test_escaped_identifier() {
    match first("[Dim]", VB80) {
        TokenKind::Identifier(ident) => {
            assert_eq!(&*ident.text, "Dim");
            assert!(ident.escaped);
            assert_eq!(ident.keyword, None);
        }
        k => panic!("{:?}", k),
    }
    assert_eq!(
        first("[Dim", VB80),
        TokenKind::Error(ErrorCode::InvalidEscapedIdentifier)
    );
}

#[test]
fn test_type_characters() {
    match first("x$", VB80) {
        TokenKind::Identifier(ident) => {
            assert_eq!(ident.type_character, Some(TypeCharacter::StringSymbol))
        }
        k => panic!("{:?}", k),
    }
    use TokenType::*;
    assert_eq!(
        types("a!b", VB80),
        vec![Identifier, Exclamation, Identifier, EndOfStream]
    );
    assert_eq!(types("a&b", VB80), vec![Identifier, Ampersand, Identifier, EndOfStream]);
}

#[test]
fn test_strings() {
    assert_eq!(
        first("\"a\"\"b\"", VB80),
        TokenKind::StringLiteral("a\"b".into())
    );
    assert_eq!(
        first("\"abc", VB80),
        TokenKind::Error(ErrorCode::InvalidStringLiteral)
    );
    assert_eq!(first("\"x\"c", VB80), TokenKind::CharacterLiteral('x'));
    assert_eq!(
        first("\"xy\"c", VB80),
        TokenKind::Error(ErrorCode::InvalidCharacterLiteral)
    );
    use TokenType::*;
    assert_eq!(
        types("\"x\"c", VB6),
        vec![StringLiteral, Identifier, EndOfStream]
    );
}

#[test]
fn test_comments() {
    let tokens = lex("x = 1 Rem note", VB80);
    match &tokens[3].kind {
        TokenKind::Comment { text, is_rem } => {
            assert_eq!(text.trim(), "note");
            assert!(*is_rem);
        }
        k => panic!("{:?}", k),
    }
    use TokenType::*;
    assert_eq!(types("' a _\nb", VB6), vec![Comment, EndOfStream]);
    assert_eq!(
        types("' a _\nb", VB80),
        vec![Comment, LineTerminator, Identifier, EndOfStream]
    );
}

#[test]
fn test_line_continuation() {
    use TokenType::*;
    assert_eq!(
        types("a _\n+ b", VB80),
        vec![Identifier, Plus, Identifier, EndOfStream]
    );
    assert_eq!(types("a_b", VB80), vec![Identifier, EndOfStream]);
}

#[test]
fn test_compound_operators() {
    use TokenType::*;
    assert_eq!(
        types("x <<= 2", VB80),
        vec![Identifier, LessThanLessThanEquals, IntegerLiteral, EndOfStream]
    );
    assert_eq!(
        types("x <<= 2", VB6),
        vec![Identifier, LessThan, LessThanEquals, IntegerLiteral, EndOfStream]
    );
    assert_eq!(
        types("x += 1", VB71),
        vec![Identifier, PlusEquals, IntegerLiteral, EndOfStream]
    );
    assert_eq!(
        types("x += 1", VB6),
        vec![Identifier, Plus, Equals, IntegerLiteral, EndOfStream]
    );
    assert_eq!(
        types("a <> b := c", VB6),
        vec![Identifier, NotEquals, Identifier, ColonEquals, Identifier, EndOfStream]
    );
}

#[test]
fn test_integer_widths() {
    match first("32768", VB6) {
        TokenKind::IntegerLiteral(lit) => assert_eq!(lit.value, 32768),
        k => panic!("{:?}", k),
    }
    assert_eq!(
        first("32768%", VB6),
        TokenKind::Error(ErrorCode::InvalidIntegerLiteral)
    );
    assert!(matches!(first("32768%", VB80), TokenKind::IntegerLiteral(_)));
    assert!(matches!(
        first("99999999999", VB6),
        TokenKind::FloatingPointLiteral(_)
    ));
    assert!(matches!(
        first("99999999999", VB80),
        TokenKind::IntegerLiteral(_)
    ));
}

#[test]
fn test_literal_suffixes() {
    match first("10UI", VB80) {
        TokenKind::UnsignedIntegerLiteral(lit) => assert_eq!(lit.value, 10),
        k => panic!("{:?}", k),
    }
    use TokenType::*;
    assert_eq!(
        types("10UI", VB71),
        vec![IntegerLiteral, Identifier, EndOfStream]
    );
    assert_eq!(types("10@", VB6), vec![DecimalLiteral, EndOfStream]);
    assert_eq!(types("10D", VB80), vec![DecimalLiteral, EndOfStream]);
    match first("1.5!", VB6) {
        TokenKind::FloatingPointLiteral(lit) => {
            assert_eq!(lit.value, 1.5);
            assert_eq!(lit.type_character, Some(TypeCharacter::SingleSymbol));
        }
        k => panic!("{:?}", k),
    }
    match first("&O17", VB80) {
        TokenKind::IntegerLiteral(lit) => {
            assert_eq!(lit.value, 15);
            assert_eq!(lit.base, IntegerBase::Octal);
        }
        k => panic!("{:?}", k),
    }
}

#[test]
fn test_dates() {
    match first("#1/2/2000#", VB80) {
        TokenKind::DateLiteral(d) => assert_eq!(d.to_string(), "2000-01-02 00:00:00"),
        k => panic!("{:?}", k),
    }
    assert_eq!(
        first("#13/1/2000#", VB80),
        TokenKind::Error(ErrorCode::InvalidDateLiteral)
    );
    assert_eq!(types("#If", VB80)[0], TokenType::Pound);
}

#[test]
fn test_invalid_character() {
    assert_eq!(
        first("`", VB80),
        TokenKind::Error(ErrorCode::InvalidCharacter)
    );
}

#[test]
fn test_locations() {
    let tokens = lex("a\n  b", VB80);
    let b = &tokens[2];
    assert_eq!(b.to_string(), "b");
    assert_eq!(b.span.start.line, 2);
    assert_eq!(b.span.start.column, 3);
    for (n, token) in tokens.iter().enumerate() {
        assert_eq!(token.position(), n);
    }
}

#[test]
fn test_scanner_cursor() {
    let mut scanner = Scanner::new("a b c", Dialect::new(VB80), DEFAULT_TAB_WIDTH);
    assert_eq!(scanner.peek().to_string(), "a");
    assert_eq!(scanner.peek().to_string(), "a");
    assert_eq!(scanner.peek_ahead(2).to_string(), "c");
    assert_eq!(scanner.position(), 0);
    assert_eq!(scanner.read().to_string(), "a");
    assert_eq!(scanner.read().to_string(), "b");
    assert_eq!(scanner.previous(1, true).to_string(), "b");
    assert_eq!(scanner.position(), 1);
    assert!(scanner.peek_ahead(10).is(TokenType::EndOfStream));
}
