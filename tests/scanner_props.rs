use proptest::prelude::*;
use vbfront::lang::token::{TokenKind, TokenType};
use vbfront::lang::{
    lex, parse_file, parse_statement, Dialect, LanguageVersion, ParseOptions, Scanner,
    DEFAULT_TAB_WIDTH,
};

fn version() -> impl Strategy<Value = LanguageVersion> {
    prop_oneof![
        Just(LanguageVersion::VB6),
        Just(LanguageVersion::VB71),
        Just(LanguageVersion::VB80),
    ]
}

fn fragment() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(vec![
            "Sub", "End", "If", "Then", "Else", "For", "Next", "Dim", "As", "Class", "(", ")",
            "=", "+=", ".", ",", ":", "\"", "'", "#", "#If", "#End", "_", "\n", "\r\n", " ",
            "\t", "&H", "1.5E", "[", "]", "<", ">", "{", "}", "Of", "Rem",
        ])
        .prop_map(String::from),
        "[a-z]{1,6}",
        any::<char>().prop_map(String::from),
    ]
}

/// Text the scanner may drop between tokens: blanks and line continuations.
fn is_skippable(c: char) -> bool {
    is_blank(c) || is_line_break(c) || is_underscore(c)
}

fn is_blank(c: char) -> bool {
    matches!(
        c,
        ' ' | '\t' | '\u{A0}' | '\u{3000}' | '\u{1680}' | '\u{180E}' | '\u{2000}'..='\u{200B}'
            | '\u{202F}' | '\u{205F}'
    )
}

fn is_underscore(c: char) -> bool {
    matches!(
        c,
        '_' | '\u{203F}' | '\u{2040}' | '\u{2054}' | '\u{FE33}' | '\u{FE34}'
            | '\u{FE4D}'..='\u{FE4F}' | '\u{FF3F}'
    )
}

fn is_line_break(c: char) -> bool {
    matches!(c, '\r' | '\n' | '\u{2028}' | '\u{2029}')
}

fn source() -> impl Strategy<Value = String> {
    prop::collection::vec(fragment(), 0..40).prop_map(|parts| parts.concat())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn lex_ends_with_one_end_of_stream(src in source(), version in version()) {
        let tokens = lex(&src, version);
        let ends = tokens.iter().filter(|t| t.is(TokenType::EndOfStream)).count();
        prop_assert_eq!(ends, 1);
        prop_assert!(tokens.last().map_or(false, |t| t.is(TokenType::EndOfStream)));
    }

    #[test]
    fn lex_spans_are_ordered(src in source(), version in version()) {
        let tokens = lex(&src, version);
        let length = src.chars().count();
        for pair in tokens.windows(2) {
            prop_assert!(pair[0].span.finish.index <= pair[1].span.start.index);
        }
        for (n, token) in tokens.iter().enumerate() {
            prop_assert!(token.span.start.index <= token.span.finish.index);
            prop_assert!(token.span.finish.index <= length);
            prop_assert_eq!(token.position(), n);
        }
    }

    #[test]
    fn spans_cover_the_source(src in source(), version in version()) {
        let chars: Vec<char> = src.chars().collect();
        let tokens = lex(&src, version);
        let mut covered = 0;
        for token in &tokens {
            let gap = &chars[covered..token.span.start.index];
            prop_assert!(gap.iter().all(|&c| is_skippable(c)), "lost {:?} in {:?}", gap, src);
            if gap.iter().any(|&c| is_line_break(c)) {
                prop_assert!(gap.iter().any(|&c| is_underscore(c)), "line break in {:?}", src);
            }
            if token.is(TokenType::EndOfStream) {
                break;
            }
            prop_assert!(token.span.start.index < token.span.finish.index, "empty {:?}", token);
            let text: String = chars[token.span.start.index..token.span.finish.index].iter().collect();
            if let TokenKind::Identifier(ident) = &token.kind {
                if !ident.escaped {
                    prop_assert!(text.starts_with(&*ident.text), "{:?} from {:?}", ident.text, text);
                }
            }
            covered = token.span.finish.index;
        }
    }

    #[test]
    fn seek_returns_to_the_same_token(src in source(), version in version(), pick in any::<usize>()) {
        let mut scanner = Scanner::new(&src, Dialect::new(version), DEFAULT_TAB_WIDTH);
        let mut read = vec![];
        loop {
            let token = scanner.read();
            let end = token.is(TokenType::EndOfStream);
            read.push(token);
            if end {
                break;
            }
        }
        let target = &read[pick % read.len()];
        scanner.seek(target);
        prop_assert_eq!(scanner.peek(), target);
        prop_assert_eq!(scanner.position(), target.position());
        scanner.seek(target);
        prop_assert_eq!(scanner.read(), target.clone());
    }

    #[test]
    fn parse_never_panics(src in source(), version in version()) {
        let options = ParseOptions::default().with_version(version);
        let _ = parse_file(&src, &options);
        let _ = parse_statement(&src, &options);
    }
}
