//! Recursive-descent parser.
//!
//! One [`Parser`] owns one [`Scanner`] for the duration of one parse. No
//! entry point fails: problems are collected as [`Diagnostic`]s and the
//! tree carries `Malformed` nodes wherever a construct could not be
//! recovered. Callers detect success by checking for an empty diagnostics
//! list.
//!
//! The grammar is split over several `impl Parser` blocks:
//! blocks and terminators, expressions, statements, declarations, type
//! names and the preprocessor.

mod blocks;
mod declarations;
mod expressions;
mod preprocessor;
mod statements;
mod types;

pub use blocks::{BlockKind, Terminator};

use super::ast::{Comment, Declaration, Expression, File, SimpleName, Statement, TypeName};
use super::eval::{ConstantTable, ConstantValue};
use super::lex::{Scanner, DEFAULT_TAB_WIDTH};
use super::token::{keyword, Token, TokenKind, TokenType};
use super::{Diagnostic, Dialect, ErrorCode, LanguageVersion, Span};
use preprocessor::{Conditional, OpenExternalSource};
use rustc_hash::FxHashSet;
use std::rc::Rc;
use tracing::{debug, trace};

/// Everything a parse needs besides the source text.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOptions {
    pub version: LanguageVersion,
    pub tab_width: usize,
    /// Pre-seeded `#Const` environment.
    pub constants: ConstantTable,
}

impl Default for ParseOptions {
    fn default() -> ParseOptions {
        ParseOptions {
            version: LanguageVersion::default(),
            tab_width: DEFAULT_TAB_WIDTH,
            constants: ConstantTable::new(),
        }
    }
}

impl ParseOptions {
    pub fn with_version(mut self, version: LanguageVersion) -> ParseOptions {
        self.version = version;
        self
    }

    pub fn with_tab_width(mut self, tab_width: usize) -> ParseOptions {
        self.tab_width = tab_width;
        self
    }

    pub fn with_constant(mut self, name: &str, value: ConstantValue) -> ParseOptions {
        self.constants.define(name, value);
        self
    }
}

/// `#Region "description"` ... `#End Region`
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub description: Rc<str>,
    pub span: Span,
}

/// Source lines bracketed by `#ExternalSource("file", line)` and
/// `#End ExternalSource`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalLineMapping {
    pub file: Rc<str>,
    pub line: i64,
    pub span: Span,
}

/// `#ExternalChecksum("file", "guid", "checksum")`
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalChecksum {
    pub file: Rc<str>,
    pub guid: Rc<str>,
    pub checksum: Rc<str>,
    pub span: Span,
}

/// Result of one top-level parse.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed<T> {
    pub tree: T,
    pub diagnostics: Vec<Diagnostic>,
    pub regions: Vec<Region>,
    pub external_line_mappings: Vec<ExternalLineMapping>,
    pub external_checksums: Vec<ExternalChecksum>,
    /// `#Const` environment as it stood at the end of the source.
    pub constants: ConstantTable,
}

impl<T> Parsed<T> {
    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

pub fn parse_file(source: &str, options: &ParseOptions) -> Parsed<File> {
    Parser::new(source, options).parse_file()
}

pub fn parse_declaration(source: &str, options: &ParseOptions) -> Parsed<Declaration> {
    Parser::new(source, options).parse_declaration()
}

pub fn parse_statement(source: &str, options: &ParseOptions) -> Parsed<Statement> {
    Parser::new(source, options).parse_statement()
}

pub fn parse_expression(source: &str, options: &ParseOptions) -> Parsed<Expression> {
    Parser::new(source, options).parse_expression()
}

pub fn parse_type_name(source: &str, options: &ParseOptions) -> Parsed<TypeName> {
    Parser::new(source, options).parse_type_name()
}

pub struct Parser {
    scanner: Scanner,
    dialect: Dialect,
    constants: ConstantTable,
    state: ParserState,
}

/// Mutable state of one parse.
#[derive(Debug, Default)]
struct ParserState {
    blocks: Vec<BlockKind>,
    /// Latched by the first syntax error of a statement.
    error_reported: bool,
    /// A block of the current statement was left at an enclosing
    /// terminator, which the statement must not consume.
    unwound: bool,
    at_line_start: bool,
    /// Span of the last token read.
    last_span: Span,
    constants: ConstantTable,
    conditionals: Vec<Conditional>,
    open_regions: Vec<(Rc<str>, Span)>,
    external_source: Option<OpenExternalSource>,
    /// Variables of a multi-variable `Next` still to be matched by
    /// enclosing loops, innermost first.
    pending_next: Vec<Expression>,
    diagnostics: Vec<Diagnostic>,
    reported_tokens: FxHashSet<usize>,
    regions: Vec<Region>,
    external_line_mappings: Vec<ExternalLineMapping>,
    external_checksums: Vec<ExternalChecksum>,
}

impl Parser {
    pub fn new(source: &str, options: &ParseOptions) -> Parser {
        let dialect = Dialect::new(options.version);
        Parser {
            scanner: Scanner::new(source, dialect, options.tab_width),
            dialect,
            constants: options.constants.clone(),
            state: ParserState::default(),
        }
    }

    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    pub fn parse_file(self) -> Parsed<File> {
        self.run("file", |p| p.compilation_unit())
    }

    pub fn parse_declaration(self) -> Parsed<Declaration> {
        self.run("declaration", |p| {
            p.single(|p| p.declaration_line(declarations::Container::File))
        })
    }

    pub fn parse_statement(self) -> Parsed<Statement> {
        self.run("statement", |p| p.single(|p| p.standalone_statement()))
    }

    pub fn parse_expression(self) -> Parsed<Expression> {
        self.run("expression", |p| p.single(|p| p.expression()))
    }

    pub fn parse_type_name(self) -> Parsed<TypeName> {
        self.run("type name", |p| p.single(|p| p.type_name()))
    }

    fn reset(&mut self) {
        self.state = ParserState {
            at_line_start: true,
            constants: self.constants.clone(),
            ..ParserState::default()
        };
    }

    fn run<T>(mut self, entry: &'static str, rule: impl FnOnce(&mut Parser) -> T) -> Parsed<T> {
        self.reset();
        debug!(entry, dialect = %self.dialect.version, "parse");
        let tree = rule(&mut self);
        self.close_preprocessor();
        assert!(
            self.state.blocks.is_empty(),
            "block stack not empty after parse: {:?}",
            self.state.blocks
        );
        debug!(
            entry,
            tokens = self.scanner.tokens().len(),
            diagnostics = self.state.diagnostics.len(),
            "parse complete"
        );
        let state = self.state;
        Parsed {
            tree,
            diagnostics: state.diagnostics,
            regions: state.regions,
            external_line_mappings: state.external_line_mappings,
            external_checksums: state.external_checksums,
            constants: state.constants,
        }
    }

    /// Parses one construct that must make up the whole source.
    fn single<T>(&mut self, rule: impl FnOnce(&mut Parser) -> T) -> T {
        self.skip_separators();
        let tree = rule(self);
        loop {
            self.skip_separators();
            if !self.at(TokenType::Comment) {
                break;
            }
            self.read();
        }
        if !self.at(TokenType::EndOfStream) {
            let span = self.peek().span;
            self.report(error!(ExpectedEndOfStatement, span));
        }
        tree
    }

    fn compilation_unit(&mut self) -> File {
        let start = self.peek().span;
        let declarations = self.file_members();
        File {
            declarations,
            span: self.span_from(start),
        }
    }

    // Tokens

    fn peek(&mut self) -> &Token {
        self.scanner.peek()
    }

    fn peek_type(&mut self) -> TokenType {
        self.scanner.peek().token_type()
    }

    fn peek_ahead(&mut self, n: usize) -> &Token {
        self.scanner.peek_ahead(n)
    }

    fn at(&mut self, token_type: TokenType) -> bool {
        self.peek_type() == token_type
    }

    fn at_unreserved(&mut self, token_type: TokenType) -> bool {
        self.peek().is_unreserved(token_type)
    }

    /// Reads one token. Lexical errors are reported here, once per token
    /// however often rewinding brings the parser back to it.
    fn read(&mut self) -> Token {
        let token = self.scanner.read();
        if let Some(code) = token.error_code() {
            if self.state.reported_tokens.insert(token.position()) {
                self.state.diagnostics.push(Diagnostic::new(code, token.span));
            }
            self.state.error_reported = true;
        }
        self.state.at_line_start = token.is(TokenType::LineTerminator);
        if !token.is(TokenType::EndOfStream) {
            self.state.last_span = token.span;
        }
        token
    }

    fn accept(&mut self, token_type: TokenType) -> Option<Token> {
        if self.at(token_type) {
            Some(self.read())
        } else {
            None
        }
    }

    fn accept_unreserved(&mut self, token_type: TokenType) -> Option<Token> {
        if self.at_unreserved(token_type) {
            Some(self.read())
        } else {
            None
        }
    }

    /// Reads a token of `token_type`, or reports `code` at the current
    /// token without consuming it.
    fn expect(&mut self, token_type: TokenType, code: ErrorCode) -> Option<Token> {
        if self.at(token_type) {
            return Some(self.read());
        }
        let span = self.peek().span;
        self.report(Diagnostic::new(code, span));
        None
    }

    /// Moves back (or forward) to a token already seen.
    fn rewind(&mut self, token: &Token) {
        trace!(position = token.position(), "rewind");
        self.scanner.seek(token);
        if token.position() == 0 {
            self.state.at_line_start = true;
            self.state.last_span = Span::default();
        } else {
            let previous = self.scanner.previous(1, false);
            self.state.at_line_start = previous.is(TokenType::LineTerminator);
            self.state.last_span = previous.span;
        }
    }

    /// From the start of `start` to the end of the last token read.
    fn span_from(&self, start: Span) -> Span {
        if self.state.last_span.finish.index >= start.finish.index {
            Span::new(start.start, self.state.last_span.finish)
        } else {
            start
        }
    }

    // Diagnostics

    /// Reports a syntax error unless one was already reported for the
    /// current statement.
    fn report(&mut self, diagnostic: Diagnostic) {
        if self.state.error_reported {
            trace!(code = %diagnostic.code, span = %diagnostic.span, "suppressed");
            return;
        }
        self.state.error_reported = true;
        self.state.diagnostics.push(diagnostic);
    }

    /// Reports regardless of the latch. Used for block structure and
    /// obsolete-syntax errors, which never cascade.
    fn report_always(&mut self, diagnostic: Diagnostic) {
        self.state.diagnostics.push(diagnostic);
    }

    fn not_supported(&mut self, token_type: TokenType, span: Span) {
        self.report_always(error!(NotSupportedInDialect(token_type.spelling()), span));
    }

    fn begin_statement(&mut self) {
        self.state.error_reported = false;
        self.state.unwound = false;
    }

    // Recovery

    fn in_line_if(&self) -> bool {
        self.state.blocks.contains(&BlockKind::LineIf)
    }

    fn at_end_of_statement(&mut self) -> bool {
        let line_if = self.in_line_if();
        match self.peek_type() {
            TokenType::LineTerminator
            | TokenType::EndOfStream
            | TokenType::Colon
            | TokenType::Comment => true,
            TokenType::Else => line_if,
            _ => false,
        }
    }

    /// Skips to the end of the statement, or to the first token in `stops`.
    fn resync(&mut self, stops: &[TokenType]) {
        while !self.at_end_of_statement() {
            if stops.contains(&self.peek_type()) {
                break;
            }
            self.read();
        }
    }

    fn end_of_statement(&mut self) {
        if self.state.unwound || self.at_end_of_statement() {
            return;
        }
        let span = self.peek().span;
        self.report(error!(ExpectedEndOfStatement, span));
        self.resync(&[]);
    }

    fn trailing_comments(&mut self) -> Vec<Comment> {
        let mut comments = vec![];
        loop {
            let token = self.peek().clone();
            match token.kind {
                TokenKind::Comment { text, is_rem } => {
                    self.read();
                    comments.push(Comment {
                        text,
                        is_rem,
                        span: token.span,
                    });
                }
                _ => break,
            }
        }
        comments
    }

    /// Consumes statement separators and blank lines, running directives
    /// at each line start.
    fn skip_separators(&mut self) {
        loop {
            self.preprocess();
            match self.peek_type() {
                TokenType::LineTerminator | TokenType::Colon => {
                    self.read();
                }
                _ => break,
            }
        }
    }

    // Names

    fn identifier(&mut self) -> Option<SimpleName> {
        if self.peek().is_identifier() {
            let token = self.read();
            return simple_name(&token);
        }
        let span = self.peek().span;
        self.report(error!(ExpectedIdentifier, span));
        None
    }

    /// Identifier or keyword, as allowed after `.` and `!`.
    fn member_name(&mut self) -> Option<SimpleName> {
        if let Some(name) = simple_name(self.peek()) {
            self.read();
            return Some(name);
        }
        let span = self.peek().span;
        self.report(error!(ExpectedIdentifier, span));
        None
    }
}

/// Name spelled by an identifier or keyword token.
fn simple_name(token: &Token) -> Option<SimpleName> {
    let ident = token.identifier()?;
    Some(SimpleName {
        text: ident.text.clone(),
        escaped: ident.escaped,
        type_character: ident.type_character,
        span: token.span,
    })
}

/// Keyword reserved in another dialect, scanned here as an identifier.
fn foreign_keyword(token: &Token) -> Option<TokenType> {
    let ident = token.identifier()?;
    if ident.escaped || ident.type_character.is_some() || ident.keyword.is_some() {
        return None;
    }
    match keyword(&ident.text) {
        Some(k) if k.reserved => Some(k.token_type),
        _ => None,
    }
}
