use super::{ExternalChecksum, ExternalLineMapping, Parser, Region};
use crate::lang::eval::Evaluator;
use crate::lang::token::{TokenKind, TokenType};
use crate::lang::{ErrorCode, Span};
use std::rc::Rc;
use tracing::trace;

/// One `#If` chain.
#[derive(Debug, Clone)]
pub(super) struct Conditional {
    /// Lines of the current branch are parsed.
    active: bool,
    /// Some branch of the chain has been active.
    taken: bool,
    seen_else: bool,
    /// Whether the lines around the chain are parsed.
    parent_active: bool,
    span: Span,
}

#[derive(Debug, Clone)]
pub(super) struct OpenExternalSource {
    file: Rc<str>,
    line: i64,
    span: Span,
}

impl Parser {
    fn skipping(&self) -> bool {
        self.state
            .conditionals
            .last()
            .map_or(false, |conditional| !conditional.active)
    }

    /// Runs the directives at the start of a line, and skips lines in
    /// inactive conditional branches.
    pub(super) fn preprocess(&mut self) {
        while self.state.at_line_start {
            if self.at(TokenType::Pound) {
                self.directive();
            } else if self.skipping() && !self.at(TokenType::EndOfStream) {
                self.skip_inactive_line();
            } else {
                break;
            }
        }
    }

    fn skip_inactive_line(&mut self) {
        loop {
            let token = self.scanner.read();
            match token.token_type() {
                TokenType::LineTerminator => break,
                TokenType::EndOfStream => return,
                _ => {}
            }
        }
        self.state.at_line_start = true;
    }

    fn directive(&mut self) {
        use TokenType as T;
        self.begin_statement();
        let start = self.read().span;
        let token = self.peek().clone();
        let skipping = self.skipping();
        let mut quiet = skipping;
        match token.token_type() {
            T::If => self.if_directive(start),
            T::ElseIf => {
                self.read();
                quiet |= !self.else_if_directive(start);
            }
            T::Else if self.peek_ahead(1).is(T::If) => {
                self.read();
                self.read();
                quiet |= !self.else_if_directive(start);
            }
            T::Else => {
                self.read();
                self.else_directive();
            }
            T::EndIf => {
                self.read();
                self.end_if_directive(start);
            }
            T::End if self.peek_ahead(1).is(T::If) => {
                self.read();
                self.read();
                self.end_if_directive(start);
            }
            _ if skipping => {}
            T::End => {
                self.read();
                let what = self.peek().clone();
                if what.is_unreserved(T::Region) {
                    self.read();
                    self.end_region(start);
                } else if what.is_unreserved(T::ExternalSource) {
                    self.read();
                    self.end_external_source(start);
                } else {
                    self.report(error!(InvalidPreprocessorStatement, what.span));
                }
            }
            T::Const => self.const_directive(),
            _ if token.is_unreserved(T::Region) => self.region(start),
            _ if token.is_unreserved(T::ExternalSource) => self.external_source(start),
            _ if token.is_unreserved(T::ExternalChecksum) => self.external_checksum(start),
            _ => self.report(error!(InvalidPreprocessorStatement, token.span)),
        }
        self.finish_directive(quiet);
    }

    /// Consumes the rest of the directive line and its terminator.
    fn finish_directive(&mut self, quiet: bool) {
        if !quiet
            && !matches!(
                self.peek_type(),
                TokenType::LineTerminator | TokenType::EndOfStream | TokenType::Comment
            )
        {
            let span = self.peek().span;
            self.report(error!(ExpectedEndOfStatement, span));
        }
        loop {
            match self.peek_type() {
                TokenType::EndOfStream => break,
                TokenType::LineTerminator => {
                    self.read();
                    break;
                }
                _ => {
                    self.read();
                }
            }
        }
    }

    /// Evaluates a directive condition.
    fn directive_condition(&mut self) -> bool {
        let expr = self.expression();
        let mut evaluator =
            Evaluator::new(&self.state.constants, self.dialect, &mut self.state.diagnostics);
        evaluator.condition(&expr)
    }

    fn if_directive(&mut self, start: Span) {
        self.read();
        let parent_active = !self.skipping();
        let active = parent_active && self.directive_condition();
        if parent_active {
            self.accept(TokenType::Then);
        }
        trace!(active, parent_active, "#If");
        self.state.conditionals.push(Conditional {
            active,
            taken: active,
            seen_else: false,
            parent_active,
            span: self.span_from(start),
        });
    }

    /// Returns whether the condition was parsed. It is left unread once a
    /// branch has been taken.
    fn else_if_directive(&mut self, start: Span) -> bool {
        let (parent_active, taken, seen_else) = match self.state.conditionals.last() {
            Some(c) => (c.parent_active, c.taken, c.seen_else),
            None => {
                self.report(error!(ElseIfDirectiveWithoutIf, start));
                return false;
            }
        };
        if seen_else {
            self.report(error!(ElseIfDirectiveAfterElse, self.span_from(start)));
        }
        let active = parent_active && !taken && self.directive_condition();
        if parent_active && !taken {
            self.accept(TokenType::Then);
        }
        trace!(active, "#ElseIf");
        if let Some(conditional) = self.state.conditionals.last_mut() {
            conditional.active = active;
            conditional.taken |= active;
        }
        parent_active && !taken
    }

    fn else_directive(&mut self) {
        let span = self.state.last_span;
        match self.state.conditionals.last_mut() {
            Some(conditional) => {
                let seen_else = conditional.seen_else;
                conditional.active = conditional.parent_active && !conditional.taken;
                conditional.taken = true;
                conditional.seen_else = true;
                trace!(active = conditional.active, "#Else");
                if seen_else {
                    self.report(error!(ElseDirectiveAfterElse, span));
                }
            }
            None => self.report(error!(ElseDirectiveWithoutIf, span)),
        }
    }

    fn end_if_directive(&mut self, start: Span) {
        if self.state.conditionals.pop().is_none() {
            self.report(error!(EndIfDirectiveWithoutIf, self.span_from(start)));
        }
    }

    /// `#Const name = expression`
    fn const_directive(&mut self) {
        self.read();
        let name = match self.identifier() {
            Some(name) => name,
            None => return,
        };
        if self
            .expect(TokenType::Equals, ErrorCode::ExpectedEquals)
            .is_none()
        {
            return;
        }
        let expr = self.expression();
        let value = Evaluator::new(&self.state.constants, self.dialect, &mut self.state.diagnostics)
            .evaluate(&expr);
        trace!(name = %name, value = ?value, "#Const");
        match value {
            Some(value) => self.state.constants.define(&name.text, value),
            None => self.state.constants.remove(&name.text),
        }
    }

    fn region(&mut self, start: Span) {
        self.read();
        if self.in_method_body() {
            self.report_always(error!(RegionInsideMethod, start));
        }
        if let Some(description) = self.string_literal() {
            self.state.open_regions.push((description, start));
        }
    }

    fn end_region(&mut self, start: Span) {
        match self.state.open_regions.pop() {
            Some((description, open)) => {
                let span = open.to(self.span_from(start));
                self.state.regions.push(Region { description, span });
            }
            None => self.report(error!(EndRegionWithoutRegion, self.span_from(start))),
        }
    }

    /// `#ExternalSource("file", line)`
    fn external_source(&mut self, start: Span) {
        self.read();
        if self.state.external_source.is_some() {
            self.report_always(error!(NestedExternalSource, start));
        }
        let file = match self.directive_arguments(1) {
            Some(mut strings) => strings.remove(0),
            None => return,
        };
        if self
            .expect(TokenType::Comma, ErrorCode::ExpectedComma)
            .is_none()
        {
            return;
        }
        let token = self.peek().clone();
        let line = match token.kind {
            TokenKind::IntegerLiteral(literal) => {
                self.read();
                literal.value
            }
            _ => {
                self.report(error!(ExpectedIntegerLiteral, token.span));
                return;
            }
        };
        self.close_parenthesis();
        if self.state.external_source.is_none() {
            self.state.external_source = Some(OpenExternalSource {
                file,
                line,
                span: self.span_from(start),
            });
        }
    }

    fn end_external_source(&mut self, start: Span) {
        match self.state.external_source.take() {
            Some(open) => {
                let span = open.span.to(self.span_from(start));
                self.state.external_line_mappings.push(ExternalLineMapping {
                    file: open.file,
                    line: open.line,
                    span,
                });
            }
            None => self.report(error!(
                EndExternalSourceWithoutExternalSource,
                self.span_from(start)
            )),
        }
    }

    /// `#ExternalChecksum("file", "guid", "checksum")`
    fn external_checksum(&mut self, start: Span) {
        self.read();
        let mut strings = match self.directive_arguments(3) {
            Some(strings) => strings,
            None => return,
        };
        self.close_parenthesis();
        let checksum = strings.remove(2);
        let guid = strings.remove(1);
        let file = strings.remove(0);
        self.state.external_checksums.push(ExternalChecksum {
            file,
            guid,
            checksum,
            span: self.span_from(start),
        });
    }

    /// `(` and `count` comma-separated string literals.
    fn directive_arguments(&mut self, count: usize) -> Option<Vec<Rc<str>>> {
        self.expect(
            TokenType::LeftParenthesis,
            ErrorCode::ExpectedLeftParenthesis,
        )?;
        let mut strings = Vec::with_capacity(count);
        for n in 0..count {
            if n > 0 {
                self.expect(TokenType::Comma, ErrorCode::ExpectedComma)?;
            }
            strings.push(self.string_literal()?);
        }
        Some(strings)
    }

    /// Reports every directive construct still open at the end of a parse.
    pub(super) fn close_preprocessor(&mut self) {
        let conditionals = std::mem::take(&mut self.state.conditionals);
        for conditional in conditionals {
            self.report_always(error!(ExpectedEndIfDirective, conditional.span));
        }
        let regions = std::mem::take(&mut self.state.open_regions);
        for (_, span) in regions {
            self.report_always(error!(ExpectedEndRegion, span));
        }
        if let Some(open) = self.state.external_source.take() {
            self.report_always(error!(ExpectedEndExternalSource, open.span));
        }
    }
}
