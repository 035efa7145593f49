use super::blocks::{BlockEnd, BlockKind, Boundary, Terminator};
use super::{foreign_keyword, simple_name, Parser};
use crate::lang::ast::{
    Argument, Assignment, AssignmentKeyword, AssignmentOperator, BinaryOperator, Block, Case,
    CaseClause, CallStatement, Catch, ContinueKind, ControlVariable, Do, ElseBlock, ElseIf,
    ExitKind, Expression, ExpressionKind, For, ForEach, If, Label, LineIf, LoopCondition,
    LoopConditionKind, OnError, OnGoTo, ReDim, Resume, Select, Statement, StatementKind, Try,
    Using, UsingResource, While,
};
use crate::lang::token::{TokenKind, TokenType};
use crate::lang::{ErrorCode, Span};
use tracing::trace;

/// What lies past a parenthesized group in a legacy statement.
struct ParenGroup {
    balanced: bool,
    items: usize,
    next: TokenType,
}

impl Parser {
    /// One statement with its separator check and trailing comments.
    pub(super) fn statement_line(&mut self) -> Statement {
        self.begin_statement();
        if self.at(TokenType::Comment) {
            let start = self.peek().span;
            let comments = self.trailing_comments();
            return Statement {
                kind: StatementKind::Empty,
                span: self.span_from(start),
                comments,
            };
        }
        let mut statement = self.statement();
        // A line number may be followed by a statement on the same line.
        if !matches!(statement.kind, StatementKind::Label(_)) {
            self.end_of_statement();
        }
        statement.comments.extend(self.trailing_comments());
        statement
    }

    /// A statement outside any block. Terminators have nothing to close.
    pub(super) fn standalone_statement(&mut self) -> Statement {
        if let Some((terminator, span)) = self.peek_terminator() {
            self.begin_statement();
            self.report_always(error!(EndWithoutBegin(terminator), span));
            self.consume_terminator(terminator);
            self.resync(&[]);
            return Statement::new(StatementKind::Malformed, self.span_from(span));
        }
        self.statement_line()
    }

    pub(super) fn statement(&mut self) -> Statement {
        use TokenType as T;
        if self.state.at_line_start {
            if let Some(label) = self.label_definition() {
                return label;
            }
        }
        let token = self.peek().clone();
        let keyword = match foreign_keyword(&token) {
            Some(keyword) if self.foreign_statement(keyword) => {
                self.not_supported(keyword, token.span);
                keyword
            }
            _ => token.token_type(),
        };
        trace!(?keyword, span = %token.span, "statement");
        match keyword {
            T::If => self.if_statement(),
            T::Select => self.select_statement(),
            T::Do => self.do_statement(),
            T::While => self.while_statement(),
            T::For => self.for_statement(),
            T::With => self.simple_block(BlockKind::With),
            T::SyncLock => self.simple_block(BlockKind::SyncLock),
            T::Using => self.using_statement(),
            T::Try => self.try_statement(),
            T::Exit => self.exit_statement(),
            T::Continue => self.continue_statement(),
            T::Return => self.return_statement(),
            T::GoTo => self.go_to_statement(false),
            T::GoSub => self.go_to_statement(true),
            T::On => self.on_statement(),
            T::Resume => self.resume_statement(),
            T::Error => self.error_statement(),
            T::Throw => self.throw_statement(),
            T::Stop => self.keyword_statement(StatementKind::Stop),
            T::End => self.keyword_statement(StatementKind::End),
            T::ReDim => self.redim_statement(),
            T::Erase => self.erase_statement(),
            T::RaiseEvent => self.raise_event_statement(),
            T::AddHandler | T::RemoveHandler => self.handler_statement(keyword),
            T::Call => self.call_statement(),
            T::Let => self.assignment_keyword(AssignmentKeyword::Let),
            T::Set => self.assignment_keyword(AssignmentKeyword::Set),
            T::Dim | T::Static | T::Const => self.local_declaration(),
            _ => self.expression_statement(None),
        }
    }

    /// Keyword of another dialect spelled as a statement rather than used
    /// as a variable.
    fn foreign_statement(&mut self, keyword: TokenType) -> bool {
        use TokenType as T;
        if !matches!(
            keyword,
            T::Try
                | T::Throw
                | T::Using
                | T::SyncLock
                | T::Continue
                | T::AddHandler
                | T::RemoveHandler
        ) {
            return false;
        }
        !matches!(
            self.peek_ahead(1).token_type(),
            T::Equals
                | T::LeftParenthesis
                | T::Period
                | T::Exclamation
                | T::Colon
                | T::AmpersandEquals
                | T::PlusEquals
                | T::MinusEquals
                | T::StarEquals
                | T::ForwardSlashEquals
                | T::BackwardSlashEquals
                | T::CaretEquals
                | T::LessThanLessThanEquals
                | T::GreaterThanGreaterThanEquals
        )
    }

    /// `name:` or a line number at the start of a line.
    fn label_definition(&mut self) -> Option<Statement> {
        let token = self.peek().clone();
        let label = match &token.kind {
            TokenKind::IntegerLiteral(literal) => {
                self.read();
                if !self.at(TokenType::Colon) && !self.dialect.bare_line_numbers {
                    self.report_always(error!(ObsoleteLineNumber, token.span));
                }
                Label::Number(literal.value, token.span)
            }
            TokenKind::Identifier(_)
                if token.is_identifier() && self.peek_ahead(1).is(TokenType::Colon) =>
            {
                let name = simple_name(&token)?;
                self.read();
                Label::Name(name)
            }
            _ => return None,
        };
        Some(Statement::new(StatementKind::Label(label), token.span))
    }

    fn keyword_statement(&mut self, kind: StatementKind) -> Statement {
        let span = self.read().span;
        Statement::new(kind, span)
    }

    // Blocks

    fn if_statement(&mut self) -> Statement {
        let start = self.read().span;
        let condition = self.expression();
        let then = self.accept(TokenType::Then);
        if then.is_some() && !self.at_end_of_statement() {
            return self.line_if(start, condition);
        }
        if then.is_none() && (self.dialect.vb6 || !self.at_end_of_statement()) {
            let span = self.peek().span;
            self.report(error!(ExpectedThen, span));
            self.resync(&[]);
        }
        self.end_of_statement();
        let header = self.span_from(start);
        let comments = self.trailing_comments();
        let (then_block, mut end) = self.statement_block(BlockKind::If, header);
        let mut else_ifs = vec![];
        let mut else_block: Option<ElseBlock> = None;
        loop {
            match end {
                BlockEnd::Terminator(Terminator::ElseIf, _) => {
                    self.begin_statement();
                    let clause = self.consume_terminator(Terminator::ElseIf);
                    if else_block.is_some() {
                        self.report_always(error!(ElseIfAfterElse, clause));
                    }
                    let condition = self.expression();
                    if self.accept(TokenType::Then).is_none() && self.dialect.vb6 {
                        let span = self.peek().span;
                        self.report(error!(ExpectedThen, span));
                    }
                    self.end_of_statement();
                    let span = self.span_from(clause);
                    let comments = self.trailing_comments();
                    let (block, next) = self.statement_block(BlockKind::ElseIf, span);
                    else_ifs.push(ElseIf {
                        condition,
                        block,
                        span,
                        comments,
                    });
                    end = next;
                }
                BlockEnd::Terminator(Terminator::Else, _) => {
                    self.begin_statement();
                    let clause = self.consume_terminator(Terminator::Else);
                    if else_block.is_some() {
                        self.report_always(error!(ElseAfterElse, clause));
                    }
                    self.end_of_statement();
                    let comments = self.trailing_comments();
                    let (block, next) = self.statement_block(BlockKind::Else, clause);
                    match &mut else_block {
                        Some(existing) => existing.block.extend(block),
                        None => {
                            else_block = Some(ElseBlock {
                                block,
                                span: clause,
                                comments,
                            })
                        }
                    }
                    end = next;
                }
                other => {
                    self.close_block(other);
                    break;
                }
            }
        }
        Statement {
            kind: StatementKind::If(If {
                condition,
                then_block,
                else_ifs,
                else_block,
            }),
            span: self.span_from(start),
            comments,
        }
    }

    /// `If c Then a : b Else d`; the cursor is past `Then`.
    fn line_if(&mut self, start: Span, condition: Expression) -> Statement {
        self.push_block(BlockKind::LineIf);
        let then_statements = self.line_if_statements();
        let else_statements = if self.accept(TokenType::Else).is_some() {
            Some(self.line_if_statements())
        } else {
            None
        };
        self.pop_block(BlockKind::LineIf);
        Statement::new(
            StatementKind::LineIf(LineIf {
                condition,
                then_statements,
                else_statements,
            }),
            self.span_from(start),
        )
    }

    fn line_if_statements(&mut self) -> Block {
        let mut block = vec![];
        loop {
            match self.peek_type() {
                TokenType::Else
                | TokenType::LineTerminator
                | TokenType::EndOfStream
                | TokenType::Comment => break,
                TokenType::Colon => {
                    self.read();
                }
                _ => {
                    let token = self.peek().clone();
                    let statement = match &token.kind {
                        // `If x Then 100` branches to line 100.
                        TokenKind::IntegerLiteral(literal) if block.is_empty() => {
                            self.read();
                            let label = Label::Number(literal.value, token.span);
                            Statement::new(StatementKind::GoTo(label), token.span)
                        }
                        _ => self.statement(),
                    };
                    block.push(statement);
                    self.end_of_statement();
                }
            }
        }
        block
    }

    fn select_statement(&mut self) -> Statement {
        let start = self.read().span;
        if self.accept(TokenType::Case).is_none() && self.dialect.vb6 {
            let span = self.peek().span;
            self.report(error!(ExpectedCase, span));
        }
        let expression = self.expression();
        self.end_of_statement();
        let header = self.span_from(start);
        let mut comments = self.trailing_comments();
        self.push_block(BlockKind::Select);
        let mut cases = vec![];
        let mut seen_else = false;
        loop {
            self.skip_separators();
            if self.at(TokenType::Comment) {
                comments.extend(self.trailing_comments());
                continue;
            }
            match self.boundary(BlockKind::Select, header) {
                Boundary::Skipped => {}
                Boundary::Item => {
                    self.begin_statement();
                    let span = self.peek().span;
                    self.report_always(error!(StatementBeforeCase, span));
                    self.statement_line();
                }
                Boundary::Stop(BlockEnd::Terminator(Terminator::Case, _)) => {
                    let (case, end) = self.case(seen_else);
                    seen_else |= case.is_else;
                    cases.push(case);
                    match end {
                        BlockEnd::Terminator(Terminator::Case, _) => {}
                        BlockEnd::Terminator(Terminator::EndSelect, _) => {
                            self.close_block(end);
                            break;
                        }
                        _ => break,
                    }
                }
                Boundary::Stop(end) => {
                    self.close_block(end);
                    break;
                }
            }
        }
        self.pop_block(BlockKind::Select);
        Statement {
            kind: StatementKind::Select(Select { expression, cases }),
            span: self.span_from(start),
            comments,
        }
    }

    /// One `Case` clause and its statements.
    fn case(&mut self, seen_else: bool) -> (Case, BlockEnd) {
        self.begin_statement();
        let start = self.read().span;
        let is_else = self.accept(TokenType::Else).is_some();
        if seen_else {
            self.report_always(error!(CaseAfterCaseElse, start));
        }
        let clauses = if is_else { vec![] } else { self.case_clauses() };
        self.end_of_statement();
        let span = self.span_from(start);
        let comments = self.trailing_comments();
        let (block, end) = self.statement_block(BlockKind::Case, span);
        let case = Case {
            clauses,
            is_else,
            block,
            span,
            comments,
        };
        (case, end)
    }

    fn case_clauses(&mut self) -> Vec<CaseClause> {
        let mut clauses = vec![];
        loop {
            let is = self.accept(TokenType::Is);
            let clause = match relational_operator(self.peek_type()) {
                Some(operator) => {
                    self.read();
                    CaseClause::Relational(operator, self.expression())
                }
                None if is.is_some() => {
                    let span = self.peek().span;
                    self.report(error!(ExpectedRelationalOperator, span));
                    break;
                }
                None => CaseClause::Expression(self.range_expression()),
            };
            clauses.push(clause);
            if self.accept(TokenType::Comma).is_none() {
                break;
            }
        }
        clauses
    }

    fn do_statement(&mut self) -> Statement {
        let start = self.read().span;
        let top = self.loop_condition();
        self.end_of_statement();
        let header = self.span_from(start);
        let comments = self.trailing_comments();
        let (block, end) = self.statement_block(BlockKind::Do, header);
        let mut bottom = None;
        if self.close_block(end) {
            let condition_start = self.peek().span;
            bottom = self.loop_condition();
            if top.is_some() && bottom.is_some() {
                let span = self.span_from(condition_start);
                self.report(error!(SyntaxError, span));
            }
        }
        Statement {
            kind: StatementKind::Do(Do { top, block, bottom }),
            span: self.span_from(start),
            comments,
        }
    }

    fn loop_condition(&mut self) -> Option<LoopCondition> {
        let kind = if self.accept(TokenType::While).is_some() {
            LoopConditionKind::While
        } else if self.accept(TokenType::Until).is_some() {
            LoopConditionKind::Until
        } else {
            return None;
        };
        let condition = self.expression();
        Some(LoopCondition { kind, condition })
    }

    fn while_statement(&mut self) -> Statement {
        let start = self.read().span;
        let condition = self.expression();
        self.end_of_statement();
        let header = self.span_from(start);
        let comments = self.trailing_comments();
        let (block, end) = self.statement_block(BlockKind::While, header);
        let wend = matches!(end, BlockEnd::Terminator(Terminator::Wend, _));
        self.close_block(end);
        Statement {
            kind: StatementKind::While(While {
                condition,
                block,
                wend,
            }),
            span: self.span_from(start),
            comments,
        }
    }

    fn for_statement(&mut self) -> Statement {
        let start = self.read().span;
        if self.accept(TokenType::Each).is_some() {
            return self.for_each(start);
        }
        let control = self.control_variable();
        self.expect(TokenType::Equals, ErrorCode::ExpectedEquals);
        let from = self.expression();
        self.expect(TokenType::To, ErrorCode::ExpectedTo);
        let to = self.expression();
        let step = if self.accept(TokenType::Step).is_some() {
            Some(self.expression())
        } else {
            None
        };
        self.end_of_statement();
        let header = self.span_from(start);
        let comments = self.trailing_comments();
        let (block, end) = self.statement_block(BlockKind::For, header);
        let next_variable = self.loop_next(end);
        Statement {
            kind: StatementKind::For(For {
                control,
                from,
                to,
                step,
                block,
                next_variable,
            }),
            span: self.span_from(start),
            comments,
        }
    }

    fn for_each(&mut self, start: Span) -> Statement {
        let control = self.control_variable();
        self.expect(TokenType::In, ErrorCode::ExpectedIn);
        let collection = self.expression();
        self.end_of_statement();
        let header = self.span_from(start);
        let comments = self.trailing_comments();
        let (block, end) = self.statement_block(BlockKind::ForEach, header);
        let next_variable = self.loop_next(end);
        Statement {
            kind: StatementKind::ForEach(ForEach {
                control,
                collection,
                block,
                next_variable,
            }),
            span: self.span_from(start),
            comments,
        }
    }

    fn control_variable(&mut self) -> ControlVariable {
        let variable = self.postfix();
        let type_name = match self.accept(TokenType::As) {
            Some(as_token) => {
                if self.dialect.vb6 {
                    self.not_supported(TokenType::As, as_token.span);
                }
                Some(self.type_name())
            }
            None => None,
        };
        ControlVariable {
            variable,
            type_name,
        }
    }

    /// Closes a `For` or `For Each` loop. Variables of a multi-variable
    /// `Next` beyond the first are left for the enclosing loops.
    fn loop_next(&mut self, end: BlockEnd) -> Option<Expression> {
        let first = match end {
            BlockEnd::Terminator(Terminator::Next, _) => {
                self.close_block(end);
                let mut variables = vec![];
                if !self.at_end_of_statement() {
                    loop {
                        variables.push(self.postfix());
                        if self.accept(TokenType::Comma).is_none() {
                            break;
                        }
                    }
                }
                let mut variables = variables.into_iter();
                let first = variables.next();
                self.state.pending_next = variables.collect();
                first
            }
            BlockEnd::PendingNext => {
                if self.state.pending_next.is_empty() {
                    None
                } else {
                    Some(self.state.pending_next.remove(0))
                }
            }
            _ => return None,
        };
        self.check_pending_next();
        first
    }

    /// Reports `Next` variables left over with no enclosing loop.
    fn check_pending_next(&mut self) {
        if self.state.pending_next.is_empty() {
            return;
        }
        let enclosing_loop = matches!(
            self.state.blocks.last(),
            Some(BlockKind::For) | Some(BlockKind::ForEach)
        );
        if enclosing_loop {
            return;
        }
        let pending = std::mem::take(&mut self.state.pending_next);
        if let (Some(first), Some(last)) = (pending.first(), pending.last()) {
            let span = first.span.to(last.span);
            self.report_always(error!(EndWithoutBegin(Terminator::Next), span));
        }
    }

    /// `With` and `SyncLock`: a keyword, an expression and a body.
    fn simple_block(&mut self, kind: BlockKind) -> Statement {
        let start = self.read().span;
        let expression = self.expression();
        self.end_of_statement();
        let header = self.span_from(start);
        let comments = self.trailing_comments();
        let (block, end) = self.statement_block(kind, header);
        self.close_block(end);
        let kind = match kind {
            BlockKind::SyncLock => StatementKind::SyncLock(expression, block),
            _ => StatementKind::With(expression, block),
        };
        Statement {
            kind,
            span: self.span_from(start),
            comments,
        }
    }

    fn using_statement(&mut self) -> Statement {
        let start = self.read().span;
        let declares = self.peek().is_identifier()
            && matches!(
                self.peek_ahead(1).token_type(),
                TokenType::As | TokenType::Equals | TokenType::Comma
            );
        let resource = if declares {
            UsingResource::Variables(self.variable_declarators())
        } else {
            UsingResource::Expression(self.expression())
        };
        self.end_of_statement();
        let header = self.span_from(start);
        let comments = self.trailing_comments();
        let (block, end) = self.statement_block(BlockKind::Using, header);
        self.close_block(end);
        Statement {
            kind: StatementKind::Using(Using { resource, block }),
            span: self.span_from(start),
            comments,
        }
    }

    fn try_statement(&mut self) -> Statement {
        let start = self.read().span;
        self.end_of_statement();
        let header = self.span_from(start);
        let comments = self.trailing_comments();
        let (block, mut end) = self.statement_block(BlockKind::Try, header);
        let mut catches = vec![];
        let mut finally: Option<ElseBlock> = None;
        loop {
            match end {
                BlockEnd::Terminator(Terminator::Catch, _) => {
                    self.begin_statement();
                    let clause = self.consume_terminator(Terminator::Catch);
                    if finally.is_some() {
                        self.report_always(error!(CatchAfterFinally, clause));
                    }
                    let name = if self.peek().is_identifier() {
                        self.identifier()
                    } else {
                        None
                    };
                    let type_name = match name {
                        Some(_) if self.accept(TokenType::As).is_some() => Some(self.type_name()),
                        _ => None,
                    };
                    let when = if self.accept(TokenType::When).is_some() {
                        Some(self.expression())
                    } else {
                        None
                    };
                    self.end_of_statement();
                    let span = self.span_from(clause);
                    let comments = self.trailing_comments();
                    let (block, next) = self.statement_block(BlockKind::Catch, span);
                    catches.push(Catch {
                        name,
                        type_name,
                        when,
                        block,
                        span,
                        comments,
                    });
                    end = next;
                }
                BlockEnd::Terminator(Terminator::Finally, _) => {
                    self.begin_statement();
                    let clause = self.consume_terminator(Terminator::Finally);
                    if finally.is_some() {
                        self.report_always(error!(SyntaxError, clause));
                    }
                    self.end_of_statement();
                    let comments = self.trailing_comments();
                    let (block, next) = self.statement_block(BlockKind::Finally, clause);
                    match &mut finally {
                        Some(existing) => existing.block.extend(block),
                        None => {
                            finally = Some(ElseBlock {
                                block,
                                span: clause,
                                comments,
                            })
                        }
                    }
                    end = next;
                }
                other => {
                    self.close_block(other);
                    break;
                }
            }
        }
        Statement {
            kind: StatementKind::Try(Try {
                block,
                catches,
                finally,
            }),
            span: self.span_from(start),
            comments,
        }
    }

    // Simple statements

    fn exit_statement(&mut self) -> Statement {
        use TokenType as T;
        let start = self.read().span;
        let token = self.peek().clone();
        let keyword = foreign_keyword(&token).unwrap_or_else(|| token.token_type());
        let kind = match keyword {
            T::Do => ExitKind::Do,
            T::For => ExitKind::For,
            T::While => ExitKind::While,
            T::Select => ExitKind::Select,
            T::Try => ExitKind::Try,
            T::Sub => ExitKind::Sub,
            T::Function => ExitKind::Function,
            T::Property => ExitKind::Property,
            _ => {
                self.report(error!(ExpectedExitKind, token.span));
                self.resync(&[]);
                return Statement::new(StatementKind::Malformed, self.span_from(start));
            }
        };
        self.read();
        if self.dialect.vb6 && matches!(kind, ExitKind::While | ExitKind::Select | ExitKind::Try)
        {
            self.not_supported(keyword, token.span);
        }
        Statement::new(StatementKind::Exit(kind), self.span_from(start))
    }

    fn continue_statement(&mut self) -> Statement {
        let start = self.read().span;
        let kind = match self.peek_type() {
            TokenType::Do => ContinueKind::Do,
            TokenType::For => ContinueKind::For,
            TokenType::While => ContinueKind::While,
            _ => {
                let span = self.peek().span;
                self.report(error!(ExpectedContinueKind, span));
                self.resync(&[]);
                return Statement::new(StatementKind::Malformed, self.span_from(start));
            }
        };
        self.read();
        Statement::new(StatementKind::Continue(kind), self.span_from(start))
    }

    fn return_statement(&mut self) -> Statement {
        let start = self.read().span;
        let value = if self.dialect.vb6 || self.at_end_of_statement() {
            None
        } else {
            Some(self.expression())
        };
        Statement::new(StatementKind::Return(value), self.span_from(start))
    }

    fn go_to_statement(&mut self, gosub: bool) -> Statement {
        let start = self.read().span;
        if gosub && !self.dialect.gosub {
            self.report_always(error!(ObsoleteGoSub, start));
        }
        let kind = match self.label_reference() {
            Some(label) if gosub => StatementKind::GoSub(label),
            Some(label) => StatementKind::GoTo(label),
            None => StatementKind::Malformed,
        };
        Statement::new(kind, self.span_from(start))
    }

    fn label_reference(&mut self) -> Option<Label> {
        let token = self.peek().clone();
        match &token.kind {
            TokenKind::IntegerLiteral(literal) => {
                self.read();
                Some(Label::Number(literal.value, token.span))
            }
            TokenKind::Identifier(_) if token.is_identifier() => {
                self.read();
                simple_name(&token).map(Label::Name)
            }
            _ => {
                self.report(error!(ExpectedLabel, token.span));
                None
            }
        }
    }

    /// `On Error ...` or the legacy computed `On x GoTo`.
    fn on_statement(&mut self) -> Statement {
        let start = self.read().span;
        if self.accept(TokenType::Error).is_some() {
            let kind = match self.on_error() {
                Some(on_error) => StatementKind::OnError(on_error),
                None => StatementKind::Malformed,
            };
            return Statement::new(kind, self.span_from(start));
        }
        let expression = self.expression();
        let gosub = if self.accept(TokenType::GoTo).is_some() {
            false
        } else if self.accept(TokenType::GoSub).is_some() {
            true
        } else {
            let span = self.peek().span;
            self.report(error!(ExpectedGoToOrGoSub, span));
            self.resync(&[]);
            return Statement::new(StatementKind::Malformed, self.span_from(start));
        };
        if !self.dialect.gosub {
            let span = self.span_from(start);
            self.report_always(error!(ObsoleteOnGoToGoSub, span));
        }
        let mut labels = vec![];
        loop {
            match self.label_reference() {
                Some(label) => labels.push(label),
                None => break,
            }
            if self.accept(TokenType::Comma).is_none() {
                break;
            }
        }
        Statement::new(
            StatementKind::OnGoTo(OnGoTo {
                expression,
                labels,
                gosub,
            }),
            self.span_from(start),
        )
    }

    fn on_error(&mut self) -> Option<OnError> {
        if self.accept(TokenType::GoTo).is_some() {
            let token = self.peek().clone();
            return match &token.kind {
                TokenKind::IntegerLiteral(literal) if literal.value == 0 => {
                    self.read();
                    Some(OnError::GoToZero)
                }
                TokenKind::Punctuator(TokenType::Minus) => {
                    let one = matches!(
                        &self.peek_ahead(1).kind,
                        TokenKind::IntegerLiteral(literal) if literal.value == 1
                    );
                    if !one {
                        self.report(error!(ExpectedLabel, token.span));
                        return None;
                    }
                    self.read();
                    self.read();
                    Some(OnError::GoToMinusOne)
                }
                _ => self.label_reference().map(OnError::GoTo),
            };
        }
        if self.accept(TokenType::Resume).is_some() && self.accept(TokenType::Next).is_some() {
            return Some(OnError::ResumeNext);
        }
        let span = self.peek().span;
        self.report(error!(ExpectedGoToOrResume, span));
        None
    }

    fn resume_statement(&mut self) -> Statement {
        let start = self.read().span;
        let resume = if self.accept(TokenType::Next).is_some() {
            Resume::Next
        } else if self.at_end_of_statement() {
            Resume::Here
        } else {
            match self.label_reference() {
                Some(label) => Resume::Label(label),
                None => return Statement::new(StatementKind::Malformed, self.span_from(start)),
            }
        };
        Statement::new(StatementKind::Resume(resume), self.span_from(start))
    }

    fn error_statement(&mut self) -> Statement {
        let start = self.read().span;
        if !self.dialect.gosub {
            self.report_always(error!(ObsoleteErrorStatement, start));
        }
        let number = self.expression();
        Statement::new(StatementKind::Error(number), self.span_from(start))
    }

    fn throw_statement(&mut self) -> Statement {
        let start = self.read().span;
        let value = if self.at_end_of_statement() {
            None
        } else {
            Some(self.expression())
        };
        Statement::new(StatementKind::Throw(value), self.span_from(start))
    }

    fn redim_statement(&mut self) -> Statement {
        let start = self.read().span;
        let preserve = self.accept_unreserved(TokenType::Preserve).is_some();
        let mut clauses = vec![];
        loop {
            let primary = self.primary();
            let clause = self.postfix_from(primary, false, true);
            if !matches!(clause.kind, ExpressionKind::CallOrIndex(..)) && !clause.is_malformed()
            {
                let span = self.peek().span;
                self.report(error!(ExpectedLeftParenthesis, span));
            }
            clauses.push(clause);
            // The element type of a legacy `ReDim` is checked, not kept.
            if self.accept(TokenType::As).is_some() {
                self.type_name();
            }
            if self.accept(TokenType::Comma).is_none() {
                break;
            }
        }
        Statement::new(
            StatementKind::ReDim(ReDim { preserve, clauses }),
            self.span_from(start),
        )
    }

    fn erase_statement(&mut self) -> Statement {
        let start = self.read().span;
        let mut arrays = vec![];
        loop {
            arrays.push(self.postfix());
            if self.accept(TokenType::Comma).is_none() {
                break;
            }
        }
        Statement::new(StatementKind::Erase(arrays), self.span_from(start))
    }

    fn raise_event_statement(&mut self) -> Statement {
        let start = self.read().span;
        let name = match self.identifier() {
            Some(name) => name,
            None => return Statement::new(StatementKind::Malformed, start),
        };
        let arguments = if self.at(TokenType::LeftParenthesis) {
            self.arguments(false)
        } else {
            vec![]
        };
        Statement::new(
            StatementKind::RaiseEvent(name, arguments),
            self.span_from(start),
        )
    }

    /// `AddHandler e, h` and `RemoveHandler e, h`.
    fn handler_statement(&mut self, keyword: TokenType) -> Statement {
        let start = self.read().span;
        let event = self.expression();
        if self
            .expect(TokenType::Comma, ErrorCode::ExpectedComma)
            .is_none()
        {
            self.resync(&[]);
            return Statement::new(StatementKind::Malformed, self.span_from(start));
        }
        let handler = self.expression();
        let kind = if keyword == TokenType::AddHandler {
            StatementKind::AddHandler(event, handler)
        } else {
            StatementKind::RemoveHandler(event, handler)
        };
        Statement::new(kind, self.span_from(start))
    }

    fn local_declaration(&mut self) -> Statement {
        let start = self.peek().span;
        let modifiers = self.modifiers();
        let declaration = self.variables(start, vec![], modifiers);
        let span = declaration.span;
        Statement::new(StatementKind::LocalDeclaration(Box::new(declaration)), span)
    }

    // Calls and assignments

    fn call_statement(&mut self) -> Statement {
        let start = self.read().span;
        let target = self.postfix();
        if target.is_malformed() {
            self.resync(&[]);
            return Statement::new(StatementKind::Malformed, self.span_from(start));
        }
        Statement::new(
            StatementKind::Call(CallStatement {
                call_keyword: true,
                implicit: false,
                target,
            }),
            self.span_from(start),
        )
    }

    fn assignment_keyword(&mut self, keyword: AssignmentKeyword) -> Statement {
        let token = self.read();
        if !self.dialect.assignment_keywords {
            self.report_always(error!(ObsoleteLetSetAssignment, token.span));
        }
        let mut statement = self.expression_statement(Some(keyword));
        statement.span = token.span.to(statement.span);
        statement
    }

    /// Assignment, or a call with or without parentheses.
    fn expression_statement(&mut self, keyword: Option<AssignmentKeyword>) -> Statement {
        let start = self.peek().span;
        let legacy = self.dialect.implicit_call && keyword.is_none();
        let target = if legacy {
            self.legacy_target()
        } else {
            self.postfix()
        };
        if target.is_malformed() {
            self.resync(&[]);
            return Statement::new(StatementKind::Malformed, self.span_from(start));
        }
        if let Some(operator) = self.assignment_operator() {
            let value = self.expression();
            let span = self.span_from(start);
            if operator == AssignmentOperator::Assign && keyword.is_none() {
                if let Some(arguments) = mid_arguments(&target) {
                    return Statement::new(StatementKind::MidAssignment(arguments, value), span);
                }
            }
            return Statement::new(
                StatementKind::Assignment(Assignment {
                    keyword,
                    target,
                    operator,
                    value,
                }),
                span,
            );
        }
        if keyword.is_some() {
            let span = self.peek().span;
            self.report(error!(ExpectedEquals, span));
            self.resync(&[]);
            return Statement::new(StatementKind::Malformed, self.span_from(start));
        }
        if legacy && !self.at_end_of_statement() && self.at_argument_start() {
            let arguments = self.implicit_arguments();
            let span = self.span_from(start);
            let call = Expression::new(
                ExpressionKind::CallOrIndex(Box::new(target), arguments),
                span,
            );
            return Statement::new(
                StatementKind::Call(CallStatement {
                    call_keyword: false,
                    implicit: true,
                    target: call,
                }),
                span,
            );
        }
        if !is_callable(&target) {
            self.report(error!(SyntaxError, target.span));
        } else if legacy {
            if let ExpressionKind::CallOrIndex(_, arguments) = &target.kind {
                if arguments.len() != 1 {
                    self.report(error!(ParenthesizedCallArguments, target.span));
                }
            }
        }
        Statement::new(
            StatementKind::Call(CallStatement {
                call_keyword: false,
                implicit: false,
                target,
            }),
            self.span_from(start),
        )
    }

    fn assignment_operator(&mut self) -> Option<AssignmentOperator> {
        use AssignmentOperator as A;
        use TokenType as T;
        let token_type = self.peek_type();
        let operator = match token_type {
            T::Equals => A::Assign,
            T::AmpersandEquals => A::Concatenate,
            T::PlusEquals => A::Plus,
            T::MinusEquals => A::Minus,
            T::StarEquals => A::Multiply,
            T::ForwardSlashEquals => A::Divide,
            T::BackwardSlashEquals => A::IntegralDivide,
            T::CaretEquals => A::Power,
            T::LessThanLessThanEquals => A::ShiftLeft,
            T::GreaterThanGreaterThanEquals => A::ShiftRight,
            _ => return None,
        };
        let token = self.read();
        if operator != A::Assign && !self.dialect.compound_assignment {
            self.not_supported(token_type, token.span);
        }
        Some(operator)
    }

    /// Target of a legacy statement. A `(` separated from the target by
    /// whitespace begins the arguments of an implicit call unless the
    /// group is followed by an assignment (`a (1) = 2`) or holds other
    /// than one argument at the end of the statement (`f (1, 2)`).
    fn legacy_target(&mut self) -> Expression {
        let primary = self.primary();
        let mut target = self.postfix_from(primary, true, false);
        while self.at(TokenType::LeftParenthesis) && !target.is_malformed() {
            let group = self.scan_parenthesized();
            let indexes = group.balanced
                && (assigns(group.next)
                    || (self.ends_statement(group.next) && group.items != 1));
            if !indexes {
                break;
            }
            let start = target.span;
            let arguments = self.arguments(false);
            let span = self.span_from(start);
            target = Expression::new(
                ExpressionKind::CallOrIndex(Box::new(target), arguments),
                span,
            );
            target = self.postfix_from(target, true, false);
        }
        target
    }

    /// Looks past the parenthesized group at the cursor without consuming
    /// anything.
    fn scan_parenthesized(&mut self) -> ParenGroup {
        self.scanner.lock();
        let mut depth = 0usize;
        let mut commas = 0;
        let mut empty = true;
        let mut balanced = false;
        loop {
            let token_type = self.scanner.read().token_type();
            if depth > 0 && !(depth == 1 && token_type == TokenType::RightParenthesis) {
                empty = false;
            }
            match token_type {
                TokenType::LeftParenthesis => depth += 1,
                TokenType::RightParenthesis => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        balanced = true;
                        break;
                    }
                }
                TokenType::Comma if depth == 1 => commas += 1,
                TokenType::LineTerminator
                | TokenType::EndOfStream
                | TokenType::Colon
                | TokenType::Comment => break,
                _ => {}
            }
        }
        let next = self.scanner.peek().token_type();
        self.scanner.unlock();
        let items = if empty { 0 } else { commas + 1 };
        trace!(balanced, items, ?next, "parenthesized lookahead");
        ParenGroup {
            balanced,
            items,
            next,
        }
    }

    fn ends_statement(&self, token_type: TokenType) -> bool {
        match token_type {
            TokenType::LineTerminator
            | TokenType::EndOfStream
            | TokenType::Colon
            | TokenType::Comment => true,
            TokenType::Else => self.in_line_if(),
            _ => false,
        }
    }

    /// Arguments of a call written without parentheses.
    fn implicit_arguments(&mut self) -> Vec<Argument> {
        let mut arguments = vec![];
        loop {
            if self.at_end_of_statement() {
                let start = self.peek().span.start;
                arguments.push(Argument {
                    name: None,
                    by_val: false,
                    value: None,
                    span: Span::empty(start),
                });
            } else {
                arguments.push(self.argument(false));
            }
            if self.accept(TokenType::Comma).is_none() {
                break;
            }
        }
        arguments
    }
}

fn relational_operator(token_type: TokenType) -> Option<BinaryOperator> {
    let operator = match token_type {
        TokenType::Equals => BinaryOperator::Equals,
        TokenType::NotEquals => BinaryOperator::NotEquals,
        TokenType::LessThan => BinaryOperator::LessThan,
        TokenType::LessThanEquals => BinaryOperator::LessThanEquals,
        TokenType::GreaterThan => BinaryOperator::GreaterThan,
        TokenType::GreaterThanEquals => BinaryOperator::GreaterThanEquals,
        _ => return None,
    };
    Some(operator)
}

fn assigns(token_type: TokenType) -> bool {
    use TokenType as T;
    matches!(
        token_type,
        T::Equals
            | T::AmpersandEquals
            | T::PlusEquals
            | T::MinusEquals
            | T::StarEquals
            | T::ForwardSlashEquals
            | T::BackwardSlashEquals
            | T::CaretEquals
            | T::LessThanLessThanEquals
            | T::GreaterThanGreaterThanEquals
    )
}

/// Arguments of `Mid(...)` or `Mid$(...)` on the left of `=`.
fn mid_arguments(target: &Expression) -> Option<Vec<Argument>> {
    match &target.kind {
        ExpressionKind::CallOrIndex(callee, arguments) => match &callee.kind {
            ExpressionKind::Name(name)
                if !name.escaped && name.text.eq_ignore_ascii_case("mid") =>
            {
                Some(arguments.clone())
            }
            _ => None,
        },
        _ => None,
    }
}

fn is_callable(target: &Expression) -> bool {
    matches!(
        target.kind,
        ExpressionKind::Name(_)
            | ExpressionKind::MemberAccess(..)
            | ExpressionKind::DictionaryAccess(..)
            | ExpressionKind::CallOrIndex(..)
            | ExpressionKind::GenericQualified(..)
    )
}
