use super::{foreign_keyword, Parser};
use crate::lang::ast::Block;
use crate::lang::token::TokenType;
use crate::lang::Span;
use tracing::trace;

/// Construct whose body is being parsed. Kept on a stack so that a
/// terminator can be matched against every open block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    If,
    ElseIf,
    Else,
    LineIf,
    Select,
    Case,
    Do,
    While,
    For,
    ForEach,
    With,
    SyncLock,
    Using,
    Try,
    Catch,
    Finally,
    Sub,
    Function,
    Operator,
    /// Accessor list of a `Property`.
    Property,
    /// Body of a legacy `Property Get`, `Let` or `Set` procedure.
    PropertyProcedure,
    Get,
    Set,
    /// Accessor list of a `Custom Event`.
    Event,
    AddHandler,
    RemoveHandler,
    RaiseEvent,
    Namespace,
    Class,
    Module,
    Structure,
    Interface,
    Enum,
    UserDefinedType,
}

impl BlockKind {
    /// Terminator that closes this block.
    pub fn end(self) -> Terminator {
        use BlockKind::*;
        match self {
            If | ElseIf | Else | LineIf => Terminator::EndIf,
            Select | Case => Terminator::EndSelect,
            Do => Terminator::Loop,
            While => Terminator::EndWhile,
            For | ForEach => Terminator::Next,
            With => Terminator::EndWith,
            SyncLock => Terminator::EndSyncLock,
            Using => Terminator::EndUsing,
            Try | Catch | Finally => Terminator::EndTry,
            Sub => Terminator::EndSub,
            Function => Terminator::EndFunction,
            Operator => Terminator::EndOperator,
            Property | PropertyProcedure => Terminator::EndProperty,
            Get => Terminator::EndGet,
            Set => Terminator::EndSet,
            Event => Terminator::EndEvent,
            AddHandler => Terminator::EndAddHandler,
            RemoveHandler => Terminator::EndRemoveHandler,
            RaiseEvent => Terminator::EndRaiseEvent,
            Namespace => Terminator::EndNamespace,
            Class => Terminator::EndClass,
            Module => Terminator::EndModule,
            Structure => Terminator::EndStructure,
            Interface => Terminator::EndInterface,
            Enum => Terminator::EndEnum,
            UserDefinedType => Terminator::EndType,
        }
    }

    /// Whether `terminator` ends a list of this kind. Some blocks stop at
    /// terminators they then reject, so that the construct owning them can
    /// report the misordering (`ElseIf` after `Else`).
    pub fn accepts(self, terminator: Terminator) -> bool {
        use BlockKind::*;
        use Terminator as T;
        match self {
            If | ElseIf | Else => matches!(terminator, T::EndIf | T::ElseIf | T::Else),
            LineIf => false,
            Select | Case => matches!(terminator, T::Case | T::EndSelect),
            While => matches!(terminator, T::EndWhile | T::Wend),
            Try | Catch | Finally => matches!(terminator, T::Catch | T::Finally | T::EndTry),
            _ => terminator == self.end(),
        }
    }

    /// Bodies holding statements, as opposed to member or accessor lists.
    pub fn holds_statements(self) -> bool {
        use BlockKind::*;
        !matches!(
            self,
            Property
                | Event
                | Namespace
                | Class
                | Module
                | Structure
                | Interface
                | Enum
                | UserDefinedType
        )
    }

    pub fn is_method_body(self) -> bool {
        use BlockKind::*;
        matches!(
            self,
            Sub | Function
                | Operator
                | PropertyProcedure
                | Get
                | Set
                | AddHandler
                | RemoveHandler
                | RaiseEvent
        )
    }
}

/// Statement that closes, or continues, a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Terminator {
    EndIf,
    ElseIf,
    Else,
    EndSelect,
    Case,
    Loop,
    Next,
    Wend,
    EndWhile,
    EndWith,
    EndSyncLock,
    EndUsing,
    EndTry,
    Catch,
    Finally,
    EndSub,
    EndFunction,
    EndOperator,
    EndProperty,
    EndGet,
    EndSet,
    EndEvent,
    EndAddHandler,
    EndRemoveHandler,
    EndRaiseEvent,
    EndNamespace,
    EndClass,
    EndModule,
    EndStructure,
    EndInterface,
    EndEnum,
    EndType,
}

impl Terminator {
    /// `End` followed by `keyword`.
    fn after_end(keyword: TokenType) -> Option<Terminator> {
        use TokenType as T;
        let terminator = match keyword {
            T::If => Terminator::EndIf,
            T::Select => Terminator::EndSelect,
            T::While => Terminator::EndWhile,
            T::With => Terminator::EndWith,
            T::SyncLock => Terminator::EndSyncLock,
            T::Using => Terminator::EndUsing,
            T::Try => Terminator::EndTry,
            T::Sub => Terminator::EndSub,
            T::Function => Terminator::EndFunction,
            T::Operator => Terminator::EndOperator,
            T::Property => Terminator::EndProperty,
            T::Get => Terminator::EndGet,
            T::Set => Terminator::EndSet,
            T::Event => Terminator::EndEvent,
            T::AddHandler => Terminator::EndAddHandler,
            T::RemoveHandler => Terminator::EndRemoveHandler,
            T::RaiseEvent => Terminator::EndRaiseEvent,
            T::Namespace => Terminator::EndNamespace,
            T::Class => Terminator::EndClass,
            T::Module => Terminator::EndModule,
            T::Structure => Terminator::EndStructure,
            T::Interface => Terminator::EndInterface,
            T::Enum => Terminator::EndEnum,
            T::Type => Terminator::EndType,
            _ => return None,
        };
        Some(terminator)
    }

    pub fn spelling(self) -> &'static str {
        use Terminator::*;
        match self {
            EndIf => "End If",
            ElseIf => "ElseIf",
            Else => "Else",
            EndSelect => "End Select",
            Case => "Case",
            Loop => "Loop",
            Next => "Next",
            Wend => "Wend",
            EndWhile => "End While",
            EndWith => "End With",
            EndSyncLock => "End SyncLock",
            EndUsing => "End Using",
            EndTry => "End Try",
            Catch => "Catch",
            Finally => "Finally",
            EndSub => "End Sub",
            EndFunction => "End Function",
            EndOperator => "End Operator",
            EndProperty => "End Property",
            EndGet => "End Get",
            EndSet => "End Set",
            EndEvent => "End Event",
            EndAddHandler => "End AddHandler",
            EndRemoveHandler => "End RemoveHandler",
            EndRaiseEvent => "End RaiseEvent",
            EndNamespace => "End Namespace",
            EndClass => "End Class",
            EndModule => "End Module",
            EndStructure => "End Structure",
            EndInterface => "End Interface",
            EndEnum => "End Enum",
            EndType => "End Type",
        }
    }
}

impl std::fmt::Display for Terminator {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.spelling())
    }
}

/// Why a block list stopped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum BlockEnd {
    /// Terminator accepted by the block, not yet consumed.
    Terminator(Terminator, Span),
    /// Closed by the multi-variable `Next` of an inner loop.
    PendingNext,
    /// Stopped at something belonging to an enclosing block.
    Unwound,
    EndOfStream,
}

pub(super) enum Boundary {
    Item,
    Skipped,
    Stop(BlockEnd),
}

impl Parser {
    pub(super) fn push_block(&mut self, kind: BlockKind) {
        trace!(?kind, depth = self.state.blocks.len(), "push block");
        self.state.blocks.push(kind);
    }

    pub(super) fn pop_block(&mut self, kind: BlockKind) {
        let top = self.state.blocks.pop();
        assert_eq!(top, Some(kind), "block stack out of balance");
        trace!(?kind, depth = self.state.blocks.len(), "pop block");
    }

    pub(super) fn in_method_body(&self) -> bool {
        self.state.blocks.iter().any(|kind| kind.is_method_body())
    }

    pub(super) fn expected_end(&self, kind: BlockKind) -> Terminator {
        match kind {
            BlockKind::While if self.dialect.vb6 => Terminator::Wend,
            _ => kind.end(),
        }
    }

    fn enclosing_accepts(&self, terminator: Terminator) -> bool {
        let open = self.state.blocks.len().saturating_sub(1);
        self.state.blocks[..open]
            .iter()
            .any(|kind| kind.accepts(terminator))
    }

    fn in_try(&self) -> bool {
        self.state.blocks.iter().any(|kind| {
            matches!(
                kind,
                BlockKind::Try | BlockKind::Catch | BlockKind::Finally
            )
        })
    }

    /// Recognizes a terminator at the cursor without consuming it.
    pub(super) fn peek_terminator(&mut self) -> Option<(Terminator, Span)> {
        let token = self.peek().clone();
        let terminator = match token.token_type() {
            TokenType::End => {
                let next = self.peek_ahead(1).clone();
                let keyword = foreign_keyword(&next).unwrap_or_else(|| next.token_type());
                let terminator = Terminator::after_end(keyword)?;
                return Some((terminator, token.span.to(next.span)));
            }
            TokenType::Else => {
                let next = self.peek_ahead(1);
                if next.is(TokenType::If) {
                    let span = token.span.to(next.span);
                    return Some((Terminator::ElseIf, span));
                }
                Terminator::Else
            }
            TokenType::EndIf => Terminator::EndIf,
            TokenType::ElseIf => Terminator::ElseIf,
            TokenType::Case => Terminator::Case,
            TokenType::Loop => Terminator::Loop,
            TokenType::Next => Terminator::Next,
            TokenType::Wend => Terminator::Wend,
            TokenType::Catch => Terminator::Catch,
            TokenType::Finally => Terminator::Finally,
            TokenType::Identifier if self.in_try() => match foreign_keyword(&token) {
                Some(TokenType::Catch) => Terminator::Catch,
                Some(TokenType::Finally) => Terminator::Finally,
                _ => return None,
            },
            _ => return None,
        };
        Some((terminator, token.span))
    }

    /// Reads the tokens of a terminator recognized by `peek_terminator`.
    pub(super) fn consume_terminator(&mut self, terminator: Terminator) -> Span {
        let first = self.read();
        let mut span = first.span;
        match first.token_type() {
            TokenType::End => {
                span = span.to(self.read().span);
                if terminator == Terminator::EndWhile && self.dialect.vb6 {
                    self.report_always(error!(NotSupportedInDialect("End While"), span));
                }
            }
            TokenType::Else if terminator == Terminator::ElseIf => {
                span = span.to(self.read().span);
            }
            TokenType::EndIf if !self.dialect.vb6 => {
                self.report_always(error!(ObsoleteEndIf, span));
            }
            TokenType::Wend if !self.dialect.vb6 => {
                self.report_always(error!(ObsoleteWend, span));
            }
            _ => {}
        }
        span
    }

    /// Leaves a `kind` block opened at `start` whose terminator is missing.
    /// The statement owning the block ends short of the enclosing
    /// terminator, so nothing more is reported for it.
    pub(super) fn unwind(&mut self, kind: BlockKind, start: Span) -> BlockEnd {
        let end = self.expected_end(kind);
        self.report_always(error!(ExpectedEnd(end), start));
        self.state.unwound = true;
        BlockEnd::Unwound
    }

    /// Decides whether the list of a `kind` block opened at `start` goes
    /// on at the cursor. Separators must already be consumed.
    pub(super) fn boundary(&mut self, kind: BlockKind, start: Span) -> Boundary {
        if self.at(TokenType::EndOfStream) {
            let end = self.expected_end(kind);
            self.report_always(error!(ExpectedEnd(end), start));
            return Boundary::Stop(BlockEnd::EndOfStream);
        }
        if let Some((terminator, span)) = self.peek_terminator() {
            if kind.accepts(terminator) {
                return Boundary::Stop(BlockEnd::Terminator(terminator, span));
            }
            if self.enclosing_accepts(terminator) {
                return Boundary::Stop(self.unwind(kind, start));
            }
            self.begin_statement();
            self.report_always(error!(EndWithoutBegin(terminator), span));
            self.consume_terminator(terminator);
            self.resync(&[]);
            return Boundary::Skipped;
        }
        if kind.holds_statements() && self.at_member_declaration() {
            return Boundary::Stop(self.unwind(kind, start));
        }
        Boundary::Item
    }

    /// Parses statements until a terminator, a member declaration or the
    /// end of the source.
    pub(super) fn statement_block(&mut self, kind: BlockKind, start: Span) -> (Block, BlockEnd) {
        let closed_by_next = matches!(kind, BlockKind::For | BlockKind::ForEach);
        self.push_block(kind);
        let mut block = vec![];
        let end = loop {
            // The separator after a shared `Next` ends the enclosing loop
            // statements too, so it stays put.
            if closed_by_next && !self.state.pending_next.is_empty() {
                break BlockEnd::PendingNext;
            }
            self.skip_separators();
            match self.boundary(kind, start) {
                Boundary::Item => block.push(self.statement_line()),
                Boundary::Skipped => {}
                Boundary::Stop(end) => break end,
            }
        };
        self.pop_block(kind);
        (block, end)
    }

    /// Consumes `end` if it is a terminator, which starts a new statement
    /// for error reporting. Returns whether it was.
    pub(super) fn close_block(&mut self, end: BlockEnd) -> bool {
        match end {
            BlockEnd::Terminator(terminator, _) => {
                self.begin_statement();
                self.consume_terminator(terminator);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminator_display() {
        assert_eq!(Terminator::EndIf.to_string(), "End If");
        assert_eq!(Terminator::Loop.to_string(), "Loop");
        assert_eq!(Terminator::EndSyncLock.to_string(), "End SyncLock");
    }

    #[test]
    fn test_accepts() {
        assert!(BlockKind::Do.accepts(Terminator::Loop));
        assert!(!BlockKind::Do.accepts(Terminator::Next));
        assert!(BlockKind::For.accepts(Terminator::Next));
        assert!(BlockKind::ForEach.accepts(Terminator::Next));
        assert!(BlockKind::While.accepts(Terminator::Wend));
        assert!(BlockKind::Else.accepts(Terminator::ElseIf));
        assert!(BlockKind::Class.accepts(Terminator::EndClass));
        assert!(!BlockKind::LineIf.accepts(Terminator::EndIf));
        assert_eq!(BlockKind::Get.end(), Terminator::EndGet);
    }

    #[test]
    fn test_statement_lists() {
        assert!(BlockKind::Sub.holds_statements());
        assert!(BlockKind::If.holds_statements());
        assert!(!BlockKind::Class.holds_statements());
        assert!(!BlockKind::Property.holds_statements());
        assert!(BlockKind::Get.is_method_body());
        assert!(!BlockKind::If.is_method_body());
    }
}
