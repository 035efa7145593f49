use super::{AcceptVisitor, Argument, Comment, Expression, SimpleName, TypeName, Visitor};
use super::{Declaration, VariableDeclarator};
use crate::lang::Span;

pub type Block = Vec<Statement>;

#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub kind: StatementKind,
    pub span: Span,
    pub comments: Vec<Comment>,
}

impl Statement {
    pub fn new(kind: StatementKind, span: Span) -> Statement {
        Statement {
            kind,
            span,
            comments: vec![],
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self.kind, StatementKind::Malformed)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    /// Comment-only line or a bare separator.
    Empty,
    Label(Label),
    Assignment(Assignment),
    /// `Call f(x)`, `f(x)` or the legacy `f x`.
    Call(CallStatement),
    /// `Mid(s, 1, 2) = t`
    MidAssignment(Vec<Argument>, Expression),
    /// `Dim`, `Static` or `Const` inside a method body.
    LocalDeclaration(Box<Declaration>),
    If(If),
    LineIf(LineIf),
    Select(Select),
    Do(Do),
    While(While),
    For(For),
    ForEach(ForEach),
    With(Expression, Block),
    SyncLock(Expression, Block),
    Using(Using),
    Try(Try),
    Exit(ExitKind),
    Continue(ContinueKind),
    Return(Option<Expression>),
    GoTo(Label),
    GoSub(Label),
    OnError(OnError),
    /// `On x GoTo a, b` or `On x GoSub a, b`.
    OnGoTo(OnGoTo),
    Resume(Resume),
    Error(Expression),
    Throw(Option<Expression>),
    Stop,
    End,
    ReDim(ReDim),
    Erase(Vec<Expression>),
    RaiseEvent(SimpleName, Vec<Argument>),
    AddHandler(Expression, Expression),
    RemoveHandler(Expression, Expression),
    Malformed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Label {
    Name(SimpleName),
    Number(i64, Span),
}

impl Label {
    pub fn span(&self) -> Span {
        match self {
            Label::Name(name) => name.span,
            Label::Number(_, span) => *span,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentOperator {
    Assign,
    Concatenate,
    Plus,
    Minus,
    Multiply,
    Divide,
    IntegralDivide,
    Power,
    ShiftLeft,
    ShiftRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentKeyword {
    Let,
    Set,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub keyword: Option<AssignmentKeyword>,
    pub target: Expression,
    pub operator: AssignmentOperator,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallStatement {
    pub call_keyword: bool,
    /// Arguments written without parentheses.
    pub implicit: bool,
    pub target: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct If {
    pub condition: Expression,
    pub then_block: Block,
    pub else_ifs: Vec<ElseIf>,
    pub else_block: Option<ElseBlock>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElseIf {
    pub condition: Expression,
    pub block: Block,
    pub span: Span,
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElseBlock {
    pub block: Block,
    pub span: Span,
    pub comments: Vec<Comment>,
}

/// `If c Then a : b Else d`
#[derive(Debug, Clone, PartialEq)]
pub struct LineIf {
    pub condition: Expression,
    pub then_statements: Block,
    pub else_statements: Option<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub expression: Expression,
    pub cases: Vec<Case>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Case {
    /// Empty for `Case Else`.
    pub clauses: Vec<CaseClause>,
    pub is_else: bool,
    pub block: Block,
    pub span: Span,
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CaseClause {
    /// `Case 1`, or a range `Case 1 To 5` as a `To` expression.
    Expression(Expression),
    /// `Case Is > 5`, or `Case > 5`.
    Relational(super::BinaryOperator, Expression),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopConditionKind {
    While,
    Until,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoopCondition {
    pub kind: LoopConditionKind,
    pub condition: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Do {
    pub top: Option<LoopCondition>,
    pub block: Block,
    pub bottom: Option<LoopCondition>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct While {
    pub condition: Expression,
    pub block: Block,
    /// Closed by the legacy `Wend`.
    pub wend: bool,
}

/// Loop variable, optionally declared in place (`For i As Integer`).
#[derive(Debug, Clone, PartialEq)]
pub struct ControlVariable {
    pub variable: Expression,
    pub type_name: Option<TypeName>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct For {
    pub control: ControlVariable,
    pub from: Expression,
    pub to: Expression,
    pub step: Option<Expression>,
    pub block: Block,
    /// Variable named after `Next`, if any.
    pub next_variable: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForEach {
    pub control: ControlVariable,
    pub collection: Expression,
    pub block: Block,
    pub next_variable: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UsingResource {
    Expression(Expression),
    Variables(Vec<VariableDeclarator>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Using {
    pub resource: UsingResource,
    pub block: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Try {
    pub block: Block,
    pub catches: Vec<Catch>,
    pub finally: Option<ElseBlock>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Catch {
    pub name: Option<SimpleName>,
    pub type_name: Option<TypeName>,
    pub when: Option<Expression>,
    pub block: Block,
    pub span: Span,
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitKind {
    Do,
    For,
    While,
    Select,
    Try,
    Sub,
    Function,
    Property,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContinueKind {
    Do,
    For,
    While,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OnError {
    GoTo(Label),
    /// `On Error GoTo 0`
    GoToZero,
    /// `On Error GoTo -1`
    GoToMinusOne,
    ResumeNext,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OnGoTo {
    pub expression: Expression,
    pub labels: Vec<Label>,
    pub gosub: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resume {
    Here,
    Next,
    Label(Label),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReDim {
    pub preserve: bool,
    /// Each clause is a call-or-index expression naming the array and its
    /// new bounds.
    pub clauses: Vec<Expression>,
}

impl AcceptVisitor for Statement {
    fn accept<V: Visitor>(&self, visitor: &mut V) {
        use StatementKind::*;
        match &self.kind {
            Empty | Label(_) | Exit(_) | Continue(_) | GoTo(_) | GoSub(_) | Resume(_)
            | OnError(_) | Stop | End | Malformed => {}
            Assignment(a) => {
                a.target.accept(visitor);
                a.value.accept(visitor);
            }
            Call(call) => call.target.accept(visitor),
            MidAssignment(arguments, value) => {
                arguments.accept(visitor);
                value.accept(visitor);
            }
            LocalDeclaration(decl) => decl.accept(visitor),
            If(s) => {
                s.condition.accept(visitor);
                s.then_block.accept(visitor);
                for else_if in &s.else_ifs {
                    else_if.condition.accept(visitor);
                    else_if.block.accept(visitor);
                }
                if let Some(else_block) = &s.else_block {
                    else_block.block.accept(visitor);
                }
            }
            LineIf(s) => {
                s.condition.accept(visitor);
                s.then_statements.accept(visitor);
                s.else_statements.accept(visitor);
            }
            Select(s) => {
                s.expression.accept(visitor);
                for case in &s.cases {
                    for clause in &case.clauses {
                        match clause {
                            CaseClause::Expression(e) | CaseClause::Relational(_, e) => {
                                e.accept(visitor)
                            }
                        }
                    }
                    case.block.accept(visitor);
                }
            }
            Do(s) => {
                if let Some(top) = &s.top {
                    top.condition.accept(visitor);
                }
                s.block.accept(visitor);
                if let Some(bottom) = &s.bottom {
                    bottom.condition.accept(visitor);
                }
            }
            While(s) => {
                s.condition.accept(visitor);
                s.block.accept(visitor);
            }
            For(s) => {
                s.control.variable.accept(visitor);
                s.control.type_name.accept(visitor);
                s.from.accept(visitor);
                s.to.accept(visitor);
                s.step.accept(visitor);
                s.block.accept(visitor);
                s.next_variable.accept(visitor);
            }
            ForEach(s) => {
                s.control.variable.accept(visitor);
                s.control.type_name.accept(visitor);
                s.collection.accept(visitor);
                s.block.accept(visitor);
                s.next_variable.accept(visitor);
            }
            With(e, block) | SyncLock(e, block) => {
                e.accept(visitor);
                block.accept(visitor);
            }
            Using(s) => {
                match &s.resource {
                    UsingResource::Expression(e) => e.accept(visitor),
                    UsingResource::Variables(vars) => vars.accept(visitor),
                }
                s.block.accept(visitor);
            }
            Try(s) => {
                s.block.accept(visitor);
                for catch in &s.catches {
                    catch.type_name.accept(visitor);
                    catch.when.accept(visitor);
                    catch.block.accept(visitor);
                }
                if let Some(finally) = &s.finally {
                    finally.block.accept(visitor);
                }
            }
            Return(e) | Throw(e) => e.accept(visitor),
            OnGoTo(s) => s.expression.accept(visitor),
            Error(e) => e.accept(visitor),
            ReDim(s) => s.clauses.accept(visitor),
            Erase(list) => list.accept(visitor),
            RaiseEvent(_, arguments) => arguments.accept(visitor),
            AddHandler(event, handler) | RemoveHandler(event, handler) => {
                event.accept(visitor);
                handler.accept(visitor);
            }
        }
        visitor.visit_statement(self)
    }
}
