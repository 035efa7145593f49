use super::{AcceptVisitor, IntrinsicType, SimpleName, TypeName, Visitor};
use crate::lang::token::{
    DecimalLiteral, FloatingPointLiteral, IntegerLiteral, UnsignedIntegerLiteral,
};
use crate::lang::Span;
use chrono::NaiveDateTime;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub span: Span,
}

impl Expression {
    pub fn new(kind: ExpressionKind, span: Span) -> Expression {
        Expression { kind, span }
    }

    pub fn malformed(span: Span) -> Expression {
        Expression::new(ExpressionKind::Malformed, span)
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self.kind, ExpressionKind::Malformed)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionKind {
    Literal(Literal),
    Name(SimpleName),
    Me,
    MyBase,
    MyClass,
    Global,
    Parenthesized(Box<Expression>),
    /// `a.b`; the target is absent inside `With` (`.b`).
    MemberAccess(Option<Box<Expression>>, SimpleName),
    /// `a!b`
    DictionaryAccess(Option<Box<Expression>>, SimpleName),
    /// `a(Of T)`
    GenericQualified(Box<Expression>, Vec<TypeName>),
    CallOrIndex(Box<Expression>, Vec<Argument>),
    New(New),
    /// `{a, b}`
    ArrayInitializer(Vec<Expression>),
    Cast(CastOperator, Box<Expression>, TypeName),
    /// `CInt(x)`
    IntrinsicCast(IntrinsicType, Box<Expression>),
    /// `TypeOf x Is T`
    TypeOf(Box<Expression>, TypeName),
    GetType(TypeName),
    AddressOf(Box<Expression>),
    Unary(UnaryOperator, Box<Expression>),
    Binary(BinaryOperator, Box<Expression>, Box<Expression>),
    Malformed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Boolean(bool),
    Integer(IntegerLiteral),
    UnsignedInteger(UnsignedIntegerLiteral),
    FloatingPoint(FloatingPointLiteral),
    Decimal(DecimalLiteral),
    Character(char),
    String(Rc<str>),
    Date(NaiveDateTime),
    Nothing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct New {
    pub type_name: TypeName,
    pub arguments: Option<Vec<Argument>>,
    /// Array initializer following an array type.
    pub initializer: Option<Box<Expression>>,
}

/// One call argument. An omitted argument (`f(1, , 3)`) has no value.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub name: Option<SimpleName>,
    pub by_val: bool,
    pub value: Option<Expression>,
    pub span: Span,
}

impl Argument {
    pub fn positional(value: Expression) -> Argument {
        let span = value.span;
        Argument {
            name: None,
            by_val: false,
            value: Some(value),
            span,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastOperator {
    CType,
    DirectCast,
    TryCast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Plus,
    Negate,
    Not,
}

impl UnaryOperator {
    pub fn precedence(self) -> u8 {
        match self {
            UnaryOperator::Not => Precedence::NOT,
            UnaryOperator::Plus | UnaryOperator::Negate => Precedence::NEGATE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Plus,
    Minus,
    Multiply,
    Divide,
    IntegralDivide,
    Modulus,
    Power,
    Concatenate,
    ShiftLeft,
    ShiftRight,
    Equals,
    NotEquals,
    LessThan,
    LessThanEquals,
    GreaterThan,
    GreaterThanEquals,
    Is,
    IsNot,
    Like,
    And,
    AndAlso,
    Or,
    OrElse,
    Xor,
    Eqv,
    Imp,
    /// Range bound, `0 To 10`; only in array bounds and `Case`.
    To,
}

/// Binding strength, loosest first.
pub struct Precedence;

impl Precedence {
    pub const NONE: u8 = 0;
    pub const TO: u8 = 1;
    pub const IMP: u8 = 2;
    pub const EQV: u8 = 3;
    pub const XOR: u8 = 4;
    pub const OR: u8 = 5;
    pub const AND: u8 = 6;
    pub const NOT: u8 = 7;
    pub const RELATIONAL: u8 = 8;
    pub const SHIFT: u8 = 9;
    pub const CONCATENATE: u8 = 10;
    pub const ADDITIVE: u8 = 11;
    pub const MODULUS: u8 = 12;
    pub const INTEGRAL_DIVIDE: u8 = 13;
    pub const MULTIPLICATIVE: u8 = 14;
    pub const NEGATE: u8 = 15;
    pub const POWER: u8 = 16;
}

impl BinaryOperator {
    pub fn precedence(self) -> u8 {
        use BinaryOperator::*;
        match self {
            To => Precedence::TO,
            Imp => Precedence::IMP,
            Eqv => Precedence::EQV,
            Xor => Precedence::XOR,
            Or | OrElse => Precedence::OR,
            And | AndAlso => Precedence::AND,
            Equals | NotEquals | LessThan | LessThanEquals | GreaterThan | GreaterThanEquals
            | Is | IsNot | Like => Precedence::RELATIONAL,
            ShiftLeft | ShiftRight => Precedence::SHIFT,
            Concatenate => Precedence::CONCATENATE,
            Plus | Minus => Precedence::ADDITIVE,
            Modulus => Precedence::MODULUS,
            IntegralDivide => Precedence::INTEGRAL_DIVIDE,
            Multiply | Divide => Precedence::MULTIPLICATIVE,
            Power => Precedence::POWER,
        }
    }

    pub fn is_relational(self) -> bool {
        self.precedence() == Precedence::RELATIONAL
    }
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use BinaryOperator::*;
        let s = match self {
            Plus => "+",
            Minus => "-",
            Multiply => "*",
            Divide => "/",
            IntegralDivide => "\\",
            Modulus => "Mod",
            Power => "^",
            Concatenate => "&",
            ShiftLeft => "<<",
            ShiftRight => ">>",
            Equals => "=",
            NotEquals => "<>",
            LessThan => "<",
            LessThanEquals => "<=",
            GreaterThan => ">",
            GreaterThanEquals => ">=",
            Is => "Is",
            IsNot => "IsNot",
            Like => "Like",
            And => "And",
            AndAlso => "AndAlso",
            Or => "Or",
            OrElse => "OrElse",
            Xor => "Xor",
            Eqv => "Eqv",
            Imp => "Imp",
            To => "To",
        };
        write!(f, "{}", s)
    }
}

impl AcceptVisitor for Argument {
    fn accept<V: Visitor>(&self, visitor: &mut V) {
        self.value.accept(visitor);
    }
}

impl AcceptVisitor for Expression {
    fn accept<V: Visitor>(&self, visitor: &mut V) {
        use ExpressionKind::*;
        match &self.kind {
            Literal(_) | Name(_) | Me | MyBase | MyClass | Global | Malformed => {}
            Parenthesized(expr) | AddressOf(expr) | Unary(_, expr) | IntrinsicCast(_, expr) => {
                expr.accept(visitor)
            }
            MemberAccess(target, _) | DictionaryAccess(target, _) => target.accept(visitor),
            GenericQualified(target, types) => {
                target.accept(visitor);
                types.accept(visitor);
            }
            CallOrIndex(target, arguments) => {
                target.accept(visitor);
                arguments.accept(visitor);
            }
            New(new) => {
                new.type_name.accept(visitor);
                new.arguments.accept(visitor);
                new.initializer.accept(visitor);
            }
            ArrayInitializer(elements) => elements.accept(visitor),
            Cast(_, expr, type_name) | TypeOf(expr, type_name) => {
                expr.accept(visitor);
                type_name.accept(visitor);
            }
            GetType(type_name) => type_name.accept(visitor),
            Binary(_, left, right) => {
                left.accept(visitor);
                right.accept(visitor);
            }
        }
        visitor.visit_expression(self)
    }
}
