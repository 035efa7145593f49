use super::parse::Terminator;
use super::Span;
use thiserror::Error;

/// Builds a [`Diagnostic`] from an [`ErrorCode`] variant and a span.
#[doc(hidden)]
#[macro_export]
macro_rules! error {
    ($err:ident, $span:expr) => {
        $crate::lang::Diagnostic::new($crate::lang::ErrorCode::$err, $span)
    };
    ($err:ident($($arg:expr),+), $span:expr) => {
        $crate::lang::Diagnostic::new($crate::lang::ErrorCode::$err($($arg),+), $span)
    };
}

/// One reported problem. Diagnostics are collected, never thrown.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub span: Span,
}

impl Diagnostic {
    pub fn new(code: ErrorCode, span: Span) -> Diagnostic {
        Diagnostic { code, span }
    }

    pub fn is_lexical(&self) -> bool {
        self.code.is_lexical()
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} at {}", self.code, self.span.start)
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Lexical
    #[error("invalid character")]
    InvalidCharacter,
    #[error("invalid identifier")]
    InvalidIdentifier,
    #[error("invalid escaped identifier")]
    InvalidEscapedIdentifier,
    #[error("string literal is not terminated")]
    InvalidStringLiteral,
    #[error("character literal must contain exactly one character")]
    InvalidCharacterLiteral,
    #[error("invalid date literal")]
    InvalidDateLiteral,
    #[error("integer literal is out of range or malformed")]
    InvalidIntegerLiteral,
    #[error("floating-point literal is out of range or malformed")]
    InvalidFloatingPointLiteral,
    #[error("decimal literal is out of range or malformed")]
    InvalidDecimalLiteral,
    #[error("type character does not match the literal")]
    InvalidTypeCharacter,

    // Syntax
    #[error("syntax error")]
    SyntaxError,
    #[error("expected end of statement")]
    ExpectedEndOfStatement,
    #[error("expected expression")]
    ExpectedExpression,
    #[error("expected identifier")]
    ExpectedIdentifier,
    #[error("expected '('")]
    ExpectedLeftParenthesis,
    #[error("expected ')'")]
    ExpectedRightParenthesis,
    #[error("expected '{{'")]
    ExpectedLeftBrace,
    #[error("expected '}}'")]
    ExpectedRightBrace,
    #[error("expected '>'")]
    ExpectedGreaterThan,
    #[error("expected ','")]
    ExpectedComma,
    #[error("expected '.'")]
    ExpectedPeriod,
    #[error("expected '='")]
    ExpectedEquals,
    #[error("expected 'As'")]
    ExpectedAs,
    #[error("expected 'In'")]
    ExpectedIn,
    #[error("expected 'Is'")]
    ExpectedIs,
    #[error("expected 'To'")]
    ExpectedTo,
    #[error("expected 'Of'")]
    ExpectedOf,
    #[error("expected 'Lib'")]
    ExpectedLib,
    #[error("expected 'Sub' or 'Function'")]
    ExpectedSubOrFunction,
    #[error("expected 'GoTo' or 'Resume'")]
    ExpectedGoToOrResume,
    #[error("expected 'GoTo' or 'GoSub'")]
    ExpectedGoToOrGoSub,
    #[error("expected relational operator")]
    ExpectedRelationalOperator,
    #[error("expected string literal")]
    ExpectedStringLiteral,
    #[error("expected integer literal")]
    ExpectedIntegerLiteral,
    #[error("expected type name")]
    ExpectedType,
    #[error("expected label or line number")]
    ExpectedLabel,
    #[error("expected 'Case'")]
    ExpectedCase,
    #[error("expected 'Do', 'For', 'While', 'Select', 'Try', 'Sub', 'Function' or 'Property'")]
    ExpectedExitKind,
    #[error("expected 'Do', 'For' or 'While'")]
    ExpectedContinueKind,
    #[error("expected 'Explicit', 'Strict', 'Compare', 'Base' or 'Infer'")]
    ExpectedOptionKind,
    #[error("expected 'On' or 'Off'")]
    ExpectedOnOrOff,
    #[error("expected 'Binary' or 'Text'")]
    ExpectedBinaryOrText,
    #[error("expected 'Get' or 'Set' accessor")]
    ExpectedAccessor,
    #[error("expected 'AddHandler', 'RemoveHandler' or 'RaiseEvent'")]
    ExpectedEventAccessor,
    #[error("expected declaration")]
    ExpectedDeclaration,
    #[error("expected 'Then'")]
    ExpectedThen,
    #[error("expected named argument")]
    ExpectedNamedArgument,
    #[error("expected '{0}'")]
    ExpectedEnd(Terminator),
    #[error("'{0}' must be preceded by a matching opener")]
    EndWithoutBegin(Terminator),
    #[error("statements and labels are not valid between 'Select Case' and first 'Case'")]
    StatementBeforeCase,
    #[error("'Case' cannot follow 'Case Else'")]
    CaseAfterCaseElse,
    #[error("'Catch' cannot follow 'Finally'")]
    CatchAfterFinally,
    #[error("'ElseIf' cannot follow 'Else'")]
    ElseIfAfterElse,
    #[error("'Else' cannot follow 'Else'")]
    ElseAfterElse,
    #[error("'Option' statements must precede any other declarations")]
    OptionStatementWrongOrder,
    #[error("'Imports' statements must precede any declarations")]
    ImportsStatementWrongOrder,
    #[error("'Inherits' can only appear first in a class or interface")]
    InheritsStatementWrongOrder,
    #[error("'Implements' statements must follow 'Inherits' and precede other declarations")]
    ImplementsStatementWrongOrder,
    #[error("'Inherits' is only valid in a class or interface")]
    InheritsNotValidHere,
    #[error("'Implements' is not valid in a module or enum")]
    ImplementsNotValidHere,
    #[error("declaration is not valid inside a namespace")]
    InvalidInsideNamespace,
    #[error("declaration is not valid inside a type")]
    InvalidInsideType,
    #[error("declaration is not valid inside an interface")]
    InvalidInsideInterface,
    #[error("statement is not valid inside an enum")]
    InvalidInsideEnum,
    #[error("declaration is not valid inside a method body")]
    InvalidInsideMethod,
    #[error("statement is not valid outside a method body")]
    InvalidOutsideMethod,
    #[error("members must be declared inside a type")]
    InvalidOutsideType,
    #[error("property has no matching 'Get'")]
    PropertyWithoutGet,
    #[error("'Let' and 'Set' assignment statements are no longer supported")]
    ObsoleteLetSetAssignment,
    #[error("'GoSub' statements are no longer supported")]
    ObsoleteGoSub,
    #[error("'On GoTo' and 'On GoSub' statements are no longer supported")]
    ObsoleteOnGoToGoSub,
    #[error("'Wend' is no longer supported; use 'End While'")]
    ObsoleteWend,
    #[error("'EndIf' is no longer supported; use 'End If'")]
    ObsoleteEndIf,
    #[error("'Type' is no longer supported; use 'Structure'")]
    ObsoleteType,
    #[error("'Variant' is no longer supported; use 'Object'")]
    ObsoleteVariant,
    #[error("'Property Get', 'Let' and 'Set' procedures are no longer supported")]
    ObsoletePropertyProcedure,
    #[error("fixed-length strings are no longer supported")]
    ObsoleteFixedLengthString,
    #[error("line numbers must be followed by a colon")]
    ObsoleteLineNumber,
    #[error("'Error' statements are no longer supported; use 'Throw'")]
    ObsoleteErrorStatement,
    #[error("too many arguments in parentheses; expected '='")]
    ParenthesizedCallArguments,
    #[error("'{0}' is not supported in this dialect")]
    NotSupportedInDialect(&'static str),

    // Preprocessor
    #[error("invalid preprocessor statement")]
    InvalidPreprocessorStatement,
    #[error("expected '#End If'")]
    ExpectedEndIfDirective,
    #[error("'#ElseIf' must be preceded by '#If'")]
    ElseIfDirectiveWithoutIf,
    #[error("'#Else' must be preceded by '#If'")]
    ElseDirectiveWithoutIf,
    #[error("'#End If' must be preceded by '#If'")]
    EndIfDirectiveWithoutIf,
    #[error("'#ElseIf' cannot follow '#Else'")]
    ElseIfDirectiveAfterElse,
    #[error("'#Else' cannot follow '#Else'")]
    ElseDirectiveAfterElse,
    #[error("expected '#End Region'")]
    ExpectedEndRegion,
    #[error("'#End Region' must be preceded by '#Region'")]
    EndRegionWithoutRegion,
    #[error("'#Region' is not valid inside a method body")]
    RegionInsideMethod,
    #[error("expected '#End ExternalSource'")]
    ExpectedEndExternalSource,
    #[error("'#End ExternalSource' must be preceded by '#ExternalSource'")]
    EndExternalSourceWithoutExternalSource,
    #[error("'#ExternalSource' directives cannot be nested")]
    NestedExternalSource,

    // Constant expressions
    #[error("expression is not valid in a constant expression")]
    InvalidConstantExpression,
    #[error("operand type is not valid for this operator in a constant expression")]
    IllegalOperandInConstantExpression,
    #[error("constant expression overflows its type")]
    ConstantExpressionOverflow,
    #[error("division by zero in constant expression")]
    ConstantDivisionByZero,
}

impl ErrorCode {
    pub fn is_lexical(&self) -> bool {
        use ErrorCode::*;
        matches!(
            self,
            InvalidCharacter
                | InvalidIdentifier
                | InvalidEscapedIdentifier
                | InvalidStringLiteral
                | InvalidCharacterLiteral
                | InvalidDateLiteral
                | InvalidIntegerLiteral
                | InvalidFloatingPointLiteral
                | InvalidDecimalLiteral
                | InvalidTypeCharacter
        )
    }
}
