use super::{simple_name, types::intrinsic_type, Parser};
use crate::lang::ast::{
    Argument, BinaryOperator, CastOperator, Expression, ExpressionKind, IntrinsicType, Literal,
    New, Precedence, UnaryOperator,
};
use crate::lang::token::{Token, TokenKind, TokenType};
use crate::lang::{ErrorCode, Span};

impl Parser {
    pub(super) fn expression(&mut self) -> Expression {
        self.binary(Precedence::NONE, false)
    }

    /// Expression in which `a To b` denotes a range: array bounds and
    /// `Case` clauses.
    pub(super) fn range_expression(&mut self) -> Expression {
        self.binary(Precedence::NONE, true)
    }

    /// Parses operators binding tighter than `min`.
    fn binary(&mut self, min: u8, ranges: bool) -> Expression {
        let mut left = self.unary(ranges);
        while let Some((operator, width)) = self.peek_binary_operator(ranges) {
            if operator.precedence() <= min {
                break;
            }
            for _ in 0..width {
                self.read();
            }
            let right = self.binary(operator.precedence(), ranges);
            let span = left.span.to(right.span);
            left = Expression::new(
                ExpressionKind::Binary(operator, Box::new(left), Box::new(right)),
                span,
            );
        }
        left
    }

    /// Operator at the cursor and the number of tokens spelling it.
    fn peek_binary_operator(&mut self, ranges: bool) -> Option<(BinaryOperator, usize)> {
        use BinaryOperator as B;
        use TokenType as T;
        let operator = match self.peek_type() {
            T::Plus => B::Plus,
            T::Minus => B::Minus,
            T::Star => B::Multiply,
            T::ForwardSlash => B::Divide,
            T::BackwardSlash => B::IntegralDivide,
            T::Mod => B::Modulus,
            T::Caret => B::Power,
            T::Ampersand => B::Concatenate,
            T::LessThanLessThan => B::ShiftLeft,
            T::GreaterThanGreaterThan => B::ShiftRight,
            T::Equals => B::Equals,
            T::NotEquals => B::NotEquals,
            T::LessThan => B::LessThan,
            T::LessThanEquals => B::LessThanEquals,
            T::GreaterThan => B::GreaterThan,
            T::GreaterThanEquals => B::GreaterThanEquals,
            T::Is => {
                if self.dialect.is_not_rewrite && self.peek_ahead(1).is(T::Not) {
                    return Some((B::IsNot, 2));
                }
                B::Is
            }
            T::IsNot => B::IsNot,
            T::Like => B::Like,
            T::And => B::And,
            T::AndAlso => B::AndAlso,
            T::Or => B::Or,
            T::OrElse => B::OrElse,
            T::Xor => B::Xor,
            T::Eqv => B::Eqv,
            T::Imp => B::Imp,
            T::To if ranges => B::To,
            _ => return None,
        };
        Some((operator, 1))
    }

    fn unary(&mut self, ranges: bool) -> Expression {
        let start = self.peek().span;
        let operator = match self.peek_type() {
            TokenType::Not => UnaryOperator::Not,
            TokenType::Minus => UnaryOperator::Negate,
            TokenType::Plus => UnaryOperator::Plus,
            TokenType::AddressOf => {
                self.read();
                let operand = self.postfix();
                let span = start.to(operand.span);
                return Expression::new(ExpressionKind::AddressOf(Box::new(operand)), span);
            }
            _ => return self.postfix(),
        };
        self.read();
        let operand = self.binary(operator.precedence(), ranges);
        let span = start.to(operand.span);
        Expression::new(ExpressionKind::Unary(operator, Box::new(operand)), span)
    }

    pub(super) fn postfix(&mut self) -> Expression {
        let primary = self.primary();
        self.postfix_from(primary, false, false)
    }

    /// Applies `.name`, `!name`, `(arguments)` and `(Of types)` suffixes.
    ///
    /// In a legacy statement target a suffix separated from the target by
    /// whitespace ends the target: it begins the implicit call's arguments.
    pub(super) fn postfix_from(
        &mut self,
        mut target: Expression,
        legacy_target: bool,
        ranges: bool,
    ) -> Expression {
        use TokenType as T;
        loop {
            let token_type = self.peek_type();
            if !matches!(token_type, T::Period | T::Exclamation | T::LeftParenthesis) {
                break;
            }
            if legacy_target && !self.adjacent_to_previous() {
                break;
            }
            if target.is_malformed() {
                break;
            }
            target = match token_type {
                T::Period | T::Exclamation => {
                    self.read();
                    let start = target.span;
                    match self.member_name() {
                        Some(name) => {
                            let span = start.to(name.span);
                            let target = Some(Box::new(target));
                            let kind = if token_type == T::Period {
                                ExpressionKind::MemberAccess(target, name)
                            } else {
                                ExpressionKind::DictionaryAccess(target, name)
                            };
                            Expression::new(kind, span)
                        }
                        None => Expression::malformed(self.span_from(start)),
                    }
                }
                _ => {
                    let start = target.span;
                    if self.at_type_arguments() {
                        let types = self.type_arguments();
                        let span = self.span_from(start);
                        Expression::new(
                            ExpressionKind::GenericQualified(Box::new(target), types),
                            span,
                        )
                    } else {
                        let arguments = self.arguments(ranges);
                        let span = self.span_from(start);
                        Expression::new(
                            ExpressionKind::CallOrIndex(Box::new(target), arguments),
                            span,
                        )
                    }
                }
            };
        }
        target
    }

    /// No whitespace between the last token read and the cursor.
    pub(super) fn adjacent_to_previous(&mut self) -> bool {
        let previous = self.state.last_span.finish.index;
        self.peek().span.start.index == previous
    }

    pub(super) fn primary(&mut self) -> Expression {
        use ExpressionKind as E;
        use TokenType as T;
        let token = self.peek().clone();
        let start = token.span;
        if let Some(literal) = literal(&token) {
            self.read();
            return Expression::new(E::Literal(literal), start);
        }
        let kind = match token.token_type() {
            T::Identifier => match simple_name(&token) {
                Some(name) => E::Name(name),
                None => E::Malformed,
            },
            T::True => E::Literal(Literal::Boolean(true)),
            T::False => E::Literal(Literal::Boolean(false)),
            T::Nothing => E::Literal(Literal::Nothing),
            T::Me => E::Me,
            T::MyBase => E::MyBase,
            T::MyClass => E::MyClass,
            T::Global if self.dialect.vb80 => {
                self.read();
                if !self.at(T::Period) {
                    let span = self.peek().span;
                    self.report(error!(ExpectedPeriod, span));
                }
                return Expression::new(E::Global, start);
            }
            T::LeftParenthesis => return self.parenthesized(),
            T::Period | T::Exclamation => return self.with_member_access(),
            T::LeftCurlyBrace => return self.array_initializer(),
            T::New => return self.new_expression(),
            T::CType => return self.cast(CastOperator::CType),
            T::DirectCast => return self.cast(CastOperator::DirectCast),
            T::TryCast => return self.cast(CastOperator::TryCast),
            T::TypeOf => return self.type_of(),
            T::GetType => return self.get_type(),
            T::LexicalError => {
                self.read();
                return Expression::malformed(start);
            }
            t => {
                if let Some(target) = cast_target(t) {
                    return self.intrinsic_cast(target);
                }
                // `Integer.MaxValue`, or legacy functions such as `String(5, "x")`.
                if intrinsic_type(t).is_some() {
                    match simple_name(&token) {
                        Some(name) => E::Name(name),
                        None => E::Malformed,
                    }
                } else {
                    self.report(error!(ExpectedExpression, start));
                    return Expression::malformed(start);
                }
            }
        };
        self.read();
        Expression::new(kind, start)
    }

    fn parenthesized(&mut self) -> Expression {
        let start = self.read().span;
        let inner = self.expression();
        self.close_parenthesis();
        let span = self.span_from(start);
        Expression::new(ExpressionKind::Parenthesized(Box::new(inner)), span)
    }

    /// `.name` or `!name` inside a `With` block.
    fn with_member_access(&mut self) -> Expression {
        let punctuator = self.read();
        match self.member_name() {
            Some(name) => {
                let span = punctuator.span.to(name.span);
                let kind = if punctuator.is(TokenType::Period) {
                    ExpressionKind::MemberAccess(None, name)
                } else {
                    ExpressionKind::DictionaryAccess(None, name)
                };
                Expression::new(kind, span)
            }
            None => Expression::malformed(punctuator.span),
        }
    }

    pub(super) fn array_initializer(&mut self) -> Expression {
        let start = self.read().span;
        if self.dialect.vb6 {
            self.not_supported(TokenType::LeftCurlyBrace, start);
        }
        let mut elements = vec![];
        if !self.at(TokenType::RightCurlyBrace) {
            loop {
                elements.push(self.expression());
                if self.accept(TokenType::Comma).is_none() {
                    break;
                }
            }
        }
        if self
            .expect(TokenType::RightCurlyBrace, ErrorCode::ExpectedRightBrace)
            .is_none()
        {
            self.resync(&[TokenType::RightCurlyBrace]);
            self.accept(TokenType::RightCurlyBrace);
        }
        let span = self.span_from(start);
        Expression::new(ExpressionKind::ArrayInitializer(elements), span)
    }

    fn new_expression(&mut self) -> Expression {
        let start = self.read().span;
        let type_name = self.non_array_type_name();
        let arguments = if self.at(TokenType::LeftParenthesis) {
            Some(self.arguments(false))
        } else {
            None
        };
        let initializer = if self.at(TokenType::LeftCurlyBrace) {
            Some(Box::new(self.array_initializer()))
        } else {
            None
        };
        let span = self.span_from(start);
        Expression::new(
            ExpressionKind::New(New {
                type_name,
                arguments,
                initializer,
            }),
            span,
        )
    }

    /// `CType(x, T)`, `DirectCast(x, T)`, `TryCast(x, T)`
    fn cast(&mut self, operator: CastOperator) -> Expression {
        let start = self.read().span;
        if self
            .expect(TokenType::LeftParenthesis, ErrorCode::ExpectedLeftParenthesis)
            .is_none()
        {
            return Expression::malformed(start);
        }
        let operand = self.expression();
        if self
            .expect(TokenType::Comma, ErrorCode::ExpectedComma)
            .is_none()
        {
            self.resync(&[TokenType::RightParenthesis]);
            self.accept(TokenType::RightParenthesis);
            return Expression::malformed(self.span_from(start));
        }
        let type_name = self.type_name();
        self.close_parenthesis();
        let span = self.span_from(start);
        Expression::new(
            ExpressionKind::Cast(operator, Box::new(operand), type_name),
            span,
        )
    }

    fn intrinsic_cast(&mut self, target: IntrinsicType) -> Expression {
        let start = self.read().span;
        if self
            .expect(TokenType::LeftParenthesis, ErrorCode::ExpectedLeftParenthesis)
            .is_none()
        {
            return Expression::malformed(start);
        }
        let operand = self.expression();
        self.close_parenthesis();
        let span = self.span_from(start);
        Expression::new(
            ExpressionKind::IntrinsicCast(target, Box::new(operand)),
            span,
        )
    }

    /// `TypeOf x Is T`
    fn type_of(&mut self) -> Expression {
        let start = self.read().span;
        let operand = self.binary(Precedence::RELATIONAL, false);
        if self.expect(TokenType::Is, ErrorCode::ExpectedIs).is_none() {
            return Expression::malformed(self.span_from(start));
        }
        let type_name = self.type_name();
        let span = self.span_from(start);
        Expression::new(ExpressionKind::TypeOf(Box::new(operand), type_name), span)
    }

    fn get_type(&mut self) -> Expression {
        let start = self.read().span;
        if self
            .expect(TokenType::LeftParenthesis, ErrorCode::ExpectedLeftParenthesis)
            .is_none()
        {
            return Expression::malformed(start);
        }
        let type_name = self.type_name();
        self.close_parenthesis();
        let span = self.span_from(start);
        Expression::new(ExpressionKind::GetType(type_name), span)
    }

    /// Expects `)`, skipping whatever precedes it on the line.
    pub(super) fn close_parenthesis(&mut self) {
        if self
            .expect(TokenType::RightParenthesis, ErrorCode::ExpectedRightParenthesis)
            .is_none()
        {
            self.resync(&[TokenType::RightParenthesis]);
            self.accept(TokenType::RightParenthesis);
        }
    }

    /// Parenthesized argument list; the cursor is on `(`.
    pub(super) fn arguments(&mut self, ranges: bool) -> Vec<Argument> {
        self.read();
        let mut arguments = vec![];
        if self.accept(TokenType::RightParenthesis).is_some() {
            return arguments;
        }
        let mut named = false;
        loop {
            let argument = self.argument(ranges);
            if argument.name.is_some() {
                named = true;
            } else if named && argument.value.is_some() {
                self.report(error!(ExpectedNamedArgument, argument.span));
            }
            arguments.push(argument);
            if self.accept(TokenType::Comma).is_none() {
                break;
            }
        }
        self.close_parenthesis();
        arguments
    }

    /// One argument: omitted, positional, `name := value`, or the legacy
    /// `ByVal value`.
    pub(super) fn argument(&mut self, ranges: bool) -> Argument {
        let start = self.peek().span;
        if self.at(TokenType::Comma) || self.at(TokenType::RightParenthesis) {
            return Argument {
                name: None,
                by_val: false,
                value: None,
                span: Span::empty(start.start),
            };
        }
        if self.peek_ahead(1).is(TokenType::ColonEquals) {
            if let Some(name) = simple_name(self.peek()) {
                self.read();
                self.read();
                let value = self.expression();
                let span = start.to(value.span);
                return Argument {
                    name: Some(name),
                    by_val: false,
                    value: Some(value),
                    span,
                };
            }
        }
        let by_val = self.dialect.vb6 && self.accept(TokenType::ByVal).is_some();
        let value = if ranges {
            self.range_expression()
        } else {
            self.expression()
        };
        let span = start.to(value.span);
        Argument {
            name: None,
            by_val,
            value: Some(value),
            span,
        }
    }

    /// Whether the token at the cursor can begin an expression or an
    /// omitted argument.
    pub(super) fn at_argument_start(&mut self) -> bool {
        use TokenType as T;
        let vb6 = self.dialect.vb6;
        let vb80 = self.dialect.vb80;
        let token = self.peek();
        if token.is_literal() {
            return true;
        }
        match token.token_type() {
            T::Identifier
            | T::Comma
            | T::LeftParenthesis
            | T::LeftCurlyBrace
            | T::Minus
            | T::Plus
            | T::Period
            | T::Exclamation
            | T::Not
            | T::New
            | T::Nothing
            | T::True
            | T::False
            | T::Me
            | T::MyBase
            | T::MyClass
            | T::AddressOf
            | T::TypeOf
            | T::GetType
            | T::CType
            | T::DirectCast
            | T::TryCast => true,
            T::ByVal => vb6,
            T::Global => vb80,
            t => cast_target(t).is_some() || intrinsic_type(t).is_some(),
        }
    }
}

fn literal(token: &Token) -> Option<Literal> {
    let literal = match &token.kind {
        TokenKind::IntegerLiteral(l) => Literal::Integer(*l),
        TokenKind::UnsignedIntegerLiteral(l) => Literal::UnsignedInteger(*l),
        TokenKind::FloatingPointLiteral(l) => Literal::FloatingPoint(*l),
        TokenKind::DecimalLiteral(l) => Literal::Decimal(*l),
        TokenKind::CharacterLiteral(c) => Literal::Character(*c),
        TokenKind::StringLiteral(s) => Literal::String(s.clone()),
        TokenKind::DateLiteral(d) => Literal::Date(*d),
        _ => return None,
    };
    Some(literal)
}

/// Target type of an intrinsic conversion keyword.
fn cast_target(token_type: TokenType) -> Option<IntrinsicType> {
    use IntrinsicType as I;
    use TokenType as T;
    let target = match token_type {
        T::CBool => I::Boolean,
        T::CByte => I::Byte,
        T::CChar => I::Char,
        T::CDate => I::Date,
        T::CDbl => I::Double,
        T::CDec => I::Decimal,
        T::CInt => I::Integer,
        T::CLng => I::Long,
        T::CObj => I::Object,
        T::CSByte => I::SByte,
        T::CShort => I::Short,
        T::CSng => I::Single,
        T::CStr => I::String,
        T::CUInt => I::UInteger,
        T::CULng => I::ULong,
        T::CUShort => I::UShort,
        _ => return None,
    };
    Some(target)
}
