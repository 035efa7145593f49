use super::{foreign_keyword, simple_name, Parser};
use crate::lang::ast::{
    Constraint, IntrinsicType, Name, NameKind, TypeName, TypeNameKind, TypeParameter,
};
use crate::lang::token::{Token, TokenType};
use crate::lang::ErrorCode;

/// Intrinsic type named by a keyword.
pub(super) fn intrinsic_type(token_type: TokenType) -> Option<IntrinsicType> {
    use IntrinsicType as I;
    use TokenType as T;
    let intrinsic = match token_type {
        T::Boolean => I::Boolean,
        T::SByte => I::SByte,
        T::Byte => I::Byte,
        T::Short => I::Short,
        T::UShort => I::UShort,
        T::Integer => I::Integer,
        T::UInteger => I::UInteger,
        T::Long => I::Long,
        T::ULong => I::ULong,
        T::Decimal => I::Decimal,
        T::Single => I::Single,
        T::Double => I::Double,
        T::Date => I::Date,
        T::Char => I::Char,
        T::String => I::String,
        T::Object => I::Object,
        T::Variant => I::Variant,
        T::Currency => I::Currency,
        _ => return None,
    };
    Some(intrinsic)
}

/// `Of`, reserved or not.
fn is_of(token: &Token) -> bool {
    token.is(TokenType::Of) || foreign_keyword(token) == Some(TokenType::Of)
}

impl Parser {
    pub(super) fn type_name(&mut self) -> TypeName {
        let element = self.non_array_type_name();
        self.array_suffix(element)
    }

    /// Applies `()` and `(,)` rank suffixes.
    pub(super) fn array_suffix(&mut self, mut element: TypeName) -> TypeName {
        while self.at(TokenType::LeftParenthesis)
            && matches!(
                self.peek_ahead(1).token_type(),
                TokenType::RightParenthesis | TokenType::Comma
            )
        {
            self.read();
            let mut rank = 1;
            while self.accept(TokenType::Comma).is_some() {
                rank += 1;
            }
            self.close_parenthesis();
            let span = self.span_from(element.span);
            element = TypeName {
                kind: TypeNameKind::Array(Box::new(element), rank),
                span,
            };
        }
        element
    }

    /// Type name without rank suffixes, as after `New`.
    pub(super) fn non_array_type_name(&mut self) -> TypeName {
        let token = self.peek().clone();
        if let Some(intrinsic) = intrinsic_type(token.token_type()) {
            self.read();
            if intrinsic == IntrinsicType::Variant && !self.dialect.vb6 {
                self.report_always(error!(ObsoleteVariant, token.span));
            }
            if intrinsic == IntrinsicType::String && self.at(TokenType::Star) {
                return self.fixed_length_string(token);
            }
            return TypeName {
                kind: TypeNameKind::Intrinsic(intrinsic),
                span: token.span,
            };
        }
        let name = self.name(ErrorCode::ExpectedType);
        if matches!(name.kind, NameKind::Malformed) {
            return TypeName {
                kind: TypeNameKind::Malformed,
                span: name.span,
            };
        }
        if self.at_type_arguments() {
            let arguments = self.type_arguments();
            let span = self.span_from(name.span);
            return TypeName {
                kind: TypeNameKind::Constructed(name, arguments),
                span,
            };
        }
        let span = name.span;
        TypeName {
            kind: TypeNameKind::Named(name),
            span,
        }
    }

    /// `String * length`; the cursor is on `*`.
    fn fixed_length_string(&mut self, string: Token) -> TypeName {
        self.read();
        let length = self.postfix();
        let span = self.span_from(string.span);
        if !self.dialect.fixed_length_strings {
            self.report_always(error!(ObsoleteFixedLengthString, span));
        }
        TypeName {
            kind: TypeNameKind::FixedLengthString(Box::new(length)),
            span,
        }
    }

    /// Possibly qualified name, `a.b.c` or `Global.a`. A first token that
    /// cannot start a name is reported as `code`.
    pub(super) fn name(&mut self, code: ErrorCode) -> Name {
        let token = self.peek().clone();
        let mut name = if token.is(TokenType::Global) && self.dialect.vb80 {
            self.read();
            if !self.at(TokenType::Period) {
                let span = self.peek().span;
                self.report(error!(ExpectedPeriod, span));
            }
            Name {
                kind: NameKind::Global,
                span: token.span,
            }
        } else {
            match simple_name(&token) {
                Some(simple) if token.is_identifier() => {
                    self.read();
                    Name {
                        kind: NameKind::Simple(simple),
                        span: token.span,
                    }
                }
                _ => {
                    self.report(crate::lang::Diagnostic::new(code, token.span));
                    return Name {
                        kind: NameKind::Malformed,
                        span: token.span,
                    };
                }
            }
        };
        while self.accept(TokenType::Period).is_some() {
            let start = name.span;
            match self.member_name() {
                Some(member) => {
                    name = Name {
                        span: start.to(member.span),
                        kind: NameKind::Qualified(Box::new(name), member),
                    };
                }
                None => {
                    return Name {
                        kind: NameKind::Malformed,
                        span: self.span_from(start),
                    }
                }
            }
        }
        name
    }

    pub(super) fn at_type_arguments(&mut self) -> bool {
        self.at(TokenType::LeftParenthesis) && is_of(self.peek_ahead(1))
    }

    /// Reads `(` and `Of`, gating generics on the dialect.
    fn open_generic_list(&mut self) {
        self.read();
        let of = self.read();
        if !self.dialect.generics {
            self.not_supported(TokenType::Of, of.span);
        }
    }

    /// `(Of T, U)`; the cursor is on `(`.
    pub(super) fn type_arguments(&mut self) -> Vec<TypeName> {
        self.open_generic_list();
        let mut arguments = vec![];
        loop {
            arguments.push(self.type_name());
            if self.accept(TokenType::Comma).is_none() {
                break;
            }
        }
        self.close_parenthesis();
        arguments
    }

    /// `(Of T As {New, Class}, U)` if present.
    pub(super) fn type_parameters(&mut self) -> Vec<TypeParameter> {
        if !self.at_type_arguments() {
            return vec![];
        }
        self.open_generic_list();
        let mut parameters = vec![];
        loop {
            let start = self.peek().span;
            let name = self.identifier();
            let mut constraints = vec![];
            if self.accept(TokenType::As).is_some() {
                if self.accept(TokenType::LeftCurlyBrace).is_some() {
                    loop {
                        constraints.push(self.constraint());
                        if self.accept(TokenType::Comma).is_none() {
                            break;
                        }
                    }
                    self.expect(TokenType::RightCurlyBrace, ErrorCode::ExpectedRightBrace);
                } else {
                    constraints.push(self.constraint());
                }
            }
            if let Some(name) = name {
                parameters.push(TypeParameter {
                    name,
                    constraints,
                    span: self.span_from(start),
                });
            }
            if self.accept(TokenType::Comma).is_none() {
                break;
            }
        }
        self.close_parenthesis();
        parameters
    }

    fn constraint(&mut self) -> Constraint {
        let span = self.peek().span;
        match self.peek_type() {
            TokenType::New => {
                self.read();
                Constraint::New(span)
            }
            TokenType::Class => {
                self.read();
                Constraint::Class(span)
            }
            TokenType::Structure => {
                self.read();
                Constraint::Structure(span)
            }
            _ => Constraint::Type(self.type_name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intrinsic_type() {
        assert_eq!(intrinsic_type(TokenType::Integer), Some(IntrinsicType::Integer));
        assert_eq!(intrinsic_type(TokenType::Currency), Some(IntrinsicType::Currency));
        assert_eq!(intrinsic_type(TokenType::Identifier), None);
        assert_eq!(intrinsic_type(TokenType::CInt), None);
    }
}
