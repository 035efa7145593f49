use super::blocks::{BlockEnd, BlockKind, Boundary};
use super::{foreign_keyword, simple_name, Parser};
use crate::lang::ast::{
    Accessor, AccessorKind, Attribute, AttributeTarget, Charset, Comment, Declaration,
    DeclarationKind, Delegate, EnumDeclaration, EnumMember, Event, External, Import, Method,
    MethodKind, Modifier, ModifierKind, Modifiers, Name, Operator, OptionCompare, OptionKind,
    Parameter, Property, TypeDeclaration, TypeKind, TypeName, VariableDeclarator, VariableName,
};
use crate::lang::token::{Token, TokenKind, TokenType};
use crate::lang::{Diagnostic, ErrorCode, Span};
use std::rc::Rc;
use tracing::trace;

/// Construct whose member list is being parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Container {
    File,
    Namespace,
    Class,
    Module,
    Structure,
    Interface,
    Enum,
    UserDefinedType,
}

impl Container {
    fn block(self) -> Option<BlockKind> {
        let kind = match self {
            Container::File => return None,
            Container::Namespace => BlockKind::Namespace,
            Container::Class => BlockKind::Class,
            Container::Module => BlockKind::Module,
            Container::Structure => BlockKind::Structure,
            Container::Interface => BlockKind::Interface,
            Container::Enum => BlockKind::Enum,
            Container::UserDefinedType => BlockKind::UserDefinedType,
        };
        Some(kind)
    }

    fn of(type_kind: TypeKind) -> Container {
        match type_kind {
            TypeKind::Class => Container::Class,
            TypeKind::Module => Container::Module,
            TypeKind::Structure => Container::Structure,
            TypeKind::Interface => Container::Interface,
            TypeKind::UserDefined => Container::UserDefinedType,
        }
    }
}

/// Section of a member list; each must precede the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Stage {
    Options,
    Imports,
    Inherits,
    Implements,
    Members,
}

/// Where a kind of declaration may appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    /// `Option`, `Imports` and assembly attributes.
    File,
    Namespace,
    Module,
    /// Classes, structures, interfaces, enums and delegates.
    Type,
    Inherits,
    Implements,
    Operator,
    /// Methods, properties and events.
    Member,
    /// Fields, constants and external declarations.
    Field,
}

impl Parser {
    /// Declarations of a whole file.
    pub(super) fn file_members(&mut self) -> Vec<Declaration> {
        let start = self.peek().span;
        self.members(Container::File, start).0
    }

    /// Member list of `container`, opened at `start`.
    fn members(&mut self, container: Container, start: Span) -> (Vec<Declaration>, BlockEnd) {
        let kind = container.block();
        if let Some(kind) = kind {
            self.push_block(kind);
        }
        let mut members = vec![];
        let mut stage = Stage::Options;
        let end = loop {
            self.skip_separators();
            let boundary = match kind {
                Some(kind) => self.boundary(kind, start),
                None => self.file_boundary(),
            };
            match boundary {
                Boundary::Item => {
                    if let Some(kind) = kind {
                        if self.unwinds_from(container) {
                            break self.unwind(kind, start);
                        }
                    }
                    let declaration = self.declaration_line(container);
                    self.check_order(&declaration, &mut stage);
                    members.push(declaration);
                }
                Boundary::Skipped => {}
                Boundary::Stop(end) => break end,
            }
        };
        if let Some(kind) = kind {
            self.pop_block(kind);
        }
        self.merge_property_procedures(&mut members);
        (members, end)
    }

    fn file_boundary(&mut self) -> Boundary {
        if self.at(TokenType::EndOfStream) {
            return Boundary::Stop(BlockEnd::EndOfStream);
        }
        if let Some((terminator, span)) = self.peek_terminator() {
            self.begin_statement();
            self.report_always(error!(EndWithoutBegin(terminator), span));
            self.consume_terminator(terminator);
            self.resync(&[]);
            return Boundary::Skipped;
        }
        Boundary::Item
    }

    /// Enum and user-defined type bodies hold only their own members; any
    /// other declaration means the `End` was left out.
    fn unwinds_from(&mut self, container: Container) -> bool {
        matches!(container, Container::Enum | Container::UserDefinedType)
            && !self.at(TokenType::LessThan)
            && self.at_member_declaration()
    }

    /// Whether the cursor starts a member declaration: the end of an
    /// unterminated method body.
    pub(super) fn at_member_declaration(&mut self) -> bool {
        use TokenType as T;
        let token = self.peek().clone();
        match token.token_type() {
            T::Public
            | T::Private
            | T::Protected
            | T::Friend
            | T::Shadows
            | T::Shared
            | T::Overrides
            | T::Overridable
            | T::Overloads
            | T::NotOverridable
            | T::MustOverride
            | T::MustInherit
            | T::NotInheritable
            | T::Partial
            | T::Default
            | T::ReadOnly
            | T::WriteOnly
            | T::WithEvents
            | T::Widening
            | T::Narrowing
            | T::Sub
            | T::Function
            | T::Property
            | T::Class
            | T::Module
            | T::Structure
            | T::Interface
            | T::Enum
            | T::Namespace
            | T::Event
            | T::Delegate
            | T::Declare
            | T::Operator
            | T::Imports
            | T::Option
            | T::Inherits
            | T::Implements
            | T::Type => true,
            T::Global => self.dialect.vb6,
            T::LessThan => self.dialect.attributes,
            T::Identifier => is_custom(&token) && self.peek_ahead(1).is(T::Event),
            _ => false,
        }
    }

    /// One declaration with its separator check and trailing comments.
    pub(super) fn declaration_line(&mut self, container: Container) -> Declaration {
        self.begin_statement();
        if self.at(TokenType::Comment) {
            let start = self.peek().span;
            let comments = self.trailing_comments();
            let mut declaration = Declaration::new(DeclarationKind::Empty, self.span_from(start));
            declaration.comments = comments;
            return declaration;
        }
        let mut declaration = self.declaration(container);
        self.end_of_statement();
        declaration.comments.extend(self.trailing_comments());
        declaration
    }

    fn declaration(&mut self, container: Container) -> Declaration {
        use TokenType as T;
        let start = self.peek().span;
        match container {
            Container::Enum => return self.enum_member(start),
            Container::UserDefinedType => return self.type_member(start),
            _ => {}
        }
        let attributes = self.attribute_blocks();
        if !attributes.is_empty()
            && self.at_end_of_statement()
            && attributes.iter().all(|a| a.target.is_some())
        {
            self.check_placement(container, Placement::File, start);
            let mut declaration =
                Declaration::new(DeclarationKind::Attributes, self.span_from(start));
            declaration.attributes = attributes;
            return declaration;
        }
        let modifiers = self.modifiers();
        let token = self.peek().clone();
        let keyword = self.declaration_keyword(&token);
        trace!(?keyword, ?container, "declaration");
        let placement = match keyword {
            T::Option | T::Imports => Placement::File,
            T::Namespace => Placement::Namespace,
            T::Module => Placement::Module,
            T::Class | T::Structure | T::Interface | T::Type | T::Enum | T::Delegate => {
                Placement::Type
            }
            T::Inherits => Placement::Inherits,
            T::Implements => Placement::Implements,
            T::Operator => Placement::Operator,
            T::Sub | T::Function | T::Property | T::Event => Placement::Member,
            T::Declare => Placement::Field,
            T::Identifier if is_custom(&token) && self.peek_ahead(1).is(T::Event) => {
                Placement::Member
            }
            T::Identifier if !modifiers.is_empty() => Placement::Field,
            _ => return self.misplaced_statement(start),
        };
        self.check_placement(container, placement, start);
        let mut comments = vec![];
        let kind = match keyword {
            T::Option => self.option_statement(),
            T::Imports => self.imports(),
            T::Namespace => self.namespace(&mut comments),
            T::Class => self.type_declaration(TypeKind::Class, &mut comments),
            T::Module => self.type_declaration(TypeKind::Module, &mut comments),
            T::Structure => self.type_declaration(TypeKind::Structure, &mut comments),
            T::Interface => self.type_declaration(TypeKind::Interface, &mut comments),
            T::Type => self.type_declaration(TypeKind::UserDefined, &mut comments),
            T::Enum => self.enum_declaration(&mut comments),
            T::Inherits => DeclarationKind::Inherits(self.type_list()),
            T::Implements => DeclarationKind::Implements(self.type_list()),
            T::Sub | T::Function => self.method(container, &modifiers, &mut comments),
            T::Property => self.property(container, &modifiers, &mut comments),
            T::Event => self.event(None, &mut comments),
            T::Delegate => self.delegate(),
            T::Declare => self.external(),
            T::Operator => self.operator(&mut comments),
            _ if placement == Placement::Member => {
                let custom = self.read();
                self.event(Some(custom), &mut comments)
            }
            _ => self.variable_kind(&modifiers),
        };
        Declaration {
            kind,
            attributes,
            modifiers,
            span: self.span_from(start),
            comments,
        }
    }

    /// Keyword starting the declaration at `token`. A keyword of another
    /// dialect counts when it is used as one, and is reported.
    fn declaration_keyword(&mut self, token: &Token) -> TokenType {
        use TokenType as T;
        let foreign = match foreign_keyword(token) {
            Some(foreign) => foreign,
            None => return token.token_type(),
        };
        let next = self.peek_ahead(1).clone();
        let declares = match foreign {
            T::Class
            | T::Module
            | T::Structure
            | T::Interface
            | T::Namespace
            | T::Imports
            | T::Inherits
            | T::Type => next.identifier().is_some(),
            T::Delegate => matches!(next.token_type(), T::Sub | T::Function),
            T::Operator => !matches!(
                next.token_type(),
                T::Equals | T::Period | T::Exclamation | T::Colon | T::LineTerminator
            ),
            _ => false,
        };
        if !declares {
            return token.token_type();
        }
        if foreign == T::Type {
            self.report_always(error!(ObsoleteType, token.span));
        } else {
            self.not_supported(foreign, token.span);
        }
        foreign
    }

    fn check_placement(&mut self, container: Container, placement: Placement, span: Span) {
        use Container as C;
        use ErrorCode as E;
        let vb6 = self.dialect.vb6;
        let misplaced = |container: Container| match container {
            C::Namespace => Some(E::InvalidInsideNamespace),
            C::Interface => Some(E::InvalidInsideInterface),
            C::File => Some(E::InvalidOutsideType),
            _ => Some(E::InvalidInsideType),
        };
        let code = match placement {
            Placement::File => match container {
                C::File => None,
                C::Namespace => Some(E::InvalidInsideNamespace),
                C::Interface => Some(E::InvalidInsideInterface),
                _ => Some(E::InvalidInsideType),
            },
            Placement::Namespace | Placement::Module => match container {
                C::File | C::Namespace => None,
                C::Interface => Some(E::InvalidInsideInterface),
                _ => Some(E::InvalidInsideType),
            },
            Placement::Type => None,
            Placement::Inherits => match container {
                C::Class | C::Interface => None,
                _ => Some(E::InheritsNotValidHere),
            },
            Placement::Implements => match container {
                C::Class | C::Structure => None,
                C::File if vb6 => None,
                _ => Some(E::ImplementsNotValidHere),
            },
            Placement::Operator => match container {
                C::Class | C::Structure => None,
                other => misplaced(other),
            },
            Placement::Member | Placement::Field => match container {
                C::File if vb6 => None,
                C::File | C::Namespace => misplaced(container),
                C::Interface if placement == Placement::Field => misplaced(container),
                _ => None,
            },
        };
        if let Some(code) = code {
            self.report_always(Diagnostic::new(code, span));
        }
    }

    /// `Option` before `Imports` before everything else; in a class or
    /// interface, `Inherits` before `Implements` before other members.
    fn check_order(&mut self, declaration: &Declaration, stage: &mut Stage) {
        let this = match &declaration.kind {
            DeclarationKind::Empty | DeclarationKind::Malformed => return,
            DeclarationKind::Option(_) => Stage::Options,
            DeclarationKind::Imports(_) => Stage::Imports,
            DeclarationKind::Inherits(_) => Stage::Inherits,
            DeclarationKind::Implements(_) => Stage::Implements,
            _ => Stage::Members,
        };
        if this >= *stage {
            *stage = this;
            return;
        }
        let code = match this {
            Stage::Options => ErrorCode::OptionStatementWrongOrder,
            Stage::Imports => ErrorCode::ImportsStatementWrongOrder,
            Stage::Inherits => ErrorCode::InheritsStatementWrongOrder,
            Stage::Implements | Stage::Members => ErrorCode::ImplementsStatementWrongOrder,
        };
        self.report_always(Diagnostic::new(code, declaration.span));
    }

    /// An executable statement where only declarations may appear.
    fn misplaced_statement(&mut self, start: Span) -> Declaration {
        if self.peek().identifier().is_some() {
            self.report(error!(InvalidOutsideMethod, start));
            self.statement();
        } else {
            self.report(error!(ExpectedDeclaration, start));
            self.resync(&[]);
        }
        Declaration::new(DeclarationKind::Malformed, self.span_from(start))
    }

    // Attributes and modifiers

    /// Zero or more `<...>` attribute blocks.
    pub(super) fn attribute_blocks(&mut self) -> Vec<Attribute> {
        let mut attributes = vec![];
        while self.at(TokenType::LessThan) {
            let open = self.read();
            if !self.dialect.attributes {
                self.report_always(error!(NotSupportedInDialect("attributes"), open.span));
            }
            loop {
                let start = self.peek().span;
                let target = if self.peek_ahead(1).is(TokenType::Colon) {
                    if self.at_unreserved(TokenType::Assembly) {
                        Some(AttributeTarget::Assembly)
                    } else if self.at(TokenType::Module) {
                        Some(AttributeTarget::Module)
                    } else {
                        None
                    }
                } else {
                    None
                };
                if target.is_some() {
                    self.read();
                    self.read();
                }
                let name = self.name(ErrorCode::ExpectedIdentifier);
                let arguments = if self.at(TokenType::LeftParenthesis) {
                    self.arguments(false)
                } else {
                    vec![]
                };
                attributes.push(Attribute {
                    target,
                    name,
                    arguments,
                    span: self.span_from(start),
                });
                if self.accept(TokenType::Comma).is_none() {
                    break;
                }
            }
            if self
                .expect(TokenType::GreaterThan, ErrorCode::ExpectedGreaterThan)
                .is_none()
            {
                self.resync(&[TokenType::GreaterThan]);
                self.accept(TokenType::GreaterThan);
            }
        }
        attributes
    }

    pub(super) fn modifiers(&mut self) -> Modifiers {
        let mut list = vec![];
        loop {
            let token = self.peek().clone();
            let kind = match modifier_kind(token.token_type(), self.dialect.vb6) {
                Some(kind) => kind,
                None => match foreign_keyword(&token).and_then(|k| modifier_kind(k, false)) {
                    Some(kind) if self.modifier_follows() => {
                        if let Some(foreign) = foreign_keyword(&token) {
                            self.not_supported(foreign, token.span);
                        }
                        kind
                    }
                    _ => break,
                },
            };
            self.read();
            list.push(Modifier {
                kind,
                span: token.span,
            });
        }
        Modifiers { list }
    }

    /// Whether the token after the cursor continues a declaration head,
    /// as opposed to the cursor naming a variable.
    fn modifier_follows(&mut self) -> bool {
        let next = self.peek_ahead(1).clone();
        if next.is(TokenType::As) {
            return false;
        }
        (next.identifier().is_some() && !next.is_identifier()) || foreign_keyword(&next).is_some()
    }

    // Files and namespaces

    fn option_statement(&mut self) -> DeclarationKind {
        use TokenType as T;
        self.read();
        let token = self.peek().clone();
        let kind = match token.unreserved() {
            Some(T::Explicit) => {
                self.read();
                self.on_off().map(OptionKind::Explicit)
            }
            Some(T::Strict) => {
                self.read();
                self.on_off().map(OptionKind::Strict)
            }
            Some(T::Infer) => {
                self.read();
                self.on_off().map(OptionKind::Infer)
            }
            Some(T::Compare) => {
                self.read();
                let compare = self.peek().clone();
                match compare.unreserved() {
                    Some(T::Binary) => {
                        self.read();
                        Some(OptionKind::Compare(OptionCompare::Binary))
                    }
                    Some(T::Text) => {
                        self.read();
                        Some(OptionKind::Compare(OptionCompare::Text))
                    }
                    _ => {
                        self.report(error!(ExpectedBinaryOrText, compare.span));
                        None
                    }
                }
            }
            Some(T::Base) => {
                self.read();
                let base = self.peek().clone();
                match base.kind {
                    TokenKind::IntegerLiteral(literal) => {
                        self.read();
                        Some(OptionKind::Base(literal.value))
                    }
                    _ => {
                        self.report(error!(ExpectedIntegerLiteral, base.span));
                        None
                    }
                }
            }
            _ => {
                self.report(error!(ExpectedOptionKind, token.span));
                None
            }
        };
        match kind {
            Some(kind) => DeclarationKind::Option(kind),
            None => {
                self.resync(&[]);
                DeclarationKind::Malformed
            }
        }
    }

    fn on_off(&mut self) -> Option<bool> {
        if self.accept(TokenType::On).is_some() {
            return Some(true);
        }
        if self.accept_unreserved(TokenType::Off).is_some() {
            return Some(false);
        }
        if self.at_end_of_statement() {
            return Some(true);
        }
        let span = self.peek().span;
        self.report(error!(ExpectedOnOrOff, span));
        None
    }

    /// `Imports a.b, Alias = c.d`
    fn imports(&mut self) -> DeclarationKind {
        self.read();
        let mut imports = vec![];
        loop {
            let start = self.peek().span;
            let alias = if self.peek().is_identifier() && self.peek_ahead(1).is(TokenType::Equals)
            {
                let alias = self.identifier();
                self.read();
                alias
            } else {
                None
            };
            let name = self.type_name();
            imports.push(Import {
                alias,
                name,
                span: self.span_from(start),
            });
            if self.accept(TokenType::Comma).is_none() {
                break;
            }
        }
        DeclarationKind::Imports(imports)
    }

    fn namespace(&mut self, comments: &mut Vec<Comment>) -> DeclarationKind {
        let start = self.read().span;
        let name = self.name(ErrorCode::ExpectedIdentifier);
        self.end_of_statement();
        let header = self.span_from(start);
        comments.extend(self.trailing_comments());
        let (members, end) = self.members(Container::Namespace, header);
        self.close_block(end);
        DeclarationKind::Namespace(name, members)
    }

    // Types

    fn type_declaration(
        &mut self,
        type_kind: TypeKind,
        comments: &mut Vec<Comment>,
    ) -> DeclarationKind {
        let start = self.read().span;
        let name = match self.identifier() {
            Some(name) => name,
            None => {
                self.resync(&[]);
                return DeclarationKind::Malformed;
            }
        };
        let type_parameters = match type_kind {
            TypeKind::Class | TypeKind::Structure | TypeKind::Interface => self.type_parameters(),
            _ => vec![],
        };
        self.end_of_statement();
        let header = self.span_from(start);
        comments.extend(self.trailing_comments());
        let (members, end) = self.members(Container::of(type_kind), header);
        self.close_block(end);
        DeclarationKind::Type(TypeDeclaration {
            type_kind,
            name,
            type_parameters,
            members,
        })
    }

    fn enum_declaration(&mut self, comments: &mut Vec<Comment>) -> DeclarationKind {
        let start = self.read().span;
        let name = match self.identifier() {
            Some(name) => name,
            None => {
                self.resync(&[]);
                return DeclarationKind::Malformed;
            }
        };
        let underlying_type = if self.accept(TokenType::As).is_some() {
            Some(self.type_name())
        } else {
            None
        };
        self.end_of_statement();
        let header = self.span_from(start);
        comments.extend(self.trailing_comments());
        let (members, end) = self.members(Container::Enum, header);
        self.close_block(end);
        DeclarationKind::Enum(EnumDeclaration {
            name,
            underlying_type,
            members,
        })
    }

    fn enum_member(&mut self, start: Span) -> Declaration {
        let attributes = self.attribute_blocks();
        if !self.peek().is_identifier() {
            let span = self.peek().span;
            self.report(error!(InvalidInsideEnum, span));
            self.resync(&[]);
            return Declaration::new(DeclarationKind::Malformed, self.span_from(start));
        }
        let name = match self.identifier() {
            Some(name) => name,
            None => return Declaration::new(DeclarationKind::Malformed, start),
        };
        let value = if self.accept(TokenType::Equals).is_some() {
            Some(self.expression())
        } else {
            None
        };
        let mut declaration = Declaration::new(
            DeclarationKind::EnumMember(EnumMember { name, value }),
            self.span_from(start),
        );
        declaration.attributes = attributes;
        declaration
    }

    /// Field of a legacy user-defined type: `name[(bounds)] As type`.
    fn type_member(&mut self, start: Span) -> Declaration {
        if !self.peek().is_identifier() {
            let span = self.peek().span;
            self.report(error!(InvalidInsideType, span));
            self.resync(&[]);
            return Declaration::new(DeclarationKind::Malformed, self.span_from(start));
        }
        let declarator = self.variable_declarator();
        Declaration::new(
            DeclarationKind::Variables(vec![declarator]),
            self.span_from(start),
        )
    }

    fn type_list(&mut self) -> Vec<TypeName> {
        self.read();
        let mut types = vec![];
        loop {
            types.push(self.type_name());
            if self.accept(TokenType::Comma).is_none() {
                break;
            }
        }
        types
    }

    // Methods

    fn method(
        &mut self,
        container: Container,
        modifiers: &Modifiers,
        comments: &mut Vec<Comment>,
    ) -> DeclarationKind {
        let keyword = self.read();
        let function = keyword.is(TokenType::Function);
        let (method_kind, name) = if !function && self.at(TokenType::New) {
            let new = self.read();
            (MethodKind::Constructor, simple_name(&new))
        } else if function {
            (MethodKind::Function, self.identifier())
        } else {
            (MethodKind::Sub, self.identifier())
        };
        let name = match name {
            Some(name) => name,
            None => {
                self.resync(&[]);
                return DeclarationKind::Malformed;
            }
        };
        let type_parameters = self.type_parameters();
        let parameters = self.parameter_list();
        let (return_type, return_attributes) =
            if function && self.accept(TokenType::As).is_some() {
                let attributes = self.attribute_blocks();
                (Some(self.type_name()), attributes)
            } else {
                (None, vec![])
            };
        let handles = if self.accept(TokenType::Handles).is_some() {
            let mut events = vec![];
            loop {
                events.push(self.postfix());
                if self.accept(TokenType::Comma).is_none() {
                    break;
                }
            }
            events
        } else {
            vec![]
        };
        let implements = self.implements_clause();
        self.end_of_statement();
        let header = self.span_from(keyword.span);
        comments.extend(self.trailing_comments());
        let body = if has_body(container, modifiers) {
            let kind = if function {
                BlockKind::Function
            } else {
                BlockKind::Sub
            };
            let (block, end) = self.statement_block(kind, header);
            self.close_block(end);
            Some(block)
        } else {
            None
        };
        DeclarationKind::Method(Method {
            method_kind,
            name,
            type_parameters,
            parameters,
            return_type,
            return_attributes,
            handles,
            implements,
            body,
        })
    }

    /// `(parameters)` if present.
    pub(super) fn parameter_list(&mut self) -> Vec<Parameter> {
        if !self.at(TokenType::LeftParenthesis) {
            return vec![];
        }
        self.read();
        let mut parameters = vec![];
        if self.accept(TokenType::RightParenthesis).is_some() {
            return parameters;
        }
        loop {
            if let Some(parameter) = self.parameter() {
                parameters.push(parameter);
            }
            if self.accept(TokenType::Comma).is_none() {
                break;
            }
        }
        self.close_parenthesis();
        parameters
    }

    fn parameter(&mut self) -> Option<Parameter> {
        let start = self.peek().span;
        let attributes = self.attribute_blocks();
        let mut modifiers = Modifiers::default();
        loop {
            let span = self.peek().span;
            let kind = match self.peek_type() {
                TokenType::ByVal => ModifierKind::ByVal,
                TokenType::ByRef => ModifierKind::ByRef,
                TokenType::Optional => ModifierKind::Optional,
                TokenType::ParamArray => ModifierKind::ParamArray,
                _ => break,
            };
            self.read();
            modifiers.list.push(Modifier { kind, span });
        }
        let name = match self.identifier() {
            Some(name) => name,
            None => {
                self.resync(&[TokenType::Comma, TokenType::RightParenthesis]);
                return None;
            }
        };
        let is_array = self.at(TokenType::LeftParenthesis)
            && self.peek_ahead(1).is(TokenType::RightParenthesis);
        if is_array {
            self.read();
            self.read();
        }
        let type_name = if self.accept(TokenType::As).is_some() {
            Some(self.type_name())
        } else {
            None
        };
        let default = if self.accept(TokenType::Equals).is_some() {
            Some(self.expression())
        } else {
            None
        };
        Some(Parameter {
            attributes,
            modifiers,
            name,
            is_array,
            type_name,
            default,
            span: self.span_from(start),
        })
    }

    fn implements_clause(&mut self) -> Vec<Name> {
        let mut names = vec![];
        if self.accept(TokenType::Implements).is_some() {
            loop {
                names.push(self.name(ErrorCode::ExpectedIdentifier));
                if self.accept(TokenType::Comma).is_none() {
                    break;
                }
            }
        }
        names
    }

    fn operator(&mut self, comments: &mut Vec<Comment>) -> DeclarationKind {
        let keyword = self.read();
        if !self.dialect.operators {
            self.not_supported(TokenType::Operator, keyword.span);
        }
        if self.at_end_of_statement() || self.at(TokenType::LeftParenthesis) {
            let span = self.peek().span;
            self.report(error!(SyntaxError, span));
            self.resync(&[]);
            return DeclarationKind::Malformed;
        }
        let operator: Rc<str> = Rc::from(self.read().to_string());
        let parameters = self.parameter_list();
        let return_type = if self.accept(TokenType::As).is_some() {
            Some(self.type_name())
        } else {
            None
        };
        self.end_of_statement();
        let header = self.span_from(keyword.span);
        comments.extend(self.trailing_comments());
        let (body, end) = self.statement_block(BlockKind::Operator, header);
        self.close_block(end);
        DeclarationKind::Operator(Operator {
            operator,
            parameters,
            return_type,
            body,
        })
    }

    fn delegate(&mut self) -> DeclarationKind {
        self.read();
        let method_kind = match self.peek_type() {
            TokenType::Sub => MethodKind::Sub,
            TokenType::Function => MethodKind::Function,
            _ => {
                let span = self.peek().span;
                self.report(error!(ExpectedSubOrFunction, span));
                self.resync(&[]);
                return DeclarationKind::Malformed;
            }
        };
        self.read();
        let name = match self.identifier() {
            Some(name) => name,
            None => {
                self.resync(&[]);
                return DeclarationKind::Malformed;
            }
        };
        let type_parameters = self.type_parameters();
        let parameters = self.parameter_list();
        let return_type = if method_kind == MethodKind::Function
            && self.accept(TokenType::As).is_some()
        {
            Some(self.type_name())
        } else {
            None
        };
        DeclarationKind::Delegate(Delegate {
            method_kind,
            name,
            type_parameters,
            parameters,
            return_type,
        })
    }

    /// `Declare [Ansi|Unicode|Auto] Sub|Function name Lib "lib" [Alias "alias"] (...)`
    fn external(&mut self) -> DeclarationKind {
        self.read();
        let charset = match self.peek().unreserved() {
            Some(TokenType::Ansi) => Some(Charset::Ansi),
            Some(TokenType::Unicode) => Some(Charset::Unicode),
            Some(TokenType::Auto) => Some(Charset::Auto),
            _ => None,
        };
        if charset.is_some() {
            self.read();
        }
        let method_kind = match self.peek_type() {
            TokenType::Sub => MethodKind::Sub,
            TokenType::Function => MethodKind::Function,
            _ => {
                let span = self.peek().span;
                self.report(error!(ExpectedSubOrFunction, span));
                self.resync(&[]);
                return DeclarationKind::Malformed;
            }
        };
        self.read();
        let name = self.identifier();
        if self.expect(TokenType::Lib, ErrorCode::ExpectedLib).is_none() {
            self.resync(&[]);
            return DeclarationKind::Malformed;
        }
        let library = self.string_literal();
        let alias = if self.accept(TokenType::Alias).is_some() {
            match self.string_literal() {
                Some(alias) => Some(alias),
                None => {
                    self.resync(&[]);
                    return DeclarationKind::Malformed;
                }
            }
        } else {
            None
        };
        let (name, library) = match (name, library) {
            (Some(name), Some(library)) => (name, library),
            _ => {
                self.resync(&[]);
                return DeclarationKind::Malformed;
            }
        };
        let parameters = self.parameter_list();
        let return_type = if method_kind == MethodKind::Function
            && self.accept(TokenType::As).is_some()
        {
            Some(self.type_name())
        } else {
            None
        };
        DeclarationKind::External(External {
            method_kind,
            charset,
            name,
            library,
            alias,
            parameters,
            return_type,
        })
    }

    pub(super) fn string_literal(&mut self) -> Option<Rc<str>> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::StringLiteral(value) => {
                self.read();
                Some(value)
            }
            _ => {
                self.report(error!(ExpectedStringLiteral, token.span));
                None
            }
        }
    }

    // Properties and events

    fn property(
        &mut self,
        container: Container,
        modifiers: &Modifiers,
        comments: &mut Vec<Comment>,
    ) -> DeclarationKind {
        let keyword = self.read();
        if matches!(
            self.peek_type(),
            TokenType::Get | TokenType::Let | TokenType::Set
        ) {
            return self.property_procedure(keyword, comments);
        }
        if !self.dialect.vb71 && !self.dialect.vb80 {
            let span = self.peek().span;
            self.report(error!(ExpectedAccessor, span));
            self.resync(&[]);
            return DeclarationKind::Malformed;
        }
        let name = match self.identifier() {
            Some(name) => name,
            None => {
                self.resync(&[]);
                return DeclarationKind::Malformed;
            }
        };
        let parameters = self.parameter_list();
        let property_type = if self.accept(TokenType::As).is_some() {
            Some(self.type_name())
        } else {
            None
        };
        let implements = self.implements_clause();
        self.end_of_statement();
        let header = self.span_from(keyword.span);
        comments.extend(self.trailing_comments());
        let accessors = if has_body(container, modifiers) {
            let accessors = self.accessor_list(BlockKind::Property, header);
            let readable = accessors
                .iter()
                .any(|a| a.accessor_kind == AccessorKind::Get);
            if !readable && !modifiers.contains(ModifierKind::WriteOnly) {
                self.report_always(error!(PropertyWithoutGet, name.span));
            }
            accessors
        } else {
            vec![]
        };
        DeclarationKind::Property(Property {
            name,
            parameters,
            property_type,
            implements,
            accessors,
        })
    }

    /// Legacy `Property Get|Let|Set name(...)` with its own body. Procedures
    /// of one property are merged once the member list is complete.
    fn property_procedure(
        &mut self,
        keyword: Token,
        comments: &mut Vec<Comment>,
    ) -> DeclarationKind {
        let accessor = self.read();
        let accessor_kind = match accessor.token_type() {
            TokenType::Get => AccessorKind::Get,
            TokenType::Let => AccessorKind::Let,
            _ => AccessorKind::Set,
        };
        if !self.dialect.property_procedures {
            self.report_always(error!(
                ObsoletePropertyProcedure,
                keyword.span.to(accessor.span)
            ));
        }
        let name = match self.identifier() {
            Some(name) => name,
            None => {
                self.resync(&[]);
                return DeclarationKind::Malformed;
            }
        };
        let parameters = self.parameter_list();
        let property_type =
            if accessor_kind == AccessorKind::Get && self.accept(TokenType::As).is_some() {
                Some(self.type_name())
            } else {
                None
            };
        self.end_of_statement();
        let header = self.span_from(keyword.span);
        comments.extend(self.trailing_comments());
        let (body, end) = self.statement_block(BlockKind::PropertyProcedure, header);
        self.close_block(end);
        let mut index = parameters.clone();
        if accessor_kind != AccessorKind::Get {
            index.pop();
        }
        DeclarationKind::Property(Property {
            name,
            parameters: index,
            property_type,
            implements: vec![],
            accessors: vec![Accessor {
                accessor_kind,
                attributes: vec![],
                modifiers: Modifiers::default(),
                parameters,
                body,
                span: header,
                comments: vec![],
            }],
        })
    }

    /// Folds the `Get`, `Let` and `Set` procedures of each legacy property
    /// into the first declaration of that name.
    fn merge_property_procedures(&mut self, members: &mut Vec<Declaration>) {
        if !self.dialect.property_procedures {
            return;
        }
        let mut merged: Vec<Declaration> = Vec::with_capacity(members.len());
        for declaration in members.drain(..) {
            if let DeclarationKind::Property(procedure) = &declaration.kind {
                let existing = merged.iter_mut().find_map(|d| match &mut d.kind {
                    DeclarationKind::Property(p) if p.name.matches(&procedure.name) => Some(p),
                    _ => None,
                });
                if let Some(existing) = existing {
                    trace!(name = %procedure.name, "merge property procedure");
                    if existing.property_type.is_none() {
                        existing.property_type = procedure.property_type.clone();
                    }
                    existing.accessors.extend(procedure.accessors.iter().cloned());
                    continue;
                }
            }
            merged.push(declaration);
        }
        *members = merged;
    }

    fn event(&mut self, custom: Option<Token>, comments: &mut Vec<Comment>) -> DeclarationKind {
        if let Some(custom) = &custom {
            if !self.dialect.custom_events {
                self.not_supported(TokenType::Custom, custom.span);
            }
        }
        self.read();
        let name = match self.identifier() {
            Some(name) => name,
            None => {
                self.resync(&[]);
                return DeclarationKind::Malformed;
            }
        };
        let (parameters, event_type) = if self.accept(TokenType::As).is_some() {
            (vec![], Some(self.type_name()))
        } else {
            (self.parameter_list(), None)
        };
        let implements = self.implements_clause();
        let accessors = match custom {
            Some(custom) => {
                self.end_of_statement();
                let header = self.span_from(custom.span);
                comments.extend(self.trailing_comments());
                Some(self.accessor_list(BlockKind::Event, header))
            }
            None => None,
        };
        DeclarationKind::Event(Event {
            name,
            parameters,
            event_type,
            implements,
            accessors,
        })
    }

    /// Accessors of a property or custom event, through its `End`.
    fn accessor_list(&mut self, list: BlockKind, header: Span) -> Vec<Accessor> {
        let (starts, code): (&[TokenType], ErrorCode) = if list == BlockKind::Event {
            (
                &[
                    TokenType::AddHandler,
                    TokenType::RemoveHandler,
                    TokenType::RaiseEvent,
                ],
                ErrorCode::ExpectedEventAccessor,
            )
        } else {
            (
                &[TokenType::Get, TokenType::Set],
                ErrorCode::ExpectedAccessor,
            )
        };
        self.push_block(list);
        let mut accessors = vec![];
        let end = loop {
            self.skip_separators();
            match self.boundary(list, header) {
                Boundary::Item => {
                    self.begin_statement();
                    if self.at(TokenType::Comment) {
                        self.trailing_comments();
                        continue;
                    }
                    if !self.at_accessor(starts) {
                        if self.at_member_declaration() {
                            break self.unwind(list, header);
                        }
                        let span = self.peek().span;
                        self.report(Diagnostic::new(code, span));
                        self.resync(&[]);
                        continue;
                    }
                    accessors.push(self.accessor());
                    self.end_of_statement();
                    let comments = self.trailing_comments();
                    if let Some(accessor) = accessors.last_mut() {
                        accessor.comments.extend(comments);
                    }
                }
                Boundary::Skipped => {}
                Boundary::Stop(end) => break end,
            }
        };
        self.pop_block(list);
        self.close_block(end);
        accessors
    }

    /// Whether an accessor keyword follows any attributes and modifiers.
    fn at_accessor(&mut self, starts: &[TokenType]) -> bool {
        let mut n = 0;
        while modifier_kind(self.peek_ahead(n).token_type(), false).is_some() {
            n += 1;
        }
        if n == 0 && self.at(TokenType::LessThan) {
            return true;
        }
        starts.contains(&self.peek_ahead(n).token_type())
    }

    fn accessor(&mut self) -> Accessor {
        let start = self.peek().span;
        let attributes = self.attribute_blocks();
        let modifiers = self.modifiers();
        let keyword = self.read();
        let (accessor_kind, block) = match keyword.token_type() {
            TokenType::Get => (AccessorKind::Get, BlockKind::Get),
            TokenType::Set => (AccessorKind::Set, BlockKind::Set),
            TokenType::AddHandler => (AccessorKind::AddHandler, BlockKind::AddHandler),
            TokenType::RemoveHandler => (AccessorKind::RemoveHandler, BlockKind::RemoveHandler),
            _ => (AccessorKind::RaiseEvent, BlockKind::RaiseEvent),
        };
        let parameters = self.parameter_list();
        self.end_of_statement();
        let span = self.span_from(start);
        let comments = self.trailing_comments();
        let (body, end) = self.statement_block(block, span);
        self.close_block(end);
        Accessor {
            accessor_kind,
            attributes,
            modifiers,
            parameters,
            body,
            span,
            comments,
        }
    }

    // Variables

    /// Fields, locals and constants declared after `modifiers`.
    pub(super) fn variables(
        &mut self,
        start: Span,
        attributes: Vec<Attribute>,
        modifiers: Modifiers,
    ) -> Declaration {
        let kind = self.variable_kind(&modifiers);
        Declaration {
            kind,
            attributes,
            modifiers,
            span: self.span_from(start),
            comments: vec![],
        }
    }

    fn variable_kind(&mut self, modifiers: &Modifiers) -> DeclarationKind {
        let declarators = self.variable_declarators();
        if modifiers.contains(ModifierKind::Const) {
            DeclarationKind::Constants(declarators)
        } else {
            DeclarationKind::Variables(declarators)
        }
    }

    pub(super) fn variable_declarators(&mut self) -> Vec<VariableDeclarator> {
        let mut declarators = vec![];
        loop {
            declarators.push(self.variable_declarator());
            if self.accept(TokenType::Comma).is_none() {
                break;
            }
        }
        declarators
    }

    /// `a, b As T = value`. Legacy declarators name exactly one variable.
    fn variable_declarator(&mut self) -> VariableDeclarator {
        let start = self.peek().span;
        let mut names = vec![];
        loop {
            match self.variable_name() {
                Some(name) => names.push(name),
                None => break,
            }
            if self.dialect.vb6
                || !self.at(TokenType::Comma)
                || !self.peek_ahead(1).is_identifier()
            {
                break;
            }
            self.read();
        }
        let mut type_name = None;
        let mut is_new = false;
        let mut new_arguments = None;
        if self.accept(TokenType::As).is_some() {
            if self.accept(TokenType::New).is_some() {
                is_new = true;
                type_name = Some(self.non_array_type_name());
                if self.at(TokenType::LeftParenthesis) {
                    new_arguments = Some(self.arguments(false));
                }
            } else {
                type_name = Some(self.type_name());
            }
        }
        let initializer = if self.accept(TokenType::Equals).is_some() {
            Some(self.expression())
        } else {
            None
        };
        VariableDeclarator {
            names,
            type_name,
            new_arguments,
            is_new,
            initializer,
            span: self.span_from(start),
        }
    }

    fn variable_name(&mut self) -> Option<VariableName> {
        let name = self.identifier()?;
        let array_bounds = if self.at(TokenType::LeftParenthesis) {
            Some(self.arguments(true))
        } else {
            None
        };
        let span = self.span_from(name.span);
        Some(VariableName {
            name,
            array_bounds,
            span,
        })
    }
}

fn modifier_kind(token_type: TokenType, vb6: bool) -> Option<ModifierKind> {
    use ModifierKind as M;
    use TokenType as T;
    let kind = match token_type {
        T::Public => M::Public,
        T::Private => M::Private,
        T::Protected => M::Protected,
        T::Friend => M::Friend,
        T::Shared => M::Shared,
        T::Shadows => M::Shadows,
        T::Overloads => M::Overloads,
        T::Overrides => M::Overrides,
        T::Overridable => M::Overridable,
        T::NotOverridable => M::NotOverridable,
        T::MustOverride => M::MustOverride,
        T::MustInherit => M::MustInherit,
        T::NotInheritable => M::NotInheritable,
        T::Partial => M::Partial,
        T::ReadOnly => M::ReadOnly,
        T::WriteOnly => M::WriteOnly,
        T::Default => M::Default,
        T::WithEvents => M::WithEvents,
        T::Widening => M::Widening,
        T::Narrowing => M::Narrowing,
        T::Dim => M::Dim,
        T::Static => M::Static,
        T::Const => M::Const,
        T::Global if vb6 => M::Global,
        _ => return None,
    };
    Some(kind)
}

/// `Custom`, reserved as a contextual keyword or not.
fn is_custom(token: &Token) -> bool {
    token.is_unreserved(TokenType::Custom)
        || matches!(token.identifier(), Some(ident) if !ident.escaped && ident.text.eq_ignore_ascii_case("custom"))
}

/// Interface members and `MustOverride` methods have no body.
fn has_body(container: Container, modifiers: &Modifiers) -> bool {
    container != Container::Interface && !modifiers.contains(ModifierKind::MustOverride)
}
