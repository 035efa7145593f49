use super::{AcceptVisitor, Argument, Attribute, Block, Comment, Expression, Visitor};
use super::{Name, SimpleName, TypeName};
use crate::lang::Span;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub kind: DeclarationKind,
    pub attributes: Vec<Attribute>,
    pub modifiers: Modifiers,
    pub span: Span,
    pub comments: Vec<Comment>,
}

impl Declaration {
    pub fn new(kind: DeclarationKind, span: Span) -> Declaration {
        Declaration {
            kind,
            attributes: vec![],
            modifiers: Modifiers::default(),
            span,
            comments: vec![],
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self.kind, DeclarationKind::Malformed)
    }

    /// Name of a named member, for lookups and property merging.
    pub fn name(&self) -> Option<&SimpleName> {
        use DeclarationKind::*;
        match &self.kind {
            Type(t) => Some(&t.name),
            Enum(e) => Some(&e.name),
            EnumMember(m) => Some(&m.name),
            Method(m) => Some(&m.name),
            Property(p) => Some(&p.name),
            Event(e) => Some(&e.name),
            Delegate(d) => Some(&d.name),
            External(e) => Some(&e.name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeclarationKind {
    /// Comment-only line.
    Empty,
    Option(OptionKind),
    Imports(Vec<Import>),
    /// File-level `<Assembly: ...>` block.
    Attributes,
    Namespace(Name, Vec<Declaration>),
    Type(TypeDeclaration),
    Enum(EnumDeclaration),
    EnumMember(EnumMember),
    Inherits(Vec<TypeName>),
    Implements(Vec<TypeName>),
    Method(Method),
    Operator(Operator),
    Property(Property),
    Event(Event),
    Delegate(Delegate),
    External(External),
    /// Field list, `Dim x As Integer, y`.
    Variables(Vec<VariableDeclarator>),
    Constants(Vec<VariableDeclarator>),
    Malformed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionCompare {
    Binary,
    Text,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OptionKind {
    Explicit(bool),
    Strict(bool),
    Compare(OptionCompare),
    Infer(bool),
    Base(i64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    pub alias: Option<SimpleName>,
    pub name: TypeName,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifierKind {
    Public,
    Private,
    Protected,
    Friend,
    Shared,
    Shadows,
    Overloads,
    Overrides,
    Overridable,
    NotOverridable,
    MustOverride,
    MustInherit,
    NotInheritable,
    Partial,
    ReadOnly,
    WriteOnly,
    Default,
    WithEvents,
    Widening,
    Narrowing,
    Dim,
    Static,
    Const,
    Global,
    ByVal,
    ByRef,
    Optional,
    ParamArray,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Modifier {
    pub kind: ModifierKind,
    pub span: Span,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Modifiers {
    pub list: Vec<Modifier>,
}

impl Modifiers {
    pub fn contains(&self, kind: ModifierKind) -> bool {
        self.list.iter().any(|m| m.kind == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn span(&self) -> Option<Span> {
        let first = self.list.first()?;
        let last = self.list.last()?;
        Some(first.span.to(last.span))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    Module,
    Structure,
    Interface,
    /// Legacy user-defined `Type`.
    UserDefined,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDeclaration {
    pub type_kind: TypeKind,
    pub name: SimpleName,
    pub type_parameters: Vec<TypeParameter>,
    pub members: Vec<Declaration>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeParameter {
    pub name: SimpleName,
    pub constraints: Vec<Constraint>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    Type(TypeName),
    New(Span),
    Class(Span),
    Structure(Span),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDeclaration {
    pub name: SimpleName,
    pub underlying_type: Option<TypeName>,
    pub members: Vec<Declaration>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumMember {
    pub name: SimpleName,
    pub value: Option<Expression>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    Sub,
    Function,
    /// `Sub New`
    Constructor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub attributes: Vec<Attribute>,
    pub modifiers: Modifiers,
    pub name: SimpleName,
    /// `x()` declares an array parameter.
    pub is_array: bool,
    pub type_name: Option<TypeName>,
    pub default: Option<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub method_kind: MethodKind,
    pub name: SimpleName,
    pub type_parameters: Vec<TypeParameter>,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<TypeName>,
    pub return_attributes: Vec<Attribute>,
    pub handles: Vec<Expression>,
    pub implements: Vec<Name>,
    /// Absent for interface and `MustOverride` members.
    pub body: Option<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Operator {
    /// Spelling of the overloaded operator, `+`, `CType`, `IsTrue`...
    pub operator: Rc<str>,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<TypeName>,
    pub body: Block,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorKind {
    Get,
    Set,
    /// Legacy `Property Let`.
    Let,
    AddHandler,
    RemoveHandler,
    RaiseEvent,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Accessor {
    pub accessor_kind: AccessorKind,
    pub attributes: Vec<Attribute>,
    pub modifiers: Modifiers,
    pub parameters: Vec<Parameter>,
    pub body: Block,
    pub span: Span,
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: SimpleName,
    pub parameters: Vec<Parameter>,
    pub property_type: Option<TypeName>,
    pub implements: Vec<Name>,
    pub accessors: Vec<Accessor>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub name: SimpleName,
    pub parameters: Vec<Parameter>,
    pub event_type: Option<TypeName>,
    pub implements: Vec<Name>,
    /// Accessors of a `Custom Event`.
    pub accessors: Option<Vec<Accessor>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Delegate {
    pub method_kind: MethodKind,
    pub name: SimpleName,
    pub type_parameters: Vec<TypeParameter>,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<TypeName>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    Ansi,
    Unicode,
    Auto,
}

/// `Declare Function f Lib "x" Alias "y" (...)`
#[derive(Debug, Clone, PartialEq)]
pub struct External {
    pub method_kind: MethodKind,
    pub charset: Option<Charset>,
    pub name: SimpleName,
    pub library: Rc<str>,
    pub alias: Option<Rc<str>>,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<TypeName>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableName {
    pub name: SimpleName,
    /// `x(10)` or `x()`.
    pub array_bounds: Option<Vec<Argument>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclarator {
    pub names: Vec<VariableName>,
    pub type_name: Option<TypeName>,
    /// `As New T(args)`.
    pub new_arguments: Option<Vec<Argument>>,
    pub is_new: bool,
    pub initializer: Option<Expression>,
    pub span: Span,
}

impl AcceptVisitor for Parameter {
    fn accept<V: Visitor>(&self, visitor: &mut V) {
        self.attributes.accept(visitor);
        self.type_name.accept(visitor);
        self.default.accept(visitor);
    }
}

impl AcceptVisitor for Accessor {
    fn accept<V: Visitor>(&self, visitor: &mut V) {
        self.attributes.accept(visitor);
        self.parameters.accept(visitor);
        self.body.accept(visitor);
    }
}

impl AcceptVisitor for VariableDeclarator {
    fn accept<V: Visitor>(&self, visitor: &mut V) {
        for name in &self.names {
            name.array_bounds.accept(visitor);
        }
        self.type_name.accept(visitor);
        self.new_arguments.accept(visitor);
        self.initializer.accept(visitor);
    }
}

impl AcceptVisitor for TypeParameter {
    fn accept<V: Visitor>(&self, visitor: &mut V) {
        for constraint in &self.constraints {
            if let Constraint::Type(t) = constraint {
                t.accept(visitor);
            }
        }
    }
}

impl AcceptVisitor for Declaration {
    fn accept<V: Visitor>(&self, visitor: &mut V) {
        use DeclarationKind::*;
        self.attributes.accept(visitor);
        match &self.kind {
            Empty | Option(_) | Attributes | Malformed => {}
            EnumMember(member) => {
                if let Some(v) = &member.value {
                    v.accept(visitor);
                }
            }
            Imports(imports) => {
                for import in imports {
                    import.name.accept(visitor);
                }
            }
            Namespace(name, members) => {
                name.accept(visitor);
                members.accept(visitor);
            }
            Type(t) => {
                t.type_parameters.accept(visitor);
                t.members.accept(visitor);
            }
            Enum(e) => {
                e.underlying_type.accept(visitor);
                e.members.accept(visitor);
            }
            Inherits(types) | Implements(types) => types.accept(visitor),
            Method(m) => {
                m.type_parameters.accept(visitor);
                m.parameters.accept(visitor);
                m.return_type.accept(visitor);
                m.handles.accept(visitor);
                m.implements.accept(visitor);
                m.body.accept(visitor);
            }
            Operator(o) => {
                o.parameters.accept(visitor);
                o.return_type.accept(visitor);
                o.body.accept(visitor);
            }
            Property(p) => {
                p.parameters.accept(visitor);
                p.property_type.accept(visitor);
                p.implements.accept(visitor);
                p.accessors.accept(visitor);
            }
            Event(e) => {
                e.parameters.accept(visitor);
                e.event_type.accept(visitor);
                e.implements.accept(visitor);
                e.accessors.accept(visitor);
            }
            Delegate(d) => {
                d.type_parameters.accept(visitor);
                d.parameters.accept(visitor);
                d.return_type.accept(visitor);
            }
            External(e) => {
                e.parameters.accept(visitor);
                e.return_type.accept(visitor);
            }
            Variables(vars) | Constants(vars) => vars.accept(visitor),
        }
        visitor.visit_declaration(self)
    }
}
