//! Syntax tree.
//!
//! Every node carries the [`Span`] it was parsed from. Sum types carry an
//! explicit `Malformed` variant where the parser had to give up on a
//! construct; a tree with malformed nodes always comes with diagnostics.

mod decl;
mod expr;
mod stmt;

pub use decl::*;
pub use expr::*;
pub use stmt::*;

use super::token::TypeCharacter;
use super::Span;
use std::rc::Rc;

/// A whole source file.
#[derive(Debug, Clone, PartialEq)]
pub struct File {
    pub declarations: Vec<Declaration>,
    pub span: Span,
}

/// Line or `REM` comment attached to the node on the same line.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub text: Rc<str>,
    pub is_rem: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimpleName {
    pub text: Rc<str>,
    pub escaped: bool,
    pub type_character: Option<TypeCharacter>,
    pub span: Span,
}

impl SimpleName {
    /// Case-insensitive comparison of spellings.
    pub fn matches(&self, other: &SimpleName) -> bool {
        self.text.to_lowercase() == other.text.to_lowercase()
    }
}

impl std::fmt::Display for SimpleName {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.escaped {
            write!(f, "[{}]", self.text)
        } else {
            write!(f, "{}", self.text)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Name {
    pub kind: NameKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NameKind {
    Simple(SimpleName),
    Qualified(Box<Name>, SimpleName),
    /// The `Global` namespace root.
    Global,
    Malformed,
}

impl std::fmt::Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match &self.kind {
            NameKind::Simple(name) => write!(f, "{}", name),
            NameKind::Qualified(qualifier, name) => write!(f, "{}.{}", qualifier, name),
            NameKind::Global => write!(f, "Global"),
            NameKind::Malformed => write!(f, "?"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntrinsicType {
    Boolean,
    SByte,
    Byte,
    Short,
    UShort,
    Integer,
    UInteger,
    Long,
    ULong,
    Decimal,
    Single,
    Double,
    Date,
    Char,
    String,
    Object,
    Variant,
    Currency,
}

impl std::fmt::Display for IntrinsicType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeName {
    pub kind: TypeNameKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeNameKind {
    Intrinsic(IntrinsicType),
    Named(Name),
    /// `List(Of T)`
    Constructed(Name, Vec<TypeName>),
    /// `Integer()` or `Integer(,)`; `rank` counts dimensions.
    Array(Box<TypeName>, usize),
    /// `String * 10`
    FixedLengthString(Box<Expression>),
    Malformed,
}

/// `<Target: Name(arguments)>`
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub target: Option<AttributeTarget>,
    pub name: Name,
    pub arguments: Vec<Argument>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeTarget {
    Assembly,
    Module,
}

pub trait Visitor {
    fn visit_file(&mut self, _: &File) {}
    fn visit_declaration(&mut self, _: &Declaration) {}
    fn visit_statement(&mut self, _: &Statement) {}
    fn visit_expression(&mut self, _: &Expression) {}
    fn visit_type_name(&mut self, _: &TypeName) {}
    fn visit_name(&mut self, _: &Name) {}
}

/// Walks children first, then hands the node itself to the visitor.
pub trait AcceptVisitor {
    fn accept<V: Visitor>(&self, visitor: &mut V);
}

impl<T: AcceptVisitor> AcceptVisitor for Vec<T> {
    fn accept<V: Visitor>(&self, visitor: &mut V) {
        for item in self {
            item.accept(visitor);
        }
    }
}

impl<T: AcceptVisitor> AcceptVisitor for Option<T> {
    fn accept<V: Visitor>(&self, visitor: &mut V) {
        if let Some(item) = self {
            item.accept(visitor);
        }
    }
}

impl<T: AcceptVisitor> AcceptVisitor for Box<T> {
    fn accept<V: Visitor>(&self, visitor: &mut V) {
        (**self).accept(visitor);
    }
}

impl AcceptVisitor for File {
    fn accept<V: Visitor>(&self, visitor: &mut V) {
        self.declarations.accept(visitor);
        visitor.visit_file(self)
    }
}

impl AcceptVisitor for Name {
    fn accept<V: Visitor>(&self, visitor: &mut V) {
        if let NameKind::Qualified(qualifier, _) = &self.kind {
            qualifier.accept(visitor);
        }
        visitor.visit_name(self)
    }
}

impl AcceptVisitor for TypeName {
    fn accept<V: Visitor>(&self, visitor: &mut V) {
        use TypeNameKind::*;
        match &self.kind {
            Intrinsic(_) | Malformed => {}
            Named(name) => name.accept(visitor),
            Constructed(name, arguments) => {
                name.accept(visitor);
                arguments.accept(visitor);
            }
            Array(element, _) => element.accept(visitor),
            FixedLengthString(length) => length.accept(visitor),
        }
        visitor.visit_type_name(self)
    }
}

impl AcceptVisitor for Attribute {
    fn accept<V: Visitor>(&self, visitor: &mut V) {
        self.name.accept(visitor);
        self.arguments.accept(visitor);
    }
}
