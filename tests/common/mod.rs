#![allow(dead_code)]

use vbfront::lang::ast::*;
use vbfront::lang::{
    parse_expression, parse_file, parse_statement, parse_type_name, ErrorCode, LanguageVersion,
    ParseOptions, Parsed,
};

pub const VB6: LanguageVersion = LanguageVersion::VB6;
pub const VB71: LanguageVersion = LanguageVersion::VB71;
pub const VB80: LanguageVersion = LanguageVersion::VB80;
pub const DIALECTS: [LanguageVersion; 3] = [VB6, VB71, VB80];

pub fn options(version: LanguageVersion) -> ParseOptions {
    ParseOptions::default().with_version(version)
}

pub fn codes<T>(parsed: &Parsed<T>) -> Vec<ErrorCode> {
    parsed.diagnostics.iter().map(|d| d.code).collect()
}

pub fn file(source: &str, version: LanguageVersion) -> Parsed<File> {
    parse_file(source, &options(version))
}

pub fn statement(source: &str, version: LanguageVersion) -> Parsed<Statement> {
    parse_statement(source, &options(version))
}

/// Expression rendered by `render`, or the diagnostics when it fails.
pub fn expr(source: &str, version: LanguageVersion) -> Result<String, Vec<ErrorCode>> {
    let parsed = parse_expression(source, &options(version));
    if parsed.is_ok() {
        Ok(render(&parsed.tree))
    } else {
        Err(codes(&parsed))
    }
}

pub fn type_name(source: &str, version: LanguageVersion) -> Result<String, Vec<ErrorCode>> {
    let parsed = parse_type_name(source, &options(version));
    if parsed.is_ok() {
        Ok(render_type(&parsed.tree))
    } else {
        Err(codes(&parsed))
    }
}

/// Fully parenthesized text of an expression.
pub fn render(expr: &Expression) -> String {
    use ExpressionKind::*;
    match &expr.kind {
        Literal(literal) => render_literal(literal),
        Name(name) => name.text.to_string(),
        Me => "Me".to_string(),
        MyBase => "MyBase".to_string(),
        MyClass => "MyClass".to_string(),
        Global => "Global".to_string(),
        Parenthesized(inner) => format!("[{}]", render(inner)),
        MemberAccess(target, name) => format!("{}.{}", target_text(target), name.text),
        DictionaryAccess(target, name) => format!("{}!{}", target_text(target), name.text),
        GenericQualified(target, types) => {
            format!("{}(Of {})", render(target), render_types(types))
        }
        CallOrIndex(target, arguments) => {
            format!("{}({})", render(target), render_arguments(arguments))
        }
        New(new) => {
            let mut s = format!("New {}", render_type(&new.type_name));
            if let Some(arguments) = &new.arguments {
                s.push_str(&format!("({})", render_arguments(arguments)));
            }
            if let Some(initializer) = &new.initializer {
                s.push_str(&format!(" {}", render(initializer)));
            }
            s
        }
        ArrayInitializer(elements) => {
            let elements: Vec<String> = elements.iter().map(render).collect();
            format!("{{{}}}", elements.join(", "))
        }
        Cast(operator, operand, target) => format!(
            "({:?} {} {})",
            operator,
            render(operand),
            render_type(target)
        ),
        IntrinsicCast(target, operand) => format!("({:?} {})", target, render(operand)),
        TypeOf(operand, target) => format!("(TypeOf {} {})", render(operand), render_type(target)),
        GetType(target) => format!("(GetType {})", render_type(target)),
        AddressOf(operand) => format!("(AddressOf {})", render(operand)),
        Unary(operator, operand) => {
            let operator = match operator {
                UnaryOperator::Plus => "+",
                UnaryOperator::Negate => "-",
                UnaryOperator::Not => "Not ",
            };
            format!("({}{})", operator, render(operand))
        }
        Binary(operator, left, right) => {
            format!("({} {} {})", render(left), operator, render(right))
        }
        Malformed => "?".to_string(),
    }
}

fn target_text(target: &Option<Box<Expression>>) -> String {
    target.as_ref().map_or(String::new(), |t| render(t))
}

fn render_literal(literal: &Literal) -> String {
    match literal {
        Literal::Boolean(true) => "True".to_string(),
        Literal::Boolean(false) => "False".to_string(),
        Literal::Integer(l) => l.value.to_string(),
        Literal::UnsignedInteger(l) => l.value.to_string(),
        Literal::FloatingPoint(l) => l.value.to_string(),
        Literal::Decimal(l) => l.value.to_string(),
        Literal::Character(c) => format!("{:?}", c),
        Literal::String(s) => format!("{:?}", s),
        Literal::Date(d) => format!("#{}#", d),
        Literal::Nothing => "Nothing".to_string(),
    }
}

fn render_arguments(arguments: &[Argument]) -> String {
    let arguments: Vec<String> = arguments
        .iter()
        .map(|argument| {
            let value = argument.value.as_ref().map_or(String::new(), render);
            match &argument.name {
                Some(name) => format!("{} := {}", name.text, value),
                None => value,
            }
        })
        .collect();
    arguments.join(", ")
}

fn render_types(types: &[TypeName]) -> String {
    let types: Vec<String> = types.iter().map(render_type).collect();
    types.join(", ")
}

pub fn render_type(type_name: &TypeName) -> String {
    match &type_name.kind {
        TypeNameKind::Intrinsic(intrinsic) => format!("{:?}", intrinsic),
        TypeNameKind::Named(name) => name.to_string(),
        TypeNameKind::Constructed(name, arguments) => {
            format!("{}(Of {})", name, render_types(arguments))
        }
        TypeNameKind::Array(element, rank) => {
            format!("{}({})", render_type(element), ",".repeat(rank - 1))
        }
        TypeNameKind::FixedLengthString(length) => format!("String * {}", render(length)),
        TypeNameKind::Malformed => "?".to_string(),
    }
}
