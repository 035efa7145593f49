//! Constant folding for `#Const` and `#If` expressions.
//!
//! Only literals, named constants, parentheses, intrinsic casts and the
//! unary and binary operators are accepted. Errors are appended to the
//! diagnostics list and the expression yields no value.

use super::ast::{
    BinaryOperator, CastOperator, Expression, ExpressionKind, IntrinsicType, Literal,
    TypeNameKind, UnaryOperator,
};
use super::token::{DecimalValue, TypeCharacter};
use super::{Diagnostic, Dialect, ErrorCode, Span};
use chrono::NaiveDateTime;
use rustc_hash::FxHashMap;
use std::convert::TryFrom;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IntegerType {
    Byte,
    SByte,
    Short,
    UShort,
    Integer,
    UInteger,
    Long,
    ULong,
}

impl IntegerType {
    fn is_unsigned(self) -> bool {
        use IntegerType::*;
        matches!(self, Byte | UShort | UInteger | ULong)
    }

    /// Inclusive range; `Integer` and `Long` are narrower in VB6.
    fn bounds(self, dialect: &Dialect) -> (i128, i128) {
        use IntegerType::*;
        match self {
            Byte => (0, u8::MAX as i128),
            SByte => (i8::MIN as i128, i8::MAX as i128),
            Short => (i16::MIN as i128, i16::MAX as i128),
            UShort => (0, u16::MAX as i128),
            Integer if dialect.vb6 => (i16::MIN as i128, i16::MAX as i128),
            Integer => (i32::MIN as i128, i32::MAX as i128),
            UInteger => (0, u32::MAX as i128),
            Long if dialect.vb6 => (i32::MIN as i128, i32::MAX as i128),
            Long => (i64::MIN as i128, i64::MAX as i128),
            ULong => (0, u64::MAX as i128),
        }
    }

    fn from_intrinsic(t: IntrinsicType) -> Option<IntegerType> {
        Some(match t {
            IntrinsicType::Byte => IntegerType::Byte,
            IntrinsicType::SByte => IntegerType::SByte,
            IntrinsicType::Short => IntegerType::Short,
            IntrinsicType::UShort => IntegerType::UShort,
            IntrinsicType::Integer => IntegerType::Integer,
            IntrinsicType::UInteger => IntegerType::UInteger,
            IntrinsicType::Long => IntegerType::Long,
            IntrinsicType::ULong => IntegerType::ULong,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValue {
    Boolean(bool),
    Integer(i128, IntegerType),
    /// Stored widened; always representable as `f32`.
    Single(f64),
    Double(f64),
    Decimal(DecimalValue),
    Char(char),
    String(Rc<str>),
    Date(NaiveDateTime),
}

impl ConstantValue {
    fn is_textual(&self) -> bool {
        matches!(self, ConstantValue::Char(_) | ConstantValue::String(_))
    }

    fn text(&self) -> String {
        match self {
            ConstantValue::Boolean(true) => "True".to_string(),
            ConstantValue::Boolean(false) => "False".to_string(),
            ConstantValue::Integer(v, _) => v.to_string(),
            ConstantValue::Single(v) | ConstantValue::Double(v) => v.to_string(),
            ConstantValue::Decimal(d) => d.to_string(),
            ConstantValue::Char(c) => c.to_string(),
            ConstantValue::String(s) => s.to_string(),
            ConstantValue::Date(d) => d.format("%-m/%-d/%Y %-I:%M:%S %p").to_string(),
        }
    }
}

impl std::fmt::Display for ConstantValue {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ConstantValue::String(s) => write!(f, "\"{}\"", s),
            ConstantValue::Char(c) => write!(f, "\"{}\"c", c),
            ConstantValue::Date(_) => write!(f, "#{}#", self.text()),
            _ => write!(f, "{}", self.text()),
        }
    }
}

/// Named constants, looked up without regard to case.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstantTable {
    values: FxHashMap<String, (Rc<str>, ConstantValue)>,
}

impl ConstantTable {
    pub fn new() -> ConstantTable {
        ConstantTable::default()
    }

    fn key(name: &str) -> String {
        name.to_lowercase()
    }

    pub fn define(&mut self, name: &str, value: ConstantValue) {
        self.values
            .insert(ConstantTable::key(name), (Rc::from(name), value));
    }

    pub fn remove(&mut self, name: &str) {
        self.values.remove(&ConstantTable::key(name));
    }

    pub fn get(&self, name: &str) -> Option<&ConstantValue> {
        self.values.get(&ConstantTable::key(name)).map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(&ConstantTable::key(name))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Name as first defined, and value.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConstantValue)> {
        self.values.values().map(|(name, v)| (name.as_ref(), v))
    }
}

/// A diagnostic has already been reported.
struct Failed;

type Result<T> = std::result::Result<T, Failed>;

enum Numeric {
    Int(i128, IntegerType),
    Single(f64),
    Double(f64),
    Decimal(DecimalValue),
}

#[derive(Clone, Copy, PartialEq)]
enum NumericKind {
    Int(IntegerType),
    Single,
    Double,
    Decimal,
}

pub struct Evaluator<'a> {
    constants: &'a ConstantTable,
    dialect: Dialect,
    diagnostics: &'a mut Vec<Diagnostic>,
}

impl<'a> Evaluator<'a> {
    pub fn new(
        constants: &'a ConstantTable,
        dialect: Dialect,
        diagnostics: &'a mut Vec<Diagnostic>,
    ) -> Evaluator<'a> {
        Evaluator {
            constants,
            dialect,
            diagnostics,
        }
    }

    /// Folds `expr`. `None` is an absent value, or an error already
    /// reported.
    pub fn evaluate(&mut self, expr: &Expression) -> Option<ConstantValue> {
        self.eval(expr).ok().flatten()
    }

    /// Truth of an `#If` condition; absent and failed values are false.
    pub fn condition(&mut self, expr: &Expression) -> bool {
        match self.eval(expr) {
            Ok(Some(value)) => match self.to_boolean(&value, expr.span) {
                Ok(b) => b,
                Err(Failed) => false,
            },
            _ => false,
        }
    }

    fn fail<T>(&mut self, code: ErrorCode, span: Span) -> Result<T> {
        self.diagnostics.push(Diagnostic::new(code, span));
        Err(Failed)
    }

    fn eval(&mut self, expr: &Expression) -> Result<Option<ConstantValue>> {
        use ExpressionKind::*;
        match &expr.kind {
            Literal(literal) => Ok(self.literal(literal)),
            Name(name) => Ok(self.constants.get(&name.text).cloned()),
            Parenthesized(inner) => self.eval(inner),
            IntrinsicCast(target, operand) => {
                let value = self.operand(operand)?;
                self.cast(value, *target, expr.span).map(Some)
            }
            Cast(CastOperator::CType, operand, type_name) => match type_name.kind {
                TypeNameKind::Intrinsic(target) => {
                    let value = self.operand(operand)?;
                    self.cast(value, target, expr.span).map(Some)
                }
                _ => self.fail(ErrorCode::InvalidConstantExpression, type_name.span),
            },
            Unary(operator, operand) => {
                let value = self.operand(operand)?;
                self.unary(*operator, value, expr.span).map(Some)
            }
            Binary(operator, left, right) => {
                let left = self.operand(left)?;
                let right = self.operand(right)?;
                self.binary(*operator, left, right, expr.span).map(Some)
            }
            _ => self.fail(ErrorCode::InvalidConstantExpression, expr.span),
        }
    }

    /// Operand value, with absent values read as integer zero.
    fn operand(&mut self, expr: &Expression) -> Result<ConstantValue> {
        Ok(self
            .eval(expr)?
            .unwrap_or(ConstantValue::Integer(0, IntegerType::Integer)))
    }

    fn literal(&self, literal: &Literal) -> Option<ConstantValue> {
        Some(match literal {
            Literal::Boolean(b) => ConstantValue::Boolean(*b),
            Literal::Integer(lit) => {
                let value = lit.value as i128;
                let t = match lit.type_character {
                    Some(TypeCharacter::ShortChar) => IntegerType::Short,
                    Some(TypeCharacter::IntegerSymbol) | Some(TypeCharacter::IntegerChar) => {
                        IntegerType::Integer
                    }
                    Some(TypeCharacter::LongSymbol) | Some(TypeCharacter::LongChar) => {
                        IntegerType::Long
                    }
                    _ => {
                        let (min, max) = IntegerType::Integer.bounds(&self.dialect);
                        if min <= value && value <= max {
                            IntegerType::Integer
                        } else {
                            IntegerType::Long
                        }
                    }
                };
                ConstantValue::Integer(value, t)
            }
            Literal::UnsignedInteger(lit) => {
                let t = match lit.type_character {
                    Some(TypeCharacter::UnsignedShortChar) => IntegerType::UShort,
                    Some(TypeCharacter::UnsignedIntegerChar) => IntegerType::UInteger,
                    _ => IntegerType::ULong,
                };
                ConstantValue::Integer(lit.value as i128, t)
            }
            Literal::FloatingPoint(lit) => match lit.type_character {
                Some(TypeCharacter::SingleSymbol) | Some(TypeCharacter::SingleChar) => {
                    ConstantValue::Single(lit.value)
                }
                _ => ConstantValue::Double(lit.value),
            },
            Literal::Decimal(lit) => ConstantValue::Decimal(lit.value),
            Literal::Character(c) => ConstantValue::Char(*c),
            Literal::String(s) => ConstantValue::String(s.clone()),
            Literal::Date(d) => ConstantValue::Date(*d),
            Literal::Nothing => return None,
        })
    }

    fn to_boolean(&mut self, value: &ConstantValue, span: Span) -> Result<bool> {
        Ok(match value {
            ConstantValue::Boolean(b) => *b,
            ConstantValue::Integer(v, _) => *v != 0,
            ConstantValue::Single(v) | ConstantValue::Double(v) => *v != 0.0,
            ConstantValue::Decimal(d) => d.mantissa != 0,
            ConstantValue::String(s) if s.eq_ignore_ascii_case("true") => true,
            ConstantValue::String(s) if s.eq_ignore_ascii_case("false") => false,
            _ => return self.fail(ErrorCode::IllegalOperandInConstantExpression, span),
        })
    }

    fn numeric(&mut self, value: &ConstantValue, span: Span) -> Result<Numeric> {
        Ok(match value {
            ConstantValue::Boolean(b) => {
                Numeric::Int(if *b { -1 } else { 0 }, IntegerType::Integer)
            }
            ConstantValue::Integer(v, t) => Numeric::Int(*v, *t),
            ConstantValue::Single(v) => Numeric::Single(*v),
            ConstantValue::Double(v) => Numeric::Double(*v),
            ConstantValue::Decimal(d) => Numeric::Decimal(*d),
            _ => return self.fail(ErrorCode::IllegalOperandInConstantExpression, span),
        })
    }

    fn check_int(&mut self, value: i128, t: IntegerType, span: Span) -> Result<ConstantValue> {
        let (min, max) = t.bounds(&self.dialect);
        if value < min || value > max {
            return self.fail(ErrorCode::ConstantExpressionOverflow, span);
        }
        Ok(ConstantValue::Integer(value, t))
    }

    fn decimal(&mut self, value: i128, span: Span) -> Result<ConstantValue> {
        match decimal(value) {
            Some(d) => Ok(ConstantValue::Decimal(d)),
            None => self.fail(ErrorCode::ConstantExpressionOverflow, span),
        }
    }

    fn check_float(&mut self, value: f64, kind: NumericKind, span: Span) -> Result<ConstantValue> {
        match kind {
            NumericKind::Single if value.is_finite() && value.abs() <= f32::MAX as f64 => {
                Ok(ConstantValue::Single(value as f32 as f64))
            }
            NumericKind::Double if value.is_finite() => Ok(ConstantValue::Double(value)),
            NumericKind::Decimal => match DecimalValue::from_f64(value) {
                Some(d) => Ok(ConstantValue::Decimal(d)),
                None => self.fail(ErrorCode::ConstantExpressionOverflow, span),
            },
            _ => self.fail(ErrorCode::ConstantExpressionOverflow, span),
        }
    }

    fn unary(&mut self, operator: UnaryOperator, value: ConstantValue, span: Span) -> Result<ConstantValue> {
        if let ConstantValue::Boolean(b) = value {
            if operator == UnaryOperator::Not {
                return Ok(ConstantValue::Boolean(!b));
            }
        }
        let n = self.numeric(&value, span)?;
        match (operator, n) {
            (UnaryOperator::Plus, _) => Ok(value),
            (UnaryOperator::Negate, Numeric::Int(v, t)) => {
                let t = if t.is_unsigned() { signed_for(t) } else { Some(t) };
                match t {
                    Some(t) => self.check_int(-v, t, span),
                    None => self.decimal(-v, span),
                }
            }
            (UnaryOperator::Negate, Numeric::Single(v)) => Ok(ConstantValue::Single(-v)),
            (UnaryOperator::Negate, Numeric::Double(v)) => Ok(ConstantValue::Double(-v)),
            (UnaryOperator::Negate, Numeric::Decimal(d)) => Ok(ConstantValue::Decimal(d.negate())),
            (UnaryOperator::Not, n) => {
                let (v, t) = self.integral(n, span)?;
                let (min, max) = t.bounds(&self.dialect);
                let result = if t.is_unsigned() { max - v + min } else { !v };
                self.check_int(result, t, span)
            }
        }
    }

    /// Integer view of a numeric value; fractional values round to even
    /// and become `Long`.
    fn integral(&mut self, n: Numeric, span: Span) -> Result<(i128, IntegerType)> {
        let float = match n {
            Numeric::Int(v, t) => return Ok((v, t)),
            Numeric::Single(v) | Numeric::Double(v) => v,
            Numeric::Decimal(d) => d.to_f64(),
        };
        let rounded = round_half_even(float);
        let (min, max) = IntegerType::Long.bounds(&self.dialect);
        if !rounded.is_finite() || rounded < min as f64 || rounded > max as f64 {
            return self.fail(ErrorCode::ConstantExpressionOverflow, span);
        }
        Ok((rounded as i128, IntegerType::Long))
    }

    fn binary(
        &mut self,
        operator: BinaryOperator,
        left: ConstantValue,
        right: ConstantValue,
        span: Span,
    ) -> Result<ConstantValue> {
        use BinaryOperator::*;
        if matches!(left, ConstantValue::Date(_)) || matches!(right, ConstantValue::Date(_)) {
            return self.fail(ErrorCode::IllegalOperandInConstantExpression, span);
        }
        if left.is_textual() || right.is_textual() {
            if !(left.is_textual() && right.is_textual()) {
                return self.fail(ErrorCode::IllegalOperandInConstantExpression, span);
            }
            return match operator {
                Concatenate | Plus => Ok(ConstantValue::String(Rc::from(
                    left.text() + &right.text(),
                ))),
                Equals => Ok(ConstantValue::Boolean(left.text() == right.text())),
                NotEquals => Ok(ConstantValue::Boolean(left.text() != right.text())),
                _ => self.fail(ErrorCode::IllegalOperandInConstantExpression, span),
            };
        }
        match operator {
            Concatenate => {
                return Ok(ConstantValue::String(Rc::from(left.text() + &right.text())))
            }
            Is | IsNot | Like | To => {
                return self.fail(ErrorCode::InvalidConstantExpression, span);
            }
            _ => {}
        }
        if let (ConstantValue::Boolean(a), ConstantValue::Boolean(b)) = (&left, &right) {
            let (a, b) = (*a, *b);
            let result = match operator {
                And | AndAlso => Some(a && b),
                Or | OrElse => Some(a || b),
                Xor => Some(a != b),
                Eqv => Some(a == b),
                Imp => Some(!a || b),
                _ => None,
            };
            if let Some(result) = result {
                return Ok(ConstantValue::Boolean(result));
            }
        }
        let a = self.numeric(&left, span)?;
        let b = self.numeric(&right, span)?;
        match operator {
            Equals | NotEquals | LessThan | LessThanEquals | GreaterThan | GreaterThanEquals => {
                let ordering = compare(&a, &b);
                let result = match operator {
                    Equals => ordering == Some(std::cmp::Ordering::Equal),
                    NotEquals => ordering != Some(std::cmp::Ordering::Equal),
                    LessThan => ordering == Some(std::cmp::Ordering::Less),
                    LessThanEquals => ordering != Some(std::cmp::Ordering::Greater),
                    GreaterThan => ordering == Some(std::cmp::Ordering::Greater),
                    _ => ordering != Some(std::cmp::Ordering::Less),
                };
                Ok(ConstantValue::Boolean(result))
            }
            And | AndAlso | Or | OrElse | Xor | Eqv | Imp => {
                let (x, tx) = self.integral(a, span)?;
                let (y, ty) = self.integral(b, span)?;
                let t = match widen(tx, ty) {
                    NumericKind::Int(t) => t,
                    _ => IntegerType::Long,
                };
                let result = match operator {
                    And | AndAlso => x & y,
                    Or | OrElse => x | y,
                    Xor => x ^ y,
                    Eqv => !(x ^ y),
                    _ => !x | y,
                };
                let (min, max) = t.bounds(&self.dialect);
                let result = if t.is_unsigned() {
                    result & max
                } else if result < min || result > max {
                    wrap_signed(result, max)
                } else {
                    result
                };
                self.check_int(result, t, span)
            }
            ShiftLeft | ShiftRight => {
                let (x, t) = self.integral(a, span)?;
                let (count, _) = self.integral(b, span)?;
                let (min, max) = t.bounds(&self.dialect);
                let bits = (max - min + 1).trailing_zeros() as i128;
                let count = (count & (bits - 1)) as u32;
                let result = if operator == ShiftLeft {
                    let shifted = x << count;
                    if t.is_unsigned() {
                        shifted & max
                    } else {
                        wrap_signed(shifted, max)
                    }
                } else {
                    x >> count
                };
                self.check_int(result, t, span)
            }
            Power => {
                let result = to_f64(&a).powf(to_f64(&b));
                self.check_float(result, NumericKind::Double, span)
            }
            Divide => {
                if is_zero(&b) {
                    return self.fail(ErrorCode::ConstantDivisionByZero, span);
                }
                let kind = match common(&a, &b) {
                    NumericKind::Int(_) => NumericKind::Double,
                    kind => kind,
                };
                self.check_float(to_f64(&a) / to_f64(&b), kind, span)
            }
            IntegralDivide => {
                let (x, tx) = self.integral(a, span)?;
                let (y, ty) = self.integral(b, span)?;
                if y == 0 {
                    return self.fail(ErrorCode::ConstantDivisionByZero, span);
                }
                match widen(tx, ty) {
                    NumericKind::Int(t) => self.check_int(x / y, t, span),
                    _ => self.decimal(x / y, span),
                }
            }
            Modulus => {
                if is_zero(&b) {
                    return self.fail(ErrorCode::ConstantDivisionByZero, span);
                }
                match (common(&a, &b), a, b) {
                    (NumericKind::Int(t), Numeric::Int(x, _), Numeric::Int(y, _)) => {
                        self.check_int(x % y, t, span)
                    }
                    (kind, a, b) => self.check_float(to_f64(&a) % to_f64(&b), kind, span),
                }
            }
            Plus | Minus | Multiply => self.arithmetic(operator, a, b, span),
            _ => self.fail(ErrorCode::InvalidConstantExpression, span),
        }
    }

    fn arithmetic(&mut self, operator: BinaryOperator, a: Numeric, b: Numeric, span: Span) -> Result<ConstantValue> {
        let kind = common(&a, &b);
        match (kind, &a, &b) {
            (NumericKind::Int(t), Numeric::Int(x, _), Numeric::Int(y, _)) => {
                let result = match operator {
                    BinaryOperator::Plus => x.checked_add(*y),
                    BinaryOperator::Minus => x.checked_sub(*y),
                    _ => x.checked_mul(*y),
                };
                match result {
                    Some(v) => self.check_int(v, t, span),
                    None => self.fail(ErrorCode::ConstantExpressionOverflow, span),
                }
            }
            (NumericKind::Decimal, _, _) => {
                let x = to_decimal(&a);
                let y = to_decimal(&b);
                let result = match (x, y) {
                    (Some(x), Some(y)) => match operator {
                        BinaryOperator::Plus => decimal_add(x, y),
                        BinaryOperator::Minus => decimal_add(x, y.negate()),
                        _ => decimal_mul(x, y),
                    },
                    _ => None,
                };
                match result {
                    Some(d) => Ok(ConstantValue::Decimal(d)),
                    None => self.fail(ErrorCode::ConstantExpressionOverflow, span),
                }
            }
            (kind, a, b) => {
                let (x, y) = (to_f64(a), to_f64(b));
                let result = match operator {
                    BinaryOperator::Plus => x + y,
                    BinaryOperator::Minus => x - y,
                    _ => x * y,
                };
                self.check_float(result, kind, span)
            }
        }
    }

    fn cast(&mut self, value: ConstantValue, target: IntrinsicType, span: Span) -> Result<ConstantValue> {
        if let Some(t) = IntegerType::from_intrinsic(target) {
            return match &value {
                ConstantValue::Boolean(b) => {
                    let (_, max) = t.bounds(&self.dialect);
                    let v = match (*b, t.is_unsigned()) {
                        (false, _) => 0,
                        (true, true) => max,
                        (true, false) => -1,
                    };
                    Ok(ConstantValue::Integer(v, t))
                }
                ConstantValue::String(s) => match s.trim().parse::<f64>() {
                    Ok(v) => {
                        let (min, max) = t.bounds(&self.dialect);
                        let v = round_half_even(v);
                        if v < min as f64 || v > max as f64 {
                            self.fail(ErrorCode::ConstantExpressionOverflow, span)
                        } else {
                            Ok(ConstantValue::Integer(v as i128, t))
                        }
                    }
                    Err(_) => self.fail(ErrorCode::IllegalOperandInConstantExpression, span),
                },
                _ => {
                    let n = self.numeric(&value, span)?;
                    let (v, _) = self.integral(n, span)?;
                    self.check_int(v, t, span)
                }
            };
        }
        match target {
            IntrinsicType::Boolean => {
                let b = self.to_boolean(&value, span)?;
                Ok(ConstantValue::Boolean(b))
            }
            IntrinsicType::Single | IntrinsicType::Double | IntrinsicType::Decimal => {
                let kind = match target {
                    IntrinsicType::Single => NumericKind::Single,
                    IntrinsicType::Double => NumericKind::Double,
                    _ => NumericKind::Decimal,
                };
                if let ConstantValue::String(s) = &value {
                    return match s.trim().parse::<f64>() {
                        Ok(v) => self.check_float(v, kind, span),
                        Err(_) => self.fail(ErrorCode::IllegalOperandInConstantExpression, span),
                    };
                }
                let n = self.numeric(&value, span)?;
                match (kind, &n) {
                    (NumericKind::Decimal, Numeric::Int(v, _)) => self.decimal(*v, span),
                    (NumericKind::Decimal, Numeric::Decimal(d)) => Ok(ConstantValue::Decimal(*d)),
                    _ => self.check_float(to_f64(&n), kind, span),
                }
            }
            IntrinsicType::Char => match &value {
                ConstantValue::Char(c) => Ok(ConstantValue::Char(*c)),
                ConstantValue::String(s) => match s.chars().next() {
                    Some(c) => Ok(ConstantValue::Char(c)),
                    None => self.fail(ErrorCode::IllegalOperandInConstantExpression, span),
                },
                _ => self.fail(ErrorCode::IllegalOperandInConstantExpression, span),
            },
            IntrinsicType::String => Ok(ConstantValue::String(Rc::from(value.text()))),
            IntrinsicType::Date => match value {
                ConstantValue::Date(d) => Ok(ConstantValue::Date(d)),
                _ => self.fail(ErrorCode::IllegalOperandInConstantExpression, span),
            },
            IntrinsicType::Object | IntrinsicType::Variant => Ok(value),
            _ => self.fail(ErrorCode::InvalidConstantExpression, span),
        }
    }
}

/// Evaluates with a fresh diagnostics list; convenient for tests and tools.
pub fn evaluate(
    expr: &Expression,
    constants: &ConstantTable,
    dialect: Dialect,
) -> (Option<ConstantValue>, Vec<Diagnostic>) {
    let mut diagnostics = vec![];
    let value = Evaluator::new(constants, dialect, &mut diagnostics).evaluate(expr);
    (value, diagnostics)
}

fn signed_for(t: IntegerType) -> Option<IntegerType> {
    match t {
        IntegerType::Byte => Some(IntegerType::Short),
        IntegerType::UShort => Some(IntegerType::Integer),
        IntegerType::UInteger => Some(IntegerType::Long),
        IntegerType::ULong => None,
        t => Some(t),
    }
}

/// Narrowest kind holding both integer types.
fn widen(a: IntegerType, b: IntegerType) -> NumericKind {
    if a == b || a.is_unsigned() == b.is_unsigned() {
        return NumericKind::Int(a.max(b));
    }
    let (signed, unsigned) = if a.is_unsigned() { (b, a) } else { (a, b) };
    match signed_for(unsigned) {
        Some(t) => NumericKind::Int(t.max(signed)),
        None => NumericKind::Decimal,
    }
}

fn common(a: &Numeric, b: &Numeric) -> NumericKind {
    use Numeric::*;
    match (a, b) {
        (Double(_), _) | (_, Double(_)) => NumericKind::Double,
        (Single(_), _) | (_, Single(_)) => NumericKind::Single,
        (Decimal(_), _) | (_, Decimal(_)) => NumericKind::Decimal,
        (Int(_, x), Int(_, y)) => widen(*x, *y),
    }
}

fn to_f64(n: &Numeric) -> f64 {
    match n {
        Numeric::Int(v, _) => *v as f64,
        Numeric::Single(v) | Numeric::Double(v) => *v,
        Numeric::Decimal(d) => d.to_f64(),
    }
}

fn to_decimal(n: &Numeric) -> Option<DecimalValue> {
    match n {
        Numeric::Int(v, _) => decimal(*v),
        Numeric::Decimal(d) => Some(*d),
        Numeric::Single(v) | Numeric::Double(v) => DecimalValue::from_f64(*v),
    }
}

fn is_zero(n: &Numeric) -> bool {
    match n {
        Numeric::Int(v, _) => *v == 0,
        Numeric::Single(v) | Numeric::Double(v) => *v == 0.0,
        Numeric::Decimal(d) => d.mantissa == 0,
    }
}

fn compare(a: &Numeric, b: &Numeric) -> Option<std::cmp::Ordering> {
    match (a, b) {
        (Numeric::Int(x, _), Numeric::Int(y, _)) => Some(x.cmp(y)),
        _ => to_f64(a).partial_cmp(&to_f64(b)),
    }
}

fn decimal(v: i128) -> Option<DecimalValue> {
    let mantissa = v.unsigned_abs();
    if mantissa > DecimalValue::MAX_MANTISSA {
        return None;
    }
    Some(DecimalValue {
        negative: v < 0,
        mantissa,
        scale: 0,
    })
}

fn signed_mantissa(d: DecimalValue) -> Option<i128> {
    let m = i128::try_from(d.mantissa).ok()?;
    Some(if d.negative { -m } else { m })
}

fn normalize(value: i128, mut scale: u8) -> Option<DecimalValue> {
    let mut mantissa = value.unsigned_abs();
    while mantissa > DecimalValue::MAX_MANTISSA && scale > 0 {
        let rem = mantissa % 10;
        mantissa /= 10;
        if rem >= 5 {
            mantissa += 1;
        }
        scale -= 1;
    }
    if mantissa > DecimalValue::MAX_MANTISSA {
        return None;
    }
    Some(DecimalValue {
        negative: value < 0 && mantissa != 0,
        mantissa,
        scale,
    })
}

fn decimal_add(x: DecimalValue, y: DecimalValue) -> Option<DecimalValue> {
    let scale = x.scale.max(y.scale);
    let mut a = signed_mantissa(x)?;
    let mut b = signed_mantissa(y)?;
    a = a.checked_mul(10i128.checked_pow((scale - x.scale) as u32)?)?;
    b = b.checked_mul(10i128.checked_pow((scale - y.scale) as u32)?)?;
    normalize(a.checked_add(b)?, scale)
}

fn decimal_mul(x: DecimalValue, y: DecimalValue) -> Option<DecimalValue> {
    let product = signed_mantissa(x)?.checked_mul(signed_mantissa(y)?)?;
    let mut scale = x.scale as u32 + y.scale as u32;
    let mut value = product;
    while scale > DecimalValue::MAX_SCALE as u32 {
        value /= 10;
        scale -= 1;
    }
    normalize(value, scale as u8)
}

fn round_half_even(v: f64) -> f64 {
    let r = v.round();
    if (v - v.trunc()).abs() == 0.5 && r % 2.0 != 0.0 {
        r - v.signum()
    } else {
        r
    }
}

/// Two's-complement wrap into a signed range whose maximum is `max`.
fn wrap_signed(v: i128, max: i128) -> i128 {
    let modulus = (max + 1) * 2;
    let wrapped = v.rem_euclid(modulus);
    if wrapped > max {
        wrapped - modulus
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::{parse_expression, LanguageVersion, ParseOptions};

    fn eval_in(source: &str, constants: &ConstantTable, version: LanguageVersion) -> (Option<ConstantValue>, Vec<Diagnostic>) {
        let options = ParseOptions::default().with_version(version);
        let parsed = parse_expression(source, &options);
        assert!(parsed.diagnostics.is_empty(), "{:?}", parsed.diagnostics);
        evaluate(&parsed.tree, constants, Dialect::new(version))
    }

    fn eval(source: &str) -> (Option<ConstantValue>, Vec<Diagnostic>) {
        eval_in(source, &ConstantTable::new(), LanguageVersion::VB80)
    }

    fn value(source: &str) -> ConstantValue {
        let (v, d) = eval(source);
        assert!(d.is_empty(), "{:?}", d);
        v.unwrap()
    }

    fn code(source: &str) -> ErrorCode {
        let (v, d) = eval(source);
        assert_eq!(v, None);
        assert_eq!(d.len(), 1, "{:?}", d);
        d[0].code
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(value("1 + 2 * 3"), ConstantValue::Integer(7, IntegerType::Integer));
        assert_eq!(value("7 \\ 2"), ConstantValue::Integer(3, IntegerType::Integer));
        assert_eq!(value("7 Mod 4"), ConstantValue::Integer(3, IntegerType::Integer));
        assert_eq!(value("1 / 4"), ConstantValue::Double(0.25));
        assert_eq!(value("2 ^ 10"), ConstantValue::Double(1024.0));
        assert_eq!(value("-(3)"), ConstantValue::Integer(-3, IntegerType::Integer));
        assert_eq!(value("1 << 4"), ConstantValue::Integer(16, IntegerType::Integer));
    }

    #[test]
    fn test_overflow_and_division() {
        assert_eq!(code("2147483647 + 1"), ErrorCode::ConstantExpressionOverflow);
        assert_eq!(value("2147483647L + 1"), ConstantValue::Integer(2147483648, IntegerType::Long));
        assert_eq!(code("1 / 0"), ErrorCode::ConstantDivisionByZero);
        assert_eq!(code("1 \\ 0"), ErrorCode::ConstantDivisionByZero);
        assert_eq!(code("CByte(300)"), ErrorCode::ConstantExpressionOverflow);
    }

    #[test]
    fn test_strings() {
        assert_eq!(value("\"a\" & \"b\""), ConstantValue::String(Rc::from("ab")));
        assert_eq!(value("\"a\"c + \"b\""), ConstantValue::String(Rc::from("ab")));
        assert_eq!(value("\"a\" = \"a\""), ConstantValue::Boolean(true));
        assert_eq!(value("1 & 2"), ConstantValue::String(Rc::from("12")));
        assert_eq!(code("\"a\" & 1"), ErrorCode::IllegalOperandInConstantExpression);
        assert_eq!(code("\"a\" < \"b\""), ErrorCode::IllegalOperandInConstantExpression);
        assert_eq!(code("#1/1/2000# = #1/1/2000#"), ErrorCode::IllegalOperandInConstantExpression);
    }

    #[test]
    fn test_logic() {
        assert_eq!(value("True And Not False"), ConstantValue::Boolean(true));
        assert_eq!(value("3 And 5"), ConstantValue::Integer(1, IntegerType::Integer));
        assert_eq!(value("Not 0"), ConstantValue::Integer(-1, IntegerType::Integer));
        assert_eq!(value("1 < 2 OrElse False"), ConstantValue::Boolean(true));
    }

    #[test]
    fn test_casts() {
        assert_eq!(value("CInt(2.5)"), ConstantValue::Integer(2, IntegerType::Integer));
        assert_eq!(value("CInt(3.5)"), ConstantValue::Integer(4, IntegerType::Integer));
        assert_eq!(value("CBool(1)"), ConstantValue::Boolean(true));
        assert_eq!(value("CStr(12)"), ConstantValue::String(Rc::from("12")));
        assert_eq!(value("CType(1, Long)"), ConstantValue::Integer(1, IntegerType::Long));
        assert_eq!(value("CByte(True)"), ConstantValue::Integer(255, IntegerType::Byte));
        assert_eq!(code("CType(1, Foo)"), ErrorCode::InvalidConstantExpression);
    }

    #[test]
    fn test_absent_is_zero() {
        let constants = ConstantTable::new();
        let (v, d) = eval_in("UNDEFINED + 1", &constants, LanguageVersion::VB80);
        assert!(d.is_empty());
        assert_eq!(v, Some(ConstantValue::Integer(1, IntegerType::Integer)));
        let (v, _) = eval_in("UNDEFINED", &constants, LanguageVersion::VB80);
        assert_eq!(v, None);
    }

    #[test]
    fn test_lookup_ignores_case() {
        let mut constants = ConstantTable::new();
        constants.define("Debug", ConstantValue::Boolean(true));
        let (v, _) = eval_in("DEBUG", &constants, LanguageVersion::VB80);
        assert_eq!(v, Some(ConstantValue::Boolean(true)));
    }

    #[test]
    fn test_evaluation_is_pure() {
        let mut constants = ConstantTable::new();
        constants.define("X", ConstantValue::Integer(5, IntegerType::Integer));
        let first = eval_in("X * 2 + 1", &constants, LanguageVersion::VB80);
        let second = eval_in("X * 2 + 1", &constants, LanguageVersion::VB80);
        assert_eq!(first, second);
        assert_eq!(constants.len(), 1);
    }

    #[test]
    fn test_vb6_integer_width() {
        let constants = ConstantTable::new();
        let (_, d) = eval_in("32767 + 1", &constants, LanguageVersion::VB6);
        assert_eq!(d[0].code, ErrorCode::ConstantExpressionOverflow);
        let (v, d) = eval_in("32767& + 1", &constants, LanguageVersion::VB6);
        assert!(d.is_empty());
        assert_eq!(v, Some(ConstantValue::Integer(32768, IntegerType::Long)));
    }

    #[test]
    fn test_decimal_arithmetic() {
        match value("1.5D + 2") {
            ConstantValue::Decimal(d) => assert_eq!(d.to_string(), "3.5"),
            v => panic!("{:?}", v),
        }
        match value("1.5D * 1.5D") {
            ConstantValue::Decimal(d) => assert_eq!(d.to_string(), "2.25"),
            v => panic!("{:?}", v),
        }
    }
}
