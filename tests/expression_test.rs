mod common;
use common::*;
use vbfront::lang::ErrorCode;

fn ok(source: &str) -> String {
    expr(source, VB80).unwrap()
}

#[test]
fn test_precedence() {
    assert_eq!(ok("1 + 2 * 3"), "(1 + (2 * 3))");
    assert_eq!(ok("(1 + 2) * 3"), "([(1 + 2)] * 3)");
    assert_eq!(ok("a + b \\ c"), "(a + (b \\ c))");
    assert_eq!(ok("a Mod b * c"), "(a Mod (b * c))");
    assert_eq!(ok("a \\ b * c"), "(a \\ (b * c))");
    assert_eq!(ok("a & b + c"), "(a & (b + c))");
    assert_eq!(ok("1 << 2 + 1"), "(1 << (2 + 1))");
    assert_eq!(ok("a = b & c"), "(a = (b & c))");
    assert_eq!(ok("a Or b And c"), "(a Or (b And c))");
    assert_eq!(ok("a OrElse b AndAlso c"), "(a OrElse (b AndAlso c))");
    assert_eq!(ok("a Xor b Or c"), "(a Xor (b Or c))");
}

#[test]
fn test_left_assoc() {
    assert_eq!(ok("1 - 2 - 3"), "((1 - 2) - 3)");
    assert_eq!(ok("8 / 4 / 2"), "((8 / 4) / 2)");
    assert_eq!(ok("2 ^ 3 ^ 2"), "((2 ^ 3) ^ 2)");
    assert_eq!(ok("a < b = c"), "((a < b) = c)");
}

#[test]
fn test_unary() {
    assert_eq!(ok("-2 ^ 2"), "(-(2 ^ 2))");
    assert_eq!(ok("-a * b"), "((-a) * b)");
    assert_eq!(ok("Not a = b"), "(Not (a = b))");
    assert_eq!(ok("Not a And b"), "((Not a) And b)");
    assert_eq!(ok("--1"), "(-(-1))");
}

#[test]
fn test_legacy_operators() {
    assert_eq!(expr("a Eqv b Imp c", VB6).unwrap(), "((a Eqv b) Imp c)");
    assert_eq!(expr("a Imp b Or c", VB6).unwrap(), "(a Imp (b Or c))");
    assert!(expr("a Eqv b", VB80).is_err());
}

#[test]
fn test_is_not() {
    assert_eq!(expr("x Is Not Nothing", VB6).unwrap(), "(x IsNot Nothing)");
    assert_eq!(expr("x IsNot Nothing", VB80).unwrap(), "(x IsNot Nothing)");
    assert_eq!(expr("x Is Not Nothing", VB80).unwrap(), "(x Is (Not Nothing))");
    assert!(expr("x IsNot Nothing", VB71).is_err());
}

#[test]
fn test_literals() {
    assert_eq!(ok("&HFF"), "255");
    assert_eq!(ok("&O17"), "15");
    assert_eq!(ok("1.5"), "1.5");
    assert_eq!(ok("1E3"), "1000");
    assert_eq!(ok("2.50D"), "2.50");
    assert_eq!(ok("\"a\"\"b\""), "\"a\\\"b\"");
    assert_eq!(ok("\"x\"c"), "'x'");
    assert_eq!(ok("True Or Nothing"), "(True Or Nothing)");
    assert_eq!(ok("#1/2/2000#"), "#2000-01-02 00:00:00#");
}

#[test]
fn test_member_access() {
    assert_eq!(ok("a.b(1).c"), "a.b(1).c");
    assert_eq!(ok("a!b"), "a!b");
    assert_eq!(ok("Me.x + MyBase.y"), "(Me.x + MyBase.y)");
    assert_eq!(ok("a.Next"), "a.Next");
    assert_eq!(ok("Global.System.Console"), "Global.System.Console");
}

#[test]
fn test_arguments() {
    assert_eq!(ok("f()"), "f()");
    assert_eq!(ok("f(1, , y := 2)"), "f(1, , y := 2)");
    assert_eq!(ok("f(a)(b)"), "f(a)(b)");
    assert_eq!(
        expr("f(a := 1, 2)", VB80),
        Err(vec![ErrorCode::ExpectedNamedArgument])
    );
}

#[test]
fn test_casts() {
    assert_eq!(ok("CType(x, Integer)"), "(CType x Integer)");
    assert_eq!(ok("DirectCast(o, System.String)"), "(DirectCast o System.String)");
    assert_eq!(ok("TryCast(o, List(Of Integer))"), "(TryCast o List(Of Integer))");
    assert_eq!(ok("CInt(x + 1)"), "(Integer (x + 1))");
    assert_eq!(expr("CLng(x)", VB6).unwrap(), "(Long x)");
    assert_eq!(
        expr("CType(x)", VB80),
        Err(vec![ErrorCode::ExpectedComma])
    );
}

#[test]
fn test_type_operators() {
    assert_eq!(ok("TypeOf x Is Form"), "(TypeOf x Form)");
    assert_eq!(ok("Not TypeOf x Is Form"), "(Not (TypeOf x Form))");
    assert_eq!(ok("GetType(Integer())"), "(GetType Integer())");
    assert_eq!(ok("AddressOf Me.Handler"), "(AddressOf Me.Handler)");
}

#[test]
fn test_new() {
    assert_eq!(ok("New Collection"), "New Collection");
    assert_eq!(ok("New List(Of String)()"), "New List(Of String)()");
    assert_eq!(ok("New Point(1, 2)"), "New Point(1, 2)");
    assert_eq!(ok("New Integer() {1, 2}"), "New Integer() {1, 2}");
}

#[test]
fn test_array_initializer() {
    assert_eq!(ok("{1, {2, 3}}"), "{1, {2, 3}}");
    assert_eq!(ok("{}"), "{}");
    assert_eq!(
        expr("{1}", VB6),
        Err(vec![ErrorCode::NotSupportedInDialect("{")])
    );
}

#[test]
fn test_generic_name() {
    assert_eq!(ok("Foo(Of Integer)"), "Foo(Of Integer)");
    assert_eq!(
        expr("Foo(Of Integer)", VB71),
        Err(vec![ErrorCode::NotSupportedInDialect("Of")])
    );
}

#[test]
fn test_errors() {
    assert_eq!(expr("1 +", VB80), Err(vec![ErrorCode::ExpectedExpression]));
    assert_eq!(
        expr("(1 + 2", VB80),
        Err(vec![ErrorCode::ExpectedRightParenthesis])
    );
    assert_eq!(expr("1 2", VB80), Err(vec![ErrorCode::ExpectedEndOfStatement]));
    assert_eq!(expr("", VB80), Err(vec![ErrorCode::ExpectedExpression]));
}

#[test]
fn test_type_names() {
    assert_eq!(type_name("Integer", VB80).unwrap(), "Integer");
    assert_eq!(type_name("Integer()", VB80).unwrap(), "Integer()");
    assert_eq!(type_name("String(,)", VB80).unwrap(), "String(,)");
    assert_eq!(type_name("System.IO.File", VB80).unwrap(), "System.IO.File");
    assert_eq!(
        type_name("Dictionary(Of String, List(Of Integer))", VB80).unwrap(),
        "Dictionary(Of String, List(Of Integer))"
    );
    assert_eq!(type_name("String * 10", VB6).unwrap(), "String * 10");
    assert_eq!(type_name("Variant", VB6).unwrap(), "Variant");
    assert_eq!(
        type_name("Variant", VB80),
        Err(vec![ErrorCode::ObsoleteVariant])
    );
    assert_eq!(
        type_name("String * 10", VB80),
        Err(vec![ErrorCode::ObsoleteFixedLengthString])
    );
    assert_eq!(type_name("1", VB80), Err(vec![ErrorCode::ExpectedType]));
}
