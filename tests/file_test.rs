mod common;
use common::*;
use vbfront::lang::ast::*;
use vbfront::lang::{parse_file, ConstantValue, ErrorCode, Terminator};

const LEGACY_MODULE: &str = r#"Option Explicit
Private Type Point
    X As Long
    Y As Long
End Type
Private Declare Function GetTickCount Lib "kernel32" () As Long
Dim count As Integer

Public Function Area(ByVal w As Long, ByVal h As Long) As Long
    Area = w * h
End Function

Sub Main()
    Dim p As Point
    If count > 0 Then
        MsgBox "Hello", 1
    ElseIf count < 0 Then
        count = 0
    Else
        Set obj = Nothing
    End If
    For i = 1 To 10
        count = count + i
    Next i
    While count > 0
        count = count - 1
    Wend
    Select Case count
    Case 1, 2
        p.X = 1
    Case Else
        p.Y = 2
    End Select
    On Error Resume Next
    GoSub Done
    Exit Sub
Done:
    Return
End Sub
"#;

const SHAPES: &str = r#"Option Strict On
Imports System
Imports System.Collections.Generic

Namespace Shapes
#Region "Contracts"
    Public Interface IShape
        Function Area() As Double
    End Interface
#End Region

    Public Class Circle
        Implements IShape

        Private _radius As Double

        Public Sub New(ByVal radius As Double)
            _radius = radius
        End Sub

        Public Function Area() As Double Implements IShape.Area
            Return Math.PI * _radius ^ 2
        End Function

        Public Property Radius() As Double
            Get
                Return _radius
            End Get
            Set(ByVal value As Double)
                _radius = value
            End Set
        End Property
    End Class

    Public Module Program
        ' Entry point
        Sub Main()
            Dim shapes As New List(Of IShape)
            shapes.Add(New Circle(1.5))
            For Each s As IShape In shapes
                Console.WriteLine(s.Area())
            Next
#If DEBUG Then
            Console.WriteLine("debug")
#End If
            Try
                Dim total As Integer = 0
                total += 1
            Catch ex As Exception
                Console.WriteLine(ex.Message)
            End Try
        End Sub
    End Module
End Namespace
"#;

/// Collects what a walk over the tree meets.
#[derive(Default)]
struct Census {
    methods: Vec<String>,
    calls: Vec<String>,
    statements: usize,
}

impl Visitor for Census {
    fn visit_declaration(&mut self, declaration: &Declaration) {
        if let DeclarationKind::Method(method) = &declaration.kind {
            self.methods.push(method.name.text.to_string());
        }
    }

    fn visit_statement(&mut self, statement: &Statement) {
        self.statements += 1;
        if let StatementKind::Call(call) = &statement.kind {
            let callee = match &call.target.kind {
                ExpressionKind::CallOrIndex(target, _) => render(target),
                _ => render(&call.target),
            };
            self.calls.push(callee);
        }
    }
}

fn census(file: &File) -> Census {
    let mut census = Census::default();
    file.accept(&mut census);
    census
}

#[test]
fn test_legacy_module() {
    let parsed = file(LEGACY_MODULE, VB6);
    assert!(parsed.is_ok(), "{:?}", parsed.diagnostics);
    assert_eq!(parsed.tree.declarations.len(), 6);
    let census = census(&parsed.tree);
    assert_eq!(census.methods, vec!["Area", "Main"]);
    assert_eq!(census.calls, vec!["MsgBox"]);
}

#[test]
fn test_legacy_module_in_dotnet() {
    let parsed = file(LEGACY_MODULE, VB80);
    assert!(!parsed.is_ok());
    assert!(codes(&parsed).contains(&ErrorCode::InvalidOutsideType));
}

#[test]
fn test_shapes() {
    let parsed = file(SHAPES, VB80);
    assert!(parsed.is_ok(), "{:?}", parsed.diagnostics);
    assert_eq!(parsed.tree.declarations.len(), 4);
    assert_eq!(parsed.regions.len(), 1);
    assert_eq!(&*parsed.regions[0].description, "Contracts");
    let census = census(&parsed.tree);
    assert_eq!(census.methods, vec!["Area", "New", "Area", "Main"]);
    assert_eq!(
        census.calls,
        vec!["shapes.Add", "Console.WriteLine", "Console.WriteLine"]
    );
}

#[test]
fn test_shapes_with_debug() {
    let options = options(VB80).with_constant("DEBUG", ConstantValue::Boolean(true));
    let parsed = parse_file(SHAPES, &options);
    assert!(parsed.is_ok(), "{:?}", parsed.diagnostics);
    let census = census(&parsed.tree);
    assert_eq!(census.calls.len(), 4);
    assert!(parsed.constants.contains("Debug"));
}

#[test]
fn test_shapes_in_vb71() {
    let parsed = file(SHAPES, VB71);
    assert_eq!(
        codes(&parsed),
        vec![ErrorCode::NotSupportedInDialect("Of")]
    );
}

#[test]
fn test_recovery() {
    let source = "Module M\nSub A()\nx = (1 +\nEnd Sub\nSub B()\nIf a Then\nEnd Sub\nSub C()\nEnd Sub\nEnd Module\n";
    let parsed = file(source, VB80);
    assert_eq!(
        codes(&parsed),
        vec![
            ErrorCode::ExpectedExpression,
            ErrorCode::ExpectedEnd(Terminator::EndIf)
        ]
    );
    assert_eq!(census(&parsed.tree).methods, vec!["A", "B", "C"]);
}

#[derive(Default)]
struct Expressions(usize);

impl Visitor for Expressions {
    fn visit_expression(&mut self, _: &Expression) {
        self.0 += 1;
    }
}

#[test]
fn test_enum_member_values_are_visited() {
    let parsed = file("Enum Color\nRed = 1\nGreen = Red + 1\nBlue\nEnd Enum\n", VB80);
    assert!(parsed.is_ok(), "{:?}", parsed.diagnostics);
    let mut expressions = Expressions::default();
    parsed.tree.accept(&mut expressions);
    assert_eq!(expressions.0, 4);
}

#[test]
fn test_empty_file() {
    let parsed = file("", VB80);
    assert!(parsed.is_ok());
    assert!(parsed.tree.declarations.is_empty());
    let parsed = file("\n\n' only a comment\n", VB6);
    assert!(parsed.is_ok(), "{:?}", parsed.diagnostics);
}

#[test]
fn test_diagnostic_locations() {
    let parsed = file("Module M\nSub A()\n    x = )\nEnd Sub\nEnd Module\n", VB80);
    assert_eq!(parsed.diagnostics.len(), 1);
    let diagnostic = &parsed.diagnostics[0];
    assert_eq!(diagnostic.code, ErrorCode::ExpectedExpression);
    assert_eq!(diagnostic.span.start.line, 3);
    assert_eq!(diagnostic.span.start.column, 9);
    assert!(diagnostic.to_string().ends_with("at 3:9"));
}
