use super::*;
use crate::lang::ast::*;

const VB6: LanguageVersion = LanguageVersion::VB6;
const VB71: LanguageVersion = LanguageVersion::VB71;
const VB80: LanguageVersion = LanguageVersion::VB80;

fn only(block: Block) -> StatementKind {
    assert_eq!(block.len(), 1, "{:?}", block);
    block.into_iter().next().map(|s| s.kind).unwrap()
}

fn callee_name(target: &Expression) -> String {
    match &target.kind {
        ExpressionKind::Name(name) => name.text.to_string(),
        ExpressionKind::CallOrIndex(callee, _) => callee_name(callee),
        kind => panic!("{:?}", kind),
    }
}

#[test]
fn test_implicit_call() {
    let (block, codes) = body("MsgBox \"Hello\", 1", VB6);
    assert!(codes.is_empty(), "{:?}", codes);
    match only(block) {
        StatementKind::Call(call) => {
            assert!(call.implicit);
            assert!(!call.call_keyword);
            assert_eq!(callee_name(&call.target), "MsgBox");
            match call.target.kind {
                ExpressionKind::CallOrIndex(_, arguments) => assert_eq!(arguments.len(), 2),
                kind => panic!("{:?}", kind),
            }
        }
        kind => panic!("{:?}", kind),
    }
}

#[test]
fn test_parenthesized_call_arguments() {
    let (_, codes) = body("Foo(1, 2)", VB6);
    assert_eq!(codes, vec![ErrorCode::ParenthesizedCallArguments]);
    let (_, codes) = body("Foo (1, 2)", VB6);
    assert_eq!(codes, vec![ErrorCode::ParenthesizedCallArguments]);
    let (block, codes) = body("Foo (1), 2", VB6);
    assert!(codes.is_empty(), "{:?}", codes);
    match only(block) {
        StatementKind::Call(call) => assert!(call.implicit),
        kind => panic!("{:?}", kind),
    }
    let (_, codes) = body("Foo(1)", VB6);
    assert!(codes.is_empty(), "{:?}", codes);
}

#[test]
fn test_legacy_index_assignment() {
    for source in &["a(1) = 2", "a (1) = 2"] {
        let (block, codes) = body(source, VB6);
        assert!(codes.is_empty(), "{:?}", codes);
        match only(block) {
            StatementKind::Assignment(assignment) => {
                assert!(matches!(
                    assignment.target.kind,
                    ExpressionKind::CallOrIndex(..)
                ));
                assert_eq!(assignment.operator, AssignmentOperator::Assign);
            }
            kind => panic!("{:?}", kind),
        }
    }
}

#[test]
fn test_call_needs_parentheses_in_dotnet() {
    let (block, codes) = body("Call Foo(1, 2)", VB80);
    assert!(codes.is_empty(), "{:?}", codes);
    match only(block) {
        StatementKind::Call(call) => assert!(call.call_keyword && !call.implicit),
        kind => panic!("{:?}", kind),
    }
    let (_, codes) = body("Foo(1, 2)", VB80);
    assert!(codes.is_empty(), "{:?}", codes);
    let (_, codes) = body("Foo 1", VB80);
    assert_eq!(codes, vec![ErrorCode::ExpectedEndOfStatement]);
}

#[test]
fn test_assignment_keywords() {
    let (block, codes) = body("Set x = y", VB6);
    assert!(codes.is_empty(), "{:?}", codes);
    match only(block) {
        StatementKind::Assignment(assignment) => {
            assert_eq!(assignment.keyword, Some(AssignmentKeyword::Set))
        }
        kind => panic!("{:?}", kind),
    }
    let (block, codes) = body("Set x = y", VB80);
    assert_eq!(codes, vec![ErrorCode::ObsoleteLetSetAssignment]);
    assert!(matches!(only(block), StatementKind::Assignment(_)));
    let (_, codes) = body("Let x", VB6);
    assert_eq!(codes, vec![ErrorCode::ExpectedEquals]);
}

#[test]
fn test_compound_assignment() {
    let (block, codes) = body("x += 1", VB80);
    assert!(codes.is_empty(), "{:?}", codes);
    match only(block) {
        StatementKind::Assignment(assignment) => {
            assert_eq!(assignment.operator, AssignmentOperator::Plus)
        }
        kind => panic!("{:?}", kind),
    }
}

#[test]
fn test_mid_assignment() {
    let (block, codes) = body("Mid(s, 1, 1) = \"a\"", VB6);
    assert!(codes.is_empty(), "{:?}", codes);
    match only(block) {
        StatementKind::MidAssignment(arguments, _) => assert_eq!(arguments.len(), 3),
        kind => panic!("{:?}", kind),
    }
}

#[test]
fn test_block_if() {
    let source = "If a Then\nb = 1\nElseIf c Then\nb = 2\nb = 3\nElse\nb = 4\nEnd If";
    let (block, codes) = body(source, VB80);
    assert!(codes.is_empty(), "{:?}", codes);
    match only(block) {
        StatementKind::If(s) => {
            assert_eq!(s.then_block.len(), 1);
            assert_eq!(s.else_ifs.len(), 1);
            assert_eq!(s.else_ifs[0].block.len(), 2);
            assert_eq!(s.else_block.map(|e| e.block.len()), Some(1));
        }
        kind => panic!("{:?}", kind),
    }
}

#[test]
fn test_line_if() {
    let (block, codes) = body("If a Then b = 1 : c = 2 Else d = 3", VB80);
    assert!(codes.is_empty(), "{:?}", codes);
    match only(block) {
        StatementKind::LineIf(s) => {
            assert_eq!(s.then_statements.len(), 2);
            assert_eq!(s.else_statements.map(|b| b.len()), Some(1));
        }
        kind => panic!("{:?}", kind),
    }
    let (block, codes) = body("If a Then 100", VB6);
    assert!(codes.is_empty(), "{:?}", codes);
    match only(block) {
        StatementKind::LineIf(s) => match &s.then_statements[0].kind {
            StatementKind::GoTo(Label::Number(100, _)) => {}
            kind => panic!("{:?}", kind),
        },
        kind => panic!("{:?}", kind),
    }
}

#[test]
fn test_then_is_optional_in_dotnet() {
    let (_, codes) = body("If a\nEnd If", VB80);
    assert!(codes.is_empty(), "{:?}", codes);
    let (_, codes) = body("If a\nEnd If", VB6);
    assert_eq!(codes, vec![ErrorCode::ExpectedThen]);
}

#[test]
fn test_missing_end_unwinds() {
    let (block, codes) = body("If a Then\nb = 1", VB80);
    assert_eq!(codes, vec![ErrorCode::ExpectedEnd(Terminator::EndIf)]);
    assert!(matches!(only(block), StatementKind::If(_)));
    let (_, codes) = body("For i = 1 To 2\nDo\nNext", VB80);
    assert_eq!(codes, vec![ErrorCode::ExpectedEnd(Terminator::Loop)]);
}

#[test]
fn test_end_without_begin() {
    let (block, errors) = body("Loop\nx = 1", VB80);
    assert_eq!(errors, vec![ErrorCode::EndWithoutBegin(Terminator::Loop)]);
    assert!(matches!(only(block), StatementKind::Assignment(_)));
    let parsed = statement("End If", VB80);
    assert_eq!(codes(&parsed), vec![ErrorCode::EndWithoutBegin(Terminator::EndIf)]);
    assert!(parsed.tree.is_malformed());
}

#[test]
fn test_while_terminators() {
    let (block, codes) = body("While a\nWend", VB6);
    assert!(codes.is_empty(), "{:?}", codes);
    match only(block) {
        StatementKind::While(s) => assert!(s.wend),
        kind => panic!("{:?}", kind),
    }
    let (_, codes) = body("While a\nWend", VB80);
    assert_eq!(codes, vec![ErrorCode::ObsoleteWend]);
    let (_, codes) = body("While a\nEnd While", VB6);
    assert_eq!(codes, vec![ErrorCode::NotSupportedInDialect("End While")]);
    let (_, codes) = body("If a Then\nEndIf", VB80);
    assert_eq!(codes, vec![ErrorCode::ObsoleteEndIf]);
}

#[test]
fn test_shared_next() {
    let source = "For i = 1 To 2\nFor j = 1 To 2\nx = i * j\nNext j, i\ny = 1";
    let (block, codes) = body(source, VB6);
    assert!(codes.is_empty(), "{:?}", codes);
    assert_eq!(block.len(), 2);
    match &block[0].kind {
        StatementKind::For(outer) => {
            assert!(outer.next_variable.is_some());
            assert_eq!(outer.block.len(), 1);
            match &outer.block[0].kind {
                StatementKind::For(inner) => assert_eq!(inner.block.len(), 1),
                kind => panic!("{:?}", kind),
            }
        }
        kind => panic!("{:?}", kind),
    }
    let (_, codes) = body("For i = 1 To 2\nNext i, j", VB6);
    assert_eq!(codes, vec![ErrorCode::EndWithoutBegin(Terminator::Next)]);
}

#[test]
fn test_shared_next_closes_every_loop() {
    let parsed = file("Sub S()\nFor i = 1 To 2\nFor j = 1 To 2\nNext j, i\nEnd Sub\n", VB6);
    assert!(parsed.is_ok(), "{:?}", parsed.diagnostics);

    let source = "For i = 1 To 2\nFor Each j In c\nFor k = 1 To 2\nNext k, j, i\ny = 1";
    let (block, codes) = body(source, VB6);
    assert!(codes.is_empty(), "{:?}", codes);
    assert_eq!(block.len(), 2);
    match &block[0].kind {
        StatementKind::For(outer) => match &outer.block[0].kind {
            StatementKind::ForEach(middle) => {
                assert!(middle.next_variable.is_some());
                assert!(matches!(middle.block[0].kind, StatementKind::For(_)));
            }
            kind => panic!("{:?}", kind),
        },
        kind => panic!("{:?}", kind),
    }
}

#[test]
fn test_select_case() {
    let source = "Select Case x\nCase 1, 2\ny = 1\nCase Is > 3\nCase 4 To 5\nCase Else\ny = 2\nEnd Select";
    let (block, codes) = body(source, VB80);
    assert!(codes.is_empty(), "{:?}", codes);
    match only(block) {
        StatementKind::Select(s) => {
            assert_eq!(s.cases.len(), 4);
            assert_eq!(s.cases[0].clauses.len(), 2);
            assert!(matches!(
                s.cases[1].clauses[0],
                CaseClause::Relational(BinaryOperator::GreaterThan, _)
            ));
            match &s.cases[2].clauses[0] {
                CaseClause::Expression(e) => assert!(matches!(
                    e.kind,
                    ExpressionKind::Binary(BinaryOperator::To, ..)
                )),
                clause => panic!("{:?}", clause),
            }
            assert!(s.cases[3].is_else);
        }
        kind => panic!("{:?}", kind),
    }
    let (_, codes) = body("Select Case x\ny = 1\nCase 1\nEnd Select", VB80);
    assert_eq!(codes, vec![ErrorCode::StatementBeforeCase]);
    let (_, codes) = body("Select Case x\nCase Else\nCase 1\nEnd Select", VB80);
    assert_eq!(codes, vec![ErrorCode::CaseAfterCaseElse]);
}

#[test]
fn test_try() {
    let source = "Try\nx = 1\nCatch e As Exception When e IsNot Nothing\nFinally\nx = 2\nEnd Try";
    let (block, codes) = body(source, VB80);
    assert!(codes.is_empty(), "{:?}", codes);
    match only(block) {
        StatementKind::Try(s) => {
            assert_eq!(s.block.len(), 1);
            assert_eq!(s.catches.len(), 1);
            assert!(s.catches[0].when.is_some());
            assert!(s.finally.is_some());
        }
        kind => panic!("{:?}", kind),
    }
    let (_, codes) = body("Try\nFinally\nCatch\nEnd Try", VB71);
    assert_eq!(codes, vec![ErrorCode::CatchAfterFinally]);
}

#[test]
fn test_try_in_vb6() {
    let (block, codes) = body("Try\nFoo\nEnd Try", VB6);
    assert_eq!(codes.len(), 1, "{:?}", codes);
    assert!(matches!(codes[0], ErrorCode::NotSupportedInDialect(_)));
    assert!(matches!(only(block), StatementKind::Try(_)));
    let (block, codes) = body("Try = 1", VB6);
    assert!(codes.is_empty(), "{:?}", codes);
    assert!(matches!(only(block), StatementKind::Assignment(_)));
}

#[test]
fn test_labels() {
    let (block, codes) = body("10 x = 1", VB6);
    assert!(codes.is_empty(), "{:?}", codes);
    assert!(matches!(block[0].kind, StatementKind::Label(Label::Number(10, _))));
    assert!(matches!(block[1].kind, StatementKind::Assignment(_)));
    let (_, codes) = body("10 x = 1", VB80);
    assert_eq!(codes, vec![ErrorCode::ObsoleteLineNumber]);
    let (block, codes) = body("10: x = 1\nRetry: x = 2", VB80);
    assert!(codes.is_empty(), "{:?}", codes);
    assert_eq!(block.len(), 4);
    match &block[2].kind {
        StatementKind::Label(Label::Name(name)) => assert_eq!(&*name.text, "Retry"),
        kind => panic!("{:?}", kind),
    }
}

#[test]
fn test_legacy_statements() {
    let (_, codes) = body("GoSub 10\nReturn", VB6);
    assert!(codes.is_empty(), "{:?}", codes);
    let (_, codes) = body("GoSub 10", VB80);
    assert_eq!(codes, vec![ErrorCode::ObsoleteGoSub]);
    let (_, codes) = body("On x GoTo 10, 20", VB80);
    assert_eq!(codes, vec![ErrorCode::ObsoleteOnGoToGoSub]);
    let (_, codes) = body("Error 5", VB80);
    assert_eq!(codes, vec![ErrorCode::ObsoleteErrorStatement]);
    let (_, codes) = body("Return 1", VB6);
    assert_eq!(codes, vec![ErrorCode::ExpectedEndOfStatement]);
}

#[test]
fn test_on_error() {
    let (block, codes) = body("On Error GoTo 0\nOn Error GoTo -1\nOn Error Resume Next\nOn Error GoTo Handler", VB80);
    assert!(codes.is_empty(), "{:?}", codes);
    let kinds: Vec<_> = block
        .into_iter()
        .map(|s| match s.kind {
            StatementKind::OnError(on_error) => on_error,
            kind => panic!("{:?}", kind),
        })
        .collect();
    assert_eq!(kinds[0], OnError::GoToZero);
    assert_eq!(kinds[1], OnError::GoToMinusOne);
    assert_eq!(kinds[2], OnError::ResumeNext);
    assert!(matches!(kinds[3], OnError::GoTo(Label::Name(_))));
}

#[test]
fn test_redim() {
    let (block, codes) = body("ReDim Preserve a(10), b(1 To 5, 2)", VB6);
    assert!(codes.is_empty(), "{:?}", codes);
    match only(block) {
        StatementKind::ReDim(redim) => {
            assert!(redim.preserve);
            assert_eq!(redim.clauses.len(), 2);
        }
        kind => panic!("{:?}", kind),
    }
    let (_, codes) = body("ReDim a", VB80);
    assert_eq!(codes, vec![ErrorCode::ExpectedLeftParenthesis]);
}

#[test]
fn test_exit_and_continue() {
    let (block, codes) = body("Exit Sub", VB80);
    assert!(codes.is_empty(), "{:?}", codes);
    assert_eq!(only(block), StatementKind::Exit(ExitKind::Sub));
    let (_, codes) = body("Exit", VB80);
    assert_eq!(codes, vec![ErrorCode::ExpectedExitKind]);
    let (_, codes) = body("Do\nContinue\nLoop", VB80);
    assert_eq!(codes, vec![ErrorCode::ExpectedContinueKind]);
}

#[test]
fn test_with_member_access() {
    let (block, codes) = body("With x\n.y = 1\n!z = 2\nEnd With", VB80);
    assert!(codes.is_empty(), "{:?}", codes);
    match only(block) {
        StatementKind::With(_, block) => {
            assert_eq!(block.len(), 2);
            match &block[0].kind {
                StatementKind::Assignment(a) => {
                    assert!(matches!(a.target.kind, ExpressionKind::MemberAccess(None, _)))
                }
                kind => panic!("{:?}", kind),
            }
        }
        kind => panic!("{:?}", kind),
    }
}

#[test]
fn test_local_declarations() {
    let (block, codes) = body("Dim a, b As Integer, c As New Collection\nConst d = 1", VB80);
    assert!(codes.is_empty(), "{:?}", codes);
    match &block[0].kind {
        StatementKind::LocalDeclaration(d) => match &d.kind {
            DeclarationKind::Variables(declarators) => {
                assert_eq!(declarators.len(), 2);
                assert_eq!(declarators[0].names.len(), 2);
                assert!(declarators[1].is_new);
            }
            kind => panic!("{:?}", kind),
        },
        kind => panic!("{:?}", kind),
    }
    match &block[1].kind {
        StatementKind::LocalDeclaration(d) => {
            assert!(matches!(d.kind, DeclarationKind::Constants(_)))
        }
        kind => panic!("{:?}", kind),
    }
}

#[test]
fn test_member_order() {
    let parsed = file("Imports System\nOption Strict On\n", VB80);
    assert_eq!(codes(&parsed), vec![ErrorCode::OptionStatementWrongOrder]);
    let source = "Class C\nSub A()\nEnd Sub\nInherits B\nEnd Class\n";
    let parsed = file(source, VB80);
    assert_eq!(codes(&parsed), vec![ErrorCode::InheritsStatementWrongOrder]);
    let parsed = file("Module M\nInherits B\nEnd Module\n", VB80);
    assert_eq!(codes(&parsed), vec![ErrorCode::InheritsNotValidHere]);
}

#[test]
fn test_placement() {
    let parsed = file("Sub A()\nEnd Sub\n", VB80);
    assert_eq!(codes(&parsed), vec![ErrorCode::InvalidOutsideType]);
    let parsed = file("Sub A()\nEnd Sub\n", VB6);
    assert!(parsed.is_ok());
    let parsed = file("x = 1\n", VB80);
    assert_eq!(codes(&parsed), vec![ErrorCode::InvalidOutsideMethod]);
    let parsed = file("Interface I\nDim x As Integer\nEnd Interface\n", VB80);
    assert_eq!(codes(&parsed), vec![ErrorCode::InvalidInsideInterface]);
}

#[test]
fn test_unterminated_method() {
    let (decls, codes) = members("Sub A()\nx = 1\nSub B()\nEnd Sub", VB80);
    assert_eq!(codes, vec![ErrorCode::ExpectedEnd(Terminator::EndSub)]);
    assert_eq!(decls.len(), 2);
}

#[test]
fn test_methods() {
    let source = "Public Function F(ByVal a As Integer, Optional b As String = \"x\") As Long\nReturn a\nEnd Function\nSub New()\nEnd Sub";
    let (decls, codes) = members(source, VB80);
    assert!(codes.is_empty(), "{:?}", codes);
    match &decls[0].kind {
        DeclarationKind::Method(method) => {
            assert_eq!(method.method_kind, MethodKind::Function);
            assert_eq!(method.parameters.len(), 2);
            assert!(method.parameters[1].default.is_some());
            assert!(method.return_type.is_some());
            assert_eq!(method.body.as_ref().map(|b| b.len()), Some(1));
        }
        kind => panic!("{:?}", kind),
    }
    assert!(decls[0].modifiers.contains(ModifierKind::Public));
    match &decls[1].kind {
        DeclarationKind::Method(method) => {
            assert_eq!(method.method_kind, MethodKind::Constructor)
        }
        kind => panic!("{:?}", kind),
    }
}

#[test]
fn test_interface_members_have_no_body() {
    let source = "Interface I\nSub A()\nFunction B() As Integer\nProperty C As Integer\nEnd Interface\n";
    let parsed = file(source, VB80);
    assert!(parsed.is_ok(), "{:?}", parsed.diagnostics);
    match &parsed.tree.declarations[0].kind {
        DeclarationKind::Type(t) => {
            assert_eq!(t.type_kind, TypeKind::Interface);
            assert_eq!(t.members.len(), 3);
        }
        kind => panic!("{:?}", kind),
    }
}

#[test]
fn test_properties() {
    let source = "Property P As Integer\nGet\nReturn 1\nEnd Get\nSet(value As Integer)\nEnd Set\nEnd Property";
    let (decls, codes) = members(source, VB80);
    assert!(codes.is_empty(), "{:?}", codes);
    match &decls[0].kind {
        DeclarationKind::Property(p) => assert_eq!(p.accessors.len(), 2),
        kind => panic!("{:?}", kind),
    }
    let source = "Property P As Integer\nSet(value As Integer)\nEnd Set\nEnd Property";
    let (_, codes) = members(source, VB80);
    assert_eq!(codes, vec![ErrorCode::PropertyWithoutGet]);
    let source = "WriteOnly Property P As Integer\nSet(value As Integer)\nEnd Set\nEnd Property";
    let (_, codes) = members(source, VB80);
    assert!(codes.is_empty(), "{:?}", codes);
}

#[test]
fn test_property_procedures() {
    let source = "Property Get P() As Integer\nP = 1\nEnd Property\nProperty Let P(v As Integer)\nEnd Property";
    let (decls, codes) = members(source, VB6);
    assert!(codes.is_empty(), "{:?}", codes);
    assert_eq!(decls.len(), 1);
    match &decls[0].kind {
        DeclarationKind::Property(p) => {
            assert_eq!(p.accessors.len(), 2);
            assert_eq!(p.accessors[1].accessor_kind, AccessorKind::Let);
            assert!(p.property_type.is_some());
            assert!(p.parameters.is_empty());
        }
        kind => panic!("{:?}", kind),
    }
    let (_, codes) = members("Property Get P() As Integer\nEnd Property", VB80);
    assert_eq!(codes, vec![ErrorCode::ObsoletePropertyProcedure]);
    let (_, codes) = members("Property P As Integer", VB6);
    assert_eq!(codes, vec![ErrorCode::ExpectedAccessor]);
}

#[test]
fn test_custom_event() {
    let source = "Custom Event E As EventHandler\nAddHandler(ByVal h As EventHandler)\nEnd AddHandler\nRemoveHandler(ByVal h As EventHandler)\nEnd RemoveHandler\nRaiseEvent(ByVal s As Object, ByVal e As EventArgs)\nEnd RaiseEvent\nEnd Event";
    let (decls, codes) = members(source, VB80);
    assert!(codes.is_empty(), "{:?}", codes);
    match &decls[0].kind {
        DeclarationKind::Event(e) => {
            assert!(e.event_type.is_some());
            assert_eq!(e.accessors.as_ref().map(|a| a.len()), Some(3));
        }
        kind => panic!("{:?}", kind),
    }
    let (decls, codes) = members("Event Changed(ByVal x As Integer)", VB80);
    assert!(codes.is_empty(), "{:?}", codes);
    match &decls[0].kind {
        DeclarationKind::Event(e) => {
            assert_eq!(e.parameters.len(), 1);
            assert!(e.accessors.is_none());
        }
        kind => panic!("{:?}", kind),
    }
}

#[test]
fn test_user_defined_type() {
    let source = "Private Type Point\nX As Long\nY(1 To 2) As Long\nEnd Type\n";
    let parsed = file(source, VB6);
    assert!(parsed.is_ok(), "{:?}", parsed.diagnostics);
    match &parsed.tree.declarations[0].kind {
        DeclarationKind::Type(t) => {
            assert_eq!(t.type_kind, TypeKind::UserDefined);
            assert_eq!(t.members.len(), 2);
        }
        kind => panic!("{:?}", kind),
    }
    let parsed = file("Type Point\nX As Long\nEnd Type\n", VB80);
    assert_eq!(codes(&parsed), vec![ErrorCode::ObsoleteType]);
}

#[test]
fn test_enum() {
    let source = "Enum Color\nRed = 1\nGreen\nEnd Enum\n";
    let parsed = file(source, VB6);
    assert!(parsed.is_ok(), "{:?}", parsed.diagnostics);
    match &parsed.tree.declarations[0].kind {
        DeclarationKind::Enum(e) => {
            assert_eq!(e.members.len(), 2);
            assert!(matches!(
                &e.members[0].kind,
                DeclarationKind::EnumMember(EnumMember { value: Some(_), .. })
            ));
        }
        kind => panic!("{:?}", kind),
    }
    let (decls, codes) = members("Enum E\nA\nSub F()\nEnd Sub", VB80);
    assert_eq!(codes, vec![ErrorCode::ExpectedEnd(Terminator::EndEnum)]);
    assert_eq!(decls.len(), 2);
}

#[test]
fn test_declare() {
    let source = "Private Declare Function GetTickCount Lib \"kernel32\" Alias \"GetTickCount\" () As Long\n";
    let parsed = file(source, VB6);
    assert!(parsed.is_ok(), "{:?}", parsed.diagnostics);
    match &parsed.tree.declarations[0].kind {
        DeclarationKind::External(e) => {
            assert_eq!(&*e.library, "kernel32");
            assert_eq!(e.alias.as_deref(), Some("GetTickCount"));
            assert_eq!(e.method_kind, MethodKind::Function);
        }
        kind => panic!("{:?}", kind),
    }
}

#[test]
fn test_attributes() {
    let source = "<Assembly: CLSCompliant(True)>\n<Serializable()> Public Class C\nEnd Class\n";
    let parsed = file(source, VB80);
    assert!(parsed.is_ok(), "{:?}", parsed.diagnostics);
    assert!(matches!(
        parsed.tree.declarations[0].kind,
        DeclarationKind::Attributes
    ));
    assert_eq!(parsed.tree.declarations[1].attributes.len(), 1);
    let parsed = file("<Foo> Sub A()\nEnd Sub\n", VB6);
    assert_eq!(
        codes(&parsed),
        vec![ErrorCode::NotSupportedInDialect("attributes")]
    );
}

#[test]
fn test_namespace_and_imports() {
    let source = "Imports IO = System.IO\nNamespace A.B\nClass C(Of T)\nEnd Class\nEnd Namespace\n";
    let parsed = file(source, VB80);
    assert!(parsed.is_ok(), "{:?}", parsed.diagnostics);
    match &parsed.tree.declarations[0].kind {
        DeclarationKind::Imports(imports) => assert!(imports[0].alias.is_some()),
        kind => panic!("{:?}", kind),
    }
    match &parsed.tree.declarations[1].kind {
        DeclarationKind::Namespace(name, decls) => {
            assert_eq!(name.to_string(), "A.B");
            assert_eq!(decls.len(), 1);
        }
        kind => panic!("{:?}", kind),
    }
}

#[test]
fn test_comments_attach() {
    let parsed = statement("x = 1 ' note", VB80);
    assert!(parsed.is_ok(), "{:?}", parsed.diagnostics);
    assert_eq!(parsed.tree.comments.len(), 1);
    assert_eq!(parsed.tree.comments[0].text.trim(), "note");
    assert!(!parsed.tree.comments[0].is_rem);
}

#[test]
fn test_one_error_per_statement() {
    let (block, codes) = body("x = (1 +\ny = 2", VB80);
    assert_eq!(codes.len(), 1, "{:?}", codes);
    assert_eq!(block.len(), 2);
}
