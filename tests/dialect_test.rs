mod common;
use common::*;
use vbfront::lang::{Dialect, ErrorCode, LanguageVersion};

/// Whether `source` parses cleanly as a statement under VB6, VB7.1 and VB8.0.
fn accepted(source: &str) -> [bool; 3] {
    let mut accepted = [false; 3];
    for (n, version) in DIALECTS.iter().enumerate() {
        accepted[n] = statement(source, *version).is_ok();
    }
    accepted
}

#[test]
fn test_statement_dialects() {
    let cases: &[(&str, [bool; 3])] = &[
        ("Foo 1, 2", [true, false, false]),
        ("Foo(1, 2)", [false, true, true]),
        ("Call Foo(1, 2)", [true, true, true]),
        ("Set x = y", [true, false, false]),
        ("GoSub 10", [true, false, false]),
        ("x += 1", [false, true, true]),
        ("x = a AndAlso b", [false, true, true]),
        ("x = a IsNot b", [false, false, true]),
        ("x = a Eqv b", [true, false, false]),
        ("x = \"a\"c", [false, true, true]),
        ("x = 10UI", [false, false, true]),
        ("x = {1, 2}", [false, true, true]),
        ("Dim x As List(Of Integer)", [false, false, true]),
        ("Dim s As String * 10", [true, false, false]),
        ("x = 1 ' note", [true, true, true]),
    ];
    for (source, expected) in cases {
        assert_eq!(accepted(source), *expected, "{}", source);
    }
}

#[test]
fn test_obsolete_syntax_is_still_parsed() {
    let parsed = statement("Set x = y", VB80);
    assert_eq!(codes(&parsed), vec![ErrorCode::ObsoleteLetSetAssignment]);
    let parsed = statement("Foo(1, 2)", VB6);
    assert_eq!(codes(&parsed), vec![ErrorCode::ParenthesizedCallArguments]);
}

#[test]
fn test_attributes_need_dotnet() {
    let parsed = file("<Foo> Sub A()\nEnd Sub\n", VB6);
    assert_eq!(
        codes(&parsed),
        vec![ErrorCode::NotSupportedInDialect("attributes")]
    );
    assert_eq!(parsed.tree.declarations.len(), 1);
}

#[test]
fn test_version_names() {
    assert_eq!(LanguageVersion::from_name("VB6"), Some(VB6));
    assert_eq!(LanguageVersion::from_name("7.1"), Some(VB71));
    assert_eq!(LanguageVersion::from_name("vb8"), Some(VB80));
    assert_eq!(LanguageVersion::from_name("vb9"), None);
    assert_eq!(VB71.to_string(), "VB7.1");
    assert_eq!(LanguageVersion::DOTNET.to_string(), "VB7.1|VB8.0");
    assert_eq!(LanguageVersion::NONE.to_string(), "none");
    assert_eq!(LanguageVersion::default(), VB80);
}

#[test]
fn test_version_sets() {
    assert!(LanguageVersion::ALL.contains(VB71));
    assert!(!LanguageVersion::DOTNET.contains(VB6));
    assert!(!VB6.contains(LanguageVersion::NONE));
    assert_eq!((VB6 | VB80).newest(), VB80);
    assert_eq!(Dialect::new(VB6 | VB71).version, VB71);
}

#[test]
fn test_capabilities() {
    let vb6 = Dialect::new(VB6);
    let vb71 = Dialect::new(VB71);
    let vb80 = Dialect::new(VB80);
    assert!(vb6.implicit_call && !vb71.implicit_call && !vb80.implicit_call);
    assert!(vb6.property_procedures && !vb80.property_procedures);
    assert!(!vb6.structured_exceptions && vb71.structured_exceptions);
    assert!(!vb71.generics && vb80.generics);
    assert!(!vb71.unsigned_types && vb80.unsigned_types);
    assert!(!vb71.continue_statement && vb80.continue_statement);
    assert!(vb6.reserves(VB6) && !vb6.reserves(LanguageVersion::DOTNET));
}
