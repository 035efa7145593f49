use super::ast::{Block, Declaration, DeclarationKind, File, Statement};
use super::*;

mod parse_test;

fn options(version: LanguageVersion) -> ParseOptions {
    ParseOptions::default().with_version(version)
}

fn file(source: &str, version: LanguageVersion) -> Parsed<File> {
    parse_file(source, &options(version))
}

fn codes<T>(parsed: &Parsed<T>) -> Vec<ErrorCode> {
    parsed.diagnostics.iter().map(|d| d.code).collect()
}

/// Members of a module, or of the file itself under VB6.
fn members(source: &str, version: LanguageVersion) -> (Vec<Declaration>, Vec<ErrorCode>) {
    let vb6 = version == LanguageVersion::VB6;
    let source = if vb6 {
        source.to_string()
    } else {
        format!("Module Test\n{}\nEnd Module\n", source)
    };
    let parsed = file(&source, version);
    let codes = codes(&parsed);
    let mut declarations = parsed.tree.declarations;
    if vb6 {
        return (declarations, codes);
    }
    assert_eq!(declarations.len(), 1, "{:?}", declarations);
    match declarations.remove(0).kind {
        DeclarationKind::Type(module) => (module.members, codes),
        kind => panic!("{:?}", kind),
    }
}

/// Statements of `lines` wrapped in a `Sub`, and the diagnostics.
fn body(lines: &str, version: LanguageVersion) -> (Block, Vec<ErrorCode>) {
    let source = format!("Sub Test()\n{}\nEnd Sub", lines);
    let (mut declarations, codes) = members(&source, version);
    assert_eq!(declarations.len(), 1, "{:?}", declarations);
    match declarations.remove(0).kind {
        DeclarationKind::Method(method) => (method.body.unwrap_or_default(), codes),
        kind => panic!("{:?}", kind),
    }
}

fn statement(source: &str, version: LanguageVersion) -> Parsed<Statement> {
    parse_statement(source, &options(version))
}
