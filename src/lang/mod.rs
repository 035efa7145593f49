/*!
# Language Module

Lexical analysis and parsing of the Visual Basic 6, 7.1 and 8.0 dialects.

The [`Scanner`] turns source text into a token arena the parser can move
about in freely. The [`Parser`] consumes it and produces syntax trees from
the [`ast`] module along with a list of [`Diagnostic`]s. Conditional
compilation directives are folded by the [`Evaluator`] as they are met.

*/

#[macro_use]
mod error;
mod chars;
mod eval;
mod lex;
mod parse;
mod span;
mod version;

pub mod ast;
pub mod token;

pub use error::{Diagnostic, ErrorCode};
pub use eval::{evaluate, ConstantTable, ConstantValue, Evaluator, IntegerType};
pub use lex::{lex, Scanner, DEFAULT_TAB_WIDTH};
pub use parse::{
    parse_declaration, parse_expression, parse_file, parse_statement, parse_type_name, BlockKind,
    ExternalChecksum, ExternalLineMapping, ParseOptions, Parsed, Parser, Region, Terminator,
};
pub use span::{Location, Span};
pub use token::{Token, TokenKind, TokenType};
pub use version::{Dialect, LanguageVersion};

#[cfg(test)]
mod tests;
