//! # vbfront
//!
//! An error-tolerant front end for three dialects of Visual Basic:
//! VB6, VB7.1 and VB8.0.
//!
//! The scanner and parser never give up. Every entry point returns a tree,
//! with `Malformed` nodes where a construct could not be recovered, and a
//! list of diagnostics. A source is well formed when that list is empty.
//!
//! ```
//! use vbfront::lang::{parse_file, LanguageVersion, ParseOptions};
//!
//! let options = ParseOptions::default().with_version(LanguageVersion::VB6);
//! let parsed = parse_file("Sub Main()\n    MsgBox \"Hello\"\nEnd Sub\n", &options);
//! assert!(parsed.is_ok());
//! assert_eq!(parsed.tree.declarations.len(), 1);
//! ```
//!
//! Conditional compilation is handled while parsing. `#Const` values may be
//! seeded through [`ParseOptions`](lang::ParseOptions), and `#Region`,
//! `#ExternalSource` and `#ExternalChecksum` directives are collected
//! alongside the tree.

pub mod lang;
