//! # vbfront
//!
//! Parses Visual Basic source files and prints what the parser reports.
//!

use ansi_term::{Colour, Style};
use clap::{Parser, ValueEnum};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process;
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};
use vbfront::lang::{
    evaluate, parse_declaration, parse_expression, parse_file, parse_statement, parse_type_name,
    ConstantTable, ConstantValue, Diagnostic, Dialect, LanguageVersion, ParseOptions, Parsed,
    DEFAULT_TAB_WIDTH,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    File,
    Declaration,
    Statement,
    Expression,
    Type,
}

#[derive(Parser, Debug)]
#[command(name = "vbfront", version)]
#[command(about = "Parse Visual Basic source and report diagnostics")]
struct Args {
    /// Dialect to parse: vb6, vb71 or vb80
    #[arg(long, default_value = "vb80", value_parser = parse_dialect)]
    dialect: LanguageVersion,

    /// Columns a tab advances to
    #[arg(long, default_value_t = DEFAULT_TAB_WIDTH)]
    tab_width: usize,

    /// Predefined conditional compilation constant
    #[arg(short = 'D', value_name = "NAME=VALUE")]
    define: Vec<String>,

    /// Grammar rule the whole of each file must match
    #[arg(long, value_enum, default_value_t = Mode::File)]
    mode: Mode,

    /// Source files
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

#[derive(Debug, Error)]
enum DriverError {
    #[error("{path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid constant definition '{0}'")]
    InvalidConstant(String),
}

fn parse_dialect(name: &str) -> Result<LanguageVersion, String> {
    LanguageVersion::from_name(name).ok_or_else(|| format!("unknown dialect '{}'", name))
}

/// `NAME=VALUE`, the value written as a constant expression. A bare
/// `NAME` is `True`.
fn define(
    definition: &str,
    version: LanguageVersion,
) -> Result<(String, ConstantValue), DriverError> {
    let invalid = || DriverError::InvalidConstant(definition.to_string());
    let (name, value) = match definition.find('=') {
        Some(n) => (&definition[..n], &definition[n + 1..]),
        None => (definition, "True"),
    };
    let name = name.trim();
    if name.is_empty() {
        return Err(invalid());
    }
    let options = ParseOptions::default().with_version(version);
    let parsed = parse_expression(value, &options);
    if !parsed.is_ok() {
        return Err(invalid());
    }
    let (value, diagnostics) =
        evaluate(&parsed.tree, &ConstantTable::new(), Dialect::new(version));
    match value {
        Some(value) if diagnostics.is_empty() => Ok((name.to_string(), value)),
        _ => Err(invalid()),
    }
}

/// What one parse produced, whatever the entry point.
struct Report {
    diagnostics: Vec<Diagnostic>,
    declarations: usize,
    regions: usize,
    external_line_mappings: usize,
    external_checksums: usize,
}

impl Report {
    fn new<T>(parsed: Parsed<T>, declarations: usize) -> Report {
        Report {
            diagnostics: parsed.diagnostics,
            declarations,
            regions: parsed.regions.len(),
            external_line_mappings: parsed.external_line_mappings.len(),
            external_checksums: parsed.external_checksums.len(),
        }
    }
}

fn parse(source: &str, mode: Mode, options: &ParseOptions) -> Report {
    match mode {
        Mode::File => {
            let parsed = parse_file(source, options);
            let declarations = parsed.tree.declarations.len();
            Report::new(parsed, declarations)
        }
        Mode::Declaration => Report::new(parse_declaration(source, options), 1),
        Mode::Statement => Report::new(parse_statement(source, options), 0),
        Mode::Expression => Report::new(parse_expression(source, options), 0),
        Mode::Type => Report::new(parse_type_name(source, options), 0),
    }
}

fn check(
    path: &Path,
    mode: Mode,
    options: &ParseOptions,
    color: bool,
) -> Result<bool, DriverError> {
    let source = std::fs::read_to_string(path).map_err(|source| DriverError::Io {
        path: path.display().to_string(),
        source,
    })?;
    debug!(path = %path.display(), bytes = source.len(), "read");
    let report = parse(&source, mode, options);
    for diagnostic in &report.diagnostics {
        let location = format!("{}:{}:", path.display(), diagnostic.span.start);
        if color {
            println!(
                "{} {}",
                Colour::Red.bold().paint(location),
                diagnostic.code
            );
        } else {
            println!("{} {}", location, diagnostic.code);
        }
    }
    let summary = format!(
        "{}: {} diagnostics, {} declarations, {} regions, {} external sources, {} checksums",
        path.display(),
        report.diagnostics.len(),
        report.declarations,
        report.regions,
        report.external_line_mappings,
        report.external_checksums,
    );
    if color {
        println!("{}", Style::new().bold().paint(summary));
    } else {
        println!("{}", summary);
    }
    Ok(report.diagnostics.is_empty())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> Result<bool, DriverError> {
    let mut options = ParseOptions::default()
        .with_version(args.dialect)
        .with_tab_width(args.tab_width);
    for definition in &args.define {
        let (name, value) = define(definition, args.dialect)?;
        options = options.with_constant(&name, value);
    }
    let color = std::io::stdout().is_terminal();
    let mut clean = true;
    for path in &args.files {
        clean &= check(path, args.mode, &options, color)?;
    }
    Ok(clean)
}

fn main() {
    init_logging();
    let args = Args::parse();
    match run(&args) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(error) => {
            eprintln!("{}", error);
            let code = match error {
                DriverError::Io { .. } => 2,
                DriverError::InvalidConstant(_) => 1,
            };
            process::exit(code);
        }
    }
}
