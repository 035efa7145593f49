use super::{chars, ErrorCode, LanguageVersion, Span};
use chrono::NaiveDateTime;
use rustc_hash::FxHashMap;
use std::rc::Rc;

thread_local!(
    static KEYWORDS: FxHashMap<&'static str, Keyword> = KEYWORD_TABLE
        .iter()
        .map(|&(spelling, token_type, versions, reserved)| {
            (
                spelling,
                Keyword {
                    token_type,
                    versions,
                    reserved,
                },
            )
        })
        .collect();
);

/// Looks up a keyword by spelling, ignoring case and character width.
pub fn keyword(spelling: &str) -> Option<Keyword> {
    let key: String = spelling
        .chars()
        .map(|c| chars::half_width(c).to_ascii_lowercase())
        .collect();
    KEYWORDS.with(|table| table.get(key.as_str()).copied())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyword {
    pub token_type: TokenType,
    /// Dialects in which the keyword exists.
    pub versions: LanguageVersion,
    /// Unreserved keywords are always scanned as identifiers.
    pub reserved: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub(crate) position: usize,
    /// Id of the scanner that produced the token; 0 when built by hand.
    pub(crate) scanner: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Identifier(Identifier),
    Punctuator(TokenType),
    IntegerLiteral(IntegerLiteral),
    UnsignedIntegerLiteral(UnsignedIntegerLiteral),
    FloatingPointLiteral(FloatingPointLiteral),
    DecimalLiteral(DecimalLiteral),
    CharacterLiteral(char),
    StringLiteral(Rc<str>),
    DateLiteral(NaiveDateTime),
    Comment { text: Rc<str>, is_rem: bool },
    LineTerminator,
    Colon,
    EndOfStream,
    Error(ErrorCode),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    /// Spelling as written, without brackets or type character.
    pub text: Rc<str>,
    /// Reserved keyword this spelling resolves to, if any.
    pub keyword: Option<TokenType>,
    /// Contextual keyword this spelling matches, if any.
    pub unreserved: Option<TokenType>,
    pub escaped: bool,
    pub type_character: Option<TypeCharacter>,
    /// No whitespace between this identifier and the next token.
    pub adjacent: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntegerBase {
    Decimal,
    Octal,
    Hexadecimal,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegerLiteral {
    pub value: i64,
    pub base: IntegerBase,
    pub type_character: Option<TypeCharacter>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnsignedIntegerLiteral {
    pub value: u64,
    pub base: IntegerBase,
    pub type_character: Option<TypeCharacter>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatingPointLiteral {
    pub value: f64,
    pub type_character: Option<TypeCharacter>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecimalLiteral {
    pub value: DecimalValue,
    pub type_character: Option<TypeCharacter>,
}

/// Fixed-point decimal: `mantissa / 10^scale`, 96-bit mantissa, scale 0..=28.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DecimalValue {
    pub negative: bool,
    pub mantissa: u128,
    pub scale: u8,
}

impl DecimalValue {
    pub const MAX_MANTISSA: u128 = (1u128 << 96) - 1;
    pub const MAX_SCALE: u8 = 28;

    /// Parses plain decimal digits with an optional fraction and exponent.
    /// Fraction digits beyond the maximum scale are rounded away.
    pub fn parse(digits: &str, fraction: &str, exponent: i32) -> Option<DecimalValue> {
        let mut mantissa: u128 = 0;
        let mut scale: i32 = 0;
        for c in digits.chars() {
            mantissa = mantissa.checked_mul(10)?.checked_add(c.to_digit(10)? as u128)?;
        }
        for c in fraction.chars() {
            mantissa = mantissa.checked_mul(10)?.checked_add(c.to_digit(10)? as u128)?;
            scale += 1;
        }
        let mut scale = scale.checked_sub(exponent)?;
        if mantissa == 0 {
            scale = scale.clamp(0, DecimalValue::MAX_SCALE as i32);
        }
        while scale < 0 {
            mantissa = mantissa.checked_mul(10)?;
            scale += 1;
        }
        while scale > DecimalValue::MAX_SCALE as i32 {
            if mantissa == 0 {
                scale = DecimalValue::MAX_SCALE as i32;
                break;
            }
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
            negative: false,
            mantissa,
            scale: scale as u8,
        })
    }

    pub fn from_i64(value: i64) -> DecimalValue {
        DecimalValue {
            negative: value < 0,
            mantissa: (value as i128).unsigned_abs(),
            scale: 0,
        }
    }

    pub fn from_f64(value: f64) -> Option<DecimalValue> {
        if !value.is_finite() {
            return None;
        }
        let text = format!("{}", value.abs());
        let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), ""));
        let fraction = fraction.trim_end_matches('0');
        let mut result = DecimalValue::parse(whole, fraction, 0)?;
        result.negative = value < 0.0 && result.mantissa != 0;
        Some(result)
    }

    pub fn to_f64(&self) -> f64 {
        let v = self.mantissa as f64 / 10f64.powi(self.scale as i32);
        if self.negative {
            -v
        } else {
            v
        }
    }

    pub fn negate(&self) -> DecimalValue {
        DecimalValue {
            negative: !self.negative && self.mantissa != 0,
            ..*self
        }
    }
}

impl std::fmt::Display for DecimalValue {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let digits = self.mantissa.to_string();
        let scale = self.scale as usize;
        let sign = if self.negative { "-" } else { "" };
        if scale == 0 {
            write!(f, "{}{}", sign, digits)
        } else if digits.len() > scale {
            let (whole, fraction) = digits.split_at(digits.len() - scale);
            write!(f, "{}{}.{}", sign, whole, fraction)
        } else {
            write!(f, "{}0.{:0>w$}", sign, digits, w = scale)
        }
    }
}

/// Type characters and literal suffixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCharacter {
    StringSymbol,
    IntegerSymbol,
    LongSymbol,
    SingleSymbol,
    DoubleSymbol,
    DecimalSymbol,
    ShortChar,
    UnsignedShortChar,
    IntegerChar,
    UnsignedIntegerChar,
    LongChar,
    UnsignedLongChar,
    SingleChar,
    DoubleChar,
    DecimalChar,
}

impl TypeCharacter {
    pub fn from_symbol(c: char) -> Option<TypeCharacter> {
        use TypeCharacter::*;
        match chars::half_width(c) {
            '$' => Some(StringSymbol),
            '%' => Some(IntegerSymbol),
            '&' => Some(LongSymbol),
            '!' => Some(SingleSymbol),
            '#' => Some(DoubleSymbol),
            '@' => Some(DecimalSymbol),
            _ => None,
        }
    }

    pub fn is_unsigned(self) -> bool {
        use TypeCharacter::*;
        matches!(self, UnsignedShortChar | UnsignedIntegerChar | UnsignedLongChar)
    }

    pub fn is_symbol(self) -> bool {
        use TypeCharacter::*;
        matches!(
            self,
            StringSymbol | IntegerSymbol | LongSymbol | SingleSymbol | DoubleSymbol | DecimalSymbol
        )
    }
}

impl std::fmt::Display for TypeCharacter {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use TypeCharacter::*;
        let s = match self {
            StringSymbol => "$",
            IntegerSymbol => "%",
            LongSymbol => "&",
            SingleSymbol => "!",
            DoubleSymbol => "#",
            DecimalSymbol => "@",
            ShortChar => "S",
            UnsignedShortChar => "US",
            IntegerChar => "I",
            UnsignedIntegerChar => "UI",
            LongChar => "L",
            UnsignedLongChar => "UL",
            SingleChar => "F",
            DoubleChar => "R",
            DecimalChar => "D",
        };
        write!(f, "{}", s)
    }
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Token {
        Token {
            kind,
            span,
            position: 0,
            scanner: 0,
        }
    }

    /// Position of this token in the scanner's buffer.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn token_type(&self) -> TokenType {
        use TokenKind::*;
        match &self.kind {
            Identifier(ident) => ident.keyword.unwrap_or(TokenType::Identifier),
            Punctuator(t) => *t,
            IntegerLiteral(_) => TokenType::IntegerLiteral,
            UnsignedIntegerLiteral(_) => TokenType::UnsignedIntegerLiteral,
            FloatingPointLiteral(_) => TokenType::FloatingPointLiteral,
            DecimalLiteral(_) => TokenType::DecimalLiteral,
            CharacterLiteral(_) => TokenType::CharacterLiteral,
            StringLiteral(_) => TokenType::StringLiteral,
            DateLiteral(_) => TokenType::DateLiteral,
            Comment { .. } => TokenType::Comment,
            LineTerminator => TokenType::LineTerminator,
            Colon => TokenType::Colon,
            EndOfStream => TokenType::EndOfStream,
            Error(_) => TokenType::LexicalError,
        }
    }

    pub fn is(&self, token_type: TokenType) -> bool {
        self.token_type() == token_type
    }

    /// True for an identifier, whether or not it is a contextual keyword.
    pub fn is_identifier(&self) -> bool {
        self.token_type() == TokenType::Identifier
    }

    pub fn identifier(&self) -> Option<&Identifier> {
        match &self.kind {
            TokenKind::Identifier(ident) => Some(ident),
            _ => None,
        }
    }

    /// Contextual keyword identity of an identifier token.
    pub fn unreserved(&self) -> Option<TokenType> {
        match &self.kind {
            TokenKind::Identifier(ident) if ident.keyword.is_none() && !ident.escaped => {
                ident.unreserved
            }
            _ => None,
        }
    }

    pub fn is_unreserved(&self, token_type: TokenType) -> bool {
        self.unreserved() == Some(token_type)
    }

    pub fn is_adjacent(&self) -> bool {
        match &self.kind {
            TokenKind::Identifier(ident) => ident.adjacent,
            _ => false,
        }
    }

    pub fn is_end_of_line(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::LineTerminator | TokenKind::EndOfStream
        )
    }

    /// Colon, line terminator, end of stream or comment.
    pub fn is_end_of_statement(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::LineTerminator
                | TokenKind::EndOfStream
                | TokenKind::Colon
                | TokenKind::Comment { .. }
        )
    }

    pub fn is_literal(&self) -> bool {
        use TokenKind::*;
        matches!(
            self.kind,
            IntegerLiteral(_)
                | UnsignedIntegerLiteral(_)
                | FloatingPointLiteral(_)
                | DecimalLiteral(_)
                | CharacterLiteral(_)
                | StringLiteral(_)
                | DateLiteral(_)
        )
    }

    pub fn error_code(&self) -> Option<ErrorCode> {
        match self.kind {
            TokenKind::Error(code) => Some(code),
            _ => None,
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use TokenKind::*;
        match &self.kind {
            Identifier(ident) => {
                if ident.escaped {
                    write!(f, "[{}]", ident.text)?;
                } else {
                    write!(f, "{}", ident.text)?;
                }
                if let Some(tc) = ident.type_character {
                    write!(f, "{}", tc)?;
                }
                Ok(())
            }
            Punctuator(t) => write!(f, "{}", t),
            IntegerLiteral(lit) => write!(f, "{}", lit.value),
            UnsignedIntegerLiteral(lit) => write!(f, "{}", lit.value),
            FloatingPointLiteral(lit) => write!(f, "{}", lit.value),
            DecimalLiteral(lit) => write!(f, "{}", lit.value),
            CharacterLiteral(c) => write!(f, "\"{}\"c", c),
            StringLiteral(s) => write!(f, "\"{}\"", s.replace('"', "\"\"")),
            DateLiteral(d) => write!(f, "#{}#", d.format("%-m/%-d/%Y %-I:%M:%S %p")),
            Comment { text, is_rem } => {
                if *is_rem {
                    write!(f, "REM{}", text)
                } else {
                    write!(f, "'{}", text)
                }
            }
            LineTerminator => writeln!(f),
            Colon => write!(f, ":"),
            EndOfStream => Ok(()),
            Error(code) => write!(f, "<{}>", code),
        }
    }
}

macro_rules! token_types {
    ($($name:ident => $spelling:expr,)*) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum TokenType {
            $($name,)*
        }

        impl TokenType {
            pub fn spelling(self) -> &'static str {
                match self {
                    $(TokenType::$name => $spelling,)*
                }
            }
        }
    };
}

token_types! {
    // Token classes
    Identifier => "identifier",
    IntegerLiteral => "integer literal",
    UnsignedIntegerLiteral => "unsigned integer literal",
    FloatingPointLiteral => "floating-point literal",
    DecimalLiteral => "decimal literal",
    CharacterLiteral => "character literal",
    StringLiteral => "string literal",
    DateLiteral => "date literal",
    Comment => "comment",
    LineTerminator => "end of line",
    Colon => ":",
    EndOfStream => "end of file",
    LexicalError => "invalid token",

    // Punctuators
    LeftParenthesis => "(",
    RightParenthesis => ")",
    LeftCurlyBrace => "{",
    RightCurlyBrace => "}",
    Exclamation => "!",
    Pound => "#",
    Comma => ",",
    Period => ".",
    ColonEquals => ":=",
    Ampersand => "&",
    Star => "*",
    Plus => "+",
    Minus => "-",
    ForwardSlash => "/",
    BackwardSlash => "\\",
    Caret => "^",
    LessThan => "<",
    LessThanEquals => "<=",
    Equals => "=",
    NotEquals => "<>",
    GreaterThan => ">",
    GreaterThanEquals => ">=",
    LessThanLessThan => "<<",
    GreaterThanGreaterThan => ">>",
    AmpersandEquals => "&=",
    StarEquals => "*=",
    PlusEquals => "+=",
    MinusEquals => "-=",
    ForwardSlashEquals => "/=",
    BackwardSlashEquals => "\\=",
    CaretEquals => "^=",
    LessThanLessThanEquals => "<<=",
    GreaterThanGreaterThanEquals => ">>=",

    // Keywords
    AddHandler => "AddHandler",
    AddressOf => "AddressOf",
    Alias => "Alias",
    And => "And",
    AndAlso => "AndAlso",
    Ansi => "Ansi",
    As => "As",
    Assembly => "Assembly",
    Auto => "Auto",
    Base => "Base",
    Binary => "Binary",
    Boolean => "Boolean",
    ByRef => "ByRef",
    Byte => "Byte",
    ByVal => "ByVal",
    Call => "Call",
    Case => "Case",
    Catch => "Catch",
    CBool => "CBool",
    CByte => "CByte",
    CChar => "CChar",
    CDate => "CDate",
    CDbl => "CDbl",
    CDec => "CDec",
    Char => "Char",
    CInt => "CInt",
    Class => "Class",
    CLng => "CLng",
    CObj => "CObj",
    Compare => "Compare",
    Const => "Const",
    Continue => "Continue",
    CSByte => "CSByte",
    CShort => "CShort",
    CSng => "CSng",
    CStr => "CStr",
    CType => "CType",
    CUInt => "CUInt",
    CULng => "CULng",
    CUShort => "CUShort",
    Currency => "Currency",
    Custom => "Custom",
    Date => "Date",
    Decimal => "Decimal",
    Declare => "Declare",
    Default => "Default",
    Delegate => "Delegate",
    Dim => "Dim",
    DirectCast => "DirectCast",
    Do => "Do",
    Double => "Double",
    Each => "Each",
    Else => "Else",
    ElseIf => "ElseIf",
    End => "End",
    EndIf => "EndIf",
    Enum => "Enum",
    Eqv => "Eqv",
    Erase => "Erase",
    Error => "Error",
    Event => "Event",
    Exit => "Exit",
    Explicit => "Explicit",
    ExternalChecksum => "ExternalChecksum",
    ExternalSource => "ExternalSource",
    False => "False",
    Finally => "Finally",
    For => "For",
    Friend => "Friend",
    Function => "Function",
    Get => "Get",
    GetType => "GetType",
    Global => "Global",
    GoSub => "GoSub",
    GoTo => "GoTo",
    Handles => "Handles",
    If => "If",
    Imp => "Imp",
    Implements => "Implements",
    Imports => "Imports",
    In => "In",
    Infer => "Infer",
    Inherits => "Inherits",
    Integer => "Integer",
    Interface => "Interface",
    Is => "Is",
    IsNot => "IsNot",
    Let => "Let",
    Lib => "Lib",
    Like => "Like",
    Long => "Long",
    Loop => "Loop",
    Me => "Me",
    Mid => "Mid",
    Mod => "Mod",
    Module => "Module",
    MustInherit => "MustInherit",
    MustOverride => "MustOverride",
    MyBase => "MyBase",
    MyClass => "MyClass",
    Namespace => "Namespace",
    Narrowing => "Narrowing",
    New => "New",
    Next => "Next",
    Not => "Not",
    Nothing => "Nothing",
    NotInheritable => "NotInheritable",
    NotOverridable => "NotOverridable",
    Object => "Object",
    Of => "Of",
    Off => "Off",
    On => "On",
    Operator => "Operator",
    Option => "Option",
    Optional => "Optional",
    Or => "Or",
    OrElse => "OrElse",
    Overloads => "Overloads",
    Overridable => "Overridable",
    Overrides => "Overrides",
    ParamArray => "ParamArray",
    Partial => "Partial",
    Preserve => "Preserve",
    Private => "Private",
    Property => "Property",
    Protected => "Protected",
    Public => "Public",
    RaiseEvent => "RaiseEvent",
    ReadOnly => "ReadOnly",
    ReDim => "ReDim",
    Region => "Region",
    Rem => "REM",
    RemoveHandler => "RemoveHandler",
    Resume => "Resume",
    Return => "Return",
    SByte => "SByte",
    Select => "Select",
    Set => "Set",
    Shadows => "Shadows",
    Shared => "Shared",
    Short => "Short",
    Single => "Single",
    Static => "Static",
    Step => "Step",
    Stop => "Stop",
    Strict => "Strict",
    String => "String",
    Structure => "Structure",
    Sub => "Sub",
    SyncLock => "SyncLock",
    Text => "Text",
    Then => "Then",
    Throw => "Throw",
    To => "To",
    True => "True",
    Try => "Try",
    TryCast => "TryCast",
    Type => "Type",
    TypeOf => "TypeOf",
    UInteger => "UInteger",
    ULong => "ULong",
    Unicode => "Unicode",
    Until => "Until",
    UShort => "UShort",
    Using => "Using",
    Variant => "Variant",
    Wend => "Wend",
    When => "When",
    While => "While",
    Widening => "Widening",
    With => "With",
    WithEvents => "WithEvents",
    WriteOnly => "WriteOnly",
    Xor => "Xor",
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.spelling())
    }
}

const ALL: LanguageVersion = LanguageVersion::ALL;
const VB6: LanguageVersion = LanguageVersion::VB6;
const NET: LanguageVersion = LanguageVersion::DOTNET;
const VB8: LanguageVersion = LanguageVersion::VB80;
const VB6_VB8: LanguageVersion = LanguageVersion::from_bits(1 | 4);

const KEYWORD_TABLE: &[(&str, TokenType, LanguageVersion, bool)] = &[
    ("addhandler", TokenType::AddHandler, NET, true),
    ("addressof", TokenType::AddressOf, ALL, true),
    ("alias", TokenType::Alias, ALL, true),
    ("and", TokenType::And, ALL, true),
    ("andalso", TokenType::AndAlso, NET, true),
    ("ansi", TokenType::Ansi, NET, false),
    ("as", TokenType::As, ALL, true),
    ("assembly", TokenType::Assembly, NET, false),
    ("auto", TokenType::Auto, NET, false),
    ("base", TokenType::Base, VB6, false),
    ("binary", TokenType::Binary, ALL, false),
    ("boolean", TokenType::Boolean, ALL, true),
    ("byref", TokenType::ByRef, ALL, true),
    ("byte", TokenType::Byte, ALL, true),
    ("byval", TokenType::ByVal, ALL, true),
    ("call", TokenType::Call, ALL, true),
    ("case", TokenType::Case, ALL, true),
    ("catch", TokenType::Catch, NET, true),
    ("cbool", TokenType::CBool, ALL, true),
    ("cbyte", TokenType::CByte, ALL, true),
    ("cchar", TokenType::CChar, NET, true),
    ("cdate", TokenType::CDate, ALL, true),
    ("cdbl", TokenType::CDbl, ALL, true),
    ("cdec", TokenType::CDec, ALL, true),
    ("char", TokenType::Char, NET, true),
    ("cint", TokenType::CInt, ALL, true),
    ("class", TokenType::Class, NET, true),
    ("clng", TokenType::CLng, ALL, true),
    ("cobj", TokenType::CObj, NET, true),
    ("compare", TokenType::Compare, ALL, false),
    ("const", TokenType::Const, ALL, true),
    ("continue", TokenType::Continue, VB8, true),
    ("csbyte", TokenType::CSByte, VB8, true),
    ("cshort", TokenType::CShort, NET, true),
    ("csng", TokenType::CSng, ALL, true),
    ("cstr", TokenType::CStr, ALL, true),
    ("ctype", TokenType::CType, NET, true),
    ("cuint", TokenType::CUInt, VB8, true),
    ("culng", TokenType::CULng, VB8, true),
    ("cushort", TokenType::CUShort, VB8, true),
    ("currency", TokenType::Currency, VB6, true),
    ("custom", TokenType::Custom, VB8, false),
    ("date", TokenType::Date, ALL, true),
    ("decimal", TokenType::Decimal, ALL, true),
    ("declare", TokenType::Declare, ALL, true),
    ("default", TokenType::Default, NET, true),
    ("delegate", TokenType::Delegate, NET, true),
    ("dim", TokenType::Dim, ALL, true),
    ("directcast", TokenType::DirectCast, NET, true),
    ("do", TokenType::Do, ALL, true),
    ("double", TokenType::Double, ALL, true),
    ("each", TokenType::Each, ALL, true),
    ("else", TokenType::Else, ALL, true),
    ("elseif", TokenType::ElseIf, ALL, true),
    ("end", TokenType::End, ALL, true),
    ("endif", TokenType::EndIf, ALL, true),
    ("enum", TokenType::Enum, ALL, true),
    ("eqv", TokenType::Eqv, VB6, true),
    ("erase", TokenType::Erase, ALL, true),
    ("error", TokenType::Error, ALL, true),
    ("event", TokenType::Event, ALL, true),
    ("exit", TokenType::Exit, ALL, true),
    ("explicit", TokenType::Explicit, ALL, false),
    ("externalchecksum", TokenType::ExternalChecksum, NET, false),
    ("externalsource", TokenType::ExternalSource, NET, false),
    ("false", TokenType::False, ALL, true),
    ("finally", TokenType::Finally, NET, true),
    ("for", TokenType::For, ALL, true),
    ("friend", TokenType::Friend, ALL, true),
    ("function", TokenType::Function, ALL, true),
    ("get", TokenType::Get, ALL, true),
    ("gettype", TokenType::GetType, NET, true),
    ("global", TokenType::Global, VB6_VB8, true),
    ("gosub", TokenType::GoSub, ALL, true),
    ("goto", TokenType::GoTo, ALL, true),
    ("handles", TokenType::Handles, NET, true),
    ("if", TokenType::If, ALL, true),
    ("imp", TokenType::Imp, VB6, true),
    ("implements", TokenType::Implements, ALL, true),
    ("imports", TokenType::Imports, NET, true),
    ("in", TokenType::In, ALL, true),
    ("infer", TokenType::Infer, VB8, false),
    ("inherits", TokenType::Inherits, NET, true),
    ("integer", TokenType::Integer, ALL, true),
    ("interface", TokenType::Interface, NET, true),
    ("is", TokenType::Is, ALL, true),
    ("isnot", TokenType::IsNot, VB8, true),
    ("let", TokenType::Let, ALL, true),
    ("lib", TokenType::Lib, ALL, true),
    ("like", TokenType::Like, ALL, true),
    ("long", TokenType::Long, ALL, true),
    ("loop", TokenType::Loop, ALL, true),
    ("me", TokenType::Me, ALL, true),
    ("mid", TokenType::Mid, ALL, false),
    ("mod", TokenType::Mod, ALL, true),
    ("module", TokenType::Module, NET, true),
    ("mustinherit", TokenType::MustInherit, NET, true),
    ("mustoverride", TokenType::MustOverride, NET, true),
    ("mybase", TokenType::MyBase, NET, true),
    ("myclass", TokenType::MyClass, NET, true),
    ("namespace", TokenType::Namespace, NET, true),
    ("narrowing", TokenType::Narrowing, VB8, true),
    ("new", TokenType::New, ALL, true),
    ("next", TokenType::Next, ALL, true),
    ("not", TokenType::Not, ALL, true),
    ("nothing", TokenType::Nothing, ALL, true),
    ("notinheritable", TokenType::NotInheritable, NET, true),
    ("notoverridable", TokenType::NotOverridable, NET, true),
    ("object", TokenType::Object, ALL, true),
    ("of", TokenType::Of, VB8, true),
    ("off", TokenType::Off, NET, false),
    ("on", TokenType::On, ALL, true),
    ("operator", TokenType::Operator, VB8, true),
    ("option", TokenType::Option, ALL, true),
    ("optional", TokenType::Optional, ALL, true),
    ("or", TokenType::Or, ALL, true),
    ("orelse", TokenType::OrElse, NET, true),
    ("overloads", TokenType::Overloads, NET, true),
    ("overridable", TokenType::Overridable, NET, true),
    ("overrides", TokenType::Overrides, NET, true),
    ("paramarray", TokenType::ParamArray, ALL, true),
    ("partial", TokenType::Partial, VB8, true),
    ("preserve", TokenType::Preserve, ALL, false),
    ("private", TokenType::Private, ALL, true),
    ("property", TokenType::Property, ALL, true),
    ("protected", TokenType::Protected, NET, true),
    ("public", TokenType::Public, ALL, true),
    ("raiseevent", TokenType::RaiseEvent, ALL, true),
    ("readonly", TokenType::ReadOnly, NET, true),
    ("redim", TokenType::ReDim, ALL, true),
    ("region", TokenType::Region, NET, false),
    ("rem", TokenType::Rem, ALL, true),
    ("removehandler", TokenType::RemoveHandler, NET, true),
    ("resume", TokenType::Resume, ALL, true),
    ("return", TokenType::Return, ALL, true),
    ("sbyte", TokenType::SByte, VB8, true),
    ("select", TokenType::Select, ALL, true),
    ("set", TokenType::Set, ALL, true),
    ("shadows", TokenType::Shadows, NET, true),
    ("shared", TokenType::Shared, NET, true),
    ("short", TokenType::Short, NET, true),
    ("single", TokenType::Single, ALL, true),
    ("static", TokenType::Static, ALL, true),
    ("step", TokenType::Step, ALL, true),
    ("stop", TokenType::Stop, ALL, true),
    ("strict", TokenType::Strict, NET, false),
    ("string", TokenType::String, ALL, true),
    ("structure", TokenType::Structure, NET, true),
    ("sub", TokenType::Sub, ALL, true),
    ("synclock", TokenType::SyncLock, NET, true),
    ("text", TokenType::Text, ALL, false),
    ("then", TokenType::Then, ALL, true),
    ("throw", TokenType::Throw, NET, true),
    ("to", TokenType::To, ALL, true),
    ("true", TokenType::True, ALL, true),
    ("try", TokenType::Try, NET, true),
    ("trycast", TokenType::TryCast, VB8, true),
    ("type", TokenType::Type, VB6, true),
    ("typeof", TokenType::TypeOf, ALL, true),
    ("uinteger", TokenType::UInteger, VB8, true),
    ("ulong", TokenType::ULong, VB8, true),
    ("unicode", TokenType::Unicode, NET, false),
    ("until", TokenType::Until, ALL, true),
    ("ushort", TokenType::UShort, VB8, true),
    ("using", TokenType::Using, VB8, true),
    ("variant", TokenType::Variant, ALL, true),
    ("wend", TokenType::Wend, ALL, true),
    ("when", TokenType::When, NET, true),
    ("while", TokenType::While, ALL, true),
    ("widening", TokenType::Widening, VB8, true),
    ("with", TokenType::With, ALL, true),
    ("withevents", TokenType::WithEvents, ALL, true),
    ("writeonly", TokenType::WriteOnly, NET, true),
    ("xor", TokenType::Xor, ALL, true),
];
