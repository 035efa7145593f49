/// Dialect selector.
///
/// The three dialects are single bits so that sets of them can describe
/// where a keyword or construct is available. A parse always runs under one
/// dialect; when handed a combination it uses the newest member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LanguageVersion(u8);

impl LanguageVersion {
    pub const NONE: LanguageVersion = LanguageVersion(0);
    pub const VB6: LanguageVersion = LanguageVersion(1);
    pub const VB71: LanguageVersion = LanguageVersion(2);
    pub const VB80: LanguageVersion = LanguageVersion(4);
    pub const DOTNET: LanguageVersion = LanguageVersion(2 | 4);
    pub const ALL: LanguageVersion = LanguageVersion(1 | 2 | 4);

    pub const fn from_bits(bits: u8) -> LanguageVersion {
        LanguageVersion(bits & 7)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, other: LanguageVersion) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    pub fn intersects(self, other: LanguageVersion) -> bool {
        self.0 & other.0 != 0
    }

    pub fn newest(self) -> LanguageVersion {
        if self.intersects(LanguageVersion::VB80) {
            LanguageVersion::VB80
        } else if self.intersects(LanguageVersion::VB71) {
            LanguageVersion::VB71
        } else if self.intersects(LanguageVersion::VB6) {
            LanguageVersion::VB6
        } else {
            LanguageVersion::NONE
        }
    }

    pub fn from_name(name: &str) -> Option<LanguageVersion> {
        match name.to_ascii_lowercase().as_str() {
            "vb6" | "6" | "6.0" => Some(LanguageVersion::VB6),
            "vb71" | "vb7" | "7" | "7.1" => Some(LanguageVersion::VB71),
            "vb80" | "vb8" | "8" | "8.0" => Some(LanguageVersion::VB80),
            _ => None,
        }
    }
}

impl Default for LanguageVersion {
    fn default() -> LanguageVersion {
        LanguageVersion::VB80
    }
}

impl std::ops::BitOr for LanguageVersion {
    type Output = LanguageVersion;
    fn bitor(self, rhs: LanguageVersion) -> LanguageVersion {
        LanguageVersion(self.0 | rhs.0)
    }
}

impl std::fmt::Display for LanguageVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut names = vec![];
        if self.intersects(LanguageVersion::VB6) {
            names.push("VB6");
        }
        if self.intersects(LanguageVersion::VB71) {
            names.push("VB7.1");
        }
        if self.intersects(LanguageVersion::VB80) {
            names.push("VB8.0");
        }
        if names.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", names.join("|"))
        }
    }
}

/// Grammar capabilities of one dialect.
///
/// Computed once from a [`LanguageVersion`] and consulted by the scanner and
/// the parser wherever the dialects disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    pub version: LanguageVersion,
    pub vb6: bool,
    pub vb71: bool,
    pub vb80: bool,
    /// `Foo 1, 2` without parentheses or `Call`.
    pub implicit_call: bool,
    /// `Property Get`/`Let`/`Set` as separate procedures.
    pub property_procedures: bool,
    /// `GoSub`, `On x GoTo/GoSub`, `Error n`.
    pub gosub: bool,
    /// `String * n`.
    pub fixed_length_strings: bool,
    /// Numeric labels without a trailing colon.
    pub bare_line_numbers: bool,
    /// A comment ending in `_` continues onto the next line.
    pub comment_continuation: bool,
    /// `Let` and `Set` assignment keywords.
    pub assignment_keywords: bool,
    /// `Is Not` folds into `IsNot`.
    pub is_not_rewrite: bool,
    pub attributes: bool,
    pub generics: bool,
    pub unsigned_types: bool,
    pub structured_exceptions: bool,
    pub compound_assignment: bool,
    pub short_circuit: bool,
    pub type_character_letters: bool,
    pub char_literals: bool,
    pub namespaces: bool,
    pub regions: bool,
    pub operators: bool,
    pub custom_events: bool,
    pub using_statement: bool,
    pub continue_statement: bool,
}

impl Dialect {
    pub fn new(version: LanguageVersion) -> Dialect {
        let version = version.newest();
        let vb6 = version == LanguageVersion::VB6;
        let vb71 = version == LanguageVersion::VB71;
        let vb80 = version == LanguageVersion::VB80;
        let dotnet = vb71 || vb80;
        Dialect {
            version,
            vb6,
            vb71,
            vb80,
            implicit_call: vb6,
            property_procedures: vb6,
            gosub: vb6,
            fixed_length_strings: vb6,
            bare_line_numbers: vb6,
            comment_continuation: vb6,
            assignment_keywords: vb6,
            is_not_rewrite: vb6,
            attributes: dotnet,
            generics: vb80,
            unsigned_types: vb80,
            structured_exceptions: dotnet,
            compound_assignment: dotnet,
            short_circuit: dotnet,
            type_character_letters: dotnet,
            char_literals: dotnet,
            namespaces: dotnet,
            regions: dotnet,
            operators: vb80,
            custom_events: vb80,
            using_statement: vb80,
            continue_statement: vb80,
        }
    }

    /// Whether a keyword reserved in `versions` is reserved in this dialect.
    pub fn reserves(&self, versions: LanguageVersion) -> bool {
        versions.intersects(self.version)
    }
}

impl Default for Dialect {
    fn default() -> Dialect {
        Dialect::new(LanguageVersion::default())
    }
}
