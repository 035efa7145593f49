/// A position in the source text.
///
/// `index` is the 0-based character offset. `line` and `column` are 1-based,
/// with tabs expanded to the scanner's tab width.
#[derive(Debug, Clone, Copy, Default, Hash)]
pub struct Location {
    pub index: usize,
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn new(index: usize, line: usize, column: usize) -> Location {
        Location {
            index,
            line,
            column,
        }
    }
}

impl PartialEq for Location {
    fn eq(&self, other: &Location) -> bool {
        self.line == other.line && self.column == other.column
    }
}

impl Eq for Location {}

impl PartialOrd for Location {
    fn partial_cmp(&self, other: &Location) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Location {
    fn cmp(&self, other: &Location) -> std::cmp::Ordering {
        self.index.cmp(&other.index)
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Half-open range of source text; `finish` is exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: Location,
    pub finish: Location,
}

impl Span {
    pub fn new(start: Location, finish: Location) -> Span {
        debug_assert!(start.index <= finish.index);
        Span { start, finish }
    }

    pub fn empty(at: Location) -> Span {
        Span {
            start: at,
            finish: at,
        }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn to(&self, other: Span) -> Span {
        let start = if other.start.index < self.start.index {
            other.start
        } else {
            self.start
        };
        let finish = if other.finish.index > self.finish.index {
            other.finish
        } else {
            self.finish
        };
        Span { start, finish }
    }

    pub fn len(&self) -> usize {
        self.finish.index - self.start.index
    }

    pub fn is_empty(&self) -> bool {
        self.start.index == self.finish.index
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        self.start.index..self.finish.index
    }

    pub fn contains(&self, other: &Span) -> bool {
        self.start.index <= other.start.index && other.finish.index <= self.finish.index
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.finish)
    }
}
