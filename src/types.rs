/// Core domain types for permalinks, revisions, and line ranges.
use std::fmt;

/// One-based, inclusive line range taken from an `#L<start>-L<end>` fragment.
/// Start and end are parsed independently; `start <= end` is not enforced
/// and an inverted range selects nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    /// Last line to include.
    pub end: u32,
    /// First line to include.
    pub start: u32,
}

impl fmt::Display for LineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return write!(f, "L{}-L{}", self.start, self.end);
    }
}

/// A revision identifier: 40 hex chars, always lowercase.
/// Newtype prevents mixing with owner, repo, or path strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision(
    /// The hex-encoded commit id.
    pub String,
);

impl Revision {
    /// Borrow the hex string.
    pub fn as_str(&self) -> &str {
        return &self.0;
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f.write_str(&self.0);
    }
}
