//! Source location spans.

use std::fmt;

/// A byte range in the source buffer, stored as offset and length.
///
/// Identifier names are spans too: two names are equal when the bytes they
/// cover are equal, see [`Span::text`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Span {
    pub start: u32,
    pub len: u32,
}

impl Span {
    /// Zero span, used for diagnostics that have no natural location.
    pub const DUMMY: Span = Span { start: 0, len: 0 };

    #[inline]
    pub const fn new(start: u32, len: u32) -> Self {
        Span { start, len }
    }

    /// Exclusive end offset.
    #[inline]
    pub const fn end(self) -> u32 {
        self.start + self.len
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.len == 0
    }

    /// Smallest span covering both `self` and `other`.
    #[inline]
    #[must_use]
    pub fn merge(self, other: Span) -> Span {
        let start = self.start.min(other.start);
        let end = self.end().max(other.end());
        Span {
            start,
            len: end - start,
        }
    }

    #[inline]
    pub fn to_range(self) -> std::ops::Range<usize> {
        self.start as usize..self.end() as usize
    }

    /// The source text this span covers, or `""` if it lies outside `source`.
    #[inline]
    pub fn text(self, source: &str) -> &str {
        source.get(self.to_range()).unwrap_or("")
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end())
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end())
    }
}

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::Span;
    crate::static_assert_size!(Span, 8);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_covers_both() {
        let merged = Span::new(10, 5).merge(Span::new(2, 3));
        assert_eq!(merged, Span::new(2, 13));
        assert_eq!(merged.end(), 15);
    }

    #[test]
    fn text_compares_by_content() {
        let source = "abc xyz abc";
        let first = Span::new(0, 3);
        let second = Span::new(8, 3);
        assert_ne!(first, second);
        assert_eq!(first.text(source), second.text(source));
        assert_ne!(first.text(source), Span::new(4, 3).text(source));
    }

    #[test]
    fn text_out_of_bounds_is_empty() {
        assert_eq!(Span::new(40, 2).text("short"), "");
        assert!(Span::DUMMY.is_empty());
    }
}
