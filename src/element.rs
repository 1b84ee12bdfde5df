//! The row/column [`Element`] encoding (spec.md §3 "Element").
//!
//! A signed integer uniformly labels a row (negative) or a column
//! (positive); zero is invalid. Mirrors `CMRrowToElement`/`CMRcolumnToElement`
//! in the source's `element.h`.

use std::fmt;

/// A row or column element. `Element::row(r) != Element::column(r)` for all
/// `r`, and `Element` is never zero.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Element(i64);

impl Element {
    /// Builds the element representing row `row` (0-based).
    pub fn row(row: usize) -> Self {
        Element(-1 - row as i64)
    }

    /// Builds the element representing column `column` (0-based).
    pub fn column(column: usize) -> Self {
        Element(1 + column as i64)
    }

    pub fn is_row(self) -> bool {
        self.0 < 0
    }

    pub fn is_column(self) -> bool {
        self.0 > 0
    }

    pub fn is_valid(self) -> bool {
        self.0 != 0
    }

    /// Panics if `self` is not a row element.
    pub fn row_index(self) -> usize {
        assert!(self.is_row(), "element {self:?} is not a row");
        (-1 - self.0) as usize
    }

    /// Panics if `self` is not a column element.
    pub fn column_index(self) -> usize {
        assert!(self.is_column(), "element {self:?} is not a column");
        (self.0 - 1) as usize
    }

    /// The raw signed encoding, as used by [`crate::series_parallel::Reduction`].
    pub fn raw(self) -> i64 {
        self.0
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_row() {
            write!(f, "r{}", self.row_index() + 1)
        } else if self.is_column() {
            write!(f, "c{}", self.column_index() + 1)
        } else {
            write!(f, "<invalid>")
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_column_round_trip() {
        for r in 0..10 {
            let e = Element::row(r);
            assert!(e.is_row());
            assert!(!e.is_column());
            assert_eq!(e.row_index(), r);
        }
        for c in 0..10 {
            let e = Element::column(c);
            assert!(e.is_column());
            assert!(!e.is_row());
            assert_eq!(e.column_index(), c);
        }
    }

    #[test]
    fn display_matches_source_convention() {
        assert_eq!(format!("{}", Element::row(0)), "r1");
        assert_eq!(format!("{}", Element::column(2)), "c3");
    }
}
