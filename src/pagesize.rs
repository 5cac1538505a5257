//! Pre-defined page sizes and page orientation.
//!
//! All sizes are provided in portrait orientation (width, height) where width ≤ height.
//! The [`LayoutManager`](crate::page::LayoutManager) always allocates physical pages in
//! portrait; a landscape [`PageGrouping`](crate::page::PageGrouping) rotates them.
//!
//! ```
//! use pdf_flow::pagesize::{PageOrientation, A4, LETTER};
//!
//! let page_size = LETTER;
//! let sideways = A4.landscape();
//! assert!(sideways.0 > sideways.1);
//! ```

use crate::units::*;

/// Page dimensions as (width, height) in points.
pub type PageSize = (Pt, Pt);

// north american sizes
pub const LETTER: PageSize = (Pt(8.5 * 72.0), Pt(11.0 * 72.0));
pub const HALF_LETTER: PageSize = (Pt(5.5 * 72.0), Pt(8.5 * 72.0));
pub const LEGAL: PageSize = (Pt(8.5 * 72.0), Pt(14.0 * 72.0));
pub const TABLOID: PageSize = (Pt(11.0 * 72.0), Pt(17.0 * 72.0));

// iso a-series (converted from mm to points)
pub const A3: PageSize = (Pt(297.0 * 72.0 / 25.4), Pt(420.0 * 72.0 / 25.4));
pub const A4: PageSize = (Pt(210.0 * 72.0 / 25.4), Pt(297.0 * 72.0 / 25.4));
pub const A5: PageSize = (Pt(148.0 * 72.0 / 25.4), Pt(210.0 * 72.0 / 25.4));
pub const A6: PageSize = (Pt(105.0 * 72.0 / 25.4), Pt(148.0 * 72.0 / 25.4));

/// How the content of a logical page sits on its physical pages
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Orientation {
    #[default]
    Portrait,
    /// The physical page is rotated 90° so the long edge is horizontal
    Landscape,
}

/// Convert page sizes between portrait and landscape orientations.
pub trait PageOrientation {
    /// Returns the size in portrait orientation (width ≤ height).
    fn portrait(self) -> Self;
    /// Returns the size in landscape orientation (width ≥ height).
    fn landscape(self) -> Self;
    /// Returns the size as seen by content laid out in `orientation`
    fn oriented(self, orientation: Orientation) -> Self;
}

impl PageOrientation for PageSize {
    fn portrait(self) -> Self {
        if self.0 <= self.1 {
            self
        } else {
            (self.1, self.0)
        }
    }

    fn landscape(self) -> PageSize {
        if self.0 >= self.1 {
            self
        } else {
            (self.1, self.0)
        }
    }

    fn oriented(self, orientation: Orientation) -> PageSize {
        match orientation {
            Orientation::Portrait => self.portrait(),
            Orientation::Landscape => self.landscape(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orients_either_way() {
        assert_eq!(LETTER.oriented(Orientation::Portrait), LETTER);
        assert_eq!(LETTER.oriented(Orientation::Landscape), (Pt(792.0), Pt(612.0)));
        let wide = A4.landscape();
        assert_eq!(wide.oriented(Orientation::Portrait), A4);
        assert_eq!(wide.oriented(Orientation::Landscape), wide);
    }
}
