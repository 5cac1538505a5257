use crate::{Dim, Pt};
use std::hash::{Hash, Hasher};

/// A point on a page. The y axis points up and the origin is the lower-left
/// corner of the page, so content flows towards smaller y values.
#[derive(Debug, Default, Copy, Clone)]
pub struct Coord {
    pub x: Pt,
    pub y: Pt,
}

impl Coord {
    pub const ORIGIN: Coord = Coord {
        x: Pt(0.0),
        y: Pt(0.0),
    };

    pub fn new(x: Pt, y: Pt) -> Coord {
        Coord { x, y }
    }

    pub fn with_x(self, x: Pt) -> Coord {
        Coord { x, y: self.y }
    }

    pub fn with_y(self, y: Pt) -> Coord {
        Coord { x: self.x, y }
    }

    /// Moves right by the width and down by the height of `dim`, giving the
    /// lower-right corner of a box whose upper-left corner is `self`
    pub fn plus_x_minus_y(self, dim: Dim) -> Coord {
        Coord {
            x: self.x + dim.width(),
            y: self.y - dim.height(),
        }
    }

    /// The right-most x and the lowest y of the two points
    pub fn max_x_min_y(self, other: Coord) -> Coord {
        Coord {
            x: self.x.max(other.x),
            y: self.y.min(other.y),
        }
    }

    /// True if this point is left of and above (or level with) `other`
    pub fn lte(self, other: Coord) -> bool {
        self.x <= other.x && self.y >= other.y
    }
}

// -0.0 and 0.0 are the same point
fn canonical_bits(v: Pt) -> u32 {
    (v.0 + 0.0).to_bits()
}

impl PartialEq for Coord {
    fn eq(&self, other: &Coord) -> bool {
        canonical_bits(self.x) == canonical_bits(other.x)
            && canonical_bits(self.y) == canonical_bits(other.y)
    }
}

impl Eq for Coord {}

impl Hash for Coord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        canonical_bits(self.x).hash(state);
        canonical_bits(self.y).hash(state);
    }
}

impl From<(Pt, Pt)> for Coord {
    fn from((x, y): (Pt, Pt)) -> Coord {
        Coord::new(x, y)
    }
}
