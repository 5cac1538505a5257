use crate::{pagesize::PageSize, LayoutError, Pt};
use std::ops::Add;

/// A non-negative width and height. The invariant is checked whenever a
/// `Dim` is built so layout code never has to second-guess a size.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Dim {
    width: Pt,
    height: Pt,
}

impl Dim {
    pub const ZERO: Dim = Dim {
        width: Pt(0.0),
        height: Pt(0.0),
    };

    pub fn new(width: Pt, height: Pt) -> Result<Dim, LayoutError> {
        // written so that NaN is rejected as well
        if !(width.0 >= 0.0 && height.0 >= 0.0) {
            return Err(LayoutError::NegativeDimension {
                width: width.0,
                height: height.0,
            });
        }
        Ok(Dim { width, height })
    }

    pub fn width(&self) -> Pt {
        self.width
    }

    pub fn height(&self) -> Pt {
        self.height
    }

    pub fn with_width(self, width: Pt) -> Result<Dim, LayoutError> {
        Dim::new(width, self.height)
    }

    pub fn with_height(self, height: Pt) -> Result<Dim, LayoutError> {
        Dim::new(self.width, height)
    }

    pub fn swap_wh(self) -> Dim {
        Dim {
            width: self.height,
            height: self.width,
        }
    }

    /// Component-wise subtraction, failing if either component would go negative
    pub fn checked_sub(self, other: Dim) -> Result<Dim, LayoutError> {
        Dim::new(self.width - other.width, self.height - other.height)
    }

    /// True if both components are less than or equal to the other's
    pub fn lte(self, other: Dim) -> bool {
        self.width <= other.width && self.height <= other.height
    }
}

impl Add for Dim {
    type Output = Dim;

    fn add(self, rhs: Dim) -> Dim {
        Dim {
            width: self.width + rhs.width,
            height: self.height + rhs.height,
        }
    }
}

impl From<PageSize> for Dim {
    fn from((width, height): PageSize) -> Dim {
        Dim {
            width: width.max(Pt::ZERO),
            height: height.max(Pt::ZERO),
        }
    }
}
