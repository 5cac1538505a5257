use crate::{colours, Colour, LayoutError, Pt};

/// The colour and thickness of a stroked line
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LineStyle {
    colour: Colour,
    width: Pt,
}

impl Default for LineStyle {
    fn default() -> Self {
        LineStyle {
            colour: colours::BLACK,
            width: Pt(1.0),
        }
    }
}

impl LineStyle {
    /// Fails unless `width` is strictly positive
    pub fn new(colour: Colour, width: Pt) -> Result<LineStyle, LayoutError> {
        if !(width.0 > 0.0) {
            return Err(LayoutError::InvalidLineWidth(width.0));
        }
        Ok(LineStyle { colour, width })
    }

    /// A 1pt line in `colour`
    pub fn of_colour(colour: Colour) -> LineStyle {
        LineStyle {
            colour,
            width: Pt(1.0),
        }
    }

    pub fn colour(&self) -> Colour {
        self.colour
    }

    pub fn width(&self) -> Pt {
        self.width
    }
}
