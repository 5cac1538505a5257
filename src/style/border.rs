use crate::{Colour, LayoutError, LineStyle, Pt};

/// The four sides of a box border, each optional. Listed top, right, bottom,
/// left like CSS.
///
/// Neighbouring cells each draw their own borders; when two cells share an
/// edge the one drawn last wins.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct BorderStyle {
    pub top: Option<LineStyle>,
    pub right: Option<LineStyle>,
    pub bottom: Option<LineStyle>,
    pub left: Option<LineStyle>,
}

pub const NO_BORDERS: BorderStyle = BorderStyle {
    top: None,
    right: None,
    bottom: None,
    left: None,
};

impl BorderStyle {
    /// The same line on all four sides
    pub fn all(line: LineStyle) -> BorderStyle {
        BorderStyle {
            top: Some(line),
            right: Some(line),
            bottom: Some(line),
            left: Some(line),
        }
    }

    pub fn builder() -> BorderStyleBuilder {
        BorderStyleBuilder::default()
    }

    pub fn is_empty(&self) -> bool {
        self == &NO_BORDERS
    }
}

#[derive(Debug, Default, Copy, Clone)]
struct Side {
    colour: Option<Colour>,
    width: Option<Pt>,
}

/// Builds a [`BorderStyle`] side by side. Calls are applied in order, so a side
/// set after [`colour`](BorderStyleBuilder::colour) keeps its own colour.
#[derive(Debug, Default, Clone)]
pub struct BorderStyleBuilder {
    sides: [Side; 4],
}

impl BorderStyleBuilder {
    fn side(mut self, idx: usize, colour: Colour, width: Pt) -> Self {
        self.sides[idx] = Side {
            colour: Some(colour),
            width: Some(width),
        };
        self
    }

    pub fn top(self, colour: Colour, width: Pt) -> Self {
        self.side(0, colour, width)
    }

    pub fn right(self, colour: Colour, width: Pt) -> Self {
        self.side(1, colour, width)
    }

    pub fn bottom(self, colour: Colour, width: Pt) -> Self {
        self.side(2, colour, width)
    }

    pub fn left(self, colour: Colour, width: Pt) -> Self {
        self.side(3, colour, width)
    }

    /// Sets the colour of all four sides
    pub fn colour(mut self, colour: Colour) -> Self {
        for side in self.sides.iter_mut() {
            side.colour = Some(colour);
        }
        self
    }

    /// Sets the width of all four sides
    pub fn width(mut self, width: Pt) -> Self {
        for side in self.sides.iter_mut() {
            side.width = Some(width);
        }
        self
    }

    /// A side is drawn if it has a colour. Sides without a width are 1pt wide.
    pub fn build(self) -> Result<BorderStyle, LayoutError> {
        let mut lines = [None; 4];
        for (line, side) in lines.iter_mut().zip(self.sides) {
            if let Some(colour) = side.colour {
                *line = Some(LineStyle::new(colour, side.width.unwrap_or(Pt(1.0)))?);
            }
        }
        let [top, right, bottom, left] = lines;
        Ok(BorderStyle {
            top,
            right,
            bottom,
            left,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colours;

    #[test]
    fn later_side_overrides_uniform_colour() {
        let border = BorderStyle::builder()
            .colour(colours::BLACK)
            .left(colours::RED, Pt(2.0))
            .build()
            .unwrap();
        assert_eq!(border.top, Some(LineStyle::of_colour(colours::BLACK)));
        assert_eq!(border.left, Some(LineStyle::new(colours::RED, Pt(2.0)).unwrap()));
    }

    #[test]
    fn uniform_colour_after_side_recolours_it() {
        let border = BorderStyle::builder()
            .left(colours::RED, Pt(2.0))
            .colour(colours::BLUE)
            .build()
            .unwrap();
        assert_eq!(border.left, Some(LineStyle::new(colours::BLUE, Pt(2.0)).unwrap()));
        assert_eq!(border.right, Some(LineStyle::of_colour(colours::BLUE)));
    }

    #[test]
    fn sides_without_colour_are_not_drawn() {
        let border = BorderStyle::builder().top(colours::RED, Pt(1.0)).build().unwrap();
        assert!(border.right.is_none() && border.bottom.is_none() && border.left.is_none());
        assert!(BorderStyle::builder().build().unwrap().is_empty());
        assert!(BorderStyle::builder().colour(colours::RED).width(Pt(0.0)).build().is_err());
    }
}
