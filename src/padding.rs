use crate::{Coord, Dim, LayoutError, Pt};

/// Spacing inside a box, listed top, right, bottom, left like CSS.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Padding {
    top: Pt,
    right: Pt,
    bottom: Pt,
    left: Pt,
}

/// No padding at all
pub const NO_PADDING: Padding = Padding::unchecked(0.0, 0.0, 0.0, 0.0);

/// The padding used around text in cells when nothing else is asked for
pub const DEFAULT_TEXT_PADDING: Padding = Padding::unchecked(1.5, 1.5, 2.0, 1.5);

impl Padding {
    const fn unchecked(top: f32, right: f32, bottom: f32, left: f32) -> Padding {
        Padding {
            top: Pt(top),
            right: Pt(right),
            bottom: Pt(bottom),
            left: Pt(left),
        }
    }

    /// Create padding by specifying individual components in a clockwise fashion
    /// starting at the top
    pub fn new(top: Pt, right: Pt, bottom: Pt, left: Pt) -> Result<Padding, LayoutError> {
        if [top, right, bottom, left].iter().any(|p| !(p.0 >= 0.0)) {
            return Err(LayoutError::NegativePadding {
                top: top.0,
                right: right.0,
                bottom: bottom.0,
                left: left.0,
            });
        }
        Ok(Padding {
            top,
            right,
            bottom,
            left,
        })
    }

    /// Create padding where all values are equal
    pub fn uniform(value: Pt) -> Result<Padding, LayoutError> {
        Padding::new(value, value, value, value)
    }

    pub fn top(&self) -> Pt {
        self.top
    }

    pub fn right(&self) -> Pt {
        self.right
    }

    pub fn bottom(&self) -> Pt {
        self.bottom
    }

    pub fn left(&self) -> Pt {
        self.left
    }

    /// The space the padding takes from the top-left corner
    pub fn top_left_pad_dim(&self) -> Dim {
        Dim::from((self.left, self.top))
    }

    /// The space the padding takes from the bottom-right corner
    pub fn bot_right_pad_dim(&self) -> Dim {
        Dim::from((self.right, self.bottom))
    }

    /// Shrinks `outer` by the padding, failing if the padding doesn't fit
    pub fn subtract_from(&self, outer: Dim) -> Result<Dim, LayoutError> {
        Dim::new(
            outer.width() - (self.left + self.right),
            outer.height() - (self.top + self.bottom),
        )
    }

    /// Grows `inner` by the padding
    pub fn add_to(&self, inner: Dim) -> Dim {
        inner + self.top_left_pad_dim() + self.bot_right_pad_dim()
    }

    /// Moves a top-left corner inwards by the left and top padding
    pub fn apply_top_left(&self, outer_top_left: Coord) -> Coord {
        Coord::new(outer_top_left.x + self.left, outer_top_left.y - self.top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_matches_four_equal_sides() {
        let a = Pt(3.25);
        assert_eq!(Padding::new(a, a, a, a).unwrap(), Padding::uniform(a).unwrap());
        assert_eq!(Padding::uniform(Pt(0.0)).unwrap(), NO_PADDING);
        assert_eq!(
            Padding::new(Pt(1.5), Pt(1.5), Pt(2.0), Pt(1.5)).unwrap(),
            DEFAULT_TEXT_PADDING
        );
    }

    #[test]
    fn presets_are_the_same_value_everywhere() {
        let first: &'static Padding = &NO_PADDING;
        let second: &'static Padding = &NO_PADDING;
        assert_eq!(first, second);
        assert_eq!(NO_PADDING, Padding::default());
    }

    #[test]
    fn rejects_negative_sides() {
        assert!(Padding::new(Pt(1.0), Pt(-1.0), Pt(1.0), Pt(1.0)).is_err());
        assert!(Padding::uniform(Pt(-0.5)).is_err());
    }

    #[test]
    fn shrinks_and_grows_dims() {
        let pad = Padding::new(Pt(1.0), Pt(2.0), Pt(3.0), Pt(4.0)).unwrap();
        let outer = Dim::new(Pt(100.0), Pt(50.0)).unwrap();
        let inner = pad.subtract_from(outer).unwrap();
        assert_eq!(inner, Dim::new(Pt(94.0), Pt(46.0)).unwrap());
        assert_eq!(pad.add_to(inner), outer);
        assert!(pad.subtract_from(Dim::new(Pt(5.0), Pt(50.0)).unwrap()).is_err());

        let tl = pad.apply_top_left(Coord::new(Pt(10.0), Pt(200.0)));
        assert_eq!(tl, Coord::new(Pt(14.0), Pt(199.0)));
    }
}
