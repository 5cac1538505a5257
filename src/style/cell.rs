use crate::{BorderStyle, Colour, Dim, Padding, Pt, DEFAULT_TEXT_PADDING, NO_BORDERS, NO_PADDING};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Vertical {
    Top,
    Middle,
    Bottom,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Horizontal {
    Left,
    Center,
    Right,
}

/// Where content sits inside a box that is larger than the content
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Align {
    #[default]
    TopLeft,
    TopCenter,
    TopRight,
    MiddleLeft,
    MiddleCenter,
    MiddleRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl Align {
    fn split(self) -> (Vertical, Horizontal) {
        match self {
            Align::TopLeft => (Vertical::Top, Horizontal::Left),
            Align::TopCenter => (Vertical::Top, Horizontal::Center),
            Align::TopRight => (Vertical::Top, Horizontal::Right),
            Align::MiddleLeft => (Vertical::Middle, Horizontal::Left),
            Align::MiddleCenter => (Vertical::Middle, Horizontal::Center),
            Align::MiddleRight => (Vertical::Middle, Horizontal::Right),
            Align::BottomLeft => (Vertical::Bottom, Horizontal::Left),
            Align::BottomCenter => (Vertical::Bottom, Horizontal::Center),
            Align::BottomRight => (Vertical::Bottom, Horizontal::Right),
        }
    }

    /// The padding that places a box of size `inner` inside `outer` with this
    /// alignment. No padding when the content already fills the box.
    pub fn calc_padding(self, outer: Dim, inner: Dim) -> Padding {
        if outer.lte(inner) {
            return NO_PADDING;
        }
        let (vertical, horizontal) = self.split();
        let dx = (outer.width() - inner.width()).max(Pt::ZERO);
        let dy = (outer.height() - inner.height()).max(Pt::ZERO);

        let (top, bottom) = match vertical {
            Vertical::Top => (Pt::ZERO, dy),
            Vertical::Middle => (dy / 2.0, dy - dy / 2.0),
            Vertical::Bottom => (dy, Pt::ZERO),
        };
        let (left, right) = match horizontal {
            Horizontal::Left => (Pt::ZERO, dx),
            Horizontal::Center => (dx / 2.0, dx - dx / 2.0),
            Horizontal::Right => (dx, Pt::ZERO),
        };
        Padding::new(top, right, bottom, left).unwrap_or(NO_PADDING)
    }

    /// How far from the left edge of `outer_width` a row of `inner_width` starts
    pub fn left_offset(self, outer_width: Pt, inner_width: Pt) -> Pt {
        let dx = outer_width - inner_width;
        if dx <= Pt::ZERO {
            return Pt::ZERO;
        }
        match self.split().1 {
            Horizontal::Left => Pt::ZERO,
            Horizontal::Center => dx / 2.0,
            Horizontal::Right => dx,
        }
    }
}

/// How a [`Cell`](crate::layout::Cell) is laid out and decorated
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CellStyle {
    align: Align,
    padding: Padding,
    bg_colour: Option<Colour>,
    border_style: BorderStyle,
}

impl Default for CellStyle {
    fn default() -> Self {
        CellStyle {
            align: Align::TopLeft,
            padding: DEFAULT_TEXT_PADDING,
            bg_colour: None,
            border_style: NO_BORDERS,
        }
    }
}

impl CellStyle {
    pub fn builder() -> CellStyleBuilder {
        CellStyleBuilder {
            style: CellStyle::default(),
        }
    }

    pub fn align(&self) -> Align {
        self.align
    }

    pub fn padding(&self) -> Padding {
        self.padding
    }

    pub fn bg_colour(&self) -> Option<Colour> {
        self.bg_colour
    }

    pub fn border_style(&self) -> BorderStyle {
        self.border_style
    }

    pub fn with_align(self, align: Align) -> CellStyle {
        CellStyle { align, ..self }
    }

    pub fn with_padding(self, padding: Padding) -> CellStyle {
        CellStyle { padding, ..self }
    }

    pub fn with_bg_colour(self, bg_colour: Option<Colour>) -> CellStyle {
        CellStyle { bg_colour, ..self }
    }

    pub fn with_border_style(self, border_style: BorderStyle) -> CellStyle {
        CellStyle {
            border_style,
            ..self
        }
    }
}

/// Starts from [`CellStyle::default`]
#[derive(Debug, Clone)]
pub struct CellStyleBuilder {
    style: CellStyle,
}

impl CellStyleBuilder {
    pub fn align(mut self, align: Align) -> Self {
        self.style.align = align;
        self
    }

    pub fn padding(mut self, padding: Padding) -> Self {
        self.style.padding = padding;
        self
    }

    pub fn bg_colour(mut self, colour: Colour) -> Self {
        self.style.bg_colour = Some(colour);
        self
    }

    pub fn border_style(mut self, border_style: BorderStyle) -> Self {
        self.style.border_style = border_style;
        self
    }

    pub fn build(self) -> CellStyle {
        self.style
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colours;

    fn dim(w: f32, h: f32) -> Dim {
        Dim::new(Pt(w), Pt(h)).unwrap()
    }

    fn pad(t: f32, r: f32, b: f32, l: f32) -> Padding {
        Padding::new(Pt(t), Pt(r), Pt(b), Pt(l)).unwrap()
    }

    #[test]
    fn calculates_alignment_padding() {
        let outer = dim(100.0, 50.0);
        let inner = dim(60.0, 20.0);
        assert_eq!(Align::TopLeft.calc_padding(outer, inner), pad(0.0, 40.0, 30.0, 0.0));
        assert_eq!(Align::TopCenter.calc_padding(outer, inner), pad(0.0, 20.0, 30.0, 20.0));
        assert_eq!(Align::MiddleCenter.calc_padding(outer, inner), pad(15.0, 20.0, 15.0, 20.0));
        assert_eq!(Align::BottomRight.calc_padding(outer, inner), pad(30.0, 0.0, 0.0, 40.0));
        assert_eq!(Align::MiddleLeft.calc_padding(outer, inner), pad(15.0, 40.0, 15.0, 0.0));
    }

    #[test]
    fn no_padding_when_content_fills_the_box() {
        let outer = dim(100.0, 50.0);
        assert_eq!(Align::BottomRight.calc_padding(outer, outer), NO_PADDING);
        assert_eq!(Align::MiddleCenter.calc_padding(outer, dim(120.0, 80.0)), NO_PADDING);
        // wider content but spare height
        assert_eq!(Align::BottomLeft.calc_padding(outer, dim(120.0, 10.0)), pad(40.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn calculates_left_offsets() {
        assert_eq!(Align::TopLeft.left_offset(Pt(100.0), Pt(30.0)), Pt(0.0));
        assert_eq!(Align::MiddleCenter.left_offset(Pt(100.0), Pt(30.0)), Pt(35.0));
        assert_eq!(Align::BottomRight.left_offset(Pt(100.0), Pt(30.0)), Pt(70.0));
        assert_eq!(Align::BottomRight.left_offset(Pt(100.0), Pt(130.0)), Pt(0.0));
    }

    #[test]
    fn builder_and_copies_agree() {
        let built = CellStyle::builder()
            .align(Align::MiddleRight)
            .padding(NO_PADDING)
            .bg_colour(colours::LIGHT_GREY)
            .build();
        let copied = CellStyle::default()
            .with_align(Align::MiddleRight)
            .with_padding(NO_PADDING)
            .with_bg_colour(Some(colours::LIGHT_GREY));
        assert_eq!(built, copied);
        assert!(built.border_style().is_empty());
    }
}
