use crate::{layout::ScaledImage, style::TextStyle, Colour, Coord, Dim, LayoutError, LineStyle, Pt};

/// Somewhere to draw. Coordinates have the y axis pointing up.
///
/// A [`SinglePage`](super::SinglePage) draws exactly where it is told. A
/// [`PageGrouping`](super::PageGrouping) treats y as a position on an endless
/// logical page and moves or splits each primitive onto the physical pages it
/// lands on.
pub trait RenderTarget {
    /// Lines are drawn from top to bottom: `start.y` must be at least `end.y`
    fn draw_line(&mut self, start: Coord, end: Coord, style: &LineStyle) -> Result<(), LayoutError>;

    /// Fills the rectangle hanging down from `top_left`
    fn fill_rect(&mut self, top_left: Coord, dim: Dim, colour: Colour) -> Result<(), LayoutError>;

    /// Draws one run of text starting at `baseline_left`
    fn draw_styled_text(
        &mut self,
        baseline_left: Coord,
        text: &str,
        style: &TextStyle,
    ) -> Result<(), LayoutError>;

    /// Draws an image resting on `bottom_left` and returns the y of its bottom
    /// edge. The result is lower than `bottom_left.y` when the image had to move
    /// down so that it doesn't hang over the top of a page.
    fn draw_image(&mut self, bottom_left: Coord, image: &ScaledImage) -> Result<Pt, LayoutError>;
}
