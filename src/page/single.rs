use super::{DrawOp, ItemSet, RenderTarget, BACKGROUND_Z, DEFAULT_Z};
use crate::{layout::ScaledImage, style::TextStyle, Colour, Coord, Dim, LayoutError, LineStyle, Pt};

/// The buffered contents of one physical page.
///
/// Drawing on a `SinglePage` never moves anything to another page, which makes
/// it the place for content that must land on a specific page. Every x
/// coordinate is shifted by the page's offset from the page reactor.
#[derive(Debug, Clone)]
pub struct SinglePage {
    page_num: usize,
    x_off: Pt,
    items: ItemSet,
}

impl SinglePage {
    pub(crate) fn new(page_num: usize, x_off: Pt) -> SinglePage {
        SinglePage {
            page_num,
            x_off,
            items: ItemSet::new(),
        }
    }

    /// Counting from 1 across the whole document
    pub fn page_num(&self) -> usize {
        self.page_num
    }

    pub fn x_off(&self) -> Pt {
        self.x_off
    }

    pub fn items(&self) -> &ItemSet {
        &self.items
    }

    /// Adds a primitive with an explicit z index
    pub fn add(&mut self, z: f32, op: DrawOp) {
        self.items.insert(z, op.shifted(self.x_off));
    }
}

impl RenderTarget for SinglePage {
    fn draw_line(&mut self, start: Coord, end: Coord, style: &LineStyle) -> Result<(), LayoutError> {
        self.add(
            DEFAULT_Z,
            DrawOp::Line {
                start,
                end,
                style: *style,
            },
        );
        Ok(())
    }

    fn fill_rect(&mut self, top_left: Coord, dim: Dim, colour: Colour) -> Result<(), LayoutError> {
        let bottom_left = top_left.with_y(top_left.y - dim.height());
        self.add(
            BACKGROUND_Z,
            DrawOp::FillRect {
                bottom_left,
                dim,
                colour,
            },
        );
        Ok(())
    }

    fn draw_styled_text(
        &mut self,
        baseline_left: Coord,
        text: &str,
        style: &TextStyle,
    ) -> Result<(), LayoutError> {
        self.add(
            DEFAULT_Z,
            DrawOp::Text {
                baseline_left,
                text: text.to_string(),
                style: style.clone(),
            },
        );
        Ok(())
    }

    fn draw_image(&mut self, bottom_left: Coord, image: &ScaledImage) -> Result<Pt, LayoutError> {
        self.add(
            DEFAULT_Z,
            DrawOp::Image {
                bottom_left,
                image: image.clone(),
            },
        );
        Ok(bottom_left.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colours;

    fn c(x: f32, y: f32) -> Coord {
        Coord::new(Pt(x), Pt(y))
    }

    #[test]
    fn offsets_x_but_not_y() {
        let mut page = SinglePage::new(3, Pt(20.0));
        page.draw_line(c(0.0, 100.0), c(50.0, 10.0), &LineStyle::default())
            .unwrap();
        match page.items().iter().next() {
            Some(DrawOp::Line { start, end, .. }) => {
                assert_eq!(*start, c(20.0, 100.0));
                assert_eq!(*end, c(70.0, 10.0));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(page.page_num(), 3);
    }

    #[test]
    fn fills_paint_below_later_content() {
        let mut page = SinglePage::new(1, Pt::ZERO);
        page.draw_line(c(0.0, 10.0), c(10.0, 0.0), &LineStyle::default())
            .unwrap();
        let dim = Dim::new(Pt(10.0), Pt(5.0)).unwrap();
        page.fill_rect(c(0.0, 10.0), dim, colours::LIGHT_GREY).unwrap();

        let ops: Vec<&DrawOp> = page.items().iter().collect();
        match ops[0] {
            DrawOp::FillRect { bottom_left, .. } => assert_eq!(*bottom_left, c(0.0, 5.0)),
            other => panic!("expected the fill first, got {other:?}"),
        }
        assert!(matches!(ops[1], DrawOp::Line { .. }));
    }
}
