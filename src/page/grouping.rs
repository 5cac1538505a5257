use super::{DrawOp, ItemSet, LayoutManager, RenderTarget, BACKGROUND_Z, DEFAULT_Z};
use crate::{
    layout::{Cell, Renderable, ScaledImage, Table},
    pagesize::Orientation,
    style::TextStyle,
    writer::DocumentWriter,
    Colour, Coord, Dim, LayoutError, LineStyle, Pt,
};

/// The body of a logical page, in page coordinates
#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct Body {
    pub left: Pt,
    pub bottom: Pt,
    pub width: Pt,
    pub height: Pt,
}

impl Body {
    pub fn top(&self) -> Pt {
        self.bottom + self.height
    }
}

/// A logical page: a run of physical pages that share an orientation, margins
/// and header/footer content.
///
/// ```text
///   +--------------------+
///   |                    |
///   |   +------------+   | <- body_top()
///   |   |            |   |
///   |   |    Body    |   |
///   |   |            |   |
///   |   +------------+   | <- body_bottom()
///   |                    |
///   +--------------------+
/// (0,0)
/// ```
///
/// y is measured from the bottom of the first page. Anything drawn below
/// `body_bottom()` continues at the top of the next page's body, so a y of
/// `body_bottom() - 1` is on the second page. Lines and rectangles that cross a
/// page break are split into one piece per page.
pub struct PageGrouping<'m, W: DocumentWriter> {
    mgr: &'m mut LayoutManager<W>,
    orientation: Orientation,
    body: Body,
    border_items: ItemSet,
    valid: bool,
}

impl<'m, W: DocumentWriter> PageGrouping<'m, W> {
    pub(crate) fn new(mgr: &'m mut LayoutManager<W>, orientation: Orientation, body: Body) -> PageGrouping<'m, W> {
        PageGrouping {
            mgr,
            orientation,
            body,
            border_items: ItemSet::new(),
            valid: true,
        }
    }

    fn check(&self) -> Result<(), LayoutError> {
        if self.valid {
            Ok(())
        } else {
            Err(LayoutError::GroupingCommitted)
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn body_top(&self) -> Pt {
        self.body.top()
    }

    /// The page is always at 0, so this is also the bottom margin
    pub fn body_bottom(&self) -> Pt {
        self.body.bottom
    }

    pub fn body_left(&self) -> Pt {
        self.body.left
    }

    pub fn body_height(&self) -> Pt {
        self.body.height
    }

    pub fn body_width(&self) -> Pt {
        self.body.width
    }

    /// The short side in portrait, the long side in landscape
    pub fn page_width(&self) -> Pt {
        match self.orientation {
            Orientation::Portrait => self.mgr.page_dim().width(),
            Orientation::Landscape => self.mgr.page_dim().height(),
        }
    }

    /// Fills the band between `top` and `bottom`, split at each page break
    pub fn fill_rect_between(
        &mut self,
        left: Pt,
        width: Pt,
        top: Pt,
        bottom: Pt,
        colour: Colour,
    ) -> Result<(), LayoutError> {
        self.check()?;
        if !(top >= bottom) {
            return Err(LayoutError::InvertedRect {
                top: top.0,
                bottom: bottom.0,
            });
        }
        let (first, y_first, _) = self.mgr.appropriate_page(&self.body, top, Pt::ZERO)?;
        let (last, y_last, _) = self.mgr.appropriate_page(&self.body, bottom, Pt::ZERO)?;

        for idx in first..=last {
            let ya = if idx == first { y_first } else { self.body.top() };
            let yb = if idx == last { y_last } else { self.body.bottom };
            let dim = Dim::new(width, ya - yb)?;
            self.mgr
                .page_at(idx)?
                .fill_rect(Coord::new(left, ya), dim, colour)?;
        }
        Ok(())
    }

    /// Draws a cell at its own width, returning its lower-right corner
    pub fn draw_cell(&mut self, x: Pt, y: Pt, cell: &Cell) -> Result<Coord, LayoutError> {
        self.check()?;
        let dim = cell.calc_dimensions(cell.width())?;
        cell.render(self, Coord::new(x, y), dim.with_width(cell.width())?)
    }

    /// Draws cells side by side, all as tall as the tallest. Returns the lowest y
    /// reached.
    pub fn put_row(&mut self, x: Pt, y: Pt, cells: &[&Cell]) -> Result<Pt, LayoutError> {
        self.check()?;
        let mut height = Pt::ZERO;
        for cell in cells {
            height = height.max(cell.calc_dimensions(cell.width())?.height());
        }

        let mut lowest = y - height;
        let mut left = x;
        for cell in cells {
            let end = cell.render(self, Coord::new(left, y), Dim::new(cell.width(), height)?)?;
            lowest = lowest.min(end.y);
            left += cell.width();
        }
        Ok(lowest)
    }

    pub fn draw_table(&mut self, top_left: Coord, table: &Table) -> Result<Coord, LayoutError> {
        self.check()?;
        let dim = table.calc_dimensions(table.width())?;
        table.render(self, top_left, dim)
    }

    /// Draws a cell on every physical page of this logical page, at the same
    /// position on each. Nothing here is split across pages. Returns the bottom y.
    pub fn put_cell_as_header_footer(&mut self, x: Pt, y: Pt, cell: &Cell) -> Result<Pt, LayoutError> {
        self.check()?;
        let dim = cell.calc_dimensions(cell.width())?;
        let mut target = BorderTarget {
            items: &mut self.border_items,
        };
        let end = cell.render(&mut target, Coord::new(x, y), dim.with_width(cell.width())?)?;
        Ok(end.y)
    }

    /// Flushes every page of this logical page to the writer. Any later call on
    /// this grouping fails.
    pub fn commit(&mut self) -> Result<(), LayoutError> {
        self.check()?;
        self.mgr.commit_pages(self.orientation, &self.border_items)?;
        self.valid = false;
        log::debug!("committed {:?} logical page", self.orientation);
        Ok(())
    }
}

impl<W: DocumentWriter> RenderTarget for PageGrouping<'_, W> {
    fn draw_line(&mut self, start: Coord, end: Coord, style: &LineStyle) -> Result<(), LayoutError> {
        self.check()?;
        if start.y < end.y {
            return Err(LayoutError::InvertedLine {
                y1: start.y.0,
                y2: end.y.0,
            });
        }
        let (first, y_first, _) = self.mgr.appropriate_page(&self.body, start.y, Pt::ZERO)?;
        let (last, y_last, _) = self.mgr.appropriate_page(&self.body, end.y, Pt::ZERO)?;
        if first == last {
            return self
                .mgr
                .page_at(first)?
                .draw_line(start.with_y(y_first), end.with_y(y_last), style);
        }

        let x_diff = end.x - start.x;
        let y_diff = start.y - end.y;
        let mut xa = start.x;
        for idx in first..=last {
            let ya = if idx == first { y_first } else { self.body.top() };
            let (xb, yb) = if idx == last {
                (end.x, y_last)
            } else {
                let yb = self.body.bottom;
                // x where the line leaves this page, in proportion to the height covered
                (xa + x_diff * ((ya - yb) / y_diff), yb)
            };
            self.mgr
                .page_at(idx)?
                .draw_line(Coord::new(xa, ya), Coord::new(xb, yb), style)?;
            xa = xb;
        }
        Ok(())
    }

    fn fill_rect(&mut self, top_left: Coord, dim: Dim, colour: Colour) -> Result<(), LayoutError> {
        let bottom = top_left.y - dim.height();
        self.fill_rect_between(top_left.x, dim.width(), top_left.y, bottom, colour)
    }

    fn draw_styled_text(
        &mut self,
        baseline_left: Coord,
        text: &str,
        style: &TextStyle,
    ) -> Result<(), LayoutError> {
        self.check()?;
        let (idx, y, _) = self.mgr.appropriate_page(&self.body, baseline_left.y, Pt::ZERO)?;
        self.mgr
            .page_at(idx)?
            .draw_styled_text(baseline_left.with_y(y), text, style)
    }

    fn draw_image(&mut self, bottom_left: Coord, image: &ScaledImage) -> Result<Pt, LayoutError> {
        self.check()?;
        let (idx, y, adj) = self
            .mgr
            .appropriate_page(&self.body, bottom_left.y, image.dim().height())?;
        self.mgr.page_at(idx)?.draw_image(bottom_left.with_y(y), image)?;
        Ok(bottom_left.y + adj)
    }
}

/// Collects header and footer content for every page of a grouping
struct BorderTarget<'a> {
    items: &'a mut ItemSet,
}

impl RenderTarget for BorderTarget<'_> {
    fn draw_line(&mut self, start: Coord, end: Coord, style: &LineStyle) -> Result<(), LayoutError> {
        self.items.insert(
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
        self.items.insert(
            BACKGROUND_Z,
            DrawOp::FillRect {
                bottom_left: top_left.with_y(top_left.y - dim.height()),
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
        self.items.insert(
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
        self.items.insert(
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
    use crate::{
        colours,
        layout::{Margins, Text},
        pagesize::LETTER,
        style::CellStyle,
        writer::{Recorded, RecordingWriter},
        BorderStyle, BuiltinFont, Font, NO_BORDERS,
    };
    use std::rc::Rc;

    fn c(x: f32, y: f32) -> Coord {
        Coord::new(Pt(x), Pt(y))
    }

    #[test]
    fn landscape_swaps_the_body() {
        let mut mgr = LayoutManager::new(RecordingWriter::new(), LETTER);
        let lp = mgr
            .logical_page_start_with_margins(Orientation::Landscape, Margins::all(Pt(36.0)))
            .unwrap();
        assert_eq!(lp.page_width(), Pt(792.0));
        assert_eq!(lp.body_width(), Pt(720.0));
        assert_eq!(lp.body_height(), Pt(540.0));
        assert_eq!(lp.body_top(), Pt(576.0));
    }

    #[test]
    fn rejects_upside_down_lines() {
        let mut mgr = LayoutManager::new(RecordingWriter::new(), LETTER);
        let mut lp = mgr.logical_page_start(Orientation::Portrait).unwrap();
        let result = lp.draw_line(c(0.0, 10.0), c(0.0, 20.0), &LineStyle::default());
        assert!(matches!(result, Err(LayoutError::InvertedLine { .. })));
        let result = lp.fill_rect_between(Pt(0.0), Pt(10.0), Pt(5.0), Pt(6.0), colours::BLACK);
        assert!(matches!(result, Err(LayoutError::InvertedRect { .. })));
    }

    #[test]
    fn everything_fails_after_commit() {
        let mut mgr = LayoutManager::new(RecordingWriter::new(), LETTER);
        let mut lp = mgr.logical_page_start(Orientation::Portrait).unwrap();
        lp.commit().unwrap();

        let err = lp.draw_line(c(0.0, 20.0), c(0.0, 10.0), &LineStyle::default());
        assert!(matches!(err, Err(LayoutError::GroupingCommitted)));
        assert!(lp.fill_rect(c(0.0, 20.0), Dim::ZERO, colours::BLACK).is_err());
        assert!(lp.commit().is_err());
        assert_eq!(
            LayoutError::GroupingCommitted.to_string(),
            "logical page accessed after commit"
        );
    }

    #[test]
    fn header_cells_repeat_on_every_page() {
        let style = TextStyle::new(Rc::new(Font::builtin(BuiltinFont::Courier)), Pt(10.0), colours::BLACK).unwrap();
        let border = BorderStyle {
            top: Some(LineStyle::default()),
            ..NO_BORDERS
        };
        let header = Cell::builder(CellStyle::default().with_border_style(border), Pt(200.0))
            .add_text(Text::new(style, "Page header"))
            .build()
            .unwrap();

        let mut mgr = LayoutManager::new(RecordingWriter::new(), LETTER);
        let mut lp = mgr.logical_page_start(Orientation::Portrait).unwrap();
        let header_bottom = lp.put_cell_as_header_footer(Pt(40.0), Pt(790.0), &header).unwrap();
        assert!(header_bottom > lp.body_top());
        // reaches the third page
        let bottom = lp.body_bottom() - lp.body_height() - Pt(1.0);
        lp.draw_line(c(100.0, 700.0), c(100.0, bottom.0), &LineStyle::default())
            .unwrap();
        lp.commit().unwrap();

        let writer = mgr.writer();
        assert_eq!(writer.page_count(), 3);
        let mut baselines = Vec::new();
        for page in 0..3 {
            let events = writer.page_events(page);
            assert_eq!(events.len(), 3);
            let texts: Vec<Coord> = events
                .iter()
                .filter_map(|event| match event {
                    Recorded::Text {
                        text, baseline_left, ..
                    } if text == "Page header" => Some(*baseline_left),
                    _ => None,
                })
                .collect();
            assert_eq!(texts.len(), 1);
            baselines.push(texts[0]);

            let header_lines = events
                .iter()
                .filter(|event| matches!(event, Recorded::Line { start, end, .. }
                    if *start == c(40.0, 790.0) && *end == c(240.0, 790.0)))
                .count();
            assert_eq!(header_lines, 1);
        }
        assert!(baselines.iter().all(|&b| b == baselines[0]));
    }

    #[test]
    fn far_away_coordinates_fail_without_allocating() {
        let style = TextStyle::new(Rc::new(Font::builtin(BuiltinFont::Courier)), Pt(10.0), colours::BLACK).unwrap();
        let mut mgr = LayoutManager::new(RecordingWriter::new(), LETTER);
        let mut lp = mgr.logical_page_start(Orientation::Portrait).unwrap();

        let result = lp.draw_styled_text(c(0.0, -1e12), "x", &style);
        assert!(matches!(result, Err(LayoutError::PageLimitExceeded { .. })));
        let result = lp.draw_line(c(0.0, 100.0), c(0.0, f32::NEG_INFINITY), &LineStyle::default());
        assert!(matches!(result, Err(LayoutError::NonFiniteCoordinate(_))));
        let result = lp.fill_rect_between(Pt(0.0), Pt(10.0), Pt(100.0), Pt(-1e9), colours::BLACK);
        assert!(matches!(result, Err(LayoutError::PageLimitExceeded { .. })));

        lp.commit().unwrap();
        assert_eq!(mgr.writer().page_count(), 1);
    }
}
