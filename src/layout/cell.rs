use super::{BlockRenderator, FixedItem, Renderable, Renderator, ScaledImage, Text};
use crate::{
    page::RenderTarget,
    style::{Align, CellStyle},
    Coord, Dim, LayoutError, LineStyle, Pt,
};

/// What a [`Cell`] can hold
#[derive(Debug, Clone)]
pub enum CellContent {
    Text(Text),
    Image(ScaledImage),
}

impl CellContent {
    fn renderable(&self) -> &dyn Renderable {
        match self {
            CellContent::Text(text) => text,
            CellContent::Image(image) => image,
        }
    }
}

impl From<Text> for CellContent {
    fn from(text: Text) -> Self {
        CellContent::Text(text)
    }
}

impl From<ScaledImage> for CellContent {
    fn from(image: ScaledImage) -> Self {
        CellContent::Image(image)
    }
}

/// A box of fixed width holding text and images stacked top to bottom. Its
/// height follows from how the content wraps at that width.
#[derive(Debug, Clone)]
pub struct Cell {
    style: CellStyle,
    width: Pt,
    contents: Vec<CellContent>,
}

impl Cell {
    pub fn new(style: CellStyle, width: Pt, contents: Vec<CellContent>) -> Result<Cell, LayoutError> {
        if !(width >= Pt::ZERO) {
            return Err(LayoutError::NegativeCellWidth(width.0));
        }
        Ok(Cell {
            style,
            width,
            contents,
        })
    }

    pub fn builder(style: CellStyle, width: Pt) -> CellBuilder {
        CellBuilder {
            style,
            width,
            contents: Vec::new(),
        }
    }

    pub fn style(&self) -> &CellStyle {
        &self.style
    }

    pub fn width(&self) -> Pt {
        self.width
    }

    pub fn contents(&self) -> &[CellContent] {
        &self.contents
    }

    fn inner_width(&self, outer_width: Pt) -> Pt {
        let padding = self.style.padding();
        outer_width - padding.left() - padding.right()
    }

    /// The size of the stacked content, without padding
    fn content_dim(&self, inner_width: Pt) -> Result<Dim, LayoutError> {
        let mut width = Pt::ZERO;
        let mut height = Pt::ZERO;
        for content in self.contents.iter() {
            let dim = content.renderable().calc_dimensions(inner_width)?;
            width = width.max(dim.width());
            height += dim.height();
        }
        Dim::new(width, height)
    }

    fn draw_borders(&self, target: &mut dyn RenderTarget, top_left: Coord, bottom_right: Coord) -> Result<(), LayoutError> {
        let border = self.style.border_style();
        let top_right = Coord::new(bottom_right.x, top_left.y);
        let bottom_left = Coord::new(top_left.x, bottom_right.y);
        let sides: [(Option<LineStyle>, Coord, Coord); 4] = [
            (border.top, top_left, top_right),
            (border.right, top_right, bottom_right),
            (border.bottom, bottom_left, bottom_right),
            (border.left, top_left, bottom_left),
        ];
        for (line, start, end) in sides {
            if let Some(line) = line {
                target.draw_line(start, end, &line)?;
            }
        }
        Ok(())
    }
}

impl Renderable for Cell {
    /// The padded size of the content. The width is that of the widest piece
    /// of content, which may be less than the cell's own width.
    fn calc_dimensions(&self, max_width: Pt) -> Result<Dim, LayoutError> {
        let content = self.content_dim(self.inner_width(max_width))?;
        Ok(self.style.padding().add_to(content))
    }

    fn render(
        &self,
        target: &mut dyn RenderTarget,
        top_left: Coord,
        outer_dim: Dim,
    ) -> Result<Coord, LayoutError> {
        if let Some(colour) = self.style.bg_colour() {
            target.fill_rect(top_left, outer_dim, colour)?;
        }

        let padding = self.style.padding();
        let align: Align = self.style.align();
        let inner_width = self.inner_width(outer_dim.width());
        let inner_height = outer_dim.height() - padding.top() - padding.bottom();
        let content = self.content_dim(inner_width)?;
        let inner_box = Dim::new(inner_width.max(Pt::ZERO), inner_height.max(Pt::ZERO))?;
        let offset = align.calc_padding(inner_box, content);

        let inner_top_left = padding.apply_top_left(top_left);
        let left = inner_top_left.x;
        let mut y = inner_top_left.y - offset.top();
        for item in self.contents.iter() {
            match item {
                CellContent::Text(text) => {
                    for row in text.wrap(inner_width)?.rows() {
                        let x = left + align.left_offset(inner_width, row.width());
                        y = row.render_at(target, Coord::new(x, y))?.y;
                    }
                }
                CellContent::Image(image) => {
                    let x = left + align.left_offset(inner_width, image.dim().width());
                    y = image.render_at(target, Coord::new(x, y))?.y;
                }
            }
        }

        let bottom = (top_left.y - outer_dim.height()).min(y - padding.bottom());
        let bottom_right = Coord::new(top_left.x + outer_dim.width(), bottom);
        self.draw_borders(target, top_left, bottom_right)?;
        Ok(bottom_right)
    }

    fn renderator(&self) -> Box<dyn Renderator<'_> + '_> {
        Box::new(BlockRenderator::new(self, self.width))
    }
}

/// Collects the content of a [`Cell`]
#[derive(Debug, Clone)]
pub struct CellBuilder {
    style: CellStyle,
    width: Pt,
    contents: Vec<CellContent>,
}

impl CellBuilder {
    pub fn style(mut self, style: CellStyle) -> Self {
        self.style = style;
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.style = self.style.with_align(align);
        self
    }

    pub fn add_text(self, text: Text) -> Self {
        self.add(text)
    }

    pub fn add_image(self, image: ScaledImage) -> Self {
        self.add(image)
    }

    pub fn add<C: Into<CellContent>>(mut self, content: C) -> Self {
        self.contents.push(content.into());
        self
    }

    pub fn width(&self) -> Pt {
        self.width
    }

    /// Fails if the width is negative
    pub fn build(self) -> Result<Cell, LayoutError> {
        Cell::new(self.style, self.width, self.contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        colours,
        page::{DrawOp, SinglePage},
        style::TextStyle,
        BorderStyle, BuiltinFont, Font, Padding, NO_PADDING,
    };
    use std::rc::Rc;

    /// Courier at 20pt is 12.5pt per character
    fn style() -> TextStyle {
        TextStyle::new(Rc::new(Font::builtin(BuiltinFont::Courier)), Pt(20.0), colours::BLACK).unwrap()
    }

    fn text_ops(page: &SinglePage) -> Vec<(String, Coord)> {
        page.items()
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text {
                    text, baseline_left, ..
                } => Some((text.clone(), *baseline_left)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn height_is_rows_plus_padding() {
        let cell = Cell::builder(CellStyle::default(), Pt(100.0))
            .add_text(Text::new(style(), "The quick brown fox jumps over the lazy dog"))
            .build()
            .unwrap();
        let dim = cell.calc_dimensions(Pt(100.0)).unwrap();

        let padding = cell.style().padding();
        let inner = Pt(100.0) - padding.left() - padding.right();
        let Some(CellContent::Text(text)) = cell.contents().first() else {
            panic!("expected text");
        };
        let block = text.wrap(inner).unwrap();
        assert!(block.rows().len() > 1);
        for row in block.rows() {
            assert!(row.width() <= inner);
        }
        let rows: Pt = block.rows().iter().map(|r| r.style().line_height()).sum();
        let expected = rows + padding.top() + padding.bottom();
        assert!((dim.height() - expected).abs() < Pt(1e-3));
    }

    #[test]
    fn negative_widths_are_rejected() {
        let result = Cell::builder(CellStyle::default(), Pt(-1.0)).build();
        assert!(matches!(result, Err(LayoutError::NegativeCellWidth(_))));
    }

    #[test]
    fn aligns_each_row() {
        let cell_style = CellStyle::default()
            .with_padding(NO_PADDING)
            .with_align(Align::BottomRight);
        let cell = Cell::builder(cell_style, Pt(100.0))
            .add_text(Text::new(style(), "ab\nabcd"))
            .build()
            .unwrap();
        let line_height = style().line_height();

        let mut page = SinglePage::new(1, Pt::ZERO);
        let outer = Dim::new(Pt(100.0), line_height * 4.0).unwrap();
        let end = cell.render(&mut page, Coord::new(Pt(0.0), Pt(500.0)), outer).unwrap();

        let ops = text_ops(&page);
        assert_eq!(ops.len(), 2);
        // right aligned: 100 - 2 * 12.5 and 100 - 4 * 12.5
        assert!((ops[0].1.x - Pt(75.0)).abs() < Pt(1e-3));
        assert!((ops[1].1.x - Pt(50.0)).abs() < Pt(1e-3));
        // bottom aligned: the block starts two rows down
        let first_top = Pt(500.0) - line_height * 2.0;
        assert!((ops[0].1.y - (first_top - style().ascent())).abs() < Pt(1e-3));
        assert!((end.y - (Pt(500.0) - outer.height())).abs() < Pt(1e-3));
    }

    #[test]
    fn background_then_content_then_borders() {
        let border = BorderStyle::all(LineStyle::of_colour(colours::RED));
        let cell_style = CellStyle::builder()
            .bg_colour(colours::LIGHT_GREY)
            .border_style(border)
            .padding(Padding::uniform(Pt(2.0)).unwrap())
            .build();
        let cell = Cell::builder(cell_style, Pt(80.0))
            .add_text(Text::new(style(), "hi"))
            .build()
            .unwrap();
        let dim = cell.calc_dimensions(Pt(80.0)).unwrap();

        let mut page = SinglePage::new(1, Pt::ZERO);
        cell.render(&mut page, Coord::new(Pt(10.0), Pt(100.0)), dim.with_width(Pt(80.0)).unwrap())
            .unwrap();

        let ops: Vec<&DrawOp> = page.items().iter().collect();
        assert_eq!(ops.len(), 6);
        assert!(matches!(ops[0], DrawOp::FillRect { .. }));
        assert!(matches!(ops[1], DrawOp::Text { .. }));
        assert!(ops[2..].iter().all(|op| matches!(op, DrawOp::Line { .. })));
    }
}
