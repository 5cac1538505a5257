use super::{BlockRenderator, Cell, CellContent, Renderable, Renderator, ScaledImage, Text};
use crate::{
    page::RenderTarget,
    style::{Align, CellStyle, TextStyle},
    BorderStyle, Coord, Dim, LayoutError, Pt,
};

/// Cells side by side, all drawn as tall as the tallest one
#[derive(Debug, Clone)]
pub struct TableRow {
    cells: Vec<Cell>,
    min_height: Pt,
}

impl TableRow {
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn width(&self) -> Pt {
        self.cells.iter().map(Cell::width).sum()
    }

    fn height(&self) -> Result<Pt, LayoutError> {
        let mut height = self.min_height;
        for cell in self.cells.iter() {
            height = height.max(cell.calc_dimensions(cell.width())?.height());
        }
        Ok(height)
    }
}

impl Renderable for TableRow {
    fn calc_dimensions(&self, _max_width: Pt) -> Result<Dim, LayoutError> {
        Dim::new(self.width(), self.height()?)
    }

    fn render(
        &self,
        target: &mut dyn RenderTarget,
        top_left: Coord,
        _outer_dim: Dim,
    ) -> Result<Coord, LayoutError> {
        let height = self.height()?;
        let mut x = top_left.x;
        let mut lowest = top_left.y - height;
        for cell in self.cells.iter() {
            let end = cell.render(target, top_left.with_x(x), Dim::new(cell.width(), height)?)?;
            lowest = lowest.min(end.y);
            x += cell.width();
        }
        Ok(Coord::new(x, lowest))
    }

    fn renderator(&self) -> Box<dyn Renderator<'_> + '_> {
        Box::new(BlockRenderator::new(self, self.width()))
    }
}

/// Draws `items` one below the other, each starting where the lowest point of
/// the previous one ended up
fn render_stacked<'a, R: Renderable + 'a>(
    items: impl Iterator<Item = &'a R>,
    target: &mut dyn RenderTarget,
    top_left: Coord,
) -> Result<Coord, LayoutError> {
    let mut rightmost_lowest = top_left;
    for item in items {
        let dim = item.calc_dimensions(Pt::ZERO)?;
        let end = item.render(target, top_left.with_y(rightmost_lowest.y), dim)?;
        rightmost_lowest = rightmost_lowest.max_x_min_y(end);
    }
    Ok(rightmost_lowest)
}

/// The widest item and the sum of the heights
fn stacked_dim<'a, R: Renderable + 'a>(items: impl Iterator<Item = &'a R>) -> Result<Dim, LayoutError> {
    let mut width = Pt::ZERO;
    let mut height = Pt::ZERO;
    for item in items {
        let dim = item.calc_dimensions(Pt::ZERO)?;
        width = width.max(dim.width());
        height += dim.height();
    }
    Dim::new(width, height)
}

/// A run of rows sharing defaults, such as a header or a body
#[derive(Debug, Clone, Default)]
pub struct TablePart {
    rows: Vec<TableRow>,
}

impl TablePart {
    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }
}

impl Renderable for TablePart {
    /// Columns have fixed widths, so `max_width` is ignored
    fn calc_dimensions(&self, _max_width: Pt) -> Result<Dim, LayoutError> {
        stacked_dim(self.rows.iter())
    }

    fn render(
        &self,
        target: &mut dyn RenderTarget,
        top_left: Coord,
        _outer_dim: Dim,
    ) -> Result<Coord, LayoutError> {
        render_stacked(self.rows.iter(), target, top_left)
    }

    fn renderator(&self) -> Box<dyn Renderator<'_> + '_> {
        let width = self.rows.iter().map(TableRow::width).fold(Pt::ZERO, Pt::max);
        Box::new(BlockRenderator::new(self, width))
    }
}

/// Parts stacked top to bottom. A table may be taller than a page; each cell
/// is split across the break on its own.
#[derive(Debug, Clone, Default)]
pub struct Table {
    parts: Vec<TablePart>,
}

impl Table {
    pub fn builder() -> TableBuilder {
        TableBuilder::default()
    }

    pub fn parts(&self) -> &[TablePart] {
        &self.parts
    }

    /// The width of the widest row
    pub fn width(&self) -> Pt {
        self.parts
            .iter()
            .flat_map(|part| part.rows.iter())
            .map(TableRow::width)
            .fold(Pt::ZERO, Pt::max)
    }
}

impl Renderable for Table {
    /// Columns have fixed widths, so `max_width` is ignored
    fn calc_dimensions(&self, _max_width: Pt) -> Result<Dim, LayoutError> {
        stacked_dim(self.parts.iter())
    }

    fn render(
        &self,
        target: &mut dyn RenderTarget,
        top_left: Coord,
        _outer_dim: Dim,
    ) -> Result<Coord, LayoutError> {
        render_stacked(self.parts.iter(), target, top_left)
    }

    fn renderator(&self) -> Box<dyn Renderator<'_> + '_> {
        Box::new(BlockRenderator::new(self, self.width()))
    }
}

/// Sets the column widths and styles that every part starts from
#[derive(Debug, Clone, Default)]
pub struct TableBuilder {
    cell_widths: Vec<Pt>,
    cell_style: CellStyle,
    text_style: Option<TextStyle>,
    parts: Vec<TablePart>,
}

impl TableBuilder {
    pub fn new() -> TableBuilder {
        TableBuilder::default()
    }

    /// Appends column widths
    pub fn cell_widths(mut self, widths: &[Pt]) -> Self {
        self.cell_widths.extend_from_slice(widths);
        self
    }

    pub fn cell_style(mut self, cell_style: CellStyle) -> Self {
        self.cell_style = cell_style;
        self
    }

    pub fn text_style(mut self, text_style: TextStyle) -> Self {
        self.text_style = Some(text_style);
        self
    }

    /// A part starting from this table's current settings. Later changes to
    /// the table don't affect it.
    pub fn part_builder(&self) -> TablePartBuilder {
        TablePartBuilder {
            cell_widths: self.cell_widths.clone(),
            cell_style: self.cell_style,
            text_style: self.text_style.clone(),
            min_row_height: Pt::ZERO,
            rows: Vec::new(),
        }
    }

    pub fn add_part(mut self, part: TablePart) -> Self {
        self.parts.push(part);
        self
    }

    pub fn build(self) -> Table {
        Table { parts: self.parts }
    }
}

/// Collects the rows of one [`TablePart`]
#[derive(Debug, Clone)]
pub struct TablePartBuilder {
    cell_widths: Vec<Pt>,
    cell_style: CellStyle,
    text_style: Option<TextStyle>,
    min_row_height: Pt,
    rows: Vec<TableRow>,
}

impl TablePartBuilder {
    /// Replaces the column widths inherited from the table
    pub fn cell_widths(mut self, widths: &[Pt]) -> Self {
        self.cell_widths = widths.to_vec();
        self
    }

    pub fn cell_style(mut self, cell_style: CellStyle) -> Self {
        self.cell_style = cell_style;
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.cell_style = self.cell_style.with_align(align);
        self
    }

    pub fn text_style(mut self, text_style: TextStyle) -> Self {
        self.text_style = Some(text_style);
        self
    }

    pub fn min_row_height(mut self, height: Pt) -> Self {
        self.min_row_height = height;
        self
    }

    pub fn column_widths(&self) -> &[Pt] {
        &self.cell_widths
    }

    /// A row starting from this part's current settings
    pub fn row_builder(&self) -> TableRowBuilder {
        TableRowBuilder {
            cell_widths: self.cell_widths.clone(),
            cell_style: self.cell_style,
            text_style: self.text_style.clone(),
            min_row_height: self.min_row_height,
            cells: Vec::new(),
            next_cell_idx: 0,
        }
    }

    pub fn add_row(mut self, row: TableRow) -> Self {
        self.rows.push(row);
        self
    }

    pub fn build(self) -> TablePart {
        TablePart { rows: self.rows }
    }
}

/// Fills the columns of a row left to right.
///
/// A [`RowCellBuilder`] reserves the next column when it is created, so cells
/// to its right can be added before it is finished and handed back with
/// [`build_cell`](TableRowBuilder::build_cell).
#[derive(Debug, Clone)]
pub struct TableRowBuilder {
    cell_widths: Vec<Pt>,
    cell_style: CellStyle,
    text_style: Option<TextStyle>,
    min_row_height: Pt,
    cells: Vec<Option<Cell>>,
    next_cell_idx: usize,
}

impl TableRowBuilder {
    fn next_cell_width(&self) -> Result<Pt, LayoutError> {
        self.cell_widths
            .get(self.next_cell_idx)
            .copied()
            .ok_or(LayoutError::TooManyCells(self.cell_widths.len()))
    }

    pub fn next_cell_idx(&self) -> usize {
        self.next_cell_idx
    }

    pub fn text_style(&mut self, text_style: TextStyle) -> &mut Self {
        self.text_style = Some(text_style);
        self
    }

    pub fn cell_style(&mut self, cell_style: CellStyle) -> &mut Self {
        self.cell_style = cell_style;
        self
    }

    pub fn min_row_height(&mut self, height: Pt) -> &mut Self {
        self.min_row_height = height;
        self
    }

    /// One text cell per string, in the row's text and cell styles
    pub fn add_text_cells(&mut self, texts: &[&str]) -> Result<&mut Self, LayoutError> {
        let text_style = self.text_style.clone().ok_or(LayoutError::MissingTextStyle)?;
        for text in texts {
            let cell = Cell::builder(self.cell_style, self.next_cell_width()?)
                .add_text(Text::new(text_style.clone(), text))
                .build()?;
            self.add_cell(cell)?;
        }
        Ok(self)
    }

    pub fn add_image_cells(&mut self, images: &[ScaledImage]) -> Result<&mut Self, LayoutError> {
        for image in images {
            let cell = Cell::builder(self.cell_style, self.next_cell_width()?)
                .add_image(image.clone())
                .build()?;
            self.add_cell(cell)?;
        }
        Ok(self)
    }

    /// Puts `cell` in the next column. The cell keeps its own width.
    pub fn add_cell(&mut self, cell: Cell) -> Result<&mut Self, LayoutError> {
        let idx = self.next_cell_idx;
        self.add_cell_at(cell, idx)?;
        self.next_cell_idx += 1;
        Ok(self)
    }

    /// Puts `cell` in column `idx`, which must still be free
    pub fn add_cell_at(&mut self, cell: Cell, idx: usize) -> Result<&mut Self, LayoutError> {
        if self.cells.len() <= idx {
            self.cells.resize(idx + 1, None);
        }
        if self.cells[idx].is_some() {
            return Err(LayoutError::CellSlotOccupied(idx));
        }
        self.cells[idx] = Some(cell);
        Ok(self)
    }

    /// Reserves the next column for a cell built separately
    pub fn cell_builder(&mut self) -> Result<RowCellBuilder, LayoutError> {
        let builder = RowCellBuilder {
            col_idx: self.next_cell_idx,
            width: self.next_cell_width()?,
            cell_style: self.cell_style,
            text_style: self.text_style.clone(),
            contents: Vec::new(),
        };
        self.next_cell_idx += 1;
        if self.cells.len() <= builder.col_idx {
            self.cells.resize(builder.col_idx + 1, None);
        }
        Ok(builder)
    }

    /// Fills the column reserved by `builder`
    pub fn build_cell(&mut self, builder: RowCellBuilder) -> Result<&mut Self, LayoutError> {
        let idx = builder.col_idx;
        let cell = builder.build()?;
        self.add_cell_at(cell, idx)
    }

    /// Fails if a reserved column was never filled
    pub fn build(self) -> Result<TableRow, LayoutError> {
        let mut cells = Vec::with_capacity(self.cells.len());
        for (idx, cell) in self.cells.into_iter().enumerate() {
            cells.push(cell.ok_or(LayoutError::UnfinishedCell(idx))?);
        }
        Ok(TableRow {
            cells,
            min_height: self.min_row_height,
        })
    }
}

/// Builds the cell for one reserved column of a [`TableRowBuilder`]
#[derive(Debug, Clone)]
pub struct RowCellBuilder {
    col_idx: usize,
    width: Pt,
    cell_style: CellStyle,
    text_style: Option<TextStyle>,
    contents: Vec<CellContent>,
}

impl RowCellBuilder {
    pub fn col_idx(&self) -> usize {
        self.col_idx
    }

    pub fn width(&self) -> Pt {
        self.width
    }

    pub fn cell_style(mut self, cell_style: CellStyle) -> Self {
        self.cell_style = cell_style;
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.cell_style = self.cell_style.with_align(align);
        self
    }

    pub fn border_style(mut self, border_style: BorderStyle) -> Self {
        self.cell_style = self.cell_style.with_border_style(border_style);
        self
    }

    pub fn text_style(mut self, text_style: TextStyle) -> Self {
        self.text_style = Some(text_style);
        self
    }

    pub fn add<C: Into<CellContent>>(mut self, content: C) -> Self {
        self.contents.push(content.into());
        self
    }

    /// Adds each string as its own paragraph in the builder's text style
    pub fn add_strs(mut self, texts: &[&str]) -> Result<Self, LayoutError> {
        let text_style = self.text_style.clone().ok_or(LayoutError::MissingTextStyle)?;
        for text in texts {
            self.contents.push(Text::new(text_style.clone(), text).into());
        }
        Ok(self)
    }

    fn build(self) -> Result<Cell, LayoutError> {
        Cell::new(self.cell_style, self.width, self.contents)
    }
}
