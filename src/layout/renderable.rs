use crate::{page::RenderTarget, Coord, Dim, LayoutError, Pt};

/// Content that is laid out in two passes: first measured against a maximum
/// width, then drawn at a position.
///
/// `render` must only be called with an `outer_dim` whose width was previously
/// passed to `calc_dimensions`; measurements are cached per width and the
/// cached layout is what gets drawn.
pub trait Renderable {
    /// The size this content takes up when wrapped to `max_width`
    fn calc_dimensions(&self, max_width: Pt) -> Result<Dim, LayoutError>;

    /// Draw the content with its top-left corner at `top_left` inside a box of
    /// `outer_dim`, returning the lower-right corner of what was drawn. The
    /// returned y may be lower than `top_left.y - outer_dim.height()` if the
    /// target pushed content onto a following page.
    fn render(
        &self,
        target: &mut dyn RenderTarget,
        top_left: Coord,
        outer_dim: Dim,
    ) -> Result<Coord, LayoutError>;

    /// Hands the content out in pieces for flowing it into lines
    fn renderator(&self) -> Box<dyn Renderator<'_> + '_>;
}

/// An already measured piece of content that can't be broken any further
pub trait FixedItem {
    fn dim(&self) -> Dim;

    /// Height above the baseline
    fn ascent(&self) -> Pt;

    /// Depth below the baseline including the space before the next line
    fn descent_and_leading(&self) -> Pt;

    fn line_height(&self) -> Pt {
        self.ascent() + self.descent_and_leading()
    }

    /// Draws the item with its top-left corner at `top_left`
    fn render_at(&self, target: &mut dyn RenderTarget, top_left: Coord) -> Result<Coord, LayoutError>;
}

/// A piece from [`Renderator::get_something`], which is flagged if it ended at
/// a hard line break
pub struct ContTerm<'a> {
    pub item: Box<dyn FixedItem + 'a>,
    pub found_cr: bool,
}

/// The answer of [`Renderator::get_if_fits`]
pub enum ContTermNone<'a> {
    /// The piece fits and the line may continue
    Continuing(Box<dyn FixedItem + 'a>),
    /// The piece fits but ended at a hard line break
    Terminal(Box<dyn FixedItem + 'a>),
    /// Not even the first piece fits
    Nothing,
}

/// Lazily breaks content into [`FixedItem`]s.
pub trait Renderator<'a> {
    fn has_more(&self) -> bool;

    /// Takes as much as fits in `max_width`, but always at least one piece even
    /// if it overflows. Used to start a line, so every line makes progress.
    fn get_something(&mut self, max_width: Pt) -> Result<ContTerm<'a>, LayoutError>;

    /// Takes as much as fits in `remaining`, or nothing if the first piece doesn't.
    /// Used to continue a line that already has something in it.
    fn get_if_fits(&mut self, remaining: Pt) -> Result<ContTermNone<'a>, LayoutError>;
}

/// Measures any renderable as a single block at its natural width
pub(crate) struct BlockRenderator<'a> {
    renderable: &'a dyn Renderable,
    width: Pt,
    done: bool,
}

impl<'a> BlockRenderator<'a> {
    pub(crate) fn new(renderable: &'a dyn Renderable, width: Pt) -> BlockRenderator<'a> {
        BlockRenderator {
            renderable,
            width,
            done: false,
        }
    }

    fn take(&mut self) -> Result<Box<dyn FixedItem + 'a>, LayoutError> {
        self.done = true;
        let dim = self.renderable.calc_dimensions(self.width)?;
        Ok(Box::new(Block {
            renderable: self.renderable,
            dim,
            measured_at: self.width,
        }))
    }
}

impl<'a> Renderator<'a> for BlockRenderator<'a> {
    fn has_more(&self) -> bool {
        !self.done
    }

    fn get_something(&mut self, _max_width: Pt) -> Result<ContTerm<'a>, LayoutError> {
        Ok(ContTerm {
            item: self.take()?,
            found_cr: false,
        })
    }

    fn get_if_fits(&mut self, remaining: Pt) -> Result<ContTermNone<'a>, LayoutError> {
        if self.done || self.width > remaining {
            return Ok(ContTermNone::Nothing);
        }
        Ok(ContTermNone::Continuing(self.take()?))
    }
}

struct Block<'a> {
    renderable: &'a dyn Renderable,
    dim: Dim,
    measured_at: Pt,
}

impl FixedItem for Block<'_> {
    fn dim(&self) -> Dim {
        self.dim
    }

    fn ascent(&self) -> Pt {
        self.dim.height()
    }

    fn descent_and_leading(&self) -> Pt {
        Pt::ZERO
    }

    fn render_at(&self, target: &mut dyn RenderTarget, top_left: Coord) -> Result<Coord, LayoutError> {
        let outer = self.dim.with_width(self.measured_at)?;
        self.renderable.render(target, top_left, outer)
    }
}

/// A row of fixed items sharing a baseline
#[derive(Default)]
pub struct Line<'a> {
    items: Vec<Box<dyn FixedItem + 'a>>,
    width: Pt,
    max_ascent: Pt,
    max_descent_and_leading: Pt,
}

impl<'a> Line<'a> {
    pub fn new() -> Line<'a> {
        Line::default()
    }

    pub fn push(&mut self, item: Box<dyn FixedItem + 'a>) {
        self.width += item.dim().width();
        self.max_ascent = self.max_ascent.max(item.ascent());
        self.max_descent_and_leading = self.max_descent_and_leading.max(item.descent_and_leading());
        self.items.push(item);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn width(&self) -> Pt {
        self.width
    }

    pub fn height(&self) -> Pt {
        self.max_ascent + self.max_descent_and_leading
    }

    pub fn dim(&self) -> Result<Dim, LayoutError> {
        Dim::new(self.width, self.height())
    }

    /// Draws the items left to right with their baselines aligned
    pub fn render(&self, target: &mut dyn RenderTarget, top_left: Coord) -> Result<Coord, LayoutError> {
        let baseline = top_left.y - self.max_ascent;
        let mut x = top_left.x;
        for item in self.items.iter() {
            item.render_at(target, Coord::new(x, baseline + item.ascent()))?;
            x += item.dim().width();
        }
        Ok(Coord::new(x, top_left.y - self.height()))
    }
}

/// Flows `items` into lines no wider than `max_width`, except where a single
/// piece is wider than a line by itself.
pub fn renderables_to_lines<'a>(
    items: &[&'a dyn Renderable],
    max_width: Pt,
) -> Result<Vec<Line<'a>>, LayoutError> {
    let mut lines = Vec::new();
    let mut line = Line::new();

    for &item in items {
        let mut rtor = item.renderator();
        while rtor.has_more() {
            if line.is_empty() {
                let ContTerm { item, found_cr } = rtor.get_something(max_width)?;
                line.push(item);
                if found_cr {
                    lines.push(std::mem::take(&mut line));
                }
            } else {
                match rtor.get_if_fits(max_width - line.width())? {
                    ContTermNone::Continuing(item) => line.push(item),
                    ContTermNone::Terminal(item) => {
                        line.push(item);
                        lines.push(std::mem::take(&mut line));
                    }
                    ContTermNone::Nothing => lines.push(std::mem::take(&mut line)),
                }
            }
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }
    Ok(lines)
}
