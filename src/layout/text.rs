use super::{ContTerm, ContTermNone, FixedItem, Renderable, Renderator};
use crate::{page::RenderTarget, style::TextStyle, winansi, Coord, Dim, LayoutError, Pt};
use std::{cell::RefCell, collections::HashMap, rc::Rc};

/// One wrapped row of text, measured and ready to draw
#[derive(Debug, Clone)]
pub struct WrappedRow {
    text: String,
    width: Pt,
    style: TextStyle,
}

impl WrappedRow {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn width(&self) -> Pt {
        self.width
    }

    pub fn style(&self) -> &TextStyle {
        &self.style
    }
}

impl FixedItem for WrappedRow {
    fn dim(&self) -> Dim {
        Dim::from((self.width, self.style.line_height()))
    }

    fn ascent(&self) -> Pt {
        self.style.ascent()
    }

    fn descent_and_leading(&self) -> Pt {
        self.style.descent() + self.style.leading()
    }

    fn render_at(&self, target: &mut dyn RenderTarget, top_left: Coord) -> Result<Coord, LayoutError> {
        let baseline = top_left.with_y(top_left.y - self.style.ascent());
        target.draw_styled_text(baseline, &self.text, &self.style)?;
        Ok(Coord::new(
            top_left.x + self.width,
            top_left.y - self.style.line_height(),
        ))
    }
}

/// The rows of a [`Text`] wrapped to one particular width
#[derive(Debug)]
pub struct WrappedBlock {
    rows: Vec<WrappedRow>,
    dim: Dim,
}

impl WrappedBlock {
    pub fn rows(&self) -> &[WrappedRow] {
        &self.rows
    }

    /// The widest row and the sum of the row heights
    pub fn dim(&self) -> Dim {
        self.dim
    }
}

/// A string in a single style, wrapped on demand.
///
/// The string is converted to WinAnsi on construction, so what is measured is
/// exactly what will be drawn. Wrapping results are cached per width.
#[derive(Debug, Clone, Default)]
pub struct Text {
    style: Option<TextStyle>,
    text: String,
    cache: RefCell<HashMap<u32, Rc<WrappedBlock>>>,
}

impl Text {
    pub fn new(style: TextStyle, text: &str) -> Text {
        Text {
            style: Some(style),
            text: winansi::to_win_ansi(text),
            cache: RefCell::default(),
        }
    }

    /// Text with no content and no style. Measures as zero by zero.
    pub fn empty() -> Text {
        Text::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn style(&self) -> Option<&TextStyle> {
        self.style.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.style.is_none() || self.text.trim().is_empty()
    }

    /// Wraps the text into rows no wider than `max_width`. A word wider than
    /// `max_width` gets a row of its own and overflows it.
    pub fn wrap(&self, max_width: Pt) -> Result<Rc<WrappedBlock>, LayoutError> {
        if !(max_width.0 > 0.0) {
            return Err(LayoutError::InvalidWrapWidth(max_width.0));
        }
        if let Some(block) = self.cache.borrow().get(&max_width.0.to_bits()) {
            return Ok(block.clone());
        }

        let rows = match &self.style {
            Some(style) => wrap_rows(&self.text, style, max_width),
            None => Vec::new(),
        };
        let width = rows.iter().map(|r| r.width).fold(Pt::ZERO, Pt::max);
        let height: Pt = rows.iter().map(|r| r.style.line_height()).sum();
        let block = Rc::new(WrappedBlock {
            rows,
            dim: Dim::new(width, height)?,
        });

        self.cache
            .borrow_mut()
            .insert(max_width.0.to_bits(), block.clone());
        Ok(block)
    }
}

impl Renderable for Text {
    fn calc_dimensions(&self, max_width: Pt) -> Result<Dim, LayoutError> {
        Ok(self.wrap(max_width)?.dim())
    }

    fn render(
        &self,
        target: &mut dyn RenderTarget,
        top_left: Coord,
        outer_dim: Dim,
    ) -> Result<Coord, LayoutError> {
        let block = self.wrap(outer_dim.width())?;
        let mut y = top_left.y;
        for row in block.rows() {
            y = row.render_at(target, top_left.with_y(y))?.y;
        }
        Ok(Coord::new(top_left.x + block.dim().width(), y))
    }

    fn renderator(&self) -> Box<dyn Renderator<'_> + '_> {
        Box::new(TextRenderator::new(self))
    }
}

fn skip_whitespace(chars: &[char], mut idx: usize) -> usize {
    while idx < chars.len() && chars[idx].is_whitespace() {
        idx += 1;
    }
    idx
}

struct RowBreak {
    /// Characters in the row, counted from its start
    len: usize,
    width: Pt,
    /// Where to continue, before skipping whitespace
    next: usize,
    found_cr: bool,
}

/// Finds the row starting at `start`, which must not be whitespace.
///
/// Guesses a length from the average character width, grows the guess a word
/// at a time while it is narrower than `max_width`, then backs off a word at a
/// time while it is too wide or ends inside a word. If no word boundary is left
/// the first word is taken whole.
///
/// Trailing whitespace is dropped where a row wraps. With `keep_run_end` it is
/// kept when the row runs to the end of the text, so the next run on the same
/// line stays separated from this one.
fn break_row(style: &TextStyle, chars: &[char], start: usize, max_width: Pt, keep_run_end: bool) -> RowBreak {
    let newline = chars[start..].iter().position(|&c| c == '\n').map(|p| start + p);
    let rest = &chars[start..newline.unwrap_or(chars.len())];
    let n = rest.len();
    let is_ws = |idx: usize| rest[idx].is_whitespace();
    let measure = |len: usize| style.string_width(&rest[..len].iter().collect::<String>());
    let splits_word = |len: usize| len > 0 && len < n && !is_ws(len - 1) && !is_ws(len);

    let mut len = style.avg_chars_for_width(max_width).min(n);
    let mut width = measure(len);

    while width < max_width && len < n {
        while len < n && is_ws(len) {
            len += 1;
        }
        while len < n && !is_ws(len) {
            len += 1;
        }
        width = measure(len);
    }

    while width > max_width || splits_word(len) {
        let mut idx = len;
        while idx > 0 && !is_ws(idx - 1) {
            idx -= 1;
        }
        while idx > 0 && is_ws(idx - 1) {
            idx -= 1;
        }
        if idx == 0 {
            len = (0..n).find(|&i| is_ws(i)).unwrap_or(n);
            width = measure(len);
            if width > max_width {
                log::warn!(
                    "{:?} is {} wide and overflows its {} row",
                    rest[..len].iter().collect::<String>(),
                    width,
                    max_width
                );
            }
            break;
        }
        len = idx;
        width = measure(len);
    }

    let run_end = keep_run_end && newline.is_none() && len == n;
    if !run_end {
        while len > 0 && is_ws(len - 1) {
            len -= 1;
            width = measure(len);
        }
    }

    let found_cr = newline.is_some() && (len..n).all(is_ws);
    RowBreak {
        len,
        width,
        next: match newline {
            Some(nl) if found_cr => nl + 1,
            _ => start + len,
        },
        found_cr,
    }
}

fn wrap_rows(text: &str, style: &TextStyle, max_width: Pt) -> Vec<WrappedRow> {
    let chars: Vec<char> = text.chars().collect();
    let mut rows = Vec::new();
    let mut start = skip_whitespace(&chars, 0);
    while start < chars.len() {
        let row = break_row(style, &chars, start, max_width, false);
        rows.push(WrappedRow {
            text: chars[start..start + row.len].iter().collect(),
            width: row.width,
            style: style.clone(),
        });
        start = skip_whitespace(&chars, row.next);
    }
    rows
}

/// Hands out the rows of a [`Text`] one at a time, each fitted to the space
/// left on the current line
pub struct TextRenderator<'a> {
    text: &'a Text,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> TextRenderator<'a> {
    pub fn new(text: &'a Text) -> TextRenderator<'a> {
        let chars: Vec<char> = text.text.chars().collect();
        let pos = skip_whitespace(&chars, 0);
        TextRenderator { text, chars, pos }
    }

    fn take(&mut self, style: &TextStyle, row: RowBreak) -> WrappedRow {
        let wrapped = WrappedRow {
            text: self.chars[self.pos..self.pos + row.len].iter().collect(),
            width: row.width,
            style: style.clone(),
        };
        self.pos = skip_whitespace(&self.chars, row.next);
        wrapped
    }
}

impl<'a> Renderator<'a> for TextRenderator<'a> {
    fn has_more(&self) -> bool {
        self.text.style.is_some() && self.pos < self.chars.len()
    }

    fn get_something(&mut self, max_width: Pt) -> Result<ContTerm<'a>, LayoutError> {
        if !(max_width.0 > 0.0) {
            return Err(LayoutError::InvalidWrapWidth(max_width.0));
        }
        let text = self.text;
        let Some(style) = text.style.as_ref() else {
            return Err(LayoutError::MissingTextStyle);
        };
        let row = break_row(style, &self.chars, self.pos, max_width, true);
        let found_cr = row.found_cr;
        Ok(ContTerm {
            item: Box::new(self.take(style, row)),
            found_cr,
        })
    }

    fn get_if_fits(&mut self, remaining: Pt) -> Result<ContTermNone<'a>, LayoutError> {
        if !(remaining.0 > 0.0) || !self.has_more() {
            return Ok(ContTermNone::Nothing);
        }
        let text = self.text;
        let Some(style) = text.style.as_ref() else {
            return Ok(ContTermNone::Nothing);
        };
        let row = break_row(style, &self.chars, self.pos, remaining, true);
        if row.width > remaining {
            return Ok(ContTermNone::Nothing);
        }
        let found_cr = row.found_cr;
        let item = Box::new(self.take(style, row));
        Ok(if found_cr {
            ContTermNone::Terminal(item)
        } else {
            ContTermNone::Continuing(item)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{colours, BuiltinFont, Font};

    /// Courier at 16pt: every character is exactly 10pt wide
    fn style() -> TextStyle {
        TextStyle::new(Rc::new(Font::builtin(BuiltinFont::Courier)), Pt(16.0), colours::BLACK).unwrap()
    }

    fn rows(text: &Text, width: f32) -> Vec<String> {
        text.wrap(Pt(width))
            .unwrap()
            .rows()
            .iter()
            .map(|r| r.text().to_string())
            .collect()
    }

    #[test]
    fn wraps_at_word_boundaries() {
        let text = Text::new(style(), "This is a long enough line of text.");
        assert_eq!(
            rows(&text, 120.0),
            vec!["This is a", "long enough", "line of", "text."]
        );
        for row in text.wrap(Pt(120.0)).unwrap().rows() {
            assert!(row.width() <= Pt(120.0));
        }
    }

    #[test]
    fn rewrapping_joined_rows_is_stable() {
        let source = lipsum::lipsum(60);
        for width in [55.0, 100.0, 173.0, 400.0] {
            let first = rows(&Text::new(style(), &source), width);
            let joined = first.join(" ");
            let second = rows(&Text::new(style(), &joined), width);
            assert_eq!(first, second, "width {width}");
        }
    }

    #[test]
    fn long_word_overflows_on_its_own_row() {
        let text = Text::new(style(), "Supercalifragilisticexpialidocious");
        let block = text.wrap(Pt(50.0)).unwrap();
        assert_eq!(block.rows().len(), 1);
        assert_eq!(block.rows()[0].text(), "Supercalifragilisticexpialidocious");
        assert!(block.dim().width() > Pt(50.0));

        let text = Text::new(style(), "a Supercalifragilistic b");
        assert_eq!(rows(&text, 50.0), vec!["a", "Supercalifragilistic", "b"]);
    }

    #[test]
    fn exact_width_is_one_row() {
        let text = Text::new(style(), "fits just so");
        let width = style().string_width("fits just so");
        let block = text.wrap(width).unwrap();
        assert_eq!(block.rows().len(), 1);
        assert_eq!(block.rows()[0].width(), width);
    }

    #[test]
    fn non_positive_widths_are_rejected() {
        let text = Text::new(style(), "anything");
        assert!(matches!(text.wrap(Pt(-1.0)), Err(LayoutError::InvalidWrapWidth(_))));
        assert!(text.wrap(Pt(0.0)).is_err());
        assert!(text.calc_dimensions(Pt(-10.0)).is_err());
    }

    #[test]
    fn height_is_the_sum_of_row_heights() {
        let text = Text::new(style(), "one two three four five");
        let dim = text.calc_dimensions(Pt(90.0)).unwrap();
        let block = text.wrap(Pt(90.0)).unwrap();
        let expected = style().line_height() * block.rows().len() as f32;
        assert!((dim.height() - expected).abs() < Pt(1e-4));
        assert!(Rc::ptr_eq(&block, &text.wrap(Pt(90.0)).unwrap()));
    }

    #[test]
    fn hard_newlines_break_rows() {
        let text = Text::new(style(), "first\nsecond line");
        assert_eq!(rows(&text, 500.0), vec!["first", "second line"]);
    }

    #[test]
    fn empty_text_measures_nothing() {
        assert_eq!(Text::empty().calc_dimensions(Pt(100.0)).unwrap(), Dim::ZERO);
        assert_eq!(Text::new(style(), "   ").calc_dimensions(Pt(100.0)).unwrap(), Dim::ZERO);
        assert!(Text::empty().is_empty());
    }

    #[test]
    fn renderator_keeps_the_space_ending_a_run() {
        let text = Text::new(style(), "Hello ");
        let mut rtor = text.renderator();
        let ContTerm { item, .. } = rtor.get_something(Pt(500.0)).unwrap();
        assert_eq!(item.dim().width(), Pt(60.0));
        assert!(!rtor.has_more());

        // wrapped rows never end in a space
        let block = text.wrap(Pt(500.0)).unwrap();
        assert_eq!(block.rows()[0].text(), "Hello");

        // a space that doesn't fit is still dropped
        let text = Text::new(style(), "there ");
        let mut rtor = text.renderator();
        match rtor.get_if_fits(Pt(55.0)).unwrap() {
            ContTermNone::Continuing(item) => assert_eq!(item.dim().width(), Pt(50.0)),
            _ => panic!("expected the word to fit without its space"),
        };
    }

    #[test]
    fn renderator_fits_rows_to_the_remaining_space() {
        let text = Text::new(style(), "alpha beta\ngamma");
        let mut rtor = text.renderator();
        assert!(rtor.has_more());
        assert!(matches!(rtor.get_if_fits(Pt(40.0)).unwrap(), ContTermNone::Nothing));
        assert!(matches!(rtor.get_if_fits(Pt(0.0)).unwrap(), ContTermNone::Nothing));

        let ContTerm { item, found_cr } = rtor.get_something(Pt(60.0)).unwrap();
        assert_eq!(item.dim().width(), Pt(50.0));
        assert!(!found_cr);

        match rtor.get_if_fits(Pt(100.0)).unwrap() {
            ContTermNone::Terminal(item) => assert_eq!(item.dim().width(), Pt(40.0)),
            _ => panic!("expected the row before the newline to end the line"),
        }
        let ContTerm { found_cr, .. } = rtor.get_something(Pt(100.0)).unwrap();
        assert!(!found_cr);
        assert!(!rtor.has_more());
    }
}
