use super::{grouping::Body, DrawOp, ItemSet, PageGrouping, SinglePage};
use crate::{
    layout::Margins,
    pagesize::{Orientation, PageOrientation, PageSize},
    writer::{DocumentWriter, ImageId, PdfDocument},
    Dim, ImageSource, LayoutError, Pt,
};
use std::{collections::HashMap, io::Write, rc::Rc};

/// Embedded images for one document, keyed by `Rc` identity
#[derive(Default)]
struct ImageCache {
    embedded: HashMap<usize, (Rc<ImageSource>, ImageId)>,
}

impl ImageCache {
    fn ensure<W: DocumentWriter>(
        &mut self,
        writer: &mut W,
        source: &Rc<ImageSource>,
    ) -> Result<ImageId, LayoutError> {
        let key = Rc::as_ptr(source) as usize;
        if let Some((_, id)) = self.embedded.get(&key) {
            return Ok(*id);
        }
        let id = writer.embed_image(source)?;
        // the cache holds on to the source so its address can't be reused
        self.embedded.insert(key, (source.clone(), id));
        Ok(id)
    }
}

fn replay<W: DocumentWriter>(
    writer: &mut W,
    images: &mut ImageCache,
    page: &mut W::Page,
    op: &DrawOp,
) -> Result<(), LayoutError> {
    match op {
        DrawOp::Line { start, end, style } => writer.draw_line(page, *start, *end, style),
        DrawOp::FillRect {
            bottom_left,
            dim,
            colour,
        } => writer.fill_rect(page, *bottom_left, *dim, *colour),
        DrawOp::Text {
            baseline_left,
            text,
            style,
        } => writer.draw_text(page, *baseline_left, text, style),
        DrawOp::Image { bottom_left, image } => {
            let id = images.ensure(writer, image.source())?;
            writer.draw_image(page, id, *bottom_left, image.dim())
        }
    }
}

/// How far below the top of a logical page content may be placed, in pages
pub const MAX_PAGES_PER_GROUPING: usize = 10_000;

/// Buffers physical pages and hands them to a [`DocumentWriter`] one logical
/// page at a time.
///
/// Content goes through a [`PageGrouping`] started with
/// [`logical_page_start`](LayoutManager::logical_page_start). Only one grouping
/// can be open at a time; committing it flushes all of its pages to the writer.
/// A grouping dropped without being committed leaves its pages buffered, and
/// no new grouping can start until they are thrown away with
/// [`discard_uncommitted`](LayoutManager::discard_uncommitted). A manager
/// belongs to exactly one output document.
pub struct LayoutManager<W: DocumentWriter> {
    writer: W,
    page_size: PageSize,
    page_dim: Dim,
    pages: Vec<SinglePage>,
    uncommitted_idx: usize,
    page_reactor: Option<Box<dyn Fn(usize) -> Pt>>,
    images: ImageCache,
}

impl<W: DocumentWriter> LayoutManager<W> {
    /// Physical pages are always allocated in portrait at `page_size`
    pub fn new(writer: W, page_size: PageSize) -> LayoutManager<W> {
        let page_size = page_size.portrait();
        LayoutManager {
            writer,
            page_size,
            page_dim: Dim::from(page_size),
            pages: Vec::new(),
            uncommitted_idx: 0,
            page_reactor: None,
            images: ImageCache::default(),
        }
    }

    /// Shifts everything drawn on a page right by the value the reactor returns
    /// for its page number (counting from 1), e.g. to leave room for binding.
    pub fn with_page_reactor<F: Fn(usize) -> Pt + 'static>(mut self, reactor: F) -> LayoutManager<W> {
        self.set_page_reactor(reactor);
        self
    }

    /// Only affects pages allocated after the call
    pub fn set_page_reactor<F: Fn(usize) -> Pt + 'static>(&mut self, reactor: F) {
        self.page_reactor = Some(Box::new(reactor));
    }

    /// The portrait size of every physical page
    pub fn page_dim(&self) -> Dim {
        self.page_dim
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Every physical page allocated so far, committed or not
    pub fn pages(&self) -> &[SinglePage] {
        &self.pages
    }

    /// How many pages have been handed to the writer
    pub fn committed_pages(&self) -> usize {
        self.uncommitted_idx
    }

    /// Direct access to a page that hasn't been committed yet, for content that
    /// belongs on that page and nowhere else
    pub fn page_mut(&mut self, index: usize) -> Result<&mut SinglePage, LayoutError> {
        if index < self.uncommitted_idx {
            return Err(LayoutError::PageCommitted(index));
        }
        self.pages.get_mut(index).ok_or(LayoutError::NoSuchPage(index))
    }

    /// Starts a logical page with the default margins
    pub fn logical_page_start(&mut self, orientation: Orientation) -> Result<PageGrouping<'_, W>, LayoutError> {
        self.logical_page_start_with_margins(orientation, Margins::default())
    }

    /// Starts a logical page. Fails if the previous one hasn't been committed or
    /// if the margins leave no room for a body.
    pub fn logical_page_start_with_margins(
        &mut self,
        orientation: Orientation,
        margins: Margins,
    ) -> Result<PageGrouping<'_, W>, LayoutError> {
        if self.uncommitted_idx < self.pages.len() {
            return Err(LayoutError::GroupingStillOpen(
                self.pages.len() - self.uncommitted_idx,
            ));
        }

        let page = Dim::from(self.page_size.oriented(orientation));
        let width = page.width() - margins.left - margins.right;
        let height = page.height() - margins.top - margins.bottom;
        if !(width > Pt::ZERO && height > Pt::ZERO) {
            return Err(LayoutError::InvalidBody {
                width: width.0,
                height: height.0,
            });
        }
        let body = Body {
            left: margins.left,
            bottom: margins.bottom,
            width,
            height,
        };

        self.add_page();
        log::debug!(
            "starting {orientation:?} logical page on page {} with body {body:?}",
            self.pages.len()
        );
        Ok(PageGrouping::new(self, orientation, body))
    }

    /// Drops the pages of a grouping that was never committed so a new one can
    /// start. Returns how many pages were dropped.
    pub fn discard_uncommitted(&mut self) -> usize {
        let dropped = self.pages.len() - self.uncommitted_idx;
        if dropped > 0 {
            log::warn!("discarding {dropped} uncommitted page(s)");
        }
        self.pages.truncate(self.uncommitted_idx);
        dropped
    }

    fn add_page(&mut self) {
        let page_num = self.pages.len() + 1;
        let x_off = self
            .page_reactor
            .as_ref()
            .map_or(Pt::ZERO, |reactor| reactor(page_num));
        log::debug!("allocating page {page_num}");
        self.pages.push(SinglePage::new(page_num, x_off));
    }

    /// Finds the physical page for a logical `y`, allocating pages as needed.
    ///
    /// Returns the page index, `y` on that page and how far `y` was moved down.
    /// An item of `height` that would stick out of the top of a following page
    /// is moved down until its top is at the top of the body.
    pub(crate) fn appropriate_page(
        &mut self,
        body: &Body,
        y: Pt,
        height: Pt,
    ) -> Result<(usize, Pt, Pt), LayoutError> {
        if !y.0.is_finite() {
            return Err(LayoutError::NonFiniteCoordinate(y.0));
        }

        let mut pages_down = 0;
        let mut y = y;
        if y < body.bottom {
            let pages = ((body.bottom - y) / body.height).ceil();
            if pages > MAX_PAGES_PER_GROUPING as f32 {
                return Err(LayoutError::PageLimitExceeded {
                    y: y.0,
                    pages,
                    limit: MAX_PAGES_PER_GROUPING,
                });
            }
            pages_down = pages as usize;
            y += body.height * pages_down as f32;
            // rounding can leave y a hair short of the body
            if y < body.bottom {
                y += body.height;
                pages_down += 1;
            }
        }

        let idx = self.uncommitted_idx + pages_down;
        while self.pages.len() <= idx {
            self.add_page();
        }

        let top = body.top();
        if idx > self.uncommitted_idx && y + height > top {
            let clamped = top - height;
            return Ok((idx, clamped, clamped - y));
        }
        Ok((idx, y, Pt::ZERO))
    }

    /// A page allocated by [`appropriate_page`](Self::appropriate_page)
    pub(crate) fn page_at(&mut self, idx: usize) -> Result<&mut SinglePage, LayoutError> {
        self.pages.get_mut(idx).ok_or(LayoutError::NoSuchPage(idx))
    }

    /// Hands every uncommitted page to the writer, stamping `border_items` on each
    pub(crate) fn commit_pages(&mut self, orientation: Orientation, border_items: &ItemSet) -> Result<(), LayoutError> {
        let rotated = orientation == Orientation::Landscape;
        while self.uncommitted_idx < self.pages.len() {
            let idx = self.uncommitted_idx;
            let mut page = self.writer.new_page(self.page_dim, rotated)?;
            for op in self.pages[idx].items().iter() {
                replay(&mut self.writer, &mut self.images, &mut page, op)?;
            }
            for op in border_items.iter() {
                replay(&mut self.writer, &mut self.images, &mut page, op)?;
            }
            self.writer.finalize_page(page)?;
            log::debug!("committed page {}", idx + 1);
            self.uncommitted_idx += 1;
        }
        Ok(())
    }

    /// Gives up the writer. Pages that were never committed are dropped.
    pub fn into_writer(self) -> W {
        let uncommitted = self.pages.len() - self.uncommitted_idx;
        if uncommitted > 0 {
            log::warn!("dropping {uncommitted} uncommitted page(s); was a logical page not committed?");
        }
        self.writer
    }
}

impl LayoutManager<PdfDocument> {
    /// Writes the committed pages out as a PDF
    pub fn save<Out: Write>(self, out: Out) -> Result<(), LayoutError> {
        self.into_writer().write(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{pagesize::LETTER, writer::RecordingWriter};

    fn body() -> Body {
        Body {
            left: Pt(10.0),
            bottom: Pt(20.0),
            width: Pt(100.0),
            height: Pt(500.0),
        }
    }

    #[test]
    fn walks_down_to_later_pages() {
        let mut mgr = LayoutManager::new(RecordingWriter::new(), LETTER);
        mgr.add_page();
        let body = body();

        assert_eq!(
            mgr.appropriate_page(&body, Pt(300.0), Pt::ZERO).unwrap(),
            (0, Pt(300.0), Pt::ZERO)
        );
        assert_eq!(mgr.appropriate_page(&body, Pt(20.0), Pt::ZERO).unwrap().0, 0);
        assert_eq!(mgr.pages().len(), 1);

        // one point below the body is the next page, and exactly one body
        // height below the bottom is the bottom of the next page
        assert_eq!(mgr.appropriate_page(&body, Pt(19.0), Pt::ZERO).unwrap(), (1, Pt(519.0), Pt::ZERO));
        assert_eq!(mgr.appropriate_page(&body, Pt(-480.0), Pt::ZERO).unwrap(), (1, Pt(20.0), Pt::ZERO));
        assert_eq!(mgr.pages().len(), 2);

        let (idx, y, adj) = mgr.appropriate_page(&body, Pt(-600.0), Pt::ZERO).unwrap();
        assert_eq!((idx, y, adj), (2, Pt(400.0), Pt::ZERO));
        assert_eq!(mgr.pages().len(), 3);
        assert_eq!(mgr.pages()[2].page_num(), 3);
    }

    #[test]
    fn items_hanging_over_a_page_top_move_down() {
        let mut mgr = LayoutManager::new(RecordingWriter::new(), LETTER);
        mgr.add_page();
        let body = body();

        // bottom lands 10 below the top of the second page's body
        let (idx, y, adj) = mgr.appropriate_page(&body, Pt(10.0), Pt(50.0)).unwrap();
        assert_eq!(idx, 1);
        assert_eq!(y, Pt(470.0));
        assert_eq!(adj, Pt(-40.0));

        // the first page is never adjusted
        assert_eq!(
            mgr.appropriate_page(&body, Pt(500.0), Pt(50.0)).unwrap(),
            (0, Pt(500.0), Pt::ZERO)
        );
    }

    #[test]
    fn unreachable_y_values_are_refused() {
        let mut mgr = LayoutManager::new(RecordingWriter::new(), LETTER);
        mgr.add_page();
        let body = body();

        for y in [f32::NEG_INFINITY, f32::INFINITY, f32::NAN] {
            let result = mgr.appropriate_page(&body, Pt(y), Pt::ZERO);
            assert!(matches!(result, Err(LayoutError::NonFiniteCoordinate(_))));
        }
        for y in [-1e9, -1e12, f32::MIN] {
            let result = mgr.appropriate_page(&body, Pt(y), Pt::ZERO);
            assert!(matches!(result, Err(LayoutError::PageLimitExceeded { .. })));
        }
        assert_eq!(mgr.pages().len(), 1);

        // the furthest page that is still allowed
        let y = body.bottom - body.height * MAX_PAGES_PER_GROUPING as f32 + Pt(1.0);
        let (idx, _, _) = mgr.appropriate_page(&body, y, Pt::ZERO).unwrap();
        assert_eq!(idx, MAX_PAGES_PER_GROUPING);
    }

    #[test]
    fn discarding_reopens_the_manager() {
        let mut mgr = LayoutManager::new(RecordingWriter::new(), LETTER);
        {
            let lp = mgr.logical_page_start(Orientation::Portrait).unwrap();
            assert_eq!(lp.body_top(), Pt(755.0));
        }
        assert!(matches!(
            mgr.logical_page_start(Orientation::Portrait),
            Err(LayoutError::GroupingStillOpen(1))
        ));
        assert_eq!(mgr.discard_uncommitted(), 1);
        assert_eq!(mgr.discard_uncommitted(), 0);

        let mut lp = mgr.logical_page_start(Orientation::Landscape).unwrap();
        assert_eq!(lp.body_top(), Pt(575.0));
        lp.commit().unwrap();
        assert_eq!(mgr.committed_pages(), 1);
        assert_eq!(mgr.pages()[0].page_num(), 1);
    }

    #[test]
    fn committed_pages_are_refused() {
        let mut mgr = LayoutManager::new(RecordingWriter::new(), LETTER);
        let mut lp = mgr.logical_page_start(Orientation::Portrait).unwrap();
        lp.commit().unwrap();
        assert!(matches!(mgr.page_mut(0), Err(LayoutError::PageCommitted(0))));
        assert!(matches!(mgr.page_mut(1), Err(LayoutError::NoSuchPage(1))));
        assert_eq!(mgr.writer().page_count(), 1);
    }

    #[test]
    fn page_reactor_offsets_each_page() {
        let mut mgr = LayoutManager::new(RecordingWriter::new(), LETTER)
            .with_page_reactor(|page_num| if page_num % 2 == 0 { Pt(-15.0) } else { Pt(15.0) });
        mgr.add_page();
        mgr.add_page();
        assert_eq!(mgr.pages()[0].x_off(), Pt(15.0));
        assert_eq!(mgr.pages()[1].x_off(), Pt(-15.0));
    }

    #[test]
    fn margins_must_leave_a_body() {
        let mut mgr = LayoutManager::new(RecordingWriter::new(), LETTER);
        let result = mgr.logical_page_start_with_margins(Orientation::Portrait, Margins::all(Pt(400.0)));
        assert!(matches!(result, Err(LayoutError::InvalidBody { .. })));
        assert!(mgr.pages().is_empty());
    }
}
