mod pdf;
mod recording;

pub use pdf::*;
pub use recording::*;

use crate::{style::TextStyle, Colour, Coord, Dim, ImageSource, LayoutError, LineStyle};
use std::rc::Rc;

/// A handle to an image embedded in a document
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ImageId(pub usize);

/// Receives committed pages from a [`LayoutManager`](crate::page::LayoutManager).
///
/// Pages arrive strictly in order. Each is opened with
/// [`new_page`](DocumentWriter::new_page), receives its primitives in paint
/// order and is closed with [`finalize_page`](DocumentWriter::finalize_page)
/// before the next one is opened.
pub trait DocumentWriter {
    /// Whatever the writer needs to collect a page's contents
    type Page;

    /// `media` is always the portrait size. A rotated page is shown in
    /// landscape and its content is drawn in landscape coordinates.
    fn new_page(&mut self, media: Dim, rotated: bool) -> Result<Self::Page, LayoutError>;

    /// Called once per distinct image per document
    fn embed_image(&mut self, image: &Rc<ImageSource>) -> Result<ImageId, LayoutError>;

    fn draw_line(
        &mut self,
        page: &mut Self::Page,
        start: Coord,
        end: Coord,
        style: &LineStyle,
    ) -> Result<(), LayoutError>;

    fn fill_rect(
        &mut self,
        page: &mut Self::Page,
        bottom_left: Coord,
        dim: Dim,
        colour: Colour,
    ) -> Result<(), LayoutError>;

    fn draw_text(
        &mut self,
        page: &mut Self::Page,
        baseline_left: Coord,
        text: &str,
        style: &TextStyle,
    ) -> Result<(), LayoutError>;

    fn draw_image(
        &mut self,
        page: &mut Self::Page,
        image: ImageId,
        bottom_left: Coord,
        dim: Dim,
    ) -> Result<(), LayoutError>;

    fn finalize_page(&mut self, page: Self::Page) -> Result<(), LayoutError>;
}
