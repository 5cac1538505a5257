use super::{DocumentWriter, ImageId};
use crate::{style::TextStyle, Colour, Coord, Dim, ImageSource, LayoutError, LineStyle};
use std::rc::Rc;

/// One call made on a [`RecordingWriter`]
#[derive(Debug, Clone, PartialEq)]
pub enum Recorded {
    PageStart {
        page_index: usize,
        media: Dim,
        rotated: bool,
    },
    ImageEmbedded {
        id: ImageId,
    },
    Line {
        page_index: usize,
        start: Coord,
        end: Coord,
        style: LineStyle,
    },
    Rect {
        page_index: usize,
        bottom_left: Coord,
        dim: Dim,
        colour: Colour,
    },
    Text {
        page_index: usize,
        baseline_left: Coord,
        text: String,
        style: TextStyle,
    },
    Image {
        page_index: usize,
        id: ImageId,
        bottom_left: Coord,
        dim: Dim,
    },
    PageEnd {
        page_index: usize,
    },
}

/// A writer that only remembers what it was asked to do. Useful for dry runs
/// and for checking where content ended up.
#[derive(Debug, Default)]
pub struct RecordingWriter {
    events: Vec<Recorded>,
    pages: usize,
    images: usize,
}

impl RecordingWriter {
    pub fn new() -> RecordingWriter {
        RecordingWriter::default()
    }

    pub fn events(&self) -> &[Recorded] {
        &self.events
    }

    /// How many pages were finalized
    pub fn page_count(&self) -> usize {
        self.pages
    }

    /// Events drawn on one page, without the page start and end markers
    pub fn page_events(&self, page_index: usize) -> Vec<&Recorded> {
        self.events
            .iter()
            .filter(|event| match event {
                Recorded::Line { page_index: p, .. }
                | Recorded::Rect { page_index: p, .. }
                | Recorded::Text { page_index: p, .. }
                | Recorded::Image { page_index: p, .. } => *p == page_index,
                _ => false,
            })
            .collect()
    }
}

impl DocumentWriter for RecordingWriter {
    /// The index of the page being recorded
    type Page = usize;

    fn new_page(&mut self, media: Dim, rotated: bool) -> Result<usize, LayoutError> {
        let page_index = self.pages;
        self.events.push(Recorded::PageStart {
            page_index,
            media,
            rotated,
        });
        Ok(page_index)
    }

    fn embed_image(&mut self, _image: &Rc<ImageSource>) -> Result<ImageId, LayoutError> {
        let id = ImageId(self.images);
        self.images += 1;
        self.events.push(Recorded::ImageEmbedded { id });
        Ok(id)
    }

    fn draw_line(
        &mut self,
        page: &mut usize,
        start: Coord,
        end: Coord,
        style: &LineStyle,
    ) -> Result<(), LayoutError> {
        self.events.push(Recorded::Line {
            page_index: *page,
            start,
            end,
            style: *style,
        });
        Ok(())
    }

    fn fill_rect(
        &mut self,
        page: &mut usize,
        bottom_left: Coord,
        dim: Dim,
        colour: Colour,
    ) -> Result<(), LayoutError> {
        self.events.push(Recorded::Rect {
            page_index: *page,
            bottom_left,
            dim,
            colour,
        });
        Ok(())
    }

    fn draw_text(
        &mut self,
        page: &mut usize,
        baseline_left: Coord,
        text: &str,
        style: &TextStyle,
    ) -> Result<(), LayoutError> {
        self.events.push(Recorded::Text {
            page_index: *page,
            baseline_left,
            text: text.to_string(),
            style: style.clone(),
        });
        Ok(())
    }

    fn draw_image(
        &mut self,
        page: &mut usize,
        id: ImageId,
        bottom_left: Coord,
        dim: Dim,
    ) -> Result<(), LayoutError> {
        self.events.push(Recorded::Image {
            page_index: *page,
            id,
            bottom_left,
            dim,
        });
        Ok(())
    }

    fn finalize_page(&mut self, page: usize) -> Result<(), LayoutError> {
        self.events.push(Recorded::PageEnd { page_index: page });
        self.pages += 1;
        Ok(())
    }
}
