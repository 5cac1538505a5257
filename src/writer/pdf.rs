use super::{DocumentWriter, ImageId};
use crate::{
    refs::{ObjectReferences, RefType},
    style::TextStyle,
    Colour, Coord, Dim, Font, ImageSource, LayoutError, LineStyle,
};
use id_arena::{Arena, Id};
use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str};
use std::{
    collections::{BTreeSet, HashMap},
    io::Write,
    rc::Rc,
};

/// A page that is still receiving content
pub struct PdfPage {
    media: Dim,
    rotated: bool,
    content: Content,
    fonts: BTreeSet<usize>,
    images: BTreeSet<usize>,
}

struct FinishedPage {
    media: Dim,
    rotated: bool,
    content: Vec<u8>,
    fonts: BTreeSet<usize>,
    images: BTreeSet<usize>,
}

#[derive(Default)]
/// Collects committed pages and renders them out as a PDF with a call to
/// [`PdfDocument::write`] (or [`LayoutManager::save`](crate::page::LayoutManager::save)).
///
/// Fonts are keyed by `Rc` identity, so every `TextStyle` sharing one `Rc<Font>`
/// embeds that font once.
pub struct PdfDocument {
    fonts: Arena<Rc<Font>>,
    font_ids: HashMap<usize, Id<Rc<Font>>>,
    images: Arena<Rc<ImageSource>>,
    pages: Vec<FinishedPage>,
}

impl PdfDocument {
    pub fn new() -> PdfDocument {
        PdfDocument::default()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn font_count(&self) -> usize {
        self.fonts.len()
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    fn font_index(&mut self, font: &Rc<Font>) -> usize {
        let key = Rc::as_ptr(font) as usize;
        if let Some(id) = self.font_ids.get(&key) {
            return id.index();
        }
        let id = self.fonts.alloc(font.clone());
        self.font_ids.insert(key, id);
        id.index()
    }

    /// Write the entire document. The whole file is rendered in memory before
    /// it is written to `out`.
    pub fn write<W: Write>(self, mut out: W) -> Result<(), LayoutError> {
        let PdfDocument {
            fonts,
            images,
            pages,
            ..
        } = self;

        let mut refs = ObjectReferences::new();
        let catalog_id = refs.gen(RefType::Catalog);
        let page_tree_id = refs.gen(RefType::PageTree);

        let mut writer = Pdf::new();

        let page_refs: Vec<Ref> = (0..pages.len()).map(|i| refs.gen(RefType::Page(i))).collect();
        writer
            .pages(page_tree_id)
            .count(page_refs.len() as i32)
            .kids(page_refs.iter().copied());

        for (id, font) in fonts.iter() {
            font.write(&mut refs, id.index(), &mut writer);
        }
        for (id, image) in images.iter() {
            image.write(&mut refs, id.index(), &mut writer);
        }

        for (page_index, (page, page_ref)) in pages.iter().zip(page_refs).enumerate() {
            let mut pdf_page = writer.page(page_ref);
            pdf_page.media_box(Rect::new(
                0.0,
                0.0,
                page.media.width().0,
                page.media.height().0,
            ));
            pdf_page.parent(page_tree_id);
            if page.rotated {
                pdf_page.rotate(90);
            }

            let mut resources = pdf_page.resources();
            let mut resource_fonts = resources.fonts();
            for &i in page.fonts.iter() {
                resource_fonts.pair(
                    Name(format!("F{i}").as_bytes()),
                    refs.get_or_gen(RefType::Font(i)),
                );
            }
            resource_fonts.finish();
            let mut resource_xobjects = resources.x_objects();
            for &i in page.images.iter() {
                resource_xobjects.pair(
                    Name(format!("I{i}").as_bytes()),
                    refs.get_or_gen(RefType::Image(i)),
                );
            }
            resource_xobjects.finish();
            resources.finish();

            let content_id = refs.gen(RefType::ContentForPage(page_index));
            pdf_page.contents(content_id);
            pdf_page.finish();

            writer.stream(content_id, page.content.as_slice());
        }

        let mut catalog = writer.catalog(catalog_id);
        catalog.pages(page_tree_id);
        catalog.finish();

        out.write_all(writer.finish().as_slice())?;
        Ok(())
    }
}

impl DocumentWriter for PdfDocument {
    type Page = PdfPage;

    fn new_page(&mut self, media: Dim, rotated: bool) -> Result<PdfPage, LayoutError> {
        let mut content = Content::new();
        if rotated {
            // draw in landscape coordinates on the portrait media box
            content.transform([0.0, 1.0, -1.0, 0.0, media.width().0, 0.0]);
        }
        Ok(PdfPage {
            media,
            rotated,
            content,
            fonts: BTreeSet::new(),
            images: BTreeSet::new(),
        })
    }

    fn embed_image(&mut self, image: &Rc<ImageSource>) -> Result<ImageId, LayoutError> {
        let id = self.images.alloc(image.clone());
        log::debug!("embedding image {} ({:?})", id.index(), image);
        Ok(ImageId(id.index()))
    }

    fn draw_line(
        &mut self,
        page: &mut PdfPage,
        start: Coord,
        end: Coord,
        style: &LineStyle,
    ) -> Result<(), LayoutError> {
        let content = &mut page.content;
        content.save_state();
        style.colour().set_stroke(content);
        content
            .set_line_width(style.width().0)
            .move_to(start.x.0, start.y.0)
            .line_to(end.x.0, end.y.0)
            .stroke();
        content.restore_state();
        Ok(())
    }

    fn fill_rect(
        &mut self,
        page: &mut PdfPage,
        bottom_left: Coord,
        dim: Dim,
        colour: Colour,
    ) -> Result<(), LayoutError> {
        let content = &mut page.content;
        content.save_state();
        colour.set_fill(content);
        content
            .rect(bottom_left.x.0, bottom_left.y.0, dim.width().0, dim.height().0)
            .fill_nonzero();
        content.restore_state();
        Ok(())
    }

    fn draw_text(
        &mut self,
        page: &mut PdfPage,
        baseline_left: Coord,
        text: &str,
        style: &TextStyle,
    ) -> Result<(), LayoutError> {
        let font_index = self.font_index(style.font());
        page.fonts.insert(font_index);

        let encoded = style.font().encode(text);
        let content = &mut page.content;
        content.save_state();
        style.colour().set_fill(content);
        content
            .begin_text()
            .set_font(Name(format!("F{font_index}").as_bytes()), style.size().0)
            .next_line(baseline_left.x.0, baseline_left.y.0)
            .show(Str(encoded.as_slice()))
            .end_text();
        content.restore_state();
        Ok(())
    }

    fn draw_image(
        &mut self,
        page: &mut PdfPage,
        image: ImageId,
        bottom_left: Coord,
        dim: Dim,
    ) -> Result<(), LayoutError> {
        page.images.insert(image.0);
        let content = &mut page.content;
        content
            .save_state()
            .transform([
                dim.width().0,
                0.0,
                0.0,
                dim.height().0,
                bottom_left.x.0,
                bottom_left.y.0,
            ])
            .x_object(Name(format!("I{}", image.0).as_bytes()))
            .restore_state();
        Ok(())
    }

    fn finalize_page(&mut self, page: PdfPage) -> Result<(), LayoutError> {
        let PdfPage {
            media,
            rotated,
            content,
            fonts,
            images,
        } = page;
        self.pages.push(FinishedPage {
            media,
            rotated,
            content: content.finish(),
            fonts,
            images,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{colours, BuiltinFont, Pt};

    fn letter() -> Dim {
        Dim::new(Pt(612.0), Pt(792.0)).unwrap()
    }

    #[test]
    fn shares_fonts_by_identity() {
        let font = Rc::new(Font::builtin(BuiltinFont::Courier));
        let plain = TextStyle::new(font.clone(), Pt(10.0), colours::BLACK).unwrap();
        let big = TextStyle::new(font, Pt(20.0), colours::RED).unwrap();
        let other = TextStyle::new(Rc::new(Font::builtin(BuiltinFont::CourierBold)), Pt(10.0), colours::BLACK).unwrap();

        let mut doc = PdfDocument::new();
        let mut page = doc.new_page(letter(), false).unwrap();
        let at = Coord::new(Pt(10.0), Pt(10.0));
        doc.draw_text(&mut page, at, "a", &plain).unwrap();
        doc.draw_text(&mut page, at, "b", &big).unwrap();
        doc.draw_text(&mut page, at, "c", &other).unwrap();
        doc.finalize_page(page).unwrap();

        assert_eq!(doc.font_count(), 2);
        assert_eq!(doc.page_count(), 1);
    }

    #[test]
    fn writes_a_pdf_file() {
        let style = TextStyle::new(Rc::new(Font::builtin(BuiltinFont::Courier)), Pt(12.0), colours::BLACK).unwrap();
        let mut doc = PdfDocument::new();
        for rotated in [false, true] {
            let mut page = doc.new_page(letter(), rotated).unwrap();
            doc.fill_rect(&mut page, Coord::new(Pt(10.0), Pt(10.0)), letter(), colours::LIGHT_GREY)
                .unwrap();
            doc.draw_line(
                &mut page,
                Coord::new(Pt(0.0), Pt(100.0)),
                Coord::new(Pt(100.0), Pt(0.0)),
                &LineStyle::default(),
            )
            .unwrap();
            doc.draw_text(&mut page, Coord::new(Pt(50.0), Pt(50.0)), "Hello", &style)
                .unwrap();
            doc.finalize_page(page).unwrap();
        }

        let mut bytes: Vec<u8> = Vec::new();
        doc.write(&mut bytes).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/Rotate 90"));
        assert!(text.contains("/Courier"));
        assert!(text.contains("(Hello) Tj"));
    }
}
