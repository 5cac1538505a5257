use crate::{
    refs::{ObjectReferences, RefType},
    winansi, LayoutError,
};
use owned_ttf_parser::{AsFaceRef, Face, OwnedFace};
use pdf_writer::{
    types::{FontFlags, SystemInfo},
    Finish, Name, Pdf, Ref, Str,
};
use std::collections::HashMap;

/// Glyph metrics are reported in a 1000 units per em space, like AFM files
pub const FONT_UNITS: f32 = 1000.0;

/// The Courier family of the 14 standard PDF fonts. These never need to be
/// embedded and are always available, which also makes their metrics exact
/// and predictable: every glyph is 600 units wide.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BuiltinFont {
    Courier,
    CourierBold,
    CourierOblique,
    CourierBoldOblique,
}

impl BuiltinFont {
    const ADVANCE: f32 = 600.0;
    const ASCENDER: f32 = 629.0;
    const DESCENDER: f32 = -157.0;

    pub fn base_name(&self) -> &'static str {
        match self {
            BuiltinFont::Courier => "Courier",
            BuiltinFont::CourierBold => "Courier-Bold",
            BuiltinFont::CourierOblique => "Courier-Oblique",
            BuiltinFont::CourierBoldOblique => "Courier-BoldOblique",
        }
    }
}

enum FontKind {
    Builtin(BuiltinFont),
    TrueType(OwnedFace),
}

/// A font used to measure and draw text. Either one of the built-in fonts or a
/// parsed TTF / OTF face, which is embedded in its entirety in the generated PDF.
///
/// Fonts are shared between [`TextStyle`](crate::style::TextStyle)s through an `Rc`
/// and embedded once per document no matter how many styles refer to them.
pub struct Font {
    kind: FontKind,
}

impl std::fmt::Debug for Font {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Font").field("name", &self.name()).finish()
    }
}

impl Font {
    pub fn builtin(font: BuiltinFont) -> Font {
        Font {
            kind: FontKind::Builtin(font),
        }
    }

    /// Load a font from raw bytes, parsing the font and returning an error if the font
    /// could not be parsed
    pub fn load(bytes: Vec<u8>) -> Result<Font, LayoutError> {
        let face = OwnedFace::from_vec(bytes, 0)?;

        Ok(Font {
            kind: FontKind::TrueType(face),
        })
    }

    fn face(&self) -> Option<&Face<'_>> {
        match &self.kind {
            FontKind::TrueType(face) => Some(face.as_face_ref()),
            FontKind::Builtin(_) => None,
        }
    }

    fn scaling(face: &Face<'_>) -> f32 {
        FONT_UNITS / face.units_per_em() as f32
    }

    /// Obtain the full name of the font
    pub fn name(&self) -> String {
        match &self.kind {
            FontKind::Builtin(b) => b.base_name().to_string(),
            FontKind::TrueType(face) => face_name(face.as_face_ref(), owned_ttf_parser::name_id::FULL_NAME)
                .unwrap_or_else(|| "Unnamed".to_string()),
        }
    }

    /// Distance from the baseline to the top of the font, in font units
    pub fn ascent(&self) -> f32 {
        match self.face() {
            Some(face) => face.ascender() as f32 * Font::scaling(face),
            None => BuiltinFont::ASCENDER,
        }
    }

    /// Distance from the baseline to the bottom of the font, in font units.
    /// Note: this is usually negative
    pub fn descent(&self) -> f32 {
        match self.face() {
            Some(face) => face.descender() as f32 * Font::scaling(face),
            None => BuiltinFont::DESCENDER,
        }
    }

    /// Average advance of the printable ASCII glyphs, in font units
    pub fn avg_width(&self) -> Option<f32> {
        let face = match self.face() {
            Some(face) => face,
            None => return Some(BuiltinFont::ADVANCE),
        };
        let advances: Vec<f32> = (' '..='~')
            .filter_map(|ch| face.glyph_index(ch))
            .filter_map(|gid| face.glyph_hor_advance(gid))
            .map(|adv| adv as f32)
            .collect();
        if advances.is_empty() {
            return None;
        }
        let sum: f32 = advances.iter().sum();
        Some(sum / advances.len() as f32 * Font::scaling(face))
    }

    /// Width of `text` in font units. `None` if some character has neither a glyph
    /// nor a replacement glyph in this font.
    pub fn string_width(&self, text: &str) -> Option<f32> {
        let face = match self.face() {
            Some(face) => face,
            None => return Some(text.chars().count() as f32 * BuiltinFont::ADVANCE),
        };
        let mut width: u32 = 0;
        for ch in text.chars() {
            let gid = self.glyph_id(ch).or_else(|| self.replacement_glyph_id())?;
            width += face.glyph_hor_advance(owned_ttf_parser::GlyphId(gid))? as u32;
        }
        Some(width as f32 * Font::scaling(face))
    }

    pub fn glyph_id(&self, ch: char) -> Option<u16> {
        self.face()?.glyph_index(ch).map(|i| i.0)
    }

    pub fn replacement_glyph_id(&self) -> Option<u16> {
        self.glyph_id('\u{FFFD}').or_else(|| self.glyph_id('?'))
    }

    /// The bytes a content stream shows for `text` in this font
    pub(crate) fn encode(&self, text: &str) -> Vec<u8> {
        match &self.kind {
            FontKind::Builtin(_) => winansi::encode(text),
            FontKind::TrueType(_) => text
                .chars()
                .filter_map(|ch| self.glyph_id(ch).or_else(|| self.replacement_glyph_id()))
                .flat_map(|gid| gid.to_be_bytes())
                .collect(),
        }
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, font_index: usize, writer: &mut Pdf) {
        let font_id = refs.gen(RefType::Font(font_index));
        match &self.kind {
            FontKind::Builtin(builtin) => {
                let mut font = writer.type1_font(font_id);
                font.base_font(Name(builtin.base_name().as_bytes()));
                font.encoding_predefined(Name(b"WinAnsiEncoding"));
            }
            FontKind::TrueType(face) => {
                let cid_font_id = write_cid(face, refs, font_index, writer);
                let to_unicode_id = write_to_unicode(face.as_face_ref(), refs, font_index, writer);

                let mut font = writer.type0_font(font_id);
                font.base_font(Name(format!("F{font_index}").as_bytes()));
                font.encoding_predefined(Name(b"Identity-H"));
                font.descendant_font(cid_font_id);
                font.to_unicode(to_unicode_id);
            }
        }
    }
}

fn face_name(face: &Face<'_>, name_id: u16) -> Option<String> {
    face.names()
        .into_iter()
        .find(|name| name.name_id == name_id && name.is_unicode())
        .and_then(|name| name.to_string())
}

fn write_cid(face: &OwnedFace, refs: &mut ObjectReferences, font_index: usize, writer: &mut Pdf) -> Ref {
    let font_descriptor_id = write_descriptor(face, refs, font_index, writer);
    let face = face.as_face_ref();

    let id = refs.gen(RefType::CidFont(font_index));

    let mut cid_font = writer.cid_font(id);
    cid_font.subtype(pdf_writer::types::CidFontType::Type2);
    cid_font.base_font(Name(format!("F{font_index}").as_bytes()));
    cid_font.system_info(SystemInfo {
        registry: Str(b"Adobe"),
        ordering: Str(b"Identity"),
        supplement: 0,
    });
    cid_font.font_descriptor(font_descriptor_id);

    let sizing = glyphs_sizing(face, &glyph_ids(face));
    let scaling = Font::scaling(face);

    // the most popular width becomes the default
    let mut widths_counts: HashMap<u16, usize> = HashMap::new();
    for (_, (width, _)) in sizing.values() {
        *widths_counts.entry(*width).or_insert(0) += 1;
    }
    let most_common_width = widths_counts
        .iter()
        .max_by_key(|&(_, count)| *count)
        .map(|(&width, _)| width as f32 * scaling)
        .unwrap_or(FONT_UNITS);

    let mut id_widths: Vec<(u16, f32)> = sizing
        .iter()
        .map(|(&cid, &(_, (width, _)))| (cid, width as f32 * scaling))
        .collect();
    id_widths.sort_by_key(|(id, _)| *id);

    let mut widths = cid_font.widths();
    widths.consecutive(0, [FONT_UNITS]);
    let mut run: Option<(u16, Vec<f32>)> = None;
    for (cid, width) in id_widths {
        match run.as_mut() {
            Some((start, ws)) if (cid - *start) as usize == ws.len() => ws.push(width),
            _ => {
                if let Some((start, ws)) = run.take() {
                    widths.consecutive(start, ws);
                }
                run = Some((cid, vec![width]));
            }
        }
    }
    if let Some((start, ws)) = run {
        widths.consecutive(start, ws);
    }
    widths.finish();

    cid_font.default_width(most_common_width);
    cid_font.cid_to_gid_map_predefined(Name(b"Identity"));

    id
}

fn write_descriptor(
    owned: &OwnedFace,
    refs: &mut ObjectReferences,
    font_index: usize,
    writer: &mut Pdf,
) -> Ref {
    let font_data_id = refs.gen(RefType::FontData(font_index));
    writer
        .stream(font_data_id, owned.as_slice())
        .pair(Name(b"Length1"), owned.as_slice().len() as i32);

    let face = owned.as_face_ref();
    let sizing = glyphs_sizing(face, &glyph_ids(face));
    let scaling = Font::scaling(face);

    let max_width = sizing.values().map(|&(_, (w, _))| w).max().unwrap_or_default();
    let max_height = sizing.values().map(|&(_, (_, h))| h).max().unwrap_or_default();
    let sum_width: usize = sizing.values().map(|&(_, (w, _))| w as usize).sum();
    let avg_width = sum_width as f32 / sizing.len().max(1) as f32;

    let id = refs.gen(RefType::FontDescriptor(font_index));

    let name = face_name(face, owned_ttf_parser::name_id::FULL_NAME).unwrap_or_else(|| format!("F{font_index}"));
    let family = face_name(face, owned_ttf_parser::name_id::FAMILY).unwrap_or_else(|| name.clone());

    let mut descriptor = writer.font_descriptor(id);
    descriptor.name(Name(name.as_bytes()));
    descriptor.family(Str(family.as_bytes()));
    descriptor.weight(face.weight().to_number());

    let mut flags: FontFlags = FontFlags::NON_SYMBOLIC;
    if face.is_monospaced() {
        flags.set(FontFlags::FIXED_PITCH, true);
    }
    if face.is_italic() {
        flags.set(FontFlags::ITALIC, true);
    }
    descriptor.flags(flags);

    descriptor.bbox(pdf_writer::Rect {
        x1: 0.0,
        y1: face.descender() as f32 * scaling,
        x2: max_width as f32 * scaling,
        y2: max_height as f32 * scaling,
    });
    descriptor.italic_angle(if face.is_italic() { -12.0 } else { 0.0 });
    descriptor.ascent(face.ascender() as f32 * scaling);
    descriptor.descent(face.descender() as f32 * scaling);
    descriptor.leading(face.line_gap() as f32 * scaling);
    descriptor.cap_height(face.capital_height().map(|h| h as f32 * scaling).unwrap_or(FONT_UNITS));
    descriptor.x_height(
        face.x_height()
            .unwrap_or_else(|| face.capital_height().unwrap_or_default()) as f32
            * scaling,
    );
    // not recorded in TrueType fonts; 80 is what most producers write
    descriptor.stem_v(80.0);
    descriptor.avg_width(avg_width * scaling);
    descriptor.max_width(max_width as f32 * scaling);
    descriptor.missing_width(max_width as f32 * scaling);
    descriptor.font_file2(font_data_id);

    id
}

/// Every glyph reachable from a unicode cmap, and the first character that maps to it
fn glyph_ids(face: &Face<'_>) -> HashMap<u16, char> {
    let mut map: HashMap<u16, char> = HashMap::new();
    let Some(cmap) = face.tables().cmap else {
        return map;
    };

    for subtable in cmap.subtables.into_iter().filter(|table| table.is_unicode()) {
        subtable.codepoints(|codepoint: u32| {
            if let Ok(ch) = char::try_from(codepoint) {
                if let Some(index) = subtable.glyph_index(codepoint).filter(|index| index.0 > 0) {
                    map.entry(index.0).or_insert(ch);
                }
            }
        });
    }

    map
}

/// glyph id => (char, (advance, height))
fn glyphs_sizing(face: &Face<'_>, ids: &HashMap<u16, char>) -> HashMap<u16, (char, (u16, i16))> {
    let mut sizing = HashMap::new();
    for (&id, &ch) in ids.iter() {
        if let Some(gid) = face.glyph_index(ch) {
            if let Some(h_advance) = face.glyph_hor_advance(gid) {
                let height = face
                    .glyph_bounding_box(gid)
                    .map(|bbox| bbox.y_max - bbox.y_min - face.descender())
                    .unwrap_or(1000);
                sizing.insert(id, (ch, (h_advance, height)));
            }
        }
    }
    sizing
}

fn write_to_unicode(face: &Face<'_>, refs: &mut ObjectReferences, font_index: usize, writer: &mut Pdf) -> Ref {
    let id = refs.gen(RefType::ToUnicode(font_index));

    let mut map = String::from(
        "/CIDInit /ProcSet findresource begin\n\
         12 dict begin\n\
         begincmap\n\
         /CIDSystemInfo\n\
         << /Registry (Adobe)\n\
         /Ordering (UCS) /Supplement 0 >> def\n\
         /CMapName /Adobe-Identity-UCS def\n\
         /CMapType 2 def\n\
         1 begincodespacerange\n\
         <0000> <FFFF>\n\
         endcodespacerange\n",
    );

    let mut ids: Vec<(u16, char)> = glyph_ids(face).into_iter().collect();
    ids.sort_by_key(|&(id, _)| id);

    // bfchar blocks hold at most 100 entries sharing a high byte
    let mut blocks: Vec<Vec<(u16, char)>> = Vec::new();
    for (id, ch) in ids {
        match blocks.last_mut() {
            Some(block) if block.len() < 100 && block[0].0 >> 8 == id >> 8 => block.push((id, ch)),
            _ => blocks.push(vec![(id, ch)]),
        }
    }

    for block in blocks {
        map.push_str(&format!("{} beginbfchar\n", block.len()));
        for (id, ch) in block {
            let mut utf16 = [0u16; 2];
            let hex: String = ch.encode_utf16(&mut utf16).iter().map(|u| format!("{u:04x}")).collect();
            map.push_str(&format!("<{id:04x}> <{hex}>\n"));
        }
        map.push_str("endbfchar\n");
    }

    map.push_str("endcmap CMapName currentdict /CMap defineresource pop end end\n");

    let compressed = miniz_oxide::deflate::compress_to_vec_zlib(
        map.as_bytes(),
        miniz_oxide::deflate::CompressionLevel::DefaultCompression as u8,
    );
    let mut stream = writer.stream(id, compressed.as_slice());
    stream.filter(pdf_writer::Filter::FlateDecode);

    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn courier_is_monospaced() {
        let font = Font::builtin(BuiltinFont::Courier);
        assert_eq!(font.string_width("abc"), Some(1800.0));
        assert_eq!(font.string_width(""), Some(0.0));
        assert_eq!(font.avg_width(), Some(600.0));
        assert_eq!(font.ascent(), 629.0);
        assert_eq!(font.descent(), -157.0);
        assert_eq!(font.name(), "Courier");
    }

    #[test]
    fn builtin_fonts_encode_win_ansi() {
        let font = Font::builtin(BuiltinFont::CourierBold);
        assert_eq!(font.encode("a€"), vec![b'a', 0x80]);
        assert_eq!(font.glyph_id('a'), None);
    }

    #[test]
    fn rejects_garbage_font_data() {
        assert!(Font::load(vec![0, 1, 2, 3]).is_err());
    }
}
