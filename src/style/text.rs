use crate::{Colour, Font, LayoutError, Pt, FONT_UNITS};
use std::rc::Rc;

/// Glyph widths and vertical metrics are scaled by `size / 960` rather than
/// `size / 1000`. Measured text is therefore slightly wider than what is drawn,
/// so wrapped rows never touch the edge of their box.
const METRICS_UNITS: f32 = 960.0;

/// Used when a font can't say how wide its glyphs are
const FALLBACK_AVG_WIDTH: f32 = 500.0;

/// Leading is half the descent rather than the font's own line gap
const LEADING_FACTOR: f32 = 0.5;

/// A font, size and colour, together with the metrics derived from them.
#[derive(Debug, Clone)]
pub struct TextStyle {
    font: Rc<Font>,
    size: Pt,
    colour: Colour,
    ascent: Pt,
    descent: Pt,
    leading: Pt,
    avg_char_width: Pt,
}

impl PartialEq for TextStyle {
    fn eq(&self, other: &TextStyle) -> bool {
        Rc::ptr_eq(&self.font, &other.font) && self.size == other.size && self.colour == other.colour
    }
}

impl TextStyle {
    /// Fails unless `size` is strictly positive
    pub fn new(font: Rc<Font>, size: Pt, colour: Colour) -> Result<TextStyle, LayoutError> {
        if !(size.0 > 0.0) {
            return Err(LayoutError::InvalidFontSize(size.0));
        }

        let factor = size.0 / METRICS_UNITS;
        let ascent = Pt(font.ascent() * factor);
        let descent = Pt(-font.descent() * factor);
        let avg_width = font.avg_width().unwrap_or_else(|| {
            log::warn!(
                "font {} has no usable glyph widths, assuming an average of {FALLBACK_AVG_WIDTH}",
                font.name()
            );
            FALLBACK_AVG_WIDTH
        });

        Ok(TextStyle {
            size,
            colour,
            ascent,
            descent,
            leading: descent * LEADING_FACTOR,
            avg_char_width: Pt(avg_width * size.0 / FONT_UNITS),
            font,
        })
    }

    /// The same font and size in another colour
    pub fn with_colour(&self, colour: Colour) -> TextStyle {
        TextStyle {
            colour,
            ..self.clone()
        }
    }

    pub fn font(&self) -> &Rc<Font> {
        &self.font
    }

    pub fn size(&self) -> Pt {
        self.size
    }

    pub fn colour(&self) -> Colour {
        self.colour
    }

    /// Height above the baseline
    pub fn ascent(&self) -> Pt {
        self.ascent
    }

    /// Depth below the baseline, as a positive number
    pub fn descent(&self) -> Pt {
        self.descent
    }

    /// Extra space below the descent before the next row
    pub fn leading(&self) -> Pt {
        self.leading
    }

    pub fn avg_char_width(&self) -> Pt {
        self.avg_char_width
    }

    /// Vertical distance from the top of one row to the top of the next
    pub fn line_height(&self) -> Pt {
        self.ascent + self.descent + self.leading
    }

    /// A first guess at how many characters fit in `width`. The 1.22 factor
    /// makes up for the average glyph width of a font being skewed low by the
    /// narrow space character.
    pub fn avg_chars_for_width(&self, width: Pt) -> usize {
        (width.0 * 1.22 / self.avg_char_width.0).max(0.0) as usize
    }

    pub fn string_width(&self, text: &str) -> Pt {
        let units = self.font.string_width(text).unwrap_or_else(|| {
            log::warn!("font {} can't measure {text:?}, estimating its width", self.font.name());
            text.chars().count() as f32 * self.avg_char_width.0 * FONT_UNITS / self.size.0
        });
        Pt(units * self.size.0 / METRICS_UNITS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{colours, BuiltinFont};

    fn courier(size: f32) -> TextStyle {
        TextStyle::new(Rc::new(Font::builtin(BuiltinFont::Courier)), Pt(size), colours::BLACK).unwrap()
    }

    fn close(a: Pt, b: f32) -> bool {
        (a.0 - b).abs() < 1e-4
    }

    #[test]
    fn derives_metrics_from_the_font() {
        let style = courier(12.0);
        assert!(close(style.ascent(), 7.8625));
        assert!(close(style.descent(), 1.9625));
        assert!(close(style.leading(), 0.98125));
        assert!(close(style.line_height(), 7.8625 + 1.9625 + 0.98125));
        assert!(close(style.avg_char_width(), 7.2));
    }

    #[test]
    fn measures_strings() {
        let style = courier(16.0);
        assert!(close(style.string_width("hello"), 50.0));
        assert!(close(style.string_width(""), 0.0));
        // 100 * 1.22 / 9.6
        assert_eq!(style.avg_chars_for_width(Pt(100.0)), 12);
    }

    #[test]
    fn size_must_be_positive() {
        let font = Rc::new(Font::builtin(BuiltinFont::Courier));
        assert!(TextStyle::new(font.clone(), Pt(0.0), colours::BLACK).is_err());
        assert!(TextStyle::new(font, Pt(-3.0), colours::BLACK).is_err());
    }

    #[test]
    fn colour_variants_share_the_font() {
        let style = courier(10.0);
        let red = style.with_colour(colours::RED);
        assert!(Rc::ptr_eq(style.font(), red.font()));
        assert_ne!(style, red);
        assert_eq!(red.colour(), colours::RED);
    }
}
