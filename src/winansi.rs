//! Conversion of arbitrary Unicode text into the WinAnsi (Windows-1252)
//! repertoire understood by the standard PDF fonts.
//!
//! [`to_win_ansi`] is applied once to every [`Text`](crate::layout::Text) before it is
//! measured, so the widths used for wrapping are the widths of what will actually be
//! drawn. [`encode`] turns an already converted string into single-byte codes.

/// Drawn in place of anything that has no WinAnsi equivalent
pub const PLACEHOLDER: char = '\u{2022}';

const PLACEHOLDER_BYTE: u8 = 0x95;

/// Code points 0x80 to 0x9F; `None` marks the five undefined codes
const HIGH_CONTROL_BLOCK: [Option<char>; 32] = [
    Some('\u{20AC}'),
    None,
    Some('\u{201A}'),
    Some('\u{0192}'),
    Some('\u{201E}'),
    Some('\u{2026}'),
    Some('\u{2020}'),
    Some('\u{2021}'),
    Some('\u{02C6}'),
    Some('\u{2030}'),
    Some('\u{0160}'),
    Some('\u{2039}'),
    Some('\u{0152}'),
    None,
    Some('\u{017D}'),
    None,
    None,
    Some('\u{2018}'),
    Some('\u{2019}'),
    Some('\u{201C}'),
    Some('\u{201D}'),
    Some('\u{2022}'),
    Some('\u{2013}'),
    Some('\u{2014}'),
    Some('\u{02DC}'),
    Some('\u{2122}'),
    Some('\u{0161}'),
    Some('\u{203A}'),
    Some('\u{0153}'),
    None,
    Some('\u{017E}'),
    Some('\u{0178}'),
];

/// The single-byte code of `ch`, if it has one
pub fn win_ansi_byte(ch: char) -> Option<u8> {
    match ch {
        '\t' | '\n' | '\r' | ' '..='~' | '\u{A0}'..='\u{FF}' => Some(ch as u32 as u8),
        _ => HIGH_CONTROL_BLOCK
            .iter()
            .position(|c| *c == Some(ch))
            .map(|idx| 0x80 + idx as u8),
    }
}

fn cyrillic(ch: char) -> Option<&'static str> {
    let latin = match ch {
        'А' => "A",
        'Б' => "B",
        'В' => "V",
        'Г' => "G",
        'Д' => "D",
        'Е' => "E",
        'Ё' => "Yo",
        'Ж' => "Zh",
        'З' => "Z",
        'И' => "I",
        'Й' => "Y",
        'К' => "K",
        'Л' => "L",
        'М' => "M",
        'Н' => "N",
        'О' => "O",
        'П' => "P",
        'Р' => "R",
        'С' => "S",
        'Т' => "T",
        'У' => "U",
        'Ф' => "F",
        'Х' => "Kh",
        'Ц' => "Ts",
        'Ч' => "Ch",
        'Ш' => "Sh",
        'Щ' => "Shch",
        'Ъ' => "\"",
        'Ы' => "Y",
        'Ь' => "'",
        'Э' => "E",
        'Ю' => "Yu",
        'Я' => "Ya",
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' => "e",
        'ё' => "yo",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "y",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "kh",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "shch",
        'ъ' => "\"",
        'ы' => "y",
        'ь' => "'",
        'э' => "e",
        'ю' => "yu",
        'я' => "ya",
        'Є' => "Ye",
        'є' => "ye",
        'І' => "I",
        'і' => "i",
        'Ї' => "Yi",
        'ї' => "yi",
        'Ґ' => "G",
        'ґ' => "g",
        _ => return None,
    };
    Some(latin)
}

fn typographic(ch: char) -> Option<&'static str> {
    let plain = match ch {
        // hyphens and dashes outside the code page
        '\u{2010}' | '\u{2011}' | '\u{2043}' | '\u{2212}' => "-",
        '\u{2012}' => "\u{2013}",
        '\u{2015}' => "\u{2014}",
        // exotic spaces
        '\u{2000}'..='\u{200A}' | '\u{202F}' | '\u{205F}' | '\u{3000}' => " ",
        // zero-width characters disappear
        '\u{200B}'..='\u{200D}' | '\u{2060}' | '\u{FEFF}' => "",
        '\u{2032}' => "'",
        '\u{2033}' => "\"",
        '\u{201B}' => "\u{2018}",
        '\u{201F}' => "\u{201C}",
        '\u{2044}' | '\u{2215}' => "/",
        '\u{2190}' => "<-",
        '\u{2192}' => "->",
        '\u{2194}' => "<->",
        '\u{21D2}' => "=>",
        '\u{2264}' => "<=",
        '\u{2265}' => ">=",
        '\u{2260}' => "!=",
        '\u{2248}' => "~",
        '\u{2027}' | '\u{2219}' | '\u{22C5}' => "\u{B7}",
        '\u{25CF}' | '\u{25E6}' | '\u{2023}' => "\u{2022}",
        '\u{2116}' => "No.",
        '\u{2153}' => "1/3",
        '\u{2154}' => "2/3",
        _ => return None,
    };
    Some(plain)
}

/// Transliterate `text` into characters that all have a WinAnsi code.
///
/// Cyrillic is romanized, typographic punctuation outside the code page is
/// replaced by its nearest equivalent, and anything else becomes [`PLACEHOLDER`].
pub fn to_win_ansi(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if win_ansi_byte(ch).is_some() {
            out.push(ch);
        } else if let Some(s) = cyrillic(ch).or_else(|| typographic(ch)) {
            out.push_str(s);
        } else {
            out.push(PLACEHOLDER);
        }
    }
    out
}

/// Encode `text` as WinAnsi bytes, using the placeholder byte for anything unmappable
pub fn encode(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| win_ansi_byte(ch).unwrap_or(PLACEHOLDER_BYTE))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_the_code_page() {
        let s = "Café – “quoted” € 10½ naïve";
        assert_eq!(to_win_ansi(s), s);
    }

    #[test]
    fn romanizes_cyrillic() {
        assert_eq!(to_win_ansi("Щука и Жук"), "Shchuka i Zhuk");
    }

    #[test]
    fn substitutes_punctuation() {
        assert_eq!(to_win_ansi("a\u{2011}b \u{2212}3 x\u{2009}y"), "a-b -3 x y");
        assert_eq!(to_win_ansi("zero\u{200B}width"), "zerowidth");
        assert_eq!(to_win_ansi("a \u{2192} b"), "a -> b");
    }

    #[test]
    fn unmappable_becomes_placeholder() {
        assert_eq!(to_win_ansi("漢字!"), "\u{2022}\u{2022}!");
    }

    #[test]
    fn encodes_single_bytes() {
        assert_eq!(encode("A€é—"), vec![b'A', 0x80, 0xE9, 0x97]);
        assert_eq!(encode("漢"), vec![0x95]);
    }
}
