//! Glyph advance widths for the standard Helvetica faces, in 1/1000 em.
//!
//! Only printable ASCII is tabulated; the Latin-1 upper half uses an
//! average width, which is close enough for line wrapping.

use super::markup::Style;

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,      // 'p'..'~'
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

const LATIN1_REGULAR: u16 = 556;
const LATIN1_BOLD: u16 = 611;

/// Advance width of `c` in thousandths of the font size.
pub fn char_width(c: char, style: Style) -> u16 {
    let code = c as u32;
    let bold = style == Style::Bold;
    if (32..=126).contains(&code) {
        let index = (code - 32) as usize;
        if bold {
            HELVETICA_BOLD[index]
        } else {
            HELVETICA[index]
        }
    } else if bold {
        LATIN1_BOLD
    } else {
        LATIN1_REGULAR
    }
}

/// Width of `text` in points at `size` points.
pub fn text_width_pt(text: &str, style: Style, size: f32) -> f32 {
    let units: u32 = text.chars().map(|c| char_width(c, style) as u32).sum();
    units as f32 * size / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_widths() {
        assert_eq!(char_width(' ', Style::Regular), 278);
        assert_eq!(char_width('W', Style::Regular), 944);
        assert_eq!(char_width('i', Style::Italic), 222);
        assert_eq!(char_width('i', Style::Bold), 278);
        assert_eq!(char_width('~', Style::Bold), 584);
        assert_eq!(char_width('é', Style::Regular), 556);
    }

    #[test]
    fn test_text_width() {
        // "Hi" = 722 + 222
        assert!((text_width_pt("Hi", Style::Regular, 10.0) - 9.44).abs() < 1e-4);
        assert_eq!(text_width_pt("", Style::Bold, 12.0), 0.0);
    }
}
