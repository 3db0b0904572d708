//! Glyph advance widths used to measure text before it is placed.

pub trait FontMetrics {
    /// Advance of `c` in em units (1.0 = font size).
    fn advance_em(&self, c: char) -> f32;

    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars().map(|c| self.advance_em(c)).sum::<f32>() * font_size
    }
}

/// Standard Helvetica widths. The rendering backend asks for a
/// metric-compatible face, so measured and drawn widths agree.
#[derive(Debug, Clone, Copy, Default)]
pub struct Helvetica;

// 1/1000 em, ASCII 0x20..=0x7E
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

impl FontMetrics for Helvetica {
    fn advance_em(&self, c: char) -> f32 {
        let units = match c {
            ' '..='~' => HELVETICA_ASCII[c as usize - 0x20],
            '\t' => 278,
            '\u{2026}' | '\u{2014}' => 1000,
            '\u{2013}' => 556,
            '\u{2018}' | '\u{2019}' => 222,
            '\u{201C}' | '\u{201D}' => 333,
            _ => 556,
        };
        units as f32 / 1000.0
    }
}
