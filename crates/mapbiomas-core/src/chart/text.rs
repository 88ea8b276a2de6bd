//! Built-in 5×7 pixel face for chart text.
//!
//! The bitmap backend ships without a font rasterizer, so every label is
//! drawn as scaled pixel blocks from the table below. Accented characters
//! in Portuguese class names fold to their base letter; anything else the
//! table does not know advances like a space.
use plotters::prelude::*;

use super::ChartError;

pub(super) const GLYPH_HEIGHT: usize = 7;
const SPACE_WIDTH: u8 = 3;

#[derive(Clone, Copy)]
pub(super) struct Glyph {
    pub width: u8,
    pub rows: [u8; GLYPH_HEIGHT],
}

/// Strip the accents used in Portuguese legend names.
fn fold_accent(ch: char) -> char {
    match ch {
        'á' | 'à' | 'â' | 'ã' | 'Á' | 'À' | 'Â' | 'Ã' => 'A',
        'é' | 'ê' | 'É' | 'Ê' => 'E',
        'í' | 'Í' => 'I',
        'ó' | 'ô' | 'õ' | 'Ó' | 'Ô' | 'Õ' => 'O',
        'ú' | 'ü' | 'Ú' | 'Ü' => 'U',
        'ç' | 'Ç' => 'C',
        _ => ch,
    }
}

pub(super) fn glyph_for(ch: char) -> Option<Glyph> {
    let upper = fold_accent(ch).to_ascii_uppercase();
    Some(match upper {
        'A' => Glyph {
            width: 5,
            rows: [
                0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001,
            ],
        },
        'B' => Glyph {
            width: 5,
            rows: [
                0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110,
            ],
        },
        'C' => Glyph {
            width: 5,
            rows: [
                0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110,
            ],
        },
        'D' => Glyph {
            width: 5,
            rows: [
                0b11100, 0b10010, 0b10001, 0b10001, 0b10001, 0b10010, 0b11100,
            ],
        },
        'E' => Glyph {
            width: 5,
            rows: [
                0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111,
            ],
        },
        'F' => Glyph {
            width: 5,
            rows: [
                0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000,
            ],
        },
        'G' => Glyph {
            width: 5,
            rows: [
                0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111,
            ],
        },
        'H' => Glyph {
            width: 5,
            rows: [
                0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001,
            ],
        },
        'I' => Glyph {
            width: 3,
            rows: [0b111, 0b010, 0b010, 0b010, 0b010, 0b010, 0b111],
        },
        'J' => Glyph {
            width: 5,
            rows: [
                0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100,
            ],
        },
        'K' => Glyph {
            width: 5,
            rows: [
                0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001,
            ],
        },
        'L' => Glyph {
            width: 5,
            rows: [
                0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111,
            ],
        },
        'M' => Glyph {
            width: 5,
            rows: [
                0b10001, 0b11011, 0b10101, 0b10001, 0b10001, 0b10001, 0b10001,
            ],
        },
        'N' => Glyph {
            width: 5,
            rows: [
                0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001, 0b10001,
            ],
        },
        'O' => Glyph {
            width: 5,
            rows: [
                0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110,
            ],
        },
        'P' => Glyph {
            width: 5,
            rows: [
                0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000,
            ],
        },
        'Q' => Glyph {
            width: 5,
            rows: [
                0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101,
            ],
        },
        'R' => Glyph {
            width: 5,
            rows: [
                0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001,
            ],
        },
        'S' => Glyph {
            width: 5,
            rows: [
                0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110,
            ],
        },
        'T' => Glyph {
            width: 5,
            rows: [
                0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100,
            ],
        },
        'U' => Glyph {
            width: 5,
            rows: [
                0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110,
            ],
        },
        'V' => Glyph {
            width: 5,
            rows: [
                0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b01010, 0b00100,
            ],
        },
        'W' => Glyph {
            width: 5,
            rows: [
                0b10001, 0b10001, 0b10001, 0b10001, 0b10101, 0b11011, 0b10001,
            ],
        },
        'X' => Glyph {
            width: 5,
            rows: [
                0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001,
            ],
        },
        'Y' => Glyph {
            width: 5,
            rows: [
                0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100,
            ],
        },
        'Z' => Glyph {
            width: 5,
            rows: [
                0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111,
            ],
        },
        '0' => Glyph {
            width: 5,
            rows: [
                0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110,
            ],
        },
        '1' => Glyph {
            width: 3,
            rows: [0b010, 0b110, 0b010, 0b010, 0b010, 0b010, 0b111],
        },
        '2' => Glyph {
            width: 5,
            rows: [
                0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111,
            ],
        },
        '3' => Glyph {
            width: 5,
            rows: [
                0b11110, 0b00001, 0b00001, 0b00110, 0b00001, 0b00001, 0b11110,
            ],
        },
        '4' => Glyph {
            width: 5,
            rows: [
                0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010,
            ],
        },
        '5' => Glyph {
            width: 5,
            rows: [
                0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110,
            ],
        },
        '6' => Glyph {
            width: 5,
            rows: [
                0b01110, 0b10001, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110,
            ],
        },
        '7' => Glyph {
            width: 5,
            rows: [
                0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000,
            ],
        },
        '8' => Glyph {
            width: 5,
            rows: [
                0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110,
            ],
        },
        '9' => Glyph {
            width: 5,
            rows: [
                0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b10001, 0b01110,
            ],
        },
        '%' => Glyph {
            width: 5,
            rows: [
                0b11000, 0b11001, 0b00010, 0b00100, 0b01000, 0b10011, 0b00011,
            ],
        },
        '-' => Glyph {
            width: 3,
            rows: [0b000, 0b000, 0b000, 0b111, 0b000, 0b000, 0b000],
        },
        '.' => Glyph {
            width: 1,
            rows: [0b0, 0b0, 0b0, 0b0, 0b0, 0b0, 0b1],
        },
        ',' => Glyph {
            width: 2,
            rows: [0b00, 0b00, 0b00, 0b00, 0b00, 0b01, 0b10],
        },
        '/' => Glyph {
            width: 3,
            rows: [0b001, 0b001, 0b010, 0b010, 0b100, 0b100, 0b100],
        },
        '(' => Glyph {
            width: 3,
            rows: [0b001, 0b010, 0b100, 0b100, 0b100, 0b010, 0b001],
        },
        ')' => Glyph {
            width: 3,
            rows: [0b100, 0b010, 0b001, 0b001, 0b001, 0b010, 0b100],
        },
        ':' => Glyph {
            width: 1,
            rows: [0b0, 0b1, 0b0, 0b0, 0b0, 0b1, 0b0],
        },
        _ => return None,
    })
}

/// Horizontal advance of one character, including tracking.
pub(super) fn advance(ch: char, scale: i32) -> i32 {
    match glyph_for(ch) {
        Some(glyph) => scale * (glyph.width as i32 + 1),
        None => scale * SPACE_WIDTH as i32,
    }
}

/// Width of `text` when drawn at `scale`.
pub(super) fn text_width(text: &str, scale: i32) -> i32 {
    text.chars().map(|ch| advance(ch, scale)).sum()
}

fn block<DB: DrawingBackend>(
    area: &DrawingArea<DB, plotters::coord::Shift>,
    x: i32,
    y: i32,
    scale: i32,
    color: &RGBColor,
) -> Result<(), ChartError> {
    area.draw(&Rectangle::new(
        [(x, y), (x + scale - 1, y + scale - 1)],
        color.filled(),
    ))
    .map_err(|e| ChartError::Draw(e.to_string()))
}

/// Draw `text` with its top-left corner at `(x, y)`.
pub(super) fn draw_text<DB: DrawingBackend>(
    area: &DrawingArea<DB, plotters::coord::Shift>,
    text: &str,
    (x, y): (i32, i32),
    scale: i32,
    color: &RGBColor,
) -> Result<(), ChartError> {
    let mut cursor_x = x;
    for ch in text.chars() {
        if let Some(glyph) = glyph_for(ch) {
            for (row, pattern) in glyph.rows.iter().enumerate() {
                for col in 0..glyph.width {
                    if pattern & (1 << (glyph.width - 1 - col)) != 0 {
                        block(
                            area,
                            cursor_x + col as i32 * scale,
                            y + row as i32 * scale,
                            scale,
                            color,
                        )?;
                    }
                }
            }
        }
        cursor_x += advance(ch, scale);
    }
    Ok(())
}

/// Draw `text` rotated a quarter turn so it reads bottom to top. `(x, y)` is
/// the bottom-left corner of the run.
pub(super) fn draw_text_vertical<DB: DrawingBackend>(
    area: &DrawingArea<DB, plotters::coord::Shift>,
    text: &str,
    (x, y): (i32, i32),
    scale: i32,
    color: &RGBColor,
) -> Result<(), ChartError> {
    let mut cursor_y = y;
    for ch in text.chars() {
        if let Some(glyph) = glyph_for(ch) {
            for (row, pattern) in glyph.rows.iter().enumerate() {
                for col in 0..glyph.width {
                    if pattern & (1 << (glyph.width - 1 - col)) != 0 {
                        block(
                            area,
                            x + row as i32 * scale,
                            cursor_y - col as i32 * scale,
                            scale,
                            color,
                        )?;
                    }
                }
            }
        }
        cursor_y -= advance(ch, scale);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_letters_digits_and_punctuation_have_glyphs() {
        for ch in ('A'..='Z').chain('0'..='9') {
            assert!(glyph_for(ch).is_some(), "missing glyph for {:?}", ch);
        }
        for ch in ['%', '.', ',', '-', '(', ')', ':', '/'] {
            assert!(glyph_for(ch).is_some(), "missing glyph for {:?}", ch);
        }
    }

    #[test]
    fn lowercase_and_accents_fold_to_base_letters() {
        let base = glyph_for('A').unwrap();
        for ch in ['a', 'ã', 'Á', 'â'] {
            let folded = glyph_for(ch).unwrap();
            assert_eq!(folded.rows, base.rows);
        }
        assert_eq!(glyph_for('ç').unwrap().rows, glyph_for('C').unwrap().rows);
    }

    #[test]
    fn advance_accounts_for_width_and_tracking() {
        // 'A' is 5 wide plus 1 tracking; a space is 3 wide.
        assert_eq!(advance('A', 1), 6);
        assert_eq!(advance(' ', 1), 3);
        assert_eq!(advance('A', 2), 12);
        assert_eq!(text_width("A A", 1), 15);
    }

    #[test]
    fn draw_text_sets_expected_pixels() {
        let width = 16u32;
        let height = 8u32;
        let mut buf = vec![0u8; (width * height * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buf, (width, height)).into_drawing_area();
            root.fill(&WHITE).unwrap();
            draw_text(&root, "I", (0, 0), 1, &BLACK).unwrap();
            root.present().unwrap();
        }

        let pixel = |x: u32, y: u32| {
            let idx = ((y * width + x) * 3) as usize;
            (buf[idx], buf[idx + 1], buf[idx + 2])
        };
        // 'I' top row is 0b111: columns 0..3 of row 0 are ink.
        assert_eq!(pixel(0, 0), (0, 0, 0));
        assert_eq!(pixel(1, 0), (0, 0, 0));
        assert_eq!(pixel(2, 0), (0, 0, 0));
        // Column 1 of row 1 is the stem; column 0 is background.
        assert_eq!(pixel(1, 1), (0, 0, 0));
        assert_eq!(pixel(0, 1), (255, 255, 255));
    }

    #[test]
    fn vertical_text_occupies_the_rotated_extent() {
        let width = 16u32;
        let height = 16u32;
        let mut buf = vec![0u8; (width * height * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buf, (width, height)).into_drawing_area();
            root.fill(&WHITE).unwrap();
            // 'T' drawn upward from (2, 12): its crossbar lands in column 2.
            draw_text_vertical(&root, "T", (2, 12), 1, &BLACK).unwrap();
            root.present().unwrap();
        }

        let pixel = |x: u32, y: u32| {
            let idx = ((y * width + x) * 3) as usize;
            (buf[idx], buf[idx + 1], buf[idx + 2])
        };
        // Crossbar: glyph row 0 maps to x = 2, spanning y = 12 down to 8.
        assert_eq!(pixel(2, 12), (0, 0, 0));
        assert_eq!(pixel(2, 8), (0, 0, 0));
        // Stem: glyph rows 1..7 at the centre column (col 2) map to y = 10.
        assert_eq!(pixel(8, 10), (0, 0, 0));
        // Far corner stays white.
        assert_eq!(pixel(15, 15), (255, 255, 255));
    }
}
