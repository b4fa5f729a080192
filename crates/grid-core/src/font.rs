//! Built-in 5x7 block font.
//!
//! Deterministic letterforms for the fallback rasterizer and for hosts with
//! no text-rendering backend of their own. Strokes are two columns wide where
//! the cell allows it, approximating a bold sans face.

pub const GLYPH_COLS: u32 = 5;
pub const GLYPH_ROWS: u32 = 7;
/// Horizontal advance per character, in font pixels (5 + 1 spacing).
pub const GLYPH_ADVANCE: u32 = 6;

/// Row bitmaps for one character, top to bottom; bit 4 is the leftmost column.
/// Unknown characters render as a solid block, space as nothing.
pub fn glyph_rows(c: char) -> [u8; 7] {
    match c.to_ascii_uppercase() {
        ' ' => [0; 7],
        'A' => [0b01110, 0b11011, 0b11011, 0b11111, 0b11011, 0b11011, 0b11011],
        'B' => [0b11110, 0b11011, 0b11011, 0b11110, 0b11011, 0b11011, 0b11110],
        'C' => [0b01111, 0b11000, 0b11000, 0b11000, 0b11000, 0b11000, 0b01111],
        'D' => [0b11110, 0b11011, 0b11011, 0b11011, 0b11011, 0b11011, 0b11110],
        'E' => [0b11111, 0b11000, 0b11000, 0b11110, 0b11000, 0b11000, 0b11111],
        'F' => [0b11111, 0b11000, 0b11000, 0b11110, 0b11000, 0b11000, 0b11000],
        'G' => [0b01111, 0b11000, 0b11000, 0b11011, 0b11011, 0b11011, 0b01110],
        'H' => [0b11011, 0b11011, 0b11011, 0b11111, 0b11011, 0b11011, 0b11011],
        'I' => [0b11111, 0b01110, 0b01110, 0b01110, 0b01110, 0b01110, 0b11111],
        'J' => [0b00111, 0b00011, 0b00011, 0b00011, 0b11011, 0b11011, 0b01110],
        'K' => [0b11011, 0b11011, 0b11110, 0b11100, 0b11110, 0b11011, 0b11011],
        'L' => [0b11000, 0b11000, 0b11000, 0b11000, 0b11000, 0b11000, 0b11111],
        'M' => [0b11011, 0b11111, 0b11111, 0b11011, 0b11011, 0b11011, 0b11011],
        'N' => [0b11011, 0b11011, 0b11111, 0b11111, 0b11111, 0b11011, 0b11011],
        'O' => [0b01110, 0b11011, 0b11011, 0b11011, 0b11011, 0b11011, 0b01110],
        'P' => [0b11110, 0b11011, 0b11011, 0b11110, 0b11000, 0b11000, 0b11000],
        'Q' => [0b01110, 0b11011, 0b11011, 0b11011, 0b11011, 0b11110, 0b00111],
        'R' => [0b11110, 0b11011, 0b11011, 0b11110, 0b11011, 0b11011, 0b11011],
        'S' => [0b01111, 0b11000, 0b11000, 0b01110, 0b00011, 0b00011, 0b11110],
        'T' => [0b11111, 0b01110, 0b01110, 0b01110, 0b01110, 0b01110, 0b01110],
        'U' => [0b11011, 0b11011, 0b11011, 0b11011, 0b11011, 0b11011, 0b01110],
        'V' => [0b11011, 0b11011, 0b11011, 0b11011, 0b11011, 0b01110, 0b00100],
        'W' => [0b11011, 0b11011, 0b11011, 0b11011, 0b11111, 0b11111, 0b11011],
        'X' => [0b11011, 0b11011, 0b01110, 0b00100, 0b01110, 0b11011, 0b11011],
        'Y' => [0b11011, 0b11011, 0b11011, 0b01110, 0b01110, 0b01110, 0b01110],
        'Z' => [0b11111, 0b00011, 0b00110, 0b01100, 0b11000, 0b11000, 0b11111],
        '0' => [0b01110, 0b11011, 0b11011, 0b11011, 0b11011, 0b11011, 0b01110],
        '1' => [0b00110, 0b01110, 0b00110, 0b00110, 0b00110, 0b00110, 0b11111],
        '2' => [0b01110, 0b11011, 0b00011, 0b00110, 0b01100, 0b11000, 0b11111],
        '3' => [0b11110, 0b00011, 0b00011, 0b01110, 0b00011, 0b00011, 0b11110],
        '4' => [0b11011, 0b11011, 0b11011, 0b11111, 0b00011, 0b00011, 0b00011],
        '5' => [0b11111, 0b11000, 0b11110, 0b00011, 0b00011, 0b11011, 0b01110],
        '6' => [0b01111, 0b11000, 0b11110, 0b11011, 0b11011, 0b11011, 0b01110],
        '7' => [0b11111, 0b00011, 0b00110, 0b00110, 0b01100, 0b01100, 0b01100],
        '8' => [0b01110, 0b11011, 0b11011, 0b01110, 0b11011, 0b11011, 0b01110],
        '9' => [0b01110, 0b11011, 0b11011, 0b01111, 0b00011, 0b00011, 0b11110],
        _ => [0b11111; 7],
    }
}
