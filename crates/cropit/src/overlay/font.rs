// Author: Dustin Pilgrim
// License: MIT
//
// 8x8 bitmap glyphs, drawn at an integer scale.

use cropit_core::Size;
use font8x8::{UnicodeFonts, BASIC_FONTS};

pub const SCALE: i32 = 2;
const CELL: i32 = 8 * SCALE;

pub fn measure(text: &str) -> Size {
    Size {
        w: text.chars().count() as i32 * CELL,
        h: CELL,
    }
}

/// Calls `plot(x, y)` for every lit pixel of `text` laid out from `(x, y)`.
pub fn for_each_pixel(text: &str, x: i32, y: i32, mut plot: impl FnMut(i32, i32)) {
    for (i, ch) in text.chars().enumerate() {
        let Some(glyph) = BASIC_FONTS.get(ch).or_else(|| BASIC_FONTS.get('?')) else {
            continue;
        };
        let gx = x + i as i32 * CELL;

        for (row_idx, &bits) in glyph.iter().enumerate() {
            for col in 0..8 {
                if (bits >> col) & 1 == 0 {
                    continue;
                }
                let px = gx + col * SCALE;
                let py = y + row_idx as i32 * SCALE;
                for sy in 0..SCALE {
                    for sx in 0..SCALE {
                        plot(px + sx, py + sy);
                    }
                }
            }
        }
    }
}
