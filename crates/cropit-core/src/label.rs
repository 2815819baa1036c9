// Author: Dustin Pilgrim
// License: MIT

use crate::rect::{Rect, Size};
use crate::surface::TextMeasure;
use crate::tuning::Tuning;

/// "WIDTHxHEIGHT" of the normalized selection.
pub fn dimensions_text(selection: &Rect) -> String {
    let s = selection.normalize();
    format!("{}x{}", s.width(), s.height())
}

pub fn label_size(text: Size, tuning: &Tuning) -> Size {
    Size {
        w: text.w + tuning.label_pad_x * 2,
        h: text.h + tuning.label_pad_y * 2,
    }
}

/// Place a `size` label near the selection's top-left corner.
///
/// Tries, in order: outside to the left (top-aligned), above the top-left
/// corner, then floated just inside the selection and shifted so it stays on
/// screen. The first two are only taken when they fit within `visible`.
pub fn place_label(selection: &Rect, visible: &Rect, size: Size, tuning: &Tuning) -> Rect {
    let s = selection.normalize();
    let out = tuning.label_outside;

    let left_of = Rect::new(s.left - out - size.w, s.top, s.left - out, s.top + size.h);
    if visible.contains_rect(&left_of) {
        return left_of;
    }

    let above = Rect::new(s.left, s.top - out - size.h, s.left + size.w, s.top - out);
    if visible.contains_rect(&above) {
        return above;
    }

    let inside = Rect::from_size(
        s.left + tuning.label_inset,
        s.top + tuning.label_inset,
        size.w,
        size.h,
    );
    keep_within(inside, visible)
}

fn keep_within(mut r: Rect, visible: &Rect) -> Rect {
    if r.right > visible.right {
        r = r.offset(visible.right - r.right, 0);
    }
    if r.bottom > visible.bottom {
        r = r.offset(0, visible.bottom - r.bottom);
    }
    // Left/top last so an oversized label stays anchored at the origin.
    if r.left < visible.left {
        r = r.offset(visible.left - r.left, 0);
    }
    if r.top < visible.top {
        r = r.offset(0, visible.top - r.top);
    }
    r
}

/// Exact label box for a selection, measured the same way it is painted.
pub fn label_box<M>(selection: &Rect, visible: &Rect, measure: &M, tuning: &Tuning) -> Rect
where
    M: TextMeasure + ?Sized,
{
    let text = measure.measure_text(&dimensions_text(selection));
    place_label(selection, visible, label_size(text, tuning), tuning)
}
