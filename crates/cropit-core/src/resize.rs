// Author: Dustin Pilgrim
// License: MIT
//
// Anchor-based resize. The anchor is the selection frozen at the start of the
// gesture; the dragged edge moves relative to its anchored counterpart. When the
// pointer crosses that counterpart the rectangle collapses to zero on that axis
// for one frame, the handle flips to its mirror and the crossed edge becomes the
// new fixed side of the anchor.

use crate::handle::Handle;
use crate::rect::{Point, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeStep {
    /// Normalized, not yet clamped to the desktop.
    pub rect: Rect,
    pub handle: Handle,
    pub flipped: bool,
}

/// One resize frame. `anchor` is updated in place when an edge crosses.
pub fn resize_from_handle(handle: Handle, p: Point, anchor: &mut Rect, min_size: i32) -> ResizeStep {
    let m = min_size.max(1);
    let mut h = handle;
    let mut flipped = false;

    let mut left = anchor.left;
    let mut right = anchor.right;
    let mut top = anchor.top;
    let mut bottom = anchor.bottom;

    if h.moves_right() {
        if p.x < anchor.left {
            right = anchor.left;
            left = right;
            h = h.opposite_horizontal();
            anchor.right = right;
            flipped = true;
        } else {
            right = p.x.max(anchor.left + m);
        }
    } else if h.moves_left() {
        if p.x > anchor.right {
            left = anchor.right;
            right = left;
            h = h.opposite_horizontal();
            anchor.left = left;
            flipped = true;
        } else {
            left = p.x.min(anchor.right - m);
        }
    }

    if h.moves_bottom() {
        if p.y < anchor.top {
            bottom = anchor.top;
            top = bottom;
            h = h.opposite_vertical();
            anchor.bottom = bottom;
            flipped = true;
        } else {
            bottom = p.y.max(anchor.top + m);
        }
    } else if h.moves_top() {
        if p.y > anchor.bottom {
            top = anchor.bottom;
            bottom = top;
            h = h.opposite_vertical();
            anchor.top = top;
            flipped = true;
        } else {
            top = p.y.min(anchor.bottom - m);
        }
    }

    ResizeStep {
        rect: Rect::new(left, top, right, bottom).normalize(),
        handle: h,
        flipped,
    }
}
