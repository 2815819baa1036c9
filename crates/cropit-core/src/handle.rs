// Author: Dustin Pilgrim
// License: MIT

use crate::rect::{Point, Rect};
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    TopLeft,
    Top,
    TopRight,
    Left,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

impl Handle {
    /// Hit-test priority order.
    pub const ALL: [Handle; 8] = [
        Handle::TopLeft,
        Handle::Top,
        Handle::TopRight,
        Handle::Left,
        Handle::Right,
        Handle::BottomLeft,
        Handle::Bottom,
        Handle::BottomRight,
    ];

    pub fn moves_left(self) -> bool {
        matches!(self, Handle::Left | Handle::TopLeft | Handle::BottomLeft)
    }

    pub fn moves_right(self) -> bool {
        matches!(self, Handle::Right | Handle::TopRight | Handle::BottomRight)
    }

    pub fn moves_top(self) -> bool {
        matches!(self, Handle::Top | Handle::TopLeft | Handle::TopRight)
    }

    pub fn moves_bottom(self) -> bool {
        matches!(self, Handle::Bottom | Handle::BottomLeft | Handle::BottomRight)
    }

    pub fn is_horizontal(self) -> bool {
        self.moves_left() || self.moves_right()
    }

    pub fn is_vertical(self) -> bool {
        self.moves_top() || self.moves_bottom()
    }

    /// Mirror across the vertical axis (left <-> right).
    pub fn opposite_horizontal(self) -> Self {
        match self {
            Handle::Left => Handle::Right,
            Handle::Right => Handle::Left,
            Handle::TopLeft => Handle::TopRight,
            Handle::TopRight => Handle::TopLeft,
            Handle::BottomLeft => Handle::BottomRight,
            Handle::BottomRight => Handle::BottomLeft,
            other => other,
        }
    }

    /// Mirror across the horizontal axis (top <-> bottom).
    pub fn opposite_vertical(self) -> Self {
        match self {
            Handle::Top => Handle::Bottom,
            Handle::Bottom => Handle::Top,
            Handle::TopLeft => Handle::BottomLeft,
            Handle::BottomLeft => Handle::TopLeft,
            Handle::TopRight => Handle::BottomRight,
            Handle::BottomRight => Handle::TopRight,
            other => other,
        }
    }

    /// Position of this handle on a normalized rectangle.
    pub fn center(self, r: &Rect) -> Point {
        let c = r.center();
        match self {
            Handle::TopLeft => Point::new(r.left, r.top),
            Handle::Top => Point::new(c.x, r.top),
            Handle::TopRight => Point::new(r.right, r.top),
            Handle::Left => Point::new(r.left, c.y),
            Handle::Right => Point::new(r.right, c.y),
            Handle::BottomLeft => Point::new(r.left, r.bottom),
            Handle::Bottom => Point::new(c.x, r.bottom),
            Handle::BottomRight => Point::new(r.right, r.bottom),
        }
    }

    /// Square grab box centred on the handle.
    pub fn hit_box(self, r: &Rect, half: i32) -> Rect {
        let c = self.center(r);
        Rect::new(c.x - half, c.y - half, c.x + half, c.y + half)
    }

    pub fn cursor(self) -> CursorShape {
        match self {
            Handle::Top | Handle::Bottom => CursorShape::ResizeVertical,
            Handle::Left | Handle::Right => CursorShape::ResizeHorizontal,
            Handle::TopLeft | Handle::BottomRight => CursorShape::ResizeNwse,
            Handle::TopRight | Handle::BottomLeft => CursorShape::ResizeNesw,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorShape {
    Crosshair,
    Move,
    ResizeVertical,
    ResizeHorizontal,
    ResizeNwse,
    ResizeNesw,
}

impl CursorShape {
    /// Name in the freedesktop cursor theme.
    pub fn theme_name(self) -> &'static str {
        match self {
            CursorShape::Crosshair => "crosshair",
            CursorShape::Move => "move",
            CursorShape::ResizeVertical => "ns-resize",
            CursorShape::ResizeHorizontal => "ew-resize",
            CursorShape::ResizeNwse => "nwse-resize",
            CursorShape::ResizeNesw => "nesw-resize",
        }
    }
}

fn dist2(a: Point, b: Point) -> i64 {
    let dx = (a.x - b.x) as i64;
    let dy = (a.y - b.y) as i64;
    dx * dx + dy * dy
}

/// Which handle (if any) is under `p`.
///
/// Handle boxes are tested first; when several overlap on a small selection
/// the closest centre wins, ties going to the earlier handle in
/// [`Handle::ALL`]. Then the four thin edge strips between the corners.
pub fn hit_test(p: Point, selection: &Rect, tuning: &Tuning) -> Option<Handle> {
    let r = selection.normalize();
    if r.width() < 1 || r.height() < 1 {
        return None;
    }

    let mut best: Option<(i64, Handle)> = None;
    for h in Handle::ALL {
        if !h.hit_box(&r, tuning.handle_half).contains(p) {
            continue;
        }
        let d = dist2(p, h.center(&r));
        if best.is_none_or(|(bd, _)| d < bd) {
            best = Some((d, h));
        }
    }
    if let Some((_, h)) = best {
        return Some(h);
    }

    // 2) Bare edges, inset from the corners.
    let e = tuning.edge_grab();
    let strips = [
        (Rect::new(r.left + e, r.top - e, r.right - e, r.top + e), Handle::Top),
        (Rect::new(r.left + e, r.bottom - e, r.right - e, r.bottom + e), Handle::Bottom),
        (Rect::new(r.left - e, r.top + e, r.left + e, r.bottom - e), Handle::Left),
        (Rect::new(r.right - e, r.top + e, r.right + e, r.bottom - e), Handle::Right),
    ];

    strips
        .into_iter()
        .find(|(strip, _)| strip.contains(p))
        .map(|(_, h)| h)
}

/// Cursor for a pointer at `p` while no gesture is active.
pub fn hover_cursor(p: Point, selection: Option<&Rect>, tuning: &Tuning) -> CursorShape {
    let Some(sel) = selection else {
        return CursorShape::Crosshair;
    };

    match hit_test(p, sel, tuning) {
        Some(h) => h.cursor(),
        None if sel.normalize().contains(p) => CursorShape::Move,
        None => CursorShape::Crosshair,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_handle_centre_hits_itself() {
        let t = Tuning::default();
        let sizes = [2, 3, 5, 8, 13, 40, 301];
        for &w in &sizes {
            for &h in &sizes {
                for (x, y) in [(0, 0), (17, 5), (-9, 120)] {
                    let sel = Rect::from_size(x, y, w, h);
                    for handle in Handle::ALL {
                        let c = handle.center(&sel);
                        assert_eq!(hit_test(c, &sel, &t), Some(handle), "{sel:?} {handle:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn edge_strips_grab_bare_edges() {
        let t = Tuning::default();
        let sel = Rect::new(100, 100, 300, 200);
        // Between the Top and TopRight boxes, 2px above the edge.
        assert_eq!(hit_test(Point::new(250, 98), &sel, &t), Some(Handle::Top));
        assert_eq!(hit_test(Point::new(250, 203), &sel, &t), Some(Handle::Bottom));
        assert_eq!(hit_test(Point::new(96, 130), &sel, &t), Some(Handle::Left));
        assert_eq!(hit_test(Point::new(303, 170), &sel, &t), Some(Handle::Right));
    }

    #[test]
    fn body_and_outside_miss() {
        let t = Tuning::default();
        let sel = Rect::new(100, 100, 300, 200);
        assert_eq!(hit_test(Point::new(200, 140), &sel, &t), None);
        assert_eq!(hit_test(Point::new(20, 20), &sel, &t), None);
        assert_eq!(hover_cursor(Point::new(200, 140), Some(&sel), &t), CursorShape::Move);
        assert_eq!(hover_cursor(Point::new(20, 20), Some(&sel), &t), CursorShape::Crosshair);
        assert_eq!(hover_cursor(Point::new(20, 20), None, &t), CursorShape::Crosshair);
        assert_eq!(
            hover_cursor(Point::new(300, 200), Some(&sel), &t),
            CursorShape::ResizeNwse
        );
    }

    #[test]
    fn degenerate_selection_has_no_handles() {
        let t = Tuning::default();
        let sel = Rect::new(50, 50, 50, 90);
        assert_eq!(hit_test(Point::new(50, 50), &sel, &t), None);
    }

    #[test]
    fn unnormalized_selection_is_normalized_first() {
        let t = Tuning::default();
        let sel = Rect::new(300, 200, 100, 100);
        assert_eq!(hit_test(Point::new(100, 100), &sel, &t), Some(Handle::TopLeft));
    }

    #[test]
    fn opposites_mirror_one_axis_only() {
        assert_eq!(Handle::Left.opposite_horizontal(), Handle::Right);
        assert_eq!(Handle::TopLeft.opposite_horizontal(), Handle::TopRight);
        assert_eq!(Handle::Top.opposite_horizontal(), Handle::Top);
        assert_eq!(Handle::Bottom.opposite_vertical(), Handle::Top);
        assert_eq!(Handle::BottomRight.opposite_vertical(), Handle::TopRight);
        assert_eq!(Handle::Right.opposite_vertical(), Handle::Right);
        for h in Handle::ALL {
            assert_eq!(h.opposite_horizontal().opposite_horizontal(), h);
            assert_eq!(h.opposite_vertical().opposite_vertical(), h);
        }
    }

    #[test]
    fn cursor_mapping() {
        assert_eq!(Handle::Top.cursor(), CursorShape::ResizeVertical);
        assert_eq!(Handle::Right.cursor(), CursorShape::ResizeHorizontal);
        assert_eq!(Handle::TopLeft.cursor(), CursorShape::ResizeNwse);
        assert_eq!(Handle::BottomLeft.cursor(), CursorShape::ResizeNesw);
    }
}
