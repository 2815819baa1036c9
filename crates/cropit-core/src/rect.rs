// Author: Dustin Pilgrim
// License: MIT

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Size {
    pub w: i32,
    pub h: i32,
}

/// Edge-based rectangle in overlay-local coordinates.
///
/// `right` and `bottom` are exclusive. During a gesture a rectangle may be
/// held unnormalized (`left > right` or `top > bottom`); call [`Rect::normalize`]
/// before asking for its size or testing containment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub const fn from_size(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self::new(x, y, x + w, y + h)
    }

    /// Smallest normalized rectangle spanning two points.
    pub fn from_points(a: Point, b: Point) -> Self {
        Self::new(a.x, a.y, b.x, b.y).normalize()
    }

    pub fn normalize(self) -> Self {
        Self {
            left: self.left.min(self.right),
            top: self.top.min(self.bottom),
            right: self.left.max(self.right),
            bottom: self.top.max(self.bottom),
        }
    }

    pub fn is_normalized(&self) -> bool {
        self.left <= self.right && self.top <= self.bottom
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn size(&self) -> Size {
        Size {
            w: self.width(),
            h: self.height(),
        }
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.left, self.top)
    }

    pub fn center(&self) -> Point {
        Point::new((self.left + self.right) / 2, (self.top + self.bottom) / 2)
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Half-open containment: the left/top edges are inside, right/bottom are not.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x < self.right && p.y >= self.top && p.y < self.bottom
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.left >= self.left
            && other.top >= self.top
            && other.right <= self.right
            && other.bottom <= self.bottom
    }

    /// Clip each edge into `bounds`.
    pub fn clamp_to(self, bounds: &Rect) -> Self {
        Self {
            left: self.left.clamp(bounds.left, bounds.right),
            top: self.top.clamp(bounds.top, bounds.bottom),
            right: self.right.clamp(bounds.left, bounds.right),
            bottom: self.bottom.clamp(bounds.top, bounds.bottom),
        }
    }

    pub fn inflate(self, margin: i32) -> Self {
        Self {
            left: self.left - margin,
            top: self.top - margin,
            right: self.right + margin,
            bottom: self.bottom + margin,
        }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            left: self.left + dx,
            top: self.top + dy,
            right: self.right + dx,
            bottom: self.bottom + dy,
        }
    }

    pub fn union(self, other: Rect) -> Self {
        Self {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Smallest rectangle containing every input, `None` for an empty iterator.
    pub fn union_all<I>(rects: I) -> Option<Self>
    where
        I: IntoIterator<Item = Rect>,
    {
        rects.into_iter().reduce(Rect::union)
    }

    pub fn intersect(self, other: Rect) -> Option<Self> {
        let r = Self {
            left: self.left.max(other.left),
            top: self.top.max(other.top),
            right: self.right.min(other.right),
            bottom: self.bottom.min(other.bottom),
        };
        if r.is_empty() { None } else { Some(r) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples() -> Vec<Rect> {
        let coords = [-40, -3, 0, 1, 7, 250];
        let mut out = Vec::new();
        for &l in &coords {
            for &t in &coords {
                for &r in &coords {
                    for &b in &coords {
                        out.push(Rect::new(l, t, r, b));
                    }
                }
            }
        }
        out
    }

    #[test]
    fn normalize_is_idempotent_and_non_negative() {
        for r in samples() {
            let n = r.normalize();
            assert_eq!(n.normalize(), n);
            assert!(n.width() >= 0 && n.height() >= 0, "{r:?}");
            assert!(n.is_normalized());
        }
    }

    #[test]
    fn width_is_negative_until_normalized() {
        let r = Rect::new(30, 40, 10, 20);
        assert_eq!(r.width(), -20);
        assert_eq!(r.normalize(), Rect::new(10, 20, 30, 40));
    }

    #[test]
    fn contains_is_half_open() {
        let r = Rect::new(0, 0, 10, 10);
        assert!(r.contains(Point::new(0, 0)));
        assert!(r.contains(Point::new(9, 9)));
        assert!(!r.contains(Point::new(10, 5)));
        assert!(!r.contains(Point::new(5, 10)));
    }

    #[test]
    fn clamp_clips_each_edge() {
        let bounds = Rect::new(0, 0, 100, 50);
        let r = Rect::new(-10, 20, 120, 60).clamp_to(&bounds);
        assert_eq!(r, Rect::new(0, 20, 100, 50));
        assert!(bounds.contains_rect(&r));
    }

    #[test]
    fn union_and_inflate() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(20, -5, 30, 5);
        assert_eq!(a.union(b), Rect::new(0, -5, 30, 10));
        assert_eq!(a.inflate(3), Rect::new(-3, -3, 13, 13));
        assert_eq!(Rect::union_all([a, b, a.inflate(40)]), Some(Rect::new(-40, -40, 50, 50)));
        assert_eq!(Rect::union_all(std::iter::empty()), None);
    }

    #[test]
    fn intersect_empty_is_none() {
        let a = Rect::new(0, 0, 10, 10);
        assert_eq!(a.intersect(Rect::new(10, 0, 20, 10)), None);
        assert_eq!(a.intersect(Rect::new(5, 5, 20, 20)), Some(Rect::new(5, 5, 10, 10)));
    }
}
