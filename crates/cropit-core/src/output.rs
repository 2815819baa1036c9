// Author: Dustin Pilgrim
// License: MIT

use crate::rect::{Point, Rect};

#[derive(Debug, Clone)]
pub struct OutputInfo {
    /// Compositor-provided name when available (wlroots often has this).
    pub name: Option<String>,

    /// Logical position in the global desktop space.
    pub x: i32,
    pub y: i32,

    /// Logical size (not physical pixels).
    pub width: i32,
    pub height: i32,

    /// Scale factor (e.g. 1, 2). Keep as i32 for simplicity.
    pub scale: i32,
}

impl OutputInfo {
    /// Placement of this output in overlay-local coordinates.
    pub fn local_rect(&self, origin: Point) -> Rect {
        Rect::from_size(self.x - origin.x, self.y - origin.y, self.width, self.height)
    }
}

/// Bounding box of every output in global coordinates.
pub fn virtual_desktop(outputs: &[OutputInfo]) -> Option<Rect> {
    Rect::union_all(
        outputs
            .iter()
            .filter(|o| o.width > 0 && o.height > 0)
            .map(|o| Rect::from_size(o.x, o.y, o.width, o.height)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn out(x: i32, y: i32, w: i32, h: i32) -> OutputInfo {
        OutputInfo {
            name: None,
            x,
            y,
            width: w,
            height: h,
            scale: 1,
        }
    }

    #[test]
    fn desktop_spans_all_outputs() {
        let outputs = [out(-1920, 200, 1920, 1080), out(0, 0, 2560, 1440)];
        let vd = virtual_desktop(&outputs).unwrap();
        assert_eq!(vd, Rect::new(-1920, 0, 2560, 1440));
        assert_eq!(outputs[1].local_rect(vd.top_left()), Rect::new(1920, 0, 4480, 1440));
    }

    #[test]
    fn no_usable_outputs() {
        assert_eq!(virtual_desktop(&[]), None);
        assert_eq!(virtual_desktop(&[out(0, 0, 0, 0)]), None);
    }
}
