// Author: Dustin Pilgrim
// License: MIT

use cropit_core::{CursorShape, Rect, Shell, Size, TextMeasure};

use super::font;

/// What the session asked of the host while handling one event. Applied by
/// the app once the session call returns.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FrameEffects {
    pub damage: Option<Rect>,
    pub cursor: Option<CursorShape>,
    /// Last grab request: `Some(true)` capture, `Some(false)` release.
    pub grab: Option<bool>,
}

impl FrameEffects {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl TextMeasure for FrameEffects {
    fn measure_text(&self, text: &str) -> Size {
        font::measure(text)
    }
}

impl Shell for FrameEffects {
    fn invalidate(&mut self, area: Rect) {
        self.damage = Some(match self.damage {
            Some(d) => d.union(area),
            None => area,
        });
    }

    fn set_cursor(&mut self, cursor: CursorShape) {
        self.cursor = Some(cursor);
    }

    fn capture_pointer(&mut self) {
        self.grab = Some(true);
    }

    fn release_pointer(&mut self) {
        self.grab = Some(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cropit_core::{Button, Input, Point, Session, Tuning};

    #[test]
    fn damage_accumulates() {
        let mut fx = FrameEffects::default();
        fx.invalidate(Rect::new(0, 0, 10, 10));
        fx.invalidate(Rect::new(20, 5, 30, 40));
        assert_eq!(fx.damage, Some(Rect::new(0, 0, 30, 40)));
    }

    #[test]
    fn press_through_session() {
        let mut s = Session::new(Rect::new(0, 0, 400, 300), Tuning::default());
        let mut fx = FrameEffects::default();
        s.handle(
            Input::PointerDown {
                pos: Point::new(50, 50),
                button: Button::Primary,
            },
            &mut fx,
        );
        assert_eq!(fx.grab, Some(true));
        assert!(fx.damage.is_some());
        assert!(!fx.is_empty());
    }
}
