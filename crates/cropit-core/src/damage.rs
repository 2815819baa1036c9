// Author: Dustin Pilgrim
// License: MIT

use crate::label::label_box;
use crate::rect::Rect;
use crate::surface::TextMeasure;
use crate::tuning::Tuning;

/// Area covered by a selection's border, handles and label.
pub fn selection_footprint<M>(selection: &Rect, visible: &Rect, measure: &M, tuning: &Tuning) -> Rect
where
    M: TextMeasure + ?Sized,
{
    let s = selection.normalize();
    s.inflate(tuning.chrome_margin)
        .union(label_box(&s, visible, measure, tuning))
}

/// Region to repaint when the selection changes from `old` to `new`,
/// clipped to `visible`. `None` when nothing visible changed.
pub fn dirty_region<M>(
    old: Option<&Rect>,
    new: Option<&Rect>,
    visible: &Rect,
    measure: &M,
    tuning: &Tuning,
) -> Option<Rect>
where
    M: TextMeasure + ?Sized,
{
    let parts = [old, new]
        .into_iter()
        .flatten()
        .map(|s| selection_footprint(s, visible, measure, tuning));

    Rect::union_all(parts)?.intersect(*visible)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rect::Size;

    struct Mono;

    impl TextMeasure for Mono {
        fn measure_text(&self, text: &str) -> Size {
            Size {
                w: text.len() as i32 * 8,
                h: 16,
            }
        }
    }

    #[test]
    fn union_of_both_footprints() {
        let t = Tuning::default();
        let visible = Rect::new(0, 0, 1000, 800);
        let old = Rect::new(100, 100, 200, 200);
        let new = Rect::new(300, 300, 400, 350);
        let d = dirty_region(Some(&old), Some(&new), &visible, &Mono, &t).unwrap();

        assert!(d.contains_rect(&old.inflate(40)));
        assert!(d.contains_rect(&new.inflate(40)));
        assert!(d.contains_rect(&label_box(&old, &visible, &Mono, &t)));
        assert!(d.contains_rect(&label_box(&new, &visible, &Mono, &t)));
    }

    #[test]
    fn clipped_to_visible() {
        let t = Tuning::default();
        let visible = Rect::new(0, 0, 300, 200);
        let sel = Rect::new(0, 0, 50, 50);
        let d = dirty_region(None, Some(&sel), &visible, &Mono, &t).unwrap();
        assert_eq!(d.left, 0);
        assert_eq!(d.top, 0);
        assert!(visible.contains_rect(&d));
    }

    #[test]
    fn nothing_to_repaint() {
        let t = Tuning::default();
        let visible = Rect::new(0, 0, 300, 200);
        assert_eq!(dirty_region(None, None, &visible, &Mono, &t), None);
    }

    #[test]
    fn label_outside_the_inflated_area_is_included() {
        let t = Tuning {
            chrome_margin: 4,
            ..Tuning::default()
        };
        let visible = Rect::new(0, 0, 1000, 800);
        let sel = Rect::new(500, 400, 600, 500);
        let label = label_box(&sel, &visible, &Mono, &t);
        assert!(!sel.inflate(4).contains_rect(&label));
        let d = dirty_region(None, Some(&sel), &visible, &Mono, &t).unwrap();
        assert!(d.contains_rect(&label));
    }
}
