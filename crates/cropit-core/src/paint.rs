// Author: Dustin Pilgrim
// License: MIT

use crate::handle::Handle;
use crate::label::{dimensions_text, label_size, place_label};
use crate::raster::Raster;
use crate::rect::Rect;
use crate::surface::{Stroke, StrokePattern, Surface};
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    /// Dim mask opacity, 0..=255 (higher = darker).
    pub overlay_alpha: u8,
    pub border_colour: u32,
    pub border_width: i32,
    pub handle_outline_width: i32,
    pub handle_fill: u32,
    pub label_background: u32,
    pub label_text: u32,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            overlay_alpha: 100,
            border_colour: 0xFFFF_FFFF,
            border_width: 2,
            handle_outline_width: 1,
            handle_fill: 0xFF00_0000,
            label_background: 0xFF00_0000,
            label_text: 0xFFF0_F0F0,
        }
    }
}

const DIM_COLOUR: u32 = 0xFF00_0000;

/// Composite the whole scene onto `surface`: snapshot, dim mask, then the
/// selection's restored pixels, dotted border, handles and size label.
pub fn compose_scene<S>(
    surface: &mut S,
    raster: &Raster,
    visible: &Rect,
    selection: Option<&Rect>,
    style: &Style,
    tuning: &Tuning,
) where
    S: Surface + ?Sized,
{
    surface.blit(raster, *visible, visible.top_left());
    surface.alpha_blend(DIM_COLOUR, style.overlay_alpha, *visible);

    let Some(sel) = selection else {
        return;
    };
    let s = sel.normalize();

    if !s.is_empty() {
        surface.blit(raster, s, s.top_left());
    }

    surface.stroke_rect(
        s,
        Stroke {
            colour: style.border_colour,
            width: style.border_width,
            pattern: StrokePattern::Dotted,
        },
    );

    draw_handles(surface, &s, style, tuning);
    draw_label(surface, &s, visible, style, tuning);
}

fn draw_handles<S>(surface: &mut S, s: &Rect, style: &Style, tuning: &Tuning)
where
    S: Surface + ?Sized,
{
    let outline = Stroke {
        colour: style.border_colour,
        width: style.handle_outline_width,
        pattern: StrokePattern::Solid,
    };

    for h in Handle::ALL {
        let b = h.hit_box(s, tuning.handle_half);
        surface.fill_rect(b, style.handle_fill);
        surface.stroke_rect(b, outline);
    }
}

fn draw_label<S>(surface: &mut S, s: &Rect, visible: &Rect, style: &Style, tuning: &Tuning)
where
    S: Surface + ?Sized,
{
    let text = dimensions_text(s);
    let size = label_size(surface.measure_text(&text), tuning);
    let b = place_label(s, visible, size, tuning);

    surface.fill_rect(b, style.label_background);

    let inner = Rect::new(
        b.left + tuning.label_pad_x,
        b.top + tuning.label_pad_y,
        b.right - tuning.label_pad_x,
        b.bottom - tuning.label_pad_y,
    );
    surface.draw_text(&text, inner, style.label_text);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rect::{Point, Size};
    use crate::surface::TextMeasure;

    #[derive(Debug, PartialEq)]
    enum Op {
        Blit(Rect, Point),
        Blend(u8, Rect),
        Stroke(Rect, StrokePattern),
        Fill(Rect),
        Text(String, Rect),
    }

    #[derive(Default)]
    struct Recorder(Vec<Op>);

    impl TextMeasure for Recorder {
        fn measure_text(&self, text: &str) -> Size {
            Size {
                w: text.len() as i32 * 8,
                h: 16,
            }
        }
    }

    impl Surface for Recorder {
        fn blit(&mut self, _raster: &Raster, src: Rect, dst: Point) {
            self.0.push(Op::Blit(src, dst));
        }
        fn alpha_blend(&mut self, _colour: u32, opacity: u8, dst: Rect) {
            self.0.push(Op::Blend(opacity, dst));
        }
        fn stroke_rect(&mut self, rect: Rect, stroke: Stroke) {
            self.0.push(Op::Stroke(rect, stroke.pattern));
        }
        fn fill_rect(&mut self, rect: Rect, _colour: u32) {
            self.0.push(Op::Fill(rect));
        }
        fn draw_text(&mut self, text: &str, rect: Rect, _colour: u32) {
            self.0.push(Op::Text(text.to_string(), rect));
        }
    }

    fn raster() -> Raster {
        Raster::new(400, 300, Point::default(), vec![0xFF10_2030; 400 * 300]).unwrap()
    }

    #[test]
    fn no_selection_is_just_dimmed_snapshot() {
        let mut rec = Recorder::default();
        let visible = Rect::new(0, 0, 400, 300);
        compose_scene(&mut rec, &raster(), &visible, None, &Style::default(), &Tuning::default());
        assert_eq!(
            rec.0,
            vec![
                Op::Blit(visible, Point::new(0, 0)),
                Op::Blend(100, visible),
            ]
        );
    }

    #[test]
    fn selection_layers_in_order() {
        let mut rec = Recorder::default();
        let visible = Rect::new(0, 0, 400, 300);
        let sel = Rect::new(200, 150, 100, 100);
        compose_scene(
            &mut rec,
            &raster(),
            &visible,
            Some(&sel),
            &Style::default(),
            &Tuning::default(),
        );

        let s = Rect::new(100, 100, 200, 150);
        assert_eq!(rec.0[2], Op::Blit(s, Point::new(100, 100)));
        assert_eq!(rec.0[3], Op::Stroke(s, StrokePattern::Dotted));
        // 8 handles: fill + outline each.
        let handles = &rec.0[4..20];
        assert_eq!(handles.len(), 16);
        assert!(matches!(handles[0], Op::Fill(_)));
        assert!(matches!(handles[1], Op::Stroke(_, StrokePattern::Solid)));
        match &rec.0[21] {
            Op::Text(t, _) => assert_eq!(t, "100x50"),
            other => panic!("expected label text, got {other:?}"),
        }
        assert_eq!(rec.0.len(), 22);
    }

    #[test]
    fn zero_width_flip_frame_skips_restore_blit() {
        let mut rec = Recorder::default();
        let visible = Rect::new(0, 0, 400, 300);
        let sel = Rect::new(100, 100, 100, 200);
        compose_scene(
            &mut rec,
            &raster(),
            &visible,
            Some(&sel),
            &Style::default(),
            &Tuning::default(),
        );
        assert!(matches!(rec.0[2], Op::Stroke(_, StrokePattern::Dotted)));
    }
}
