// Author: Dustin Pilgrim
// License: MIT
//
// Software drawing surface: one ARGB8888 back buffer the size of the whole
// overlay. Scenes are composed here, then the dirty part is copied out to the
// per-output SHM buffers.

use cropit_core::{Point, Raster, Rect, Size, Surface, TextMeasure};
use cropit_core::surface::{Stroke, StrokePattern};

use super::font;

#[derive(Debug, Default)]
pub struct BackBuffer {
    width: i32,
    height: i32,
    pixels: Vec<u32>,
}

impl BackBuffer {
    /// Reallocates only when the size actually changes; returns whether it did.
    pub fn ensure_size(&mut self, width: i32, height: i32) -> bool {
        let (width, height) = (width.max(0), height.max(0));
        if self.width == width && self.height == height && !self.pixels.is_empty() {
            return false;
        }
        self.width = width;
        self.height = height;
        self.pixels = vec![0xFF00_0000; (width as usize) * (height as usize)];
        true
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_size(0, 0, self.width, self.height)
    }

    /// Pixels `[left, right)` of row `y`. Caller keeps the span inside bounds.
    pub fn span(&self, y: i32, left: i32, right: i32) -> &[u32] {
        let start = (y * self.width) as usize;
        &self.pixels[start + left as usize..start + right as usize]
    }

    #[cfg(test)]
    pub fn pixel(&self, x: i32, y: i32) -> u32 {
        self.pixels[(y * self.width + x) as usize]
    }

    fn clip(&self, r: Rect) -> Option<Rect> {
        r.normalize().intersect(self.bounds())
    }

    fn fill(&mut self, r: Rect, argb: u32) {
        let Some(r) = self.clip(r) else {
            return;
        };
        let bw = self.width as usize;
        for y in r.top..r.bottom {
            let row = y as usize * bw;
            self.pixels[row + r.left as usize..row + r.right as usize].fill(argb);
        }
    }

    // Dotted strips alternate `dash`-long runs along their long axis.
    fn fill_dotted(&mut self, r: Rect, argb: u32, dash: i32, horizontal: bool) {
        let Some(r) = self.clip(r) else {
            return;
        };
        let bw = self.width as usize;
        for y in r.top..r.bottom {
            for x in r.left..r.right {
                let t = if horizontal { x } else { y };
                if t.div_euclid(dash) % 2 == 0 {
                    self.pixels[y as usize * bw + x as usize] = argb;
                }
            }
        }
    }
}

fn blend_channel(src: u32, dst: u32, a: u32) -> u32 {
    (src * a + dst * (255 - a) + 127) / 255
}

fn blend(src: u32, dst: u32, a: u32) -> u32 {
    let ch = |shift: u32| blend_channel((src >> shift) & 0xFF, (dst >> shift) & 0xFF, a) << shift;
    0xFF00_0000 | ch(16) | ch(8) | ch(0)
}

impl TextMeasure for BackBuffer {
    fn measure_text(&self, text: &str) -> Size {
        font::measure(text)
    }
}

impl Surface for BackBuffer {
    fn blit(&mut self, raster: &Raster, src: Rect, dst: Point) {
        let src = src.normalize();
        let (dx, dy) = (dst.x - src.left, dst.y - src.top);

        let Some(s) = src.intersect(raster.bounds()) else {
            return;
        };
        let Some(d) = self.clip(s.offset(dx, dy)) else {
            return;
        };

        let bw = self.width as usize;
        for y in d.top..d.bottom {
            let Some(row) = raster.row(y - dy) else {
                continue;
            };
            let from = &row[(d.left - dx) as usize..(d.right - dx) as usize];
            let at = y as usize * bw;
            self.pixels[at + d.left as usize..at + d.right as usize].copy_from_slice(from);
        }
    }

    fn alpha_blend(&mut self, colour: u32, opacity: u8, dst: Rect) {
        let Some(r) = self.clip(dst) else {
            return;
        };
        let a = opacity as u32;
        let bw = self.width as usize;
        for y in r.top..r.bottom {
            let row = y as usize * bw;
            for px in &mut self.pixels[row + r.left as usize..row + r.right as usize] {
                *px = blend(colour, *px, a);
            }
        }
    }

    fn stroke_rect(&mut self, rect: Rect, stroke: Stroke) {
        let w = stroke.width.max(1);
        let o = rect.normalize().inflate(w / 2);

        let strips = [
            (Rect::new(o.left, o.top, o.right, o.top + w), true),
            (Rect::new(o.left, o.bottom - w, o.right, o.bottom), true),
            (Rect::new(o.left, o.top, o.left + w, o.bottom), false),
            (Rect::new(o.right - w, o.top, o.right, o.bottom), false),
        ];

        for (strip, horizontal) in strips {
            match stroke.pattern {
                StrokePattern::Solid => self.fill(strip, stroke.colour),
                StrokePattern::Dotted => self.fill_dotted(strip, stroke.colour, w, horizontal),
            }
        }
    }

    fn fill_rect(&mut self, rect: Rect, colour: u32) {
        self.fill(rect, colour);
    }

    fn draw_text(&mut self, text: &str, rect: Rect, colour: u32) {
        let Some(clip) = self.clip(rect) else {
            return;
        };
        let bw = self.width as usize;
        let pixels = &mut self.pixels;
        font::for_each_pixel(text, rect.left, rect.top, |x, y| {
            if clip.contains(Point::new(x, y)) {
                pixels[y as usize * bw + x as usize] = colour;
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cropit_core::damage::dirty_region;
    use cropit_core::{compose_scene, Style, Tuning};

    fn gradient(w: i32, h: i32) -> Raster {
        let px = (0..h)
            .flat_map(|y| (0..w).map(move |x| 0xFF00_0000 | ((x as u32 % 251) << 16) | ((y as u32 % 241) << 8) | 0x40))
            .collect();
        Raster::new(w, h, Point::default(), px).unwrap()
    }

    fn buffer(w: i32, h: i32) -> BackBuffer {
        let mut b = BackBuffer::default();
        b.ensure_size(w, h);
        b
    }

    #[test]
    fn reallocates_only_on_size_change() {
        let mut b = BackBuffer::default();
        assert!(b.ensure_size(10, 10));
        assert!(!b.ensure_size(10, 10));
        assert!(b.ensure_size(20, 10));
        assert_eq!(b.bounds(), Rect::new(0, 0, 20, 10));
    }

    #[test]
    fn blit_clips_both_sides() {
        let r = gradient(50, 50);
        let mut b = buffer(30, 30);
        b.blit(&r, Rect::new(-10, 40, 20, 70), Point::new(25, 0));

        // What survives raster clipping lands right of the buffer.
        assert!((0..30).all(|x| b.pixel(x, 0) == 0xFF00_0000));

        let mut b = buffer(30, 30);
        b.blit(&r, Rect::new(5, 5, 25, 25), Point::new(20, 20));
        assert_eq!(b.pixel(20, 20), r.pixel(5, 5).unwrap());
        assert_eq!(b.pixel(29, 29), r.pixel(14, 14).unwrap());
        assert_eq!(b.pixel(19, 19), 0xFF00_0000);
    }

    #[test]
    fn dim_blend() {
        assert_eq!(blend(0xFF00_0000, 0xFFFF_FFFF, 100), 0xFF9B_9B9B);
        assert_eq!(blend(0xFF00_0000, 0xFF12_3456, 0), 0xFF12_3456);
        assert_eq!(blend(0xFFAB_CDEF, 0xFF00_0000, 255), 0xFFAB_CDEF);
    }

    #[test]
    fn strokes_stay_inside_their_inflated_rect() {
        for (width, pattern) in [
            (1, StrokePattern::Solid),
            (2, StrokePattern::Dotted),
            (3, StrokePattern::Solid),
        ] {
            for rect in [Rect::new(20, 20, 60, 40), Rect::new(30, 30, 30, 50), Rect::new(0, 0, 99, 99)] {
                let mut b = buffer(100, 100);
                b.stroke_rect(rect, Stroke { colour: 0xFFFF_FFFF, width, pattern });
                let allowed = rect.inflate(width);
                for y in 0..100 {
                    for x in 0..100 {
                        if b.pixel(x, y) != 0xFF00_0000 {
                            assert!(allowed.contains(Point::new(x, y)), "{rect:?} w={width} ({x},{y})");
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn text_is_clipped_to_its_rect() {
        let mut b = buffer(100, 40);
        let rect = Rect::new(10, 10, 30, 20);
        b.draw_text("8888", rect, 0xFFFF_FFFF);
        let mut lit = 0;
        for y in 0..40 {
            for x in 0..100 {
                if b.pixel(x, y) != 0xFF00_0000 {
                    lit += 1;
                    assert!(rect.contains(Point::new(x, y)));
                }
            }
        }
        assert!(lit > 0);
    }

    // Every pixel that differs between two composed frames lies inside the
    // damage computed for that selection change.
    #[test]
    fn dirty_region_covers_every_changed_pixel() {
        let (w, h) = (320, 240);
        let raster = gradient(w, h);
        let visible = Rect::new(0, 0, w, h);
        let style = Style::default();
        let tuning = Tuning::default();

        let sels = [
            None,
            Some(Rect::new(0, 0, 80, 40)),
            Some(Rect::new(100, 100, 180, 160)),
            Some(Rect::new(300, 220, 320, 240)),
            Some(Rect::new(150, 20, 150, 90)),
            Some(Rect::new(60, 200, 10, 120)),
        ];

        for old in &sels {
            for new in &sels {
                let mut a = buffer(w, h);
                let mut b = buffer(w, h);
                compose_scene(&mut a, &raster, &visible, old.as_ref(), &style, &tuning);
                compose_scene(&mut b, &raster, &visible, new.as_ref(), &style, &tuning);

                let dirty = dirty_region(old.as_ref(), new.as_ref(), &visible, &a, &tuning);
                for y in 0..h {
                    for x in 0..w {
                        if a.pixel(x, y) != b.pixel(x, y) {
                            let d = dirty.unwrap_or_else(|| panic!("{old:?} -> {new:?}: no damage"));
                            assert!(d.contains(Point::new(x, y)), "{old:?} -> {new:?} missed ({x},{y})");
                        }
                    }
                }
            }
        }
    }
}
