// Author: Dustin Pilgrim
// License: MIT

use image::{Rgba, RgbaImage};

use crate::rect::{Point, Rect};

/// Immutable desktop snapshot, row-major opaque `0xFFRRGGBB`.
#[derive(Debug, Clone)]
pub struct Raster {
    width: i32,
    height: i32,
    /// Virtual-desktop position of pixel (0,0).
    origin: Point,
    pixels: Vec<u32>,
}

impl Raster {
    /// `None` when `pixels` does not hold exactly `width * height` entries.
    pub fn new(width: i32, height: i32, origin: Point, pixels: Vec<u32>) -> Option<Self> {
        if width < 0 || height < 0 || pixels.len() != (width as usize) * (height as usize) {
            return None;
        }
        Some(Self {
            width,
            height,
            origin,
            pixels,
        })
    }

    pub fn from_rgba(img: &RgbaImage, origin: Point) -> Self {
        let pixels = img
            .pixels()
            .map(|Rgba([r, g, b, _])| 0xFF00_0000 | (*r as u32) << 16 | (*g as u32) << 8 | *b as u32)
            .collect();

        Self {
            width: img.width() as i32,
            height: img.height() as i32,
            origin,
            pixels,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_size(0, 0, self.width, self.height)
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<u32> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[(y * self.width + x) as usize])
    }

    /// One row of pixels, `None` when out of range.
    pub fn row(&self, y: i32) -> Option<&[u32]> {
        if y < 0 || y >= self.height {
            return None;
        }
        let start = (y * self.width) as usize;
        Some(&self.pixels[start..start + self.width as usize])
    }

    /// Copy of the pixels under `rect`, clipped to the raster.
    pub fn crop(&self, rect: Rect) -> Option<Raster> {
        let r = rect.normalize().intersect(self.bounds())?;
        let mut pixels = Vec::with_capacity((r.width() * r.height()) as usize);
        for y in r.top..r.bottom {
            let row = self.row(y)?;
            pixels.extend_from_slice(&row[r.left as usize..r.right as usize]);
        }

        Some(Raster {
            width: r.width(),
            height: r.height(),
            origin: Point::new(self.origin.x + r.left, self.origin.y + r.top),
            pixels,
        })
    }

    pub fn to_rgba8(&self) -> RgbaImage {
        let mut img = RgbaImage::new(self.width as u32, self.height as u32);
        for (dst, &argb) in img.pixels_mut().zip(self.pixels.iter()) {
            *dst = Rgba([(argb >> 16) as u8, (argb >> 8) as u8, argb as u8, 0xFF]);
        }
        img
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(w: i32, h: i32) -> Raster {
        let mut px = Vec::new();
        for y in 0..h {
            for x in 0..w {
                px.push(0xFF00_0000 | ((x as u32 & 0xFF) << 16) | ((y as u32 & 0xFF) << 8));
            }
        }
        Raster::new(w, h, Point::new(-1920, 0), px).unwrap()
    }

    #[test]
    fn crop_copies_exact_sub_raster() {
        let r = gradient(400, 300);
        let c = r.crop(Rect::new(100, 100, 300, 200)).unwrap();
        assert_eq!((c.width(), c.height()), (200, 100));
        assert_eq!(c.origin(), Point::new(-1820, 100));
        for y in 0..100 {
            for x in 0..200 {
                assert_eq!(c.pixel(x, y), r.pixel(x + 100, y + 100));
            }
        }
    }

    #[test]
    fn crop_clips_and_rejects_empty() {
        let r = gradient(50, 50);
        let c = r.crop(Rect::new(40, -10, 80, 10)).unwrap();
        assert_eq!((c.width(), c.height()), (10, 10));
        assert!(r.crop(Rect::new(10, 10, 10, 40)).is_none());
        assert!(r.crop(Rect::new(60, 60, 90, 90)).is_none());
    }

    #[test]
    fn rgba_conversion_keeps_channels() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([1, 2, 3, 4]));
        img.put_pixel(1, 0, Rgba([250, 128, 0, 255]));
        let r = Raster::from_rgba(&img, Point::default());
        assert_eq!(r.pixel(0, 0), Some(0xFF01_0203));
        assert_eq!(r.pixel(1, 0), Some(0xFFFA_8000));
        let back = r.to_rgba8();
        assert_eq!(back.get_pixel(1, 0), &Rgba([250, 128, 0, 255]));
        assert_eq!(back.get_pixel(0, 0), &Rgba([1, 2, 3, 255]));
    }

    #[test]
    fn new_rejects_mismatched_buffer() {
        assert!(Raster::new(2, 2, Point::default(), vec![0; 3]).is_none());
    }
}
