// Author: Dustin Pilgrim
// License: MIT
//
// Capability interfaces the engine calls through. The overlay host implements
// them; tests implement small recording fakes.

use crate::error::CropitError;
use crate::handle::CursorShape;
use crate::raster::Raster;
use crate::rect::{Point, Rect, Size};

pub trait TextMeasure {
    fn measure_text(&self, text: &str) -> Size;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokePattern {
    Solid,
    Dotted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stroke {
    /// ARGB
    pub colour: u32,
    pub width: i32,
    pub pattern: StrokePattern,
}

/// Drawing backend for the composited scene. Colours are `0xAARRGGBB`.
pub trait Surface: TextMeasure {
    /// Copy `src` (raster coordinates) so its top-left lands on `dst`.
    fn blit(&mut self, raster: &Raster, src: Rect, dst: Point);

    /// Blend a solid colour over `dst` at the given opacity.
    fn alpha_blend(&mut self, colour: u32, opacity: u8, dst: Rect);

    /// Outline centred on the rectangle's edges; never paints outside
    /// `rect.inflate(stroke.width)`.
    fn stroke_rect(&mut self, rect: Rect, stroke: Stroke);

    fn fill_rect(&mut self, rect: Rect, colour: u32);

    fn draw_text(&mut self, text: &str, rect: Rect, colour: u32);
}

/// Host-side effects requested by the session while it handles an event.
pub trait Shell: TextMeasure {
    fn invalidate(&mut self, area: Rect);
    fn set_cursor(&mut self, cursor: CursorShape);
    fn capture_pointer(&mut self);
    fn release_pointer(&mut self);
}

pub trait CaptureProvider {
    /// Grab the whole virtual desktop.
    fn capture_desktop(&mut self) -> Result<Raster, CropitError>;
}

pub trait OutputSink {
    /// Persist the pixels of `rect` (raster coordinates).
    fn commit(&mut self, raster: &Raster, rect: Rect) -> Result<(), CropitError>;
}
