// Author: Dustin Pilgrim
// License: MIT
//
// One overlay invocation. Owns the selection and the gesture state; every
// host effect (repaint, cursor, pointer grab) goes through the `Shell`.
//
// - LMB on a handle: resize (anchor + flip)
// - LMB inside the selection: move
// - LMB elsewhere: draw a new selection
// - LMB release: ends the gesture, selection stays
// - ESC / RMB: cancel
// - Confirm (Enter, Ctrl+C): commit when the selection has area

use crate::damage::dirty_region;
use crate::handle::{hit_test, hover_cursor, CursorShape, Handle};
use crate::rect::{Point, Rect};
use crate::resize::resize_from_handle;
use crate::surface::Shell;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Idle,
    Drawing,
    Resizing,
    Moving,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Primary,
    Secondary,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Confirm,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    PointerDown { pos: Point, button: Button },
    PointerMove { pos: Point },
    PointerUp { pos: Point, button: Button },
    Key(Key),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Cancelled,
    /// Normalized selection, overlay-local coordinates.
    Commit(Rect),
}

#[derive(Debug)]
pub struct Session {
    bounds: Rect,
    tuning: Tuning,

    mode: Mode,
    selection: Option<Rect>,

    drag_start: Point,
    active_handle: Option<Handle>,
    anchor: Rect,
    move_offset: Point,

    cursor: CursorShape,
    pointer_captured: bool,
    finished: bool,
}

impl Session {
    pub fn new(bounds: Rect, tuning: Tuning) -> Self {
        Self {
            bounds: bounds.normalize(),
            tuning,
            mode: Mode::Idle,
            selection: None,
            drag_start: Point::default(),
            active_handle: None,
            anchor: Rect::default(),
            move_offset: Point::default(),
            cursor: CursorShape::Crosshair,
            pointer_captured: false,
            finished: false,
        }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn selection(&self) -> Option<Rect> {
        self.selection
    }

    pub fn active_handle(&self) -> Option<Handle> {
        self.active_handle
    }

    pub fn anchor(&self) -> Rect {
        self.anchor
    }

    pub fn cursor(&self) -> CursorShape {
        self.cursor
    }

    pub fn is_pointer_captured(&self) -> bool {
        self.pointer_captured
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Feed one host event. Returns `Some` when the session ends.
    pub fn handle<S>(&mut self, input: Input, shell: &mut S) -> Option<Outcome>
    where
        S: Shell + ?Sized,
    {
        if self.finished {
            return None;
        }

        match input {
            Input::PointerDown {
                pos,
                button: Button::Primary,
            } => {
                self.press(pos, shell);
                None
            }
            Input::PointerDown {
                button: Button::Secondary,
                ..
            } => Some(self.cancel(shell)),
            Input::PointerDown { .. } => None,

            Input::PointerMove { pos } => {
                self.motion(pos, shell);
                None
            }

            Input::PointerUp {
                pos,
                button: Button::Primary,
            } => {
                self.release(pos, shell);
                None
            }
            Input::PointerUp { .. } => None,

            Input::Key(Key::Escape) => Some(self.cancel(shell)),
            Input::Key(Key::Confirm) => self.confirm(shell),
            Input::Key(Key::Other) => None,
        }
    }

    /// The visible area changed size.
    pub fn resize_bounds<S>(&mut self, width: i32, height: i32, shell: &mut S)
    where
        S: Shell + ?Sized,
    {
        self.bounds = Rect::from_size(self.bounds.left, self.bounds.top, width.max(0), height.max(0));
        if let Some(sel) = self.selection {
            self.selection = Some(sel.normalize().clamp_to(&self.bounds));
        }
        shell.invalidate(self.bounds);
    }

    fn press<S>(&mut self, pos: Point, shell: &mut S)
    where
        S: Shell + ?Sized,
    {
        if self.mode != Mode::Idle {
            return;
        }

        shell.capture_pointer();
        self.pointer_captured = true;

        if let Some(sel) = self.selection.map(Rect::normalize) {
            if let Some(h) = hit_test(pos, &sel, &self.tuning) {
                self.mode = Mode::Resizing;
                self.active_handle = Some(h);
                self.anchor = sel;
                self.set_cursor(h.cursor(), shell);
                return;
            }

            if sel.contains(pos) {
                self.mode = Mode::Moving;
                self.move_offset = Point::new(pos.x - sel.left, pos.y - sel.top);
                self.set_cursor(CursorShape::Move, shell);
                return;
            }
        }

        self.mode = Mode::Drawing;
        self.drag_start = pos;
        self.set_cursor(CursorShape::Crosshair, shell);
        self.set_selection(Rect::new(pos.x, pos.y, pos.x, pos.y).clamp_to(&self.bounds), shell);
    }

    fn motion<S>(&mut self, pos: Point, shell: &mut S)
    where
        S: Shell + ?Sized,
    {
        match self.mode {
            Mode::Idle => {
                let c = hover_cursor(pos, self.selection.as_ref(), &self.tuning);
                self.set_cursor(c, shell);
            }

            Mode::Drawing => {
                let r = Rect::from_points(self.drag_start, pos).clamp_to(&self.bounds);
                self.set_selection(r, shell);
            }

            Mode::Resizing => {
                let Some(h) = self.active_handle else {
                    return;
                };
                let step = resize_from_handle(h, pos, &mut self.anchor, self.tuning.min_size);
                if step.handle != h {
                    self.active_handle = Some(step.handle);
                    self.set_cursor(step.handle.cursor(), shell);
                }
                self.set_selection(step.rect.clamp_to(&self.bounds), shell);
            }

            Mode::Moving => {
                let Some(sel) = self.selection.map(Rect::normalize) else {
                    return;
                };
                let (w, h) = (sel.width(), sel.height());
                let b = self.bounds;

                // Clamp the corner, not the pointer.
                let left = (pos.x - self.move_offset.x).min(b.right - w).max(b.left);
                let top = (pos.y - self.move_offset.y).min(b.bottom - h).max(b.top);

                self.set_selection(Rect::from_size(left, top, w, h), shell);
            }
        }
    }

    fn release<S>(&mut self, pos: Point, shell: &mut S)
    where
        S: Shell + ?Sized,
    {
        if self.mode == Mode::Drawing {
            self.motion(pos, shell);
        }

        self.mode = Mode::Idle;
        self.active_handle = None;
        self.release_capture(shell);

        let c = hover_cursor(pos, self.selection.as_ref(), &self.tuning);
        self.set_cursor(c, shell);
    }

    fn cancel<S>(&mut self, shell: &mut S) -> Outcome
    where
        S: Shell + ?Sized,
    {
        self.release_capture(shell);
        self.mode = Mode::Idle;
        self.active_handle = None;
        self.selection = None;
        self.finished = true;
        Outcome::Cancelled
    }

    fn confirm<S>(&mut self, shell: &mut S) -> Option<Outcome>
    where
        S: Shell + ?Sized,
    {
        let sel = self.selection?.normalize();
        if sel.is_empty() {
            return None;
        }

        self.release_capture(shell);
        self.mode = Mode::Idle;
        self.active_handle = None;
        self.finished = true;
        Some(Outcome::Commit(sel))
    }

    fn release_capture<S>(&mut self, shell: &mut S)
    where
        S: Shell + ?Sized,
    {
        if self.pointer_captured {
            self.pointer_captured = false;
            shell.release_pointer();
        }
    }

    fn set_cursor<S>(&mut self, cursor: CursorShape, shell: &mut S)
    where
        S: Shell + ?Sized,
    {
        if self.cursor != cursor {
            self.cursor = cursor;
            shell.set_cursor(cursor);
        }
    }

    fn set_selection<S>(&mut self, new: Rect, shell: &mut S)
    where
        S: Shell + ?Sized,
    {
        let old = self.selection.replace(new);
        if old == Some(new) {
            return;
        }

        if let Some(area) = dirty_region(old.as_ref(), Some(&new), &self.bounds, &*shell, &self.tuning) {
            shell.invalidate(area);
        }
    }
}
