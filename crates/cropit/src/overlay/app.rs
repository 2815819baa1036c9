// Author: Dustin Pilgrim
// License: MIT
//
// Wayland host for one selection session. Translates seat events into
// session inputs and applies the effects the session requests.

use cropit_core::{
    Button, CursorShape, Input, Key, OutputInfo, Outcome, Point, Raster, Rect, Session, Style,
    Tuning,
};

use smithay_client_toolkit::{
    output::{OutputHandler, OutputState},
    registry::{ProvidesRegistryState, RegistryState},
    registry_handlers,
};

use wayland_client::{
    protocol::{
        wl_buffer, wl_compositor, wl_keyboard, wl_output, wl_pointer, wl_seat, wl_shm, wl_shm_pool,
        wl_surface,
    },
    Connection, Dispatch, Proxy, QueueHandle, WEnum,
};

use wayland_cursor::CursorTheme;

use wayland_protocols_wlr::layer_shell::v1::client::{zwlr_layer_shell_v1, zwlr_layer_surface_v1};

use super::canvas::BackBuffer;
use super::shell::FrameEffects;
use super::surfaces::OutputSurface;

// linux/input-event-codes.h
const BTN_LEFT: u32 = 272;
const BTN_RIGHT: u32 = 273;
const KEY_ESC: u32 = 1;
const KEY_ENTER: u32 = 28;
const KEY_C: u32 = 46;
const KEY_KPENTER: u32 = 96;

// Control's bit in the xkb default modifier layout.
const MOD_CONTROL: u32 = 1 << 2;

pub struct App {
    // SCTK state
    pub registry_state: RegistryState,
    pub output_state: OutputState,

    pub outputs: Vec<OutputInfo>,
    /// Global position of overlay-local (0,0).
    pub origin: Point,

    // Wayland objects
    pub compositor: Option<wl_compositor::WlCompositor>,
    pub shm: Option<wl_shm::WlShm>,
    pub seat: Option<wl_seat::WlSeat>,
    pub layer_shell: Option<zwlr_layer_shell_v1::ZwlrLayerShellV1>,

    pub output_surfaces: Vec<OutputSurface>,
    pub surfaces_created: bool,

    pub pointer: Option<wl_pointer::WlPointer>,
    pub keyboard: Option<wl_keyboard::WlKeyboard>,

    /// Surface the pointer is reported against.
    pub pointer_output: Option<usize>,
    /// While set, `pointer_output` is not switched by Enter/Leave.
    pub pointer_locked: bool,
    pub pointer_serial: u32,
    /// Last known position, overlay-local.
    pub pointer_pos: Point,

    pub cursor_surface: Option<wl_surface::WlSurface>,
    pub cursor_theme: Option<CursorTheme>,
    pub cursor_shape: CursorShape,

    pub ctrl_down: bool,

    // Session
    pub session: Session,
    pub raster: Raster,
    pub style: Style,
    pub back: BackBuffer,

    pub outcome: Option<Outcome>,
}

impl App {
    pub fn new(
        registry_state: RegistryState,
        output_state: OutputState,
        outputs: Vec<OutputInfo>,
        desktop: Rect,
        raster: Raster,
        tuning: Tuning,
        style: Style,
    ) -> Self {
        let bounds = Rect::from_size(0, 0, desktop.width(), desktop.height());

        Self {
            registry_state,
            output_state,
            outputs,
            origin: desktop.top_left(),

            compositor: None,
            shm: None,
            seat: None,
            layer_shell: None,

            output_surfaces: Vec::new(),
            surfaces_created: false,

            pointer: None,
            keyboard: None,
            pointer_output: None,
            pointer_locked: false,
            pointer_serial: 0,
            pointer_pos: Point::default(),

            cursor_surface: None,
            cursor_theme: None,
            cursor_shape: CursorShape::Crosshair,

            ctrl_down: false,

            session: Session::new(bounds, tuning),
            raster,
            style,
            back: BackBuffer::default(),

            outcome: None,
        }
    }

    pub fn init_cursor(&mut self, conn: &Connection, qh: &QueueHandle<Self>) -> Result<(), String> {
        if self.cursor_theme.is_some() {
            return Ok(());
        }
        let compositor = self.compositor.as_ref().ok_or("no compositor")?;
        let shm = self.shm.as_ref().ok_or("no shm")?;

        let theme = CursorTheme::load(conn, shm.clone(), 24)
            .map_err(|e| format!("cursor: load theme: {e:?}"))?;
        let surf = compositor.create_surface(qh, ());

        self.cursor_theme = Some(theme);
        self.cursor_surface = Some(surf);
        Ok(())
    }

    fn apply_cursor(&mut self) {
        let (Some(pointer), Some(theme), Some(surf)) = (
            self.pointer.as_ref(),
            self.cursor_theme.as_mut(),
            self.cursor_surface.as_ref(),
        ) else {
            return;
        };

        // Not every theme ships the CSS names.
        let names = [
            self.cursor_shape.theme_name(),
            legacy_cursor_name(self.cursor_shape),
            "left_ptr",
        ];
        let Some(name) = names.into_iter().find(|n| theme.get_cursor(n).is_some()) else {
            return;
        };
        let Some(cursor) = theme.get_cursor(name) else {
            return;
        };

        let img = &cursor[0];
        let (hx, hy) = img.hotspot();
        pointer.set_cursor(self.pointer_serial, Some(surf), hx as i32, hy as i32);

        surf.attach(Some(&**img), 0, 0);
        surf.commit();
    }

    /// Surface-local pointer position to overlay-local.
    fn to_local(&self, idx: usize, sx: f64, sy: f64) -> Option<Point> {
        let os = self.output_surfaces.get(idx)?;
        Some(Point::new(
            os.local.left + sx.floor() as i32,
            os.local.top + sy.floor() as i32,
        ))
    }

    fn pointer_moved(&mut self, pos: Point) {
        self.pointer_pos = pos;
        self.feed(Input::PointerMove { pos });
    }

    /// Feed one input to the session and carry out what it asked for.
    pub fn feed(&mut self, input: Input) {
        if self.outcome.is_some() {
            return;
        }

        let mut fx = FrameEffects::default();
        let outcome = self.session.handle(input, &mut fx);
        self.apply(fx);

        if let Some(o) = outcome {
            eventline::info!("session finished: {o:?}");
            self.outcome = Some(o);
        }
    }

    pub fn apply(&mut self, fx: FrameEffects) {
        if fx.is_empty() {
            return;
        }

        if let Some(grab) = fx.grab {
            self.pointer_locked = grab;
        }

        if let Some(shape) = fx.cursor {
            self.cursor_shape = shape;
            self.apply_cursor();
        }

        if let Some(area) = fx.damage {
            for os in &mut self.output_surfaces {
                os.add_damage(area);
            }
            self.request_redraw();
        }
    }

    /// Cancel without going through the session (compositor closed us).
    pub fn abort(&mut self) {
        if self.outcome.is_none() {
            eventline::warn!("overlay closed by compositor");
            self.outcome = Some(Outcome::Cancelled);
        }
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn request_redraw(&mut self) {
        if let Err(e) = super::render::redraw(self) {
            eventline::warn!("redraw failed: {e}");
        }
    }

    /// Keep the session's bounds equal to the union of configured outputs.
    fn sync_bounds(&mut self) {
        let Some(union) = Rect::union_all(self.output_surfaces.iter().map(|os| os.local)) else {
            return;
        };
        let b = self.session.bounds();
        if union.width() == b.width() && union.height() == b.height() {
            return;
        }

        eventline::debug!("overlay bounds {}x{} -> {}x{}", b.width(), b.height(), union.width(), union.height());
        let mut fx = FrameEffects::default();
        self.session.resize_bounds(union.width(), union.height(), &mut fx);
        self.apply(fx);
    }

}

fn key_input(key: u32, ctrl: bool) -> Key {
    match key {
        KEY_ESC => Key::Escape,
        KEY_ENTER | KEY_KPENTER => Key::Confirm,
        KEY_C if ctrl => Key::Confirm,
        _ => Key::Other,
    }
}

fn ctrl_held(mods_depressed: u32) -> bool {
    mods_depressed & MOD_CONTROL != 0
}

fn button_input(button: u32) -> Button {
    match button {
        BTN_LEFT => Button::Primary,
        BTN_RIGHT => Button::Secondary,
        _ => Button::Other,
    }
}

fn legacy_cursor_name(shape: CursorShape) -> &'static str {
    match shape {
        CursorShape::Crosshair => "cross",
        CursorShape::Move => "fleur",
        CursorShape::ResizeVertical => "sb_v_double_arrow",
        CursorShape::ResizeHorizontal => "sb_h_double_arrow",
        CursorShape::ResizeNwse => "bottom_right_corner",
        CursorShape::ResizeNesw => "bottom_left_corner",
    }
}

// SCTK trait implementations
impl ProvidesRegistryState for App {
    fn registry(&mut self) -> &mut RegistryState {
        &mut self.registry_state
    }
    registry_handlers![OutputState];
}

impl OutputHandler for App {
    fn output_state(&mut self) -> &mut OutputState {
        &mut self.output_state
    }

    fn new_output(&mut self, _conn: &Connection, qh: &QueueHandle<Self>, _output: wl_output::WlOutput) {
        if let Err(e) = super::surfaces::try_create_surfaces(self, qh) {
            eventline::warn!("create surfaces: {e}");
        }
    }

    fn update_output(&mut self, _conn: &Connection, _qh: &QueueHandle<Self>, _output: wl_output::WlOutput) {}

    fn output_destroyed(&mut self, _conn: &Connection, _qh: &QueueHandle<Self>, _output: wl_output::WlOutput) {}
}

// Dispatch implementations
impl Dispatch<wl_compositor::WlCompositor, ()> for App {
    fn event(_: &mut Self, _: &wl_compositor::WlCompositor, _: wl_compositor::Event, _: &(), _: &Connection, _: &QueueHandle<Self>) {}
}

impl Dispatch<wl_shm::WlShm, ()> for App {
    fn event(_: &mut Self, _: &wl_shm::WlShm, _: wl_shm::Event, _: &(), _: &Connection, _: &QueueHandle<Self>) {}
}

impl Dispatch<wl_shm_pool::WlShmPool, ()> for App {
    fn event(_: &mut Self, _: &wl_shm_pool::WlShmPool, _: wl_shm_pool::Event, _: &(), _: &Connection, _: &QueueHandle<Self>) {}
}

impl Dispatch<wl_surface::WlSurface, ()> for App {
    fn event(_: &mut Self, _: &wl_surface::WlSurface, _: wl_surface::Event, _: &(), _: &Connection, _: &QueueHandle<Self>) {}
}

impl Dispatch<zwlr_layer_shell_v1::ZwlrLayerShellV1, ()> for App {
    fn event(_: &mut Self, _: &zwlr_layer_shell_v1::ZwlrLayerShellV1, _: zwlr_layer_shell_v1::Event, _: &(), _: &Connection, _: &QueueHandle<Self>) {}
}

impl Dispatch<zwlr_layer_surface_v1::ZwlrLayerSurfaceV1, ()> for App {
    fn event(
        state: &mut Self,
        proxy: &zwlr_layer_surface_v1::ZwlrLayerSurfaceV1,
        event: zwlr_layer_surface_v1::Event,
        _: &(),
        _: &Connection,
        qh: &QueueHandle<Self>,
    ) {
        match event {
            zwlr_layer_surface_v1::Event::Configure { serial, width, height } => {
                proxy.ack_configure(serial);

                if super::surfaces::handle_layer_configure(state, proxy, width, height, qh).is_some() {
                    state.sync_bounds();
                    state.request_redraw();
                }
            }
            zwlr_layer_surface_v1::Event::Closed => state.abort(),
            _ => {}
        }
    }
}

impl Dispatch<wl_seat::WlSeat, ()> for App {
    fn event(
        state: &mut Self,
        seat: &wl_seat::WlSeat,
        event: wl_seat::Event,
        _: &(),
        conn: &Connection,
        qh: &QueueHandle<Self>,
    ) {
        let wl_seat::Event::Capabilities { capabilities: WEnum::Value(caps) } = event else {
            return;
        };

        if caps.contains(wl_seat::Capability::Pointer) && state.pointer.is_none() {
            state.pointer = Some(seat.get_pointer(qh, ()));

            if let Err(e) = state.init_cursor(conn, qh) {
                eventline::warn!("{e}");
            }
        }
        if caps.contains(wl_seat::Capability::Keyboard) && state.keyboard.is_none() {
            state.keyboard = Some(seat.get_keyboard(qh, ()));
        }
    }
}

impl Dispatch<wl_pointer::WlPointer, ()> for App {
    fn event(
        state: &mut Self,
        _: &wl_pointer::WlPointer,
        event: wl_pointer::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        match event {
            wl_pointer::Event::Enter { serial, surface_x, surface_y, surface } => {
                state.pointer_serial = serial;
                state.apply_cursor();

                if state.pointer_locked {
                    return;
                }

                let Some(idx) = state
                    .output_surfaces
                    .iter()
                    .position(|os| os.surface.id() == surface.id())
                else {
                    return;
                };

                state.pointer_output = Some(idx);
                if let Some(pos) = state.to_local(idx, surface_x, surface_y) {
                    state.pointer_moved(pos);
                }
            }

            wl_pointer::Event::Leave { .. } => {
                if !state.pointer_locked {
                    state.pointer_output = None;
                }
            }

            wl_pointer::Event::Motion { surface_x, surface_y, .. } => {
                let Some(pos) = state
                    .pointer_output
                    .and_then(|idx| state.to_local(idx, surface_x, surface_y))
                else {
                    return;
                };
                state.pointer_moved(pos);
            }

            wl_pointer::Event::Button { button, state: btn_state, .. } => {
                if state.pointer_output.is_none() {
                    return;
                }
                let pos = state.pointer_pos;
                let button = button_input(button);

                match btn_state {
                    WEnum::Value(wl_pointer::ButtonState::Pressed) => {
                        state.feed(Input::PointerDown { pos, button })
                    }
                    WEnum::Value(wl_pointer::ButtonState::Released) => {
                        state.feed(Input::PointerUp { pos, button })
                    }
                    _ => {}
                }
            }

            _ => {}
        }
    }
}

impl Dispatch<wl_keyboard::WlKeyboard, ()> for App {
    fn event(
        state: &mut Self,
        _: &wl_keyboard::WlKeyboard,
        event: wl_keyboard::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        match event {
            wl_keyboard::Event::Modifiers { mods_depressed, .. } => {
                state.ctrl_down = ctrl_held(mods_depressed);
            }
            wl_keyboard::Event::Leave { .. } => {
                state.ctrl_down = false;
            }
            wl_keyboard::Event::Key { key, state: key_state, .. } => {
                if key_state != WEnum::Value(wl_keyboard::KeyState::Pressed) {
                    return;
                }
                match key_input(key, state.ctrl_down) {
                    Key::Other => {}
                    k => state.feed(Input::Key(k)),
                }
            }
            _ => {}
        }
    }
}

impl Dispatch<wl_buffer::WlBuffer, ()> for App {
    fn event(
        state: &mut Self,
        buffer: &wl_buffer::WlBuffer,
        event: wl_buffer::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        if let wl_buffer::Event::Release = event {
            super::surfaces::handle_buffer_release(state, buffer);
            if state.output_surfaces.iter().any(|os| os.pending.is_some()) {
                state.request_redraw();
            }
        }
    }
}

// SCTK delegates
smithay_client_toolkit::delegate_output!(App);
smithay_client_toolkit::delegate_registry!(App);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buttons_map_to_session_buttons() {
        assert_eq!(button_input(BTN_LEFT), Button::Primary);
        assert_eq!(button_input(BTN_RIGHT), Button::Secondary);
        assert_eq!(button_input(274), Button::Other);
    }

    #[test]
    fn ctrl_c_confirms_only_with_control_held() {
        assert_eq!(key_input(KEY_C, true), Key::Confirm);
        assert_eq!(key_input(KEY_C, false), Key::Other);
        assert_eq!(key_input(KEY_KPENTER, false), Key::Confirm);
        assert_eq!(key_input(KEY_ESC, true), Key::Escape);
    }

    #[test]
    fn control_is_read_from_the_modifier_mask() {
        // shift | control, as sent when focus arrives with both held
        assert!(ctrl_held(0b101));
        assert!(!ctrl_held(0b001));
        assert!(!ctrl_held(0));
    }

    #[test]
    fn every_shape_has_a_fallback_name() {
        for shape in [
            CursorShape::Crosshair,
            CursorShape::Move,
            CursorShape::ResizeVertical,
            CursorShape::ResizeHorizontal,
            CursorShape::ResizeNwse,
            CursorShape::ResizeNesw,
        ] {
            assert_ne!(legacy_cursor_name(shape), shape.theme_name());
        }
    }
}
