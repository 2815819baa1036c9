// Author: Dustin Pilgrim
// License: MIT

use cropit_core::{OutputInfo, Rect};

use wayland_client::protocol::{wl_buffer, wl_surface};
use wayland_client::QueueHandle;

use wayland_protocols_wlr::layer_shell::v1::client::{zwlr_layer_shell_v1, zwlr_layer_surface_v1};

use super::app::App;
use super::shm::ShmBuffer;

/// A window onto the shared session: one layer surface per output.
pub struct OutputSurface {
    pub output_info: OutputInfo,
    /// Where this output sits in overlay-local coordinates.
    pub local: Rect,
    pub surface: wl_surface::WlSurface,
    pub layer_surface: zwlr_layer_surface_v1::ZwlrLayerSurfaceV1,
    pub shm_buf: Option<ShmBuffer>,
    pub configured: bool,
    /// Damage not yet presented (overlay-local).
    pub pending: Option<Rect>,
}

impl OutputSurface {
    pub fn add_damage(&mut self, area: Rect) {
        let Some(a) = area.intersect(self.local) else {
            return;
        };
        self.pending = Some(match self.pending {
            Some(p) => p.union(a),
            None => a,
        });
    }
}

pub fn try_create_surfaces(app: &mut App, qh: &QueueHandle<App>) -> Result<(), String> {
    if app.surfaces_created {
        return Ok(());
    }

    let compositor = app.compositor.as_ref().ok_or("no compositor")?;
    let layer_shell = app.layer_shell.as_ref().ok_or("no layer_shell")?;
    let shm = app.shm.as_ref().ok_or("no shm")?;

    for output_info in &app.outputs {
        if output_info.width <= 0 || output_info.height <= 0 {
            continue;
        }

        // Match wl_outputs to OutputInfo by name
        let wl_output = app.output_state.outputs().find(|wl_out| {
            app.output_state
                .info(wl_out)
                .is_some_and(|info| info.name.as_ref() == output_info.name.as_ref())
        });

        let Some(wl_output) = wl_output else {
            eventline::warn!("could not match wl_output for {:?}", output_info.name);
            continue;
        };

        let surface = compositor.create_surface(qh, ());
        let layer_surface = layer_shell.get_layer_surface(
            &surface,
            Some(&wl_output),
            zwlr_layer_shell_v1::Layer::Overlay,
            "cropit".into(),
            qh,
            (),
        );

        layer_surface.set_anchor(
            zwlr_layer_surface_v1::Anchor::Top
                | zwlr_layer_surface_v1::Anchor::Bottom
                | zwlr_layer_surface_v1::Anchor::Left
                | zwlr_layer_surface_v1::Anchor::Right,
        );

        // Only one surface takes the keyboard.
        layer_surface.set_keyboard_interactivity(if app.output_surfaces.is_empty() {
            zwlr_layer_surface_v1::KeyboardInteractivity::Exclusive
        } else {
            zwlr_layer_surface_v1::KeyboardInteractivity::None
        });

        layer_surface.set_exclusive_zone(-1);
        layer_surface.set_size(0, 0);

        let local = output_info.local_rect(app.origin);
        let shm_buf = ShmBuffer::new(shm, qh, local.width(), local.height())?;

        app.output_surfaces.push(OutputSurface {
            output_info: output_info.clone(),
            local,
            surface: surface.clone(),
            layer_surface,
            shm_buf: Some(shm_buf),
            configured: false,
            pending: None,
        });

        surface.commit();
    }

    app.surfaces_created = true;
    Ok(())
}

/// Ack-side bookkeeping for a layer surface configure. Returns the index of
/// the configured surface.
pub fn handle_layer_configure(
    app: &mut App,
    proxy: &zwlr_layer_surface_v1::ZwlrLayerSurfaceV1,
    width: u32,
    height: u32,
    qh: &QueueHandle<App>,
) -> Option<usize> {
    let idx = app
        .output_surfaces
        .iter()
        .position(|os| &os.layer_surface == proxy)?;

    let shm = app.shm.clone();
    let os = &mut app.output_surfaces[idx];

    if width > 0 && height > 0 {
        let (w, h) = (width as i32, height as i32);
        os.local = Rect::from_size(os.local.left, os.local.top, w, h);

        let needs_resize = os
            .shm_buf
            .as_ref()
            .is_none_or(|b| b.width != w || b.height != h);

        if needs_resize {
            if let Some(shm) = shm.as_ref() {
                match ShmBuffer::new(shm, qh, w, h) {
                    Ok(buf) => {
                        if let Some(old) = os.shm_buf.replace(buf) {
                            old.destroy();
                        }
                    }
                    Err(e) => eventline::warn!("shm buffer {w}x{h}: {e}"),
                }
            }
        }
    }

    os.configured = true;
    os.pending = Some(os.local);
    Some(idx)
}

pub fn handle_buffer_release(app: &mut App, buffer: &wl_buffer::WlBuffer) {
    if let Some(sb) = app
        .output_surfaces
        .iter_mut()
        .filter_map(|os| os.shm_buf.as_mut())
        .find(|sb| &sb.buffer == buffer)
    {
        sb.busy = false;
    }
}

pub fn destroy_surfaces(app: &mut App) {
    for os in app.output_surfaces.drain(..) {
        os.layer_surface.destroy();
        os.surface.destroy();
        if let Some(sb) = os.shm_buf {
            sb.destroy();
        }
    }
}
