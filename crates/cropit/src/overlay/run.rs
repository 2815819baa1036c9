// Author: Dustin Pilgrim
// License: MIT

use cropit_core::{OutputInfo, Outcome, Raster, Rect, Style, Tuning};

use wayland_client::globals::registry_queue_init;
use wayland_client::protocol::{wl_compositor, wl_seat, wl_shm};
use wayland_client::Connection;

use smithay_client_toolkit::output::OutputState;
use smithay_client_toolkit::registry::RegistryState;

use wayland_protocols_wlr::layer_shell::v1::client::zwlr_layer_shell_v1;

use super::app::App;

/// Show the overlay over every output until the user commits or cancels.
///
/// On commit, returns the selection in raster coordinates together with the
/// snapshot it refers to. On cancel the snapshot is dropped here.
pub fn run_overlay(
    outputs: Vec<OutputInfo>,
    desktop: Rect,
    raster: Raster,
    tuning: Tuning,
    style: Style,
) -> Result<Option<(Rect, Raster)>, String> {
    if outputs.is_empty() {
        return Err("no outputs available".into());
    }

    let conn = Connection::connect_to_env().map_err(|e| format!("wayland connect: {e}"))?;
    let (globals, mut queue) =
        registry_queue_init(&conn).map_err(|e| format!("registry init: {e}"))?;
    let qh = queue.handle();

    let registry_state = RegistryState::new(&globals);
    let output_state = OutputState::new(&globals, &qh);

    let mut app = App::new(registry_state, output_state, outputs, desktop, raster, tuning, style);

    app.compositor = globals
        .bind::<wl_compositor::WlCompositor, _, _>(&qh, 1..=6, ())
        .ok();
    app.shm = globals.bind::<wl_shm::WlShm, _, _>(&qh, 1..=1, ()).ok();
    app.seat = globals.bind::<wl_seat::WlSeat, _, _>(&qh, 1..=7, ()).ok();
    app.layer_shell = globals
        .bind::<zwlr_layer_shell_v1::ZwlrLayerShellV1, _, _>(&qh, 1..=4, ())
        .ok();

    queue.roundtrip(&mut app).map_err(|e| format!("roundtrip: {e}"))?;

    if app.compositor.is_none() {
        return Err("wl_compositor not available".into());
    }
    if app.layer_shell.is_none() {
        return Err("zwlr_layer_shell_v1 not available".into());
    }
    if app.shm.is_none() {
        return Err("wl_shm not available".into());
    }
    if app.seat.is_none() {
        return Err("wl_seat not available".into());
    }

    app.init_cursor(&conn, &qh)?;

    super::surfaces::try_create_surfaces(&mut app, &qh)?;

    // Output names can arrive a roundtrip late.
    if app.output_surfaces.is_empty() {
        queue.roundtrip(&mut app).map_err(|e| format!("roundtrip2: {e}"))?;
        app.surfaces_created = false;
        super::surfaces::try_create_surfaces(&mut app, &qh)?;
    }

    if app.output_surfaces.is_empty() {
        return Err("could not create an overlay surface on any output".into());
    }
    eventline::info!("overlay up on {} output(s)", app.output_surfaces.len());

    while !app.is_finished() {
        queue.blocking_dispatch(&mut app).map_err(|e| format!("dispatch: {e}"))?;
        let _ = conn.flush();
    }

    super::surfaces::destroy_surfaces(&mut app);
    let _ = conn.flush();

    match app.outcome {
        Some(Outcome::Commit(rect)) => Ok(Some((rect, app.raster))),
        _ => Ok(None),
    }
}
