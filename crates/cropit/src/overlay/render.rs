// Author: Dustin Pilgrim
// License: MIT

use cropit_core::{compose_scene, Point};

use super::app::App;

/// Compose the whole scene into the back buffer, then present each output's
/// pending damage. Outputs whose buffer the compositor still holds keep
/// their damage until the buffer is released.
pub fn redraw(app: &mut App) -> Result<(), String> {
    let ready = app.output_surfaces.iter().any(|os| {
        os.configured && os.pending.is_some() && os.shm_buf.as_ref().is_some_and(|b| !b.busy)
    });
    if !ready {
        return Ok(());
    }

    let bounds = app.session.bounds();
    if app.back.ensure_size(bounds.width(), bounds.height()) {
        eventline::debug!("back buffer {}x{}", bounds.width(), bounds.height());
    }

    let selection = app.session.selection();
    compose_scene(
        &mut app.back,
        &app.raster,
        &bounds,
        selection.as_ref(),
        &app.style,
        app.session.tuning(),
    );

    for os in &mut app.output_surfaces {
        if !os.configured {
            continue;
        }
        let Some(area) = os.pending else {
            continue;
        };
        let sb = os.shm_buf.as_mut().ok_or("no shm buffer")?;
        if sb.busy {
            eventline::debug!("output {:?} busy, redraw deferred", os.output_info.name);
            continue;
        }

        let origin = Point::new(os.local.left, os.local.top);
        if let Some(d) = sb.present(&app.back, area, origin) {
            os.surface.attach(Some(&sb.buffer), 0, 0);
            os.surface.damage_buffer(d.left, d.top, d.width(), d.height());
            os.surface.commit();
            sb.busy = true;
        }
        os.pending = None;
    }

    Ok(())
}
