// Author: Dustin Pilgrim
// License: MIT
//
// One-shot output query. SCTK folds in xdg-output so sizes are logical.

use cropit_core::OutputInfo;
use smithay_client_toolkit::{
    output::{OutputHandler, OutputState},
    registry::{ProvidesRegistryState, RegistryState},
    registry_handlers,
};
use wayland_client::{globals::registry_queue_init, protocol::wl_output, Connection, QueueHandle};

struct Probe {
    registry_state: RegistryState,
    output_state: OutputState,
}

impl ProvidesRegistryState for Probe {
    fn registry(&mut self) -> &mut RegistryState {
        &mut self.registry_state
    }

    registry_handlers![OutputState];
}

impl OutputHandler for Probe {
    fn output_state(&mut self) -> &mut OutputState {
        &mut self.output_state
    }

    fn new_output(&mut self, _: &Connection, _: &QueueHandle<Self>, _: wl_output::WlOutput) {}

    fn update_output(&mut self, _: &Connection, _: &QueueHandle<Self>, _: wl_output::WlOutput) {}

    fn output_destroyed(&mut self, _: &Connection, _: &QueueHandle<Self>, _: wl_output::WlOutput) {}
}

pub fn query_outputs() -> Result<Vec<OutputInfo>, String> {
    let conn = Connection::connect_to_env().map_err(|e| format!("wayland connect: {e}"))?;

    let (globals, mut event_queue) =
        registry_queue_init(&conn).map_err(|e| format!("registry init: {e}"))?;

    let qh = event_queue.handle();
    let mut probe = Probe {
        registry_state: RegistryState::new(&globals),
        output_state: OutputState::new(&globals, &qh),
    };

    // Second roundtrip picks up xdg-output geometry.
    for pass in 1..=2 {
        event_queue
            .roundtrip(&mut probe)
            .map_err(|e| format!("roundtrip {pass}: {e}"))?;
    }

    let mut infos: Vec<OutputInfo> = probe
        .output_state
        .outputs()
        .filter_map(|o| probe.output_state.info(&o))
        .map(|info| {
            let (x, y) = info.logical_position.unwrap_or((0, 0));
            let (w, h) = info.logical_size.unwrap_or((0, 0));
            OutputInfo {
                name: info.name.clone(),
                x,
                y,
                width: w as i32,
                height: h as i32,
                scale: info.scale_factor,
            }
        })
        .collect();

    infos.sort_by_key(|info| (info.y, info.x));

    for o in &infos {
        eventline::debug!(
            "output {:?}: {}x{} at ({}, {}) scale {}",
            o.name,
            o.width,
            o.height,
            o.x,
            o.y,
            o.scale
        );
    }

    Ok(infos)
}

smithay_client_toolkit::delegate_output!(Probe);
smithay_client_toolkit::delegate_registry!(Probe);
