// Author: Dustin Pilgrim
// License: MIT

mod capture;
mod config;
mod logging;
mod notify;
mod outputs;
mod overlay;
mod paths;
mod sink;

use std::path::PathBuf;

use clap::Parser;

use cropit_core::output::virtual_desktop;
use cropit_core::{commit_selection, CaptureProvider, CropitError, Destination};

use crate::capture::PortalCapture;
use crate::config::CropitConfig;
use crate::sink::{ClipboardSink, FileSink};

#[derive(Debug, Parser)]
#[command(name = "cropit", version, about = "Select a screen region and copy or save it")]
struct Args {
    /// Log to stderr (in addition to the log file)
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Override log file path (default: $XDG_STATE_HOME/cropit/cropit.log)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Where the selection goes (overrides cropit.destination)
    #[arg(short = 'd', long, value_enum)]
    destination: Option<Destination>,

    /// PNG path for the file destination
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    let log_path = args.log_file.clone().unwrap_or_else(paths::default_log_path);

    if let Err(e) = logging::init_logging(&log_path, args.verbose) {
        // Logging is not up yet; stderr is all we have.
        eprintln!("cropit: failed to init logging: {e}");
        std::process::exit(1);
    }

    eventline::info!("cropit starting");
    eventline::debug!("log_path={}", log_path.display());

    let cfg = match config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            eventline::warn!("{e}; using defaults");
            CropitConfig::default()
        }
    };

    if let Err(e) = run(&args, &cfg) {
        eventline::error!("{e}");
        if let Err(ne) = notify::notify_failed(&e) {
            eventline::warn!("{ne}");
        }
        std::process::exit(1);
    }
}

fn run(args: &Args, cfg: &CropitConfig) -> Result<(), CropitError> {
    let outputs = outputs::query_outputs().map_err(CropitError::CaptureFailed)?;
    let desktop = virtual_desktop(&outputs)
        .ok_or_else(|| CropitError::CaptureFailed("no outputs with a usable size".into()))?;
    eventline::info!(
        "virtual desktop {}x{} at ({}, {}), {} output(s)",
        desktop.width(),
        desktop.height(),
        desktop.left,
        desktop.top,
        outputs.len()
    );

    let mut capture = PortalCapture::new(desktop);
    let preview = capture.capture_desktop()?;

    let Some((rect, preview)) =
        overlay::run_overlay(outputs, desktop, preview, cfg.tuning(), cfg.style())
            .map_err(CropitError::OverlayFailed)?
    else {
        eventline::info!("selection cancelled");
        return Ok(());
    };
    let (raster, rect) = capture.commit_source(preview, rect);

    let destination = args.destination.unwrap_or(cfg.destination);
    eventline::info!(
        "committing {}x{} at ({}, {}) to {destination:?}",
        rect.width(),
        rect.height(),
        rect.left,
        rect.top
    );

    match destination {
        Destination::Clipboard => {
            let mut sink = ClipboardSink::default();
            commit_selection(&raster, rect, &mut sink)?;
            if let Err(e) = notify::notify_copied(rect.width(), rect.height()) {
                eventline::warn!("{e}");
            }
        }
        Destination::File => {
            let mut sink = FileSink::new(paths::output_path(args.out.as_deref(), cfg));
            commit_selection(&raster, rect, &mut sink)?;
            eventline::info!("saved {}", sink.path().display());
            if let Err(e) = notify::notify_saved(sink.path()) {
                eventline::warn!("{e}");
            }
        }
    }

    Ok(())
}
