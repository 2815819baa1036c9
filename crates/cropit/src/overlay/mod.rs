// Author: Dustin Pilgrim
// License: MIT

mod app;
mod canvas;
mod font;
mod render;
mod run;
mod shell;
mod shm;
mod surfaces;

pub use run::run_overlay;
