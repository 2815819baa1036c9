// Author: Dustin Pilgrim
// License: MIT

pub mod commit;
pub mod damage;
pub mod destination;
pub mod error;
pub mod handle;
pub mod label;
pub mod output;
pub mod paint;
pub mod raster;
pub mod rect;
pub mod resize;
pub mod session;
pub mod surface;
pub mod tuning;

pub use commit::commit_selection;
pub use destination::Destination;
pub use error::CropitError;
pub use handle::{CursorShape, Handle};
pub use output::OutputInfo;
pub use paint::{compose_scene, Style};
pub use raster::Raster;
pub use rect::{Point, Rect, Size};
pub use session::{Button, Input, Key, Mode, Outcome, Session};
pub use surface::{CaptureProvider, OutputSink, Shell, Surface, TextMeasure};
pub use tuning::Tuning;
