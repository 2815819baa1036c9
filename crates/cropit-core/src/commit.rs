// Author: Dustin Pilgrim
// License: MIT

use crate::error::{CropitError, Result};
use crate::raster::Raster;
use crate::rect::Rect;
use crate::surface::OutputSink;

/// Hand the pixels under `selection` to `sink`. Zero-area selections are
/// rejected before the sink is touched.
pub fn commit_selection<O>(raster: &Raster, selection: Rect, sink: &mut O) -> Result<()>
where
    O: OutputSink + ?Sized,
{
    let s = selection.normalize();
    if s.is_empty() {
        return Err(CropitError::DegenerateSelection {
            width: s.width(),
            height: s.height(),
        });
    }

    sink.commit(raster, s)
}
