// Author: Dustin Pilgrim
// License: MIT

use std::path::{Path, PathBuf};

use arboard::{Clipboard, ImageData};

use cropit_core::{CropitError, OutputSink, Raster, Rect};

use crate::paths::ensure_parent_dir;

fn crop(raster: &Raster, rect: Rect) -> Result<Raster, CropitError> {
    raster.crop(rect).ok_or_else(|| {
        CropitError::OutputCommitFailed(format!(
            "selection {}x{} at ({}, {}) is outside the snapshot",
            rect.width(),
            rect.height(),
            rect.left,
            rect.top
        ))
    })
}

/// Copies the selection as an image. The clipboard handle is kept so the
/// X11 backend can hand ownership to a clipboard manager when it drops.
#[derive(Default)]
pub struct ClipboardSink {
    clipboard: Option<Clipboard>,
}

impl OutputSink for ClipboardSink {
    fn commit(&mut self, raster: &Raster, rect: Rect) -> Result<(), CropitError> {
        let img = crop(raster, rect)?.to_rgba8();

        let clipboard = match self.clipboard.take() {
            Some(c) => c,
            None => Clipboard::new()
                .map_err(|e| CropitError::OutputCommitFailed(format!("open clipboard: {e}")))?,
        };
        let clipboard = self.clipboard.insert(clipboard);

        let data = ImageData {
            width: img.width() as usize,
            height: img.height() as usize,
            bytes: img.into_raw().into(),
        };

        clipboard
            .set_image(data)
            .map_err(|e| CropitError::OutputCommitFailed(format!("set clipboard image: {e}")))
    }
}

/// Writes the selection as a PNG.
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputSink for FileSink {
    fn commit(&mut self, raster: &Raster, rect: Rect) -> Result<(), CropitError> {
        ensure_parent_dir(&self.path).map_err(CropitError::OutputCommitFailed)?;

        crop(raster, rect)?
            .to_rgba8()
            .save_with_format(&self.path, image::ImageFormat::Png)
            .map_err(|e| {
                CropitError::OutputCommitFailed(format!("save {}: {e}", self.path.display()))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cropit_core::Point;

    fn stripes(w: i32, h: i32) -> Raster {
        let px = (0..w * h)
            .map(|i| if (i % w) < w / 2 { 0xFFFF_0000 } else { 0xFF00_00FF })
            .collect();
        Raster::new(w, h, Point::default(), px).unwrap()
    }

    #[test]
    fn file_sink_writes_exact_crop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.png");
        let mut sink = FileSink::new(path.clone());

        sink.commit(&stripes(400, 300), Rect::new(100, 100, 300, 200))
            .unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (200, 100));
        assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(199, 99).0, [0, 0, 255, 255]);
    }

    #[test]
    fn file_sink_rejects_rect_outside_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = FileSink::new(dir.path().join("out.png"));
        let err = sink
            .commit(&stripes(10, 10), Rect::new(50, 50, 60, 60))
            .unwrap_err();
        assert!(matches!(err, CropitError::OutputCommitFailed(_)));
        assert!(!sink.path().exists());
    }
}
