// Author: Dustin Pilgrim
// License: MIT

use std::fs::File;
use std::os::fd::AsFd;

use memmap2::MmapMut;
use tempfile::tempfile;

use wayland_client::protocol::{wl_buffer, wl_shm, wl_shm_pool};
use wayland_client::QueueHandle;

use cropit_core::{Point, Rect};

use super::app::App;
use super::canvas::BackBuffer;

/// One ARGB8888 wl_buffer per output. Never written while the compositor
/// holds it (`busy`); updates are partial, so the untouched parts keep the
/// previous frame.
pub struct ShmBuffer {
    _file: File,
    mmap: MmapMut,
    pool: wl_shm_pool::WlShmPool,
    pub buffer: wl_buffer::WlBuffer,
    pub width: i32,
    pub height: i32,
    pub busy: bool,
}

impl ShmBuffer {
    pub fn new(
        shm: &wl_shm::WlShm,
        qh: &QueueHandle<App>,
        width: i32,
        height: i32,
    ) -> Result<Self, String> {
        let width = width.max(1);
        let height = height.max(1);
        let stride = width * 4;
        let size = (stride * height) as u64;

        let file = tempfile().map_err(|e| format!("tempfile: {e}"))?;
        file.set_len(size).map_err(|e| format!("set_len: {e}"))?;

        let mmap = unsafe { MmapMut::map_mut(&file).map_err(|e| format!("mmap: {e}"))? };

        let pool = shm.create_pool(file.as_fd(), size as i32, qh, ());
        let buffer = pool.create_buffer(0, width, height, stride, wl_shm::Format::Argb8888, qh, ());

        Ok(Self {
            _file: file,
            mmap,
            pool,
            buffer,
            width,
            height,
            busy: false,
        })
    }

    /// Release the protocol objects. The mapping and file go with `self`.
    pub fn destroy(self) {
        self.buffer.destroy();
        self.pool.destroy();
    }

    /// Copy `area` (back-buffer coordinates) into this buffer, where the
    /// buffer's (0,0) sits at `origin` in back-buffer space. Returns the
    /// buffer-local rectangle that was written.
    pub fn present(&mut self, back: &BackBuffer, area: Rect, origin: Point) -> Option<Rect> {
        let mine = Rect::from_size(origin.x, origin.y, self.width, self.height);
        let a = area.intersect(mine)?.intersect(back.bounds())?;

        let (_, px, _) = unsafe { self.mmap.align_to_mut::<u32>() };
        let bw = self.width as usize;

        for y in a.top..a.bottom {
            let row = (y - origin.y) as usize * bw;
            let x0 = (a.left - origin.x) as usize;
            let x1 = (a.right - origin.x) as usize;
            px[row + x0..row + x1].copy_from_slice(back.span(y, a.left, a.right));
        }

        Some(a.offset(-origin.x, -origin.y))
    }
}
