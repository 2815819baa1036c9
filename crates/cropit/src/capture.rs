// Author: Dustin Pilgrim
// License: MIT
//
// Desktop snapshot via xdg-desktop-portal (org.freedesktop.portal.Screenshot).
// The portal writes a PNG of the whole desktop and answers with its file://
// URI on the Request::Response signal. The overlay gets a preview in logical
// virtual-desktop coordinates; commits crop the portal's own pixels.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_io::Timer;
use futures_util::{future::select, future::Either, StreamExt};
use image::imageops::{self, FilterType};
use url::Url;
use zbus::{Connection, Proxy};
use zvariant::{OwnedObjectPath, OwnedValue, Value};

use cropit_core::{CaptureProvider, CropitError, Raster, Rect};

const PORTAL_DEST: &str = "org.freedesktop.portal.Desktop";
const SCREENSHOT_IFACE: &str = "org.freedesktop.portal.Screenshot";
const REQUEST_IFACE: &str = "org.freedesktop.portal.Request";
const PORTAL_PATH: &str = "/org/freedesktop/portal/desktop";

const RESPONSE_TIMEOUT: Duration = Duration::from_secs(30);

pub struct PortalCapture {
    /// Logical virtual desktop the snapshot must cover.
    desktop: Rect,
    /// Portal pixels, kept when they differ in size from the preview.
    full: Option<Raster>,
}

impl PortalCapture {
    pub fn new(desktop: Rect) -> Self {
        Self {
            desktop: desktop.normalize(),
            full: None,
        }
    }

    /// The raster and rectangle a commit should use for `rect`, a selection
    /// on `preview`. On scaled outputs that is the full-resolution snapshot.
    pub fn commit_source(&mut self, preview: Raster, rect: Rect) -> (Raster, Rect) {
        match self.full.take() {
            Some(full) => {
                let scaled = scale_rect(rect, &preview, &full);
                (full, scaled)
            }
            None => (preview, rect),
        }
    }
}

impl CaptureProvider for PortalCapture {
    fn capture_desktop(&mut self) -> Result<Raster, CropitError> {
        let path = portal_screenshot_path().map_err(CropitError::CaptureFailed)?;
        eventline::debug!("portal screenshot at {}", path.display());

        let snap = load_snapshot(&path, self.desktop).map_err(CropitError::CaptureFailed)?;
        self.full = snap.full;
        Ok(snap.preview)
    }
}

struct Snapshot {
    /// Logical-size copy the overlay paints.
    preview: Raster,
    /// Unscaled portal pixels; `None` when they already match the preview.
    full: Option<Raster>,
}

/// Decode `path` and map it onto `desktop`.
///
/// Portals hand back physical pixels; on scaled outputs that is larger than
/// the logical desktop the overlay works in, so the preview is resampled down
/// and the original is kept for the commit.
fn load_snapshot(path: &Path, desktop: Rect) -> Result<Snapshot, String> {
    let img = image::open(path)
        .map_err(|e| format!("open screenshot {}: {e}", path.display()))?
        .to_rgba8();

    let origin = desktop.top_left();
    let (w, h) = (desktop.width().max(1) as u32, desktop.height().max(1) as u32);
    if img.dimensions() == (w, h) {
        return Ok(Snapshot {
            preview: Raster::from_rgba(&img, origin),
            full: None,
        });
    }

    eventline::info!(
        "screenshot is {}x{}, desktop is {w}x{h}; previewing at logical size",
        img.width(),
        img.height()
    );
    let preview = imageops::resize(&img, w, h, FilterType::Triangle);

    Ok(Snapshot {
        preview: Raster::from_rgba(&preview, origin),
        full: Some(Raster::from_rgba(&img, origin)),
    })
}

/// Map `rect` from `from`'s pixel grid onto `to`'s, growing outwards so
/// partially covered pixels are kept.
fn scale_rect(rect: Rect, from: &Raster, to: &Raster) -> Rect {
    let r = rect.normalize();
    let (fw, fh) = (from.width().max(1) as i64, from.height().max(1) as i64);
    let (tw, th) = (to.width() as i64, to.height() as i64);

    let floor = |v: i32, t: i64, f: i64| (v as i64 * t).div_euclid(f) as i32;
    let ceil = |v: i32, t: i64, f: i64| -((-(v as i64) * t).div_euclid(f)) as i32;

    Rect::new(
        floor(r.left, tw, fw),
        floor(r.top, th, fh),
        ceil(r.right, tw, fw),
        ceil(r.bottom, th, fh),
    )
}

fn portal_screenshot_path() -> Result<PathBuf, String> {
    zbus::block_on(async {
        let conn = Connection::session()
            .await
            .map_err(|e| format!("dbus session connect: {e}"))?;

        let screenshot = Proxy::new(&conn, PORTAL_DEST, PORTAL_PATH, SCREENSHOT_IFACE)
            .await
            .map_err(|e| format!("proxy screenshot: {e}"))?;

        let token = new_handle_token();
        let mut options: HashMap<&str, Value<'_>> = HashMap::new();
        options.insert("handle_token", Value::from(token.as_str()));
        options.insert("interactive", Value::from(false));

        let request_path: OwnedObjectPath = screenshot
            .call("Screenshot", &("", options))
            .await
            .map_err(|e| format!("portal Screenshot() call failed: {e}"))?;

        let request = Proxy::new(&conn, PORTAL_DEST, request_path, REQUEST_IFACE)
            .await
            .map_err(|e| format!("proxy request: {e}"))?;

        let mut stream = request
            .receive_signal("Response")
            .await
            .map_err(|e| format!("receive Response signal: {e}"))?;

        match select(stream.next(), Timer::after(RESPONSE_TIMEOUT)).await {
            Either::Left((Some(msg), _)) => {
                let (response, results): (u32, HashMap<String, OwnedValue>) = msg
                    .body()
                    .deserialize()
                    .map_err(|e| format!("signal decode: {e}"))?;

                if response != 0 {
                    return Err(format!("portal screenshot failed (response={response})"));
                }

                let uri: &str = results
                    .get("uri")
                    .ok_or_else(|| "portal response missing 'uri'".to_string())?
                    .downcast_ref::<&str>()
                    .map_err(|e| format!("'uri' had unexpected type: {e}"))?;

                uri_to_path(uri)
            }
            Either::Left((None, _)) => Err("portal signal stream ended unexpectedly".into()),
            Either::Right(_) => Err("portal request timed out waiting for Response".into()),
        }
    })
}

fn uri_to_path(uri: &str) -> Result<PathBuf, String> {
    let url = Url::parse(uri).map_err(|e| format!("bad screenshot uri {uri}: {e}"))?;
    if url.scheme() != "file" {
        return Err(format!("unexpected uri scheme: {uri}"));
    }
    url.to_file_path()
        .map_err(|_| format!("screenshot uri is not a local path: {uri}"))
}

fn new_handle_token() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    format!("cropit_{now}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn file_uris_are_decoded() {
        assert_eq!(
            uri_to_path("file:///home/me/Pictures/Screenshot%20from%20today.png").unwrap(),
            PathBuf::from("/home/me/Pictures/Screenshot from today.png")
        );
        assert!(uri_to_path("https://example.com/a.png").is_err());
        assert!(uri_to_path("not a uri").is_err());
    }

    #[test]
    fn handle_tokens_are_object_path_safe() {
        let t = new_handle_token();
        assert!(t.starts_with("cropit_"));
        assert!(t.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
    }

    #[test]
    fn unscaled_snapshot_is_used_as_is() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.png");
        RgbaImage::from_pixel(40, 20, Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();

        let snap = load_snapshot(&path, Rect::new(-40, 0, 0, 20)).unwrap();
        assert!(snap.full.is_none());
        assert_eq!((snap.preview.width(), snap.preview.height()), (40, 20));
        assert_eq!(snap.preview.origin(), cropit_core::Point::new(-40, 0));
        assert_eq!(snap.preview.pixel(3, 3), Some(0xFF0A_141E));
    }

    #[test]
    fn scaled_snapshot_commits_physical_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.png");
        // 2x output: 40x40 physical over a 20x20 logical desktop.
        let img = RgbaImage::from_fn(40, 40, |x, y| Rgba([x as u8, y as u8, 0, 255]));
        img.save(&path).unwrap();

        let snap = load_snapshot(&path, Rect::new(0, 0, 20, 20)).unwrap();
        assert_eq!((snap.preview.width(), snap.preview.height()), (20, 20));

        let mut capture = PortalCapture {
            desktop: Rect::new(0, 0, 20, 20),
            full: snap.full,
        };
        let (raster, rect) = capture.commit_source(snap.preview, Rect::new(10, 10, 20, 20));
        assert_eq!(rect, Rect::new(20, 20, 40, 40));

        let crop = raster.crop(rect).unwrap();
        assert_eq!((crop.width(), crop.height()), (20, 20));
        // Real pixels, not resampled ones.
        assert_eq!(crop.pixel(0, 0), Some(0xFF14_1400));
        assert_eq!(crop.pixel(19, 3), Some(0xFF27_1700));
    }

    #[test]
    fn fractional_scales_round_outwards() {
        let logical = Raster::new(4, 4, cropit_core::Point::default(), vec![0; 16]).unwrap();
        let physical = Raster::new(6, 6, cropit_core::Point::default(), vec![0; 36]).unwrap();
        assert_eq!(
            scale_rect(Rect::new(1, 1, 3, 2), &logical, &physical),
            Rect::new(1, 1, 5, 3)
        );
        assert_eq!(
            scale_rect(Rect::new(0, 0, 4, 4), &logical, &physical),
            physical.bounds()
        );
    }
}
