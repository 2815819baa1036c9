// Author: Dustin Pilgrim
// License: MIT
//
// Desktop notifications via org.freedesktop.Notifications.
// Best-effort: callers log a failure and move on.

use std::collections::HashMap;
use std::path::Path;

use zbus::{Connection, Proxy};
use zvariant::Value;

use cropit_core::CropitError;

const DEST: &str = "org.freedesktop.Notifications";
const PATH: &str = "/org/freedesktop/Notifications";
const IFACE: &str = "org.freedesktop.Notifications";

const APP_NAME: &str = "Cropit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Copied,
    Saved,
    Error,
}

impl Kind {
    // 0=low, 1=normal, 2=critical
    fn urgency(self) -> u8 {
        match self {
            Kind::Copied | Kind::Saved => 1,
            Kind::Error => 2,
        }
    }

    fn timeout_ms(self) -> i32 {
        match self {
            Kind::Copied | Kind::Saved => 2500,
            Kind::Error => 6000,
        }
    }

    fn icon(self) -> &'static str {
        match self {
            Kind::Copied => "edit-copy",
            Kind::Saved => "document-save",
            Kind::Error => "dialog-error",
        }
    }
}

pub fn send(kind: Kind, summary: &str, body: &str) -> Result<(), String> {
    zbus::block_on(async {
        let conn = Connection::session()
            .await
            .map_err(|e| format!("notify: dbus session connect: {e}"))?;

        let proxy = Proxy::new(&conn, DEST, PATH, IFACE)
            .await
            .map_err(|e| format!("notify: proxy: {e}"))?;

        let replaces_id: u32 = 0;
        let actions: Vec<&str> = Vec::new();

        let mut hints: HashMap<&str, Value<'_>> = HashMap::new();
        hints.insert("urgency", Value::from(kind.urgency()));

        let _: u32 = proxy
            .call(
                "Notify",
                &(
                    APP_NAME,
                    replaces_id,
                    kind.icon(),
                    summary,
                    body,
                    actions,
                    hints,
                    kind.timeout_ms(),
                ),
            )
            .await
            .map_err(|e| format!("notify: call Notify: {e}"))?;

        Ok(())
    })
}

pub fn notify_copied(width: i32, height: i32) -> Result<(), String> {
    send(Kind::Copied, "Selection copied", &format!("{width}x{height} copied to the clipboard"))
}

pub fn notify_saved(path: &Path) -> Result<(), String> {
    send(Kind::Saved, "Selection saved", &path.display().to_string())
}

pub fn notify_failed(err: &CropitError) -> Result<(), String> {
    send(Kind::Error, failure_summary(err), &err.to_string())
}

fn failure_summary(err: &CropitError) -> &'static str {
    match err {
        CropitError::CaptureFailed(_) => "Capture failed",
        CropitError::OverlayFailed(_) => "Selection failed",
        CropitError::OutputCommitFailed(_) => "Could not copy or save",
        CropitError::DegenerateSelection { .. } => "Nothing selected",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_follows_the_failing_stage() {
        let capture = CropitError::CaptureFailed("portal".into());
        let commit = CropitError::OutputCommitFailed("clipboard busy".into());
        assert_eq!(failure_summary(&capture), "Capture failed");
        assert_eq!(failure_summary(&commit), "Could not copy or save");
        assert_ne!(failure_summary(&capture), failure_summary(&commit));
        assert_eq!(
            failure_summary(&CropitError::DegenerateSelection { width: 0, height: 4 }),
            "Nothing selected"
        );
    }

    #[test]
    fn saves_and_copies_use_their_own_icons() {
        assert_eq!(Kind::Copied.icon(), "edit-copy");
        assert_eq!(Kind::Saved.icon(), "document-save");
        assert_eq!(Kind::Saved.urgency(), Kind::Copied.urgency());
        assert!(Kind::Error.timeout_ms() > Kind::Saved.timeout_ms());
    }
}
