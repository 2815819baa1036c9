// Author: Dustin Pilgrim
// License: MIT

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::CropitConfig;

pub fn default_log_path() -> PathBuf {
    let base = std::env::var_os("XDG_STATE_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".local/state")))
        .unwrap_or_else(|| PathBuf::from("/tmp"));
    base.join("cropit").join("cropit.log")
}

/// Where a file commit lands.
///
/// Priority:
/// 1) `--out`
/// 2) $CROPIT_DIR (if set and non-empty)
/// 3) config cropit.screenshot_directory (if non-empty)
/// 4) $XDG_RUNTIME_DIR
/// 5) /tmp
pub fn output_path(cli_out: Option<&Path>, cfg: &CropitConfig) -> PathBuf {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    resolve_output_path(
        cli_out,
        std::env::var_os("CROPIT_DIR"),
        &cfg.screenshot_directory,
        std::env::var_os("XDG_RUNTIME_DIR"),
        ts,
    )
}

fn resolve_output_path(
    cli_out: Option<&Path>,
    env_dir: Option<OsString>,
    cfg_dir: &Path,
    runtime_dir: Option<OsString>,
    ts: u64,
) -> PathBuf {
    if let Some(p) = cli_out {
        return p.to_path_buf();
    }

    let non_empty = |v: OsString| (!v.is_empty()).then(|| PathBuf::from(v));

    let dir = env_dir
        .and_then(non_empty)
        .or_else(|| (!cfg_dir.as_os_str().is_empty()).then(|| cfg_dir.to_path_buf()))
        .or_else(|| runtime_dir.and_then(non_empty))
        .unwrap_or_else(|| PathBuf::from("/tmp"));

    dir.join(format!("cropit-{ts}.png"))
}

pub fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("create dir {}: {e}", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_path_wins() {
        let p = resolve_output_path(
            Some(Path::new("/x/shot.png")),
            Some("/env".into()),
            Path::new("/cfg"),
            None,
            7,
        );
        assert_eq!(p, PathBuf::from("/x/shot.png"));
    }

    #[test]
    fn env_then_config_then_runtime() {
        let cfg = Path::new("/cfg");
        assert_eq!(
            resolve_output_path(None, Some("/env".into()), cfg, Some("/run".into()), 42),
            PathBuf::from("/env/cropit-42.png")
        );
        assert_eq!(
            resolve_output_path(None, Some("".into()), cfg, Some("/run".into()), 42),
            PathBuf::from("/cfg/cropit-42.png")
        );
        assert_eq!(
            resolve_output_path(None, None, Path::new(""), Some("/run".into()), 42),
            PathBuf::from("/run/cropit-42.png")
        );
        assert_eq!(
            resolve_output_path(None, None, Path::new(""), None, 42),
            PathBuf::from("/tmp/cropit-42.png")
        );
    }
}
