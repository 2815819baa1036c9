// Author: Dustin Pilgrim
// License: MIT

use std::env;
use std::path::PathBuf;

use cropit_core::{Destination, Style, Tuning};
use rune_cfg::RuneConfig;

#[derive(Debug, Clone)]
pub struct CropitConfig {
    pub destination: Destination,
    pub screenshot_directory: PathBuf,
    pub overlay_alpha: u8,
    /// Handle half-size in pixels.
    pub handle_size: i32,
    pub min_selection: i32,
    pub border_colour: u32, // ARGB
}

impl Default for CropitConfig {
    fn default() -> Self {
        let style = Style::default();
        let tuning = Tuning::default();
        Self {
            destination: Destination::Clipboard,
            screenshot_directory: default_screenshot_dir(),
            overlay_alpha: style.overlay_alpha,
            handle_size: tuning.handle_half,
            min_selection: tuning.min_size,
            border_colour: style.border_colour,
        }
    }
}

impl CropitConfig {
    pub fn tuning(&self) -> Tuning {
        Tuning::default()
            .with_handle_half(self.handle_size)
            .with_min_size(self.min_selection)
    }

    pub fn style(&self) -> Style {
        Style {
            overlay_alpha: self.overlay_alpha,
            border_colour: self.border_colour,
            ..Style::default()
        }
    }
}

pub fn load() -> Result<CropitConfig, String> {
    let path = default_user_config_path();

    if !path.exists() {
        return Ok(CropitConfig::default());
    }

    let rc = RuneConfig::from_file(&path)
        .map_err(|e| format!("failed to read config {}: {e}", path.display()))?;

    parse_config(&rc)
}

fn parse_config(rc: &RuneConfig) -> Result<CropitConfig, String> {
    let mut cfg = CropitConfig::default();

    if !rc.has("cropit") {
        return Ok(cfg);
    }

    if let Some(s) = get_string(rc, "cropit.destination")? {
        cfg.destination = Destination::parse(&s).ok_or_else(|| {
            format!("config error at cropit.destination: expected clipboard|file, got \"{s}\"")
        })?;
    }

    if let Some(dir) = get_string(rc, "cropit.screenshot_directory")? {
        cfg.screenshot_directory = expand_env(&dir);
    }

    if let Some(v) = get_int(rc, "cropit.overlay_alpha")? {
        cfg.overlay_alpha = in_range("cropit.overlay_alpha", v, 0, 255)? as u8;
    }

    if let Some(v) = get_int(rc, "cropit.handle_size")? {
        cfg.handle_size = in_range("cropit.handle_size", v, 1, 32)? as i32;
    }

    if let Some(v) = get_int(rc, "cropit.min_selection")? {
        cfg.min_selection = in_range("cropit.min_selection", v, 1, 4096)? as i32;
    }

    if let Some(s) = get_string(rc, "cropit.border_colour")? {
        cfg.border_colour =
            parse_hex_colour(&s).map_err(|e| format!("config error at cropit.border_colour: {e}"))?;
    }

    Ok(cfg)
}

fn get_string(rc: &RuneConfig, key: &str) -> Result<Option<String>, String> {
    rc.get_optional::<String>(key)
        .map_err(|e| format!("config error at {key}: {e}"))
}

// Accepts both `key 100` and `key "100"`.
fn get_int(rc: &RuneConfig, key: &str) -> Result<Option<i64>, String> {
    if let Ok(v) = rc.get_optional::<i64>(key) {
        return Ok(v);
    }

    match get_string(rc, key)? {
        Some(s) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| format!("config error at {key}: expected an integer, got \"{s}\"")),
        None => Ok(None),
    }
}

fn in_range(key: &str, v: i64, min: i64, max: i64) -> Result<i64, String> {
    if (min..=max).contains(&v) {
        Ok(v)
    } else {
        Err(format!("config error at {key}: {v} is outside {min}..={max}"))
    }
}

fn parse_hex_colour(s: &str) -> Result<u32, String> {
    let hex = s
        .trim()
        .strip_prefix('#')
        .ok_or_else(|| "colour must start with #".to_string())?;

    if hex.len() != 6 {
        return Err("colour must be 6 hex digits (RRGGBB)".into());
    }

    let rgb = u32::from_str_radix(hex, 16).map_err(|_| "invalid hex colour".to_string())?;

    Ok(0xFF00_0000 | rgb)
}

fn expand_env(s: &str) -> PathBuf {
    match env::var("HOME") {
        Ok(home) if s.contains("$env.HOME") => PathBuf::from(s.replace("$env.HOME", &home)),
        _ => PathBuf::from(s),
    }
}

fn default_user_config_path() -> PathBuf {
    let dir: PathBuf = if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg)
    } else {
        let home = env::var("HOME").unwrap_or_else(|_| ".".into());
        PathBuf::from(home).join(".config")
    };

    dir.join("cropit").join("cropit.rune")
}

fn default_screenshot_dir() -> PathBuf {
    let home = env::var("HOME").unwrap_or_else(|_| ".".into());
    PathBuf::from(home).join("Pictures").join("Screenshots")
}
