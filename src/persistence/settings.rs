use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::warn;
use serde::Deserialize;

use crate::graph_utils::geometry::Scale;

const APP_DIR: &str = "Graph-Sketch";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AppSettings {
    // If None, use OS default state directory
    #[serde(default)]
    pub storage_override: Option<PathBuf>,
    // Visual units per logical unit
    #[serde(default = "AppSettings::default_scale")]
    pub scale_x: f64,
    #[serde(default = "AppSettings::default_scale")]
    pub scale_y: f64,
    #[serde(default = "AppSettings::default_node_radius")]
    pub node_radius: f32,
    #[serde(default = "AppSettings::default_resize_debounce_ms")]
    pub resize_debounce_ms: u64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            storage_override: None,
            scale_x: Self::default_scale(),
            scale_y: Self::default_scale(),
            node_radius: Self::default_node_radius(),
            resize_debounce_ms: Self::default_resize_debounce_ms(),
        }
    }
}

fn home_dir() -> PathBuf {
    std::env::var_os("HOME").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("~"))
}

fn env_dir(var: &str) -> Option<PathBuf> {
    std::env::var_os(var).map(PathBuf::from)
}

impl AppSettings {
    fn config_dir() -> PathBuf {
        if cfg!(target_os = "macos") {
            home_dir().join("Library").join("Application Support").join(APP_DIR)
        } else if cfg!(target_os = "windows") {
            env_dir("APPDATA").unwrap_or_default().join(APP_DIR)
        } else {
            env_dir("XDG_CONFIG_HOME").unwrap_or_else(|| home_dir().join(".config")).join(APP_DIR)
        }
    }

    // Saved graphs sit next to the settings except where the OS has a state dir
    fn storage_default_dir() -> PathBuf {
        if cfg!(all(unix, not(target_os = "macos"))) {
            env_dir("XDG_STATE_HOME")
                .unwrap_or_else(|| home_dir().join(".local").join("state"))
                .join("graph-sketch")
        } else {
            Self::config_dir().join("Storage")
        }
    }

    pub fn settings_path() -> PathBuf {
        Self::config_dir().join("settings.json")
    }

    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::settings_path())
    }

    /// Missing file means defaults; a present but broken file is an error.
    /// Unusable scale factors fall back to the default.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let s = fs::read_to_string(path)?;
        let v: Self = serde_json::from_str(&s)?;
        Ok(v.sanitized())
    }

    fn sanitized(mut self) -> Self {
        for (name, value) in [("scale_x", &mut self.scale_x), ("scale_y", &mut self.scale_y)] {
            if !value.is_finite() || *value <= 0.0 {
                warn!("ignoring {} = {} in settings, using {}", name, value, Self::default_scale());
                *value = Self::default_scale();
            }
        }
        self
    }

    pub fn storage_dir(&self) -> PathBuf {
        if let Some(p) = &self.storage_override { return p.clone(); }
        Self::storage_default_dir()
    }

    pub fn scale(&self) -> Scale {
        Scale::new(self.scale_x, self.scale_y)
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    pub(crate) fn default_scale() -> f64 { 1.0 }
    pub(crate) fn default_node_radius() -> f32 { 18.0 }
    pub(crate) fn default_resize_debounce_ms() -> u64 { 400 }
}
