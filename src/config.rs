use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub navigation: NavigationConfig,
    pub drag: DragConfig,
    pub grid: GridConfig,
    pub zoom: ZoomConfig,
    pub runtime: RuntimeConfig,
    pub cache: CacheConfig,
    pub keymap: KeymapConfig,
    pub contact: ContactConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NavigationConfig {
    pub load_timeout_ms: u64,
    pub crossfade_ms: u64,
    pub autoplay: bool,
    pub autoplay_interval_ms: u64,
    pub ken_burns: bool,
    pub preload_neighbors: bool,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            load_timeout_ms: 10_000,
            crossfade_ms: 400,
            autoplay: true,
            autoplay_interval_ms: 5_000,
            ken_burns: true,
            preload_neighbors: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DragConfig {
    pub distance_threshold_px: f64,
    pub flick_velocity_px_per_ms: f64,
    pub min_opacity: f64,
    pub snap_back_ms: u64,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            distance_threshold_px: 100.0,
            flick_velocity_px_per_ms: 0.5,
            min_opacity: 0.3,
            snap_back_ms: 250,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GridConfig {
    pub page_size: usize,
    pub columns: usize,
    pub max_visible_pages: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            page_size: 12,
            columns: 4,
            max_visible_pages: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ZoomConfig {
    pub min: f32,
    pub max: f32,
    pub initial: f32,
    pub wheel_step: f32,
    pub key_step: f32,
    pub pan_step: f32,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min: 1.0,
            max: 3.0,
            initial: 1.5,
            wheel_step: 0.1,
            key_step: 0.2,
            pan_step: 0.05,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RuntimeConfig {
    pub worker_threads: usize,
    pub input_poll_timeout_idle_ms: u64,
    pub input_poll_timeout_busy_ms: u64,
    pub pending_redraw_interval_ms: u64,
    pub toast_ms: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            worker_threads: 3,
            input_poll_timeout_idle_ms: 16,
            input_poll_timeout_busy_ms: 8,
            pending_redraw_interval_ms: 33,
            toast_ms: 3_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CacheConfig {
    pub image_memory_budget_mb: usize,
    pub image_max_entries: usize,
    pub frame_memory_budget_mb: usize,
    pub frame_max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            image_memory_budget_mb: 256,
            image_max_entries: 64,
            frame_memory_budget_mb: 64,
            frame_max_entries: 96,
        }
    }
}

impl CacheConfig {
    const MEBIBYTE: usize = 1024 * 1024;

    pub fn image_memory_budget_bytes(&self) -> usize {
        self.image_memory_budget_mb
            .saturating_mul(Self::MEBIBYTE)
            .max(1)
    }

    pub fn frame_memory_budget_bytes(&self) -> usize {
        self.frame_memory_budget_mb
            .saturating_mul(Self::MEBIBYTE)
            .max(1)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct KeymapConfig {
    pub preset: String,
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            preset: "default".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ContactConfig {
    pub email: String,
    /// Program used to open mailto and print links. Empty means the platform default.
    pub opener: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            email: "contact@example.com".to_string(),
            opener: String::new(),
        }
    }
}

impl Config {
    /// Reads the config from [`default_config_path`], or defaults when there is none.
    pub fn load() -> AppResult<Self> {
        match default_config_path() {
            Some(path) => Self::load_from_path(path),
            None => Ok(Self::default()),
        }
    }

    /// A missing file yields defaults. Out-of-range values are replaced, not rejected.
    pub fn load_from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        match fs::metadata(path) {
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Ok(meta) if !meta.is_file() => {
                return Err(AppError::invalid_argument(format!(
                    "config path is not a regular file: {}",
                    path.display()
                )));
            }
            _ => {}
        }

        let raw = fs::read_to_string(path).map_err(|source| {
            AppError::io_with_context(source, format!("failed to read config: {}", path.display()))
        })?;
        let parsed: Self = toml::from_str(&raw).map_err(|source| {
            AppError::invalid_argument(format!("invalid config {}: {source}", path.display()))
        })?;
        Ok(parsed.sanitized())
    }

    fn sanitized(mut self) -> Self {
        let nav_defaults = NavigationConfig::default();
        if self.navigation.load_timeout_ms == 0 {
            self.navigation.load_timeout_ms = nav_defaults.load_timeout_ms;
        }
        self.navigation.crossfade_ms = self.navigation.crossfade_ms.max(1);
        self.navigation.autoplay_interval_ms = self.navigation.autoplay_interval_ms.max(1);

        let drag_defaults = DragConfig::default();
        if !positive_finite(self.drag.distance_threshold_px) {
            self.drag.distance_threshold_px = drag_defaults.distance_threshold_px;
        }
        if !positive_finite(self.drag.flick_velocity_px_per_ms) {
            self.drag.flick_velocity_px_per_ms = drag_defaults.flick_velocity_px_per_ms;
        }
        if !self.drag.min_opacity.is_finite() || !(0.0..=1.0).contains(&self.drag.min_opacity) {
            self.drag.min_opacity = drag_defaults.min_opacity;
        }
        self.drag.snap_back_ms = self.drag.snap_back_ms.max(1);

        self.grid.page_size = self.grid.page_size.max(1);
        self.grid.columns = self.grid.columns.max(1);
        self.grid.max_visible_pages = self.grid.max_visible_pages.max(3);

        let zoom_defaults = ZoomConfig::default();
        if !self.zoom.min.is_finite() || self.zoom.min < 1.0 {
            self.zoom.min = zoom_defaults.min;
        }
        if !self.zoom.max.is_finite() || self.zoom.max < self.zoom.min {
            self.zoom.max = zoom_defaults.max.max(self.zoom.min);
        }
        if !self.zoom.initial.is_finite() {
            self.zoom.initial = zoom_defaults.initial;
        }
        self.zoom.initial = self.zoom.initial.clamp(self.zoom.min, self.zoom.max);
        for (step, default) in [
            (&mut self.zoom.wheel_step, zoom_defaults.wheel_step),
            (&mut self.zoom.key_step, zoom_defaults.key_step),
            (&mut self.zoom.pan_step, zoom_defaults.pan_step),
        ] {
            if !step.is_finite() || *step <= 0.0 {
                *step = default;
            }
        }

        self.runtime.worker_threads = self.runtime.worker_threads.max(1);
        self.runtime.input_poll_timeout_idle_ms = self.runtime.input_poll_timeout_idle_ms.max(1);
        self.runtime.input_poll_timeout_busy_ms = self.runtime.input_poll_timeout_busy_ms.max(1);
        self.runtime.pending_redraw_interval_ms = self.runtime.pending_redraw_interval_ms.max(1);
        self.runtime.toast_ms = self.runtime.toast_ms.max(1);
        self
    }
}

fn positive_finite(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

const APP_DIR: &str = "folio";

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var_os(name)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// `$FOLIO_CONFIG_PATH`, else `config.toml` under the XDG, home or AppData config dir.
pub fn default_config_path() -> Option<PathBuf> {
    if let Some(explicit) = env_path("FOLIO_CONFIG_PATH") {
        return Some(explicit);
    }
    let base = env_path("XDG_CONFIG_HOME")
        .or_else(|| env_path("HOME").map(|home| home.join(".config")))
        .or_else(|| env_path("APPDATA"))?;
    Some(base.join(APP_DIR).join("config.toml"))
}

/// Directory for the state file and the log file.
pub fn default_state_dir() -> Option<PathBuf> {
    let base = env_path("XDG_STATE_HOME")
        .or_else(|| env_path("HOME").map(|home| home.join(".local").join("state")))
        .or_else(|| env_path("APPDATA"))?;
    Some(base.join(APP_DIR))
}

pub fn default_state_path() -> Option<PathBuf> {
    env_path("FOLIO_STATE_PATH").or_else(|| default_state_dir().map(|dir| dir.join("state.json")))
}
#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::process;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::Config;

    fn unique_temp_path(suffix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!("folio_config_{suffix}_{}_{}", process::id(), nanos));
        path
    }

    #[test]
    fn load_from_path_returns_defaults_for_missing_file() {
        let missing = unique_temp_path("missing.toml");
        let config = Config::load_from_path(&missing).expect("missing config should fallback");
        assert_eq!(config, Config::default());
        assert_eq!(config.navigation.load_timeout_ms, 10_000);
        assert_eq!(config.drag.distance_threshold_px, 100.0);
        assert_eq!(config.grid.page_size, 12);
    }

    #[test]
    fn load_from_path_applies_partial_overrides_and_sanitizes() {
        let path = unique_temp_path("custom.toml");
        fs::write(
            &path,
            r#"
            [navigation]
            autoplay = false
            crossfade_ms = 0

            [drag]
            distance_threshold_px = -5.0
            flick_velocity_px_per_ms = 0.8
            min_opacity = 1.5

            [grid]
            page_size = 0
            columns = 0

            [zoom]
            max = 0.5
            initial = 9.0

            [runtime]
            worker_threads = 0

            [contact]
            email = "studio@example.org"
            "#,
        )
        .expect("config file should be written");

        let config = Config::load_from_path(&path).expect("config should parse");
        assert!(!config.navigation.autoplay);
        assert_eq!(config.navigation.crossfade_ms, 1);
        assert_eq!(config.navigation.load_timeout_ms, 10_000);
        assert_eq!(config.drag.distance_threshold_px, 100.0);
        assert_eq!(config.drag.flick_velocity_px_per_ms, 0.8);
        assert_eq!(config.drag.min_opacity, 0.3);
        assert_eq!(config.grid.page_size, 1);
        assert_eq!(config.grid.columns, 1);
        assert_eq!(config.zoom.max, 3.0);
        assert_eq!(config.zoom.initial, 3.0);
        assert_eq!(config.runtime.worker_threads, 1);
        assert_eq!(config.contact.email, "studio@example.org");
        assert_eq!(config.cache.image_max_entries, 64);

        fs::remove_file(&path).expect("config file should be removed");
    }

    #[test]
    fn load_from_path_rejects_directories() {
        let dir = std::env::temp_dir();
        assert!(Config::load_from_path(dir).is_err());
    }
}
