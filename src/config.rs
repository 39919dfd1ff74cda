//! Configuration file support.
//!
//! Holds the project languages, slot limits and the text and bubble render
//! settings, serialized as JSON. Native builds keep the file in the platform
//! config directory, browser builds in `localStorage`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::bubble::TieBreak;
use crate::constants;

/// Verbosity of the `log` facade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level(&self) -> log::Level {
        match self {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }

    pub fn to_level_filter(&self) -> log::LevelFilter {
        self.to_level().to_level_filter()
    }
}

/// Format version written by this build; files with a higher one are refused.
pub const CONFIG_VERSION: u32 = 1;

/// Directory below the platform config dir holding the config file.
#[cfg(not(target_arch = "wasm32"))]
const CONFIG_DIR: &str = "scanlet";

/// Config file name.
#[cfg(not(target_arch = "wasm32"))]
const CONFIG_FILE: &str = "scanlet-config.json";

/// `localStorage` key of the browser copy of the config.
#[cfg(target_arch = "wasm32")]
const STORAGE_KEY: &str = "scanlet-config";

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// User preferences
    #[serde(default)]
    pub preferences: UserPreferences,

    /// Project language codes; the first one is the fallback language
    #[serde(default = "default_langs")]
    pub langs: Vec<String>,

    /// Index into `langs` of the language shown by default
    #[serde(default)]
    pub primary_lang: usize,

    /// Number of text slot editors per panel
    #[serde(default = "default_max_slots")]
    pub max_slots: usize,

    /// Classification of bubble pointers lying exactly on a box diagonal
    #[serde(default)]
    pub tie_break: TieBreak,

    /// Text and bubble render settings
    #[serde(default)]
    pub render: RenderSettings,
}

fn default_langs() -> Vec<String> {
    constants::DEFAULT_LANGS
        .iter()
        .map(|l| l.to_string())
        .collect()
}

fn default_max_slots() -> usize {
    constants::DEFAULT_MAX_SLOTS
}

/// User preferences section of the config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserPreferences {
    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Sizes, classes and styles used when rendering panel overlays.
///
/// Lengths in `*_cm_a4` are measured on an A4 page and scaled by
/// `px_per_cm` of the scanned sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Scan resolution of the sheet
    pub px_per_cm: f64,
    pub font_size_cm_a4: f64,
    pub per_line_dy_cm_a4: f64,
    /// Per-sheet multiplier for font size and line height; ignored when zero
    pub font_factor: f64,
    pub box_poly_stroke_width_cm: f64,
    /// Line indent for text inside bubbles
    pub box_poly_dx_cm_a4: f64,
    /// Vertical offset of text inside bubbles
    pub box_poly_top_px: i32,
    pub cls_box_poly: String,
    pub tspan_css_cls: String,
    /// Extra inline tags, mapped to the CSS of their tspans
    pub tspan_sub_tag_styles: BTreeMap<String, String>,
    /// CSS declarations per `.class`, inlined into line tspans
    pub css: BTreeMap<String, BTreeMap<String, String>>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            px_per_cm: constants::DEFAULT_PX_PER_CM,
            font_size_cm_a4: constants::DEFAULT_FONT_SIZE_CM_A4,
            per_line_dy_cm_a4: constants::DEFAULT_PER_LINE_DY_CM_A4,
            font_factor: 0.0,
            box_poly_stroke_width_cm: constants::DEFAULT_BOX_POLY_STROKE_WIDTH_CM,
            box_poly_dx_cm_a4: constants::DEFAULT_BOX_POLY_DX_CM_A4,
            box_poly_top_px: 0,
            cls_box_poly: constants::DEFAULT_CLS_BOX_POLY.to_string(),
            tspan_css_cls: constants::DEFAULT_TSPAN_CSS_CLS.to_string(),
            tspan_sub_tag_styles: BTreeMap::new(),
            css: BTreeMap::new(),
        }
    }
}

impl RenderSettings {
    fn scale(&self) -> f64 {
        if self.font_factor > 0.01 {
            self.font_factor
        } else {
            1.0
        }
    }

    /// Font size in pixels.
    pub fn font_px(&self) -> i32 {
        (self.px_per_cm * self.font_size_cm_a4 * self.scale() * constants::FONT_SIZE_FACTOR) as i32
    }

    /// Line height in pixels; story titles get extra spacing.
    pub fn line_px(&self, story_title: bool) -> i32 {
        let mut dy = self.per_line_dy_cm_a4 * self.scale();
        if story_title {
            dy *= constants::STORY_TITLE_LINE_FACTOR;
        }
        (self.px_per_cm * dy) as i32
    }

    /// Bubble outline stroke width, also the inset of the outline.
    pub fn stroke_px(&self) -> i32 {
        (self.px_per_cm * self.box_poly_stroke_width_cm) as i32
    }

    /// Distance of a bubble tail from the nearest corner, half a centimetre.
    pub fn notch_px(&self) -> i32 {
        (self.px_per_cm / 2.0) as i32
    }

    /// Line indent inside bubbles.
    pub fn line_indent_px(&self) -> i32 {
        (self.px_per_cm * self.box_poly_dx_cm_a4) as i32
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            preferences: UserPreferences::default(),
            langs: default_langs(),
            primary_lang: 0,
            max_slots: default_max_slots(),
            tie_break: TieBreak::default(),
            render: RenderSettings::default(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse and validate a config document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                found: config.version,
                supported: CONFIG_VERSION,
            });
        }
        if config.langs.is_empty() {
            return Err(ConfigError::NoLanguages);
        }
        Ok(config)
    }

    /// `<config dir>/scanlet/scanlet-config.json`, with `~/.config` standing
    /// in on platforms without a config dir.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<std::path::PathBuf> {
        dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let config = Self::from_json(&std::fs::read_to_string(path)?)?;
        log::info!("Config loaded from {}", path.display());
        Ok(config)
    }

    /// The config at [`default_path`](Self::default_path), if there is a
    /// readable one. A broken file is logged and ignored.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        match Self::load(&path) {
            Ok(config) => Some(config),
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No config at {}", path.display());
                None
            }
            Err(e) => {
                log::warn!("Ignoring config {}: {}", path.display(), e);
                None
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_default_path(&self) -> Result<(), ConfigError> {
        let path = Self::default_path().ok_or(ConfigError::NoConfigDir)?;
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(&path, self.to_json()?)?;
        log::info!("Config saved to {}", path.display());
        Ok(())
    }

    /// The config kept in `localStorage`, if present and valid.
    #[cfg(target_arch = "wasm32")]
    pub fn load_from_local_storage() -> Option<Self> {
        let json = local_storage()
            .and_then(|storage| {
                storage
                    .get_item(STORAGE_KEY)
                    .map_err(|e| ConfigError::Storage(format!("{:?}", e)))
            })
            .map_err(|e| log::warn!("Config not readable: {}", e))
            .ok()??;

        match Self::from_json(&json) {
            Ok(config) => {
                log::info!("Config loaded from localStorage");
                Some(config)
            }
            Err(e) => {
                log::warn!("Ignoring stored config: {}", e);
                None
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn save_to_local_storage(&self) -> Result<(), ConfigError> {
        local_storage()?
            .set_item(STORAGE_KEY, &self.to_json()?)
            .map_err(|e| ConfigError::Storage(format!("{:?}", e)))?;
        log::info!("Config saved to localStorage");
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Result<web_sys::Storage, ConfigError> {
    web_sys::window()
        .ok_or_else(|| ConfigError::Storage("no window".to_string()))?
        .local_storage()
        .map_err(|e| ConfigError::Storage(format!("{:?}", e)))?
        .ok_or_else(|| ConfigError::Storage("localStorage disabled".to_string()))
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors loading or saving the config.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("config version {found} is newer than supported version {supported}")]
    VersionTooNew { found: u32, supported: u32 },

    #[error("config lists no languages")]
    NoLanguages,

    #[error("no config directory on this platform")]
    NoConfigDir,

    #[error("config I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("config storage: {0}")]
    Storage(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_roundtrip() {
        let mut config = AppConfig::new();
        config.tie_break = TieBreak::Strict;
        config
            .render
            .tspan_sub_tag_styles
            .insert("shout".to_string(), "font-size: 120%".to_string());

        let json = config.to_json().expect("serialize");
        let loaded = AppConfig::from_json(&json).expect("deserialize");
        assert_eq!(loaded.tie_break, TieBreak::Strict);
        assert_eq!(loaded.render, config.render);
        assert_eq!(loaded.langs, vec!["en", "de"]);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let config = AppConfig::from_json(r#"{ "version": 1, "render": { "px_per_cm": 50.0 } }"#)
            .expect("minimal config");
        assert_eq!(config.render.px_per_cm, 50.0);
        assert_eq!(config.render.cls_box_poly, "pt");
        assert_eq!(config.max_slots, constants::DEFAULT_MAX_SLOTS);
        assert_eq!(config.tie_break, TieBreak::VerticalWins);
        assert_eq!(config.preferences.log_level, LogLevel::Info);
    }

    #[test]
    fn test_rejects_newer_version() {
        let err = AppConfig::from_json(r#"{ "version": 99 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::VersionTooNew { found: 99, .. }));
    }

    #[test]
    fn test_rejects_empty_languages() {
        let err = AppConfig::from_json(r#"{ "version": 1, "langs": [] }"#).unwrap_err();
        assert!(matches!(err, ConfigError::NoLanguages));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_default_path_layout() {
        if let Some(path) = AppConfig::default_path() {
            assert!(path.ends_with("scanlet/scanlet-config.json"));
        }
    }

    #[test]
    fn test_pixel_sizes() {
        let render = RenderSettings {
            px_per_cm: 100.0,
            font_size_cm_a4: 0.5,
            per_line_dy_cm_a4: 0.6,
            box_poly_stroke_width_cm: 0.05,
            box_poly_dx_cm_a4: 0.2,
            ..RenderSettings::default()
        };
        assert_eq!(render.font_px(), 49);
        assert_eq!(render.line_px(false), 60);
        assert_eq!(render.line_px(true), 73);
        assert_eq!(render.stroke_px(), 5);
        assert_eq!(render.notch_px(), 50);
        assert_eq!(render.line_indent_px(), 20);

        let doubled = RenderSettings {
            font_factor: 2.0,
            ..render
        };
        assert_eq!(doubled.line_px(false), 120);
    }
}
