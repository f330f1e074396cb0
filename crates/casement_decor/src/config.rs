//! Decoration configuration
//!
//! Loaded from TOML, then optionally overridden from the environment:
//!
//! ```toml
//! border_drag_thickness = 5
//! corner_drag_width = 16
//! border_corner_radius = 8
//! border_color = "#0078D4"
//! force_mode = "none"
//!
//! [[quirks]]
//! runtime = "winit"
//! corrections = ["device_origin", "device_size"]
//! ```

use std::time::Duration;

use casement_core::{Color, Size};
use serde::Deserialize;

use crate::accent::AccentColorSource;
use crate::error::{DecorError, Result};
use crate::maximize::{QuirkRule, QuirkTable};
use crate::resize::{HandleMetrics, MinimumSizePolicy};

/// Env var that turns custom decorations off (`false`/`0`) or on
pub const ENV_USE_WINDOW_DECORATIONS: &str = "CASEMENT_USE_WINDOW_DECORATIONS";
/// Env var that forces a decoration mode (`native`, `runtime`, `none`)
pub const ENV_DECORATION_MODE: &str = "CASEMENT_DECORATION_MODE";

/// Largest accepted `border_corner_radius`, logical px
pub const MAX_CORNER_RADIUS: f32 = 256.0;

/// Decoration mode requested by config
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForcedMode {
    Native,
    Runtime,
    None,
}

impl ForcedMode {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "native" => Some(ForcedMode::Native),
            "runtime" => Some(ForcedMode::Runtime),
            "none" | "overlay" => Some(ForcedMode::None),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct SizeConfig {
    pub width: f32,
    pub height: f32,
}

impl From<SizeConfig> for Size {
    fn from(size: SizeConfig) -> Self {
        Size::new(size.width, size.height)
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct DecorationConfig {
    pub border_drag_thickness: f32,
    pub corner_drag_width: f32,
    pub honor_minimum_size_on_resize: bool,
    pub fallback_minimum_size: SizeConfig,
    pub border_corner_radius: f32,
    pub border_width: f32,
    /// `#RRGGBB`; absent means follow the OS accent color
    pub border_color: Option<String>,
    pub accent_debounce_ms: u64,
    pub use_window_decorations: bool,
    pub force_mode: Option<ForcedMode>,
    /// Replaces the built-in maximized bounds quirk table
    pub quirks: Option<Vec<QuirkRule>>,
}

impl Default for DecorationConfig {
    fn default() -> Self {
        Self {
            border_drag_thickness: 5.0,
            corner_drag_width: 16.0,
            honor_minimum_size_on_resize: false,
            fallback_minimum_size: SizeConfig {
                width: 150.0,
                height: 50.0,
            },
            border_corner_radius: 8.0,
            border_width: 1.0,
            border_color: None,
            accent_debounce_ms: 300,
            use_window_decorations: true,
            force_mode: None,
            quirks: None,
        }
    }
}

impl DecorationConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: DecorationConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `CASEMENT_*` environment overrides
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup (environment, CLI, tests)
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(value) = lookup(ENV_USE_WINDOW_DECORATIONS) {
            self.use_window_decorations = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                other => {
                    return Err(DecorError::Config(format!(
                        "{ENV_USE_WINDOW_DECORATIONS}: expected a boolean, got {other:?}"
                    )))
                }
            };
        }
        if let Some(value) = lookup(ENV_DECORATION_MODE) {
            let mode = ForcedMode::parse(&value).ok_or_else(|| {
                DecorError::Config(format!("{ENV_DECORATION_MODE}: unknown mode {value:?}"))
            })?;
            self.force_mode = Some(mode);
        }
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        if self.border_drag_thickness < 0.0 || self.corner_drag_width < 0.0 {
            return Err(DecorError::Config("drag sizes must not be negative".into()));
        }
        if self.fallback_minimum_size.width <= 0.0 || self.fallback_minimum_size.height <= 0.0 {
            return Err(DecorError::Config("fallback_minimum_size must be positive".into()));
        }
        if !(0.0..=MAX_CORNER_RADIUS).contains(&self.border_corner_radius) {
            return Err(DecorError::Config(format!(
                "border_corner_radius must be within 0..={MAX_CORNER_RADIUS}"
            )));
        }
        if let Some(color) = &self.border_color {
            if Color::parse_hex(color).is_none() {
                return Err(DecorError::Config(format!("border_color {color:?} is not #RRGGBB")));
            }
        }
        Ok(())
    }

    pub fn handle_metrics(&self) -> HandleMetrics {
        HandleMetrics {
            thickness: self.border_drag_thickness,
            corner_width: self.corner_drag_width,
        }
    }

    pub fn minimum_size_policy(&self) -> MinimumSizePolicy {
        MinimumSizePolicy {
            honor_window_minimum: self.honor_minimum_size_on_resize,
            fallback: self.fallback_minimum_size.into(),
        }
    }

    pub fn accent_source(&self) -> AccentColorSource {
        self.border_color
            .as_deref()
            .and_then(Color::parse_hex)
            .map_or(AccentColorSource::System, AccentColorSource::Explicit)
    }

    pub fn accent_debounce(&self) -> Duration {
        Duration::from_millis(self.accent_debounce_ms)
    }

    pub fn quirk_table(&self) -> QuirkTable {
        match &self.quirks {
            Some(rules) => QuirkTable::new(rules.clone()),
            None => QuirkTable::builtin(),
        }
    }
}
