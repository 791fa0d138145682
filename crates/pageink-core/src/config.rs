//! Session configuration loaded from JSON.

use crate::color::BrushColor;
use crate::error::{Result, WhiteboardError};
use crate::input::ToolMode;
use crate::surface::DEFAULT_BRUSH_WIDTH;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default zoom applied to every page after loading.
pub const DEFAULT_INITIAL_ZOOM: f64 = 1.25;
/// Default topic the color picker publishes on.
pub const DEFAULT_COLOR_TOPIC: &str = "home";
/// Default id of the element hosting the surfaces.
pub const DEFAULT_MOUNT_TARGET: &str = "whiteboards-container";

/// Configuration for a whiteboard session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhiteboardConfig {
    /// Page background images, in page order.
    pub pages: Vec<PathBuf>,
    pub initial_zoom: f64,
    pub brush_color: BrushColor,
    pub brush_width: f64,
    pub mode: ToolMode,
    pub color_topic: String,
    pub mount_target: String,
    /// Width of the mount target for hosts that do not measure it.
    pub viewport_width: f64,
}

impl Default for WhiteboardConfig {
    fn default() -> Self {
        Self {
            pages: Vec::new(),
            initial_zoom: DEFAULT_INITIAL_ZOOM,
            brush_color: BrushColor::default(),
            brush_width: DEFAULT_BRUSH_WIDTH,
            mode: ToolMode::default(),
            color_topic: DEFAULT_COLOR_TOPIC.to_string(),
            mount_target: DEFAULT_MOUNT_TARGET.to_string(),
            viewport_width: 1024.0,
        }
    }
}

impl WhiteboardConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| WhiteboardError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file. Relative page paths resolve against the file's directory.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let mut config = Self::from_json_str(&json)?;
        if let Some(base) = path.parent() {
            for page in &mut config.pages {
                if page.is_relative() {
                    *page = base.join(&*page);
                }
            }
        }
        log::info!("Loaded config from {:?} ({} pages)", path, config.pages.len());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| WhiteboardError::Config(e.to_string()))
    }

    fn validate(&self) -> Result<()> {
        if !(self.initial_zoom > 0.0 && self.initial_zoom.is_finite()) {
            return Err(WhiteboardError::Config(format!(
                "initial_zoom must be positive, got {}",
                self.initial_zoom
            )));
        }
        if !(self.brush_width > 0.0 && self.brush_width.is_finite()) {
            return Err(WhiteboardError::Config(format!(
                "brush_width must be positive, got {}",
                self.brush_width
            )));
        }
        if !(self.viewport_width > 0.0 && self.viewport_width.is_finite()) {
            return Err(WhiteboardError::Config(format!(
                "viewport_width must be positive, got {}",
                self.viewport_width
            )));
        }
        Ok(())
    }
}
