//! # Graph Configuration
//!
//! [`GraphConfig`] holds everything the viewport controller is constructed
//! with: grid span, zoom bounds, wheel sensitivity, the initial view, colours
//! and the nodes seeded on startup.
//!
//! ## Sources
//! 1. `$NODE_CANVAS_CONFIG` if set
//! 2. `<config_dir>/node-canvas/config.json` if it exists
//! 3. Built-in defaults

use crate::editor::style::EditorStyle;
use crate::graph::NodeOptions;
use crate::node_types::NodeKind;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_ENV_VAR: &str = "NODE_CANVAS_CONFIG";

/// Invalid construction options or config file contents.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {name}: {value}")]
    InvalidDimension { name: &'static str, value: f32 },
    #[error("Invalid grid span: {0}")]
    InvalidSpan(f32),
    #[error("Invalid zoom bounds: min {min}, max {max}")]
    InvalidZoomBounds { min: f32, max: f32 },
    #[error("Zoom level {level} outside [{min}, {max}]")]
    ZoomOutOfRange { level: f32, min: f32, max: f32 },
    #[error("Invalid wheel zoom base: {0}")]
    InvalidWheelBase(f32),
    #[error("Invalid color: {0:?}")]
    InvalidColor(String),
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GraphConfig {
    /// Minor grid spacing in canvas units.
    pub grid_span: f32,
    pub zoom_min: f32,
    pub zoom_max: f32,
    /// Wheel zoom factor per unit of scroll delta.
    pub wheel_zoom_base: f32,
    pub initial_zoom: f32,
    pub initial_position: (f32, f32),
    pub style: EditorStyle,
    pub demo_nodes: Vec<NodeOptions>,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            grid_span: 16.0,
            zoom_min: 0.5,
            zoom_max: 2.0,
            wheel_zoom_base: 0.999,
            initial_zoom: 1.0,
            initial_position: (100.0, 100.0),
            style: EditorStyle::default(),
            demo_nodes: vec![
                NodeOptions::new("Awesome Function 1"),
                NodeOptions::new("Awesome Function 2"),
                NodeOptions::new("Awesome Event 1")
                    .with_kind(NodeKind::Event)
                    .at(300.0, 300.0),
            ],
        }
    }
}

impl GraphConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.grid_span.is_finite() || self.grid_span <= 0.0 {
            return Err(ConfigError::InvalidSpan(self.grid_span));
        }
        let (min, max) = (self.zoom_min, self.zoom_max);
        if !min.is_finite() || !max.is_finite() || min <= 0.0 || min > max {
            return Err(ConfigError::InvalidZoomBounds { min, max });
        }
        if !self.wheel_zoom_base.is_finite() || self.wheel_zoom_base <= 0.0 {
            return Err(ConfigError::InvalidWheelBase(self.wheel_zoom_base));
        }
        if !(min..=max).contains(&self.initial_zoom) {
            return Err(ConfigError::ZoomOutOfRange {
                level: self.initial_zoom,
                min,
                max,
            });
        }
        let (x, y) = self.initial_position;
        for (name, value) in [("initial_position.x", x), ("initial_position.y", y)] {
            if !value.is_finite() {
                return Err(ConfigError::InvalidDimension { name, value });
            }
        }
        self.style.validate()
    }

    /// Clamp a zoom level into the configured bounds.
    pub fn clamp_zoom(&self, level: f32) -> f32 {
        level.clamp(self.zoom_min, self.zoom_max)
    }

    pub fn accepts_zoom(&self, level: f32) -> bool {
        level.is_finite() && level >= self.zoom_min && level <= self.zoom_max
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }
}

/// Default location of the user config file.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("node-canvas").join("config.json"))
}

/// Resolve and load the configuration for this session.
pub fn load() -> anyhow::Result<GraphConfig> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        let path = PathBuf::from(path);
        log::info!("Loading config from ${CONFIG_ENV_VAR}: {}", path.display());
        return GraphConfig::load_from(&path)
            .with_context(|| format!("loading config from {}", path.display()));
    }
    match default_config_path() {
        Some(path) if path.exists() => {
            log::info!("Loading config from {}", path.display());
            GraphConfig::load_from(&path)
                .with_context(|| format!("loading config from {}", path.display()))
        }
        _ => {
            log::info!("No config file found, using defaults");
            Ok(GraphConfig::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = GraphConfig::default();
        config.validate().unwrap();
        assert_eq!(config.grid_span, 16.0);
        assert_eq!((config.zoom_min, config.zoom_max), (0.5, 2.0));
        assert_eq!(config.demo_nodes.len(), 3);
    }

    #[test]
    fn rejects_inverted_zoom_bounds() {
        let config = GraphConfig {
            zoom_min: 3.0,
            zoom_max: 1.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidZoomBounds { .. })
        ));
    }

    #[test]
    fn rejects_bad_span_and_wheel_base() {
        let config = GraphConfig {
            grid_span: -16.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidSpan(_))));

        let config = GraphConfig {
            wheel_zoom_base: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidWheelBase(_))));
    }

    #[test]
    fn rejects_initial_zoom_outside_bounds() {
        let config = GraphConfig {
            initial_zoom: 4.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZoomOutOfRange { .. })
        ));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = GraphConfig::from_json(r#"{ "grid_span": 20, "zoom_max": 3 }"#).unwrap();
        assert_eq!(config.grid_span, 20.0);
        assert_eq!(config.zoom_max, 3.0);
        assert_eq!(config.zoom_min, 0.5);
        assert_eq!(config.style, EditorStyle::default());
    }

    #[test]
    fn partial_style_keeps_default_header_colors() {
        let config = GraphConfig::from_json(r#"{ "style": { "font_size": 14 } }"#).unwrap();
        assert_eq!(config.style.font_size, 14.0);
        assert_eq!(config.style.header_colors, EditorStyle::default().header_colors);
        assert_eq!(config.style.grid, EditorStyle::default().grid);
    }

    #[test]
    fn json_with_bad_color_is_rejected() {
        let text = r##"{ "style": { "header_colors": { "Event": "not-a-color" } } }"##;
        assert!(matches!(
            GraphConfig::from_json(text),
            Err(ConfigError::InvalidColor(_))
        ));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            GraphConfig::from_json("{ grid_span: "),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = GraphConfig::load_from(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }

    #[test]
    fn zoom_gate_is_inclusive() {
        let config = GraphConfig::default();
        assert!(config.accepts_zoom(0.5));
        assert!(config.accepts_zoom(2.0));
        assert!(!config.accepts_zoom(0.4));
        assert!(!config.accepts_zoom(f32::NAN));
        assert_eq!(config.clamp_zoom(9.0), 2.0);
    }
}
