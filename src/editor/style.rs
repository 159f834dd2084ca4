//! Editor styling and constants.
//!
//! Contains EditorStyle, colour constants for nodes and the grid, and the
//! colour-string parser used to validate configured colours.

use crate::config::ConfigError;
use crate::node_types::NodeKind;
use egui::Color32;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Dark base shared by node bodies and the tail of header gradients.
pub const BASE_COLOR: Color32 = Color32::from_rgb(17, 17, 17);
/// Outline stroked around every node.
pub const OUTLINE_COLOR: Color32 = Color32::from_rgb(3, 3, 3);
pub const TITLE_COLOR: Color32 = Color32::from_rgb(254, 254, 254);
/// Border drawn around the active node.
pub const SELECTION_BORDER_COLOR: Color32 = Color32::from_rgb(0xEA, 0xA5, 0x00);

pub const NODE_OPACITY: f32 = 0.95;
pub const CORNER_RADIUS: f32 = 10.0;
pub const OUTLINE_WIDTH: f32 = 2.0;

/// Title inset from the node's left edge.
pub const TITLE_X: f32 = 26.0;
/// Horizontal shift of the second title stroke that thickens it to bold.
pub const TITLE_BOLD_OFFSET: f32 = 0.6;
/// Space kept to the right of the title.
pub const TITLE_RIGHT_PADDING: f32 = 32.0;

/// Selection border width per unit of zoom.
pub const BORDER_SCALE_PER_ZOOM: f32 = 4.0;

/// Colours of the background grid tile.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GridStyle {
    #[serde(default = "default_ruler_color")]
    pub ruler_color: String,
    #[serde(default = "default_regular_color")]
    pub regular_color: String,
    #[serde(default = "default_background_color")]
    pub background_color: String,
}

fn default_ruler_color() -> String {
    "#020202".into()
}

fn default_regular_color() -> String {
    "#363636".into()
}

fn default_background_color() -> String {
    "#272726".into()
}

impl Default for GridStyle {
    fn default() -> Self {
        Self {
            ruler_color: default_ruler_color(),
            regular_color: default_regular_color(),
            background_color: default_background_color(),
        }
    }
}

/// Visual styling configuration for the graph editor.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EditorStyle {
    #[serde(default = "default_header_colors")]
    pub header_colors: HashMap<String, String>,
    #[serde(default)]
    pub grid: GridStyle,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
}

fn default_font_size() -> f32 {
    13.0
}

fn default_header_colors() -> HashMap<String, String> {
    let mut map = HashMap::new();
    map.insert(NodeKind::Function.name().into(), "rgb(31, 149, 255)".into());
    map.insert(NodeKind::Event.name().into(), "#FF0000".into());
    map
}

impl Default for EditorStyle {
    fn default() -> Self {
        Self {
            header_colors: default_header_colors(),
            grid: GridStyle::default(),
            font_size: default_font_size(),
        }
    }
}

impl EditorStyle {
    /// Configured header colour string for a node kind, if any.
    pub fn header_color(&self, kind: NodeKind) -> Option<&str> {
        self.header_colors.get(kind.name()).map(String::as_str)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for color in self.header_colors.values() {
            parse_color(color)?;
        }
        parse_color(&self.grid.ruler_color)?;
        parse_color(&self.grid.regular_color)?;
        parse_color(&self.grid.background_color)?;
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(ConfigError::InvalidDimension {
                name: "font_size",
                value: self.font_size,
            });
        }
        Ok(())
    }
}

/// Parse a CSS-style colour: `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)`
/// or `rgba(r, g, b, a)` with `a` in `0..=1`.
pub fn parse_color(input: &str) -> Result<Color32, ConfigError> {
    let invalid = || ConfigError::InvalidColor(input.to_string());
    let s = input.trim();

    if let Some(hex) = s.strip_prefix('#') {
        let expanded: String = match hex.len() {
            3 | 4 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 | 8 => hex.to_string(),
            _ => return Err(invalid()),
        };
        return Color32::from_hex(&format!("#{expanded}")).map_err(|_| invalid());
    }

    let lower = s.to_ascii_lowercase();
    let (body, with_alpha) = if let Some(rest) = lower.strip_prefix("rgba(") {
        (rest, true)
    } else if let Some(rest) = lower.strip_prefix("rgb(") {
        (rest, false)
    } else {
        return Err(invalid());
    };
    let body = body.strip_suffix(')').ok_or_else(invalid)?;
    let parts: Vec<&str> = body.split(',').map(str::trim).collect();
    if parts.len() != if with_alpha { 4 } else { 3 } {
        return Err(invalid());
    }

    let mut channels = [0u8; 3];
    for (slot, part) in channels.iter_mut().zip(&parts) {
        let value: f32 = part.parse().map_err(|_| invalid())?;
        if !(0.0..=255.0).contains(&value) {
            return Err(invalid());
        }
        *slot = value.round() as u8;
    }
    let alpha = if with_alpha {
        let a: f32 = parts[3].parse().map_err(|_| invalid())?;
        if !(0.0..=1.0).contains(&a) {
            return Err(invalid());
        }
        (a * 255.0).round() as u8
    } else {
        255
    };
    Ok(Color32::from_rgba_unmultiplied(
        channels[0],
        channels[1],
        channels[2],
        alpha,
    ))
}

/// Same colour with its alpha replaced by `opacity`.
pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
    let [r, g, b, _] = color.to_srgba_unmultiplied();
    Color32::from_rgba_unmultiplied(r, g, b, (opacity.clamp(0.0, 1.0) * 255.0).round() as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_forms() {
        assert_eq!(parse_color("#FF0000").unwrap(), Color32::from_rgb(255, 0, 0));
        assert_eq!(parse_color("#272726").unwrap(), Color32::from_rgb(0x27, 0x27, 0x26));
        assert_eq!(parse_color("#0f0").unwrap(), Color32::from_rgb(0, 255, 0));
    }

    #[test]
    fn parses_rgb_functions() {
        assert_eq!(
            parse_color("rgb(31, 149, 255)").unwrap(),
            Color32::from_rgb(31, 149, 255)
        );
        assert_eq!(
            parse_color(" RGBA(10,20,30,1) ").unwrap(),
            Color32::from_rgb(10, 20, 30)
        );
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["", "red", "#12", "#zzzzzz", "rgb(1,2)", "rgb(1,2,300)", "rgba(1,2,3,4)", "rgb(1,2,3"] {
            assert!(
                matches!(parse_color(bad), Err(ConfigError::InvalidColor(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn default_style_is_valid() {
        let style = EditorStyle::default();
        style.validate().unwrap();
        assert_eq!(style.header_color(NodeKind::Event), Some("#FF0000"));
    }

    #[test]
    fn opacity_replaces_alpha() {
        let c = with_opacity(Color32::from_rgb(31, 149, 255), NODE_OPACITY);
        let [r, g, b, a] = c.to_srgba_unmultiplied();
        assert_eq!(a, 242);
        // premultiplied storage may drift a step
        for (got, want) in [(r, 31), (g, 149), (b, 255)] {
            assert!((got as i32 - want).abs() <= 1, "{got} vs {want}");
        }
    }
}
