//! Coordinate transformation for the canvas view.
//!
//! Handles conversions between canvas coordinates (where nodes and the grid
//! tile live) and screen coordinates, accounting for zoom and the view
//! translation an anchored zoom introduces.

use egui::{Pos2, Rect, Vec2};

/// Uniform scale plus translation, applied after an entity's own position.
///
/// `screen = canvas * scale + translation`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    pub scale: f32,
    pub translation: Vec2,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            translation: Vec2::ZERO,
        }
    }
}

impl ViewTransform {
    /// Convert canvas coordinates to screen coordinates.
    pub fn to_screen(&self, pos: Pos2) -> Pos2 {
        (pos.to_vec2() * self.scale + self.translation).to_pos2()
    }

    /// Convert screen coordinates to canvas coordinates.
    pub fn from_screen(&self, screen_pos: Pos2) -> Pos2 {
        ((screen_pos.to_vec2() - self.translation) / self.scale).to_pos2()
    }

    /// Convert a canvas-space rectangle to screen space.
    pub fn rect_to_screen(&self, rect: Rect) -> Rect {
        Rect::from_min_max(self.to_screen(rect.min), self.to_screen(rect.max))
    }

    /// Change the scale so that the canvas point under `anchor` stays under it.
    ///
    /// Formula: new_translation = anchor - canvas_point * new_scale
    pub fn zoom_to_point(&mut self, anchor: Pos2, level: f32) {
        let before = self.from_screen(anchor);
        self.scale = level;
        self.translation = anchor.to_vec2() - before.to_vec2() * level;
    }

    /// Change the scale about the screen origin.
    pub fn set_zoom(&mut self, level: f32) {
        self.zoom_to_point(Pos2::ZERO, level);
    }

    /// The canvas-space rectangle visible through a screen of `size`.
    #[cfg(test)]
    pub fn visible_rect(&self, size: Vec2) -> Rect {
        Rect::from_min_max(self.from_screen(Pos2::ZERO), self.from_screen(size.to_pos2()))
    }

    /// Offset every produced screen position, e.g. by the canvas widget origin.
    pub fn offset_by(&self, offset: Vec2) -> Self {
        Self {
            scale: self.scale,
            translation: self.translation + offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Pos2, b: Pos2) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn identity_round_trip() {
        let t = ViewTransform::default();
        let p = Pos2::new(12.0, -7.5);
        assert_eq!(t.to_screen(p), p);
        assert_eq!(t.from_screen(p), p);
    }

    #[test]
    fn zoom_to_point_keeps_anchor_fixed() {
        let mut t = ViewTransform::default();
        let anchor = Pos2::new(400.0, 300.0);
        let under = t.from_screen(anchor);
        t.zoom_to_point(anchor, 2.0);
        assert!(close(t.to_screen(under), anchor));
        assert_eq!(t.scale, 2.0);
        assert!(close(t.from_screen(Pos2::ZERO), Pos2::new(200.0, 150.0)));
    }

    #[test]
    fn repeated_anchored_zooms_compose() {
        let mut t = ViewTransform::default();
        t.zoom_to_point(Pos2::new(100.0, 50.0), 1.5);
        let anchor = Pos2::new(640.0, 10.0);
        let under = t.from_screen(anchor);
        t.zoom_to_point(anchor, 0.75);
        assert!(close(t.to_screen(under), anchor));
    }

    #[test]
    fn set_zoom_scales_about_origin() {
        let mut t = ViewTransform::default();
        t.set_zoom(0.5);
        assert_eq!(t.translation, Vec2::ZERO);
        let visible = t.visible_rect(Vec2::new(800.0, 600.0));
        assert!(close(visible.max, Pos2::new(1600.0, 1200.0)));
    }

    #[test]
    fn offset_shifts_screen_positions_only() {
        let t = ViewTransform { scale: 2.0, translation: Vec2::new(5.0, 5.0) };
        let shifted = t.offset_by(Vec2::new(10.0, 20.0));
        assert_eq!(shifted.to_screen(Pos2::new(1.0, 1.0)), Pos2::new(17.0, 27.0));
    }
}
