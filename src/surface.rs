//! # Drawing Surface
//!
//! The host-side half of the canvas: size, view transform (zoom and the
//! translation an anchored zoom leaves behind), the render list and redraw
//! requests. [`ViewportController`](crate::editor::ViewportController) only
//! talks to it through [`Surface`].

use crate::editor::coordinate_transform::ViewTransform;
use crate::render::EntityId;
use egui::{Pos2, Vec2};

pub trait Surface {
    /// Append an entity to the render list (drawn after everything before it).
    fn add(&mut self, id: EntityId);
    fn remove(&mut self, id: EntityId);
    /// Entities in draw order.
    fn render_list(&self) -> &[EntityId];

    /// Request a full redraw.
    fn render_all(&mut self);
    /// Consume a pending redraw request.
    fn take_redraw_request(&mut self) -> bool;

    fn width(&self) -> f32;
    fn height(&self) -> f32;
    fn set_size(&mut self, size: Vec2);

    fn zoom(&self) -> f32;
    /// Zoom about the screen origin.
    fn set_zoom(&mut self, level: f32);
    /// Zoom so the canvas point under `anchor` stays under it.
    fn zoom_to_point(&mut self, anchor: Pos2, level: f32);
    /// Back to unit zoom with no translation.
    fn reset_view(&mut self);
    fn view_transform(&self) -> ViewTransform;

    fn size(&self) -> Vec2 {
        Vec2::new(self.width(), self.height())
    }

    /// Screen point to canvas coordinates (the "absolute" pointer).
    fn screen_to_canvas(&self, screen: Pos2) -> Pos2 {
        self.view_transform().from_screen(screen)
    }

    fn canvas_to_screen(&self, canvas: Pos2) -> Pos2 {
        self.view_transform().to_screen(canvas)
    }

    /// Canvas-space top-left of the visible area.
    fn visible_origin(&self) -> Pos2 {
        self.screen_to_canvas(Pos2::ZERO)
    }
}

/// Surface state for an egui-painted canvas widget.
#[derive(Clone, Debug)]
pub struct CanvasSurface {
    size: Vec2,
    transform: ViewTransform,
    render_list: Vec<EntityId>,
    redraw_requested: bool,
}

impl CanvasSurface {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            transform: ViewTransform::default(),
            render_list: Vec::new(),
            redraw_requested: false,
        }
    }
}

impl Surface for CanvasSurface {
    fn add(&mut self, id: EntityId) {
        self.render_list.push(id);
    }

    fn remove(&mut self, id: EntityId) {
        self.render_list.retain(|existing| *existing != id);
    }

    fn render_list(&self) -> &[EntityId] {
        &self.render_list
    }

    fn render_all(&mut self) {
        self.redraw_requested = true;
    }

    fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }

    fn width(&self) -> f32 {
        self.size.x
    }

    fn height(&self) -> f32 {
        self.size.y
    }

    fn set_size(&mut self, size: Vec2) {
        self.size = size;
    }

    fn zoom(&self) -> f32 {
        self.transform.scale
    }

    fn set_zoom(&mut self, level: f32) {
        self.transform.set_zoom(level);
    }

    fn zoom_to_point(&mut self, anchor: Pos2, level: f32) {
        self.transform.zoom_to_point(anchor, level);
    }

    fn reset_view(&mut self) {
        self.transform = ViewTransform::default();
    }

    fn view_transform(&self) -> ViewTransform {
        self.transform
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn render_list_keeps_order_and_removes() {
        let mut surface = CanvasSurface::new(Vec2::new(800.0, 600.0));
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        surface.add(a);
        surface.add(b);
        surface.add(c);
        surface.remove(b);
        assert_eq!(surface.render_list(), &[a, c]);
    }

    #[test]
    fn redraw_requests_are_consumed_once() {
        let mut surface = CanvasSurface::new(Vec2::new(800.0, 600.0));
        assert!(!surface.take_redraw_request());
        surface.render_all();
        surface.render_all();
        assert!(surface.take_redraw_request());
        assert!(!surface.take_redraw_request());
    }

    #[test]
    fn anchored_zoom_moves_visible_origin() {
        let mut surface = CanvasSurface::new(Vec2::new(800.0, 600.0));
        surface.zoom_to_point(Pos2::new(400.0, 300.0), 2.0);
        assert_eq!(surface.zoom(), 2.0);
        assert_eq!(surface.visible_origin(), Pos2::new(200.0, 150.0));
        surface.reset_view();
        assert_eq!(surface.visible_origin(), Pos2::ZERO);
        assert_eq!(surface.size(), Vec2::new(800.0, 600.0));
    }
}
