//! # Graph Editor
//!
//! This module provides the viewport controller of the node canvas.
//!
//! ## Submodules
//! - [`coordinate_transform`]: Canvas <-> screen conversion
//! - [`input`]: Pointer events and the gesture state machine
//! - [`style`]: Colours, node metrics and colour parsing
//! - [`tiling`]: Grid tile sizing and wrap-around
//! - [`utils`]: Geometry and colour helpers for rendering
//!
//! ## Main Type
//! [`ViewportController`] - owns pan/zoom state, the grid tile and the nodes

pub mod coordinate_transform;
pub mod input;
pub mod style;
pub mod tiling;
pub mod utils;

use crate::config::{ConfigError, GraphConfig};
use crate::graph::{NodeBox, NodeCollection};
use crate::grid::{GridPalette, GridTile};
use crate::render::{EntityId, Renderable, TextMeasure};
use crate::surface::Surface;
use egui::{Pos2, Vec2};
use input::{Gesture, PointerButton, PointerEvent};
use uuid::Uuid;

/// Pan/zoom state of the canvas, plus everything that has to move with it.
///
/// All node and grid coordinates change only through these methods, so the
/// grid tile and the nodes never drift apart.
pub struct ViewportController<S: Surface> {
    surface: S,
    config: GraphConfig,
    background: GridTile,
    nodes: NodeCollection,
    position: Vec2,
    zoom_level: f32,
    gesture: Gesture,
    active_node: Option<Uuid>,
}

impl<S: Surface> ViewportController<S> {
    pub fn new(mut surface: S, config: &GraphConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let palette = GridPalette::from_style(&config.style.grid)?;
        let background = GridTile::new(config.grid_span, palette)?;
        surface.add(background.id());

        let zoom_level = config.clamp_zoom(surface.zoom());
        let mut controller = Self {
            surface,
            config: config.clone(),
            background,
            nodes: NodeCollection::default(),
            position: Vec2::ZERO,
            zoom_level,
            gesture: Gesture::Idle,
            active_node: None,
        };
        controller.update_inner_canvas_size();
        controller.update_node_controls();
        controller.move_background(Vec2::ZERO);
        Ok(controller)
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn zoom_level(&self) -> f32 {
        self.zoom_level
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    #[cfg(test)]
    pub fn background(&self) -> &GridTile {
        &self.background
    }

    pub fn nodes(&self) -> &NodeCollection {
        &self.nodes
    }

    pub fn node(&self, id: Uuid) -> Option<&NodeBox> {
        self.nodes.get(id)
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    #[cfg(test)]
    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub fn is_panning(&self) -> bool {
        self.gesture.is_panning()
    }

    pub fn active_node(&self) -> Option<Uuid> {
        self.active_node
    }

    /// Move the view to an absolute position.
    ///
    /// Every node and the grid tile shift by the difference to the previous
    /// position.
    pub fn set_position(&mut self, position: Vec2) {
        let delta = position - self.position;
        self.move_nodes(delta);
        self.move_background(delta);
        self.position = position;
        log::debug!("Viewport position -> ({:.1}, {:.1})", position.x, position.y);
        self.surface.render_all();
    }

    pub fn move_position(&mut self, offset: Vec2) {
        self.set_position(self.position + offset);
    }

    /// Zoom so the screen point `anchor` stays visually fixed.
    ///
    /// Levels outside the configured bounds are clamped.
    pub fn zoom_to_point(&mut self, level: f32, anchor: Pos2) {
        let level = self.config.clamp_zoom(level);
        self.zoom_level = level;
        self.surface.zoom_to_point(anchor, level);
        self.after_zoom();
        log::debug!(
            "Zoom -> {:.3} at ({:.1}, {:.1})",
            level,
            anchor.x,
            anchor.y
        );
        self.surface.render_all();
    }

    /// Zoom about the canvas origin. Used for initialisation and resets.
    pub fn set_zoom(&mut self, level: f32) {
        let level = self.config.clamp_zoom(level);
        self.zoom_level = level;
        self.surface.set_zoom(level);
        self.after_zoom();
        log::debug!("Zoom -> {:.3}", level);
        self.surface.render_all();
    }

    /// Unit zoom with no view translation, then `position`.
    pub fn reset_view(&mut self, position: Vec2) {
        self.surface.reset_view();
        self.zoom_level = self.config.clamp_zoom(1.0);
        if self.zoom_level != 1.0 {
            self.surface.set_zoom(self.zoom_level);
        }
        self.after_zoom();
        self.set_position(position);
    }

    /// Screen point to graph coordinates.
    ///
    /// `position + screen` at unit zoom; the view transform (zoom and any
    /// anchored-zoom translation) is undone first.
    pub fn translate_to_graph_coords(&self, screen: Pos2) -> Pos2 {
        self.surface.screen_to_canvas(screen) + self.position
    }

    /// Append a node on top of the others. Its coordinates are kept as-is.
    pub fn add_node(&mut self, mut node: NodeBox) -> Uuid {
        let id = node.id();
        node.set_border_scale(self.border_scale());
        self.surface.add(id);
        self.nodes.push(node);
        self.surface.render_all();
        id
    }

    pub fn remove_node(&mut self, id: Uuid) -> Option<NodeBox> {
        let node = self.nodes.remove(id)?;
        self.surface.remove(id);
        if self.active_node == Some(id) {
            self.active_node = None;
        }
        if matches!(self.gesture, Gesture::DraggingNode { id: dragged, .. } if dragged == id) {
            self.gesture = Gesture::Idle;
        }
        self.surface.render_all();
        Some(node)
    }

    /// Remove the active node, if any.
    pub fn delete_selected(&mut self) -> Option<NodeBox> {
        let id = self.active_node?;
        let node = self.remove_node(id)?;
        log::info!("Removed node {:?}", node.title());
        Some(node)
    }

    /// Move one node by a canvas-space delta.
    pub fn move_node(&mut self, id: Uuid, delta: Vec2) -> bool {
        let Some(node) = self.nodes.get_mut(id) else {
            return false;
        };
        node.translate(delta);
        self.surface.render_all();
        true
    }

    pub fn rename_node(&mut self, id: Uuid, title: impl Into<String>) -> bool {
        let Some(node) = self.nodes.get_mut(id) else {
            return false;
        };
        node.set_title(title.into());
        self.surface.render_all();
        true
    }

    /// Make `id` the active node, or clear the selection with `None`.
    pub fn select_node(&mut self, id: Option<Uuid>) {
        let id = id.filter(|id| self.nodes.get(*id).is_some());
        if self.active_node == id {
            return;
        }
        if let Some(prev) = self.active_node.and_then(|prev| self.nodes.get_mut(prev)) {
            prev.set_selected(false);
        }
        if let Some(node) = id.and_then(|id| self.nodes.get_mut(id)) {
            node.set_selected(true);
        }
        self.active_node = id;
        self.surface.render_all();
    }

    /// Topmost node under a screen point.
    pub fn node_at(&self, screen: Pos2) -> Option<Uuid> {
        self.nodes.topmost_at(self.surface.screen_to_canvas(screen))
    }

    /// Topmost node whose title bar is under a screen point.
    pub fn node_header_at(&self, screen: Pos2) -> Option<Uuid> {
        let id = self.node_at(screen)?;
        let point = self.surface.screen_to_canvas(screen);
        self.nodes
            .get(id)
            .filter(|node| node.header_bounds().contains(point))
            .map(NodeBox::id)
    }

    /// Refresh cached node widths whose titles changed.
    pub fn layout_nodes(&mut self, measure: &dyn TextMeasure) {
        for node in self.nodes.iter_mut() {
            node.layout(measure);
        }
    }

    /// Canvas widget resized.
    pub fn handle_resize(&mut self, size: Vec2) {
        if size == self.surface.size() {
            return;
        }
        self.surface.set_size(size);
        self.update_inner_canvas_size();
        self.update_node_controls();
        self.move_background(Vec2::ZERO);
        log::debug!("Canvas resized to {:.0}x{:.0}", size.x, size.y);
        self.surface.render_all();
    }

    /// Wheel zoom candidate for a scroll of `delta_y`.
    pub fn wheel_zoom_candidate(&self, delta_y: f32) -> f32 {
        self.zoom_level * self.config.wheel_zoom_base.powf(delta_y)
    }

    /// Zoom about `anchor` if the resulting level is in bounds.
    ///
    /// Returns whether the zoom was applied; out-of-range candidates are
    /// dropped, not clamped.
    pub fn handle_wheel(&mut self, delta_y: f32, anchor: Pos2) -> bool {
        let candidate = self.wheel_zoom_candidate(delta_y);
        if !self.config.accepts_zoom(candidate) {
            return false;
        }
        self.zoom_to_point(candidate, anchor);
        true
    }

    pub fn handle_event(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down {
                button: PointerButton::Secondary,
                pos,
            } => {
                self.gesture = Gesture::Panning {
                    prev: self.surface.screen_to_canvas(pos),
                };
            }
            PointerEvent::Down {
                button: PointerButton::Primary,
                pos,
            } => {
                let hit = self.node_at(pos);
                self.select_node(hit);
                if let Some(id) = hit {
                    self.gesture = Gesture::DraggingNode {
                        id,
                        prev: self.surface.screen_to_canvas(pos),
                    };
                }
            }
            PointerEvent::Down { .. } => {}
            PointerEvent::Move { pos } => {
                let current = self.surface.screen_to_canvas(pos);
                match self.gesture {
                    Gesture::Panning { prev } => {
                        self.move_position(current - prev);
                        self.gesture = Gesture::Panning { prev: current };
                    }
                    Gesture::DraggingNode { id, prev } => {
                        self.move_node(id, current - prev);
                        self.gesture = Gesture::DraggingNode { id, prev: current };
                    }
                    Gesture::Idle => {}
                }
            }
            PointerEvent::Up {
                button: PointerButton::Secondary,
                ..
            } => {
                if self.gesture.is_panning() {
                    self.gesture = Gesture::Idle;
                }
            }
            PointerEvent::Up {
                button: PointerButton::Primary,
                ..
            } => {
                if matches!(self.gesture, Gesture::DraggingNode { .. }) {
                    self.gesture = Gesture::Idle;
                }
            }
            PointerEvent::Up { .. } => {}
            PointerEvent::Wheel { delta_y, pos } => {
                self.handle_wheel(delta_y, pos);
            }
        }
    }

    pub fn take_redraw_request(&mut self) -> bool {
        self.surface.take_redraw_request()
    }

    /// Paint the render list with the canvas widget's top-left at `origin`.
    pub fn paint(&self, painter: &egui::Painter, origin: Vec2) {
        let transform = self.surface.view_transform().offset_by(origin);
        for id in self.surface.render_list() {
            if let Some(entity) = self.entity(*id) {
                entity.render(&transform).paint(painter);
            }
        }
    }

    fn entity(&self, id: EntityId) -> Option<&dyn Renderable> {
        if id == self.background.id() {
            Some(&self.background)
        } else {
            self.nodes.get(id).map(|node| node as &dyn Renderable)
        }
    }

    fn after_zoom(&mut self) {
        self.update_inner_canvas_size();
        self.update_node_controls();
        self.move_background(Vec2::ZERO);
    }

    fn border_scale(&self) -> f32 {
        self.zoom_level * style::BORDER_SCALE_PER_ZOOM
    }

    fn move_nodes(&mut self, delta: Vec2) {
        for node in self.nodes.iter_mut() {
            node.translate(delta);
        }
    }

    /// Size the grid tile to cover the visible area at the current zoom.
    fn update_inner_canvas_size(&mut self) {
        let span = self.background.span();
        let width = tiling::tile_extent(self.surface.width(), self.zoom_level, span);
        let height = tiling::tile_extent(self.surface.height(), self.zoom_level, span);
        self.background.set_size(Vec2::new(width, height));
    }

    fn update_node_controls(&mut self) {
        let scale = self.border_scale();
        for node in self.nodes.iter_mut() {
            node.set_border_scale(scale);
        }
    }

    /// Shift the grid tile with the view and wrap it by whole periods,
    /// relative to the visible top-left corner.
    fn move_background(&mut self, delta: Vec2) {
        let period = self.background.period();
        let origin = self.surface.visible_origin();
        let raw = self.background.position() + delta;
        let wrapped = Pos2::new(
            origin.x + tiling::wrap_offset(raw.x - origin.x, period),
            origin.y + tiling::wrap_offset(raw.y - origin.y, period),
        );
        if wrapped != raw {
            log::trace!(
                "Grid tile wrapped ({:.1}, {:.1}) -> ({:.1}, {:.1})",
                raw.x,
                raw.y,
                wrapped.x,
                wrapped.y
            );
        }
        self.background.set_position(wrapped);
    }
}
