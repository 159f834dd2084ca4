//! # Rendering Seam
//!
//! Entities drawn on the canvas implement [`Renderable`]: they expose their
//! canvas-space bounds and turn themselves into a [`DrawList`] for a given
//! view transform. Producing shapes is pure; only [`DrawList::paint`] touches
//! an `egui::Painter`.

use crate::editor::coordinate_transform::ViewTransform;
use egui::{Align2, Color32, FontId, Pos2, Rect, Shape};
use uuid::Uuid;

pub type EntityId = Uuid;

/// A drawable entity with a position and size on the canvas.
pub trait Renderable {
    fn id(&self) -> EntityId;

    /// Canvas-space bounds (`left, top, width, height`).
    fn bounds(&self) -> Rect;

    fn render(&self, transform: &ViewTransform) -> DrawList;
}

/// Text placed in screen space.
#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    pub pos: Pos2,
    pub anchor: Align2,
    pub text: String,
    pub font: FontId,
    pub color: Color32,
}

/// Shapes and text for one entity, painted shapes first.
#[derive(Default)]
pub struct DrawList {
    pub shapes: Vec<Shape>,
    pub texts: Vec<TextRun>,
}

impl DrawList {
    pub fn paint(self, painter: &egui::Painter) {
        painter.extend(self.shapes);
        for run in self.texts {
            painter.text(run.pos, run.anchor, run.text, run.font, run.color);
        }
    }
}

/// Width of laid-out text, used to size node boxes.
pub trait TextMeasure {
    fn text_width(&self, text: &str, font: &FontId) -> f32;
}

impl TextMeasure for egui::Painter {
    fn text_width(&self, text: &str, font: &FontId) -> f32 {
        self.layout_no_wrap(text.to_owned(), font.clone(), Color32::WHITE)
            .size()
            .x
    }
}
