use crate::config::ConfigError;
use crate::editor::coordinate_transform::ViewTransform;
use crate::editor::style::{
    self, BASE_COLOR, CORNER_RADIUS, EditorStyle, NODE_OPACITY, OUTLINE_COLOR, OUTLINE_WIDTH,
    SELECTION_BORDER_COLOR, TITLE_BOLD_OFFSET, TITLE_COLOR, TITLE_RIGHT_PADDING, TITLE_X,
};
use crate::editor::utils::{self, Corners, LinearGradient};
use crate::node_types::NodeKind;
use crate::render::{DrawList, EntityId, Renderable, TextMeasure, TextRun};
use egui::{Align2, Color32, FontId, Pos2, Rect, Shape, Stroke, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Vertical strips used for the header gradient.
const HEADER_STRIPS: usize = 24;

/// Construction options for a [`NodeBox`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NodeOptions {
    pub title: String,
    pub kind: NodeKind,
    /// Header colour; falls back to the style's colour for `kind`.
    pub color: Option<String>,
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    pub header_height: f32,
}

impl Default for NodeOptions {
    fn default() -> Self {
        Self {
            title: "unknown".into(),
            kind: NodeKind::Function,
            color: None,
            left: 0.0,
            top: 0.0,
            width: 200.0,
            height: 200.0,
            header_height: 30.0,
        }
    }
}

impl NodeOptions {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn at(mut self, left: f32, top: f32) -> Self {
        self.left = left;
        self.top = top;
        self
    }

    pub fn with_kind(mut self, kind: NodeKind) -> Self {
        self.kind = kind;
        self
    }

    #[cfg(test)]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// A function/event box on the canvas.
///
/// `width` is derived from the title: it is recomputed by [`NodeBox::layout`]
/// only after the title or font changed, and stays cached otherwise.
#[derive(Clone, Debug)]
pub struct NodeBox {
    id: Uuid,
    title: String,
    kind: NodeKind,
    color: Color32,
    left: f32,
    top: f32,
    width: f32,
    height: f32,
    header_height: f32,
    font: FontId,
    layout_dirty: bool,
    border_scale: f32,
    selected: bool,
}

impl NodeBox {
    pub fn new(options: &NodeOptions, editor_style: &EditorStyle) -> Result<Self, ConfigError> {
        let checks = [
            ("left", options.left, true),
            ("top", options.top, true),
            ("width", options.width, false),
            ("height", options.height, false),
            ("header_height", options.header_height, false),
        ];
        for (name, value, may_be_negative) in checks {
            if !value.is_finite() || (!may_be_negative && value <= 0.0) {
                return Err(ConfigError::InvalidDimension { name, value });
            }
        }
        if options.header_height > options.height {
            return Err(ConfigError::InvalidDimension {
                name: "header_height",
                value: options.header_height,
            });
        }

        let color_str = options
            .color
            .as_deref()
            .or_else(|| editor_style.header_color(options.kind))
            .ok_or_else(|| ConfigError::InvalidColor(String::new()))?;
        let color = style::parse_color(color_str)?;

        Ok(Self {
            id: Uuid::new_v4(),
            title: options.title.clone(),
            kind: options.kind,
            color,
            left: options.left,
            top: options.top,
            width: options.width,
            height: options.height,
            header_height: options.header_height,
            font: FontId::proportional(editor_style.font_size),
            layout_dirty: true,
            border_scale: style::BORDER_SCALE_PER_ZOOM,
            selected: false,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Canvas-space rectangle of the title bar.
    pub fn header_bounds(&self) -> Rect {
        Rect::from_min_size(
            Pos2::new(self.left, self.top),
            Vec2::new(self.width, self.header_height),
        )
    }

    pub fn font(&self) -> &FontId {
        &self.font
    }

    /// Recompute the cached width from the title if it is stale.
    pub fn layout(&mut self, measure: &dyn TextMeasure) {
        if !self.layout_dirty {
            return;
        }
        let text_width = measure.text_width(&self.title, &self.font);
        self.width = TITLE_X + text_width + TITLE_BOLD_OFFSET + TITLE_RIGHT_PADDING;
        self.layout_dirty = false;
    }

    pub(crate) fn set_title(&mut self, title: String) {
        if self.title != title {
            self.title = title;
            self.layout_dirty = true;
        }
    }

    pub(crate) fn translate(&mut self, delta: Vec2) {
        self.left += delta.x;
        self.top += delta.y;
    }

    pub(crate) fn set_border_scale(&mut self, scale: f32) {
        self.border_scale = scale;
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    fn header_gradient(&self) -> LinearGradient {
        let head = style::with_opacity(self.color, NODE_OPACITY);
        let base = style::with_opacity(BASE_COLOR, NODE_OPACITY);
        LinearGradient {
            start: Pos2::new(0.0, -2.0 * self.header_height),
            end: Pos2::new(self.width, 2.0 * self.header_height),
            stops: vec![(0.0, head), (0.7, head), (1.0, base)],
        }
    }
}

#[cfg(test)]
impl NodeBox {
    pub fn color(&self) -> Color32 {
        self.color
    }

    pub fn left(&self) -> f32 {
        self.left
    }

    pub fn top(&self) -> f32 {
        self.top
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn header_height(&self) -> f32 {
        self.header_height
    }

    pub fn border_scale(&self) -> f32 {
        self.border_scale
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn needs_layout(&self) -> bool {
        self.layout_dirty
    }
}

impl Renderable for NodeBox {
    fn id(&self) -> EntityId {
        self.id
    }

    fn bounds(&self) -> Rect {
        Rect::from_min_size(Pos2::new(self.left, self.top), Vec2::new(self.width, self.height))
    }

    fn render(&self, transform: &ViewTransform) -> DrawList {
        let origin = Vec2::new(self.left, self.top);
        let to_screen = |p: Pos2| transform.to_screen(p + origin);
        let map = |points: Vec<Pos2>| points.into_iter().map(to_screen).collect::<Vec<_>>();

        let local = Rect::from_min_size(Pos2::ZERO, Vec2::new(self.width, self.height));
        let header = Rect::from_min_max(Pos2::ZERO, Pos2::new(self.width, self.header_height));
        let body = Rect::from_min_max(Pos2::new(0.0, self.header_height), local.max);

        let mut shapes = Vec::with_capacity(4);
        shapes.push(Shape::mesh(utils::rounded_top_mesh(
            header,
            CORNER_RADIUS,
            &self.header_gradient(),
            HEADER_STRIPS,
            to_screen,
        )));
        if body.height() > 0.0 {
            shapes.push(Shape::convex_polygon(
                map(utils::rounded_rect_points(body, Corners::bottom(CORNER_RADIUS))),
                style::with_opacity(BASE_COLOR, NODE_OPACITY),
                Stroke::NONE,
            ));
        }
        shapes.push(Shape::closed_line(
            map(utils::rounded_rect_points(local, Corners::same(CORNER_RADIUS))),
            Stroke::new(OUTLINE_WIDTH * transform.scale, OUTLINE_COLOR),
        ));
        if self.selected {
            let pad = 0.5 * self.border_scale / transform.scale;
            shapes.push(Shape::closed_line(
                map(utils::rounded_rect_points(
                    local.expand(pad),
                    Corners::same(CORNER_RADIUS + pad),
                )),
                Stroke::new(self.border_scale, SELECTION_BORDER_COLOR),
            ));
        }

        let title = TextRun {
            pos: to_screen(Pos2::new(TITLE_X, 0.5 * self.header_height)),
            anchor: Align2::LEFT_CENTER,
            text: self.title.clone(),
            font: FontId::new(self.font.size * transform.scale, self.font.family.clone()),
            color: TITLE_COLOR,
        };

        // egui's bundled fonts have no bold face; strike the title twice
        let mut bold = title.clone();
        bold.pos.x += TITLE_BOLD_OFFSET * transform.scale;

        DrawList {
            shapes,
            texts: vec![title, bold],
        }
    }
}

/// Nodes in display order: the last one is drawn on top.
#[derive(Clone, Debug, Default)]
pub struct NodeCollection {
    nodes: Vec<NodeBox>,
}

impl NodeCollection {
    pub fn push(&mut self, node: NodeBox) {
        self.nodes.push(node);
    }

    pub fn remove(&mut self, id: Uuid) -> Option<NodeBox> {
        let index = self.nodes.iter().position(|n| n.id == id)?;
        Some(self.nodes.remove(index))
    }

    pub fn get(&self, id: Uuid) -> Option<&NodeBox> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn get_mut(&mut self, id: Uuid) -> Option<&mut NodeBox> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    #[cfg(test)]
    pub fn iter(&self) -> std::slice::Iter<'_, NodeBox> {
        self.nodes.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, NodeBox> {
        self.nodes.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Topmost node whose bounds contain a canvas-space point.
    pub fn topmost_at(&self, point: Pos2) -> Option<Uuid> {
        self.nodes
            .iter()
            .rev()
            .find(|n| n.bounds().contains(point))
            .map(|n| n.id)
    }
}
