//! Background grid tile.
//!
//! One finite rectangle filled with a repeating line pattern. Its size and
//! position are driven entirely by the viewport controller.

use crate::config::ConfigError;
use crate::editor::coordinate_transform::ViewTransform;
use crate::editor::style::{GridStyle, parse_color};
use crate::editor::tiling;
use crate::render::{DrawList, EntityId, Renderable};
use egui::{Color32, Pos2, Rect, Shape, Stroke, Vec2};
use uuid::Uuid;

/// Grid line width in canvas units.
pub const LINE_WIDTH: f32 = 1.0;

/// Parsed grid colours.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridPalette {
    pub ruler: Color32,
    pub regular: Color32,
    pub background: Color32,
}

impl GridPalette {
    pub fn from_style(style: &GridStyle) -> Result<Self, ConfigError> {
        Ok(Self {
            ruler: parse_color(&style.ruler_color)?,
            regular: parse_color(&style.regular_color)?,
            background: parse_color(&style.background_color)?,
        })
    }
}

#[derive(Clone, Debug)]
pub struct GridTile {
    id: EntityId,
    left: f32,
    top: f32,
    width: f32,
    height: f32,
    span: f32,
    palette: GridPalette,
}

impl GridTile {
    pub fn new(span: f32, palette: GridPalette) -> Result<Self, ConfigError> {
        if !span.is_finite() || span <= 0.0 {
            return Err(ConfigError::InvalidSpan(span));
        }
        let period = tiling::period(span);
        Ok(Self {
            id: Uuid::new_v4(),
            left: 0.0,
            top: 0.0,
            width: period,
            height: period,
            span,
            palette,
        })
    }

    pub fn span(&self) -> f32 {
        self.span
    }

    /// Distance over which the pattern repeats.
    pub fn period(&self) -> f32 {
        tiling::period(self.span)
    }

    pub(crate) fn position(&self) -> Pos2 {
        Pos2::new(self.left, self.top)
    }

    pub(crate) fn set_position(&mut self, pos: Pos2) {
        self.left = pos.x;
        self.top = pos.y;
    }

    pub(crate) fn set_size(&mut self, size: Vec2) {
        self.width = size.x;
        self.height = size.y;
    }

    fn line_color(&self, index: usize) -> Color32 {
        if index % tiling::CELLS_PER_PERIOD as usize == 0 {
            self.palette.ruler
        } else {
            self.palette.regular
        }
    }
}

#[cfg(test)]
impl GridTile {
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

    pub fn palette(&self) -> GridPalette {
        self.palette
    }
}

impl Renderable for GridTile {
    fn id(&self) -> EntityId {
        self.id
    }

    fn bounds(&self) -> Rect {
        Rect::from_min_size(self.position(), Vec2::new(self.width, self.height))
    }

    fn render(&self, transform: &ViewTransform) -> DrawList {
        let bounds = self.bounds();
        let columns = (self.width / self.span).ceil() as usize;
        let rows = (self.height / self.span).ceil() as usize;
        let mut shapes = Vec::with_capacity(1 + columns + rows);

        shapes.push(Shape::rect_filled(
            transform.rect_to_screen(bounds),
            0.0,
            self.palette.background,
        ));

        let width = LINE_WIDTH * transform.scale;
        for i in 0..columns {
            let x = bounds.left() + i as f32 * self.span;
            shapes.push(Shape::line_segment(
                [
                    transform.to_screen(Pos2::new(x, bounds.top())),
                    transform.to_screen(Pos2::new(x, bounds.bottom())),
                ],
                Stroke::new(width, self.line_color(i)),
            ));
        }
        for i in 0..rows {
            let y = bounds.top() + i as f32 * self.span;
            shapes.push(Shape::line_segment(
                [
                    transform.to_screen(Pos2::new(bounds.left(), y)),
                    transform.to_screen(Pos2::new(bounds.right(), y)),
                ],
                Stroke::new(width, self.line_color(i)),
            ));
        }

        DrawList {
            shapes,
            texts: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile() -> GridTile {
        let palette = GridPalette::from_style(&GridStyle::default()).unwrap();
        GridTile::new(16.0, palette).unwrap()
    }

    fn stroke_color(shape: &Shape) -> Color32 {
        match shape {
            Shape::LineSegment { stroke, .. } => stroke.color,
            other => panic!("expected a line, got {other:?}"),
        }
    }

    #[test]
    fn rejects_non_positive_span() {
        let palette = GridPalette::from_style(&GridStyle::default()).unwrap();
        assert!(matches!(
            GridTile::new(0.0, palette),
            Err(ConfigError::InvalidSpan(_))
        ));
    }

    #[test]
    fn draws_background_then_one_line_per_span() {
        let mut grid = tile();
        grid.set_size(Vec2::new(256.0, 128.0));
        let list = grid.render(&ViewTransform::default());
        // background + 16 columns + 8 rows
        assert_eq!(list.shapes.len(), 1 + 16 + 8);
        assert!(matches!(list.shapes[0], Shape::Rect(_)));
        assert!(list.texts.is_empty());
    }

    #[test]
    fn every_eighth_line_is_a_ruler() {
        let mut grid = tile();
        grid.set_size(Vec2::new(256.0, 16.0));
        let palette = grid.palette();
        let list = grid.render(&ViewTransform::default());
        let columns = &list.shapes[1..17];
        for (i, line) in columns.iter().enumerate() {
            let expected = if i % 8 == 0 { palette.ruler } else { palette.regular };
            assert_eq!(stroke_color(line), expected, "column {i}");
        }
    }

    #[test]
    fn lines_follow_position_and_zoom() {
        let mut grid = tile();
        grid.set_size(Vec2::new(32.0, 32.0));
        grid.set_position(Pos2::new(-128.0, -64.0));
        let transform = ViewTransform {
            scale: 2.0,
            translation: Vec2::new(10.0, 0.0),
        };
        let list = grid.render(&transform);
        match &list.shapes[2] {
            Shape::LineSegment { points, stroke } => {
                assert_eq!(points[0], Pos2::new((-128.0 + 16.0) * 2.0 + 10.0, -128.0));
                assert_eq!(stroke.width, 2.0);
            }
            other => panic!("expected a line, got {other:?}"),
        }
    }
}
