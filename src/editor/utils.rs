//! # Editor Utility Functions
//!
//! Geometry and colour helpers used when turning entities into shapes.
//!
//! ## Key Functions
//!
//! ### Geometry
//! - [`rounded_rect_points`]: Outline of a rectangle with per-corner radii
//! - [`rounded_top_mesh`]: Header mesh with rounded top corners and a gradient fill
//!
//! ### Colors
//! - [`lerp_color`]: Interpolate between two colours
//! - [`LinearGradient`]: Multi-stop gradient along a line

use egui::{Color32, Mesh, Pos2, Rect, Vec2};
use std::f32::consts::{FRAC_PI_2, PI};

/// Arc segments used per rounded corner.
pub const CORNER_SEGMENTS: usize = 6;

/// Corner radii, clockwise from the top-left.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Corners {
    pub nw: f32,
    pub ne: f32,
    pub se: f32,
    pub sw: f32,
}

impl Corners {
    pub fn same(radius: f32) -> Self {
        Self {
            nw: radius,
            ne: radius,
            se: radius,
            sw: radius,
        }
    }

    pub fn bottom(radius: f32) -> Self {
        Self {
            se: radius,
            sw: radius,
            ..Default::default()
        }
    }
}

/// Convex outline of `rect` with rounded corners, clockwise in screen
/// orientation starting at the top-left corner.
///
/// Radii are clamped to half the shorter side.
pub fn rounded_rect_points(rect: Rect, corners: Corners) -> Vec<Pos2> {
    let limit = 0.5 * rect.width().min(rect.height());
    let mut points = Vec::with_capacity(4 * (CORNER_SEGMENTS + 1));
    let arcs = [
        (corners.nw, rect.left_top(), Vec2::new(1.0, 1.0), PI),
        (corners.ne, rect.right_top(), Vec2::new(-1.0, 1.0), 1.5 * PI),
        (corners.se, rect.right_bottom(), Vec2::new(-1.0, -1.0), 0.0),
        (corners.sw, rect.left_bottom(), Vec2::new(1.0, -1.0), FRAC_PI_2),
    ];
    for (radius, corner, inward, start) in arcs {
        let radius = radius.clamp(0.0, limit);
        if radius <= 0.0 {
            points.push(corner);
            continue;
        }
        let center = corner + inward * radius;
        for i in 0..=CORNER_SEGMENTS {
            let angle = start + FRAC_PI_2 * i as f32 / CORNER_SEGMENTS as f32;
            points.push(center + radius * Vec2::angled(angle));
        }
    }
    points
}

/// Interpolate between two colors.
///
/// # Arguments
/// * `c1` - Start color
/// * `c2` - End color
/// * `t` - Interpolation factor (0.0 = c1, 1.0 = c2)
pub fn lerp_color(c1: Color32, c2: Color32, t: f32) -> Color32 {
    let r = (c1.r() as f32 * (1.0 - t) + c2.r() as f32 * t).round() as u8;
    let g = (c1.g() as f32 * (1.0 - t) + c2.g() as f32 * t).round() as u8;
    let b = (c1.b() as f32 * (1.0 - t) + c2.b() as f32 * t).round() as u8;
    let a = (c1.a() as f32 * (1.0 - t) + c2.a() as f32 * t).round() as u8;
    Color32::from_rgba_premultiplied(r, g, b, a)
}

/// Colour stops laid along the line `start -> end`.
#[derive(Clone, Debug)]
pub struct LinearGradient {
    pub start: Pos2,
    pub end: Pos2,
    /// `(offset, color)` pairs sorted by offset in `0..=1`.
    pub stops: Vec<(f32, Color32)>,
}

impl LinearGradient {
    pub fn color_at(&self, p: Pos2) -> Color32 {
        let Some(&(_, first)) = self.stops.first() else {
            return Color32::TRANSPARENT;
        };
        let dir = self.end - self.start;
        let len_sq = dir.length_sq();
        let t = if len_sq < 1e-6 {
            0.0
        } else {
            ((p - self.start).dot(dir) / len_sq).clamp(0.0, 1.0)
        };

        let mut prev = (0.0, first);
        for &(offset, color) in &self.stops {
            if t <= offset {
                let span = offset - prev.0;
                if span <= f32::EPSILON {
                    return color;
                }
                return lerp_color(prev.1, color, (t - prev.0) / span);
            }
            prev = (offset, color);
        }
        prev.1
    }
}

/// Filled mesh for `rect` with rounded top corners, coloured per vertex by
/// `gradient` (evaluated in the same space as `rect`) and mapped through
/// `to_screen`.
///
/// Built as vertical strips so the gradient stays smooth across the width.
pub fn rounded_top_mesh(
    rect: Rect,
    radius: f32,
    gradient: &LinearGradient,
    strips: usize,
    to_screen: impl Fn(Pos2) -> Pos2,
) -> Mesh {
    let radius = radius.clamp(0.0, 0.5 * rect.width().min(rect.height()));
    let strips = strips.max(1);
    let mut mesh = Mesh::default();

    for i in 0..=strips {
        let x = rect.left() + rect.width() * i as f32 / strips as f32;
        let edge = (x - rect.left()).min(rect.right() - x);
        let top = if edge < radius {
            let dx = radius - edge;
            rect.top() + radius - (radius * radius - dx * dx).max(0.0).sqrt()
        } else {
            rect.top()
        };
        let upper = Pos2::new(x, top);
        let lower = Pos2::new(x, rect.bottom());
        mesh.colored_vertex(to_screen(upper), gradient.color_at(upper));
        mesh.colored_vertex(to_screen(lower), gradient.color_at(lower));

        if i > 0 {
            let base = (2 * i) as u32;
            mesh.add_triangle(base - 2, base - 1, base);
            mesh.add_triangle(base - 1, base + 1, base);
        }
    }
    mesh
}
