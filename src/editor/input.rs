//! Input model: pointer buttons, canvas pointer events and the gesture state
//! machine tracked between pointer-down and pointer-up.
//!
//! Host events (egui) are translated into [`PointerEvent`]s with positions
//! relative to the canvas widget, so the controller never sees window
//! coordinates.

use egui::{MouseWheelUnit, Pos2, Rect};
use uuid::Uuid;

/// Scroll distance of one wheel "line", in points.
pub const WHEEL_LINE_HEIGHT: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Left mouse button; selects and drags nodes.
    Primary,
    Middle,
    /// Right mouse button; pans the view.
    Secondary,
}

impl PointerButton {
    pub fn from_egui(button: egui::PointerButton) -> Option<Self> {
        match button {
            egui::PointerButton::Primary => Some(Self::Primary),
            egui::PointerButton::Secondary => Some(Self::Secondary),
            egui::PointerButton::Middle => Some(Self::Middle),
            _ => None,
        }
    }
}

/// Pointer input in canvas-relative screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { button: PointerButton, pos: Pos2 },
    Move { pos: Pos2 },
    Up { button: PointerButton, pos: Pos2 },
    /// `delta_y > 0` scrolls down, which zooms out.
    Wheel { delta_y: f32, pos: Pos2 },
}

impl PointerEvent {
    /// Presses and wheel ticks only count when they land on the canvas.
    pub fn starts_interaction(&self) -> bool {
        matches!(self, Self::Down { .. } | Self::Wheel { .. })
    }

    /// Translate one egui event for a canvas occupying `canvas`.
    ///
    /// `hover` is the latest pointer position, used to anchor wheel events.
    pub fn from_egui(event: &egui::Event, canvas: Rect, hover: Option<Pos2>) -> Option<Self> {
        let local = |p: Pos2| (p - canvas.min).to_pos2();
        match event {
            egui::Event::PointerMoved(pos) => Some(Self::Move { pos: local(*pos) }),
            egui::Event::PointerButton {
                pos,
                button,
                pressed,
                ..
            } => {
                let button = PointerButton::from_egui(*button)?;
                let pos = local(*pos);
                Some(if *pressed {
                    Self::Down { button, pos }
                } else {
                    Self::Up { button, pos }
                })
            }
            egui::Event::MouseWheel { unit, delta, .. } => {
                let points = match unit {
                    MouseWheelUnit::Point => delta.y,
                    MouseWheelUnit::Line => delta.y * WHEEL_LINE_HEIGHT,
                    MouseWheelUnit::Page => delta.y * canvas.height(),
                };
                if points == 0.0 {
                    return None;
                }
                // egui reports scrolling down as negative
                Some(Self::Wheel {
                    delta_y: -points,
                    pos: local(hover?),
                })
            }
            _ => None,
        }
    }
}

/// Active pointer gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    /// Secondary button held; `prev` is the last canvas-space pointer position.
    Panning { prev: Pos2 },
    /// Primary button held on a node.
    DraggingNode { id: Uuid, prev: Pos2 },
}

impl Gesture {
    pub fn is_panning(&self) -> bool {
        matches!(self, Self::Panning { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{Modifiers, Vec2};

    fn canvas() -> Rect {
        Rect::from_min_size(Pos2::new(100.0, 50.0), Vec2::new(800.0, 600.0))
    }

    #[test]
    fn positions_become_canvas_relative() {
        let event = egui::Event::PointerMoved(Pos2::new(150.0, 70.0));
        assert_eq!(
            PointerEvent::from_egui(&event, canvas(), None),
            Some(PointerEvent::Move {
                pos: Pos2::new(50.0, 20.0)
            })
        );
    }

    #[test]
    fn buttons_map_to_down_and_up() {
        let press = egui::Event::PointerButton {
            pos: Pos2::new(100.0, 50.0),
            button: egui::PointerButton::Secondary,
            pressed: true,
            modifiers: Modifiers::default(),
        };
        assert_eq!(
            PointerEvent::from_egui(&press, canvas(), None),
            Some(PointerEvent::Down {
                button: PointerButton::Secondary,
                pos: Pos2::ZERO
            })
        );

        let release = egui::Event::PointerButton {
            pos: Pos2::new(100.0, 50.0),
            button: egui::PointerButton::Primary,
            pressed: false,
            modifiers: Modifiers::default(),
        };
        assert!(matches!(
            PointerEvent::from_egui(&release, canvas(), None),
            Some(PointerEvent::Up {
                button: PointerButton::Primary,
                ..
            })
        ));
    }

    #[test]
    fn extra_buttons_are_ignored() {
        assert_eq!(PointerButton::from_egui(egui::PointerButton::Extra1), None);
    }

    #[test]
    fn gesture_defaults_to_idle() {
        assert_eq!(Gesture::default(), Gesture::Idle);
        assert!(Gesture::Panning { prev: Pos2::ZERO }.is_panning());
    }

    #[test]
    fn only_presses_and_wheel_start_interactions() {
        assert!(PointerEvent::Wheel { delta_y: 1.0, pos: Pos2::ZERO }.starts_interaction());
        assert!(!PointerEvent::Move { pos: Pos2::ZERO }.starts_interaction());
    }
}
