mod config;
mod editor;
mod graph;
mod grid;
mod node_types;
mod render;
mod surface;

use anyhow::Context;
use config::GraphConfig;
use editor::ViewportController;
use editor::input::PointerEvent;
use editor::style;
use eframe::egui;
use egui::{Rect, Vec2};
use graph::NodeBox;
use surface::{CanvasSurface, Surface};
use uuid::Uuid;

/// Zoom step of the toolbar buttons.
const BUTTON_ZOOM_STEP: f32 = 1.1;

fn main() -> eframe::Result<()> {
    env_logger::init();
    let config = match config::load() {
        Ok(config) => config,
        Err(e) => {
            log::warn!("{e:#}; falling back to defaults");
            GraphConfig::default()
        }
    };

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Node Canvas",
        native_options,
        Box::new(|_cc| {
            let app = NodeCanvasApp::new(config)?;
            Ok(Box::new(app) as Box<dyn eframe::App>)
        }),
    )
}

struct NodeCanvasApp {
    controller: ViewportController<CanvasSurface>,
    initial_position: Vec2,
    /// Window position of the canvas widget's top-left, from the last frame.
    canvas_origin: Vec2,
    renaming: Option<Renaming>,
}

/// Title edit opened by double-clicking a node header.
struct Renaming {
    id: Uuid,
    text: String,
}

impl NodeCanvasApp {
    fn new(config: GraphConfig) -> anyhow::Result<Self> {
        let surface = CanvasSurface::new(Vec2::new(1200.0, 800.0));
        let mut controller =
            ViewportController::new(surface, &config).context("invalid graph configuration")?;

        for options in &config.demo_nodes {
            match NodeBox::new(options, &config.style) {
                Ok(node) => {
                    controller.add_node(node);
                }
                Err(e) => log::warn!("Skipping node {:?}: {e}", options.title),
            }
        }

        let (x, y) = config.initial_position;
        let initial_position = Vec2::new(x, y);
        controller.set_zoom(config.initial_zoom);
        controller.set_position(initial_position);
        log::info!(
            "Canvas ready with {} nodes at zoom {:.2}",
            controller.nodes().len(),
            controller.zoom_level()
        );

        Ok(Self {
            controller,
            initial_position,
            canvas_origin: Vec2::ZERO,
            renaming: None,
        })
    }

    /// Button zoom about the middle of the canvas; ignored past the bounds.
    fn step_zoom(&mut self, factor: f32) {
        let candidate = self.controller.zoom_level() * factor;
        if self.controller.config().accepts_zoom(candidate) {
            let center = (self.controller.surface().size() * 0.5).to_pos2();
            self.controller.zoom_to_point(candidate, center);
        }
    }

    fn show_canvas(&mut self, ui: &mut egui::Ui) {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let rect = response.rect;
        self.canvas_origin = rect.min.to_vec2();
        self.controller.handle_resize(rect.size());

        let hovered = response.hovered();
        let events: Vec<PointerEvent> = ui.input(|i| {
            let hover = i.pointer.hover_pos();
            i.events
                .iter()
                .filter_map(|e| PointerEvent::from_egui(e, rect, hover))
                .collect()
        });
        for event in events {
            if event.starts_interaction() && !hovered {
                continue;
            }
            self.controller.handle_event(event);
        }

        if response.double_clicked() {
            let header_hit = response
                .interact_pointer_pos()
                .and_then(|pointer| self.controller.node_header_at((pointer - rect.min).to_pos2()));
            if let Some(node) = header_hit.and_then(|id| self.controller.node(id)) {
                self.renaming = Some(Renaming {
                    id: node.id(),
                    text: node.title().to_owned(),
                });
            }
        }

        let text_focused = ui.ctx().memory(|m| m.focused().is_some());
        let delete = ui.input(|i| {
            i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace)
        });
        if delete && self.renaming.is_none() && !text_focused {
            self.controller.delete_selected();
        }

        if self.controller.is_panning() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);
        }

        self.controller.layout_nodes(&painter);
        self.controller.paint(&painter, rect.min.to_vec2());
        self.show_rename_editor(ui, rect);
    }

    /// Text field over the header of the node being renamed. Enter or
    /// losing focus commits, Escape cancels.
    fn show_rename_editor(&mut self, ui: &mut egui::Ui, canvas: Rect) {
        let Some(id) = self.renaming.as_ref().map(|r| r.id) else {
            return;
        };
        let Some(node) = self.controller.node(id) else {
            self.renaming = None;
            return;
        };
        let header = node.header_bounds();
        let surface = self.controller.surface();
        let offset = canvas.min.to_vec2();
        let header = Rect::from_min_max(
            surface.canvas_to_screen(header.min) + offset,
            surface.canvas_to_screen(header.max) + offset,
        );
        let zoom = self.controller.zoom_level();
        let edit_rect = header.with_min_x(header.min.x + style::TITLE_X * zoom);
        let font = egui::FontId::new(node.font().size * zoom, node.font().family.clone());

        let Some(renaming) = self.renaming.as_mut() else {
            return;
        };
        let response = ui.put(
            edit_rect,
            egui::TextEdit::singleline(&mut renaming.text)
                .frame(false)
                .font(font)
                .text_color(style::TITLE_COLOR)
                .vertical_align(egui::Align::Center),
        );
        if !response.has_focus() && !response.lost_focus() {
            response.request_focus();
        }

        let (enter, escape) =
            ui.input(|i| (i.key_pressed(egui::Key::Enter), i.key_pressed(egui::Key::Escape)));
        if escape {
            self.renaming = None;
        } else if enter || response.lost_focus() {
            if let Some(Renaming { id, text }) = self.renaming.take() {
                let title = text.trim();
                if !title.is_empty() {
                    self.controller.rename_node(id, title);
                }
            }
        }
    }
}

impl eframe::App for NodeCanvasApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Node Canvas");
                ui.separator();
                if ui.button("Zoom In").clicked() {
                    self.step_zoom(BUTTON_ZOOM_STEP);
                }
                if ui.button("Zoom Out").clicked() {
                    self.step_zoom(1.0 / BUTTON_ZOOM_STEP);
                }
                if ui.button("Reset View").clicked() {
                    self.controller.reset_view(self.initial_position);
                }
            });
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let position = self.controller.position();
                ui.label(format!("Zoom: {:.0}%", self.controller.zoom_level() * 100.0));
                ui.separator();
                ui.label(format!("Position: ({:.0}, {:.0})", position.x, position.y));
                ui.separator();
                ui.label(format!("Nodes: {}", self.controller.nodes().len()));
                if let Some(node) = self
                    .controller
                    .active_node()
                    .and_then(|id| self.controller.node(id))
                {
                    ui.separator();
                    ui.label(format!("Selected: {} ({})", node.title(), node.kind().name()));
                }
                if let Some(pointer) = ctx.pointer_hover_pos() {
                    let graph_pos = self
                        .controller
                        .translate_to_graph_coords(pointer - self.canvas_origin);
                    ui.separator();
                    ui.label(format!("Pointer: ({:.0}, {:.0})", graph_pos.x, graph_pos.y));
                }
                ui.separator();
                ui.weak("Right-drag to pan, wheel to zoom, double-click a title to rename, Delete to remove");
            });
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.show_canvas(ui));

        if self.controller.take_redraw_request() {
            ctx.request_repaint();
        }
    }
}
