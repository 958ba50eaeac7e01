use eframe::egui::{self, Align, Context, Layout, Vec2};

use crate::data::GraphData;

use super::bee::BeeState;
use super::{INITIAL_ZOOM, RevealState, ViewModel};

impl ViewModel {
    pub(in crate::app) fn new(data: GraphData, reveal_id: Option<String>) -> Self {
        let has_target = reveal_id
            .as_deref()
            .is_some_and(|id| data.nodes.iter().any(|node| node.id == id));
        if let Some(id) = reveal_id.as_deref()
            && !has_target
        {
            log::warn!("reveal target '{id}' not present in loaded nodes");
        }

        Self {
            data,
            reveal_id,
            scene: None,
            pan: Vec2::ZERO,
            zoom: INITIAL_ZOOM,
            hovered: None,
            drag_node: None,
            links_rest_dim: false,
            reveal: RevealState::new(has_target),
            show_bee: true,
            bee: BeeState::new(),
            fps_current: 0.0,
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        self.update_fps(ctx);

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("orbita");
                    ui.separator();
                    ui.label(format!("nodes: {}", self.data.node_count()));
                    ui.label(format!("links: {}", self.data.link_count()));
                    if let Some(id) = &self.reveal_id {
                        if self.reveal.revealed {
                            ui.label(format!("{id} revealed"));
                        } else {
                            ui.label("1 node hidden");
                        }
                    }
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload tables"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    ui.checkbox(&mut self.show_bee, "bee");
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if self.fps_current > f32::EPSILON {
                            ui.label(format!(
                                "FPS {:.0} | {:.1} ms",
                                self.fps_current,
                                1000.0 / self.fps_current
                            ));
                        }
                    });
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            if is_loading {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("Reloading network tables...");
                    ui.add_space(8.0);
                    ui.spinner();
                });
            } else {
                self.draw_graph(ui);
            }
        });
    }

    fn update_fps(&mut self, ctx: &Context) {
        let dt = ctx.input(|input| input.stable_dt);
        if dt <= f32::EPSILON {
            return;
        }
        self.fps_current = (1.0 / dt).clamp(0.0, 1000.0);
    }
}
