use eframe::egui::{self, Align2, Color32, FontId, Painter, Pos2, Rect, Sense, Stroke, Ui, vec2};

use crate::data::{LinkKind, NodeKind};

use super::super::render_utils::{draw_arrowhead, trim_segment, with_opacity, world_to_screen};
use super::super::{SceneNode, ViewModel};

const CANVAS_BACKGROUND: Color32 = Color32::WHITE;
const LINK_BASE: Color32 = Color32::from_rgb(0x99, 0x99, 0x99);
const LINK_EMPHASIS: Color32 = Color32::from_rgb(0x66, 0x66, 0x66);
const LINK_WIDTH: f32 = 3.0;
const LINK_REST_OPACITY: f32 = 0.7;
const LINK_DIMMED_OPACITY: f32 = 0.2;
const ARROW_COLOR: Color32 = Color32::from_rgb(0x66, 0x66, 0x66);
const ARROW_OPACITY: f32 = 0.75;
const NODE_STROKE_WIDTH: f32 = 2.0;
const LABEL_COLOR: Color32 = Color32::from_rgb(0x33, 0x33, 0x33);

impl ViewModel {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, CANVAS_BACKGROUND);

        if self.scene.is_none() {
            self.rebuild_scene(rect.width());
        }

        self.handle_zoom(ui, rect, &response);

        let pointer = ui.input(|input| input.pointer.hover_pos());
        let now = ui.input(|input| input.time);
        let reveal_opacity = self.reveal.opacity(now);

        let hovered = self.hovered_node(rect, pointer, reveal_opacity);
        if self.hovered.is_some() && hovered.is_none() {
            self.links_rest_dim = true;
        }
        self.hovered = hovered;

        self.handle_drag(rect, &response, pointer);

        if response.clicked_by(egui::PointerButton::Primary) {
            match self.hovered {
                Some(index) => {
                    if let Some(scene) = self.scene.as_ref() {
                        let node = &scene.nodes[index];
                        log::debug!(
                            "clicked {} ({}, {} connections)",
                            node.name,
                            node.kind.label(),
                            node.connections
                        );
                    }
                }
                None => {
                    if self.reveal.trigger(now) {
                        log::debug!("hidden node revealed");
                    }
                }
            }
        }

        if self.drag_node.is_some() {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::Grabbing);
        } else if self.hovered.is_some() {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::PointingHand);
        }

        let pan = self.pan;
        let zoom = self.zoom;
        let links_rest_dim = self.links_rest_dim;

        let mut moving = false;
        if let Some(scene) = self.scene.as_mut() {
            moving = scene.sim.step(&mut scene.nodes);
            let canvas = scene.canvas;

            for link in &scene.links {
                let visibility = if link.hidden { reveal_opacity } else { 1.0 };
                if visibility <= 0.0 {
                    continue;
                }

                let touches_hover =
                    hovered.is_some_and(|h| link.source == h || link.target == h);
                let emphasis = if hovered.is_some() {
                    if touches_hover { 1.0 } else { LINK_DIMMED_OPACITY }
                } else if links_rest_dim {
                    LINK_REST_OPACITY
                } else {
                    1.0
                };
                let opacity = visibility * emphasis;

                let source = &scene.nodes[link.source];
                let target = &scene.nodes[link.target];
                let Some((start, end)) =
                    trim_segment(source.pos, target.pos, source.radius, target.radius)
                else {
                    continue;
                };

                let start = world_to_screen(rect, canvas, pan, zoom, start);
                let end = world_to_screen(rect, canvas, pan, zoom, end);
                let color = if touches_hover { LINK_EMPHASIS } else { LINK_BASE };
                painter.line_segment(
                    [start, end],
                    Stroke::new(LINK_WIDTH * zoom, with_opacity(color, opacity)),
                );

                let arrow_color = with_opacity(ARROW_COLOR, ARROW_OPACITY * visibility);
                if matches!(link.kind, LinkKind::Directed | LinkKind::Bidirectional) {
                    draw_arrowhead(&painter, end, end - start, zoom, arrow_color);
                }
                if link.kind == LinkKind::Bidirectional {
                    draw_arrowhead(&painter, start, start - end, zoom, arrow_color);
                }
            }

            for node in &scene.nodes {
                let visibility = if node.hidden { reveal_opacity } else { 1.0 };
                if visibility <= 0.0 {
                    continue;
                }

                let center = world_to_screen(rect, canvas, pan, zoom, node.pos);
                let radius = node.radius * zoom;
                painter.circle_filled(center, radius, with_opacity(CANVAS_BACKGROUND, visibility));
                painter.circle_stroke(
                    center,
                    radius,
                    Stroke::new(NODE_STROKE_WIDTH * zoom, with_opacity(node.color, visibility)),
                );
            }

            for node in &scene.nodes {
                let visibility = if node.hidden { reveal_opacity } else { 1.0 };
                if visibility <= 0.0 {
                    continue;
                }

                let center = world_to_screen(rect, canvas, pan, zoom, node.pos);
                let font_size = if node.kind == NodeKind::Center { 12.0 } else { 10.0 };
                let line_height = font_size + 4.0;
                let start_y = -((node.label_lines.len() as f32 - 1.0) * line_height) * 0.5;
                for (index, line) in node.label_lines.iter().enumerate() {
                    let offset = (start_y + index as f32 * line_height) * zoom;
                    painter.text(
                        center + vec2(0.0, offset),
                        Align2::CENTER_CENTER,
                        line,
                        FontId::proportional(font_size * zoom),
                        with_opacity(LABEL_COLOR, visibility),
                    );
                }
            }

            if let Some(index) = hovered
                && let Some(pointer) = pointer
            {
                draw_tooltip(&painter, pointer, &scene.nodes[index]);
            }
        }

        let bee_active = self.show_bee && self.bee.update(rect, pointer);
        if bee_active {
            self.bee.draw(&painter, rect);
        }

        if moving || self.drag_node.is_some() || self.reveal.fading(now) || bee_active {
            ui.ctx().request_repaint();
        }
    }
}

fn draw_tooltip(painter: &Painter, pointer: Pos2, node: &SceneNode) {
    let title = node
        .name
        .split('|')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(" ");
    let detail = format!("{} · {} connections", node.kind.label(), node.connections);

    let title_galley =
        painter.layout_no_wrap(title, FontId::proportional(13.0), Color32::from_gray(240));
    let detail_galley =
        painter.layout_no_wrap(detail, FontId::proportional(11.5), Color32::from_gray(200));

    let padding = vec2(8.0, 6.0);
    let title_size = title_galley.size();
    let detail_size = detail_galley.size();
    let size = vec2(
        title_size.x.max(detail_size.x),
        title_size.y + 2.0 + detail_size.y,
    ) + padding * 2.0;

    let rect = Rect::from_min_size(pointer + vec2(14.0, -size.y - 10.0), size);
    painter.rect_filled(rect, 5.0, Color32::from_rgba_unmultiplied(32, 36, 40, 235));
    painter.galley(rect.min + padding, title_galley, Color32::from_gray(240));
    painter.galley(
        rect.min + padding + vec2(0.0, title_size.y + 2.0),
        detail_galley,
        Color32::from_gray(200),
    );
}
