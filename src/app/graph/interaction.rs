use eframe::egui::{self, Pos2, Rect, Ui};

use super::super::ViewModel;
use super::super::render_utils::{screen_to_world, world_to_screen};
use super::super::sim::DRAG_ALPHA_TARGET;

const MIN_ZOOM: f32 = 0.2;
const MAX_ZOOM: f32 = 3.0;

impl ViewModel {
    pub(in crate::app) fn handle_zoom(&mut self, ui: &Ui, rect: Rect, response: &egui::Response) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let Some(canvas) = self.scene.as_ref().map(|scene| scene.canvas) else {
            return;
        };

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let world_before = screen_to_world(rect, canvas, self.pan, self.zoom, pointer);

        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.zoom = (self.zoom * zoom_factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.pan = pointer - rect.center() - ((world_before - canvas.center) * self.zoom);
    }

    /// Hit-tests the pointer against visible nodes, nearest center first.
    /// The hidden node is untouchable until its reveal fade completes.
    pub(in crate::app) fn hovered_node(
        &self,
        rect: Rect,
        pointer: Option<Pos2>,
        reveal_opacity: f32,
    ) -> Option<usize> {
        let scene = self.scene.as_ref()?;
        let pointer = pointer.filter(|pointer| rect.contains(*pointer))?;

        scene
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| !node.hidden || reveal_opacity >= 1.0)
            .filter_map(|(index, node)| {
                let center = world_to_screen(rect, scene.canvas, self.pan, self.zoom, node.pos);
                let distance = center.distance(pointer);
                (distance <= node.radius * self.zoom).then_some((index, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }

    pub(in crate::app) fn handle_drag(
        &mut self,
        rect: Rect,
        response: &egui::Response,
        pointer: Option<Pos2>,
    ) {
        if response.drag_started_by(egui::PointerButton::Primary) {
            self.drag_node = self.hovered;
            if let Some(index) = self.drag_node
                && let Some(scene) = self.scene.as_mut()
            {
                scene.nodes[index].pinned = Some(scene.nodes[index].pos);
                scene.sim.set_alpha_target(DRAG_ALPHA_TARGET);
            }
        }

        if response.dragged_by(egui::PointerButton::Primary) {
            match self.drag_node {
                Some(index) => {
                    if let (Some(pointer), Some(scene)) = (pointer, self.scene.as_mut()) {
                        let world =
                            screen_to_world(rect, scene.canvas, self.pan, self.zoom, pointer);
                        scene.nodes[index].pinned = Some(world);
                    }
                }
                None => self.pan += response.drag_delta(),
            }
        }

        if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            self.pan += response.drag_delta();
        }

        if response.drag_stopped_by(egui::PointerButton::Primary)
            && let Some(index) = self.drag_node.take()
            && let Some(scene) = self.scene.as_mut()
        {
            scene.nodes[index].pinned = None;
            scene.sim.set_alpha_target(0.0);
        }
    }
}
