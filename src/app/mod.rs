use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Color32, Context, Vec2, vec2};

use crate::data::{DataSources, GraphData, LinkKind, NodeKind, load_or_fallback};

mod bee;
mod graph;
mod render_utils;
mod sim;
mod ui;

const MAX_CANVAS_WIDTH: f32 = 800.0;
const CANVAS_PADDING: f32 = 30.0;
const MIN_CANVAS_WIDTH: f32 = 160.0;
const RING_FACTOR: f32 = 0.3;
const INITIAL_ZOOM: f32 = 0.8;
const REVEAL_FADE_SECS: f64 = 0.8;

pub struct RadialApp {
    sources: DataSources,
    reveal_id: Option<String>,
    state: AppState,
    reload_rx: Option<Receiver<GraphData>>,
}

enum AppState {
    Loading { rx: Receiver<GraphData> },
    Ready(Box<ViewModel>),
}

struct ViewModel {
    data: GraphData,
    reveal_id: Option<String>,
    scene: Option<SceneGraph>,
    pan: Vec2,
    zoom: f32,
    hovered: Option<usize>,
    drag_node: Option<usize>,
    links_rest_dim: bool,
    reveal: RevealState,
    show_bee: bool,
    bee: bee::BeeState,
    fps_current: f32,
}

struct SceneGraph {
    nodes: Vec<SceneNode>,
    links: Vec<SceneLink>,
    canvas: CanvasFrame,
    sim: sim::Simulation,
}

struct SceneNode {
    id: String,
    name: String,
    connections: u32,
    radius: f32,
    color: Color32,
    kind: NodeKind,
    label_lines: Vec<String>,
    pos: Vec2,
    vel: Vec2,
    pinned: Option<Vec2>,
    hidden: bool,
}

struct SceneLink {
    source: usize,
    target: usize,
    kind: LinkKind,
    hidden: bool,
}

/// Square world-space drawing frame, sized from the panel width once per
/// load. Resizing the window does not reflow an existing layout.
#[derive(Clone, Copy)]
struct CanvasFrame {
    center: Vec2,
    ring_radius: f32,
}

impl CanvasFrame {
    fn fit(panel_width: f32) -> Self {
        let side = (panel_width - CANVAS_PADDING)
            .min(MAX_CANVAS_WIDTH)
            .max(MIN_CANVAS_WIDTH);

        Self {
            center: vec2(side * 0.5, side * 0.5),
            ring_radius: side * RING_FACTOR,
        }
    }
}

/// One-shot reveal of the designated hidden node: the first qualifying
/// background click starts an 800 ms fade-in; everything after that is a
/// no-op for the rest of the session.
struct RevealState {
    has_target: bool,
    revealed: bool,
    started_at: Option<f64>,
}

impl RevealState {
    fn new(has_target: bool) -> Self {
        Self {
            has_target,
            revealed: false,
            started_at: None,
        }
    }

    fn trigger(&mut self, now: f64) -> bool {
        if !self.has_target || self.revealed {
            return false;
        }
        self.revealed = true;
        self.started_at = Some(now);
        true
    }

    fn opacity(&self, now: f64) -> f32 {
        if !self.revealed {
            return 0.0;
        }
        match self.started_at {
            Some(start) => (((now - start) / REVEAL_FADE_SECS).clamp(0.0, 1.0)) as f32,
            None => 1.0,
        }
    }

    fn fading(&self, now: f64) -> bool {
        self.revealed
            && self
                .started_at
                .is_some_and(|start| now - start < REVEAL_FADE_SECS)
    }
}

impl RadialApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        sources: DataSources,
        reveal_id: Option<String>,
    ) -> Self {
        let rx = Self::spawn_load(sources.clone());
        Self {
            sources,
            reveal_id,
            state: AppState::Loading { rx },
            reload_rx: None,
        }
    }

    fn spawn_load(sources: DataSources) -> Receiver<GraphData> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let _ = tx.send(load_or_fallback(&sources));
        });

        rx
    }
}

impl eframe::App for RadialApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(data) => {
                        transition = Some(AppState::Ready(Box::new(ViewModel::new(
                            data,
                            self.reveal_id.clone(),
                        ))));
                    }
                    Err(TryRecvError::Empty) => {
                        ctx.request_repaint();
                    }
                    Err(TryRecvError::Disconnected) => {
                        log::warn!("load worker disconnected; rendering substitute dataset");
                        transition = Some(AppState::Ready(Box::new(ViewModel::new(
                            GraphData::fallback(),
                            self.reveal_id.clone(),
                        ))));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading network tables...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.sources.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(data) => {
                            transition = Some(AppState::Ready(Box::new(ViewModel::new(
                                data,
                                self.reveal_id.clone(),
                            ))));
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            log::warn!("reload worker disconnected; keeping current graph");
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}


#[cfg(test)]
mod tests {
    use super::RevealState;

    #[test]
    fn reveal_fires_at_most_once() {
        let mut reveal = RevealState::new(true);

        assert!(reveal.trigger(10.0));
        assert!(!reveal.trigger(11.0));
        assert!(!reveal.trigger(250.0));
        assert!(reveal.revealed);
    }

    #[test]
    fn reveal_without_target_never_fires() {
        let mut reveal = RevealState::new(false);
        assert!(!reveal.trigger(0.0));
        assert_eq!(reveal.opacity(5.0), 0.0);
    }

    #[test]
    fn reveal_opacity_ramps_over_the_fade() {
        let mut reveal = RevealState::new(true);
        assert_eq!(reveal.opacity(0.0), 0.0);

        reveal.trigger(1.0);
        assert_eq!(reveal.opacity(1.0), 0.0);
        let halfway = reveal.opacity(1.4);
        assert!(halfway > 0.4 && halfway < 0.6);
        assert_eq!(reveal.opacity(2.0), 1.0);
        assert!(!reveal.fading(2.0));
    }
}
