use std::collections::HashMap;

use eframe::egui::{Vec2, vec2};
use rand::Rng;

use crate::data::{GraphData, NodeKind};
use crate::util::wrap_label;

use super::super::sim::{
    CenterForce, ChargeForce, CollideForce, Force, LinkForce, SETTLE_ALPHA, Simulation,
};
use super::super::{CanvasFrame, INITIAL_ZOOM, SceneGraph, SceneLink, SceneNode, ViewModel};

const CENTER_LABEL_BUDGET: usize = 12;
const OUTER_LABEL_BUDGET: usize = 8;
const FLOATING_MIN_FACTOR: f32 = 1.45;
const FLOATING_SPREAD: f32 = 100.0;

impl ViewModel {
    pub(in crate::app) fn rebuild_scene(&mut self, panel_width: f32) {
        let canvas = CanvasFrame::fit(panel_width);
        let scene = build_scene(&self.data, self.reveal_id.as_deref(), canvas, &mut rand::rng());

        self.pan = Vec2::ZERO;
        self.zoom = INITIAL_ZOOM;
        self.hovered = None;
        self.drag_node = None;
        self.links_rest_dim = false;
        self.scene = Some(scene);
    }
}

pub(in crate::app) fn build_scene(
    data: &GraphData,
    reveal_id: Option<&str>,
    canvas: CanvasFrame,
    rng: &mut impl Rng,
) -> SceneGraph {
    let outer_total = data
        .nodes
        .iter()
        .filter(|node| node.kind == NodeKind::Outer)
        .count();

    let mut outer_seen = 0usize;
    let mut nodes = Vec::with_capacity(data.nodes.len());
    for record in &data.nodes {
        let pos = match record.kind {
            NodeKind::Center => canvas.center,
            NodeKind::Outer => {
                let angle = std::f32::consts::TAU * outer_seen as f32 / outer_total as f32;
                outer_seen += 1;
                canvas.center + vec2(angle.cos(), angle.sin()) * canvas.ring_radius
            }
            NodeKind::Floating => {
                let angle = rng.random_range(0.0..std::f32::consts::TAU);
                let distance = canvas.ring_radius * FLOATING_MIN_FACTOR
                    + rng.random_range(0.0..FLOATING_SPREAD);
                canvas.center + vec2(angle.cos(), angle.sin()) * distance
            }
        };

        let budget = if record.kind == NodeKind::Center {
            CENTER_LABEL_BUDGET
        } else {
            OUTER_LABEL_BUDGET
        };

        nodes.push(SceneNode {
            id: record.id.clone(),
            name: record.name.clone(),
            connections: record.connections,
            radius: record.size,
            color: record.color,
            kind: record.kind,
            label_lines: wrap_label(&record.name, budget),
            pos,
            vel: Vec2::ZERO,
            pinned: None,
            hidden: reveal_id == Some(record.id.as_str()),
        });
    }

    if let Some(target) = reveal_id
        && !nodes.iter().any(|node| node.hidden)
    {
        log::warn!("reveal target '{target}' is not a loaded node; nothing will be hidden");
    }

    let index_by_id = nodes
        .iter()
        .enumerate()
        .map(|(index, node)| (node.id.as_str(), index))
        .collect::<HashMap<_, _>>();

    let mut links = Vec::with_capacity(data.links.len());
    for record in &data.links {
        let (Some(&source), Some(&target)) = (
            index_by_id.get(record.source.as_str()),
            index_by_id.get(record.target.as_str()),
        ) else {
            log::warn!(
                "link {} -> {} references an unknown node; dropped",
                record.source,
                record.target
            );
            continue;
        };

        if source == target {
            log::warn!("self link on {} dropped", record.source);
            continue;
        }

        links.push(SceneLink {
            source,
            target,
            kind: record.kind,
            hidden: nodes[source].hidden || nodes[target].hidden,
        });
    }

    let forces: Vec<Box<dyn Force>> = vec![
        Box::new(LinkForce::new(&links, &nodes, canvas.ring_radius)),
        Box::new(ChargeForce::new(&nodes)),
        Box::new(CenterForce::new(canvas.center)),
        Box::new(CollideForce::new(&nodes)),
    ];

    let mut sim = Simulation::new(forces);
    sim.nudge(SETTLE_ALPHA);

    SceneGraph {
        nodes,
        links,
        canvas,
        sim,
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::Color32;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::data::{LinkKind, LinkRecord, NodeRecord};

    use super::*;

    fn record(id: &str, kind: NodeKind) -> NodeRecord {
        NodeRecord {
            id: id.to_owned(),
            name: id.to_owned(),
            connections: 1,
            size: 15.0,
            color: Color32::GRAY,
            kind,
        }
    }

    fn link(source: &str, target: &str) -> LinkRecord {
        LinkRecord {
            source: source.to_owned(),
            target: target.to_owned(),
            strength: 1.0,
            kind: LinkKind::Directed,
        }
    }

    fn build(data: &GraphData, reveal: Option<&str>) -> SceneGraph {
        let mut rng = StdRng::seed_from_u64(7);
        build_scene(data, reveal, CanvasFrame::fit(830.0), &mut rng)
    }

    #[test]
    fn center_node_starts_at_canvas_center() {
        let data = GraphData {
            nodes: vec![record("hub", NodeKind::Center), record("a", NodeKind::Outer)],
            links: Vec::new(),
        };

        let scene = build(&data, None);
        assert_eq!(scene.nodes[0].pos, scene.canvas.center);
    }

    #[test]
    fn outer_nodes_are_evenly_spaced_on_the_ring() {
        let data = GraphData {
            nodes: vec![
                record("a", NodeKind::Outer),
                record("hub", NodeKind::Center),
                record("b", NodeKind::Outer),
                record("c", NodeKind::Outer),
                record("d", NodeKind::Outer),
            ],
            links: Vec::new(),
        };

        let scene = build(&data, None);
        let canvas = scene.canvas;
        let outer = scene
            .nodes
            .iter()
            .filter(|node| node.kind == NodeKind::Outer)
            .collect::<Vec<_>>();

        for (index, node) in outer.iter().enumerate() {
            let angle = std::f32::consts::TAU * index as f32 / outer.len() as f32;
            let expected = canvas.center
                + vec2(angle.cos(), angle.sin()) * canvas.ring_radius;
            assert!((node.pos - expected).length() < 1e-3);
            assert!(((node.pos - canvas.center).length() - canvas.ring_radius).abs() < 1e-3);
        }
    }

    #[test]
    fn floating_nodes_land_in_the_outer_annulus() {
        let mut nodes = vec![record("hub", NodeKind::Center)];
        for index in 0..40 {
            nodes.push(record(&format!("f{index}"), NodeKind::Floating));
        }
        let data = GraphData {
            nodes,
            links: Vec::new(),
        };

        let scene = build(&data, None);
        let canvas = scene.canvas;
        let min = canvas.ring_radius * FLOATING_MIN_FACTOR;
        for node in scene.nodes.iter().filter(|n| n.kind == NodeKind::Floating) {
            let distance = (node.pos - canvas.center).length();
            assert!(distance >= min - 1e-3);
            assert!(distance < min + FLOATING_SPREAD + 1e-3);
        }
    }

    #[test]
    fn dangling_links_are_dropped() {
        let data = GraphData {
            nodes: vec![record("hub", NodeKind::Center), record("a", NodeKind::Outer)],
            links: vec![link("hub", "a"), link("hub", "ghost"), link("ghost", "a")],
        };

        let scene = build(&data, None);
        assert_eq!(scene.links.len(), 1);
        assert_eq!(scene.links[0].source, 0);
        assert_eq!(scene.links[0].target, 1);
    }

    #[test]
    fn reveal_target_hides_node_and_its_links() {
        let data = GraphData {
            nodes: vec![
                record("hub", NodeKind::Center),
                record("a", NodeKind::Outer),
                record("secret", NodeKind::Floating),
            ],
            links: vec![link("hub", "a"), link("secret", "hub")],
        };

        let scene = build(&data, Some("secret"));
        assert!(scene.nodes[2].hidden);
        assert!(!scene.nodes[0].hidden);
        assert!(!scene.links[0].hidden);
        assert!(scene.links[1].hidden);
    }

    #[test]
    fn label_budget_differs_for_center_node() {
        let mut hub = record("hub", NodeKind::Center);
        hub.name = "Soil Carbon".to_owned();
        let mut outer = record("a", NodeKind::Outer);
        outer.name = "Soil Carbon".to_owned();

        let data = GraphData {
            nodes: vec![hub, outer],
            links: Vec::new(),
        };

        let scene = build(&data, None);
        assert_eq!(scene.nodes[0].label_lines, vec!["Soil Carbon".to_owned()]);
        assert_eq!(
            scene.nodes[1].label_lines,
            vec!["Soil".to_owned(), "Carbon".to_owned()]
        );
    }
}
