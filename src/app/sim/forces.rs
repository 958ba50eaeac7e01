use eframe::egui::{Vec2, vec2};

use crate::data::NodeKind;

use super::quadtree::ChargeNode;
use super::{Force, SceneNode};
use super::super::SceneLink;

const LINK_STRENGTH: f32 = 0.3;
const LINK_DISTANCE: f32 = 100.0;
const CENTER_LINK_FACTOR: f32 = 0.9;
const CHARGE_CENTER: f32 = -1000.0;
const CHARGE_OTHER: f32 = -300.0;
const THETA: f32 = 0.9;
const MIN_DISTANCE_SQ: f32 = 1.0;
const CENTERING_STRENGTH: f32 = 0.1;
const COLLIDE_PADDING: f32 = 10.0;
const COLLIDE_STRENGTH: f32 = 0.7;

fn fallback_direction(a: usize, b: usize) -> Vec2 {
    let angle = ((a as f32) * 0.618_034 + (b as f32) * 0.414_214) * std::f32::consts::TAU;
    vec2(angle.cos(), angle.sin())
}

struct LinkSpec {
    source: usize,
    target: usize,
    distance: f32,
    bias: f32,
}

/// Spring toward a per-link rest distance, split between endpoints by
/// degree so well-connected nodes move less.
pub(in crate::app) struct LinkForce {
    links: Vec<LinkSpec>,
}

impl LinkForce {
    pub(in crate::app) fn new(
        links: &[SceneLink],
        nodes: &[SceneNode],
        ring_radius: f32,
    ) -> Self {
        let mut degree = vec![0usize; nodes.len()];
        for link in links {
            degree[link.source] += 1;
            degree[link.target] += 1;
        }

        let links = links
            .iter()
            .map(|link| {
                let touches_center = nodes[link.source].kind == NodeKind::Center
                    || nodes[link.target].kind == NodeKind::Center;
                let distance = if touches_center {
                    ring_radius * CENTER_LINK_FACTOR
                } else {
                    LINK_DISTANCE
                };
                let bias = degree[link.source] as f32
                    / (degree[link.source] + degree[link.target]) as f32;

                LinkSpec {
                    source: link.source,
                    target: link.target,
                    distance,
                    bias,
                }
            })
            .collect();

        Self { links }
    }
}

impl Force for LinkForce {
    fn apply(&mut self, nodes: &mut [SceneNode], alpha: f32) {
        for spec in &self.links {
            let delta = (nodes[spec.target].pos + nodes[spec.target].vel)
                - (nodes[spec.source].pos + nodes[spec.source].vel);
            let length = delta.length();
            let (unit, length) = if length > 1e-3 {
                (delta / length, length)
            } else {
                (fallback_direction(spec.source, spec.target), 1e-3)
            };

            let correction = unit * ((length - spec.distance) * alpha * LINK_STRENGTH);
            nodes[spec.target].vel -= correction * spec.bias;
            nodes[spec.source].vel += correction * (1.0 - spec.bias);
        }
    }
}

/// Many-body repulsion, Barnes-Hut accumulated. The center node carries
/// a far larger charge than the rest.
pub(in crate::app) struct ChargeForce {
    strengths: Vec<f32>,
    positions: Vec<Vec2>,
}

impl ChargeForce {
    pub(in crate::app) fn new(nodes: &[SceneNode]) -> Self {
        let strengths = nodes
            .iter()
            .map(|node| {
                if node.kind == NodeKind::Center {
                    CHARGE_CENTER
                } else {
                    CHARGE_OTHER
                }
            })
            .collect();

        Self {
            strengths,
            positions: Vec::new(),
        }
    }
}

impl Force for ChargeForce {
    fn apply(&mut self, nodes: &mut [SceneNode], alpha: f32) {
        self.positions.clear();
        self.positions.extend(nodes.iter().map(|node| node.pos));

        let Some(tree) = ChargeNode::build(&self.positions, &self.strengths) else {
            return;
        };

        for (index, node) in nodes.iter_mut().enumerate() {
            let mut accel = Vec2::ZERO;
            accumulate_charge(
                &tree,
                index,
                self.positions[index],
                &self.positions,
                &self.strengths,
                alpha,
                &mut accel,
            );
            node.vel += accel;
        }
    }
}

fn accumulate_charge(
    cell: &ChargeNode,
    index: usize,
    point: Vec2,
    positions: &[Vec2],
    strengths: &[f32],
    alpha: f32,
    accel: &mut Vec2,
) {
    if cell.is_leaf() {
        for &other in &cell.indices {
            if other == index {
                continue;
            }
            let delta = positions[other] - point;
            let length_sq = delta.length_sq();
            let (delta, length_sq) = if length_sq > 1e-6 {
                (delta, length_sq.max(MIN_DISTANCE_SQ))
            } else {
                (fallback_direction(index, other), MIN_DISTANCE_SQ)
            };
            *accel += delta * (strengths[other] * alpha / length_sq);
        }
        return;
    }

    let delta = cell.charge_center - point;
    let length_sq = delta.length_sq().max(MIN_DISTANCE_SQ);
    if !cell.contains(point) && (cell.side_length() / length_sq.sqrt()) < THETA {
        *accel += delta * (cell.charge * alpha / length_sq);
        return;
    }

    for child in cell.children.iter().flatten() {
        accumulate_charge(child, index, point, positions, strengths, alpha, accel);
    }
}

/// Translates the whole layout so its centroid drifts toward the canvas
/// center. Operates on positions directly, independent of alpha.
pub(in crate::app) struct CenterForce {
    center: Vec2,
}

impl CenterForce {
    pub(in crate::app) fn new(center: Vec2) -> Self {
        Self { center }
    }
}

impl Force for CenterForce {
    fn apply(&mut self, nodes: &mut [SceneNode], _alpha: f32) {
        if nodes.is_empty() {
            return;
        }

        let mut centroid = Vec2::ZERO;
        for node in nodes.iter() {
            centroid += node.pos;
        }
        centroid /= nodes.len() as f32;

        let shift = (centroid - self.center) * CENTERING_STRENGTH;
        for node in nodes.iter_mut() {
            node.pos -= shift;
        }
    }
}

/// Pairwise overlap resolution against each node's visual radius plus a
/// fixed margin.
pub(in crate::app) struct CollideForce {
    radii: Vec<f32>,
}

impl CollideForce {
    pub(in crate::app) fn new(nodes: &[SceneNode]) -> Self {
        Self {
            radii: nodes
                .iter()
                .map(|node| node.radius + COLLIDE_PADDING)
                .collect(),
        }
    }
}

impl Force for CollideForce {
    fn apply(&mut self, nodes: &mut [SceneNode], _alpha: f32) {
        for i in 0..nodes.len() {
            for j in (i + 1)..nodes.len() {
                let xi = nodes[i].pos + nodes[i].vel;
                let xj = nodes[j].pos + nodes[j].vel;
                let delta = xi - xj;
                let min_distance = self.radii[i] + self.radii[j];
                let length_sq = delta.length_sq();
                if length_sq >= min_distance * min_distance {
                    continue;
                }

                let length = length_sq.sqrt();
                let (unit, length) = if length > 1e-3 {
                    (delta / length, length)
                } else {
                    (fallback_direction(i, j), 1e-3)
                };

                let push = (min_distance - length) * COLLIDE_STRENGTH;
                let ri_sq = self.radii[i] * self.radii[i];
                let rj_sq = self.radii[j] * self.radii[j];
                let weight = rj_sq / (ri_sq + rj_sq);

                nodes[i].vel += unit * (push * weight);
                nodes[j].vel -= unit * (push * (1.0 - weight));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::*;
    use crate::app::test_support::scene_node;

    #[test]
    fn link_force_contracts_overlong_links() {
        let mut nodes = vec![
            scene_node("a", vec2(0.0, 0.0), 10.0),
            scene_node("b", vec2(400.0, 0.0), 10.0),
        ];
        let links = vec![SceneLink {
            source: 0,
            target: 1,
            kind: crate::data::LinkKind::Plain,
            hidden: false,
        }];

        let mut force = LinkForce::new(&links, &nodes, 240.0);
        force.apply(&mut nodes, 1.0);

        assert!(nodes[0].vel.x > 0.0);
        assert!(nodes[1].vel.x < 0.0);
    }

    #[test]
    fn charge_force_pushes_nodes_apart() {
        let mut nodes = vec![
            scene_node("a", vec2(-10.0, 0.0), 10.0),
            scene_node("b", vec2(10.0, 0.0), 10.0),
        ];

        let mut force = ChargeForce::new(&nodes);
        force.apply(&mut nodes, 1.0);

        assert!(nodes[0].vel.x < 0.0);
        assert!(nodes[1].vel.x > 0.0);
    }

    #[test]
    fn barnes_hut_matches_brute_force_for_far_cluster() {
        let cluster = [
            vec2(1000.0, 0.0),
            vec2(1004.0, 2.0),
            vec2(998.0, -3.0),
            vec2(1002.0, 4.0),
            vec2(996.0, 1.0),
            vec2(1001.0, -2.0),
        ];
        let mut nodes = vec![scene_node("probe", vec2(0.0, 0.0), 10.0)];
        for (index, pos) in cluster.iter().enumerate() {
            nodes.push(scene_node(&format!("c{index}"), *pos, 10.0));
        }

        let mut force = ChargeForce::new(&nodes);
        force.apply(&mut nodes, 1.0);
        let approx = nodes[0].vel;

        let mut brute = vec2(0.0, 0.0);
        for pos in cluster {
            let delta = pos - vec2(0.0, 0.0);
            brute += delta * (CHARGE_OTHER / delta.length_sq());
        }

        assert!((approx - brute).length() < brute.length() * 0.05);
    }

    #[test]
    fn center_force_moves_centroid_toward_center() {
        let center = vec2(400.0, 400.0);
        let mut nodes = vec![
            scene_node("a", vec2(0.0, 0.0), 10.0),
            scene_node("b", vec2(100.0, 0.0), 10.0),
        ];

        let before = (nodes[0].pos + nodes[1].pos) * 0.5;
        let mut force = CenterForce::new(center);
        force.apply(&mut nodes, 1.0);
        let after = (nodes[0].pos + nodes[1].pos) * 0.5;

        assert!((after - center).length() < (before - center).length());
    }

    #[test]
    fn collide_force_separates_overlapping_nodes() {
        let mut nodes = vec![
            scene_node("a", vec2(0.0, 0.0), 15.0),
            scene_node("b", vec2(5.0, 0.0), 15.0),
        ];

        let mut force = CollideForce::new(&nodes);
        force.apply(&mut nodes, 1.0);

        assert!(nodes[0].vel.x < 0.0);
        assert!(nodes[1].vel.x > 0.0);
    }

    #[test]
    fn collide_force_ignores_separated_nodes() {
        let mut nodes = vec![
            scene_node("a", vec2(0.0, 0.0), 10.0),
            scene_node("b", vec2(100.0, 0.0), 10.0),
        ];

        let mut force = CollideForce::new(&nodes);
        force.apply(&mut nodes, 1.0);

        assert_eq!(nodes[0].vel, vec2(0.0, 0.0));
        assert_eq!(nodes[1].vel, vec2(0.0, 0.0));
    }
}
