mod forces;
mod quadtree;

use eframe::egui::Vec2;

use super::SceneNode;
pub(in crate::app) use forces::{CenterForce, ChargeForce, CollideForce, LinkForce};

const ALPHA_MIN: f32 = 0.001;
const ALPHA_DECAY_STEPS: f32 = 300.0;
const VELOCITY_DECAY: f32 = 0.6;

pub(in crate::app) const SETTLE_ALPHA: f32 = 0.1;
pub(in crate::app) const DRAG_ALPHA_TARGET: f32 = 0.3;

pub(in crate::app) trait Force {
    fn apply(&mut self, nodes: &mut [SceneNode], alpha: f32);
}

/// Iterative relaxation engine: composed forces write into node velocities,
/// positions integrate once per step, and an exponentially decaying `alpha`
/// scales everything down until the layout sleeps below `ALPHA_MIN`.
/// Raising `alpha_target` (while dragging) keeps it awake.
pub(in crate::app) struct Simulation {
    alpha: f32,
    alpha_decay: f32,
    alpha_target: f32,
    forces: Vec<Box<dyn Force>>,
}

impl Simulation {
    pub(in crate::app) fn new(forces: Vec<Box<dyn Force>>) -> Self {
        Self {
            alpha: 1.0,
            alpha_decay: 1.0 - ALPHA_MIN.powf(1.0 / ALPHA_DECAY_STEPS),
            alpha_target: 0.0,
            forces,
        }
    }

    pub(in crate::app) fn nudge(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    pub(in crate::app) fn set_alpha_target(&mut self, target: f32) {
        self.alpha_target = target.clamp(0.0, 1.0);
    }

    pub(in crate::app) fn step(&mut self, nodes: &mut [SceneNode]) -> bool {
        if self.alpha < ALPHA_MIN && self.alpha_target < ALPHA_MIN {
            return false;
        }

        self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;

        for force in &mut self.forces {
            force.apply(nodes, self.alpha);
        }

        for node in nodes.iter_mut() {
            if let Some(pin) = node.pinned {
                node.pos = pin;
                node.vel = Vec2::ZERO;
            } else {
                node.vel *= VELOCITY_DECAY;
                node.pos += node.vel;
            }
        }

        self.alpha >= ALPHA_MIN
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::*;
    use crate::app::test_support::scene_node;

    struct Nudge(Vec2);

    impl Force for Nudge {
        fn apply(&mut self, nodes: &mut [SceneNode], alpha: f32) {
            for node in nodes {
                node.vel += self.0 * alpha;
            }
        }
    }

    #[test]
    fn simulation_sleeps_after_alpha_decays() {
        let mut sim = Simulation::new(vec![Box::new(Nudge(vec2(1.0, 0.0)))]);
        let mut nodes = vec![scene_node("a", vec2(0.0, 0.0), 10.0)];

        let mut steps = 0usize;
        while sim.step(&mut nodes) {
            steps += 1;
            assert!(steps < 10_000, "simulation never settled");
        }

        assert!(!sim.step(&mut nodes));
        assert!(nodes[0].pos.x > 0.0);
    }

    #[test]
    fn raised_alpha_target_keeps_simulation_awake() {
        let mut sim = Simulation::new(vec![]);
        let mut nodes = vec![scene_node("a", vec2(0.0, 0.0), 10.0)];

        while sim.step(&mut nodes) {}

        sim.set_alpha_target(DRAG_ALPHA_TARGET);
        for _ in 0..50 {
            assert!(sim.step(&mut nodes));
        }

        sim.set_alpha_target(0.0);
        while sim.step(&mut nodes) {}
        assert!(!sim.step(&mut nodes));
    }

    #[test]
    fn pinned_node_holds_position_through_steps() {
        let mut sim = Simulation::new(vec![Box::new(Nudge(vec2(3.0, -2.0)))]);
        let pin = vec2(40.0, 25.0);
        let mut pinned = scene_node("a", pin, 10.0);
        pinned.pinned = Some(pin);
        let mut nodes = vec![pinned, scene_node("b", vec2(0.0, 0.0), 10.0)];

        for _ in 0..20 {
            sim.step(&mut nodes);
        }

        assert_eq!(nodes[0].pos, pin);
        assert_eq!(nodes[0].vel, Vec2::ZERO);
        assert!(nodes[1].pos != vec2(0.0, 0.0));
    }
}
