mod forces;
mod quadtree;

use eframe::egui::{Vec2, vec2};

use crate::paper::GraphNode;
use crate::util::stable_pair;

use super::render_utils::node_radius;
use quadtree::QuadTree;

const ALPHA_MIN: f32 = 0.001;
const ALPHA_DECAY: f32 = 0.02;
const DRAG_ALPHA_TARGET: f32 = 0.3;
const INITIAL_SPREAD: f32 = 320.0;
const CHARGE_STRENGTH: f32 = 400.0;
const COLLISION_STRENGTH: f32 = 1.0;
const COLLIDE_PADDING: f32 = 5.0;
const LINK_BASE_DISTANCE: f32 = 100.0;
const LINK_DISTANCE_PER_SHARED: f32 = 10.0;
const LINK_DISTANCE_FLOOR: f32 = 12.0;
const LINK_STRENGTH_PER_SHARED: f32 = 0.1;

pub(in crate::app) struct SimNode {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Drag anchor. While set, the integration step overrides forces and
    /// holds the particle exactly here.
    pub pin: Option<Vec2>,
    /// Collision radius: drawn radius plus a fixed padding.
    pub radius: f32,
}

pub(in crate::app) struct SimLink {
    source: usize,
    target: usize,
    distance: f32,
    strength: f32,
    bias: f32,
}

/// Frame-driven force simulation in the d3 style: a scalar energy
/// (`alpha`) relaxes geometrically toward a target, forces are scaled by
/// it, and velocities are friction-damped each step. `step` is a plain
/// synchronous function, so tests can drive it without a frame source.
pub(in crate::app) struct Simulation {
    pub nodes: Vec<SimNode>,
    links: Vec<SimLink>,
    alpha: f32,
    alpha_target: f32,
    pub repulsion_scale: f32,
    pub link_scale: f32,
    pub velocity_decay: f32,
    positions: Vec<Vec2>,
    radii: Vec<f32>,
    kicks: Vec<Vec2>,
}

impl Simulation {
    /// Builds fresh particle state for a graph batch. Initial positions
    /// come from a stable hash of the node id, so layout runs are
    /// reproducible for the same input.
    pub fn new(nodes: &[GraphNode], link_ends: &[(usize, usize, usize)]) -> Self {
        let sim_nodes = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| {
                let (jx, jy) = stable_pair(&node.id);
                let mut offset = vec2(jx, jy);
                if offset.length_sq() <= 1e-4 {
                    let angle = ((index as f32) * 0.618_034 + 0.11) * std::f32::consts::TAU;
                    offset = vec2(angle.cos(), angle.sin());
                }

                SimNode {
                    pos: offset * INITIAL_SPREAD,
                    vel: Vec2::ZERO,
                    pin: None,
                    radius: node_radius(node.keyword_count) + COLLIDE_PADDING,
                }
            })
            .collect::<Vec<_>>();

        let mut degree = vec![0usize; nodes.len()];
        for &(source, target, _value) in link_ends {
            degree[source] += 1;
            degree[target] += 1;
        }

        let links = link_ends
            .iter()
            .map(|&(source, target, value)| {
                let value = value as f32;
                SimLink {
                    source,
                    target,
                    distance: (LINK_BASE_DISTANCE - (value * LINK_DISTANCE_PER_SHARED))
                        .max(LINK_DISTANCE_FLOOR),
                    strength: value * LINK_STRENGTH_PER_SHARED,
                    bias: degree[source] as f32 / (degree[source] + degree[target]) as f32,
                }
            })
            .collect();

        Self {
            nodes: sim_nodes,
            links,
            alpha: 1.0,
            alpha_target: 0.0,
            repulsion_scale: 1.0,
            link_scale: 1.0,
            velocity_decay: 0.3,
            positions: Vec::new(),
            radii: Vec::new(),
            kicks: Vec::new(),
        }
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn settled(&self) -> bool {
        self.alpha < ALPHA_MIN && self.alpha_target < ALPHA_MIN
    }

    /// Re-energizes a settled layout (used after retuning force scales).
    pub fn reheat(&mut self) {
        self.alpha = 1.0;
    }

    pub fn drag_start(&mut self, index: usize, pos: Vec2) {
        let Some(node) = self.nodes.get_mut(index) else {
            return;
        };
        node.pin = Some(pos);
        node.pos = pos;
        node.vel = Vec2::ZERO;
        self.alpha_target = DRAG_ALPHA_TARGET;
    }

    pub fn drag_move(&mut self, index: usize, pos: Vec2) {
        let Some(node) = self.nodes.get_mut(index) else {
            return;
        };
        if node.pin.is_none() {
            return;
        }
        node.pin = Some(pos);
        node.pos = pos;
    }

    pub fn drag_end(&mut self, index: usize) {
        let Some(node) = self.nodes.get_mut(index) else {
            return;
        };
        node.pin = None;
        self.alpha_target = 0.0;
    }

    /// Advances the simulation by one tick. Returns whether anything is
    /// still in motion (callers use this to keep repainting).
    pub fn step(&mut self) -> bool {
        if self.nodes.is_empty() {
            return false;
        }

        self.alpha += (self.alpha_target - self.alpha) * ALPHA_DECAY;
        if self.settled() {
            return false;
        }
        let alpha = self.alpha;
        let node_count = self.nodes.len();

        forces::apply_link_force(&mut self.nodes, &self.links, alpha, self.link_scale);

        self.positions.clear();
        self.radii.clear();
        let mut max_radius = 0.0f32;
        for node in &self.nodes {
            self.positions.push(node.pos);
            self.radii.push(node.radius);
            max_radius = max_radius.max(node.radius);
        }

        self.kicks.clear();
        self.kicks.resize(node_count, Vec2::ZERO);

        if node_count > 1
            && let Some(tree) = QuadTree::build(&self.positions)
        {
            let repulsion = CHARGE_STRENGTH * self.repulsion_scale;
            for (index, kick) in self.kicks.iter_mut().enumerate() {
                forces::accumulate_repulsion(
                    &tree,
                    QuadTree::ROOT,
                    index,
                    &self.positions,
                    repulsion,
                    alpha,
                    kick,
                );
            }

            forces::accumulate_collisions(
                &tree,
                &self.positions,
                &self.radii,
                max_radius,
                COLLISION_STRENGTH,
                &mut self.kicks,
            );
        }

        for (node, kick) in self.nodes.iter_mut().zip(&self.kicks) {
            node.vel += *kick;
        }

        // Centering: translate the centroid back to the origin. This runs
        // before pins are re-asserted, so a held node stays exactly under
        // the pointer.
        let mut centroid = Vec2::ZERO;
        for node in &self.nodes {
            centroid += node.pos;
        }
        centroid /= node_count as f32;
        if centroid.length_sq() > 1e-6 {
            for node in &mut self.nodes {
                node.pos -= centroid;
            }
        }

        let friction = 1.0 - self.velocity_decay.clamp(0.0, 0.95);
        let mut any_motion = false;
        for node in &mut self.nodes {
            if let Some(pin) = node.pin {
                node.pos = pin;
                node.vel = Vec2::ZERO;
                any_motion = true;
                continue;
            }

            node.vel *= friction;
            node.pos += node.vel;
            if node.vel.length_sq() > 1e-6 {
                any_motion = true;
            }
        }

        any_motion || !self.settled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_node(id: &str, keyword_count: usize) -> GraphNode {
        GraphNode {
            id: id.to_string(),
            title: format!("Paper {id}"),
            link: String::new(),
            pmc_id: format!("PMC{id}"),
            keywords: (0..keyword_count).map(|index| format!("k{index}")).collect(),
            keyword_count,
        }
    }

    #[test]
    fn empty_graph_step_is_a_noop() {
        let mut sim = Simulation::new(&[], &[]);
        assert!(!sim.step());
        assert!(sim.nodes.is_empty());
    }

    #[test]
    fn single_node_settles_at_the_center() {
        let mut sim = Simulation::new(&[graph_node("solo", 2)], &[]);
        for _ in 0..10 {
            sim.step();
        }
        assert!(sim.nodes[0].pos.length() < 1e-3);
        assert!(sim.nodes[0].vel.length() < 1e-3);
    }

    #[test]
    fn alpha_decays_until_the_simulation_sleeps() {
        let mut sim = Simulation::new(&[graph_node("a", 1), graph_node("b", 1)], &[]);
        for _ in 0..600 {
            sim.step();
        }
        assert!(sim.settled());
        assert!(!sim.step());
    }

    #[test]
    fn held_node_reports_the_pointer_position_every_tick() {
        let nodes = [graph_node("1", 2), graph_node("2", 2), graph_node("3", 1)];
        let links = [(0, 1, 1), (0, 2, 1)];
        let mut sim = Simulation::new(&nodes, &links);

        let target = vec2(100.0, 100.0);
        sim.drag_start(0, target);
        for _ in 0..50 {
            sim.step();
            assert_eq!(sim.nodes[0].pos, target);
        }

        sim.drag_end(0);
        for _ in 0..600 {
            sim.step();
        }
        assert!(sim.settled());
    }

    #[test]
    fn drag_reenergizes_and_release_cools_down() {
        let mut sim = Simulation::new(&[graph_node("a", 1), graph_node("b", 1)], &[(0, 1, 1)]);
        for _ in 0..600 {
            sim.step();
        }
        assert!(sim.settled());

        sim.drag_start(1, vec2(40.0, -30.0));
        for _ in 0..100 {
            sim.step();
        }
        assert!(sim.alpha() > 0.2);

        sim.drag_end(1);
        for _ in 0..600 {
            sim.step();
        }
        assert!(sim.settled());
    }

    #[test]
    fn drag_events_for_unknown_indices_are_ignored() {
        let mut sim = Simulation::new(&[graph_node("a", 1)], &[]);
        sim.drag_start(7, vec2(1.0, 1.0));
        sim.drag_move(7, vec2(2.0, 2.0));
        sim.drag_end(7);
        assert!(sim.nodes[0].pin.is_none());
        assert_eq!(sim.alpha_target, 0.0);
    }

    #[test]
    fn drag_move_without_drag_start_is_ignored() {
        let mut sim = Simulation::new(&[graph_node("a", 1)], &[]);
        let before = sim.nodes[0].pos;
        sim.drag_move(0, vec2(500.0, 500.0));
        assert!(sim.nodes[0].pin.is_none());
        assert_eq!(sim.nodes[0].pos, before);
    }

    #[test]
    fn linked_pair_converges_near_its_preferred_distance() {
        // One shared keyword: preferred separation 90.
        let nodes = [graph_node("x", 1), graph_node("y", 1)];
        let mut sim = Simulation::new(&nodes, &[(0, 1, 1)]);
        for _ in 0..600 {
            sim.step();
        }

        let distance = (sim.nodes[0].pos - sim.nodes[1].pos).length();
        assert!(
            (60.0..130.0).contains(&distance),
            "settled distance {distance} out of range"
        );
    }

    #[test]
    fn stronger_links_settle_closer() {
        let weak_nodes = [graph_node("a", 1), graph_node("b", 1)];
        let mut weak = Simulation::new(&weak_nodes, &[(0, 1, 1)]);

        let strong_nodes = [graph_node("c", 5), graph_node("d", 5)];
        let mut strong = Simulation::new(&strong_nodes, &[(0, 1, 5)]);

        for _ in 0..600 {
            weak.step();
            strong.step();
        }

        let weak_distance = (weak.nodes[0].pos - weak.nodes[1].pos).length();
        let strong_distance = (strong.nodes[0].pos - strong.nodes[1].pos).length();
        assert!(
            strong_distance < weak_distance,
            "expected {strong_distance} < {weak_distance}"
        );
    }

    #[test]
    fn collision_radius_tracks_keyword_count() {
        let sim = Simulation::new(&[graph_node("small", 0), graph_node("big", 16)], &[]);
        assert!(sim.nodes[1].radius > sim.nodes[0].radius);
        assert_eq!(sim.nodes[0].radius, node_radius(0) + COLLIDE_PADDING);
    }
}
