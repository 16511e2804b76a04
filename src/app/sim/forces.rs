use eframe::egui::{Vec2, vec2};

use super::quadtree::QuadTree;
use super::{SimLink, SimNode};

// Barnes-Hut opening criterion, theta = 0.9.
const THETA_SQ: f32 = 0.81;
const REPULSION_SOFTENING: f32 = 1.0;

/// Deterministic separation direction for coincident particles.
fn jiggle_direction(a: usize, b: usize) -> Vec2 {
    let angle = ((a as f32) * 0.618_034 + (b as f32) * 0.414_214) * std::f32::consts::TAU;
    vec2(angle.cos(), angle.sin())
}

/// Spring force per link: pulls the pair toward the link's preferred
/// distance, split between the endpoints by degree bias so hubs move
/// less than leaves.
pub(super) fn apply_link_force(
    nodes: &mut [SimNode],
    links: &[SimLink],
    alpha: f32,
    link_scale: f32,
) {
    for link in links {
        let from = &nodes[link.source];
        let to = &nodes[link.target];

        let delta = (to.pos + to.vel) - (from.pos + from.vel);
        let mut distance = delta.length();
        let direction = if distance > 1e-4 {
            delta / distance
        } else {
            distance = 1e-4;
            jiggle_direction(link.source, link.target)
        };

        let strength = (link.strength * link_scale).clamp(0.0, 1.0);
        let correction = direction * ((distance - link.distance) * strength * alpha);

        nodes[link.target].vel -= correction * link.bias;
        nodes[link.source].vel += correction * (1.0 - link.bias);
    }
}

fn repulsion_between(point: Vec2, other: Vec2, strength: f32, alpha: f32, fallback: Vec2) -> Vec2 {
    let delta = point - other;
    let distance_sq = delta.length_sq();
    let direction = if distance_sq > 1e-8 {
        delta / distance_sq.sqrt()
    } else {
        fallback
    };
    direction * (strength * alpha / (distance_sq + REPULSION_SOFTENING))
}

/// Many-body repulsion for one particle, approximating distant cells by
/// their center of mass.
pub(super) fn accumulate_repulsion(
    tree: &QuadTree,
    cell_index: u32,
    index: usize,
    positions: &[Vec2],
    strength: f32,
    alpha: f32,
    kick: &mut Vec2,
) {
    let cell = tree.cell(cell_index);
    if cell.mass <= 0.0 {
        return;
    }
    let point = positions[index];

    if cell.is_leaf() {
        for &other in &cell.points {
            if other == index {
                continue;
            }
            *kick += repulsion_between(
                point,
                positions[other],
                strength,
                alpha,
                jiggle_direction(index, other),
            );
        }
        return;
    }

    let delta = point - cell.center_of_mass;
    let distance_sq = delta.length_sq().max(1e-4);
    let side = cell.quad.side();
    if !cell.quad.contains(point) && (side * side) < THETA_SQ * distance_sq {
        let distance = distance_sq.sqrt();
        *kick += (delta / distance) * (strength * cell.mass * alpha / (distance_sq + REPULSION_SOFTENING));
        return;
    }

    for child in cell.child_cells() {
        accumulate_repulsion(tree, child, index, positions, strength, alpha, kick);
    }
}

/// Pairwise overlap resolution. Each overlapping pair gets an equal and
/// opposite velocity push proportional to the overlap; the quadtree
/// prunes pairs that cannot be within collision reach.
pub(super) fn accumulate_collisions(
    tree: &QuadTree,
    positions: &[Vec2],
    radii: &[f32],
    max_radius: f32,
    strength: f32,
    kicks: &mut [Vec2],
) {
    for index in 0..positions.len() {
        collide_visit(
            tree,
            QuadTree::ROOT,
            index,
            positions,
            radii,
            max_radius,
            strength,
            kicks,
        );
    }
}

#[allow(clippy::too_many_arguments)]
fn collide_visit(
    tree: &QuadTree,
    cell_index: u32,
    index: usize,
    positions: &[Vec2],
    radii: &[f32],
    max_radius: f32,
    strength: f32,
    kicks: &mut [Vec2],
) {
    let cell = tree.cell(cell_index);
    let reach = radii[index] + max_radius;
    if cell.quad.gap_sq(positions[index]) > reach * reach {
        return;
    }

    if cell.is_leaf() {
        for &other in &cell.points {
            // Strictly-greater guard: every unordered pair resolves once.
            if other <= index {
                continue;
            }

            let min_distance = radii[index] + radii[other];
            let delta = positions[index] - positions[other];
            let distance_sq = delta.length_sq();
            if distance_sq >= min_distance * min_distance {
                continue;
            }

            let distance = distance_sq.sqrt();
            let direction = if distance > 1e-4 {
                delta / distance
            } else {
                jiggle_direction(index, other)
            };

            let push = direction * ((min_distance - distance) * 0.5 * strength);
            kicks[index] += push;
            kicks[other] -= push;
        }
        return;
    }

    for child in cell.child_cells() {
        collide_visit(
            tree, child, index, positions, radii, max_radius, strength, kicks,
        );
    }
}
