use eframe::egui::{Vec2, vec2};

use super::super::VisualNode;
use super::TargetX;
use super::quadtree::QuadNode;

#[derive(Clone, Copy)]
pub(super) struct ManyBodyParams {
    pub(super) alpha: f32,
    pub(super) theta_sq: f32,
    pub(super) distance_min_sq: f32,
}

pub(super) fn node_charge(radius: f32, strength: f32) -> f32 {
    -(radius * radius) * strength
}

/// Spring toward `(target_x(node), target_y)`, scaled by strength and energy.
pub(super) fn accumulate_position_pull(
    nodes: &[VisualNode],
    target_x: &TargetX,
    target_y: f32,
    strength: f32,
    alpha: f32,
    deltas: &mut [Vec2],
) {
    let scale = strength * alpha;
    for (node, delta) in nodes.iter().zip(deltas.iter_mut()) {
        let position = node.position();
        delta.x += (target_x.resolve(node) - position.x) * scale;
        delta.y += (target_y - position.y) * scale;
    }
}

fn coincident_offset(from: usize, to: usize) -> Vec2 {
    let (low, high) = if from < to { (from, to) } else { (to, from) };
    let angle = ((low as f32) * 0.618_034 + (high as f32) * 0.414_214) * std::f32::consts::TAU;
    let direction = vec2(angle.cos(), angle.sin()) * 1.0e-3;
    if from < to { direction } else { -direction }
}

/// Velocity change on a node at `point` from charge at `source`. Negative
/// charge pushes the node away.
fn charge_between(
    point: Vec2,
    source: Vec2,
    charge: f32,
    params: ManyBodyParams,
    pair: (usize, usize),
) -> Vec2 {
    let mut offset = source - point;
    let mut distance_sq = offset.length_sq();
    if distance_sq <= f32::EPSILON {
        offset = coincident_offset(pair.0, pair.1);
        distance_sq = offset.length_sq();
    }
    if distance_sq < params.distance_min_sq {
        distance_sq = (params.distance_min_sq * distance_sq).sqrt();
    }
    offset * (charge * params.alpha / distance_sq)
}

pub(super) fn accumulate_repulsion_for_node(
    node: &QuadNode,
    index: usize,
    positions: &[Vec2],
    charges: &[f32],
    params: ManyBodyParams,
    delta: &mut Vec2,
) {
    if node.charge == 0.0 {
        return;
    }

    let point = positions[index];

    if node.is_leaf() {
        for &other_index in &node.indices {
            if other_index == index {
                continue;
            }
            *delta += charge_between(
                point,
                positions[other_index],
                charges[other_index],
                params,
                (index, other_index),
            );
        }
        return;
    }

    let distance_sq = (node.charge_center - point).length_sq();
    let side = node.bounds.side;
    let can_approximate =
        !node.bounds.contains(point) && (side * side) < params.theta_sq * distance_sq;

    if can_approximate {
        let pair = (index, usize::MAX);
        *delta += charge_between(point, node.charge_center, node.charge, params, pair);
        return;
    }

    for child in &node.children {
        if let Some(child) = child.as_ref() {
            accumulate_repulsion_for_node(child, index, positions, charges, params, delta);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARAMS: ManyBodyParams = ManyBodyParams {
        alpha: 1.0,
        theta_sq: 0.81,
        distance_min_sq: 1.0,
    };

    fn repulsion_on_first(positions: &[Vec2], radii: &[f32]) -> Vec2 {
        let charges = radii
            .iter()
            .map(|radius| node_charge(*radius, 0.03))
            .collect::<Vec<_>>();
        let tree = QuadNode::build(positions, &charges).expect("finite points");
        let mut delta = Vec2::ZERO;
        accumulate_repulsion_for_node(&tree, 0, positions, &charges, PARAMS, &mut delta);
        delta
    }

    #[test]
    fn neighbor_pushes_node_away() {
        let delta = repulsion_on_first(&[vec2(0.0, 0.0), vec2(10.0, 0.0)], &[5.0, 5.0]);
        assert!(delta.x < 0.0);
        assert!(delta.y.abs() < 1e-6);
    }

    #[test]
    fn larger_neighbor_repels_harder() {
        let positions = [vec2(0.0, 0.0), vec2(50.0, 0.0)];
        let from_small = repulsion_on_first(&positions, &[4.0, 5.0]);
        let from_large = repulsion_on_first(&positions, &[4.0, 40.0]);
        assert!(from_large.length() > from_small.length());
        assert!((from_large.length() / from_small.length() - 64.0).abs() < 1e-3);
    }

    #[test]
    fn coincident_nodes_separate_in_opposite_directions() {
        let positions = [vec2(5.0, 5.0), vec2(5.0, 5.0)];
        let charges = [node_charge(3.0, 0.03); 2];
        let tree = QuadNode::build(&positions, &charges).expect("finite points");
        let mut first = Vec2::ZERO;
        let mut second = Vec2::ZERO;
        accumulate_repulsion_for_node(&tree, 0, &positions, &charges, PARAMS, &mut first);
        accumulate_repulsion_for_node(&tree, 1, &positions, &charges, PARAMS, &mut second);

        assert!(first.is_finite() && second.is_finite());
        assert!(first.length() > 0.0);
        assert!((first + second).length() < 1e-6);
    }

    #[test]
    fn far_cluster_is_approximated_close_to_exact_sum() {
        let mut positions = vec![vec2(-2000.0, 0.0)];
        for index in 0..30 {
            positions.push(vec2(
                400.0 + (index % 6) as f32 * 12.0,
                (index / 6) as f32 * 12.0,
            ));
        }
        let charges = vec![node_charge(6.0, 0.03); positions.len()];
        let tree = QuadNode::build(&positions, &charges).expect("finite points");

        let mut approximate = Vec2::ZERO;
        accumulate_repulsion_for_node(&tree, 0, &positions, &charges, PARAMS, &mut approximate);

        let mut exact = Vec2::ZERO;
        for other in 1..positions.len() {
            exact += charge_between(positions[0], positions[other], charges[other], PARAMS, (0, other));
        }

        assert!(approximate.x < 0.0);
        assert!((approximate - exact).length() / exact.length() < 0.05);
    }
}
