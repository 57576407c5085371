mod forces;
mod quadtree;

use eframe::egui::Vec2;
use tracing::{debug, trace};

use super::VisualNode;
use super::mode::{GroupAttribute, GroupCenters};
use crate::config::ChartConfig;
use forces::{
    ManyBodyParams, accumulate_position_pull, accumulate_repulsion_for_node, node_charge,
};
pub use quadtree::QuadtreeCell;
use quadtree::{QuadNode, collect_quadtree_cells};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutParams {
    /// Shared by the position pull and the charge (`-strength * radius²`).
    pub strength: f32,
    pub velocity_decay: f32,
    pub alpha_min: f32,
    pub alpha_decay: f32,
    pub alpha_target: f32,
    pub theta: f32,
    pub distance_min: f32,
}

impl LayoutParams {
    pub fn from_config(config: &ChartConfig) -> Self {
        Self {
            strength: config.position_strength,
            velocity_decay: config.velocity_decay,
            alpha_min: config.alpha_min,
            alpha_decay: config.alpha_decay,
            alpha_target: 0.0,
            theta: config.theta,
            distance_min: 1.0,
        }
    }
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self::from_config(&ChartConfig::default())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum TargetX {
    Fixed(f32),
    Grouped {
        attribute: GroupAttribute,
        centers: GroupCenters,
    },
}

impl TargetX {
    pub fn resolve(&self, node: &VisualNode) -> f32 {
        match self {
            Self::Fixed(x) => *x,
            Self::Grouped { attribute, centers } => {
                let key = attribute.key(node);
                centers.get(key).map(|center| center.x).unwrap_or_else(|| {
                    trace!(node = %node.id, key, "no group center; pulling toward x = 0");
                    0.0
                })
            }
        }
    }
}

#[derive(Default)]
struct LayoutScratch {
    deltas: Vec<Vec2>,
    positions: Vec<Vec2>,
    charges: Vec<f32>,
}

impl LayoutScratch {
    fn load(&mut self, nodes: &[VisualNode], strength: f32) {
        self.deltas.clear();
        self.deltas.resize(nodes.len(), Vec2::ZERO);
        self.positions.clear();
        self.charges.clear();
        for node in nodes {
            self.positions.push(node.position());
            self.charges.push(node_charge(node.radius, strength));
        }
    }
}

pub struct LayoutEngine {
    nodes: Vec<VisualNode>,
    params: LayoutParams,
    target_x: TargetX,
    target_y: f32,
    alpha: f32,
    running: bool,
    ticks_since_restart: u32,
    scratch: LayoutScratch,
}

impl LayoutEngine {
    pub fn new(nodes: Vec<VisualNode>, params: LayoutParams, center: Vec2) -> Self {
        Self {
            nodes,
            params,
            target_x: TargetX::Fixed(center.x),
            target_y: center.y,
            alpha: 1.0,
            running: true,
            ticks_since_restart: 0,
            scratch: LayoutScratch::default(),
        }
    }

    pub fn nodes(&self) -> &[VisualNode] {
        &self.nodes
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn ticks_since_restart(&self) -> u32 {
        self.ticks_since_restart
    }

    pub fn target_x(&self) -> &TargetX {
        &self.target_x
    }

    pub fn set_target_x(&mut self, target_x: TargetX) {
        self.target_x = target_x;
    }

    pub fn restart(&mut self) {
        self.alpha = 1.0;
        self.running = true;
        self.ticks_since_restart = 0;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Runs one tick. Returns `false` without touching anything once the
    /// engine is stopped or has cooled below `alpha_min`.
    pub fn advance(&mut self) -> bool {
        if !self.running {
            return false;
        }

        let params = self.params;
        self.alpha += (params.alpha_target - self.alpha) * params.alpha_decay;
        let alpha = self.alpha;

        let scratch = &mut self.scratch;
        scratch.load(&self.nodes, params.strength);

        accumulate_position_pull(
            &self.nodes,
            &self.target_x,
            self.target_y,
            params.strength,
            alpha,
            &mut scratch.deltas,
        );

        if self.nodes.len() > 1
            && let Some(tree) = QuadNode::build(&scratch.positions, &scratch.charges)
        {
            let many_body = ManyBodyParams {
                alpha,
                theta_sq: params.theta * params.theta,
                distance_min_sq: params.distance_min * params.distance_min,
            };
            for (index, delta) in scratch.deltas.iter_mut().enumerate() {
                accumulate_repulsion_for_node(
                    &tree,
                    index,
                    &scratch.positions,
                    &scratch.charges,
                    many_body,
                    delta,
                );
            }
        }

        let retain = 1.0 - params.velocity_decay;
        for (node, delta) in self.nodes.iter_mut().zip(&scratch.deltas) {
            node.integrate((node.velocity() + *delta) * retain);
        }

        self.ticks_since_restart += 1;
        if self.alpha < params.alpha_min {
            self.running = false;
            debug!(ticks = self.ticks_since_restart, "layout settled");
        }
        true
    }

    pub fn quadtree_cells(&self, cells: &mut Vec<QuadtreeCell>) {
        cells.clear();
        let positions = self.nodes.iter().map(VisualNode::position).collect::<Vec<_>>();
        let charges = self
            .nodes
            .iter()
            .map(|node| node_charge(node.radius, self.params.strength))
            .collect::<Vec<_>>();
        if let Some(tree) = QuadNode::build(&positions, &charges) {
            collect_quadtree_cells(&tree, 0, cells);
        }
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::*;
    use crate::chart::test_support::node_at;
    use crate::config::CanvasSize;

    fn run_until_settled(engine: &mut LayoutEngine) -> u32 {
        let mut ticks = 0;
        while engine.advance() {
            ticks += 1;
            assert!(ticks <= 10_000, "layout never settled");
        }
        ticks
    }

    #[test]
    fn settles_after_bounded_ticks_and_then_idles() {
        let nodes = vec![
            node_at("a", 100.0, "Jan", vec2(50.0, 50.0)),
            node_at("b", 400.0, "Jan", vec2(900.0, 500.0)),
        ];
        let mut engine = LayoutEngine::new(nodes, LayoutParams::default(), vec2(620.0, 300.0));

        let ticks = run_until_settled(&mut engine);
        assert!((299..=301).contains(&ticks), "settled after {ticks} ticks");
        assert!(!engine.is_running());

        let frozen = engine.nodes()[0].position();
        assert!(!engine.advance());
        assert_eq!(engine.nodes()[0].position(), frozen);
    }

    #[test]
    fn lone_node_converges_on_its_target() {
        let nodes = vec![node_at("a", 100.0, "Jan", vec2(100.0, 100.0))];
        let mut engine = LayoutEngine::new(nodes, LayoutParams::default(), vec2(620.0, 300.0));
        run_until_settled(&mut engine);

        let position = engine.nodes()[0].position();
        assert!((position.x - 620.0).abs() < 5.0, "x = {}", position.x);
        assert!((position.y - 300.0).abs() < 5.0, "y = {}", position.y);
    }

    #[test]
    fn grouped_target_separates_groups_in_key_order() {
        let canvas = CanvasSize::default();
        let nodes = vec![
            node_at("a", 100.0, "Jan", vec2(300.0, 200.0)),
            node_at("b", 200.0, "Jan", vec2(900.0, 500.0)),
            node_at("c", 300.0, "Feb", vec2(600.0, 100.0)),
        ];
        let centers = GroupCenters::evenly_spaced(
            vec!["Jan".to_owned(), "Feb".to_owned()],
            canvas,
        );
        let jan_x = centers.get("Jan").expect("jan").x;
        let feb_x = centers.get("Feb").expect("feb").x;

        let mut engine = LayoutEngine::new(nodes, LayoutParams::default(), canvas.center());
        engine.set_target_x(TargetX::Grouped {
            attribute: GroupAttribute::Month,
            centers,
        });
        run_until_settled(&mut engine);

        let xs = engine
            .nodes()
            .iter()
            .map(|node| node.position().x)
            .collect::<Vec<_>>();
        assert!(xs[0] < xs[2] && xs[1] < xs[2]);
        assert!(((xs[0] + xs[1]) * 0.5 - jan_x).abs() < 60.0);
        assert!((xs[2] - feb_x).abs() < 60.0);
    }

    #[test]
    fn missing_group_falls_back_to_zero() {
        let node = node_at("a", 10.0, "Mar", vec2(0.0, 0.0));
        let target = TargetX::Grouped {
            attribute: GroupAttribute::Month,
            centers: GroupCenters::evenly_spaced(vec!["Jan".to_owned()], CanvasSize::default()),
        };
        assert_eq!(target.resolve(&node), 0.0);
    }

    #[test]
    fn restart_restores_full_energy_and_stop_halts() {
        let nodes = vec![node_at("a", 10.0, "Jan", vec2(10.0, 10.0))];
        let mut engine = LayoutEngine::new(nodes, LayoutParams::default(), vec2(620.0, 300.0));
        run_until_settled(&mut engine);
        assert!(engine.alpha() < LayoutParams::default().alpha_min);

        engine.restart();
        assert_eq!(engine.alpha(), 1.0);
        assert!(engine.advance());
        assert_eq!(engine.ticks_since_restart(), 1);

        engine.stop();
        assert!(!engine.advance());
        assert_eq!(engine.ticks_since_restart(), 1);
    }

    #[test]
    fn quadtree_cells_cover_every_node() {
        let nodes = (0..20)
            .map(|index| {
                node_at(
                    &format!("n{index}"),
                    10.0 + index as f64,
                    "Jan",
                    vec2(index as f32 * 40.0, (index % 5) as f32 * 90.0),
                )
            })
            .collect::<Vec<_>>();
        let engine = LayoutEngine::new(nodes, LayoutParams::default(), vec2(620.0, 300.0));
        let mut cells = Vec::new();
        engine.quadtree_cells(&mut cells);

        assert!(cells.len() > 1);
        assert_eq!(cells[0].depth, 0);
    }
}
