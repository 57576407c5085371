use std::collections::HashMap;

use eframe::egui::Vec2;

use super::VisualNode;
use super::palette::CategoryPalette;

pub trait PositionSink {
    fn sync_positions(&mut self, nodes: &[VisualNode]);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fill {
    Category(usize),
    Credit,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    id: String,
    position: Vec2,
    pub radius: f32,
    pub fill: Fill,
}

impl Marker {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }
}

/// Markers in draw order, bound to nodes by id. Marker positions change only
/// through [`PositionSink::sync_positions`].
#[derive(Clone, Debug, Default)]
pub struct MarkerLayer {
    markers: Vec<Marker>,
    index_by_id: HashMap<String, usize>,
}

impl MarkerLayer {
    pub fn bind(nodes: &[VisualNode], palette: &CategoryPalette) -> Self {
        let markers = nodes
            .iter()
            .map(|node| Marker {
                id: node.id.clone(),
                position: node.position(),
                radius: node.radius,
                fill: if node.is_credit {
                    Fill::Credit
                } else {
                    Fill::Category(palette.color_index(&node.category).unwrap_or(0))
                },
            })
            .collect::<Vec<_>>();
        let index_by_id = markers
            .iter()
            .enumerate()
            .map(|(index, marker)| (marker.id.clone(), index))
            .collect();

        Self {
            markers,
            index_by_id,
        }
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }
}

impl PositionSink for MarkerLayer {
    fn sync_positions(&mut self, nodes: &[VisualNode]) {
        for (index, node) in nodes.iter().enumerate() {
            let slot = match self.markers.get(index) {
                Some(marker) if marker.id == node.id => Some(index),
                _ => self.index_by_id.get(&node.id).copied(),
            };
            if let Some(marker) = slot.and_then(|slot| self.markers.get_mut(slot)) {
                marker.position = node.position();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::*;
    use crate::chart::layout::{LayoutEngine, LayoutParams};
    use crate::chart::test_support::{credit_node_at, node_at};

    #[test]
    fn markers_follow_engine_positions_by_id() {
        let nodes = vec![
            node_at("big", 900.0, "Jan", vec2(10.0, 10.0)),
            credit_node_at("refund", 100.0, "Feb", vec2(500.0, 200.0)),
        ];
        let palette = CategoryPalette::from_nodes(&nodes);
        let mut layer = MarkerLayer::bind(&nodes, &palette);
        assert_eq!(layer.markers()[0].fill, Fill::Category(0));
        assert_eq!(layer.markers()[1].fill, Fill::Credit);

        let mut engine = LayoutEngine::new(nodes, LayoutParams::default(), vec2(620.0, 300.0));
        for _ in 0..5 {
            engine.advance();
        }
        layer.sync_positions(engine.nodes());

        for node in engine.nodes() {
            let marker = layer
                .markers()
                .iter()
                .find(|marker| marker.id() == node.id)
                .expect("bound marker");
            assert_eq!(marker.position(), node.position());
        }
    }

    #[test]
    fn reordered_nodes_still_bind_by_id() {
        let first = node_at("a", 10.0, "Jan", vec2(1.0, 1.0));
        let second = node_at("b", 5.0, "Jan", vec2(2.0, 2.0));
        let palette = CategoryPalette::from_nodes(&[first.clone(), second.clone()]);
        let mut layer = MarkerLayer::bind(&[first.clone(), second.clone()], &palette);

        let moved = node_at("b", 5.0, "Jan", vec2(77.0, 88.0));
        layer.sync_positions(&[moved, first]);

        assert_eq!(layer.markers()[1].position(), vec2(77.0, 88.0));
        assert_eq!(layer.markers()[0].position(), vec2(1.0, 1.0));
    }
}
