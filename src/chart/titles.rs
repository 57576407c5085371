use eframe::egui::{Vec2, vec2};
use indexmap::IndexMap;

use super::VisualNode;
use super::mode::{GroupAttribute, GroupCenters};
use crate::util::format_currency;

#[derive(Clone, Debug, PartialEq)]
pub struct GroupTitle {
    pub key: String,
    pub total: f64,
    pub position: Vec2,
}

impl GroupTitle {
    pub fn lines(&self, currency_prefix: &str) -> [String; 2] {
        [self.key.clone(), format_currency(currency_prefix, self.total)]
    }
}

pub fn group_totals(nodes: &[VisualNode], attribute: GroupAttribute) -> IndexMap<String, f64> {
    let mut totals = IndexMap::new();
    for node in nodes {
        *totals.entry(attribute.key(node).to_owned()).or_insert(0.0) += node.amount;
    }
    totals
}

pub fn build_titles(
    nodes: &[VisualNode],
    attribute: GroupAttribute,
    centers: &GroupCenters,
    y: f32,
) -> Vec<GroupTitle> {
    let totals = group_totals(nodes, attribute);
    centers
        .iter()
        .map(|(key, center)| GroupTitle {
            key: key.to_owned(),
            total: totals.get(key).copied().unwrap_or(0.0),
            position: vec2(center.x, y),
        })
        .collect()
}

#[derive(Clone, Debug)]
pub struct TitleLayer {
    y: f32,
    titles: Vec<GroupTitle>,
}

impl TitleLayer {
    pub fn new(y: f32) -> Self {
        Self {
            y,
            titles: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.titles.clear();
    }

    pub fn show(&mut self, nodes: &[VisualNode], attribute: GroupAttribute, centers: &GroupCenters) {
        self.titles = build_titles(nodes, attribute, centers, self.y);
    }

    pub fn titles(&self) -> &[GroupTitle] {
        &self.titles
    }
}
