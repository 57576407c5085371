use std::collections::HashSet;
use std::sync::Arc;

use eframe::egui::{Pos2, Ui};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use ledger_bubbles::chart::VisualNode;

use super::super::render_utils::CanvasFrame;
use super::super::{SearchMatchCache, ViewModel};

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

impl ViewModel {
    /// Topmost marker under the pointer. Later markers are drawn over earlier
    /// ones, so the scan runs back to front.
    pub(in crate::app) fn hovered_marker(&self, ui: &Ui, frame: CanvasFrame) -> Option<usize> {
        let pointer: Pos2 = ui.input(|input| input.pointer.hover_pos())?;
        if !frame.rect.contains(pointer) {
            return None;
        }

        let point = frame.to_canvas(pointer);
        self.chart
            .markers()
            .iter()
            .enumerate()
            .rev()
            .find(|(_, marker)| (marker.position() - point).length() <= marker.radius)
            .map(|(index, _)| index)
    }

    pub(in crate::app) fn node_for_marker(&self, index: usize) -> Option<&VisualNode> {
        let marker = self.chart.markers().get(index)?;
        let nodes = self.chart.nodes();
        nodes
            .get(index)
            .filter(|node| node.id == marker.id())
            .or_else(|| nodes.iter().find(|node| node.id == marker.id()))
    }

    pub(in crate::app) fn cached_search_matches(&mut self) -> Option<Arc<HashSet<usize>>> {
        let query = self.search.trim();
        if query.is_empty() {
            return None;
        }

        if let Some(cached) = &self.search_match_cache
            && cached.query == query
        {
            return Some(Arc::clone(&cached.matches));
        }

        let matcher = SkimMatcherV2::default();
        let matches = (0..self.chart.markers().len())
            .filter_map(|index| {
                let node = self.node_for_marker(index)?;
                [&node.description, &node.category, &node.account]
                    .into_iter()
                    .any(|text| fuzzy_match_score(&matcher, text, query).is_some())
                    .then_some(index)
            })
            .collect::<HashSet<_>>();
        let matches = Arc::new(matches);

        self.search_match_cache = Some(SearchMatchCache {
            query: query.to_owned(),
            matches: Arc::clone(&matches),
        });

        Some(matches)
    }
}
