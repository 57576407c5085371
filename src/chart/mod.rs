//! Layout core of the bubble chart, independent of any window or toolkit.
//!
//! A [`BubbleChart`] owns one fixed node set. The layout engine is the only
//! writer of node positions; after each tick they are pushed to the marker
//! layer and any other subscribed [`PositionSink`].

mod layout;
mod mode;
mod node;
mod palette;
mod scale;
mod schedule;
mod sync;
mod titles;

use std::str::FromStr;

use tracing::{debug, info, warn};

use crate::config::ChartConfig;
use crate::ledger::{ParsedRecord, build_nodes};

pub use layout::{LayoutEngine, LayoutParams, QuadtreeCell, TargetX};
pub use mode::{GroupAttribute, GroupCenters, ModeController, UnknownViewMode, ViewMode};
pub use node::VisualNode;
pub use palette::{CATEGORY_COLORS, CategoryPalette, Rgb};
pub use scale::RadiusScale;
pub use schedule::Ticker;
pub use sync::{Fill, Marker, MarkerLayer, PositionSink};
pub use titles::{GroupTitle, TitleLayer, build_titles, group_totals};

pub struct BubbleChart {
    config: ChartConfig,
    engine: LayoutEngine,
    controller: ModeController,
    titles: TitleLayer,
    palette: CategoryPalette,
    markers: MarkerLayer,
    ticker: Ticker,
    subscribers: Vec<Box<dyn PositionSink>>,
}

impl BubbleChart {
    pub fn new(nodes: Vec<VisualNode>, config: ChartConfig) -> Self {
        let palette = CategoryPalette::from_nodes(&nodes);
        let markers = MarkerLayer::bind(&nodes, &palette);
        let engine = LayoutEngine::new(
            nodes,
            LayoutParams::from_config(&config),
            config.canvas.center(),
        );
        info!(
            nodes = engine.nodes().len(),
            categories = palette.len(),
            "bubble chart created"
        );

        Self {
            controller: ModeController::new(config.canvas),
            titles: TitleLayer::new(config.title_y),
            ticker: Ticker::new(config.ticks_per_second, config.max_ticks_per_frame),
            config,
            engine,
            palette,
            markers,
            subscribers: Vec::new(),
        }
    }

    pub fn from_records(records: &[ParsedRecord], config: ChartConfig) -> Self {
        let nodes = build_nodes(records, &config);
        Self::new(nodes, config)
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn nodes(&self) -> &[VisualNode] {
        self.engine.nodes()
    }

    pub fn engine(&self) -> &LayoutEngine {
        &self.engine
    }

    pub fn markers(&self) -> &[Marker] {
        self.markers.markers()
    }

    pub fn titles(&self) -> &[GroupTitle] {
        self.titles.titles()
    }

    pub fn palette(&self) -> &CategoryPalette {
        &self.palette
    }

    pub fn mode(&self) -> ViewMode {
        self.controller.mode()
    }

    pub fn total_amount(&self) -> f64 {
        self.nodes().iter().map(|node| node.amount).sum()
    }

    pub fn is_settled(&self) -> bool {
        !self.engine.is_running()
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.controller.apply(mode, &mut self.engine, &mut self.titles);
        self.ticker.reset();
    }

    pub fn set_view_mode_token(&mut self, token: &str) -> bool {
        match ViewMode::from_str(token) {
            Ok(mode) => {
                self.set_view_mode(mode);
                true
            }
            Err(error) => {
                warn!(%error, "ignoring view mode command");
                false
            }
        }
    }

    pub fn subscribe(&mut self, sink: Box<dyn PositionSink>) {
        self.subscribers.push(sink);
    }

    pub fn stop(&mut self) {
        self.engine.stop();
    }

    pub fn restart(&mut self) {
        self.engine.restart();
        self.ticker.reset();
    }

    /// Advances one tick and publishes positions. Returns `false` when the
    /// layout is stopped or settled.
    pub fn step(&mut self) -> bool {
        if !self.engine.advance() {
            return false;
        }

        let nodes = self.engine.nodes();
        self.markers.sync_positions(nodes);
        for subscriber in &mut self.subscribers {
            subscriber.sync_positions(nodes);
        }
        true
    }

    pub fn update(&mut self, elapsed_secs: f32) -> bool {
        let due = self.ticker.due(elapsed_secs);
        for _ in 0..due {
            if !self.step() {
                debug!("layout idle");
                break;
            }
        }
        self.engine.is_running()
    }

    pub fn quadtree_cells(&self, cells: &mut Vec<QuadtreeCell>) {
        self.engine.quadtree_cells(cells);
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::NaiveDate;
    use eframe::egui::Vec2;

    use super::{RadiusScale, VisualNode};
    use crate::ledger::ParsedRecord;
    use crate::util::month_label;

    pub(crate) fn record(
        id: &str,
        signed_amount: f64,
        month: &str,
        area: &str,
        account: &str,
    ) -> ParsedRecord {
        let month0 = (0..12)
            .find(|month0| month_label(*month0) == month)
            .expect("known month label");
        let timestamp = NaiveDate::from_ymd_opt(2017, month0 + 1, 15)
            .and_then(|date| date.and_hms_milli_opt(12, 0, 0, 0))
            .expect("valid timestamp");

        ParsedRecord {
            id: id.to_owned(),
            signed_amount,
            timestamp,
            category: "Rent".to_owned(),
            description: format!("{id} description"),
            area: area.to_owned(),
            account: account.to_owned(),
            voucher_type: "AP".to_owned(),
            revenue_sign: Some(1.0),
        }
    }

    fn node(record: &ParsedRecord, position: Vec2) -> VisualNode {
        let scale = RadiusScale::new(1000.0, [2.0, 45.0], 0.5);
        VisualNode::from_record(record, scale.radius(record.signed_amount.abs()), position)
    }

    pub(crate) fn node_at(id: &str, amount: f64, month: &str, position: Vec2) -> VisualNode {
        node(&record(id, amount, month, "North", "Operations"), position)
    }

    pub(crate) fn credit_node_at(id: &str, amount: f64, month: &str, position: Vec2) -> VisualNode {
        node(&record(id, -amount, month, "North", "Operations"), position)
    }

    pub(crate) fn node_in(
        id: &str,
        amount: f64,
        month: &str,
        area: &str,
        account: &str,
    ) -> VisualNode {
        node(&record(id, amount, month, area, account), Vec2::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::test_support::record;
    use super::*;

    struct CountingSink(Rc<RefCell<usize>>);

    impl PositionSink for CountingSink {
        fn sync_positions(&mut self, _nodes: &[VisualNode]) {
            *self.0.borrow_mut() += 1;
        }
    }

    fn chart() -> BubbleChart {
        let records = vec![
            record("a", 100.0, "Jan", "North", "Operations"),
            record("b", 200.0, "Jan", "South", "Sales"),
            record("c", 300.0, "Feb", "North", "Sales"),
        ];
        BubbleChart::from_records(&records, ChartConfig::default())
    }

    #[test]
    fn unknown_token_is_a_no_op() {
        let mut chart = chart();
        chart.set_view_mode(ViewMode::ByMonth);
        let before = chart.engine().target_x().clone();

        assert!(!chart.set_view_mode_token("quarter"));
        assert_eq!(chart.mode(), ViewMode::ByMonth);
        assert_eq!(chart.engine().target_x(), &before);
        assert_eq!(chart.titles().len(), 2);
    }

    #[test]
    fn subscribers_hear_every_tick_until_settled() {
        let mut chart = chart();
        let count = Rc::new(RefCell::new(0));
        chart.subscribe(Box::new(CountingSink(Rc::clone(&count))));

        let mut steps = 0;
        while chart.step() {
            steps += 1;
        }

        assert!(chart.is_settled());
        assert_eq!(*count.borrow(), steps);
        for marker in chart.markers() {
            let node = chart
                .nodes()
                .iter()
                .find(|node| node.id == marker.id())
                .expect("bound node");
            assert_eq!(marker.position(), node.position());
        }
    }

    #[test]
    fn update_runs_fixed_rate_ticks() {
        let mut chart = chart();
        assert!(chart.update(1.0 / 30.0 + 0.001));
        assert_eq!(chart.engine().ticks_since_restart(), 2);
    }

    #[test]
    fn restart_drops_partial_tick_time() {
        let mut chart = chart();
        chart.update(0.010);
        assert_eq!(chart.engine().ticks_since_restart(), 0);

        chart.restart();
        chart.update(0.010);
        assert_eq!(chart.engine().ticks_since_restart(), 0);

        chart.update(0.010);
        assert_eq!(chart.engine().ticks_since_restart(), 1);
    }

    #[test]
    fn stopped_chart_does_not_tick_until_mode_change() {
        let mut chart = chart();
        chart.stop();
        assert!(!chart.step());

        chart.set_view_mode(ViewMode::ByAccount);
        assert!(chart.step());
    }
}
