use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use eframe::egui::{Vec2, vec2};
use indexmap::IndexMap;
use thiserror::Error;
use tracing::debug;

use super::VisualNode;
use super::layout::{LayoutEngine, TargetX};
use super::titles::TitleLayer;
use crate::config::CanvasSize;
use crate::util::month_label;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ViewMode {
    #[default]
    All,
    ByMonth,
    ByArea,
    ByAccount,
}

impl ViewMode {
    pub const ALL: [Self; 4] = [Self::All, Self::ByMonth, Self::ByArea, Self::ByAccount];

    pub fn token(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::ByMonth => "month",
            Self::ByArea => "area",
            Self::ByAccount => "account",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::ByMonth => "By month",
            Self::ByArea => "By area",
            Self::ByAccount => "By account",
        }
    }

    pub fn attribute(self) -> Option<GroupAttribute> {
        match self {
            Self::All => None,
            Self::ByMonth => Some(GroupAttribute::Month),
            Self::ByArea => Some(GroupAttribute::Area),
            Self::ByAccount => Some(GroupAttribute::Account),
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown view mode {0:?}; expected one of all, month, area, account")]
pub struct UnknownViewMode(pub String);

impl FromStr for ViewMode {
    type Err = UnknownViewMode;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let normalized = token.trim().to_ascii_lowercase();
        let normalized = normalized.strip_prefix("by_").unwrap_or(normalized.as_str());
        Self::ALL
            .into_iter()
            .find(|mode| mode.token() == normalized)
            .ok_or_else(|| UnknownViewMode(token.to_owned()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GroupAttribute {
    Month,
    Area,
    Account,
}

impl GroupAttribute {
    pub fn key(self, node: &VisualNode) -> &str {
        match self {
            Self::Month => node.month_label(),
            Self::Area => node.area.as_str(),
            Self::Account => node.account.as_str(),
        }
    }

    /// Distinct keys present in `nodes`: months in calendar order, areas and
    /// accounts in lexicographic order.
    pub fn ordered_keys(self, nodes: &[VisualNode]) -> Vec<String> {
        match self {
            Self::Month => nodes
                .iter()
                .map(|node| node.month0)
                .collect::<BTreeSet<_>>()
                .into_iter()
                .map(|month0| month_label(month0).to_owned())
                .collect(),
            Self::Area | Self::Account => nodes
                .iter()
                .map(|node| self.key(node))
                .collect::<BTreeSet<_>>()
                .into_iter()
                .map(str::to_owned)
                .collect(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GroupCenters {
    centers: IndexMap<String, Vec2>,
}

impl GroupCenters {
    /// Spaces `keys` at `(i + 1) * width / (n + 1)` on the canvas midline.
    pub fn evenly_spaced(keys: Vec<String>, canvas: CanvasSize) -> Self {
        let step = canvas.width / (keys.len() as f32 + 1.0);
        let y = canvas.center().y;
        let centers = keys
            .into_iter()
            .enumerate()
            .map(|(index, key)| (key, vec2(step * (index as f32 + 1.0), y)))
            .collect();
        Self { centers }
    }

    pub fn get(&self, key: &str) -> Option<Vec2> {
        self.centers.get(key).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Vec2)> + '_ {
        self.centers.iter().map(|(key, center)| (key.as_str(), *center))
    }

    pub fn len(&self) -> usize {
        self.centers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct ModeController {
    mode: ViewMode,
    canvas: CanvasSize,
}

impl ModeController {
    pub fn new(canvas: CanvasSize) -> Self {
        Self {
            mode: ViewMode::All,
            canvas,
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn apply(&mut self, mode: ViewMode, engine: &mut LayoutEngine, titles: &mut TitleLayer) {
        let target_x = match mode.attribute() {
            None => {
                titles.clear();
                TargetX::Fixed(self.canvas.center().x)
            }
            Some(attribute) => {
                let keys = attribute.ordered_keys(engine.nodes());
                let centers = GroupCenters::evenly_spaced(keys, self.canvas);
                titles.clear();
                titles.show(engine.nodes(), attribute, &centers);
                TargetX::Grouped { attribute, centers }
            }
        };

        engine.set_target_x(target_x);
        engine.restart();
        self.mode = mode;
        debug!(%mode, groups = titles.titles().len(), "view mode applied");
    }
}
