use indexmap::IndexMap;

use super::VisualNode;

pub type Rgb = [u8; 3];

pub const CATEGORY_COLORS: [Rgb; 10] = [
    [0x1f, 0x77, 0xb4],
    [0xff, 0x7f, 0x0e],
    [0x2c, 0xa0, 0x2c],
    [0xd6, 0x27, 0x28],
    [0x94, 0x67, 0xbd],
    [0x8c, 0x56, 0x4b],
    [0xe3, 0x77, 0xc2],
    [0x7f, 0x7f, 0x7f],
    [0xbc, 0xbd, 0x22],
    [0x17, 0xbe, 0xcf],
];

/// Ordinal colors keyed by category, assigned in first-seen order and
/// cycling once the palette runs out.
#[derive(Clone, Debug, Default)]
pub struct CategoryPalette {
    slots: IndexMap<String, usize>,
}

impl CategoryPalette {
    pub fn from_nodes(nodes: &[VisualNode]) -> Self {
        let mut palette = Self::default();
        for node in nodes {
            palette.slot(&node.category);
        }
        palette
    }

    fn slot(&mut self, category: &str) -> usize {
        let next = self.slots.len() % CATEGORY_COLORS.len();
        *self.slots.entry(category.to_owned()).or_insert(next)
    }

    pub fn color_index(&self, category: &str) -> Option<usize> {
        self.slots.get(category).copied()
    }

    pub fn color(&self, category: &str) -> Rgb {
        CATEGORY_COLORS[self.color_index(category).unwrap_or(0)]
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, Rgb)> + '_ {
        self.slots
            .iter()
            .map(|(category, &slot)| (category.as_str(), CATEGORY_COLORS[slot]))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_seen_order_and_wraparound() {
        let mut palette = CategoryPalette::default();
        for index in 0..12 {
            palette.slot(&format!("category-{index}"));
        }
        palette.slot("category-0");

        assert_eq!(palette.len(), 12);
        assert_eq!(palette.color_index("category-0"), Some(0));
        assert_eq!(palette.color_index("category-10"), Some(0));
        assert_eq!(palette.color_index("category-11"), Some(1));
        assert_eq!(palette.color("missing"), CATEGORY_COLORS[0]);

        let first = palette.entries().next().expect("entries");
        assert_eq!(first.0, "category-0");
    }
}
