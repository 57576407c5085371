use eframe::egui::{Vec2, vec2};

const QUADTREE_LEAF_CAPACITY: usize = 8;
const QUADTREE_MAX_DEPTH: usize = 10;

#[derive(Clone, Copy, Debug)]
pub(super) struct Square {
    pub(super) min: Vec2,
    pub(super) side: f32,
}

impl Square {
    /// Smallest padded square covering every point; `None` for no points or
    /// any non-finite one.
    fn covering(points: &[Vec2]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }

        let (min, max) = points.iter().try_fold(
            (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
            |(min, max), point| point.is_finite().then(|| (min.min(*point), max.max(*point))),
        )?;

        Some(Self {
            min: min - Vec2::splat(1.0),
            side: (max - min).max_elem().max(1.0) + 2.0,
        })
    }

    pub(super) fn center(self) -> Vec2 {
        self.min + Vec2::splat(self.side * 0.5)
    }

    pub(super) fn contains(self, point: Vec2) -> bool {
        let offset = point - self.min;
        (0.0..=self.side).contains(&offset.x) && (0.0..=self.side).contains(&offset.y)
    }

    /// Bit 0 is the right half, bit 1 the lower half.
    fn quadrant_of(self, point: Vec2) -> usize {
        let center = self.center();
        usize::from(point.x >= center.x) | (usize::from(point.y >= center.y) << 1)
    }

    fn quadrant(self, quadrant: usize) -> Self {
        let side = self.side * 0.5;
        let step = |bit: usize| if quadrant & bit != 0 { side } else { 0.0 };

        Self {
            min: self.min + vec2(step(1), step(2)),
            side,
        }
    }
}

/// Quadtree over node positions carrying summed charge. The charge center is
/// weighted by charge magnitude so mixed-sign trees still place it sensibly.
pub(super) struct QuadNode {
    pub(super) bounds: Square,
    pub(super) charge_center: Vec2,
    pub(super) charge: f32,
    pub(super) indices: Vec<usize>,
    pub(super) children: [Option<Box<QuadNode>>; 4],
}

#[derive(Clone, Copy, Debug)]
pub struct QuadtreeCell {
    pub center: Vec2,
    pub half_extent: f32,
    pub depth: usize,
    pub is_leaf: bool,
}

impl QuadNode {
    pub(super) fn build(positions: &[Vec2], charges: &[f32]) -> Option<Self> {
        let bounds = Square::covering(positions)?;
        let indices = (0..positions.len()).collect::<Vec<_>>();
        Some(Self::build_node(bounds, indices, positions, charges, 0))
    }

    fn build_node(
        bounds: Square,
        indices: Vec<usize>,
        positions: &[Vec2],
        charges: &[f32],
        depth: usize,
    ) -> Self {
        let mut weighted = Vec2::ZERO;
        let mut weight = 0.0_f32;
        let mut charge = 0.0_f32;
        for &index in &indices {
            let magnitude = charges[index].abs();
            weighted += positions[index] * magnitude;
            weight += magnitude;
            charge += charges[index];
        }

        let charge_center = if weight > 0.0 {
            weighted / weight
        } else {
            bounds.center()
        };

        let mut node = Self {
            bounds,
            charge_center,
            charge,
            indices,
            children: std::array::from_fn(|_| None),
        };

        if depth >= QUADTREE_MAX_DEPTH || node.indices.len() <= QUADTREE_LEAF_CAPACITY {
            return node;
        }

        let mut buckets = std::array::from_fn::<_, 4, _>(|_| Vec::new());
        for &index in &node.indices {
            let quadrant = bounds.quadrant_of(positions[index]);
            buckets[quadrant].push(index);
        }

        let non_empty = buckets.iter().filter(|bucket| !bucket.is_empty()).count();
        if non_empty <= 1 {
            return node;
        }

        for (quadrant, bucket) in buckets.into_iter().enumerate() {
            if bucket.is_empty() {
                continue;
            }

            node.children[quadrant] = Some(Box::new(Self::build_node(
                bounds.quadrant(quadrant),
                bucket,
                positions,
                charges,
                depth + 1,
            )));
        }
        node.indices.clear();
        node
    }

    pub(super) fn is_leaf(&self) -> bool {
        self.children.iter().all(|child| child.is_none())
    }
}

pub(super) fn collect_quadtree_cells(
    node: &QuadNode,
    depth: usize,
    cells: &mut Vec<QuadtreeCell>,
) {
    cells.push(QuadtreeCell {
        center: node.bounds.center(),
        half_extent: node.bounds.side * 0.5,
        depth,
        is_leaf: node.is_leaf(),
    });

    for child in &node.children {
        if let Some(child) = child.as_ref() {
            collect_quadtree_cells(child, depth + 1, cells);
        }
    }
}
