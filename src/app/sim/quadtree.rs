use eframe::egui::{Vec2, vec2};

const LEAF_CAPACITY: usize = 4;
const MAX_DEPTH: usize = 12;

/// Barnes-Hut aggregation tree: interior cells carry their subtree's
/// summed charge and magnitude-weighted charge center.
pub(super) struct ChargeNode {
    min: Vec2,
    size: f32,
    pub(super) charge: f32,
    pub(super) charge_center: Vec2,
    pub(super) indices: Vec<usize>,
    pub(super) children: [Option<Box<ChargeNode>>; 4],
}

impl ChargeNode {
    pub(super) fn build(positions: &[Vec2], strengths: &[f32]) -> Option<Self> {
        let (min, size) = square_extent(positions)?;
        let indices = (0..positions.len()).collect::<Vec<_>>();
        Some(Self::build_node(min, size, indices, positions, strengths, 0))
    }

    fn build_node(
        min: Vec2,
        size: f32,
        indices: Vec<usize>,
        positions: &[Vec2],
        strengths: &[f32],
        depth: usize,
    ) -> Self {
        let mut charge = 0.0;
        let mut weighted = Vec2::ZERO;
        let mut weight_sum = 0.0;
        for &index in &indices {
            charge += strengths[index];
            let weight = strengths[index].abs();
            weighted += positions[index] * weight;
            weight_sum += weight;
        }

        let charge_center = if weight_sum > 0.0 {
            weighted / weight_sum
        } else {
            min + vec2(size, size) * 0.5
        };

        let mut node = Self {
            min,
            size,
            charge,
            charge_center,
            indices,
            children: std::array::from_fn(|_| None),
        };

        if depth >= MAX_DEPTH || node.indices.len() <= LEAF_CAPACITY {
            return node;
        }

        let half = size * 0.5;
        let mid = min + vec2(half, half);
        let mut buckets = std::array::from_fn::<_, 4, _>(|_| Vec::new());
        for &index in &node.indices {
            buckets[quadrant(mid, positions[index])].push(index);
        }

        let occupied = buckets.iter().filter(|bucket| !bucket.is_empty()).count();
        if occupied <= 1 {
            return node;
        }

        for (which, bucket) in buckets.into_iter().enumerate() {
            if bucket.is_empty() {
                continue;
            }
            let child_min = min + vec2(
                if which & 1 == 1 { half } else { 0.0 },
                if which & 2 == 2 { half } else { 0.0 },
            );
            node.children[which] = Some(Box::new(Self::build_node(
                child_min, half, bucket, positions, strengths, depth + 1,
            )));
        }
        node.indices.clear();
        node
    }

    pub(super) fn is_leaf(&self) -> bool {
        self.children.iter().all(|child| child.is_none())
    }

    pub(super) fn side_length(&self) -> f32 {
        self.size
    }

    pub(super) fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.min.x + self.size
            && point.y >= self.min.y
            && point.y <= self.min.y + self.size
    }
}

fn quadrant(mid: Vec2, point: Vec2) -> usize {
    (usize::from(point.x >= mid.x)) | (usize::from(point.y >= mid.y) << 1)
}

fn square_extent(positions: &[Vec2]) -> Option<(Vec2, f32)> {
    let mut min = vec2(f32::INFINITY, f32::INFINITY);
    let mut max = vec2(f32::NEG_INFINITY, f32::NEG_INFINITY);

    for point in positions {
        min.x = min.x.min(point.x);
        min.y = min.y.min(point.y);
        max.x = max.x.max(point.x);
        max.y = max.y.max(point.y);
    }

    if !min.x.is_finite() || !min.y.is_finite() || !max.x.is_finite() || !max.y.is_finite() {
        return None;
    }

    let size = (max.x - min.x).max(max.y - min.y).max(1.0);
    Some((min, size))
}
