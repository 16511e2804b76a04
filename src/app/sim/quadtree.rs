use eframe::egui::{Vec2, vec2};

const LEAF_CAPACITY: usize = 8;
const MAX_DEPTH: usize = 12;
const NO_CELL: u32 = u32::MAX;

#[derive(Clone, Copy)]
pub(super) struct Quad {
    pub(super) center: Vec2,
    pub(super) half: f32,
}

impl Quad {
    fn around(points: &[Vec2]) -> Option<Self> {
        let mut min = vec2(f32::INFINITY, f32::INFINITY);
        let mut max = vec2(f32::NEG_INFINITY, f32::NEG_INFINITY);

        for point in points {
            min.x = min.x.min(point.x);
            min.y = min.y.min(point.y);
            max.x = max.x.max(point.x);
            max.y = max.y.max(point.y);
        }

        if !min.x.is_finite() || !min.y.is_finite() || !max.x.is_finite() || !max.y.is_finite() {
            return None;
        }

        let span = (max.x - min.x).max(max.y - min.y).max(1.0);
        Some(Self {
            center: (min + max) * 0.5,
            half: (span * 0.5) + 1.0,
        })
    }

    pub(super) fn contains(self, point: Vec2) -> bool {
        (point.x - self.center.x).abs() <= self.half && (point.y - self.center.y).abs() <= self.half
    }

    pub(super) fn side(self) -> f32 {
        self.half * 2.0
    }

    /// Squared distance from a point to this square, zero inside it.
    pub(super) fn gap_sq(self, point: Vec2) -> f32 {
        let dx = ((point.x - self.center.x).abs() - self.half).max(0.0);
        let dy = ((point.y - self.center.y).abs() - self.half).max(0.0);
        (dx * dx) + (dy * dy)
    }

    fn quadrant(self, point: Vec2) -> usize {
        let right = point.x >= self.center.x;
        let lower = point.y >= self.center.y;
        (right as usize) | ((lower as usize) << 1)
    }

    fn child(self, quadrant: usize) -> Self {
        let quarter = self.half * 0.5;
        let sx = if quadrant & 1 == 0 { -quarter } else { quarter };
        let sy = if quadrant & 2 == 0 { -quarter } else { quarter };
        Self {
            center: self.center + vec2(sx, sy),
            half: quarter,
        }
    }
}

pub(super) struct Cell {
    pub(super) quad: Quad,
    pub(super) center_of_mass: Vec2,
    pub(super) mass: f32,
    children: [u32; 4],
    pub(super) points: Vec<usize>,
}

impl Cell {
    pub(super) fn is_leaf(&self) -> bool {
        self.children.iter().all(|&child| child == NO_CELL)
    }

    pub(super) fn child_cells(&self) -> impl Iterator<Item = u32> + '_ {
        self.children.iter().copied().filter(|&child| child != NO_CELL)
    }
}

/// Arena-allocated quadtree over particle positions, used both for
/// Barnes-Hut repulsion and for pruning the collision pair pass.
pub(super) struct QuadTree {
    cells: Vec<Cell>,
}

impl QuadTree {
    pub(super) const ROOT: u32 = 0;

    pub(super) fn build(positions: &[Vec2]) -> Option<Self> {
        if positions.is_empty() {
            return None;
        }
        let quad = Quad::around(positions)?;

        let mut tree = Self { cells: Vec::new() };
        tree.build_cell(quad, (0..positions.len()).collect(), positions, 0);
        Some(tree)
    }

    pub(super) fn cell(&self, index: u32) -> &Cell {
        &self.cells[index as usize]
    }

    fn build_cell(
        &mut self,
        quad: Quad,
        indices: Vec<usize>,
        positions: &[Vec2],
        depth: usize,
    ) -> u32 {
        let mass = indices.len() as f32;
        let mut center_of_mass = Vec2::ZERO;
        for &index in &indices {
            center_of_mass += positions[index];
        }
        if mass > 0.0 {
            center_of_mass /= mass;
        }

        let me = self.cells.len() as u32;
        self.cells.push(Cell {
            quad,
            center_of_mass,
            mass,
            children: [NO_CELL; 4],
            points: indices,
        });

        if depth >= MAX_DEPTH || self.cells[me as usize].points.len() <= LEAF_CAPACITY {
            return me;
        }

        let mut buckets: [Vec<usize>; 4] = std::array::from_fn(|_| Vec::new());
        for &index in &self.cells[me as usize].points {
            buckets[quad.quadrant(positions[index])].push(index);
        }

        // All points in one quadrant means splitting cannot separate
        // them further; stay a leaf.
        if buckets.iter().filter(|bucket| !bucket.is_empty()).count() <= 1 {
            return me;
        }

        self.cells[me as usize].points = Vec::new();
        for (quadrant, bucket) in buckets.into_iter().enumerate() {
            if bucket.is_empty() {
                continue;
            }
            let child = self.build_cell(quad.child(quadrant), bucket, positions, depth + 1);
            self.cells[me as usize].children[quadrant] = child;
        }
        me
    }
}
