//! Static 3-D k-d tree for nearest neighbour lookups.

#[derive(Debug, Clone)]
pub(crate) struct KdTree {
    points: Vec<[f64; 3]>,

    /// Point indices arranged as an implicit balanced tree: the root
    /// of any subslice is its middle element.
    order: Vec<usize>,
}

impl KdTree {
    pub(crate) fn new(points: Vec<[f64; 3]>) -> Self {
        let mut order: Vec<usize> = (0..points.len()).collect();
        build(&points, &mut order, 0);
        Self { points, order }
    }

    pub(crate) fn points(&self) -> &[[f64; 3]] {
        &self.points
    }

    /// Returns the index of the point closest to `query`, or `None`
    /// for an empty tree.
    pub(crate) fn nearest(&self, query: [f64; 3]) -> Option<usize> {
        let mut best = None;
        let mut best_d2 = f64::INFINITY;
        self.search(&query, 0, self.order.len(), 0, &mut best, &mut best_d2);
        best
    }
}

/// Private API.
impl KdTree {
    fn search(
        &self,
        query: &[f64; 3],
        lo: usize,
        hi: usize,
        depth: usize,
        best: &mut Option<usize>,
        best_d2: &mut f64,
    ) {
        if lo >= hi {
            return;
        }
        let mid = lo + (hi - lo) / 2;
        let idx = self.order[mid];
        let point = &self.points[idx];
        let d2 = dist2(query, point);
        if best.is_none() || d2 < *best_d2 {
            *best = Some(idx);
            *best_d2 = d2;
        }

        let axis = depth % 3;
        let diff = query[axis] - point[axis];
        let (near, far) = if diff < 0.0 {
            ((lo, mid), (mid + 1, hi))
        } else {
            ((mid + 1, hi), (lo, mid))
        };
        self.search(query, near.0, near.1, depth + 1, best, best_d2);
        if diff * diff < *best_d2 {
            self.search(query, far.0, far.1, depth + 1, best, best_d2);
        }
    }
}

fn build(points: &[[f64; 3]], order: &mut [usize], depth: usize) {
    if order.len() <= 1 {
        return;
    }
    let axis = depth % 3;
    let mid = order.len() / 2;
    order.select_nth_unstable_by(mid, |&a, &b| points[a][axis].total_cmp(&points[b][axis]));
    let (left, right) = order.split_at_mut(mid);
    build(points, left, depth + 1);
    build(points, &mut right[1..], depth + 1);
}

fn dist2(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    (a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)
}
