use std::cmp::Ordering;

use petgraph::graph::NodeIndex;

/// Open-set entry of the A* frontier
#[derive(Copy, Clone, Debug)]
pub(super) struct State {
    pub(super) f_cost: f64,
    pub(super) g_cost: f64,
    pub(super) node: NodeIndex,
    /// Push order, breaks f-cost ties first-in first-out
    pub(super) seq: usize,
}

// Implement Ord for State to use in BinaryHeap
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap by f-cost (reversed from standard Rust BinaryHeap)
        other
            .f_cost
            .total_cmp(&self.f_cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for State {}
