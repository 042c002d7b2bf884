//! A* shortest path over a single floor graph

mod state;

use std::collections::BinaryHeap;

use fixedbitset::FixedBitSet;
use hashbrown::HashMap;
use log::{debug, trace};
use petgraph::graph::NodeIndex;

use self::state::State;
use super::route::Route;
use crate::model::FloorGraph;
use crate::model::floor::network::straight_line;

/// Shortest route between two nodes of one building.
///
/// Returns `None` when either id is unknown or no path connects them.
/// Identical ids give a single-node, zero-distance route.
pub fn find_route(graph: &FloorGraph, start_id: &str, end_id: &str) -> Option<Route> {
    let start = graph.node_index(start_id)?;
    let end = graph.node_index(end_id)?;

    if start == end {
        return Some(Route::already_there(graph.node(start)));
    }

    match astar_path(graph, start, end) {
        Some(path) => Some(Route::from_path(graph, &path)),
        None => {
            debug!("No path from {start_id} to {end_id}");
            None
        }
    }
}

/// A* with a straight-line heuristic.
///
/// The frontier always expands the lowest f-cost entry; equal f-costs pop
/// in push order. Improved entries are pushed again and stale copies are
/// skipped on pop, using `g_scores` as the open-set index.
pub(crate) fn astar_path(
    graph: &FloorGraph,
    start: NodeIndex,
    end: NodeIndex,
) -> Option<Vec<NodeIndex>> {
    let goal = graph.node(end);
    let heuristic = |idx: NodeIndex| straight_line(graph.node(idx), goal);

    let estimated_nodes = graph.node_count().min(1000);
    let mut g_scores: HashMap<NodeIndex, f64> = HashMap::with_capacity(estimated_nodes);
    let mut parents: HashMap<NodeIndex, NodeIndex> = HashMap::with_capacity(estimated_nodes);
    let mut closed = FixedBitSet::with_capacity(graph.node_count());
    let mut heap = BinaryHeap::with_capacity(estimated_nodes / 4);
    let mut seq = 0;

    g_scores.insert(start, 0.0);
    heap.push(State {
        f_cost: heuristic(start),
        g_cost: 0.0,
        node: start,
        seq,
    });

    while let Some(State { g_cost, node, .. }) = heap.pop() {
        if closed.contains(node.index()) {
            continue;
        }
        // Skip entries superseded by a cheaper predecessor
        if g_scores.get(&node).is_some_and(|&best| g_cost > best) {
            continue;
        }

        if node == end {
            trace!("Reached goal after settling {} nodes", closed.count_ones(..));
            return Some(reconstruct_path(&parents, start, end));
        }
        closed.insert(node.index());

        for (next, weight) in graph.neighbors(node) {
            if closed.contains(next.index()) {
                continue;
            }
            let tentative = g_cost + weight;

            let improved = match g_scores.entry(next) {
                hashbrown::hash_map::Entry::Vacant(entry) => {
                    entry.insert(tentative);
                    true
                }
                hashbrown::hash_map::Entry::Occupied(mut entry) => {
                    if tentative < *entry.get() {
                        *entry.get_mut() = tentative;
                        true
                    } else {
                        false
                    }
                }
            };

            if improved {
                parents.insert(next, node);
                seq += 1;
                heap.push(State {
                    f_cost: tentative + heuristic(next),
                    g_cost: tentative,
                    node: next,
                    seq,
                });
            }
        }
    }

    None
}

fn reconstruct_path(
    parents: &HashMap<NodeIndex, NodeIndex>,
    start: NodeIndex,
    end: NodeIndex,
) -> Vec<NodeIndex> {
    let mut path = vec![end];
    let mut current = end;
    while current != start {
        match parents.get(&current) {
            Some(&prev) => {
                path.push(prev);
                current = prev;
            }
            None => break,
        }
    }
    path.reverse();
    path
}
