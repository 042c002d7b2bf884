//! Emergency exit candidates and the cheapest way out

use log::debug;
use rayon::prelude::*;

use super::astar::find_route;
use super::route::Route;
use crate::DEFAULT_EXIT_THRESHOLD;
use crate::model::{FloorGraph, Node};

/// Nodes within `threshold` of any map border, in graph order.
///
/// Each border is tested on its own, so a node near one edge qualifies
/// regardless of its other coordinate.
pub fn exit_nodes(
    graph: &FloorGraph,
    map_width: f64,
    map_height: f64,
    threshold: f64,
) -> Vec<&Node> {
    graph
        .nodes()
        .filter(|node| {
            node.x <= threshold
                || node.x >= map_width - threshold
                || node.y <= threshold
                || node.y >= map_height - threshold
        })
        .collect()
}

/// Exit with the shortest route from `start_id`, using the default border
/// threshold.
pub fn nearest_exit<'a>(
    graph: &'a FloorGraph,
    start_id: &str,
    map_width: f64,
    map_height: f64,
) -> Option<&'a Node> {
    nearest_exit_route(graph, start_id, map_width, map_height, DEFAULT_EXIT_THRESHOLD)
        .map(|(exit, _)| exit)
}

/// Exit with the minimum total route distance together with that route.
///
/// Every candidate gets its own A* run; runs are independent and execute in
/// parallel. Among equally distant exits the first in graph order wins.
/// `None` when the start is unknown, there are no candidates, or none is
/// reachable.
pub fn nearest_exit_route<'a>(
    graph: &'a FloorGraph,
    start_id: &str,
    map_width: f64,
    map_height: f64,
    threshold: f64,
) -> Option<(&'a Node, Route)> {
    if !graph.contains(start_id) {
        return None;
    }

    let candidates = exit_nodes(graph, map_width, map_height, threshold);
    if candidates.is_empty() {
        debug!("No exit candidates within {threshold} of the {map_width}x{map_height} map border");
        return None;
    }

    let reachable: Vec<(&Node, Route)> = candidates
        .par_iter()
        .map(|&exit| find_route(graph, start_id, &exit.id).map(|route| (exit, route)))
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect();

    if reachable.is_empty() {
        debug!(
            "None of {} exit candidates is reachable from {start_id}",
            candidates.len()
        );
    }

    reachable
        .into_iter()
        .min_by(|(_, a), (_, b)| a.total_distance.total_cmp(&b.total_distance))
}
