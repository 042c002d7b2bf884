//! Immutable waypoint graph of one building floor

use std::fmt;

use geo::{Distance, Euclidean};
use hashbrown::{HashMap, HashSet};
use log::{debug, warn};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use rstar::RTree;
use rstar::primitives::GeomWithData;

use super::components::{Edge, Node, RawGraph};

/// Node coordinate stored in the spatial index
pub type IndexedPoint = GeomWithData<[f64; 2], NodeIndex>;

/// Waypoint graph with id lookup and a spatial index.
///
/// Edges are made symmetric once, at construction: every loaded edge
/// `u -> v` without a loaded `v -> u` gets a synthetic reverse edge with
/// the same weight. The graph is read-only afterwards, so it can be shared
/// between threads and searched concurrently.
pub struct FloorGraph {
    pub(crate) graph: DiGraph<Node, f64>,
    index: HashMap<String, NodeIndex>,
    rtree: RTree<IndexedPoint>,
}

impl FloorGraph {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        let mut graph = DiGraph::with_capacity(nodes.len(), edges.len() * 2);
        let mut index = HashMap::with_capacity(nodes.len());

        for node in nodes {
            if index.contains_key(&node.id) {
                warn!("Duplicate node id '{}' ignored", node.id);
                continue;
            }
            let id = node.id.clone();
            let idx = graph.add_node(node);
            index.insert(id, idx);
        }

        let mut skipped = 0usize;
        let accepted: Vec<(NodeIndex, NodeIndex, f64)> = edges
            .iter()
            .filter_map(|edge| {
                let (Some(&from), Some(&to)) =
                    (index.get(edge.from.as_str()), index.get(edge.to.as_str()))
                else {
                    warn!(
                        "Edge {} -> {} references an unknown node, skipping",
                        edge.from, edge.to
                    );
                    skipped += 1;
                    return None;
                };
                if !edge.weight.is_finite() || edge.weight < 0.0 {
                    warn!(
                        "Edge {} -> {} has invalid weight {}, skipping",
                        edge.from, edge.to, edge.weight
                    );
                    skipped += 1;
                    return None;
                }
                Some((from, to, edge.weight))
            })
            .collect();

        // Only edges that survived validation count as an existing reverse
        let loaded: HashSet<(NodeIndex, NodeIndex)> =
            accepted.iter().map(|&(from, to, _)| (from, to)).collect();

        let mut synthesized = 0usize;
        for &(from, to, weight) in &accepted {
            graph.add_edge(from, to, weight);
            if !loaded.contains(&(to, from)) {
                graph.add_edge(to, from, weight);
                synthesized += 1;
            }
        }

        let rtree = RTree::bulk_load(
            graph
                .node_indices()
                .map(|idx| {
                    let node: &Node = &graph[idx];
                    IndexedPoint::new([node.x, node.y], idx)
                })
                .collect(),
        );

        debug!(
            "Floor graph built: {} nodes, {} edges ({} synthesized reverse, {} skipped)",
            graph.node_count(),
            graph.edge_count(),
            synthesized,
            skipped
        );

        Self {
            graph,
            index,
            rtree,
        }
    }

    pub fn from_raw(raw: RawGraph) -> Self {
        Self::new(raw.nodes, raw.edges)
    }

    /// Node by id; absence is a normal outcome
    pub fn find_node(&self, id: &str) -> Option<&Node> {
        self.node_index(id).map(|idx| &self.graph[idx])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_weights()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Cost of moving between two nodes.
    ///
    /// Uses the explicit edge weight when an edge exists, otherwise the
    /// straight-line distance. `None` when either node is missing.
    pub fn edge_weight(&self, from: &str, to: &str) -> Option<f64> {
        let from = self.node_index(from)?;
        let to = self.node_index(to)?;
        Some(self.weight_between(from, to))
    }

    /// Closest node to a map position
    pub fn nearest_node(&self, x: f64, y: f64) -> Option<&Node> {
        self.rtree
            .nearest_neighbor(&[x, y])
            .map(|point| &self.graph[point.data])
    }

    pub(crate) fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    pub(crate) fn node(&self, idx: NodeIndex) -> &Node {
        &self.graph[idx]
    }

    /// Outgoing edges as `(target, weight)`; adjacency is strictly edge driven
    pub(crate) fn neighbors(&self, idx: NodeIndex) -> impl Iterator<Item = (NodeIndex, f64)> + '_ {
        self.graph
            .edges(idx)
            .map(|edge| (edge.target(), *edge.weight()))
    }

    /// Cheapest parallel edge between two nodes, or the straight line
    pub(crate) fn weight_between(&self, from: NodeIndex, to: NodeIndex) -> f64 {
        self.graph
            .edges_connecting(from, to)
            .map(|edge| *edge.weight())
            .min_by(f64::total_cmp)
            .unwrap_or_else(|| straight_line(&self.graph[from], &self.graph[to]))
    }
}

impl From<RawGraph> for FloorGraph {
    fn from(raw: RawGraph) -> Self {
        Self::from_raw(raw)
    }
}

impl fmt::Debug for FloorGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FloorGraph")
            .field("nodes", &self.graph.node_count())
            .field("edges", &self.graph.edge_count())
            .finish()
    }
}

/// Euclidean distance between two waypoints
pub(crate) fn straight_line(a: &Node, b: &Node) -> f64 {
    Euclidean.distance(a.point(), b.point())
}
