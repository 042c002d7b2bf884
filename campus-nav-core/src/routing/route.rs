//! Single-building route result

use itertools::Itertools;
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};

use super::instructions::{NavigationStep, build_steps};
use crate::model::{FloorGraph, Node};

/// Path through one building, start to end inclusive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub nodes: Vec<Node>,
    /// Sum of traversed edge weights
    pub total_distance: f64,
    pub steps: Vec<NavigationStep>,
}

impl Route {
    /// Zero-length route for a start that already is the destination
    pub(crate) fn already_there(node: &Node) -> Self {
        Self {
            nodes: vec![node.clone()],
            total_distance: 0.0,
            steps: vec![NavigationStep::already_there(node)],
        }
    }

    pub(crate) fn from_path(graph: &FloorGraph, path: &[NodeIndex]) -> Self {
        let total_distance = path
            .iter()
            .tuple_windows()
            .map(|(&from, &to)| graph.weight_between(from, to))
            .sum();
        let nodes: Vec<Node> = path.iter().map(|&idx| graph.node(idx).clone()).collect();
        let steps = build_steps(graph, &nodes);

        Self {
            nodes,
            total_distance,
            steps,
        }
    }

    pub fn start(&self) -> Option<&Node> {
        self.nodes.first()
    }

    pub fn end(&self) -> Option<&Node> {
        self.nodes.last()
    }

    pub fn node_ids(&self) -> Vec<&str> {
        self.nodes.iter().map(|node| node.id.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
