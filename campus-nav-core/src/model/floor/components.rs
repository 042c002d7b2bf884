//! Floor graph components - waypoint nodes and traversal edges

use geo::Point;
use serde::{Deserialize, Serialize};

/// Waypoint on a floor plan, in map-pixel units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Identifier, unique within one building
    pub id: String,
    pub x: f64,
    pub y: f64,
}

impl Node {
    pub fn new(id: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            x,
            y,
        }
    }

    pub fn point(&self) -> Point<f64> {
        Point::new(self.x, self.y)
    }
}

/// Directed traversal link between two waypoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
    /// Traversal cost, usually the corridor length
    #[serde(default = "default_weight")]
    pub weight: f64,
}

impl Edge {
    pub fn new(from: impl Into<String>, to: impl Into<String>, weight: f64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            weight,
        }
    }
}

fn default_weight() -> f64 {
    1.0
}

/// Graph as it is stored on disk, before normalization
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawGraph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}
