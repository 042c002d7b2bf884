//! Single-floor waypoint graph

pub mod components;
pub mod network;

pub use components::{Edge, Node, RawGraph};
pub use network::{FloorGraph, IndexedPoint};
