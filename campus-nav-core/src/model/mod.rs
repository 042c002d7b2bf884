//! Data model for building navigation
//!
//! Per-building waypoint graphs, rooms and the campus that owns them.
//! Node id spaces are building-local and never merged.

pub mod building;
pub mod floor;
pub mod room;

pub use building::{BuildingData, Campus, MapInfo, RoutingOptions};
pub use floor::{Edge, FloorGraph, Node, RawGraph};
pub use room::{Position, Room};
