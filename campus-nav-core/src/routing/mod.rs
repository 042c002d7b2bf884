//! Path search and everything derived from a found path

pub mod astar;
pub mod cross_building;
pub mod exits;
pub mod instructions;
pub mod route;
pub mod to_geojson;

pub use astar::find_route;
pub use cross_building::{CrossBuildingRoute, RouteSegment, cross_route};
pub use exits::{exit_nodes, nearest_exit, nearest_exit_route};
pub use instructions::{Direction, NavigationStep, build_steps};
pub use route::Route;
