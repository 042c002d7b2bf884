//! Routing engine for indoor building navigation.
//!
//! Each building is an independent waypoint graph ([`FloorGraph`]) with a
//! room index. On top of it the crate provides A* shortest paths,
//! turn-by-turn instructions, emergency exit lookup and routes that switch
//! between two buildings.

pub mod error;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod routing;

pub use error::Error;
pub use loading::{BuildingConfig, CampusConfig, create_campus, load_building};
pub use model::{
    BuildingData, Campus, Edge, FloorGraph, MapInfo, Node, Position, RawGraph, Room,
    RoutingOptions,
};
pub use routing::{
    CrossBuildingRoute, Direction, NavigationStep, Route, RouteSegment, build_steps, cross_route,
    exit_nodes, find_route, nearest_exit,
};

/// Distance from the map border within which a node counts as an exit
pub const DEFAULT_EXIT_THRESHOLD: f64 = 5.0;
