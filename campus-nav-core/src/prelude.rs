pub use crate::DEFAULT_EXIT_THRESHOLD;
pub use crate::Error;

// Loading
pub use crate::loading::{BuildingConfig, CampusConfig, create_campus, load_building};

// Data model
pub use crate::model::{
    BuildingData, Campus, Edge, FloorGraph, MapInfo, Node, Position, RawGraph, Room,
    RoutingOptions,
};

// Routing
pub use crate::routing::{
    CrossBuildingRoute, Direction, NavigationStep, Route, RouteSegment, build_steps, cross_route,
    exit_nodes, find_route, nearest_exit, nearest_exit_route,
};
