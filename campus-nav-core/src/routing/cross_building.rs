//! Routes between rooms that may live in different buildings

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::route::Route;
use crate::model::{BuildingData, Campus};

/// Part of a campus route that stays inside one building
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSegment {
    pub building_id: String,
    pub route: Route,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruction: Option<String>,
}

/// Ordered building segments, origin building first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossBuildingRoute {
    pub segments: Vec<RouteSegment>,
    pub total_distance: f64,
}

impl CrossBuildingRoute {
    fn new(segments: Vec<RouteSegment>) -> Self {
        let total_distance = segments.iter().map(|s| s.route.total_distance).sum();
        Self {
            segments,
            total_distance,
        }
    }

    pub fn crosses_buildings(&self) -> bool {
        self.segments.len() > 1
    }
}

/// Route from one room to another anywhere on the campus.
///
/// Rooms in the same building produce a single segment. Otherwise the
/// route is the origin building's leg to its configured exit node followed
/// by the destination building's leg from its configured entrance node.
/// Both buildings are searched independently and concurrently; a missing
/// exit/entrance configuration or a failed leg yields `None`.
pub fn cross_route(
    campus: &Campus,
    origin_room_id: &str,
    dest_room_id: &str,
) -> Option<CrossBuildingRoute> {
    let origin_building = campus.building_of_room(origin_room_id)?;
    let dest_building = campus.building_of_room(dest_room_id)?;
    let origin_room = origin_building.room(origin_room_id)?;
    let dest_room = dest_building.room(dest_room_id)?;

    if origin_building.id == dest_building.id {
        let route = origin_building.route(&origin_room.node_id, &dest_room.node_id)?;
        return Some(CrossBuildingRoute::new(vec![RouteSegment {
            building_id: origin_building.id.clone(),
            route,
            instruction: None,
        }]));
    }

    let exit_id = boundary_node(origin_building, origin_building.exit_node_id.as_deref(), "exit")?;
    let entrance_id = boundary_node(
        dest_building,
        dest_building.entrance_node_id.as_deref(),
        "entrance",
    )?;

    let (outbound, inbound) = rayon::join(
        || origin_building.route(&origin_room.node_id, exit_id),
        || dest_building.route(entrance_id, &dest_room.node_id),
    );

    let Some(outbound) = outbound.filter(|route| !route.is_empty()) else {
        debug!(
            "No route from {origin_room_id} to the exit of {}",
            origin_building.name
        );
        return None;
    };
    let Some(inbound) = inbound.filter(|route| !route.is_empty()) else {
        debug!(
            "No route from the entrance of {} to {dest_room_id}",
            dest_building.name
        );
        return None;
    };

    Some(CrossBuildingRoute::new(vec![
        RouteSegment {
            building_id: origin_building.id.clone(),
            route: outbound,
            instruction: Some(format!(
                "Proceed to exit of {}. Switch to {}.",
                origin_building.name, dest_building.name
            )),
        },
        RouteSegment {
            building_id: dest_building.id.clone(),
            route: inbound,
            instruction: Some(format!(
                "Entered {}. Continue to {}.",
                dest_building.name, dest_room.name
            )),
        },
    ]))
}

fn boundary_node<'a>(
    building: &BuildingData,
    node_id: Option<&'a str>,
    role: &str,
) -> Option<&'a str> {
    match node_id {
        Some(id) => Some(id),
        None => {
            warn!(
                "Building {} has no {role} node configured; cross-building routing unavailable",
                building.id
            );
            None
        }
    }
}
