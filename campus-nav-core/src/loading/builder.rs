use hashbrown::HashSet;
use log::{info, warn};
use rayon::prelude::*;

use super::config::{BuildingConfig, CampusConfig};
use super::de::{read_graph, read_map_info, read_rooms};
use crate::model::{BuildingData, Campus, FloorGraph, RoutingOptions};
use crate::Error;

/// Creates a campus from the provided configuration
///
/// # Errors
///
/// Returns an error if a file is missing or malformed, or the
/// configuration is inconsistent
pub fn create_campus(config: &CampusConfig) -> Result<Campus, Error> {
    validate_config(config)?;

    info!("Loading {} buildings", config.buildings.len());
    let buildings = config
        .buildings
        .par_iter()
        .map(load_building)
        .collect::<Result<Vec<_>, _>>()?;

    Campus::new(buildings)
}

/// Loads one building's graph, rooms and map dimensions
///
/// # Errors
///
/// Returns an error if any of the building's files cannot be read or parsed
pub fn load_building(config: &BuildingConfig) -> Result<BuildingData, Error> {
    let raw = read_graph(&config.graph)?;
    let rooms = read_rooms(&config.rooms)?;
    let map_info = read_map_info(&config.map_info)?;

    let graph = FloorGraph::from_raw(raw);
    info!(
        "Building {}: {} nodes, {} edges, {} rooms",
        config.id,
        graph.node_count(),
        graph.edge_count(),
        rooms.len()
    );

    for room in rooms.iter().filter(|room| !graph.contains(&room.node_id)) {
        warn!(
            "Room {} in building {} points at unknown node {}",
            room.id, config.id, room.node_id
        );
    }
    for (role, node_id) in [
        ("exit", &config.exit_node_id),
        ("entrance", &config.entrance_node_id),
    ] {
        if let Some(node_id) = node_id
            && !graph.contains(node_id)
        {
            warn!(
                "Building {} {role} node {node_id} is not in its graph",
                config.id
            );
        }
    }

    let mut options = RoutingOptions::default();
    if let Some(threshold) = config.exit_threshold {
        options.exit_threshold = threshold;
    }

    let mut building =
        BuildingData::new(&config.id, &config.name, map_info, graph, rooms).with_options(options);
    building.exit_node_id.clone_from(&config.exit_node_id);
    building.entrance_node_id.clone_from(&config.entrance_node_id);
    building.map_image.clone_from(&config.map_image);

    Ok(building)
}

fn validate_config(config: &CampusConfig) -> Result<(), Error> {
    if config.buildings.is_empty() {
        return Err(Error::InvalidData(
            "No buildings provided in the configuration".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for building in &config.buildings {
        if !seen.insert(building.id.as_str()) {
            return Err(Error::InvalidData(format!(
                "Duplicate building id: {}",
                building.id
            )));
        }
        for path in [&building.graph, &building.rooms, &building.map_info] {
            if !path.exists() {
                return Err(Error::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!(
                        "Data file for building {} not found: {}",
                        building.id,
                        path.display()
                    ),
                )));
            }
        }
    }

    Ok(())
}
