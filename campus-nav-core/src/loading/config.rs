use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Files and boundary nodes describing one building
#[derive(Debug, Clone, Deserialize)]
pub struct BuildingConfig {
    pub id: String,
    pub name: String,
    /// `graph.json` with nodes and edges
    pub graph: PathBuf,
    /// `rooms.json` with the room list
    pub rooms: PathBuf,
    /// `map_info.json` with the floor plan dimensions
    pub map_info: PathBuf,
    /// Floor plan image, passed through for display
    #[serde(default)]
    pub map_image: Option<String>,
    #[serde(default)]
    pub exit_node_id: Option<String>,
    #[serde(default)]
    pub entrance_node_id: Option<String>,
    /// Overrides the default exit border threshold
    #[serde(default)]
    pub exit_threshold: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CampusConfig {
    #[serde(default)]
    pub buildings: Vec<BuildingConfig>,
}

impl CampusConfig {
    /// Resolves relative data paths against `base`
    #[must_use]
    pub fn with_base_dir(mut self, base: &Path) -> Self {
        for building in &mut self.buildings {
            for path in [
                &mut building.graph,
                &mut building.rooms,
                &mut building.map_info,
            ] {
                if path.is_relative() {
                    *path = base.join(&*path);
                }
            }
        }
        self
    }
}
