//! Buildings and the campus that owns them

use hashbrown::HashMap;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::floor::{FloorGraph, Node};
use super::room::{self, Room};
use crate::routing::{self, Route};
use crate::{DEFAULT_EXIT_THRESHOLD, Error};

/// Floor plan dimensions in map-pixel units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapInfo {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutingOptions {
    /// Distance from the map border within which a node counts as an exit
    pub exit_threshold: f64,
}

impl Default for RoutingOptions {
    fn default() -> Self {
        Self {
            exit_threshold: DEFAULT_EXIT_THRESHOLD,
        }
    }
}

/// One building: its graph, rooms and cross-building boundary nodes
#[derive(Debug)]
pub struct BuildingData {
    /// Short id such as "J"
    pub id: String,
    /// Display name such as "Building J"
    pub name: String,
    pub map_image: Option<String>,
    pub map_info: MapInfo,
    pub graph: FloorGraph,
    pub rooms: Vec<Room>,
    /// Node used when leaving this building for another one
    pub exit_node_id: Option<String>,
    /// Node used when arriving from another building
    pub entrance_node_id: Option<String>,
    pub options: RoutingOptions,
    room_index: HashMap<String, usize>,
    landmarks: HashMap<String, usize>,
}

impl BuildingData {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        map_info: MapInfo,
        graph: FloorGraph,
        rooms: Vec<Room>,
    ) -> Self {
        let mut room_index = HashMap::with_capacity(rooms.len());
        let mut landmarks = HashMap::new();
        for (idx, room) in rooms.iter().enumerate() {
            room_index.entry(room.id.clone()).or_insert(idx);
            landmarks.entry(room.node_id.clone()).or_insert(idx);
        }

        Self {
            id: id.into(),
            name: name.into(),
            map_image: None,
            map_info,
            graph,
            rooms,
            exit_node_id: None,
            entrance_node_id: None,
            options: RoutingOptions::default(),
            room_index,
            landmarks,
        }
    }

    #[must_use]
    pub fn with_exit_node(mut self, node_id: impl Into<String>) -> Self {
        self.exit_node_id = Some(node_id.into());
        self
    }

    #[must_use]
    pub fn with_entrance_node(mut self, node_id: impl Into<String>) -> Self {
        self.entrance_node_id = Some(node_id.into());
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: RoutingOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_map_image(mut self, map_image: impl Into<String>) -> Self {
        self.map_image = Some(map_image.into());
        self
    }

    pub fn room(&self, room_id: &str) -> Option<&Room> {
        self.room_index.get(room_id).map(|&idx| &self.rooms[idx])
    }

    pub fn contains_room(&self, room_id: &str) -> bool {
        self.room_index.contains_key(room_id)
    }

    /// Rooms for the given ids; unknown ids are skipped
    pub fn rooms_by_ids<S: AsRef<str>>(&self, room_ids: &[S]) -> Vec<&Room> {
        room_ids
            .iter()
            .filter_map(|id| self.room(id.as_ref()))
            .collect()
    }

    pub fn search_rooms(&self, query: &str) -> Vec<&Room> {
        room::search_rooms(&self.rooms, query)
    }

    pub fn rooms_by_category(&self, category: &str) -> Vec<&Room> {
        room::rooms_by_category(&self.rooms, category)
    }

    /// Room located at a node, first by load order
    pub fn room_at_node(&self, node_id: &str) -> Option<&Room> {
        self.landmarks.get(node_id).map(|&idx| &self.rooms[idx])
    }

    /// Shortest route between two nodes, with room names as step landmarks
    pub fn route(&self, start_id: &str, end_id: &str) -> Option<Route> {
        routing::find_route(&self.graph, start_id, end_id).map(|route| self.annotate(route))
    }

    pub fn route_between_rooms(&self, origin_room_id: &str, dest_room_id: &str) -> Option<Route> {
        let origin = self.room(origin_room_id)?;
        let dest = self.room(dest_room_id)?;
        self.route(&origin.node_id, &dest.node_id)
    }

    pub fn nearest_node(&self, x: f64, y: f64) -> Option<&Node> {
        self.graph.nearest_node(x, y)
    }

    pub fn exit_nodes(&self) -> Vec<&Node> {
        routing::exit_nodes(
            &self.graph,
            self.map_info.width,
            self.map_info.height,
            self.options.exit_threshold,
        )
    }

    pub fn nearest_exit(&self, start_id: &str) -> Option<&Node> {
        self.route_to_nearest_exit(start_id).map(|(exit, _)| exit)
    }

    /// Emergency flow: nearest reachable exit and the route to it
    pub fn route_to_nearest_exit(&self, start_id: &str) -> Option<(&Node, Route)> {
        routing::nearest_exit_route(
            &self.graph,
            start_id,
            self.map_info.width,
            self.map_info.height,
            self.options.exit_threshold,
        )
        .map(|(exit, route)| (exit, self.annotate(route)))
    }

    fn annotate(&self, mut route: Route) -> Route {
        for step in &mut route.steps {
            if step.landmark.is_none() && step.direction != routing::Direction::Start {
                step.landmark = self.room_at_node(&step.to_node.id).map(|r| r.name.clone());
            }
        }
        route
    }
}

/// All loaded buildings, keyed by building id.
///
/// Node ids are only meaningful inside their own building; every lookup
/// goes through the owning building first.
#[derive(Debug, Default)]
pub struct Campus {
    buildings: Vec<BuildingData>,
    building_index: HashMap<String, usize>,
    room_owner: HashMap<String, usize>,
}

impl Campus {
    /// # Errors
    ///
    /// Returns an error if two buildings share an id
    pub fn new(buildings: Vec<BuildingData>) -> Result<Self, Error> {
        let mut building_index = HashMap::with_capacity(buildings.len());
        let mut room_owner: HashMap<String, usize> = HashMap::new();

        for (idx, building) in buildings.iter().enumerate() {
            if building_index.insert(building.id.clone(), idx).is_some() {
                return Err(Error::InvalidData(format!(
                    "Duplicate building id: {}",
                    building.id
                )));
            }
            for room in &building.rooms {
                if let Some(&owner) = room_owner.get(&room.id) {
                    if owner != idx {
                        warn!(
                            "Room {} appears in buildings {} and {}; keeping {}",
                            room.id, buildings[owner].id, building.id, buildings[owner].id
                        );
                    }
                    continue;
                }
                room_owner.insert(room.id.clone(), idx);
            }
        }

        info!(
            "Campus ready: {} buildings, {} rooms",
            buildings.len(),
            room_owner.len()
        );

        Ok(Self {
            buildings,
            building_index,
            room_owner,
        })
    }

    pub fn building(&self, building_id: &str) -> Option<&BuildingData> {
        self.building_index
            .get(building_id)
            .map(|&idx| &self.buildings[idx])
    }

    pub fn buildings(&self) -> &[BuildingData] {
        &self.buildings
    }

    /// Building whose room list holds `room_id`
    pub fn building_of_room(&self, room_id: &str) -> Option<&BuildingData> {
        self.room_owner
            .get(room_id)
            .map(|&idx| &self.buildings[idx])
    }

    pub fn room(&self, room_id: &str) -> Option<&Room> {
        self.building_of_room(room_id)?.room(room_id)
    }

    pub fn search_rooms(&self, query: &str) -> Vec<&Room> {
        self.buildings
            .iter()
            .flat_map(|building| building.search_rooms(query))
            .collect()
    }

    pub fn rooms_by_category(&self, category: &str) -> Vec<&Room> {
        self.buildings
            .iter()
            .flat_map(|building| building.rooms_by_category(category))
            .collect()
    }

    /// Route between two rooms, switching buildings when needed
    pub fn route_between_rooms(
        &self,
        origin_room_id: &str,
        dest_room_id: &str,
    ) -> Option<routing::CrossBuildingRoute> {
        routing::cross_route(self, origin_room_id, dest_room_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Edge, Position};

    fn room(id: &str, name: &str, node_id: &str) -> Room {
        Room {
            id: id.to_string(),
            name: name.to_string(),
            kind: "lecture".to_string(),
            position: Position { x: 0.0, y: 0.0 },
            node_id: node_id.to_string(),
            building: "Building J".to_string(),
            floor: "Floor 1".to_string(),
        }
    }

    fn building_with_rooms(id: &str, rooms: Vec<Room>) -> BuildingData {
        let graph = FloorGraph::new(
            vec![
                Node::new("n1", 50.0, 50.0),
                Node::new("n2", 100.0, 50.0),
                Node::new("gate", 2.0, 50.0),
            ],
            vec![Edge::new("n1", "n2", 50.0), Edge::new("n1", "gate", 48.0)],
        );
        BuildingData::new(
            id,
            format!("Building {id}"),
            MapInfo {
                width: 200.0,
                height: 100.0,
            },
            graph,
            rooms,
        )
    }

    fn building(id: &str) -> BuildingData {
        building_with_rooms(
            id,
            vec![room("R1", "Hall One", "n1"), room("R2", "Hall Two", "n2")],
        )
    }

    #[test]
    fn steps_carry_room_landmarks() {
        let route = building("J").route("gate", "n2").unwrap();

        assert_eq!(route.steps[0].landmark, None);
        assert_eq!(route.steps[1].landmark.as_deref(), Some("Hall One"));
        assert_eq!(route.steps[2].landmark.as_deref(), Some("Hall Two"));
    }

    #[test]
    fn room_lookups() {
        let j = building("J");

        assert_eq!(j.room("R2").map(|r| r.node_id.as_str()), Some("n2"));
        assert!(j.room("R9").is_none());
        assert!(j.contains_room("R1"));
        assert!(!j.contains_room("r1"));
        assert_eq!(j.rooms_by_ids(&["R2", "R9", "R1"]).len(), 2);
        assert_eq!(j.route_between_rooms("R1", "R2").unwrap().total_distance, 50.0);
    }

    #[test]
    fn builder_sets_boundary_nodes_and_image() {
        let j = building("J")
            .with_exit_node("gate")
            .with_entrance_node("n1")
            .with_map_image("building_j.png");

        assert_eq!(j.exit_node_id.as_deref(), Some("gate"));
        assert_eq!(j.entrance_node_id.as_deref(), Some("n1"));
        assert_eq!(j.map_image.as_deref(), Some("building_j.png"));
        assert_eq!(building("H").map_image, None);
    }

    #[test]
    fn emergency_route_uses_map_bounds() {
        let j = building("J");

        let (exit, route) = j.route_to_nearest_exit("n2").unwrap();
        assert_eq!(exit.id, "gate");
        assert_eq!(route.total_distance, 98.0);

        let strict = building("J").with_options(RoutingOptions { exit_threshold: 1.0 });
        assert!(strict.nearest_exit("n2").is_none());
    }

    #[test]
    fn duplicate_building_ids_are_rejected() {
        let result = Campus::new(vec![building("J"), building("J")]);
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn rooms_resolve_to_their_building() {
        let other = building_with_rooms("H", vec![room("H1", "Studio", "n2")]);
        let campus = Campus::new(vec![building("J"), other]).unwrap();

        assert_eq!(campus.building_of_room("H1").map(|b| b.id.as_str()), Some("H"));
        assert_eq!(campus.building_of_room("R1").map(|b| b.id.as_str()), Some("J"));
        assert!(campus.building_of_room("nope").is_none());
        assert_eq!(campus.search_rooms("hall").len(), 2);
        assert_eq!(campus.rooms_by_category("lecture").len(), 3);
    }
}
