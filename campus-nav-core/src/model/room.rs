//! Named destinations and the room catalogue queries

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Named destination resolving to one waypoint of its building's graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: String,
    pub name: String,
    /// Category tag, e.g. "lecture" or "toilet"
    #[serde(rename = "type")]
    pub kind: String,
    pub position: Position,
    /// Routing endpoint for this room
    pub node_id: String,
    #[serde(default)]
    pub building: String,
    #[serde(default)]
    pub floor: String,
}

impl Room {
    /// Display location, "<building> - <floor>"
    pub fn location(&self) -> String {
        format!("{} - {}", self.building, self.floor)
    }

    /// Whether this room belongs to a browse category.
    ///
    /// Several categories accept more than one type tag ("toilets" also
    /// matches "restroom"); unknown categories compare the tag directly.
    pub fn in_category(&self, category: &str) -> bool {
        let kind = self.kind.to_lowercase();
        let category = category.trim().to_lowercase();
        let accepted: &[&str] = match category.as_str() {
            "toilets" | "toilet" | "restroom" => &["toilet", "restroom"],
            "lecture halls" | "lecture" => &["lecture", "lecture_hall"],
            "classrooms" | "classroom" => &["classroom", "class"],
            "labs" | "lab" => &["lab", "laboratory"],
            "popular" => &["cafeteria", "study_area", "computer_lab", "student_service"],
            other => return kind == other,
        };
        accepted.contains(&kind.as_str())
    }

    /// Case-insensitive substring match on name, id or type.
    /// `query` must already be lowercased and trimmed.
    pub(crate) fn matches_query(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(query)
            || self.id.to_lowercase().contains(query)
            || self.kind.to_lowercase().contains(query)
    }
}

/// Rooms matching a free-text query; a blank query matches nothing
pub fn search_rooms<'a>(rooms: &'a [Room], query: &str) -> Vec<&'a Room> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }
    rooms
        .iter()
        .filter(|room| room.matches_query(&query))
        .collect()
}

pub fn rooms_by_category<'a>(rooms: &'a [Room], category: &str) -> Vec<&'a Room> {
    rooms
        .iter()
        .filter(|room| room.in_category(category))
        .collect()
}
