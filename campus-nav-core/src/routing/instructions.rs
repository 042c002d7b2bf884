//! Turn-by-turn instructions derived from a node path

use std::f64::consts::{PI, TAU};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::model::{FloorGraph, Node};
use crate::model::floor::network::straight_line;

/// Below this turn angle (degrees) the walker keeps going straight
const STRAIGHT_LIMIT_DEG: f64 = 15.0;
/// Upper bound of a slight turn
const SLIGHT_LIMIT_DEG: f64 = 60.0;
/// Upper bound of a regular turn; anything wider is sharp
const TURN_LIMIT_DEG: f64 = 120.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Start,
    Straight,
    Left,
    Right,
    SlightLeft,
    SlightRight,
    SharpLeft,
    SharpRight,
    Arrive,
}

impl Direction {
    /// Short imperative phrase shown for this direction
    pub fn instruction(self) -> &'static str {
        match self {
            Direction::Start => "Start from your location",
            Direction::Straight => "Continue straight",
            Direction::Left => "Turn left",
            Direction::Right => "Turn right",
            Direction::SlightLeft => "Slight left",
            Direction::SlightRight => "Slight right",
            Direction::SharpLeft => "Sharp left",
            Direction::SharpRight => "Sharp right",
            Direction::Arrive => "Arrive at destination",
        }
    }

    /// Classifies a signed turn angle in radians, positive turning right.
    fn from_turn(angle: f64) -> Self {
        let degrees = angle.abs().to_degrees();
        let right = angle > 0.0;
        match (degrees, right) {
            (d, _) if d < STRAIGHT_LIMIT_DEG => Direction::Straight,
            (d, true) if d < SLIGHT_LIMIT_DEG => Direction::SlightRight,
            (d, false) if d < SLIGHT_LIMIT_DEG => Direction::SlightLeft,
            (d, true) if d < TURN_LIMIT_DEG => Direction::Right,
            (d, false) if d < TURN_LIMIT_DEG => Direction::Left,
            (_, true) => Direction::SharpRight,
            (_, false) => Direction::SharpLeft,
        }
    }
}

/// One instruction unit of a route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationStep {
    /// 1-based, sequential
    pub step_number: usize,
    pub instruction: String,
    pub direction: Direction,
    /// Cost of this leg, zero for the start step
    pub distance: f64,
    pub from_node: Node,
    pub to_node: Node,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landmark: Option<String>,
}

impl NavigationStep {
    pub(crate) fn already_there(node: &Node) -> Self {
        Self {
            step_number: 1,
            instruction: "You are already at your destination".to_string(),
            direction: Direction::Arrive,
            distance: 0.0,
            from_node: node.clone(),
            to_node: node.clone(),
            landmark: None,
        }
    }
}

/// Builds the step list for a path.
///
/// Produces one START step followed by one step per traversed edge; the
/// last edge is always ARRIVE. Paths shorter than two nodes yield nothing.
/// The first edge announces the turn waiting at its far end, every later
/// edge reports the turn taken at its near end.
pub fn build_steps(graph: &FloorGraph, path: &[Node]) -> Vec<NavigationStep> {
    if path.len() < 2 {
        return Vec::new();
    }

    let mut steps = Vec::with_capacity(path.len());
    steps.push(NavigationStep {
        step_number: 1,
        instruction: Direction::Start.instruction().to_string(),
        direction: Direction::Start,
        distance: 0.0,
        from_node: path[0].clone(),
        to_node: path[0].clone(),
        landmark: None,
    });

    let last = path.len() - 2;
    for (i, (from, to)) in path.iter().tuple_windows().enumerate() {
        let direction = if i == last {
            Direction::Arrive
        } else if i == 0 {
            upcoming_turn(from, to, path.get(i + 2))
        } else {
            turn_at(&path[i - 1], from, to)
        };

        steps.push(NavigationStep {
            step_number: steps.len() + 1,
            instruction: direction.instruction().to_string(),
            direction,
            distance: leg_distance(graph, from, to),
            from_node: from.clone(),
            to_node: to.clone(),
            landmark: None,
        });
    }

    steps
}

fn leg_distance(graph: &FloorGraph, from: &Node, to: &Node) -> f64 {
    graph
        .edge_weight(&from.id, &to.id)
        .unwrap_or_else(|| straight_line(from, to))
}

/// Turn waiting at `to`, judged from the bearing change between the two
/// segments `from -> to` and `to -> next`.
fn upcoming_turn(from: &Node, to: &Node, next: Option<&Node>) -> Direction {
    let Some(next) = next else {
        return Direction::Straight;
    };
    if same_position(from, to) || same_position(to, next) {
        return Direction::Straight;
    }

    let bearing_in = (to.y - from.y).atan2(to.x - from.x);
    let bearing_out = (next.y - to.y).atan2(next.x - to.x);
    Direction::from_turn(normalize_angle(bearing_out - bearing_in))
}

/// Turn taken at `current` between `prev -> current` and `current -> next`.
///
/// Magnitude from the dot product, side from the 2-D cross product
/// (positive is a right turn in map coordinates, y pointing down).
fn turn_at(prev: &Node, current: &Node, next: &Node) -> Direction {
    let (v1x, v1y) = (current.x - prev.x, current.y - prev.y);
    let (v2x, v2y) = (next.x - current.x, next.y - current.y);

    let len1 = v1x.hypot(v1y);
    let len2 = v2x.hypot(v2y);
    if len1 == 0.0 || len2 == 0.0 {
        return Direction::Straight;
    }

    let cross = v1x * v2y - v1y * v2x;
    let dot = v1x * v2x + v1y * v2y;
    let angle = (dot / (len1 * len2)).clamp(-1.0, 1.0).acos();

    Direction::from_turn(if cross > 0.0 { angle } else { -angle })
}

fn same_position(a: &Node, b: &Node) -> bool {
    a.x == b.x && a.y == b.y
}

/// Wraps an angle into (-PI, PI]
fn normalize_angle(angle: f64) -> f64 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { wrapped + TAU } else { wrapped }
}
