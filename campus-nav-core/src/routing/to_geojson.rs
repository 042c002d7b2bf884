use geo::{LineString, Point};
use geojson::{Feature, FeatureCollection, Geometry, Value as GeoJsonValue};
use serde_json::{Map, Value as JsonValue, json};

use super::cross_building::CrossBuildingRoute;
use super::instructions::NavigationStep;
use super::route::Route;
use crate::Error;

impl Route {
    /// Converts the route to a `GeoJSON` `FeatureCollection` in map units:
    /// the path line first, then one point per step.
    pub fn to_geojson(&self) -> Result<FeatureCollection, Error> {
        Ok(FeatureCollection {
            features: self.features(&Map::new())?,
            bbox: None,
            foreign_members: None,
        })
    }

    pub fn to_geojson_string(&self) -> Result<String, Error> {
        serde_json::to_string(&self.to_geojson()?).map_err(|e| Error::GeoJsonError(e.to_string()))
    }

    fn features(&self, tags: &Map<String, JsonValue>) -> Result<Vec<Feature>, Error> {
        let mut features = Vec::with_capacity(self.steps.len() + 1);
        features.push(create_path_feature(self, tags)?);
        for step in &self.steps {
            features.push(create_step_feature(step, tags)?);
        }
        Ok(features)
    }
}

impl CrossBuildingRoute {
    /// Converts every segment to features tagged with its building and
    /// segment index, in segment order.
    pub fn to_geojson(&self) -> Result<FeatureCollection, Error> {
        let mut features = Vec::new();
        for (idx, segment) in self.segments.iter().enumerate() {
            let mut tags = Map::new();
            tags.insert("building_id".to_string(), json!(segment.building_id));
            tags.insert("segment".to_string(), json!(idx));
            if let Some(instruction) = &segment.instruction {
                tags.insert("segment_instruction".to_string(), json!(instruction));
            }
            features.extend(segment.route.features(&tags)?);
        }

        Ok(FeatureCollection {
            features,
            bbox: None,
            foreign_members: None,
        })
    }

    pub fn to_geojson_string(&self) -> Result<String, Error> {
        serde_json::to_string(&self.to_geojson()?).map_err(|e| Error::GeoJsonError(e.to_string()))
    }
}

fn create_path_feature(route: &Route, tags: &Map<String, JsonValue>) -> Result<Feature, Error> {
    // A single-node route has no line to draw
    let geometry = match route.nodes.as_slice() {
        [only] => Geometry::new(GeoJsonValue::from(&only.point())),
        nodes => {
            let line: LineString<f64> = nodes.iter().map(|node| (node.x, node.y)).collect();
            Geometry::new(GeoJsonValue::from(&line))
        }
    };

    let mut properties = Map::new();
    properties.insert("leg_type".to_string(), json!("path"));
    properties.insert("total_distance".to_string(), json!(route.total_distance));
    properties.insert("node_ids".to_string(), json!(route.node_ids()));
    properties.extend(tags.clone());

    feature(geometry, properties)
}

fn create_step_feature(
    step: &NavigationStep,
    tags: &Map<String, JsonValue>,
) -> Result<Feature, Error> {
    let location = Point::new(step.to_node.x, step.to_node.y);
    let geometry = Geometry::new(GeoJsonValue::from(&location));

    let mut properties = Map::new();
    properties.insert("leg_type".to_string(), json!("step"));
    properties.insert("step_number".to_string(), json!(step.step_number));
    properties.insert("direction".to_string(), json!(step.direction));
    properties.insert("instruction".to_string(), json!(step.instruction));
    properties.insert("distance".to_string(), json!(step.distance));
    properties.insert("from_node".to_string(), json!(step.from_node.id));
    properties.insert("to_node".to_string(), json!(step.to_node.id));
    if let Some(landmark) = &step.landmark {
        properties.insert("landmark".to_string(), json!(landmark));
    }
    properties.extend(tags.clone());

    feature(geometry, properties)
}

fn feature(geometry: Geometry, properties: Map<String, JsonValue>) -> Result<Feature, Error> {
    let value = json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": properties,
    });

    serde_json::from_value::<Feature>(value).map_err(|e| Error::GeoJsonError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use crate::model::{Edge, FloorGraph, Node};
    use crate::routing::find_route;

    fn graph() -> FloorGraph {
        FloorGraph::new(
            vec![
                Node::new("a", 0.0, 0.0),
                Node::new("b", 10.0, 0.0),
                Node::new("c", 10.0, 10.0),
            ],
            vec![Edge::new("a", "b", 10.0), Edge::new("b", "c", 10.0)],
        )
    }

    #[test]
    fn path_line_then_step_points() {
        let route = find_route(&graph(), "a", "c").unwrap();
        let collection = route.to_geojson().unwrap();

        assert_eq!(collection.features.len(), 1 + route.steps.len());
        let path = &collection.features[0];
        assert_eq!(
            path.property("leg_type").and_then(|v| v.as_str()),
            Some("path")
        );
        assert_eq!(
            path.property("total_distance").and_then(|v| v.as_f64()),
            Some(20.0)
        );
        let last = collection.features.last().unwrap();
        assert_eq!(
            last.property("direction").and_then(|v| v.as_str()),
            Some("ARRIVE")
        );
    }

    #[test]
    fn single_node_route_is_a_point() {
        let route = find_route(&graph(), "b", "b").unwrap();
        let json = route.to_geojson_string().unwrap();

        assert!(json.contains("\"Point\""));
        assert!(!json.contains("\"LineString\""));
    }
}
