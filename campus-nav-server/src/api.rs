use std::sync::Arc;
use std::time::Duration;

use axum::error_handling::HandleErrorLayer;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{BoxError, Json, Router};
use campus_nav_core::{BuildingData, Campus, MapInfo, Node, Room, Route};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tokio::sync::Semaphore;
use tower::ServiceBuilder;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerSettings;
use crate::error::ApiError;

#[derive(Clone)]
pub struct AppState {
    campus: Arc<Campus>,
}

impl AppState {
    fn building(&self, building_id: &str) -> Result<&BuildingData, ApiError> {
        self.campus
            .building(building_id)
            .ok_or_else(|| ApiError::UnknownBuilding(building_id.to_string()))
    }
}

/// Routes without middleware
pub fn router(campus: Arc<Campus>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/buildings", get(list_buildings))
        .route("/buildings/{building_id}/route", get(building_route))
        .route("/buildings/{building_id}/exits", get(building_exits))
        .route("/buildings/{building_id}/exits/nearest", get(nearest_exit))
        .route("/buildings/{building_id}/nodes/nearest", get(nearest_node))
        .route("/route", get(campus_route))
        .route("/rooms", get(list_rooms))
        .route("/rooms/search", get(search_rooms))
        .route("/rooms/{room_id}", get(get_room))
        .with_state(AppState { campus })
}

/// Full application: routes plus tracing, CORS, timeout and load limit
pub fn app(campus: Arc<Campus>, settings: &ServerSettings) -> Router {
    let permits = Arc::new(Semaphore::new(settings.max_concurrent_requests));
    with_middleware(router(campus), settings, permits)
}

/// `permits` is shared by every route, capping in-flight requests server-wide
fn with_middleware(router: Router, settings: &ServerSettings, permits: Arc<Semaphore>) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .layer(HandleErrorLayer::new(handle_middleware_error))
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .layer(GlobalConcurrencyLimitLayer::with_semaphore(permits)),
    )
}

async fn handle_middleware_error(err: BoxError) -> (StatusCode, Json<Value>) {
    if err.is::<tower::timeout::error::Elapsed>() {
        (
            StatusCode::REQUEST_TIMEOUT,
            Json(json!({ "error": "Request timed out" })),
        )
    } else {
        tracing::error!("Unhandled middleware error: {err}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": err.to_string() })),
        )
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[derive(Debug, Serialize)]
struct BuildingSummary {
    id: String,
    name: String,
    map_image: Option<String>,
    map_info: MapInfo,
    node_count: usize,
    edge_count: usize,
    room_count: usize,
    exit_node_id: Option<String>,
    entrance_node_id: Option<String>,
}

impl From<&BuildingData> for BuildingSummary {
    fn from(building: &BuildingData) -> Self {
        Self {
            id: building.id.clone(),
            name: building.name.clone(),
            map_image: building.map_image.clone(),
            map_info: building.map_info,
            node_count: building.graph.node_count(),
            edge_count: building.graph.edge_count(),
            room_count: building.rooms.len(),
            exit_node_id: building.exit_node_id.clone(),
            entrance_node_id: building.entrance_node_id.clone(),
        }
    }
}

async fn list_buildings(State(state): State<AppState>) -> Json<Vec<BuildingSummary>> {
    Json(
        state
            .campus
            .buildings()
            .iter()
            .map(BuildingSummary::from)
            .collect(),
    )
}

#[derive(Debug, Deserialize)]
struct NodeRouteQuery {
    start: String,
    end: String,
}

async fn building_route(
    State(state): State<AppState>,
    Path(building_id): Path<String>,
    Query(query): Query<NodeRouteQuery>,
) -> Result<Json<Route>, ApiError> {
    let building = state.building(&building_id)?;
    building
        .route(&query.start, &query.end)
        .map(Json)
        .ok_or_else(|| {
            tracing::debug!(
                "No route in {} from {} to {}",
                building_id,
                query.start,
                query.end
            );
            ApiError::NoRoute(format!("{} -> {} in {}", query.start, query.end, building_id))
        })
}

async fn building_exits(
    State(state): State<AppState>,
    Path(building_id): Path<String>,
) -> Result<Json<Vec<Node>>, ApiError> {
    let building = state.building(&building_id)?;
    Ok(Json(building.exit_nodes().into_iter().cloned().collect()))
}

#[derive(Debug, Deserialize)]
struct StartQuery {
    start: String,
}

#[derive(Debug, Serialize)]
struct ExitRoute {
    exit: Node,
    route: Route,
}

async fn nearest_exit(
    State(state): State<AppState>,
    Path(building_id): Path<String>,
    Query(query): Query<StartQuery>,
) -> Result<Json<ExitRoute>, ApiError> {
    let building = state.building(&building_id)?;
    let (exit, route) = building
        .route_to_nearest_exit(&query.start)
        .ok_or_else(|| ApiError::NoRoute(format!("no reachable exit from {}", query.start)))?;
    Ok(Json(ExitRoute {
        exit: exit.clone(),
        route,
    }))
}

#[derive(Debug, Deserialize)]
struct PointQuery {
    x: f64,
    y: f64,
}

async fn nearest_node(
    State(state): State<AppState>,
    Path(building_id): Path<String>,
    Query(query): Query<PointQuery>,
) -> Result<Json<Node>, ApiError> {
    let building = state.building(&building_id)?;
    building
        .nearest_node(query.x, query.y)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("building {building_id} has no nodes")))
}

#[derive(Debug, Deserialize)]
struct RoomRouteQuery {
    from: String,
    to: String,
    #[serde(default)]
    format: Option<String>,
}

async fn campus_route(
    State(state): State<AppState>,
    Query(query): Query<RoomRouteQuery>,
) -> Result<Response, ApiError> {
    for room_id in [&query.from, &query.to] {
        if state.campus.room(room_id).is_none() {
            return Err(ApiError::UnknownRoom(room_id.clone()));
        }
    }

    let route = state
        .campus
        .route_between_rooms(&query.from, &query.to)
        .ok_or_else(|| ApiError::NoRoute(format!("{} -> {}", query.from, query.to)))?;

    match query.format.as_deref() {
        Some("geojson") => {
            let body = route.to_geojson_string()?;
            Ok(([(header::CONTENT_TYPE, "application/geo+json")], body).into_response())
        }
        _ => Ok(Json(route).into_response()),
    }
}

#[derive(Debug, Deserialize)]
struct CategoryQuery {
    #[serde(default)]
    category: Option<String>,
}

async fn list_rooms(
    State(state): State<AppState>,
    Query(query): Query<CategoryQuery>,
) -> Json<Vec<Room>> {
    let rooms = match query.category.as_deref() {
        Some(category) => state
            .campus
            .rooms_by_category(category)
            .into_iter()
            .cloned()
            .collect(),
        None => state
            .campus
            .buildings()
            .iter()
            .flat_map(|building| building.rooms.iter().cloned())
            .collect(),
    };
    Json(rooms)
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    q: String,
}

async fn search_rooms(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<Vec<Room>> {
    Json(
        state
            .campus
            .search_rooms(&query.q)
            .into_iter()
            .cloned()
            .collect(),
    )
}

async fn get_room(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<Json<Room>, ApiError> {
    state
        .campus
        .room(&room_id)
        .cloned()
        .map(Json)
        .ok_or(ApiError::UnknownRoom(room_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use campus_nav_core::{Edge, FloorGraph, Position};
    use tower::ServiceExt;

    fn room(id: &str, name: &str, kind: &str, node_id: &str, building: &str) -> Room {
        Room {
            id: id.to_string(),
            name: name.to_string(),
            kind: kind.to_string(),
            position: Position { x: 0.0, y: 0.0 },
            node_id: node_id.to_string(),
            building: building.to_string(),
            floor: "Floor 1".to_string(),
        }
    }

    fn campus() -> Arc<Campus> {
        let j_graph = FloorGraph::new(
            vec![
                Node::new("a", 100.0, 100.0),
                Node::new("b", 200.0, 100.0),
                Node::new("c", 200.0, 200.0),
                Node::new("exit", 200.0, 398.0),
            ],
            vec![
                Edge::new("a", "b", 100.0),
                Edge::new("b", "c", 100.0),
                Edge::new("c", "exit", 198.0),
            ],
        );
        let j = BuildingData::new(
            "J",
            "Building J",
            MapInfo {
                width: 500.0,
                height: 400.0,
            },
            j_graph,
            vec![
                room("J101", "Lecture Hall", "lecture", "a", "Building J"),
                room("J-WC", "Restrooms", "toilet", "c", "Building J"),
            ],
        )
        .with_exit_node("exit");

        let h_graph = FloorGraph::new(
            vec![Node::new("entry", 50.0, 50.0), Node::new("lab", 50.0, 150.0)],
            vec![Edge::new("entry", "lab", 100.0)],
        );
        let h = BuildingData::new(
            "H",
            "Building H",
            MapInfo {
                width: 300.0,
                height: 300.0,
            },
            h_graph,
            vec![room("H201", "Chemistry Lab", "lab", "lab", "Building H")],
        )
        .with_entrance_node("entry");

        Arc::new(Campus::new(vec![j, h]).unwrap())
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let response = router(campus())
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (status, body) = get_json("/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn lists_buildings_with_graph_sizes() {
        let (status, body) = get_json("/buildings").await;

        assert_eq!(status, StatusCode::OK);
        let buildings = body.as_array().unwrap();
        assert_eq!(buildings.len(), 2);
        assert_eq!(buildings[0]["id"], "J");
        assert_eq!(buildings[0]["node_count"], 4);
        assert_eq!(buildings[0]["room_count"], 2);
        assert_eq!(buildings[1]["entrance_node_id"], "entry");
    }

    #[tokio::test]
    async fn routes_inside_a_building() {
        let (status, body) = get_json("/buildings/J/route?start=a&end=c").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_distance"], 200.0);
        let steps = body["steps"].as_array().unwrap();
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0]["direction"], "START");
        assert_eq!(steps[2]["direction"], "ARRIVE");
        assert_eq!(steps[2]["landmark"], "Restrooms");
    }

    #[tokio::test]
    async fn unknown_building_is_not_found() {
        let (status, body) = get_json("/buildings/Z/route?start=a&end=b").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Unknown building: Z");
    }

    #[tokio::test]
    async fn unreachable_node_is_not_found() {
        let (status, body) = get_json("/buildings/J/route?start=a&end=missing").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().starts_with("No route"));
    }

    #[tokio::test]
    async fn nearest_exit_returns_exit_and_route() {
        let (status, body) = get_json("/buildings/J/exits/nearest?start=b").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["exit"]["id"], "exit");
        assert_eq!(body["route"]["total_distance"], 298.0);
    }

    #[tokio::test]
    async fn exit_list_uses_border_threshold() {
        let (status, body) = get_json("/buildings/J/exits").await;

        assert_eq!(status, StatusCode::OK);
        let ids: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|node| node["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["exit"]);
    }

    #[tokio::test]
    async fn snaps_point_to_nearest_node() {
        let (status, body) = get_json("/buildings/J/nodes/nearest?x=190&y=210").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], "c");
    }

    #[tokio::test]
    async fn routes_across_buildings() {
        let (status, body) = get_json("/route?from=J101&to=H201").await;

        assert_eq!(status, StatusCode::OK);
        let segments = body["segments"].as_array().unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0]["building_id"], "J");
        assert_eq!(segments[1]["building_id"], "H");
        assert_eq!(body["total_distance"], 498.0);
    }

    #[tokio::test]
    async fn cross_route_as_geojson() {
        let response = router(campus())
            .oneshot(
                Request::builder()
                    .uri("/route?from=J101&to=J-WC&format=geojson")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/geo+json"
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["type"], "FeatureCollection");
    }

    #[tokio::test]
    async fn unknown_room_in_route_is_not_found() {
        let (status, body) = get_json("/route?from=J101&to=X999").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Unknown room: X999");
    }

    #[tokio::test]
    async fn room_catalogue_endpoints() {
        let (_, all) = get_json("/rooms").await;
        assert_eq!(all.as_array().unwrap().len(), 3);

        let (_, toilets) = get_json("/rooms?category=restroom").await;
        let toilets = toilets.as_array().unwrap();
        assert_eq!(toilets.len(), 1);
        assert_eq!(toilets[0]["id"], "J-WC");

        let (_, found) = get_json("/rooms/search?q=chem").await;
        assert_eq!(found[0]["id"], "H201");

        let (status, room) = get_json("/rooms/H201").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(room["nodeId"], "lab");

        let (status, _) = get_json("/rooms/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn request_limit_is_shared_across_routes() {
        let permits = Arc::new(Semaphore::new(1));
        let app = with_middleware(router(campus()), &ServerSettings::default(), permits.clone());
        let request = |uri: &str| Request::builder().uri(uri).body(Body::empty()).unwrap();

        // Stands in for a request still in flight on another route
        let in_flight = permits.clone().try_acquire_owned().unwrap();
        let waiting = tokio::time::timeout(
            Duration::from_millis(50),
            app.clone().oneshot(request("/buildings")),
        )
        .await;
        assert!(waiting.is_err());

        drop(in_flight);
        let response = app.oneshot(request("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn full_app_serves_requests_through_middleware() {
        let response = app(campus(), &ServerSettings::default())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
