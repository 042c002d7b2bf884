use std::net::SocketAddr;
use std::path::Path;

use campus_nav_core::CampusConfig;
use serde::Deserialize;

use crate::error::ServerError;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: SocketAddr,
    pub request_timeout_secs: u64,
    pub max_concurrent_requests: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
            request_timeout_secs: 10,
            max_concurrent_requests: 256,
        }
    }
}

/// Contents of the TOML configuration file
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(flatten)]
    pub campus: CampusConfig,
}

impl ServerConfig {
    /// Reads the config and resolves building data paths relative to it
    pub fn from_file(path: &Path) -> Result<Self, ServerError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            std::io::Error::new(
                e.kind(),
                format!("Failed to read config '{}': {}", path.display(), e),
            )
        })?;
        let config = Self::from_toml_str(&text)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Ok(Self {
            campus: config.campus.with_base_dir(base),
            ..config
        })
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ServerError> {
        Ok(toml::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_buildings_and_server_table() {
        let config = ServerConfig::from_toml_str(
            r#"
            [server]
            bind = "0.0.0.0:9000"
            request_timeout_secs = 3

            [[buildings]]
            id = "J"
            name = "Building J"
            graph = "j/graph.json"
            rooms = "j/rooms.json"
            map_info = "j/map_info.json"
            exit_node_id = "j_exit"

            [[buildings]]
            id = "H"
            name = "Building H"
            graph = "h/graph.json"
            rooms = "h/rooms.json"
            map_info = "h/map_info.json"
            entrance_node_id = "h_entry"
            exit_threshold = 8.0
            "#,
        )
        .unwrap();

        assert_eq!(config.server.bind.port(), 9000);
        assert_eq!(config.server.request_timeout_secs, 3);
        assert_eq!(config.server.max_concurrent_requests, 256);
        assert_eq!(config.campus.buildings.len(), 2);
        assert_eq!(config.campus.buildings[0].exit_node_id.as_deref(), Some("j_exit"));
        assert_eq!(config.campus.buildings[1].entrance_node_id.as_deref(), Some("h_entry"));
        assert_eq!(config.campus.buildings[1].exit_threshold, Some(8.0));
    }

    #[test]
    fn server_table_is_optional() {
        let config = ServerConfig::from_toml_str("buildings = []").unwrap();

        assert_eq!(config.server.bind, SocketAddr::from(([127, 0, 0, 1], 8080)));
        assert!(config.campus.buildings.is_empty());
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(matches!(
            ServerConfig::from_toml_str("[server\nbind = 1"),
            Err(ServerError::Toml(_))
        ));
    }
}
