use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::warn;
use serde::Deserialize;

use crate::Error;
use crate::model::{MapInfo, RawGraph, Room};

pub fn deserialize_json_file<T>(path: &Path) -> Result<T, Error>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let file = File::open(path).map_err(|e| {
        std::io::Error::new(
            e.kind(),
            format!("Failed to open file '{}': {}", path.display(), e),
        )
    })?;
    serde_json::from_reader(BufReader::with_capacity(32 * 1024, file)).map_err(|e| {
        warn!("Failed to parse '{}': {}", path.display(), e);
        Error::from(e)
    })
}

/// `map_info.json` wraps the dimensions in a `map_info` object
#[derive(Debug, Deserialize)]
struct MapInfoFile {
    map_info: MapInfo,
}

pub(super) fn read_graph(path: &Path) -> Result<RawGraph, Error> {
    let raw: RawGraph = deserialize_json_file(path)?;
    if raw.nodes.is_empty() || raw.edges.is_empty() {
        return Err(Error::InvalidData(format!(
            "Graph '{}' has no nodes or no edges",
            path.display()
        )));
    }
    Ok(raw)
}

pub(super) fn read_rooms(path: &Path) -> Result<Vec<Room>, Error> {
    deserialize_json_file(path)
}

pub(super) fn read_map_info(path: &Path) -> Result<MapInfo, Error> {
    let file: MapInfoFile = deserialize_json_file(path)?;
    let info = file.map_info;
    if !(info.width > 0.0 && info.height > 0.0) {
        return Err(Error::InvalidData(format!(
            "Map '{}' has invalid dimensions {}x{}",
            path.display(),
            info.width,
            info.height
        )));
    }
    Ok(info)
}
