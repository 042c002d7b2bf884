//! This module is responsible for loading building data from JSON files
//! and assembling the campus routing model.

mod builder;
mod config;
pub mod de;

pub use builder::{create_campus, load_building};
pub use config::{BuildingConfig, CampusConfig};
