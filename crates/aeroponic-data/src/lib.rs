//! Data-driven farm configuration.
//!
//! A farm directory holds `crops.{ron,toml,json}` and, optionally,
//! `placement.{ron,toml,json}`. [`load_farm_config`] reads both and returns
//! a checked [`FarmConfig`].

pub mod config;
pub mod loader;
pub mod schema;

pub use config::{
    FarmConfig, PlacementSettings, load_crops, load_farm_config, load_placement_settings,
};
pub use loader::{DataLoadError, Format};
