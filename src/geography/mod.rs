//! Geography data module
//!
//! Loads the landmass boundary dataset (GeoJSON) on a background worker and
//! reduces it to the continent outline paths drawn on the globe.

use bevy::prelude::*;

pub mod cache;
pub mod fetcher;
pub mod parser;
pub mod simplify;
pub mod systems;
pub mod types;

pub use types::{GeographyConfig, GeographyState, OutlinePath, OutlineSet};

/// Plugin for geography loading and outline preparation
pub struct GeographyPlugin;

impl Plugin for GeographyPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GeographyConfig>()
            .init_resource::<GeographyState>()
            .init_resource::<OutlineSet>()
            .add_systems(Startup, systems::setup_geography_worker)
            .add_systems(
                Update,
                (systems::request_geography, systems::apply_geography_results).chain(),
            );
    }
}
