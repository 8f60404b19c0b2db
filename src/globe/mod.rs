//! Interactive globe
//!
//! Line-grid shell, continent outlines and a location pin, rotated by the
//! [`RotationController`] from pointer/touch input and focus requests.

use bevy::prelude::*;

pub mod config;
pub mod controller;
pub mod gesture;
pub mod mesh;
pub mod messages;
pub mod ripple;
pub mod systems;

pub use config::GlobeConfig;
pub use controller::RotationController;
pub use messages::{ClearLocation, CoordinateUpdated, FocusLocation, LocationUpdated};

/// Frame phases: input feeds the controller, which runs before anything reads its rotation.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum GlobeSystems {
    Input,
    Step,
    Present,
}

pub struct GlobePlugin;

impl Plugin for GlobePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GlobeConfig>()
            .init_resource::<RotationController>()
            .init_resource::<gesture::PointerGesture>()
            .init_resource::<ripple::RippleField>()
            .init_resource::<systems::HoverGlow>()
            .add_message::<FocusLocation>()
            .add_message::<ClearLocation>()
            .add_message::<CoordinateUpdated>()
            .add_message::<LocationUpdated>()
            .configure_sets(
                Update,
                (GlobeSystems::Input, GlobeSystems::Step, GlobeSystems::Present).chain(),
            )
            .add_systems(Startup, systems::spawn_globe)
            .add_systems(
                Update,
                (systems::track_pointer_drag, systems::handle_location_requests)
                    .chain()
                    .in_set(GlobeSystems::Input),
            )
            .add_systems(Update, systems::step_rotation.in_set(GlobeSystems::Step))
            .add_systems(Update, systems::fit_camera_to_window)
            .add_systems(
                Update,
                (
                    systems::update_hover_glow,
                    systems::sync_globe_transform,
                    systems::rebuild_outlines,
                    systems::apply_ripples,
                    systems::sync_location_pin,
                )
                    .chain()
                    .in_set(GlobeSystems::Present),
            );
    }
}
