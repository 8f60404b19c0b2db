//! Page overlay: position readout, location card, studies timeline and data map

use bevy::prelude::*;

use crate::globe::GlobeSystems;

pub mod data_map;
pub mod hud;
pub mod timeline;

pub use timeline::Timeline;

/// purple-900 at 80%
pub const PANEL_BACKGROUND: Color = Color::srgba(0.345, 0.11, 0.529, 0.8);

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Timeline>()
            .add_systems(
                Startup,
                (hud::spawn_hud, timeline::spawn_timeline, data_map::spawn_data_map),
            )
            .add_systems(
                Update,
                timeline::handle_timeline_buttons.before(GlobeSystems::Input),
            )
            .add_systems(
                Update,
                (
                    timeline::style_timeline_buttons,
                    hud::update_position_readout,
                    hud::update_location_card,
                    data_map::rebuild_data_map,
                    data_map::update_data_map_status,
                    data_map::fit_data_map_to_window,
                )
                    .after(GlobeSystems::Present),
            );
    }
}
