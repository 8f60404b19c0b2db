use bevy::picking::prelude::*;
use bevy::prelude::*;
use bevy::render::RenderPlugin;
use bevy::render::settings::{RenderCreation, WgpuSettings};
use bevy::window::{PresentMode, Window, WindowPlugin};

#[cfg(feature = "dev")]
use bevy::dev_tools::fps_overlay::FpsOverlayPlugin;

mod core;
mod geography;
mod globe;
mod terminal;
mod ui;

use geography::GeographyPlugin;
use globe::GlobePlugin;
use terminal::TerminalPlugin;
use ui::UiPlugin;

fn main() {
    let mut app = App::new();

    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Portfolio Globe".to_string(),
                    present_mode: PresentMode::AutoVsync,
                    ..default()
                }),
                ..default()
            })
            .set(RenderPlugin {
                render_creation: RenderCreation::Automatic(WgpuSettings { ..default() }),
                ..default()
            }),
    );

    #[cfg(feature = "dev")]
    app.add_plugins(FpsOverlayPlugin::default());

    app.add_plugins(MeshPickingPlugin);

    app.add_plugins(GeographyPlugin);
    app.add_plugins(GlobePlugin);
    app.add_plugins(UiPlugin);
    app.add_plugins(TerminalPlugin);

    app.run();
}
