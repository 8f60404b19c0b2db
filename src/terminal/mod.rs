//! Floating terminal window with a typed boot log and a small command interpreter

use bevy::prelude::*;
use bevy_input_focus::InputFocus;

pub mod commands;
pub mod config;
pub mod systems;
pub mod typing;
pub mod window;

pub use commands::TerminalSession;
pub use config::TerminalConfig;
pub use window::TerminalWindow;

pub struct TerminalPlugin;

impl Plugin for TerminalPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TerminalConfig>()
            .init_resource::<TerminalWindow>()
            .init_resource::<TerminalSession>()
            .init_resource::<InputFocus>()
            .add_systems(Startup, systems::setup_terminal)
            .add_systems(
                Update,
                (
                    (
                        systems::handle_window_controls,
                        systems::handle_reopen_button,
                        systems::handle_taskbar_buttons,
                        systems::begin_window_gestures,
                    ),
                    systems::update_window_gestures,
                    systems::fit_to_viewport,
                    systems::tick_boot_log,
                    systems::handle_keyboard,
                    (
                        systems::sync_window_layout,
                        systems::sync_taskbar,
                        systems::render_terminal_text,
                    ),
                )
                    .chain(),
            );
    }
}
