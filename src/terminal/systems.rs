//! Terminal window entities, keyboard input and text rendering

use anyhow::{Context, Result};
use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::prelude::*;
use bevy::ui::FocusPolicy;
use bevy::window::{PrimaryWindow, WindowResized};
use bevy_input_focus::InputFocus;
use std::process::Command;

use super::TerminalConfig;
use super::commands::TerminalSession;
use super::window::{ResizeEdge, TerminalWindow};

const TITLE_BAR_HEIGHT: f32 = 36.0;
const CONTENT_PADDING: f32 = 12.0;
const CURSOR: char = '█';

const WINDOW_BACKGROUND: Color = Color::srgba(0.05, 0.05, 0.08, 0.95);
const TITLE_BAR_BACKGROUND: Color = Color::srgb(0.12, 0.12, 0.16);
const OUTPUT_COLOR: Color = Color::srgb(0.91, 0.84, 1.0);
const BACKDROP_COLOR: Color = Color::srgba(0.0, 0.0, 0.0, 0.5);

/// Root node of the floating window
#[derive(Component)]
pub struct TerminalRoot;

/// Any node whose press activates the terminal
#[derive(Component)]
pub struct TerminalSurface;

#[derive(Component)]
pub struct TerminalTitleBar;

#[derive(Component)]
pub struct TerminalText;

#[derive(Component)]
pub struct TerminalBackdrop;

#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowControl {
    Close,
    Minimize,
    Fullscreen,
}

#[derive(Component)]
pub struct ResizeHandle(pub ResizeEdge);

#[derive(Component)]
pub struct Taskbar;

#[derive(Component)]
pub struct TaskbarButton(pub &'static str);

#[derive(Component)]
pub struct ReopenButton;

fn viewport(windows: &Query<&Window, With<PrimaryWindow>>) -> Option<Vec2> {
    windows.single().ok().map(|w| w.size())
}

fn cursor(windows: &Query<&Window, With<PrimaryWindow>>) -> Option<Vec2> {
    windows.single().ok().and_then(|w| w.cursor_position())
}

pub fn setup_terminal(
    mut commands: Commands,
    config: Res<TerminalConfig>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut terminal: ResMut<TerminalWindow>,
    mut session: ResMut<TerminalSession>,
) {
    if let Some(size) = viewport(&windows) {
        *terminal = TerminalWindow::new(size, config.mobile_breakpoint);
    }
    session.boot.start(config.boot_delay);

    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        },
        BackgroundColor(BACKDROP_COLOR),
        Visibility::Hidden,
        GlobalZIndex(4),
        TerminalBackdrop,
    ));

    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(terminal.rect.position.x),
                top: Val::Px(terminal.rect.position.y),
                width: Val::Px(terminal.rect.size.x),
                height: Val::Px(terminal.rect.size.y),
                flex_direction: FlexDirection::Column,
                ..default()
            },
            BackgroundColor(WINDOW_BACKGROUND),
            Interaction::default(),
            FocusPolicy::Block,
            GlobalZIndex(5),
            TerminalRoot,
            TerminalSurface,
            Name::new("Terminal"),
        ))
        .with_children(|window| {
            window
                .spawn((
                    Button,
                    Node {
                        height: Val::Px(TITLE_BAR_HEIGHT),
                        flex_direction: FlexDirection::Row,
                        align_items: AlignItems::Center,
                        padding: UiRect::horizontal(Val::Px(12.0)),
                        column_gap: Val::Px(8.0),
                        ..default()
                    },
                    BackgroundColor(TITLE_BAR_BACKGROUND),
                    TerminalTitleBar,
                    TerminalSurface,
                ))
                .with_children(|bar| {
                    for (control, color) in [
                        (WindowControl::Close, Color::srgb(0.94, 0.27, 0.27)),
                        (WindowControl::Minimize, Color::srgb(0.92, 0.7, 0.03)),
                        (WindowControl::Fullscreen, Color::srgb(0.13, 0.77, 0.37)),
                    ] {
                        bar.spawn((
                            Button,
                            Node {
                                width: Val::Px(12.0),
                                height: Val::Px(12.0),
                                ..default()
                            },
                            BackgroundColor(color),
                            control,
                            TerminalSurface,
                        ));
                    }
                    bar.spawn((
                        Text::new(config.title.clone()),
                        TextFont::from_font_size(13.0),
                        TextColor(Color::srgb(0.6, 0.6, 0.65)),
                        Node {
                            margin: UiRect::left(Val::Px(8.0)),
                            ..default()
                        },
                    ));
                });

            window
                .spawn(Node {
                    flex_grow: 1.0,
                    padding: UiRect::all(Val::Px(CONTENT_PADDING)),
                    overflow: Overflow::clip(),
                    ..default()
                })
                .with_children(|content| {
                    content.spawn((
                        Text::new(""),
                        TextFont::from_font_size(config.font_size),
                        TextColor(OUTPUT_COLOR),
                        TerminalText,
                    ));
                });

            for (edge, node) in [
                (
                    ResizeEdge::Left,
                    Node {
                        left: Val::Px(0.0),
                        top: Val::Px(0.0),
                        width: Val::Px(6.0),
                        height: Val::Percent(100.0),
                        ..default()
                    },
                ),
                (
                    ResizeEdge::Right,
                    Node {
                        right: Val::Px(0.0),
                        top: Val::Px(0.0),
                        width: Val::Px(6.0),
                        height: Val::Percent(100.0),
                        ..default()
                    },
                ),
                (
                    ResizeEdge::Bottom,
                    Node {
                        left: Val::Px(0.0),
                        bottom: Val::Px(0.0),
                        width: Val::Percent(100.0),
                        height: Val::Px(6.0),
                        ..default()
                    },
                ),
                (
                    ResizeEdge::BottomRight,
                    Node {
                        right: Val::Px(0.0),
                        bottom: Val::Px(0.0),
                        width: Val::Px(14.0),
                        height: Val::Px(14.0),
                        ..default()
                    },
                ),
            ] {
                window.spawn((
                    Button,
                    Node {
                        position_type: PositionType::Absolute,
                        ..node
                    },
                    ResizeHandle(edge),
                    TerminalSurface,
                ));
            }
        });

    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(0.0),
            bottom: Val::Px(0.0),
            width: Val::Percent(100.0),
            height: Val::Px(40.0),
            align_items: AlignItems::Center,
            padding: UiRect::horizontal(Val::Px(12.0)),
            column_gap: Val::Px(12.0),
            ..default()
        },
        BackgroundColor(Color::srgba(0.07, 0.07, 0.1, 0.9)),
        Visibility::Hidden,
        GlobalZIndex(20),
        Taskbar,
    ));

    commands
        .spawn((
            Button,
            Node {
                position_type: PositionType::Absolute,
                right: Val::Px(16.0),
                bottom: Val::Px(56.0),
                padding: UiRect::axes(Val::Px(14.0), Val::Px(8.0)),
                ..default()
            },
            BackgroundColor(crate::ui::PANEL_BACKGROUND),
            Visibility::Hidden,
            GlobalZIndex(20),
            ReopenButton,
        ))
        .with_children(|button| {
            button.spawn((
                Text::new("Open Terminal"),
                TextFont::from_font_size(14.0),
                TextColor(Color::WHITE),
            ));
        });

    info!("[INIT] Terminal ready");
}

pub fn handle_window_controls(
    controls: Query<(&Interaction, &WindowControl), Changed<Interaction>>,
    mut terminal: ResMut<TerminalWindow>,
    mut session: ResMut<TerminalSession>,
    mut focus: ResMut<InputFocus>,
) {
    for (interaction, control) in controls.iter() {
        if *interaction != Interaction::Pressed {
            continue;
        }
        match control {
            WindowControl::Close => {
                terminal.close();
                session.reset();
                focus.clear();
            }
            WindowControl::Minimize => {
                terminal.minimize();
                focus.clear();
            }
            WindowControl::Fullscreen => terminal.toggle_fullscreen(),
        }
        debug!("Terminal window {:?}", control);
    }
}

pub fn handle_reopen_button(
    config: Res<TerminalConfig>,
    windows: Query<&Window, With<PrimaryWindow>>,
    buttons: Query<&Interaction, (Changed<Interaction>, With<ReopenButton>)>,
    mut terminal: ResMut<TerminalWindow>,
    mut session: ResMut<TerminalSession>,
) {
    if !buttons.iter().any(|i| *i == Interaction::Pressed) {
        return;
    }
    let Some(size) = viewport(&windows) else {
        return;
    };
    terminal.open(size, config.mobile_breakpoint);
    session.reset();
    session
        .boot
        .start(config.reopen_delay + config.boot_delay);
}

pub fn handle_taskbar_buttons(
    buttons: Query<(&Interaction, &TaskbarButton), Changed<Interaction>>,
    mut terminal: ResMut<TerminalWindow>,
) {
    for (interaction, button) in buttons.iter() {
        if *interaction == Interaction::Pressed && !terminal.restore(button.0) {
            warn!("No minimized window with id {}", button.0);
        }
    }
}

/// Start drags and resizes, and give the terminal keyboard focus when pressed.
#[allow(clippy::too_many_arguments)]
pub fn begin_window_gestures(
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    root: Single<Entity, With<TerminalRoot>>,
    surfaces: Query<&Interaction, With<TerminalSurface>>,
    title_bars: Query<&Interaction, With<TerminalTitleBar>>,
    handles: Query<(&Interaction, &ResizeHandle)>,
    mut terminal: ResMut<TerminalWindow>,
    mut focus: ResMut<InputFocus>,
) {
    if !mouse.just_pressed(MouseButton::Left) {
        return;
    }

    if !terminal.is_shown() || !surfaces.iter().any(|i| *i == Interaction::Pressed) {
        if focus.get() == Some(*root) {
            focus.clear();
        }
        return;
    }

    terminal.activate();
    focus.set(*root);

    let Some(position) = cursor(&windows) else {
        return;
    };
    if title_bars.iter().any(|i| *i == Interaction::Pressed) {
        terminal.begin_drag(position);
    } else if let Some((_, handle)) = handles.iter().find(|(i, _)| **i == Interaction::Pressed) {
        terminal.begin_resize(handle.0, position);
    }
}

pub fn update_window_gestures(
    config: Res<TerminalConfig>,
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut terminal: ResMut<TerminalWindow>,
) {
    if !terminal.is_dragging() && !terminal.is_resizing() {
        return;
    }
    if !mouse.pressed(MouseButton::Left) {
        terminal.end_gesture();
        return;
    }
    let Some(position) = cursor(&windows) else {
        return;
    };
    if terminal.is_dragging() {
        terminal.drag_to(position);
    } else {
        terminal.resize_to(position, config.min_size);
    }
}

pub fn fit_to_viewport(
    config: Res<TerminalConfig>,
    mut resized: MessageReader<WindowResized>,
    mut terminal: ResMut<TerminalWindow>,
) {
    if let Some(event) = resized.read().last() {
        terminal.fit_viewport(Vec2::new(event.width, event.height), config.mobile_breakpoint);
    }
}

pub fn tick_boot_log(time: Res<Time>, config: Res<TerminalConfig>, mut session: ResMut<TerminalSession>) {
    if session
        .bypass_change_detection()
        .boot
        .tick(time.delta(), config.prompt_delay)
    {
        session.set_changed();
    }
}

pub fn handle_keyboard(
    config: Res<TerminalConfig>,
    focus: Res<InputFocus>,
    root: Single<Entity, With<TerminalRoot>>,
    terminal: Res<TerminalWindow>,
    mut keys: MessageReader<KeyboardInput>,
    mut session: ResMut<TerminalSession>,
) {
    let focused = focus.get() == Some(*root) && terminal.is_shown();
    for event in keys.read() {
        if !focused || !event.state.is_pressed() || !session.accepts_input() {
            continue;
        }
        match &event.logical_key {
            Key::Enter => {
                if let Some(url) = session.submit(&config) {
                    match open_url(&url) {
                        Ok(()) => info!("Opened {}", url),
                        Err(e) => error!("{:#}", e),
                    }
                }
            }
            Key::Backspace => {
                session.input.pop();
            }
            Key::Space => session.input.push(' '),
            Key::Character(text) => session
                .input
                .extend(text.chars().filter(|c| !c.is_control())),
            _ => {}
        }
    }
}

/// Launch the system browser.
fn open_url(url: &str) -> Result<()> {
    #[cfg(target_os = "windows")]
    let mut command = {
        let mut command = Command::new("cmd");
        command.args(["/C", "start", "", url]);
        command
    };
    #[cfg(target_os = "macos")]
    let mut command = {
        let mut command = Command::new("open");
        command.arg(url);
        command
    };
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    let mut command = {
        let mut command = Command::new("xdg-open");
        command.arg(url);
        command
    };

    command
        .spawn()
        .with_context(|| format!("Failed to open {url} in the system browser"))?;
    Ok(())
}

/// Full terminal contents: boot log, then the history, then the live prompt.
pub fn compose_screen(session: &TerminalSession, prompt: &str, cursor: bool) -> String {
    let mut screen = session.boot.text().to_string();
    if session.accepts_input() {
        for entry in &session.history {
            screen.push_str(prompt);
            screen.push_str(&entry.input);
            screen.push('\n');
            if !entry.output.is_empty() {
                screen.push_str(&entry.output);
                screen.push('\n');
            }
        }
        screen.push_str(prompt);
        screen.push_str(&session.input);
    }
    if cursor {
        screen.push(CURSOR);
    }
    screen
}

/// Last `max_lines` lines of `text`, keeping the view pinned to the bottom.
pub fn visible_tail(text: &str, max_lines: usize) -> &str {
    text.match_indices('\n')
        .rev()
        .nth(max_lines.max(1) - 1)
        .map_or(text, |(i, _)| &text[i + 1..])
}

pub fn render_terminal_text(
    config: Res<TerminalConfig>,
    session: Res<TerminalSession>,
    terminal: Res<TerminalWindow>,
    focus: Res<InputFocus>,
    windows: Query<&Window, With<PrimaryWindow>>,
    root: Single<Entity, With<TerminalRoot>>,
    mut texts: Query<&mut Text, With<TerminalText>>,
) {
    if !session.is_changed() && !terminal.is_changed() && !focus.is_changed() {
        return;
    }
    let Some(size) = viewport(&windows) else {
        return;
    };

    let rect = terminal.display_rect(size);
    let body = rect.size.y - TITLE_BAR_HEIGHT - 2.0 * CONTENT_PADDING;
    let max_lines = (body / config.line_height).floor().max(1.0) as usize;
    let cursor = session.boot.is_typing() || focus.get() == Some(*root);
    let screen = compose_screen(&session, &config.prompt, cursor);
    let visible = visible_tail(&screen, max_lines);

    for mut text in texts.iter_mut() {
        if text.0 != visible {
            text.0 = visible.to_string();
        }
    }
}

#[allow(clippy::type_complexity)]
pub fn sync_window_layout(
    terminal: Res<TerminalWindow>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut roots: Query<(&mut Node, &mut Visibility, &mut GlobalZIndex), With<TerminalRoot>>,
    mut backdrops: Query<&mut Visibility, (With<TerminalBackdrop>, Without<TerminalRoot>, Without<ReopenButton>)>,
    mut reopen: Query<&mut Visibility, (With<ReopenButton>, Without<TerminalRoot>, Without<TerminalBackdrop>)>,
) {
    if !terminal.is_changed() {
        return;
    }
    let Some(size) = viewport(&windows) else {
        return;
    };
    let rect = terminal.display_rect(size);

    for (mut node, mut visibility, mut z_index) in roots.iter_mut() {
        node.left = Val::Px(rect.position.x);
        node.top = Val::Px(rect.position.y);
        node.width = Val::Px(rect.size.x);
        node.height = Val::Px(rect.size.y);
        *visibility = if terminal.is_shown() {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
        z_index.0 = if terminal.active { 10 } else { 5 };
    }
    for mut visibility in backdrops.iter_mut() {
        *visibility = if terminal.is_shown() && terminal.fullscreen {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
    for mut visibility in reopen.iter_mut() {
        *visibility = if terminal.visible {
            Visibility::Hidden
        } else {
            Visibility::Inherited
        };
    }
}

/// Rebuild the taskbar buttons when the set of minimized windows changes.
pub fn sync_taskbar(
    mut commands: Commands,
    terminal: Res<TerminalWindow>,
    taskbar: Single<(Entity, &mut Visibility), With<Taskbar>>,
    mut shown: Local<Vec<&'static str>>,
) {
    let ids: Vec<&'static str> = terminal.taskbar.iter().map(|e| e.id).collect();
    if *shown == ids {
        return;
    }
    *shown = ids;

    let (entity, mut visibility) = taskbar.into_inner();
    *visibility = if terminal.taskbar.is_empty() {
        Visibility::Hidden
    } else {
        Visibility::Inherited
    };

    commands.entity(entity).despawn_related::<Children>();
    commands.entity(entity).with_children(|bar| {
        bar.spawn((
            Text::new("Try clicking around..."),
            TextFont::from_font_size(12.0),
            TextColor(Color::srgba(1.0, 1.0, 1.0, 0.5)),
        ));
        for entry in &terminal.taskbar {
            bar.spawn((
                Button,
                Node {
                    padding: UiRect::axes(Val::Px(12.0), Val::Px(6.0)),
                    ..default()
                },
                BackgroundColor(Color::srgb(0.2, 0.2, 0.26)),
                TaskbarButton(entry.id),
            ))
            .with_children(|button| {
                button.spawn((
                    Text::new(entry.title),
                    TextFont::from_font_size(13.0),
                    TextColor(Color::WHITE),
                ));
            });
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn ready_session() -> TerminalSession {
        let mut session = TerminalSession::default();
        session.boot.start(Duration::ZERO);
        while !session.boot.prompt_ready() {
            session.boot.tick(Duration::from_millis(16), Duration::from_millis(500));
        }
        session
    }

    #[test]
    fn test_no_prompt_while_booting() {
        let mut session = TerminalSession::default();
        session.boot.start(Duration::ZERO);
        session.input = "help".to_string();
        let screen = compose_screen(&session, "ilan@portfolio> ", true);
        assert_eq!(screen, "█");
    }

    #[test]
    fn test_screen_shows_history_and_prompt() {
        let config = TerminalConfig::default();
        let mut session = ready_session();
        session.input = "whoami".to_string();
        session.submit(&config);
        session.input = "da".to_string();

        let screen = compose_screen(&session, &config.prompt, false);
        assert!(screen.ends_with("ilan@portfolio> whoami\nilan@portfolio\nilan@portfolio> da"));
        assert!(screen.starts_with("> Loading professional experience...\n"));
    }

    #[test]
    fn test_visible_tail() {
        assert_eq!(visible_tail("a\nb\nc", 2), "b\nc");
        assert_eq!(visible_tail("a\nb\nc", 3), "a\nb\nc");
        assert_eq!(visible_tail("a\nb\nc", 10), "a\nb\nc");
        assert_eq!(visible_tail("a\nb\nc", 0), "c");
    }
}
