//! Flat equirectangular map of the loaded outline points
//!
//! Sits in the bottom-right corner on wide viewports and shows the same
//! boundary data the globe draws, plus a running point count.

use bevy::picking::Pickable;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::geography::{GeographyState, OutlineSet};
use crate::ui::PANEL_BACKGROUND;

/// The panel is hidden below this viewport width.
pub const MIN_VIEWPORT_WIDTH: f32 = 768.0;

const MAP_WIDTH: f32 = 360.0;
const MAP_HEIGHT: f32 = 256.0;
const PLOT_BACKGROUND: Color = Color::srgba(0.345, 0.11, 0.529, 0.2);
const GRID_COLOR: Color = Color::srgba(1.0, 1.0, 1.0, 0.1);
const DOT_COLOR: Color = Color::srgba(1.0, 1.0, 1.0, 0.7);

#[derive(Component)]
pub struct DataMapPanel;

/// Parent of the point dots; cleared and refilled when the outlines change
#[derive(Component)]
pub struct DataMapPlot;

#[derive(Component)]
pub struct DataMapOverlay;

#[derive(Component)]
pub struct DataMapCounter;

/// Position of a coordinate on the map, in percent from the top-left corner.
pub fn map_percent(latitude: f64, longitude: f64) -> Vec2 {
    Vec2::new(
        ((longitude + 180.0) / 360.0 * 100.0) as f32,
        ((90.0 - latitude) / 180.0 * 100.0) as f32,
    )
}

pub fn point_count(outlines: &OutlineSet) -> usize {
    outlines.paths.iter().map(|p| p.points.len()).sum()
}

/// Centered message shown while the plot has nothing to draw.
pub fn overlay_message(state: &GeographyState, points: usize) -> Option<String> {
    if points > 0 {
        return None;
    }
    if state.loading || !state.requested {
        return Some("Loading data...".to_string());
    }
    Some(match &state.error {
        Some(error) => format!("Data unavailable: {error}"),
        None => "No outline data".to_string(),
    })
}

pub fn visible_at(viewport_width: f32) -> bool {
    viewport_width >= MIN_VIEWPORT_WIDTH
}

fn label(text: &'static str) -> impl Bundle {
    (
        Node {
            padding: UiRect::axes(Val::Px(4.0), Val::Px(1.0)),
            ..default()
        },
        BackgroundColor(PANEL_BACKGROUND),
        children![(
            Text::new(text),
            TextFont::from_font_size(10.0),
            TextColor(Color::WHITE),
        )],
    )
}

pub fn spawn_data_map(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(32.0),
                right: Val::Px(32.0),
                width: Val::Px(MAP_WIDTH),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(8.0),
                ..default()
            },
            Pickable::IGNORE,
            DataMapPanel,
            Name::new("Data Map"),
        ))
        .with_children(|panel| {
            panel.spawn((
                Text::new("Geographic Data Visualization"),
                TextFont::from_font_size(16.0),
                TextColor(Color::WHITE),
            ));
            panel
                .spawn((
                    Node {
                        width: Val::Px(MAP_WIDTH),
                        height: Val::Px(MAP_HEIGHT),
                        overflow: Overflow::clip(),
                        ..default()
                    },
                    BackgroundColor(PLOT_BACKGROUND),
                ))
                .with_children(|frame| {
                    for i in 0..=6 {
                        frame.spawn((
                            Node {
                                position_type: PositionType::Absolute,
                                left: Val::Percent(i as f32 * 100.0 / 6.0),
                                width: Val::Px(1.0),
                                height: Val::Percent(100.0),
                                ..default()
                            },
                            BackgroundColor(GRID_COLOR),
                        ));
                    }
                    for i in 0..=4 {
                        frame.spawn((
                            Node {
                                position_type: PositionType::Absolute,
                                top: Val::Percent(i as f32 * 25.0),
                                width: Val::Percent(100.0),
                                height: Val::Px(1.0),
                                ..default()
                            },
                            BackgroundColor(GRID_COLOR),
                        ));
                    }

                    frame.spawn((
                        Node {
                            position_type: PositionType::Absolute,
                            width: Val::Percent(100.0),
                            height: Val::Percent(100.0),
                            ..default()
                        },
                        DataMapPlot,
                    ));

                    frame.spawn((
                        Node {
                            position_type: PositionType::Absolute,
                            left: Val::Px(8.0),
                            top: Val::Px(4.0),
                            bottom: Val::Px(4.0),
                            flex_direction: FlexDirection::Column,
                            justify_content: JustifyContent::SpaceBetween,
                            ..default()
                        },
                        children![label("90°N"), label("0°"), label("90°S")],
                    ));
                    frame.spawn((
                        Node {
                            position_type: PositionType::Absolute,
                            left: Val::Px(40.0),
                            right: Val::Px(8.0),
                            bottom: Val::Px(4.0),
                            justify_content: JustifyContent::SpaceBetween,
                            ..default()
                        },
                        children![label("180°W"), label("0°"), label("180°E")],
                    ));

                    frame.spawn((
                        Node {
                            position_type: PositionType::Absolute,
                            width: Val::Percent(100.0),
                            height: Val::Percent(100.0),
                            justify_content: JustifyContent::Center,
                            align_items: AlignItems::Center,
                            ..default()
                        },
                        children![(
                            Text::new("Loading data..."),
                            TextFont::from_font_size(14.0),
                            TextColor(Color::WHITE),
                            DataMapOverlay,
                        )],
                    ));
                });
            panel.spawn((
                Text::new("Points: 0"),
                TextFont::from_font_size(12.0),
                TextColor(Color::srgba(1.0, 1.0, 1.0, 0.7)),
                DataMapCounter,
            ));
        });
}

/// Redraw the dots whenever a new outline set lands.
pub fn rebuild_data_map(
    mut commands: Commands,
    outlines: Res<OutlineSet>,
    plot: Single<Entity, With<DataMapPlot>>,
    mut drawn: Local<Option<u64>>,
) {
    if *drawn == Some(outlines.revision) {
        return;
    }
    *drawn = Some(outlines.revision);

    let plot = *plot;
    commands.entity(plot).despawn_related::<Children>();
    commands.entity(plot).with_children(|plot| {
        for point in outlines.paths.iter().flat_map(|p| p.points.iter()) {
            let at = map_percent(point.latitude(), point.longitude());
            plot.spawn((
                Node {
                    position_type: PositionType::Absolute,
                    left: Val::Percent(at.x),
                    top: Val::Percent(at.y),
                    width: Val::Px(1.0),
                    height: Val::Px(1.0),
                    ..default()
                },
                BackgroundColor(DOT_COLOR),
            ));
        }
    });
    debug!("[UI] data map redrawn with {} points", point_count(&outlines));
}

pub fn update_data_map_status(
    state: Res<GeographyState>,
    outlines: Res<OutlineSet>,
    overlay: Single<(&mut Text, &mut Visibility), With<DataMapOverlay>>,
    mut counter: Single<&mut Text, (With<DataMapCounter>, Without<DataMapOverlay>)>,
) {
    if !state.is_changed() && !outlines.is_changed() {
        return;
    }
    let points = point_count(&outlines);
    let (mut text, mut visibility) = overlay.into_inner();
    match overlay_message(&state, points) {
        Some(message) => {
            text.0 = message;
            *visibility = Visibility::Inherited;
        }
        None => *visibility = Visibility::Hidden,
    }
    counter.0 = format!("Points: {points}");
}

pub fn fit_data_map_to_window(
    windows: Query<&Window, (With<PrimaryWindow>, Changed<Window>)>,
    mut panel: Single<&mut Visibility, With<DataMapPanel>>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let wanted = if visible_at(window.width()) {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    };
    if **panel != wanted {
        **panel = wanted;
    }
}
