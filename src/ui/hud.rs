//! Coordinate readout and focused-location card

use bevy::picking::Pickable;
use bevy::prelude::*;

use crate::core::coordinates::format_coordinates;
use crate::globe::{CoordinateUpdated, LocationUpdated};
use crate::ui::PANEL_BACKGROUND;

#[derive(Component)]
pub struct PositionReadout;

#[derive(Component)]
pub struct LocationCard;

#[derive(Component)]
pub struct LocationCardTitle;

#[derive(Component)]
pub struct LocationCardCoordinates;

const LABEL_COLOR: Color = Color::srgb(0.914, 0.835, 1.0);

pub fn spawn_hud(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(32.0),
                left: Val::Px(32.0),
                padding: UiRect::axes(Val::Px(16.0), Val::Px(8.0)),
                flex_direction: FlexDirection::Column,
                ..default()
            },
            BackgroundColor(PANEL_BACKGROUND),
            Name::new("Position Readout"),
        ))
        .with_children(|panel| {
            panel.spawn((
                Text::new("Current Position:"),
                TextFont::from_font_size(14.0),
                TextColor(LABEL_COLOR),
            ));
            panel.spawn((
                Text::new(format_coordinates(0.0, 0.0)),
                TextFont::from_font_size(14.0),
                TextColor(LABEL_COLOR),
                PositionReadout,
            ));
        });

    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(32.0),
                width: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                ..default()
            },
            Pickable::IGNORE,
            Name::new("Location Card Row"),
        ))
        .with_children(|row| {
            row.spawn((
                Node {
                    padding: UiRect::axes(Val::Px(16.0), Val::Px(8.0)),
                    flex_direction: FlexDirection::Column,
                    align_items: AlignItems::Center,
                    ..default()
                },
                BackgroundColor(PANEL_BACKGROUND),
                Visibility::Hidden,
                LocationCard,
            ))
            .with_children(|card| {
                card.spawn((
                    Text::new(""),
                    TextFont::from_font_size(20.0),
                    TextColor(Color::WHITE),
                    LocationCardTitle,
                ));
                card.spawn((
                    Text::new(""),
                    TextFont::from_font_size(14.0),
                    TextColor(LABEL_COLOR),
                    LocationCardCoordinates,
                ));
            });
        });
}

pub fn update_position_readout(
    mut updates: MessageReader<CoordinateUpdated>,
    mut readouts: Query<&mut Text, With<PositionReadout>>,
) {
    let Some(latest) = updates.read().last() else {
        return;
    };
    let formatted = format_coordinates(latest.lat, latest.long);
    for mut text in readouts.iter_mut() {
        if text.0 != formatted {
            text.0 = formatted.clone();
        }
    }
}

#[allow(clippy::type_complexity)]
pub fn update_location_card(
    mut updates: MessageReader<LocationUpdated>,
    mut cards: Query<&mut Visibility, With<LocationCard>>,
    mut titles: Query<&mut Text, (With<LocationCardTitle>, Without<LocationCardCoordinates>)>,
    mut coords: Query<&mut Text, (With<LocationCardCoordinates>, Without<LocationCardTitle>)>,
) {
    let Some(LocationUpdated(latest)) = updates.read().last() else {
        return;
    };

    for mut visibility in cards.iter_mut() {
        *visibility = if latest.is_some() {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }

    if let Some(location) = latest {
        for mut text in titles.iter_mut() {
            text.0 = location.label.clone();
        }
        for mut text in coords.iter_mut() {
            text.0 = format_coordinates(location.point.latitude(), location.point.longitude());
        }
    }
}
