//! Studies timeline
//!
//! Each entry is pinned to the city it took place in. Selecting an entry flies
//! the globe there; selecting the active entry again clears the focus.

use bevy::prelude::*;

use crate::globe::{ClearLocation, FocusLocation};
use crate::ui::PANEL_BACKGROUND;

#[derive(Debug, Clone, PartialEq)]
pub struct StudyEntry {
    pub degree: &'static str,
    pub school: &'static str,
    pub years: &'static str,
    pub description: &'static str,
    pub status: &'static str,
    pub city: &'static str,
    pub latitude: f64,
    pub longitude: f64,
}

pub const TIMELINE_HEADING: &str = "Academic Journey";

pub const STUDIES: [StudyEntry; 3] = [
    StudyEntry {
        degree: "Bachelor of Coding and Digital Innovation",
        school: "Institute of Internet & Multimedia",
        years: "2023-2026",
        description: "Advanced web technologies and modern development practices",
        status: "Current",
        city: "Paris",
        latitude: 48.8566,
        longitude: 2.3522,
    },
    StudyEntry {
        degree: "Scientific Baccalaureate with Highest Honors",
        school: "Lycée Français Vauban du Luxembourg",
        years: "2018-2022",
        description: "Specialization in Mathematics and Physics-Chemistry",
        status: "Completed",
        city: "Luxembourg",
        latitude: 49.6116,
        longitude: 6.1319,
    },
    StudyEntry {
        degree: "Middle School Education",
        school: "New York City Middle School",
        years: "2014-2018",
        description: "Foundation in STEM subjects with honors",
        status: "Completed",
        city: "New York",
        latitude: 40.7128,
        longitude: -74.006,
    },
];

#[derive(Debug, Clone, PartialEq)]
pub enum TimelineAction {
    Focus(FocusLocation),
    Clear,
}

/// Which entry (by index into [`STUDIES`]) is selected
#[derive(Resource, Debug, Default)]
pub struct Timeline {
    pub active: Option<usize>,
}

impl Timeline {
    pub fn select(&mut self, index: usize) -> Option<TimelineAction> {
        let entry = STUDIES.get(index)?;
        if self.active == Some(index) {
            self.active = None;
            return Some(TimelineAction::Clear);
        }
        self.active = Some(index);
        Some(TimelineAction::Focus(FocusLocation {
            label: entry.city.to_string(),
            latitude: entry.latitude,
            longitude: entry.longitude,
        }))
    }
}

#[derive(Component)]
pub struct TimelineButton(pub usize);

const ACTIVE_BACKGROUND: Color = Color::srgba(0.494, 0.133, 0.808, 0.9);
const HOVER_BACKGROUND: Color = Color::srgba(0.42, 0.13, 0.66, 0.85);
const CURRENT_BADGE: Color = Color::srgb(0.29, 0.87, 0.5);
const COMPLETED_BADGE: Color = Color::srgb(0.75, 0.52, 0.99);

pub fn spawn_timeline(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(120.0),
                left: Val::Px(32.0),
                width: Val::Px(340.0),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(12.0),
                ..default()
            },
            Name::new("Studies Timeline"),
        ))
        .with_children(|column| {
            column.spawn((
                Text::new(TIMELINE_HEADING),
                TextFont::from_font_size(22.0),
                TextColor(Color::WHITE),
            ));
            for (index, entry) in STUDIES.iter().enumerate() {
                let badge = if entry.status == "Current" {
                    CURRENT_BADGE
                } else {
                    COMPLETED_BADGE
                };
                column
                    .spawn((
                        Button,
                        Node {
                            flex_direction: FlexDirection::Column,
                            padding: UiRect::all(Val::Px(12.0)),
                            row_gap: Val::Px(4.0),
                            ..default()
                        },
                        BackgroundColor(PANEL_BACKGROUND),
                        TimelineButton(index),
                    ))
                    .with_children(|card| {
                        card.spawn((
                            Text::new(format!("{}  ·  {}", entry.years, entry.status)),
                            TextFont::from_font_size(12.0),
                            TextColor(badge),
                        ));
                        card.spawn((
                            Text::new(entry.degree),
                            TextFont::from_font_size(16.0),
                            TextColor(Color::WHITE),
                        ));
                        card.spawn((
                            Text::new(entry.school),
                            TextFont::from_font_size(13.0),
                            TextColor(Color::srgb(0.85, 0.78, 0.98)),
                        ));
                        card.spawn((
                            Text::new(entry.description),
                            TextFont::from_font_size(12.0),
                            TextColor(Color::srgba(1.0, 1.0, 1.0, 0.6)),
                        ));
                    });
            }
        });
}

pub fn handle_timeline_buttons(
    mut timeline: ResMut<Timeline>,
    buttons: Query<(&Interaction, &TimelineButton), Changed<Interaction>>,
    mut focus: MessageWriter<FocusLocation>,
    mut clear: MessageWriter<ClearLocation>,
) {
    for (interaction, button) in buttons.iter() {
        if *interaction != Interaction::Pressed {
            continue;
        }
        match timeline.select(button.0) {
            Some(TimelineAction::Focus(request)) => {
                focus.write(request);
            }
            Some(TimelineAction::Clear) => {
                clear.write(ClearLocation);
            }
            None => {}
        }
    }
}

pub fn style_timeline_buttons(
    timeline: Res<Timeline>,
    mut buttons: Query<(&Interaction, &TimelineButton, &mut BackgroundColor)>,
) {
    for (interaction, button, mut background) in buttons.iter_mut() {
        let color = if timeline.active == Some(button.0) {
            ACTIVE_BACKGROUND
        } else if *interaction == Interaction::Hovered {
            HOVER_BACKGROUND
        } else {
            PANEL_BACKGROUND
        };
        if background.0 != color {
            background.0 = color;
        }
    }
}
