//! Messages exchanged between the globe and the rest of the page

use bevy::prelude::*;

use crate::core::coordinates::GeoPoint;

/// Ask the globe to fly to a coordinate and pin it
#[derive(Message, Clone, Debug, PartialEq)]
pub struct FocusLocation {
    pub label: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Drop the current focus and resume idle spinning
#[derive(Message, Clone, Copy, Debug, Default)]
pub struct ClearLocation;

/// Coordinate currently facing the viewer, sent every frame
#[derive(Message, Clone, Copy, Debug, PartialEq)]
pub struct CoordinateUpdated {
    pub lat: f64,
    pub long: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FocusedLocation {
    pub label: String,
    pub point: GeoPoint,
}

/// Sent when the focused location is set or cleared
#[derive(Message, Clone, Debug, PartialEq)]
pub struct LocationUpdated(pub Option<FocusedLocation>);
