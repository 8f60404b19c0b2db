//! Press/drag tracking for mouse and single-finger touch

use bevy::prelude::*;

/// Tracks one press/release cycle on the globe.
///
/// A press only turns into a drag once the pointer has travelled more than
/// the threshold away from where it went down.
#[derive(Resource, Debug, Default, Clone)]
pub struct PointerGesture {
    press: Option<Vec2>,
    last: Vec2,
    active: bool,
    touch_id: Option<u64>,
}

impl PointerGesture {
    pub fn press(&mut self, position: Vec2) {
        self.press = Some(position);
        self.last = position;
        self.active = false;
    }

    pub fn press_touch(&mut self, id: u64, position: Vec2) {
        self.press(position);
        self.touch_id = Some(id);
    }

    pub fn touch_id(&self) -> Option<u64> {
        self.touch_id
    }

    pub fn is_pressed(&self) -> bool {
        self.press.is_some()
    }

    /// Feed a pointer position. Returns the delta to apply once the drag is active.
    pub fn motion(&mut self, position: Vec2, threshold: f32) -> Option<Vec2> {
        let start = self.press?;
        if !self.active && position.distance(start) > threshold {
            self.active = true;
        }
        if !self.active {
            return None;
        }
        let delta = position - self.last;
        self.last = position;
        Some(delta)
    }

    /// End the cycle; returns whether it had become a drag.
    pub fn release(&mut self) -> bool {
        let was_dragging = self.active;
        self.press = None;
        self.active = false;
        self.touch_id = None;
        was_dragging
    }
}
