//! Transient surface waves spreading from a touched point

use bevy::prelude::*;
use std::collections::VecDeque;

/// Angular frequency of the wave crest
const WAVE_FREQUENCY: f32 = 10.0;
/// Radians of arc the wave front travels per second
const WAVE_SPEED: f32 = 2.5;
/// Falloff of the wave envelope around the front
const WAVE_FALLOFF: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ripple {
    /// Unit direction of the origin in globe-local space
    pub origin: Vec3,
    /// Seconds since startup
    pub created_at: f64,
    pub strength: f32,
}

/// Radial offset contributed by a single ripple.
///
/// `theta` is the angle between the vertex direction and the ripple origin,
/// `age` the ripple's age in seconds.
pub fn ripple_amplitude(theta: f32, age: f32, strength: f32, intensity: f32, lifetime: f32) -> f32 {
    if !(0.0..=lifetime).contains(&age) {
        return 0.0;
    }
    let offset = theta - WAVE_SPEED * age;
    (offset * WAVE_FREQUENCY).sin()
        * (-offset.abs() * WAVE_FALLOFF).exp()
        * (-age).exp()
        * strength
        * intensity
}

#[derive(Resource, Debug, Clone)]
pub struct RippleField {
    ripples: VecDeque<Ripple>,
    /// Cleared after a press creates a ripple, set again on release
    armed: bool,
}

impl Default for RippleField {
    fn default() -> Self {
        Self {
            ripples: VecDeque::new(),
            armed: true,
        }
    }
}

impl RippleField {
    pub fn is_empty(&self) -> bool {
        self.ripples.is_empty()
    }

    /// Append a ripple, evicting the oldest past `capacity`.
    pub fn create(&mut self, origin: Vec3, now: f64, strength: f32, capacity: usize) {
        let origin = origin.try_normalize().unwrap_or(Vec3::Z);
        self.ripples.push_back(Ripple {
            origin,
            created_at: now,
            strength,
        });
        while self.ripples.len() > capacity {
            self.ripples.pop_front();
        }
    }

    /// Create a ripple for a press, at most once per press/release cycle.
    pub fn request(&mut self, origin: Vec3, now: f64, strength: f32, capacity: usize) -> bool {
        if !self.armed {
            return false;
        }
        self.create(origin, now, strength, capacity);
        self.armed = false;
        true
    }

    pub fn rearm(&mut self) {
        self.armed = true;
    }

    /// Drop ripples older than `lifetime`. Returns true when this emptied the field.
    pub fn prune(&mut self, now: f64, lifetime: f64) -> bool {
        let before = self.ripples.len();
        self.ripples.retain(|r| now - r.created_at <= lifetime);
        before > 0 && self.ripples.is_empty()
    }

    /// Summed radial offset for a unit `direction` at time `now`
    pub fn displacement(&self, direction: Vec3, now: f64, intensity: f32, lifetime: f32) -> f32 {
        self.ripples
            .iter()
            .map(|r| {
                let age = (now - r.created_at) as f32;
                let theta = direction.angle_between(r.origin);
                ripple_amplitude(theta, age, r.strength, intensity, lifetime)
            })
            .sum()
    }
}

/// Recompute displaced positions from immutable base positions.
///
/// Each vertex moves along its own direction by the summed ripple offset, so
/// shells and raised outlines keep their own base radius.
pub fn displace_positions(
    base: &[Vec3],
    field: &RippleField,
    now: f64,
    intensity: f32,
    lifetime: f32,
    out: &mut Vec<[f32; 3]>,
) {
    out.clear();
    if field.is_empty() {
        out.extend(base.iter().map(|p| p.to_array()));
        return;
    }
    out.extend(base.iter().map(|&p| {
        let radius = p.length();
        if radius <= f32::EPSILON {
            return p.to_array();
        }
        let dir = p / radius;
        (dir * (radius + field.displacement(dir, now, intensity, lifetime))).to_array()
    }));
}
