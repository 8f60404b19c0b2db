//! Globe configuration

use bevy::prelude::*;
use std::time::Duration;

/// Tuning for the globe rotation controller, ripples and look
#[derive(Resource, Clone, Debug)]
pub struct GlobeConfig {
    /// Radians of rotation per pixel of pointer movement
    pub drag_sensitivity: f64,
    /// Fraction of the last applied drag delta kept as momentum
    pub momentum_factor: f64,
    /// Per-frame momentum multiplier while coasting
    pub momentum_decay: f64,
    /// Momentum below this (per axis) counts as stopped
    pub momentum_threshold: f64,
    /// Per-frame lerp factor toward a fly-to target
    pub fly_factor: f64,
    /// Per-frame lerp factor of pitch toward the equator while idle
    pub equator_factor: f64,
    /// Pitch snaps to zero once within this distance of the equator
    pub equator_snap: f64,
    /// Idle spin, in degrees per frame
    pub autorotate_deg_per_frame: f64,
    pub idle_delay: Duration,
    /// Window after clearing a location during which idle re-arming is suppressed
    pub unfreeze_window: Duration,
    /// Pointer travel (px) before a press turns into a drag
    pub drag_threshold_px: f32,

    pub ripple_strength: f32,
    pub ripple_capacity: usize,
    pub ripple_lifetime_secs: f64,
    pub shell_ripple_intensity: f32,
    pub outline_ripple_intensity: f32,

    pub globe_scale: f32,
    pub hover_scale: f32,
    /// Exponential approach rate (1/s) for the hover glow
    pub hover_response: f32,
    pub shell_color: Color,
    pub shell_hover_color: Color,
    pub shell_emissive: f32,
    pub shell_hover_emissive: f32,
    pub shell_segments: u32,
    pub outline_color: Color,
    pub marker_color: Color,
    /// Lift outlines by their per-path elevation instead of a flat radius
    pub outline_relief: bool,

    pub camera_distance: f32,
    /// Camera pulls back on viewports narrower than `narrow_width_px`
    pub camera_distance_narrow: f32,
    pub narrow_width_px: f32,
    pub camera_fov_deg: f32,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            drag_sensitivity: 0.005,
            momentum_factor: 0.1,
            momentum_decay: 0.98,
            momentum_threshold: 0.001,
            fly_factor: 0.05,
            equator_factor: 0.005,
            equator_snap: 0.001,
            autorotate_deg_per_frame: 0.1,
            idle_delay: Duration::from_secs(3),
            unfreeze_window: Duration::from_secs(1),
            drag_threshold_px: 3.0,

            ripple_strength: 0.9,
            ripple_capacity: 5,
            ripple_lifetime_secs: 1.5,
            shell_ripple_intensity: 0.015,
            outline_ripple_intensity: 0.025,

            globe_scale: 0.75,
            hover_scale: 1.02,
            hover_response: 12.0,
            shell_color: Color::srgb_u8(0xA8, 0x55, 0xF7),
            shell_hover_color: Color::srgb_u8(0xB3, 0x66, 0xF8),
            shell_emissive: 0.4,
            shell_hover_emissive: 0.6,
            shell_segments: 64,
            outline_color: Color::srgba(0.8, 0.8, 0.8, 0.7),
            marker_color: Color::srgb_u8(0xEF, 0x44, 0x44),
            outline_relief: false,

            camera_distance: 3.2,
            camera_distance_narrow: 4.0,
            narrow_width_px: 768.0,
            camera_fov_deg: 40.0,
        }
    }
}

impl GlobeConfig {
    pub fn camera_distance_for(&self, viewport_width: f32) -> f32 {
        if viewport_width < self.narrow_width_px {
            self.camera_distance_narrow
        } else {
            self.camera_distance
        }
    }
}
