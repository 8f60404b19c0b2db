//! Rotation/interaction controller
//!
//! Owns the globe orientation and decides, once per frame, which of the
//! competing behaviours moves it: an active drag, a fly-to animation, idle
//! auto-rotation or leftover drag momentum. The controller is plain data so it
//! can be stepped directly in tests; the Bevy systems only feed it input and
//! copy its rotation onto the globe transform.

use bevy::math::{DQuat, EulerRot};
use bevy::prelude::*;
use std::f64::consts::{FRAC_PI_2, TAU};
use std::time::Duration;

use crate::core::coordinates::{CoordError, GeoPoint, rotation_for, unproject, wrap_angle};
use crate::globe::config::GlobeConfig;
use crate::globe::messages::FocusedLocation;

/// Which behaviour drove the rotation on the last step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    Dragging,
    FlyingToTarget,
    #[default]
    IdleAutorotating,
    MomentumCoasting,
    Settled,
}

/// Per-frame angular velocity left over from a drag (radians/frame)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AngularMomentum {
    pub pitch: f64,
    pub yaw: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetRotation {
    pub pitch: f64,
    pub yaw: f64,
}

/// Globe orientation. Pitch stays in [-π/2, π/2], yaw in (-2π, 2π).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RotationState {
    pub pitch: f64,
    pub yaw: f64,
    pub momentum: AngularMomentum,
    pub target: Option<TargetRotation>,
    pub mode: InteractionMode,
}

impl RotationState {
    /// Rotation applied to the globe (pitch about X, then yaw about Y)
    pub fn rotation(&self) -> Quat {
        DQuat::from_euler(EulerRot::XYZ, self.pitch, self.yaw, 0.0).as_quat()
    }

    /// Coordinate facing the camera as `(lat, long)` in degrees
    pub fn facing(&self) -> (f64, f64) {
        unproject(self.pitch, self.yaw)
    }
}

#[derive(Resource, Debug, Clone)]
pub struct RotationController {
    pub state: RotationState,
    dragging: bool,
    flying: bool,
    idle: bool,
    /// Set for the unfreeze window after a location is cleared
    transitioning: bool,
    idle_timer: Option<Duration>,
    unfreeze_timer: Option<Duration>,
    focused: Option<FocusedLocation>,
}

impl Default for RotationController {
    fn default() -> Self {
        Self {
            state: RotationState::default(),
            dragging: false,
            flying: false,
            idle: true,
            transitioning: false,
            idle_timer: None,
            unfreeze_timer: None,
            focused: None,
        }
    }
}

impl RotationController {
    pub fn has_momentum(&self, config: &GlobeConfig) -> bool {
        self.state.momentum.pitch.abs() > config.momentum_threshold
            || self.state.momentum.yaw.abs() > config.momentum_threshold
    }

    /// Pointer went down on the globe: any flight is cancelled.
    pub fn press(&mut self, config: &GlobeConfig) {
        self.state.target = None;
        self.flying = false;
        self.reset_idle_timer(config);
    }

    /// Apply a pointer delta (px) from an active drag.
    pub fn drag_by(&mut self, delta: Vec2, config: &GlobeConfig) {
        self.dragging = true;
        let d_yaw = delta.x as f64 * config.drag_sensitivity;
        let d_pitch = delta.y as f64 * config.drag_sensitivity;

        self.state.yaw = (self.state.yaw + d_yaw) % TAU;
        self.state.pitch = (self.state.pitch + d_pitch).clamp(-FRAC_PI_2, FRAC_PI_2);
        self.state.momentum = AngularMomentum {
            pitch: d_pitch * config.momentum_factor,
            yaw: d_yaw * config.momentum_factor,
        };
    }

    /// Pointer released; momentum from the last drag delta keeps the globe spinning.
    pub fn release(&mut self) {
        self.dragging = false;
    }

    /// Turn toward a location and pin it.
    ///
    /// Returns `Ok(None)` when the request is ignored because a drag is in progress.
    pub fn focus(
        &mut self,
        label: &str,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<FocusedLocation>, CoordError> {
        if self.dragging {
            return Ok(None);
        }
        let point = GeoPoint::new(latitude, longitude)?;
        let (pitch, yaw) = rotation_for(&point);

        self.state.target = Some(TargetRotation { pitch, yaw });
        self.flying = true;
        self.idle = false;

        let location = FocusedLocation {
            label: label.to_string(),
            point,
        };
        self.focused = Some(location.clone());
        Ok(Some(location))
    }

    /// Drop the focus and spin immediately; the normal idle timer resumes after the unfreeze window.
    pub fn clear(&mut self, config: &GlobeConfig) {
        self.focused = None;
        self.flying = false;
        self.state.target = None;
        self.idle = true;
        self.transitioning = true;
        self.unfreeze_timer = Some(config.unfreeze_window);
    }

    /// Re-arm the single-shot idle timer, replacing any pending one.
    pub fn reset_idle_timer(&mut self, config: &GlobeConfig) {
        self.idle_timer = None;
        if !self.transitioning {
            self.idle = false;
            self.idle_timer = Some(config.idle_delay);
        }
    }

    fn tick_timers(&mut self, dt: Duration, config: &GlobeConfig) {
        if let Some(remaining) = self.idle_timer {
            let remaining = remaining.saturating_sub(dt);
            if remaining.is_zero() {
                self.idle_timer = None;
                if !self.dragging && !self.flying && !self.has_momentum(config) {
                    self.idle = true;
                }
            } else {
                self.idle_timer = Some(remaining);
            }
        }

        if let Some(remaining) = self.unfreeze_timer {
            let remaining = remaining.saturating_sub(dt);
            if remaining.is_zero() {
                self.unfreeze_timer = None;
                self.transitioning = false;
                self.reset_idle_timer(config);
            } else {
                self.unfreeze_timer = Some(remaining);
            }
        }
    }

    /// Advance one frame and return the facing `(lat, long)`.
    pub fn step(&mut self, dt: Duration, config: &GlobeConfig) -> (f64, f64) {
        self.tick_timers(dt, config);

        let mode = if self.dragging {
            self.reset_idle_timer(config);
            self.state.pitch = self.state.pitch.clamp(-FRAC_PI_2, FRAC_PI_2);
            InteractionMode::Dragging
        } else if self.flying
            && let Some(target) = self.state.target
        {
            self.reset_idle_timer(config);
            let delta_yaw = wrap_angle(target.yaw % TAU - self.state.yaw);
            self.state.pitch += (target.pitch - self.state.pitch) * config.fly_factor;
            self.state.yaw += delta_yaw * config.fly_factor;
            InteractionMode::FlyingToTarget
        } else if self.idle && !self.has_momentum(config) {
            self.state.yaw += config.autorotate_deg_per_frame.to_radians();
            if self.state.pitch.abs() > config.equator_snap {
                self.state.pitch -= self.state.pitch * config.equator_factor;
            } else {
                self.state.pitch = 0.0;
            }
            InteractionMode::IdleAutorotating
        } else if self.has_momentum(config) {
            let momentum = self.state.momentum;
            self.state.pitch = (self.state.pitch + momentum.pitch).clamp(-FRAC_PI_2, FRAC_PI_2);
            self.state.yaw += momentum.yaw;
            self.state.momentum.pitch *= config.momentum_decay;
            self.state.momentum.yaw *= config.momentum_decay;
            if !self.has_momentum(config) {
                self.reset_idle_timer(config);
            }
            InteractionMode::MomentumCoasting
        } else {
            InteractionMode::Settled
        };

        self.state.yaw %= TAU;
        self.state.mode = mode;
        self.state.facing()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    fn drag(controller: &mut RotationController, config: &GlobeConfig, delta: Vec2) {
        controller.press(config);
        controller.drag_by(delta, config);
        controller.release();
    }

    #[test]
    fn test_starts_idle_and_spins() {
        let config = GlobeConfig::default();
        let mut controller = RotationController::default();
        controller.step(FRAME, &config);
        assert_eq!(controller.state.mode, InteractionMode::IdleAutorotating);
        assert!((controller.state.yaw - 0.1_f64.to_radians()).abs() < 1e-12);
    }

    #[test]
    fn test_pitch_clamped_after_any_drag() {
        let config = GlobeConfig::default();
        let mut controller = RotationController::default();
        controller.press(&config);
        let deltas = [
            Vec2::new(10.0, 900.0),
            Vec2::new(-3000.0, 4000.0),
            Vec2::new(5.0, -12000.0),
            Vec2::new(0.0, -1.0),
            Vec2::new(777.0, 313.0),
        ];
        for delta in deltas {
            controller.drag_by(delta, &config);
            assert!(controller.state.pitch.abs() <= FRAC_PI_2);
            controller.step(FRAME, &config);
            assert!(controller.state.pitch.abs() <= FRAC_PI_2);
            assert_eq!(controller.state.mode, InteractionMode::Dragging);
        }
    }

    #[test]
    fn test_yaw_stays_bounded() {
        let config = GlobeConfig::default();
        let mut controller = RotationController::default();
        for i in 0..20_000 {
            if i % 5000 == 0 {
                drag(&mut controller, &config, Vec2::new(-2500.0, 0.0));
            }
            controller.step(FRAME, &config);
            assert!(controller.state.yaw.abs() < TAU);
        }
    }

    #[test]
    fn test_fly_to_paris_converges() {
        let config = GlobeConfig::default();
        let mut controller = RotationController::default();
        let focused = controller.focus("Paris", 48.8566, 2.3522).unwrap();
        assert_eq!(focused.map(|f| f.label), Some("Paris".to_string()));

        let mut facing = (0.0, 0.0);
        for _ in 0..600 {
            facing = controller.step(FRAME, &config);
        }
        assert_eq!(controller.state.mode, InteractionMode::FlyingToTarget);
        assert!((facing.0 - 48.8566).abs() < 0.5, "lat {}", facing.0);
        assert!((facing.1 - 2.3522).abs() < 0.5, "long {}", facing.1);
    }

    #[test]
    fn test_fly_takes_shortest_path() {
        let config = GlobeConfig::default();
        let mut controller = RotationController::default();
        // Facing long = 170 means yaw = -260°; target long = -170 is only 20° away.
        controller.state.yaw = (-260.0_f64).to_radians();
        controller.focus("Fiji", -17.0, -170.0).unwrap();
        let before = controller.state.yaw;
        controller.step(FRAME, &config);
        let moved = (controller.state.yaw - before).abs();
        assert!(moved < 20.0_f64.to_radians() * config.fly_factor + 1e-9);
    }

    #[test]
    fn test_momentum_decays_then_idle_resumes() {
        let config = GlobeConfig::default();
        let mut controller = RotationController::default();
        // 100 px * 0.005 * 0.1 = 0.05 rad/frame of yaw momentum
        drag(&mut controller, &config, Vec2::new(100.0, 0.0));
        assert!((controller.state.momentum.yaw - 0.05).abs() < 1e-12);

        let bound = ((0.001_f64 / 0.05).ln() / 0.98_f64.ln()).ceil() as usize;
        let mut frames = 0;
        while controller.has_momentum(&config) {
            controller.step(Duration::from_millis(100), &config);
            frames += 1;
            assert!(frames <= bound, "momentum still alive after {} frames", frames);
        }

        // Idle timer was re-armed when the momentum died
        for _ in 0..29 {
            controller.step(Duration::from_millis(100), &config);
            assert_eq!(controller.state.mode, InteractionMode::Settled);
        }
        controller.step(Duration::from_millis(100), &config);
        assert_eq!(controller.state.mode, InteractionMode::IdleAutorotating);
    }

    #[test]
    fn test_zero_idle_delay_spins_next_frame() {
        let config = GlobeConfig {
            idle_delay: Duration::ZERO,
            ..default()
        };
        let mut controller = RotationController::default();
        drag(&mut controller, &config, Vec2::new(100.0, 0.0));
        while controller.has_momentum(&config) {
            controller.step(FRAME, &config);
        }
        controller.step(FRAME, &config);
        assert_eq!(controller.state.mode, InteractionMode::IdleAutorotating);
    }

    #[test]
    fn test_idle_pulls_pitch_to_equator() {
        let config = GlobeConfig::default();
        let mut controller = RotationController::default();
        controller.state.pitch = 0.5;
        controller.step(FRAME, &config);
        assert!((controller.state.pitch - 0.5 * 0.995).abs() < 1e-12);

        controller.state.pitch = 0.0009;
        controller.step(FRAME, &config);
        assert_eq!(controller.state.pitch, 0.0);
    }

    #[test]
    fn test_invalid_focus_is_rejected() {
        let mut controller = RotationController::default();
        assert!(controller.focus("Nowhere", 120.0, 0.0).is_err());
        assert!(controller.focus("Nowhere", 0.0, f64::NAN).is_err());
        assert!(controller.focused.is_none());
        assert!(controller.state.target.is_none());
        assert!(controller.idle);
    }

    #[test]
    fn test_focus_ignored_while_dragging() {
        let config = GlobeConfig::default();
        let mut controller = RotationController::default();
        controller.press(&config);
        controller.drag_by(Vec2::new(20.0, 0.0), &config);
        assert_eq!(controller.focus("Paris", 48.8566, 2.3522), Ok(None));
        assert!(controller.focused.is_none());
    }

    #[test]
    fn test_press_cancels_flight() {
        let config = GlobeConfig::default();
        let mut controller = RotationController::default();
        controller.focus("Paris", 48.8566, 2.3522).unwrap();
        controller.step(FRAME, &config);
        controller.press(&config);
        assert!(!controller.flying);
        // pin stays until cleared
        assert!(controller.focused.is_some());
        controller.step(FRAME, &config);
        assert_eq!(controller.state.mode, InteractionMode::Settled);
    }

    #[test]
    fn test_clear_unfreezes_then_rearms() {
        let config = GlobeConfig::default();
        let mut controller = RotationController::default();
        controller.focus("Luxembourg", 49.6116, 6.1319).unwrap();
        for _ in 0..10 {
            controller.step(FRAME, &config);
        }

        controller.clear(&config);
        assert!(controller.focused.is_none());
        controller.step(Duration::from_millis(500), &config);
        assert_eq!(controller.state.mode, InteractionMode::IdleAutorotating);

        // Re-arming is suppressed inside the window
        controller.press(&config);
        assert!(controller.idle);

        controller.step(Duration::from_millis(600), &config);
        assert!(!controller.idle);
        assert_eq!(controller.state.mode, InteractionMode::Settled);

        controller.step(Duration::from_secs(3), &config);
        assert_eq!(controller.state.mode, InteractionMode::IdleAutorotating);
    }
}
