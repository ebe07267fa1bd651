use glam::Vec3;

use crate::config::CameraConfig;

/// A time-based interpolation of the orbit target, sampled once per frame.
/// Starting a new transition replaces any pending one; nothing queues.
#[derive(Debug, Clone, Copy)]
struct TargetTransition {
    from: Vec3,
    to: Vec3,
    elapsed: f32,
    duration: f32,
}

/// The viewer camera: position, XYZ Euler rotation in radians, and the orbit
/// target the controls revolve around.
#[derive(Debug)]
pub struct Camera {
    pub position: Vec3,
    pub rotation: Vec3,
    pub target: Vec3,
    transition: Option<TargetTransition>,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            position: Vec3::new(0.6497189, 0.6200658, -0.32675215),
            rotation: Vec3::new(-2.4803932, 1.0626661, 2.5446012),
            target: Vec3::ZERO,
            transition: None,
        }
    }

    /// Instant pose change for config loads; cancels any pending transition.
    pub fn set_pose(&mut self, position: Vec3, rotation: Vec3, target: Vec3) {
        self.position = position;
        self.rotation = rotation;
        self.target = target;
        self.transition = None;
    }

    /// Smoothly re-targets over `duration` seconds (double-click-to-focus).
    /// The latest request wins.
    pub fn focus_on(&mut self, point: Vec3, duration: f32) {
        self.transition = Some(TargetTransition {
            from: self.target,
            to: point,
            elapsed: 0.0,
            duration: duration.max(f32::EPSILON),
        });
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Advances the pending transition, if any. Smoothstep easing.
    pub fn update(&mut self, dt: f32) {
        if let Some(transition) = &mut self.transition {
            transition.elapsed += dt;
            let t = (transition.elapsed / transition.duration).min(1.0);
            let eased = t * t * (3.0 - 2.0 * t);
            self.target = transition.from.lerp(transition.to, eased);

            if t >= 1.0 {
                self.target = transition.to;
                self.transition = None;
            }
        }
    }

    pub fn apply_config(&mut self, config: &CameraConfig) {
        self.set_pose(config.position, config.rotation, config.target);
    }

    pub fn capture_config(&self) -> CameraConfig {
        CameraConfig {
            position: self.position,
            rotation: self.rotation,
            target: self.target,
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_eases_to_the_target() {
        let mut camera = Camera::new();
        camera.set_pose(Vec3::ZERO, Vec3::ZERO, Vec3::ZERO);
        camera.focus_on(Vec3::new(2.0, 0.0, 0.0), 1.0);

        camera.update(0.5);
        assert!(camera.is_transitioning());
        // Smoothstep midpoint.
        assert!((camera.target.x - 1.0).abs() < 1e-5);

        camera.update(0.6);
        assert!(!camera.is_transitioning());
        assert_eq!(camera.target, Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn latest_focus_request_wins() {
        let mut camera = Camera::new();
        camera.set_pose(Vec3::ZERO, Vec3::ZERO, Vec3::ZERO);

        camera.focus_on(Vec3::new(1.0, 0.0, 0.0), 1.0);
        camera.update(0.25);
        camera.focus_on(Vec3::new(0.0, 4.0, 0.0), 1.0);

        camera.update(2.0);
        assert_eq!(camera.target, Vec3::new(0.0, 4.0, 0.0));
    }

    #[test]
    fn set_pose_cancels_transition() {
        let mut camera = Camera::new();
        camera.focus_on(Vec3::ONE, 1.0);
        camera.set_pose(Vec3::ZERO, Vec3::ZERO, Vec3::ZERO);

        assert!(!camera.is_transitioning());
        camera.update(1.0);
        assert_eq!(camera.target, Vec3::ZERO);
    }
}
