//! Orbit camera controller with eased fly-to

use crate::core::camera::Camera;
use crate::core::types::Vec3;

/// Closest the orbit may get to its target
const MIN_DISTANCE: f32 = 10.0;
/// Farthest the orbit may get from its target
const MAX_DISTANCE: f32 = 1500.0;
/// Pitch limits keep the camera above the ground and off the pole
const MIN_PITCH: f32 = 0.1;
const MAX_PITCH: f32 = 1.5;

/// Orbit-style controller: the camera circles a target point on the ground.
///
/// `advance` is a pure step; the caller owns the controller and writes the
/// result to a [`Camera`] with [`OrbitController::apply`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitController {
    /// Point the camera orbits around
    pub target: Vec3,
    /// Rotation around the Y axis in radians
    pub yaw: f32,
    /// Elevation above the ground plane in radians
    pub pitch: f32,
    /// Distance from the target
    pub distance: f32,
    /// Mouse sensitivity
    pub sensitivity: f32,
    /// Exponential easing rate for fly-to, per second
    pub fly_rate: f32,
    /// Pending fly-to destination (target, distance)
    fly_to: Option<(Vec3, f32)>,
}

impl OrbitController {
    /// Create new controller
    pub fn new(target: Vec3, distance: f32) -> Self {
        Self {
            target,
            yaw: 0.0,
            pitch: 0.6,
            distance: distance.clamp(MIN_DISTANCE, MAX_DISTANCE),
            sensitivity: 1.0,
            fly_rate: 4.0,
            fly_to: None,
        }
    }

    /// Rotate the orbit by a pointer delta (pixels)
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx * self.sensitivity * 0.005;
        self.pitch = (self.pitch + dy * self.sensitivity * 0.005).clamp(MIN_PITCH, MAX_PITCH);
    }

    /// Zoom by a wheel delta; positive values move closer
    pub fn zoom(&mut self, delta: f32) {
        let factor = (1.0 - delta * 0.1).clamp(0.5, 1.5);
        self.distance = (self.distance * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Start flying toward `point`, ending at `distance` from it
    pub fn focus_on(&mut self, point: Vec3, distance: f32) {
        self.fly_to = Some((point, distance.clamp(MIN_DISTANCE, MAX_DISTANCE)));
    }

    /// Whether a fly-to is still in progress
    pub fn is_flying(&self) -> bool {
        self.fly_to.is_some()
    }

    /// Advance the fly-to animation by `dt` seconds
    pub fn advance(self, dt: f32) -> Self {
        let Some((goal, goal_distance)) = self.fly_to else {
            return self;
        };

        let t = 1.0 - (-self.fly_rate * dt.max(0.0)).exp();
        let target = self.target.lerp(goal, t);
        let distance = self.distance + (goal_distance - self.distance) * t;

        // Snap once close enough to stop drifting forever
        let arrived = target.distance(goal) < 0.01 && (distance - goal_distance).abs() < 0.01;

        Self {
            target: if arrived { goal } else { target },
            distance: if arrived { goal_distance } else { distance },
            fly_to: if arrived { None } else { self.fly_to },
            ..self
        }
    }

    /// Camera position implied by target, yaw, pitch and distance
    pub fn eye(&self) -> Vec3 {
        let horizontal = self.distance * self.pitch.cos();
        self.target + Vec3::new(
            horizontal * self.yaw.sin(),
            self.distance * self.pitch.sin(),
            horizontal * self.yaw.cos(),
        )
    }

    /// Write position and orientation into a camera
    pub fn apply(&self, camera: &mut Camera) {
        camera.position = self.eye();
        camera.set_look_at(self.target, Vec3::Y);
    }
}

impl Default for OrbitController {
    fn default() -> Self {
        Self::new(Vec3::ZERO, 200.0)
    }
}
