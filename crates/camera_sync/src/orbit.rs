//! Yaw/pitch/distance orbit camera for attractor views.

use foundation::math::Vec3;

use crate::adapter::{CameraAdapter, ControlsAdapter};

/// Pitch limit just short of the poles so the up vector stays defined.
const MAX_PITCH_RAD: f64 = 1.55;
const ORBIT_SPEED: f64 = 0.005;
const PAN_SPEED: f64 = 0.002;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrbitCamera {
    pub position: Vec3,
}

impl OrbitCamera {
    pub fn new(position: Vec3) -> Self {
        Self { position }
    }
}

impl CameraAdapter for OrbitCamera {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }
}

/// Orbit controls around a target point.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrbitControls {
    pub target: Vec3,
    pub yaw_rad: f64,
    pub pitch_rad: f64,
    pub distance: f64,
    pub min_distance: f64,
    pub max_distance: f64,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            yaw_rad: 0.6,
            pitch_rad: 0.3,
            distance: 60.0,
            min_distance: 1.0,
            max_distance: 1_000.0,
        }
    }
}

impl OrbitControls {
    /// Unit vector from the target towards the eye.
    pub fn direction(&self) -> Vec3 {
        Vec3::new(
            self.pitch_rad.cos() * self.yaw_rad.cos(),
            self.pitch_rad.sin(),
            self.pitch_rad.cos() * self.yaw_rad.sin(),
        )
    }

    pub fn eye(&self) -> Vec3 {
        self.target + self.direction().scale(self.distance)
    }

    /// Places `camera` according to the current spherical state.
    pub fn place(&self, camera: &mut dyn CameraAdapter) {
        camera.set_position(self.eye());
    }

    /// Rotates around the target by a pointer delta in pixels.
    pub fn orbit(&mut self, camera: &mut dyn CameraAdapter, delta_x_px: f64, delta_y_px: f64) {
        self.yaw_rad += delta_x_px * ORBIT_SPEED;
        self.pitch_rad =
            (self.pitch_rad + delta_y_px * ORBIT_SPEED).clamp(-MAX_PITCH_RAD, MAX_PITCH_RAD);
        self.place(camera);
    }

    /// Moves the target in the view plane by a pointer delta in pixels.
    pub fn pan(&mut self, camera: &mut dyn CameraAdapter, delta_x_px: f64, delta_y_px: f64) {
        let forward = self.direction().scale(-1.0);
        let up = Vec3::new(0.0, 1.0, 0.0);
        let right = normalize(cross(forward, up));
        let real_up = cross(right, forward);
        let scale = self.distance * PAN_SPEED;
        self.target =
            self.target + right.scale(-delta_x_px * scale) + real_up.scale(delta_y_px * scale);
        self.place(camera);
    }

    /// Exponential dolly; positive `delta` moves away.
    pub fn zoom(&mut self, camera: &mut dyn CameraAdapter, delta: f64) {
        self.distance =
            (self.distance * (delta * 0.001).exp()).clamp(self.min_distance, self.max_distance);
        self.place(camera);
    }
}

impl ControlsAdapter for OrbitControls {
    fn target(&self) -> Vec3 {
        self.target
    }

    fn set_target(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Re-derives yaw, pitch, and distance from the camera's position, clamps
    /// them, and moves the camera onto the clamped orbit.
    fn update(&mut self, camera: &mut dyn CameraAdapter) {
        let offset = camera.position() - self.target;
        let len = offset.length();
        if len > 0.0 {
            self.distance = len;
            self.pitch_rad = (offset.y / len).clamp(-1.0, 1.0).asin();
            self.yaw_rad = offset.z.atan2(offset.x);
        }
        self.pitch_rad = self.pitch_rad.clamp(-MAX_PITCH_RAD, MAX_PITCH_RAD);
        self.distance = self.distance.clamp(self.min_distance, self.max_distance);
        self.place(camera);
    }
}

fn cross(a: Vec3, b: Vec3) -> Vec3 {
    Vec3::new(
        a.y * b.z - a.z * b.y,
        a.z * b.x - a.x * b.z,
        a.x * b.y - a.y * b.x,
    )
}

fn normalize(a: Vec3) -> Vec3 {
    let n = a.length();
    if n <= 0.0 { Vec3::ZERO } else { a.scale(1.0 / n) }
}
