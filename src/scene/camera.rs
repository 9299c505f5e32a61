//! Orbit camera
//!
//! The camera orbits a fixed target point. Orientation is a quaternion
//! updated incrementally from mouse deltas: the yaw rotation is applied
//! in world space (pre-multiplied) and the pitch rotation in local space
//! (post-multiplied), so horizontal drags always spin about the world
//! up axis regardless of the current tilt.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};

const MIN_RADIUS: f32 = 1.0;
const MAX_RADIUS: f32 = 20.0;

/// Quaternion-based orbit camera around a fixed target
pub struct OrbitCamera {
    target: Vec3,
    orientation: Quat,
    radius: f32,
    sensitivity: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(Vec3::ZERO, 5.0)
    }
}

impl OrbitCamera {
    pub fn new(target: Vec3, radius: f32) -> Self {
        Self {
            target,
            orientation: Quat::IDENTITY,
            radius: radius.clamp(MIN_RADIUS, MAX_RADIUS),
            sensitivity: 0.1,
        }
    }

    /// Apply a mouse drag delta in pixels. A rightward drag yaws the
    /// view left, swinging the camera toward +X.
    pub fn orbit(&mut self, delta_x: f32, delta_y: f32) {
        let yaw = Quat::from_rotation_y((delta_x * self.sensitivity).to_radians());
        let pitch = Quat::from_rotation_x((-delta_y * self.sensitivity).to_radians());
        self.orientation = (yaw * self.orientation * pitch).normalize();
    }

    /// Apply a scroll delta; positive scroll moves the camera closer
    pub fn zoom(&mut self, scroll: f32) {
        self.radius = (self.radius - scroll).clamp(MIN_RADIUS, MAX_RADIUS);
    }

    /// Camera position in world space
    pub fn position(&self) -> Vec3 {
        self.target - self.forward() * self.radius
    }

    /// View direction toward the target
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::NEG_Z
    }

    pub fn up(&self) -> Vec3 {
        self.orientation * Vec3::Y
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// View matrix looking from the orbit position at the target
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, self.up())
    }
}

/// Perspective projection state, recomputed when the surface aspect changes
pub struct Projection {
    fov_y: f32,
    aspect: f32,
    near: f32,
    far: f32,
}

impl Projection {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            fov_y: 45f32.to_radians(),
            aspect: width as f32 / height.max(1) as f32,
            near: 0.1,
            far: 100.0,
        }
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }
}

/// Per-frame camera uniform, std140-compatible
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view: Mat4,
    pub projection: Mat4,
    pub position: Vec3,
    pub _padding: f32,
}

impl CameraUniform {
    pub fn new(camera: &OrbitCamera, projection: &Projection) -> Self {
        Self {
            view: camera.view_matrix(),
            projection: projection.matrix(),
            position: camera.position(),
            _padding: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera_looks_down_negative_z() {
        let camera = OrbitCamera::default();
        assert!((camera.forward() - Vec3::NEG_Z).length() < 1e-6);
        assert!((camera.position() - Vec3::new(0.0, 0.0, 5.0)).length() < 1e-6);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut camera = OrbitCamera::default();
        camera.zoom(3.0);
        assert!((camera.radius() - 2.0).abs() < 1e-6);
        camera.zoom(10.0);
        assert!((camera.radius() - MIN_RADIUS).abs() < 1e-6);
        camera.zoom(-100.0);
        assert!((camera.radius() - MAX_RADIUS).abs() < 1e-6);
    }

    #[test]
    fn orbit_preserves_distance_to_target() {
        let mut camera = OrbitCamera::new(Vec3::new(1.0, 2.0, 3.0), 5.0);
        camera.orbit(40.0, -25.0);
        camera.orbit(-13.0, 7.0);
        let distance = (camera.position() - Vec3::new(1.0, 2.0, 3.0)).length();
        assert!((distance - 5.0).abs() < 1e-4);
    }

    #[test]
    fn horizontal_orbit_spins_about_world_up() {
        let mut camera = OrbitCamera::default();
        camera.orbit(900.0, 0.0);
        // 900 px * 0.1 deg/px = 90 degrees of yaw; a rightward drag
        // carries the camera from +Z to +X
        assert!((camera.position() - Vec3::new(5.0, 0.0, 0.0)).length() < 1e-4);
        assert!((camera.forward() - Vec3::NEG_X).length() < 1e-4);
    }

    #[test]
    fn view_matrix_places_target_on_view_axis() {
        let mut camera = OrbitCamera::default();
        camera.orbit(123.0, -45.0);
        let view = camera.view_matrix();
        let target_view = view.transform_point3(Vec3::ZERO);
        assert!(target_view.x.abs() < 1e-4);
        assert!(target_view.y.abs() < 1e-4);
        assert!((target_view.z + 5.0).abs() < 1e-4);
    }

    #[test]
    fn projection_aspect_tracks_resize() {
        let mut projection = Projection::new(1280, 720);
        projection.set_aspect(1920, 1080);
        let m = projection.matrix();
        let expected = Mat4::perspective_rh(45f32.to_radians(), 1920.0 / 1080.0, 0.1, 100.0);
        assert!((m.col(0).x - expected.col(0).x).abs() < 1e-6);
    }
}
