// Orbit camera
//
// Camera model:
//   - A target point the camera looks at (the origin unless moved)
//   - Yaw (horizontal rotation) and pitch (elevation) around the target
//   - Zoom by adjusting distance along the look vector
//   - Left-drag orbits, right-drag pans the target, mouse wheel zooms
//
// Also the picker's source of rays: a normalized pointer sample is unprojected
// through the inverse view-projection to a world-space ray from the eye.

use bevy_ecs::prelude::*;
use glam::{Mat4, Vec2, Vec3};
use super::input::InputState;
use super::params::CameraParams;
use super::picking::Ray;

/// Pitch is kept just short of the poles so look_at never degenerates.
const MAX_PITCH: f32 = 89.0 * std::f32::consts::PI / 180.0;

#[derive(Resource)]
pub struct OrbitCamera {
    pub target: Vec3,

    /// Distance from target along the look direction.
    /// Private: always clamped to [min_distance, max_distance] in update(). Use distance() to read.
    distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,

    /// Elevation angle in radians (0 = level with the target)
    pitch: f32,

    /// Horizontal rotation in radians (0 = eye on +Z looking along -Z)
    pub yaw: f32,

    /// Vertical field of view in radians
    pub fov: f32,
    pub near: f32,
    pub far: f32,

    /// Radians of rotation per pixel of drag
    pub rotate_speed: f32,

    /// Pan multiplier. At 1.0 the point under the cursor on the target plane
    /// stays under the cursor.
    pub pan_speed: f32,

    /// Zoom change (in distance units) per scroll line
    pub zoom_speed: f32,
}

impl OrbitCamera {
    pub fn new(params: &CameraParams) -> Self {
        let offset = params.eye;
        let distance = offset.length().max(params.near);
        let pitch = (offset.y / distance).clamp(-1.0, 1.0).asin().clamp(-MAX_PITCH, MAX_PITCH);
        let yaw = offset.x.atan2(offset.z);

        Self {
            target: Vec3::ZERO,
            distance,
            min_distance: 1.0,
            max_distance: params.far * 0.5,
            pitch,
            yaw,
            fov: params.fov,
            near: params.near,
            far: params.far,
            rotate_speed: 0.005,
            pan_speed: 1.0,
            zoom_speed: 1.5,
        }
    }

    /// Apply drag and scroll from this frame's input. Call once per frame before picking.
    pub fn update(&mut self, input: &InputState) {
        if input.dragging {
            let (dx, dy) = input.mouse_delta;
            self.yaw -= dx * self.rotate_speed;
            self.pitch = (self.pitch + dy * self.rotate_speed).clamp(-MAX_PITCH, MAX_PITCH);
        }

        if input.panning && input.window_size.1 > 0 {
            let (dx, dy) = input.mouse_delta;
            // World units per pixel at the target's depth
            let scale = 2.0 * self.distance * (self.fov * 0.5).tan() / input.window_size.1 as f32;
            let (right, up) = self.screen_axes();
            self.target += (up * dy - right * dx) * scale * self.pan_speed;
        }

        // Scroll up (positive delta) zooms in
        self.distance -= input.scroll_delta * self.zoom_speed;
        self.distance = self.distance.clamp(self.min_distance, self.max_distance);
    }

    /// World-space position of the camera eye.
    pub fn camera_position(&self) -> Vec3 {
        self.target + self.eye_offset()
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.camera_position(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov, aspect, self.near, self.far)
    }

    /// Combined view-projection matrix ready to upload to the GPU.
    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    /// World-space ray from the eye through a normalized device coordinate.
    pub fn ray_through(&self, ndc: Vec2, aspect: f32) -> Ray {
        let inv_view_proj = self.view_projection(aspect).inverse();
        let far_point = inv_view_proj.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        let origin = self.camera_position();
        Ray::new(origin, (far_point - origin).normalize())
    }

    pub fn distance(&self) -> f32 { self.distance }

    #[cfg(test)]
    pub fn pitch(&self) -> f32 { self.pitch }

    // Camera right and up in world space, both perpendicular to the look direction.
    fn screen_axes(&self) -> (Vec3, Vec3) {
        let forward = -self.eye_offset().normalize();
        let right = forward.cross(Vec3::Y).normalize();
        (right, right.cross(forward))
    }

    // Offset from target to camera eye based on pitch, yaw, and distance.
    fn eye_offset(&self) -> Vec3 {
        Vec3::new(
            self.yaw.sin() * self.pitch.cos() * self.distance,
            self.pitch.sin() * self.distance,
            self.yaw.cos() * self.pitch.cos() * self.distance,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_eye_matches_params() {
        let camera = OrbitCamera::new(&CameraParams::default());
        assert!(camera.camera_position().distance(Vec3::new(0.0, 0.0, 20.0)) < 1e-4);
        assert_eq!(camera.distance(), 20.0);
    }

    #[test]
    fn test_center_ray_points_at_target() {
        let camera = OrbitCamera::new(&CameraParams::default());
        let ray = camera.ray_through(Vec2::ZERO, 1.5);
        assert!(ray.origin.distance(Vec3::new(0.0, 0.0, 20.0)) < 1e-4);
        assert!(ray.dir.distance(Vec3::NEG_Z) < 1e-4);
    }

    #[test]
    fn test_edge_ray_spans_half_fov() {
        let camera = OrbitCamera::new(&CameraParams::default());
        let ray = camera.ray_through(Vec2::new(0.0, 1.0), 1.0);
        let angle = ray.dir.angle_between(Vec3::NEG_Z);
        assert!((angle - camera.fov / 2.0).abs() < 1e-3);
        assert!(ray.dir.y > 0.0);

        let ray = camera.ray_through(Vec2::new(1.0, 0.0), 2.0);
        let expected = ((camera.fov / 2.0).tan() * 2.0).atan();
        assert!((ray.dir.angle_between(Vec3::NEG_Z) - expected).abs() < 1e-3);
        assert!(ray.dir.x > 0.0);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut camera = OrbitCamera::new(&CameraParams::default());
        let mut input = InputState::new();
        input.scroll_delta = 1000.0;
        camera.update(&input);
        assert_eq!(camera.distance(), camera.min_distance);
    }

    #[test]
    fn test_right_drag_pans_target_with_eye() {
        let mut camera = OrbitCamera::new(&CameraParams::default());
        let offset = camera.camera_position() - camera.target;
        let mut input = InputState::new();
        input.window_size = (800, 600);
        input.panning = true;
        input.mouse_delta = (100.0, -50.0);
        camera.update(&input);

        // Dragging right and up shifts the target left and down.
        let per_pixel = 2.0 * 20.0 * (camera.fov * 0.5).tan() / 600.0;
        let expected = Vec3::new(-100.0 * per_pixel, -50.0 * per_pixel, 0.0);
        assert!(camera.target.distance(expected) < 1e-4);
        assert!((camera.camera_position() - camera.target).distance(offset) < 1e-4);
        assert_eq!(camera.yaw, 0.0);
    }

    #[test]
    fn test_pan_keeps_cursor_point_fixed() {
        let mut camera = OrbitCamera::new(&CameraParams::default());
        let mut input = InputState::new();
        input.window_size = (600, 600);

        // Point on the z = 0 plane under ndc (0.5, 0) before the pan.
        let ray = camera.ray_through(Vec2::new(0.5, 0.0), 1.0);
        let grabbed = ray.at(-ray.origin.z / ray.dir.z);

        // Half a viewport width to the left brings it to the center.
        input.panning = true;
        input.mouse_delta = (-150.0, 0.0);
        camera.update(&input);

        let ray = camera.ray_through(Vec2::ZERO, 1.0);
        let center = ray.at(-ray.origin.z / ray.dir.z);
        assert!(center.distance(grabbed) < 1e-3);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut camera = OrbitCamera::new(&CameraParams::default());
        camera.pitch = 0.0;
        let mut input = InputState::new();
        input.dragging = true;
        input.mouse_delta = (0.0, 1.0e6);
        camera.update(&input);
        assert!((camera.pitch() - MAX_PITCH).abs() < 1e-6);
    }
}
