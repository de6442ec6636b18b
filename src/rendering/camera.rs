use glam::{Mat4, Vec3};

const POLAR_EPS: f32 = 1e-4;

/// Primary perspective camera. Right-handed system; looks down -Z.
pub struct Camera {
    pub position: Vec3,
    pub forward: Vec3,
    pub up: Vec3,
    pub right: Vec3,
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(position: Vec3, target: Vec3, aspect: f32) -> Self {
        let fov_y = 60f32.to_radians();
        let forward = (target - position).normalize_or_zero();
        let world_up = Vec3::Y;
        let right = forward.cross(world_up).normalize_or_zero();
        let up = right.cross(forward).normalize_or_zero();
        Self {
            position,
            forward,
            up,
            right,
            fov_y,
            aspect,
            near: 1.0,
            far: 1_000.0,
        }
    }

    #[inline]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.forward, self.up)
    }

    #[inline]
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect.max(1e-6), self.near, self.far)
    }

    #[inline]
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Re-derive the orthonormal basis so the camera faces `target`.
    pub fn look_at(&mut self, target: Vec3) {
        let forward = (target - self.position).normalize_or_zero();
        if forward.length_squared() == 0.0 {
            return;
        }
        self.forward = forward;
        self.right = self.forward.cross(Vec3::Y).normalize_or_zero();
        if self.right.length_squared() == 0.0 {
            // looking straight along Y; keep the previous right vector
            self.right = Vec3::X;
        }
        self.up = self.right.cross(self.forward).normalize();
    }

    /// Track the window viewport. A zero-height viewport (minimized window)
    /// is ignored so the previous aspect ratio survives.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
    }
}

/// Damped orbit controls bound to a [`Camera`].
///
/// Keeps the camera on a sphere around `target`: dragging accumulates
/// spherical deltas, the wheel scales the radius, and `update` applies one
/// inertia step per tick, clamping distance and polar angle. With
/// `screen_space_panning` off, vertical pans slide the target inside the
/// horizontal plane instead of along the view plane.
pub struct OrbitControls {
    pub target: Vec3,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub screen_space_panning: bool,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    viewport_height: f32,
    delta_theta: f32,
    delta_phi: f32,
    pan_px: (f32, f32),
    scale: f32,
}

impl OrbitControls {
    pub fn new(target: Vec3, viewport_height: f32) -> Self {
        Self {
            target,
            enable_damping: true,
            damping_factor: 0.05,
            screen_space_panning: false,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: std::f32::consts::PI,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            viewport_height: viewport_height.max(1.0),
            delta_theta: 0.0,
            delta_phi: 0.0,
            pan_px: (0.0, 0.0),
            scale: 1.0,
        }
    }

    pub fn set_viewport_height(&mut self, height: u32) {
        if height == 0 {
            return;
        }
        self.viewport_height = height as f32;
    }

    /// Accumulate a drag in pixels; one full viewport height sweeps 2π.
    pub fn rotate(&mut self, dx_px: f32, dy_px: f32) {
        let to_radians = std::f32::consts::TAU / self.viewport_height * self.rotate_speed;
        self.delta_theta -= dx_px * to_radians;
        self.delta_phi -= dy_px * to_radians;
    }

    /// Accumulate a pan in pixels; resolved against the camera at update time.
    pub fn pan(&mut self, dx_px: f32, dy_px: f32) {
        self.pan_px.0 += dx_px;
        self.pan_px.1 += dy_px;
    }

    /// Dolly by wheel steps; positive steps move the camera inward.
    pub fn dolly(&mut self, steps: f32) {
        if steps != 0.0 {
            self.scale *= 0.95f32.powf(steps * self.zoom_speed);
        }
    }

    /// Advance the damping/inertia state by one step and move the camera.
    pub fn update(&mut self, camera: &mut Camera) {
        let offset = camera.position - self.target;
        let mut radius = offset.length().max(1e-4);
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

        let k = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };
        theta += self.delta_theta * k;
        phi += self.delta_phi * k;
        phi = phi.clamp(
            self.min_polar_angle.max(POLAR_EPS),
            self.max_polar_angle.min(std::f32::consts::PI - POLAR_EPS),
        );
        radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);

        if self.pan_px != (0.0, 0.0) {
            // pixels to world units at the target's depth
            let world_per_px =
                2.0 * radius * (camera.fov_y * 0.5).tan() / self.viewport_height * self.pan_speed;
            let up_dir = if self.screen_space_panning {
                camera.up
            } else {
                Vec3::Y.cross(camera.right).normalize_or_zero()
            };
            self.target += camera.right * (-self.pan_px.0 * world_per_px * k)
                + up_dir * (self.pan_px.1 * world_per_px * k);
        }

        let (sin_phi, cos_phi) = phi.sin_cos();
        camera.position = self.target
            + Vec3::new(
                radius * sin_phi * theta.sin(),
                radius * cos_phi,
                radius * sin_phi * theta.cos(),
            );
        camera.look_at(self.target);

        if self.enable_damping {
            let decay = 1.0 - self.damping_factor;
            self.delta_theta *= decay;
            self.delta_phi *= decay;
            self.pan_px.0 *= decay;
            self.pan_px.1 *= decay;
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
            self.pan_px = (0.0, 0.0);
        }
        self.scale = 1.0;
    }

    pub fn distance(&self, camera: &Camera) -> f32 {
        (camera.position - self.target).length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn camera_at(position: Vec3) -> Camera {
        Camera::new(position, Vec3::ZERO, 16.0 / 9.0)
    }

    #[test]
    fn test_viewport_aspect_update() {
        let mut cam = camera_at(Vec3::new(0.0, 0.0, 10.0));
        cam.set_viewport(1920, 1080);
        assert_relative_eq!(cam.aspect, 1920.0 / 1080.0);
    }

    #[test]
    fn test_zero_height_viewport_preserves_aspect() {
        let mut cam = camera_at(Vec3::new(0.0, 0.0, 10.0));
        cam.set_viewport(1280, 720);
        let before = cam.aspect;
        cam.set_viewport(1280, 0);
        assert_relative_eq!(cam.aspect, before);
        // projection stays finite even if aspect were degenerate
        assert!(cam.projection_matrix().is_finite());
    }

    #[test]
    fn test_distance_clamped_to_orbit_limits() {
        let mut cam = camera_at(Vec3::new(100.0, 50.0, 0.0));
        let mut controls = OrbitControls::new(Vec3::ZERO, 720.0);
        controls.min_distance = 5.0;
        controls.max_distance = 15.0;
        controls.update(&mut cam);
        assert_relative_eq!(controls.distance(&cam), 15.0, epsilon = 1e-3);

        // dolly far inward over many ticks; never passes min_distance
        for _ in 0..200 {
            controls.dolly(5.0);
            controls.update(&mut cam);
        }
        assert!(controls.distance(&cam) >= 5.0 - 1e-3);
    }

    #[test]
    fn test_polar_angle_clamp() {
        let mut cam = camera_at(Vec3::new(10.0, 0.0, 0.0));
        let mut controls = OrbitControls::new(Vec3::ZERO, 720.0);
        controls.max_polar_angle = std::f32::consts::FRAC_PI_2;
        // drag hard downward, which pushes phi past the equator
        for _ in 0..100 {
            controls.rotate(0.0, -400.0);
            controls.update(&mut cam);
        }
        // camera never sinks below the horizon plane
        assert!(cam.position.y >= -1e-3);
    }

    #[test]
    fn test_damping_decays_motion() {
        let mut cam = camera_at(Vec3::new(0.0, 0.0, 10.0));
        let mut controls = OrbitControls::new(Vec3::ZERO, 720.0);
        controls.rotate(360.0, 0.0);
        controls.update(&mut cam);
        let first = cam.position;
        let mut moved = 0;
        for _ in 0..400 {
            let before = cam.position;
            controls.update(&mut cam);
            if (cam.position - before).length() > 1e-6 {
                moved += 1;
            }
        }
        // inertia carries past the first tick, then dies out
        assert!(moved > 0);
        assert!((cam.position - first).length() > 1e-4);
        let settled = cam.position;
        controls.update(&mut cam);
        assert!((cam.position - settled).length() < 1e-5);
    }

    #[test]
    fn test_camera_faces_target_after_update() {
        let mut cam = camera_at(Vec3::new(100.0, 50.0, 0.0));
        let mut controls = OrbitControls::new(Vec3::ZERO, 720.0);
        controls.min_distance = 5.0;
        controls.max_distance = 15.0;
        controls.rotate(123.0, -45.0);
        controls.update(&mut cam);
        let expected = (controls.target - cam.position).normalize();
        assert_relative_eq!(cam.forward.x, expected.x, epsilon = 1e-5);
        assert_relative_eq!(cam.forward.y, expected.y, epsilon = 1e-5);
        assert_relative_eq!(cam.forward.z, expected.z, epsilon = 1e-5);
    }
}
