use crate::core::math::transform::TransformFactory;
use nalgebra::{Matrix4, Point3, Vector3};
use std::f32::consts::FRAC_PI_2;

/// Pitch is kept this far from straight up/down so the basis never collapses.
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;

#[derive(Debug, Clone, PartialEq)]
pub enum ProjectionType {
    Perspective { fov_y_rad: f32, aspect_ratio: f32 },
    Orthographic { height: f32, aspect_ratio: f32 },
}

/// Camera pose and lens. Owns an orthonormal right-handed basis
/// (`right × up = -forward`, looking down `forward`) and the View and
/// Projection matrices derived from it.
///
/// The basis and matrices are recomputed by every method that changes the
/// pose, so the render loop can treat them as a read-only snapshot.
#[derive(Debug, Clone)]
pub struct Camera {
    pub origin: Point3<f32>,
    pub near: f32,
    pub far: f32,
    pub projection_type: ProjectionType,

    yaw: f32,
    pitch: f32,
    forward: Vector3<f32>,
    right: Vector3<f32>,
    up: Vector3<f32>,

    view_matrix: Matrix4<f32>,
    projection_matrix: Matrix4<f32>,
}

impl Camera {
    pub fn new_perspective(
        origin: Point3<f32>,
        target: Point3<f32>,
        fov_y_rad: f32,
        aspect_ratio: f32,
        near: f32,
        far: f32,
    ) -> Self {
        Self::with_projection(
            origin,
            target,
            ProjectionType::Perspective {
                fov_y_rad,
                aspect_ratio,
            },
            near,
            far,
        )
    }

    pub fn new_orthographic(
        origin: Point3<f32>,
        target: Point3<f32>,
        height: f32, // View height
        aspect_ratio: f32,
        near: f32,
        far: f32,
    ) -> Self {
        Self::with_projection(
            origin,
            target,
            ProjectionType::Orthographic {
                height,
                aspect_ratio,
            },
            near,
            far,
        )
    }

    fn with_projection(
        origin: Point3<f32>,
        target: Point3<f32>,
        projection_type: ProjectionType,
        near: f32,
        far: f32,
    ) -> Self {
        let mut cam = Self {
            origin,
            near,
            far,
            projection_type,
            yaw: 0.0,
            pitch: 0.0,
            forward: -Vector3::z(),
            right: Vector3::x(),
            up: Vector3::y(),
            view_matrix: Matrix4::identity(),
            projection_matrix: Matrix4::identity(),
        };
        cam.look_at(target);
        cam
    }

    /// Turns the camera towards `target`. A target equal to the origin keeps
    /// the current orientation.
    pub fn look_at(&mut self, target: Point3<f32>) {
        if let Some(direction) = (target - self.origin).try_normalize(f32::EPSILON) {
            let pitch = direction.y.clamp(-1.0, 1.0).asin();
            let yaw = direction.x.atan2(-direction.z);
            self.set_orientation(yaw, pitch);
        } else {
            self.update_matrices();
        }
    }

    /// Sets yaw (around world Y, 0 looks down -Z) and pitch (radians).
    pub fn set_orientation(&mut self, yaw: f32, pitch: f32) {
        self.yaw = yaw;
        self.pitch = pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_matrices();
    }

    pub fn rotate(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.set_orientation(self.yaw + delta_yaw, self.pitch + delta_pitch);
    }

    pub fn translate(&mut self, offset: Vector3<f32>) {
        self.origin += offset;
        self.update_matrices();
    }

    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        match &mut self.projection_type {
            ProjectionType::Perspective { aspect_ratio, .. }
            | ProjectionType::Orthographic { aspect_ratio, .. } => *aspect_ratio = aspect,
        }
        self.update_matrices();
    }

    /// Recomputes the basis from yaw/pitch, then the View and Projection matrices.
    pub fn update_matrices(&mut self) {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();

        self.forward = Vector3::new(cos_pitch * sin_yaw, sin_pitch, -cos_pitch * cos_yaw);
        self.right = self.forward.cross(&Vector3::y()).normalize();
        self.up = self.right.cross(&self.forward).normalize();

        let target = self.origin + self.forward;
        self.view_matrix = TransformFactory::view(&self.origin, &target, &self.up);

        self.projection_matrix = match self.projection_type {
            ProjectionType::Perspective {
                fov_y_rad,
                aspect_ratio,
            } => TransformFactory::perspective(aspect_ratio, fov_y_rad, self.near, self.far),

            ProjectionType::Orthographic {
                height,
                aspect_ratio,
            } => {
                let half_height = height / 2.0;
                let half_width = half_height * aspect_ratio;

                TransformFactory::orthographic(
                    -half_width,
                    half_width,
                    -half_height,
                    half_height,
                    self.near,
                    self.far,
                )
            }
        };
    }

    pub fn forward(&self) -> Vector3<f32> {
        self.forward
    }

    pub fn right(&self) -> Vector3<f32> {
        self.right
    }

    pub fn up(&self) -> Vector3<f32> {
        self.up
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.view_matrix
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection_matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn camera_at(origin: Point3<f32>, target: Point3<f32>) -> Camera {
        Camera::new_perspective(origin, target, 60f32.to_radians(), 1.0, 0.1, 100.0)
    }

    fn assert_orthonormal(cam: &Camera) {
        assert_relative_eq!(cam.forward().norm(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(cam.right().norm(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(cam.up().norm(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(cam.forward().dot(&cam.right()), 0.0, epsilon = 1e-5);
        assert_relative_eq!(cam.forward().dot(&cam.up()), 0.0, epsilon = 1e-5);
        assert_relative_eq!(cam.right().dot(&cam.up()), 0.0, epsilon = 1e-5);
        assert_relative_eq!(cam.right().cross(&cam.up()), -cam.forward(), epsilon = 1e-5);
    }

    #[test]
    fn looks_at_target() {
        let cam = camera_at(Point3::new(0.0, 0.0, 10.0), Point3::origin());
        assert_relative_eq!(cam.forward(), -Vector3::z(), epsilon = 1e-5);
        assert_orthonormal(&cam);

        let cam = camera_at(Point3::new(0.0, 0.0, -10.0), Point3::origin());
        assert_relative_eq!(cam.forward(), Vector3::z(), epsilon = 1e-5);
        assert_orthonormal(&cam);
    }

    #[test]
    fn target_lands_in_front_of_view() {
        let cam = camera_at(Point3::new(3.0, 2.0, 8.0), Point3::new(0.0, 0.5, 0.0));
        let view_pos = cam.view_matrix() * Point3::new(0.0, 0.5, 0.0).to_homogeneous();
        assert_relative_eq!(view_pos.x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(view_pos.y, 0.0, epsilon = 1e-4);
        assert!(view_pos.z < 0.0);
    }

    #[test]
    fn rotation_keeps_basis_orthonormal() {
        let mut cam = camera_at(Point3::origin(), Point3::new(0.0, 0.0, -1.0));
        cam.rotate(0.7, 0.3);
        assert_orthonormal(&cam);
        cam.rotate(-2.0, 5.0);
        assert!(cam.pitch() < FRAC_PI_2);
        assert_orthonormal(&cam);
    }

    #[test]
    fn translation_moves_view() {
        let mut cam = camera_at(Point3::new(0.0, 0.0, 5.0), Point3::origin());
        cam.translate(Vector3::new(0.0, 0.0, 5.0));
        let p = cam.view_matrix() * Point3::origin().to_homogeneous();
        assert_relative_eq!(p.z, -10.0, epsilon = 1e-4);
    }
}
