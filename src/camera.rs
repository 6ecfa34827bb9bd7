// camera.rs: frustum bounds, dual projections and orientation

use crate::mesh::build_rectangle;
use glam::{Mat4, Vec3, Vec4};

pub const SPHERE_NEAR: f32 = 1.2;
pub const SPHERE_FAR: f32 = 5.0;
pub const OVERLAY_NEAR: f32 = 0.0;
pub const OVERLAY_FAR: f32 = 5.0;

/// Frustum extents shared by the perspective and orthographic cameras.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrustumBounds {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
}

impl Default for FrustumBounds {
    fn default() -> Self {
        Self { left: -1.0, right: 1.0, bottom: -1.0, top: 1.0 }
    }
}

impl FrustumBounds {
    /// Keeps the shorter screen side at ±1 and stretches the longer one.
    pub fn from_viewport(width: u32, height: u32) -> Self {
        let mut bounds = Self::default();
        let (w, h) = (width.max(1) as f32, height.max(1) as f32);
        if w > h {
            let ratio = w / h;
            bounds.left *= ratio;
            bounds.right *= ratio;
        } else {
            let ratio = h / w;
            bounds.bottom *= ratio;
            bounds.top *= ratio;
        }
        bounds
    }
}

/// Off-centre perspective frustum with a [0, 1] depth range.
pub fn frustum(bounds: &FrustumBounds, near: f32, far: f32) -> Mat4 {
    let FrustumBounds { left, right, bottom, top } = *bounds;
    let width = right - left;
    let height = top - bottom;
    let depth = near - far;
    Mat4::from_cols(
        Vec4::new(2.0 * near / width, 0.0, 0.0, 0.0),
        Vec4::new(0.0, 2.0 * near / height, 0.0, 0.0),
        Vec4::new(
            (right + left) / width,
            (top + bottom) / height,
            far / depth,
            -1.0,
        ),
        Vec4::new(0.0, 0.0, near * far / depth, 0.0),
    )
}

pub fn perspective_projection(bounds: &FrustumBounds) -> Mat4 {
    frustum(bounds, SPHERE_NEAR, SPHERE_FAR)
}

pub fn orthographic_projection(bounds: &FrustumBounds) -> Mat4 {
    Mat4::orthographic_rh(
        bounds.left,
        bounds.right,
        bounds.bottom,
        bounds.top,
        OVERLAY_NEAR,
        OVERLAY_FAR,
    )
}

/// The camera sits at the origin looking down -Z and never moves.
pub fn look_at() -> Mat4 {
    Mat4::look_at_rh(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y)
}

/// Rotation about -X by `angle_y` times rotation about -Y by `angle_x` (degrees).
pub fn rotation_from_angles(angle_x: f32, angle_y: f32) -> Mat4 {
    let rotation_x = Mat4::from_axis_angle(Vec3::NEG_X, angle_y.to_radians());
    let rotation_y = Mat4::from_axis_angle(Vec3::NEG_Y, angle_x.to_radians());
    rotation_x * rotation_y
}

/// Orientation angles in degrees, unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Orientation {
    pub angle_x: f32,
    pub angle_y: f32,
}

impl Orientation {
    /// Angles folded into [0, 360) for display only.
    pub fn display_degrees(&self) -> (f32, f32) {
        (self.angle_x.rem_euclid(360.0), self.angle_y.rem_euclid(360.0))
    }
}

/// Viewport-derived state, recomputed only on resize.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub bounds: FrustumBounds,
    pub rectangle: [[f32; 3]; 4],
    split_fraction: f32,
}

impl Viewport {
    pub fn new(width: u32, height: u32, split_fraction: f32) -> Self {
        let bounds = FrustumBounds::from_viewport(width, height);
        Self {
            width,
            height,
            bounds,
            rectangle: build_rectangle(&bounds, split_fraction),
            split_fraction,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        *self = Self::new(width, height, self.split_fraction);
    }

    pub fn split_fraction(&self) -> f32 {
        self.split_fraction
    }

    /// projection × view × rotation for the immersive pass.
    pub fn sphere_transform(&self, orientation: &Orientation) -> Mat4 {
        let projection_view = perspective_projection(&self.bounds) * look_at();
        projection_view * rotation_from_angles(orientation.angle_x, orientation.angle_y)
    }

    /// Screen-aligned overlay transform, never rotated.
    pub fn overlay_transform(&self) -> Mat4 {
        orthographic_projection(&self.bounds) * look_at()
    }
}
